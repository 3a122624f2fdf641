use std::{fs, path::Path};

use kakeibo::{
    AnalysisView, Error, Report, TimeRange, analyze,
    config::OutputFormat,
    import::{load_categories, load_transactions},
    timezone::resolve_timezone,
};
use tempfile::TempDir;
use time::macros::date;
use time_tz::Tz;

const TRANSACTIONS_CSV: &str = "id,amount,type,category_id,date,description
1,1000,expense,food,2024-06-01,Groceries
2,500,expense,food,2024-06-02,
3,2000,income,salary,2024-06-01,June pay
4,800,expense,unknown,2024-06-03,Untracked
5,300,expense,food,2024-04-30,Too old
";

const CATEGORIES_JSON: &str = r##"[
    {"id": "food", "name": "食費", "color": "#EF4444"},
    {"id": "salary", "name": "給与", "color": "#10B981"}
]"##;

fn write_file(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn tokyo() -> &'static Tz {
    resolve_timezone("Asia/Tokyo").unwrap()
}

#[test]
fn expense_report_from_files() {
    let dir = TempDir::new().unwrap();
    let transactions_path = write_file(&dir, "transactions.csv", TRANSACTIONS_CSV);
    let categories_path = write_file(&dir, "categories.json", CATEGORIES_JSON);

    let transactions = load_transactions(&transactions_path, tokyo()).unwrap();
    let categories = load_categories(&categories_path).unwrap();
    let report = analyze(
        AnalysisView::Expense,
        &transactions,
        &categories,
        TimeRange::Month,
        date!(2024 - 06 - 15),
    )
    .unwrap();

    let Report::SingleMetric { report, .. } = &report else {
        panic!("expected a single-metric report");
    };
    // The uncategorised expense counts toward the total but not the categories.
    assert_eq!(report.summary.total, 2300.0);
    assert_eq!(report.summary.count, 3);
    assert_eq!(report.category_totals.len(), 1);
    assert_eq!(report.category_totals[0].total, 1500.0);
    assert_eq!(report.category_totals[0].percentage, Some(100.0));
    assert_eq!(report.day_points.len(), 3);
}

#[test]
fn overall_report_renders_in_every_format() {
    let dir = TempDir::new().unwrap();
    let transactions_path = write_file(&dir, "transactions.csv", TRANSACTIONS_CSV);
    let categories_path = write_file(&dir, "categories.json", CATEGORIES_JSON);

    let transactions = load_transactions(&transactions_path, tokyo()).unwrap();
    let categories = load_categories(&categories_path).unwrap();
    let report = analyze(
        AnalysisView::Overall,
        &transactions,
        &categories,
        TimeRange::Month,
        date!(2024 - 06 - 15),
    )
    .unwrap();

    let json = OutputFormat::Json.render(&report).unwrap();
    let json: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(json["mode"], "combined");
    assert_eq!(json["summary"]["total_income"], 2000.0);
    assert_eq!(json["summary"]["total_expense"], 2300.0);
    assert_eq!(json["summary"]["balance"], -300.0);
    assert_eq!(json["summary"]["transaction_count"], 4);
    assert_eq!(json["monthly_points"].as_array().unwrap().len(), 12);
    assert_eq!(json["monthly_points"][11]["month"], "2024-06");
    assert_eq!(json["monthly_points"][11]["expense"], 2300.0);
    // April is outside the window, so it stays zero.
    assert_eq!(json["monthly_points"][9]["month"], "2024-04");
    assert_eq!(json["monthly_points"][9]["expense"], 0.0);

    let table = OutputFormat::Table.render(&report).unwrap();
    assert!(table.contains("-¥300"));

    let html = OutputFormat::Html.render(&report).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("monthly-chart"));
}

#[test]
fn invalid_rows_are_rejected_with_their_id() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "transactions.csv",
        "id,amount,type,category_id,date,description\nok,10,expense,,2024-06-01,\nbad,-10,expense,,2024-06-01,\n",
    );

    let result = load_transactions(&path, tokyo());

    assert_eq!(result, Err(Error::NegativeAmount("bad".to_owned(), -10.0)));
}

#[test]
fn missing_and_unsupported_files_are_errors() {
    let missing = load_transactions(Path::new("does/not/exist.csv"), tokyo());
    assert!(matches!(missing, Err(Error::ReadError(..))));

    let unsupported = load_categories(Path::new("categories.toml"));
    assert_eq!(
        unsupported,
        Err(Error::UnsupportedFileType("categories.toml".to_owned()))
    );
}
