//! Renders reports as terminal tables.

use comfy_table::{Cell, CellAlignment, Table, presets::UTF8_FULL};

use crate::{
    aggregate::{CombinedReport, SingleMetricReport},
    analysis::{Report, ReportContext, sort_by_total_desc},
    currency::{format_currency, format_percentage},
};

/// Renders every section of `report` as a table, separated by blank lines.
pub fn render_report_tables(report: &Report) -> String {
    let tables = match report {
        Report::SingleMetric { context, report } => single_metric_tables(context, report),
        Report::Combined { context, report } => combined_tables(context, report),
    };

    tables
        .iter()
        .map(|(heading, table)| format!("{heading}\n{table}"))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn heading(context: &ReportContext) -> String {
    format!(
        "{} ({}, {} to {})",
        context.view.title(),
        context.range.label(),
        context.window_start,
        context.now
    )
}

fn single_metric_tables(
    context: &ReportContext,
    report: &SingleMetricReport,
) -> Vec<(String, Table)> {
    let summary = pretty_table(
        &["Total", "Average per period", "Transactions"],
        vec![vec![
            format_currency(report.summary.total),
            format_currency(report.summary.average),
            report.summary.count.to_string(),
        ]],
    );

    let categories = pretty_table(
        &["Category", "Total", "Share"],
        sort_by_total_desc(&report.category_totals)
            .into_iter()
            .map(|category| {
                vec![
                    category.name,
                    format_currency(category.total),
                    format_percentage(category.percentage),
                ]
            })
            .collect(),
    );

    let days = pretty_table(
        &["Date", "Total"],
        report
            .day_points
            .iter()
            .map(|point| vec![point.date.to_string(), format_currency(point.total)])
            .collect(),
    );

    let periods = pretty_table(
        &["Period", "Total"],
        report
            .period_points
            .iter()
            .map(|point| vec![point.period.to_string(), format_currency(point.total)])
            .collect(),
    );

    vec![
        (heading(context), summary),
        ("By category".to_owned(), categories),
        ("By day".to_owned(), days),
        ("By period".to_owned(), periods),
    ]
}

fn combined_tables(context: &ReportContext, report: &CombinedReport) -> Vec<(String, Table)> {
    let balance_row = |label: String, income: f64, expense: f64, balance: f64| {
        vec![
            label,
            format_currency(income),
            format_currency(expense),
            format_currency(balance),
        ]
    };

    let summary = pretty_table(
        &["Income", "Expenses", "Balance", "Transactions"],
        vec![vec![
            format_currency(report.summary.total_income),
            format_currency(report.summary.total_expense),
            format_currency(report.summary.balance),
            report.summary.transaction_count.to_string(),
        ]],
    );

    let categories = pretty_table(
        &["Category", "Income", "Expenses", "Balance"],
        report
            .category_balances
            .iter()
            .map(|category| {
                balance_row(
                    category.name.clone(),
                    category.income,
                    category.expense,
                    category.balance,
                )
            })
            .collect(),
    );

    let days = pretty_table(
        &["Date", "Income", "Expenses", "Balance"],
        report
            .day_points
            .iter()
            .map(|point| {
                balance_row(
                    point.date.to_string(),
                    point.income,
                    point.expense,
                    point.balance,
                )
            })
            .collect(),
    );

    let periods = pretty_table(
        &["Period", "Income", "Expenses", "Balance"],
        report
            .period_points
            .iter()
            .map(|point| {
                balance_row(
                    point.period.to_string(),
                    point.income,
                    point.expense,
                    point.balance,
                )
            })
            .collect(),
    );

    let months = pretty_table(
        &["Month", "Income", "Expenses", "Balance"],
        report
            .monthly_points
            .iter()
            .map(|point| {
                balance_row(
                    point.month.to_string(),
                    point.income,
                    point.expense,
                    point.balance,
                )
            })
            .collect(),
    );

    vec![
        (heading(context), summary),
        ("By category".to_owned(), categories),
        ("By day".to_owned(), days),
        ("By period".to_owned(), periods),
        ("Last twelve months".to_owned(), months),
    ]
}

/// Builds a table whose first column is left aligned and the rest are right
/// aligned, since every other column holds a number.
fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(headers.iter().map(|header| Cell::new(*header)));

    for row in rows {
        table.add_row(row.into_iter().enumerate().map(|(column, text)| {
            let alignment = if column == 0 {
                CellAlignment::Left
            } else {
                CellAlignment::Right
            };
            Cell::new(text).set_alignment(alignment)
        }));
    }

    table
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::render_report_tables;
    use crate::{
        analysis::{AnalysisView, analyze},
        models::{Category, Transaction, TransactionKind},
        window::TimeRange,
    };

    fn create_test_transaction(
        id: &str,
        amount: f64,
        kind: TransactionKind,
        category_id: Option<&str>,
    ) -> Transaction {
        Transaction::build(amount, kind, date!(2024 - 06 - 01))
            .id(id)
            .category_id(category_id)
            .finalise()
            .unwrap()
    }

    fn snapshot() -> (Vec<Transaction>, Vec<Category>) {
        (
            vec![
                create_test_transaction("1", 1500.0, TransactionKind::Expense, Some("food")),
                create_test_transaction("2", 3000.0, TransactionKind::Expense, Some("rent")),
                create_test_transaction("3", 250_000.0, TransactionKind::Income, Some("salary")),
            ],
            vec![
                Category::new("food", "食費", "#EF4444"),
                Category::new("rent", "住居費", "#3B82F6"),
                Category::new("salary", "給与", "#10B981"),
            ],
        )
    }

    #[test]
    fn expense_tables_list_largest_category_first() {
        let (transactions, categories) = snapshot();
        let report = analyze(
            AnalysisView::Expense,
            &transactions,
            &categories,
            TimeRange::Month,
            date!(2024 - 06 - 10),
        )
        .unwrap();

        let text = render_report_tables(&report);

        assert!(text.contains("Expense analysis"));
        assert!(text.contains("¥4,500"));
        assert!(text.contains("66.7%"));
        let rent = text.find("住居費").unwrap();
        let food = text.find("食費").unwrap();
        assert!(rent < food, "largest category should be listed first");
        assert!(!text.contains("給与"));
    }

    #[test]
    fn overall_tables_include_monthly_series() {
        let (transactions, categories) = snapshot();
        let report = analyze(
            AnalysisView::Overall,
            &transactions,
            &categories,
            TimeRange::Month,
            date!(2024 - 06 - 10),
        )
        .unwrap();

        let text = render_report_tables(&report);

        assert!(text.contains("Last twelve months"));
        assert!(text.contains("2023-07"));
        assert!(text.contains("2024-06"));
        assert!(text.contains("¥245,500"));
    }
}
