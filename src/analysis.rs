//! The expense, income and overall analysis views.
//!
//! Each view is the same pipeline with a different type filter and output mode:
//! resolve the window, bucket the snapshot, aggregate the buckets.

use std::cmp::Ordering;

use serde::Serialize;
use time::Date;

use crate::{
    Error,
    aggregate::{
        Aggregate, CategoryTotal, CombinedReport, Mode, SingleMetricReport, aggregate,
    },
    bucket::{TypeFilter, bucket},
    models::{Category, Transaction},
    window::{TimeRange, resolve_window_start},
};

/// The analysis views offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisView {
    /// Expenses only, broken down by category, day and period.
    #[default]
    Expense,
    /// Income only, broken down by category, day and period.
    Income,
    /// Income and expenses together with their balance.
    Overall,
}

impl AnalysisView {
    /// The transaction types included in the view.
    pub fn type_filter(self) -> TypeFilter {
        match self {
            Self::Expense => TypeFilter::Expense,
            Self::Income => TypeFilter::Income,
            Self::Overall => TypeFilter::Any,
        }
    }

    /// The output shape of the view.
    pub fn mode(self) -> Mode {
        match self {
            Self::Expense | Self::Income => Mode::SingleMetric,
            Self::Overall => Mode::Combined,
        }
    }

    /// A human-readable title for the view.
    pub fn title(self) -> &'static str {
        match self {
            Self::Expense => "Expense analysis",
            Self::Income => "Income analysis",
            Self::Overall => "Overall analysis",
        }
    }
}

/// The parameters a report was computed with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReportContext {
    /// The view that produced the report.
    pub view: AnalysisView,
    /// The selected range.
    pub range: TimeRange,
    /// The inclusive lower bound of the window.
    pub window_start: Date,
    /// The date the window was counted back from.
    pub now: Date,
}

/// The result of running a view over a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum Report {
    /// The report of the expense or income view.
    SingleMetric {
        /// The parameters the report was computed with.
        #[serde(flatten)]
        context: ReportContext,
        /// The aggregated series.
        #[serde(flatten)]
        report: SingleMetricReport,
    },
    /// The report of the overall view.
    Combined {
        /// The parameters the report was computed with.
        #[serde(flatten)]
        context: ReportContext,
        /// The aggregated series.
        #[serde(flatten)]
        report: CombinedReport,
    },
}

impl Report {
    /// The parameters the report was computed with.
    pub fn context(&self) -> &ReportContext {
        match self {
            Self::SingleMetric { context, .. } | Self::Combined { context, .. } => context,
        }
    }
}

/// Runs `view` over a snapshot of transactions and categories.
///
/// The snapshot is validated first and the first transaction with an invalid
/// amount is reported. Past validation the computation cannot fail: missing
/// categories and empty windows produce empty or zero-filled series.
///
/// # Errors
/// Returns [Error::InvalidAmount] or [Error::NegativeAmount] if a transaction
/// amount is `NaN`, infinite or negative.
pub fn analyze(
    view: AnalysisView,
    transactions: &[Transaction],
    categories: &[Category],
    range: TimeRange,
    now: Date,
) -> Result<Report, Error> {
    validate_snapshot(transactions)?;

    let window_start = resolve_window_start(range, now);
    let context = ReportContext {
        view,
        range,
        window_start,
        now,
    };

    tracing::debug!(
        "running {} view over {} transactions from {window_start} to {now}",
        view.title(),
        transactions.len()
    );

    let buckets = bucket(
        transactions,
        categories,
        view.type_filter(),
        window_start,
        range,
    );

    let report = match aggregate(&buckets, view.mode(), now) {
        Aggregate::SingleMetric(report) => Report::SingleMetric { context, report },
        Aggregate::Combined(report) => Report::Combined { context, report },
    };

    Ok(report)
}

/// Checks every transaction amount in the snapshot.
///
/// # Errors
/// See [Transaction::validate].
pub fn validate_snapshot(transactions: &[Transaction]) -> Result<(), Error> {
    transactions
        .iter()
        .try_for_each(Transaction::validate)
        .inspect_err(|error| tracing::error!("rejected snapshot: {error}"))
}

/// Returns the category totals largest first, ties keep their original order.
pub fn sort_by_total_desc(category_totals: &[CategoryTotal]) -> Vec<CategoryTotal> {
    let mut sorted = category_totals.to_vec();
    sorted.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(Ordering::Equal));
    sorted
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::{AnalysisView, Report, analyze, sort_by_total_desc};
    use crate::{
        Error,
        aggregate::CategoryTotal,
        models::{Category, Transaction, TransactionKind},
        window::TimeRange,
    };

    fn scenario() -> (Vec<Transaction>, Vec<Category>) {
        let transactions = vec![
            Transaction::build(1000.0, TransactionKind::Expense, date!(2024 - 06 - 01))
                .id("1")
                .category_id(Some("food"))
                .finalise()
                .unwrap(),
            Transaction::build(500.0, TransactionKind::Expense, date!(2024 - 06 - 02))
                .id("2")
                .category_id(Some("food"))
                .finalise()
                .unwrap(),
            Transaction::build(2000.0, TransactionKind::Income, date!(2024 - 06 - 01))
                .id("3")
                .finalise()
                .unwrap(),
        ];
        let categories = vec![Category::new("food", "食費", "#EF4444")];

        (transactions, categories)
    }

    #[test]
    fn expense_view_matches_scenario() {
        let (transactions, categories) = scenario();

        let report = analyze(
            AnalysisView::Expense,
            &transactions,
            &categories,
            TimeRange::Month,
            date!(2024 - 06 - 15),
        )
        .unwrap();

        let Report::SingleMetric { context, report } = report else {
            panic!("expected a single-metric report");
        };
        assert_eq!(context.window_start, date!(2024 - 05 - 15));
        assert_eq!(report.category_totals.len(), 1);
        assert_eq!(report.category_totals[0].category_id, "food");
        assert_eq!(report.category_totals[0].name, "食費");
        assert_eq!(report.category_totals[0].color, "#EF4444");
        assert_eq!(report.category_totals[0].total, 1500.0);
        assert_eq!(report.category_totals[0].percentage, Some(100.0));
        let days: Vec<_> = report
            .day_points
            .iter()
            .map(|point| (point.date, point.total))
            .collect();
        assert_eq!(
            days,
            vec![(date!(2024 - 06 - 01), 1000.0), (date!(2024 - 06 - 02), 500.0)]
        );
        assert_eq!(report.summary.total, 1500.0);
        assert_eq!(report.summary.count, 2);
    }

    #[test]
    fn overall_view_matches_scenario() {
        let (transactions, categories) = scenario();

        let report = analyze(
            AnalysisView::Overall,
            &transactions,
            &categories,
            TimeRange::Month,
            date!(2024 - 06 - 15),
        )
        .unwrap();

        let Report::Combined { report, .. } = report else {
            panic!("expected a combined report");
        };
        assert_eq!(report.summary.total_income, 2000.0);
        assert_eq!(report.summary.total_expense, 1500.0);
        assert_eq!(report.summary.balance, 500.0);
        assert_eq!(report.summary.transaction_count, 3);
        assert_eq!(report.monthly_points.len(), 12);
    }

    #[test]
    fn income_view_ignores_expenses() {
        let (transactions, categories) = scenario();

        let report = analyze(
            AnalysisView::Income,
            &transactions,
            &categories,
            TimeRange::Week,
            date!(2024 - 06 - 05),
        )
        .unwrap();

        let Report::SingleMetric { report, .. } = report else {
            panic!("expected a single-metric report");
        };
        // The income transaction has no category.
        assert!(report.category_totals.is_empty());
        assert_eq!(report.summary.total, 2000.0);
        assert_eq!(report.period_points.len(), 1);
        assert_eq!(report.period_points[0].period.to_string(), "2024-05-26");
    }

    #[test]
    fn rerunning_produces_identical_json() {
        let (transactions, categories) = scenario();
        let run = || {
            let report = analyze(
                AnalysisView::Overall,
                &transactions,
                &categories,
                TimeRange::Year,
                date!(2024 - 06 - 15),
            )
            .unwrap();
            serde_json::to_string(&report).unwrap()
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn report_json_is_tagged_with_mode() {
        let (transactions, categories) = scenario();

        let report = analyze(
            AnalysisView::Expense,
            &transactions,
            &categories,
            TimeRange::Month,
            date!(2024 - 06 - 15),
        )
        .unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["mode"], "single-metric");
        assert_eq!(json["view"], "expense");
        assert_eq!(json["range"], "month");
        assert_eq!(json["window_start"], "2024-05-15");
        assert_eq!(json["period_points"][0]["period"], "2024-06");
        assert_eq!(json["summary"]["total"], 1500.0);
    }

    #[test]
    fn invalid_amount_fails_fast() {
        let (mut transactions, categories) = scenario();
        transactions[1].amount = f64::NAN;

        let result = analyze(
            AnalysisView::Overall,
            &transactions,
            &categories,
            TimeRange::Month,
            date!(2024 - 06 - 15),
        );

        assert_eq!(
            result,
            Err(Error::InvalidAmount("2".to_owned(), "NaN".to_owned()))
        );
    }

    #[test]
    fn sort_by_total_desc_puts_largest_first() {
        let total = |id: &str, total: f64| CategoryTotal {
            category_id: id.to_owned(),
            name: id.to_owned(),
            color: String::new(),
            total,
            percentage: None,
        };
        let totals = vec![total("a", 10.0), total("b", 30.0), total("c", 20.0)];

        let sorted = sort_by_total_desc(&totals);

        let ids: Vec<&str> = sorted.iter().map(|t| t.category_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
        assert_eq!(totals[0].category_id, "a");
    }
}
