//! Reduces buckets to the chart series and summaries of the analysis views.
//!
//! Two output shapes are produced:
//! - single-metric reports for the expense and income views, where every
//!   series holds one total per bucket, and
//! - combined reports for the overall view, where every series holds income,
//!   expense and their balance per bucket.
//!
//! Day and period series are sparse: buckets without transactions are omitted.
//! The combined report also carries a trailing twelve month series which always
//! holds all twelve months, zero-filled where there was no data.

use serde::Serialize;
use time::Date;

use crate::{
    bucket::{Buckets, PeriodKey, Tally},
    models::CategoryId,
    window::{MonthKey, trailing_months},
};

/// The number of months in the combined month-over-month series.
pub const TRAILING_MONTH_COUNT: u32 = 12;

/// Which output shape to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// One total per bucket.
    SingleMetric,
    /// Income, expense and balance per bucket.
    Combined,
}

/// The total of one category in a single-metric report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    /// The ID of the category.
    pub category_id: CategoryId,
    /// The display name of the category.
    pub name: String,
    /// The display colour of the category, passed through untouched.
    pub color: String,
    /// The sum of the category's transactions.
    pub total: f64,
    /// The category's share of all category totals in percent.
    ///
    /// `None` when the category totals sum to zero.
    pub percentage: Option<f64>,
}

/// The total of one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayPoint {
    /// The calendar day.
    pub date: Date,
    /// The sum of the day's transactions.
    pub total: f64,
}

/// The total of one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodPoint {
    /// The week start or month of the period.
    pub period: PeriodKey,
    /// The sum of the period's transactions.
    pub total: f64,
}

/// Totals over the whole window of a single-metric report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SingleMetricSummary {
    /// The sum of every matching transaction, categorized or not.
    pub total: f64,
    /// The total divided by the number of periods with data, zero without data.
    pub average: f64,
    /// The number of matching transactions.
    pub count: usize,
}

/// The aggregated series of the expense or income view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SingleMetricReport {
    /// Per-category totals in order of first appearance.
    pub category_totals: Vec<CategoryTotal>,
    /// Per-day totals in ascending date order.
    pub day_points: Vec<DayPoint>,
    /// Per-period totals in ascending period order.
    pub period_points: Vec<PeriodPoint>,
    /// Totals over the whole window.
    pub summary: SingleMetricSummary,
}

/// Income and expense of one category in a combined report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBalance {
    /// The ID of the category.
    pub category_id: CategoryId,
    /// The display name of the category.
    pub name: String,
    /// The display colour of the category, passed through untouched.
    pub color: String,
    /// The sum of the category's income.
    pub income: f64,
    /// The sum of the category's expenses.
    pub expense: f64,
    /// Income minus expense.
    pub balance: f64,
}

/// Income and expense of one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayBalance {
    /// The calendar day.
    pub date: Date,
    /// The sum of the day's income.
    pub income: f64,
    /// The sum of the day's expenses.
    pub expense: f64,
    /// Income minus expense.
    pub balance: f64,
}

/// Income and expense of one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodBalance {
    /// The week start or month of the period.
    pub period: PeriodKey,
    /// The sum of the period's income.
    pub income: f64,
    /// The sum of the period's expenses.
    pub expense: f64,
    /// Income minus expense.
    pub balance: f64,
}

/// Income and expense of one month of the trailing twelve month series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthBalance {
    /// The calendar month.
    pub month: MonthKey,
    /// The sum of the month's income.
    pub income: f64,
    /// The sum of the month's expenses.
    pub expense: f64,
    /// Income minus expense.
    pub balance: f64,
}

/// Totals over the whole window of a combined report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedSummary {
    /// The sum of all income.
    pub total_income: f64,
    /// The sum of all expenses.
    pub total_expense: f64,
    /// Total income minus total expense.
    pub balance: f64,
    /// The number of transactions in the window.
    pub transaction_count: usize,
}

/// The aggregated series of the overall view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedReport {
    /// Per-category income and expense in order of first appearance.
    pub category_balances: Vec<CategoryBalance>,
    /// Per-day income and expense in ascending date order.
    pub day_points: Vec<DayBalance>,
    /// Per-period income and expense in ascending period order.
    pub period_points: Vec<PeriodBalance>,
    /// Exactly [TRAILING_MONTH_COUNT] months ending with the current month, oldest first.
    pub monthly_points: Vec<MonthBalance>,
    /// Totals over the whole window.
    pub summary: CombinedSummary,
}

/// The output of [aggregate] for either mode.
#[derive(Debug, Clone, PartialEq)]
pub enum Aggregate {
    /// Output of [Mode::SingleMetric].
    SingleMetric(SingleMetricReport),
    /// Output of [Mode::Combined].
    Combined(CombinedReport),
}

/// Reduces `buckets` to the series for `mode`.
///
/// `now` anchors the trailing twelve month series of the combined mode.
pub fn aggregate(buckets: &Buckets<'_>, mode: Mode, now: Date) -> Aggregate {
    match mode {
        Mode::SingleMetric => Aggregate::SingleMetric(aggregate_single_metric(buckets)),
        Mode::Combined => Aggregate::Combined(aggregate_combined(buckets, now)),
    }
}

/// Reduces `buckets` to one total per bucket.
pub fn aggregate_single_metric(buckets: &Buckets<'_>) -> SingleMetricReport {
    let category_sum: f64 = buckets
        .by_category
        .iter()
        .map(|bucket| bucket.tally.total())
        .sum();

    let category_totals = buckets
        .by_category
        .iter()
        .map(|bucket| {
            let total = bucket.tally.total();
            CategoryTotal {
                category_id: bucket.category.id.clone(),
                name: bucket.category.name.clone(),
                color: bucket.category.color.clone(),
                total,
                percentage: percent_of(total, category_sum),
            }
        })
        .collect();

    let day_points = buckets
        .by_day
        .iter()
        .map(|bucket| DayPoint {
            date: bucket.date,
            total: bucket.tally.total(),
        })
        .collect();

    let period_points: Vec<PeriodPoint> = buckets
        .by_period
        .iter()
        .map(|bucket| PeriodPoint {
            period: bucket.key,
            total: bucket.tally.total(),
        })
        .collect();

    let total = buckets.totals.total();
    let average = if period_points.is_empty() {
        0.0
    } else {
        total / period_points.len() as f64
    };

    SingleMetricReport {
        category_totals,
        day_points,
        period_points,
        summary: SingleMetricSummary {
            total,
            average,
            count: buckets.totals.count,
        },
    }
}

/// Reduces `buckets` to income, expense and balance per bucket.
///
/// The month buckets are overlaid on the [TRAILING_MONTH_COUNT] months ending
/// with the month of `now`; month buckets outside that span are ignored.
pub fn aggregate_combined(buckets: &Buckets<'_>, now: Date) -> CombinedReport {
    let category_balances = buckets
        .by_category
        .iter()
        .map(|bucket| CategoryBalance {
            category_id: bucket.category.id.clone(),
            name: bucket.category.name.clone(),
            color: bucket.category.color.clone(),
            income: bucket.tally.income,
            expense: bucket.tally.expense,
            balance: bucket.tally.balance(),
        })
        .collect();

    let day_points = buckets
        .by_day
        .iter()
        .map(|bucket| DayBalance {
            date: bucket.date,
            income: bucket.tally.income,
            expense: bucket.tally.expense,
            balance: bucket.tally.balance(),
        })
        .collect();

    let period_points = buckets
        .by_period
        .iter()
        .map(|bucket| PeriodBalance {
            period: bucket.key,
            income: bucket.tally.income,
            expense: bucket.tally.expense,
            balance: bucket.tally.balance(),
        })
        .collect();

    let monthly_points = trailing_months(now, TRAILING_MONTH_COUNT)
        .into_iter()
        .map(|month| {
            let tally = buckets
                .by_month
                .binary_search_by_key(&month, |bucket| bucket.month)
                .map(|position| buckets.by_month[position].tally)
                .unwrap_or_default();

            month_balance(month, tally)
        })
        .collect();

    CombinedReport {
        category_balances,
        day_points,
        period_points,
        monthly_points,
        summary: CombinedSummary {
            total_income: buckets.totals.income,
            total_expense: buckets.totals.expense,
            balance: buckets.totals.balance(),
            transaction_count: buckets.totals.count,
        },
    }
}

fn month_balance(month: MonthKey, tally: Tally) -> MonthBalance {
    MonthBalance {
        month,
        income: tally.income,
        expense: tally.expense,
        balance: tally.balance(),
    }
}

fn percent_of(value: f64, total: f64) -> Option<f64> {
    if total == 0.0 {
        None
    } else {
        Some(value / total * 100.0)
    }
}
