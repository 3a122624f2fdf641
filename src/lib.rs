//! Kakeibo turns a snapshot of household transactions into the figures behind
//! an expense, income or overall analysis screen.
//!
//! The pipeline has three stages:
//! 1. [window] picks the inclusive lower date bound for the selected
//!    [TimeRange], counted back from "now".
//! 2. [bucket] filters the snapshot by type and window and groups it by
//!    category, day, week or month.
//! 3. [aggregate] reduces the buckets to totals, shares and balances, including
//!    a zero-filled series for the last twelve months.
//!
//! [analyze] runs the whole pipeline for one [AnalysisView]. The surrounding
//! modules load snapshots from CSV or JSON files ([import]) and render reports
//! as JSON, terminal tables ([table]) or an HTML page with charts ([html]).
//!
//! ```
//! use kakeibo::{AnalysisView, Category, Report, TimeRange, Transaction, TransactionKind, analyze};
//! use time::macros::date;
//!
//! let transactions = vec![
//!     Transaction::build(1000.0, TransactionKind::Expense, date!(2024 - 06 - 01))
//!         .id("1")
//!         .category_id(Some("food"))
//!         .finalise()
//!         .unwrap(),
//! ];
//! let categories = vec![Category::new("food", "食費", "#EF4444")];
//!
//! let report = analyze(
//!     AnalysisView::Expense,
//!     &transactions,
//!     &categories,
//!     TimeRange::Month,
//!     date!(2024 - 06 - 15),
//! )
//! .unwrap();
//!
//! let Report::SingleMetric { report, .. } = report else { unreachable!() };
//! assert_eq!(report.summary.total, 1000.0);
//! ```

#![warn(missing_docs)]

pub mod aggregate;
pub mod analysis;
pub mod bucket;
pub mod charts;
pub mod config;
pub mod currency;
mod error;
pub mod html;
pub mod import;
pub mod logging;
pub mod models;
pub mod table;
pub mod timezone;
pub mod window;

pub use aggregate::{
    Aggregate, CategoryBalance, CategoryTotal, CombinedReport, CombinedSummary, DayBalance,
    DayPoint, MonthBalance, Mode, PeriodBalance, PeriodPoint, SingleMetricReport,
    SingleMetricSummary, aggregate,
};
pub use analysis::{AnalysisView, Report, ReportContext, analyze, sort_by_total_desc};
pub use bucket::{Buckets, PeriodKey, TypeFilter, bucket};
pub use error::Error;
pub use models::{
    Category, CategoryId, Transaction, TransactionBuilder, TransactionId, TransactionKind,
    default_categories,
};
pub use window::{MonthKey, TimeRange, resolve_window_start, trailing_months};
