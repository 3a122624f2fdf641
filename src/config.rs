//! Command line configuration for the `kakeibo` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    analysis::{AnalysisView, Report},
    html::render_report_html,
    models::TransactionKind,
    table::render_report_tables,
    window::TimeRange,
};

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The timezone used when none is given on the command line or in the environment.
pub const DEFAULT_TIMEZONE: &str = "Asia/Tokyo";

/// Expense, income and balance analysis of household finances.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log every pipeline stage at the debug level, unless RUST_LOG is set.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// The subcommands of the `kakeibo` binary.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run an analysis view over a snapshot of transactions.
    Analyze(AnalyzeArgs),
    /// Print the default categories for a transaction type as CSV.
    Defaults {
        /// The transaction type to print the categories of.
        #[arg(value_enum)]
        kind: TransactionKind,
    },
}

/// Arguments of the `analyze` subcommand.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// File path to the transactions, either `.csv` or `.json`.
    #[arg(short, long)]
    pub transactions: PathBuf,

    /// File path to the categories, either `.csv` or `.json`.
    ///
    /// The default expense and income categories are used if omitted.
    #[arg(short, long)]
    pub categories: Option<PathBuf>,

    /// The analysis view to run.
    #[arg(long, value_enum, default_value_t)]
    pub view: AnalysisView,

    /// How far back from today to look.
    #[arg(short, long, value_enum, default_value_t)]
    pub range: TimeRange,

    /// The format to write the report in.
    #[arg(short, long, value_enum, default_value_t)]
    pub format: OutputFormat,

    /// Count the window back from this date (YYYY-MM-DD) instead of today.
    #[arg(long, value_parser = parse_date_arg)]
    pub now: Option<Date>,

    /// The canonical timezone name used to determine today's date,
    /// e.g. "Pacific/Auckland".
    #[arg(long, env = "KAKEIBO_TIMEZONE", default_value = DEFAULT_TIMEZONE)]
    pub timezone: String,

    /// Write the report to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

fn parse_date_arg(text: &str) -> Result<Date, String> {
    Date::parse(text, &DATE_FORMAT).map_err(|error| format!("expected YYYY-MM-DD: {error}"))
}

/// The formats a report can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON.
    #[default]
    Json,
    /// Terminal tables.
    Table,
    /// A standalone HTML page with charts.
    Html,
}

impl OutputFormat {
    /// Renders `report` in this format.
    ///
    /// # Errors
    /// Returns [Error::JSONSerializationError] if the report cannot be
    /// serialized to JSON.
    pub fn render(self, report: &Report) -> Result<String, Error> {
        match self {
            Self::Json => serde_json::to_string_pretty(report)
                .map_err(|error| Error::JSONSerializationError(error.to_string())),
            Self::Table => Ok(render_report_tables(report)),
            Self::Html => Ok(render_report_html(report)),
        }
    }
}
