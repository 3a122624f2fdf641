use std::{error::Error, fs, io};

use clap::Parser;

use kakeibo::{
    Category, Report, TransactionKind, analyze,
    config::{AnalyzeArgs, Cli, Command},
    default_categories,
    import::{load_categories, load_transactions, write_categories_csv},
    logging::setup_logging,
    timezone::{resolve_timezone, today},
};

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let result = match cli.command {
        Command::Analyze(args) => run_analysis(&args),
        Command::Defaults { kind } => print_defaults(kind),
    };

    result.inspect_err(|error| tracing::error!("{error}"))
}

fn run_analysis(args: &AnalyzeArgs) -> Result<(), Box<dyn Error>> {
    let timezone = resolve_timezone(&args.timezone)?;
    let now = args.now.unwrap_or_else(|| today(timezone));

    let transactions = load_transactions(&args.transactions, timezone)?;
    let categories = match &args.categories {
        Some(path) => load_categories(path)?,
        None => all_default_categories(),
    };

    let report: Report = analyze(args.view, &transactions, &categories, args.range, now)?;
    let rendered = args.format.render(&report)?;

    match &args.output {
        Some(path) => {
            fs::write(path, rendered).map_err(|error| {
                kakeibo::Error::ReadError(path.display().to_string(), error.to_string())
            })?;
            tracing::info!("wrote {} report to {}", args.view.title(), path.display());
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

fn all_default_categories() -> Vec<Category> {
    let mut categories = default_categories(TransactionKind::Expense);
    categories.extend(default_categories(TransactionKind::Income));
    categories
}

fn print_defaults(kind: TransactionKind) -> Result<(), Box<dyn Error>> {
    write_categories_csv(&default_categories(kind), io::stdout().lock())?;

    Ok(())
}
