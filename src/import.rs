//! Loads and validates transactions and categories from CSV and JSON files.
//!
//! This is the only place where raw, untrusted records are turned into
//! [Transaction]s, so every malformed amount, type or date is rejected here
//! with an error naming the offending record.
//!
//! Transactions use the columns `id,amount,type,category_id,date,description`
//! and categories use `id,name,color`. JSON files hold an array of objects with
//! the same field names.

use std::{fmt, fs, io, path::Path};

use serde::{
    Deserialize, Deserializer,
    de::{
        IntoDeserializer, Visitor,
        value::{Error as ValueError, StrDeserializer},
    },
};
use time::{
    Date, OffsetDateTime,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};
use time_tz::Tz;

use crate::{
    Error,
    models::{Category, Transaction, TransactionKind, validate_amount},
    timezone::local_date,
};

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The file formats that snapshots can be loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Comma separated values with a header row.
    Csv,
    /// A JSON array of objects.
    Json,
}

impl FileFormat {
    /// Picks the format from the file extension of `path`.
    ///
    /// # Errors
    /// Returns [Error::UnsupportedFileType] for anything but `.csv` and `.json`.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        match path
            .extension()
            .and_then(|extension| extension.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("csv") => Ok(Self::Csv),
            Some("json") => Ok(Self::Json),
            _ => Err(Error::UnsupportedFileType(path.display().to_string())),
        }
    }
}

/// A transaction as written in an input file, before validation.
#[derive(Debug, Deserialize)]
struct TransactionRecord {
    id: String,
    #[serde(deserialize_with = "amount_as_text")]
    amount: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    category_id: Option<String>,
    date: String,
    #[serde(default)]
    description: Option<String>,
}

impl TransactionRecord {
    fn into_transaction(self, timezone: &Tz) -> Result<Transaction, Error> {
        let amount: f64 = self
            .amount
            .trim()
            .parse()
            .map_err(|_| Error::InvalidAmount(self.id.clone(), self.amount.clone()))?;
        validate_amount(&self.id, amount)?;

        let kind = parse_kind(&self.id, &self.kind)?;

        let date = parse_date(&self.id, &self.date, timezone)?;

        Ok(Transaction {
            id: self.id,
            amount,
            kind,
            category_id: non_empty(self.category_id),
            date,
            description: non_empty(self.description),
        })
    }
}

/// Accepts amounts written either as JSON numbers or as text.
fn amount_as_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    struct AmountVisitor;

    impl Visitor<'_> for AmountVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a number or a string containing a number")
        }

        fn visit_str<E: serde::de::Error>(self, value: &str) -> Result<String, E> {
            Ok(value.to_owned())
        }

        fn visit_f64<E: serde::de::Error>(self, value: f64) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_i64<E: serde::de::Error>(self, value: i64) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_u64<E: serde::de::Error>(self, value: u64) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_unit<E: serde::de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_none<E: serde::de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }
    }

    deserializer.deserialize_any(AmountVisitor)
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|text| !text.trim().is_empty())
}

/// Parses the transaction type with the same names used when serializing it.
fn parse_kind(id: &str, text: &str) -> Result<TransactionKind, Error> {
    let deserializer: StrDeserializer<ValueError> = text.trim().into_deserializer();

    TransactionKind::deserialize(deserializer)
        .map_err(|_| Error::InvalidTransactionType(id.to_owned(), text.to_owned()))
}

/// Parses a `YYYY-MM-DD` date or an RFC 3339 timestamp.
///
/// Timestamps are converted to `timezone` with the offset in effect at that
/// instant before the time of day is dropped, so the calendar day is the one
/// the user saw.
fn parse_date(id: &str, text: &str, timezone: &Tz) -> Result<Date, Error> {
    let text = text.trim();

    if let Ok(date) = Date::parse(text, &DATE_FORMAT) {
        return Ok(date);
    }

    OffsetDateTime::parse(text, &Rfc3339)
        .map(|date_time| local_date(date_time, timezone))
        .map_err(|_| Error::InvalidDate(id.to_owned(), text.to_owned()))
}

/// Parses transactions from CSV text with a header row.
///
/// # Errors
/// Returns [Error::InvalidCSV] if the CSV is malformed, otherwise the
/// validation error of the first invalid record.
pub fn parse_transactions_csv(
    text: &str,
    timezone: &Tz,
) -> Result<Vec<Transaction>, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    reader
        .deserialize::<TransactionRecord>()
        .map(|record| record?.into_transaction(timezone))
        .collect()
}

/// Parses transactions from a JSON array.
///
/// # Errors
/// Returns [Error::InvalidJSON] if the JSON is malformed, otherwise the
/// validation error of the first invalid record.
pub fn parse_transactions_json(
    text: &str,
    timezone: &Tz,
) -> Result<Vec<Transaction>, Error> {
    let records: Vec<TransactionRecord> = serde_json::from_str(text)?;

    records
        .into_iter()
        .map(|record| record.into_transaction(timezone))
        .collect()
}

/// Parses categories from CSV text with a header row.
///
/// # Errors
/// Returns [Error::InvalidCSV] if the CSV is malformed.
pub fn parse_categories_csv(text: &str) -> Result<Vec<Category>, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    reader
        .deserialize::<Category>()
        .map(|record| record.map_err(Error::from))
        .collect()
}

/// Parses categories from a JSON array.
///
/// # Errors
/// Returns [Error::InvalidJSON] if the JSON is malformed.
pub fn parse_categories_json(text: &str) -> Result<Vec<Category>, Error> {
    Ok(serde_json::from_str(text)?)
}

/// Reads transactions from a `.csv` or `.json` file.
///
/// # Errors
/// Returns [Error::ReadError] if the file cannot be read, otherwise see
/// [parse_transactions_csv] and [parse_transactions_json].
pub fn load_transactions(path: &Path, timezone: &Tz) -> Result<Vec<Transaction>, Error> {
    let format = FileFormat::from_path(path)?;
    let text = read_file(path)?;

    let transactions = match format {
        FileFormat::Csv => parse_transactions_csv(&text, timezone),
        FileFormat::Json => parse_transactions_json(&text, timezone),
    }
    .inspect_err(|error| tracing::error!("could not load {}: {error}", path.display()))?;

    tracing::info!(
        "loaded {} transactions from {}",
        transactions.len(),
        path.display()
    );

    Ok(transactions)
}

/// Reads categories from a `.csv` or `.json` file.
///
/// # Errors
/// Returns [Error::ReadError] if the file cannot be read, otherwise see
/// [parse_categories_csv] and [parse_categories_json].
pub fn load_categories(path: &Path) -> Result<Vec<Category>, Error> {
    let format = FileFormat::from_path(path)?;
    let text = read_file(path)?;

    let categories = match format {
        FileFormat::Csv => parse_categories_csv(&text),
        FileFormat::Json => parse_categories_json(&text),
    }
    .inspect_err(|error| tracing::error!("could not load {}: {error}", path.display()))?;

    tracing::info!(
        "loaded {} categories from {}",
        categories.len(),
        path.display()
    );

    Ok(categories)
}

/// Writes categories as CSV with a header row.
///
/// # Errors
/// Returns [Error::InvalidCSV] if a record cannot be written.
pub fn write_categories_csv<W: io::Write>(categories: &[Category], writer: W) -> Result<(), Error> {
    let mut writer = csv::Writer::from_writer(writer);

    for category in categories {
        writer.serialize(category)?;
    }

    writer
        .flush()
        .map_err(|error| Error::InvalidCSV(error.to_string()))
}

fn read_file(path: &Path) -> Result<String, Error> {
    fs::read_to_string(path)
        .map_err(|error| Error::ReadError(path.display().to_string(), error.to_string()))
}
