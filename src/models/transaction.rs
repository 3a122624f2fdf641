//! Defines the transaction model and its validation rules.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, models::CategoryId};

/// Alias for the opaque identifier assigned to a transaction by the data store.
pub type TransactionId = String;

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money that was earned.
    Income,
    /// Money that was spent.
    Expense,
}

impl TransactionKind {
    /// The value used for this kind in CSV and JSON files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// The amount is always a magnitude, the direction is given by `kind`.
/// To create a new `Transaction` in code, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The amount of money spent or earned in this transaction.
    pub amount: f64,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The ID of the category the transaction belongs to.
    pub category_id: Option<CategoryId>,
    /// When the transaction happened.
    pub date: Date,
    /// A text description of what the transaction was for.
    pub description: Option<String>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(amount: f64, kind: TransactionKind, date: Date) -> TransactionBuilder {
        TransactionBuilder {
            id: String::new(),
            amount,
            kind,
            date,
            category_id: None,
            description: None,
        }
    }

    /// Checks that the amount is a finite, non-negative number.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] for `NaN` and infinite amounts and
    /// [Error::NegativeAmount] for amounts below zero.
    pub fn validate(&self) -> Result<(), Error> {
        validate_amount(&self.id, self.amount)
    }
}

/// A builder for creating [Transaction] instances.
///
/// # Examples
///
/// ```
/// use kakeibo::{Transaction, TransactionKind};
/// use time::macros::date;
///
/// let transaction = Transaction::build(1000.0, TransactionKind::Expense, date!(2024 - 06 - 01))
///     .id("t1")
///     .category_id(Some("food"))
///     .finalise()
///     .unwrap();
///
/// assert_eq!(transaction.category_id.as_deref(), Some("food"));
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    id: TransactionId,
    amount: f64,
    kind: TransactionKind,
    date: Date,
    category_id: Option<CategoryId>,
    description: Option<String>,
}

impl TransactionBuilder {
    /// Set the ID of the transaction.
    pub fn id(mut self, id: &str) -> Self {
        self.id = id.to_owned();
        self
    }

    /// Set the category of the transaction, `None` means uncategorized.
    pub fn category_id(mut self, category_id: Option<&str>) -> Self {
        self.category_id = category_id.map(str::to_owned);
        self
    }

    /// Set the free text description of the transaction.
    pub fn description(mut self, description: Option<&str>) -> Self {
        self.description = description.map(str::to_owned);
        self
    }

    /// Validate the amount and create the transaction.
    ///
    /// # Errors
    /// See [Transaction::validate].
    pub fn finalise(self) -> Result<Transaction, Error> {
        let transaction = Transaction {
            id: self.id,
            amount: self.amount,
            kind: self.kind,
            category_id: self.category_id,
            date: self.date,
            description: self.description,
        };

        transaction.validate()?;

        Ok(transaction)
    }
}

pub(crate) fn validate_amount(id: &str, amount: f64) -> Result<(), Error> {
    if !amount.is_finite() {
        return Err(Error::InvalidAmount(id.to_owned(), amount.to_string()));
    }

    if amount < 0.0 {
        return Err(Error::NegativeAmount(id.to_owned(), amount));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{Error, Transaction, TransactionKind};

    #[test]
    fn finalise_accepts_zero_amount() {
        let transaction = Transaction::build(0.0, TransactionKind::Income, date!(2024 - 06 - 01))
            .id("zero")
            .finalise();

        assert!(transaction.is_ok());
    }

    #[test]
    fn finalise_rejects_negative_amount() {
        let result = Transaction::build(-10.0, TransactionKind::Expense, date!(2024 - 06 - 01))
            .id("neg")
            .finalise();

        assert_eq!(result, Err(Error::NegativeAmount("neg".to_owned(), -10.0)));
    }

    #[test]
    fn finalise_rejects_nan_and_infinity() {
        let nan = Transaction::build(f64::NAN, TransactionKind::Expense, date!(2024 - 06 - 01))
            .id("nan")
            .finalise();
        let inf = Transaction::build(f64::INFINITY, TransactionKind::Income, date!(2024 - 06 - 01))
            .id("inf")
            .finalise();

        assert_eq!(
            nan,
            Err(Error::InvalidAmount("nan".to_owned(), "NaN".to_owned()))
        );
        assert_eq!(
            inf,
            Err(Error::InvalidAmount("inf".to_owned(), "inf".to_owned()))
        );
    }

    #[test]
    fn serializes_kind_as_type_field() {
        let transaction = Transaction::build(500.0, TransactionKind::Expense, date!(2024 - 06 - 02))
            .id("t2")
            .finalise()
            .unwrap();

        let json = serde_json::to_value(&transaction).unwrap();

        assert_eq!(json["type"], "expense");
        assert_eq!(json["date"], "2024-06-02");
    }
}
