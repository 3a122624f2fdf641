//! This module defines the domain data types.

pub use category::{Category, CategoryId, default_categories};
pub use transaction::{Transaction, TransactionBuilder, TransactionId, TransactionKind};

pub(crate) use transaction::validate_amount;

mod category;
mod transaction;
