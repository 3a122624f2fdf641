//! Defines the crate level error type.

/// The errors that may occur when loading, validating or reporting on a snapshot.
///
/// The aggregation pipeline itself cannot fail once its input has been
/// validated, so every variant here describes either malformed input or a
/// problem in one of the outer layers (files, configuration, serialization).
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The amount of a transaction could not be parsed as a finite number.
    ///
    /// Callers should pass in the transaction ID and the offending value.
    #[error("transaction \"{0}\" has an invalid amount \"{1}\"")]
    InvalidAmount(String, String),

    /// The amount of a transaction was negative.
    ///
    /// The direction of a transaction is carried by its type, so amounts must
    /// always be zero or greater.
    #[error("transaction \"{0}\" has a negative amount {1}, use the transaction type instead")]
    NegativeAmount(String, f64),

    /// The type of a transaction was neither "income" nor "expense".
    #[error("transaction \"{0}\" has an invalid type \"{1}\", expected \"income\" or \"expense\"")]
    InvalidTransactionType(String, String),

    /// The date of a transaction was neither a `YYYY-MM-DD` date nor an RFC 3339 timestamp.
    #[error("transaction \"{0}\" has an invalid date \"{1}\"")]
    InvalidDate(String, String),

    /// The CSV had issues that prevented it from being parsed.
    #[error("could not parse the CSV file: {0}")]
    InvalidCSV(String),

    /// The JSON had issues that prevented it from being parsed.
    #[error("could not parse the JSON file: {0}")]
    InvalidJSON(String),

    /// The input file extension is not one of the supported formats.
    #[error("unsupported file type for {0}, expected a .csv or .json file")]
    UnsupportedFileType(String),

    /// An input file could not be read, or an output file could not be written.
    #[error("could not access \"{0}\": {1}")]
    ReadError(String, String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An error occurred while serializing a report as JSON.
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Error::InvalidCSV(value.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::InvalidJSON(value.to_string())
    }
}
