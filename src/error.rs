//! Error types for CSV parsing, writing and row binding

use thiserror::Error;

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, CsvError>;

/// Errors produced by the parser, the stream driver and the binding layer
///
/// A parse session surfaces at most one terminal error; after a fatal
/// variant (`UnterminatedQualifier`, `MalformedSeparatorDirective`) the
/// session must be discarded.
#[derive(Error, Debug)]
pub enum CsvError {
    /// Input ended while inside a quoted field with no closing qualifier.
    /// Carries the text recovered up to end-of-input for diagnostics; the
    /// row it belonged to is not valid.
    #[error("unterminated quoted field at end of input (partial: {partial:?})")]
    UnterminatedQualifier {
        /// Field content accumulated before the input ran out
        partial: String,
    },

    /// A `sep=` directive line declared more than one character
    #[error("malformed separator directive {0:?}: separator must be a single character")]
    MalformedSeparatorDirective(String),

    /// Dialect settings violate an invariant (e.g. delimiter == qualifier)
    #[error("invalid dialect: {0}")]
    InvalidDialect(String),

    /// A row's field count differs from the header-determined column count
    #[error("row {row} has {actual} fields, expected {expected}")]
    DimensionMismatch {
        /// Index of the offending row
        row: u64,
        /// Column count determined by the headers
        expected: usize,
        /// Field count actually present
        actual: usize,
    },

    /// A column name was requested that no header matches
    #[error("unknown column {0:?}")]
    UnresolvedColumn(String),

    /// A field's text could not be converted to the target member type
    #[error("cannot convert {value:?} in column {column:?}: {message}")]
    UnconvertibleValue {
        /// Header name of the field
        column: String,
        /// Raw field text (or the null token)
        value: String,
        /// Underlying conversion failure
        message: String,
    },

    /// Underlying I/O failure while reading or writing
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all raised by the serde binding layer
    #[cfg(feature = "serde")]
    #[error("binding error: {0}")]
    Bind(String),
}
