//! Dialect settings describing a CSV format variant
//!
//! A [`Dialect`] is an immutable description of how fields and rows are
//! delimited, qualified and terminated. It is consumed read-only by both the
//! parser and the encoder, so one preset can be shared across any number of
//! sessions. The only mutation path is [`Dialect::with_delimiter`], which
//! returns a modified copy and leaves the original untouched (used by
//! separator-override handling).

use crate::error::{CsvError, Result};
use crate::value::FieldKind;
use indexmap::IndexSet;

/// Immutable CSV dialect settings
///
/// Construct via [`Dialect::csv`] or [`Dialect::tsv`] and adjust with the
/// builder methods.
///
/// # Examples
///
/// ```
/// use csvstream::Dialect;
///
/// let dialect = Dialect::csv()
///     .delimiter(';')
///     .has_header(true)
///     .allow_null("NULL");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Dialect {
    pub(crate) delimiter: char,
    pub(crate) qualifier: char,
    pub(crate) line_separator: String,
    pub(crate) force_qualify: bool,
    pub(crate) force_qualify_kinds: Vec<FieldKind>,
    pub(crate) allow_null: bool,
    pub(crate) null_token: String,
    pub(crate) has_header: bool,
    pub(crate) assumed_headers: Vec<String>,
    pub(crate) allow_separator_override: bool,
    pub(crate) ignore_dimension_errors: bool,
    pub(crate) case_sensitive_headers: bool,
    pub(crate) excluded_columns: IndexSet<String>,
}

impl Dialect {
    /// Standard comma-separated preset
    ///
    /// Comma delimiter, double-quote qualifier, `\n` line separator, no
    /// header row, `sep=` override directives accepted.
    pub fn csv() -> Self {
        Dialect {
            delimiter: ',',
            qualifier: '"',
            line_separator: "\n".to_string(),
            force_qualify: false,
            force_qualify_kinds: Vec::new(),
            allow_null: false,
            null_token: "NULL".to_string(),
            has_header: false,
            assumed_headers: Vec::new(),
            allow_separator_override: true,
            ignore_dimension_errors: false,
            case_sensitive_headers: true,
            excluded_columns: IndexSet::new(),
        }
    }

    /// Tab-separated preset
    pub fn tsv() -> Self {
        Dialect {
            delimiter: '\t',
            ..Dialect::csv()
        }
    }

    /// Set the field delimiter (builder pattern)
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the qualifier (quote) character (builder pattern)
    pub fn qualifier(mut self, qualifier: char) -> Self {
        self.qualifier = qualifier;
        self
    }

    /// Set the line separator sequence (builder pattern)
    ///
    /// May be more than one character, e.g. `"\r\n"`. The parser matches the
    /// exact sequence; it does not normalize line endings.
    pub fn line_separator<S: Into<String>>(mut self, separator: S) -> Self {
        self.line_separator = separator.into();
        self
    }

    /// Wrap every serialized field in qualifiers (builder pattern)
    pub fn force_qualify(mut self, force: bool) -> Self {
        self.force_qualify = force;
        self
    }

    /// Always qualify serialized fields of the given kinds (builder pattern)
    pub fn force_qualify_kinds(mut self, kinds: Vec<FieldKind>) -> Self {
        self.force_qualify_kinds = kinds;
        self
    }

    /// Enable null handling with the given null token (builder pattern)
    ///
    /// When enabled, a parsed field whose text exactly equals the token is
    /// reported as null, and serialized nulls render as the token.
    pub fn allow_null<S: Into<String>>(mut self, token: S) -> Self {
        self.allow_null = true;
        self.null_token = token.into();
        self
    }

    /// Indicate that the first row contains headers (builder pattern)
    pub fn has_header(mut self, has: bool) -> Self {
        self.has_header = has;
        self
    }

    /// Set headers to assume when no header row is present (builder pattern)
    pub fn assumed_headers(mut self, headers: Vec<String>) -> Self {
        self.assumed_headers = headers;
        self
    }

    /// Accept or reject a leading `sep=X` directive line (builder pattern)
    pub fn allow_separator_override(mut self, allow: bool) -> Self {
        self.allow_separator_override = allow;
        self
    }

    /// Pad or truncate rows instead of erroring on column-count mismatches
    /// (builder pattern)
    pub fn ignore_dimension_errors(mut self, ignore: bool) -> Self {
        self.ignore_dimension_errors = ignore;
        self
    }

    /// Control case sensitivity of header-name matching (builder pattern)
    pub fn case_sensitive_headers(mut self, sensitive: bool) -> Self {
        self.case_sensitive_headers = sensitive;
        self
    }

    /// Exclude a column by name from tables and bound objects
    /// (builder pattern)
    pub fn exclude_column<S: Into<String>>(mut self, name: S) -> Self {
        self.excluded_columns.insert(name.into());
        self
    }

    /// Copy these settings with a different delimiter
    ///
    /// This is the copy-on-write path used when a `sep=X` directive overrides
    /// the delimiter for one session; the receiver is not modified.
    pub fn with_delimiter(&self, delimiter: char) -> Dialect {
        let mut copy = self.clone();
        copy.delimiter = delimiter;
        copy
    }

    /// Characters that force a serialized field to be qualifier-wrapped
    ///
    /// The delimiter, the qualifier, every character of the line separator,
    /// and unconditionally `\n` and `\r`.
    pub fn risky_chars(&self) -> Vec<char> {
        let mut risky = vec![self.delimiter, self.qualifier];
        for c in self.line_separator.chars() {
            if !risky.contains(&c) {
                risky.push(c);
            }
        }
        for c in ['\n', '\r'] {
            if !risky.contains(&c) {
                risky.push(c);
            }
        }
        risky
    }

    /// Check the dialect invariants
    ///
    /// Called by parser, reader and writer constructors.
    pub fn validate(&self) -> Result<()> {
        if self.delimiter == self.qualifier {
            return Err(CsvError::InvalidDialect(format!(
                "delimiter and qualifier are both {:?}",
                self.delimiter
            )));
        }
        if self.line_separator.is_empty() {
            return Err(CsvError::InvalidDialect(
                "line separator must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Compare two header names under this dialect's case rules
    pub(crate) fn headers_match(&self, a: &str, b: &str) -> bool {
        if self.case_sensitive_headers {
            a == b
        } else {
            a.eq_ignore_ascii_case(b)
        }
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Dialect::csv()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(Dialect::csv().delimiter, ',');
        assert_eq!(Dialect::tsv().delimiter, '\t');
        assert_eq!(Dialect::tsv().qualifier, '"');
    }

    #[test]
    fn test_with_delimiter_leaves_original_untouched() {
        let original = Dialect::csv();
        let overridden = original.with_delimiter('|');
        assert_eq!(overridden.delimiter, '|');
        assert_eq!(original, Dialect::csv());
    }

    #[test]
    fn test_risky_chars_include_newlines() {
        let dialect = Dialect::csv().line_separator("\r\n");
        let risky = dialect.risky_chars();
        assert!(risky.contains(&','));
        assert!(risky.contains(&'"'));
        assert!(risky.contains(&'\r'));
        assert!(risky.contains(&'\n'));
    }

    #[test]
    fn test_validate_rejects_equal_delimiter_and_qualifier() {
        let dialect = Dialect::csv().delimiter('"');
        assert!(dialect.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_separator() {
        let dialect = Dialect::csv().line_separator("");
        assert!(dialect.validate().is_err());
    }

    #[test]
    fn test_header_matching() {
        let sensitive = Dialect::csv();
        assert!(!sensitive.headers_match("Name", "name"));

        let insensitive = Dialect::csv().case_sensitive_headers(false);
        assert!(insensitive.headers_match("Name", "name"));
    }
}
