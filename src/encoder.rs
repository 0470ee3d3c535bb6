//! Row serialization: the inverse of the parsing state machine
//!
//! [`CsvEncoder`] turns a sequence of field values into one correctly escaped
//! and delimited text line. The caller appends the line separator (the file
//! writer does this automatically).

use crate::dialect::Dialect;
use crate::error::Result;
use crate::value::FieldValue;

/// CSV row encoder for a fixed dialect
///
/// # Examples
///
/// ```
/// use csvstream::{CsvEncoder, Dialect, FieldValue};
///
/// let encoder = CsvEncoder::new(&Dialect::csv()).unwrap();
/// let line = encoder.encode_line(&[
///     FieldValue::from("a,b"),
///     FieldValue::from("plain"),
/// ]);
/// assert_eq!(line, "\"a,b\",plain");
/// ```
pub struct CsvEncoder {
    dialect: Dialect,
    risky: Vec<char>,
}

impl CsvEncoder {
    /// Create an encoder for the given dialect
    pub fn new(dialect: &Dialect) -> Result<CsvEncoder> {
        dialect.validate()?;
        Ok(CsvEncoder {
            risky: dialect.risky_chars(),
            dialect: dialect.clone(),
        })
    }

    /// Encode a row into `out`, joining fields with the delimiter
    ///
    /// No trailing delimiter and no line separator are appended.
    pub fn encode_row(&self, fields: &[FieldValue], out: &mut String) {
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                out.push(self.dialect.delimiter);
            }
            self.encode_field(field, out);
        }
    }

    /// Encode a row into a fresh string
    pub fn encode_line(&self, fields: &[FieldValue]) -> String {
        let mut out = String::new();
        self.encode_row(fields, &mut out);
        out
    }

    /// Encode a row of plain strings into a fresh string
    pub fn encode_str_line<I, S>(&self, fields: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let values: Vec<FieldValue> = fields
            .into_iter()
            .map(|s| FieldValue::from(s.as_ref()))
            .collect();
        self.encode_line(&values)
    }

    /// Encode a single field with qualification and escaping
    fn encode_field(&self, field: &FieldValue, out: &mut String) {
        if field.is_null() {
            if self.dialect.allow_null {
                let token = self.dialect.null_token.clone();
                self.write_text(&token, field, out);
            }
            // Null with null handling off renders as an empty field.
            return;
        }
        let text = field.as_text();
        self.write_text(&text, field, out);
    }

    fn write_text(&self, text: &str, field: &FieldValue, out: &mut String) {
        if self.needs_qualifying(text, field) {
            let quote = self.dialect.qualifier;
            out.push(quote);
            for c in text.chars() {
                if c == quote {
                    // Escape qualifiers by doubling.
                    out.push(quote);
                }
                out.push(c);
            }
            out.push(quote);
        } else {
            out.push_str(text);
        }
    }

    /// Check whether a field's text must be qualifier-wrapped
    fn needs_qualifying(&self, text: &str, field: &FieldValue) -> bool {
        if self.dialect.force_qualify {
            return true;
        }
        if self.dialect.force_qualify_kinds.contains(&field.kind()) {
            return true;
        }
        !text.is_empty() && text.chars().any(|c| self.risky.contains(&c))
    }
}
