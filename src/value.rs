//! Typed field values for CSV rows

use chrono::NaiveDateTime;
use std::fmt;

/// Broad type category of a [`FieldValue`]
///
/// Used by the dialect's force-qualify type set: any field whose kind is
/// listed there is always wrapped in qualifiers when serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Null marker
    Null,
    /// Text value
    Text,
    /// Integer value
    Int,
    /// Float value
    Float,
    /// Boolean value
    Bool,
    /// Date/time value
    DateTime,
}

/// A single typed value in a CSV row
///
/// # Examples
///
/// ```
/// use csvstream::FieldValue;
///
/// let v = FieldValue::Int(42);
/// assert_eq!(v.as_text(), "42");
/// assert_eq!(FieldValue::from("hello").as_text(), "hello");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Null marker (rendered as the dialect's null token when allowed)
    Null,
    /// Text value
    Text(String),
    /// Integer value
    Int(i64),
    /// Float value
    Float(f64),
    /// Boolean value
    Bool(bool),
    /// Date/time value (rendered as `YYYY-MM-DD HH:MM:SS`)
    DateTime(NaiveDateTime),
}

impl FieldValue {
    /// Type category of this value
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Null => FieldKind::Null,
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Int(_) => FieldKind::Int,
            FieldValue::Float(_) => FieldKind::Float,
            FieldValue::Bool(_) => FieldKind::Bool,
            FieldValue::DateTime(_) => FieldKind::DateTime,
        }
    }

    /// Check if the value is the null marker
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Convert the value to its CSV text form
    ///
    /// Null renders as the empty string here; the encoder substitutes the
    /// dialect's null token when null handling is enabled.
    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Int(i) => itoa::Buffer::new().format(*i).to_string(),
            FieldValue::Float(f) => f.to_string(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::DateTime(d) => d.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    /// Try to interpret the value as an integer
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            FieldValue::Float(f) => Some(*f as i64),
            FieldValue::Text(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Try to interpret the value as a float
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(f) => Some(*f),
            FieldValue::Int(i) => Some(*i as f64),
            FieldValue::Text(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Try to interpret the value as a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            FieldValue::Int(i) => Some(*i != 0),
            FieldValue::Text(s) => match s.to_lowercase().as_str() {
                "true" | "yes" | "1" => Some(true),
                "false" | "no" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_text())
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(d: NaiveDateTime) -> Self {
        FieldValue::DateTime(d)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => FieldValue::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_conversions() {
        assert_eq!(FieldValue::Int(-7).as_text(), "-7");
        assert_eq!(FieldValue::Bool(true).as_text(), "true");
        assert_eq!(FieldValue::Null.as_text(), "");
        assert_eq!(FieldValue::Float(2.5).as_text(), "2.5");
    }

    #[test]
    fn test_numeric_accessors() {
        let v = FieldValue::Text("42".to_string());
        assert_eq!(v.as_i64(), Some(42));
        assert_eq!(v.as_f64(), Some(42.0));

        let v = FieldValue::Text("yes".to_string());
        assert_eq!(v.as_bool(), Some(true));
    }

    #[test]
    fn test_kind() {
        assert_eq!(FieldValue::Null.kind(), FieldKind::Null);
        assert_eq!(FieldValue::from(1i64).kind(), FieldKind::Int);
        assert_eq!(FieldValue::from(None::<i64>).kind(), FieldKind::Null);
    }
}
