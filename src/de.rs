//! Typed row binding: deserialize parsed rows into structs by header name
//!
//! [`from_row`] presents a row as a map of header name to field text and
//! hands it to any `serde::Deserialize` implementation. Excluded columns are
//! skipped; with case-insensitive matching, header names are lowercased
//! before lookup (struct members should use lowercase or `#[serde(rename)]`
//! / `#[serde(alias)]` attributes). Null fields bind to `None` for `Option`
//! members and raise [`CsvError::UnconvertibleValue`] for anything else.
//! Headers with no matching member are ignored unless the target opts into
//! `#[serde(deny_unknown_fields)]`.

use crate::dialect::Dialect;
use crate::error::{CsvError, Result};
use crate::parser::Row;
use serde::de::value::StringDeserializer;
use serde::de::{DeserializeOwned, DeserializeSeed, Deserializer, IntoDeserializer, MapAccess, Visitor};
use serde::forward_to_deserialize_any;
use std::fmt::Display;

impl serde::de::Error for CsvError {
    fn custom<T: Display>(msg: T) -> Self {
        CsvError::Bind(msg.to_string())
    }
}

/// Bind one row to `T` using the given headers and dialect
///
/// # Examples
///
/// ```
/// use csvstream::{de::from_row, CsvParser, Dialect};
/// use serde::Deserialize;
///
/// #[derive(Debug, Deserialize, PartialEq)]
/// struct Person {
///     name: String,
///     age: u32,
/// }
///
/// let dialect = Dialect::csv();
/// let mut parser = CsvParser::new(&dialect).unwrap();
/// let row = parser.feed("Alice,30", true).unwrap().unwrap();
///
/// let headers = vec!["name".to_string(), "age".to_string()];
/// let person: Person = from_row(&headers, &row, &dialect).unwrap();
/// assert_eq!(person.age, 30);
/// ```
pub fn from_row<T: DeserializeOwned>(headers: &[String], row: &Row, dialect: &Dialect) -> Result<T> {
    let mut pairs: Vec<(String, Option<String>)> = Vec::with_capacity(headers.len());
    for (i, header) in headers.iter().enumerate() {
        let excluded = dialect
            .excluded_columns
            .iter()
            .any(|ex| dialect.headers_match(ex, header));
        if excluded {
            continue;
        }
        let key = if dialect.case_sensitive_headers {
            header.clone()
        } else {
            header.to_lowercase()
        };
        // A field missing from a short row binds like a null.
        let value = row.fields.get(i).cloned().flatten();
        pairs.push((key, value));
    }
    T::deserialize(RowDeserializer { pairs })
}

struct RowDeserializer {
    pairs: Vec<(String, Option<String>)>,
}

impl<'de> Deserializer<'de> for RowDeserializer {
    type Error = CsvError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_map(visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_map(RowMapAccess {
            iter: self.pairs.into_iter(),
            pending: None,
        })
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        self.deserialize_map(visitor)
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 u8 u16 u32 u64 f32 f64 char str string bytes
        byte_buf option unit unit_struct newtype_struct seq tuple tuple_struct
        enum identifier ignored_any
    }
}

struct RowMapAccess {
    iter: std::vec::IntoIter<(String, Option<String>)>,
    pending: Option<(String, Option<String>)>,
}

impl<'de> MapAccess<'de> for RowMapAccess {
    type Error = CsvError;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>> {
        match self.iter.next() {
            Some((key, value)) => {
                let key_de: StringDeserializer<CsvError> = key.clone().into_deserializer();
                self.pending = Some((key, value));
                seed.deserialize(key_de).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value> {
        let (column, value) = self
            .pending
            .take()
            .ok_or_else(|| CsvError::Bind("value requested before key".to_string()))?;
        seed.deserialize(FieldDeserializer { column, value })
    }
}

/// Deserializer for one field's text (or null) with column-aware errors
struct FieldDeserializer {
    column: String,
    value: Option<String>,
}

fn null_error(column: &str) -> CsvError {
    CsvError::UnconvertibleValue {
        column: column.to_string(),
        value: String::new(),
        message: "null value for a non-optional member".to_string(),
    }
}

macro_rules! deserialize_parsed {
    ($($method:ident => $ty:ty => $visit:ident),* $(,)?) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
                match self.value {
                    None => Err(null_error(&self.column)),
                    Some(text) => match text.parse::<$ty>() {
                        Ok(parsed) => visitor.$visit(parsed),
                        Err(err) => Err(CsvError::UnconvertibleValue {
                            column: self.column,
                            value: text,
                            message: err.to_string(),
                        }),
                    },
                }
            }
        )*
    };
}

impl<'de> Deserializer<'de> for FieldDeserializer {
    type Error = CsvError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.value {
            None => visitor.visit_unit(),
            Some(text) => visitor.visit_string(text),
        }
    }

    deserialize_parsed! {
        deserialize_bool => bool => visit_bool,
        deserialize_i8 => i8 => visit_i8,
        deserialize_i16 => i16 => visit_i16,
        deserialize_i32 => i32 => visit_i32,
        deserialize_i64 => i64 => visit_i64,
        deserialize_u8 => u8 => visit_u8,
        deserialize_u16 => u16 => visit_u16,
        deserialize_u32 => u32 => visit_u32,
        deserialize_u64 => u64 => visit_u64,
        deserialize_f32 => f32 => visit_f32,
        deserialize_f64 => f64 => visit_f64,
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.value {
            None => Err(null_error(&self.column)),
            Some(text) => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => visitor.visit_char(c),
                    _ => Err(CsvError::UnconvertibleValue {
                        column: self.column,
                        value: text,
                        message: "expected a single character".to_string(),
                    }),
                }
            }
        }
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.value {
            None => Err(null_error(&self.column)),
            Some(text) => visitor.visit_string(text),
        }
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_str(visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        if self.value.is_none() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        match self.value {
            None => Err(null_error(&self.column)),
            Some(text) => visitor.visit_enum(text.into_deserializer()),
        }
    }

    forward_to_deserialize_any! {
        bytes byte_buf unit_struct seq tuple tuple_struct map struct
        identifier ignored_any
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::CsvParser;
    use serde::Deserialize;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn parse_one(input: &str, dialect: &Dialect) -> Row {
        let mut parser = CsvParser::new(dialect).unwrap();
        parser.feed(input, true).unwrap().unwrap()
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Person {
        name: String,
        age: u32,
        email: Option<String>,
    }

    #[test]
    fn test_bind_simple_struct() {
        let dialect = Dialect::csv();
        let row = parse_one("Alice,30,alice@example.com", &dialect);
        let person: Person =
            from_row(&headers(&["name", "age", "email"]), &row, &dialect).unwrap();
        assert_eq!(
            person,
            Person {
                name: "Alice".to_string(),
                age: 30,
                email: Some("alice@example.com".to_string()),
            }
        );
    }

    #[test]
    fn test_null_binds_to_none() {
        let dialect = Dialect::csv().allow_null("NULL");
        let row = parse_one("Bob,25,NULL", &dialect);
        let person: Person =
            from_row(&headers(&["name", "age", "email"]), &row, &dialect).unwrap();
        assert_eq!(person.email, None);
    }

    #[test]
    fn test_null_for_non_optional_member_is_an_error() {
        let dialect = Dialect::csv().allow_null("NULL");
        let row = parse_one("NULL,25,x", &dialect);
        let err =
            from_row::<Person>(&headers(&["name", "age", "email"]), &row, &dialect).unwrap_err();
        assert!(matches!(err, CsvError::UnconvertibleValue { .. }));
    }

    #[test]
    fn test_unconvertible_value_names_the_column() {
        let dialect = Dialect::csv();
        let row = parse_one("Alice,not-a-number,x", &dialect);
        let err =
            from_row::<Person>(&headers(&["name", "age", "email"]), &row, &dialect).unwrap_err();
        match err {
            CsvError::UnconvertibleValue { column, value, .. } => {
                assert_eq!(column, "age");
                assert_eq!(value, "not-a-number");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_case_insensitive_binding() {
        let dialect = Dialect::csv().case_sensitive_headers(false);
        let row = parse_one("Alice,30,x", &dialect);
        let person: Person =
            from_row(&headers(&["Name", "AGE", "Email"]), &row, &dialect).unwrap();
        assert_eq!(person.name, "Alice");
    }

    #[test]
    fn test_excluded_column_is_skipped() {
        #[derive(Debug, Deserialize)]
        struct Narrow {
            id: u32,
        }

        let dialect = Dialect::csv().exclude_column("secret");
        let row = parse_one("7,classified", &dialect);
        let narrow: Narrow = from_row(&headers(&["id", "secret"]), &row, &dialect).unwrap();
        assert_eq!(narrow.id, 7);
    }

    #[test]
    fn test_missing_trailing_field_binds_like_null() {
        let dialect = Dialect::csv();
        let row = parse_one("Alice,30", &dialect);
        let person: Person =
            from_row(&headers(&["name", "age", "email"]), &row, &dialect).unwrap();
        assert_eq!(person.email, None);
    }

    #[test]
    fn test_enum_binding() {
        #[derive(Debug, Deserialize, PartialEq)]
        enum Status {
            Active,
            Retired,
        }

        #[derive(Debug, Deserialize)]
        struct Record {
            status: Status,
        }

        let dialect = Dialect::csv();
        let row = parse_one("Active", &dialect);
        let record: Record = from_row(&headers(&["status"]), &row, &dialect).unwrap();
        assert_eq!(record.status, Status::Active);
    }
}
