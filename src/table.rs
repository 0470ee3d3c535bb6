//! In-memory tabular adapter over the row stream
//!
//! [`Table`] collects a reader's rows into a rows-and-named-columns
//! structure, enforcing the header-determined column count. Column-count
//! mismatches are an error by default; with `ignore_dimension_errors` short
//! rows are padded with empty fields and long rows truncated. Excluded
//! columns are dropped here, after the dimension check.

use crate::dialect::Dialect;
use crate::error::{CsvError, Result};
use crate::parser::Row;
use crate::reader::CsvReader;
use indexmap::IndexMap;
use std::io::BufRead;

/// A fully materialized table of rows and named columns
///
/// # Examples
///
/// ```
/// use csvstream::{CsvReader, Dialect, Table};
/// use std::io::Cursor;
///
/// let dialect = Dialect::csv().has_header(true);
/// let input = Cursor::new("Name,Age\nAlice,30\nBob,25\n");
/// let mut reader = CsvReader::from_reader(input, &dialect).unwrap();
///
/// let table = Table::read_from(&mut reader).unwrap();
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.column("Age").unwrap(), vec![Some("30"), Some("25")]);
/// ```
#[derive(Debug)]
pub struct Table {
    headers: Vec<String>,
    // Normalized header name -> column index; lowercased when matching is
    // case-insensitive.
    columns: IndexMap<String, usize>,
    rows: Vec<Row>,
    case_sensitive: bool,
}

impl Table {
    /// Drain a reader into a table
    ///
    /// The column count is determined by the headers (declared or assumed);
    /// without headers it is taken from the first row and columns are named
    /// `column_1`, `column_2`, ….
    pub fn read_from<R: BufRead>(reader: &mut CsvReader<R>) -> Result<Table> {
        let mut raw_rows = Vec::new();
        while let Some(row) = reader.read_row()? {
            raw_rows.push(row);
        }
        let dialect = reader.dialect().clone();

        let headers: Vec<String> = match reader.headers() {
            Some(h) => h.to_vec(),
            None => {
                let width = raw_rows.first().map_or(0, Row::len);
                (1..=width).map(|i| format!("column_{i}")).collect()
            }
        };
        let expected = headers.len();

        // Indices of columns that survive exclusion.
        let kept: Vec<usize> = (0..expected)
            .filter(|&i| {
                !dialect
                    .excluded_columns
                    .iter()
                    .any(|ex| dialect.headers_match(ex, &headers[i]))
            })
            .collect();

        let mut rows = Vec::with_capacity(raw_rows.len());
        for mut row in raw_rows {
            if row.len() != expected {
                if !dialect.ignore_dimension_errors {
                    return Err(CsvError::DimensionMismatch {
                        row: row.index,
                        expected,
                        actual: row.len(),
                    });
                }
                row.fields.resize(expected, Some(String::new()));
            }
            row.fields = kept.iter().map(|&i| row.fields[i].take()).collect();
            rows.push(row);
        }

        let kept_headers: Vec<String> = kept.iter().map(|&i| headers[i].clone()).collect();
        let mut columns = IndexMap::with_capacity(kept_headers.len());
        for (i, name) in kept_headers.iter().enumerate() {
            let key = if dialect.case_sensitive_headers {
                name.clone()
            } else {
                name.to_lowercase()
            };
            columns.entry(key).or_insert(i);
        }

        Ok(Table {
            headers: kept_headers,
            columns,
            rows,
            case_sensitive: dialect.case_sensitive_headers,
        })
    }

    /// Column names in order (after exclusion)
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// All data rows
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Resolve a column name to its index under the dialect's case rules
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let key = if self.case_sensitive {
            name.to_string()
        } else {
            name.to_lowercase()
        };
        self.columns.get(&key).copied()
    }

    /// All values of one column, by name
    pub fn column(&self, name: &str) -> Result<Vec<Option<&str>>> {
        let index = self
            .column_index(name)
            .ok_or_else(|| CsvError::UnresolvedColumn(name.to_string()))?;
        Ok(self.rows.iter().map(|r| r.get(index)).collect())
    }

    /// Value at `(row, column)`; `None` for nulls or out-of-range indices
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn table_for(input: &str, dialect: &Dialect) -> Result<Table> {
        let mut reader =
            CsvReader::from_reader(Cursor::new(input.to_string()), dialect)?;
        Table::read_from(&mut reader)
    }

    #[test]
    fn test_basic_table() {
        let dialect = Dialect::csv().has_header(true);
        let table = table_for("Name,Age\nAlice,30\nBob,25\n", &dialect).unwrap();
        assert_eq!(table.headers(), &["Name", "Age"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0, 0), Some("Alice"));
        assert_eq!(table.column("Age").unwrap(), vec![Some("30"), Some("25")]);
    }

    #[test]
    fn test_dimension_mismatch_is_an_error_by_default() {
        let dialect = Dialect::csv().has_header(true);
        let err = table_for("a,b\n1\n", &dialect).unwrap_err();
        match err {
            CsvError::DimensionMismatch {
                expected, actual, ..
            } => {
                assert_eq!(expected, 2);
                assert_eq!(actual, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_short_rows_padded_when_ignoring_dimension_errors() {
        let dialect = Dialect::csv().has_header(true).ignore_dimension_errors(true);
        let table = table_for("a,b,c\n1\n", &dialect).unwrap();
        assert_eq!(table.rows()[0].to_strings(), vec!["1", "", ""]);
    }

    #[test]
    fn test_long_rows_truncated_when_ignoring_dimension_errors() {
        let dialect = Dialect::csv().has_header(true).ignore_dimension_errors(true);
        let table = table_for("a,b\n1,2,3,4\n", &dialect).unwrap();
        assert_eq!(table.rows()[0].to_strings(), vec!["1", "2"]);
    }

    #[test]
    fn test_case_insensitive_column_lookup() {
        let dialect = Dialect::csv()
            .has_header(true)
            .case_sensitive_headers(false);
        let table = table_for("Name,Age\nAlice,30\n", &dialect).unwrap();
        assert_eq!(table.column("age").unwrap(), vec![Some("30")]);
        assert_eq!(table.column("NAME").unwrap(), vec![Some("Alice")]);
    }

    #[test]
    fn test_unknown_column_is_reported() {
        let dialect = Dialect::csv().has_header(true);
        let table = table_for("a,b\n1,2\n", &dialect).unwrap();
        assert!(matches!(
            table.column("missing"),
            Err(CsvError::UnresolvedColumn(_))
        ));
    }

    #[test]
    fn test_excluded_columns_are_dropped() {
        let dialect = Dialect::csv().has_header(true).exclude_column("secret");
        let table = table_for("id,secret,name\n1,xyz,Alice\n", &dialect).unwrap();
        assert_eq!(table.headers(), &["id", "name"]);
        assert_eq!(table.rows()[0].to_strings(), vec!["1", "Alice"]);
    }

    #[test]
    fn test_generated_column_names_without_headers() {
        let table = table_for("1,2\n3,4\n", &Dialect::csv()).unwrap();
        assert_eq!(table.headers(), &["column_1", "column_2"]);
        assert_eq!(table.column("column_2").unwrap(), vec![Some("2"), Some("4")]);
    }

    #[test]
    fn test_null_fields_surface_as_none() {
        let dialect = Dialect::csv().has_header(true).allow_null("NULL");
        let table = table_for("a,b\n1,NULL\n", &dialect).unwrap();
        assert_eq!(table.column("b").unwrap(), vec![None]);
    }
}
