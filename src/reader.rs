//! Chunked stream driver: feeds line chunks into the parser state machine
//!
//! [`CsvReader`] wraps any buffered source of text, repeatedly passes chunks
//! to [`CsvParser::feed`] and yields completed rows lazily. Chunks are
//! physical lines, which need not align with logical records: a quoted field
//! spanning several lines is reassembled by the state machine, not here.

use crate::dialect::Dialect;
use crate::error::Result;
use crate::parser::{CsvParser, Row, Status};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Streaming CSV reader
///
/// Produces a lazy, forward-only sequence of rows. Dropping the reader or
/// its iterator early is always safe; the underlying source is released on
/// drop without draining the remainder.
///
/// # Examples
///
/// ```
/// use csvstream::{CsvReader, Dialect};
/// use std::io::Cursor;
///
/// let input = Cursor::new("a,b\nc,d\n");
/// let mut reader = CsvReader::from_reader(input, &Dialect::csv()).unwrap();
///
/// for row in reader.rows() {
///     let row = row.unwrap();
///     println!("{:?}", row.to_strings());
/// }
/// ```
///
/// # With headers
///
/// ```
/// use csvstream::{CsvReader, Dialect};
/// use std::io::Cursor;
///
/// let dialect = Dialect::csv().has_header(true);
/// let input = Cursor::new("Name,Age\nAlice,30\n");
/// let mut reader = CsvReader::from_reader(input, &dialect).unwrap();
///
/// let first = reader.read_row().unwrap().unwrap();
/// assert_eq!(first.to_strings(), vec!["Alice", "30"]);
/// assert_eq!(reader.headers(), Some(&["Name".to_string(), "Age".to_string()][..]));
/// ```
pub struct CsvReader<R: BufRead> {
    reader: R,
    parser: CsvParser,
    dialect: Dialect,

    line_buffer: String,
    eof: bool,
    headers: Option<Vec<String>>,
    header_consumed: bool,
    rows_returned: u64,
}

impl CsvReader<BufReader<File>> {
    /// Open a CSV file with the default comma dialect
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, &Dialect::csv())
    }

    /// Open a CSV file with the given dialect
    pub fn open_with<P: AsRef<Path>>(path: P, dialect: &Dialect) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), dialect)
    }
}

impl<R: BufRead> CsvReader<R> {
    /// Wrap any buffered reader with the given dialect
    pub fn from_reader(reader: R, dialect: &Dialect) -> Result<Self> {
        let parser = CsvParser::new(dialect)?;
        let headers = if !dialect.has_header && !dialect.assumed_headers.is_empty() {
            Some(dialect.assumed_headers.clone())
        } else {
            None
        };
        Ok(CsvReader {
            reader,
            parser,
            dialect: dialect.clone(),
            line_buffer: String::with_capacity(1024),
            eof: false,
            headers,
            header_consumed: false,
            rows_returned: 0,
        })
    }

    /// The dialect this reader was created with
    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Header row if available
    ///
    /// When the dialect declares a header row, headers become available
    /// after the first row has been read; with assumed headers they are
    /// available immediately.
    pub fn headers(&self) -> Option<&[String]> {
        self.headers.as_deref()
    }

    /// Number of data rows returned so far (excluding the header row)
    pub fn row_count(&self) -> u64 {
        self.rows_returned
    }

    /// Read a single data row
    ///
    /// Returns `Ok(None)` once the stream is fully consumed. The header row,
    /// if declared, is captured and skipped transparently.
    pub fn read_row(&mut self) -> Result<Option<Row>> {
        loop {
            let Some(row) = self.next_parsed()? else {
                return Ok(None);
            };
            if self.dialect.has_header && !self.header_consumed {
                self.header_consumed = true;
                self.headers = Some(row.to_strings());
                continue;
            }
            self.rows_returned += 1;
            return Ok(Some(row));
        }
    }

    /// Pump the state machine: drain buffered rows, then feed line chunks
    fn next_parsed(&mut self) -> Result<Option<Row>> {
        loop {
            if let Some(row) = self.parser.feed("", self.eof)? {
                return Ok(Some(row));
            }
            if self.parser.status() == Status::Complete || self.eof {
                return Ok(None);
            }
            self.line_buffer.clear();
            let bytes_read = self.reader.read_line(&mut self.line_buffer)?;
            if bytes_read == 0 {
                self.eof = true;
                continue;
            }
            if let Some(row) = self.parser.feed(&self.line_buffer, false)? {
                return Ok(Some(row));
            }
        }
    }

    /// Lazy iterator over data rows
    ///
    /// Stopping early (e.g. via `take`) is safe and does not drain the
    /// source.
    pub fn rows(&mut self) -> RowIter<'_, R> {
        RowIter { reader: self }
    }

    /// Read the next row and bind it to `T` by header name
    ///
    /// Requires headers: either a header row declared in the dialect or
    /// assumed headers.
    #[cfg(feature = "serde")]
    pub fn deserialize_row<T: serde::de::DeserializeOwned>(&mut self) -> Result<Option<T>> {
        let Some(row) = self.read_row()? else {
            return Ok(None);
        };
        let headers = self
            .headers
            .clone()
            .ok_or_else(|| crate::error::CsvError::Bind("no headers available for typed binding".to_string()))?;
        crate::de::from_row(&headers, &row, &self.dialect).map(Some)
    }
}

/// Iterator over rows of a [`CsvReader`]
pub struct RowIter<'a, R: BufRead> {
    reader: &'a mut CsvReader<R>,
}

impl<'a, R: BufRead> Iterator for RowIter<'a, R> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_row().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader_for(input: &str, dialect: &Dialect) -> CsvReader<Cursor<String>> {
        CsvReader::from_reader(Cursor::new(input.to_string()), dialect).unwrap()
    }

    fn collect_rows(input: &str, dialect: &Dialect) -> Vec<Vec<String>> {
        let mut reader = reader_for(input, dialect);
        reader
            .rows()
            .map(|r| r.unwrap().to_strings())
            .collect()
    }

    #[test]
    fn test_basic_rows() {
        let rows = collect_rows("a,b\nc,d\n", &Dialect::csv());
        assert_eq!(rows, vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn test_final_row_without_trailing_newline() {
        let rows = collect_rows("a,b\nc,d", &Dialect::csv());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], vec!["c", "d"]);
    }

    #[test]
    fn test_header_captured_and_skipped() {
        let dialect = Dialect::csv().has_header(true);
        let mut reader = reader_for("Name,Age\nAlice,30\nBob,25\n", &dialect);
        assert_eq!(reader.headers(), None);

        let rows: Vec<_> = reader.rows().map(|r| r.unwrap().to_strings()).collect();
        assert_eq!(rows, vec![vec!["Alice", "30"], vec!["Bob", "25"]]);
        assert_eq!(
            reader.headers(),
            Some(&["Name".to_string(), "Age".to_string()][..])
        );
        assert_eq!(reader.row_count(), 2);
    }

    #[test]
    fn test_assumed_headers_available_immediately() {
        let dialect = Dialect::csv()
            .assumed_headers(vec!["x".to_string(), "y".to_string()]);
        let reader = reader_for("1,2\n", &dialect);
        assert_eq!(
            reader.headers(),
            Some(&["x".to_string(), "y".to_string()][..])
        );
    }

    #[test]
    fn test_quoted_field_spanning_lines() {
        // read_line chunks split inside the quoted field; the state machine
        // reassembles one logical row.
        let rows = collect_rows("\"Dr. Reed,\nEliot\",x\n", &Dialect::csv());
        assert_eq!(rows, vec![vec!["Dr. Reed,\nEliot", "x"]]);
    }

    #[test]
    fn test_separator_override_stream() {
        let rows = collect_rows("sep=|\na|b|c\n", &Dialect::csv());
        assert_eq!(rows, vec![vec!["a", "b", "c"]]);
    }

    #[test]
    fn test_early_stop_is_safe() {
        let mut reader = reader_for("a\nb\nc\nd\n", &Dialect::csv());
        let first_two: Vec<_> = reader
            .rows()
            .take(2)
            .map(|r| r.unwrap().to_strings())
            .collect();
        assert_eq!(first_two, vec![vec!["a"], vec!["b"]]);
    }

    #[test]
    fn test_unterminated_quote_surfaces_error() {
        let mut reader = reader_for("a,\"open\n", &Dialect::csv());
        let result: Result<Vec<_>> = reader.rows().collect();
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_input() {
        let rows = collect_rows("", &Dialect::csv());
        assert!(rows.is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_rows() {
        use serde::Deserialize;

        #[derive(Debug, Deserialize, PartialEq)]
        struct Person {
            name: String,
            age: u32,
        }

        let dialect = Dialect::csv().has_header(true);
        let mut reader = reader_for("name,age\nAlice,30\n", &dialect);
        let person: Person = reader.deserialize_row().unwrap().unwrap();
        assert_eq!(
            person,
            Person {
                name: "Alice".to_string(),
                age: 30
            }
        );
        assert!(reader.deserialize_row::<Person>().unwrap().is_none());
    }
}
