//! CSV writing with streaming row-at-a-time output
//!
//! [`CsvWriter`] encodes one row at a time through [`CsvEncoder`] and writes
//! it through, appending the dialect's line separator. Memory usage stays
//! constant regardless of dataset size.

use crate::dialect::Dialect;
use crate::encoder::CsvEncoder;
use crate::error::Result;
use crate::value::FieldValue;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Streaming CSV writer
///
/// # Examples
///
/// ```no_run
/// use csvstream::{CsvWriter, Dialect};
///
/// let mut writer = CsvWriter::create("output.csv", &Dialect::csv()).unwrap();
/// writer.write_row(["Name", "Age", "City"]).unwrap();
/// writer.write_row(["Alice", "30", "NYC"]).unwrap();
/// writer.finish().unwrap();
/// ```
///
/// # Typed values
///
/// ```no_run
/// use csvstream::{CsvWriter, Dialect, FieldValue};
///
/// let dialect = Dialect::csv().allow_null("NULL");
/// let mut writer = CsvWriter::create("output.csv", &dialect).unwrap();
/// writer.write_row_typed(&[
///     FieldValue::from("Alice"),
///     FieldValue::Int(30),
///     FieldValue::Null,
/// ]).unwrap();
/// writer.finish().unwrap();
/// ```
pub struct CsvWriter<W: Write> {
    writer: W,
    encoder: CsvEncoder,
    line_separator: String,
    buffer: String,
    row_count: u64,
}

impl CsvWriter<BufWriter<File>> {
    /// Create a CSV file with the given dialect
    pub fn create<P: AsRef<Path>>(path: P, dialect: &Dialect) -> Result<Self> {
        let file = File::create(path)?;
        Self::from_writer(BufWriter::new(file), dialect)
    }
}

impl<W: Write> CsvWriter<W> {
    /// Wrap any writer with the given dialect
    pub fn from_writer(writer: W, dialect: &Dialect) -> Result<Self> {
        Ok(CsvWriter {
            writer,
            encoder: CsvEncoder::new(dialect)?,
            line_separator: dialect.line_separator.clone(),
            buffer: String::with_capacity(4096),
            row_count: 0,
        })
    }

    /// Write a row of strings
    pub fn write_row<I, S>(&mut self, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let values: Vec<FieldValue> = fields
            .into_iter()
            .map(|s| FieldValue::from(s.as_ref()))
            .collect();
        self.write_row_typed(&values)
    }

    /// Write a header row
    ///
    /// Identical to [`CsvWriter::write_row`]; provided for symmetry with
    /// readers that declare a header row.
    pub fn write_header<I, S>(&mut self, headers: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.write_row(headers)
    }

    /// Write a row of typed values
    pub fn write_row_typed(&mut self, fields: &[FieldValue]) -> Result<()> {
        self.buffer.clear();
        self.encoder.encode_row(fields, &mut self.buffer);
        self.buffer.push_str(&self.line_separator);
        self.writer.write_all(self.buffer.as_bytes())?;
        self.row_count += 1;
        Ok(())
    }

    /// Write multiple rows at once
    pub fn write_rows_batch<I, T, S>(&mut self, rows: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for row in rows {
            self.write_row(row)?;
        }
        Ok(())
    }

    /// Number of rows written
    pub fn row_count(&self) -> u64 {
        self.row_count
    }

    /// Flush and finalize the output
    ///
    /// Consumes the writer; must be called to guarantee buffered rows reach
    /// the sink.
    pub fn finish(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(dialect: &Dialect, write: impl FnOnce(&mut CsvWriter<&mut Vec<u8>>)) -> String {
        let mut out = Vec::new();
        let mut writer = CsvWriter::from_writer(&mut out, dialect).unwrap();
        write(&mut writer);
        writer.finish().unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_plain_rows() {
        let text = written(&Dialect::csv(), |w| {
            w.write_row(["Name", "Age"]).unwrap();
            w.write_row(["Alice", "30"]).unwrap();
        });
        assert_eq!(text, "Name,Age\nAlice,30\n");
    }

    #[test]
    fn test_risky_fields_are_escaped() {
        let text = written(&Dialect::csv(), |w| {
            w.write_row(["a,b", "say \"hi\"", "line1\nline2"]).unwrap();
        });
        assert_eq!(text, "\"a,b\",\"say \"\"hi\"\"\",\"line1\nline2\"\n");
    }

    #[test]
    fn test_typed_row_with_null() {
        let dialect = Dialect::csv().allow_null("NULL");
        let text = written(&dialect, |w| {
            w.write_row_typed(&[
                FieldValue::from("x"),
                FieldValue::Null,
                FieldValue::Int(5),
            ])
            .unwrap();
        });
        assert_eq!(text, "x,NULL,5\n");
    }

    #[test]
    fn test_custom_line_separator() {
        let dialect = Dialect::csv().line_separator("\r\n");
        let text = written(&dialect, |w| {
            w.write_row(["a", "b"]).unwrap();
        });
        assert_eq!(text, "a,b\r\n");
    }

    #[test]
    fn test_row_count() {
        let mut out = Vec::new();
        let mut writer = CsvWriter::from_writer(&mut out, &Dialect::csv()).unwrap();
        writer.write_rows_batch([["a"], ["b"], ["c"]]).unwrap();
        assert_eq!(writer.row_count(), 3);
        writer.finish().unwrap();
    }
}
