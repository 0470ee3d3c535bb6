//! Incremental CSV parsing state machine
//!
//! [`CsvParser`] consumes text in chunks that need not align with logical
//! records and yields at most one completed [`Row`] per [`CsvParser::feed`]
//! call. Partial state (in-progress field, open quoted section, accumulated
//! row) is buffered across chunks, so a quoted field may span any number of
//! physical lines. The parser never retries: the only fatal conditions are an
//! unterminated quoted field at true end-of-input and a malformed `sep=`
//! directive, both surfaced as errors that end the session.

use crate::dialect::Dialect;
use crate::error::{CsvError, Result};

/// Progress of a parse session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// More input is needed or more rows may still be produced
    Continuing,
    /// The stream is fully consumed; no further rows will be produced
    Complete,
}

/// One logical CSV record
///
/// Fields are `None` only when the dialect allows nulls and the field text
/// matched the null token exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Zero-based index of this row within the session
    pub index: u64,
    /// Field values in order
    pub fields: Vec<Option<String>>,
}

impl Row {
    /// Get the field at `col`, flattening nulls to `None`
    pub fn get(&self, col: usize) -> Option<&str> {
        self.fields.get(col).and_then(|f| f.as_deref())
    }

    /// Number of fields in the row
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the row has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Convert the row to plain strings, rendering nulls as empty strings
    pub fn to_strings(&self) -> Vec<String> {
        self.fields
            .iter()
            .map(|f| f.clone().unwrap_or_default())
            .collect()
    }
}

enum Directive {
    /// The first line cannot yet be classified; await more input
    NeedMore,
    /// Directive handling is finished (applied or not a directive)
    Resolved,
}

enum Quoted {
    /// The closing qualifier has not arrived yet; await more input
    NeedMore,
    /// The quoted section closed; resume the unquoted scan
    Closed,
}

/// Streaming CSV parser
///
/// Feed chunks with [`CsvParser::feed`] until [`CsvParser::status`] reports
/// [`Status::Complete`]. Each call returns at most one row; pass an empty
/// chunk to drain rows already buffered from a previous chunk.
///
/// # Examples
///
/// ```
/// use csvstream::{CsvParser, Dialect};
///
/// let mut parser = CsvParser::new(&Dialect::csv()).unwrap();
/// let row = parser.feed("a,b,c\n", false).unwrap().unwrap();
/// assert_eq!(row.to_strings(), vec!["a", "b", "c"]);
/// ```
///
/// A quoted field may span chunks:
///
/// ```
/// use csvstream::{CsvParser, Dialect};
///
/// let mut parser = CsvParser::new(&Dialect::csv()).unwrap();
/// assert!(parser.feed("a,\"b\n", false).unwrap().is_none());
/// let row = parser.feed("c\"\n", false).unwrap().unwrap();
/// assert_eq!(row.to_strings(), vec!["a", "b\nc"]);
/// ```
pub struct CsvParser {
    // Effective settings; delimiter may differ from the caller's dialect
    // after a sep= override.
    dialect: Dialect,

    // All text fed but not yet consumed into rows
    buffer: String,
    // Byte offset of the scan position within `buffer`
    cursor: usize,
    // In-progress field text
    field: String,
    // Completed fields of the in-progress row
    fields: Vec<Option<String>>,
    // Inside a quoted section
    in_quotes: bool,
    // The current field has seen at least one character (or an opening
    // qualifier); a qualifier is only special before this is set
    field_begun: bool,
    // The sep= directive check fires at most once per session
    directive_checked: bool,

    rows_emitted: u64,
    status: Status,
}

impl CsvParser {
    /// Create a parser session for the given dialect
    ///
    /// The dialect is copied; a `sep=` override affects only this session.
    pub fn new(dialect: &Dialect) -> Result<CsvParser> {
        dialect.validate()?;
        Ok(CsvParser {
            dialect: dialect.clone(),
            buffer: String::new(),
            cursor: 0,
            field: String::new(),
            fields: Vec::new(),
            in_quotes: false,
            field_begun: false,
            directive_checked: false,
            rows_emitted: 0,
            status: Status::Continuing,
        })
    }

    /// Current session status
    pub fn status(&self) -> Status {
        self.status
    }

    /// The delimiter in effect, reflecting any `sep=` override
    pub fn effective_delimiter(&self) -> char {
        self.dialect.delimiter
    }

    /// Number of rows emitted so far
    pub fn row_count(&self) -> u64 {
        self.rows_emitted
    }

    /// Feed a chunk of text and advance parsing
    ///
    /// Returns a completed row if one was fully delimited within the
    /// buffered text, `None` if more input is needed. `is_final` marks the
    /// true end of the stream: the trailing field (even if empty) then forms
    /// the last row, and an open quoted section becomes
    /// [`CsvError::UnterminatedQualifier`].
    pub fn feed(&mut self, chunk: &str, is_final: bool) -> Result<Option<Row>> {
        if self.status == Status::Complete {
            return Ok(None);
        }
        self.buffer.push_str(chunk);

        if !self.directive_checked {
            match self.check_separator_override(is_final)? {
                Directive::NeedMore => return Ok(None),
                Directive::Resolved => {}
            }
            if self.status == Status::Complete {
                return Ok(None);
            }
        }

        self.scan(is_final)
    }

    /// Recognize a leading `sep=X` directive line, at most once per session
    fn check_separator_override(&mut self, is_final: bool) -> Result<Directive> {
        if !self.dialect.allow_separator_override {
            self.directive_checked = true;
            return Ok(Directive::Resolved);
        }
        let sep = &self.dialect.line_separator;
        let (line_end, consumed) = match self.buffer.find(sep.as_str()) {
            Some(pos) => (pos, pos + sep.len()),
            None if is_final => (self.buffer.len(), self.buffer.len()),
            None => {
                if directive_prefix_viable(&self.buffer) {
                    return Ok(Directive::NeedMore);
                }
                self.directive_checked = true;
                return Ok(Directive::Resolved);
            }
        };
        let declared = parse_directive(&self.buffer[..line_end]);
        self.directive_checked = true;
        match declared {
            None => Ok(Directive::Resolved),
            Some(Err(err)) => Err(err),
            Some(Ok(delimiter)) => {
                self.dialect = self.dialect.with_delimiter(delimiter);
                self.buffer.drain(..consumed);
                if is_final && self.buffer.is_empty() {
                    self.status = Status::Complete;
                }
                Ok(Directive::Resolved)
            }
        }
    }

    /// Single left-to-right pass over the buffered text from the cursor
    fn scan(&mut self, is_final: bool) -> Result<Option<Row>> {
        let delim = self.dialect.delimiter;
        let quote = self.dialect.qualifier;
        let sep = self.dialect.line_separator.clone();

        loop {
            if self.in_quotes {
                match self.scan_quoted(is_final)? {
                    Quoted::NeedMore => return Ok(None),
                    Quoted::Closed => {}
                }
            }
            if self.cursor >= self.buffer.len() {
                break;
            }
            let rest = &self.buffer[self.cursor..];
            let Some(c) = rest.chars().next() else {
                break;
            };

            // Row terminator; never reached while inside quotes.
            if rest.starts_with(sep.as_str()) {
                self.cursor += sep.len();
                let row = self.emit_row();
                self.compact();
                return Ok(Some(row));
            }
            // Not enough buffered text to rule a separator match in or out.
            if !is_final && rest.len() < sep.len() && sep.starts_with(rest) {
                return Ok(None);
            }

            // A qualifier opens a quoted section only as the first character
            // of a field; mid-field it is ordinary text.
            if c == quote && !self.field_begun {
                self.in_quotes = true;
                self.field_begun = true;
                self.cursor += c.len_utf8();
                continue;
            }

            if c == delim {
                let mut lookahead = rest[c.len_utf8()..].chars();
                let first = lookahead.next();
                let second = lookahead.next();
                // The lenient-spacing rule needs two characters past the
                // delimiter before the field boundary can be placed.
                if !is_final && second.is_none() && (first.is_none() || first == Some(' ')) {
                    return Ok(None);
                }
                self.push_field();
                self.cursor += c.len_utf8();
                if first == Some(' ') && second == Some(quote) {
                    // Hand-typed `a, "b"` spacing: skip the single space so
                    // the following quoted field is recognized.
                    self.cursor += 1;
                }
                continue;
            }

            self.field.push(c);
            self.field_begun = true;
            self.cursor += c.len_utf8();
        }

        if is_final {
            if self.field_begun || !self.fields.is_empty() {
                let row = self.emit_row();
                self.compact();
                self.status = Status::Complete;
                return Ok(Some(row));
            }
            self.status = Status::Complete;
        }
        Ok(None)
    }

    /// Consume quoted-field content up to the closing qualifier
    ///
    /// Doubled qualifiers collapse to one literal qualifier character; line
    /// separators inside the quoted section are ordinary content.
    fn scan_quoted(&mut self, is_final: bool) -> Result<Quoted> {
        let quote = self.dialect.qualifier;
        loop {
            let rest = &self.buffer[self.cursor..];
            let Some(i) = rest.find(quote) else {
                self.field.push_str(rest);
                self.cursor = self.buffer.len();
                if is_final {
                    return Err(CsvError::UnterminatedQualifier {
                        partial: std::mem::take(&mut self.field),
                    });
                }
                return Ok(Quoted::NeedMore);
            };
            self.field.push_str(&rest[..i]);
            let after_quote = self.cursor + i + quote.len_utf8();
            match self.buffer[after_quote..].chars().next() {
                Some(next) if next == quote => {
                    // Escaped literal qualifier.
                    self.field.push(quote);
                    self.cursor = after_quote + quote.len_utf8();
                }
                Some(_) => {
                    self.in_quotes = false;
                    self.cursor = after_quote;
                    return Ok(Quoted::Closed);
                }
                None if is_final => {
                    self.in_quotes = false;
                    self.cursor = after_quote;
                    return Ok(Quoted::Closed);
                }
                None => {
                    // Cannot yet tell whether this qualifier is doubled;
                    // leave it unconsumed and wait.
                    self.cursor += i;
                    return Ok(Quoted::NeedMore);
                }
            }
        }
    }

    /// Close the in-progress field, applying null-token interpretation
    fn push_field(&mut self) {
        let text = std::mem::take(&mut self.field);
        let value = if self.dialect.allow_null && text == self.dialect.null_token {
            None
        } else {
            Some(text)
        };
        self.fields.push(value);
        self.field_begun = false;
    }

    fn emit_row(&mut self) -> Row {
        self.push_field();
        let row = Row {
            index: self.rows_emitted,
            fields: std::mem::take(&mut self.fields),
        };
        self.rows_emitted += 1;
        row
    }

    /// Drop the consumed buffer prefix so memory stays bounded
    fn compact(&mut self) {
        self.buffer.drain(..self.cursor);
        self.cursor = 0;
    }
}

/// Classify a complete first line as a `sep=` directive
///
/// `None`: not a directive (including `sep=` with an empty remainder).
/// `Some(Ok(c))`: directive declaring `c`. `Some(Err(_))`: directive
/// declaring more than one character.
fn parse_directive(line: &str) -> Option<std::result::Result<char, CsvError>> {
    let head = line.get(..3)?;
    if !head.eq_ignore_ascii_case("sep") {
        return None;
    }
    let tail = line[3..].trim_start_matches([' ', '\t']);
    let tail = tail.strip_prefix('=')?;
    let declared = tail.trim();
    let mut chars = declared.chars();
    match (chars.next(), chars.next()) {
        (None, _) => None,
        (Some(c), None) => Some(Ok(c)),
        (Some(_), Some(_)) => Some(Err(CsvError::MalformedSeparatorDirective(
            line.to_string(),
        ))),
    }
}

/// Check whether a partial first line could still grow into a directive
fn directive_prefix_viable(s: &str) -> bool {
    let mut chars = s.chars();
    for p in "sep".chars() {
        match chars.next() {
            None => return true,
            Some(c) if c.to_ascii_lowercase() == p => {}
            Some(_) => return false,
        }
    }
    for c in chars {
        match c {
            ' ' | '\t' => continue,
            // Remainder length is judged once the full line is buffered.
            '=' => return true,
            _ => return false,
        }
    }
    true
}
