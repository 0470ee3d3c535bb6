//! # csvstream
//!
//! Streaming CSV reading and writing with constant memory usage.
//!
//! The crate is built around an incremental parsing state machine,
//! [`CsvParser`], that accepts arbitrarily sliced text chunks and emits one
//! logical row at a time. Quoted fields may contain delimiters, qualifiers
//! and line breaks; a field split across chunk boundaries is reassembled
//! transparently. Everything else layers on top of it:
//!
//! - [`CsvReader`] drives the parser from any `BufRead` source and yields
//!   rows lazily
//! - [`CsvWriter`] and [`CsvEncoder`] produce correctly escaped output,
//!   row by row
//! - [`Table`] materializes a stream into rows and named columns
//! - with the `serde` feature (on by default), rows bind to structs by
//!   header name
//!
//! All knobs live on [`Dialect`]: delimiter, qualifier, line separator,
//! header handling, null tokens, forced qualification and more.
//!
//! ## Quick Start
//!
//! ### Reading a CSV stream
//!
//! ```
//! use csvstream::{CsvReader, Dialect};
//! use std::io::Cursor;
//!
//! let dialect = Dialect::csv().has_header(true);
//! let input = Cursor::new("Name,Age\nAlice,30\nBob,25\n");
//! let mut reader = CsvReader::from_reader(input, &dialect).unwrap();
//!
//! for row in reader.rows() {
//!     let row = row.unwrap();
//!     println!("{:?}", row.to_strings());
//! }
//! ```
//!
//! ### Writing a CSV file
//!
//! ```no_run
//! use csvstream::{CsvWriter, Dialect};
//!
//! let mut writer = CsvWriter::create("people.csv", &Dialect::csv()).unwrap();
//! writer.write_header(["Name", "Age"]).unwrap();
//! writer.write_row(["Alice", "30"]).unwrap();
//! writer.finish().unwrap();
//! ```
//!
//! ### Feeding the parser directly
//!
//! ```
//! use csvstream::{CsvParser, Dialect};
//!
//! let mut parser = CsvParser::new(&Dialect::csv()).unwrap();
//!
//! // Chunks can split anywhere, even inside a quoted field.
//! assert!(parser.feed("a,\"hel", false).unwrap().is_none());
//! let row = parser.feed("lo\"\n", false).unwrap().unwrap();
//! assert_eq!(row.to_strings(), vec!["a", "hello"]);
//! ```
//!
//! ### Typed rows with serde
//!
//! ```
//! use csvstream::{CsvReader, Dialect};
//! use serde::Deserialize;
//! use std::io::Cursor;
//!
//! #[derive(Debug, Deserialize)]
//! struct Person {
//!     name: String,
//!     age: u32,
//! }
//!
//! let dialect = Dialect::csv().has_header(true);
//! let input = Cursor::new("name,age\nAlice,30\n");
//! let mut reader = CsvReader::from_reader(input, &dialect).unwrap();
//!
//! let person: Person = reader.deserialize_row().unwrap().unwrap();
//! assert_eq!(person.age, 30);
//! ```

mod dialect;
mod encoder;
mod error;
mod parser;
mod reader;
mod table;
mod value;
mod writer;

#[cfg(feature = "serde")]
pub mod de;

pub use dialect::Dialect;
pub use encoder::CsvEncoder;
pub use error::{CsvError, Result};
pub use parser::{CsvParser, Row, Status};
pub use reader::{CsvReader, RowIter};
pub use table::Table;
pub use value::{FieldKind, FieldValue};
pub use writer::CsvWriter;

#[cfg(feature = "serde")]
pub use de::from_row;
