//! vCard parsing (2.1, 3.0, 4.0 and 5.0).
//!
//! ## Usage
//!
//! ```rust
//! use cardfile_rfc::rfc::vcard::parse;
//!
//! let input = "\
//! BEGIN:VCARD\r\n\
//! VERSION:4.0\r\n\
//! FN:John Doe\r\n\
//! EMAIL:john@example.com\r\n\
//! END:VCARD\r\n";
//!
//! let cards = parse::parse_cards(input).unwrap();
//! assert_eq!(cards[0].full_name(), Some("John Doe"));
//! ```
//!
//! ## Pipeline
//!
//! - [`lines`] unfolds physical lines and frames records
//! - [`lexer`] splits a logical line into group, name, arguments and value
//! - the engine looks each property up in the registry, gates it by
//!   version, resolves ALTID and converts the value
//! - the validator checks required properties per version

mod convert;
mod error;
pub mod lexer;
pub mod lines;
mod parser;
mod validate;
mod values;

#[cfg(test)]
mod error_tests;

pub use convert::{Converted, ValueContext, convert, embedded_agent};
pub use error::{ErrorClass, ParseError, ParseErrorKind, ParseResult, ValidationError};
pub use lexer::{ContentLine, parse_content_line};
pub use lines::{LogicalLine, RawRecord, split_records};
pub use parser::{
    ParseOptions, parse_cards, parse_cards_with, parse_file, parse_file_with, parse_reader,
    parse_reader_with, parse_single,
};
pub use validate::{required_fields, validate};
pub use values::{
    decode_quoted_printable, parse_date, parse_date_and_or_time, parse_time, parse_utc_offset,
    split_component, split_structured, unescape_text,
};
