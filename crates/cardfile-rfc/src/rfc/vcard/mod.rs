//! vCard engine for versions 2.1, 3.0, 4.0 and 5.0.
//!
//! One engine handles every generation. A static property registry and a
//! version capability matrix decide, per property, where a value is filed
//! and whether it exists at all for the card's version.
//!
//! ## Usage
//!
//! ### Parsing
//!
//! ```rust
//! use cardfile_rfc::rfc::vcard::parse_cards;
//!
//! let input = "\
//! BEGIN:VCARD\r\n\
//! VERSION:3.0\r\n\
//! N:Doe;John;;;\r\n\
//! FN:John Doe\r\n\
//! EMAIL;TYPE=work:john@example.com\r\n\
//! END:VCARD\r\n";
//!
//! let cards = parse_cards(input).unwrap();
//! assert_eq!(cards[0].full_name(), Some("John Doe"));
//! assert_eq!(cards[0].emails(), vec!["john@example.com"]);
//! ```
//!
//! ### Serializing
//!
//! ```rust
//! use cardfile_rfc::rfc::vcard::{parse_single, serialize};
//!
//! let card = parse_single("BEGIN:VCARD\r\nVERSION:4.0\r\nFN:Jane Doe\r\nEND:VCARD\r\n").unwrap();
//! let output = serialize(&[card]);
//! assert!(output.contains("FN:Jane Doe\r\n"));
//! ```
//!
//! ## Submodules
//!
//! - [`core`] - Card model (`Card`, `Part`, `PartValue`, field kinds)
//! - [`parse`] - Line reconstruction, tokenizer, converters and validator
//! - [`policy`] - Property registry, capability matrix, ALTID rules
//! - [`build`] - Serialization and line folding

pub mod build;
pub mod core;
pub mod parse;
pub mod policy;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use build::{serialize, serialize_single};
pub use cardfile_core::constants::VCARD_CLIPBOARD_FORMAT;
pub use core::{
    AddressInfo, AgentInfo, Argument, Card, DateAndOrTime, ExtensionInfo, FieldKind, GenderInfo,
    MediaInfo, MediaSource, NameInfo, OrganizationInfo, Part, PartMeta, PartValue,
    PartsArrayKind, ScalarKind, SingletonKind, VCardKind, VCardVersion,
};
pub use parse::{
    ErrorClass, ParseError, ParseErrorKind, ParseOptions, ParseResult, ValidationError,
    parse_cards, parse_cards_with, parse_file, parse_file_with, parse_reader, parse_reader_with,
    parse_single,
};
