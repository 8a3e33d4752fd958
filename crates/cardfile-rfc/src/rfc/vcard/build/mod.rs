//! vCard serialization.
//!
//! ## Usage
//!
//! ```rust
//! use cardfile_rfc::rfc::vcard::{parse_single, serialize};
//!
//! let card = parse_single("BEGIN:VCARD\r\nVERSION:4.0\r\nFN:John Doe\r\nEND:VCARD\r\n").unwrap();
//! let output = serialize(&[card]);
//! assert!(output.contains("FN:John Doe\r\n"));
//! ```
//!
//! ## Features
//!
//! - Line folding at 75 octets (UTF-8 safe), blobs every 74 characters
//! - Version-aware text escaping, quoted-printable on 2.1
//! - RFC 6868 caret encoding for arguments
//! - Fixed property order: scalars, repeatable parts, singletons

mod escape;
mod fold;
mod serializer;
mod values;

pub use escape::{encode_quoted_printable, escape_component, escape_param_value, escape_text};
pub use fold::{fold_blob, fold_line};
pub use serializer::{serialize, serialize_single};
pub use values::{RawValue, format_date_and_or_time, serialize_value};
