//! vCard text escaping.

use std::fmt::Write as _;

use crate::rfc::vcard::core::VCardVersion;

/// Escapes a text value for vCard serialization.
///
/// 3.0 and later escape backslash, newline, comma and semicolon (CR is
/// dropped). 2.1 only escapes semicolons, doubling any backslashes that
/// directly precede one; line breaks are left for quoted-printable.
#[must_use]
pub fn escape_text(s: &str, version: VCardVersion) -> String {
    if version.major() == 2 {
        return escape_legacy(s);
    }

    let mut result = String::with_capacity(s.len());

    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            ',' => result.push_str("\\,"),
            ';' => result.push_str("\\;"),
            '\r' => {} // Skip CR (use \n for newlines)
            _ => result.push(c),
        }
    }

    result
}

fn escape_legacy(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut backslashes = 0usize;

    for c in s.chars() {
        match c {
            '\\' => {
                backslashes += 1;
                continue;
            }
            ';' => {
                result.extend(std::iter::repeat_n('\\', backslashes * 2 + 1));
            }
            _ => result.extend(std::iter::repeat_n('\\', backslashes)),
        }
        backslashes = 0;
        result.push(c);
    }
    result.extend(std::iter::repeat_n('\\', backslashes));

    result
}

/// Escapes one value of a structured component.
///
/// Components share the text rules; commas inside a value are escaped on
/// 3.0 and later so they are not read back as value separators.
#[must_use]
pub fn escape_component(s: &str, version: VCardVersion) -> String {
    escape_text(s, version)
}

/// Escapes an argument value for vCard serialization.
///
/// Uses RFC 6868 caret encoding for special characters.
/// Returns `(value, needs_quotes)`.
#[must_use]
pub fn escape_param_value(s: &str) -> (String, bool) {
    let mut result = String::with_capacity(s.len());
    let mut needs_quotes = false;

    for c in s.chars() {
        match c {
            '^' => result.push_str("^^"),
            '\n' => result.push_str("^n"),
            '"' => {
                result.push_str("^'");
                needs_quotes = true;
            }
            ':' | ';' | ',' => {
                result.push(c);
                needs_quotes = true;
            }
            _ if c.is_control() => {
                // Skip other control characters
            }
            _ => result.push(c),
        }
    }

    (result, needs_quotes)
}

/// Encodes text as quoted-printable (vCard 2.1).
///
/// Printable ASCII other than `=` passes through, as do spaces and tabs
/// that are not trailing; every other byte becomes `=XX`.
#[must_use]
pub fn encode_quoted_printable(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut result = String::with_capacity(bytes.len() * 3 / 2);

    for (i, &b) in bytes.iter().enumerate() {
        let trailing = i + 1 == bytes.len();
        match b {
            b'=' => result.push_str("=3D"),
            b' ' | b'\t' if !trailing => result.push(char::from(b)),
            33..=126 => result.push(char::from(b)),
            _ => {
                write!(result, "={b:02X}").ok();
            }
        }
    }

    result
}
