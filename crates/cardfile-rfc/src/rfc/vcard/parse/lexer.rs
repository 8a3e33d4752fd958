//! Property tokenizer: one logical line into group, name, arguments and value.

use cardfile_core::constants::{
    ARGUMENT_VALUE_DELIMITER, ENCODING_KEY, FIELD_DELIMITER, GROUP_DELIMITER, TYPE_KEY,
    VALUE_DELIMITER, VALUE_KEY, VALUE_LIST_DELIMITER,
};

use super::error::{ParseError, ParseErrorKind, ParseResult};
use super::lines::LogicalLine;
use crate::rfc::vcard::core::{Argument, VCardVersion};

/// A tokenized content line before value interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLine {
    /// Physical line number of the first line (1-based).
    pub line: usize,
    /// Property group (e.g., "item1" in "item1.TEL").
    pub group: Option<String>,
    /// Property name as written.
    pub name: String,
    /// Arguments in source order.
    pub args: Vec<Argument>,
    /// Raw value string.
    pub value: String,
    /// Raw text of an embedded AGENT card, if one followed this line.
    pub nested: Option<String>,
}

impl ContentLine {
    /// Returns all values of every argument with `key`, in order.
    #[must_use]
    pub fn argument_values(&self, key: &str) -> Vec<&str> {
        self.args
            .iter()
            .filter(|a| a.is(key))
            .flat_map(|a| a.values.iter().map(String::as_str))
            .collect()
    }

    /// Returns the first value of the first argument with `key`.
    #[must_use]
    pub fn argument(&self, key: &str) -> Option<&str> {
        self.args.iter().find(|a| a.is(key)).and_then(Argument::value)
    }
}

/// Parses a logical line into its components.
///
/// Format: `[group.]name[;arg[=value[,value]*]]*:value`
///
/// ## Errors
/// Returns a syntax error if the colon separator is missing, the group or
/// name is malformed, or an argument token is invalid for `version`.
pub fn parse_content_line(line: &LogicalLine, version: VCardVersion) -> ParseResult<ContentLine> {
    let syntax = |kind: ParseErrorKind, message: String| {
        ParseError::new(kind, line.number, message).with_raw_line(line.text.as_str())
    };

    let (head, value) = split_head(&line.text).ok_or_else(|| {
        syntax(
            ParseErrorKind::MissingValueSeparator,
            "missing colon separator".to_string(),
        )
    })?;

    let (qualified_name, args_str) = match head.split_once(FIELD_DELIMITER) {
        Some((name, args)) => (name, Some(args)),
        None => (head, None),
    };

    let (group, name) = match qualified_name.split_once(GROUP_DELIMITER) {
        Some((group, name)) => {
            if !is_token(group) {
                return Err(syntax(
                    ParseErrorKind::InvalidPropertyName,
                    format!("invalid group: {group:?}"),
                ));
            }
            (Some(group.to_string()), name)
        }
        None => (None, qualified_name),
    };

    if !is_token(name) {
        return Err(syntax(
            ParseErrorKind::InvalidPropertyName,
            format!("invalid property name: {name:?}"),
        ));
    }

    let args = match args_str {
        Some(s) => parse_arguments(s, version)
            .map_err(|message| syntax(ParseErrorKind::InvalidArgument, message))?,
        None => Vec::new(),
    };

    Ok(ContentLine {
        line: line.number,
        group,
        name: name.to_string(),
        args,
        value: value.to_string(),
        nested: line.nested.clone(),
    })
}

/// Splits a line on the first colon outside a quoted argument value.
#[must_use]
pub fn split_head(line: &str) -> Option<(&str, &str)> {
    let colon = find_value_separator(line)?;
    Some((&line[..colon], &line[colon + VALUE_DELIMITER.len_utf8()..]))
}

/// Finds the colon that separates name/arguments from value.
///
/// Must handle quoted argument values that may contain colons.
fn find_value_separator(line: &str) -> Option<usize> {
    let mut in_quotes = false;

    for (i, c) in line.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            VALUE_DELIMITER if !in_quotes => return Some(i),
            _ => {}
        }
    }

    None
}

/// Returns the property name of a line (group stripped), without validating it.
#[must_use]
pub fn property_name(line: &str) -> Option<&str> {
    let (head, _) = split_head(line)?;
    let name = head.split(FIELD_DELIMITER).next().unwrap_or(head);
    Some(
        name.split_once(GROUP_DELIMITER)
            .map_or(name, |(_, name)| name),
    )
}

fn is_token(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Parses the `;`-separated argument list.
fn parse_arguments(s: &str, version: VCardVersion) -> Result<Vec<Argument>, String> {
    split_quoted(s, FIELD_DELIMITER)
        .into_iter()
        .map(|token| parse_argument(token, version))
        .collect()
}

fn parse_argument(token: &str, version: VCardVersion) -> Result<Argument, String> {
    if token.is_empty() {
        return Err("empty argument".to_string());
    }

    match token.split_once(ARGUMENT_VALUE_DELIMITER) {
        Some((key, values)) => {
            if !is_token(key) {
                return Err(format!("invalid argument key: {key:?}"));
            }
            Ok(Argument::multi(key, parse_argument_values(values)))
        }
        None if version.major() == 2 => Ok(classify_bare(token)),
        None => Err(format!(
            "bare argument {token:?} is only allowed in vCard 2.1"
        )),
    }
}

/// Maps a vCard 2.1 bare argument token to its implied key.
fn classify_bare(token: &str) -> Argument {
    const ENCODINGS: &[&str] = &["BASE64", "B", "QUOTED-PRINTABLE", "8BIT", "7BIT"];
    const VALUES: &[&str] = &["INLINE", "URL", "CONTENT-ID", "CID"];

    let key = if ENCODINGS.iter().any(|e| e.eq_ignore_ascii_case(token)) {
        ENCODING_KEY
    } else if VALUES.iter().any(|v| v.eq_ignore_ascii_case(token)) {
        VALUE_KEY
    } else {
        TYPE_KEY
    };
    Argument::new(key, token)
}

/// Parses comma-separated argument values, removing quotes and decoding
/// RFC 6868 caret escapes.
fn parse_argument_values(s: &str) -> Vec<String> {
    split_quoted(s, VALUE_LIST_DELIMITER)
        .into_iter()
        .map(|raw| decode_caret(&raw.replace('"', "")))
        .collect()
}

fn decode_caret(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '^' {
            result.push(c);
            continue;
        }
        match chars.peek() {
            Some('n' | 'N') => {
                chars.next();
                result.push('\n');
            }
            Some('\'') => {
                chars.next();
                result.push('"');
            }
            Some('^') => {
                chars.next();
                result.push('^');
            }
            _ => result.push('^'),
        }
    }

    result
}

/// Splits on `delimiter` outside double quotes.
fn split_quoted(s: &str, delimiter: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            c if c == delimiter && !in_quotes => {
                parts.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }

    parts.push(&s[start..]);
    parts
}
