//! Line reconstruction: physical lines into records of logical lines.
//!
//! Handles folding (leading space or tab), vCard 2.1 quoted-printable soft
//! line breaks, record framing and raw capture of AGENT cards embedded as
//! nested `BEGIN:VCARD` blocks.

use cardfile_core::constants::{BEGIN_VCARD, END_VCARD};

use super::error::{ParseError, ParseErrorKind, ParseResult};
use super::lexer::{property_name, split_head};
use crate::rfc::vcard::core::{VCardVersion, names};

/// A property line after unfolding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    /// Physical line number of the first physical line (1-based).
    pub number: usize,
    /// Unfolded text.
    pub text: String,
    /// Raw text of an embedded card that followed an empty AGENT value.
    pub nested: Option<String>,
}

/// One record's lines, framed by BEGIN/END and with VERSION extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// Line of `BEGIN:VCARD`.
    pub begin_line: usize,
    pub version: VCardVersion,
    /// Property lines between VERSION and END, in order.
    pub lines: Vec<LogicalLine>,
}

/// Splits input into records.
///
/// ## Errors
/// Returns a structural error for missing `BEGIN:VCARD`, missing, misplaced
/// or unknown `VERSION`, input ending inside a record, or input with no
/// records at all.
pub fn split_records(input: &str) -> ParseResult<Vec<RawRecord>> {
    let mut cursor = LineCursor::new(input);
    let mut records = Vec::new();

    while let Some(first) = cursor.next_logical() {
        if !first.text.eq_ignore_ascii_case(BEGIN_VCARD) {
            return Err(ParseError::structural(
                ParseErrorKind::MissingBegin,
                first.number,
                format!("expected {BEGIN_VCARD}"),
            )
            .with_raw_line(first.text));
        }
        records.push(cursor.read_record(first.number)?);
    }

    if records.is_empty() {
        return Err(ParseError::structural(
            ParseErrorKind::EmptyInput,
            1,
            "no vCard records found",
        ));
    }

    tracing::trace!(count = records.len(), "Split records");
    Ok(records)
}

/// Cursor over physical lines.
struct LineCursor<'a> {
    physical: Vec<&'a str>,
    pos: usize,
}

impl<'a> LineCursor<'a> {
    fn new(input: &'a str) -> Self {
        let physical = input
            .lines()
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect();
        Self { physical, pos: 0 }
    }

    /// 1-based number of the next physical line.
    fn line_number(&self) -> usize {
        self.pos + 1
    }

    fn skip_blank(&mut self) {
        while self.physical.get(self.pos).is_some_and(|l| l.is_empty()) {
            self.pos += 1;
        }
    }

    /// Returns the next logical line, or `None` at end of input.
    fn next_logical(&mut self) -> Option<LogicalLine> {
        self.skip_blank();
        let number = self.line_number();
        let mut text = (*self.physical.get(self.pos)?).to_string();
        self.pos += 1;

        while let Some(&next) = self.physical.get(self.pos) {
            if let Some(rest) = next.strip_prefix([' ', '\t']) {
                // A folded quoted-printable line may also carry a soft break.
                if is_soft_break(&text) {
                    text.pop();
                }
                text.push_str(rest);
            } else if !next.is_empty() && is_soft_break(&text) {
                text.pop();
                text.push_str(next);
            } else {
                break;
            }
            self.pos += 1;
        }

        Some(LogicalLine {
            number,
            text,
            nested: None,
        })
    }

    /// Reads a record body after its `BEGIN:VCARD` line.
    fn read_record(&mut self, begin_line: usize) -> ParseResult<RawRecord> {
        let mut version: Option<VCardVersion> = None;
        let mut lines = Vec::new();
        let mut first = true;

        loop {
            let Some(mut line) = self.next_logical() else {
                return Err(ParseError::structural(
                    ParseErrorKind::UnexpectedEof,
                    self.line_number(),
                    format!("premature end of input: record started at line {begin_line} has no {END_VCARD}"),
                ));
            };

            if line.text.eq_ignore_ascii_case(END_VCARD) {
                break;
            }

            let name = property_name(&line.text);
            if name.is_some_and(|n| n.eq_ignore_ascii_case(names::VERSION)) {
                let parsed = parse_version(&line)?;
                if version.is_some() {
                    return Err(ParseError::structural(
                        ParseErrorKind::MisplacedVersion,
                        line.number,
                        "duplicate VERSION",
                    )
                    .with_raw_line(line.text));
                }
                if parsed.requires_leading_version() && !first {
                    return Err(ParseError::structural(
                        ParseErrorKind::MisplacedVersion,
                        line.number,
                        format!("VERSION:{parsed} must directly follow {BEGIN_VCARD}"),
                    )
                    .with_raw_line(line.text));
                }
                version = Some(parsed);
            } else {
                if name.is_some_and(|n| n.eq_ignore_ascii_case(names::AGENT))
                    && split_head(&line.text).is_some_and(|(_, value)| value.is_empty())
                {
                    line.nested = self.capture_nested()?;
                }
                lines.push(line);
            }
            first = false;
        }

        let version = version.ok_or_else(|| {
            ParseError::structural(
                ParseErrorKind::MissingVersion,
                begin_line,
                "record has no VERSION",
            )
        })?;

        Ok(RawRecord {
            begin_line,
            version,
            lines,
        })
    }

    /// Captures a nested `BEGIN:VCARD` ... `END:VCARD` block verbatim, if one
    /// starts at the next non-blank line.
    fn capture_nested(&mut self) -> ParseResult<Option<String>> {
        self.skip_blank();
        let starts_block = self
            .physical
            .get(self.pos)
            .is_some_and(|l| l.trim_end().eq_ignore_ascii_case(BEGIN_VCARD));
        if !starts_block {
            return Ok(None);
        }

        let start_line = self.line_number();
        let mut depth = 0usize;
        let mut block = String::new();

        while let Some(&raw) = self.physical.get(self.pos) {
            self.pos += 1;
            let trimmed = raw.trim_end();
            if trimmed.eq_ignore_ascii_case(BEGIN_VCARD) {
                depth += 1;
            } else if trimmed.eq_ignore_ascii_case(END_VCARD) {
                depth -= 1;
            }
            block.push_str(raw);
            block.push_str("\r\n");
            if depth == 0 {
                tracing::trace!(start_line, "Captured nested AGENT card");
                return Ok(Some(block));
            }
        }

        Err(ParseError::structural(
            ParseErrorKind::UnexpectedEof,
            self.line_number(),
            format!("premature end of input: nested card started at line {start_line} has no {END_VCARD}"),
        ))
    }
}

/// Whether a line in progress ends with a quoted-printable soft break.
fn is_soft_break(text: &str) -> bool {
    text.ends_with('=')
        && split_head(text).is_some_and(|(head, _)| {
            head.to_ascii_uppercase().contains("QUOTED-PRINTABLE")
        })
}

fn parse_version(line: &LogicalLine) -> ParseResult<VCardVersion> {
    let value = split_head(&line.text).map_or("", |(_, value)| value);
    VCardVersion::from_token(value).ok_or_else(|| {
        ParseError::structural(
            ParseErrorKind::UnsupportedVersion,
            line.number,
            format!("unsupported vCard version: {value:?}"),
        )
        .with_raw_line(line.text.as_str())
    })
}
