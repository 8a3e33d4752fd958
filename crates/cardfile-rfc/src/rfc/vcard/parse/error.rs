//! Parse and validation error types.

use std::fmt;

use crate::rfc::vcard::core::VCardVersion;

/// Result type for vCard parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// An error that occurred during vCard parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// The kind of error.
    pub kind: ParseErrorKind,
    /// Physical line number where the error occurred (1-based).
    pub line: usize,
    /// Additional context or message.
    pub message: String,
    /// The logical line being processed, when there was one.
    pub raw_line: Option<String>,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(kind: ParseErrorKind, line: usize, message: impl Into<String>) -> Self {
        Self {
            kind,
            line,
            message: message.into(),
            raw_line: None,
        }
    }

    /// Attaches the offending line text.
    #[must_use]
    pub fn with_raw_line(mut self, raw_line: impl Into<String>) -> Self {
        self.raw_line = Some(raw_line.into());
        self
    }

    /// Moves the error to `line`, keeping the original position in the message.
    ///
    /// Used when an embedded card fails: the error is reported at the
    /// AGENT property that carried it.
    #[must_use]
    pub fn relocate(self, line: usize, raw_line: impl Into<String>) -> Self {
        Self {
            kind: self.kind,
            line,
            message: format!("in nested card at line {}: {}", self.line, self.message),
            raw_line: Some(raw_line.into()),
        }
    }

    /// Creates an invalid value error.
    #[must_use]
    pub fn invalid_value(line: usize, message: impl Into<String>) -> Self {
        Self::new(ParseErrorKind::InvalidValue, line, message)
    }

    /// Creates a structural error.
    #[must_use]
    pub fn structural(kind: ParseErrorKind, line: usize, message: impl Into<String>) -> Self {
        debug_assert_eq!(kind.class(), ErrorClass::Structural);
        Self::new(kind, line, message)
    }

    /// The broad class of this error.
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        self.kind.class()
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}: {}", self.line, self.kind, self.message)?;
        if let Some(raw) = &self.raw_line {
            write!(f, " (in `{raw}`)")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// The kind of parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// No unquoted `:` between the property head and its value.
    MissingValueSeparator,
    /// Invalid property name or group.
    InvalidPropertyName,
    /// Malformed argument token.
    InvalidArgument,
    /// Invalid property value.
    InvalidValue,
    /// Structured value with the wrong shape.
    InvalidStructuredValue,
    /// Invalid date or time.
    InvalidDateTime,
    /// Undecodable content (base64, quoted-printable).
    EncodingError,
    /// ALTID misuse.
    InvalidAltId,
    /// Record does not start with BEGIN:VCARD.
    MissingBegin,
    /// VERSION absent.
    MissingVersion,
    /// VERSION not directly after BEGIN where required.
    MisplacedVersion,
    /// Unknown VERSION token.
    UnsupportedVersion,
    /// Input ended inside a record.
    UnexpectedEof,
    /// No records at all.
    EmptyInput,
}

/// Broad error classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Malformed line grammar.
    Syntax,
    /// Well-formed line with an unacceptable value or argument.
    Semantic,
    /// Record framing problems.
    Structural,
    /// Required fields missing.
    Validation,
}

impl ParseErrorKind {
    /// Returns the class of this kind.
    #[must_use]
    pub const fn class(self) -> ErrorClass {
        match self {
            Self::MissingValueSeparator | Self::InvalidPropertyName | Self::InvalidArgument => {
                ErrorClass::Syntax
            }
            Self::InvalidValue
            | Self::InvalidStructuredValue
            | Self::InvalidDateTime
            | Self::EncodingError
            | Self::InvalidAltId => ErrorClass::Semantic,
            Self::MissingBegin
            | Self::MissingVersion
            | Self::MisplacedVersion
            | Self::UnsupportedVersion
            | Self::UnexpectedEof
            | Self::EmptyInput => ErrorClass::Structural,
        }
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingValueSeparator => write!(f, "missing value separator"),
            Self::InvalidPropertyName => write!(f, "invalid property name"),
            Self::InvalidArgument => write!(f, "invalid argument"),
            Self::InvalidValue => write!(f, "invalid value"),
            Self::InvalidStructuredValue => write!(f, "invalid structured value"),
            Self::InvalidDateTime => write!(f, "invalid date/time"),
            Self::EncodingError => write!(f, "encoding error"),
            Self::InvalidAltId => write!(f, "invalid ALTID"),
            Self::MissingBegin => write!(f, "missing BEGIN"),
            Self::MissingVersion => write!(f, "missing VERSION"),
            Self::MisplacedVersion => write!(f, "misplaced VERSION"),
            Self::UnsupportedVersion => write!(f, "unsupported version"),
            Self::UnexpectedEof => write!(f, "unexpected end of input"),
            Self::EmptyInput => write!(f, "empty input"),
        }
    }
}

/// Required fields missing after a card was parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("vCard {version} requires {expected:?}, found {actual:?} (card starting at line {line})")]
pub struct ValidationError {
    pub version: VCardVersion,
    /// Required property names for the version.
    pub expected: Vec<&'static str>,
    /// Required property names actually present.
    pub actual: Vec<&'static str>,
    /// Line of the card's BEGIN.
    pub line: usize,
}
