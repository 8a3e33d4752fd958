use thiserror::Error;

use crate::rfc::vcard::parse::{ErrorClass, ParseError, ValidationError};

/// vCard parsing, validation and I/O errors
#[derive(Error, Debug)]
pub enum VCardError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl VCardError {
    /// Error class, or `None` for I/O failures.
    #[must_use]
    pub fn class(&self) -> Option<ErrorClass> {
        match self {
            Self::Parse(err) => Some(err.class()),
            Self::Validation(_) => Some(ErrorClass::Validation),
            Self::Io(_) => None,
        }
    }

    /// Line the error refers to, when it comes from the input text.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Parse(err) => Some(err.line),
            Self::Validation(err) => Some(err.line),
            Self::Io(_) => None,
        }
    }
}

pub type VCardResult<T> = std::result::Result<T, VCardError>;
