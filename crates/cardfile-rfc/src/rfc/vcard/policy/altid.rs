//! ALTID resolution.

use cardfile_core::constants::ALTID_KEY;

use super::capability::{AltIdRule, Support};
use crate::rfc::vcard::core::Argument;
use crate::rfc::vcard::parse::{ParseError, ParseErrorKind, ParseResult};

/// Validates ALTID usage on one property and returns its value.
///
/// Instances sharing an ALTID are kept side by side; nothing is merged here.
///
/// ## Errors
/// Returns an [`ParseErrorKind::InvalidAltId`] error when ALTID is forbidden
/// for the property, is not the first argument, is the only argument, or is
/// not a non-negative integer.
pub fn resolve(
    property: &str,
    arguments: &[Argument],
    support: Support,
    line: usize,
) -> ParseResult<Option<u32>> {
    let Some(position) = arguments.iter().position(|a| a.is(ALTID_KEY)) else {
        return Ok(None);
    };
    let fail = |message: String| Err(ParseError::new(ParseErrorKind::InvalidAltId, line, message));

    if support.alt_id == AltIdRule::Forbidden {
        return fail(format!("ALTID is not allowed on {property}"));
    }
    if position != 0 {
        return fail("ALTID must be the first argument".to_string());
    }
    if arguments.len() < 2 {
        return fail(
            "ALTID must have one or more arguments to specify why this instance is an alternative"
                .to_string(),
        );
    }

    let raw = arguments[0].value().unwrap_or_default();
    match raw.parse::<u32>() {
        Ok(id) if !raw.starts_with('+') => Ok(Some(id)),
        _ => fail(format!("ALTID must be a non-negative integer, found {raw:?}")),
    }
}
