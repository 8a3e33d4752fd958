//! Required-field check run after a card is parsed.

use super::error::ValidationError;
use crate::rfc::vcard::core::{Card, FieldKind, PartsArrayKind, ScalarKind, VCardVersion, names};

const N: (&str, FieldKind) = (names::N, FieldKind::Repeatable(PartsArrayKind::Names));
const FN: (&str, FieldKind) = (names::FN, FieldKind::Scalar(ScalarKind::FullName));

/// Properties a card of `version` must carry.
#[must_use]
pub fn required_fields(version: VCardVersion) -> &'static [(&'static str, FieldKind)] {
    match version.major() {
        2 => &[N],
        4 => &[FN],
        _ => &[N, FN],
    }
}

/// Checks that every required property is present.
///
/// Embedded AGENT cards are checked when they are parsed, against their
/// own version.
///
/// ## Errors
/// Returns a [`ValidationError`] listing the required and the present
/// properties when any is missing.
pub fn validate(card: &Card, begin_line: usize) -> Result<(), ValidationError> {
    let required = required_fields(card.version());
    let actual: Vec<&'static str> = required
        .iter()
        .filter(|(_, field)| card.has(*field))
        .map(|(name, _)| *name)
        .collect();

    if actual.len() == required.len() {
        return Ok(());
    }

    tracing::debug!(
        version = %card.version(),
        missing = required.len() - actual.len(),
        "Card failed validation"
    );
    Err(ValidationError {
        version: card.version(),
        expected: required.iter().map(|(name, _)| *name).collect(),
        actual,
        line: begin_line,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rfc::vcard::core::{NameInfo, Part, PartValue};

    fn card(version: VCardVersion, with_fn: bool, with_n: bool) -> Card {
        let mut card = Card::new(version);
        if with_fn {
            card.set_scalar(ScalarKind::FullName, "Jane Doe".into());
        }
        if with_n {
            card.push_part(
                PartsArrayKind::Names,
                Part::new(PartValue::Name(NameInfo::simple("Doe", "Jane"))),
            );
        }
        card
    }

    #[test]
    fn required_sets_per_version() {
        assert!(validate(&card(VCardVersion::V2_1, false, true), 1).is_ok());
        assert!(validate(&card(VCardVersion::V4_0, true, false), 1).is_ok());
        assert!(validate(&card(VCardVersion::V3_0, true, true), 1).is_ok());
        assert!(validate(&card(VCardVersion::V5_0, true, true), 1).is_ok());
    }

    #[test]
    fn missing_fields_are_reported() {
        let err = validate(&card(VCardVersion::V2_1, true, false), 4).unwrap_err();
        assert_eq!(err.version, VCardVersion::V2_1);
        assert_eq!(err.expected, vec!["N"]);
        assert!(err.actual.is_empty());
        assert_eq!(err.line, 4);

        let err = validate(&card(VCardVersion::V3_0, false, true), 1).unwrap_err();
        assert_eq!(err.expected, vec!["N", "FN"]);
        assert_eq!(err.actual, vec!["N"]);

        let err = validate(&card(VCardVersion::V5_0, true, false), 1).unwrap_err();
        assert_eq!(err.actual, vec!["FN"]);
    }
}
