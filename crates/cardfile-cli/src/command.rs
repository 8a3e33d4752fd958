//! Subcommand bodies, kept apart from argument handling and I/O.

use anyhow::Context;
use cardfile_rfc::error::{VCardError, VCardResult};
use cardfile_rfc::rfc::vcard::{Card, ParseOptions, parse_cards_with, serialize};

/// Outcome of checking one document.
#[derive(Debug)]
pub enum CheckReport {
    Valid { cards: usize },
    Invalid(VCardError),
}

impl CheckReport {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    /// One-line summary for `source`.
    #[must_use]
    pub fn describe(&self, source: &str) -> String {
        match self {
            Self::Valid { cards } => format!("{source}: ok ({cards} card(s))"),
            Self::Invalid(err) => {
                let class = err
                    .class()
                    .map_or_else(|| "io".to_string(), |c| format!("{c:?}").to_lowercase());
                match err.line() {
                    Some(line) => format!("{source}:{line}: {class}: {err}"),
                    None => format!("{source}: {class}: {err}"),
                }
            }
        }
    }
}

/// Parses `input` and reports whether it is a usable vCard document.
#[tracing::instrument(skip(input), fields(input_len = input.len()))]
#[must_use]
pub fn check(input: &str, options: ParseOptions) -> CheckReport {
    match parse_cards_with(input, options) {
        Ok(cards) => CheckReport::Valid { cards: cards.len() },
        Err(err) => {
            tracing::debug!(error = %err, "Document rejected");
            CheckReport::Invalid(err)
        }
    }
}

/// Re-serializes `input` in canonical form.
///
/// ## Errors
/// Returns the parse or validation error when `input` is rejected.
pub fn format(input: &str, options: ParseOptions) -> VCardResult<String> {
    let cards = parse_cards_with(input, options)?;
    Ok(serialize(&cards))
}

/// Renders the parsed cards as pretty JSON.
///
/// ## Errors
/// Returns an error when `input` is rejected or the cards cannot be rendered.
pub fn dump(input: &str, options: ParseOptions) -> anyhow::Result<String> {
    let cards: Vec<Card> = parse_cards_with(input, options)?;
    serde_json::to_string_pretty(&cards).context("Failed to render cards as JSON")
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARD: &str = "BEGIN:VCARD\r\nVERSION:4.0\r\nFN:Jane Doe\r\nEND:VCARD\r\n";

    #[test_log::test]
    fn check_counts_cards() {
        let report = check(&format!("{CARD}{CARD}"), ParseOptions::default());
        assert!(report.is_valid());
        assert_eq!(report.describe("a.vcf"), "a.vcf: ok (2 card(s))");
    }

    #[test_log::test]
    fn check_reports_class_and_line() {
        let input = "BEGIN:VCARD\r\nVERSION:9.9\r\nEND:VCARD\r\n";
        let report = check(input, ParseOptions::default());
        assert!(!report.is_valid());

        let line = report.describe("b.vcf");
        assert!(line.starts_with("b.vcf:2: "), "{line}");
    }

    #[test_log::test]
    fn validation_can_be_disabled() {
        let input = "BEGIN:VCARD\r\nVERSION:4.0\r\nNOTE:no name\r\nEND:VCARD\r\n";
        assert!(!check(input, ParseOptions::default()).is_valid());

        let options = ParseOptions {
            validate: false,
            ..ParseOptions::default()
        };
        assert!(check(input, options).is_valid());
    }

    #[test_log::test]
    fn format_is_canonical() {
        let input = "begin:vcard\nversion:4.0\nfn:Jane Doe\nend:vcard\n";
        assert_eq!(format(input, ParseOptions::default()).unwrap(), CARD);
    }

    #[test_log::test]
    fn dump_renders_json() {
        let json = dump(CARD, ParseOptions::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["scalars"]["FullName"], "Jane Doe");
    }
}
