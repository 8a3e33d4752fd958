//! Tests for vCard parse errors.

use super::error::{ErrorClass, ParseError, ParseErrorKind, ValidationError};
use super::parse_cards;
use crate::error::VCardError;
use crate::rfc::vcard::core::VCardVersion;

fn parse_error(input: &str) -> ParseError {
    match parse_cards(input) {
        Err(VCardError::Parse(err)) => err,
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn error_new() {
    let err = ParseError::new(ParseErrorKind::UnexpectedEof, 5, "test message");
    assert_eq!(err.line, 5);
    assert_eq!(err.kind, ParseErrorKind::UnexpectedEof);
    assert_eq!(err.message, "test message");
    assert_eq!(err.raw_line, None);
}

#[test]
fn error_invalid_value() {
    let err = ParseError::invalid_value(7, "malformed phone number");
    assert_eq!(err.line, 7);
    assert_eq!(err.kind, ParseErrorKind::InvalidValue);
    assert_eq!(err.message, "malformed phone number");
}

#[test]
fn error_display() {
    let err = ParseError::new(ParseErrorKind::InvalidDateTime, 12, "bad date");
    let displayed = format!("{err}");
    assert!(displayed.contains("line 12"));
    assert!(displayed.contains("invalid date/time"));
    assert!(displayed.contains("bad date"));

    let err = err.with_raw_line("BDAY:soon");
    assert!(format!("{err}").ends_with("(in `BDAY:soon`)"));
}

#[test]
fn error_kind_display() {
    assert_eq!(
        format!("{}", ParseErrorKind::UnexpectedEof),
        "unexpected end of input"
    );
    assert_eq!(format!("{}", ParseErrorKind::InvalidValue), "invalid value");
    assert_eq!(
        format!("{}", ParseErrorKind::MissingValueSeparator),
        "missing value separator"
    );
    assert_eq!(format!("{}", ParseErrorKind::InvalidAltId), "invalid ALTID");
}

#[test]
fn error_classes() {
    assert_eq!(ParseErrorKind::InvalidArgument.class(), ErrorClass::Syntax);
    assert_eq!(ParseErrorKind::EncodingError.class(), ErrorClass::Semantic);
    assert_eq!(ParseErrorKind::InvalidAltId.class(), ErrorClass::Semantic);
    assert_eq!(ParseErrorKind::MisplacedVersion.class(), ErrorClass::Structural);
    assert_eq!(ParseErrorKind::EmptyInput.class(), ErrorClass::Structural);
}

#[test]
fn relocate_keeps_original_position() {
    let err = ParseError::new(ParseErrorKind::InvalidValue, 3, "bad")
        .with_raw_line("X:1")
        .relocate(10, "AGENT:");
    assert_eq!(err.line, 10);
    assert_eq!(err.message, "in nested card at line 3: bad");
    assert_eq!(err.raw_line.as_deref(), Some("AGENT:"));
    assert_eq!(err.kind, ParseErrorKind::InvalidValue);
}

#[test]
fn validation_error_display() {
    let err = ValidationError {
        version: VCardVersion::V3_0,
        expected: vec!["N", "FN"],
        actual: vec!["FN"],
        line: 1,
    };
    let displayed = err.to_string();
    assert!(displayed.contains("3.0"));
    assert!(displayed.contains("[\"N\", \"FN\"]"));
    assert!(displayed.contains("[\"FN\"]"));
}

#[test]
fn missing_begin() {
    let err = parse_error("VERSION:4.0\r\nFN:John\r\nEND:VCARD\r\n");
    assert_eq!(err.kind, ParseErrorKind::MissingBegin);
    assert_eq!(err.line, 1);
}

#[test]
fn unclosed_card() {
    let err = parse_error("BEGIN:VCARD\r\nVERSION:4.0\r\nFN:John\r\n");
    assert_eq!(err.kind, ParseErrorKind::UnexpectedEof);
    assert_eq!(err.class(), ErrorClass::Structural);
}

#[test]
fn empty_input() {
    assert_eq!(parse_error("").kind, ParseErrorKind::EmptyInput);
    assert_eq!(parse_error("\r\n\r\n").kind, ParseErrorKind::EmptyInput);
}

#[test]
fn unsupported_version() {
    for token in ["4", "2.0", " 4.0", "6.0"] {
        let err = parse_error(&format!("BEGIN:VCARD\r\nVERSION:{token}\r\nFN:x\r\nEND:VCARD\r\n"));
        assert_eq!(err.kind, ParseErrorKind::UnsupportedVersion, "{token:?}");
        assert_eq!(err.line, 2);
    }
}

#[test]
fn missing_and_misplaced_version() {
    let err = parse_error("BEGIN:VCARD\r\nFN:John\r\nEND:VCARD\r\n");
    assert_eq!(err.kind, ParseErrorKind::MissingVersion);

    let err = parse_error("BEGIN:VCARD\r\nFN:John\r\nVERSION:4.0\r\nEND:VCARD\r\n");
    assert_eq!(err.kind, ParseErrorKind::MisplacedVersion);
    assert_eq!(err.line, 3);
}

#[test]
fn late_version_is_fine_before_four() {
    let cards = parse_cards("BEGIN:VCARD\r\nN:Doe;John\r\nVERSION:2.1\r\nEND:VCARD\r\n").unwrap();
    assert_eq!(cards[0].version(), VCardVersion::V2_1);
}

#[test]
fn missing_colon_reports_line_and_text() {
    let err = parse_error("BEGIN:VCARD\r\nVERSION:4.0\r\nFN John\r\nEND:VCARD\r\n");
    assert_eq!(err.kind, ParseErrorKind::MissingValueSeparator);
    assert_eq!(err.line, 3);
    assert_eq!(err.raw_line.as_deref(), Some("FN John"));
}

#[test]
fn bare_argument_outside_two_one() {
    let err = parse_error("BEGIN:VCARD\r\nVERSION:3.0\r\nTEL;HOME:555\r\nEND:VCARD\r\n");
    assert_eq!(err.kind, ParseErrorKind::InvalidArgument);
    assert_eq!(err.class(), ErrorClass::Syntax);
}

#[test]
fn altid_errors() {
    let base = |line: &str| format!("BEGIN:VCARD\r\nVERSION:4.0\r\nFN:x\r\n{line}\r\nEND:VCARD\r\n");

    let err = parse_error(&base("TITLE;LANGUAGE=en;ALTID=1:Boss"));
    assert_eq!(err.kind, ParseErrorKind::InvalidAltId);
    assert_eq!(err.message, "ALTID must be the first argument");
    assert_eq!(err.line, 4);

    let err = parse_error(&base("TITLE;ALTID=1:Boss"));
    assert_eq!(
        err.message,
        "ALTID must have one or more arguments to specify why this instance is an alternative"
    );

    let err = parse_error(&base("TITLE;ALTID=-1;LANGUAGE=en:Boss"));
    assert_eq!(err.kind, ParseErrorKind::InvalidAltId);

    let err = parse_error(&base("UID;ALTID=1;VALUE=text:abc"));
    assert_eq!(err.kind, ParseErrorKind::InvalidAltId);
}

#[test]
fn invalid_values_are_semantic() {
    let err = parse_error("BEGIN:VCARD\r\nVERSION:4.0\r\nFN:x\r\nBDAY:19901301\r\nEND:VCARD\r\n");
    assert_eq!(err.kind, ParseErrorKind::InvalidDateTime);
    assert_eq!(err.class(), ErrorClass::Semantic);
    assert_eq!(err.raw_line.as_deref(), Some("BDAY:19901301"));
}

#[test]
fn non_ascii_dates_are_rejected() {
    for value in ["199\u{e9}101", "--1\u{e9}1", "19900101T1\u{e9}30", "19900101T1030+0\u{e9}0"] {
        let input = format!("BEGIN:VCARD\r\nVERSION:4.0\r\nFN:x\r\nBDAY:{value}\r\nEND:VCARD\r\n");
        let err = parse_error(&input);
        assert_eq!(err.kind, ParseErrorKind::InvalidDateTime, "{value}");
        assert_eq!(err.line, 4, "{value}");
    }
}

#[test]
fn hour_twenty_four_is_rejected() {
    let err = parse_error("BEGIN:VCARD\r\nVERSION:4.0\r\nFN:x\r\nBDAY:19900101T240000\r\nEND:VCARD\r\n");
    assert_eq!(err.kind, ParseErrorKind::InvalidDateTime);
}

#[test]
fn validation_is_a_separate_error() {
    let err = parse_cards("BEGIN:VCARD\r\nVERSION:2.1\r\nFN:John\r\nEND:VCARD\r\n").unwrap_err();
    let VCardError::Validation(err) = err else {
        panic!("expected validation error, got {err:?}");
    };
    assert_eq!(err.version, VCardVersion::V2_1);
    assert_eq!(err.expected, vec!["N"]);
    assert!(err.actual.is_empty());
}
