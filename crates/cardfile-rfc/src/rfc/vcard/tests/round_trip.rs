//! Round-trip parsing and serialization tests for vCard.
//!
//! These tests verify that cards can be parsed and serialized back without
//! losing information, and that serialization is stable.

use super::fixtures::*;
use crate::rfc::vcard::build::serialize;
use crate::rfc::vcard::core::{Card, PartsArrayKind};
use crate::rfc::vcard::parse::parse_cards;

/// Parse, serialize, then parse again and compare.
fn round_trip(input: &str) -> Result<(Vec<Card>, String), String> {
    let first = parse_cards(input).map_err(|e| format!("First parse failed: {e}"))?;

    let serialized = serialize(&first);

    let second =
        parse_cards(&serialized).map_err(|e| format!("Second parse failed: {e}\n{serialized}"))?;

    if first != second {
        return Err(format!(
            "Cards differ after round trip:\n{first:#?}\nvs\n{second:#?}\n{serialized}"
        ));
    }

    Ok((second, serialized))
}

#[test]
fn round_trip_every_fixture() {
    for (name, input) in ALL {
        if let Err(err) = round_trip(input) {
            panic!("{name}: {err}");
        }
    }
}

#[test]
fn serialization_is_idempotent() {
    for (name, input) in ALL {
        let (cards, serialized) = round_trip(input).unwrap_or_else(|err| panic!("{name}: {err}"));
        assert_eq!(serialize(&cards), serialized, "{name}");
    }
}

#[test]
fn serialized_lines_fit_the_fold_width() {
    for (name, input) in ALL {
        let (_, serialized) = round_trip(input).unwrap_or_else(|err| panic!("{name}: {err}"));
        for line in serialized.split("\r\n") {
            assert!(line.len() <= 75, "{name}: {line:?}");
        }
        assert!(serialized.ends_with("END:VCARD\r\n"), "{name}");
    }
}

#[test]
fn round_trip_multiple_cards() {
    let input = format!("{VCARD_BASIC}{VCARD_V3}{VCARD_V21}");
    let (cards, _) = round_trip(&input).expect("round trip should succeed");
    assert_eq!(cards.len(), 3);
}

#[test]
fn round_trip_keeps_altid_pairs() {
    let (cards, serialized) = round_trip(VCARD_ALTID).expect("round trip should succeed");
    assert!(serialized.contains("TITLE;ALTID=1;LANGUAGE=en:Boss\r\n"));
    assert!(serialized.contains("TITLE;ALTID=1;LANGUAGE=fr:Patronne\r\n"));
    assert_eq!(cards[0].get_repeatable(PartsArrayKind::Titles).len(), 2);
}

#[test]
fn round_trip_v21_layout() {
    let (cards, serialized) = round_trip(VCARD_V21).expect("round trip should succeed");
    assert!(serialized.contains("TEL;WORK;MSG:+1 (919) 555-1234\r\n"));
    assert!(serialized.contains("NOTE;ENCODING=QUOTED-PRINTABLE:"));
    assert!(serialized.contains("AGENT:\r\nBEGIN:VCARD\r\nVERSION:2.1\r\n"));
    assert_eq!(cards[0].nested_cards().len(), 1);
}

#[test]
fn round_trip_v3_agent_is_escaped() {
    let (cards, serialized) = round_trip(VCARD_V3).expect("round trip should succeed");
    let unfolded = serialized.replace("\r\n ", "");
    assert!(unfolded.contains("AGENT:BEGIN:VCARD\\nVERSION:3.0\\nFN:Susan Thomas\\n"));
    assert_eq!(cards[0].nested_cards()[0].full_name(), Some("Susan Thomas"));
}

#[test]
fn round_trip_normalizes_dates() {
    let (_, serialized) = round_trip(VCARD_V3).expect("round trip should succeed");
    assert!(serialized.contains("BDAY:19960415\r\n"));

    let (_, serialized) = round_trip(VCARD_AUTHOR).expect("round trip should succeed");
    assert!(serialized.contains("ANNIVERSARY:20090808T1430-0500\r\n"));
}

#[test]
fn round_trip_keeps_blob_padding_at_fold() {
    // Group prefixes shift the head so padding lands on every fold position.
    for group in ["", "a.", "ab.", "abc."] {
        for quads in 0..60 {
            let payload = format!("{}AA==", "AAAA".repeat(quads));
            let input = format!(
                "BEGIN:VCARD\r\nVERSION:3.0\r\nN:Doe;Jane\r\nFN:Jane Doe\r\n{group}PHOTO;ENCODING=b:{payload}\r\nEND:VCARD\r\n"
            );
            let (cards, _) =
                round_trip(&input).unwrap_or_else(|err| panic!("{group}{quads}: {err}"));
            let photo = cards[0].get_repeatable(PartsArrayKind::Photos)[0]
                .value
                .as_media()
                .unwrap();
            assert_eq!(photo.payload, payload, "{group}{quads}");
        }
    }
}

#[test]
fn round_trip_keeps_equals_runs() {
    for len in [1usize, 70, 71, 90, 200] {
        let note = "=".repeat(len);
        let input = format!("BEGIN:VCARD\r\nVERSION:4.0\r\nFN:x\r\nNOTE:{note}\r\nEND:VCARD\r\n");
        let (cards, _) = round_trip(&input).unwrap_or_else(|err| panic!("{len}: {err}"));
        assert_eq!(cards[0].note(), Some(note.as_str()), "{len}");
    }
}

#[test]
fn round_trip_keeps_leap_second() {
    let input = "BEGIN:VCARD\r\nVERSION:4.0\r\nFN:x\r\nANNIVERSARY:19981231T235960Z\r\nEND:VCARD\r\n";
    let (_, serialized) = round_trip(input).expect("round trip should succeed");
    assert!(serialized.contains("ANNIVERSARY:19981231T235960Z\r\n"), "{serialized}");
}
