//! vCard serialization.

use std::fmt::Write as _;

use cardfile_core::constants::{
    ALTID_ARGUMENT, BEGIN_VCARD, CHARSET_KEY, ENCODING_ARGUMENT, ENCODING_KEY, END_VCARD,
    LANGUAGE_KEY, TYPE_ARGUMENT, VALUE_ARGUMENT,
};

use super::escape::{encode_quoted_printable, escape_param_value, escape_text};
use super::fold::{fold_blob, fold_line};
use super::values::{RawValue, serialize_value};
use crate::rfc::vcard::core::{
    Argument, Card, PartMeta, PartValue, PartsArrayKind, ScalarKind, SingletonKind, VCardVersion,
    names,
};
use crate::rfc::vcard::policy::{PropertyDescriptor, registry};

/// Arguments that exist before 4.0 and are always written.
const TRANSPORT_KEYS: [&str; 3] = [ENCODING_KEY, CHARSET_KEY, LANGUAGE_KEY];

/// Serializes one or more cards to a string.
///
/// ## Summary
/// Writes each card in its own version's syntax, with escaping, folding and
/// CRLF line endings.
#[must_use]
pub fn serialize(cards: &[Card]) -> String {
    let mut output = String::new();

    for card in cards {
        serialize_card(card, &mut output);
    }

    output
}

/// Serializes a single card to a string.
#[must_use]
pub fn serialize_single(card: &Card) -> String {
    let mut output = String::new();
    serialize_card(card, &mut output);
    output
}

fn serialize_card(card: &Card, output: &mut String) {
    let version = card.version;

    output.push_str(BEGIN_VCARD);
    output.push_str("\r\n");
    write!(output, "{}:{version}\r\n", names::VERSION).ok();

    let plain = PartMeta::default();
    for kind in ScalarKind::ALL {
        if let Some(value) = card.scalars.get(&kind) {
            let descriptor = registry::descriptor_for(kind.into());
            let value = RawValue::Inline(escape_text(value, version));
            serialize_property(descriptor.name, descriptor, &plain, value, version, output);
        }
    }

    for kind in PartsArrayKind::ALL {
        let descriptor = registry::descriptor_for(kind.into());
        for part in card.parts.get(&kind).into_iter().flatten() {
            let name = match &part.value {
                PartValue::Extension(ext) => ext.name.as_str(),
                _ => descriptor.name,
            };
            let value = serialize_value(part, version);
            serialize_property(name, descriptor, &part.meta, value, version, output);
        }
    }

    for kind in SingletonKind::ALL {
        if let Some(part) = card.singletons.get(&kind) {
            let descriptor = registry::descriptor_for(kind.into());
            let value = serialize_value(part, version);
            serialize_property(descriptor.name, descriptor, &part.meta, value, version, output);
        }
    }

    output.push_str(END_VCARD);
    output.push_str("\r\n");
}

fn serialize_property(
    name: &str,
    descriptor: &PropertyDescriptor,
    meta: &PartMeta,
    value: RawValue,
    version: VCardVersion,
    output: &mut String,
) {
    let mut head = String::new();

    // Group prefix
    if let Some(group) = &meta.group {
        head.push_str(group);
        head.push('.');
    }
    head.push_str(name);

    let alt_id = meta.alt_id.filter(|_| version.major() >= 4);
    let mut args = String::new();

    serialize_types(&meta.element_types, version, &mut args);

    let default_value = descriptor.value_for(version);
    let explicit_value = !meta.value_type.is_empty()
        && !meta.value_type.eq_ignore_ascii_case(default_value);

    // ALTID needs a companion argument to be valid.
    let arguments: Vec<&Argument> = meta
        .arguments
        .iter()
        .filter(|a| version.major() >= 4 || TRANSPORT_KEYS.iter().any(|k| a.is(k)))
        .collect();
    let bare_alt_id = alt_id.is_some() && args.is_empty() && arguments.is_empty();

    if explicit_value || (bare_alt_id && !meta.value_type.is_empty()) {
        args.push(';');
        args.push_str(VALUE_ARGUMENT);
        args.push_str(&meta.value_type);
    }

    for arg in arguments {
        serialize_argument(&arg.key, &arg.values, &mut args);
    }

    if let Some(id) = alt_id {
        write!(head, ";{ALTID_ARGUMENT}{id}").ok();
    }
    head.push_str(&args);

    let has_encoding = meta.arguments.iter().any(|a| a.is(ENCODING_KEY));

    match value {
        RawValue::Inline(text) => {
            let text = if version.major() == 2 && text.contains(['\r', '\n']) {
                if !has_encoding {
                    write!(head, ";{ENCODING_ARGUMENT}QUOTED-PRINTABLE").ok();
                }
                encode_quoted_printable(&text)
            } else {
                text
            };
            output.push_str(&fold_line(&format!("{head}:{text}")));
            output.push_str("\r\n");
        }
        RawValue::Blob(payload) => {
            if !has_encoding {
                let encoding = if version.major() == 2 { "BASE64" } else { "b" };
                write!(head, ";{ENCODING_ARGUMENT}{encoding}").ok();
            }
            output.push_str(&fold_blob(&format!("{head}:{payload}")));
            output.push_str("\r\n");
            if version.major() == 2 {
                output.push_str("\r\n");
            }
        }
        RawValue::NestedBlock(block) => {
            output.push_str(&head);
            output.push_str(":\r\n");
            output.push_str(&block);
        }
    }
}

/// TYPE values: bare tokens on 2.1, one `TYPE=` list otherwise.
fn serialize_types(types: &[String], version: VCardVersion, output: &mut String) {
    if types.is_empty() {
        return;
    }

    if version.major() == 2 {
        for t in types {
            output.push(';');
            output.push_str(t);
        }
        return;
    }

    output.push(';');
    output.push_str(TYPE_ARGUMENT);
    push_argument_values(types, output);
}

fn serialize_argument(key: &str, values: &[String], output: &mut String) {
    output.push(';');
    output.push_str(key);
    output.push('=');
    push_argument_values(values, output);
}

fn push_argument_values(values: &[String], output: &mut String) {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            output.push(',');
        }

        let (escaped, needs_quotes) = escape_param_value(value);

        if needs_quotes {
            output.push('"');
            output.push_str(&escaped);
            output.push('"');
        } else {
            output.push_str(&escaped);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rfc::vcard::core::{
        AddressInfo, ExtensionInfo, MediaInfo, MediaSource, NameInfo, Part,
    };
    use crate::rfc::vcard::parse::parse_single;

    fn card(version: VCardVersion) -> Card {
        let mut card = Card::new(version);
        card.set_scalar(ScalarKind::FullName, "John Doe".into());
        card.push_part(
            PartsArrayKind::Names,
            Part::new(PartValue::Name(NameInfo::simple("Doe", "John"))),
        );
        card
    }

    fn text_part(value: &str) -> Part {
        let mut part = Part::new(PartValue::Text(value.into()));
        part.meta.value_type = "text".into();
        part
    }

    #[test]
    fn serialize_simple_vcard() {
        let output = serialize_single(&card(VCardVersion::V4_0));

        assert!(output.starts_with("BEGIN:VCARD\r\n"));
        assert!(output.contains("VERSION:4.0\r\n"));
        assert!(output.contains("FN:John Doe\r\n"));
        assert!(output.contains("N:Doe;John;;;\r\n"));
        assert!(output.ends_with("END:VCARD\r\n"));
    }

    #[test]
    fn serialize_v3_vcard() {
        let output = serialize_single(&card(VCardVersion::V3_0));
        assert!(output.contains("VERSION:3.0\r\n"));
        assert!(output.contains("N:Doe;John\r\n"));
    }

    #[test]
    fn scalars_parts_then_singletons() {
        let card = parse_single(
            "BEGIN:VCARD\r\nVERSION:4.0\r\nBDAY:19850412\r\nTEL:+1\r\nNOTE:n\r\nFN:x\r\nEND:VCARD\r\n",
        )
        .unwrap();
        let output = serialize_single(&card);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines,
            vec!["BEGIN:VCARD", "VERSION:4.0", "FN:x", "NOTE:n", "TEL:+1", "BDAY:19850412", "END:VCARD"]
        );
    }

    #[test]
    fn serialize_with_group() {
        let mut card = card(VCardVersion::V4_0);
        let mut tel = text_part("+1-555-555-5555");
        tel.meta.group = Some("item1".into());
        card.push_part(PartsArrayKind::Telephones, tel);

        let output = serialize_single(&card);
        assert!(output.contains("item1.TEL:+1-555-555-5555\r\n"));
    }

    #[test]
    fn serialize_with_arguments() {
        let mut card = card(VCardVersion::V4_0);
        let mut tel = Part::new(PartValue::Text("+1-555-555-5555".into()));
        tel.meta.element_types = vec!["home".into(), "cell".into()];
        tel.meta.value_type = "text".into();
        tel.meta.arguments.push(Argument::pref(1));
        card.push_part(PartsArrayKind::Telephones, tel);

        let output = serialize_single(&card);
        assert!(output.contains("TEL;TYPE=home,cell;PREF=1:+1-555-555-5555\r\n"));
    }

    #[test]
    fn default_value_type_is_omitted() {
        let mut card = card(VCardVersion::V3_0);
        let mut tel = Part::new(PartValue::Text("+1".into()));
        tel.meta.value_type = "phone-number".into();
        card.push_part(PartsArrayKind::Telephones, tel);

        assert!(serialize_single(&card).contains("\r\nTEL:+1\r\n"));
    }

    #[test]
    fn extra_arguments_need_four() {
        let mut title = text_part("Boss");
        title.meta.value_type = String::new();
        title.meta.alt_id = Some(1);
        title.meta.arguments.push(Argument::language("en"));
        title.meta.arguments.push(Argument::pref(1));

        let mut v4 = card(VCardVersion::V4_0);
        v4.push_part(PartsArrayKind::Titles, title.clone());
        assert!(serialize_single(&v4).contains("TITLE;ALTID=1;LANGUAGE=en;PREF=1:Boss\r\n"));

        let mut v3 = card(VCardVersion::V3_0);
        v3.push_part(PartsArrayKind::Titles, title);
        assert!(serialize_single(&v3).contains("TITLE;LANGUAGE=en:Boss\r\n"));
    }

    #[test]
    fn lone_altid_gets_a_value_argument() {
        let mut card = card(VCardVersion::V4_0);
        let mut title = text_part("Boss");
        title.meta.alt_id = Some(2);
        card.push_part(PartsArrayKind::Titles, title);

        assert!(serialize_single(&card).contains("TITLE;ALTID=2;VALUE=text:Boss\r\n"));
    }

    #[test]
    fn legacy_types_are_bare_tokens() {
        let mut card = card(VCardVersion::V2_1);
        let mut tel = Part::new(PartValue::Text("+1".into()));
        tel.meta.element_types = vec!["HOME".into(), "CELL".into()];
        card.push_part(PartsArrayKind::Telephones, tel);

        assert!(serialize_single(&card).contains("TEL;HOME;CELL:+1\r\n"));
    }

    #[test]
    fn serialize_escapes_text() {
        let mut card = card(VCardVersion::V4_0);
        card.scalars.insert(
            ScalarKind::Notes,
            "Line1\nLine2; with special, chars".into(),
        );

        let output = serialize_single(&card);
        assert!(output.contains("NOTE:Line1\\nLine2\\; with special\\, chars\r\n"));
    }

    #[test]
    fn legacy_line_breaks_use_quoted_printable() {
        let mut card = card(VCardVersion::V2_1);
        card.scalars.insert(ScalarKind::Notes, "Line1\r\nLine2=x".into());

        let output = serialize_single(&card);
        assert!(output.contains("NOTE;ENCODING=QUOTED-PRINTABLE:Line1=0D=0ALine2=3Dx\r\n"));
    }

    #[test]
    fn serialize_address() {
        let mut card = card(VCardVersion::V4_0);
        let mut adr = Part::new(PartValue::Address(AddressInfo {
            street: vec!["123 Main St".into()],
            locality: vec!["Anytown".into()],
            ..AddressInfo::default()
        }));
        adr.meta.element_types = vec!["work".into()];
        card.push_part(PartsArrayKind::Addresses, adr);

        assert!(serialize_single(&card).contains("ADR;TYPE=work:;;123 Main St;Anytown;;;\r\n"));
    }

    #[test]
    fn extension_keeps_its_name() {
        let mut card = card(VCardVersion::V4_0);
        card.push_part(
            PartsArrayKind::Extensions,
            Part::new(PartValue::Extension(ExtensionInfo {
                name: "X-Skype".into(),
                values: vec!["johndoe".into()],
            })),
        );

        assert!(serialize_single(&card).contains("X-Skype:johndoe\r\n"));
    }

    #[test]
    fn blobs_fold_every_74_and_declare_encoding() {
        let mut card = card(VCardVersion::V3_0);
        card.push_part(
            PartsArrayKind::Photos,
            Part::new(PartValue::Media(MediaInfo {
                payload: "A".repeat(200),
                source: MediaSource::Blob,
            })),
        );

        let output = serialize_single(&card);
        let photo: Vec<&str> = output
            .split("\r\n")
            .skip_while(|l| !l.starts_with("PHOTO"))
            .take_while(|l| !l.starts_with("END"))
            .collect();
        assert!(photo[0].starts_with("PHOTO;ENCODING=b:"));
        assert_eq!(photo[0].len(), 74);
        assert!(photo[1..].iter().all(|l| l.starts_with(' ') && l.len() <= 75));
    }

    #[test]
    fn legacy_blob_is_followed_by_blank_line() {
        let mut card = card(VCardVersion::V2_1);
        card.push_part(
            PartsArrayKind::Photos,
            Part::new(PartValue::Media(MediaInfo {
                payload: "aGVsbG8=".into(),
                source: MediaSource::Blob,
            })),
        );

        let output = serialize_single(&card);
        assert!(output.contains("PHOTO;ENCODING=BASE64:aGVsbG8=\r\n\r\nEND:VCARD\r\n"));
    }

    #[test]
    fn serialize_multiple_vcards() {
        let cards = vec![card(VCardVersion::V4_0), card(VCardVersion::V3_0)];

        let output = serialize(&cards);

        assert_eq!(output.matches("BEGIN:VCARD").count(), 2);
        assert_eq!(output.matches("END:VCARD").count(), 2);
    }

    #[test]
    fn serialize_folds_long_lines() {
        let mut card = card(VCardVersion::V4_0);
        card.scalars.insert(ScalarKind::Notes, "X".repeat(100));

        let output = serialize_single(&card);
        assert!(output.contains("\r\n "));
        assert!(output.split("\r\n").all(|l| l.len() <= 75));
    }
}
