//! Raw value -> typed value, one converter per property semantic.

use quick_xml::Reader;
use quick_xml::events::Event;

use cardfile_core::constants::BEGIN_VCARD;

use super::error::{ParseError, ParseErrorKind, ParseResult};
use super::values::{parse_date_and_or_time, split_component, split_structured, unescape_text};
use crate::rfc::vcard::core::{
    AddressInfo, AgentInfo, ClientPidMapInfo, ExtensionInfo, GenderInfo, MediaInfo, MediaSource,
    NameInfo, OrganizationInfo, PartValue, Sex, VCardVersion, decode_base64,
};
use crate::rfc::vcard::policy::{Converter, PropertyDescriptor};

/// Result of converting one raw value.
#[derive(Debug, Clone, PartialEq)]
pub enum Converted {
    /// Plain text for a scalar field.
    Scalar(String),
    /// Typed value for a repeatable or singleton field.
    Part(PartValue),
}

/// Per-line inputs to a converter.
#[derive(Debug, Clone, Copy)]
pub struct ValueContext<'a> {
    /// Property name as written.
    pub property: &'a str,
    pub line: usize,
    pub version: VCardVersion,
    /// Effective VALUE type.
    pub value_type: &'a str,
    /// Whether an ENCODING argument was given.
    pub encoded: bool,
}

impl ValueContext<'_> {
    fn error(&self, kind: ParseErrorKind, detail: impl std::fmt::Display, raw: &str) -> ParseError {
        ParseError::new(
            kind,
            self.line,
            format!("{}: {detail} in {raw:?}", self.property),
        )
    }

    fn invalid(&self, detail: impl std::fmt::Display, raw: &str) -> ParseError {
        ParseError::invalid_value(self.line, format!("{}: {detail} in {raw:?}", self.property))
    }

    fn value_is(&self, candidates: &[&str]) -> bool {
        candidates
            .iter()
            .any(|c| self.value_type.eq_ignore_ascii_case(c))
    }
}

/// Converts a raw value according to the descriptor's converter.
///
/// AGENT values are only handled here when they are references; embedded
/// cards are recognized with [`embedded_agent`] and parsed by the engine.
///
/// ## Errors
/// Returns a semantic error carrying the property name and raw value when
/// the value does not fit the converter.
pub fn convert(
    descriptor: &PropertyDescriptor,
    raw: &str,
    ctx: &ValueContext<'_>,
) -> ParseResult<Converted> {
    let version = ctx.version;
    let value = match descriptor.converter {
        Converter::Scalar => {
            let text = unescape_text(raw, version);
            if !text.is_empty() && !descriptor.allows(&text) {
                return Err(ctx.invalid("value not allowed", raw));
            }
            return Ok(Converted::Scalar(text));
        }
        Converter::Name => PartValue::Name(parse_name(raw, ctx)?),
        Converter::Address => PartValue::Address(parse_address(raw, ctx)?),
        Converter::Label => PartValue::Label(unescape_text(raw, version)),
        Converter::Organization => PartValue::Organization(parse_organization(raw, ctx)?),
        Converter::Text => PartValue::Text(unescape_text(raw, version)),
        Converter::TextList => PartValue::TextList(split_component(raw, version)),
        Converter::Media => PartValue::Media(parse_media(raw, ctx, false)?),
        Converter::Key => PartValue::Key(parse_media(raw, ctx, true)?),
        Converter::Geo => PartValue::Geo(raw.to_string()),
        Converter::TimeZone => PartValue::TimeZone(raw.to_string()),
        Converter::Gender => PartValue::Gender(parse_gender(raw, ctx)?),
        Converter::ClientPidMap => PartValue::ClientPidMap(parse_client_pid_map(raw, ctx)?),
        Converter::DateTime => PartValue::DateTime(
            parse_date_and_or_time(raw, Some(ctx.value_type), ctx.line).map_err(|err| {
                ctx.error(ParseErrorKind::InvalidDateTime, err.message, raw)
            })?,
        ),
        Converter::Xml => PartValue::Xml(parse_xml(raw, ctx)?),
        Converter::Agent => PartValue::Agent(agent_reference(raw, ctx)),
        Converter::Extension => PartValue::Extension(ExtensionInfo {
            name: ctx.property.to_string(),
            values: split_structured(raw).into_iter().map(str::to_string).collect(),
        }),
    };
    Ok(Converted::Part(value))
}

/// Returns the vCard text embedded in an AGENT value, if it holds one.
///
/// A captured 2.1 block wins; otherwise the unescaped value must start with
/// `BEGIN:VCARD` and not be declared a URI.
#[must_use]
pub fn embedded_agent(raw: &str, nested: Option<&str>, ctx: &ValueContext<'_>) -> Option<String> {
    if let Some(block) = nested {
        return Some(block.to_string());
    }
    if ctx.value_is(&["uri", "url"]) {
        return None;
    }
    let text = unescape_text(raw, ctx.version);
    text.get(..BEGIN_VCARD.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(BEGIN_VCARD))
        .then_some(text)
}

fn agent_reference(raw: &str, ctx: &ValueContext<'_>) -> AgentInfo {
    let uri = if raw.is_empty() {
        None
    } else if ctx.value_is(&["uri", "url"]) {
        Some(raw.to_string())
    } else {
        Some(unescape_text(raw, ctx.version))
    };
    AgentInfo {
        cards: Vec::new(),
        uri,
    }
}

fn parse_name(raw: &str, ctx: &ValueContext<'_>) -> ParseResult<NameInfo> {
    let parts = split_structured(raw);
    if parts.len() < 2 {
        return Err(ctx.error(
            ParseErrorKind::InvalidStructuredValue,
            "expected at least family and given name components",
            raw,
        ));
    }

    let component = |i: usize| {
        parts
            .get(i)
            .map(|s| split_component(s, ctx.version))
            .unwrap_or_default()
    };

    Ok(NameInfo {
        family: component(0),
        given: component(1),
        additional: component(2),
        prefixes: component(3),
        suffixes: component(4),
    })
}

fn parse_address(raw: &str, ctx: &ValueContext<'_>) -> ParseResult<AddressInfo> {
    let parts = split_structured(raw);
    let [po_box, extended, street, locality, region, postal_code, country] = parts.as_slice()
    else {
        return Err(ctx.error(
            ParseErrorKind::InvalidStructuredValue,
            format!("expected 7 components, found {}", parts.len()),
            raw,
        ));
    };

    let split = |s: &str| split_component(s, ctx.version);
    Ok(AddressInfo {
        po_box: split(po_box),
        extended: split(extended),
        street: split(street),
        locality: split(locality),
        region: split(region),
        postal_code: split(postal_code),
        country: split(country),
    })
}

fn parse_organization(raw: &str, ctx: &ValueContext<'_>) -> ParseResult<OrganizationInfo> {
    let parts = split_structured(raw);
    if parts.len() > 3 {
        return Err(ctx.error(
            ParseErrorKind::InvalidStructuredValue,
            format!("expected 1 to 3 components, found {}", parts.len()),
            raw,
        ));
    }

    let text = |i: usize| parts.get(i).map(|s| unescape_text(s, ctx.version));
    Ok(OrganizationInfo {
        name: text(0).unwrap_or_default(),
        unit: text(1),
        role: text(2),
    })
}

fn parse_gender(raw: &str, ctx: &ValueContext<'_>) -> ParseResult<GenderInfo> {
    let parts = split_structured(raw);
    if parts.len() > 2 {
        return Err(ctx.error(
            ParseErrorKind::InvalidStructuredValue,
            "expected a sex code and an optional identity",
            raw,
        ));
    }

    let code = parts.first().copied().unwrap_or_default();
    let sex = if code.is_empty() {
        None
    } else {
        Some(
            Sex::from_code(code)
                .ok_or_else(|| ctx.invalid(format!("unknown sex code {code:?}"), raw))?,
        )
    };

    let identity = parts
        .get(1)
        .filter(|s| !s.is_empty())
        .map(|s| unescape_text(s, ctx.version));

    Ok(GenderInfo { sex, identity })
}

fn parse_client_pid_map(raw: &str, ctx: &ValueContext<'_>) -> ParseResult<ClientPidMapInfo> {
    let parts = split_structured(raw);
    let [source_id, uri] = parts.as_slice() else {
        return Err(ctx.error(
            ParseErrorKind::InvalidStructuredValue,
            "expected source id and URI",
            raw,
        ));
    };

    let source_id: u32 = source_id
        .parse()
        .ok()
        .filter(|_| !source_id.starts_with('+'))
        .ok_or_else(|| ctx.invalid("invalid source id", raw))?;

    url::Url::parse(uri)
        .map_err(|err| ctx.invalid(format!("invalid URI ({err})"), raw))?;

    Ok(ClientPidMapInfo {
        source_id,
        uri: (*uri).to_string(),
    })
}

/// PHOTO, LOGO, SOUND and KEY.
///
/// 4.0 and later: an absolute URI, where `data:` counts as inline content.
/// Earlier versions: ENCODING means inline, `VALUE=uri` means reference,
/// otherwise anything that parses as an absolute URI is one.
fn parse_media(raw: &str, ctx: &ValueContext<'_>, is_key: bool) -> ParseResult<MediaInfo> {
    let media = |source| MediaInfo {
        payload: raw.to_string(),
        source,
    };

    if is_key && ctx.value_is(&["text"]) {
        return Ok(media(MediaSource::Text));
    }

    if ctx.version.major() >= 4 {
        let uri = url::Url::parse(raw)
            .map_err(|err| ctx.invalid(format!("expected an absolute URI ({err})"), raw))?;
        if uri.scheme() != "data" {
            return Ok(media(MediaSource::Uri));
        }
        let blob = media(MediaSource::Blob);
        if blob.decode().is_none() {
            return Err(ctx.error(ParseErrorKind::EncodingError, "undecodable data URI", raw));
        }
        return Ok(blob);
    }

    if !ctx.encoded && (ctx.value_is(&["uri", "url"]) || url::Url::parse(raw).is_ok()) {
        return Ok(media(MediaSource::Uri));
    }

    decode_base64(raw)
        .map_err(|err| ctx.error(ParseErrorKind::EncodingError, format!("invalid base64 ({err})"), raw))?;
    Ok(media(MediaSource::Blob))
}

fn parse_xml(raw: &str, ctx: &ValueContext<'_>) -> ParseResult<String> {
    let text = unescape_text(raw, ctx.version);
    check_well_formed(&text)
        .map_err(|detail| ctx.invalid(detail, raw))?;
    Ok(text)
}

/// Checks that `xml` is a well-formed document fragment with at least one element.
fn check_well_formed(xml: &str) -> Result<(), String> {
    let mut reader = Reader::from_str(xml);
    let mut depth = 0usize;
    let mut elements = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(_)) => {
                depth += 1;
                elements += 1;
            }
            Ok(Event::Empty(_)) => elements += 1,
            Ok(Event::End(_)) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| "unexpected closing tag".to_string())?;
            }
            Ok(Event::Text(text)) if depth == 0 && !text.iter().all(u8::is_ascii_whitespace) => {
                return Err("text outside of an element".to_string());
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => return Err(format!("malformed XML ({err})")),
        }
    }

    if depth != 0 {
        return Err("unclosed element".to_string());
    }
    if elements == 0 {
        return Err("no XML element".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rfc::vcard::policy::lookup;

    fn ctx(property: &'static str, version: VCardVersion) -> ValueContext<'static> {
        ValueContext {
            property,
            line: 7,
            version,
            value_type: lookup(property).value_for(version),
            encoded: false,
        }
    }

    fn part(property: &'static str, raw: &str, version: VCardVersion) -> ParseResult<PartValue> {
        match convert(lookup(property), raw, &ctx(property, version))? {
            Converted::Part(value) => Ok(value),
            Converted::Scalar(s) => panic!("unexpected scalar {s:?}"),
        }
    }

    #[test]
    fn name_needs_two_components() {
        let name = part("N", "Doe;John;Q,R;Mr.;Jr.", VCardVersion::V4_0).unwrap();
        let name = name.as_name().unwrap();
        assert_eq!(name.family, vec!["Doe"]);
        assert_eq!(name.additional, vec!["Q", "R"]);

        let err = part("N", "Doe", VCardVersion::V4_0).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidStructuredValue);
        assert_eq!(err.line, 7);
        assert!(err.message.starts_with("N:"));
        assert!(err.message.contains("\"Doe\""));
    }

    #[test]
    fn address_needs_seven_components() {
        let adr = part("ADR", ";;123 Main St;Anytown;CA;12345;USA", VCardVersion::V4_0).unwrap();
        assert_eq!(adr.as_address().unwrap().country, vec!["USA"]);

        for bad in [";;123 Main St;Anytown;CA;12345", ";;a;b;c;d;e;f"] {
            assert_eq!(
                part("ADR", bad, VCardVersion::V4_0).unwrap_err().kind,
                ParseErrorKind::InvalidStructuredValue
            );
        }
    }

    #[test]
    fn organization_components() {
        let org = part("ORG", "Acme;Engineering", VCardVersion::V3_0).unwrap();
        assert_eq!(
            org.as_organization().unwrap(),
            &OrganizationInfo {
                name: "Acme".into(),
                unit: Some("Engineering".into()),
                role: None,
            }
        );
        assert!(part("ORG", "a;b;c;d", VCardVersion::V3_0).is_err());
    }

    #[test]
    fn gender_codes() {
        let PartValue::Gender(g) = part("GENDER", "F;grrrl", VCardVersion::V4_0).unwrap() else {
            panic!("expected gender");
        };
        assert_eq!(g.sex, Some(Sex::Female));
        assert_eq!(g.identity.as_deref(), Some("grrrl"));

        let PartValue::Gender(g) = part("GENDER", ";it's complicated", VCardVersion::V4_0).unwrap()
        else {
            panic!("expected gender");
        };
        assert_eq!(g.sex, None);

        assert!(part("GENDER", "f", VCardVersion::V4_0).is_err());
        assert!(part("GENDER", "X", VCardVersion::V4_0).is_err());
    }

    #[test]
    fn client_pid_map() {
        let PartValue::ClientPidMap(map) =
            part("CLIENTPIDMAP", "1;urn:uuid:3df403f4-5924-4bb7-b077-3c711d9eb34b", VCardVersion::V4_0)
                .unwrap()
        else {
            panic!("expected clientpidmap");
        };
        assert_eq!(map.source_id, 1);

        assert!(part("CLIENTPIDMAP", "1", VCardVersion::V4_0).is_err());
        assert!(part("CLIENTPIDMAP", "x;urn:a", VCardVersion::V4_0).is_err());
        assert!(part("CLIENTPIDMAP", "1;not a uri", VCardVersion::V4_0).is_err());
    }

    #[test]
    fn media_on_four_requires_uri() {
        let photo = part("PHOTO", "http://www.example.com/pub/photos/jqpublic.gif", VCardVersion::V4_0)
            .unwrap();
        assert_eq!(photo.as_media().unwrap().source, MediaSource::Uri);

        let data = part("PHOTO", "data:image/png;base64,aGVsbG8=", VCardVersion::V4_0).unwrap();
        assert!(data.as_media().unwrap().is_blob());

        assert_eq!(
            part("PHOTO", "aGVsbG8=", VCardVersion::V4_0).unwrap_err().kind,
            ParseErrorKind::InvalidValue
        );
    }

    #[test]
    fn media_before_four_uses_heuristics() {
        let uri = part("LOGO", "http://example.com/logo.png", VCardVersion::V3_0).unwrap();
        assert_eq!(uri.as_media().unwrap().source, MediaSource::Uri);

        let blob = part("LOGO", "aGVsbG8=", VCardVersion::V3_0).unwrap();
        assert!(blob.as_media().unwrap().is_blob());
        assert_eq!(blob.as_media().unwrap().payload, "aGVsbG8=");

        let mut encoded = ctx("PHOTO", VCardVersion::V2_1);
        encoded.encoded = true;
        assert_eq!(
            convert(lookup("PHOTO"), "not base64!", &encoded)
                .unwrap_err()
                .kind,
            ParseErrorKind::EncodingError
        );
    }

    #[test]
    fn key_may_be_text() {
        let mut text = ctx("KEY", VCardVersion::V4_0);
        text.value_type = "text";
        let Converted::Part(PartValue::Key(key)) =
            convert(lookup("KEY"), "-----BEGIN PGP-----", &text).unwrap()
        else {
            panic!("expected key");
        };
        assert_eq!(key.source, MediaSource::Text);
    }

    #[test]
    fn dates_and_text_dates() {
        let bday = part("BDAY", "19960415", VCardVersion::V4_0).unwrap();
        assert!(bday.as_date_and_or_time().unwrap().as_date().is_some());

        let mut text = ctx("BDAY", VCardVersion::V4_0);
        text.value_type = "text";
        let Converted::Part(PartValue::DateTime(dt)) =
            convert(lookup("BDAY"), "circa 1800", &text).unwrap()
        else {
            panic!("expected date");
        };
        assert!(dt.is_text());

        let err = part("BDAY", "someday", VCardVersion::V4_0).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidDateTime);
        assert!(err.message.contains("BDAY"));
    }

    #[test]
    fn xml_must_be_well_formed() {
        let xml = part("XML", "<a xmlns=\"urn:x\"><b/></a>", VCardVersion::V4_0).unwrap();
        assert_eq!(xml.as_text(), Some("<a xmlns=\"urn:x\"><b/></a>"));

        for bad in ["<a><b></a>", "<a>", "plain text", ""] {
            assert!(part("XML", bad, VCardVersion::V4_0).is_err(), "{bad}");
        }
    }

    #[test]
    fn scalar_allowed_values() {
        let class = ctx("CLASS", VCardVersion::V3_0);
        assert_eq!(
            convert(lookup("CLASS"), "PUBLIC", &class).unwrap(),
            Converted::Scalar("PUBLIC".into())
        );
        assert_eq!(
            convert(lookup("CLASS"), "SECRET", &class).unwrap_err().kind,
            ParseErrorKind::InvalidValue
        );
    }

    #[test]
    fn extension_values_are_verbatim() {
        let Converted::Part(PartValue::Extension(ext)) = convert(
            lookup("X-ABLABEL"),
            r"one\,two;three",
            &ctx("X-ABLabel", VCardVersion::V3_0),
        )
        .unwrap() else {
            panic!("expected extension");
        };
        assert_eq!(ext.name, "X-ABLabel");
        assert_eq!(ext.values, vec![r"one\,two", "three"]);
    }

    #[test]
    fn agent_values() {
        let three = ctx("AGENT", VCardVersion::V3_0);
        assert_eq!(
            embedded_agent(r"BEGIN:VCARD\nVERSION:3.0\nEND:VCARD", None, &three).as_deref(),
            Some("BEGIN:VCARD\nVERSION:3.0\nEND:VCARD")
        );
        assert_eq!(embedded_agent("CID:JQPUBLIC.part3", None, &three), None);

        let Converted::Part(PartValue::Agent(agent)) =
            convert(lookup("AGENT"), "CID:JQPUBLIC.part3", &three).unwrap()
        else {
            panic!("expected agent");
        };
        assert!(agent.cards.is_empty());
        assert_eq!(agent.uri.as_deref(), Some("CID:JQPUBLIC.part3"));
    }
}
