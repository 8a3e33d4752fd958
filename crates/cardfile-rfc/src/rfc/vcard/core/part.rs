//! Parts: one stored property instance with its metadata and typed value.

use base64::Engine;
use cardfile_core::constants::PREF_KEY;
use serde::Serialize;

use super::argument::Argument;
use super::card::Card;
use super::datetime::DateAndOrTime;
use super::kind::FieldKind;
use super::structured::{AddressInfo, ClientPidMapInfo, GenderInfo, NameInfo, OrganizationInfo};
use crate::rfc::vcard::policy::registry;

/// Metadata shared by every part.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PartMeta {
    /// ALTID, when this part is one of several alternative representations.
    pub alt_id: Option<u32>,
    /// TYPE values, minus the property's default type.
    pub element_types: Vec<String>,
    /// Effective VALUE type (explicit argument, or the version's default).
    pub value_type: String,
    /// Property group (e.g., "item1" in "item1.TEL").
    pub group: Option<String>,
    /// Remaining arguments in source order.
    pub arguments: Vec<Argument>,
}

/// A stored property instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Part {
    pub meta: PartMeta,
    pub value: PartValue,
}

impl Part {
    /// Creates a part with empty metadata.
    #[must_use]
    pub fn new(value: PartValue) -> Self {
        Self {
            meta: PartMeta::default(),
            value,
        }
    }

    /// Returns the TYPE values including the property default when none were given.
    #[must_use]
    pub fn effective_types(&self, field: impl Into<FieldKind>) -> Vec<&str> {
        if self.meta.element_types.is_empty() {
            let default = registry::descriptor_for(field.into()).default_type;
            if default.is_empty() {
                Vec::new()
            } else {
                vec![default]
            }
        } else {
            self.meta.element_types.iter().map(String::as_str).collect()
        }
    }

    /// Returns whether the part carries the given TYPE (case-insensitive).
    #[must_use]
    pub fn has_type(&self, type_name: &str) -> bool {
        self.meta
            .element_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(type_name))
    }

    /// Returns the first argument with the given key.
    #[must_use]
    pub fn argument(&self, key: &str) -> Option<&Argument> {
        self.meta.arguments.iter().find(|a| a.is(key))
    }

    /// Preference (1 = most preferred).
    ///
    /// Reads PREF, falling back to the legacy `TYPE=pref` marker.
    #[must_use]
    pub fn pref(&self) -> Option<u8> {
        self.argument(PREF_KEY)
            .and_then(Argument::value)
            .and_then(|v| v.parse().ok())
            .or_else(|| self.has_type("pref").then_some(1))
    }
}

/// Typed value of a part.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PartValue {
    /// N
    Name(NameInfo),
    /// ADR
    Address(AddressInfo),
    /// LABEL
    Label(String),
    /// ORG
    Organization(OrganizationInfo),
    /// TEL, EMAIL, IMPP, TITLE, ROLE, LANG, URL, MEMBER, RELATED
    Text(String),
    /// NICKNAME, CATEGORIES
    TextList(Vec<String>),
    /// PHOTO, LOGO, SOUND
    Media(MediaInfo),
    /// KEY
    Key(MediaInfo),
    /// GEO
    Geo(String),
    /// TZ
    TimeZone(String),
    /// GENDER
    Gender(GenderInfo),
    /// CLIENTPIDMAP
    ClientPidMap(ClientPidMapInfo),
    /// REV, BDAY, ANNIVERSARY
    DateTime(DateAndOrTime),
    /// XML
    Xml(String),
    /// AGENT
    Agent(AgentInfo),
    /// X- and unrecognized properties
    Extension(ExtensionInfo),
}

impl PartValue {
    /// Returns the value as text, for the variants that are plain text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Label(s) | Self::Geo(s) | Self::TimeZone(s) | Self::Xml(s) => {
                Some(s)
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn as_name(&self) -> Option<&NameInfo> {
        match self {
            Self::Name(n) => Some(n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_address(&self) -> Option<&AddressInfo> {
        match self {
            Self::Address(a) => Some(a),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_organization(&self) -> Option<&OrganizationInfo> {
        match self {
            Self::Organization(o) => Some(o),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_media(&self) -> Option<&MediaInfo> {
        match self {
            Self::Media(m) | Self::Key(m) => Some(m),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_date_and_or_time(&self) -> Option<&DateAndOrTime> {
        match self {
            Self::DateTime(d) => Some(d),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_agent(&self) -> Option<&AgentInfo> {
        match self {
            Self::Agent(a) => Some(a),
            _ => None,
        }
    }
}

/// Where media content lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MediaSource {
    /// Reference to external content.
    Uri,
    /// Inline base64 content (including `data:` URIs).
    Blob,
    /// Free text (KEY with `VALUE=text`).
    Text,
}

/// PHOTO, LOGO, SOUND and KEY payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaInfo {
    /// Payload exactly as it appeared on the wire.
    pub payload: String,
    pub source: MediaSource,
}

impl MediaInfo {
    #[must_use]
    pub fn is_blob(&self) -> bool {
        self.source == MediaSource::Blob
    }

    /// Decodes inline content.
    ///
    /// Returns `None` for references, text keys and undecodable payloads.
    #[must_use]
    pub fn decode(&self) -> Option<Vec<u8>> {
        if !self.is_blob() {
            return None;
        }
        let encoded = match self.payload.strip_prefix("data:") {
            Some(rest) => {
                let (header, data) = rest.split_once(',')?;
                if !header.ends_with(";base64") {
                    return Some(data.as_bytes().to_vec());
                }
                data
            }
            None => &self.payload,
        };
        decode_base64(encoded).ok()
    }
}

/// Decodes base64, ignoring embedded whitespace and missing padding.
pub(crate) fn decode_base64(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let engine = base64::engine::GeneralPurpose::new(
        &base64::alphabet::STANDARD,
        base64::engine::GeneralPurposeConfig::new()
            .with_decode_padding_mode(base64::engine::DecodePaddingMode::Indifferent),
    );
    engine.decode(compact)
}

/// AGENT: embedded cards, or a reference to one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentInfo {
    pub cards: Vec<Card>,
    /// Set when the agent was given by reference (`VALUE=uri`) or as plain text.
    pub uri: Option<String>,
}

/// Vendor and unknown properties, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionInfo {
    /// Property name as written.
    pub name: String,
    /// `;`-separated raw values, unescaped content untouched.
    pub values: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rfc::vcard::core::PartsArrayKind;

    fn tel(types: &[&str]) -> Part {
        let mut part = Part::new(PartValue::Text("+1-555-0100".into()));
        part.meta.element_types = types.iter().map(|t| (*t).to_string()).collect();
        part
    }

    #[test]
    fn effective_types_restore_default() {
        assert_eq!(tel(&[]).effective_types(PartsArrayKind::Telephones), vec!["voice"]);
        assert_eq!(
            tel(&["cell"]).effective_types(PartsArrayKind::Telephones),
            vec!["cell"]
        );
        assert!(tel(&[]).effective_types(PartsArrayKind::Titles).is_empty());
    }

    #[test]
    fn pref_from_argument_or_legacy_type() {
        let mut part = tel(&[]);
        assert_eq!(part.pref(), None);

        part.meta.arguments.push(Argument::pref(2));
        assert_eq!(part.pref(), Some(2));

        assert_eq!(tel(&["PREF", "home"]).pref(), Some(1));
    }

    #[test]
    fn decode_blob_and_data_uri() {
        let blob = MediaInfo {
            payload: "aGVs\r\n bG8=".into(),
            source: MediaSource::Blob,
        };
        assert_eq!(blob.decode(), Some(b"hello".to_vec()));

        let data = MediaInfo {
            payload: "data:text/plain;base64,aGVsbG8".into(),
            source: MediaSource::Blob,
        };
        assert_eq!(data.decode(), Some(b"hello".to_vec()));

        let uri = MediaInfo {
            payload: "http://example.com/photo.jpg".into(),
            source: MediaSource::Uri,
        };
        assert_eq!(uri.decode(), None);
    }
}
