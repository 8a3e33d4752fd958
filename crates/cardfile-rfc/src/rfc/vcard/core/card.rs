//! The card aggregate.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use super::datetime::DateAndOrTime;
use super::kind::{FieldKind, PartsArrayKind, ScalarKind, SingletonKind};
use super::part::{Part, PartValue};
use super::structured::{AddressInfo, GenderInfo, NameInfo, OrganizationInfo};
use super::version::VCardVersion;
use crate::error::VCardResult;
use crate::rfc::vcard::build;
use crate::rfc::vcard::policy::capability;

/// KIND property values.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub enum VCardKind {
    /// An individual person.
    #[default]
    Individual,
    /// A group of people.
    Group,
    /// An organization.
    Organization,
    /// A named location.
    Location,
    /// Extension or unknown kind.
    Other(String),
}

impl VCardKind {
    /// Parses from kind string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "individual" => Self::Individual,
            "group" => Self::Group,
            "org" | "organization" => Self::Organization,
            "location" => Self::Location,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns the kind string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Individual => "individual",
            Self::Group => "group",
            Self::Organization => "org",
            Self::Location => "location",
            Self::Other(s) => s,
        }
    }
}

/// A parsed contact card.
///
/// Built by the parser and read-only afterwards. Fields are filed by kind:
/// single text values, ordered lists of parts, and at-most-once parts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub(crate) version: VCardVersion,
    pub(crate) scalars: BTreeMap<ScalarKind, String>,
    pub(crate) parts: BTreeMap<PartsArrayKind, Vec<Part>>,
    pub(crate) singletons: BTreeMap<SingletonKind, Part>,
}

impl Card {
    pub(crate) fn new(version: VCardVersion) -> Self {
        Self {
            version,
            scalars: BTreeMap::new(),
            parts: BTreeMap::new(),
            singletons: BTreeMap::new(),
        }
    }

    /// Stores a scalar. Empty values are not stored; an existing value wins.
    ///
    /// Returns `false` when a value was already present.
    pub(crate) fn set_scalar(&mut self, kind: ScalarKind, value: String) -> bool {
        if self.scalars.contains_key(&kind) {
            return false;
        }
        if !value.is_empty() {
            self.scalars.insert(kind, value);
        }
        true
    }

    pub(crate) fn push_part(&mut self, kind: PartsArrayKind, part: Part) {
        debug_assert!(kind.accepts(&part.value), "{kind:?} cannot hold {part:?}");
        self.parts.entry(kind).or_default().push(part);
    }

    /// Stores a singleton. Returns `false` if one was already present.
    pub(crate) fn set_singleton(&mut self, kind: SingletonKind, part: Part) -> bool {
        debug_assert!(kind.accepts(&part.value), "{kind:?} cannot hold {part:?}");
        if self.singletons.contains_key(&kind) {
            return false;
        }
        self.singletons.insert(kind, part);
        true
    }

    #[must_use]
    pub fn version(&self) -> VCardVersion {
        self.version
    }

    /// Whether `field` exists for this card's version (and kind, for MEMBER).
    #[must_use]
    pub fn supports(&self, field: impl Into<FieldKind>) -> bool {
        capability::support(
            field.into(),
            self.version,
            self.scalars.get(&ScalarKind::Kind).map(String::as_str),
        )
        .is_supported()
    }

    #[must_use]
    pub fn get_scalar(&self, kind: ScalarKind) -> Option<&str> {
        if !self.supports(kind) {
            return None;
        }
        self.scalars.get(&kind).map(String::as_str)
    }

    #[must_use]
    pub fn get_repeatable(&self, kind: PartsArrayKind) -> &[Part] {
        if !self.supports(kind) {
            return &[];
        }
        self.parts.get(&kind).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn get_singleton(&self, kind: SingletonKind) -> Option<&Part> {
        if !self.supports(kind) {
            return None;
        }
        self.singletons.get(&kind)
    }

    /// Whether a value is stored for `field`.
    #[must_use]
    pub fn has(&self, field: impl Into<FieldKind>) -> bool {
        match field.into() {
            FieldKind::Scalar(kind) => self.scalars.contains_key(&kind),
            FieldKind::Repeatable(kind) => self.parts.get(&kind).is_some_and(|p| !p.is_empty()),
            FieldKind::Singleton(kind) => self.singletons.contains_key(&kind),
        }
    }

    /// Returns the KIND of this card (individual when absent).
    #[must_use]
    pub fn kind(&self) -> VCardKind {
        self.get_scalar(ScalarKind::Kind)
            .map(VCardKind::parse)
            .unwrap_or_default()
    }

    // --- Typed helpers ---

    #[must_use]
    pub fn full_name(&self) -> Option<&str> {
        self.get_scalar(ScalarKind::FullName)
    }

    #[must_use]
    pub fn uid(&self) -> Option<&str> {
        self.get_scalar(ScalarKind::Uid)
    }

    #[must_use]
    pub fn note(&self) -> Option<&str> {
        self.get_scalar(ScalarKind::Notes)
    }

    #[must_use]
    pub fn names(&self) -> Vec<&NameInfo> {
        self.values_of(PartsArrayKind::Names, PartValue::as_name)
    }

    /// Returns the first structured name.
    #[must_use]
    pub fn name(&self) -> Option<&NameInfo> {
        self.names().into_iter().next()
    }

    #[must_use]
    pub fn addresses(&self) -> Vec<&AddressInfo> {
        self.values_of(PartsArrayKind::Addresses, PartValue::as_address)
    }

    #[must_use]
    pub fn organizations(&self) -> Vec<&OrganizationInfo> {
        self.values_of(PartsArrayKind::Organizations, PartValue::as_organization)
    }

    #[must_use]
    pub fn telephones(&self) -> Vec<&str> {
        self.values_of(PartsArrayKind::Telephones, PartValue::as_text)
    }

    #[must_use]
    pub fn emails(&self) -> Vec<&str> {
        self.values_of(PartsArrayKind::Emails, PartValue::as_text)
    }

    #[must_use]
    pub fn titles(&self) -> Vec<&str> {
        self.values_of(PartsArrayKind::Titles, PartValue::as_text)
    }

    #[must_use]
    pub fn urls(&self) -> Vec<&str> {
        self.values_of(PartsArrayKind::Urls, PartValue::as_text)
    }

    #[must_use]
    pub fn birthdate(&self) -> Option<&DateAndOrTime> {
        self.get_singleton(SingletonKind::Birthdate)
            .and_then(|p| p.value.as_date_and_or_time())
    }

    #[must_use]
    pub fn revision(&self) -> Option<&DateAndOrTime> {
        self.get_singleton(SingletonKind::Revision)
            .and_then(|p| p.value.as_date_and_or_time())
    }

    #[must_use]
    pub fn gender(&self) -> Option<&GenderInfo> {
        match self.get_singleton(SingletonKind::Gender).map(|p| &p.value) {
            Some(PartValue::Gender(g)) => Some(g),
            _ => None,
        }
    }

    /// Cards embedded through AGENT properties, in order.
    #[must_use]
    pub fn nested_cards(&self) -> Vec<&Card> {
        self.get_repeatable(PartsArrayKind::Agents)
            .iter()
            .filter_map(|p| p.value.as_agent())
            .flat_map(|a| a.cards.iter())
            .collect()
    }

    fn values_of<'a, T: ?Sized>(
        &'a self,
        kind: PartsArrayKind,
        project: impl Fn(&'a PartValue) -> Option<&'a T>,
    ) -> Vec<&'a T> {
        self.get_repeatable(kind)
            .iter()
            .filter_map(|p| project(&p.value))
            .collect()
    }

    /// Serializes this card to folded, CRLF-terminated text.
    #[must_use]
    pub fn serialize(&self) -> String {
        build::serialize_single(self)
    }

    /// Writes this card to `path`.
    ///
    /// ## Errors
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> VCardResult<()> {
        std::fs::write(path, self.serialize())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vcard_kind_parse() {
        assert_eq!(VCardKind::parse("individual"), VCardKind::Individual);
        assert_eq!(VCardKind::parse("GROUP"), VCardKind::Group);
        assert_eq!(VCardKind::parse("org"), VCardKind::Organization);
        assert_eq!(
            VCardKind::parse("x-robot"),
            VCardKind::Other("x-robot".into())
        );
    }

    #[test]
    fn scalar_first_wins_and_empty_is_skipped() {
        let mut card = Card::new(VCardVersion::V4_0);
        assert!(card.set_scalar(ScalarKind::Notes, String::new()));
        assert!(!card.has(ScalarKind::Notes));

        assert!(card.set_scalar(ScalarKind::FullName, "First".into()));
        assert!(!card.set_scalar(ScalarKind::FullName, "Second".into()));
        assert_eq!(card.full_name(), Some("First"));
    }

    #[test]
    fn accessors_hide_unsupported_kinds() {
        let mut card = Card::new(VCardVersion::V3_0);
        card.scalars.insert(ScalarKind::Kind, "group".into());
        assert_eq!(card.get_scalar(ScalarKind::Kind), None);
        assert_eq!(card.kind(), VCardKind::Individual);
    }

    #[test]
    fn card_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Card>();
    }

    #[test]
    fn serializes_to_json() {
        let card = crate::rfc::vcard::parse::parse_single(
            "BEGIN:VCARD\r\nVERSION:4.0\r\nFN:Jane Doe\r\nN:Doe;Jane;;;\r\nTEL;TYPE=cell:+1-555-0100\r\nBDAY:19900615\r\nEND:VCARD\r\n",
        )
        .unwrap();
        let json = serde_json::to_value(&card).unwrap();

        assert_eq!(json["version"], "4.0");
        assert_eq!(json["scalars"]["FullName"], "Jane Doe");
        assert_eq!(json["parts"]["Names"][0]["value"]["Name"]["family"][0], "Doe");

        let tel = &json["parts"]["Telephones"][0];
        assert_eq!(tel["value"]["Text"], "+1-555-0100");
        assert_eq!(tel["meta"]["element_types"][0], "cell");
        assert!(json["singletons"]["Birthdate"]["value"]["DateTime"].is_object());
    }
}
