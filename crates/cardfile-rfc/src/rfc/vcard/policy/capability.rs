//! Version capability matrix.
//!
//! Answers, per field and version, whether the field exists, how often it
//! may occur, and whether it may carry ALTID.

use crate::rfc::vcard::core::{FieldKind, PartsArrayKind, ScalarKind, SingletonKind, VCardVersion};

/// How many instances a version expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// The field does not exist in this version.
    Unsupported,
    /// Zero or one.
    MayBeOne,
    /// Exactly one is expected, absence is tolerated.
    ShouldBeOne,
    /// One or more.
    AtLeastOne,
    /// Zero or more.
    Any,
}

/// Whether ALTID may appear on a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AltIdRule {
    Allowed,
    Forbidden,
}

/// Capability of one field under one version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Support {
    pub cardinality: Cardinality,
    pub alt_id: AltIdRule,
}

impl Support {
    #[must_use]
    pub fn is_supported(&self) -> bool {
        self.cardinality != Cardinality::Unsupported
    }
}

/// Looks up the capability of `field` for `version`.
///
/// `card_kind` is the record's KIND value, consulted only for MEMBER.
#[must_use]
pub fn support(field: FieldKind, version: VCardVersion, card_kind: Option<&str>) -> Support {
    let cardinality = cardinality(field, version.major(), card_kind);
    let alt_id = if version.major() >= 4
        && cardinality != Cardinality::Unsupported
        && !forbids_alt_id(field)
    {
        AltIdRule::Allowed
    } else {
        AltIdRule::Forbidden
    };
    Support {
        cardinality,
        alt_id,
    }
}

fn forbids_alt_id(field: FieldKind) -> bool {
    matches!(
        field,
        FieldKind::Scalar(ScalarKind::Kind | ScalarKind::ProductId | ScalarKind::Uid)
            | FieldKind::Singleton(SingletonKind::Gender | SingletonKind::Revision)
            | FieldKind::Repeatable(PartsArrayKind::ClientPidMaps)
    )
}

fn cardinality(field: FieldKind, major: u8, card_kind: Option<&str>) -> Cardinality {
    use Cardinality::{AtLeastOne, Any, MayBeOne, ShouldBeOne, Unsupported};

    let gate = |supported: bool, cardinality: Cardinality| {
        if supported { cardinality } else { Unsupported }
    };

    match field {
        FieldKind::Scalar(kind) => match kind {
            ScalarKind::FullName => match major {
                2 => MayBeOne,
                3 => ShouldBeOne,
                _ => AtLeastOne,
            },
            ScalarKind::Kind => gate(major >= 4, MayBeOne),
            ScalarKind::Notes => Any,
            ScalarKind::Uid => MayBeOne,
            ScalarKind::Mailer => gate(major <= 3, MayBeOne),
            ScalarKind::ProductId => gate(major >= 3, MayBeOne),
            ScalarKind::SortString | ScalarKind::Classification | ScalarKind::SourceName => {
                gate(major == 3, MayBeOne)
            }
            ScalarKind::Source => gate(major >= 3, Any),
            ScalarKind::FreeBusyUrl
            | ScalarKind::CalendarUrl
            | ScalarKind::CalendarSchedulingRequestUrl => gate(major >= 3, Any),
        },
        FieldKind::Repeatable(kind) => match kind {
            PartsArrayKind::Names => match major {
                4 => MayBeOne,
                _ => ShouldBeOne,
            },
            PartsArrayKind::Nicknames
            | PartsArrayKind::Categories
            | PartsArrayKind::Impps => gate(major >= 3, Any),
            PartsArrayKind::Labels | PartsArrayKind::Agents => gate(major <= 3, Any),
            PartsArrayKind::Languages
            | PartsArrayKind::Related
            | PartsArrayKind::ClientPidMaps
            | PartsArrayKind::Xmls => gate(major >= 4, Any),
            PartsArrayKind::Members => gate(
                major == 4 && card_kind.is_some_and(|k| k.eq_ignore_ascii_case("group")),
                Any,
            ),
            PartsArrayKind::Photos
            | PartsArrayKind::Addresses
            | PartsArrayKind::Telephones
            | PartsArrayKind::Emails
            | PartsArrayKind::TimeZones
            | PartsArrayKind::Geos
            | PartsArrayKind::Titles
            | PartsArrayKind::Roles
            | PartsArrayKind::Logos
            | PartsArrayKind::Organizations
            | PartsArrayKind::Sounds
            | PartsArrayKind::Urls
            | PartsArrayKind::Keys
            | PartsArrayKind::Extensions => Any,
        },
        FieldKind::Singleton(kind) => match kind {
            SingletonKind::Gender | SingletonKind::Anniversary => gate(major >= 4, MayBeOne),
            SingletonKind::Revision | SingletonKind::Birthdate => MayBeOne,
        },
    }
}
