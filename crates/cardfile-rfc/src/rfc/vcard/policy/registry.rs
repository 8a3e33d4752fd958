//! Property registry: name -> field kind, converter and defaults.
//!
//! The table is a `'static` slice, so lookups need no synchronization.

use cardfile_core::constants::EXTENSION_PREFIX;

use crate::rfc::vcard::core::{FieldKind, PartsArrayKind, ScalarKind, SingletonKind, VCardVersion, names};

/// Value conversion strategy for a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Converter {
    /// Single unescaped text value stored as a scalar.
    Scalar,
    Name,
    Address,
    Label,
    Organization,
    Text,
    TextList,
    Media,
    Key,
    Geo,
    TimeZone,
    Gender,
    ClientPidMap,
    DateTime,
    Xml,
    Agent,
    Extension,
}

/// Static description of a property.
#[derive(Debug)]
pub struct PropertyDescriptor {
    pub name: &'static str,
    pub field: FieldKind,
    pub converter: Converter,
    /// TYPE implied when none is given.
    pub default_type: &'static str,
    /// VALUE implied on 4.0 and later.
    pub default_value: &'static str,
    /// VALUE implied before 4.0, when it differs.
    pub legacy_value: Option<&'static str>,
    /// TYPE values known for this property beyond the default.
    pub extra_types: &'static [&'static str],
    /// Closed set of accepted values, compared case-insensitively.
    pub allowed_values: Option<&'static [&'static str]>,
}

impl PropertyDescriptor {
    const fn new(name: &'static str, field: FieldKind, converter: Converter) -> Self {
        Self {
            name,
            field,
            converter,
            default_type: "",
            default_value: "text",
            legacy_value: None,
            extra_types: COMMON_TYPES,
            allowed_values: None,
        }
    }

    const fn scalar(name: &'static str, kind: ScalarKind) -> Self {
        Self::new(name, FieldKind::Scalar(kind), Converter::Scalar)
    }

    const fn repeatable(name: &'static str, kind: PartsArrayKind, converter: Converter) -> Self {
        Self::new(name, FieldKind::Repeatable(kind), converter)
    }

    const fn singleton(name: &'static str, kind: SingletonKind, converter: Converter) -> Self {
        Self::new(name, FieldKind::Singleton(kind), converter)
    }

    const fn value(mut self, default_value: &'static str) -> Self {
        self.default_value = default_value;
        self
    }

    const fn legacy(mut self, legacy_value: &'static str) -> Self {
        self.legacy_value = Some(legacy_value);
        self
    }

    const fn default_type(mut self, default_type: &'static str) -> Self {
        self.default_type = default_type;
        self
    }

    const fn types(mut self, extra_types: &'static [&'static str]) -> Self {
        self.extra_types = extra_types;
        self
    }

    const fn allowed(mut self, allowed_values: &'static [&'static str]) -> Self {
        self.allowed_values = Some(allowed_values);
        self
    }

    /// The VALUE type implied for `version` when no VALUE argument is given.
    #[must_use]
    pub fn value_for(&self, version: VCardVersion) -> &'static str {
        if version.major() >= 4 {
            self.default_value
        } else {
            self.legacy_value.unwrap_or(self.default_value)
        }
    }

    /// Whether `type_name` is the default or a registered TYPE value.
    #[must_use]
    pub fn knows_type(&self, type_name: &str) -> bool {
        type_name.eq_ignore_ascii_case(self.default_type)
            || type_name.starts_with(EXTENSION_PREFIX)
            || type_name.starts_with("x-")
            || self
                .extra_types
                .iter()
                .any(|t| t.eq_ignore_ascii_case(type_name))
    }

    /// Whether `value` is acceptable under the closed value set, if any.
    #[must_use]
    pub fn allows(&self, value: &str) -> bool {
        self.allowed_values
            .is_none_or(|set| set.iter().any(|v| v.eq_ignore_ascii_case(value)))
    }
}

const COMMON_TYPES: &[&str] = &["home", "work", "pref"];

const TEL_TYPES: &[&str] = &[
    "home", "work", "pref", "text", "voice", "fax", "cell", "video", "pager", "textphone", "msg",
    "bbs", "modem", "car", "isdn", "pcs", "main",
];

const EMAIL_TYPES: &[&str] = &[
    "home", "work", "pref", "internet", "x400", "aol", "applelink", "attmail", "cis", "eworld",
    "ibmmail", "mcimail", "powershare", "prodigy", "tlx",
];

const ADR_TYPES: &[&str] = &["home", "work", "pref", "dom", "intl", "postal", "parcel"];

const MEDIA_TYPES: &[&str] = &[
    "gif", "cgm", "wmf", "bmp", "met", "pmb", "dib", "pict", "tiff", "pdf", "ps", "jpeg", "qtime",
    "mpeg", "mpeg2", "avi", "png", "wave", "pcm", "aiff", "x509", "pgp",
];

const RELATED_TYPES: &[&str] = &[
    "contact",
    "acquaintance",
    "friend",
    "met",
    "co-worker",
    "colleague",
    "co-resident",
    "neighbor",
    "child",
    "parent",
    "sibling",
    "spouse",
    "kin",
    "muse",
    "crush",
    "date",
    "sweetheart",
    "me",
    "agent",
    "emergency",
];

const CLASS_VALUES: &[&str] = &["PUBLIC", "PRIVATE", "CONFIDENTIAL"];

static PROPERTIES: &[PropertyDescriptor] = &[
    // Scalars
    PropertyDescriptor::scalar(names::KIND, ScalarKind::Kind),
    PropertyDescriptor::scalar(names::FN, ScalarKind::FullName),
    PropertyDescriptor::scalar(names::NOTE, ScalarKind::Notes),
    PropertyDescriptor::scalar(names::MAILER, ScalarKind::Mailer),
    PropertyDescriptor::scalar(names::PRODID, ScalarKind::ProductId),
    PropertyDescriptor::scalar(names::SORT_STRING, ScalarKind::SortString),
    PropertyDescriptor::scalar(names::UID, ScalarKind::Uid)
        .value("uri")
        .legacy("text"),
    PropertyDescriptor::scalar(names::CLASS, ScalarKind::Classification).allowed(CLASS_VALUES),
    PropertyDescriptor::scalar(names::NAME, ScalarKind::SourceName),
    PropertyDescriptor::scalar(names::SOURCE, ScalarKind::Source).value("uri"),
    PropertyDescriptor::scalar(names::FBURL, ScalarKind::FreeBusyUrl).value("uri"),
    PropertyDescriptor::scalar(names::CALURI, ScalarKind::CalendarUrl).value("uri"),
    PropertyDescriptor::scalar(names::CALADRURI, ScalarKind::CalendarSchedulingRequestUrl)
        .value("uri"),
    // Repeatables
    PropertyDescriptor::repeatable(names::N, PartsArrayKind::Names, Converter::Name),
    PropertyDescriptor::repeatable(names::NICKNAME, PartsArrayKind::Nicknames, Converter::TextList),
    PropertyDescriptor::repeatable(names::PHOTO, PartsArrayKind::Photos, Converter::Media)
        .value("uri")
        .legacy("binary")
        .types(MEDIA_TYPES),
    PropertyDescriptor::repeatable(names::ADR, PartsArrayKind::Addresses, Converter::Address)
        .types(ADR_TYPES),
    PropertyDescriptor::repeatable(names::LABEL, PartsArrayKind::Labels, Converter::Label)
        .types(ADR_TYPES),
    PropertyDescriptor::repeatable(names::TEL, PartsArrayKind::Telephones, Converter::Text)
        .default_type("voice")
        .legacy("phone-number")
        .types(TEL_TYPES),
    PropertyDescriptor::repeatable(names::EMAIL, PartsArrayKind::Emails, Converter::Text)
        .default_type("internet")
        .types(EMAIL_TYPES),
    PropertyDescriptor::repeatable(names::IMPP, PartsArrayKind::Impps, Converter::Text)
        .value("uri")
        .types(&["home", "work", "pref", "personal", "business", "mobile"]),
    PropertyDescriptor::repeatable(names::LANG, PartsArrayKind::Languages, Converter::Text)
        .value("language-tag"),
    PropertyDescriptor::repeatable(names::TZ, PartsArrayKind::TimeZones, Converter::TimeZone)
        .legacy("utc-offset"),
    PropertyDescriptor::repeatable(names::GEO, PartsArrayKind::Geos, Converter::Geo)
        .value("uri")
        .legacy("float"),
    PropertyDescriptor::repeatable(names::TITLE, PartsArrayKind::Titles, Converter::Text),
    PropertyDescriptor::repeatable(names::ROLE, PartsArrayKind::Roles, Converter::Text),
    PropertyDescriptor::repeatable(names::LOGO, PartsArrayKind::Logos, Converter::Media)
        .value("uri")
        .legacy("binary")
        .types(MEDIA_TYPES),
    PropertyDescriptor::repeatable(names::ORG, PartsArrayKind::Organizations, Converter::Organization),
    PropertyDescriptor::repeatable(names::MEMBER, PartsArrayKind::Members, Converter::Text)
        .value("uri"),
    PropertyDescriptor::repeatable(names::RELATED, PartsArrayKind::Related, Converter::Text)
        .value("uri")
        .types(RELATED_TYPES),
    PropertyDescriptor::repeatable(names::CATEGORIES, PartsArrayKind::Categories, Converter::TextList),
    PropertyDescriptor::repeatable(names::SOUND, PartsArrayKind::Sounds, Converter::Media)
        .value("uri")
        .legacy("binary")
        .types(MEDIA_TYPES),
    PropertyDescriptor::repeatable(
        names::CLIENTPIDMAP,
        PartsArrayKind::ClientPidMaps,
        Converter::ClientPidMap,
    ),
    PropertyDescriptor::repeatable(names::URL, PartsArrayKind::Urls, Converter::Text).value("uri"),
    PropertyDescriptor::repeatable(names::KEY, PartsArrayKind::Keys, Converter::Key)
        .value("uri")
        .legacy("binary")
        .types(MEDIA_TYPES),
    PropertyDescriptor::repeatable(names::XML, PartsArrayKind::Xmls, Converter::Xml),
    PropertyDescriptor::repeatable(names::AGENT, PartsArrayKind::Agents, Converter::Agent)
        .value("vcard"),
    // Singletons
    PropertyDescriptor::singleton(names::GENDER, SingletonKind::Gender, Converter::Gender),
    PropertyDescriptor::singleton(names::REV, SingletonKind::Revision, Converter::DateTime)
        .value("timestamp")
        .legacy("date-time"),
    PropertyDescriptor::singleton(names::BDAY, SingletonKind::Birthdate, Converter::DateTime)
        .value("date-and-or-time")
        .legacy("date"),
    PropertyDescriptor::singleton(
        names::ANNIVERSARY,
        SingletonKind::Anniversary,
        Converter::DateTime,
    )
    .value("date-and-or-time"),
];

static EXTENSION: PropertyDescriptor = PropertyDescriptor::repeatable(
    "X-",
    PartsArrayKind::Extensions,
    Converter::Extension,
)
.value("unknown");

/// Looks up a property by name (case-insensitive).
///
/// `X-` names and unknown names resolve to the extension descriptor.
#[must_use]
pub fn lookup(name: &str) -> &'static PropertyDescriptor {
    if is_extension_name(name) {
        return &EXTENSION;
    }
    PROPERTIES
        .iter()
        .find(|d| d.name.eq_ignore_ascii_case(name))
        .unwrap_or(&EXTENSION)
}

/// Returns the descriptor that files values under `field`.
#[must_use]
pub fn descriptor_for(field: FieldKind) -> &'static PropertyDescriptor {
    PROPERTIES
        .iter()
        .find(|d| d.field == field)
        .unwrap_or(&EXTENSION)
}

/// The descriptor used for vendor and unknown properties.
#[must_use]
pub fn extension() -> &'static PropertyDescriptor {
    &EXTENSION
}

/// All registered (non-extension) properties.
#[must_use]
pub fn all() -> &'static [PropertyDescriptor] {
    PROPERTIES
}

/// Whether `name` is a vendor extension (`X-` prefix).
#[must_use]
pub fn is_extension_name(name: &str) -> bool {
    name.get(..EXTENSION_PREFIX.len())
        .is_some_and(|p| p.eq_ignore_ascii_case(EXTENSION_PREFIX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(lookup("tel").name, "TEL");
        assert_eq!(lookup("Fn").field, FieldKind::Scalar(ScalarKind::FullName));
    }

    #[test]
    fn unknown_and_vendor_names_are_extensions() {
        assert_eq!(lookup("X-SKYPE").converter, Converter::Extension);
        assert_eq!(lookup("x-aim").converter, Converter::Extension);
        assert_eq!(lookup("DEATHDATE").converter, Converter::Extension);
    }

    #[test]
    fn every_field_kind_has_one_descriptor() {
        for kind in ScalarKind::ALL {
            assert_eq!(descriptor_for(kind.into()).field, FieldKind::Scalar(kind));
        }
        for kind in SingletonKind::ALL {
            assert_eq!(descriptor_for(kind.into()).field, FieldKind::Singleton(kind));
        }
        for kind in PartsArrayKind::ALL {
            assert_eq!(descriptor_for(kind.into()).field, FieldKind::Repeatable(kind));
        }
        let names: std::collections::HashSet<_> = all().iter().map(|d| d.name).collect();
        assert_eq!(names.len(), all().len());
    }

    #[test]
    fn defaults() {
        assert_eq!(lookup("TEL").default_type, "voice");
        assert_eq!(lookup("EMAIL").default_type, "internet");
        assert_eq!(lookup("GEO").value_for(VCardVersion::V4_0), "uri");
        assert_eq!(lookup("GEO").value_for(VCardVersion::V3_0), "float");
        assert_eq!(lookup("TZ").value_for(VCardVersion::V2_1), "utc-offset");
        assert_eq!(lookup("NOTE").value_for(VCardVersion::V2_1), "text");
    }

    #[test]
    fn class_has_closed_value_set() {
        let class = lookup("CLASS");
        assert!(class.allows("public"));
        assert!(class.allows("CONFIDENTIAL"));
        assert!(!class.allows("SECRET"));
        assert!(lookup("NOTE").allows("anything"));
    }

    #[test]
    fn known_types() {
        let tel = lookup("TEL");
        assert!(tel.knows_type("CELL"));
        assert!(tel.knows_type("voice"));
        assert!(tel.knows_type("X-CUSTOM"));
        assert!(!tel.knows_type("iphone"));
    }
}
