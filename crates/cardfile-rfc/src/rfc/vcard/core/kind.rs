//! Field kinds: which slot of a [`Card`](super::Card) a property lands in.

use serde::Serialize;

use super::part::PartValue;

/// Properties stored as a single text value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ScalarKind {
    /// KIND
    Kind,
    /// FN
    FullName,
    /// NOTE
    Notes,
    /// MAILER
    Mailer,
    /// PRODID
    ProductId,
    /// SORT-STRING
    SortString,
    /// UID
    Uid,
    /// CLASS
    Classification,
    /// NAME
    SourceName,
    /// SOURCE
    Source,
    /// FBURL
    FreeBusyUrl,
    /// CALURI
    CalendarUrl,
    /// CALADRURI
    CalendarSchedulingRequestUrl,
}

impl ScalarKind {
    /// All scalar kinds in serialization order.
    pub const ALL: [Self; 13] = [
        Self::Kind,
        Self::FullName,
        Self::Notes,
        Self::Mailer,
        Self::ProductId,
        Self::SortString,
        Self::Uid,
        Self::Classification,
        Self::SourceName,
        Self::Source,
        Self::FreeBusyUrl,
        Self::CalendarUrl,
        Self::CalendarSchedulingRequestUrl,
    ];
}

/// Properties that may repeat, stored as ordered lists of parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum PartsArrayKind {
    /// N
    Names,
    /// NICKNAME
    Nicknames,
    /// PHOTO
    Photos,
    /// ADR
    Addresses,
    /// LABEL
    Labels,
    /// TEL
    Telephones,
    /// EMAIL
    Emails,
    /// IMPP
    Impps,
    /// LANG
    Languages,
    /// TZ
    TimeZones,
    /// GEO
    Geos,
    /// TITLE
    Titles,
    /// ROLE
    Roles,
    /// LOGO
    Logos,
    /// ORG
    Organizations,
    /// MEMBER
    Members,
    /// RELATED
    Related,
    /// CATEGORIES
    Categories,
    /// SOUND
    Sounds,
    /// CLIENTPIDMAP
    ClientPidMaps,
    /// URL
    Urls,
    /// KEY
    Keys,
    /// XML
    Xmls,
    /// AGENT
    Agents,
    /// X- and unrecognized properties
    Extensions,
}

impl PartsArrayKind {
    /// All repeatable kinds in serialization order.
    pub const ALL: [Self; 25] = [
        Self::Names,
        Self::Nicknames,
        Self::Photos,
        Self::Addresses,
        Self::Labels,
        Self::Telephones,
        Self::Emails,
        Self::Impps,
        Self::Languages,
        Self::TimeZones,
        Self::Geos,
        Self::Titles,
        Self::Roles,
        Self::Logos,
        Self::Organizations,
        Self::Members,
        Self::Related,
        Self::Categories,
        Self::Sounds,
        Self::ClientPidMaps,
        Self::Urls,
        Self::Keys,
        Self::Xmls,
        Self::Agents,
        Self::Extensions,
    ];

    /// Whether `value` is the concrete value type filed under this kind.
    #[must_use]
    pub fn accepts(self, value: &PartValue) -> bool {
        match self {
            Self::Names => matches!(value, PartValue::Name(_)),
            Self::Addresses => matches!(value, PartValue::Address(_)),
            Self::Labels => matches!(value, PartValue::Label(_)),
            Self::Organizations => matches!(value, PartValue::Organization(_)),
            Self::Telephones
            | Self::Emails
            | Self::Impps
            | Self::Languages
            | Self::Titles
            | Self::Roles
            | Self::Members
            | Self::Related
            | Self::Urls => matches!(value, PartValue::Text(_)),
            Self::Nicknames | Self::Categories => matches!(value, PartValue::TextList(_)),
            Self::Photos | Self::Logos | Self::Sounds => matches!(value, PartValue::Media(_)),
            Self::Keys => matches!(value, PartValue::Key(_)),
            Self::Geos => matches!(value, PartValue::Geo(_)),
            Self::TimeZones => matches!(value, PartValue::TimeZone(_)),
            Self::ClientPidMaps => matches!(value, PartValue::ClientPidMap(_)),
            Self::Xmls => matches!(value, PartValue::Xml(_)),
            Self::Agents => matches!(value, PartValue::Agent(_)),
            Self::Extensions => matches!(value, PartValue::Extension(_)),
        }
    }
}

/// Properties that occur at most once and carry structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SingletonKind {
    /// GENDER
    Gender,
    /// REV
    Revision,
    /// BDAY
    Birthdate,
    /// ANNIVERSARY
    Anniversary,
}

impl SingletonKind {
    /// All singleton kinds in serialization order.
    pub const ALL: [Self; 4] = [
        Self::Gender,
        Self::Revision,
        Self::Birthdate,
        Self::Anniversary,
    ];

    /// Whether `value` is the concrete value type filed under this kind.
    #[must_use]
    pub fn accepts(self, value: &PartValue) -> bool {
        match self {
            Self::Gender => matches!(value, PartValue::Gender(_)),
            Self::Revision | Self::Birthdate | Self::Anniversary => {
                matches!(value, PartValue::DateTime(_))
            }
        }
    }
}

/// The slot a property is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FieldKind {
    Scalar(ScalarKind),
    Repeatable(PartsArrayKind),
    Singleton(SingletonKind),
}

impl From<ScalarKind> for FieldKind {
    fn from(kind: ScalarKind) -> Self {
        Self::Scalar(kind)
    }
}

impl From<PartsArrayKind> for FieldKind {
    fn from(kind: PartsArrayKind) -> Self {
        Self::Repeatable(kind)
    }
}

impl From<SingletonKind> for FieldKind {
    fn from(kind: SingletonKind) -> Self {
        Self::Singleton(kind)
    }
}

/// Common property names as constants.
pub mod names {
    // Identification properties
    pub const FN: &str = "FN";
    pub const N: &str = "N";
    pub const NICKNAME: &str = "NICKNAME";
    pub const PHOTO: &str = "PHOTO";
    pub const BDAY: &str = "BDAY";
    pub const ANNIVERSARY: &str = "ANNIVERSARY";
    pub const GENDER: &str = "GENDER";

    // Delivery addressing
    pub const ADR: &str = "ADR";
    pub const LABEL: &str = "LABEL";

    // Communications
    pub const TEL: &str = "TEL";
    pub const EMAIL: &str = "EMAIL";
    pub const IMPP: &str = "IMPP";
    pub const LANG: &str = "LANG";
    pub const MAILER: &str = "MAILER";

    // Geographical
    pub const TZ: &str = "TZ";
    pub const GEO: &str = "GEO";

    // Organizational
    pub const TITLE: &str = "TITLE";
    pub const ROLE: &str = "ROLE";
    pub const LOGO: &str = "LOGO";
    pub const ORG: &str = "ORG";
    pub const MEMBER: &str = "MEMBER";
    pub const RELATED: &str = "RELATED";
    pub const AGENT: &str = "AGENT";

    // Explanatory
    pub const CATEGORIES: &str = "CATEGORIES";
    pub const NOTE: &str = "NOTE";
    pub const PRODID: &str = "PRODID";
    pub const REV: &str = "REV";
    pub const SORT_STRING: &str = "SORT-STRING";
    pub const SOUND: &str = "SOUND";
    pub const UID: &str = "UID";
    pub const CLIENTPIDMAP: &str = "CLIENTPIDMAP";
    pub const URL: &str = "URL";

    // Security
    pub const CLASS: &str = "CLASS";
    pub const KEY: &str = "KEY";

    // Calendar
    pub const FBURL: &str = "FBURL";
    pub const CALADRURI: &str = "CALADRURI";
    pub const CALURI: &str = "CALURI";

    // General/structural
    pub const BEGIN: &str = "BEGIN";
    pub const END: &str = "END";
    pub const VERSION: &str = "VERSION";
    pub const SOURCE: &str = "SOURCE";
    pub const NAME: &str = "NAME";
    pub const KIND: &str = "KIND";
    pub const XML: &str = "XML";
}
