//! vCard format generations.

use serde::Serialize;

/// vCard version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
pub enum VCardVersion {
    /// vCard 2.1 (versit consortium).
    #[serde(rename = "2.1")]
    V2_1,
    /// vCard 3.0 (RFC 2426).
    #[serde(rename = "3.0")]
    V3_0,
    /// vCard 4.0 (RFC 6350).
    #[default]
    #[serde(rename = "4.0")]
    V4_0,
    /// vCard 5.0.
    #[serde(rename = "5.0")]
    V5_0,
}

impl VCardVersion {
    /// All versions, oldest first.
    pub const ALL: [Self; 4] = [Self::V2_1, Self::V3_0, Self::V4_0, Self::V5_0];

    /// Parses an exact version token.
    ///
    /// Only `2.1`, `3.0`, `4.0` and `5.0` are accepted; surrounding
    /// whitespace is not.
    #[must_use]
    pub fn from_token(s: &str) -> Option<Self> {
        match s {
            "2.1" => Some(Self::V2_1),
            "3.0" => Some(Self::V3_0),
            "4.0" => Some(Self::V4_0),
            "5.0" => Some(Self::V5_0),
            _ => None,
        }
    }

    /// Returns the version string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V2_1 => "2.1",
            Self::V3_0 => "3.0",
            Self::V4_0 => "4.0",
            Self::V5_0 => "5.0",
        }
    }

    /// Returns the major version number.
    #[must_use]
    pub const fn major(self) -> u8 {
        match self {
            Self::V2_1 => 2,
            Self::V3_0 => 3,
            Self::V4_0 => 4,
            Self::V5_0 => 5,
        }
    }

    /// Whether `VERSION` must directly follow `BEGIN:VCARD`.
    #[must_use]
    pub const fn requires_leading_version(self) -> bool {
        self.major() >= 4
    }
}

impl core::str::FromStr for VCardVersion {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(s).ok_or(())
    }
}

impl std::fmt::Display for VCardVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
