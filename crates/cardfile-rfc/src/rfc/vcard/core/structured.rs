//! Structured property values (N, ADR, ORG, GENDER, CLIENTPIDMAP).

use serde::Serialize;

/// Structured name (N property).
///
/// Each component may hold several comma-separated values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NameInfo {
    /// Family names (surnames).
    pub family: Vec<String>,
    /// Given names (first names).
    pub given: Vec<String>,
    /// Additional names (middle names).
    pub additional: Vec<String>,
    /// Honorific prefixes (e.g., "Mr.", "Dr.").
    pub prefixes: Vec<String>,
    /// Honorific suffixes (e.g., "Jr.", "M.D.").
    pub suffixes: Vec<String>,
}

impl NameInfo {
    /// Creates a structured name with family and given names.
    #[must_use]
    pub fn simple(family: impl Into<String>, given: impl Into<String>) -> Self {
        Self {
            family: vec![family.into()],
            given: vec![given.into()],
            ..Self::default()
        }
    }

    /// Components in wire order.
    #[must_use]
    pub fn components(&self) -> [&[String]; 5] {
        [
            &self.family,
            &self.given,
            &self.additional,
            &self.prefixes,
            &self.suffixes,
        ]
    }

    /// Returns whether the name is empty (all components are empty).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components().iter().all(|c| c.is_empty())
    }

    /// Formats as a display name (given + family).
    #[must_use]
    pub fn display_name(&self) -> String {
        let mut parts = Vec::new();
        if !self.given.is_empty() {
            parts.push(self.given.join(" "));
        }
        if !self.family.is_empty() {
            parts.push(self.family.join(" "));
        }
        parts.join(" ")
    }
}

/// Delivery address (ADR property).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AddressInfo {
    /// Post office box.
    pub po_box: Vec<String>,
    /// Extended address (e.g., apartment or suite number).
    pub extended: Vec<String>,
    /// Street address.
    pub street: Vec<String>,
    /// Locality (city).
    pub locality: Vec<String>,
    /// Region (state or province).
    pub region: Vec<String>,
    /// Postal code.
    pub postal_code: Vec<String>,
    /// Country name.
    pub country: Vec<String>,
}

impl AddressInfo {
    /// Components in wire order.
    #[must_use]
    pub fn components(&self) -> [&[String]; 7] {
        [
            &self.po_box,
            &self.extended,
            &self.street,
            &self.locality,
            &self.region,
            &self.postal_code,
            &self.country,
        ]
    }

    /// Returns whether the address is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components().iter().all(|c| c.is_empty())
    }

    /// Formats as a single-line address.
    #[must_use]
    pub fn one_line(&self) -> String {
        [
            &self.street,
            &self.locality,
            &self.region,
            &self.postal_code,
            &self.country,
        ]
        .iter()
        .flat_map(|v| v.iter())
        .filter(|s| !s.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// Organization (ORG property): name, then optional unit and role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrganizationInfo {
    /// Organization name.
    pub name: String,
    /// Organizational unit.
    pub unit: Option<String>,
    /// Role or sub-unit within the unit.
    pub role: Option<String>,
}

impl OrganizationInfo {
    /// Creates an organization with just a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Gender (GENDER property).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct GenderInfo {
    /// Sex component; `None` when the code was empty.
    pub sex: Option<Sex>,
    /// Gender identity text (free-form).
    pub identity: Option<String>,
}

/// Sex component of GENDER.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sex {
    /// Male.
    Male,
    /// Female.
    Female,
    /// Other.
    Other,
    /// None or not applicable.
    None,
    /// Unknown.
    Unknown,
}

impl Sex {
    /// Parses from the single-letter code. Codes are case-sensitive.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "M" => Some(Self::Male),
            "F" => Some(Self::Female),
            "O" => Some(Self::Other),
            "N" => Some(Self::None),
            "U" => Some(Self::Unknown),
            _ => Option::None,
        }
    }

    /// Returns the single-character representation.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Male => 'M',
            Self::Female => 'F',
            Self::Other => 'O',
            Self::None => 'N',
            Self::Unknown => 'U',
        }
    }
}

/// Client PID map entry (CLIENTPIDMAP property).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientPidMapInfo {
    /// Source ID.
    pub source_id: u32,
    /// Absolute URI identifying the client.
    pub uri: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_name_simple() {
        let name = NameInfo::simple("Doe", "John");
        assert_eq!(name.display_name(), "John Doe");
        assert!(!name.is_empty());
        assert!(NameInfo::default().is_empty());
    }

    #[test]
    fn address_one_line() {
        let addr = AddressInfo {
            street: vec!["123 Main St".into()],
            locality: vec!["Anytown".into()],
            country: vec!["USA".into()],
            ..AddressInfo::default()
        };
        assert_eq!(addr.one_line(), "123 Main St, Anytown, USA");
    }

    #[test]
    fn sex_codes() {
        assert_eq!(Sex::from_code("F"), Some(Sex::Female));
        assert_eq!(Sex::from_code("f"), None);
        assert_eq!(Sex::from_code("X"), None);
        assert_eq!(Sex::Unknown.as_char(), 'U');
    }
}
