//! vCard property arguments (parameters).

use cardfile_core::constants::{
    ALTID_KEY, CHARSET_KEY, ENCODING_KEY, LANGUAGE_KEY, PREF_KEY, TYPE_KEY, VALUE_KEY,
};
use serde::Serialize;

/// A property argument.
///
/// Arguments can have multiple values (e.g., `TYPE=home,work`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Argument {
    /// Argument key. Registered keys are uppercased; vendor keys keep their spelling.
    pub key: String,
    /// Argument values.
    pub values: Vec<String>,
    /// Whether values compare case-sensitively.
    pub case_sensitive: bool,
}

impl Argument {
    /// Creates a new argument with a single value.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::multi(key, vec![value.into()])
    }

    /// Creates an argument with multiple values.
    #[must_use]
    pub fn multi(key: impl Into<String>, values: Vec<String>) -> Self {
        let key = normalize_key(key.into());
        let case_sensitive = is_case_sensitive(&key);
        Self {
            key,
            values,
            case_sensitive,
        }
    }

    /// Returns the first value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }

    /// Returns whether the argument has the specified value.
    #[must_use]
    pub fn has_value(&self, value: &str) -> bool {
        self.values.iter().any(|v| {
            if self.case_sensitive {
                v == value
            } else {
                v.eq_ignore_ascii_case(value)
            }
        })
    }

    /// Returns whether the key matches (case-insensitive).
    #[must_use]
    pub fn is(&self, key: &str) -> bool {
        self.key.eq_ignore_ascii_case(key)
    }

    // --- Convenience constructors ---

    /// Creates a TYPE argument.
    #[must_use]
    pub fn type_arg(value: impl Into<String>) -> Self {
        Self::new(TYPE_KEY, value)
    }

    /// Creates a VALUE argument specifying the value type.
    #[must_use]
    pub fn value_type(type_name: impl Into<String>) -> Self {
        Self::new(VALUE_KEY, type_name)
    }

    /// Creates an ALTID argument.
    #[must_use]
    pub fn altid(id: u32) -> Self {
        Self::new(ALTID_KEY, id.to_string())
    }

    /// Creates an ENCODING argument.
    #[must_use]
    pub fn encoding(value: impl Into<String>) -> Self {
        Self::new(ENCODING_KEY, value)
    }

    /// Creates a LANGUAGE argument.
    #[must_use]
    pub fn language(tag: impl Into<String>) -> Self {
        Self::new(LANGUAGE_KEY, tag)
    }

    /// Creates a PREF argument with priority (1-100).
    #[must_use]
    pub fn pref(priority: u8) -> Self {
        Self::new(PREF_KEY, priority.to_string())
    }
}

/// Registered argument keys; everything else is kept verbatim.
const REGISTERED_KEYS: &[&str] = &[
    TYPE_KEY,
    VALUE_KEY,
    ALTID_KEY,
    ENCODING_KEY,
    CHARSET_KEY,
    LANGUAGE_KEY,
    PREF_KEY,
    "PID",
    "MEDIATYPE",
    "CALSCALE",
    "SORT-AS",
    "GEO",
    "TZ",
    "LABEL",
    "CONTEXT",
];

fn normalize_key(key: String) -> String {
    if REGISTERED_KEYS.iter().any(|k| k.eq_ignore_ascii_case(&key)) {
        key.to_ascii_uppercase()
    } else {
        key
    }
}

/// Keys whose values are tokens rather than free text.
fn is_case_sensitive(key: &str) -> bool {
    ![TYPE_KEY, VALUE_KEY, ENCODING_KEY, CHARSET_KEY, "CALSCALE", "CONTEXT"]
        .iter()
        .any(|k| k.eq_ignore_ascii_case(key))
}

/// Common TYPE values as constants.
pub mod types {
    // Location
    pub const HOME: &str = "home";
    pub const WORK: &str = "work";
    pub const PREF: &str = "pref";

    // Telephone types
    pub const TEXT: &str = "text";
    pub const VOICE: &str = "voice";
    pub const FAX: &str = "fax";
    pub const CELL: &str = "cell";
    pub const VIDEO: &str = "video";
    pub const PAGER: &str = "pager";
    pub const TEXTPHONE: &str = "textphone";

    // Email types
    pub const INTERNET: &str = "internet";
}
