//! Wire-level tokens shared across crates.

/// Clipboard format identifier registered for vCard data.
pub const VCARD_CLIPBOARD_FORMAT: &str = "+//ISBN 1-887687-00-9::versit::PDI//vCard";

/// Record delimiters
pub const BEGIN_VCARD: &str = "BEGIN:VCARD";
pub const END_VCARD: &str = "END:VCARD";

/// Delimiters
pub const VALUE_DELIMITER: char = ':';
pub const FIELD_DELIMITER: char = ';';
pub const VALUE_LIST_DELIMITER: char = ',';
pub const ARGUMENT_VALUE_DELIMITER: char = '=';
pub const GROUP_DELIMITER: char = '.';

/// Argument keys
pub const TYPE_KEY: &str = "TYPE";
pub const VALUE_KEY: &str = "VALUE";
pub const ALTID_KEY: &str = "ALTID";
pub const ENCODING_KEY: &str = "ENCODING";
pub const CHARSET_KEY: &str = "CHARSET";
pub const LANGUAGE_KEY: &str = "LANGUAGE";
pub const PREF_KEY: &str = "PREF";

/// Argument key tokens as they appear on the wire
pub const TYPE_ARGUMENT: &str = const_str::concat!(TYPE_KEY, "=");
pub const VALUE_ARGUMENT: &str = const_str::concat!(VALUE_KEY, "=");
pub const ALTID_ARGUMENT: &str = const_str::concat!(ALTID_KEY, "=");
pub const ENCODING_ARGUMENT: &str = const_str::concat!(ENCODING_KEY, "=");

/// Prefix that marks vendor extension properties and arguments.
pub const EXTENSION_PREFIX: &str = "X-";

/// Width of a folded blob segment, in characters.
pub const BLOB_FOLD_WIDTH: usize = 74;

/// Maximum physical line length in octets before a line gets folded.
pub const MAX_LINE_OCTETS: usize = 75;
