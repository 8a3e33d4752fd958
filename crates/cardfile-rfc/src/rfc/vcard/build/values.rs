//! Typed value -> raw value, the inverse of the parse converters.

use std::fmt::Write as _;

use super::escape::{escape_component, escape_text};
use super::serializer::serialize;
use crate::rfc::vcard::core::{
    AddressInfo, AgentInfo, DateAndOrTime, GenderInfo, MediaInfo, NameInfo, OrganizationInfo,
    Part, PartValue, VCardDate, VCardTime, VCardUtcOffset, VCardVersion,
};

/// A serialized value and how it must be laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// Ordinary value, folded at 75 octets.
    Inline(String),
    /// Inline base64 payload, folded every 74 characters.
    Blob(String),
    /// vCard 2.1 embedded card, written on the lines after the property.
    NestedBlock(String),
}

/// Serializes a part's value for `version`.
#[must_use]
pub fn serialize_value(part: &Part, version: VCardVersion) -> RawValue {
    let inline = RawValue::Inline;

    match &part.value {
        PartValue::Name(name) => inline(serialize_name(name, version)),
        PartValue::Address(addr) => inline(serialize_address(addr, version)),
        PartValue::Label(s) | PartValue::Text(s) | PartValue::Xml(s) => {
            inline(escape_text(s, version))
        }
        PartValue::Organization(org) => inline(serialize_organization(org, version)),
        PartValue::TextList(list) => inline(join_component(list, version)),
        PartValue::Media(media) | PartValue::Key(media) => serialize_media(media, version),
        PartValue::Geo(s) | PartValue::TimeZone(s) => inline(s.clone()),
        PartValue::Gender(gender) => inline(serialize_gender(gender, version)),
        PartValue::ClientPidMap(map) => inline(format!("{};{}", map.source_id, map.uri)),
        PartValue::DateTime(dt) => inline(format_date_and_or_time(dt)),
        PartValue::Agent(agent) => serialize_agent(agent, &part.meta.value_type, version),
        PartValue::Extension(ext) => inline(ext.values.join(";")),
    }
}

fn join_component(list: &[String], version: VCardVersion) -> String {
    list.iter()
        .map(|s| escape_component(s, version))
        .collect::<Vec<_>>()
        .join(",")
}

fn join_components(components: &[&[String]], version: VCardVersion) -> String {
    components
        .iter()
        .map(|c| join_component(c, version))
        .collect::<Vec<_>>()
        .join(";")
}

/// family;given;additional;prefixes;suffixes
fn serialize_name(name: &NameInfo, version: VCardVersion) -> String {
    let components = name.components();
    let mut len = components.len();
    if version.major() < 4 {
        while len > 2 && components[len - 1].is_empty() {
            len -= 1;
        }
    }
    join_components(&components[..len], version)
}

/// POBox;Extended;Street;Locality;Region;PostalCode;Country
fn serialize_address(addr: &AddressInfo, version: VCardVersion) -> String {
    join_components(&addr.components(), version)
}

fn serialize_organization(org: &OrganizationInfo, version: VCardVersion) -> String {
    let mut output = escape_text(&org.name, version);
    if org.unit.is_some() || org.role.is_some() {
        output.push(';');
        output.push_str(&escape_text(org.unit.as_deref().unwrap_or_default(), version));
    }
    if let Some(role) = &org.role {
        output.push(';');
        output.push_str(&escape_text(role, version));
    }
    output
}

fn serialize_gender(gender: &GenderInfo, version: VCardVersion) -> String {
    let mut output = String::new();
    if let Some(sex) = gender.sex {
        output.push(sex.as_char());
    }
    if let Some(identity) = &gender.identity {
        output.push(';');
        output.push_str(&escape_text(identity, version));
    }
    output
}

fn serialize_media(media: &MediaInfo, version: VCardVersion) -> RawValue {
    if media.is_blob() && version.major() < 4 && !media.payload.starts_with("data:") {
        RawValue::Blob(media.payload.clone())
    } else {
        RawValue::Inline(media.payload.clone())
    }
}

fn serialize_agent(agent: &AgentInfo, value_type: &str, version: VCardVersion) -> RawValue {
    if !agent.cards.is_empty() {
        let text = serialize(&agent.cards);
        if version.major() == 2 {
            return RawValue::NestedBlock(text);
        }
        let joined = text.replace("\r\n", "\n");
        return RawValue::Inline(escape_text(joined.trim_end_matches('\n'), version));
    }

    match &agent.uri {
        Some(uri) if ["uri", "url"].iter().any(|t| value_type.eq_ignore_ascii_case(t)) => {
            RawValue::Inline(uri.clone())
        }
        Some(text) => RawValue::Inline(escape_text(text, version)),
        None => RawValue::Inline(String::new()),
    }
}

/// Formats a date-and-or-time in the basic format.
///
/// Free text is returned verbatim.
#[must_use]
pub fn format_date_and_or_time(dt: &DateAndOrTime) -> String {
    let mut output = String::new();
    match dt {
        DateAndOrTime::Date(date) => format_date(date, &mut output),
        DateAndOrTime::DateTime { date, time, offset } => {
            format_date(date, &mut output);
            output.push('T');
            format_time(time, &mut output);
            if let Some(off) = offset {
                format_utc_offset(*off, &mut output);
            }
        }
        DateAndOrTime::Time { time, offset } => {
            output.push('T');
            format_time(time, &mut output);
            if let Some(off) = offset {
                format_utc_offset(*off, &mut output);
            }
        }
        DateAndOrTime::Text(s) => output.push_str(s),
    }
    output
}

fn format_date(date: &VCardDate, output: &mut String) {
    match date {
        VCardDate::Full(d) => {
            write!(output, "{}", d.format("%Y%m%d")).ok();
        }
        VCardDate::YearMonth { year, month } => {
            write!(output, "{year:04}-{month:02}").ok();
        }
        VCardDate::Year(year) => {
            write!(output, "{year:04}").ok();
        }
        VCardDate::Month(month) => {
            write!(output, "--{month:02}").ok();
        }
        VCardDate::MonthDay { month, day } => {
            write!(output, "--{month:02}{day:02}").ok();
        }
        VCardDate::Day(day) => {
            write!(output, "---{day:02}").ok();
        }
    }
}

fn format_time(time: &VCardTime, output: &mut String) {
    match time {
        VCardTime::Full(t) => {
            write!(output, "{}", t.format("%H%M%S")).ok();
        }
        VCardTime::HourMinute { hour, minute } => {
            write!(output, "{hour:02}{minute:02}").ok();
        }
        VCardTime::Hour(hour) => {
            write!(output, "{hour:02}").ok();
        }
        VCardTime::MinuteSecond { minute, second } => {
            write!(output, "-{minute:02}{second:02}").ok();
        }
        VCardTime::Second(second) => {
            write!(output, "--{second:02}").ok();
        }
    }
}

fn format_utc_offset(offset: VCardUtcOffset, output: &mut String) {
    if offset.is_utc() {
        output.push('Z');
    } else {
        let sign = if offset.hours >= 0 { '+' } else { '-' };
        write!(output, "{sign}{:02}{:02}", offset.hours.unsigned_abs(), offset.minutes).ok();
    }
}
