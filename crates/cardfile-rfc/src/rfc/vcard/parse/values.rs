//! Value-level parsing helpers: unescaping, structured splitting, dates.

use chrono::NaiveTime;

use super::error::{ParseError, ParseErrorKind, ParseResult};
use crate::rfc::vcard::core::{DateAndOrTime, VCardDate, VCardTime, VCardUtcOffset, VCardVersion};

/// Unescapes a text value.
///
/// 3.0 and later: `\n`, `\N` (newline), `\,`, `\;`, `\\`.
/// 2.1 only escapes `;`; a backslash run before `;` is halved, other
/// backslashes are literal.
#[must_use]
pub fn unescape_text(s: &str, version: VCardVersion) -> String {
    if version.major() == 2 {
        return unescape_legacy(s);
    }

    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.peek() {
                Some('n' | 'N') => {
                    chars.next();
                    result.push('\n');
                }
                Some(&escaped @ (',' | ';' | '\\')) => {
                    chars.next();
                    result.push(escaped);
                }
                _ => result.push(c),
            }
        } else {
            result.push(c);
        }
    }

    result
}

fn unescape_legacy(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut backslashes = 0usize;

    for c in s.chars() {
        if c == '\\' {
            backslashes += 1;
            continue;
        }
        if c == ';' {
            result.extend(std::iter::repeat_n('\\', backslashes / 2));
        } else {
            result.extend(std::iter::repeat_n('\\', backslashes));
        }
        backslashes = 0;
        result.push(c);
    }
    result.extend(std::iter::repeat_n('\\', backslashes));

    result
}

/// Splits a structured value on unescaped semicolons.
///
/// A backslash always escapes the following character, so `\\;` is a
/// literal backslash followed by a separator.
#[must_use]
pub fn split_structured(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == ';' {
            parts.push(&s[start..i]);
            start = i + 1;
        }
    }

    parts.push(&s[start..]);
    parts
}

/// Splits a component on unescaped commas and unescapes each value.
///
/// An empty component yields no values.
#[must_use]
pub fn split_component(s: &str, version: VCardVersion) -> Vec<String> {
    if s.is_empty() {
        return Vec::new();
    }

    let mut parts = Vec::new();
    let mut start = 0;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == ',' {
            parts.push(unescape_text(&s[start..i], version));
            start = i + 1;
        }
    }

    parts.push(unescape_text(&s[start..], version));
    parts
}

/// Decodes a quoted-printable value into UTF-8 (lossy).
///
/// ## Errors
/// Returns an encoding error for a malformed `=XX` escape.
pub fn decode_quoted_printable(s: &str, line_num: usize) -> ParseResult<String> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'=' {
            let hex = bytes
                .get(i + 1..i + 3)
                .and_then(|h| std::str::from_utf8(h).ok())
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| {
                    ParseError::new(
                        ParseErrorKind::EncodingError,
                        line_num,
                        "malformed quoted-printable escape",
                    )
                })?;
            out.push(hex);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }

    Ok(String::from_utf8_lossy(&out).into_owned())
}

fn date_error(line_num: usize, message: impl Into<String>) -> ParseError {
    ParseError::new(ParseErrorKind::InvalidDateTime, line_num, message)
}

/// Rejects non-ASCII input so fixed-width fields can be sliced by byte.
fn ascii<'a>(s: &'a str, line_num: usize, what: &str) -> ParseResult<&'a str> {
    if s.is_ascii() {
        Ok(s)
    } else {
        Err(date_error(line_num, format!("invalid {what}: {s:?}")))
    }
}

/// Parses a fixed-width run of ASCII digits.
fn digits<T: std::str::FromStr>(s: &str, line_num: usize, what: &str) -> ParseResult<T> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(date_error(line_num, format!("invalid {what}: {s:?}")));
    }
    s.parse()
        .map_err(|_err| date_error(line_num, format!("invalid {what}: {s:?}")))
}

fn check_range(value: u32, max: u32, line_num: usize, what: &str) -> ParseResult<u32> {
    if value > max {
        return Err(date_error(line_num, format!("{what} out of range: {value}")));
    }
    Ok(value)
}

fn month(s: &str, line_num: usize) -> ParseResult<u32> {
    let m: u32 = digits(s, line_num, "month")?;
    if m == 0 {
        return Err(date_error(line_num, "month out of range: 0"));
    }
    check_range(m, 12, line_num, "month")
}

fn day(s: &str, line_num: usize) -> ParseResult<u32> {
    let d: u32 = digits(s, line_num, "day")?;
    if d == 0 {
        return Err(date_error(line_num, "day out of range: 0"));
    }
    check_range(d, 31, line_num, "day")
}

fn full_date(year: &str, m: &str, d: &str, line_num: usize) -> ParseResult<VCardDate> {
    let year: i32 = digits(year, line_num, "year")?;
    VCardDate::ymd(year, month(m, line_num)?, day(d, line_num)?)
        .ok_or_else(|| date_error(line_num, "invalid calendar date"))
}

/// Parses a date value.
///
/// Accepts `YYYYMMDD`, `YYYY-MM-DD`, `YYYY-MM`, `YYYY`, `--MMDD`, `--MM-DD`,
/// `--MM` and `---DD`.
///
/// ## Errors
/// Returns an error if the date format is invalid or unrecognized.
pub fn parse_date(value: &str, line_num: usize) -> ParseResult<VCardDate> {
    let s = ascii(value.trim(), line_num, "date")?;

    if let Some(rest) = s.strip_prefix("---") {
        return Ok(VCardDate::Day(day(rest, line_num)?));
    }

    if let Some(rest) = s.strip_prefix("--") {
        return match (rest.len(), rest.split_once('-')) {
            (_, Some((m, d))) => Ok(VCardDate::MonthDay {
                month: month(m, line_num)?,
                day: day(d, line_num)?,
            }),
            (4, None) => Ok(VCardDate::MonthDay {
                month: month(&rest[..2], line_num)?,
                day: day(&rest[2..], line_num)?,
            }),
            (2, None) => Ok(VCardDate::Month(month(rest, line_num)?)),
            _ => Err(date_error(line_num, format!("unrecognized date format: {s}"))),
        };
    }

    let parts: Vec<&str> = s.split('-').collect();
    match parts.as_slice() {
        [y, m, d] if y.len() == 4 => full_date(y, m, d, line_num),
        [y, m] if y.len() == 4 => Ok(VCardDate::YearMonth {
            year: digits(y, line_num, "year")?,
            month: month(m, line_num)?,
        }),
        [basic] if basic.len() == 8 => full_date(&basic[..4], &basic[4..6], &basic[6..], line_num),
        [year] if year.len() == 4 => Ok(VCardDate::Year(digits(year, line_num, "year")?)),
        _ => Err(date_error(line_num, format!("unrecognized date format: {s}"))),
    }
}

/// Parses a time value with optional UTC offset.
///
/// ## Errors
/// Returns an error if the time or offset format is invalid.
pub fn parse_time(
    value: &str,
    line_num: usize,
) -> ParseResult<(VCardTime, Option<VCardUtcOffset>)> {
    let s = value.trim();

    let (time_str, offset) = if let Some(stripped) = s.strip_suffix('Z') {
        (stripped, Some(VCardUtcOffset::UTC))
    } else if let Some(pos) = s.rfind('+') {
        (&s[..pos], Some(parse_utc_offset(&s[pos..], line_num)?))
    } else if let Some(pos) = s.rfind('-').filter(|&pos| {
        // A leading dash marks a truncated time, not an offset.
        pos > 0 && s[..pos].bytes().any(|b| b.is_ascii_digit())
    }) {
        (&s[..pos], Some(parse_utc_offset(&s[pos..], line_num)?))
    } else {
        (s, None)
    };

    Ok((parse_time_value(time_str, line_num)?, offset))
}

fn parse_time_value(s: &str, line_num: usize) -> ParseResult<VCardTime> {
    let s = ascii(s, line_num, "time")?;
    let minute = |m: &str| check_range(digits(m, line_num, "minute")?, 59, line_num, "minute");
    // 60 is a leap second.
    let second = |sec: &str| {
        let whole = sec.split_once(['.', ',']).map_or(sec, |(whole, _)| whole);
        check_range(digits(whole, line_num, "second")?, 60, line_num, "second")
    };
    let hour = |h: &str| check_range(digits(h, line_num, "hour")?, 23, line_num, "hour");

    if let Some(rest) = s.strip_prefix("--") {
        return Ok(VCardTime::Second(second(rest)?));
    }

    if let Some(rest) = s.strip_prefix('-') {
        let rest = rest.replace(':', "");
        return match rest.len() {
            2 => Ok(VCardTime::MinuteSecond {
                minute: minute(&rest)?,
                second: 0,
            }),
            4 => Ok(VCardTime::MinuteSecond {
                minute: minute(&rest[..2])?,
                second: second(&rest[2..])?,
            }),
            _ => Err(date_error(line_num, "invalid truncated time format")),
        };
    }

    let compact = s.replace(':', "");
    let (whole, _fraction) = compact
        .split_once(['.', ','])
        .unwrap_or((compact.as_str(), ""));

    match whole.len() {
        2 => Ok(VCardTime::Hour(hour(whole)?)),
        4 => Ok(VCardTime::HourMinute {
            hour: hour(&whole[..2])?,
            minute: minute(&whole[2..])?,
        }),
        6 => {
            let (h, m, sec) = (hour(&whole[..2])?, minute(&whole[2..4])?, second(&whole[4..])?);
            // A leap second is stored as 59 plus one full second of nanos.
            let time = if sec == 60 {
                NaiveTime::from_hms_nano_opt(h, m, 59, 1_000_000_000)
            } else {
                NaiveTime::from_hms_opt(h, m, sec)
            }
            .ok_or_else(|| date_error(line_num, "invalid time"))?;
            Ok(VCardTime::Full(time))
        }
        _ => Err(date_error(line_num, format!("invalid time format: {s}"))),
    }
}

/// Parses a UTC offset: `Z`, `+HH`, `+HHMM` or `+HH:MM` (or `-`).
///
/// ## Errors
/// Returns an error if the offset format is invalid.
pub fn parse_utc_offset(s: &str, line_num: usize) -> ParseResult<VCardUtcOffset> {
    let s = s.trim();

    if s == "Z" {
        return Ok(VCardUtcOffset::UTC);
    }

    let s = ascii(s, line_num, "UTC offset")?;
    let (sign, rest) = if let Some(rest) = s.strip_prefix('+') {
        (1i8, rest)
    } else if let Some(rest) = s.strip_prefix('-') {
        (-1i8, rest)
    } else {
        return Err(date_error(line_num, "UTC offset must start with + or -"));
    };

    let compact = rest.replace(':', "");
    let (h, m) = match compact.len() {
        2 => (&compact[..], "00"),
        4 => (&compact[..2], &compact[2..]),
        _ => return Err(date_error(line_num, format!("invalid UTC offset: {s}"))),
    };
    let hours: i8 = digits(h, line_num, "offset hours")?;
    let minutes: u8 = digits(m, line_num, "offset minutes")?;
    if hours > 14 || minutes > 59 {
        return Err(date_error(line_num, format!("UTC offset out of range: {s}")));
    }

    Ok(VCardUtcOffset::new(sign * hours, minutes))
}

/// Parses a date-and-or-time value.
///
/// `value_type` of `text` keeps the value as free text.
///
/// ## Errors
/// Returns an error if the date/time format is invalid.
pub fn parse_date_and_or_time(
    value: &str,
    value_type: Option<&str>,
    line_num: usize,
) -> ParseResult<DateAndOrTime> {
    let s = value.trim();

    if value_type.is_some_and(|vt| vt.eq_ignore_ascii_case("text")) {
        return Ok(DateAndOrTime::Text(s.to_string()));
    }

    if let Some(stripped) = s.strip_prefix('T') {
        let (time, offset) = parse_time(stripped, line_num)?;
        return Ok(DateAndOrTime::Time { time, offset });
    }

    if let Some((date, time)) = s.split_once('T') {
        let date = parse_date(date, line_num)?;
        let (time, offset) = parse_time(time, line_num)?;
        return Ok(DateAndOrTime::DateTime { date, time, offset });
    }

    Ok(DateAndOrTime::Date(parse_date(s, line_num)?))
}
