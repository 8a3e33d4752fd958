//! vCard line folding.

use cardfile_core::constants::{BLOB_FOLD_WIDTH, MAX_LINE_OCTETS};

const FOLD: &str = "\r\n ";

/// Folds a line to the maximum length.
///
/// Lines longer than 75 octets are folded by inserting CRLF + space.
/// Folds at UTF-8 character boundaries. A short trailing `=` run moves to
/// the next segment, so a quoted-printable line never ends a segment with
/// what reads as a soft break.
#[must_use]
pub fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }

    let mut result = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut segment_start = 0;
    let mut current_len = 0;

    for c in line.chars() {
        let char_len = c.len_utf8();

        if current_len + char_len > MAX_LINE_OCTETS {
            let carried = carry_equals(&mut result, segment_start);
            result.push_str(FOLD);
            segment_start = result.len() - 1;
            result.push_str(&carried);
            current_len = 1 + carried.len(); // The space
        }

        result.push(c);
        current_len += char_len;
    }

    result
}

/// Removes the trailing `=` run of the current segment, unless that would
/// leave the segment without content or overflow the next one. Only
/// quoted-printable lines depend on the carry, and their encoder never
/// emits a run longer than one.
fn carry_equals(result: &mut String, segment_start: usize) -> String {
    let segment = &result[segment_start..];
    let body = segment.strip_prefix(' ').unwrap_or(segment);
    let kept = body.trim_end_matches('=');
    let run = body.len() - kept.len();
    if kept.is_empty() || run == 0 || run > MAX_LINE_OCTETS - 5 {
        return String::new();
    }
    let cut = result.len() - run;
    result.split_off(cut)
}

/// Folds an inline binary line every 74 characters.
///
/// The first physical line holds the property head as well, so it carries
/// fewer payload characters. Base64 padding may end a segment; only
/// quoted-printable lines treat a trailing `=` as a soft break.
#[must_use]
pub fn fold_blob(line: &str) -> String {
    let mut result = String::with_capacity(line.len() + line.len() / BLOB_FOLD_WIDTH * 3);

    for (i, c) in line.chars().enumerate() {
        if i > 0 && i % BLOB_FOLD_WIDTH == 0 {
            result.push_str(FOLD);
        }
        result.push(c);
    }

    result
}
