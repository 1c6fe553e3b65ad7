use memchr::{memchr, memchr3};

use crate::constants::{is_quote, is_space, is_structural_byte};
use crate::document::Span;

/// A span cut out of the input plus the position of the byte that ended it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scanned {
    pub span: Span,
    pub stop: usize,
}

/// Length of the input up to (not including) the first NUL byte.
pub fn terminated_len(bytes: &[u8]) -> usize {
    memchr(0, bytes).unwrap_or(bytes.len())
}

/// Scans a member name starting at `pos`.
///
/// Leading quotes, whitespace and commas are skipped. The name ends at `:`,
/// a quote, or the end of input; trailing whitespace is trimmed. `stop` is
/// `bytes.len()` when no delimiter was found.
pub fn scan_key(bytes: &[u8], pos: usize) -> Scanned {
    let mut start = pos;
    while start < bytes.len() && skips_before_key(bytes[start]) {
        start += 1;
    }
    let stop = memchr3(b':', b'"', b'\'', &bytes[start..])
        .map_or(bytes.len(), |offset| start + offset);
    Scanned {
        span: Span::new(start, trim_end(bytes, start, stop)),
        stop,
    }
}

/// Scans a scalar value starting at `pos`.
///
/// Leading `:`, quotes and whitespace are skipped. The value ends at a quote,
/// a comma, any bracket or brace, or the end of input; trailing whitespace is
/// trimmed.
pub fn scan_value(bytes: &[u8], pos: usize) -> Scanned {
    let mut start = pos;
    while start < bytes.len() && skips_before_value(bytes[start]) {
        start += 1;
    }
    let mut stop = start;
    while stop < bytes.len() && !ends_value(bytes[stop]) {
        stop += 1;
    }
    Scanned {
        span: Span::new(start, trim_end(bytes, start, stop)),
        stop,
    }
}

/// Skips the separator run between a member name and its value.
///
/// Stops early on an empty quoted string (`""` or `''`) so the dispatcher can
/// turn it into an empty leaf.
pub fn skip_separators(bytes: &[u8], pos: usize) -> usize {
    let mut idx = pos;
    while idx < bytes.len() {
        let byte = bytes[idx];
        if is_quote(byte) && bytes.get(idx + 1) == Some(&byte) {
            break;
        }
        if !skips_before_value(byte) {
            break;
        }
        idx += 1;
    }
    idx
}

/// Whether a quote at `pos` can open a value: the last non-space byte before
/// it is `:`, `,` or an opening bracket, or there is none. A quote anywhere
/// else closes or escapes text and must not start an empty string.
pub fn opens_value(bytes: &[u8], pos: usize) -> bool {
    match bytes[..pos].iter().rev().find(|&&byte| !is_space(byte)) {
        Some(&byte) => matches!(byte, b':' | b',' | b'[' | b'{'),
        None => true,
    }
}

#[inline]
fn skips_before_key(byte: u8) -> bool {
    is_quote(byte) || is_space(byte) || byte == b','
}

#[inline]
fn skips_before_value(byte: u8) -> bool {
    byte == b':' || is_quote(byte) || is_space(byte)
}

#[inline]
fn ends_value(byte: u8) -> bool {
    is_quote(byte) || is_structural_byte(byte)
}

fn trim_end(bytes: &[u8], start: usize, stop: usize) -> usize {
    let mut end = stop;
    while end > start && is_space(bytes[end - 1]) {
        end -= 1;
    }
    end
}
