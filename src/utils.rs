//! Text sanitizing and small string helpers.
//!
//! This module provides:
//! - Whitespace normalization for text pulled out of the results page
//! - Best-effort repair of bodies that are not valid UTF-8
//! - File name and log helpers
//!
//! # Encoding repair
//!
//! SCON pages are served as UTF-8 but older documents occasionally carry
//! bytes in a legacy Western code page. [`repair_encoding`] keeps valid input
//! untouched, otherwise tries each configured [`LegacyEncoding`] in order and
//! finally falls back to [`sanitize_utf8`], which always produces valid text.
//!
//! A results page is repaired per text, not as a whole. [`escape_invalid_utf8`]
//! carries broken bytes through HTML parsing as private-use code points, and
//! [`restore_text`] rebuilds and repairs the bytes of each extracted text.
//! This is a heuristic: a successful reinterpretation is not proof that the
//! bytes really were in that code page.

use encoding_rs::{ISO_8859_15, WINDOWS_1252};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tracing::{debug, warn};

/// Start of the block standing in for undecodable bytes during parsing
/// (Supplementary Private Use Area-B; byte `b` maps to `BASE + b`).
const BYTE_ESCAPE_BASE: u32 = 0x10_FE00;

static SPACE_RUNS: Lazy<regex::Regex> =
    Lazy::new(|| regex::Regex::new(" {2,}").expect("space run pattern is valid"));

/// Legacy single-byte code pages tried when a body is not valid UTF-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegacyEncoding {
    /// ISO-8859-1. Every byte maps to the code point of the same value.
    Latin1,
    /// Windows-1252 (Western European).
    Windows1252,
    /// ISO-8859-15.
    Latin9,
}

impl LegacyEncoding {
    /// The default candidate order.
    pub const DEFAULT_ORDER: [LegacyEncoding; 3] = [
        LegacyEncoding::Latin1,
        LegacyEncoding::Windows1252,
        LegacyEncoding::Latin9,
    ];

    /// Decode `bytes` under this code page, or `None` if a byte is unmapped.
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            Self::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
            Self::Windows1252 => WINDOWS_1252
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(Cow::into_owned),
            Self::Latin9 => ISO_8859_15
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(Cow::into_owned),
        }
    }
}

/// Normalize whitespace in extracted text.
///
/// Newlines, carriage returns and tabs are removed, runs of spaces collapse
/// into one, and everything from the first NUL onwards is dropped.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(clean_text("a\n  b\tc"), "a bc");
/// ```
pub fn clean_text(text: &str) -> String {
    let stripped: String = text
        .chars()
        .filter(|c| !matches!(c, '\n' | '\r' | '\t'))
        .collect();
    let mut collapsed = SPACE_RUNS.replace_all(&stripped, " ").into_owned();
    if let Some(pos) = collapsed.find('\0') {
        collapsed.truncate(pos);
    }
    collapsed
}

/// Turn raw bytes into valid text, reinterpreting legacy code pages if needed.
///
/// Valid UTF-8 is returned borrowed and unchanged. Otherwise each encoding in
/// `candidates` is tried in order; the first successful decode wins. When no
/// candidate succeeds, [`sanitize_utf8`] replaces the broken bytes with
/// `replacement`.
pub fn repair_encoding<'a>(
    bytes: &'a [u8],
    candidates: &[LegacyEncoding],
    replacement: char,
) -> Cow<'a, str> {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return Cow::Borrowed(text);
    }

    for encoding in candidates {
        if let Some(decoded) = encoding.decode(bytes) {
            debug!(?encoding, bytes = bytes.len(), "Reinterpreted invalid UTF-8");
            return Cow::Owned(decoded);
        }
    }

    warn!(
        bytes = bytes.len(),
        "No legacy encoding fits; replacing invalid sequences"
    );
    Cow::Owned(sanitize_utf8(bytes, replacement))
}

/// Lossy UTF-8 cleanup.
///
/// Valid runs are copied verbatim and every byte of an invalid sequence
/// becomes one `replacement` character.
pub fn sanitize_utf8(bytes: &[u8], replacement: char) -> String {
    let mut output = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        output.push_str(chunk.valid());
        for _ in chunk.invalid() {
            output.push(replacement);
        }
    }
    output
}

/// Make a body parseable without deciding on its encoding yet.
///
/// Valid UTF-8 passes through. Each byte of an invalid sequence becomes a
/// private-use code point that [`restore_text`] turns back into the byte.
pub fn escape_invalid_utf8(bytes: &[u8]) -> Cow<'_, str> {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return Cow::Borrowed(text);
    }

    let mut output = String::with_capacity(bytes.len() + 16);
    for chunk in bytes.utf8_chunks() {
        output.push_str(chunk.valid());
        output.extend(chunk.invalid().iter().map(|&b| escaped_byte(b)));
    }
    Cow::Owned(output)
}

/// Repair one text taken from a body escaped with [`escape_invalid_utf8`].
///
/// Text without escaped bytes is returned unchanged. Otherwise the original
/// bytes of this text alone are rebuilt and passed to [`repair_encoding`].
pub fn restore_text<'a>(
    text: &'a str,
    candidates: &[LegacyEncoding],
    replacement: char,
) -> Cow<'a, str> {
    if !text.chars().any(|c| unescaped_byte(c).is_some()) {
        return Cow::Borrowed(text);
    }

    let mut bytes = Vec::with_capacity(text.len());
    let mut buf = [0u8; 4];
    for c in text.chars() {
        match unescaped_byte(c) {
            Some(b) => bytes.push(b),
            None => bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes()),
        }
    }
    Cow::Owned(repair_encoding(&bytes, candidates, replacement).into_owned())
}

fn escaped_byte(byte: u8) -> char {
    char::from_u32(BYTE_ESCAPE_BASE + u32::from(byte)).unwrap_or(char::REPLACEMENT_CHARACTER)
}

fn unescaped_byte(c: char) -> Option<u8> {
    u32::from(c)
        .checked_sub(BYTE_ESCAPE_BASE)
        .and_then(|offset| u8::try_from(offset).ok())
}

/// File name fragment for a search term: spaces become dashes.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(term_slug("ação penal"), "ação-penal");
/// ```
pub fn term_slug(term: &str) -> String {
    term.replace(' ', "-")
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut at a character boundary at or below `max` bytes, with
/// an ellipsis and the number of dropped bytes appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}
