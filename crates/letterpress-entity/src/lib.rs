#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Character-entity codec: converts between ASCII text carrying HTML-style
//! entity references and full Unicode text.
//!
//! # Design
//! - Decoding is best effort and never fails: spans that do not parse as a
//!   reference (unknown name, out-of-range or surrogate code point) stay in
//!   the output as literal text.
//! - The two representations are distinct types. [`EntityString`] is always
//!   pure ASCII and may contain entity syntax; decoded text is a plain
//!   [`String`]. Conversions are explicit, never implicit.
//! - `&amp;` resolves last, after every other reference form, so decoding
//!   never corrupts an `&` it has just produced and is a no-op on text that
//!   contains no remaining entity syntax.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::fmt;

mod table;

/// Literal form of the ampersand entity, always resolved last.
const AMPERSAND_REF: &str = "&amp;";

static DECIMAL_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&#\d+;").expect("decimal reference pattern"));
static HEX_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&#[xX][0-9a-fA-F]+;").expect("hex reference pattern"));
static NAMED_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&\w+;").expect("named reference pattern"));
static MARKUP_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<.*?>").expect("markup tag pattern"));

/// ASCII-safe text that may contain entity references.
///
/// The invariant is structural: values are only produced by [`encode`] (or by
/// methods on this type), which replace every non-ASCII code point with its
/// decimal reference. Holding one of these means the bytes are safe to hand
/// to ASCII-only sinks.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityString(String);

impl EntityString {
    /// Borrow the encoded text.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Consume the wrapper, yielding the encoded text.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Decode back to full Unicode text.
    #[must_use]
    pub fn decode(&self) -> String {
        decode(&self.0)
    }

    /// Number of code points in the decoded form.
    ///
    /// A multi-character entity reference counts as a single unit.
    #[must_use]
    pub fn decoded_len(&self) -> usize {
        self.decode().chars().count()
    }

    /// Truncate so the decoded length stays under `length`, appending `...`.
    ///
    /// Returns the value unchanged when the decoded length is strictly below
    /// `length`; at or above it, keeps the first `length` decoded code points
    /// and appends the ellipsis. The cut point is a decoded code-point
    /// boundary, never the middle of a reference.
    #[must_use]
    pub fn truncate(&self, length: usize) -> Self {
        if self.decoded_len() < length {
            return self.clone();
        }
        let head = self.substring(0, length);
        Self(format!("{}...", head.0))
    }

    /// Slice by decoded code-point index, re-encoding the result.
    ///
    /// Out-of-range bounds clamp to the decoded length; an empty or inverted
    /// range yields an empty string.
    #[must_use]
    pub fn substring(&self, start: usize, end: usize) -> Self {
        let sliced: String = self
            .decode()
            .chars()
            .skip(start)
            .take(end.saturating_sub(start))
            .collect();
        encode(&sliced)
    }

    /// Rewrite decimal references into `%HH%HH` URI escaping.
    ///
    /// Each `&#NNN;` becomes two percent-escaped bytes taken from the
    /// four-digit hex form of the code point; ASCII text passes through
    /// unchanged.
    #[must_use]
    pub fn to_uri_escaped(&self) -> String {
        let mut out = self.0.clone();
        for reference in unique_matches(&DECIMAL_REF, &out) {
            let code: u32 = reference[2..reference.len() - 1].parse().unwrap_or(0);
            let hex = format!("{code:04x}");
            let escaped = format!("%{}%{}", &hex[0..2], &hex[2..4]);
            out = out.replace(&reference, &escaped);
        }
        out
    }
}

impl fmt::Display for EntityString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EntityString {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Encode arbitrary Unicode text as ASCII with decimal entity references.
///
/// Every code point at or above 128 becomes `&#NNN;`; ASCII passes through
/// untouched. The roundtrip `decode(encode(s)) == s` holds for any `s`.
#[must_use]
pub fn encode(text: &str) -> EntityString {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_ascii() {
            out.push(ch);
        } else {
            out.push_str(&format!("&#{};", u32::from(ch)));
        }
    }
    EntityString(out)
}

/// Decode entity references into Unicode text, best effort.
///
/// Reference forms are resolved in precedence order: decimal (`&#NNN;`),
/// then hexadecimal (`&#xHH;`), then named (`&name;`). For each unique
/// syntactically valid reference, every occurrence of that exact literal is
/// replaced with the code point it denotes. Unknown names and numbers that
/// do not denote a valid scalar value stay as literal text. `&amp;` resolves
/// to `&` only after everything else, so the result of a named decode is
/// never re-expanded.
#[must_use]
pub fn decode(text: &str) -> String {
    let mut out = text.to_owned();
    for reference in unique_matches(&DECIMAL_REF, &out) {
        let digits = &reference[2..reference.len() - 1];
        if let Some(ch) = digits.parse::<u32>().ok().and_then(char::from_u32) {
            out = out.replace(&reference, &ch.to_string());
        }
    }
    for reference in unique_matches(&HEX_REF, &out) {
        let digits = &reference[3..reference.len() - 1];
        if let Some(ch) = u32::from_str_radix(digits, 16).ok().and_then(char::from_u32) {
            out = out.replace(&reference, &ch.to_string());
        }
    }
    for reference in unique_matches(&NAMED_REF, &out) {
        if reference == AMPERSAND_REF {
            continue;
        }
        let name = &reference[1..reference.len() - 1];
        if let Some(ch) = table::lookup(name) {
            out = out.replace(&reference, &ch.to_string());
        }
    }
    out.replace(AMPERSAND_REF, "&")
}

/// Remove `<...>` markup spans from text.
///
/// This is a literal span strip (non-greedy, single line), not a markup
/// parser; it exists so callers can flatten stored rich text into plain
/// strings before encoding.
#[must_use]
pub fn strip_markup(text: &str) -> String {
    MARKUP_TAG.replace_all(text, "").into_owned()
}

/// Unique matches of `pattern` in `text`, in lexicographic order.
///
/// Deduplicating first keeps the replace loop linear in the number of
/// distinct references rather than total occurrences, and makes the
/// replacement order deterministic.
fn unique_matches(pattern: &Regex, text: &str) -> Vec<String> {
    let unique: BTreeSet<&str> = pattern.find_iter(text).map(|m| m.as_str()).collect();
    unique.into_iter().map(str::to_owned).collect()
}
