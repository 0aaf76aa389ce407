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

//! Mail-merge tag substitution over delimited templates.
//!
//! # Design
//! - Pure function of template, context, escape flag, and delimiter pair; no
//!   shared state, safe to call concurrently.
//! - Graceful degradation: a tag name missing from the context substitutes
//!   empty, and an opener with no matching closer halts the remaining scan,
//!   leaving the rest of the template verbatim. Neither case is an error.
//! - Substituted output is never rescanned, so values containing delimiter
//!   text do not expand recursively.

use serde_json::Value;
use std::collections::HashMap;

/// Opener/closer pair marking a tag occurrence in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDelimiters {
    opener: String,
    closer: String,
}

impl TagDelimiters {
    /// Delimiters as they appear in stored HTML documents: `&lt;&lt;` / `&gt;&gt;`.
    #[must_use]
    pub fn html_escaped() -> Self {
        Self::new("&lt;&lt;", "&gt;&gt;")
    }

    /// Literal `<<` / `>>` delimiters, used for plain-text templates.
    #[must_use]
    pub fn literal() -> Self {
        Self::new("<<", ">>")
    }

    /// Arbitrary delimiter pair. Both markers must be non-empty.
    #[must_use]
    pub fn new(opener: impl Into<String>, closer: impl Into<String>) -> Self {
        Self {
            opener: opener.into(),
            closer: closer.into(),
        }
    }

    /// The opening marker.
    #[must_use]
    pub fn opener(&self) -> &str {
        self.opener.as_str()
    }

    /// The closing marker.
    #[must_use]
    pub fn closer(&self) -> &str {
        self.closer.as_str()
    }
}

/// Case-insensitive tag name to value mapping.
///
/// Keys are uppercased on insertion and lookups are uppercased to match, so
/// `name`, `Name`, and `NAME` all address the same slot. Values are JSON
/// scalars as stored by the surrounding application; `null` behaves exactly
/// like an absent key.
#[derive(Debug, Clone, Default)]
pub struct TagContext {
    values: HashMap<String, Value>,
}

impl TagContext {
    /// Empty context; every tag substitutes as empty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value under `name`, replacing any previous entry.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into().to_uppercase(), value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Raw value stored under `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(&name.to_uppercase())
    }

    /// Substitution text for `name`.
    ///
    /// `None` when the key is absent or holds `null`; strings are returned
    /// as-is, other scalars in display form.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<String> {
        match self.get(name)? {
            Value::Null => None,
            Value::String(text) => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            Value::Bool(flag) => Some(flag.to_string()),
            composite => Some(composite.to_string()),
        }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the context holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, Value)> for TagContext {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut context = Self::new();
        for (name, value) in iter {
            context.insert(name, value);
        }
        context
    }
}

impl From<HashMap<String, Value>> for TagContext {
    fn from(values: HashMap<String, Value>) -> Self {
        values.into_iter().collect()
    }
}

/// Substitute every delimited tag in `template` from `context`.
///
/// The scan keeps a cursor and repeatedly finds the next opener. Text before
/// the first opener and after the last closed tag passes through untouched.
/// An opener with no matching closer halts the scan for the whole remainder
/// of the template, including any well-formed tags after it; this mirrors the
/// long-standing behaviour of the stored document templates and is pinned by
/// tests. Tag names are uppercased before lookup.
///
/// With `escape` set, substituted values have `&`, `<`, and `>` rewritten to
/// their entity forms unless the value starts with `<img`
/// (case-insensitive), which lets inline image markup through unmodified.
#[must_use]
pub fn substitute_tags(
    template: &str,
    context: &TagContext,
    escape: bool,
    delimiters: &TagDelimiters,
) -> String {
    let opener = delimiters.opener();
    let closer = delimiters.closer();
    let mut output = template.to_owned();
    let mut cursor = output.find(opener);
    while let Some(start) = cursor {
        let name_start = start + opener.len();
        let Some(offset) = output[name_start..].find(closer) else {
            // No end marker for this tag: stop processing.
            break;
        };
        let name_end = name_start + offset;
        let name = output[name_start..name_end].to_uppercase();
        let value = match context.resolve(&name) {
            Some(raw) if escape && !raw.to_lowercase().starts_with("<img") => escape_value(&raw),
            Some(raw) => raw,
            None => String::new(),
        };
        output.replace_range(start..name_end + closer.len(), &value);
        let resume = start + value.len();
        cursor = output[resume..].find(opener).map(|found| found + resume);
    }
    output
}

/// Entity-escape a substituted value: `&`, then `<` and `>`.
fn escape_value(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
