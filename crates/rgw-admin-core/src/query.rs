//! Query string serialization.
//!
//! Configuration records describe their query parameters as a list of
//! [`QueryField`]s. Each field carries a [`FieldRule`] deciding whether and
//! how its value is rendered. [`serialize`] walks the list and produces an
//! ordered [`QueryValues`] multimap ready to be encoded into a URL.
//!
//! The gateway treats an absent flag as its default, so booleans are usually
//! sent only when they differ from it: [`FieldRule::FalseOnly`] emits
//! `False` and drops `true`, [`FieldRule::TrueOnly`] does the opposite.

use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::error::{QueryError, Result};

/// How a single field is rendered into the query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// Always emit the value when present.
    Always,
    /// Emit a string only when it is non-empty.
    IfNotEmpty,
    /// Emit `False` for `false`; omit the key for `true`.
    FalseOnly,
    /// Emit `True` for `true`; omit the key for `false`.
    TrueOnly,
    /// Emit a timestamp as `Y-M-D H:M:S`.
    Timestamp,
}

/// A typed field value prior to rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// String value.
    Str(&'a str),
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Wall-clock timestamp.
    Timestamp(NaiveDateTime),
}

impl FieldValue<'_> {
    fn kind(&self) -> &'static str {
        match self {
            Self::Str(_) => "string",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Timestamp(_) => "timestamp",
        }
    }
}

/// A named query field together with its rendering rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryField<'a> {
    /// Query key.
    pub key: &'static str,
    /// Rendering rule.
    pub rule: FieldRule,
    /// Field value; `None` means unset and emits nothing.
    pub value: Option<FieldValue<'a>>,
}

impl<'a> QueryField<'a> {
    /// Create a field.
    #[must_use]
    pub fn new(key: &'static str, rule: FieldRule, value: Option<FieldValue<'a>>) -> Self {
        Self { key, rule, value }
    }

    /// Render the field, returning `None` when it contributes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::RuleMismatch`] if the rule cannot render the value type.
    pub fn render(&self) -> Result<Option<String>> {
        let Some(value) = self.value else {
            return Ok(None);
        };

        let rendered = match (self.rule, value) {
            (FieldRule::Always, FieldValue::Str(s)) => Some(s.to_string()),
            (FieldRule::Always, FieldValue::Bool(b)) => Some(bool_token(b).to_string()),
            (FieldRule::Always, FieldValue::Int(n)) => Some(n.to_string()),
            (FieldRule::Always | FieldRule::Timestamp, FieldValue::Timestamp(t)) => {
                Some(format_timestamp(&t))
            }
            (FieldRule::IfNotEmpty, FieldValue::Str(s)) => {
                (!s.is_empty()).then(|| s.to_string())
            }
            (FieldRule::FalseOnly, FieldValue::Bool(b)) => (!b).then(|| bool_token(b).to_string()),
            (FieldRule::TrueOnly, FieldValue::Bool(b)) => b.then(|| bool_token(b).to_string()),
            (rule, value) => {
                return Err(QueryError::RuleMismatch {
                    key: self.key,
                    rule,
                    found: value.kind(),
                })
            }
        };

        Ok(rendered)
    }
}

/// Records that can describe themselves as query fields.
pub trait ToQuery {
    /// List the query fields of this record in emission order.
    fn query_fields(&self) -> Vec<QueryField<'_>>;
}

/// Serialize a configuration record into query values.
///
/// # Errors
///
/// Returns [`QueryError::RuleMismatch`] if any field's rule does not match its value type.
pub fn serialize<T: ToQuery + ?Sized>(record: &T) -> Result<QueryValues> {
    let mut values = QueryValues::new();
    for field in record.query_fields() {
        if let Some(rendered) = field.render()? {
            values.add(field.key, rendered);
        }
    }
    Ok(values)
}

/// Format a timestamp as `Y-M-D H:M:S` without zero padding.
///
/// This is the format the gateway's usage endpoints accept for `start` and `end`.
#[must_use]
pub fn format_timestamp(t: &NaiveDateTime) -> String {
    format!(
        "{}-{}-{} {}:{}:{}",
        t.year(),
        t.month(),
        t.day(),
        t.hour(),
        t.minute(),
        t.second()
    )
}

fn bool_token(b: bool) -> &'static str {
    if b {
        "True"
    } else {
        "False"
    }
}

/// Ordered multimap of query keys to values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryValues {
    pairs: Vec<(String, String)>,
}

impl QueryValues {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value under `key`, keeping any existing values.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Replace all values under `key` with a single value.
    ///
    /// The value takes the position of the first existing entry, or is
    /// appended when the key is new.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter().position(|(k, _)| *k == key) {
            Some(first) => {
                self.pairs[first].1 = value;
                let mut index = 0;
                self.pairs.retain(|(k, _)| {
                    let keep = index <= first || *k != key;
                    index += 1;
                    keep
                });
            }
            None => self.pairs.push((key, value)),
        }
    }

    /// First value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All values stored under `key`, in insertion order.
    #[must_use]
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Iterate over all pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of stored pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Encode as a query string sorted by key, escaping per RFC 3986.
    ///
    /// Values under the same key keep their insertion order. Spaces become
    /// `%20` and `+` becomes `%2B`, so the string is byte-for-byte what a
    /// Signature V4 verifier canonicalizes.
    #[must_use]
    pub fn encode(&self) -> String {
        let mut sorted: Vec<&(String, String)> = self.pairs.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));

        sorted
            .iter()
            .map(|(key, value)| format!("{}={}", percent_encode(key), percent_encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Percent-encode everything except RFC 3986 unreserved characters.
#[must_use]
pub fn percent_encode(s: &str) -> String {
    let mut encoded = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(char::from(byte));
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}
