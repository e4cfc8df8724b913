//! Typed values coerced from raw query tokens.
//!
//! [`TypedValue`] is what the typer produces for every token. It owns its
//! data and serializes to a JSON-friendly shape for downstream executors.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use regex::{Regex, RegexBuilder};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::Result;

/// A coerced query value.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    /// Text, either forced with quotes or left over after coercion.
    String(String),
    /// A finite number.
    Number(f64),
    /// `true` or `false`.
    Boolean(bool),
    /// An ISO-8601 instant.
    Date(DateTime<Utc>),
    /// A `/pattern/flags` literal.
    Regex(Pattern),
}

impl TypedValue {
    /// Returns `true` if this is a `String` value.
    pub fn is_string(&self) -> bool {
        matches!(self, TypedValue::String(_))
    }

    /// Returns `true` if this is a `Number` value.
    pub fn is_number(&self) -> bool {
        matches!(self, TypedValue::Number(_))
    }

    /// Returns `true` if this is a `Boolean` value.
    pub fn is_boolean(&self) -> bool {
        matches!(self, TypedValue::Boolean(_))
    }

    /// Returns `true` if this is a `Date` value.
    pub fn is_date(&self) -> bool {
        matches!(self, TypedValue::Date(_))
    }

    /// Returns `true` if this is a `Regex` value.
    pub fn is_regex(&self) -> bool {
        matches!(self, TypedValue::Regex(_))
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the number value, if present.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            TypedValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the boolean value, if present.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TypedValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Extracts the date value, if present.
    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            TypedValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Extracts the regex literal, if present.
    pub fn as_pattern(&self) -> Option<&Pattern> {
        match self {
            TypedValue::Regex(p) => Some(p),
            _ => None,
        }
    }
}

/// Integral numbers that fit `i64` print and serialize without a fraction.
fn as_integer(n: f64) -> Option<i64> {
    (n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64).then_some(n as i64)
}

fn format_date(d: &DateTime<Utc>) -> String {
    d.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::String(s) => f.write_str(s),
            TypedValue::Number(n) => match as_integer(*n) {
                Some(i) => write!(f, "{i}"),
                None => write!(f, "{n}"),
            },
            TypedValue::Boolean(b) => write!(f, "{b}"),
            TypedValue::Date(d) => f.write_str(&format_date(d)),
            TypedValue::Regex(p) => write!(f, "{p}"),
        }
    }
}

impl Serialize for TypedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            TypedValue::String(s) => serializer.serialize_str(s),
            TypedValue::Number(n) => match as_integer(*n) {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(*n),
            },
            TypedValue::Boolean(b) => serializer.serialize_bool(*b),
            TypedValue::Date(d) => serializer.serialize_str(&format_date(d)),
            TypedValue::Regex(p) => p.serialize(serializer),
        }
    }
}

impl From<&str> for TypedValue {
    fn from(s: &str) -> Self {
        TypedValue::String(s.to_string())
    }
}

impl From<String> for TypedValue {
    fn from(s: String) -> Self {
        TypedValue::String(s)
    }
}

impl From<f64> for TypedValue {
    fn from(n: f64) -> Self {
        TypedValue::Number(n)
    }
}

impl From<i32> for TypedValue {
    fn from(n: i32) -> Self {
        TypedValue::Number(n as f64)
    }
}

impl From<i64> for TypedValue {
    fn from(n: i64) -> Self {
        TypedValue::Number(n as f64)
    }
}

impl From<bool> for TypedValue {
    fn from(b: bool) -> Self {
        TypedValue::Boolean(b)
    }
}

impl From<DateTime<Utc>> for TypedValue {
    fn from(d: DateTime<Utc>) -> Self {
        TypedValue::Date(d)
    }
}

impl From<Pattern> for TypedValue {
    fn from(p: Pattern) -> Self {
        TypedValue::Regex(p)
    }
}

/// A regex literal lifted from a `/pattern/` or `/pattern/i` token.
///
/// The pattern is kept as source text. Executors that evaluate it in
/// process can [`compile`](Pattern::compile) it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    source: String,
    case_insensitive: bool,
}

impl Pattern {
    /// Creates a pattern from its source text.
    pub fn new(source: impl Into<String>, case_insensitive: bool) -> Self {
        Pattern {
            source: source.into(),
            case_insensitive,
        }
    }

    /// The text between the slashes.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns `true` if the literal carried the `i` flag.
    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// The flag suffix as written after the closing slash.
    pub fn flags(&self) -> &'static str {
        if self.case_insensitive {
            "i"
        } else {
            ""
        }
    }

    /// Compiles the pattern with the `regex` crate's syntax.
    ///
    /// Returns an error if the source is not a valid pattern.
    pub fn compile(&self) -> Result<Regex> {
        let regex = RegexBuilder::new(&self.source)
            .case_insensitive(self.case_insensitive)
            .build()?;
        Ok(regex)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.source, self.flags())
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("regex", &self.source)?;
        map.serialize_entry("flags", self.flags())?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn value_type_checks() {
        assert!(TypedValue::from("a").is_string());
        assert!(TypedValue::from(1).is_number());
        assert!(TypedValue::from(true).is_boolean());
        assert!(TypedValue::from(Utc.with_ymd_and_hms(2010, 4, 1, 0, 0, 0).unwrap()).is_date());
        assert!(TypedValue::from(Pattern::new("x", false)).is_regex());
    }

    #[test]
    fn value_extractors() {
        assert_eq!(TypedValue::from("hello").as_str(), Some("hello"));
        assert_eq!(TypedValue::from(42).as_number(), Some(42.0));
        assert_eq!(TypedValue::from(false).as_bool(), Some(false));
        assert_eq!(TypedValue::from("hello").as_number(), None);
        assert_eq!(TypedValue::from(1).as_str(), None);
        assert_eq!(
            TypedValue::from(Pattern::new("a", true)).as_pattern(),
            Some(&Pattern::new("a", true))
        );
    }

    #[test]
    fn display_numbers_like_query_text() {
        assert_eq!(TypedValue::Number(10.0).to_string(), "10");
        assert_eq!(TypedValue::Number(1.2).to_string(), "1.2");
        assert_eq!(TypedValue::Number(-3.0).to_string(), "-3");
    }

    #[test]
    fn display_dates_and_patterns() {
        let d = Utc.with_ymd_and_hms(2010, 4, 1, 12, 0, 30).unwrap();
        assert_eq!(TypedValue::Date(d).to_string(), "2010-04-01T12:00:30.000Z");
        assert_eq!(Pattern::new("reg,ex", true).to_string(), "/reg,ex/i");
    }

    #[test]
    fn serialize_shapes() {
        let d = Utc.with_ymd_and_hms(2010, 4, 1, 0, 0, 0).unwrap();
        assert_eq!(serde_json::to_value(TypedValue::Number(10.0)).unwrap(), json!(10));
        assert_eq!(serde_json::to_value(TypedValue::Number(1.5)).unwrap(), json!(1.5));
        assert_eq!(serde_json::to_value(TypedValue::from("x")).unwrap(), json!("x"));
        assert_eq!(
            serde_json::to_value(TypedValue::Date(d)).unwrap(),
            json!("2010-04-01T00:00:00.000Z")
        );
        assert_eq!(
            serde_json::to_value(TypedValue::from(Pattern::new("a.*", true))).unwrap(),
            json!({ "regex": "a.*", "flags": "i" })
        );
    }

    #[test]
    fn compile_patterns() {
        let regex = Pattern::new("^val", true).compile().unwrap();
        assert!(regex.is_match("VALUE"));

        let strict = Pattern::new("^val", false).compile().unwrap();
        assert!(!strict.is_match("VALUE"));
    }

    #[test]
    fn compile_rejects_invalid_patterns() {
        assert!(Pattern::new("(unclosed", false).compile().is_err());
    }
}
