//! Query-string codecs for qsift.
//!
//! A codec turns a raw query string into an ordered [`RawQuery`] and back.
//! Two implementations are provided:
//!
//! - [`FlatCodec`]: plain `application/x-www-form-urlencoded`. Repeated keys
//!   become [`RawValue::Multi`]; brackets in keys are kept literally.
//! - [`BracketCodec`]: additionally understands `a[b][c]=v` and `a[]=v`,
//!   producing [`RawValue::Nested`] maps.
//!
//! Both are total: malformed input is decoded as far as possible and never
//! produces an error.
//!
//! ```
//! use qsift_codec::{BracketCodec, FlatCodec, QueryCodec, RawValue};
//!
//! let flat = FlatCodec.parse("field=a&field=b&limit=10");
//! assert_eq!(flat.get("field").map(RawValue::joined), Some("a,b".to_string()));
//!
//! let nested = BracketCodec::default().parse("foo[bar]=baz");
//! assert!(nested.get("foo").is_some_and(RawValue::is_nested));
//! ```

mod bracket;
mod flat;
mod raw;

pub use bracket::BracketCodec;
pub use flat::FlatCodec;
pub use raw::{RawQuery, RawValue};

/// A query-string parser and serializer.
///
/// Implementations must be total: `parse` accepts any input and
/// `stringify` accepts any map.
pub trait QueryCodec: Send + Sync + std::fmt::Debug {
    /// Decodes a query string (with or without a leading `?`).
    fn parse(&self, input: &str) -> RawQuery;

    /// Encodes a map back into a query string without a leading `?`.
    fn stringify(&self, query: &RawQuery) -> String;
}

/// Splits a query string into percent-decoded key/value pairs.
pub(crate) fn decode_pairs(input: &str) -> impl Iterator<Item = (String, String)> + '_ {
    let input = input.strip_prefix('?').unwrap_or(input);
    form_urlencoded::parse(input.as_bytes()).map(|(k, v)| (k.into_owned(), v.into_owned()))
}

/// Serializes a map, writing nested entries with bracket keys.
pub(crate) fn encode_pairs(query: &RawQuery) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    write_entries(&mut serializer, None, query);
    serializer.finish()
}

fn write_entries(
    serializer: &mut form_urlencoded::Serializer<'_, String>,
    prefix: Option<&str>,
    query: &RawQuery,
) {
    for (key, value) in query.iter() {
        let name = match prefix {
            Some(prefix) => format!("{prefix}[{key}]"),
            None => key.to_string(),
        };
        match value {
            RawValue::Single(s) => {
                serializer.append_pair(&name, s);
            }
            RawValue::Multi(values) => {
                for v in values {
                    serializer.append_pair(&name, v);
                }
            }
            RawValue::Nested(nested) => write_entries(serializer, Some(&name), nested),
        }
    }
}
