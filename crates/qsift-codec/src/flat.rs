//! Flat `application/x-www-form-urlencoded` codec.

use crate::raw::RawQuery;
use crate::{decode_pairs, encode_pairs, QueryCodec};

/// Flat query-string codec.
///
/// - `+` decodes to a space and percent escapes are decoded (invalid UTF-8
///   is replaced).
/// - A pair without `=` gets an empty value; empty pairs (`&&`) are skipped.
/// - Repeated keys collect into a [`RawValue::Multi`](crate::RawValue::Multi)
///   at the position of their first occurrence.
/// - Brackets in keys carry no meaning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlatCodec;

impl QueryCodec for FlatCodec {
    fn parse(&self, input: &str) -> RawQuery {
        let mut query = RawQuery::new();
        for (key, value) in decode_pairs(input) {
            query.append(key, value);
        }
        query
    }

    fn stringify(&self, query: &RawQuery) -> String {
        encode_pairs(query)
    }
}
