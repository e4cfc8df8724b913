//! Bracket-syntax codec (`a[b][c]=v`, `a[]=v`).

use crate::raw::{RawQuery, RawValue};
use crate::{decode_pairs, encode_pairs, QueryCodec};

/// Default number of bracket segments expanded into nested maps.
pub const DEFAULT_DEPTH: usize = 5;

/// Query-string codec that understands bracket keys.
///
/// - `foo[bar]=baz` decodes to `foo => { bar => "baz" }`.
/// - `tags[]=a&tags[]=b` decodes to `tags => { "0" => "a", "1" => "b" }`,
///   which [`RawQuery::is_consecutive_integer_keyed`] reports as list-shaped.
/// - Segments past the depth limit are kept as one literal key, so
///   `a[b][c]` with depth 1 decodes to `a => { b => { "[c]" => v } }`.
/// - Keys that are not well-formed bracket paths (`[x]`, `a[b`) are literal.
///
/// Encoding writes nested maps back as bracket keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BracketCodec {
    depth: usize,
}

impl Default for BracketCodec {
    fn default() -> Self {
        BracketCodec {
            depth: DEFAULT_DEPTH,
        }
    }
}

impl BracketCodec {
    /// Creates a codec expanding at most `depth` bracket segments.
    pub fn with_depth(depth: usize) -> Self {
        BracketCodec { depth }
    }

    /// Returns the configured depth limit.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl QueryCodec for BracketCodec {
    fn parse(&self, input: &str) -> RawQuery {
        let mut query = RawQuery::new();
        for (key, value) in decode_pairs(input) {
            match split_path(&key, self.depth) {
                Some(path) => insert_path(&mut query, &path, value),
                None => query.append(key, value),
            }
        }
        query
    }

    fn stringify(&self, query: &RawQuery) -> String {
        encode_pairs(query)
    }
}

/// Splits `a[b][c]` into `["a", "b", "c"]`.
///
/// Returns `None` when the key has no brackets or is malformed.
fn split_path(key: &str, depth: usize) -> Option<Vec<&str>> {
    let open = key.find('[')?;
    if open == 0 {
        return None;
    }

    let mut path = vec![&key[..open]];
    let mut rest = &key[open..];
    while !rest.is_empty() {
        if path.len() > depth {
            path.push(rest);
            return Some(path);
        }
        let inner = rest.strip_prefix('[')?;
        let close = inner.find(']')?;
        path.push(&inner[..close]);
        rest = &inner[close + 1..];
    }
    Some(path)
}

fn insert_path(query: &mut RawQuery, path: &[&str], value: String) {
    let Some((head, rest)) = path.split_first() else {
        return;
    };
    let key = if head.is_empty() {
        query.len().to_string()
    } else {
        head.to_string()
    };

    if rest.is_empty() {
        query.append(key, value);
        return;
    }

    if !query.get(&key).is_some_and(RawValue::is_nested) {
        query.insert(key.clone(), RawQuery::new());
    }
    if let Some(RawValue::Nested(child)) = query.get_mut(&key) {
        insert_path(child, rest, value);
    }
}
