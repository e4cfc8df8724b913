//! Ordered parameter maps as produced by a query-string codec.
//!
//! A [`RawQuery`] keeps keys in first-seen order so that re-serializing a
//! modified copy (for example when rewriting a pagination parameter) keeps
//! the rest of the query string stable.

/// The value stored under one query-string key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// A key that appeared once.
    Single(String),
    /// A key that appeared several times, in order of appearance.
    Multi(Vec<String>),
    /// A bracket-style segment such as `foo[bar]=baz`.
    Nested(RawQuery),
}

impl RawValue {
    /// Returns the string if this is a [`RawValue::Single`].
    pub fn as_single(&self) -> Option<&str> {
        match self {
            RawValue::Single(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the nested map if this is a [`RawValue::Nested`].
    pub fn as_nested(&self) -> Option<&RawQuery> {
        match self {
            RawValue::Nested(q) => Some(q),
            _ => None,
        }
    }

    /// Returns `true` if this is a [`RawValue::Nested`].
    pub fn is_nested(&self) -> bool {
        matches!(self, RawValue::Nested(_))
    }

    /// Collects every scalar leaf in order.
    ///
    /// Nested maps contribute their leaves depth-first.
    pub fn leaves(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            RawValue::Single(s) => out.push(s),
            RawValue::Multi(values) => out.extend(values.iter().map(String::as_str)),
            RawValue::Nested(q) => {
                for (_, value) in q.iter() {
                    value.collect_leaves(out);
                }
            }
        }
    }

    /// Joins every scalar leaf with `,`.
    ///
    /// A repeated key `a=1&a=2` reads as `"1,2"`.
    pub fn joined(&self) -> String {
        match self {
            RawValue::Single(s) => s.clone(),
            other => other.leaves().join(","),
        }
    }

    /// Appends another occurrence of the same key.
    fn push(&mut self, value: String) {
        match self {
            RawValue::Single(first) => {
                let first = std::mem::take(first);
                *self = RawValue::Multi(vec![first, value]);
            }
            RawValue::Multi(values) => values.push(value),
            RawValue::Nested(_) => *self = RawValue::Single(value),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Single(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Single(s)
    }
}

impl From<Vec<String>> for RawValue {
    fn from(values: Vec<String>) -> Self {
        RawValue::Multi(values)
    }
}

impl From<RawQuery> for RawValue {
    fn from(q: RawQuery) -> Self {
        RawValue::Nested(q)
    }
}

/// An insertion-ordered mapping from parameter name to [`RawValue`].
///
/// # Example
///
/// ```
/// use qsift_codec::{RawQuery, RawValue};
///
/// let mut query = RawQuery::new();
/// query.append("tag", "a");
/// query.append("tag", "b");
/// query.insert("offset", "20");
///
/// assert_eq!(query.get("tag").map(RawValue::joined), Some("a,b".to_string()));
/// assert_eq!(query.keys().collect::<Vec<_>>(), vec!["tag", "offset"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawQuery {
    entries: Vec<(String, RawValue)>,
}

impl RawQuery {
    /// Creates an empty map.
    pub fn new() -> Self {
        RawQuery::default()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Linear scan, so building a query with `insert`/`append` is
    /// quadratic in the number of distinct keys.
    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    /// Looks up a key.
    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.position(key).map(|i| &self.entries[i].1)
    }

    /// Looks up a key for modification.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut RawValue> {
        let i = self.position(key)?;
        Some(&mut self.entries[i].1)
    }

    /// Returns `true` if the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Sets a key, replacing any existing value in place.
    ///
    /// A replaced key keeps its original position; a new key is appended.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<RawValue>) -> Option<RawValue> {
        let key = key.into();
        let value = value.into();
        match self.position(&key) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Adds one occurrence of a key.
    ///
    /// The first occurrence is stored as [`RawValue::Single`]; later ones
    /// turn it into a [`RawValue::Multi`].
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.get_mut(&key) {
            Some(existing) => existing.push(value),
            None => self.entries.push((key, RawValue::Single(value))),
        }
    }

    /// Removes a key, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<RawValue> {
        let i = self.position(key)?;
        Some(self.entries.remove(i).1)
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Returns `true` if the keys are exactly `"0"`, `"1"`, `"2"`, … in order.
    ///
    /// Bracket codecs encode both lists (`a[]=x&a[]=y`) and objects
    /// (`a[k]=x`) as nested maps; this tells the two apart. An empty map is
    /// not list-shaped.
    pub fn is_consecutive_integer_keyed(&self) -> bool {
        !self.entries.is_empty()
            && self
                .entries
                .iter()
                .enumerate()
                .all(|(i, (k, _))| k.parse::<usize>().is_ok_and(|n| n == i && *k == n.to_string()))
    }
}

impl<K, V> FromIterator<(K, V)> for RawQuery
where
    K: Into<String>,
    V: Into<RawValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut query = RawQuery::new();
        for (k, v) in iter {
            query.insert(k, v);
        }
        query
    }
}
