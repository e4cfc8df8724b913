//! Query options: projection, ordering and paging.
//!
//! Provides [`SelectSpec`], [`Dir`] and [`OrderBy`], and
//! [`build_options`], which reads them from the keyword parameters.

use qsift_codec::{RawQuery, RawValue};
use serde::ser::{SerializeMap, SerializeTuple};
use serde::{Serialize, Serializer};
use tracing::{debug, trace};

use crate::config::{Config, Keyword};

/// Field projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectSpec {
    /// Return only these fields.
    Include(Vec<String>),
    /// Return every field except these.
    Exclude(Vec<String>),
}

impl SelectSpec {
    /// The listed field names, whichever the mode.
    pub fn fields(&self) -> &[String] {
        match self {
            SelectSpec::Include(fields) | SelectSpec::Exclude(fields) => fields,
        }
    }

    /// Returns `true` for an exclusion spec.
    pub fn is_exclude(&self) -> bool {
        matches!(self, SelectSpec::Exclude(_))
    }
}

impl Serialize for SelectSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SelectSpec::Include(fields) => fields.serialize(serializer),
            SelectSpec::Exclude(fields) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("exclude", fields)?;
                map.end()
            }
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Returns `true` if this is ascending order.
    pub fn is_asc(self) -> bool {
        matches!(self, Dir::Asc)
    }

    /// Returns `true` if this is descending order.
    pub fn is_desc(self) -> bool {
        matches!(self, Dir::Desc)
    }

    /// Returns the wire name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "ASC",
            Dir::Desc => "DESC",
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Dir {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A single ordering clause specifying a field and direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// The field to sort by.
    pub field: String,
    /// The sort direction.
    pub dir: Dir,
}

impl OrderBy {
    /// Creates an ordering with an explicit direction.
    pub fn new(field: impl Into<String>, dir: Dir) -> Self {
        OrderBy {
            field: field.into(),
            dir,
        }
    }

    /// Creates a new ascending ordering for the given field.
    pub fn asc(field: impl Into<String>) -> Self {
        OrderBy::new(field, Dir::Asc)
    }

    /// Creates a new descending ordering for the given field.
    pub fn desc(field: impl Into<String>) -> Self {
        OrderBy::new(field, Dir::Desc)
    }

    /// Reads one sort token: `-name` is descending, `+name` or `name`
    /// ascending. A token with no field name is `None`.
    fn parse(token: &str) -> Option<Self> {
        let order = if let Some(field) = token.strip_prefix('-') {
            OrderBy::desc(field)
        } else {
            OrderBy::asc(token.strip_prefix('+').unwrap_or(token))
        };
        (!order.field.is_empty()).then_some(order)
    }
}

/// Serializes as a `[field, direction]` pair.
impl Serialize for OrderBy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.field)?;
        tuple.serialize_element(&self.dir)?;
        tuple.end()
    }
}

/// Options read from the keyword parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct QueryOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<SelectSpec>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<OrderBy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

impl QueryOptions {
    /// Returns `true` if no option was set.
    pub fn is_empty(&self) -> bool {
        self == &QueryOptions::default()
    }
}

/// Builds query options from the keyword parameters of a raw query.
///
/// ```
/// use qsift::{build_options, Config, Dir, OrderBy, RawQuery, SelectSpec};
///
/// let query: RawQuery = [("fields", "a,b"), ("sort", "a,-c"), ("limit", "10")]
///     .into_iter()
///     .collect();
/// let options = build_options(&query, &Config::default());
///
/// assert_eq!(options.fields, Some(SelectSpec::Include(vec!["a".into(), "b".into()])));
/// assert_eq!(options.sort, vec![OrderBy::asc("a"), OrderBy::new("c", Dir::Desc)]);
/// assert_eq!(options.limit, Some(10));
/// ```
pub fn build_options(query: &RawQuery, config: &Config) -> QueryOptions {
    let keywords = config.keywords();
    let value = |keyword: Keyword| keyword_value(query, keywords.get(keyword));

    let mut options = QueryOptions::default();

    if let Some(fields) = value(Keyword::Fields) {
        options.fields = Some(SelectSpec::Include(split_names(&fields)));
    }
    if let Some(omit) = value(Keyword::Omit) {
        options.fields = Some(SelectSpec::Exclude(split_names(&omit)));
    }

    if let Some(sort) = value(Keyword::Sort) {
        options.sort = sort
            .split(',')
            .filter_map(OrderBy::parse)
            .collect();
    }

    options.skip = value(Keyword::Offset).and_then(|raw| parse_count(keywords.get(Keyword::Offset), &raw));

    let limit = value(Keyword::Limit).and_then(|raw| parse_count(keywords.get(Keyword::Limit), &raw));
    options.limit = match (limit, config.max_limit()) {
        (Some(limit), Some(max)) if limit > max => {
            debug!(requested = limit, max_limit = max, "clamping limit");
            Some(max)
        }
        (Some(limit), _) => Some(limit),
        (None, max) => max,
    };

    options
}

/// The joined value of a keyword, if present and non-empty.
///
/// Object-shaped nested values are not keyword values and read as absent.
fn keyword_value(query: &RawQuery, name: &str) -> Option<String> {
    let value = match query.get(name)? {
        RawValue::Nested(nested) if !nested.is_consecutive_integer_keyed() => return None,
        value => value.joined(),
    };
    (!value.is_empty()).then_some(value)
}

fn split_names(list: &str) -> Vec<String> {
    list.split(',').map(str::to_string).collect()
}

/// Reads a non-negative count; fractional values truncate.
fn parse_count(keyword: &str, raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    if let Ok(n) = trimmed.parse::<u64>() {
        return Some(n);
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => Some(n.trunc() as u64),
        _ => {
            trace!(keyword = %keyword, value = %raw, "ignoring non-numeric keyword value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options(pairs: &[(&str, &str)]) -> QueryOptions {
        options_with(pairs, &Config::default())
    }

    fn options_with(pairs: &[(&str, &str)], config: &Config) -> QueryOptions {
        let query: RawQuery = pairs.iter().copied().collect();
        build_options(&query, config)
    }

    #[test]
    fn empty_query_has_no_options() {
        assert!(options(&[]).is_empty());
    }

    #[test]
    fn fields_include() {
        assert_eq!(
            options(&[("fields", "a,b,c")]).fields,
            Some(SelectSpec::Include(vec!["a".into(), "b".into(), "c".into()]))
        );
    }

    #[test]
    fn omit_overrides_fields() {
        let opts = options(&[("omit", "b"), ("fields", "a,b")]);
        assert_eq!(opts.fields, Some(SelectSpec::Exclude(vec!["b".into()])));
        assert!(opts.fields.as_ref().is_some_and(SelectSpec::is_exclude));
    }

    #[test]
    fn empty_keywords_are_absent() {
        let opts = options(&[("fields", ""), ("sort", ""), ("limit", "")]);
        assert!(opts.is_empty());
    }

    #[test]
    fn sort_directions() {
        assert_eq!(
            options(&[("sort", "a,+b,-c")]).sort,
            vec![OrderBy::asc("a"), OrderBy::asc("b"), OrderBy::desc("c")]
        );
    }

    #[test]
    fn sort_skips_empty_tokens() {
        assert_eq!(options(&[("sort", ",a,,")]).sort, vec![OrderBy::asc("a")]);
    }

    #[test]
    fn sort_skips_bare_signs() {
        assert_eq!(options(&[("sort", "-,+,b")]).sort, vec![OrderBy::asc("b")]);
        assert!(options(&[("sort", "-")]).sort.is_empty());
    }

    #[test]
    fn offset_and_limit() {
        let opts = options(&[("offset", "20"), ("limit", "10")]);
        assert_eq!(opts.skip, Some(20));
        assert_eq!(opts.limit, Some(10));
    }

    #[test]
    fn fractional_counts_truncate() {
        let opts = options(&[("offset", "2.9"), ("limit", " 10 ")]);
        assert_eq!(opts.skip, Some(2));
        assert_eq!(opts.limit, Some(10));
    }

    #[test]
    fn invalid_counts_are_absent() {
        let opts = options(&[("offset", "ten"), ("limit", "-5")]);
        assert_eq!(opts.skip, None);
        assert_eq!(opts.limit, None);
    }

    #[test]
    fn limit_is_clamped() {
        let config = Config::builder().max_limit(50).build().unwrap();
        assert_eq!(options_with(&[("limit", "100")], &config).limit, Some(50));
        assert_eq!(options_with(&[("limit", "20")], &config).limit, Some(20));
    }

    #[test]
    fn max_limit_is_the_default() {
        let config = Config::builder().max_limit(50).build().unwrap();
        assert_eq!(options_with(&[], &config).limit, Some(50));
        assert_eq!(options_with(&[("limit", "x")], &config).limit, Some(50));
    }

    #[test]
    fn renamed_keywords() {
        let config = Config::builder()
            .rename(Keyword::Fields, "$fields")
            .rename(Keyword::Sort, "$sort")
            .rename(Keyword::Offset, "$offset")
            .rename(Keyword::Limit, "$limit")
            .build()
            .unwrap();
        let opts = options_with(
            &[("$fields", "a"), ("$sort", "-a"), ("$offset", "5"), ("$limit", "5"), ("limit", "9")],
            &config,
        );
        assert_eq!(opts.fields, Some(SelectSpec::Include(vec!["a".into()])));
        assert_eq!(opts.sort, vec![OrderBy::desc("a")]);
        assert_eq!(opts.skip, Some(5));
        assert_eq!(opts.limit, Some(5));
    }

    #[test]
    fn repeated_keywords_are_joined() {
        let mut query = RawQuery::new();
        query.append("fields", "a");
        query.append("fields", "b");
        let opts = build_options(&query, &Config::default());
        assert_eq!(opts.fields, Some(SelectSpec::Include(vec!["a".into(), "b".into()])));
    }

    #[test]
    fn object_keywords_are_ignored() {
        let mut query = RawQuery::new();
        query.insert("sort", [("by", "a")].into_iter().collect::<RawQuery>());
        assert!(build_options(&query, &Config::default()).sort.is_empty());
    }

    #[test]
    fn serializes_like_an_executor_expects() {
        let opts = options(&[("omit", "b"), ("sort", "a,-c"), ("offset", "0"), ("limit", "10")]);
        assert_eq!(
            serde_json::to_value(&opts).unwrap(),
            json!({
                "fields": { "exclude": ["b"] },
                "sort": [["a", "ASC"], ["c", "DESC"]],
                "skip": 0,
                "limit": 10,
            })
        );

        let include = options(&[("fields", "a,b")]);
        assert_eq!(serde_json::to_value(&include).unwrap(), json!({ "fields": ["a", "b"] }));
    }
}
