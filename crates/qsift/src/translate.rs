//! The translation entry point.

use qsift_codec::RawQuery;

use crate::config::Config;
use crate::criteria::{build_criteria, Criteria};
use crate::links::{build_links, PageLinks};
use crate::options::{build_options, QueryOptions};

/// A query to translate, either still encoded or already parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryInput {
    /// An encoded query string, decoded with the configured codec.
    Raw(String),
    /// A query decoded by the caller.
    Parsed(RawQuery),
}

impl From<&str> for QueryInput {
    fn from(s: &str) -> Self {
        QueryInput::Raw(s.to_string())
    }
}

impl From<String> for QueryInput {
    fn from(s: String) -> Self {
        QueryInput::Raw(s)
    }
}

impl From<RawQuery> for QueryInput {
    fn from(query: RawQuery) -> Self {
        QueryInput::Parsed(query)
    }
}

/// The result of one translation.
///
/// Holds the decoded query and the config so that links can be built
/// later, once the caller knows the total count.
#[derive(Debug, Clone)]
pub struct Translation {
    criteria: Criteria,
    options: QueryOptions,
    query: RawQuery,
    config: Config,
}

impl Translation {
    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    /// The decoded query the translation was built from.
    pub fn query(&self) -> &RawQuery {
        &self.query
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Builds page links for a collection of `total_count` items.
    ///
    /// See [`build_links`].
    pub fn links(&self, base_url: &str, total_count: u64) -> Option<PageLinks> {
        build_links(&self.options, &self.query, &self.config, base_url, total_count)
    }

    /// Splits the translation into criteria and options.
    pub fn into_parts(self) -> (Criteria, QueryOptions) {
        (self.criteria, self.options)
    }
}

/// Translates a query into criteria and options.
///
/// Never fails: unparseable parameters are dropped and uncoercible values
/// stay strings.
///
/// ```
/// use qsift::{translate, Config, TypedValue};
///
/// let t = translate("name=ferris&age>=3&sort=-age&limit=5", Config::default());
///
/// assert_eq!(t.criteria().get("name").and_then(|c| c.as_value()), Some(&TypedValue::from("ferris")));
/// assert!(t.criteria().get("age").is_some());
/// assert_eq!(t.options().limit, Some(5));
/// ```
pub fn translate(input: impl Into<QueryInput>, config: Config) -> Translation {
    let query = match input.into() {
        QueryInput::Raw(raw) => config.parser().parse(&raw),
        QueryInput::Parsed(query) => query,
    };
    let criteria = build_criteria(&query, &config);
    let options = build_options(&query, &config);
    Translation {
        criteria,
        options,
        query,
        config,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_and_parsed_input_agree() {
        let raw = translate("a=1&b>=2&limit=3", Config::default());
        let parsed = translate(
            Config::default().parser().parse("a=1&b>=2&limit=3"),
            Config::default(),
        );
        assert_eq!(raw.criteria(), parsed.criteria());
        assert_eq!(raw.options(), parsed.options());
    }

    #[test]
    fn owned_strings_translate() {
        let t = translate(String::from("?x=y"), Config::default());
        assert!(t.criteria().contains_field("x"));
    }

    #[test]
    fn links_leave_the_query_alone() {
        let t = translate("offset=20&limit=10", Config::default());
        assert!(t.links("http://localhost", 95).is_some());
        assert_eq!(t.query().get("offset").and_then(|v| v.as_single()), Some("20"));
        assert_eq!(t.links("http://localhost", 95), t.links("http://localhost", 95));
    }

    #[test]
    fn into_parts() {
        let (criteria, options) = translate("a=1&skip=2&offset=4", Config::default()).into_parts();
        assert_eq!(criteria.len(), 2);
        assert_eq!(options.skip, Some(4));
    }

    #[test]
    fn translation_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Translation>();
        assert_send_sync::<Config>();
    }
}
