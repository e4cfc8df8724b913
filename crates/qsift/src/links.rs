//! Pagination links.

use qsift_codec::RawQuery;
use serde::Serialize;

use crate::config::Config;
use crate::options::QueryOptions;

/// First, previous, next and last page URLs.
///
/// A link is absent when that page does not exist relative to the current
/// one: no `first`/`prev` on the first page, no `next`/`last` on the last.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PageLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
}

impl PageLinks {
    /// Returns `true` if no link is set.
    pub fn is_empty(&self) -> bool {
        self.first.is_none() && self.prev.is_none() && self.next.is_none() && self.last.is_none()
    }
}

/// Builds page links around the current page.
///
/// Each link is `base_url?query` where `query` is the source query with
/// its offset parameter set to that page's offset; all other parameters
/// keep their order. Returns `None` when there is no limit, the limit is
/// zero, or the collection is empty.
///
/// ```
/// use qsift::{build_links, build_options, Config, RawQuery};
///
/// let config = Config::default();
/// let query: RawQuery = [("offset", "20"), ("limit", "10")].into_iter().collect();
/// let options = build_options(&query, &config);
///
/// let links = build_links(&options, &query, &config, "http://localhost", 95).unwrap();
/// assert_eq!(links.first.as_deref(), Some("http://localhost?offset=0&limit=10"));
/// assert_eq!(links.prev.as_deref(), Some("http://localhost?offset=10&limit=10"));
/// assert_eq!(links.next.as_deref(), Some("http://localhost?offset=30&limit=10"));
/// assert_eq!(links.last.as_deref(), Some("http://localhost?offset=90&limit=10"));
/// ```
pub fn build_links(
    options: &QueryOptions,
    query: &RawQuery,
    config: &Config,
    base_url: &str,
    total_count: u64,
) -> Option<PageLinks> {
    let limit = options.limit?.min(total_count);
    if limit == 0 {
        return None;
    }
    let offset = options.skip.unwrap_or(0);

    let offset_keyword = config.keywords().offset.as_str();
    let mut scratch = query.clone();
    let mut link = |page_offset: u64| {
        scratch.insert(offset_keyword, page_offset.to_string());
        format!("{base_url}?{}", config.parser().stringify(&scratch))
    };

    let mut links = PageLinks::default();
    if offset > 0 {
        links.first = Some(link(0));
        links.prev = Some(link(offset.saturating_sub(limit)));
    }

    let last_offset = (total_count.div_ceil(limit) - 1) * limit;
    if offset.saturating_add(limit) < total_count {
        links.next = Some(link((offset + limit).min(last_offset)));
        links.last = Some(link(last_offset));
    }

    Some(links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::build_options;

    const BASE: &str = "http://localhost";

    fn links(offset: &str, limit: &str, total: u64) -> Option<PageLinks> {
        let config = Config::default();
        let query: RawQuery = [("offset", offset), ("limit", limit)].into_iter().collect();
        let options = build_options(&query, &config);
        build_links(&options, &query, &config, BASE, total)
    }

    fn url(offset: u64, limit: u64) -> Option<String> {
        Some(format!("{BASE}?offset={offset}&limit={limit}"))
    }

    #[test]
    fn middle_page_has_every_link() {
        let links = links("20", "10", 95).unwrap();
        assert_eq!(links.first, url(0, 10));
        assert_eq!(links.prev, url(10, 10));
        assert_eq!(links.next, url(30, 10));
        assert_eq!(links.last, url(90, 10));
    }

    #[test]
    fn single_page_has_no_links() {
        let links = links("0", "100", 95).unwrap();
        assert!(links.is_empty());
    }

    #[test]
    fn first_page_has_no_first_or_prev() {
        let links = links("0", "10", 95).unwrap();
        assert_eq!(links.first, None);
        assert_eq!(links.prev, None);
        assert_eq!(links.next, url(10, 10));
        assert_eq!(links.last, url(90, 10));
    }

    #[test]
    fn last_page_has_no_next_or_last() {
        let links = links("90", "10", 95).unwrap();
        assert_eq!(links.first, url(0, 10));
        assert_eq!(links.prev, url(80, 10));
        assert_eq!(links.next, None);
        assert_eq!(links.last, None);
    }

    #[test]
    fn prev_never_goes_negative() {
        let links = links("5", "10", 95).unwrap();
        assert_eq!(links.prev, url(0, 10));
    }

    #[test]
    fn next_is_capped_at_the_last_page() {
        let links = links("85", "10", 100).unwrap();
        assert_eq!(links.next, url(90, 10));
        assert_eq!(links.last, url(90, 10));
    }

    #[test]
    fn no_limit_means_no_links() {
        let config = Config::default();
        let query = RawQuery::new();
        let options = build_options(&query, &config);
        assert_eq!(build_links(&options, &query, &config, BASE, 95), None);
    }

    #[test]
    fn zero_limit_or_empty_collection_means_no_links() {
        assert_eq!(links("0", "0", 95), None);
        assert_eq!(links("0", "10", 0), None);
    }

    #[test]
    fn missing_offset_is_appended() {
        let config = Config::default();
        let query: RawQuery = [("q", "x"), ("limit", "10")].into_iter().collect();
        let options = build_options(&query, &config);
        let links = build_links(&options, &query, &config, BASE, 30).unwrap();
        assert_eq!(links.next.as_deref(), Some("http://localhost?q=x&limit=10&offset=10"));
    }

    #[test]
    fn renamed_offset_keyword_is_rewritten() {
        let config = Config::builder()
            .rename(crate::config::Keyword::Offset, "$skip")
            .build()
            .unwrap();
        let query: RawQuery = [("$skip", "10"), ("limit", "10")].into_iter().collect();
        let options = build_options(&query, &config);
        let links = build_links(&options, &query, &config, BASE, 30).unwrap();
        assert_eq!(links.first.as_deref(), Some("http://localhost?%24skip=0&limit=10"));
    }

    #[test]
    fn source_query_is_untouched() {
        let config = Config::default();
        let query: RawQuery = [("offset", "20"), ("limit", "10")].into_iter().collect();
        let options = build_options(&query, &config);
        let _ = build_links(&options, &query, &config, BASE, 95);
        assert_eq!(query.get("offset").and_then(|v| v.as_single()), Some("20"));
    }

    #[test]
    fn serializes_present_links_only() {
        let links = links("0", "10", 15).unwrap();
        assert_eq!(
            serde_json::to_value(&links).unwrap(),
            serde_json::json!({
                "next": "http://localhost?offset=10&limit=10",
                "last": "http://localhost?offset=10&limit=10",
            })
        );
    }
}
