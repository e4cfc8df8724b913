//! Translation configuration.
//!
//! [`Config`] is built with [`Config::builder`] or from a deserialized
//! [`Settings`] document. Both paths validate the keyword names and always
//! add them to the ignore set, so `offset=10` never becomes a criterion.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use qsift_codec::{FlatCodec, QueryCodec};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{QsiftError, Result};

/// One of the reserved query keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    /// Inclusion projection (`fields=a,b`).
    Fields,
    /// Exclusion projection (`omit=a,b`); wins over `Fields`.
    Omit,
    /// Ordering (`sort=-a,b`).
    Sort,
    /// Number of records to skip.
    Offset,
    /// Page size.
    Limit,
}

impl Keyword {
    /// All keywords, in declaration order.
    pub const ALL: [Keyword; 5] = [
        Keyword::Fields,
        Keyword::Omit,
        Keyword::Sort,
        Keyword::Offset,
        Keyword::Limit,
    ];

    /// The default parameter name, which is also the keyword's own name.
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Fields => "fields",
            Keyword::Omit => "omit",
            Keyword::Sort => "sort",
            Keyword::Offset => "offset",
            Keyword::Limit => "limit",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameter names the options builder reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Keywords {
    /// Name of the [`Keyword::Fields`] parameter.
    pub fields: String,
    /// Name of the [`Keyword::Omit`] parameter.
    pub omit: String,
    /// Name of the [`Keyword::Sort`] parameter.
    pub sort: String,
    /// Name of the [`Keyword::Offset`] parameter.
    pub offset: String,
    /// Name of the [`Keyword::Limit`] parameter.
    pub limit: String,
}

impl Default for Keywords {
    fn default() -> Self {
        Keywords {
            fields: Keyword::Fields.as_str().to_string(),
            omit: Keyword::Omit.as_str().to_string(),
            sort: Keyword::Sort.as_str().to_string(),
            offset: Keyword::Offset.as_str().to_string(),
            limit: Keyword::Limit.as_str().to_string(),
        }
    }
}

impl Keywords {
    /// The parameter name used for a keyword.
    pub fn get(&self, keyword: Keyword) -> &str {
        match keyword {
            Keyword::Fields => &self.fields,
            Keyword::Omit => &self.omit,
            Keyword::Sort => &self.sort,
            Keyword::Offset => &self.offset,
            Keyword::Limit => &self.limit,
        }
    }

    /// Renames a keyword.
    pub fn set(&mut self, keyword: Keyword, name: impl Into<String>) {
        let slot = match keyword {
            Keyword::Fields => &mut self.fields,
            Keyword::Omit => &mut self.omit,
            Keyword::Sort => &mut self.sort,
            Keyword::Offset => &mut self.offset,
            Keyword::Limit => &mut self.limit,
        };
        *slot = name.into();
    }

    /// Iterates `(keyword, parameter name)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Keyword, &str)> {
        Keyword::ALL.into_iter().map(move |k| (k, self.get(k)))
    }

    fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for (keyword, name) in self.iter() {
            if name.is_empty() {
                return Err(QsiftError::EmptyKeyword {
                    keyword: keyword.as_str(),
                });
            }
            if !seen.insert(name) {
                return Err(QsiftError::DuplicateKeyword {
                    name: name.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// The serializable part of a [`Config`].
///
/// Every field has a default, so a partial document is enough:
///
/// ```
/// use qsift::{Config, Settings};
///
/// let settings = Settings::from_json(r#"{
///     "keywords": { "offset": "$skip" },
///     "ignore": "envelope",
///     "max_limit": 50
/// }"#).unwrap();
///
/// let config = Config::from_settings(settings).unwrap();
/// assert_eq!(config.keywords().offset, "$skip");
/// assert!(config.is_ignored("envelope"));
/// assert!(config.is_ignored("$skip"));
/// assert_eq!(config.max_limit(), Some(50));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub keywords: Keywords,
    #[serde(deserialize_with = "one_or_many")]
    pub ignore: Vec<String>,
    pub max_limit: Option<u64>,
}

impl Settings {
    /// Decodes settings from a JSON document.
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Vec<String>, D::Error> {
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(name) => vec![name],
        OneOrMany::Many(names) => names,
    })
}

/// Configuration for one translation.
///
/// Cheap to clone; the codec is shared.
#[derive(Debug, Clone)]
pub struct Config {
    keywords: Keywords,
    ignore: BTreeSet<String>,
    max_limit: Option<u64>,
    parser: Arc<dyn QueryCodec>,
}

impl Default for Config {
    fn default() -> Self {
        let keywords = Keywords::default();
        Config {
            ignore: keywords.iter().map(|(_, name)| name.to_string()).collect(),
            keywords,
            max_limit: None,
            parser: Arc::new(FlatCodec),
        }
    }
}

impl Config {
    /// Starts a builder from the defaults.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Builds a config from settings, with the default codec.
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let mut builder = Config::builder()
            .keywords(settings.keywords)
            .ignore(settings.ignore);
        builder.max_limit = settings.max_limit;
        builder.build()
    }

    /// The keyword parameter names.
    pub fn keywords(&self) -> &Keywords {
        &self.keywords
    }

    /// Top-level keys skipped when building criteria.
    pub fn ignore(&self) -> &BTreeSet<String> {
        &self.ignore
    }

    /// Upper bound on `limit`, if any.
    pub fn max_limit(&self) -> Option<u64> {
        self.max_limit
    }

    /// The codec used to parse raw query strings and stringify links.
    pub fn parser(&self) -> &dyn QueryCodec {
        self.parser.as_ref()
    }

    /// Returns `true` if a top-level key is excluded from criteria.
    pub fn is_ignored(&self, key: &str) -> bool {
        self.ignore.contains(key)
    }
}

/// Builder for [`Config`].
///
/// ```
/// use qsift::{BracketCodec, Config, Keyword};
///
/// let config = Config::builder()
///     .rename(Keyword::Limit, "$limit")
///     .ignore_field("envelope")
///     .max_limit(100)
///     .parser(BracketCodec::default())
///     .build()
///     .unwrap();
///
/// assert!(config.is_ignored("$limit"));
/// assert!(!config.is_ignored("limit"));
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    keywords: Keywords,
    ignore: BTreeSet<String>,
    max_limit: Option<u64>,
    parser: Arc<dyn QueryCodec>,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        ConfigBuilder {
            keywords: Keywords::default(),
            ignore: BTreeSet::new(),
            max_limit: None,
            parser: Arc::new(FlatCodec),
        }
    }
}

impl ConfigBuilder {
    /// Replaces all keyword names.
    pub fn keywords(mut self, keywords: Keywords) -> Self {
        self.keywords = keywords;
        self
    }

    /// Renames one keyword.
    pub fn rename(mut self, keyword: Keyword, name: impl Into<String>) -> Self {
        self.keywords.set(keyword, name);
        self
    }

    /// Adds keys to the ignore set.
    pub fn ignore<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore.extend(names.into_iter().map(Into::into));
        self
    }

    /// Adds one key to the ignore set.
    pub fn ignore_field(mut self, name: impl Into<String>) -> Self {
        self.ignore.insert(name.into());
        self
    }

    /// Caps `limit`, and becomes the limit when none is given.
    pub fn max_limit(mut self, max_limit: u64) -> Self {
        self.max_limit = Some(max_limit);
        self
    }

    /// Removes the `limit` cap.
    pub fn unlimited(mut self) -> Self {
        self.max_limit = None;
        self
    }

    /// Replaces the default [`FlatCodec`].
    pub fn parser(mut self, parser: impl QueryCodec + 'static) -> Self {
        self.parser = Arc::new(parser);
        self
    }

    /// Validates keyword names and builds the config.
    ///
    /// # Errors
    ///
    /// [`QsiftError::EmptyKeyword`] if a keyword is renamed to `""`, and
    /// [`QsiftError::DuplicateKeyword`] if two keywords share a name.
    pub fn build(self) -> Result<Config> {
        self.keywords.validate()?;
        let mut ignore = self.ignore;
        ignore.extend(self.keywords.iter().map(|(_, name)| name.to_string()));
        Ok(Config {
            keywords: self.keywords,
            ignore,
            max_limit: self.max_limit,
            parser: self.parser,
        })
    }
}
