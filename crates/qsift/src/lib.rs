//! qsift - Translate URL query parameters into filter criteria.
//!
//! qsift reads a query string such as
//! `?status=open&priority>=3&tags=a,b&sort=-priority&offset=20&limit=10`
//! and produces:
//!
//! - a [`Criteria`] tree: field to value, operator map or nested criteria
//! - [`QueryOptions`]: field projection, ordering, skip and limit
//! - optionally, [`PageLinks`] for the first, previous, next and last pages
//!
//! It does not run queries. The output is meant for a data-access layer
//! to interpret, and serializes to JSON with `serde`.
//!
//! # Quick Start
//!
//! ```rust
//! use qsift::{translate, ComparisonOperator, Condition, Config, TypedValue};
//!
//! let t = translate(
//!     "status=open&priority>=3&tags=a,b&sort=-priority&offset=20&limit=10",
//!     Config::default(),
//! );
//!
//! assert_eq!(
//!     t.criteria().get("status").and_then(Condition::as_value),
//!     Some(&TypedValue::from("open"))
//! );
//! let tags = t.criteria().get("tags").and_then(Condition::as_operators).unwrap();
//! assert!(tags.get(&ComparisonOperator::In).is_some());
//!
//! assert_eq!(t.options().skip, Some(20));
//! assert_eq!(t.options().limit, Some(10));
//!
//! let links = t.links("https://api.example.com/items", 95).unwrap();
//! assert_eq!(
//!     links.next.as_deref(),
//!     Some("https://api.example.com/items?status=open&priority%3E=3&tags=a%2Cb&sort=-priority&offset=30&limit=10")
//! );
//! ```
//!
//! # Expressions
//!
//! | Query             | Criteria                     |
//! |-------------------|------------------------------|
//! | `a=x`             | `{a: x}`                     |
//! | `a=x,y`           | `{a: {in: [x, y]}}`          |
//! | `a!=x`, `a=!x`    | `{a: {ne: x}}`               |
//! | `a!=x,y`          | `{a: {notIn: [x, y]}}`       |
//! | `a>x`, `a>=x`     | `{a: {gt: x}}`, `{a: {gte: x}}` |
//! | `a<x`, `a<=x`     | `{a: {lt: x}}`, `{a: {lte: x}}` |
//! | `a`, `!a`         | `{a: {is: true}}`, `{a: {is: false}}` |
//! | `a:size=3`        | `{a: {size: 3}}`             |
//! | `a[b]=x`          | `{a: {b: x}}` (with [`BracketCodec`]) |
//!
//! # Value Types
//!
//! Each token is coerced by the first rule that matches: `/re/i` is a
//! regex, `'x'` or `"x"` a forced string, `true`/`false` a boolean, an
//! ISO-8601 timestamp a date, and a finite number a number. Anything else
//! stays a string.

mod comparison;
mod config;
mod criteria;
mod error;
mod links;
mod list;
mod op;
mod options;
mod translate;
mod typer;
mod value;

// Re-export public API
pub use comparison::parse_comparison;
pub use config::{Config, ConfigBuilder, Keyword, Keywords, Settings};
pub use criteria::{build_criteria, Condition, Criteria, Operand, OperatorMap};
pub use error::{QsiftError, Result};
pub use links::{build_links, PageLinks};
pub use list::{parse_list, split_list, Tokens};
pub use op::ComparisonOperator;
pub use options::{build_options, Dir, OrderBy, QueryOptions, SelectSpec};
pub use translate::{translate, QueryInput, Translation};
pub use typer::{coerce, type_token, Coercion, TypedToken, COERCIONS};
pub use value::{Pattern, TypedValue};

pub use qsift_codec::{BracketCodec, FlatCodec, QueryCodec, RawQuery, RawValue};
