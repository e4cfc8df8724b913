//! Comma-separated list splitting.
//!
//! Commas inside `"…"`, `'…'` and `/…/` runs are literal, so
//! `'a,b',/x,y/i,3` splits into three tokens. Each token keeps its
//! delimiters and is handed whole to the typer.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::typer::{type_token, TypedToken};

static DELIMITED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#"(?s)^!?(?:"(?:[^"\\]|\\.)*""#,
        r#"|'(?:[^'\\]|\\.)*'"#,
        r"|/(?:[^/\\]|\\.)*/i?)",
    ))
    .expect("delimited token pattern")
});

static PLAIN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^,]+").expect("plain token pattern"));

/// Lazy iterator over the raw tokens of a list.
///
/// Cloning restarts from the clone point, so the sequence can be walked
/// more than once.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        while self.input[self.pos..].starts_with(',') {
            self.pos += 1;
        }
        let rest = &self.input[self.pos..];
        if rest.is_empty() {
            return None;
        }

        // A quoted or regex run is only a token when a comma or the end of
        // input follows it; `/usr/local` is one plain run.
        let len = DELIMITED
            .find(rest)
            .map(|m| m.end())
            .filter(|&end| end == rest.len() || rest[end..].starts_with(','))
            .or_else(|| PLAIN.find(rest).map(|m| m.end()))?;

        self.pos += len;
        Some(&rest[..len])
    }
}

/// Splits a list into raw tokens without typing them.
///
/// Empty segments (`a,,b`) produce no token.
pub fn split_list(input: &str) -> Tokens<'_> {
    Tokens { input, pos: 0 }
}

/// Splits a list and types every token.
///
/// ```
/// use qsift::{parse_list, TypedValue};
///
/// let values: Vec<_> = parse_list("10,'10',x").map(|t| t.value).collect();
/// assert_eq!(
///     values,
///     vec![TypedValue::Number(10.0), TypedValue::from("10"), TypedValue::from("x")]
/// );
/// ```
pub fn parse_list(input: &str) -> impl Iterator<Item = TypedToken> + Clone + '_ {
    split_list(input).map(type_token)
}
