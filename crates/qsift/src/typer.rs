//! Coercion of raw tokens into [`TypedValue`]s.
//!
//! Coercion is an ordered cascade; the first rule that accepts a token
//! wins and anything left over is a plain string:
//!
//! | # | Rule    | Example               | Result                  |
//! |---|---------|-----------------------|-------------------------|
//! | 1 | regex   | `/ab,c/i`             | `Regex("ab,c", i)`      |
//! | 2 | quoted  | `'10'`, `"a,b"`       | `String("10")`          |
//! | 3 | boolean | `true`                | `Boolean(true)`         |
//! | 4 | date    | `2010-04-01T12:00Z`   | `Date(..)`              |
//! | 5 | number  | `1.2`                 | `Number(1.2)`           |
//!
//! A bare four-digit year such as `2016` matches the date shape but is
//! excluded so it reads as a number. [`type_token`] additionally strips a
//! leading `!` negation marker before running the cascade.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::value::{Pattern, TypedValue};

static REGEX_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^/(.*)/(i?)$").expect("regex literal pattern"));

static QUOTED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)^(?:"((?:[^"\\]|\\.)*)"|'((?:[^'\\]|\\.)*)')$"#).expect("quoted pattern")
});

static ISO_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^([0-9]{4})",
        r"(?:-(0[1-9]|1[0-2])",
        r"(?:-(0[1-9]|[12][0-9]|3[01])",
        r"(?:T([01][0-9]|2[0-3]):([0-5][0-9])",
        r"(?::([0-5][0-9])(?:\.([0-9]+))?)?",
        r"(Z|[+-](?:[01][0-9]|2[0-3]):[0-5][0-9]))?",
        r")?)?$",
    ))
    .expect("iso-8601 pattern")
});

/// A coercion rule: a name and a constructor that accepts or declines.
pub type Coercion = (&'static str, fn(&str) -> Option<TypedValue>);

/// The coercion cascade in priority order.
///
/// Reordering changes observable behaviour (a quoted `'true'` must stay a
/// string, `2016` must stay a number), so the order is part of the contract.
pub const COERCIONS: &[Coercion] = &[
    ("regex", as_regex),
    ("quoted", as_quoted),
    ("boolean", as_boolean),
    ("date", as_date),
    ("number", as_number),
];

/// A typed token together with its negation marker.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedToken {
    /// The token started with `!`.
    pub negated: bool,
    /// The coerced remainder.
    pub value: TypedValue,
}

/// Strips a leading `!` and coerces the remainder.
///
/// ```
/// use qsift::{type_token, TypedValue};
///
/// let token = type_token("!10");
/// assert!(token.negated);
/// assert_eq!(token.value, TypedValue::Number(10.0));
/// ```
pub fn type_token(token: &str) -> TypedToken {
    match token.strip_prefix('!') {
        Some(rest) => TypedToken {
            negated: true,
            value: coerce(rest),
        },
        None => TypedToken {
            negated: false,
            value: coerce(token),
        },
    }
}

/// Runs the coercion cascade without looking for a negation marker.
pub fn coerce(token: &str) -> TypedValue {
    COERCIONS
        .iter()
        .find_map(|(_, rule)| rule(token))
        .unwrap_or_else(|| TypedValue::String(token.to_string()))
}

fn as_regex(token: &str) -> Option<TypedValue> {
    let caps = REGEX_LITERAL.captures(token)?;
    let source = caps.get(1)?.as_str();
    let case_insensitive = caps.get(2).is_some_and(|m| !m.as_str().is_empty());
    Some(TypedValue::Regex(Pattern::new(source, case_insensitive)))
}

fn as_quoted(token: &str) -> Option<TypedValue> {
    let caps = QUOTED.captures(token)?;
    let (inner, quote) = match (caps.get(1), caps.get(2)) {
        (Some(m), _) => (m.as_str(), '"'),
        (None, Some(m)) => (m.as_str(), '\''),
        (None, None) => return None,
    };
    Some(TypedValue::String(unescape(inner, quote)))
}

/// Removes the backslash from `\<quote>` and `\\`; other escapes are kept.
fn unescape(inner: &str, quote: char) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if next == quote || next == '\\' {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

fn as_boolean(token: &str) -> Option<TypedValue> {
    match token {
        "true" => Some(TypedValue::Boolean(true)),
        "false" => Some(TypedValue::Boolean(false)),
        _ => None,
    }
}

fn as_date(token: &str) -> Option<TypedValue> {
    if token.len() == 4 {
        return None;
    }
    parse_iso_date(token).map(TypedValue::Date)
}

/// Parses the accepted ISO-8601 shapes into a UTC instant.
///
/// Missing month/day default to the first; missing time is midnight UTC.
/// Shapes naming a non-existent day (`2010-02-30`) are rejected.
pub(crate) fn parse_iso_date(token: &str) -> Option<DateTime<Utc>> {
    let caps = ISO_DATE.captures(token)?;
    let part = |i: usize, default: u32| -> Option<u32> {
        match caps.get(i) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(default),
        }
    };

    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, part(2, 1)?, part(3, 1)?)?;
    let nanos = caps.get(7).map_or(0, |m| fraction_nanos(m.as_str()));
    let naive = date.and_hms_nano_opt(part(4, 0)?, part(5, 0)?, part(6, 0)?, nanos)?;

    let offset_secs = match caps.get(8).map(|m| m.as_str()) {
        None | Some("Z") => 0,
        Some(designator) => offset_seconds(designator)?,
    };
    let offset = FixedOffset::east_opt(offset_secs)?;
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Converts fractional-second digits to nanoseconds (truncating past 9).
fn fraction_nanos(digits: &str) -> u32 {
    let mut nanos: u32 = 0;
    for i in 0..9 {
        let digit = digits
            .as_bytes()
            .get(i)
            .map_or(0, |b| u32::from(b.wrapping_sub(b'0')));
        nanos = nanos * 10 + digit;
    }
    nanos
}

/// Parses `+hh:mm` / `-hh:mm` into seconds east of UTC.
fn offset_seconds(designator: &str) -> Option<i32> {
    let (sign, rest) = match designator.as_bytes().first()? {
        b'+' => (1, &designator[1..]),
        b'-' => (-1, &designator[1..]),
        _ => return None,
    };
    let (hours, minutes) = rest.split_once(':')?;
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    Some(sign * (hours * 3600 + minutes * 60))
}

fn as_number(token: &str) -> Option<TypedValue> {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => Some(TypedValue::Number(n)),
        _ => None,
    }
}
