//! The comparison-expression grammar.
//!
//! A query pair `key=value` is rebuilt into one expression (`key` alone when
//! the value is empty) and read as `KEY (OP VALUE)?`:
//!
//! | Expression          | Condition                                |
//! |---------------------|------------------------------------------|
//! | `a`                 | `{is: true}`                             |
//! | `!a`, `a=!`         | `{is: false}`                            |
//! | `a=x`               | `x`                                      |
//! | `a=x,y`             | `{in: [x, y]}`                           |
//! | `a=!x`, `a!=x`      | `{ne: x}`, or `{not: /re/}` for a regex  |
//! | `a=!x,!y`, `a!=x,y` | `{notIn: [x, y]}`                        |
//! | `a>x`, `a>=x`, …    | `{gt: x}`, `{gte: x}`, …                 |
//! | `a:name=x,y`        | `{name: [x, y]}`                         |
//!
//! The operator may carry one redundant leading `=`, which is what an
//! encoded operator in the value position produces (`a=%3E%3D10` reads as
//! `a=>=10`, the same as `a>=10`).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::criteria::{Condition, Operand, OperatorMap};
use crate::list::parse_list;
use crate::op::ComparisonOperator;
use crate::typer::{type_token, TypedToken};
use crate::value::TypedValue;

static EXPRESSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^(!?[^><!=:]+)(?:=?(>=?|<=?|!=|=|:[^=]+=)(.*))?$").expect("expression pattern")
});

/// Parses one query pair into a field and its condition.
///
/// Returns `None` when the expression does not have the `KEY (OP VALUE)?`
/// shape; callers drop such pairs.
///
/// ```
/// use qsift::{parse_comparison, ComparisonOperator, Condition, OperatorMap, TypedValue};
///
/// let (field, condition) = parse_comparison("age>", "21").unwrap();
/// assert_eq!(field, "age");
/// assert_eq!(
///     condition,
///     Condition::Operators(OperatorMap::single(
///         ComparisonOperator::GreaterOrEqual,
///         TypedValue::Number(21.0),
///     ))
/// );
/// ```
pub fn parse_comparison(key: &str, value: &str) -> Option<(String, Condition)> {
    let expr = if value.is_empty() {
        key.to_string()
    } else {
        format!("{key}={value}")
    };

    let caps = EXPRESSION.captures(&expr)?;
    let field = caps.get(1)?.as_str();

    let Some(op) = caps.get(2).map(|m| m.as_str()) else {
        return Some(existence(field));
    };
    let raw = caps.get(3).map_or("", |m| m.as_str());
    let field = field.to_string();

    let condition = match op {
        "=" if raw == "!" => exists(false),
        "=" => equality(raw, false)?,
        "!=" => equality(raw, true)?,
        ">" => relational(ComparisonOperator::GreaterThan, raw),
        ">=" => relational(ComparisonOperator::GreaterOrEqual, raw),
        "<" => relational(ComparisonOperator::LessThan, raw),
        "<=" => relational(ComparisonOperator::LessOrEqual, raw),
        custom => {
            let name = custom.strip_prefix(':')?.strip_suffix('=')?;
            custom_operator(name, raw)
        }
    };
    Some((field, condition))
}

fn exists(present: bool) -> Condition {
    Condition::Operators(OperatorMap::single(
        ComparisonOperator::Is,
        TypedValue::Boolean(present),
    ))
}

/// A key with no operator: `a` tests for presence, `!a` for absence.
fn existence(field: &str) -> (String, Condition) {
    match field.strip_prefix('!') {
        Some(rest) => (rest.to_string(), exists(false)),
        None => (field.to_string(), exists(true)),
    }
}

/// `Not` for regex literals, `NotEquals` otherwise.
fn negation(value: TypedValue) -> Condition {
    let op = if value.is_regex() {
        ComparisonOperator::Not
    } else {
        ComparisonOperator::NotEquals
    };
    Condition::Operators(OperatorMap::single(op, value))
}

fn equality(raw: &str, negated_op: bool) -> Option<Condition> {
    let mut tokens: Vec<TypedToken> = parse_list(raw).collect();

    if tokens.len() > 1 {
        let op = if negated_op || tokens.iter().all(|t| t.negated) {
            ComparisonOperator::NotIn
        } else {
            ComparisonOperator::In
        };
        let values = tokens.into_iter().map(|t| t.value).collect::<Vec<_>>();
        return Some(Condition::Operators(OperatorMap::single(op, values)));
    }

    let token = tokens.pop()?;
    if negated_op || token.negated {
        Some(negation(token.value))
    } else {
        Some(Condition::Value(token.value))
    }
}

fn relational(op: ComparisonOperator, raw: &str) -> Condition {
    Condition::Operators(OperatorMap::single(op, type_token(raw).value))
}

/// `a:name=x,y` splits on every comma (quotes are not special here).
fn custom_operator(name: &str, raw: &str) -> Condition {
    let mut values: Vec<TypedValue> = raw.split(',').map(|piece| type_token(piece).value).collect();
    let operand: Operand = if values.len() == 1 {
        values.remove(0).into()
    } else {
        values.into()
    };
    Condition::Operators(OperatorMap::single(ComparisonOperator::custom(name), operand))
}
