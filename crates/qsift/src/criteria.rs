//! The criteria tree and the builder that derives it from a raw query.
//!
//! A [`Criteria`] maps each field to a [`Condition`]: a bare value
//! (equality shorthand), an [`OperatorMap`], or a nested criteria for
//! bracket-style segments. Fields at one level are an implicit AND.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use qsift_codec::{RawQuery, RawValue};
use serde::{Serialize, Serializer};
use tracing::trace;

use crate::comparison::parse_comparison;
use crate::config::Config;
use crate::op::ComparisonOperator;
use crate::value::TypedValue;

/// Operand of one operator: a single value or an ordered list.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// One value.
    Single(TypedValue),
    /// Several values, for `In`, `NotIn` and custom operators.
    List(Vec<TypedValue>),
}

impl Operand {
    /// Returns the single value, if this is not a list.
    pub fn as_single(&self) -> Option<&TypedValue> {
        match self {
            Operand::Single(v) => Some(v),
            Operand::List(_) => None,
        }
    }

    /// Returns the list, if this is one.
    pub fn as_list(&self) -> Option<&[TypedValue]> {
        match self {
            Operand::List(values) => Some(values),
            Operand::Single(_) => None,
        }
    }
}

impl From<TypedValue> for Operand {
    fn from(v: TypedValue) -> Self {
        Operand::Single(v)
    }
}

impl From<Vec<TypedValue>> for Operand {
    fn from(values: Vec<TypedValue>) -> Self {
        Operand::List(values)
    }
}

impl Serialize for Operand {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Operand::Single(v) => v.serialize(serializer),
            Operand::List(values) => values.serialize(serializer),
        }
    }
}

/// Comparisons on one field, keyed by operator.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct OperatorMap(BTreeMap<ComparisonOperator, Operand>);

impl OperatorMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        OperatorMap::default()
    }

    /// Creates a map holding one comparison.
    pub fn single(op: ComparisonOperator, operand: impl Into<Operand>) -> Self {
        OperatorMap::new().with(op, operand)
    }

    /// Adds a comparison, builder style.
    pub fn with(mut self, op: ComparisonOperator, operand: impl Into<Operand>) -> Self {
        self.insert(op, operand);
        self
    }

    /// Sets a comparison, returning the operand it replaced.
    pub fn insert(&mut self, op: ComparisonOperator, operand: impl Into<Operand>) -> Option<Operand> {
        self.0.insert(op, operand.into())
    }

    /// Looks up the operand for an operator.
    pub fn get(&self, op: &ComparisonOperator) -> Option<&Operand> {
        self.0.get(op)
    }

    /// Number of operators.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no operators.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates comparisons in operator order.
    pub fn iter(&self) -> impl Iterator<Item = (&ComparisonOperator, &Operand)> {
        self.0.iter()
    }

    /// Folds another map in; operators present in both take `other`'s operand.
    pub fn merge(&mut self, other: OperatorMap) {
        self.0.extend(other.0);
    }
}

/// What a field is compared against.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Equality shorthand.
    Value(TypedValue),
    /// One or more operator comparisons.
    Operators(OperatorMap),
    /// Criteria on a nested object.
    Nested(Criteria),
}

impl Condition {
    /// Returns the bare value, if this is equality shorthand.
    pub fn as_value(&self) -> Option<&TypedValue> {
        match self {
            Condition::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the operator map, if present.
    pub fn as_operators(&self) -> Option<&OperatorMap> {
        match self {
            Condition::Operators(ops) => Some(ops),
            _ => None,
        }
    }

    /// Returns the nested criteria, if present.
    pub fn as_nested(&self) -> Option<&Criteria> {
        match self {
            Condition::Nested(c) => Some(c),
            _ => None,
        }
    }

    /// Combines a later condition for the same field into this one.
    ///
    /// Operator maps merge per operator and nested criteria merge per
    /// field; a bare value or a change of shape overwrites.
    pub fn merge(&mut self, incoming: Condition) {
        match (self, incoming) {
            (Condition::Operators(existing), Condition::Operators(ops)) => existing.merge(ops),
            (Condition::Nested(existing), Condition::Nested(nested)) => existing.merge(nested),
            (slot, incoming) => *slot = incoming,
        }
    }
}

impl From<TypedValue> for Condition {
    fn from(v: TypedValue) -> Self {
        Condition::Value(v)
    }
}

impl From<OperatorMap> for Condition {
    fn from(ops: OperatorMap) -> Self {
        Condition::Operators(ops)
    }
}

impl From<Criteria> for Condition {
    fn from(c: Criteria) -> Self {
        Condition::Nested(c)
    }
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Condition::Value(v) => v.serialize(serializer),
            Condition::Operators(ops) => ops.serialize(serializer),
            Condition::Nested(c) => c.serialize(serializer),
        }
    }
}

/// A criteria tree: field name to condition, sorted by field.
///
/// # Example
///
/// ```
/// use qsift::{ComparisonOperator, Condition, Criteria, OperatorMap, TypedValue};
///
/// let mut criteria = Criteria::new();
/// criteria.merge_field("age", OperatorMap::single(ComparisonOperator::GreaterOrEqual, TypedValue::from(10)));
/// criteria.merge_field("age", OperatorMap::single(ComparisonOperator::LessOrEqual, TypedValue::from(20)));
///
/// let age = criteria.get("age").and_then(Condition::as_operators).unwrap();
/// assert_eq!(age.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Criteria(BTreeMap<String, Condition>);

impl Criteria {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Criteria::default()
    }

    /// Looks up a field.
    pub fn get(&self, field: &str) -> Option<&Condition> {
        self.0.get(field)
    }

    /// Returns `true` if the field has a condition.
    pub fn contains_field(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Number of fields at this level.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Condition)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Adds a condition, merging with any existing one for the field.
    pub fn merge_field(&mut self, field: impl Into<String>, condition: impl Into<Condition>) {
        let condition = condition.into();
        match self.0.entry(field.into()) {
            Entry::Occupied(mut entry) => entry.get_mut().merge(condition),
            Entry::Vacant(entry) => {
                entry.insert(condition);
            }
        }
    }

    /// Shallow merge: each field of `other` replaces the same field here.
    pub fn merge(&mut self, other: Criteria) {
        self.0.extend(other.0);
    }
}

/// Builds the criteria tree for a raw query.
///
/// Keys in the configured ignore set are skipped at the top level. Nested
/// object segments are recursed into without the ignore filter;
/// list-shaped segments (`a[0]`, `a[1]`, …) are parsed like repeated keys.
/// Keys whose expression does not parse are dropped.
pub fn build_criteria(query: &RawQuery, config: &Config) -> Criteria {
    collect(query, Some(config))
}

fn collect(query: &RawQuery, config: Option<&Config>) -> Criteria {
    let mut criteria = Criteria::new();
    for (key, value) in query.iter() {
        if config.is_some_and(|c| c.is_ignored(key)) {
            continue;
        }
        match value {
            RawValue::Nested(nested) if !nested.is_consecutive_integer_keyed() => {
                criteria.merge_field(key, collect(nested, None));
            }
            scalar => match parse_comparison(key, &scalar.joined()) {
                Some((field, condition)) => criteria.merge_field(field, condition),
                None => trace!(key = %key, "dropping unparseable comparison"),
            },
        }
    }
    criteria
}
