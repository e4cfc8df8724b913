//! Comparison operators for criteria.
//!
//! The [`ComparisonOperator`] enum is closed except for
//! [`ComparisonOperator::Custom`], which carries an operator name taken
//! verbatim from a `field:name=value` expression.

use serde::{Serialize, Serializer};

/// Comparison operator attached to a field in an operator map.
///
/// Grouped by what they compare:
/// - **Equality**: `Equals`, `NotEquals`, `Not` (negated regex)
/// - **Ordering**: `GreaterThan`, `GreaterOrEqual`, `LessThan`, `LessOrEqual`
/// - **Membership**: `In`, `NotIn`
/// - **Existence**: `Is`, `IsNot`
/// - **Extension**: `Custom(name)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComparisonOperator {
    /// Equal.
    Equals,
    /// Not equal.
    NotEquals,
    /// Greater than.
    GreaterThan,
    /// Greater than or equal.
    GreaterOrEqual,
    /// Less than.
    LessThan,
    /// Less than or equal.
    LessOrEqual,
    /// Value is one of a list.
    In,
    /// Value is none of a list.
    NotIn,
    /// Existence test; `Is: true` means present, `Is: false` absent.
    Is,
    /// Negated existence test.
    IsNot,
    /// Does not match (used with regex values).
    Not,
    /// Operator named in the query itself.
    Custom(String),
}

impl ComparisonOperator {
    /// Creates a custom operator.
    pub fn custom(name: impl Into<String>) -> Self {
        ComparisonOperator::Custom(name.into())
    }

    /// Returns `true` for the four ordering operators.
    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            ComparisonOperator::GreaterThan
                | ComparisonOperator::GreaterOrEqual
                | ComparisonOperator::LessThan
                | ComparisonOperator::LessOrEqual
        )
    }

    /// Returns `true` for operators whose operand may be a list.
    pub fn takes_list(&self) -> bool {
        matches!(
            self,
            ComparisonOperator::In | ComparisonOperator::NotIn | ComparisonOperator::Custom(_)
        )
    }

    /// Returns `true` if this is a [`ComparisonOperator::Custom`].
    pub fn is_custom(&self) -> bool {
        matches!(self, ComparisonOperator::Custom(_))
    }

    /// Returns the wire name of this operator.
    pub fn as_str(&self) -> &str {
        match self {
            ComparisonOperator::Equals => "eq",
            ComparisonOperator::NotEquals => "ne",
            ComparisonOperator::GreaterThan => "gt",
            ComparisonOperator::GreaterOrEqual => "gte",
            ComparisonOperator::LessThan => "lt",
            ComparisonOperator::LessOrEqual => "lte",
            ComparisonOperator::In => "in",
            ComparisonOperator::NotIn => "notIn",
            ComparisonOperator::Is => "is",
            ComparisonOperator::IsNot => "isNot",
            ComparisonOperator::Not => "not",
            ComparisonOperator::Custom(name) => name,
        }
    }
}

impl std::fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ComparisonOperator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
