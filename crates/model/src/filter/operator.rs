use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StringOperator {
    Equal,
    NotEqual,
    StartsWith,
    EndsWith,
    Contains,
    NotContains,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumberOperator {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateOperator {
    Equal,
    NotEqual,
    Before,
    BeforeOrEqual,
    After,
    AfterOrEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DurationOperator {
    Equal,
    NotEqual,
    ShorterThan,
    ShorterThanOrEqual,
    LongerThan,
    LongerThanOrEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusOperator {
    Equal,
    NotEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArrayOperator {
    Contains,
    NotContains,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BooleanOperator {
    Is,
    IsNot,
}

/// Source-level comparison, before it is mapped onto a typed wire operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Equal,
    NotEqual,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
}

impl Comparison {
    /// Logical complement: `!(a < b)` is `a >= b`.
    pub fn negate(self) -> Self {
        match self {
            Comparison::Equal => Comparison::NotEqual,
            Comparison::NotEqual => Comparison::Equal,
            Comparison::LessThan => Comparison::GreaterOrEqual,
            Comparison::LessOrEqual => Comparison::GreaterThan,
            Comparison::GreaterThan => Comparison::LessOrEqual,
            Comparison::GreaterOrEqual => Comparison::LessThan,
        }
    }

    /// Operand swap: `5 < x` is `x > 5`.
    pub fn mirror(self) -> Self {
        match self {
            Comparison::Equal => Comparison::Equal,
            Comparison::NotEqual => Comparison::NotEqual,
            Comparison::LessThan => Comparison::GreaterThan,
            Comparison::LessOrEqual => Comparison::GreaterOrEqual,
            Comparison::GreaterThan => Comparison::LessThan,
            Comparison::GreaterOrEqual => Comparison::LessOrEqual,
        }
    }

    pub fn to_number(self) -> NumberOperator {
        match self {
            Comparison::Equal => NumberOperator::Equal,
            Comparison::NotEqual => NumberOperator::NotEqual,
            Comparison::LessThan => NumberOperator::LessThan,
            Comparison::LessOrEqual => NumberOperator::LessThanOrEqual,
            Comparison::GreaterThan => NumberOperator::GreaterThan,
            Comparison::GreaterOrEqual => NumberOperator::GreaterThanOrEqual,
        }
    }

    pub fn to_date(self) -> DateOperator {
        match self {
            Comparison::Equal => DateOperator::Equal,
            Comparison::NotEqual => DateOperator::NotEqual,
            Comparison::LessThan => DateOperator::Before,
            Comparison::LessOrEqual => DateOperator::BeforeOrEqual,
            Comparison::GreaterThan => DateOperator::After,
            Comparison::GreaterOrEqual => DateOperator::AfterOrEqual,
        }
    }

    pub fn to_duration(self) -> DurationOperator {
        match self {
            Comparison::Equal => DurationOperator::Equal,
            Comparison::NotEqual => DurationOperator::NotEqual,
            Comparison::LessThan => DurationOperator::ShorterThan,
            Comparison::LessOrEqual => DurationOperator::ShorterThanOrEqual,
            Comparison::GreaterThan => DurationOperator::LongerThan,
            Comparison::GreaterOrEqual => DurationOperator::LongerThanOrEqual,
        }
    }

    pub fn is_equality(self) -> bool {
        matches!(self, Comparison::Equal | Comparison::NotEqual)
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparison::Equal => write!(f, "=="),
            Comparison::NotEqual => write!(f, "!="),
            Comparison::LessThan => write!(f, "<"),
            Comparison::LessOrEqual => write!(f, "<="),
            Comparison::GreaterThan => write!(f, ">"),
            Comparison::GreaterOrEqual => write!(f, ">="),
        }
    }
}
