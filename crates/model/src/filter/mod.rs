//! Wire shape of the disjunctive filters accepted by the listing operations.
//!
//! A [`FilterOr`] is an OR of [`FilterAnd`] conjunctions, each an AND of
//! single-field [`FilterField`] comparisons. The filter matching every entity
//! is a single empty conjunction ([`FilterOr::match_all`]); there is no wire
//! encoding for "match nothing".

pub mod field;
pub mod operator;

use crate::core::status::Status;
use chrono::{DateTime, TimeDelta, Utc};
use field::SortableFieldId;
use operator::{
    ArrayOperator, BooleanOperator, DateOperator, DurationOperator, NumberOperator,
    StatusOperator, StringOperator,
};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOr {
    pub and: Vec<FilterAnd>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterAnd {
    pub fields: Vec<FilterField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterField {
    pub selector: SortableFieldId,
    pub condition: FieldCondition,
}

/// Typed comparison carried by a [`FilterField`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldCondition {
    String(StringFilter),
    Number(NumberFilter),
    Date(DateFilter),
    Duration(DurationFilter),
    Status(StatusFilter),
    Array(ArrayFilter),
    Boolean(BooleanFilter),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringFilter {
    pub value: String,
    pub operator: StringOperator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberFilter {
    pub value: i64,
    pub operator: NumberOperator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateFilter {
    pub value: DateTime<Utc>,
    pub operator: DateOperator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationFilter {
    #[serde(with = "wire_duration")]
    pub value: TimeDelta,
    pub operator: DurationOperator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusFilter {
    pub value: Status,
    pub operator: StatusOperator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayFilter {
    pub value: String,
    pub operator: ArrayOperator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BooleanFilter {
    pub value: bool,
    pub operator: BooleanOperator,
}

impl FilterOr {
    pub fn new(and: Vec<FilterAnd>) -> Self {
        Self { and }
    }

    /// The unconditional filter: one conjunction with no fields.
    pub fn match_all() -> Self {
        Self {
            and: vec![FilterAnd::default()],
        }
    }

    pub fn is_match_all(&self) -> bool {
        self.and.iter().any(|conj| conj.fields.is_empty())
    }

    pub fn len(&self) -> usize {
        self.and.len()
    }

    pub fn is_empty(&self) -> bool {
        self.and.is_empty()
    }
}

impl FilterAnd {
    pub fn new(fields: Vec<FilterField>) -> Self {
        Self { fields }
    }

    pub fn single(field: FilterField) -> Self {
        Self {
            fields: vec![field],
        }
    }
}

impl FilterField {
    pub fn new(selector: SortableFieldId, condition: FieldCondition) -> Self {
        Self {
            selector,
            condition,
        }
    }
}

impl fmt::Display for FilterOr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, conj) in self.and.iter().enumerate() {
            if i > 0 {
                write!(f, " OR ")?;
            }
            write!(f, "({conj})")?;
        }
        Ok(())
    }
}

impl fmt::Display for FilterAnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fields.is_empty() {
            return write!(f, "TRUE");
        }
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, " AND ")?;
            }
            write!(f, "{field}")?;
        }
        Ok(())
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = &self.selector;
        match &self.condition {
            FieldCondition::String(c) => write!(f, "{field} {:?} {:?}", c.operator, c.value),
            FieldCondition::Number(c) => write!(f, "{field} {:?} {}", c.operator, c.value),
            FieldCondition::Date(c) => {
                write!(f, "{field} {:?} {}", c.operator, c.value.to_rfc3339())
            }
            FieldCondition::Duration(c) => write!(f, "{field} {:?} {}", c.operator, c.value),
            FieldCondition::Status(c) => write!(f, "{field} {:?} {}", c.operator, c.value),
            FieldCondition::Array(c) => write!(f, "{field} {:?} {:?}", c.operator, c.value),
            FieldCondition::Boolean(c) => write!(f, "{field} {:?} {}", c.operator, c.value),
        }
    }
}

/// Durations travel as `{ seconds, nanos }`, the protobuf `Duration` layout.
mod wire_duration {
    use chrono::TimeDelta;
    use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error};

    #[derive(Serialize, Deserialize)]
    struct Repr {
        seconds: i64,
        nanos: i32,
    }

    pub fn serialize<S: Serializer>(value: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error> {
        Repr {
            seconds: value.num_seconds(),
            nanos: value.subsec_nanos(),
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TimeDelta, D::Error> {
        let repr = Repr::deserialize(deserializer)?;
        let nanos = u32::try_from(repr.nanos.rem_euclid(1_000_000_000))
            .map_err(|_| D::Error::custom("invalid duration nanos"))?;
        let seconds = repr.seconds + i64::from(repr.nanos.div_euclid(1_000_000_000));
        TimeDelta::new(seconds, nanos).ok_or_else(|| D::Error::custom("duration out of range"))
    }
}
