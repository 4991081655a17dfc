//! Builders for single-field wire conditions.

use crate::error::{PlanError, Result};
use model::{
    catalog::FieldDescriptor,
    core::{data_type::ValueType, value::Value},
    filter::{
        ArrayFilter, BooleanFilter, DateFilter, DurationFilter, FieldCondition, FilterField,
        NumberFilter, StatusFilter, StringFilter,
        operator::{ArrayOperator, BooleanOperator, Comparison, StatusOperator, StringOperator},
    },
};

/// String methods that map onto a wire operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringMethod {
    StartsWith,
    EndsWith,
    Contains,
}

impl StringMethod {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "startswith" => Some(StringMethod::StartsWith),
            "endswith" => Some(StringMethod::EndsWith),
            "contains" => Some(StringMethod::Contains),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            StringMethod::StartsWith => "StartsWith",
            StringMethod::EndsWith => "EndsWith",
            StringMethod::Contains => "Contains",
        }
    }
}

/// `field <cmp> value`.
pub fn comparison(field: FieldDescriptor, cmp: Comparison, value: Value) -> Result<FilterField> {
    let condition = match (field.value_type, value) {
        (ValueType::String, Value::String(value)) if cmp.is_equality() => {
            FieldCondition::String(StringFilter {
                value,
                operator: if cmp == Comparison::Equal {
                    StringOperator::Equal
                } else {
                    StringOperator::NotEqual
                },
            })
        }
        (ValueType::Int, Value::Int(value)) => FieldCondition::Number(NumberFilter {
            value,
            operator: cmp.to_number(),
        }),
        (ValueType::Timestamp, Value::Timestamp(value)) => FieldCondition::Date(DateFilter {
            value,
            operator: cmp.to_date(),
        }),
        (ValueType::Duration, Value::Duration(value)) => {
            FieldCondition::Duration(DurationFilter {
                value,
                operator: cmp.to_duration(),
            })
        }
        (ValueType::Status(kind), Value::Status(value))
            if value.kind() == kind && cmp.is_equality() =>
        {
            FieldCondition::Status(StatusFilter {
                value,
                operator: if cmp == Comparison::Equal {
                    StatusOperator::Equal
                } else {
                    StatusOperator::NotEqual
                },
            })
        }
        (ValueType::Boolean, Value::Boolean(value)) if cmp.is_equality() => {
            FieldCondition::Boolean(BooleanFilter {
                value,
                operator: if cmp == Comparison::Equal {
                    BooleanOperator::Is
                } else {
                    BooleanOperator::IsNot
                },
            })
        }
        (declared, value) => return Err(mismatch(cmp, declared, &value)),
    };
    Ok(FilterField::new(field.id, condition))
}

/// `field.StartsWith(value)` and friends; `negated` only applies to `Contains`.
pub fn string_method(
    field: FieldDescriptor,
    method: StringMethod,
    value: Value,
    negated: bool,
) -> Result<FilterField> {
    let operator = match (method, negated) {
        (StringMethod::StartsWith, false) => StringOperator::StartsWith,
        (StringMethod::EndsWith, false) => StringOperator::EndsWith,
        (StringMethod::Contains, false) => StringOperator::Contains,
        (StringMethod::Contains, true) => StringOperator::NotContains,
        (method, true) => {
            return Err(PlanError::unsupported(
                format!("!{}", method.name()),
                field.value_type,
            ));
        }
    };
    match (field.value_type, value) {
        (ValueType::String, Value::String(value)) => Ok(FilterField::new(
            field.id,
            FieldCondition::String(StringFilter { value, operator }),
        )),
        (ValueType::String, other) => {
            Err(PlanError::unsupported(method.name(), other.value_type()))
        }
        (declared, _) => Err(PlanError::unsupported(method.name(), declared)),
    }
}

/// `field.Contains(value)` on a collection-valued field.
pub fn array_contains(field: FieldDescriptor, value: Value, negated: bool) -> Result<FilterField> {
    let operator = if negated {
        ArrayOperator::NotContains
    } else {
        ArrayOperator::Contains
    };
    match (field.value_type, value) {
        (ValueType::Array, Value::String(value)) => Ok(FilterField::new(
            field.id,
            FieldCondition::Array(ArrayFilter { value, operator }),
        )),
        (declared, value) => Err(PlanError::unsupported(
            "Contains",
            format!("{declared} and {}", value.value_type()),
        )),
    }
}

/// A boolean field used as a predicate on its own.
pub fn flag(field: FieldDescriptor, negated: bool) -> Result<FilterField> {
    comparison(
        field,
        if negated {
            Comparison::NotEqual
        } else {
            Comparison::Equal
        },
        Value::Boolean(true),
    )
}

fn mismatch(cmp: Comparison, declared: ValueType, value: &Value) -> PlanError {
    let actual = value.value_type();
    if actual == declared {
        PlanError::unsupported(cmp, declared)
    } else {
        PlanError::unsupported(cmp, format!("{declared} and {actual}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone, Utc};
    use model::{
        core::status::{SessionStatus, StatusKind, TaskStatus},
        filter::{
            field::{EntityKind, SortableFieldId},
            operator::{DateOperator, DurationOperator, NumberOperator},
        },
    };

    fn field(code: u16, value_type: ValueType) -> FieldDescriptor {
        FieldDescriptor {
            id: SortableFieldId::summary(EntityKind::Task, code),
            value_type,
        }
    }

    #[test]
    fn test_ordered_types_map_operators() {
        let leaf = comparison(
            field(1, ValueType::Int),
            Comparison::GreaterOrEqual,
            Value::Int(3),
        )
        .unwrap();
        assert_eq!(
            leaf.condition,
            FieldCondition::Number(NumberFilter {
                value: 3,
                operator: NumberOperator::GreaterThanOrEqual
            })
        );

        let at = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let leaf = comparison(
            field(2, ValueType::Timestamp),
            Comparison::LessThan,
            Value::Timestamp(at),
        )
        .unwrap();
        assert_eq!(
            leaf.condition,
            FieldCondition::Date(DateFilter {
                value: at,
                operator: DateOperator::Before
            })
        );

        let leaf = comparison(
            field(3, ValueType::Duration),
            Comparison::GreaterThan,
            Value::Duration(TimeDelta::minutes(5)),
        )
        .unwrap();
        assert_eq!(
            leaf.condition,
            FieldCondition::Duration(DurationFilter {
                value: TimeDelta::minutes(5),
                operator: DurationOperator::LongerThan
            })
        );
    }

    #[test]
    fn test_string_ordering_is_unsupported() {
        let result = comparison(
            field(1, ValueType::String),
            Comparison::LessThan,
            Value::from("a"),
        );
        match result {
            Err(PlanError::UnsupportedExpression {
                operator,
                value_type,
            }) => {
                assert_eq!(operator, "<");
                assert_eq!(value_type, "string");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_status_kind_must_match() {
        let task_status = field(4, ValueType::Status(StatusKind::Task));
        assert!(comparison(task_status, Comparison::Equal, TaskStatus::Error.into()).is_ok());
        assert!(matches!(
            comparison(
                task_status,
                Comparison::Equal,
                SessionStatus::Running.into()
            ),
            Err(PlanError::UnsupportedExpression { .. })
        ));
        assert!(comparison(task_status, Comparison::LessThan, TaskStatus::Error.into()).is_err());
    }

    #[test]
    fn test_type_mismatch_is_unsupported() {
        let result = comparison(field(1, ValueType::Int), Comparison::Equal, Value::from("1"));
        assert!(matches!(
            result,
            Err(PlanError::UnsupportedExpression { value_type, .. })
                if value_type == "int and string"
        ));
    }

    #[test]
    fn test_string_methods() {
        let name = field(5, ValueType::String);
        let leaf = string_method(name, StringMethod::Contains, Value::from("tmp"), true).unwrap();
        assert_eq!(
            leaf.condition,
            FieldCondition::String(StringFilter {
                value: "tmp".to_string(),
                operator: StringOperator::NotContains
            })
        );
        assert!(string_method(name, StringMethod::StartsWith, Value::from("a"), true).is_err());
        assert!(
            string_method(
                field(1, ValueType::Int),
                StringMethod::EndsWith,
                Value::from("a"),
                false
            )
            .is_err()
        );
    }

    #[test]
    fn test_flag_fields() {
        let flag_field = field(6, ValueType::Boolean);
        assert_eq!(
            flag(flag_field, true).unwrap().condition,
            FieldCondition::Boolean(BooleanFilter {
                value: true,
                operator: BooleanOperator::IsNot
            })
        );
        assert_eq!(
            comparison(flag_field, Comparison::Equal, Value::Boolean(false))
                .unwrap()
                .condition,
            FieldCondition::Boolean(BooleanFilter {
                value: false,
                operator: BooleanOperator::Is
            })
        );
    }

    #[test]
    fn test_array_membership() {
        let partitions = field(7, ValueType::Array);
        let leaf = array_contains(partitions, Value::from("gpu"), false).unwrap();
        assert_eq!(
            leaf.condition,
            FieldCondition::Array(ArrayFilter {
                value: "gpu".to_string(),
                operator: ArrayOperator::Contains
            })
        );
        assert!(array_contains(partitions, Value::Int(1), false).is_err());
    }
}
