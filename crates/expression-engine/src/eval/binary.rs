use crate::{
    ast::operator::BinaryOp,
    error::{ExpressionError, Result},
};
use chrono::{DateTime, TimeDelta, Utc};
use model::core::value::Value;
use std::cmp::Ordering;
use tracing::warn;

/// Binary operation evaluator that handles different value type combinations.
///
/// `&&` and `||` never reach this type: they short-circuit in the evaluator.
pub(crate) struct BinaryOpEvaluator<'a> {
    left: &'a Value,
    right: &'a Value,
    op: BinaryOp,
}

impl<'a> BinaryOpEvaluator<'a> {
    pub fn new(left: &'a Value, right: &'a Value, op: BinaryOp) -> Self {
        Self { left, right, op }
    }

    pub fn evaluate(&self) -> Result<Value> {
        use Value::*;

        match (self.left, self.right) {
            (Int(l), Int(r)) => self.eval_int(*l, *r),
            (String(l), String(r)) => self.eval_string(l, r),
            (Timestamp(l), Timestamp(r)) => self.eval_timestamps(*l, *r),
            (Timestamp(t), Duration(d)) => self.eval_shift(*t, *d),
            (Duration(d), Timestamp(t)) if self.op == BinaryOp::Add => self.eval_shift(*t, *d),
            (Duration(l), Duration(r)) => self.eval_duration(*l, *r),
            (Boolean(_), Boolean(_))
            | (Status(_), Status(_))
            | (Bytes(_), Bytes(_))
            | (List(_), List(_)) => self.eval_equality(),
            (l, r) if l.value_type() != r.value_type() => Err(ExpressionError::TypeMismatch {
                expected: l.value_type().to_string(),
                actual: r.value_type().to_string(),
            }),
            _ => Err(self.unsupported()),
        }
    }

    fn unsupported(&self) -> ExpressionError {
        warn!(
            "Unsupported binary operation {} for {}",
            self.op,
            self.left.value_type()
        );
        ExpressionError::UnsupportedOperation(format!(
            "{} {} {}",
            self.left.value_type(),
            self.op,
            self.right.value_type()
        ))
    }

    fn overflow(&self) -> ExpressionError {
        ExpressionError::Overflow(self.op.to_string())
    }

    /// Comparison operators shared by every ordered type.
    fn compare(&self, ordering: Ordering) -> Option<Value> {
        let result = match self.op {
            BinaryOp::Equal => ordering == Ordering::Equal,
            BinaryOp::NotEqual => ordering != Ordering::Equal,
            BinaryOp::GreaterThan => ordering == Ordering::Greater,
            BinaryOp::LessThan => ordering == Ordering::Less,
            BinaryOp::GreaterOrEqual => ordering != Ordering::Less,
            BinaryOp::LessOrEqual => ordering != Ordering::Greater,
            _ => return None,
        };
        Some(Value::Boolean(result))
    }

    fn eval_int(&self, l: i64, r: i64) -> Result<Value> {
        let checked = match self.op {
            BinaryOp::Add => l.checked_add(r),
            BinaryOp::Subtract => l.checked_sub(r),
            BinaryOp::Multiply => l.checked_mul(r),
            BinaryOp::Divide | BinaryOp::Modulo if r == 0 => {
                return Err(ExpressionError::DivisionByZero);
            }
            BinaryOp::Divide => l.checked_div(r),
            BinaryOp::Modulo => l.checked_rem(r),
            _ => return self.compare(l.cmp(&r)).ok_or_else(|| self.unsupported()),
        };
        checked.map(Value::Int).ok_or_else(|| self.overflow())
    }

    fn eval_string(&self, l: &str, r: &str) -> Result<Value> {
        match self.op {
            BinaryOp::Add => Ok(Value::String(format!("{l}{r}"))),
            _ => self.compare(l.cmp(r)).ok_or_else(|| self.unsupported()),
        }
    }

    fn eval_timestamps(&self, l: DateTime<Utc>, r: DateTime<Utc>) -> Result<Value> {
        match self.op {
            BinaryOp::Subtract => Ok(Value::Duration(l.signed_duration_since(r))),
            _ => self.compare(l.cmp(&r)).ok_or_else(|| self.unsupported()),
        }
    }

    fn eval_shift(&self, t: DateTime<Utc>, d: TimeDelta) -> Result<Value> {
        let shifted = match self.op {
            BinaryOp::Add => t.checked_add_signed(d),
            BinaryOp::Subtract => t.checked_sub_signed(d),
            _ => return Err(self.unsupported()),
        };
        shifted.map(Value::Timestamp).ok_or_else(|| self.overflow())
    }

    fn eval_duration(&self, l: TimeDelta, r: TimeDelta) -> Result<Value> {
        let checked = match self.op {
            BinaryOp::Add => l.checked_add(&r),
            BinaryOp::Subtract => l.checked_sub(&r),
            _ => return self.compare(l.cmp(&r)).ok_or_else(|| self.unsupported()),
        };
        checked.map(Value::Duration).ok_or_else(|| self.overflow())
    }

    fn eval_equality(&self) -> Result<Value> {
        match self.op {
            BinaryOp::Equal => Ok(Value::Boolean(self.left == self.right)),
            BinaryOp::NotEqual => Ok(Value::Boolean(self.left != self.right)),
            _ => Err(self.unsupported()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use model::core::status::TaskStatus;

    fn eval(left: Value, op: BinaryOp, right: Value) -> Result<Value> {
        BinaryOpEvaluator::new(&left, &right, op).evaluate()
    }

    #[test]
    fn test_int_arithmetic_and_comparison() {
        assert_eq!(
            eval(Value::Int(7), BinaryOp::Modulo, Value::Int(4)),
            Ok(Value::Int(3))
        );
        assert_eq!(
            eval(Value::Int(2), BinaryOp::GreaterOrEqual, Value::Int(2)),
            Ok(Value::Boolean(true))
        );
        assert_eq!(
            eval(Value::Int(1), BinaryOp::Divide, Value::Int(0)),
            Err(ExpressionError::DivisionByZero)
        );
        assert!(matches!(
            eval(Value::Int(i64::MAX), BinaryOp::Add, Value::Int(1)),
            Err(ExpressionError::Overflow(_))
        ));
    }

    #[test]
    fn test_timestamp_arithmetic() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 1, 1, 30, 0).unwrap();

        assert_eq!(
            eval(Value::Timestamp(end), BinaryOp::Subtract, Value::Timestamp(start)),
            Ok(Value::Duration(TimeDelta::minutes(90)))
        );
        assert_eq!(
            eval(
                Value::Duration(TimeDelta::minutes(90)),
                BinaryOp::Add,
                Value::Timestamp(start)
            ),
            Ok(Value::Timestamp(end))
        );
        assert_eq!(
            eval(Value::Timestamp(start), BinaryOp::LessThan, Value::Timestamp(end)),
            Ok(Value::Boolean(true))
        );
    }

    #[test]
    fn test_status_supports_equality_only() {
        let done = Value::from(TaskStatus::Completed);
        let error = Value::from(TaskStatus::Error);
        assert_eq!(
            eval(done.clone(), BinaryOp::NotEqual, error.clone()),
            Ok(Value::Boolean(true))
        );
        assert!(matches!(
            eval(done, BinaryOp::LessThan, error),
            Err(ExpressionError::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn test_mixed_types_mismatch() {
        assert!(matches!(
            eval(Value::Int(1), BinaryOp::Equal, Value::from("1")),
            Err(ExpressionError::TypeMismatch { .. })
        ));
    }
}
