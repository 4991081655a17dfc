use crate::{
    ast::{
        expr::Expr,
        operator::{BinaryOp, UnaryOp},
    },
    context::EvalContext,
    error::{ExpressionError, Result},
    eval::binary::BinaryOpEvaluator,
    functions::FunctionRegistry,
};
use chrono::Datelike;
use model::core::value::Value;
use tracing::trace;

/// Evaluates closed expressions (no reference to the query parameter) to a value.
#[derive(Clone, Default)]
pub struct Evaluator {
    registry: FunctionRegistry,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(registry: FunctionRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    /// Evaluate `expr` when it is closed, `Ok(None)` when it references the parameter.
    pub fn evaluate_if_closed(&self, expr: &Expr, ctx: &EvalContext) -> Result<Option<Value>> {
        if expr.is_closed() {
            self.evaluate(expr, ctx).map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn evaluate(&self, expr: &Expr, ctx: &EvalContext) -> Result<Value> {
        match expr {
            Expr::Parameter => Err(ExpressionError::ParameterReference),

            Expr::Constant(value) => Ok(value.clone()),

            Expr::Variable(name) => ctx
                .variable(name)
                .cloned()
                .ok_or_else(|| ExpressionError::UnknownVariable(name.clone())),

            Expr::Member { target, name } => {
                let value = self.evaluate(target, ctx)?;
                member(&value, name)
            }

            Expr::Call {
                target,
                method,
                args,
            } => {
                let mut values = Vec::with_capacity(args.len() + 1);
                if let Some(target) = target {
                    values.push(self.evaluate(target, ctx)?);
                }
                for arg in args {
                    values.push(self.evaluate(arg, ctx)?);
                }
                trace!(function = %method, args = values.len(), "Calling function");
                self.registry.call(method, &values, ctx)
            }

            Expr::List(items) => items
                .iter()
                .map(|item| self.evaluate(item, ctx))
                .collect::<Result<Vec<_>>>()
                .map(Value::List),

            Expr::Binary { left, op, right } if op.is_logical() => {
                let l = self.evaluate_bool(left, ctx)?;
                match (op, l) {
                    (BinaryOp::And, false) => Ok(Value::Boolean(false)),
                    (BinaryOp::Or, true) => Ok(Value::Boolean(true)),
                    _ => self.evaluate_bool(right, ctx).map(Value::Boolean),
                }
            }

            Expr::Binary { left, op, right } => {
                let l = self.evaluate(left, ctx)?;
                let r = self.evaluate(right, ctx)?;
                BinaryOpEvaluator::new(&l, &r, *op).evaluate()
            }

            Expr::Unary { op, operand } => match (op, self.evaluate(operand, ctx)?) {
                (UnaryOp::Not, Value::Boolean(b)) => Ok(Value::Boolean(!b)),
                (UnaryOp::Negate, Value::Int(i)) => i
                    .checked_neg()
                    .map(Value::Int)
                    .ok_or_else(|| ExpressionError::Overflow(op.to_string())),
                (UnaryOp::Negate, Value::Duration(d)) => Ok(Value::Duration(-d)),
                (op, other) => Err(ExpressionError::UnsupportedOperation(format!(
                    "{op}{}",
                    other.value_type()
                ))),
            },
        }
    }

    fn evaluate_bool(&self, expr: &Expr, ctx: &EvalContext) -> Result<bool> {
        match self.evaluate(expr, ctx)? {
            Value::Boolean(b) => Ok(b),
            other => Err(ExpressionError::TypeMismatch {
                expected: "bool".to_string(),
                actual: other.value_type().to_string(),
            }),
        }
    }
}

fn member(value: &Value, name: &str) -> Result<Value> {
    let result = match (value, name) {
        (Value::String(s), "Length") => Value::Int(s.chars().count() as i64),
        (Value::List(items), "Length" | "Count") => Value::Int(items.len() as i64),
        (Value::Bytes(b), "Length") => Value::Int(b.len() as i64),
        (Value::Duration(d), "TotalSeconds") => Value::Int(d.num_seconds()),
        (Value::Timestamp(t), "Year") => Value::Int(t.year() as i64),
        (Value::Timestamp(t), "Month") => Value::Int(t.month() as i64),
        (Value::Timestamp(t), "Day") => Value::Int(t.day() as i64),
        _ => {
            return Err(ExpressionError::UnknownMember {
                member: name.to_string(),
                value_type: value.value_type().to_string(),
            });
        }
    };
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CapturedEnv;
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_captured_variables_resolve() {
        let env = CapturedEnv::new().with("prefix", "sess");
        let ctx = EvalContext::new(&env);
        let expr = Expr::var("prefix") + "-01";

        let value = Evaluator::new().evaluate(&expr, &ctx).unwrap();
        assert_eq!(value, Value::from("sess-01"));
    }

    #[test]
    fn test_unknown_variable() {
        let env = CapturedEnv::new();
        let ctx = EvalContext::new(&env);
        let result = Evaluator::new().evaluate(&Expr::var("missing"), &ctx);
        assert_eq!(
            result,
            Err(ExpressionError::UnknownVariable("missing".to_string()))
        );
    }

    #[test]
    fn test_parameter_is_not_closed() {
        let env = CapturedEnv::new();
        let ctx = EvalContext::new(&env);
        let evaluator = Evaluator::new();
        let expr = Expr::param().member("Status");

        assert_eq!(evaluator.evaluate_if_closed(&expr, &ctx), Ok(None));
        assert_eq!(
            evaluator.evaluate(&expr, &ctx),
            Err(ExpressionError::ParameterReference)
        );
    }

    #[test]
    fn test_time_functions_and_members() {
        let env = CapturedEnv::new();
        let ctx = EvalContext::new(&env).with_clock(fixed_now);
        let evaluator = Evaluator::new();

        let yesterday = Expr::function("UtcNow", vec![]).method("AddDays", vec![Expr::from(-1i64)]);
        assert_eq!(
            evaluator.evaluate(&yesterday.clone().member("Day"), &ctx),
            Ok(Value::Int(9))
        );

        let span = Expr::function("UtcNow", vec![]) - yesterday;
        assert_eq!(
            evaluator.evaluate(&span, &ctx),
            Ok(Value::Duration(TimeDelta::days(1)))
        );
    }

    #[test]
    fn test_logical_short_circuit() {
        let env = CapturedEnv::new();
        let ctx = EvalContext::new(&env);
        let evaluator = Evaluator::new();

        // The right side would fail on an unknown variable.
        let expr = Expr::from(false).and(Expr::var("missing"));
        assert_eq!(evaluator.evaluate(&expr, &ctx), Ok(Value::Boolean(false)));

        let expr = Expr::from(true).or(Expr::var("missing"));
        assert_eq!(evaluator.evaluate(&expr, &ctx), Ok(Value::Boolean(true)));

        let expr = Expr::from(1i64).and(true);
        assert!(matches!(
            evaluator.evaluate(&expr, &ctx),
            Err(ExpressionError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_unary_ops() {
        let env = CapturedEnv::new();
        let ctx = EvalContext::new(&env);
        let evaluator = Evaluator::new();

        assert_eq!(
            evaluator.evaluate(&!Expr::from(true), &ctx),
            Ok(Value::Boolean(false))
        );
        assert_eq!(
            evaluator.evaluate(&-Expr::from(5i64), &ctx),
            Ok(Value::Int(-5))
        );
        assert!(evaluator.evaluate(&!Expr::from("text"), &ctx).is_err());
    }

    #[test]
    fn test_list_membership() {
        let env = CapturedEnv::new();
        let ctx = EvalContext::new(&env);
        let expr = Expr::list(vec![1i64, 2, 3]).contains(2i64);
        assert_eq!(
            Evaluator::new().evaluate(&expr, &ctx),
            Ok(Value::Boolean(true))
        );
    }

    #[test]
    fn test_custom_registry() {
        fn double(args: &[Value], _ctx: &EvalContext) -> Result<Value> {
            match args {
                [Value::Int(n)] => Ok(Value::Int(n * 2)),
                _ => Err(ExpressionError::InvalidFunctionArgs {
                    function: "Double".to_string(),
                    message: "Expected one int".to_string(),
                }),
            }
        }

        let mut registry = FunctionRegistry::new();
        registry.register("Double", double);
        let evaluator = Evaluator::with_registry(registry);
        assert!(evaluator.registry().has_function("double"));
        assert!(evaluator.registry().has_function("ToUpper"));

        let env = CapturedEnv::new();
        let ctx = EvalContext::new(&env);
        let expr = Expr::from(21i64).method("Double", vec![]);
        assert_eq!(evaluator.evaluate(&expr, &ctx), Ok(Value::Int(42)));
        assert!(matches!(
            Evaluator::new().evaluate(&expr, &ctx),
            Err(ExpressionError::UnknownFunction(_))
        ));
    }
}
