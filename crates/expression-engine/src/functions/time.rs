use crate::{
    context::EvalContext,
    error::{ExpressionError, Result},
    functions::{expect_arity, type_error},
};
use chrono::TimeDelta;
use model::core::value::Value;

pub fn eval_utc_now(args: &[Value], ctx: &EvalContext) -> Result<Value> {
    expect_arity("UtcNow", args, 0)?;
    Ok(Value::Timestamp(ctx.now()))
}

fn int_arg(function: &str, value: &Value) -> Result<i64> {
    match value {
        Value::Int(i) => Ok(*i),
        other => Err(type_error(function, "int", other)),
    }
}

fn duration(function: &str, args: &[Value], build: fn(i64) -> Option<TimeDelta>) -> Result<Value> {
    expect_arity(function, args, 1)?;
    let amount = int_arg(function, &args[0])?;
    build(amount)
        .map(Value::Duration)
        .ok_or_else(|| ExpressionError::Overflow(function.to_string()))
}

pub fn eval_from_seconds(args: &[Value], _ctx: &EvalContext) -> Result<Value> {
    duration("FromSeconds", args, TimeDelta::try_seconds)
}

pub fn eval_from_minutes(args: &[Value], _ctx: &EvalContext) -> Result<Value> {
    duration("FromMinutes", args, TimeDelta::try_minutes)
}

pub fn eval_from_hours(args: &[Value], _ctx: &EvalContext) -> Result<Value> {
    duration("FromHours", args, TimeDelta::try_hours)
}

pub fn eval_from_days(args: &[Value], _ctx: &EvalContext) -> Result<Value> {
    duration("FromDays", args, TimeDelta::try_days)
}

/// `date.AddX(n)`: the receiver is the first argument.
fn shift(function: &str, args: &[Value], build: fn(i64) -> Option<TimeDelta>) -> Result<Value> {
    expect_arity(function, args, 2)?;
    let start = match &args[0] {
        Value::Timestamp(t) => *t,
        other => return Err(type_error(function, "timestamp", other)),
    };
    let delta = build(int_arg(function, &args[1])?)
        .ok_or_else(|| ExpressionError::Overflow(function.to_string()))?;
    start
        .checked_add_signed(delta)
        .map(Value::Timestamp)
        .ok_or_else(|| ExpressionError::Overflow(function.to_string()))
}

pub fn eval_add_seconds(args: &[Value], _ctx: &EvalContext) -> Result<Value> {
    shift("AddSeconds", args, TimeDelta::try_seconds)
}

pub fn eval_add_minutes(args: &[Value], _ctx: &EvalContext) -> Result<Value> {
    shift("AddMinutes", args, TimeDelta::try_minutes)
}

pub fn eval_add_hours(args: &[Value], _ctx: &EvalContext) -> Result<Value> {
    shift("AddHours", args, TimeDelta::try_hours)
}

pub fn eval_add_days(args: &[Value], _ctx: &EvalContext) -> Result<Value> {
    shift("AddDays", args, TimeDelta::try_days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CapturedEnv;
    use chrono::{DateTime, TimeZone, Utc};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_utc_now_uses_clock() {
        let env = CapturedEnv::new();
        let ctx = EvalContext::new(&env).with_clock(fixed_now);
        assert_eq!(
            eval_utc_now(&[], &ctx).unwrap(),
            Value::Timestamp(fixed_now())
        );
    }

    #[test]
    fn test_duration_constructors() {
        let env = CapturedEnv::new();
        let ctx = EvalContext::new(&env);
        assert_eq!(
            eval_from_hours(&[Value::Int(2)], &ctx).unwrap(),
            Value::Duration(TimeDelta::hours(2))
        );
        assert_eq!(
            eval_from_seconds(&[Value::Int(90)], &ctx).unwrap(),
            Value::Duration(TimeDelta::seconds(90))
        );
        assert!(matches!(
            eval_from_days(&[Value::Int(i64::MAX)], &ctx),
            Err(ExpressionError::Overflow(_))
        ));
    }

    #[test]
    fn test_add_days() {
        let env = CapturedEnv::new();
        let ctx = EvalContext::new(&env);
        let args = vec![Value::Timestamp(fixed_now()), Value::Int(-1)];
        assert_eq!(
            eval_add_days(&args, &ctx).unwrap(),
            Value::Timestamp(Utc.with_ymd_and_hms(2024, 5, 31, 12, 0, 0).unwrap())
        );
        assert!(eval_add_hours(&[Value::Int(1), Value::Int(1)], &ctx).is_err());
    }
}
