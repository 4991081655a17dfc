use crate::{
    context::EvalContext,
    error::{ExpressionError, Result},
    functions::{expect_arity, type_error},
};
use model::core::value::Value;

fn receiver<'a>(function: &str, args: &'a [Value]) -> Result<&'a str> {
    match args.first() {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(type_error(function, "string", other)),
        None => Err(ExpressionError::InvalidFunctionArgs {
            function: function.to_string(),
            message: "Missing receiver".to_string(),
        }),
    }
}

fn string_arg<'a>(function: &str, args: &'a [Value], index: usize) -> Result<&'a str> {
    match &args[index] {
        Value::String(s) => Ok(s),
        other => Err(type_error(function, "string", other)),
    }
}

/// Convert string to lowercase
pub fn eval_lower(args: &[Value], _ctx: &EvalContext) -> Result<Value> {
    expect_arity("ToLower", args, 1)?;
    Ok(Value::String(receiver("ToLower", args)?.to_lowercase()))
}

/// Convert string to uppercase
pub fn eval_upper(args: &[Value], _ctx: &EvalContext) -> Result<Value> {
    expect_arity("ToUpper", args, 1)?;
    Ok(Value::String(receiver("ToUpper", args)?.to_uppercase()))
}

pub fn eval_trim(args: &[Value], _ctx: &EvalContext) -> Result<Value> {
    expect_arity("Trim", args, 1)?;
    Ok(Value::String(receiver("Trim", args)?.trim().to_string()))
}

/// Concatenate multiple values into a string
pub fn eval_concat(args: &[Value], _ctx: &EvalContext) -> Result<Value> {
    let concatenated = args
        .iter()
        .map(|arg| match arg {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join("");
    Ok(Value::String(concatenated))
}

pub fn eval_starts_with(args: &[Value], _ctx: &EvalContext) -> Result<Value> {
    expect_arity("StartsWith", args, 2)?;
    let s = receiver("StartsWith", args)?;
    Ok(Value::Boolean(s.starts_with(string_arg("StartsWith", args, 1)?)))
}

pub fn eval_ends_with(args: &[Value], _ctx: &EvalContext) -> Result<Value> {
    expect_arity("EndsWith", args, 2)?;
    let s = receiver("EndsWith", args)?;
    Ok(Value::Boolean(s.ends_with(string_arg("EndsWith", args, 1)?)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CapturedEnv;

    fn with_ctx<F, R>(f: F) -> R
    where
        F: FnOnce(&EvalContext) -> R,
    {
        let env = CapturedEnv::new();
        let ctx = EvalContext::new(&env);
        f(&ctx)
    }

    #[test]
    fn test_lower_upper_trim() {
        with_ctx(|ctx| {
            let args = vec![Value::from("  MiXed ")];
            assert_eq!(eval_lower(&args, ctx).unwrap(), Value::from("  mixed "));
            assert_eq!(eval_upper(&args, ctx).unwrap(), Value::from("  MIXED "));
            assert_eq!(eval_trim(&args, ctx).unwrap(), Value::from("MiXed"));
        });
    }

    #[test]
    fn test_concat_mixed_types() {
        with_ctx(|ctx| {
            let args = vec![Value::from("batch-"), Value::Int(42)];
            assert_eq!(eval_concat(&args, ctx).unwrap(), Value::from("batch-42"));
        });
    }

    #[test]
    fn test_prefix_suffix() {
        with_ctx(|ctx| {
            let args = vec![Value::from("session-1"), Value::from("session")];
            assert_eq!(eval_starts_with(&args, ctx).unwrap(), Value::Boolean(true));
            assert_eq!(eval_ends_with(&args, ctx).unwrap(), Value::Boolean(false));
        });
    }

    #[test]
    fn test_wrong_receiver_type() {
        with_ctx(|ctx| {
            let result = eval_upper(&[Value::Int(1)], ctx);
            assert!(matches!(
                result,
                Err(ExpressionError::InvalidFunctionArgs { .. })
            ));
            assert!(eval_lower(&[], ctx).is_err());
        });
    }
}
