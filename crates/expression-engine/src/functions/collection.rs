use crate::{
    context::EvalContext,
    error::Result,
    functions::{expect_arity, type_error},
};
use model::core::value::Value;

/// `Contains` on a string receiver is a substring test, on a list it is membership.
pub fn eval_contains(args: &[Value], _ctx: &EvalContext) -> Result<Value> {
    expect_arity("Contains", args, 2)?;
    match (&args[0], &args[1]) {
        (Value::String(haystack), Value::String(needle)) => {
            Ok(Value::Boolean(haystack.contains(needle.as_str())))
        }
        (Value::String(_), other) => Err(type_error("Contains", "string", other)),
        (Value::List(items), item) => Ok(Value::Boolean(items.contains(item))),
        (other, _) => Err(type_error("Contains", "string or list", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CapturedEnv;
    use crate::error::ExpressionError;

    #[test]
    fn test_substring_and_membership() {
        let env = CapturedEnv::new();
        let ctx = EvalContext::new(&env);

        let args = vec![Value::from("partition-a"), Value::from("tion")];
        assert_eq!(eval_contains(&args, &ctx).unwrap(), Value::Boolean(true));

        let list = Value::List(vec![Value::Int(1), Value::Int(3)]);
        assert_eq!(
            eval_contains(&[list.clone(), Value::Int(3)], &ctx).unwrap(),
            Value::Boolean(true)
        );
        assert_eq!(
            eval_contains(&[list, Value::Int(2)], &ctx).unwrap(),
            Value::Boolean(false)
        );
    }

    #[test]
    fn test_contains_rejects_other_receivers() {
        let env = CapturedEnv::new();
        let ctx = EvalContext::new(&env);
        let result = eval_contains(&[Value::Int(5), Value::Int(5)], &ctx);
        assert!(matches!(
            result,
            Err(ExpressionError::InvalidFunctionArgs { .. })
        ));
    }
}
