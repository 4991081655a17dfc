pub mod collection;
pub mod string;
pub mod time;

use crate::{
    context::EvalContext,
    error::{ExpressionError, Result},
};
use model::core::value::Value;
use std::collections::HashMap;

/// Type alias for function implementations.
///
/// Method calls pass their receiver as the first argument.
pub type FunctionImpl = fn(&[Value], &EvalContext) -> Result<Value>;

/// Registry of all available functions
#[derive(Clone)]
pub struct FunctionRegistry {
    functions: HashMap<String, FunctionImpl>,
}

impl FunctionRegistry {
    /// Create a new function registry with all built-in functions
    pub fn new() -> Self {
        let mut registry = Self {
            functions: HashMap::new(),
        };

        registry.register("tolower", string::eval_lower);
        registry.register("toupper", string::eval_upper);
        registry.register("trim", string::eval_trim);
        registry.register("concat", string::eval_concat);
        registry.register("startswith", string::eval_starts_with);
        registry.register("endswith", string::eval_ends_with);
        registry.register("contains", collection::eval_contains);

        registry.register("utcnow", time::eval_utc_now);
        registry.register("fromseconds", time::eval_from_seconds);
        registry.register("fromminutes", time::eval_from_minutes);
        registry.register("fromhours", time::eval_from_hours);
        registry.register("fromdays", time::eval_from_days);
        registry.register("addseconds", time::eval_add_seconds);
        registry.register("addminutes", time::eval_add_minutes);
        registry.register("addhours", time::eval_add_hours);
        registry.register("adddays", time::eval_add_days);

        registry
    }

    pub fn register(&mut self, name: &str, func: FunctionImpl) {
        self.functions.insert(name.to_lowercase(), func);
    }

    pub fn call(&self, name: &str, args: &[Value], ctx: &EvalContext) -> Result<Value> {
        let func = self
            .functions
            .get(&name.to_lowercase())
            .ok_or_else(|| ExpressionError::UnknownFunction(name.to_string()))?;

        func(args, ctx)
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(&name.to_lowercase())
    }

    pub fn function_names(&self) -> Vec<&str> {
        self.functions.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Check the argument count of a call.
pub(crate) fn expect_arity(function: &str, args: &[Value], expected: usize) -> Result<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(ExpressionError::InvalidFunctionArgs {
            function: function.to_string(),
            message: format!("Expected {expected} argument(s), got {}", args.len()),
        })
    }
}

pub(crate) fn type_error(function: &str, expected: &str, got: &Value) -> ExpressionError {
    ExpressionError::InvalidFunctionArgs {
        function: function.to_string(),
        message: format!("Expected {expected}, got {}", got.value_type()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CapturedEnv;

    #[test]
    fn test_registry_has_builtin_functions() {
        let registry = FunctionRegistry::new();
        assert!(registry.has_function("tolower"));
        assert!(registry.has_function("contains"));
        assert!(registry.has_function("fromhours"));
        assert!(registry.has_function("adddays"));
    }

    #[test]
    fn test_registry_case_insensitive() {
        let registry = FunctionRegistry::new();
        assert!(registry.has_function("ToUpper"));
        assert!(registry.has_function("STARTSWITH"));
        assert!(registry.has_function("UtcNow"));
    }

    #[test]
    fn test_call_function() {
        let registry = FunctionRegistry::new();
        let env = CapturedEnv::new();
        let ctx = EvalContext::new(&env);

        let args = vec![Value::String("hello".to_string())];
        let result = registry.call("ToUpper", &args, &ctx).unwrap();
        assert_eq!(result, Value::String("HELLO".to_string()));
    }

    #[test]
    fn test_unknown_function() {
        let registry = FunctionRegistry::new();
        let env = CapturedEnv::new();
        let ctx = EvalContext::new(&env);

        let result = registry.call("unknown_func", &[], &ctx);
        assert!(matches!(result, Err(ExpressionError::UnknownFunction(_))));
    }

    #[test]
    fn test_custom_function_registration() {
        let mut registry = FunctionRegistry::new();

        fn answer(_args: &[Value], _ctx: &EvalContext) -> Result<Value> {
            Ok(Value::Int(42))
        }

        registry.register("Answer", answer);
        assert!(registry.has_function("answer"));
        assert!(registry.function_names().contains(&"answer"));

        let env = CapturedEnv::new();
        let ctx = EvalContext::new(&env);
        assert_eq!(registry.call("ANSWER", &[], &ctx), Ok(Value::Int(42)));
    }
}
