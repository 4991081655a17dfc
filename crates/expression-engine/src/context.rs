use chrono::{DateTime, Utc};
use model::core::value::Value;
use std::collections::HashMap;

/// Function type for reading the current time
pub type Clock = fn() -> DateTime<Utc>;

/// Outer variables captured by a query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CapturedEnv {
    vars: HashMap<String, Value>,
}

impl CapturedEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.vars.insert(name.into(), value.into());
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.bind(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    pub fn merge(&mut self, other: CapturedEnv) {
        self.vars.extend(other.vars);
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// Evaluation context: captured variables and the clock used by `UtcNow()`.
pub struct EvalContext<'a> {
    variables: &'a CapturedEnv,
    clock: Clock,
}

impl<'a> EvalContext<'a> {
    pub fn new(variables: &'a CapturedEnv) -> Self {
        Self {
            variables,
            clock: Utc::now,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }
}
