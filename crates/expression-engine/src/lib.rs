//! Expression trees for record predicates and a local evaluator for the
//! closed parts of them (captured variables, constants, function calls).

pub mod ast;
pub mod context;
pub mod error;
pub mod eval;
pub mod functions;

pub use ast::{
    expr::{Expr, Lambda},
    operator::{BinaryOp, UnaryOp},
};
pub use context::{CapturedEnv, Clock, EvalContext};
pub use error::{ExpressionError, Result};
pub use eval::Evaluator;
pub use functions::FunctionRegistry;
