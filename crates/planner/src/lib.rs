//! Compiles predicate and ordering lambdas into paginated request templates.

pub mod dnf;
pub mod error;
pub mod leaf;
pub mod order;
pub mod plan;
pub mod predicate;

pub use dnf::{Clause, CompiledPredicate};
pub use error::{PlanError, Result};
pub use order::compile_order_by;
pub use plan::{PlannedFilter, QueryPlan, QueryPlanner};
pub use predicate::{PredicateCompiler, compile_predicate};
