use expression_engine::ExpressionError;
use model::filter::field::EntityKind;
use thiserror::Error;

/// Errors raised while compiling a predicate or an ordering.
///
/// All of them are detected before any page is requested.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Failed to evaluate `{expression}`: {source}")]
    InvalidExpression {
        expression: String,
        #[source]
        source: ExpressionError,
    },

    #[error("Unsupported expression: `{operator}` on {value_type}")]
    UnsupportedExpression { operator: String, value_type: String },

    #[error("Unknown field `{field}` for {entity}")]
    UnknownField { entity: EntityKind, field: String },

    #[error("Invalid ordering expression `{0}`: expected a member access on the parameter")]
    InvalidOrderingExpression(String),

    #[error("Internal compiler error: {0}")]
    Internal(String),
}

impl PlanError {
    pub(crate) fn unsupported(operator: impl ToString, value_type: impl ToString) -> Self {
        PlanError::UnsupportedExpression {
            operator: operator.to_string(),
            value_type: value_type.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PlanError>;
