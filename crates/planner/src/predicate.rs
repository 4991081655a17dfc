//! Predicate compiler: expression tree to a DNF filter.
//!
//! The walk is a recursive descent over [`Expr`] that returns a [`Node`] per
//! sub-expression. Logical negation is not applied to built filters; it is
//! carried down as a flag and consumed by the comparison or method call that
//! builds the leaf, which picks the complementary operator.

use crate::{
    dnf::{Clause, CompiledPredicate},
    error::{PlanError, Result},
    leaf::{self, StringMethod},
};
use expression_engine::{
    BinaryOp, CapturedEnv, Clock, EvalContext, Evaluator, Expr, Lambda, UnaryOp,
};
use model::{
    catalog::{FieldCatalog, FieldDescriptor},
    core::{data_type::ValueType, value::Value},
    filter::operator::Comparison,
};
use tracing::debug;

/// Compiled form of one sub-expression.
#[derive(Debug, Clone, PartialEq)]
enum Node {
    /// Closed sub-expression, folded to its value.
    Constant(Value),
    /// Unevaluated reference to a catalog field.
    Field(FieldDescriptor),
    /// Boolean-valued sub-predicate.
    Clause(Clause),
}

impl Node {
    fn describe(&self) -> String {
        match self {
            Node::Constant(v) => v.value_type().to_string(),
            Node::Field(d) => format!("field {}", d.value_type),
            Node::Clause(_) => "bool".to_string(),
        }
    }
}

pub struct PredicateCompiler<'a> {
    catalog: &'a dyn FieldCatalog,
    evaluator: Evaluator,
    ctx: EvalContext<'a>,
}

impl<'a> PredicateCompiler<'a> {
    pub fn new(catalog: &'a dyn FieldCatalog, env: &'a CapturedEnv) -> Self {
        Self {
            catalog,
            evaluator: Evaluator::new(),
            ctx: EvalContext::new(env),
        }
    }

    pub fn with_evaluator(mut self, evaluator: Evaluator) -> Self {
        self.evaluator = evaluator;
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.ctx = self.ctx.with_clock(clock);
        self
    }

    pub fn compile(&self, predicate: &Lambda) -> Result<CompiledPredicate> {
        let node = self.compile_node(&predicate.body, false)?;
        let compiled = self.reduce(node, "predicate")?.into_root()?;
        debug!(
            entity = %self.catalog.entity(),
            predicate = %predicate,
            compiled = ?compiled,
            "Compiled predicate."
        );
        Ok(compiled)
    }

    fn compile_node(&self, expr: &Expr, negated: bool) -> Result<Node> {
        if expr.is_closed() {
            return self.fold(expr, negated);
        }

        match expr {
            Expr::Member { .. } => self.member(expr, negated),

            Expr::Unary {
                op: UnaryOp::Not,
                operand,
            } => self.compile_node(operand, !negated),

            Expr::Binary { left, op, right } if op.is_logical() => {
                if negated {
                    return Err(PlanError::unsupported(format!("!({op})"), "bool"));
                }
                let left = self.compile_clause(left, *op)?;
                let right = self.compile_clause(right, *op)?;
                Ok(Node::Clause(match op {
                    BinaryOp::And => left.and(right),
                    _ => left.or(right),
                }))
            }

            Expr::Binary { left, op, right } => match comparison(*op) {
                Some(cmp) => self.comparison(left, cmp, right, negated),
                None => Err(PlanError::unsupported(op, "field")),
            },

            Expr::Call {
                target: Some(target),
                method,
                args,
            } => self.method_call(target, method, args, negated),

            Expr::Call {
                target: None,
                method,
                ..
            } => Err(PlanError::unsupported(format!("{method}()"), "field")),

            Expr::Parameter => Err(PlanError::unsupported(expr, "record")),
            Expr::Unary { op, .. } => Err(PlanError::unsupported(op, "field")),
            Expr::List(_) => Err(PlanError::unsupported("list", "field")),

            Expr::Constant(_) | Expr::Variable(_) => Err(PlanError::Internal(format!(
                "closed expression `{expr}` was not folded"
            ))),
        }
    }

    fn fold(&self, expr: &Expr, negated: bool) -> Result<Node> {
        let value = self.evaluate(expr)?;
        match (value, negated) {
            (value, false) => Ok(Node::Constant(value)),
            (Value::Boolean(b), true) => Ok(Node::Constant(Value::Boolean(!b))),
            (other, true) => Err(PlanError::unsupported("!", other.value_type())),
        }
    }

    fn evaluate(&self, expr: &Expr) -> Result<Value> {
        self.evaluator
            .evaluate(expr, &self.ctx)
            .map_err(|source| PlanError::InvalidExpression {
                expression: expr.to_string(),
                source,
            })
    }

    fn member(&self, expr: &Expr, negated: bool) -> Result<Node> {
        let Some(path) = expr.member_path() else {
            return Err(PlanError::unsupported(expr, "parameter-derived value"));
        };
        let field = self
            .catalog
            .lookup(&path)
            .ok_or_else(|| PlanError::UnknownField {
                entity: self.catalog.entity(),
                field: path,
            })?;

        match (field.value_type, negated) {
            (_, false) => Ok(Node::Field(field)),
            (ValueType::Boolean, true) => Ok(Node::Clause(Clause::Field(leaf::flag(field, true)?))),
            (other, true) => Err(PlanError::unsupported("!", other)),
        }
    }

    fn compile_clause(&self, expr: &Expr, op: BinaryOp) -> Result<Clause> {
        let node = self.compile_node(expr, false)?;
        self.reduce(node, op)
    }

    /// Reduce a node used in boolean position.
    fn reduce(&self, node: Node, context: impl ToString) -> Result<Clause> {
        match node {
            Node::Clause(clause) => Ok(clause),
            Node::Constant(Value::Boolean(b)) => Ok(Clause::Const(b)),
            Node::Field(field) if field.value_type == ValueType::Boolean => {
                Ok(Clause::Field(leaf::flag(field, false)?))
            }
            other => Err(PlanError::unsupported(context, other.describe())),
        }
    }

    fn comparison(
        &self,
        left: &Expr,
        cmp: Comparison,
        right: &Expr,
        negated: bool,
    ) -> Result<Node> {
        let cmp = if negated { cmp.negate() } else { cmp };
        let left = self.compile_node(left, false)?;
        let right = self.compile_node(right, false)?;

        let built = match (left, right) {
            (Node::Field(field), Node::Constant(value)) => leaf::comparison(field, cmp, value)?,
            (Node::Constant(value), Node::Field(field)) => {
                leaf::comparison(field, cmp.mirror(), value)?
            }
            (left, right) => {
                return Err(PlanError::unsupported(
                    cmp,
                    format!("{} and {}", left.describe(), right.describe()),
                ));
            }
        };
        Ok(Node::Clause(Clause::Field(built)))
    }

    fn method_call(
        &self,
        target: &Expr,
        method: &str,
        args: &[Expr],
        negated: bool,
    ) -> Result<Node> {
        let [arg] = args else {
            return Err(PlanError::unsupported(
                format!("{method} with {} argument(s)", args.len()),
                "field",
            ));
        };
        let Some(string_method) = StringMethod::parse(method) else {
            return Err(PlanError::unsupported(method, "field"));
        };

        if target.is_closed() {
            if string_method != StringMethod::Contains {
                return Err(PlanError::unsupported(method, "field argument"));
            }
            return self.collection_contains(target, arg, negated);
        }

        let field = match self.compile_node(target, false)? {
            Node::Field(field) => field,
            other => return Err(PlanError::unsupported(method, other.describe())),
        };
        let value = match self.compile_node(arg, false)? {
            Node::Constant(value) => value,
            other => return Err(PlanError::unsupported(method, other.describe())),
        };

        let built = match field.value_type {
            ValueType::Array if string_method == StringMethod::Contains => {
                leaf::array_contains(field, value, negated)?
            }
            _ => leaf::string_method(field, string_method, value, negated)?,
        };
        Ok(Node::Clause(Clause::Field(built)))
    }

    /// `[a, b].Contains(x.Field)`: one equality per element, OR-ed, or one
    /// inequality per element, AND-ed, when negated.
    fn collection_contains(&self, collection: &Expr, arg: &Expr, negated: bool) -> Result<Node> {
        let items = match self.evaluate(collection)? {
            Value::List(items) => items,
            other => return Err(PlanError::unsupported("Contains", other.value_type())),
        };
        let field = match self.compile_node(arg, false)? {
            Node::Field(field) => field,
            other => return Err(PlanError::unsupported("Contains", other.describe())),
        };

        let cmp = if negated {
            Comparison::NotEqual
        } else {
            Comparison::Equal
        };
        let mut clause = Clause::Const(negated);
        for item in items {
            let element = Clause::Field(leaf::comparison(field, cmp, item)?);
            clause = if negated {
                clause.and(element)
            } else {
                clause.or(element)
            };
        }
        Ok(Node::Clause(clause))
    }
}

/// Compile `predicate` against `catalog`, resolving captured variables from `env`.
pub fn compile_predicate(
    predicate: &Lambda,
    catalog: &dyn FieldCatalog,
    env: &CapturedEnv,
) -> Result<CompiledPredicate> {
    PredicateCompiler::new(catalog, env).compile(predicate)
}

fn comparison(op: BinaryOp) -> Option<Comparison> {
    match op {
        BinaryOp::Equal => Some(Comparison::Equal),
        BinaryOp::NotEqual => Some(Comparison::NotEqual),
        BinaryOp::LessThan => Some(Comparison::LessThan),
        BinaryOp::LessOrEqual => Some(Comparison::LessOrEqual),
        BinaryOp::GreaterThan => Some(Comparison::GreaterThan),
        BinaryOp::GreaterOrEqual => Some(Comparison::GreaterOrEqual),
        _ => None,
    }
}
