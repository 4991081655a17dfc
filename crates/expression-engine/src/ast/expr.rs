use crate::ast::operator::{BinaryOp, UnaryOp};
use chrono::{DateTime, TimeDelta, Utc};
use model::core::{
    status::{ResultStatus, SessionStatus, Status, TaskStatus},
    value::Value,
};
use std::{fmt, ops};

/// Expression tree written against the record a query is bound to.
///
/// `Parameter` is the bound record (`x` in `x => x.Status == ...`). Any
/// subtree without a `Parameter` is closed and can be evaluated locally.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Parameter,
    Constant(Value),
    /// Outer variable captured by the query, resolved at evaluation time.
    Variable(String),
    Member {
        target: Box<Expr>,
        name: String,
    },
    /// Method call when `target` is set, free function call otherwise.
    Call {
        target: Option<Box<Expr>>,
        method: String,
        args: Vec<Expr>,
    },
    List(Vec<Expr>),
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
}

/// A one-parameter lambda, `parameter => body`.
#[derive(Debug, Clone, PartialEq)]
pub struct Lambda {
    pub parameter: String,
    pub body: Expr,
}

impl Lambda {
    pub fn new(parameter: impl Into<String>, body: Expr) -> Self {
        Lambda {
            parameter: parameter.into(),
            body,
        }
    }

    /// Build a lambda from a closure receiving the bound parameter:
    ///
    /// ```
    /// use expression_engine::{Expr, Lambda};
    /// let by_name = Lambda::from_fn(|x| x.member("Name").starts_with("a"));
    /// assert_eq!(by_name.to_string(), "x => x.Name.StartsWith(\"a\")");
    /// ```
    pub fn from_fn(f: impl FnOnce(Expr) -> Expr) -> Self {
        Lambda::new("x", f(Expr::Parameter))
    }

    /// `a && b` on the two bodies, keeping this lambda's parameter name.
    pub fn and_also(self, other: Lambda) -> Self {
        Lambda {
            parameter: self.parameter,
            body: self.body.and(other.body),
        }
    }
}

impl Expr {
    pub fn param() -> Self {
        Expr::Parameter
    }

    pub fn constant(value: impl Into<Value>) -> Self {
        Expr::Constant(value.into())
    }

    pub fn var(name: impl Into<String>) -> Self {
        Expr::Variable(name.into())
    }

    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Expr>,
    {
        Expr::List(items.into_iter().map(Into::into).collect())
    }

    /// Free function call, e.g. `FromHours(2)`.
    pub fn function(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            target: None,
            method: name.into(),
            args,
        }
    }

    pub fn member(self, name: impl Into<String>) -> Self {
        Expr::Member {
            target: Box::new(self),
            name: name.into(),
        }
    }

    pub fn method(self, name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            target: Some(Box::new(self)),
            method: name.into(),
            args,
        }
    }

    pub fn starts_with(self, arg: impl Into<Expr>) -> Self {
        self.method("StartsWith", vec![arg.into()])
    }

    pub fn ends_with(self, arg: impl Into<Expr>) -> Self {
        self.method("EndsWith", vec![arg.into()])
    }

    pub fn contains(self, arg: impl Into<Expr>) -> Self {
        self.method("Contains", vec![arg.into()])
    }

    pub fn binary(self, op: BinaryOp, right: impl Into<Expr>) -> Self {
        Expr::Binary {
            left: Box::new(self),
            op,
            right: Box::new(right.into()),
        }
    }

    pub fn equal(self, right: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::Equal, right)
    }

    pub fn not_equal(self, right: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::NotEqual, right)
    }

    pub fn less_than(self, right: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::LessThan, right)
    }

    pub fn less_or_equal(self, right: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::LessOrEqual, right)
    }

    pub fn greater_than(self, right: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::GreaterThan, right)
    }

    pub fn greater_or_equal(self, right: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::GreaterOrEqual, right)
    }

    pub fn and(self, right: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::And, right)
    }

    pub fn or(self, right: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::Or, right)
    }

    /// True when no `Parameter` occurs anywhere in the tree.
    pub fn is_closed(&self) -> bool {
        match self {
            Expr::Parameter => false,
            Expr::Constant(_) | Expr::Variable(_) => true,
            Expr::Member { target, .. } => target.is_closed(),
            Expr::Call { target, args, .. } => {
                target.as_ref().is_none_or(|t| t.is_closed()) && args.iter().all(Expr::is_closed)
            }
            Expr::List(items) => items.iter().all(Expr::is_closed),
            Expr::Binary { left, right, .. } => left.is_closed() && right.is_closed(),
            Expr::Unary { operand, .. } => operand.is_closed(),
        }
    }

    /// Dotted path of a member chain rooted at the parameter
    /// (`x.Options.Priority` gives `Options.Priority`).
    pub fn member_path(&self) -> Option<String> {
        let mut segments = Vec::new();
        let mut current = self;
        loop {
            match current {
                Expr::Member { target, name } => {
                    segments.push(name.as_str());
                    current = target;
                }
                Expr::Parameter if !segments.is_empty() => {
                    segments.reverse();
                    return Some(segments.join("."));
                }
                _ => return None,
            }
        }
    }
}

impl ops::Not for Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        Expr::Unary {
            op: UnaryOp::Not,
            operand: Box::new(self),
        }
    }
}

impl ops::Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::Unary {
            op: UnaryOp::Negate,
            operand: Box::new(self),
        }
    }
}

impl<T: Into<Expr>> ops::Add<T> for Expr {
    type Output = Expr;

    fn add(self, rhs: T) -> Expr {
        self.binary(BinaryOp::Add, rhs)
    }
}

impl<T: Into<Expr>> ops::Sub<T> for Expr {
    type Output = Expr;

    fn sub(self, rhs: T) -> Expr {
        self.binary(BinaryOp::Subtract, rhs)
    }
}

impl<T: Into<Expr>> ops::Mul<T> for Expr {
    type Output = Expr;

    fn mul(self, rhs: T) -> Expr {
        self.binary(BinaryOp::Multiply, rhs)
    }
}

impl<T: Into<Expr>> ops::Div<T> for Expr {
    type Output = Expr;

    fn div(self, rhs: T) -> Expr {
        self.binary(BinaryOp::Divide, rhs)
    }
}

macro_rules! constant_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Expr {
                fn from(v: $ty) -> Self {
                    Expr::Constant(Value::from(v))
                }
            }
        )*
    };
}

constant_from!(
    bool,
    i64,
    i32,
    u32,
    &str,
    String,
    DateTime<Utc>,
    TimeDelta,
    Vec<u8>,
    Status,
    SessionStatus,
    TaskStatus,
    ResultStatus,
);

impl From<Value> for Expr {
    fn from(v: Value) -> Self {
        Expr::Constant(v)
    }
}

/// Renders an expression with a given name for the parameter.
struct Render<'a> {
    expr: &'a Expr,
    parameter: &'a str,
}

impl<'a> Render<'a> {
    fn child(&self, expr: &'a Expr) -> Render<'a> {
        Render {
            expr,
            parameter: self.parameter,
        }
    }

    fn args(&self, f: &mut fmt::Formatter<'_>, args: &'a [Expr]) -> fmt::Result {
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", self.child(arg))?;
        }
        Ok(())
    }
}

impl fmt::Display for Render<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.expr {
            Expr::Parameter => write!(f, "{}", self.parameter),
            Expr::Constant(value) => write!(f, "{value}"),
            Expr::Variable(name) => write!(f, "{name}"),
            Expr::Member { target, name } => write!(f, "{}.{name}", self.child(target)),
            Expr::Call {
                target,
                method,
                args,
            } => {
                if let Some(target) = target {
                    write!(f, "{}.", self.child(target))?;
                }
                write!(f, "{method}(")?;
                self.args(f, args)?;
                write!(f, ")")
            }
            Expr::List(items) => {
                write!(f, "[")?;
                self.args(f, items)?;
                write!(f, "]")
            }
            Expr::Binary { left, op, right } => {
                write!(f, "({} {op} {})", self.child(left), self.child(right))
            }
            Expr::Unary { op, operand } => write!(f, "{op}{}", self.child(operand)),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Render {
            expr: self,
            parameter: "x",
        }
        .fmt(f)
    }
}

impl fmt::Display for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = Render {
            expr: &self.body,
            parameter: &self.parameter,
        };
        write!(f, "{} => {body}", self.parameter)
    }
}
