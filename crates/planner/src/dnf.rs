//! Merge table keeping compiled predicates in disjunctive normal form.
//!
//! Every boolean-valued sub-predicate reduces to a [`Clause`]. Merging two
//! clauses with `&&` or `||` yields another clause, so a compiled predicate is
//! never a partially reduced mix of shapes.

use crate::error::{PlanError, Result};
use model::filter::{FilterAnd, FilterField, FilterOr};

/// A reduced boolean sub-predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    Const(bool),
    Field(FilterField),
    And(FilterAnd),
    Or(FilterOr),
}

/// Result of compiling a whole predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum CompiledPredicate {
    /// The predicate does not depend on the record.
    Constant(bool),
    Filter(FilterOr),
}

impl Clause {
    /// `self && other`
    pub fn and(self, other: Clause) -> Clause {
        use Clause::*;
        match (self, other) {
            (Const(false), _) | (_, Const(false)) => Const(false),
            (Const(true), x) | (x, Const(true)) => x,
            (Field(f), x) => And(FilterAnd::single(f)).and(x),
            (x, Field(f)) => x.and(And(FilterAnd::single(f))),
            (And(mut a), And(b)) => {
                a.fields.extend(b.fields);
                And(a)
            }
            (Or(a), And(b)) => Or(FilterOr::new(
                a.and
                    .into_iter()
                    .map(|conj| concat(conj, &b))
                    .collect(),
            )),
            (And(a), Or(b)) => Or(FilterOr::new(
                b.and.iter().map(|conj| concat(a.clone(), conj)).collect(),
            )),
            (Or(a), Or(b)) => Or(FilterOr::new(
                a.and
                    .iter()
                    .flat_map(|left| b.and.iter().map(|right| concat(left.clone(), right)))
                    .collect(),
            )),
        }
    }

    /// `self || other`
    pub fn or(self, other: Clause) -> Clause {
        use Clause::*;
        match (self, other) {
            (Const(true), _) | (_, Const(true)) => Const(true),
            (Const(false), x) | (x, Const(false)) => x,
            (Field(f), x) => And(FilterAnd::single(f)).or(x),
            (x, Field(f)) => x.or(And(FilterAnd::single(f))),
            (And(a), And(b)) => Or(FilterOr::new(vec![a, b])),
            (Or(mut a), And(b)) => {
                a.and.push(b);
                Or(a)
            }
            (And(a), Or(b)) => {
                let mut and = Vec::with_capacity(b.and.len() + 1);
                and.push(a);
                and.extend(b.and);
                Or(FilterOr::new(and))
            }
            (Or(mut a), Or(b)) => {
                a.and.extend(b.and);
                Or(a)
            }
        }
    }

    /// Wrap the final clause of a predicate into its wire shape.
    pub fn into_root(self) -> Result<CompiledPredicate> {
        match self {
            Clause::Const(b) => Ok(CompiledPredicate::Constant(b)),
            Clause::Field(f) => Ok(CompiledPredicate::Filter(FilterOr::new(vec![
                FilterAnd::single(f),
            ]))),
            Clause::And(a) if a.fields.is_empty() => Err(PlanError::Internal(
                "empty conjunction escaped normalization".to_string(),
            )),
            Clause::And(a) => Ok(CompiledPredicate::Filter(FilterOr::new(vec![a]))),
            Clause::Or(o) if o.is_empty() || o.is_match_all() => Err(PlanError::Internal(format!(
                "disjunction escaped normalization: {} conjunction(s)",
                o.len()
            ))),
            Clause::Or(o) => Ok(CompiledPredicate::Filter(o)),
        }
    }
}

fn concat(mut left: FilterAnd, right: &FilterAnd) -> FilterAnd {
    left.fields.extend(right.fields.iter().cloned());
    left
}
