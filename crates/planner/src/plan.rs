use crate::{
    dnf::CompiledPredicate,
    error::Result,
    order::compile_order_by,
    predicate::PredicateCompiler,
};
use expression_engine::{CapturedEnv, Clock, Evaluator, Lambda};
use model::{
    catalog::FieldCatalog,
    filter::FilterOr,
    pagination::request::{DEFAULT_PAGE_SIZE, PageRequest, SortDirection, SortSpec},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Filter part of a plan, after constant predicates are resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlannedFilter {
    Match(FilterOr),
    /// The predicate is always false: nothing needs to be fetched.
    NoResults,
}

impl From<CompiledPredicate> for PlannedFilter {
    fn from(compiled: CompiledPredicate) -> Self {
        match compiled {
            CompiledPredicate::Constant(true) => PlannedFilter::Match(FilterOr::match_all()),
            CompiledPredicate::Constant(false) => PlannedFilter::NoResults,
            CompiledPredicate::Filter(filter) => PlannedFilter::Match(filter),
        }
    }
}

/// Request template driving the paginated executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryPlan {
    pub filter: PlannedFilter,
    pub sort: SortSpec,
    pub page_size: usize,
}

impl QueryPlan {
    pub fn is_empty(&self) -> bool {
        self.filter == PlannedFilter::NoResults
    }

    /// Request for the zero-based page `page`, `None` when the plan has no results.
    pub fn request(&self, page: usize) -> Option<PageRequest> {
        match &self.filter {
            PlannedFilter::NoResults => None,
            PlannedFilter::Match(filter) => Some(PageRequest {
                filter: filter.clone(),
                sort: self.sort,
                page,
                page_size: self.page_size,
            }),
        }
    }
}

/// Builds a [`QueryPlan`] from a predicate and an ordering.
pub struct QueryPlanner<'a> {
    catalog: &'a dyn FieldCatalog,
    env: &'a CapturedEnv,
    predicate: Option<&'a Lambda>,
    order_by: Option<&'a Lambda>,
    direction: SortDirection,
    page_size: usize,
    clock: Option<Clock>,
    evaluator: Option<Evaluator>,
}

impl<'a> QueryPlanner<'a> {
    pub fn new(catalog: &'a dyn FieldCatalog, env: &'a CapturedEnv) -> Self {
        QueryPlanner {
            catalog,
            env,
            predicate: None,
            order_by: None,
            direction: SortDirection::default(),
            page_size: DEFAULT_PAGE_SIZE,
            clock: None,
            evaluator: None,
        }
    }

    pub fn predicate(mut self, predicate: Option<&'a Lambda>) -> Self {
        self.predicate = predicate;
        self
    }

    pub fn order_by(mut self, key: Option<&'a Lambda>) -> Self {
        self.order_by = key;
        self
    }

    pub fn direction(mut self, direction: SortDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn clock(mut self, clock: Clock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Evaluator for closed sub-expressions, e.g. one with custom functions.
    pub fn evaluator(mut self, evaluator: Evaluator) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    /// Compile both clauses. The ordering is resolved even when the
    /// predicate is constant false, so a bad key is always reported.
    pub fn plan(self) -> Result<QueryPlan> {
        let filter = match self.predicate {
            Some(predicate) => {
                let mut compiler = PredicateCompiler::new(self.catalog, self.env);
                if let Some(clock) = self.clock {
                    compiler = compiler.with_clock(clock);
                }
                if let Some(evaluator) = self.evaluator {
                    compiler = compiler.with_evaluator(evaluator);
                }
                PlannedFilter::from(compiler.compile(predicate)?)
            }
            None => PlannedFilter::Match(FilterOr::match_all()),
        };

        let field = match self.order_by {
            Some(key) => compile_order_by(key, self.catalog)?,
            None => self.catalog.default_sort(),
        };

        let plan = QueryPlan {
            filter,
            sort: SortSpec {
                field,
                direction: self.direction,
            },
            page_size: self.page_size,
        };
        debug!(entity = %self.catalog.entity(), plan = ?plan, "Built query plan.");
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlanError;
    use expression_engine::Expr;
    use model::{
        catalog::entities::{self, ResultField, SessionField},
        core::status::SessionStatus,
    };

    #[test]
    fn test_defaults() {
        let env = CapturedEnv::new();
        let plan = QueryPlanner::new(entities::results(), &env).plan().unwrap();

        assert_eq!(plan.filter, PlannedFilter::Match(FilterOr::match_all()));
        assert_eq!(plan.sort.field, ResultField::CreatedAt.id());
        assert_eq!(plan.sort.direction, SortDirection::Ascending);
        assert_eq!(plan.page_size, DEFAULT_PAGE_SIZE);

        let first = plan.request(0).unwrap();
        assert_eq!(first.page, 0);
        assert!(first.filter.is_match_all());
    }

    #[test]
    fn test_false_predicate_has_no_requests() {
        let env = CapturedEnv::new();
        let never = Lambda::from_fn(|x| {
            x.member("Status")
                .equal(SessionStatus::Running)
                .and(Expr::from(false))
        });
        let plan = QueryPlanner::new(entities::sessions(), &env)
            .predicate(Some(&never))
            .plan()
            .unwrap();

        assert!(plan.is_empty());
        assert_eq!(plan.request(0), None);
    }

    #[test]
    fn test_ordering_and_page_size() {
        let env = CapturedEnv::new();
        let key = Lambda::from_fn(|x| x.member("ClosedAt"));
        let plan = QueryPlanner::new(entities::sessions(), &env)
            .order_by(Some(&key))
            .direction(SortDirection::Descending)
            .page_size(10)
            .plan()
            .unwrap();

        let request = plan.request(3).unwrap();
        assert_eq!(request.sort.field, SessionField::ClosedAt.id());
        assert_eq!(request.sort.direction, SortDirection::Descending);
        assert_eq!(request.offset(), 30);
    }

    #[test]
    fn test_bad_ordering_fails_even_without_results() {
        let env = CapturedEnv::new();
        let never = Lambda::from_fn(|_| Expr::from(false));
        let key = Lambda::from_fn(|x| x.member("ClosedAt").member("Year"));
        let result = QueryPlanner::new(entities::sessions(), &env)
            .predicate(Some(&never))
            .order_by(Some(&key))
            .plan();
        assert!(matches!(result, Err(PlanError::UnknownField { .. })));
    }

    #[test]
    fn test_custom_functions_reach_the_compiler() {
        use expression_engine::{EvalContext, ExpressionError, FunctionRegistry};
        use model::{
            catalog::entities::TaskOptionField,
            core::value::Value,
            filter::{FieldCondition, NumberFilter, field::EntityKind, operator::NumberOperator},
        };

        fn default_priority(
            _args: &[Value],
            _ctx: &EvalContext,
        ) -> expression_engine::Result<Value> {
            Ok(Value::Int(4))
        }

        let env = CapturedEnv::new();
        let urgent = Lambda::from_fn(|x| {
            x.member("Options.Priority")
                .greater_or_equal(Expr::function("DefaultPriority", vec![]))
        });

        let result = QueryPlanner::new(entities::sessions(), &env)
            .predicate(Some(&urgent))
            .plan();
        assert!(matches!(
            result,
            Err(PlanError::InvalidExpression {
                source: ExpressionError::UnknownFunction(_),
                ..
            })
        ));

        let mut registry = FunctionRegistry::new();
        registry.register("DefaultPriority", default_priority);
        let plan = QueryPlanner::new(entities::sessions(), &env)
            .predicate(Some(&urgent))
            .evaluator(Evaluator::with_registry(registry))
            .plan()
            .unwrap();

        let PlannedFilter::Match(filter) = plan.filter else {
            panic!("expected a filter");
        };
        let leaf = &filter.and[0].fields[0];
        assert_eq!(leaf.selector, TaskOptionField::Priority.id(EntityKind::Session));
        assert_eq!(
            leaf.condition,
            FieldCondition::Number(NumberFilter {
                value: 4,
                operator: NumberOperator::GreaterThanOrEqual,
            })
        );
    }

    #[test]
    fn test_plan_serializes() {
        let env = CapturedEnv::new();
        let plan = QueryPlanner::new(entities::partitions(), &env).plan().unwrap();
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["page_size"], 50);
        assert_eq!(json["sort"]["direction"], "ascending");
        assert_eq!(json["filter"]["Match"]["and"][0]["fields"], serde_json::json!([]));
    }
}
