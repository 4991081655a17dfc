use crate::error::{PlanError, Result};
use expression_engine::Lambda;
use model::{catalog::FieldCatalog, filter::field::SortableFieldId};
use tracing::debug;

/// Resolve an ordering lambda (`x => x.CreatedAt`) to its sortable field.
pub fn compile_order_by(key: &Lambda, catalog: &dyn FieldCatalog) -> Result<SortableFieldId> {
    let path = key
        .body
        .member_path()
        .ok_or_else(|| PlanError::InvalidOrderingExpression(key.to_string()))?;

    let field = catalog
        .lookup(&path)
        .ok_or_else(|| PlanError::UnknownField {
            entity: catalog.entity(),
            field: path,
        })?;

    debug!(entity = %catalog.entity(), key = %key, field = %field.id, "Compiled ordering.");
    Ok(field.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use expression_engine::Expr;
    use model::{
        catalog::entities::{self, TaskOptionField, TaskSummaryField},
        filter::field::EntityKind,
    };

    #[test]
    fn test_member_access_resolves() {
        let key = Lambda::from_fn(|x| x.member("EndedAt"));
        assert_eq!(
            compile_order_by(&key, entities::tasks()).unwrap(),
            TaskSummaryField::EndedAt.id()
        );

        let key = Lambda::from_fn(|x| x.member("Options").member("Priority"));
        assert_eq!(
            compile_order_by(&key, entities::tasks()).unwrap(),
            TaskOptionField::Priority.id(EntityKind::Task)
        );
    }

    #[test]
    fn test_other_shapes_are_rejected() {
        let shapes = [
            Lambda::from_fn(|x| x),
            Lambda::from_fn(|x| x.member("Priority").method("ToString", vec![])),
            Lambda::from_fn(|x| x.clone().member("SubmittedAt") - x.member("CreatedAt")),
            Lambda::from_fn(|_| Expr::from(1i64)),
        ];
        for key in &shapes {
            assert!(
                matches!(
                    compile_order_by(key, entities::tasks()),
                    Err(PlanError::InvalidOrderingExpression(_))
                ),
                "{key} should be rejected"
            );
        }
    }

    #[test]
    fn test_unknown_member() {
        let key = Lambda::from_fn(|x| x.member("Nope"));
        assert!(matches!(
            compile_order_by(&key, entities::sessions()),
            Err(PlanError::UnknownField { .. })
        ));
    }
}
