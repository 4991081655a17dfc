pub mod entities;

use crate::{
    core::data_type::ValueType,
    filter::field::{EntityKind, SortableFieldId},
};
use std::collections::HashMap;

/// What a field name resolves to: its wire selector and declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub id: SortableFieldId,
    pub value_type: ValueType,
}

/// Static name -> (selector, type) table for one entity kind.
///
/// Names are the dotted member paths used in expressions, e.g. `Status` or
/// `Options.Priority`.
pub trait FieldCatalog: Send + Sync {
    fn entity(&self) -> EntityKind;

    fn lookup(&self, path: &str) -> Option<FieldDescriptor>;

    /// Sort field used when a query carries no ordering.
    fn default_sort(&self) -> SortableFieldId;
}

#[derive(Debug, Clone)]
pub struct Catalog {
    entity: EntityKind,
    fields: HashMap<String, FieldDescriptor>,
    default_sort: SortableFieldId,
}

impl Catalog {
    pub fn builder(entity: EntityKind) -> CatalogBuilder {
        CatalogBuilder::new(entity)
    }

    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fields.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl FieldCatalog for Catalog {
    fn entity(&self) -> EntityKind {
        self.entity
    }

    fn lookup(&self, path: &str) -> Option<FieldDescriptor> {
        self.fields.get(path).copied()
    }

    fn default_sort(&self) -> SortableFieldId {
        self.default_sort
    }
}

pub struct CatalogBuilder {
    entity: EntityKind,
    fields: HashMap<String, FieldDescriptor>,
    default_sort: Option<SortableFieldId>,
}

impl CatalogBuilder {
    pub fn new(entity: EntityKind) -> Self {
        CatalogBuilder {
            entity,
            fields: HashMap::new(),
            default_sort: None,
        }
    }

    pub fn field(mut self, path: &str, id: SortableFieldId, value_type: ValueType) -> Self {
        self.fields
            .insert(path.to_string(), FieldDescriptor { id, value_type });
        self
    }

    pub fn default_sort(mut self, id: SortableFieldId) -> Self {
        self.default_sort = Some(id);
        self
    }

    /// Without an explicit default, the first code of the summary scope is used.
    pub fn build(self) -> Catalog {
        Catalog {
            entity: self.entity,
            default_sort: self
                .default_sort
                .unwrap_or_else(|| SortableFieldId::summary(self.entity, 0)),
            fields: self.fields,
        }
    }
}
