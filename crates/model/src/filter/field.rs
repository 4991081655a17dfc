use serde::{Deserialize, Serialize};
use std::fmt;

/// Entity families exposed by the paginated listing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Session,
    Task,
    Result,
    Partition,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Session => write!(f, "session"),
            EntityKind::Task => write!(f, "task"),
            EntityKind::Result => write!(f, "result"),
            EntityKind::Partition => write!(f, "partition"),
        }
    }
}

/// Group of fields a code is allocated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldScope {
    Summary,
    TaskOptions,
}

/// Opaque selector naming a comparable/orderable attribute of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortableFieldId {
    pub entity: EntityKind,
    pub scope: FieldScope,
    pub code: u16,
}

impl SortableFieldId {
    pub const fn new(entity: EntityKind, scope: FieldScope, code: u16) -> Self {
        Self {
            entity,
            scope,
            code,
        }
    }

    pub const fn summary(entity: EntityKind, code: u16) -> Self {
        Self::new(entity, FieldScope::Summary, code)
    }
}

impl fmt::Display for SortableFieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scope {
            FieldScope::Summary => write!(f, "{}#{}", self.entity, self.code),
            FieldScope::TaskOptions => write!(f, "{}.options#{}", self.entity, self.code),
        }
    }
}
