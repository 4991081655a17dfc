use crate::core::status::StatusKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared type of a queryable field, or the runtime type of a constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    Boolean,
    Int,
    String,
    Timestamp,
    Duration,
    Status(StatusKind),
    Bytes,
    /// A closed collection of constants.
    List,
    /// A field holding a collection of strings, queried by membership.
    Array,
}

impl ValueType {
    /// Whether the wire protocol accepts an ordering operator for this type.
    pub fn is_ordered(&self) -> bool {
        matches!(
            self,
            ValueType::Int | ValueType::Timestamp | ValueType::Duration
        )
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Boolean => write!(f, "bool"),
            ValueType::Int => write!(f, "int"),
            ValueType::String => write!(f, "string"),
            ValueType::Timestamp => write!(f, "timestamp"),
            ValueType::Duration => write!(f, "duration"),
            ValueType::Status(kind) => write!(f, "{kind}"),
            ValueType::Bytes => write!(f, "bytes"),
            ValueType::List => write!(f, "list"),
            ValueType::Array => write!(f, "array"),
        }
    }
}
