use crate::core::{
    data_type::ValueType,
    status::{ResultStatus, SessionStatus, Status, TaskStatus},
};
use chrono::{DateTime, TimeDelta, Utc};
use std::{cmp::Ordering, fmt};

/// A constant produced by evaluating a closed expression.
///
/// The variant is the runtime type tag the filter compiler dispatches on.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Boolean(bool),
    Int(i64),
    String(String),
    Timestamp(DateTime<Utc>),
    Duration(TimeDelta),
    Status(Status),
    Bytes(Vec<u8>),
    List(Vec<Value>),
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Boolean(_) => ValueType::Boolean,
            Value::Int(_) => ValueType::Int,
            Value::String(_) => ValueType::String,
            Value::Timestamp(_) => ValueType::Timestamp,
            Value::Duration(_) => ValueType::Duration,
            Value::Status(s) => ValueType::Status(s.kind()),
            Value::Bytes(_) => ValueType::Bytes,
            Value::List(_) => ValueType::List,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Ordering between two values of the same type.
    ///
    /// Statuses, bytes and lists only support equality, so `None` is returned
    /// for them unless both sides are equal.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        use Value::*;
        match (self, other) {
            (Int(a), Int(b)) => Some(a.cmp(b)),
            (String(a), String(b)) => Some(a.cmp(b)),
            (Timestamp(a), Timestamp(b)) => Some(a.cmp(b)),
            (Duration(a), Duration(b)) => Some(a.cmp(b)),
            (Boolean(a), Boolean(b)) => Some(a.cmp(b)),
            (Status(a), Status(b)) if a == b => Some(Ordering::Equal),
            (Bytes(a), Bytes(b)) if a == b => Some(Ordering::Equal),
            (List(a), List(b)) if a == b => Some(Ordering::Equal),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Timestamp(t) => write!(f, "{}", t.to_rfc3339()),
            Value::Duration(d) => write!(f, "{d}"),
            Value::Status(s) => write!(f, "{s}"),
            Value::Bytes(b) => {
                write!(f, "0x")?;
                b.iter().try_for_each(|x| write!(f, "{x:02x}"))
            }
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
    }
}

impl From<TimeDelta> for Value {
    fn from(v: TimeDelta) -> Self {
        Value::Duration(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<Status> for Value {
    fn from(v: Status) -> Self {
        Value::Status(v)
    }
}

impl From<SessionStatus> for Value {
    fn from(v: SessionStatus) -> Self {
        Value::Status(v.into())
    }
}

impl From<TaskStatus> for Value {
    fn from(v: TaskStatus) -> Self {
        Value::Status(v.into())
    }
}

impl From<ResultStatus> for Value {
    fn from(v: ResultStatus) -> Self {
        Value::Status(v.into())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value
where
    T: NotBytes,
{
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

/// Marker keeping `Vec<u8>` mapped to [`Value::Bytes`] rather than a list.
pub trait NotBytes {}

impl NotBytes for bool {}
impl NotBytes for i64 {}
impl NotBytes for i32 {}
impl NotBytes for &str {}
impl NotBytes for String {}
impl NotBytes for DateTime<Utc> {}
impl NotBytes for TimeDelta {}
impl NotBytes for Status {}
impl NotBytes for SessionStatus {}
impl NotBytes for TaskStatus {}
impl NotBytes for ResultStatus {}
impl NotBytes for Value {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_value_type_tags() {
        assert_eq!(Value::from("a").value_type(), ValueType::String);
        assert_eq!(Value::from(3i64).value_type(), ValueType::Int);
        assert_eq!(
            Value::from(TaskStatus::Completed).value_type(),
            ValueType::Status(crate::core::status::StatusKind::Task)
        );
        assert_eq!(Value::from(vec![1u8, 2]).value_type(), ValueType::Bytes);
        assert_eq!(Value::from(vec!["a", "b"]).value_type(), ValueType::List);
    }

    #[test]
    fn test_compare_same_type() {
        let a = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        assert_eq!(Value::from(a).compare(&Value::from(b)), Some(Ordering::Less));
        assert_eq!(Value::from(1i64).compare(&Value::from("1")), None);
        assert_eq!(
            Value::from(TaskStatus::Error).compare(&Value::from(TaskStatus::Completed)),
            None
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from("abc").to_string(), "\"abc\"");
        assert_eq!(Value::from(vec![1i64, 2]).to_string(), "[1, 2]");
        assert_eq!(Value::from(vec![0xABu8]).to_string(), "0xab");
    }
}
