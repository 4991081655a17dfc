use serde::{Deserialize, Serialize};
use std::fmt;

/// Which entity family a status value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusKind {
    Session,
    Task,
    Result,
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusKind::Session => write!(f, "SessionStatus"),
            StatusKind::Task => write!(f, "TaskStatus"),
            StatusKind::Result => write!(f, "ResultStatus"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionStatus {
    Unspecified = 0,
    Running = 1,
    Cancelled = 2,
    Paused = 3,
    Closed = 4,
    Purged = 5,
    Deleted = 6,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    Unspecified = 0,
    Creating = 1,
    Submitted = 2,
    Dispatched = 3,
    Completed = 4,
    Error = 5,
    Timeout = 6,
    Cancelling = 7,
    Cancelled = 8,
    Processing = 9,
    Processed = 10,
    Retried = 11,
    Pending = 12,
    Paused = 13,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultStatus {
    Unspecified = 0,
    Created = 1,
    Completed = 2,
    Aborted = 3,
    Deleted = 4,
}

/// An enumerated status of any listable entity.
///
/// Comparisons between statuses of different kinds are never equal and are
/// rejected by the filter compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Session(SessionStatus),
    Task(TaskStatus),
    Result(ResultStatus),
}

impl Status {
    pub fn kind(&self) -> StatusKind {
        match self {
            Status::Session(_) => StatusKind::Session,
            Status::Task(_) => StatusKind::Task,
            Status::Result(_) => StatusKind::Result,
        }
    }

    /// Numeric code used on the wire.
    pub fn code(&self) -> i32 {
        match self {
            Status::Session(s) => *s as i32,
            Status::Task(s) => *s as i32,
            Status::Result(s) => *s as i32,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Session(s) => write!(f, "SessionStatus.{s:?}"),
            Status::Task(s) => write!(f, "TaskStatus.{s:?}"),
            Status::Result(s) => write!(f, "ResultStatus.{s:?}"),
        }
    }
}

impl From<SessionStatus> for Status {
    fn from(s: SessionStatus) -> Self {
        Status::Session(s)
    }
}

impl From<TaskStatus> for Status {
    fn from(s: TaskStatus) -> Self {
        Status::Task(s)
    }
}

impl From<ResultStatus> for Status {
    fn from(s: ResultStatus) -> Self {
        Status::Result(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(Status::from(TaskStatus::Completed).code(), 4);
        assert_eq!(Status::from(SessionStatus::Purged).code(), 5);
        assert_eq!(Status::from(ResultStatus::Aborted).code(), 3);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(
            Status::from(TaskStatus::Completed).to_string(),
            "TaskStatus.Completed"
        );
        assert_eq!(Status::from(SessionStatus::Running).kind(), StatusKind::Session);
    }
}
