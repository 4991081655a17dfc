//! Field catalogs of the listable entity kinds.

use crate::{
    catalog::Catalog,
    core::{data_type::ValueType, status::StatusKind},
    filter::field::{EntityKind, FieldScope, SortableFieldId},
};
use lazy_static::lazy_static;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionField {
    SessionId = 1,
    Status = 2,
    ClientSubmission = 3,
    WorkerSubmission = 4,
    CreatedAt = 5,
    CancelledAt = 6,
    ClosedAt = 7,
    PurgedAt = 8,
    DeletedAt = 9,
    Duration = 10,
    PartitionIds = 11,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskSummaryField {
    TaskId = 1,
    SessionId = 2,
    OwnerPodId = 3,
    InitialTaskId = 4,
    Status = 5,
    CreatedAt = 6,
    SubmittedAt = 7,
    StartedAt = 8,
    EndedAt = 9,
    CreationToEndDuration = 10,
    ProcessingToEndDuration = 11,
    PodHostname = 12,
    ReceivedAt = 13,
    AcquiredAt = 14,
    Error = 15,
    PayloadId = 16,
    FetchedAt = 17,
    ProcessedAt = 18,
    ReceivedToEndDuration = 19,
}

/// Task options, shared by tasks and by the default options of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskOptionField {
    MaxDuration = 1,
    MaxRetries = 2,
    Priority = 3,
    PartitionId = 4,
    ApplicationName = 5,
    ApplicationVersion = 6,
    ApplicationNamespace = 7,
    ApplicationService = 8,
    EngineType = 9,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultField {
    SessionId = 1,
    Name = 2,
    OwnerTaskId = 3,
    Status = 4,
    CreatedAt = 5,
    CompletedAt = 6,
    ResultId = 7,
    Size = 8,
    CreatedBy = 9,
    ManualDeletion = 10,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartitionField {
    Id = 1,
    ParentPartitionIds = 2,
    PodReserved = 3,
    PodMax = 4,
    PreemptionPercentage = 5,
    Priority = 6,
}

impl SessionField {
    pub fn id(self) -> SortableFieldId {
        SortableFieldId::summary(EntityKind::Session, self as u16)
    }
}

impl TaskSummaryField {
    pub fn id(self) -> SortableFieldId {
        SortableFieldId::summary(EntityKind::Task, self as u16)
    }
}

impl TaskOptionField {
    pub fn id(self, entity: EntityKind) -> SortableFieldId {
        SortableFieldId::new(entity, FieldScope::TaskOptions, self as u16)
    }
}

impl ResultField {
    pub fn id(self) -> SortableFieldId {
        SortableFieldId::summary(EntityKind::Result, self as u16)
    }
}

impl PartitionField {
    pub fn id(self) -> SortableFieldId {
        SortableFieldId::summary(EntityKind::Partition, self as u16)
    }
}

const TASK_OPTIONS: [(&str, TaskOptionField, ValueType); 9] = [
    ("Options.MaxDuration", TaskOptionField::MaxDuration, ValueType::Duration),
    ("Options.MaxRetries", TaskOptionField::MaxRetries, ValueType::Int),
    ("Options.Priority", TaskOptionField::Priority, ValueType::Int),
    ("Options.PartitionId", TaskOptionField::PartitionId, ValueType::String),
    ("Options.ApplicationName", TaskOptionField::ApplicationName, ValueType::String),
    ("Options.ApplicationVersion", TaskOptionField::ApplicationVersion, ValueType::String),
    ("Options.ApplicationNamespace", TaskOptionField::ApplicationNamespace, ValueType::String),
    ("Options.ApplicationService", TaskOptionField::ApplicationService, ValueType::String),
    ("Options.EngineType", TaskOptionField::EngineType, ValueType::String),
];

lazy_static! {
    static ref SESSIONS: Catalog = build_sessions();
    static ref TASKS: Catalog = build_tasks();
    static ref RESULTS: Catalog = build_results();
    static ref PARTITIONS: Catalog = build_partitions();
}

pub fn sessions() -> &'static Catalog {
    &SESSIONS
}

pub fn tasks() -> &'static Catalog {
    &TASKS
}

pub fn results() -> &'static Catalog {
    &RESULTS
}

pub fn partitions() -> &'static Catalog {
    &PARTITIONS
}

pub fn for_entity(entity: EntityKind) -> &'static Catalog {
    match entity {
        EntityKind::Session => sessions(),
        EntityKind::Task => tasks(),
        EntityKind::Result => results(),
        EntityKind::Partition => partitions(),
    }
}

fn build_sessions() -> Catalog {
    use SessionField::*;
    let status = ValueType::Status(StatusKind::Session);
    let mut builder = Catalog::builder(EntityKind::Session)
        .field("SessionId", SessionId.id(), ValueType::String)
        .field("Status", Status.id(), status)
        .field("ClientSubmission", ClientSubmission.id(), ValueType::Boolean)
        .field("WorkerSubmission", WorkerSubmission.id(), ValueType::Boolean)
        .field("CreatedAt", CreatedAt.id(), ValueType::Timestamp)
        .field("CancelledAt", CancelledAt.id(), ValueType::Timestamp)
        .field("ClosedAt", ClosedAt.id(), ValueType::Timestamp)
        .field("PurgedAt", PurgedAt.id(), ValueType::Timestamp)
        .field("DeletedAt", DeletedAt.id(), ValueType::Timestamp)
        .field("Duration", Duration.id(), ValueType::Duration)
        .field("PartitionIds", PartitionIds.id(), ValueType::Array)
        .default_sort(CreatedAt.id());

    for (path, field, ty) in TASK_OPTIONS {
        builder = builder.field(path, field.id(EntityKind::Session), ty);
    }
    builder.build()
}

fn build_tasks() -> Catalog {
    use TaskSummaryField::*;
    let status = ValueType::Status(StatusKind::Task);
    let mut builder = Catalog::builder(EntityKind::Task)
        .field("TaskId", TaskId.id(), ValueType::String)
        .field("SessionId", SessionId.id(), ValueType::String)
        .field("OwnerPodId", OwnerPodId.id(), ValueType::String)
        .field("InitialTaskId", InitialTaskId.id(), ValueType::String)
        .field("Status", Status.id(), status)
        .field("CreatedAt", CreatedAt.id(), ValueType::Timestamp)
        .field("SubmittedAt", SubmittedAt.id(), ValueType::Timestamp)
        .field("StartedAt", StartedAt.id(), ValueType::Timestamp)
        .field("EndedAt", EndedAt.id(), ValueType::Timestamp)
        .field("CreationToEndDuration", CreationToEndDuration.id(), ValueType::Duration)
        .field("ProcessingToEndDuration", ProcessingToEndDuration.id(), ValueType::Duration)
        .field("ReceivedToEndDuration", ReceivedToEndDuration.id(), ValueType::Duration)
        .field("PodHostname", PodHostname.id(), ValueType::String)
        .field("ReceivedAt", ReceivedAt.id(), ValueType::Timestamp)
        .field("AcquiredAt", AcquiredAt.id(), ValueType::Timestamp)
        .field("FetchedAt", FetchedAt.id(), ValueType::Timestamp)
        .field("ProcessedAt", ProcessedAt.id(), ValueType::Timestamp)
        .field("Error", Error.id(), ValueType::String)
        .field("PayloadId", PayloadId.id(), ValueType::String)
        .default_sort(CreatedAt.id());

    for (path, field, ty) in TASK_OPTIONS {
        builder = builder.field(path, field.id(EntityKind::Task), ty);
    }
    builder.build()
}

fn build_results() -> Catalog {
    use ResultField::*;
    Catalog::builder(EntityKind::Result)
        .field("SessionId", SessionId.id(), ValueType::String)
        .field("Name", Name.id(), ValueType::String)
        .field("OwnerTaskId", OwnerTaskId.id(), ValueType::String)
        .field("Status", Status.id(), ValueType::Status(StatusKind::Result))
        .field("CreatedAt", CreatedAt.id(), ValueType::Timestamp)
        .field("CompletedAt", CompletedAt.id(), ValueType::Timestamp)
        .field("ResultId", ResultId.id(), ValueType::String)
        .field("Size", Size.id(), ValueType::Int)
        .field("CreatedBy", CreatedBy.id(), ValueType::String)
        .field("ManualDeletion", ManualDeletion.id(), ValueType::Boolean)
        .default_sort(CreatedAt.id())
        .build()
}

fn build_partitions() -> Catalog {
    use PartitionField::*;
    Catalog::builder(EntityKind::Partition)
        .field("Id", Id.id(), ValueType::String)
        .field("ParentPartitionIds", ParentPartitionIds.id(), ValueType::Array)
        .field("PodReserved", PodReserved.id(), ValueType::Int)
        .field("PodMax", PodMax.id(), ValueType::Int)
        .field("PreemptionPercentage", PreemptionPercentage.id(), ValueType::Int)
        .field("Priority", Priority.id(), ValueType::Int)
        .default_sort(Id.id())
        .build()
}
