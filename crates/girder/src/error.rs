//! Error types for girder operations.

use crate::domain::{EdgeId, ProjectId, TaskId};
use std::io;
use thiserror::Error;

/// The error type for girder operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A referenced task does not exist.
    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    /// A referenced dependency edge does not exist.
    #[error("Dependency not found: {0}")]
    EdgeNotFound(EdgeId),

    /// A referenced project does not exist.
    #[error("Project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// A task was asked to depend on itself.
    #[error("Task {0} cannot depend on itself")]
    SelfDependency(TaskId),

    /// The two tasks live in different projects and the scope forbids that.
    #[error("Tasks {depends_on} and {dependent} belong to different projects")]
    CrossProject {
        /// The prerequisite task
        depends_on: TaskId,
        /// The waiting task
        dependent: TaskId,
    },

    /// The ordered pair is already linked.
    #[error("Dependency {depends_on} -> {dependent} already exists (edge {existing})")]
    DuplicateEdge {
        /// The prerequisite task
        depends_on: TaskId,
        /// The waiting task
        dependent: TaskId,
        /// The edge that already links them
        existing: EdgeId,
    },

    /// Adding the edge would close a cycle.
    #[error("Dependency {depends_on} -> {dependent} would create a cycle")]
    CycleDetected {
        /// The prerequisite task
        depends_on: TaskId,
        /// The waiting task
        dependent: TaskId,
    },

    /// The task catalog or persistence layer failed.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Every positive id of the named kind is taken.
    #[error("No {0} ids left to allocate")]
    IdsExhausted(&'static str),
}

/// Coarse category of an [`Error`], used to pick a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A task, edge or project is missing.
    NotFound,
    /// Task depends on itself.
    SelfDependency,
    /// Edge crosses projects under a same-project scope.
    CrossProject,
    /// Identical ordered pair exists.
    DuplicateEdge,
    /// Insertion would close a cycle.
    CycleDetected,
    /// Persistence, catalog or configuration failure.
    StoreUnavailable,
}

impl Error {
    /// Returns the category this error belongs to.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TaskNotFound(_) | Self::EdgeNotFound(_) | Self::ProjectNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::SelfDependency(_) => ErrorKind::SelfDependency,
            Self::CrossProject { .. } => ErrorKind::CrossProject,
            Self::DuplicateEdge { .. } => ErrorKind::DuplicateEdge,
            Self::CycleDetected { .. } => ErrorKind::CycleDetected,
            Self::StoreUnavailable(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Config(_)
            | Self::IdsExhausted(_) => ErrorKind::StoreUnavailable,
        }
    }

    /// Re-labels a collaborator failure as `StoreUnavailable`.
    #[must_use]
    pub fn into_unavailable(self) -> Self {
        match self {
            Self::StoreUnavailable(_) => self,
            other => Self::StoreUnavailable(other.to_string()),
        }
    }
}

impl From<girder_jsonl::Error> for Error {
    fn from(err: girder_jsonl::Error) -> Self {
        match err {
            girder_jsonl::Error::Io(e) => Self::Io(e),
            girder_jsonl::Error::Json { source, .. } => Self::Json(source),
        }
    }
}

/// A specialized Result type for girder operations.
pub type Result<T> = std::result::Result<T, Error>;
