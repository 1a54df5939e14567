//! The task/project collaborator the dependency graph reads from.
//!
//! The graph engine never owns tasks. It asks a [`TaskCatalog`] whether a task
//! exists and how to label it, and it is told about task deletions through
//! [`TaskDeletionListener`] so it can drop the edges that referenced them.
//!
//! [`InMemoryCatalog`] is the reference implementation used by the CLI and the
//! tests; a board backed by a database would provide its own.

use crate::domain::{TaskId, TaskSummary};
use crate::error::Result;
use async_trait::async_trait;

mod in_memory;

pub use in_memory::{CatalogLoadWarning, InMemoryCatalog};

/// Read access to task identities.
///
/// Lookups are expected to be fast and may fail; a failure should surface as
/// [`Error::StoreUnavailable`](crate::error::Error::StoreUnavailable) and is
/// never retried by the graph engine.
#[async_trait]
pub trait TaskCatalog: Send + Sync {
    /// Returns `true` if the task exists.
    async fn task_exists(&self, id: TaskId) -> Result<bool>;

    /// Returns the display summary of a task, or `None` if it does not exist.
    async fn task_summary(&self, id: TaskId) -> Result<Option<TaskSummary>>;
}

/// Hook invoked whenever a task is destroyed.
#[async_trait]
pub trait TaskDeletionListener: Send + Sync {
    /// Reacts to the deletion of `id`. Returns how many records were dropped.
    async fn on_task_deleted(&self, id: TaskId) -> Result<usize>;
}
