//! Dependency graph store.
//!
//! This module defines the [`DependencyStore`] trait and a factory for
//! creating store instances. The only backend today is the in-memory petgraph
//! store, optionally backed by a JSONL file.
//!
//! # Write Validation
//!
//! `add_edge` runs every check before touching the graph, so a rejected edge
//! never leaves partial state behind:
//!
//! 1. both tasks exist in the catalog (`TaskNotFound`)
//! 2. the tasks differ (`SelfDependency`)
//! 3. the project scope allows the pair (`CrossProject`)
//! 4. the ordered pair is new (`DuplicateEdge`)
//! 5. the dependent cannot already reach the prerequisite (`CycleDetected`)
//!
//! # Concurrency
//!
//! Store methods take `&self`; implementations guard their state internally.
//! The in-memory store holds one write lock across validation and insert, so
//! two concurrent inserts can never both pass the cycle check against a stale
//! graph. Reads copy the edge list out under a read lock.
//!
//! # Example
//!
//! ```no_run
//! use girder::catalog::InMemoryCatalog;
//! use girder::domain::{EdgeFilter, ProjectScope};
//! use girder::storage::{create_store, StorageBackend};
//! use std::sync::Arc;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let catalog = Arc::new(InMemoryCatalog::new());
//!     let project = catalog.add_project("Website").await?;
//!     let design = catalog.add_task(project.id, "Design").await?;
//!     let build = catalog.add_task(project.id, "Build").await?;
//!
//!     let (store, _warnings) =
//!         create_store(StorageBackend::InMemory, catalog.clone(), ProjectScope::Any).await?;
//!     store.add_edge(design.id, build.id).await?;
//!
//!     assert_eq!(store.list_edges(&EdgeFilter::all()).await?.len(), 1);
//!     Ok(())
//! }
//! ```

use crate::catalog::{TaskCatalog, TaskDeletionListener};
use crate::domain::{DependencyEdge, EdgeFilter, EdgeId, ProjectScope, TaskId};
use crate::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub mod in_memory;

pub use in_memory::{InMemoryStore, LoadWarning};

/// Storage for dependency edges.
///
/// Every store is also a [`TaskDeletionListener`]: a deleted task cascades
/// into `remove_edges_for_task`.
///
/// # Errors
///
/// Methods return:
/// - `TaskNotFound` / `EdgeNotFound` for missing references
/// - `SelfDependency`, `CrossProject`, `DuplicateEdge`, `CycleDetected` for
///   rejected inserts
/// - `StoreUnavailable` when the catalog lookup fails
#[async_trait]
pub trait DependencyStore: TaskDeletionListener + Send + Sync {
    /// Link `depends_on -> dependent` after validating the insert.
    async fn add_edge(&self, depends_on: TaskId, dependent: TaskId) -> Result<DependencyEdge>;

    /// Remove an edge by id.
    ///
    /// # Errors
    ///
    /// Returns `Error::EdgeNotFound` if the edge does not exist, including when
    /// it was already removed.
    async fn remove_edge(&self, id: EdgeId) -> Result<()>;

    /// Look up an edge by id.
    async fn get_edge(&self, id: EdgeId) -> Result<Option<DependencyEdge>>;

    /// All edges admitted by `filter`, ordered by edge id.
    async fn list_edges(&self, filter: &EdgeFilter) -> Result<Vec<DependencyEdge>>;

    /// Drop every edge touching `task`. Returns the number of edges removed.
    async fn remove_edges_for_task(&self, task: TaskId) -> Result<usize>;

    /// Returns `true` if linking `depends_on -> dependent` would close a cycle.
    ///
    /// Read-only preview; `add_edge` re-checks under its write lock.
    async fn would_create_cycle(&self, depends_on: TaskId, dependent: TaskId) -> Result<bool>;

    /// Persist the edge set. No-op for stores without a backing file.
    async fn save(&self) -> Result<()>;

    /// Replace in-memory state with the backing file's contents.
    ///
    /// Used to discard unsaved changes after a failed `save`. No-op (and no
    /// warnings) for stores without a backing file.
    async fn reload(&self) -> Result<Vec<LoadWarning>>;
}

/// Storage backend configuration.
#[derive(Debug, Clone)]
pub enum StorageBackend {
    /// Ephemeral in-memory storage
    InMemory,

    /// In-memory storage persisted to a JSONL file
    Jsonl(PathBuf),
}

impl StorageBackend {
    /// Returns the data file path for file-based backends.
    #[must_use]
    pub fn data_path(&self) -> Option<&Path> {
        match self {
            StorageBackend::Jsonl(path) => Some(path),
            StorageBackend::InMemory => None,
        }
    }
}

/// Create a store for the given backend.
///
/// The caller is responsible for subscribing the returned store to the
/// catalog's deletion events.
///
/// # Errors
///
/// Returns an error if a backing file exists but cannot be read, or if the
/// catalog fails while validating loaded edges.
pub async fn create_store(
    backend: StorageBackend,
    catalog: Arc<dyn TaskCatalog>,
    scope: ProjectScope,
) -> Result<(Arc<dyn DependencyStore>, Vec<LoadWarning>)> {
    match backend {
        StorageBackend::InMemory => {
            let store = InMemoryStore::new(catalog).with_project_scope(scope);
            Ok((Arc::new(store), Vec::new()))
        }
        StorageBackend::Jsonl(path) => {
            let (store, warnings) = InMemoryStore::load_from_jsonl(&path, catalog).await?;
            for warning in &warnings {
                tracing::warn!(path = %path.display(), %warning, "skipped dependency record");
            }
            Ok((Arc::new(store.with_project_scope(scope)), warnings))
        }
    }
}
