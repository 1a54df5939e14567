//! In-memory dependency store using petgraph.
//!
//! # Architecture
//!
//! - `StableDiGraph<TaskId, EdgeId>` holds the edges; node and edge indices
//!   survive removals, so the lookup maps below never go stale
//! - `HashMap<TaskId, NodeIndex>` maps tasks to graph nodes
//! - `BTreeMap<EdgeId, ..>` keeps the edge records ordered by id
//!
//! Only tasks that take part in at least one edge have a node. A node is
//! pruned as soon as its last edge goes away.
//!
//! ## Edge Direction
//!
//! Edges point from the prerequisite to the dependent
//! (`depends_on_task_id -> dependent_task_id`). A new edge `a -> b` closes a
//! cycle exactly when `a` is already reachable from `b`.
//!
//! # Thread Safety
//!
//! State lives in `Arc<RwLock<StoreInner>>`. Writers hold the write lock
//! across validation and commit; readers copy out under the read lock.
//!
//! # Persistence
//!
//! A store created with [`InMemoryStore::load_from_jsonl`] remembers its file;
//! `save()` rewrites it atomically and `reload()` re-reads it.

mod graph;
mod inner;
mod jsonl;
mod trait_impl;

use crate::catalog::TaskCatalog;
use crate::domain::ProjectScope;
use inner::StoreInner;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

pub use jsonl::LoadWarning;

/// Thread-safe in-memory dependency store.
pub struct InMemoryStore {
    state: Arc<RwLock<StoreInner>>,
    catalog: Arc<dyn TaskCatalog>,
    scope: ProjectScope,
    path: Option<PathBuf>,
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStore")
            .field("scope", &self.scope)
            .field("path", &self.path)
            .field("catalog", &"<dyn TaskCatalog>")
            .finish_non_exhaustive()
    }
}

impl InMemoryStore {
    /// Create an empty store that validates task ids against `catalog`.
    ///
    /// # Example
    ///
    /// ```
    /// use girder::catalog::InMemoryCatalog;
    /// use girder::storage::InMemoryStore;
    /// use std::sync::Arc;
    ///
    /// let store = InMemoryStore::new(Arc::new(InMemoryCatalog::new()));
    /// ```
    #[must_use]
    pub fn new(catalog: Arc<dyn TaskCatalog>) -> Self {
        Self {
            state: Arc::new(RwLock::new(StoreInner::new())),
            catalog,
            scope: ProjectScope::default(),
            path: None,
        }
    }

    /// Set which task pairs may be linked.
    #[must_use]
    pub fn with_project_scope(mut self, scope: ProjectScope) -> Self {
        self.scope = scope;
        self
    }

    /// The project scope enforced on new edges.
    #[must_use]
    pub fn project_scope(&self) -> ProjectScope {
        self.scope
    }
}
