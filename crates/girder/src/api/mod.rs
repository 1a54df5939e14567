//! Dependency API.
//!
//! [`DependencyService`] is the surface a UI or request handler talks to. It
//! wraps a [`DependencyStore`] and a [`TaskCatalog`], turns store errors into
//! [`ApiError`]s with user-facing messages, and assembles [`Snapshot`]s.

mod snapshot;

pub use snapshot::{ChainView, ConvergenceView, EdgeView, Snapshot};

use crate::catalog::TaskCatalog;
use crate::derive::derive_views;
use crate::domain::{ChainHeads, DependencyEdge, EdgeFilter, EdgeId, TaskId, TaskSummary};
use crate::error::{Error, ErrorKind};
use crate::storage::DependencyStore;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;

/// A failed dependency operation, ready to show to a user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    /// What went wrong
    pub kind: ErrorKind,

    /// Human-readable explanation
    pub message: String,
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let kind = err.kind();
        let message = match &err {
            Error::TaskNotFound(_) => "Task not found".to_string(),
            Error::EdgeNotFound(_) => "Dependency not found".to_string(),
            Error::ProjectNotFound(_) => "Project not found".to_string(),
            Error::SelfDependency(_) => "Task cannot depend on itself".to_string(),
            Error::CrossProject { .. } => "Tasks must belong to the same project".to_string(),
            Error::DuplicateEdge { .. } => "Dependency already exists".to_string(),
            Error::CycleDetected { .. } => "Dependency would create a cycle".to_string(),
            Error::StoreUnavailable(detail) => format!("Dependency store unavailable: {detail}"),
            Error::Io(_) | Error::Json(_) | Error::Config(_) | Error::IdsExhausted(_) => {
                format!("Dependency store unavailable: {err}")
            }
        };
        Self { kind, message }
    }
}

/// Result alias for API operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Create, delete and inspect task dependencies.
#[derive(Clone)]
pub struct DependencyService {
    store: Arc<dyn DependencyStore>,
    catalog: Arc<dyn TaskCatalog>,
    chain_heads: ChainHeads,
}

impl std::fmt::Debug for DependencyService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencyService")
            .field("chain_heads", &self.chain_heads)
            .finish_non_exhaustive()
    }
}

impl DependencyService {
    /// Create a service over `store`, resolving tasks through `catalog`.
    #[must_use]
    pub fn new(store: Arc<dyn DependencyStore>, catalog: Arc<dyn TaskCatalog>) -> Self {
        Self {
            store,
            catalog,
            chain_heads: ChainHeads::default(),
        }
    }

    /// Choose which tasks may head a chain in snapshots.
    #[must_use]
    pub fn with_chain_heads(mut self, heads: ChainHeads) -> Self {
        self.chain_heads = heads;
        self
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn DependencyStore> {
        &self.store
    }

    /// Record that `dependent` cannot start before `depends_on` is done.
    ///
    /// # Errors
    ///
    /// Fails with the kind of the first failed check: missing task, self
    /// dependency, cross-project pair, duplicate, or cycle.
    pub async fn create_dependency(
        &self,
        dependent: TaskId,
        depends_on: TaskId,
    ) -> ApiResult<DependencyEdge> {
        self.store
            .add_edge(depends_on, dependent)
            .await
            .map_err(|err| report("create dependency", err))
    }

    /// Delete an edge by id.
    ///
    /// # Errors
    ///
    /// Fails with `NotFound` if the edge does not exist.
    pub async fn delete_dependency(&self, id: EdgeId) -> ApiResult<()> {
        self.store
            .remove_edge(id)
            .await
            .map_err(|err| report("delete dependency", err))
    }

    /// Build the combined view over edges whose endpoints are both visible.
    ///
    /// `None` means every task is visible. Edges whose tasks vanished from
    /// the catalog are left out.
    ///
    /// # Errors
    ///
    /// Fails with `StoreUnavailable` if the store or catalog fails.
    pub async fn snapshot(&self, visible: Option<&HashSet<TaskId>>) -> ApiResult<Snapshot> {
        let filter = EdgeFilter {
            visible_tasks: visible.cloned(),
        };
        let edges = self
            .store
            .list_edges(&filter)
            .await
            .map_err(|err| report("list dependencies", err))?;

        let endpoints: BTreeSet<TaskId> = edges
            .iter()
            .flat_map(|e| [e.depends_on_task_id, e.dependent_task_id])
            .collect();

        let mut summaries: BTreeMap<TaskId, TaskSummary> = BTreeMap::new();
        for id in endpoints {
            let summary = self
                .catalog
                .task_summary(id)
                .await
                .map_err(|err| report("resolve task", err.into_unavailable()))?;
            if let Some(summary) = summary {
                summaries.insert(id, summary);
            }
        }

        let (edges, skipped): (Vec<DependencyEdge>, Vec<DependencyEdge>) =
            edges.into_iter().partition(|e| {
                summaries.contains_key(&e.depends_on_task_id)
                    && summaries.contains_key(&e.dependent_task_id)
            });
        for edge in &skipped {
            tracing::warn!(edge_id = %edge.id, "dependency references a missing task");
        }

        let views = derive_views(&edges, self.chain_heads);
        let lookup = |id: &TaskId| summaries[id].clone();

        // Only tasks on a retained edge are reported.
        let retained: BTreeSet<TaskId> = edges
            .iter()
            .flat_map(|e| [e.depends_on_task_id, e.dependent_task_id])
            .collect();

        Ok(Snapshot {
            tasks: retained.iter().map(lookup).collect(),
            edges: edges
                .iter()
                .map(|e| EdgeView {
                    id: e.id,
                    depends_on: lookup(&e.depends_on_task_id),
                    dependent: lookup(&e.dependent_task_id),
                })
                .collect(),
            chains: views
                .chains
                .iter()
                .map(|chain| ChainView {
                    tasks: chain.iter().map(lookup).collect(),
                })
                .collect(),
            convergences: views
                .convergences
                .iter()
                .map(|group| ConvergenceView {
                    sources: group.sources.iter().map(lookup).collect(),
                    target: lookup(&group.target),
                })
                .collect(),
        })
    }
}

fn report(operation: &str, err: Error) -> ApiError {
    if err.kind() == ErrorKind::StoreUnavailable {
        tracing::error!(error = %err, operation, "dependency store failure");
    } else {
        tracing::debug!(error = %err, operation, "dependency operation rejected");
    }
    ApiError::from(err)
}
