//! JSONL persistence for the in-memory store.
//!
//! Each line of the file is one serialized [`DependencyEdge`]. Loading is
//! resilient: bad records are skipped and reported as [`LoadWarning`]s while
//! the rest of the graph is rebuilt.

use super::graph::would_create_cycle;
use super::inner::StoreInner;
use super::InMemoryStore;
use crate::catalog::TaskCatalog;
use crate::domain::{DependencyEdge, EdgeId, TaskId};
use crate::error::Result;
use girder_jsonl::{read_jsonl_resilient, write_jsonl_atomic_iter, Warning as JsonlWarning};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Non-fatal problems found while loading a dependency file.
///
/// The offending record is skipped; everything else is loaded.
///
/// **Example:**
/// ```no_run
/// # use girder::catalog::InMemoryCatalog;
/// # use girder::storage::{InMemoryStore, LoadWarning};
/// # use std::path::Path;
/// # use std::sync::Arc;
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> anyhow::Result<()> {
/// let catalog = Arc::new(InMemoryCatalog::new());
/// let (store, warnings) =
///     InMemoryStore::load_from_jsonl(Path::new(".girder/dependencies.jsonl"), catalog).await?;
///
/// for warning in warnings {
///     match warning {
///         LoadWarning::OrphanedEdge { edge, task } => {
///             eprintln!("Dropped edge {}: task {} no longer exists", edge.id, task);
///         }
///         other => eprintln!("{other}"),
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// Line that could not be parsed as an edge
    MalformedJson {
        /// 1-based line number
        line_number: usize,
        /// Parser message
        error: String,
    },

    /// Edge referencing a task the catalog does not know
    ///
    /// **Common causes**: task deleted while the file was not being maintained.
    OrphanedEdge {
        /// The skipped edge
        edge: DependencyEdge,
        /// The missing endpoint
        task: TaskId,
    },

    /// Edge whose endpoints are the same task
    SelfDependency {
        /// The skipped edge
        edge: DependencyEdge,
    },

    /// Second edge for an ordered pair that is already linked
    DuplicateEdge {
        /// The skipped edge
        edge: DependencyEdge,
        /// The edge that was kept
        existing: EdgeId,
    },

    /// Edge whose id is outside `1..i64::MAX`
    InvalidId {
        /// The skipped edge
        edge: DependencyEdge,
    },

    /// Edge reusing an id that was already loaded
    DuplicateId {
        /// The skipped edge
        edge: DependencyEdge,
    },

    /// Edge that would close a cycle with the edges loaded before it
    ///
    /// **Common causes**: manual editing of the file.
    CircularDependency {
        /// The skipped edge
        edge: DependencyEdge,
    },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedJson { line_number, error } => {
                write!(f, "line {line_number}: malformed JSON: {error}")
            }
            Self::OrphanedEdge { edge, task } => {
                write!(f, "edge {}: task {task} does not exist", edge.id)
            }
            Self::SelfDependency { edge } => {
                write!(f, "edge {}: task {} depends on itself", edge.id, edge.dependent_task_id)
            }
            Self::DuplicateEdge { edge, existing } => write!(
                f,
                "edge {}: {} -> {} duplicates edge {existing}",
                edge.id, edge.depends_on_task_id, edge.dependent_task_id
            ),
            Self::InvalidId { edge } => write!(f, "edge {}: id out of range", edge.id),
            Self::DuplicateId { edge } => write!(f, "edge {}: id already in use", edge.id),
            Self::CircularDependency { edge } => write!(
                f,
                "edge {}: {} -> {} would create a cycle",
                edge.id, edge.depends_on_task_id, edge.dependent_task_id
            ),
        }
    }
}

/// Read and validate a dependency file.
///
/// Records are applied in ascending id order so that the oldest of two
/// conflicting edges is the one kept. A missing file yields an empty graph.
pub(super) async fn read_store(
    path: &Path,
    catalog: &dyn TaskCatalog,
) -> Result<(StoreInner, Vec<LoadWarning>)> {
    let (mut edges, jsonl_warnings) = read_jsonl_resilient::<DependencyEdge, _>(path).await?;

    let mut warnings: Vec<LoadWarning> = jsonl_warnings
        .into_iter()
        .map(|w| match w {
            JsonlWarning::MalformedJson { line_number, error } => {
                LoadWarning::MalformedJson { line_number, error }
            }
            other @ JsonlWarning::InvalidUtf8 { .. } => LoadWarning::MalformedJson {
                line_number: other.line_number(),
                error: other.to_string(),
            },
        })
        .collect();

    // Stable sort keeps file order among records sharing an id.
    edges.sort_by_key(|edge| edge.id);

    let mut inner = StoreInner::new();
    let mut known: HashMap<TaskId, bool> = HashMap::new();

    'edges: for edge in edges {
        if !edge.id.is_valid() {
            warnings.push(LoadWarning::InvalidId { edge });
            continue;
        }

        if inner.edges.contains_key(&edge.id) {
            warnings.push(LoadWarning::DuplicateId { edge });
            continue;
        }

        for task in [edge.depends_on_task_id, edge.dependent_task_id] {
            let exists = match known.get(&task) {
                Some(&exists) => exists,
                None => {
                    let exists = catalog.task_exists(task).await?;
                    known.insert(task, exists);
                    exists
                }
            };
            if !exists {
                warnings.push(LoadWarning::OrphanedEdge { edge, task });
                continue 'edges;
            }
        }

        if edge.depends_on_task_id == edge.dependent_task_id {
            warnings.push(LoadWarning::SelfDependency { edge });
            continue;
        }

        if let Some(existing) = inner.find_pair(edge.depends_on_task_id, edge.dependent_task_id) {
            warnings.push(LoadWarning::DuplicateEdge { edge, existing });
            continue;
        }

        if would_create_cycle(
            &inner.graph,
            &inner.node_map,
            edge.depends_on_task_id,
            edge.dependent_task_id,
        ) {
            warnings.push(LoadWarning::CircularDependency { edge });
            continue;
        }

        inner.insert(edge);
    }

    tracing::debug!(
        path = %path.display(),
        edges = inner.edges.len(),
        warnings = warnings.len(),
        "loaded dependencies"
    );
    Ok((inner, warnings))
}

/// Atomically rewrite the dependency file, one edge per line in id order.
pub(super) async fn write_store(inner: &StoreInner, path: &Path) -> Result<()> {
    write_jsonl_atomic_iter(path, inner.iter_edges().cloned()).await?;
    tracing::debug!(path = %path.display(), edges = inner.edges.len(), "saved dependencies");
    Ok(())
}

impl InMemoryStore {
    /// Load a store from a JSONL file; `save()` writes back to the same file.
    ///
    /// Edges referencing tasks unknown to `catalog`, and edges that conflict
    /// with earlier ones, are skipped and reported.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, or if the
    /// catalog fails while validating task ids.
    pub async fn load_from_jsonl(
        path: &Path,
        catalog: Arc<dyn TaskCatalog>,
    ) -> Result<(Self, Vec<LoadWarning>)> {
        let (inner, warnings) = read_store(path, catalog.as_ref()).await?;
        let store = Self {
            state: Arc::new(RwLock::new(inner)),
            catalog,
            scope: crate::domain::ProjectScope::default(),
            path: Some(path.to_path_buf()),
        };
        Ok((store, warnings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn edge(id: i64, from: i64, to: i64) -> DependencyEdge {
        DependencyEdge {
            id: EdgeId(id),
            depends_on_task_id: TaskId(from),
            dependent_task_id: TaskId(to),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn warnings_render_edge_details() {
        let warning = LoadWarning::CircularDependency { edge: edge(3, 2, 1) };
        assert_eq!(warning.to_string(), "edge 3: 2 -> 1 would create a cycle");

        let warning = LoadWarning::OrphanedEdge {
            edge: edge(4, 1, 9),
            task: TaskId(9),
        };
        assert_eq!(warning.to_string(), "edge 4: task 9 does not exist");
    }
}
