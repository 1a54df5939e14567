//! DependencyStore trait implementation for the in-memory store.

use super::graph::would_create_cycle;
use super::jsonl::{read_store, write_store, LoadWarning};
use super::InMemoryStore;
use crate::catalog::TaskDeletionListener;
use crate::domain::{DependencyEdge, EdgeFilter, EdgeId, ProjectScope, TaskId, TaskSummary};
use crate::error::{Error, Result};
use crate::storage::DependencyStore;
use async_trait::async_trait;
use chrono::Utc;

impl InMemoryStore {
    async fn require_task(&self, id: TaskId) -> Result<()> {
        if self.catalog.task_exists(id).await.map_err(Error::into_unavailable)? {
            Ok(())
        } else {
            Err(Error::TaskNotFound(id))
        }
    }

    async fn summary(&self, id: TaskId) -> Result<TaskSummary> {
        self.catalog
            .task_summary(id)
            .await
            .map_err(Error::into_unavailable)?
            .ok_or(Error::TaskNotFound(id))
    }
}

#[async_trait]
impl DependencyStore for InMemoryStore {
    async fn add_edge(&self, depends_on: TaskId, dependent: TaskId) -> Result<DependencyEdge> {
        // Held across validation and commit so the cycle check sees the
        // graph the edge is inserted into.
        let mut inner = self.state.write().await;

        // === Phase 1: catalog checks ===
        self.require_task(dependent).await?;
        self.require_task(depends_on).await?;

        if depends_on == dependent {
            return Err(Error::SelfDependency(depends_on));
        }

        if self.scope == ProjectScope::SameProject {
            let a = self.summary(depends_on).await?;
            let b = self.summary(dependent).await?;
            if a.project_id != b.project_id {
                return Err(Error::CrossProject {
                    depends_on,
                    dependent,
                });
            }
        }

        // === Phase 2: graph checks ===
        if let Some(existing) = inner.find_pair(depends_on, dependent) {
            return Err(Error::DuplicateEdge {
                depends_on,
                dependent,
                existing,
            });
        }

        if would_create_cycle(&inner.graph, &inner.node_map, depends_on, dependent) {
            return Err(Error::CycleDetected {
                depends_on,
                dependent,
            });
        }

        // === Phase 3: commit ===
        let edge = DependencyEdge {
            id: inner.allocate_edge_id()?,
            depends_on_task_id: depends_on,
            dependent_task_id: dependent,
            created_at: Utc::now(),
        };
        inner.insert(edge.clone());

        tracing::debug!(
            edge_id = %edge.id,
            %depends_on,
            %dependent,
            "added dependency"
        );
        Ok(edge)
    }

    async fn remove_edge(&self, id: EdgeId) -> Result<()> {
        let mut inner = self.state.write().await;
        inner.detach(id).ok_or(Error::EdgeNotFound(id))?;
        tracing::debug!(edge_id = %id, "removed dependency");
        Ok(())
    }

    async fn get_edge(&self, id: EdgeId) -> Result<Option<DependencyEdge>> {
        let inner = self.state.read().await;
        Ok(inner.edges.get(&id).map(|entry| entry.edge.clone()))
    }

    async fn list_edges(&self, filter: &EdgeFilter) -> Result<Vec<DependencyEdge>> {
        let inner = self.state.read().await;
        Ok(inner
            .iter_edges()
            .filter(|edge| filter.admits(edge))
            .cloned()
            .collect())
    }

    async fn remove_edges_for_task(&self, task: TaskId) -> Result<usize> {
        let mut inner = self.state.write().await;
        let removed = inner.detach_task(task);
        if !removed.is_empty() {
            tracing::debug!(task_id = %task, removed = removed.len(), "cascaded dependencies");
        }
        Ok(removed.len())
    }

    async fn would_create_cycle(&self, depends_on: TaskId, dependent: TaskId) -> Result<bool> {
        let inner = self.state.read().await;
        Ok(would_create_cycle(
            &inner.graph,
            &inner.node_map,
            depends_on,
            dependent,
        ))
    }

    async fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let inner = self.state.read().await;
        write_store(&inner, path).await
    }

    async fn reload(&self) -> Result<Vec<LoadWarning>> {
        let Some(path) = &self.path else {
            return Ok(Vec::new());
        };
        let (fresh, warnings) = read_store(path, self.catalog.as_ref()).await?;
        *self.state.write().await = fresh;
        tracing::debug!(path = %path.display(), "reloaded dependencies");
        Ok(warnings)
    }
}

#[async_trait]
impl TaskDeletionListener for InMemoryStore {
    async fn on_task_deleted(&self, id: TaskId) -> Result<usize> {
        self.remove_edges_for_task(id).await
    }
}
