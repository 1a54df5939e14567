//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use girder::api::DependencyService;
use girder::catalog::{InMemoryCatalog, TaskCatalog, TaskDeletionListener};
use girder::domain::{ChainHeads, ProjectId, ProjectScope, TaskId, TaskSummary};
use girder::error::{Error, Result};
use girder::storage::{DependencyStore, InMemoryStore};
use std::path::Path;
use std::process::{Command, Output};
use std::sync::Arc;

/// A catalog, a store subscribed to it, and the service over both.
pub struct Board {
    pub catalog: Arc<InMemoryCatalog>,
    pub store: Arc<dyn DependencyStore>,
    pub service: DependencyService,
}

impl Board {
    /// An empty board with the given policies.
    pub async fn with_policies(scope: ProjectScope, heads: ChainHeads) -> Self {
        let catalog = Arc::new(InMemoryCatalog::new());
        let as_catalog: Arc<dyn TaskCatalog> = catalog.clone();
        let store: Arc<dyn DependencyStore> =
            Arc::new(InMemoryStore::new(as_catalog.clone()).with_project_scope(scope));
        Self::wire(catalog, store, heads).await
    }

    /// Subscribe `store` to `catalog` and build the service.
    pub async fn wire(
        catalog: Arc<InMemoryCatalog>,
        store: Arc<dyn DependencyStore>,
        heads: ChainHeads,
    ) -> Self {
        let listener: Arc<dyn TaskDeletionListener> = store.clone();
        catalog.subscribe(Arc::downgrade(&listener)).await;
        let as_catalog: Arc<dyn TaskCatalog> = catalog.clone();
        let service = DependencyService::new(store.clone(), as_catalog).with_chain_heads(heads);
        Self {
            catalog,
            store,
            service,
        }
    }

    /// An empty board with default policies.
    pub async fn new() -> Self {
        Self::with_policies(ProjectScope::Any, ChainHeads::Roots).await
    }

    /// A board with one project holding `count` tasks, ids `1..=count`.
    pub async fn with_tasks(count: usize) -> (Self, Vec<TaskId>) {
        let board = Self::new().await;
        let project = board.catalog.add_project("Board").await.unwrap();
        let tasks = board.add_tasks(project.id, count).await;
        (board, tasks)
    }

    /// Add `count` tasks to `project`.
    pub async fn add_tasks(&self, project: ProjectId, count: usize) -> Vec<TaskId> {
        let mut ids = Vec::with_capacity(count);
        for n in 0..count {
            let task = self
                .catalog
                .add_task(project, &format!("Task {}", n + 1))
                .await
                .unwrap();
            ids.push(task.id);
        }
        ids
    }

    /// Link each `(depends_on, dependent)` pair, panicking on rejection.
    pub async fn link(&self, pairs: &[(i64, i64)]) {
        for &(from, to) in pairs {
            self.store.add_edge(TaskId(from), TaskId(to)).await.unwrap();
        }
    }
}

/// Convert chains of summaries to raw ids.
pub fn chain_ids(chains: &[girder::api::ChainView]) -> Vec<Vec<i64>> {
    chains
        .iter()
        .map(|c| c.tasks.iter().map(|t| t.id.get()).collect())
        .collect()
}

/// A catalog whose every lookup fails.
pub struct UnavailableCatalog;

#[async_trait]
impl TaskCatalog for UnavailableCatalog {
    async fn task_exists(&self, _id: TaskId) -> Result<bool> {
        Err(Error::StoreUnavailable("catalog offline".to_string()))
    }

    async fn task_summary(&self, _id: TaskId) -> Result<Option<TaskSummary>> {
        Err(Error::Io(std::io::Error::other("connection reset")))
    }
}

/// Run the girder binary in the specified directory
pub fn run_girder_in_dir(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_girder"))
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to execute girder binary")
}
