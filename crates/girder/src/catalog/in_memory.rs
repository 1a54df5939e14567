//! In-memory task catalog with optional JSONL persistence.
//!
//! Projects and tasks share one file. Each line is a record tagged with its
//! kind:
//!
//! ```text
//! {"kind":"project","id":1,"name":"Website"}
//! {"kind":"task","id":1,"title":"Draft copy","project_id":1}
//! ```

use super::{TaskCatalog, TaskDeletionListener};
use crate::domain::{Project, ProjectId, Task, TaskId, TaskSummary, UNKNOWN_PROJECT_NAME};
use crate::error::{Error, Result};
use async_trait::async_trait;
use girder_jsonl::{read_jsonl_resilient, write_jsonl_atomic_iter, Warning as JsonlWarning};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum CatalogRecord {
    Project(Project),
    Task(Task),
}

/// Non-fatal problems found while loading a catalog file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogLoadWarning {
    /// A line could not be parsed and was skipped.
    MalformedRecord {
        /// 1-based line number
        line_number: usize,
        /// Parser message
        error: String,
    },

    /// A second project with an already loaded id was skipped.
    DuplicateProject(ProjectId),

    /// A second task with an already loaded id was skipped.
    DuplicateTask(TaskId),

    /// A project whose id is outside `1..i64::MAX` was skipped.
    InvalidProjectId(ProjectId),

    /// A task whose id is outside `1..i64::MAX` was skipped.
    InvalidTaskId(TaskId),
}

#[derive(Debug, Default)]
struct CatalogInner {
    projects: BTreeMap<ProjectId, Project>,
    tasks: BTreeMap<TaskId, Task>,
}

impl CatalogInner {
    fn next_project_id(&self) -> Result<ProjectId> {
        match self.projects.keys().next_back() {
            Some(last) => last.next().ok_or(Error::IdsExhausted("project")),
            None => Ok(ProjectId(1)),
        }
    }

    fn next_task_id(&self) -> Result<TaskId> {
        match self.tasks.keys().next_back() {
            Some(last) => last.next().ok_or(Error::IdsExhausted("task")),
            None => Ok(TaskId(1)),
        }
    }

    fn summary(&self, task: &Task) -> TaskSummary {
        let project_name = self
            .projects
            .get(&task.project_id)
            .map_or_else(|| UNKNOWN_PROJECT_NAME.to_string(), |p| p.name.clone());
        TaskSummary {
            id: task.id,
            title: task.title.clone(),
            project_id: task.project_id,
            project_name,
        }
    }
}

/// Task catalog held in memory.
///
/// Deleting a task notifies every subscribed [`TaskDeletionListener`] after the
/// task is gone, so listeners never observe a half-deleted task. Listeners are
/// held weakly; a dropped dependency store simply stops receiving events.
pub struct InMemoryCatalog {
    inner: RwLock<CatalogInner>,
    listeners: RwLock<Vec<Weak<dyn TaskDeletionListener>>>,
    path: Option<PathBuf>,
}

impl std::fmt::Debug for InMemoryCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryCatalog")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCatalog {
    /// Create an empty, purely in-memory catalog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(CatalogInner::default()),
            listeners: RwLock::new(Vec::new()),
            path: None,
        }
    }

    /// Load a catalog from a JSONL file; [`save`](Self::save) writes back to it.
    ///
    /// A missing file yields an empty catalog.
    ///
    /// # Errors
    ///
    /// Returns an error only if the file exists but cannot be read.
    pub async fn load_from_jsonl(path: &Path) -> Result<(Self, Vec<CatalogLoadWarning>)> {
        let (records, jsonl_warnings) = read_jsonl_resilient::<CatalogRecord, _>(path).await?;

        let mut warnings: Vec<CatalogLoadWarning> = jsonl_warnings
            .into_iter()
            .map(|w| match w {
                JsonlWarning::MalformedJson { line_number, error } => {
                    CatalogLoadWarning::MalformedRecord { line_number, error }
                }
                other @ JsonlWarning::InvalidUtf8 { .. } => CatalogLoadWarning::MalformedRecord {
                    line_number: other.line_number(),
                    error: other.to_string(),
                },
            })
            .collect();

        let mut inner = CatalogInner::default();
        for record in records {
            match record {
                CatalogRecord::Project(project) => {
                    if !project.id.is_valid() {
                        warnings.push(CatalogLoadWarning::InvalidProjectId(project.id));
                        continue;
                    }
                    if inner.projects.contains_key(&project.id) {
                        warnings.push(CatalogLoadWarning::DuplicateProject(project.id));
                        continue;
                    }
                    inner.projects.insert(project.id, project);
                }
                CatalogRecord::Task(task) => {
                    if !task.id.is_valid() {
                        warnings.push(CatalogLoadWarning::InvalidTaskId(task.id));
                        continue;
                    }
                    if inner.tasks.contains_key(&task.id) {
                        warnings.push(CatalogLoadWarning::DuplicateTask(task.id));
                        continue;
                    }
                    inner.tasks.insert(task.id, task);
                }
            }
        }

        tracing::debug!(
            path = %path.display(),
            projects = inner.projects.len(),
            tasks = inner.tasks.len(),
            warnings = warnings.len(),
            "loaded task catalog"
        );

        let catalog = Self {
            inner: RwLock::new(inner),
            listeners: RwLock::new(Vec::new()),
            path: Some(path.to_path_buf()),
        };
        Ok((catalog, warnings))
    }

    /// Write the catalog back to its file. No-op for purely in-memory catalogs.
    ///
    /// # Errors
    ///
    /// Returns an error if the atomic write fails.
    pub async fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let inner = self.inner.read().await;
        let records = inner
            .projects
            .values()
            .cloned()
            .map(CatalogRecord::Project)
            .chain(inner.tasks.values().cloned().map(CatalogRecord::Task));
        write_jsonl_atomic_iter(path, records).await?;
        Ok(())
    }

    /// Register a listener for task deletions.
    pub async fn subscribe(&self, listener: Weak<dyn TaskDeletionListener>) {
        let mut listeners = self.listeners.write().await;
        listeners.retain(|l| l.strong_count() > 0);
        listeners.push(listener);
    }

    /// Create a project.
    ///
    /// # Errors
    ///
    /// Returns `Error::IdsExhausted` if no project id is left.
    pub async fn add_project(&self, name: &str) -> Result<Project> {
        let mut inner = self.inner.write().await;
        let project = Project {
            id: inner.next_project_id()?,
            name: name.to_string(),
        };
        inner.projects.insert(project.id, project.clone());
        tracing::debug!(project_id = %project.id, name, "created project");
        Ok(project)
    }

    /// Create a task inside an existing project.
    ///
    /// # Errors
    ///
    /// Returns `Error::ProjectNotFound` if the project does not exist, or
    /// `Error::IdsExhausted` if no task id is left.
    pub async fn add_task(&self, project_id: ProjectId, title: &str) -> Result<Task> {
        let mut inner = self.inner.write().await;
        if !inner.projects.contains_key(&project_id) {
            return Err(Error::ProjectNotFound(project_id));
        }
        let task = Task {
            id: inner.next_task_id()?,
            title: title.to_string(),
            project_id,
        };
        inner.tasks.insert(task.id, task.clone());
        tracing::debug!(task_id = %task.id, %project_id, "created task");
        Ok(task)
    }

    /// Delete a task and notify every deletion listener.
    ///
    /// Returns the total number of records the listeners dropped (for the
    /// dependency store: the number of edges cascaded away).
    ///
    /// # Errors
    ///
    /// Returns `Error::TaskNotFound` if the task does not exist, or the first
    /// listener failure.
    pub async fn delete_task(&self, id: TaskId) -> Result<usize> {
        {
            let mut inner = self.inner.write().await;
            if inner.tasks.remove(&id).is_none() {
                return Err(Error::TaskNotFound(id));
            }
        }

        let listeners: Vec<Arc<dyn TaskDeletionListener>> = self
            .listeners
            .read()
            .await
            .iter()
            .filter_map(Weak::upgrade)
            .collect();

        let mut dropped = 0;
        for listener in listeners {
            dropped += listener.on_task_deleted(id).await?;
        }
        tracing::debug!(task_id = %id, dropped, "deleted task");
        Ok(dropped)
    }

    /// All projects, ordered by id.
    pub async fn projects(&self) -> Vec<Project> {
        self.inner.read().await.projects.values().cloned().collect()
    }

    /// All tasks as summaries, ordered by id.
    pub async fn tasks(&self) -> Vec<TaskSummary> {
        let inner = self.inner.read().await;
        inner.tasks.values().map(|t| inner.summary(t)).collect()
    }

    /// Ids of every task belonging to one of `projects`.
    pub async fn tasks_in_projects(&self, projects: &[ProjectId]) -> HashSet<TaskId> {
        self.inner
            .read()
            .await
            .tasks
            .values()
            .filter(|t| projects.contains(&t.project_id))
            .map(|t| t.id)
            .collect()
    }
}

#[async_trait]
impl TaskCatalog for InMemoryCatalog {
    async fn task_exists(&self, id: TaskId) -> Result<bool> {
        Ok(self.inner.read().await.tasks.contains_key(&id))
    }

    async fn task_summary(&self, id: TaskId) -> Result<Option<TaskSummary>> {
        let inner = self.inner.read().await;
        Ok(inner.tasks.get(&id).map(|t| inner.summary(t)))
    }
}
