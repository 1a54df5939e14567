//! Domain types for the task dependency graph.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Identifier of a task, owned by the task catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub i64);

/// Identifier of a project, owned by the task catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub i64);

/// Identifier of a dependency edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub i64);

macro_rules! impl_id {
    ($name:ident) => {
        impl $name {
            /// Raw integer value.
            #[must_use]
            pub fn get(self) -> i64 {
                self.0
            }

            /// Ids are allocated from `1..i64::MAX`; anything else is corrupt.
            #[must_use]
            pub fn is_valid(self) -> bool {
                (1..i64::MAX).contains(&self.0)
            }

            /// The id after this one, or `None` once the range is used up.
            #[must_use]
            pub fn next(self) -> Option<Self> {
                Some(Self(self.0.checked_add(1)?)).filter(|id| id.is_valid())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

impl_id!(TaskId);
impl_id!(ProjectId);
impl_id!(EdgeId);

/// Project name shown when a task's project is unknown to the catalog.
pub const UNKNOWN_PROJECT_NAME: &str = "Unknown";

/// A project on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Project identifier
    pub id: ProjectId,

    /// Display name
    pub name: String,
}

/// A task as stored by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Task identifier
    pub id: TaskId,

    /// Task title
    pub title: String,

    /// Owning project
    pub project_id: ProjectId,
}

/// Read-only view of a task, enriched with its project name.
///
/// This is the task shape every graph result carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSummary {
    /// Task identifier
    pub id: TaskId,

    /// Task title
    pub title: String,

    /// Owning project
    pub project_id: ProjectId,

    /// Owning project's name, or [`UNKNOWN_PROJECT_NAME`]
    pub project_name: String,
}

/// Directed "depends-on" relationship between two tasks.
///
/// `depends_on_task_id` must be finished before `dependent_task_id`; in the
/// graph the edge points from the former to the latter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// Edge identifier
    pub id: EdgeId,

    /// The prerequisite task
    pub depends_on_task_id: TaskId,

    /// The task waiting on the prerequisite
    pub dependent_task_id: TaskId,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl DependencyEdge {
    /// Returns `true` if either endpoint is `task`.
    #[must_use]
    pub fn touches(&self, task: TaskId) -> bool {
        self.depends_on_task_id == task || self.dependent_task_id == task
    }
}

/// Restricts edge listings to tasks the caller may see.
///
/// Authorization lives outside this crate; callers hand in the set of task
/// ids that survived their checks.
#[derive(Debug, Clone, Default)]
pub struct EdgeFilter {
    /// Visible task ids; `None` means every task is visible
    pub visible_tasks: Option<HashSet<TaskId>>,
}

impl EdgeFilter {
    /// A filter that lets every edge through.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// A filter limited to the given tasks.
    pub fn visible(tasks: impl IntoIterator<Item = TaskId>) -> Self {
        Self {
            visible_tasks: Some(tasks.into_iter().collect()),
        }
    }

    /// An edge passes when both of its endpoints are visible.
    #[must_use]
    pub fn admits(&self, edge: &DependencyEdge) -> bool {
        match &self.visible_tasks {
            None => true,
            Some(visible) => {
                visible.contains(&edge.depends_on_task_id)
                    && visible.contains(&edge.dependent_task_id)
            }
        }
    }
}

/// Which nodes may start a linear chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChainHeads {
    /// Only nodes without incoming edges start chains.
    #[default]
    Roots,

    /// Any node that is not the middle of a one-to-one run starts a chain,
    /// including nodes just past a fork or a convergence.
    LinearRuns,
}

impl fmt::Display for ChainHeads {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Roots => write!(f, "roots"),
            Self::LinearRuns => write!(f, "linear-runs"),
        }
    }
}

/// Which task pairs may be linked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectScope {
    /// Edges may cross project boundaries.
    #[default]
    Any,

    /// Both tasks must belong to the same project.
    SameProject,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(id: i64, from: i64, to: i64) -> DependencyEdge {
        DependencyEdge {
            id: EdgeId(id),
            depends_on_task_id: TaskId(from),
            dependent_task_id: TaskId(to),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn filter_requires_both_endpoints() {
        let filter = EdgeFilter::visible([TaskId(1), TaskId(2)]);
        assert!(filter.admits(&edge(1, 1, 2)));
        assert!(!filter.admits(&edge(2, 2, 3)));
        assert!(EdgeFilter::all().admits(&edge(3, 7, 9)));
    }

    #[test]
    fn id_range_excludes_zero_negative_and_max() {
        assert!(EdgeId(1).is_valid());
        assert!(!EdgeId(0).is_valid());
        assert!(!TaskId(-3).is_valid());
        assert!(!ProjectId(i64::MAX).is_valid());

        assert_eq!(TaskId(1).next(), Some(TaskId(2)));
        assert_eq!(EdgeId(i64::MAX - 1).next(), None);
    }

    #[test]
    fn ids_serialize_as_plain_integers() {
        let json = serde_json::to_string(&edge(4, 1, 2)).unwrap();
        assert!(json.contains("\"id\":4"));
        assert!(json.contains("\"depends_on_task_id\":1"));
        assert!(json.contains("\"dependent_task_id\":2"));
    }

    #[test]
    fn policies_use_kebab_case() {
        assert_eq!(
            serde_json::to_string(&ChainHeads::LinearRuns).unwrap(),
            "\"linear-runs\""
        );
        assert_eq!(
            serde_json::from_str::<ProjectScope>("\"same-project\"").unwrap(),
            ProjectScope::SameProject
        );
    }
}
