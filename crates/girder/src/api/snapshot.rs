//! The combined read-only view returned to callers.

use crate::domain::{EdgeId, TaskSummary};
use serde::{Deserialize, Serialize};

/// Tasks touched by any visible edge, the edges themselves, and the chains
/// and convergences derived from them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Every task appearing in at least one edge, ordered by id
    pub tasks: Vec<TaskSummary>,

    /// Edges ordered by id
    pub edges: Vec<EdgeView>,

    /// Linear runs, in head order
    pub chains: Vec<ChainView>,

    /// Tasks with several direct prerequisites, ordered by target id
    pub convergences: Vec<ConvergenceView>,
}

/// An edge with both endpoints resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeView {
    /// Edge identifier
    pub id: EdgeId,

    /// The prerequisite task
    pub depends_on: TaskSummary,

    /// The waiting task
    pub dependent: TaskSummary,
}

/// A chain, head first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainView {
    /// Tasks in order
    pub tasks: Vec<TaskSummary>,
}

/// A convergence group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvergenceView {
    /// Direct prerequisites of `target`, ascending by id
    pub sources: Vec<TaskSummary>,

    /// The task several prerequisites lead into
    pub target: TaskSummary,
}

impl Snapshot {
    /// Returns `true` if no visible edge exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
