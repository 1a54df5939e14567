//! Chain and convergence derivation.
//!
//! Everything here is a pure function of an edge list. Nothing is cached; the
//! views are recomputed on every snapshot and may be computed concurrently.
//!
//! - A **chain** is a maximal run of tasks linked one-to-one. Runs are
//!   followed while the current task has exactly one successor and that
//!   successor has exactly one predecessor; runs shorter than two tasks are
//!   dropped.
//! - A **convergence** is a task with two or more direct prerequisites,
//!   reported with those prerequisites in ascending id order.
//!
//! A convergence target never continues a chain because its indegree is at
//! least two. Under [`ChainHeads::LinearRuns`] it may still head one.

use crate::domain::{ChainHeads, DependencyEdge, TaskId};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// A task with two or more direct prerequisites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvergenceIds {
    /// The task waiting on several prerequisites
    pub target: TaskId,

    /// Its direct prerequisites, ascending
    pub sources: Vec<TaskId>,
}

/// Chains and convergences derived from one edge list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphViews {
    /// Chains in head order, each listing tasks from head to tail
    pub chains: Vec<Vec<TaskId>>,

    /// Convergence groups ordered by target id
    pub convergences: Vec<ConvergenceIds>,
}

/// Outgoing and incoming adjacency restricted to one edge list.
#[derive(Debug, Default)]
struct Adjacency {
    successors: BTreeMap<TaskId, BTreeSet<TaskId>>,
    predecessors: BTreeMap<TaskId, BTreeSet<TaskId>>,
}

impl Adjacency {
    fn build(edges: &[DependencyEdge]) -> Self {
        let mut adjacency = Self::default();
        for edge in edges {
            let from = edge.depends_on_task_id;
            let to = edge.dependent_task_id;
            adjacency.successors.entry(from).or_default().insert(to);
            adjacency.predecessors.entry(to).or_default().insert(from);
            adjacency.successors.entry(to).or_default();
            adjacency.predecessors.entry(from).or_default();
        }
        adjacency
    }

    fn nodes(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.successors.keys().copied()
    }

    fn outdegree(&self, task: TaskId) -> usize {
        self.successors.get(&task).map_or(0, BTreeSet::len)
    }

    fn indegree(&self, task: TaskId) -> usize {
        self.predecessors.get(&task).map_or(0, BTreeSet::len)
    }

    fn only_successor(&self, task: TaskId) -> Option<TaskId> {
        let successors = self.successors.get(&task)?;
        if successors.len() == 1 {
            successors.first().copied()
        } else {
            None
        }
    }

    fn only_predecessor(&self, task: TaskId) -> Option<TaskId> {
        let predecessors = self.predecessors.get(&task)?;
        if predecessors.len() == 1 {
            predecessors.first().copied()
        } else {
            None
        }
    }

    /// True when `task` continues a one-to-one run started further up.
    fn is_run_middle(&self, task: TaskId) -> bool {
        self.only_predecessor(task)
            .is_some_and(|pred| self.outdegree(pred) == 1)
    }

    fn is_head(&self, task: TaskId, heads: ChainHeads) -> bool {
        match heads {
            ChainHeads::Roots => self.indegree(task) == 0 && self.outdegree(task) > 0,
            ChainHeads::LinearRuns => self.outdegree(task) == 1 && !self.is_run_middle(task),
        }
    }

    fn walk(&self, head: TaskId, used: &HashSet<TaskId>) -> Vec<TaskId> {
        let mut chain = vec![head];
        let mut current = head;
        while let Some(next) = self.only_successor(current) {
            if self.indegree(next) != 1 || used.contains(&next) || chain.contains(&next) {
                break;
            }
            chain.push(next);
            current = next;
        }
        chain
    }
}

/// Derive chains and convergences from `edges`.
///
/// Edge order does not matter; the result depends only on the set of
/// `(depends_on, dependent)` pairs.
#[must_use]
pub fn derive_views(edges: &[DependencyEdge], heads: ChainHeads) -> GraphViews {
    let adjacency = Adjacency::build(edges);

    let mut chains = Vec::new();
    let mut used: HashSet<TaskId> = HashSet::new();
    for head in adjacency.nodes() {
        if used.contains(&head) || !adjacency.is_head(head, heads) {
            continue;
        }
        let chain = adjacency.walk(head, &used);
        if chain.len() >= 2 {
            used.extend(chain.iter().copied());
            chains.push(chain);
        }
    }

    let convergences = adjacency
        .predecessors
        .iter()
        .filter(|(_, sources)| sources.len() >= 2)
        .map(|(&target, sources)| ConvergenceIds {
            target,
            sources: sources.iter().copied().collect(),
        })
        .collect();

    GraphViews {
        chains,
        convergences,
    }
}
