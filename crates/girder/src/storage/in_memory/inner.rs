//! Core in-memory store data structures.
//!
//! `StoreInner` is not thread-safe on its own; it is wrapped in
//! `Arc<RwLock<>>` by [`InMemoryStore`](super::InMemoryStore).

use crate::domain::{DependencyEdge, EdgeId, TaskId};
use crate::error::{Error, Result};
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::Direction;
use std::collections::{BTreeMap, HashMap};

/// A stored edge together with its position in the graph.
pub(super) struct EdgeEntry {
    pub(super) edge: DependencyEdge,
    pub(super) index: EdgeIndex,
}

pub(crate) struct StoreInner {
    /// Nodes carry task ids, edges carry edge ids.
    /// Direction: depends_on (source) -> dependent (target).
    pub(super) graph: StableDiGraph<TaskId, EdgeId>,

    /// Every node in `graph` has exactly one entry here.
    pub(super) node_map: HashMap<TaskId, NodeIndex>,

    /// Edge records ordered by id.
    pub(super) edges: BTreeMap<EdgeId, EdgeEntry>,

    /// Next id to hand out; never reused within one store.
    next_edge_id: i64,
}

impl StoreInner {
    pub(crate) fn new() -> Self {
        Self {
            graph: StableDiGraph::new(),
            node_map: HashMap::new(),
            edges: BTreeMap::new(),
            next_edge_id: 1,
        }
    }

    /// Hand out the next id; fails once `1..i64::MAX` is used up.
    pub(super) fn allocate_edge_id(&mut self) -> Result<EdgeId> {
        let id = EdgeId(self.next_edge_id);
        if !id.is_valid() {
            return Err(Error::IdsExhausted("edge"));
        }
        self.next_edge_id = id.next().map_or(i64::MAX, EdgeId::get);
        Ok(id)
    }

    fn node_for(&mut self, task: TaskId) -> NodeIndex {
        if let Some(&node) = self.node_map.get(&task) {
            return node;
        }
        let node = self.graph.add_node(task);
        self.node_map.insert(task, node);
        node
    }

    /// Id of the edge linking the ordered pair, if any.
    pub(super) fn find_pair(&self, depends_on: TaskId, dependent: TaskId) -> Option<EdgeId> {
        let from = *self.node_map.get(&depends_on)?;
        let to = *self.node_map.get(&dependent)?;
        let index = self.graph.find_edge(from, to)?;
        self.graph.edge_weight(index).copied()
    }

    /// Store an already validated edge.
    pub(super) fn insert(&mut self, edge: DependencyEdge) {
        let from = self.node_for(edge.depends_on_task_id);
        let to = self.node_for(edge.dependent_task_id);
        let index = self.graph.add_edge(from, to, edge.id);
        let after = edge.id.next().map_or(i64::MAX, EdgeId::get);
        self.next_edge_id = self.next_edge_id.max(after);
        self.edges.insert(edge.id, EdgeEntry { edge, index });
    }

    /// Remove one edge, pruning endpoints left without edges.
    pub(super) fn detach(&mut self, id: EdgeId) -> Option<DependencyEdge> {
        let entry = self.edges.remove(&id)?;
        self.graph.remove_edge(entry.index);
        self.prune(entry.edge.depends_on_task_id);
        self.prune(entry.edge.dependent_task_id);
        Some(entry.edge)
    }

    /// Remove every edge touching `task`.
    pub(super) fn detach_task(&mut self, task: TaskId) -> Vec<DependencyEdge> {
        let Some(&node) = self.node_map.get(&task) else {
            return Vec::new();
        };

        let ids: Vec<EdgeId> = self
            .graph
            .edges_directed(node, Direction::Incoming)
            .chain(self.graph.edges_directed(node, Direction::Outgoing))
            .map(|edge| *edge.weight())
            .collect();

        ids.into_iter().filter_map(|id| self.detach(id)).collect()
    }

    fn prune(&mut self, task: TaskId) {
        let Some(&node) = self.node_map.get(&task) else {
            return;
        };
        if self.graph.neighbors_undirected(node).next().is_none() {
            self.graph.remove_node(node);
            self.node_map.remove(&task);
        }
    }

    pub(super) fn iter_edges(&self) -> impl Iterator<Item = &DependencyEdge> {
        self.edges.values().map(|entry| &entry.edge)
    }
}
