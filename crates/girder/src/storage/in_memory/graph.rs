//! Graph algorithms for the in-memory store.

use crate::domain::{EdgeId, TaskId};
use petgraph::algo;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use std::collections::HashMap;

/// Returns `true` if adding `depends_on -> dependent` would close a cycle.
///
/// Edges point from prerequisite to dependent, so the new edge closes a cycle
/// exactly when `depends_on` is already reachable from `dependent`. A task
/// without a node has no edges and therefore cannot be on a path.
pub(super) fn would_create_cycle(
    graph: &StableDiGraph<TaskId, EdgeId>,
    node_map: &HashMap<TaskId, NodeIndex>,
    depends_on: TaskId,
    dependent: TaskId,
) -> bool {
    if depends_on == dependent {
        return true;
    }
    let (Some(&from), Some(&to)) = (node_map.get(&depends_on), node_map.get(&dependent)) else {
        return false;
    };
    algo::has_path_connecting(graph, to, from, None)
}
