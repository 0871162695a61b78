use std::collections::{HashMap, VecDeque};

use tracing::trace;

use crate::error::Result;
use crate::graph::{Graph, NodeId};

/// Outcome of a seen-flag traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Traversal {
    /// Nodes in the order they were marked, starting with the source.
    /// Empty if the source was already marked before the call.
    pub order: Vec<NodeId>,
}

impl Traversal {
    pub fn nodes_visited(&self) -> usize {
        self.order.len()
    }
}

/// BFS from `src`, marking every newly reached node as seen.
///
/// Nodes already marked are treated as visited and not expanded, so several
/// calls without an intervening [`Graph::reset_seen`] accumulate into one
/// multi-source marking.
pub fn mark_reachable(graph: &mut Graph, src: NodeId) -> Result<Traversal> {
    let mut order = Vec::new();
    if graph.is_seen(src)? {
        return Ok(Traversal { order });
    }

    let mut queue: VecDeque<NodeId> = VecDeque::with_capacity(graph.node_count());
    graph.set_seen(src, true)?;
    order.push(src);
    queue.push_back(src);

    while let Some(current) = queue.pop_front() {
        trace!(node = %current, "dequeued");
        // Copy out: the neighbour view borrows the graph we are marking.
        let neighbours = graph.neighbours(current)?.to_vec();
        for next in neighbours {
            if !graph.is_seen(next)? {
                graph.set_seen(next, true)?;
                order.push(next);
                queue.push_back(next);
            }
        }
    }

    Ok(Traversal { order })
}

/// Whether `dest` is reachable from `src`.
///
/// Seen flags are graph-wide state and are not cleared here: call
/// [`Graph::reset_seen`] first, or stale marks from a previous query will
/// count as reached.
pub fn is_reachable(graph: &mut Graph, src: NodeId, dest: NodeId) -> Result<bool> {
    graph.is_seen(dest)?;
    let traversal = mark_reachable(graph, src)?;
    trace!(visited = traversal.nodes_visited(), "search finished");
    graph.is_seen(dest)
}

/// Fewest-hop route from `src` to `dest`, both endpoints included.
///
/// Tracks visits in a local parent map, so seen flags are left untouched.
/// Returns `None` if `dest` is in another component.
pub fn shortest_path(graph: &Graph, src: NodeId, dest: NodeId) -> Result<Option<Vec<NodeId>>> {
    graph.neighbours(dest)?;
    graph.neighbours(src)?;

    if src == dest {
        return Ok(Some(vec![src]));
    }

    // node -> parent; the source is its own parent
    let mut parents: HashMap<NodeId, NodeId> = HashMap::new();
    let mut queue: VecDeque<NodeId> = VecDeque::new();
    parents.insert(src, src);
    queue.push_back(src);

    while let Some(current) = queue.pop_front() {
        for &next in graph.neighbours(current)? {
            if parents.contains_key(&next) {
                continue;
            }
            parents.insert(next, current);
            if next == dest {
                return Ok(Some(reconstruct_path(&parents, src, dest)));
            }
            queue.push_back(next);
        }
    }

    Ok(None)
}

fn reconstruct_path(parents: &HashMap<NodeId, NodeId>, src: NodeId, dest: NodeId) -> Vec<NodeId> {
    let mut path = vec![dest];
    let mut current = dest;
    while current != src {
        current = parents[&current];
        path.push(current);
    }
    path.reverse();
    path
}
