use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::error::{GraphError, Result};

/// Longest accepted node name, in bytes.
pub const MAX_NAME_LEN: usize = 40;

/// Handle to a node stored in a [`Graph`].
///
/// Handles are arena indices tagged with the slot generation, so a handle to a
/// deleted node is rejected instead of resolving to whatever reused its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    /// Arena slot of this node.
    pub fn index(self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}.{}", self.index, self.generation)
    }
}

#[derive(Debug, Clone)]
struct Node {
    name: String,
    seen: bool,
    /// Non-owning; kept in insertion order.
    neighbours: Vec<NodeId>,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Capacity-bounded undirected graph of uniquely named nodes.
///
/// Each undirected edge is stored as two neighbour entries (one on each
/// endpoint) and counted once. A self-loop is a single entry on its node.
#[derive(Debug, Clone)]
pub struct Graph {
    slots: Vec<Slot>,
    free: Vec<usize>,
    name_index: HashMap<String, NodeId>,
    node_count: usize,
    edge_count: usize,
    max_nodes: usize,
}

impl Graph {
    /// Create an empty graph that holds at most `max_nodes` nodes.
    pub fn new(max_nodes: usize) -> Result<Self> {
        if max_nodes == 0 {
            return Err(GraphError::InvalidCapacity);
        }
        Ok(Self {
            slots: Vec::new(),
            free: Vec::new(),
            name_index: HashMap::new(),
            node_count: 0,
            edge_count: 0,
            max_nodes,
        })
    }

    /// True if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.node_count == 0
    }

    /// True if at least one edge exists.
    pub fn has_edges(&self) -> bool {
        self.edge_count > 0
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Number of undirected edges (self-loops included).
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Maximum number of nodes, fixed at construction.
    pub fn capacity(&self) -> usize {
        self.max_nodes
    }

    /// Insert a node named `name` with no neighbours.
    ///
    /// Fails with `CapacityExceeded` on a full graph, `InvalidName` for an
    /// empty, overlong or whitespace-containing name, and `DuplicateName` if
    /// the name is taken.
    pub fn insert_node(&mut self, name: &str) -> Result<NodeId> {
        if self.node_count >= self.max_nodes {
            debug!(name, capacity = self.max_nodes, "insert rejected: graph full");
            return Err(GraphError::CapacityExceeded {
                capacity: self.max_nodes,
            });
        }
        if !is_valid_name(name) {
            return Err(GraphError::InvalidName(name.to_string()));
        }
        if self.name_index.contains_key(name) {
            debug!(name, "insert rejected: duplicate name");
            return Err(GraphError::DuplicateName(name.to_string()));
        }

        let node = Node {
            name: name.to_string(),
            seen: false,
            neighbours: Vec::new(),
        };
        let index = match self.free.pop() {
            Some(index) => {
                self.slots[index].node = Some(node);
                index
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                self.slots.len() - 1
            }
        };
        let id = NodeId {
            index: index as u32,
            generation: self.slots[index].generation,
        };

        self.name_index.insert(name.to_string(), id);
        self.node_count += 1;
        debug!(name, %id, "node inserted");
        Ok(id)
    }

    /// Look up a node by exact name.
    pub fn find_node(&self, name: &str) -> Result<NodeId> {
        self.name_index
            .get(name)
            .copied()
            .ok_or_else(|| GraphError::NodeNotFound(name.to_string()))
    }

    /// Whether `id` refers to a live node of this graph.
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_ok()
    }

    pub fn name(&self, id: NodeId) -> Result<&str> {
        self.node(id).map(|n| n.name.as_str())
    }

    pub fn is_seen(&self, id: NodeId) -> Result<bool> {
        self.node(id).map(|n| n.seen)
    }

    pub fn set_seen(&mut self, id: NodeId, seen: bool) -> Result<()> {
        self.node_mut(id)?.seen = seen;
        Ok(())
    }

    /// Clear the seen flag on every node. Call before each traversal.
    pub fn reset_seen(&mut self) {
        for node in self.slots.iter_mut().filter_map(|s| s.node.as_mut()) {
            node.seen = false;
        }
    }

    /// Connect `n1` and `n2`.
    ///
    /// Both endpoints are validated before anything is written, so the
    /// reciprocal entries are added together or not at all.
    pub fn insert_edge(&mut self, n1: NodeId, n2: NodeId) -> Result<()> {
        self.node(n2)?;
        if self.node(n1)?.neighbours.contains(&n2) {
            return Err(GraphError::EdgeAlreadyExists { from: n1, to: n2 });
        }

        self.node_mut(n1)?.neighbours.push(n2);
        if n1 != n2 {
            self.node_mut(n2)?.neighbours.push(n1);
        }
        self.edge_count += 1;
        debug!(from = %n1, to = %n2, "edge inserted");
        Ok(())
    }

    /// Resolve both names and connect the nodes.
    pub fn connect(&mut self, a: &str, b: &str) -> Result<()> {
        let n1 = self.find_node(a)?;
        let n2 = self.find_node(b)?;
        self.insert_edge(n1, n2)
    }

    /// Remove the edge between `n1` and `n2`. `EdgeNotFound` if there is none.
    pub fn delete_edge(&mut self, n1: NodeId, n2: NodeId) -> Result<()> {
        self.node(n2)?;
        let pos = self
            .node(n1)?
            .neighbours
            .iter()
            .position(|&m| m == n2)
            .ok_or(GraphError::EdgeNotFound { from: n1, to: n2 })?;

        self.node_mut(n1)?.neighbours.remove(pos);
        if n1 != n2 {
            let back = self.node_mut(n2)?;
            if let Some(pos) = back.neighbours.iter().position(|&m| m == n1) {
                back.neighbours.remove(pos);
            }
        }
        self.edge_count -= 1;
        debug!(from = %n1, to = %n2, "edge deleted");
        Ok(())
    }

    /// Remove `n` and every edge touching it. Returns the number of edges
    /// severed.
    pub fn delete_node(&mut self, n: NodeId) -> Result<usize> {
        self.node(n)?;

        let mut severed = 0;
        let all: Vec<NodeId> = self.nodes().collect();
        for other in all {
            match self.delete_edge(other, n) {
                Ok(()) => severed += 1,
                Err(GraphError::EdgeNotFound { .. }) => {}
                Err(e) => return Err(e),
            }
        }

        let slot = &mut self.slots[n.index()];
        let node = slot.node.take().ok_or(GraphError::InvalidPrecondition(n))?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(n.index());
        self.name_index.remove(&node.name);
        self.node_count -= 1;
        debug!(name = %node.name, severed, "node deleted");
        Ok(severed)
    }

    /// An arbitrary node (the lowest occupied slot), or `None` if empty.
    pub fn choose_node(&self) -> Option<NodeId> {
        self.nodes().next()
    }

    /// Neighbours of `n` in the order their edges were inserted.
    pub fn neighbours(&self, n: NodeId) -> Result<&[NodeId]> {
        self.node(n).map(|node| node.neighbours.as_slice())
    }

    /// All live nodes in slot order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.node.as_ref().map(|_| NodeId {
                index: index as u32,
                generation: slot.generation,
            })
        })
    }

    fn node(&self, id: NodeId) -> Result<&Node> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
            .ok_or(GraphError::InvalidPrecondition(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
            .ok_or(GraphError::InvalidPrecondition(id))
    }
}

/// Names are single non-empty tokens of at most [`MAX_NAME_LEN`] bytes.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.len() <= MAX_NAME_LEN && !name.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with(names: &[&str]) -> Graph {
        let mut g = Graph::new(names.len().max(1)).unwrap();
        for name in names {
            g.insert_node(name).unwrap();
        }
        g
    }

    fn names_of(g: &Graph, ids: &[NodeId]) -> Vec<String> {
        ids.iter().map(|&id| g.name(id).unwrap().to_string()).collect()
    }

    #[test]
    fn test_new_rejects_zero_capacity() {
        assert_eq!(Graph::new(0).unwrap_err(), GraphError::InvalidCapacity);
    }

    #[test]
    fn test_huge_capacity_allocates_lazily() {
        let mut g = Graph::new(usize::MAX).unwrap();
        assert_eq!(g.capacity(), usize::MAX);
        let a = g.insert_node("A").unwrap();
        assert_eq!(g.find_node("A").unwrap(), a);
        assert_eq!(g.node_count(), 1);
    }

    #[test]
    fn test_empty_graph() {
        let g = Graph::new(4).unwrap();
        assert!(g.is_empty());
        assert!(!g.has_edges());
        assert_eq!(g.choose_node(), None);
        assert_eq!(g.capacity(), 4);
    }

    #[test]
    fn test_insert_and_find() {
        let mut g = Graph::new(4).unwrap();
        let a = g.insert_node("UME").unwrap();
        assert_eq!(g.find_node("UME").unwrap(), a);
        assert_eq!(g.name(a).unwrap(), "UME");
        assert!(!g.is_seen(a).unwrap());
        assert!(g.neighbours(a).unwrap().is_empty());
        assert!(!g.is_empty());
    }

    #[test]
    fn test_find_is_exact_match() {
        let g = graph_with(&["UME", "UMEA"]);
        assert_eq!(g.find_node("UM"), Err(GraphError::NodeNotFound("UM".into())));
        assert_eq!(g.name(g.find_node("UMEA").unwrap()).unwrap(), "UMEA");
        assert!(g.find_node("ume").is_err());
    }

    #[test]
    fn test_capacity_exceeded() {
        let mut g = graph_with(&["A", "B", "C"]);
        assert_eq!(g.capacity(), 3);
        assert_eq!(
            g.insert_node("D"),
            Err(GraphError::CapacityExceeded { capacity: 3 })
        );
        assert_eq!(g.node_count(), 3);
        assert!(g.find_node("D").is_err());
    }

    #[test]
    fn test_duplicate_name() {
        let mut g = Graph::new(4).unwrap();
        g.insert_node("X").unwrap();
        assert_eq!(g.insert_node("X"), Err(GraphError::DuplicateName("X".into())));
        assert_eq!(g.node_count(), 1);
    }

    #[test]
    fn test_invalid_names() {
        let mut g = Graph::new(4).unwrap();
        let long = "A".repeat(MAX_NAME_LEN + 1);
        for bad in ["", "two words", long.as_str()] {
            assert_eq!(g.insert_node(bad), Err(GraphError::InvalidName(bad.into())));
        }
        assert!(g.insert_node(&"A".repeat(MAX_NAME_LEN)).is_ok());
        assert_eq!(g.node_count(), 1);
    }

    #[test]
    fn test_edge_symmetry() {
        let mut g = graph_with(&["A", "B"]);
        let (a, b) = (g.find_node("A").unwrap(), g.find_node("B").unwrap());
        g.insert_edge(a, b).unwrap();
        assert_eq!(g.neighbours(a).unwrap(), &[b]);
        assert_eq!(g.neighbours(b).unwrap(), &[a]);
        assert_eq!(g.edge_count(), 1);
        assert!(g.has_edges());

        g.delete_edge(b, a).unwrap();
        assert!(g.neighbours(a).unwrap().is_empty());
        assert!(g.neighbours(b).unwrap().is_empty());
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn test_duplicate_edge() {
        let mut g = graph_with(&["A", "B"]);
        let (a, b) = (g.find_node("A").unwrap(), g.find_node("B").unwrap());
        g.insert_edge(a, b).unwrap();
        let err = g.insert_edge(a, b).unwrap_err();
        assert_eq!(err, GraphError::EdgeAlreadyExists { from: a, to: b });
        assert!(err.is_benign());
        // Reverse direction is the same undirected edge
        assert!(g.insert_edge(b, a).is_err());
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.neighbours(a).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_missing_edge() {
        let mut g = graph_with(&["A", "B"]);
        let (a, b) = (g.find_node("A").unwrap(), g.find_node("B").unwrap());
        let err = g.delete_edge(a, b).unwrap_err();
        assert_eq!(err, GraphError::EdgeNotFound { from: a, to: b });
        assert!(err.is_benign());
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn test_neighbour_order_is_insertion_order() {
        let mut g = graph_with(&["HUB", "A", "B", "C"]);
        g.connect("HUB", "C").unwrap();
        g.connect("HUB", "A").unwrap();
        g.connect("B", "HUB").unwrap();
        let hub = g.find_node("HUB").unwrap();
        assert_eq!(names_of(&g, g.neighbours(hub).unwrap()), ["C", "A", "B"]);
    }

    #[test]
    fn test_self_loop() {
        let mut g = graph_with(&["A"]);
        let a = g.find_node("A").unwrap();
        g.insert_edge(a, a).unwrap();
        assert_eq!(g.neighbours(a).unwrap(), &[a]);
        assert_eq!(g.edge_count(), 1);
        g.delete_edge(a, a).unwrap();
        assert_eq!(g.edge_count(), 0);
        assert!(g.neighbours(a).unwrap().is_empty());
    }

    #[test]
    fn test_delete_node_severs_edges() {
        let mut g = graph_with(&["A", "B", "C"]);
        g.connect("A", "B").unwrap();
        g.connect("B", "C").unwrap();
        let (a, b, c) = (
            g.find_node("A").unwrap(),
            g.find_node("B").unwrap(),
            g.find_node("C").unwrap(),
        );

        assert_eq!(g.delete_node(b).unwrap(), 2);
        assert_eq!(g.edge_count(), 0);
        assert_eq!(g.node_count(), 2);
        assert!(!g.neighbours(a).unwrap().contains(&b));
        assert!(!g.neighbours(c).unwrap().contains(&b));
        assert!(g.find_node("B").is_err());
    }

    #[test]
    fn test_delete_node_with_self_loop() {
        let mut g = graph_with(&["A", "B"]);
        g.connect("A", "A").unwrap();
        g.connect("A", "B").unwrap();
        let a = g.find_node("A").unwrap();
        assert_eq!(g.delete_node(a).unwrap(), 2);
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn test_stale_handle_rejected() {
        let mut g = graph_with(&["A", "B"]);
        let a = g.find_node("A").unwrap();
        let b = g.find_node("B").unwrap();
        g.delete_node(a).unwrap();

        // Slot reuse must not revive the old handle
        let c = g.insert_node("C").unwrap();
        assert_eq!(c.index(), a.index());
        assert_ne!(c, a);

        assert_eq!(g.insert_edge(a, b), Err(GraphError::InvalidPrecondition(a)));
        assert_eq!(g.insert_edge(b, a), Err(GraphError::InvalidPrecondition(a)));
        assert_eq!(g.delete_node(a), Err(GraphError::InvalidPrecondition(a)));
        assert!(g.is_seen(a).is_err());
        assert!(!g.contains(a));
        assert!(g.neighbours(b).unwrap().is_empty());
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn test_foreign_handle_rejected() {
        let mut small = graph_with(&["A"]);
        let big = graph_with(&["A", "B", "C"]);
        let foreign = big.find_node("C").unwrap();
        let a = small.find_node("A").unwrap();
        assert!(small.insert_edge(a, foreign).is_err());
        assert!(small.neighbours(a).unwrap().is_empty());
    }

    #[test]
    fn test_seen_flags() {
        let mut g = graph_with(&["A", "B"]);
        let a = g.find_node("A").unwrap();
        let b = g.find_node("B").unwrap();
        g.set_seen(a, true).unwrap();
        assert!(g.is_seen(a).unwrap());
        assert!(!g.is_seen(b).unwrap());

        g.reset_seen();
        assert!(!g.is_seen(a).unwrap());
        g.reset_seen();
        assert!(g.nodes().all(|n| !g.is_seen(n).unwrap()));
    }

    #[test]
    fn test_choose_node_returns_member() {
        let mut g = graph_with(&["A", "B"]);
        let picked = g.choose_node().unwrap();
        assert!(g.contains(picked));
        g.delete_node(picked).unwrap();
        let next = g.choose_node().unwrap();
        assert_ne!(next, picked);
        g.delete_node(next).unwrap();
        assert_eq!(g.choose_node(), None);
        assert!(g.is_empty());
    }

    #[test]
    fn test_reinsert_after_delete() {
        let mut g = graph_with(&["A", "B"]);
        let a = g.find_node("A").unwrap();
        g.delete_node(a).unwrap();
        let a2 = g.insert_node("A").unwrap();
        assert_eq!(g.find_node("A").unwrap(), a2);
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.nodes().count(), 2);
    }
}
