//! graph-reach-core: a small labeled undirected graph with BFS reachability.
//!
//! Nodes are identified by short unique names and live in a capacity-bounded
//! arena owned by the [`Graph`]. Adjacency is a per-node neighbour list of
//! non-owning [`NodeId`] handles, and every node carries a seen flag that the
//! breadth-first connectivity query uses as its visited set.

mod error;
mod graph;
mod matrix;
mod traversal;

pub use error::{GraphError, Result};
pub use graph::{is_valid_name, Graph, NodeId, MAX_NAME_LEN};
pub use matrix::AdjacencyMatrix;
pub use traversal::{is_reachable, mark_reachable, shortest_path, Traversal};
