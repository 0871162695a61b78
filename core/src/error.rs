use thiserror::Error;

use crate::graph::NodeId;

/// Errors reported by graph operations.
///
/// Every variant is recoverable: the operation that produced it leaves the
/// graph exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("graph capacity must be at least 1")]
    InvalidCapacity,

    #[error("graph is full (capacity {capacity})")]
    CapacityExceeded { capacity: usize },

    #[error("a node named '{0}' already exists")]
    DuplicateName(String),

    #[error("invalid node name '{0}'")]
    InvalidName(String),

    #[error("node '{0}' not found")]
    NodeNotFound(String),

    #[error("edge {from} -- {to} already exists")]
    EdgeAlreadyExists { from: NodeId, to: NodeId },

    #[error("edge {from} -- {to} does not exist")]
    EdgeNotFound { from: NodeId, to: NodeId },

    #[error("{0} does not belong to this graph")]
    InvalidPrecondition(NodeId),
}

impl GraphError {
    /// True for redundant edge operations (asserting an edge twice, or
    /// retracting one that is not there). Callers usually log and move on.
    pub fn is_benign(&self) -> bool {
        matches!(
            self,
            GraphError::EdgeAlreadyExists { .. } | GraphError::EdgeNotFound { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, GraphError>;
