//! Graph data model for the tessera execution core.
//!
//! This crate provides the computation graph that the partitioner operates
//! on, along with the read-only [`GraphView`] interface the rest of the
//! system consumes:
//! - `Graph`, `Node`, `ValueInfo` — the directed acyclic structure of
//!   operator nodes connected by named tensor values
//! - `GraphView` — immutable traversal (nodes, producers, consumers,
//!   attributes, shape/type info), the only surface providers ever see
//! - `DataType`, `TensorShape` — tensor metadata
//!
//! The graph is immutable during partitioning: providers and the
//! partitioner only hold a `GraphView`, which exposes no mutation.

pub mod graph;
pub mod types;
pub mod view;

pub use graph::{AttributeValue, Graph, GraphMetadata, Node, NodeId, ValueId, ValueInfo, ValueKind};
pub use types::{DataType, Dimension, TensorShape};
pub use view::GraphView;

/// Result type using the crate's error type.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors arising from graph construction and validation.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Invalid graph structure: {0}")]
    InvalidGraph(String),

    #[error("Value '{0}' not found")]
    MissingValue(String),

    #[error("Node {0} not found")]
    MissingNode(usize),

    #[error("Missing attribute '{0}'")]
    MissingAttribute(String),

    #[error("Attribute type mismatch: expected {expected}, got {actual}")]
    AttributeTypeMismatch { expected: String, actual: String },

    #[error("Graph contains a cycle")]
    CyclicGraph,
}
