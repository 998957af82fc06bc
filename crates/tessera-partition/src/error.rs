//! Error types for the partition crate.

use tessera_graph::NodeId;
use thiserror::Error;

/// Partitioning errors.
///
/// Every variant is fatal to the pass except as noted: kernel construction
/// failures are recovered locally (the proposal is demoted to rejected) and
/// only surface as [`PartitionError::UnsupportedOperator`] when they leave a
/// node permanently unassigned at termination.
#[derive(Debug, Error)]
pub enum PartitionError {
    /// The active provider set is empty.
    #[error("no execution providers supplied")]
    EmptyProviderSet,

    /// The lowest-priority provider does not claim universal fallback.
    #[error("provider set has no universal fallback: lowest-priority provider '{0}' does not claim full operator coverage")]
    NoUniversalFallback(String),

    /// The designated fallback does not register every baseline operator.
    #[error("fallback provider '{provider}' is missing baseline operators: {missing:?}")]
    FallbackCoverageGap {
        provider: String,
        missing: Vec<String>,
    },

    /// A matcher proposed overlapping or disconnected-when-required node
    /// sets within its own round.
    #[error("matcher contract violation by provider '{provider}': {detail}")]
    MatcherContractViolation { provider: String, detail: String },

    /// No provider, including the fallback, can execute a node.
    #[error("unsupported operator '{op_type}' on node {node_id} ('{node_name}'): no provider can execute it")]
    UnsupportedOperator {
        node_id: NodeId,
        node_name: String,
        op_type: String,
    },

    /// Graph structure error surfaced during partitioning.
    #[error(transparent)]
    Graph(#[from] tessera_graph::GraphError),

    /// Provider-level error surfaced during partitioning.
    #[error(transparent)]
    Core(#[from] tessera_core::CoreError),
}

/// Specialized Result type for partitioning.
pub type Result<T> = std::result::Result<T, PartitionError>;
