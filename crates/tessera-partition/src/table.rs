//! Dispatch table: the partitioner's output.
//!
//! Immutable after construction. Maps every node to its owning provider and
//! bound kernel instance, and records the subgraph structure the executor
//! needs for scheduling and cross-provider transfers.

use std::collections::HashMap;
use std::sync::Arc;
use tessera_core::{DeviceHandle, OpKernel};
use tessera_graph::{NodeId, ValueId};

/// One node's assignment: owning provider and bound kernel.
#[derive(Clone)]
pub struct DispatchEntry {
    /// Index of the owning provider in the active provider list
    /// (0 = highest priority).
    pub provider_index: usize,

    /// Owning provider's name.
    pub provider: String,

    /// Device identity of the owning provider, if it exposes one.
    pub device: Option<DeviceHandle>,

    /// The kernel instance bound to this node.
    pub kernel: Arc<dyn OpKernel>,
}

/// A materialized region of the graph assigned to one provider.
#[derive(Debug, Clone)]
pub struct Subgraph {
    /// Index of the owning provider.
    pub provider_index: usize,

    /// Owning provider's name.
    pub provider: String,

    /// Nodes in this subgraph, in topological order.
    pub nodes: Vec<NodeId>,

    /// Boundary input values (produced outside this subgraph).
    pub inputs: Vec<ValueId>,

    /// Boundary output values (consumed outside this subgraph, or graph
    /// outputs).
    pub outputs: Vec<ValueId>,

    /// Indices of subgraphs this one depends on. Subgraphs with disjoint
    /// dependency sets may be executed concurrently by the executor.
    pub depends_on: Vec<usize>,
}

/// A value crossing a provider boundary.
///
/// The executor inserts a device-memory transfer for each of these; the
/// partitioner only records where one is required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryTransfer {
    /// The value being transferred.
    pub value: ValueId,

    /// Name of the provider producing the value.
    pub producer: String,

    /// Name of the provider consuming the value.
    pub consumer: String,
}

/// Immutable mapping from node identity to (provider, kernel), plus the
/// subgraph structure the executor schedules against.
///
/// Totality: after a successful partition, every node in the graph has
/// exactly one entry.
#[derive(Default)]
pub struct DispatchTable {
    entries: HashMap<NodeId, DispatchEntry>,
    subgraphs: Vec<Subgraph>,
    boundary_transfers: Vec<BoundaryTransfer>,
}

impl DispatchTable {
    pub(crate) fn new(
        entries: HashMap<NodeId, DispatchEntry>,
        subgraphs: Vec<Subgraph>,
        boundary_transfers: Vec<BoundaryTransfer>,
    ) -> Self {
        Self {
            entries,
            subgraphs,
            boundary_transfers,
        }
    }

    /// Resolve a node to its assignment.
    ///
    /// Total over all node IDs of the partitioned graph; `None` only for
    /// IDs that were never part of that graph.
    pub fn resolve(&self, node: NodeId) -> Option<&DispatchEntry> {
        self.entries.get(&node)
    }

    /// Name of the provider a node is assigned to.
    pub fn provider_of(&self, node: NodeId) -> Option<&str> {
        self.entries.get(&node).map(|e| e.provider.as_str())
    }

    /// The materialized subgraphs, in acceptance order.
    pub fn subgraphs(&self) -> &[Subgraph] {
        &self.subgraphs
    }

    /// Values that cross provider boundaries.
    pub fn boundary_transfers(&self) -> &[BoundaryTransfer] {
        &self.boundary_transfers
    }

    /// Number of assigned nodes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all (node, entry) pairs in unspecified order.
    pub fn entries(&self) -> impl Iterator<Item = (NodeId, &DispatchEntry)> {
        self.entries.iter().map(|(&id, entry)| (id, entry))
    }

    /// Per-provider node counts, for logging.
    pub fn provider_node_counts(&self) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for entry in self.entries.values() {
            *counts.entry(entry.provider.clone()).or_insert(0) += 1;
        }
        counts
    }
}

impl std::fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchTable")
            .field("entries", &self.entries)
            .field("subgraphs", &self.subgraphs)
            .field("boundary_transfers", &self.boundary_transfers)
            .finish()
    }
}

impl std::fmt::Debug for DispatchEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchEntry")
            .field("provider", &self.provider)
            .field("provider_index", &self.provider_index)
            .field("device", &self.device)
            .field("kernel", &self.kernel.op_type())
            .finish()
    }
}
