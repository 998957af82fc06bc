//! Graph partitioner for the tessera execution core.
//!
//! Given an immutable graph and an ordered list of execution providers
//! (index 0 = highest priority), the partitioner resolves overlapping
//! capability proposals into a disjoint cover of the graph, binds each
//! node to a kernel, and produces an immutable [`DispatchTable`] for the
//! executor.
//!
//! # Example
//!
//! ```no_run
//! use tessera_partition::partition;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let graph = tessera_graph::Graph::new();
//! # let providers = Vec::new();
//! let table = partition(&graph, providers)?;
//! for (node, entry) in table.entries() {
//!     println!("node {node} -> {}", entry.provider);
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod partitioner;
pub mod table;

pub use error::{PartitionError, Result};
pub use partitioner::Partitioner;
pub use table::{BoundaryTransfer, DispatchEntry, DispatchTable, Subgraph};

use tessera_core::ExecutionProvider;
use tessera_graph::Graph;

/// Partition a graph across an ordered provider list.
///
/// The sole externally invoked entry point: validates the provider set
/// (fallback claim and baseline coverage), then runs the partitioning pass.
/// Returns a dispatch table total over every node, or a fatal
/// [`PartitionError`] — never a partial table.
pub fn partition(
    graph: &Graph,
    providers: Vec<Box<dyn ExecutionProvider>>,
) -> Result<DispatchTable> {
    Partitioner::new(providers)?.partition(graph)
}
