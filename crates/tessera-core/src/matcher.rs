//! Capability matcher contract and the reference single-node matcher.

use crate::capability::ComputeCapability;
use crate::registry::KernelRegistry;
use std::collections::BTreeSet;
use tessera_graph::{GraphView, NodeId};

/// Proposes node groups a backend can execute.
///
/// Contract:
/// - Side-effect free: proposing mutates nothing and commits nothing.
/// - Deterministic: the same graph and unassigned set yield the same
///   proposals in the same order.
/// - Never proposes a node outside `unassigned`.
/// - Proposals within one call are internally disjoint (the partitioner
///   treats a violation as fatal).
/// - When the backend's execution model requires contiguous regions,
///   every multi-node proposal is connected.
pub trait CapabilityMatcher: Send + Sync {
    /// Propose capabilities over the unassigned portion of the graph.
    fn propose(
        &self,
        view: &GraphView<'_>,
        registry: &KernelRegistry,
        unassigned: &BTreeSet<NodeId>,
    ) -> Vec<ComputeCapability>;
}

/// Reference matcher: one single-node capability per supported node.
///
/// Walks the unassigned set in ascending node order and proposes every node
/// the registry resolves, carrying the resolved entry index as a
/// pre-resolved kernel binding. No fusion.
#[derive(Debug, Default)]
pub struct RegistryMatcher;

impl RegistryMatcher {
    /// Create a new registry matcher.
    pub fn new() -> Self {
        Self
    }
}

impl CapabilityMatcher for RegistryMatcher {
    fn propose(
        &self,
        view: &GraphView<'_>,
        registry: &KernelRegistry,
        unassigned: &BTreeSet<NodeId>,
    ) -> Vec<ComputeCapability> {
        let mut proposals = Vec::new();

        for &id in unassigned {
            let Ok(node) = view.node(id) else {
                continue;
            };
            let Some(entry_index) = registry.resolve_index(node, view) else {
                continue;
            };
            if let Ok(capability) = ComputeCapability::single(view, id, entry_index) {
                proposals.push(capability);
            }
        }

        proposals
    }
}
