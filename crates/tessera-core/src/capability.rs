//! Compute capabilities: a provider's claim over a node set.

use std::collections::{BTreeSet, HashMap};
use tessera_graph::{GraphView, NodeId, Result, ValueId};

/// A set of nodes one provider proposes to execute as a unit.
///
/// Created by a capability matcher, consumed by the partitioner, never
/// mutated after creation. Carries the boundary values of the proposed
/// region and, optionally, pre-resolved kernel bindings (registry entry
/// indices) so the partitioner can skip a second registry lookup.
#[derive(Debug, Clone)]
pub struct ComputeCapability {
    /// Node IDs the provider claims, in ascending order.
    pub nodes: Vec<NodeId>,

    /// Boundary inputs: values consumed inside the region but produced
    /// outside it (or graph inputs / initializers).
    pub inputs: Vec<ValueId>,

    /// Boundary outputs: values produced inside the region and consumed
    /// outside it, or graph outputs.
    pub outputs: Vec<ValueId>,

    /// Pre-resolved kernel bindings: node ID -> registry entry index in the
    /// proposing provider's registry. May be empty; the partitioner then
    /// resolves kernels via a direct registry lookup.
    pub bindings: HashMap<NodeId, usize>,
}

impl ComputeCapability {
    /// Build a capability from a node set, computing boundary values from
    /// the graph view.
    pub fn from_nodes(view: &GraphView<'_>, nodes: &BTreeSet<NodeId>) -> Result<Self> {
        let mut inputs = Vec::new();
        let mut outputs = Vec::new();
        let mut seen_inputs = BTreeSet::new();
        let mut seen_outputs = BTreeSet::new();

        let graph_outputs: BTreeSet<ValueId> = view.outputs().iter().copied().collect();

        for &id in nodes {
            let node = view.node(id)?;

            for &value in &node.inputs {
                let produced_inside = view
                    .producer(value)
                    .is_some_and(|p| nodes.contains(&p));
                if !produced_inside && seen_inputs.insert(value) {
                    inputs.push(value);
                }
            }

            for &value in &node.outputs {
                let consumed_outside = view
                    .consumers(value)
                    .iter()
                    .any(|c| !nodes.contains(c));
                if (consumed_outside || graph_outputs.contains(&value))
                    && seen_outputs.insert(value)
                {
                    outputs.push(value);
                }
            }
        }

        Ok(Self {
            nodes: nodes.iter().copied().collect(),
            inputs,
            outputs,
            bindings: HashMap::new(),
        })
    }

    /// Build a single-node capability with a pre-resolved kernel binding.
    pub fn single(view: &GraphView<'_>, node: NodeId, entry_index: usize) -> Result<Self> {
        let set = BTreeSet::from([node]);
        let mut capability = Self::from_nodes(view, &set)?;
        capability.bindings.insert(node, entry_index);
        Ok(capability)
    }

    /// Attach a pre-resolved kernel binding for a node in this capability.
    pub fn bind(mut self, node: NodeId, entry_index: usize) -> Self {
        self.bindings.insert(node, entry_index);
        self
    }

    /// Number of nodes in this capability.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the capability is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
