//! Fusing capability matcher for elementwise chains.
//!
//! Greedily grows capabilities along single-consumer value edges: starting
//! from the lowest unassigned node the registry supports, the matcher
//! follows each node's sole output while the sole consumer is also
//! unassigned and supported, then emits the whole chain as one capability.
//!
//! The walk is deterministic (ascending start order, greedy forward
//! extension) and the emitted proposals are disjoint by construction: every
//! chain member is marked visited and never reconsidered.

use std::collections::{BTreeSet, HashMap};
use tessera_core::{CapabilityMatcher, ComputeCapability, KernelRegistry};
use tessera_graph::{GraphView, NodeId};

/// Matcher that fuses chains of elementwise operations.
#[derive(Debug, Default)]
pub struct FusionMatcher;

impl FusionMatcher {
    /// Create a new fusion matcher.
    pub fn new() -> Self {
        Self
    }

    /// Extend a chain from `start`, returning members with their resolved
    /// registry entry indices.
    fn grow_chain(
        &self,
        view: &GraphView<'_>,
        registry: &KernelRegistry,
        unassigned: &BTreeSet<NodeId>,
        visited: &BTreeSet<NodeId>,
        start: NodeId,
        start_entry: usize,
    ) -> (BTreeSet<NodeId>, HashMap<NodeId, usize>) {
        let mut members = BTreeSet::from([start]);
        let mut bindings = HashMap::from([(start, start_entry)]);
        let mut current = start;

        loop {
            let Ok(node) = view.node(current) else {
                break;
            };

            // Fusion only continues through a single output with a single
            // consumer; a fan-out ends the chain.
            let [output] = node.outputs.as_slice() else {
                break;
            };
            let [next] = view.consumers(*output) else {
                break;
            };
            let next = *next;

            if members.contains(&next)
                || visited.contains(&next)
                || !unassigned.contains(&next)
            {
                break;
            }
            let Ok(next_node) = view.node(next) else {
                break;
            };
            let Some(entry) = registry.resolve_index(next_node, view) else {
                break;
            };

            members.insert(next);
            bindings.insert(next, entry);
            current = next;
        }

        (members, bindings)
    }
}

impl CapabilityMatcher for FusionMatcher {
    fn propose(
        &self,
        view: &GraphView<'_>,
        registry: &KernelRegistry,
        unassigned: &BTreeSet<NodeId>,
    ) -> Vec<ComputeCapability> {
        let mut proposals = Vec::new();
        let mut visited: BTreeSet<NodeId> = BTreeSet::new();

        for &start in unassigned {
            if visited.contains(&start) {
                continue;
            }
            let Ok(node) = view.node(start) else {
                continue;
            };
            let Some(entry) = registry.resolve_index(node, view) else {
                continue;
            };

            let (members, bindings) =
                self.grow_chain(view, registry, unassigned, &visited, start, entry);
            visited.extend(members.iter().copied());

            match ComputeCapability::from_nodes(view, &members) {
                Ok(mut capability) => {
                    capability.bindings = bindings;
                    proposals.push(capability);
                }
                Err(_) => continue,
            }
        }

        proposals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::{KernelFactory, KernelSignature, OpKernel};
    use tessera_graph::{DataType, Graph, Node, TensorShape, ValueInfo, ValueKind};

    struct MockKernel;
    impl OpKernel for MockKernel {
        fn op_type(&self) -> &str {
            "Mock"
        }
    }

    struct MockFactory;
    impl KernelFactory for MockFactory {
        fn create(
            &self,
            _node: &Node,
            _view: &GraphView<'_>,
        ) -> tessera_core::Result<Box<dyn OpKernel>> {
            Ok(Box::new(MockKernel))
        }
    }

    fn registry_for(ops: &[&str]) -> KernelRegistry {
        let mut registry = KernelRegistry::new();
        for op in ops {
            registry
                .register(KernelSignature::new(*op), MockFactory)
                .unwrap();
        }
        registry
    }

    fn value(name: &str, kind: ValueKind) -> ValueInfo {
        ValueInfo {
            name: name.to_string(),
            dtype: DataType::F32,
            shape: TensorShape::Static(vec![8]),
            kind,
        }
    }

    /// x -> Relu -> Sigmoid -> Tanh -> y, all fusable.
    fn chain_graph() -> Graph {
        let mut graph = Graph::new();
        let x = graph.add_value(value("x", ValueKind::Input));
        let t0 = graph.add_value(value("t0", ValueKind::Intermediate));
        let t1 = graph.add_value(value("t1", ValueKind::Intermediate));
        let y = graph.add_value(value("y", ValueKind::Output));
        graph.inputs = vec![x];
        graph.outputs = vec![y];

        for (op, input, output) in [("Relu", x, t0), ("Sigmoid", t0, t1), ("Tanh", t1, y)] {
            let mut node = Node::new(op);
            node.inputs = vec![input];
            node.outputs = vec![output];
            graph.add_node(node).unwrap();
        }

        graph
    }

    #[test]
    fn test_fuses_whole_chain() {
        let graph = chain_graph();
        let view = GraphView::new(&graph);
        let registry = registry_for(&["Relu", "Sigmoid", "Tanh"]);

        let unassigned: BTreeSet<NodeId> = (0..3).collect();
        let proposals = FusionMatcher::new().propose(&view, &registry, &unassigned);

        assert_eq!(proposals.len(), 1);
        assert_eq!(proposals[0].nodes, vec![0, 1, 2]);
        assert_eq!(proposals[0].bindings.len(), 3);
    }

    #[test]
    fn test_unsupported_middle_splits_chain() {
        let graph = chain_graph();
        let view = GraphView::new(&graph);
        // Sigmoid missing from the registry
        let registry = registry_for(&["Relu", "Tanh"]);

        let unassigned: BTreeSet<NodeId> = (0..3).collect();
        let proposals = FusionMatcher::new().propose(&view, &registry, &unassigned);

        let node_sets: Vec<_> = proposals.iter().map(|c| c.nodes.clone()).collect();
        assert_eq!(node_sets, vec![vec![0], vec![2]]);
    }

    #[test]
    fn test_assigned_node_breaks_chain() {
        let graph = chain_graph();
        let view = GraphView::new(&graph);
        let registry = registry_for(&["Relu", "Sigmoid", "Tanh"]);

        // Middle node already assigned elsewhere
        let unassigned: BTreeSet<NodeId> = [0, 2].into_iter().collect();
        let proposals = FusionMatcher::new().propose(&view, &registry, &unassigned);

        let node_sets: Vec<_> = proposals.iter().map(|c| c.nodes.clone()).collect();
        assert_eq!(node_sets, vec![vec![0], vec![2]]);
    }

    #[test]
    fn test_proposals_are_disjoint_and_deterministic() {
        let graph = chain_graph();
        let view = GraphView::new(&graph);
        let registry = registry_for(&["Relu", "Sigmoid", "Tanh"]);
        let unassigned: BTreeSet<NodeId> = (0..3).collect();

        let first = FusionMatcher::new().propose(&view, &registry, &unassigned);
        let second = FusionMatcher::new().propose(&view, &registry, &unassigned);

        let sets = |caps: &[ComputeCapability]| -> Vec<Vec<NodeId>> {
            caps.iter().map(|c| c.nodes.clone()).collect()
        };
        assert_eq!(sets(&first), sets(&second));

        let mut all = BTreeSet::new();
        for cap in &first {
            for &n in &cap.nodes {
                assert!(all.insert(n));
            }
        }
    }
}
