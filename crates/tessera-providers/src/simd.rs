//! Vectorized CPU provider.

use crate::fusion::FusionMatcher;
use crate::kernels::SimdElementwiseFactory;
use std::collections::BTreeSet;
use tessera_core::{
    CapabilityMatcher, ComputeCapability, DeviceHandle, ExecutionProvider, KernelRegistry,
    KernelSignature, Result,
};
use tessera_graph::{DataType, GraphView, NodeId};

/// Elementwise operators the vectorized path implements.
const SIMD_OPERATORS: &[&str] = &[
    "Add", "Sub", "Mul", "Div", "Relu", "Sigmoid", "Tanh", "Exp", "Sqrt",
];

/// Vectorized CPU provider for f32 elementwise work.
///
/// Registers the elementwise subset with an f32 input constraint and fuses
/// adjacent eligible nodes into chain capabilities, so a run of activations
/// dispatches as one region instead of per-node round trips.
pub struct SimdCpuProvider {
    registry: KernelRegistry,
    matcher: FusionMatcher,
}

impl SimdCpuProvider {
    /// Create the provider and populate its registry.
    pub fn new() -> Result<Self> {
        let mut registry = KernelRegistry::new();
        for op in SIMD_OPERATORS {
            registry.register(
                KernelSignature::new(*op).input_type(0, &[DataType::F32]),
                SimdElementwiseFactory,
            )?;
        }

        Ok(Self {
            registry,
            matcher: FusionMatcher::new(),
        })
    }
}

impl ExecutionProvider for SimdCpuProvider {
    fn name(&self) -> &str {
        "simd-cpu"
    }

    fn kernel_registry(&self) -> &KernelRegistry {
        &self.registry
    }

    fn capabilities(
        &self,
        view: &GraphView<'_>,
        unassigned: &BTreeSet<NodeId>,
    ) -> Vec<ComputeCapability> {
        self.matcher.propose(view, &self.registry, unassigned)
    }

    fn device_handle(&self) -> Option<DeviceHandle> {
        // Same host memory as the reference provider.
        Some(DeviceHandle::from_raw(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_graph::{Graph, Node, TensorShape, ValueInfo, ValueKind};

    #[test]
    fn test_skips_non_float_inputs() {
        let mut graph = Graph::new();
        let x = graph.add_value(ValueInfo {
            name: "x".to_string(),
            dtype: DataType::I64,
            shape: TensorShape::Static(vec![4]),
            kind: ValueKind::Input,
        });
        let y = graph.add_value(ValueInfo {
            name: "y".to_string(),
            dtype: DataType::I64,
            shape: TensorShape::Static(vec![4]),
            kind: ValueKind::Output,
        });
        let mut node = Node::new("Add");
        node.inputs = vec![x];
        node.outputs = vec![y];
        graph.add_node(node).unwrap();

        let provider = SimdCpuProvider::new().unwrap();
        let view = GraphView::new(&graph);
        let unassigned: BTreeSet<NodeId> = [0].into_iter().collect();

        assert!(provider.capabilities(&view, &unassigned).is_empty());
    }

    #[test]
    fn test_not_a_fallback() {
        let provider = SimdCpuProvider::new().unwrap();
        assert!(!provider.is_universal_fallback());
        assert!(provider.requires_contiguous_capabilities());
    }
}
