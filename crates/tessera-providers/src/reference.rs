//! Reference CPU provider: the universal fallback.

use crate::kernels::ReferenceFactory;
use std::collections::BTreeSet;
use tessera_core::{
    CapabilityMatcher, ComputeCapability, DeviceHandle, ExecutionProvider, KernelRegistry,
    KernelSignature, RegistryMatcher, Result, BASELINE_OPERATORS,
};
use tessera_graph::{GraphView, NodeId};

/// Scalar CPU provider covering the complete baseline operator set.
///
/// Always placed last in the active provider list; its coverage is what
/// makes partitioning total. Proposes one node at a time via the reference
/// matcher — no fusion, no constraints.
pub struct ReferenceCpuProvider {
    registry: KernelRegistry,
    matcher: RegistryMatcher,
}

impl ReferenceCpuProvider {
    /// Create the provider and populate its registry with every baseline
    /// operator.
    pub fn new() -> Result<Self> {
        let mut registry = KernelRegistry::new();
        for op in BASELINE_OPERATORS {
            registry.register(KernelSignature::new(*op), ReferenceFactory)?;
        }

        Ok(Self {
            registry,
            matcher: RegistryMatcher::new(),
        })
    }
}

impl ExecutionProvider for ReferenceCpuProvider {
    fn name(&self) -> &str {
        "cpu"
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
        // Host memory; token 0 is the allocator's convention for it.
        Some(DeviceHandle::from_raw(0))
    }

    fn is_universal_fallback(&self) -> bool {
        true
    }
}
