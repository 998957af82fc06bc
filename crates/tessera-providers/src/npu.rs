//! NPU provider.

use crate::kernels::{NpuConvFactory, NpuMatMulFactory};
use std::collections::BTreeSet;
use tessera_core::{
    CapabilityMatcher, ComputeCapability, DeviceHandle, ExecutionProvider, KernelRegistry,
    KernelSignature, RegistryMatcher, Result,
};
use tessera_graph::{DataType, GraphView, NodeId};

/// Accelerator provider for convolution and matrix-product workloads.
///
/// Supports f32 `Conv` and `MatMul` only; everything else falls through to
/// lower-priority providers. The driver's execution interface does not
/// return anything useful as a handle, so `device_handle` is `None` — the
/// executor routes transfers purely from the boundary records.
pub struct NpuProvider {
    registry: KernelRegistry,
    matcher: RegistryMatcher,
}

impl NpuProvider {
    /// Create the provider and populate its registry.
    pub fn new() -> Result<Self> {
        let mut registry = KernelRegistry::new();
        registry.register(
            KernelSignature::new("Conv").input_type(0, &[DataType::F32]),
            NpuConvFactory,
        )?;
        registry.register(
            KernelSignature::new("MatMul").input_type(0, &[DataType::F32]),
            NpuMatMulFactory,
        )?;

        Ok(Self {
            registry,
            matcher: RegistryMatcher::new(),
        })
    }
}

impl ExecutionProvider for NpuProvider {
    fn name(&self) -> &str {
        "npu"
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
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_scope() {
        let provider = NpuProvider::new().unwrap();
        assert!(provider.kernel_registry().covers("Conv", ""));
        assert!(provider.kernel_registry().covers("MatMul", ""));
        assert!(!provider.kernel_registry().covers("Add", ""));
    }

    #[test]
    fn test_no_device_handle() {
        let provider = NpuProvider::new().unwrap();
        assert!(provider.device_handle().is_none());
        assert!(!provider.is_universal_fallback());
    }
}
