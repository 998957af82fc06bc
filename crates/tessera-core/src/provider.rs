//! Execution provider trait and device identity.

use crate::capability::ComputeCapability;
use crate::registry::KernelRegistry;
use std::collections::BTreeSet;
use tessera_graph::{GraphView, NodeId};

/// Opaque device/allocator identity reported by a provider.
///
/// The executor uses it to route memory allocation and cross-device
/// transfers; the core never interprets its contents. Some backends
/// intentionally expose no handle (their underlying interface returns
/// nothing useful), which is why [`ExecutionProvider::device_handle`]
/// yields an `Option`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceHandle(u64);

impl DeviceHandle {
    /// Wrap a raw backend-defined token.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw token back out.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// A hardware backend: one capability matcher, one kernel registry, device
/// identity, and (by position in the active provider list) a priority.
///
/// Providers outlive a partitioning pass and may be reused across sessions.
/// They only ever see the graph through a read-only [`GraphView`].
pub trait ExecutionProvider: Send + Sync {
    /// Unique provider name (e.g. "cpu", "simd-cpu", "npu").
    fn name(&self) -> &str;

    /// The provider's kernel registry.
    fn kernel_registry(&self) -> &KernelRegistry;

    /// Propose capabilities over the unassigned portion of the graph.
    ///
    /// Implementations delegate to their capability matcher with their own
    /// registry; the contract of [`crate::CapabilityMatcher`] applies.
    fn capabilities(
        &self,
        view: &GraphView<'_>,
        unassigned: &BTreeSet<NodeId>,
    ) -> Vec<ComputeCapability>;

    /// Opaque device/allocator identity, if this backend exposes one.
    fn device_handle(&self) -> Option<DeviceHandle> {
        None
    }

    /// Whether this backend's execution model requires multi-node
    /// capabilities to be connected regions.
    ///
    /// The partitioner verifies connectivity of multi-node proposals when
    /// this is true and treats a violation as a matcher contract error.
    fn requires_contiguous_capabilities(&self) -> bool {
        true
    }

    /// Whether this provider claims to execute every baseline operator.
    ///
    /// The lowest-priority provider in an active set must claim this, and
    /// its registry is verified against the baseline operator set at
    /// session construction.
    fn is_universal_fallback(&self) -> bool {
        false
    }
}
