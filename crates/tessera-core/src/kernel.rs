//! Kernel traits: the seam between partitioning and execution.
//!
//! The partitioner binds every node to an [`OpKernel`] instance via a
//! [`KernelFactory`] before the dispatch table is handed to the executor.
//! The numeric implementation behind a kernel is the executor's concern;
//! from this crate's perspective a kernel is an opaque runnable object
//! constructed once per node.

use crate::Result;
use tessera_graph::{GraphView, Node};

/// A concrete runnable implementation of one operator for one backend.
///
/// Kernel instances are created at partition time and stored in the
/// dispatch table. They are immutable and shared (`Send + Sync`), so the
/// executor may invoke independent kernels concurrently.
pub trait OpKernel: Send + Sync {
    /// The operator type this kernel implements (e.g. "Add", "Conv").
    fn op_type(&self) -> &str;

    /// Backend-specific label for logging and profiling.
    ///
    /// Defaults to the operator type.
    fn label(&self) -> &str {
        self.op_type()
    }
}

impl std::fmt::Debug for dyn OpKernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpKernel")
            .field("op_type", &self.op_type())
            .field("label", &self.label())
            .finish()
    }
}

/// Factory producing kernel instances for matched registry entries.
///
/// Construction may fail (unsupported attribute combination, runtime
/// configuration the backend cannot handle). The partitioner treats such a
/// failure as a proposal rejection, not a fatal error: the node stays
/// unassigned and a lower-priority provider gets a chance to claim it.
pub trait KernelFactory: Send + Sync {
    /// Create a kernel instance for a node.
    ///
    /// The node has already passed the registry's signature match; the
    /// factory performs any remaining attribute/shape validation.
    fn create(&self, node: &Node, view: &GraphView<'_>) -> Result<Box<dyn OpKernel>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CoreError;

    struct NoopKernel;
    impl OpKernel for NoopKernel {
        fn op_type(&self) -> &str {
            "Noop"
        }
    }

    struct FailingFactory;
    impl KernelFactory for FailingFactory {
        fn create(&self, node: &Node, _view: &GraphView<'_>) -> Result<Box<dyn OpKernel>> {
            Err(CoreError::kernel_construction(&node.op_type, "always fails"))
        }
    }

    #[test]
    fn test_kernel_trait_object() {
        let kernel: Box<dyn OpKernel> = Box::new(NoopKernel);
        assert_eq!(kernel.op_type(), "Noop");
        assert_eq!(kernel.label(), "Noop");
    }

    #[test]
    fn test_factory_failure_carries_op_type() {
        let graph = tessera_graph::Graph::new();
        let view = GraphView::new(&graph);
        let node = Node::new("Gemm");

        let err = FailingFactory.create(&node, &view).unwrap_err();
        match err {
            CoreError::KernelConstruction { op_type, .. } => assert_eq!(op_type, "Gemm"),
            e => panic!("expected KernelConstruction, got {e:?}"),
        }
    }
}
