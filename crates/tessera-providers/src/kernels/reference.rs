//! Reference CPU kernels.
//!
//! The reference backend executes every baseline operator through a single
//! generic scalar interpreter, so one kernel type covers the whole registry.
//! Construction never rejects a node — the reference path is the safety net
//! the fallback guarantee rests on.

use tessera_core::{KernelFactory, OpKernel, Result};
use tessera_graph::{GraphView, Node};

/// Generic scalar-loop kernel for the reference CPU backend.
#[derive(Debug)]
pub struct ReferenceKernel {
    op_type: String,
    label: String,
}

impl OpKernel for ReferenceKernel {
    fn op_type(&self) -> &str {
        &self.op_type
    }

    fn label(&self) -> &str {
        &self.label
    }
}

/// Factory for [`ReferenceKernel`].
pub struct ReferenceFactory;

impl KernelFactory for ReferenceFactory {
    fn create(&self, node: &Node, _view: &GraphView<'_>) -> Result<Box<dyn OpKernel>> {
        Ok(Box::new(ReferenceKernel {
            op_type: node.op_type.clone(),
            label: format!("ref::{}", node.op_type),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_graph::Graph;

    #[test]
    fn test_construction_is_infallible() {
        let graph = Graph::new();
        let view = GraphView::new(&graph);

        let mut node = Node::new("Softmax");
        node.version = 13;
        let kernel = ReferenceFactory.create(&node, &view).unwrap();
        assert_eq!(kernel.op_type(), "Softmax");
        assert_eq!(kernel.label(), "ref::Softmax");
    }
}
