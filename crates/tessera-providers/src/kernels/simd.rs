//! Vectorized CPU elementwise kernels.
//!
//! The SIMD backend batches elementwise work over contiguous f32 buffers,
//! which requires every operand shape to be fully static at partition time.
//! A node with a dynamic or unknown shape fails kernel construction and is
//! demoted back to a lower-priority provider.

use tessera_core::{CoreError, KernelFactory, OpKernel, Result};
use tessera_graph::{GraphView, Node};

/// Vectorized elementwise kernel (unary or binary).
#[derive(Debug)]
pub struct SimdElementwiseKernel {
    op_type: String,
    label: String,

    /// Total element count, fixed at partition time.
    pub num_elements: usize,
}

impl OpKernel for SimdElementwiseKernel {
    fn op_type(&self) -> &str {
        &self.op_type
    }

    fn label(&self) -> &str {
        &self.label
    }
}

/// Factory for [`SimdElementwiseKernel`].
///
/// Construction requires every input and output shape to be static; the
/// vector width and trip count are baked into the kernel instance.
pub struct SimdElementwiseFactory;

impl KernelFactory for SimdElementwiseFactory {
    fn create(&self, node: &Node, view: &GraphView<'_>) -> Result<Box<dyn OpKernel>> {
        let mut num_elements = 0usize;

        for &value_id in node.inputs.iter().chain(node.outputs.iter()) {
            let info = view.value(value_id)?;
            let Some(dims) = info.shape.as_static() else {
                return Err(CoreError::kernel_construction(
                    &node.op_type,
                    format!("operand '{}' does not have a static shape", info.name),
                ));
            };
            let count = dims
                .iter()
                .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
                .ok_or_else(|| {
                    CoreError::kernel_construction(
                        &node.op_type,
                        format!("element count of operand '{}' overflows", info.name),
                    )
                })?;
            num_elements = num_elements.max(count);
        }

        Ok(Box::new(SimdElementwiseKernel {
            label: format!("simd::{}", node.op_type),
            op_type: node.op_type.clone(),
            num_elements,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_graph::{
        DataType, Dimension, Graph, TensorShape, ValueInfo, ValueKind,
    };

    fn graph_with_shape(shape: TensorShape) -> (Graph, Node) {
        let mut graph = Graph::new();
        let x = graph.add_value(ValueInfo {
            name: "x".to_string(),
            dtype: DataType::F32,
            shape: shape.clone(),
            kind: ValueKind::Input,
        });
        let y = graph.add_value(ValueInfo {
            name: "y".to_string(),
            dtype: DataType::F32,
            shape,
            kind: ValueKind::Output,
        });

        let mut node = Node::new("Relu");
        node.inputs = vec![x];
        node.outputs = vec![y];
        (graph, node)
    }

    #[test]
    fn test_static_shape_accepted() {
        let (graph, node) = graph_with_shape(TensorShape::Static(vec![2, 8]));
        let view = GraphView::new(&graph);

        let kernel = SimdElementwiseFactory.create(&node, &view).unwrap();
        assert_eq!(kernel.op_type(), "Relu");
        assert_eq!(kernel.label(), "simd::Relu");
    }

    #[test]
    fn test_overflowing_shape_rejected() {
        let (graph, node) = graph_with_shape(TensorShape::Static(vec![usize::MAX, 2]));
        let view = GraphView::new(&graph);

        let err = SimdElementwiseFactory.create(&node, &view).unwrap_err();
        match err {
            CoreError::KernelConstruction { reason, .. } => {
                assert!(reason.contains("overflows"));
            }
            e => panic!("expected KernelConstruction, got {e:?}"),
        }
    }

    #[test]
    fn test_dynamic_shape_rejected() {
        let (graph, node) = graph_with_shape(TensorShape::Dynamic(vec![
            Dimension::Named("batch".into()),
            Dimension::Static(8),
        ]));
        let view = GraphView::new(&graph);

        let err = SimdElementwiseFactory.create(&node, &view).unwrap_err();
        assert!(matches!(err, CoreError::KernelConstruction { .. }));
    }
}
