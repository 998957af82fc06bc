//! NPU kernels.
//!
//! The NPU driver compiles a fixed set of fused primitives ahead of time.
//! Only plain convolutions (group = 1, no autopad) and 2-D matrix products
//! map onto them; anything else fails construction and falls back.

use tessera_core::{CoreError, KernelFactory, OpKernel, Result};
use tessera_graph::{GraphView, Node};

/// Convolution kernel lowered to the NPU's conv primitive.
#[derive(Debug)]
pub struct NpuConvKernel {
    strides: Vec<i64>,
    pads: Vec<i64>,
}

impl NpuConvKernel {
    /// Strides baked in at partition time.
    pub fn strides(&self) -> &[i64] {
        &self.strides
    }

    /// Pads baked in at partition time.
    pub fn pads(&self) -> &[i64] {
        &self.pads
    }
}

impl OpKernel for NpuConvKernel {
    fn op_type(&self) -> &str {
        "Conv"
    }

    fn label(&self) -> &str {
        "npu::conv"
    }
}

/// Factory for [`NpuConvKernel`].
pub struct NpuConvFactory;

impl KernelFactory for NpuConvFactory {
    fn create(&self, node: &Node, _view: &GraphView<'_>) -> Result<Box<dyn OpKernel>> {
        let group = node.attr_or::<i64>("group", 1).map_err(|e| {
            CoreError::kernel_construction(&node.op_type, e.to_string())
        })?;
        if group != 1 {
            return Err(CoreError::kernel_construction(
                &node.op_type,
                format!("grouped convolution (group = {group}) is not supported"),
            ));
        }

        if node.has_attr("auto_pad") {
            let auto_pad: String = node.attr("auto_pad").map_err(|e| {
                CoreError::kernel_construction(&node.op_type, e.to_string())
            })?;
            if auto_pad != "NOTSET" {
                return Err(CoreError::kernel_construction(
                    &node.op_type,
                    format!("auto_pad mode '{auto_pad}' is not supported"),
                ));
            }
        }

        let strides = node.attr_or::<Vec<i64>>("strides", vec![1, 1]).map_err(|e| {
            CoreError::kernel_construction(&node.op_type, e.to_string())
        })?;
        let pads = node.attr_or::<Vec<i64>>("pads", vec![0, 0, 0, 0]).map_err(|e| {
            CoreError::kernel_construction(&node.op_type, e.to_string())
        })?;

        Ok(Box::new(NpuConvKernel { strides, pads }))
    }
}

/// Matrix product kernel lowered to the NPU's gemm primitive.
#[derive(Debug)]
pub struct NpuMatMulKernel;

impl OpKernel for NpuMatMulKernel {
    fn op_type(&self) -> &str {
        "MatMul"
    }

    fn label(&self) -> &str {
        "npu::matmul"
    }
}

/// Factory for [`NpuMatMulKernel`].
///
/// Requires both operands to be rank-2 with static shapes.
pub struct NpuMatMulFactory;

impl KernelFactory for NpuMatMulFactory {
    fn create(&self, node: &Node, view: &GraphView<'_>) -> Result<Box<dyn OpKernel>> {
        for &value_id in &node.inputs {
            let info = view.value(value_id)?;
            match info.shape.as_static() {
                Some(dims) if dims.len() == 2 => {}
                _ => {
                    return Err(CoreError::kernel_construction(
                        &node.op_type,
                        format!("operand '{}' must be a static rank-2 tensor", info.name),
                    ));
                }
            }
        }

        Ok(Box::new(NpuMatMulKernel))
    }
}
