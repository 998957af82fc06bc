//! Kernel implementations for the built-in providers.

pub mod npu;
pub mod reference;
pub mod simd;

pub use npu::{NpuConvFactory, NpuConvKernel, NpuMatMulFactory, NpuMatMulKernel};
pub use reference::{ReferenceFactory, ReferenceKernel};
pub use simd::{SimdElementwiseFactory, SimdElementwiseKernel};
