//! Concrete execution providers for the tessera execution core.
//!
//! Three backends ship in this crate:
//! - [`ReferenceCpuProvider`] — scalar CPU, covers the full baseline
//!   operator set, the universal fallback
//! - [`SimdCpuProvider`] — vectorized CPU, f32 elementwise subset with
//!   chain fusion
//! - [`NpuProvider`] — accelerator subset (Conv/MatMul), no device handle
//!
//! Providers are handed to `tessera_partition::partition` in priority
//! order; [`standard_providers`] builds the usual stack.

pub mod fusion;
pub mod kernels;
pub mod npu;
pub mod reference;
pub mod simd;

pub use fusion::FusionMatcher;
pub use npu::NpuProvider;
pub use reference::ReferenceCpuProvider;
pub use simd::SimdCpuProvider;

use tessera_core::{ExecutionProvider, Result};

/// Build the standard provider stack: vectorized CPU ahead of the scalar
/// fallback.
pub fn standard_providers() -> Result<Vec<Box<dyn ExecutionProvider>>> {
    Ok(vec![
        Box::new(SimdCpuProvider::new()?),
        Box::new(ReferenceCpuProvider::new()?),
    ])
}

/// Like [`standard_providers`], with the NPU at highest priority.
pub fn accelerated_providers() -> Result<Vec<Box<dyn ExecutionProvider>>> {
    Ok(vec![
        Box::new(NpuProvider::new()?),
        Box::new(SimdCpuProvider::new()?),
        Box::new(ReferenceCpuProvider::new()?),
    ])
}
