//! Execution provider abstractions for the tessera execution core.
//!
//! This crate provides the building blocks every backend implements:
//! - Kernel traits (`OpKernel`, `KernelFactory`) — the seam between the
//!   partitioner and the numeric kernels that actually execute ops
//! - `KernelRegistry` — per-backend lookup from operator signature to
//!   kernel factory
//! - `ComputeCapability` — a provider's proposal to execute a node set
//! - `CapabilityMatcher` trait and the reference `RegistryMatcher`
//! - `ExecutionProvider` trait — the polymorphic unit bundling a matcher,
//!   a registry, device identity, and (by list position) a priority

pub mod baseline;
pub mod capability;
pub mod kernel;
pub mod matcher;
pub mod provider;
pub mod registry;

pub use baseline::BASELINE_OPERATORS;
pub use capability::ComputeCapability;
pub use kernel::{KernelFactory, OpKernel};
pub use matcher::{CapabilityMatcher, RegistryMatcher};
pub use provider::{DeviceHandle, ExecutionProvider};
pub use registry::{KernelArg, KernelEntry, KernelRegistry, KernelSignature, TypeConstraint};

/// Result type using the crate's error type.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors arising from provider construction and kernel creation.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Two registry entries with identical matchable signatures.
    #[error("registration conflict: duplicate kernel signature {op_type} (domain '{domain}', versions {since}..={until})")]
    RegistrationConflict {
        op_type: String,
        domain: String,
        since: i64,
        until: i64,
    },

    /// A kernel factory failed to construct a kernel instance.
    ///
    /// Recoverable at the partitioner level: the proposal carrying the node
    /// is demoted to rejected.
    #[error("kernel construction failed for '{op_type}': {reason}")]
    KernelConstruction { op_type: String, reason: String },

    /// Graph traversal failed while matching or constructing.
    #[error(transparent)]
    Graph(#[from] tessera_graph::GraphError),
}

impl CoreError {
    /// Convenience constructor for kernel construction failures.
    pub fn kernel_construction(op_type: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::KernelConstruction {
            op_type: op_type.into(),
            reason: reason.into(),
        }
    }
}
