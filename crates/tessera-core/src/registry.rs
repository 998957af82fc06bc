//! Kernel registry: operator signature to kernel factory lookup.
//!
//! Each provider owns one registry, populated at provider construction and
//! read-only afterward (safe for concurrent lookup across inference runs).
//! Matching considers operator name, domain, a version range, and
//! per-argument type constraints. Overlapping entries are legal and resolve
//! first-match-wins by registration order; registering two entries with
//! identical signatures is a construction-time error.

use crate::kernel::KernelFactory;
use crate::{CoreError, Result};
use tessera_graph::{DataType, GraphView, Node};

/// Which argument of a node a type constraint applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelArg {
    /// n-th input value.
    Input(usize),

    /// n-th output value.
    Output(usize),
}

/// Restriction on the element type of one argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeConstraint {
    /// The argument being constrained.
    pub arg: KernelArg,

    /// Allowed element types for that argument.
    pub allowed: Vec<DataType>,
}

/// The matchable part of a registry entry.
///
/// Two signatures conflict only when every field is equal; entries that
/// merely overlap (e.g. nested version ranges) are resolved by registration
/// order at lookup time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelSignature {
    /// Operator type name (e.g. "Conv").
    pub op_type: String,

    /// Operator domain ("" for the default domain).
    pub domain: String,

    /// Minimum supported operator set version (inclusive).
    pub since_version: i64,

    /// Maximum supported operator set version (inclusive).
    pub until_version: i64,

    /// Per-argument type constraints. Arguments without a constraint accept
    /// any type.
    pub type_constraints: Vec<TypeConstraint>,
}

impl KernelSignature {
    /// Create a signature for the default domain covering all versions.
    pub fn new(op_type: impl Into<String>) -> Self {
        Self {
            op_type: op_type.into(),
            domain: String::new(),
            since_version: 1,
            until_version: i64::MAX,
            type_constraints: Vec::new(),
        }
    }

    /// Set the operator domain.
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Restrict the supported version range (inclusive on both ends).
    pub fn versions(mut self, since: i64, until: i64) -> Self {
        self.since_version = since;
        self.until_version = until;
        self
    }

    /// Constrain the element type of an input argument.
    pub fn input_type(mut self, index: usize, allowed: &[DataType]) -> Self {
        self.type_constraints.push(TypeConstraint {
            arg: KernelArg::Input(index),
            allowed: allowed.to_vec(),
        });
        self
    }

    /// Constrain the element type of an output argument.
    pub fn output_type(mut self, index: usize, allowed: &[DataType]) -> Self {
        self.type_constraints.push(TypeConstraint {
            arg: KernelArg::Output(index),
            allowed: allowed.to_vec(),
        });
        self
    }

    /// Check whether this signature matches a node.
    ///
    /// A constraint on an argument the node does not have fails the match
    /// (the entry requires an argument that is absent).
    pub fn matches(&self, node: &Node, view: &GraphView<'_>) -> bool {
        if node.op_type != self.op_type || node.domain != self.domain {
            return false;
        }
        if node.version < self.since_version || node.version > self.until_version {
            return false;
        }

        self.type_constraints.iter().all(|constraint| {
            let value_id = match constraint.arg {
                KernelArg::Input(i) => node.inputs.get(i).copied(),
                KernelArg::Output(i) => node.outputs.get(i).copied(),
            };
            match value_id {
                Some(id) => match view.value(id) {
                    Ok(info) => constraint.allowed.contains(&info.dtype),
                    Err(_) => false,
                },
                None => false,
            }
        })
    }
}

/// One registered (signature, factory) pair.
pub struct KernelEntry {
    /// The matchable signature.
    pub signature: KernelSignature,

    /// Factory invoked once a node is bound to this entry.
    pub factory: Box<dyn KernelFactory>,
}

/// Per-backend lookup table from operator signature to kernel factory.
///
/// Built single-threaded at provider construction; no registration happens
/// after the first lookup.
#[derive(Default)]
pub struct KernelRegistry {
    entries: Vec<KernelEntry>,
}

impl KernelRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a kernel factory under a signature.
    ///
    /// # Errors
    ///
    /// Returns `RegistrationConflict` if an entry with an identical
    /// signature is already registered. Fails fast rather than silently
    /// shadowing.
    pub fn register<F>(&mut self, signature: KernelSignature, factory: F) -> Result<&mut Self>
    where
        F: KernelFactory + 'static,
    {
        if self.entries.iter().any(|e| e.signature == signature) {
            return Err(CoreError::RegistrationConflict {
                op_type: signature.op_type,
                domain: signature.domain,
                since: signature.since_version,
                until: signature.until_version,
            });
        }

        self.entries.push(KernelEntry {
            signature,
            factory: Box::new(factory),
        });
        Ok(self)
    }

    /// Resolve a node to a registry entry.
    ///
    /// Entries are scanned in registration order; the first signature match
    /// wins. Returns `None` if no entry matches.
    pub fn resolve(&self, node: &Node, view: &GraphView<'_>) -> Option<&KernelEntry> {
        self.resolve_index(node, view).map(|i| &self.entries[i])
    }

    /// Resolve a node to the index of its registry entry.
    ///
    /// Matchers use the index as a pre-resolved kernel binding on the
    /// capabilities they propose.
    pub fn resolve_index(&self, node: &Node, view: &GraphView<'_>) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.signature.matches(node, view))
    }

    /// Get an entry by index.
    pub fn entry(&self, index: usize) -> Option<&KernelEntry> {
        self.entries.get(index)
    }

    /// Check whether any entry covers an operator name/domain pair,
    /// ignoring versions and type constraints.
    ///
    /// Used by the fallback coverage check at session construction.
    pub fn covers(&self, op_type: &str, domain: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.signature.op_type == op_type && e.signature.domain == domain)
    }

    /// Get the number of registered entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all registered operator names.
    pub fn operator_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.signature.op_type.as_str())
    }
}

impl std::fmt::Debug for KernelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KernelRegistry")
            .field(
                "signatures",
                &self
                    .entries
                    .iter()
                    .map(|e| &e.signature)
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}
