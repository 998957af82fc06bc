//! Baseline operator set.
//!
//! The set of operators every universal fallback provider must register.
//! The partitioner checks the designated fallback's registry against this
//! list at session construction, so a coverage gap surfaces immediately
//! instead of deep into a run.

/// Operators a universal fallback must cover (default domain).
pub const BASELINE_OPERATORS: &[&str] = &[
    // Elementwise arithmetic
    "Add",
    "Sub",
    "Mul",
    "Div",
    "Pow",
    "Neg",
    "Exp",
    "Sqrt",
    // Activations
    "Relu",
    "Sigmoid",
    "Tanh",
    "Gelu",
    "Softmax",
    // Linear algebra
    "MatMul",
    "Gemm",
    "Conv",
    // Normalization
    "LayerNormalization",
    // Reductions
    "ReduceMean",
    "ReduceSum",
    // Shape and data movement
    "Reshape",
    "Transpose",
    "Concat",
    "Split",
    "Gather",
    "Slice",
    "Squeeze",
    "Unsqueeze",
    "Expand",
    "Cast",
    "Shape",
    "Where",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_duplicates() {
        let mut seen = std::collections::BTreeSet::new();
        for op in BASELINE_OPERATORS {
            assert!(seen.insert(op), "duplicate baseline operator: {op}");
        }
    }
}
