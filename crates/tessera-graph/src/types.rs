//! Tensor data types and shapes.

/// Element data type of a tensor value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    F32,
    F16,
    I64,
    I32,
    U8,
    Bool,
}

impl DataType {
    /// Size of one element in bytes.
    pub fn size(&self) -> usize {
        match self {
            DataType::F32 | DataType::I32 => 4,
            DataType::F16 => 2,
            DataType::I64 => 8,
            DataType::U8 | DataType::Bool => 1,
        }
    }

    /// Whether this is a floating-point type.
    pub fn is_float(&self) -> bool {
        matches!(self, DataType::F32 | DataType::F16)
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DataType::F32 => "f32",
            DataType::F16 => "f16",
            DataType::I64 => "i64",
            DataType::I32 => "i32",
            DataType::U8 => "u8",
            DataType::Bool => "bool",
        };
        write!(f, "{name}")
    }
}

/// Tensor shape attached to a value.
///
/// Shape inference is an external collaborator; the execution core only
/// distinguishes fully static shapes (which some backends require) from
/// everything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TensorShape {
    /// All dimensions known.
    Static(Vec<usize>),

    /// Rank known, one or more dimensions symbolic (named).
    Dynamic(Vec<Dimension>),

    /// No shape information available.
    Unknown,
}

/// A single dimension in a dynamic shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dimension {
    /// Known extent.
    Static(usize),

    /// Symbolic extent (e.g. "batch", "sequence").
    Named(String),
}

impl TensorShape {
    /// Check if the shape is fully static.
    pub fn is_static(&self) -> bool {
        matches!(self, TensorShape::Static(_))
    }

    /// Get static dimensions if available.
    pub fn as_static(&self) -> Option<&[usize]> {
        match self {
            TensorShape::Static(dims) => Some(dims),
            _ => None,
        }
    }

    /// Number of dimensions, if the rank is known.
    pub fn ndim(&self) -> Option<usize> {
        match self {
            TensorShape::Static(dims) => Some(dims.len()),
            TensorShape::Dynamic(dims) => Some(dims.len()),
            TensorShape::Unknown => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dtype_sizes() {
        assert_eq!(DataType::F32.size(), 4);
        assert_eq!(DataType::F16.size(), 2);
        assert_eq!(DataType::I64.size(), 8);
        assert_eq!(DataType::Bool.size(), 1);
    }

    #[test]
    fn test_shape_queries() {
        let s = TensorShape::Static(vec![2, 3]);
        assert!(s.is_static());
        assert_eq!(s.as_static(), Some(&[2usize, 3][..]));
        assert_eq!(s.ndim(), Some(2));

        let d = TensorShape::Dynamic(vec![
            Dimension::Named("batch".into()),
            Dimension::Static(4),
        ]);
        assert!(!d.is_static());
        assert_eq!(d.ndim(), Some(2));

        assert_eq!(TensorShape::Unknown.ndim(), None);
    }
}
