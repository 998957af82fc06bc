//! Computation graph representation.
//!
//! The graph is a directed acyclic structure of operator [`Node`]s connected
//! by named tensor values. Nodes reference values by [`ValueId`]; the graph
//! maintains producer/consumer side tables so traversal never needs a scan.
//!
//! Invariants (checked by [`Graph::validate`]):
//! - no cycles
//! - every node input is produced by exactly one other node, or is a graph
//!   input / initializer

use crate::types::{DataType, TensorShape};
use crate::{GraphError, Result};
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Topo;
use std::collections::HashMap;

/// Unique identifier for a node in the graph.
pub type NodeId = usize;

/// Unique identifier for a value (tensor edge) in the graph.
pub type ValueId = usize;

/// Internal representation of a computation graph.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// All nodes (operations) in the graph.
    pub nodes: Vec<Node>,

    /// Value metadata, indexed by `ValueId`.
    pub values: Vec<ValueInfo>,

    /// Lookup table: value name -> value ID.
    value_by_name: HashMap<String, ValueId>,

    /// Lookup table: value ID -> producing node ID.
    producer: HashMap<ValueId, NodeId>,

    /// Lookup table: value ID -> consuming node IDs.
    consumers: HashMap<ValueId, Vec<NodeId>>,

    /// Graph input value IDs.
    pub inputs: Vec<ValueId>,

    /// Graph output value IDs.
    pub outputs: Vec<ValueId>,

    /// Graph metadata.
    pub metadata: GraphMetadata,
}

/// Metadata about the graph.
#[derive(Debug, Clone, Default)]
pub struct GraphMetadata {
    /// Graph name.
    pub name: String,

    /// Model version.
    pub model_version: i64,

    /// Producer name.
    pub producer_name: String,
}

impl Graph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value to the graph and return its ID.
    pub fn add_value(&mut self, info: ValueInfo) -> ValueId {
        let id = self.values.len();
        self.value_by_name.insert(info.name.clone(), id);
        self.values.push(info);
        id
    }

    /// Add a node to the graph and return its ID.
    ///
    /// Updates the producer/consumer side tables. Returns an error if one of
    /// the node's outputs already has a producer (the single-producer
    /// invariant would be violated).
    pub fn add_node(&mut self, node: Node) -> Result<NodeId> {
        let id = self.nodes.len();

        for &output in &node.outputs {
            if let Some(&existing) = self.producer.get(&output) {
                return Err(GraphError::InvalidGraph(format!(
                    "value '{}' already produced by node {}",
                    self.value_name(output),
                    existing
                )));
            }
            self.producer.insert(output, id);
        }

        for &input in &node.inputs {
            self.consumers.entry(input).or_default().push(id);
        }

        self.nodes.push(node);
        Ok(id)
    }

    /// Get a node by ID.
    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id).ok_or(GraphError::MissingNode(id))
    }

    /// Get value info by ID.
    pub fn value(&self, id: ValueId) -> Result<&ValueInfo> {
        self.values
            .get(id)
            .ok_or_else(|| GraphError::MissingValue(format!("#{id}")))
    }

    /// Look up a value ID by name.
    pub fn value_id(&self, name: &str) -> Result<ValueId> {
        self.value_by_name
            .get(name)
            .copied()
            .ok_or_else(|| GraphError::MissingValue(name.to_string()))
    }

    /// Get the node that produces a value, if any.
    pub fn value_producer(&self, id: ValueId) -> Option<NodeId> {
        self.producer.get(&id).copied()
    }

    /// Get the nodes that consume a value.
    pub fn value_consumers(&self, id: ValueId) -> &[NodeId] {
        self.consumers.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Get the number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the number of values in the graph.
    pub fn value_count(&self) -> usize {
        self.values.len()
    }

    fn value_name(&self, id: ValueId) -> &str {
        self.values.get(id).map(|v| v.name.as_str()).unwrap_or("?")
    }

    /// Validate graph structure.
    ///
    /// Checks that every node input has a producer or is a graph input /
    /// initializer, that all referenced value IDs exist, and that the graph
    /// is acyclic.
    pub fn validate(&self) -> Result<()> {
        for (id, node) in self.nodes.iter().enumerate() {
            for &input in &node.inputs {
                let info = self.value(input)?;
                let has_source = self.producer.contains_key(&input)
                    || matches!(info.kind, ValueKind::Input | ValueKind::Initializer);
                if !has_source {
                    return Err(GraphError::InvalidGraph(format!(
                        "input '{}' of node {} ({}) has no producer and is not a graph input",
                        info.name, id, node.op_type
                    )));
                }
            }
            for &output in &node.outputs {
                self.value(output)?;
            }
        }

        for &input in &self.inputs {
            self.value(input)?;
        }
        for &output in &self.outputs {
            self.value(output)?;
        }

        if is_cyclic_directed(&self.dependency_graph()) {
            return Err(GraphError::CyclicGraph);
        }

        Ok(())
    }

    /// Get the topological order of nodes in the graph.
    ///
    /// Returns nodes in an order such that all inputs to a node are produced
    /// before the node itself. Fails if the graph contains a cycle.
    pub fn topological_order(&self) -> Result<Vec<NodeId>> {
        let dep_graph = self.dependency_graph();

        let mut topo = Topo::new(&dep_graph);
        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(idx) = topo.next(&dep_graph) {
            order.push(dep_graph[idx]);
        }

        if order.len() != self.nodes.len() {
            return Err(GraphError::CyclicGraph);
        }

        Ok(order)
    }

    /// Build a petgraph dependency graph over node IDs.
    ///
    /// Edges run producer -> consumer for every value flow.
    fn dependency_graph(&self) -> DiGraph<NodeId, ()> {
        let mut dep_graph = DiGraph::new();
        let mut indices: Vec<NodeIndex> = Vec::with_capacity(self.nodes.len());

        for id in 0..self.nodes.len() {
            indices.push(dep_graph.add_node(id));
        }

        for (consumer_id, node) in self.nodes.iter().enumerate() {
            for &input in &node.inputs {
                if let Some(&producer_id) = self.producer.get(&input) {
                    dep_graph.add_edge(indices[producer_id], indices[consumer_id], ());
                }
            }
        }

        dep_graph
    }
}

/// A node (operation) in the graph.
#[derive(Debug, Clone)]
pub struct Node {
    /// Node name (may be empty).
    pub name: String,

    /// Operator type (e.g. "MatMul", "Add", "Conv").
    pub op_type: String,

    /// Operator domain ("" for the default domain).
    pub domain: String,

    /// Operator set version the node was authored against.
    pub version: i64,

    /// Ordered input value IDs.
    pub inputs: Vec<ValueId>,

    /// Ordered output value IDs.
    pub outputs: Vec<ValueId>,

    /// Node attributes.
    pub attributes: HashMap<String, AttributeValue>,
}

impl Node {
    /// Create a new node with the default domain and version 1.
    pub fn new(op_type: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            op_type: op_type.into(),
            domain: String::new(),
            version: 1,
            inputs: Vec::new(),
            outputs: Vec::new(),
            attributes: HashMap::new(),
        }
    }

    /// Get a typed attribute value.
    pub fn attr<T>(&self, name: &str) -> Result<T>
    where
        T: TryFrom<AttributeValue>,
        T::Error: std::fmt::Display,
    {
        let value = self
            .attributes
            .get(name)
            .ok_or_else(|| GraphError::MissingAttribute(name.to_string()))?;

        T::try_from(value.clone()).map_err(|e| GraphError::AttributeTypeMismatch {
            expected: std::any::type_name::<T>().to_string(),
            actual: format!("{e}"),
        })
    }

    /// Get a typed attribute value, or a default if the attribute is absent.
    pub fn attr_or<T>(&self, name: &str, default: T) -> Result<T>
    where
        T: TryFrom<AttributeValue>,
        T::Error: std::fmt::Display,
    {
        if self.attributes.contains_key(name) {
            self.attr(name)
        } else {
            Ok(default)
        }
    }

    /// Check if an attribute exists.
    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }
}

/// Attribute value types.
#[derive(Debug, Clone)]
pub enum AttributeValue {
    Float(f32),
    Int(i64),
    String(String),
    Floats(Vec<f32>),
    Ints(Vec<i64>),
    Strings(Vec<String>),
}

impl TryFrom<AttributeValue> for f32 {
    type Error = String;

    fn try_from(value: AttributeValue) -> std::result::Result<Self, Self::Error> {
        match value {
            AttributeValue::Float(v) => Ok(v),
            _ => Err("not a float".to_string()),
        }
    }
}

impl TryFrom<AttributeValue> for i64 {
    type Error = String;

    fn try_from(value: AttributeValue) -> std::result::Result<Self, Self::Error> {
        match value {
            AttributeValue::Int(v) => Ok(v),
            _ => Err("not an int".to_string()),
        }
    }
}

impl TryFrom<AttributeValue> for String {
    type Error = String;

    fn try_from(value: AttributeValue) -> std::result::Result<Self, Self::Error> {
        match value {
            AttributeValue::String(v) => Ok(v),
            _ => Err("not a string".to_string()),
        }
    }
}

impl TryFrom<AttributeValue> for Vec<i64> {
    type Error = String;

    fn try_from(value: AttributeValue) -> std::result::Result<Self, Self::Error> {
        match value {
            AttributeValue::Ints(v) => Ok(v),
            _ => Err("not an int array".to_string()),
        }
    }
}

/// What role a value plays in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Graph input, supplied at runtime.
    Input,

    /// Graph output.
    Output,

    /// Produced and consumed inside the graph.
    Intermediate,

    /// Constant weight data baked into the model.
    Initializer,
}

/// Information about a value (tensor edge).
#[derive(Debug, Clone)]
pub struct ValueInfo {
    /// Value name (unique within the graph).
    pub name: String,

    /// Element data type.
    pub dtype: DataType,

    /// Shape, if known.
    pub shape: TensorShape,

    /// Role of this value in the graph.
    pub kind: ValueKind,
}

impl ValueInfo {
    /// Create a new intermediate f32 value with the given static shape.
    ///
    /// Convenience for tests and synthetic graphs.
    pub fn intermediate(name: impl Into<String>, dims: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            dtype: DataType::F32,
            shape: TensorShape::Static(dims),
            kind: ValueKind::Intermediate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(name: &str, kind: ValueKind) -> ValueInfo {
        ValueInfo {
            name: name.to_string(),
            dtype: DataType::F32,
            shape: TensorShape::Static(vec![4]),
            kind,
        }
    }

    #[test]
    fn test_empty_graph() {
        let graph = Graph::new();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.value_count(), 0);
        assert!(graph.validate().is_ok());
        assert!(graph.topological_order().unwrap().is_empty());
    }

    #[test]
    fn test_add_node_tracks_producers_and_consumers() {
        let mut graph = Graph::new();
        let x = graph.add_value(value("x", ValueKind::Input));
        let y = graph.add_value(value("y", ValueKind::Output));

        let mut node = Node::new("Relu");
        node.inputs = vec![x];
        node.outputs = vec![y];
        let id = graph.add_node(node).unwrap();

        assert_eq!(graph.value_producer(y), Some(id));
        assert_eq!(graph.value_consumers(x), &[id]);
        assert_eq!(graph.value_id("x").unwrap(), x);
    }

    #[test]
    fn test_double_producer_rejected() {
        let mut graph = Graph::new();
        let x = graph.add_value(value("x", ValueKind::Input));
        let y = graph.add_value(value("y", ValueKind::Intermediate));

        let mut a = Node::new("Relu");
        a.inputs = vec![x];
        a.outputs = vec![y];
        graph.add_node(a).unwrap();

        let mut b = Node::new("Sigmoid");
        b.inputs = vec![x];
        b.outputs = vec![y];
        assert!(matches!(
            graph.add_node(b),
            Err(GraphError::InvalidGraph(_))
        ));
    }

    #[test]
    fn test_dangling_input_rejected() {
        let mut graph = Graph::new();
        let x = graph.add_value(value("x", ValueKind::Intermediate));
        let y = graph.add_value(value("y", ValueKind::Output));

        // x is Intermediate but nothing produces it
        let mut node = Node::new("Relu");
        node.inputs = vec![x];
        node.outputs = vec![y];
        graph.add_node(node).unwrap();

        assert!(matches!(
            graph.validate(),
            Err(GraphError::InvalidGraph(_))
        ));
    }

    #[test]
    fn test_topological_order_linear_chain() {
        let mut graph = Graph::new();
        let t0 = graph.add_value(value("t0", ValueKind::Input));
        let t1 = graph.add_value(value("t1", ValueKind::Intermediate));
        let t2 = graph.add_value(value("t2", ValueKind::Output));

        let mut b = Node::new("B");
        b.inputs = vec![t1];
        b.outputs = vec![t2];

        let mut a = Node::new("A");
        a.inputs = vec![t0];
        a.outputs = vec![t1];

        // Insert in reverse order; topo sort must still put A first
        let id_b = graph.add_node(b).unwrap();
        let id_a = graph.add_node(a).unwrap();

        let order = graph.topological_order().unwrap();
        let pos_a = order.iter().position(|&id| id == id_a).unwrap();
        let pos_b = order.iter().position(|&id| id == id_b).unwrap();
        assert!(pos_a < pos_b);
    }

    #[test]
    fn test_attr_access() {
        let mut node = Node::new("Conv");
        node.attributes
            .insert("group".to_string(), AttributeValue::Int(2));

        assert_eq!(node.attr::<i64>("group").unwrap(), 2);
        assert_eq!(node.attr_or::<i64>("dilations", 1).unwrap(), 1);
        assert!(node.attr::<f32>("group").is_err());
        assert!(matches!(
            node.attr::<i64>("pads"),
            Err(GraphError::MissingAttribute(_))
        ));
    }
}
