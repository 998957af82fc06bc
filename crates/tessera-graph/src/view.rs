//! Read-only graph traversal.
//!
//! [`GraphView`] is the only interface execution providers and the
//! partitioner see. It borrows the graph immutably and exposes traversal
//! queries without any mutation surface, so a provider cannot alter the
//! graph while proposing capabilities.

use crate::graph::{Graph, Node, NodeId, ValueId, ValueInfo};
use crate::{GraphError, Result};
use std::collections::{BTreeSet, VecDeque};

/// Immutable view over a [`Graph`].
///
/// Cheap to copy; all queries delegate to the underlying graph's side
/// tables.
#[derive(Clone, Copy)]
pub struct GraphView<'g> {
    graph: &'g Graph,
}

impl<'g> GraphView<'g> {
    /// Create a view over a graph.
    pub fn new(graph: &'g Graph) -> Self {
        Self { graph }
    }

    /// Iterate over all node IDs in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + 'g {
        0..self.graph.node_count()
    }

    /// Get a node by ID.
    pub fn node(&self, id: NodeId) -> Result<&'g Node> {
        self.graph.node(id)
    }

    /// Get value info by ID.
    pub fn value(&self, id: ValueId) -> Result<&'g ValueInfo> {
        self.graph.value(id)
    }

    /// Get the node that produces a value, if any.
    ///
    /// Graph inputs and initializers have no producer.
    pub fn producer(&self, id: ValueId) -> Option<NodeId> {
        self.graph.value_producer(id)
    }

    /// Get the nodes that consume a value.
    pub fn consumers(&self, id: ValueId) -> &'g [NodeId] {
        self.graph.value_consumers(id)
    }

    /// Graph input value IDs.
    pub fn inputs(&self) -> &'g [ValueId] {
        &self.graph.inputs
    }

    /// Graph output value IDs.
    pub fn outputs(&self) -> &'g [ValueId] {
        &self.graph.outputs
    }

    /// Number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Topological order over all nodes.
    pub fn topological_order(&self) -> Result<Vec<NodeId>> {
        self.graph.topological_order()
    }

    /// A display name for a node: its own name, or `op_type_id` when unnamed.
    pub fn node_label(&self, id: NodeId) -> Result<String> {
        let node = self.node(id)?;
        if node.name.is_empty() {
            Ok(format!("{}_{}", node.op_type, id))
        } else {
            Ok(node.name.clone())
        }
    }

    /// Check whether a node set is connected, ignoring edge direction.
    ///
    /// Used to validate multi-node capabilities for backends whose execution
    /// model requires contiguous regions. An empty set is trivially
    /// connected.
    pub fn is_connected(&self, nodes: &BTreeSet<NodeId>) -> Result<bool> {
        let Some(&start) = nodes.iter().next() else {
            return Ok(true);
        };

        let mut visited = BTreeSet::new();
        let mut queue = VecDeque::from([start]);
        visited.insert(start);

        while let Some(id) = queue.pop_front() {
            let node = self.node(id)?;

            let mut neighbors: Vec<NodeId> = Vec::new();
            for &input in &node.inputs {
                if let Some(producer) = self.producer(input) {
                    neighbors.push(producer);
                }
            }
            for &output in &node.outputs {
                neighbors.extend_from_slice(self.consumers(output));
            }

            for neighbor in neighbors {
                if nodes.contains(&neighbor) && visited.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }

        Ok(visited.len() == nodes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Node, ValueInfo, ValueKind};
    use crate::types::{DataType, TensorShape};

    fn value(name: &str, kind: ValueKind) -> ValueInfo {
        ValueInfo {
            name: name.to_string(),
            dtype: DataType::F32,
            shape: TensorShape::Static(vec![4]),
            kind,
        }
    }

    /// Build a diamond: A -> (B, C) -> D.
    fn diamond() -> (Graph, [NodeId; 4]) {
        let mut graph = Graph::new();
        let x = graph.add_value(value("x", ValueKind::Input));
        let t0 = graph.add_value(value("t0", ValueKind::Intermediate));
        let t1 = graph.add_value(value("t1", ValueKind::Intermediate));
        let t2 = graph.add_value(value("t2", ValueKind::Intermediate));
        let y = graph.add_value(value("y", ValueKind::Output));
        graph.inputs = vec![x];
        graph.outputs = vec![y];

        let mut a = Node::new("Relu");
        a.inputs = vec![x];
        a.outputs = vec![t0];
        let id_a = graph.add_node(a).unwrap();

        let mut b = Node::new("Sigmoid");
        b.inputs = vec![t0];
        b.outputs = vec![t1];
        let id_b = graph.add_node(b).unwrap();

        let mut c = Node::new("Tanh");
        c.inputs = vec![t0];
        c.outputs = vec![t2];
        let id_c = graph.add_node(c).unwrap();

        let mut d = Node::new("Add");
        d.inputs = vec![t1, t2];
        d.outputs = vec![y];
        let id_d = graph.add_node(d).unwrap();

        (graph, [id_a, id_b, id_c, id_d])
    }

    #[test]
    fn test_traversal() {
        let (graph, [a, b, c, d]) = diamond();
        let view = GraphView::new(&graph);

        assert_eq!(view.node_count(), 4);
        assert_eq!(view.producer(graph.outputs[0]), Some(d));
        assert_eq!(view.producer(graph.inputs[0]), None);

        let t0 = graph.value_id("t0").unwrap();
        assert_eq!(view.consumers(t0), &[b, c]);
        assert_eq!(view.producer(t0), Some(a));
    }

    #[test]
    fn test_connectivity() {
        let (graph, [a, b, c, d]) = diamond();
        let view = GraphView::new(&graph);

        // Whole diamond is connected
        let all: BTreeSet<_> = [a, b, c, d].into_iter().collect();
        assert!(view.is_connected(&all).unwrap());

        // B and C only touch through A or D
        let split: BTreeSet<_> = [b, c].into_iter().collect();
        assert!(!view.is_connected(&split).unwrap());

        // A + B share an edge
        let pair: BTreeSet<_> = [a, b].into_iter().collect();
        assert!(view.is_connected(&pair).unwrap());

        assert!(view.is_connected(&BTreeSet::new()).unwrap());
    }

    #[test]
    fn test_node_label() {
        let (graph, [a, ..]) = diamond();
        let view = GraphView::new(&graph);
        assert_eq!(view.node_label(a).unwrap(), format!("Relu_{a}"));
    }
}
