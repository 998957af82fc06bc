//! Shared helpers for provider integration tests.

use tessera_graph::{DataType, Graph, Node, TensorShape, ValueId, ValueInfo, ValueKind};

/// Initialize tracing output for test debugging.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_test_writer()
        .try_init();
}

/// Add a value to a graph.
pub fn val(
    graph: &mut Graph,
    name: &str,
    dtype: DataType,
    shape: TensorShape,
    kind: ValueKind,
) -> ValueId {
    graph.add_value(ValueInfo {
        name: name.to_string(),
        dtype,
        shape,
        kind,
    })
}

/// Add an f32 value with a static shape.
pub fn f32_val(graph: &mut Graph, name: &str, dims: Vec<usize>, kind: ValueKind) -> ValueId {
    val(graph, name, DataType::F32, TensorShape::Static(dims), kind)
}

/// Add a node wired to the given values.
pub fn node(graph: &mut Graph, op_type: &str, inputs: Vec<ValueId>, outputs: Vec<ValueId>) {
    let mut n = Node::new(op_type);
    n.inputs = inputs;
    n.outputs = outputs;
    graph.add_node(n).unwrap();
}
