//! Graph partitioner: assigns every node to a provider and binds kernels.
//!
//! The partitioner drives a round-based state machine over the unassigned
//! node set. Each round queries providers in descending priority order for
//! capability proposals over the remaining graph, accepts non-conflicting
//! proposals, and binds kernels. It terminates when the unassigned set is
//! empty or a full round accepts nothing; any node left unassigned at that
//! point is an unsupported-operator error.
//!
//! Conflict policy: higher-priority providers win, lower-priority proposals
//! are fully discarded (never trimmed), and ties are impossible because
//! acceptance is sequential. Capability size and heuristic scoring play no
//! part, keeping partitioning deterministic.

use crate::error::{PartitionError, Result};
use crate::table::{BoundaryTransfer, DispatchEntry, DispatchTable, Subgraph};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tessera_core::{ComputeCapability, ExecutionProvider, OpKernel, BASELINE_OPERATORS};
use tessera_graph::{Graph, GraphView, NodeId};
use tracing::{debug, debug_span};

/// Partitions graphs across an ordered list of execution providers.
///
/// Construction validates the provider set eagerly: the lowest-priority
/// provider must claim universal fallback and its registry must cover the
/// full baseline operator set, otherwise session construction fails before
/// any partitioning runs.
pub struct Partitioner {
    providers: Vec<Box<dyn ExecutionProvider>>,
}

impl std::fmt::Debug for Partitioner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Partitioner")
            .field(
                "providers",
                &self.providers.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Partitioner {
    /// Create a partitioner over an ordered provider list.
    ///
    /// Order encodes priority: index 0 is queried first each round.
    ///
    /// # Errors
    ///
    /// - `EmptyProviderSet` if no providers are supplied
    /// - `NoUniversalFallback` if the last provider does not claim to be a
    ///   universal fallback
    /// - `FallbackCoverageGap` if the claimed fallback's registry is missing
    ///   baseline operators
    pub fn new(providers: Vec<Box<dyn ExecutionProvider>>) -> Result<Self> {
        let Some(fallback) = providers.last() else {
            return Err(PartitionError::EmptyProviderSet);
        };

        if !fallback.is_universal_fallback() {
            return Err(PartitionError::NoUniversalFallback(
                fallback.name().to_string(),
            ));
        }

        let registry = fallback.kernel_registry();
        let missing: Vec<String> = BASELINE_OPERATORS
            .iter()
            .filter(|op| !registry.covers(op, ""))
            .map(|op| op.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(PartitionError::FallbackCoverageGap {
                provider: fallback.name().to_string(),
                missing,
            });
        }

        Ok(Self { providers })
    }

    /// The active provider list, in priority order.
    pub fn providers(&self) -> &[Box<dyn ExecutionProvider>] {
        &self.providers
    }

    /// Partition a graph into a dispatch table.
    ///
    /// Single-pass, single-threaded, no I/O; fails fast and synchronously.
    /// On error no table is returned — a failed pass never leaves a
    /// partially built dispatch table in a usable state.
    #[tracing::instrument(skip_all, fields(num_nodes = graph.node_count(), num_providers = self.providers.len()))]
    pub fn partition(&self, graph: &Graph) -> Result<DispatchTable> {
        graph.validate()?;
        let view = GraphView::new(graph);

        // Topological position of each node, for ordering subgraph members.
        let topo_order = view.topological_order()?;
        let topo_position: HashMap<NodeId, usize> = topo_order
            .iter()
            .enumerate()
            .map(|(pos, &id)| (id, pos))
            .collect();

        let mut unassigned: BTreeSet<NodeId> = view.node_ids().collect();
        let mut entries: HashMap<NodeId, DispatchEntry> = HashMap::new();
        let mut subgraphs: Vec<Subgraph> = Vec::new();
        let mut node_subgraph: HashMap<NodeId, usize> = HashMap::new();

        let mut round = 0usize;
        while !unassigned.is_empty() {
            round += 1;
            let _span = debug_span!("round", round, remaining = unassigned.len()).entered();
            let mut accepted_in_round = 0usize;

            for (provider_index, provider) in self.providers.iter().enumerate() {
                if unassigned.is_empty() {
                    break;
                }

                let proposals = provider.capabilities(&view, &unassigned);
                if proposals.is_empty() {
                    continue;
                }

                self.check_self_disjoint(provider.name(), &proposals)?;

                for capability in proposals {
                    if self.accept_proposal(
                        &view,
                        provider_index,
                        provider.as_ref(),
                        &capability,
                        &topo_position,
                        &mut unassigned,
                        &mut entries,
                        &mut subgraphs,
                        &mut node_subgraph,
                    )? {
                        accepted_in_round += 1;
                    }
                }
            }

            if accepted_in_round == 0 {
                break;
            }
        }

        if let Some(&node_id) = unassigned.iter().next() {
            let node = view.node(node_id)?;
            return Err(PartitionError::UnsupportedOperator {
                node_id,
                node_name: view.node_label(node_id)?,
                op_type: node.op_type.clone(),
            });
        }

        let boundary_transfers =
            self.collect_boundaries(&view, &subgraphs, &node_subgraph)?;
        fill_dependencies(&view, &mut subgraphs, &node_subgraph);

        debug!(
            subgraphs = subgraphs.len(),
            transfers = boundary_transfers.len(),
            "partitioning complete"
        );

        Ok(DispatchTable::new(entries, subgraphs, boundary_transfers))
    }

    /// A provider's proposals within one round must be internally disjoint.
    fn check_self_disjoint(
        &self,
        provider: &str,
        proposals: &[ComputeCapability],
    ) -> Result<()> {
        let mut claimed = BTreeSet::new();
        for capability in proposals {
            for &node in &capability.nodes {
                if !claimed.insert(node) {
                    return Err(PartitionError::MatcherContractViolation {
                        provider: provider.to_string(),
                        detail: format!("node {node} appears in two proposals of one round"),
                    });
                }
            }
        }
        Ok(())
    }

    /// Try to accept one proposal. Returns `Ok(true)` on acceptance,
    /// `Ok(false)` when the proposal is rejected (conflict or kernel
    /// construction failure), and an error on a contract violation.
    #[allow(clippy::too_many_arguments)]
    fn accept_proposal(
        &self,
        view: &GraphView<'_>,
        provider_index: usize,
        provider: &dyn ExecutionProvider,
        capability: &ComputeCapability,
        topo_position: &HashMap<NodeId, usize>,
        unassigned: &mut BTreeSet<NodeId>,
        entries: &mut HashMap<NodeId, DispatchEntry>,
        subgraphs: &mut Vec<Subgraph>,
        node_subgraph: &mut HashMap<NodeId, usize>,
    ) -> Result<bool> {
        if capability.is_empty() {
            return Ok(false);
        }

        let node_set: BTreeSet<NodeId> = capability.nodes.iter().copied().collect();

        // Conflict with an earlier acceptance: the whole proposal is
        // discarded, not trimmed.
        if !node_set.iter().all(|n| unassigned.contains(n)) {
            debug!(
                provider = provider.name(),
                nodes = ?capability.nodes,
                "proposal rejected: conflicts with earlier assignment"
            );
            return Ok(false);
        }

        if provider.requires_contiguous_capabilities()
            && node_set.len() > 1
            && !view.is_connected(&node_set)?
        {
            return Err(PartitionError::MatcherContractViolation {
                provider: provider.name().to_string(),
                detail: format!("disconnected capability {:?}", capability.nodes),
            });
        }

        // Bind a kernel for every node before committing anything. A single
        // construction failure demotes the whole proposal to rejected.
        let registry = provider.kernel_registry();
        let mut kernels: Vec<(NodeId, Arc<dyn OpKernel>)> =
            Vec::with_capacity(capability.nodes.len());

        for &node_id in &capability.nodes {
            let node = view.node(node_id)?;

            let entry = match capability.bindings.get(&node_id) {
                Some(&index) => registry.entry(index),
                None => registry.resolve(node, view),
            };
            let Some(entry) = entry else {
                debug!(
                    provider = provider.name(),
                    node = node_id,
                    op_type = %node.op_type,
                    "proposal rejected: no kernel entry resolves"
                );
                return Ok(false);
            };

            match entry.factory.create(node, view) {
                Ok(kernel) => kernels.push((node_id, Arc::from(kernel))),
                Err(error) => {
                    debug!(
                        provider = provider.name(),
                        node = node_id,
                        op_type = %node.op_type,
                        %error,
                        "proposal rejected: kernel construction failed"
                    );
                    return Ok(false);
                }
            }
        }

        // Commit: remove from unassigned, record entries, materialize the
        // subgraph with its members in topological order.
        for &node_id in &capability.nodes {
            unassigned.remove(&node_id);
        }

        let mut ordered = capability.nodes.clone();
        ordered.sort_by_key(|id| topo_position.get(id).copied().unwrap_or(usize::MAX));

        let subgraph_index = subgraphs.len();
        subgraphs.push(Subgraph {
            provider_index,
            provider: provider.name().to_string(),
            nodes: ordered,
            inputs: capability.inputs.clone(),
            outputs: capability.outputs.clone(),
            depends_on: Vec::new(),
        });

        for (node_id, kernel) in kernels {
            node_subgraph.insert(node_id, subgraph_index);
            entries.insert(
                node_id,
                DispatchEntry {
                    provider_index,
                    provider: provider.name().to_string(),
                    device: provider.device_handle(),
                    kernel,
                },
            );
        }

        debug!(
            provider = provider.name(),
            nodes = subgraphs[subgraph_index].nodes.len(),
            "proposal accepted"
        );

        Ok(true)
    }

    /// Record, per subgraph boundary value, which two providers are
    /// adjacent, so the executor knows where a transfer is required.
    fn collect_boundaries(
        &self,
        view: &GraphView<'_>,
        subgraphs: &[Subgraph],
        node_subgraph: &HashMap<NodeId, usize>,
    ) -> Result<Vec<BoundaryTransfer>> {
        let mut seen: BTreeSet<(usize, usize, usize)> = BTreeSet::new();
        let mut transfers = Vec::new();

        for subgraph in subgraphs {
            for &value in &subgraph.inputs {
                let Some(producer_node) = view.producer(value) else {
                    // Graph input or initializer; no provider produced it.
                    continue;
                };
                let Some(&producer_sg) = node_subgraph.get(&producer_node) else {
                    continue;
                };

                let producer = &subgraphs[producer_sg];
                if producer.provider_index == subgraph.provider_index {
                    continue;
                }

                if seen.insert((value, producer.provider_index, subgraph.provider_index)) {
                    transfers.push(BoundaryTransfer {
                        value,
                        producer: producer.provider.clone(),
                        consumer: subgraph.provider.clone(),
                    });
                }
            }
        }

        Ok(transfers)
    }
}

/// Fill each subgraph's true dependency set from value producers.
fn fill_dependencies(
    view: &GraphView<'_>,
    subgraphs: &mut [Subgraph],
    node_subgraph: &HashMap<NodeId, usize>,
) {
    for index in 0..subgraphs.len() {
        let mut deps = BTreeSet::new();
        for &value in &subgraphs[index].inputs {
            if let Some(producer_node) = view.producer(value) {
                if let Some(&producer_sg) = node_subgraph.get(&producer_node) {
                    if producer_sg != index {
                        deps.insert(producer_sg);
                    }
                }
            }
        }
        subgraphs[index].depends_on = deps.into_iter().collect();
    }
}
