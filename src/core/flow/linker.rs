// src/core/flow/linker.rs - Producer/consumer cross-linking
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::core::graph::{Graph, NodeId};

/// Producers and consumers keyed by resolved event identity.
///
/// Recorded while identities are resolved, so cross-linking never has to
/// re-derive identities from rendered labels. Empty identities are dropped on
/// entry: an unresolved producer must not be wired to every unresolved
/// consumer.
#[derive(Debug, Default)]
pub struct FlowRegistry {
    producers: BTreeMap<String, BTreeSet<NodeId>>,
    consumers: BTreeMap<String, BTreeSet<NodeId>>,
}

impl FlowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a node that publishes events of the given identity.
    pub fn record_producer(&mut self, identity: &str, node: NodeId) {
        if identity.is_empty() {
            return;
        }
        self.producers
            .entry(identity.to_string())
            .or_default()
            .insert(node);
    }

    /// Record a node that subscribes to or handles events of the identity.
    pub fn record_consumer(&mut self, identity: &str, node: NodeId) {
        if identity.is_empty() {
            return;
        }
        self.consumers
            .entry(identity.to_string())
            .or_default()
            .insert(node);
    }

    pub fn producer_identities(&self) -> impl Iterator<Item = &str> {
        self.producers.keys().map(String::as_str)
    }

    pub fn consumer_identities(&self) -> impl Iterator<Item = &str> {
        self.consumers.keys().map(String::as_str)
    }
}

/// Bridges the publish-rooted and subscribe-rooted subgraphs.
pub struct EventFlowLinker;

impl EventFlowLinker {
    /// Add one edge producer -> consumer for every pair sharing an identity.
    ///
    /// Fan-out (one producer, many handlers) and fan-in (many producers, one
    /// handler) both fall out of the pairwise walk. Returns the number of
    /// edges added.
    pub fn link(graph: &mut Graph, registry: &FlowRegistry) -> usize {
        let mut added = 0;

        for (identity, producers) in &registry.producers {
            let Some(consumers) = registry.consumers.get(identity) else {
                continue;
            };
            for &producer in producers {
                for &consumer in consumers {
                    if graph.add_edge(producer, consumer) {
                        debug!(
                            "Linked {} -> {} on identity {}",
                            graph.node(producer).name,
                            graph.node(consumer).name,
                            identity
                        );
                        added += 1;
                    }
                }
            }
        }

        added
    }
}
