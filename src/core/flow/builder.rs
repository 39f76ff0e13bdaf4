// src/core/flow/builder.rs - Transitive caller-graph construction
use std::collections::{HashSet, VecDeque};
use tracing::debug;

use crate::core::flow::{EventCatalog, FlowRegistry, IdentityResolver};
use crate::core::graph::{Graph, NodeId};
use crate::core::semantic::{CallSite, SemanticSource, SymbolRef};

/// Walks callers transitively above a publish/subscribe leaf, adding an edge
/// from each caller to the node it invokes.
///
/// Expansion is an iterative worklist rather than recursion; an explicit
/// visited-edge set keyed by `(caller_name, callee_name)` spans the whole
/// expansion, so arbitrarily cyclic caller graphs terminate with a finite
/// edge set. `max_depth` additionally bounds pathological chains.
pub struct CallGraphBuilder<'a> {
    source: &'a dyn SemanticSource,
    resolver: &'a IdentityResolver<'a>,
    catalog: &'a EventCatalog,
    max_depth: usize,
}

impl<'a> CallGraphBuilder<'a> {
    pub fn new(
        source: &'a dyn SemanticSource,
        resolver: &'a IdentityResolver<'a>,
        catalog: &'a EventCatalog,
        max_depth: usize,
    ) -> Self {
        Self {
            source,
            resolver,
            catalog,
            max_depth,
        }
    }

    /// Create the leaf node for one publish/subscribe call site, connect its
    /// direct caller, and expand that caller's own callers transitively.
    pub async fn build_from_leaf(
        &self,
        graph: &mut Graph,
        leaf_label: &str,
        site: &CallSite,
        registry: &mut FlowRegistry,
    ) -> NodeId {
        let leaf = graph.get_or_create(leaf_label);

        let (name, identities) = self.node_label(site).await;
        let caller = graph.get_or_create(&name);
        graph.add_edge(caller, leaf);
        for identity in &identities {
            registry.record_consumer(identity, caller);
        }

        if !site.is_constructor {
            self.expand(graph, site.caller.symbol.clone(), caller, registry)
                .await;
        }

        leaf
    }

    /// Expand every caller chain above `origin`, which represents `symbol`.
    pub async fn expand(
        &self,
        graph: &mut Graph,
        symbol: SymbolRef,
        origin: NodeId,
        registry: &mut FlowRegistry,
    ) {
        let mut visited: HashSet<(String, String)> = HashSet::new();
        let mut worklist: VecDeque<(SymbolRef, NodeId, usize)> = VecDeque::new();
        worklist.push_back((symbol, origin, 1));

        while let Some((symbol, came_from, depth)) = worklist.pop_front() {
            if depth > self.max_depth {
                debug!(
                    "Caller chain truncated at depth {} above {}.{}",
                    depth, symbol.container, symbol.member
                );
                continue;
            }

            for site in self.source.find_callers(&symbol).await {
                let (name, identities) = self.node_label(&site).await;
                let came_name = graph.node(came_from).name.clone();
                if !visited.insert((name.clone(), came_name)) {
                    continue;
                }

                let node = graph.get_or_create(&name);
                graph.add_edge(node, came_from);
                for identity in &identities {
                    registry.record_consumer(identity, node);
                }

                // constructors have no further caller to expand
                if !site.is_constructor {
                    worklist.push_back((site.caller.symbol.clone(), node, depth + 1));
                }
            }
        }
    }

    /// Display name for the node representing a call site's calling symbol.
    async fn node_label(&self, site: &CallSite) -> (String, Vec<String>) {
        if site.is_constructor {
            let receiver = site
                .caller
                .receiver_type
                .as_deref()
                .unwrap_or(&site.caller.display);
            (format!("new {receiver}()"), Vec::new())
        } else {
            self.resolver
                .substitute_event_parameters(&site.caller, self.catalog)
                .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::semantic::{
        CallRecord, CallableSymbol, JsonSemanticSource, SourceLocation, SymbolModel,
    };

    fn call(
        callee: (&str, &str),
        caller: (&str, &str),
        display: &str,
        is_constructor: bool,
    ) -> CallRecord {
        CallRecord {
            callee: SymbolRef::new(callee.0, callee.1),
            site: CallSite {
                caller: CallableSymbol {
                    symbol: SymbolRef::new(caller.0, caller.1),
                    display: display.to_string(),
                    receiver_type: if is_constructor {
                        Some(caller.0.to_string())
                    } else {
                        None
                    },
                    parameters: vec![],
                },
                locations: vec![SourceLocation {
                    file: "demo.cs".to_string(),
                    line: 1,
                    in_source: true,
                }],
                type_argument: None,
                is_constructor,
            },
        }
    }

    async fn build(model: SymbolModel, leaf_callee: (&str, &str)) -> Graph {
        let source = JsonSemanticSource::new(model);
        let resolver = IdentityResolver::new(&source, "Name").unwrap();
        let catalog = EventCatalog::discover(&source, "IEvent").await;
        let builder = CallGraphBuilder::new(&source, &resolver, &catalog, 16);

        let mut graph = Graph::new();
        let mut registry = FlowRegistry::new();
        let sites = source
            .find_callers(&SymbolRef::new(leaf_callee.0, leaf_callee.1))
            .await;
        for site in &sites {
            builder
                .build_from_leaf(&mut graph, "IEventBus.Publish<order-placed>()", site, &mut registry)
                .await;
        }
        graph
    }

    fn edge_set(graph: &Graph) -> Vec<(String, String)> {
        let mut edges = Vec::new();
        for node in graph.nodes() {
            for &child in node.children() {
                edges.push((node.name.clone(), graph.node(child).name.clone()));
            }
        }
        edges.sort();
        edges
    }

    #[tokio::test]
    async fn test_linear_caller_chain_reaches_the_root() {
        let model = SymbolModel {
            types: vec![],
            calls: vec![
                call(("IEventBus", "Publish"), ("demo.Caller", "Call"), "demo.Caller.Call()", false),
                call(("demo.Caller", "Call"), ("demo.Caller", "CallParent"), "demo.Caller.CallParent()", false),
            ],
        };

        let graph = build(model, ("IEventBus", "Publish")).await;

        assert_eq!(
            edge_set(&graph),
            vec![
                ("demo.Caller.Call()".to_string(), "IEventBus.Publish<order-placed>()".to_string()),
                ("demo.Caller.CallParent()".to_string(), "demo.Caller.Call()".to_string()),
            ]
        );

        let root = graph.lookup("demo.Caller.CallParent()").unwrap();
        assert!(graph.node(root).is_root());
        let leaf = graph.lookup("IEventBus.Publish<order-placed>()").unwrap();
        assert!(!graph.node(leaf).is_root());
    }

    #[tokio::test]
    async fn test_cyclic_callers_terminate_with_finite_edges() {
        // A calls B, B calls A, and A invokes the leaf
        let model = SymbolModel {
            types: vec![],
            calls: vec![
                call(("IEventBus", "Publish"), ("demo.A", "a"), "demo.A.a()", false),
                call(("demo.A", "a"), ("demo.B", "b"), "demo.B.b()", false),
                call(("demo.B", "b"), ("demo.A", "a"), "demo.A.a()", false),
            ],
        };

        let graph = build(model, ("IEventBus", "Publish")).await;

        assert_eq!(
            edge_set(&graph),
            vec![
                ("demo.A.a()".to_string(), "IEventBus.Publish<order-placed>()".to_string()),
                ("demo.A.a()".to_string(), "demo.B.b()".to_string()),
                ("demo.B.b()".to_string(), "demo.A.a()".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_constructor_call_sites_are_terminal() {
        let model = SymbolModel {
            types: vec![],
            calls: vec![
                call(("IEventBus", "Publish"), ("demo.Worker", "run"), "demo.Worker.run()", false),
                call(("demo.Worker", "run"), ("demo.Worker", ".ctor"), "demo.Worker..ctor()", true),
                // callers of the constructor must never be walked
                call(("demo.Worker", ".ctor"), ("demo.Main", "main"), "demo.Main.main()", false),
            ],
        };

        let graph = build(model, ("IEventBus", "Publish")).await;

        assert!(graph.lookup("new demo.Worker()").is_some());
        assert!(graph.lookup("demo.Main.main()").is_none());

        let ctor = graph.lookup("new demo.Worker()").unwrap();
        assert!(graph.node(ctor).is_root());
        assert_eq!(graph.node(ctor).children().len(), 1);
    }

    #[tokio::test]
    async fn test_discovery_order_yields_isomorphic_graphs() {
        let calls = vec![
            call(("IEventBus", "Publish"), ("demo.Caller", "Call"), "demo.Caller.Call()", false),
            call(("demo.Caller", "Call"), ("demo.Caller", "CallParent"), "demo.Caller.CallParent()", false),
            call(("demo.Caller", "Call"), ("demo.Jobs", "nightly"), "demo.Jobs.nightly()", false),
        ];
        let mut reversed = calls.clone();
        reversed.reverse();

        let forward = build(SymbolModel { types: vec![], calls }, ("IEventBus", "Publish")).await;
        let backward =
            build(SymbolModel { types: vec![], calls: reversed }, ("IEventBus", "Publish")).await;

        assert_eq!(edge_set(&forward), edge_set(&backward));

        let mut forward_names: Vec<_> = forward.nodes().map(|n| n.name.clone()).collect();
        let mut backward_names: Vec<_> = backward.nodes().map(|n| n.name.clone()).collect();
        forward_names.sort();
        backward_names.sort();
        assert_eq!(forward_names, backward_names);
    }

    #[tokio::test]
    async fn test_depth_cap_truncates_the_chain_only() {
        let model = SymbolModel {
            types: vec![],
            calls: vec![
                call(("IEventBus", "Publish"), ("demo.L1", "f"), "demo.L1.f()", false),
                call(("demo.L1", "f"), ("demo.L2", "f"), "demo.L2.f()", false),
                call(("demo.L2", "f"), ("demo.L3", "f"), "demo.L3.f()", false),
                call(("demo.L3", "f"), ("demo.L4", "f"), "demo.L4.f()", false),
            ],
        };

        let source = JsonSemanticSource::new(model);
        let resolver = IdentityResolver::new(&source, "Name").unwrap();
        let catalog = EventCatalog::discover(&source, "IEvent").await;
        let builder = CallGraphBuilder::new(&source, &resolver, &catalog, 2);

        let mut graph = Graph::new();
        let mut registry = FlowRegistry::new();
        let sites = source.find_callers(&SymbolRef::new("IEventBus", "Publish")).await;
        builder
            .build_from_leaf(&mut graph, "IEventBus.Publish<order-placed>()", &sites[0], &mut registry)
            .await;

        assert!(graph.lookup("demo.L2.f()").is_some());
        assert!(graph.lookup("demo.L3.f()").is_some());
        assert!(graph.lookup("demo.L4.f()").is_none());
    }
}
