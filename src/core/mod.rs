// src/core/mod.rs
mod engine;
mod graph;
mod renderer;

// Semantic-query capability and its adapter
pub mod semantic;

// Event-flow analysis
mod flow;

pub use graph::{Graph, Node, NodeId};
pub use renderer::Renderer;
pub use semantic::{
    CallRecord, CallSite, CallableSymbol, FieldDecl, FieldInit, FieldRef, JsonSemanticSource,
    Parameter, SemanticSource, SourceLocation, SymbolModel, SymbolRef, TypeDecl, TypeSymbol,
};

// Flow analysis exports
pub use flow::{CallGraphBuilder, EventCatalog, EventFlowLinker, FlowRegistry, IdentityResolver};

// Export the main engine
pub use engine::Engine;
