//! Event-flow analysis for Eventflow
//!
//! This module implements the core analysis: it reconstructs the caller
//! chains above every publish and subscribe call site, resolves the concrete
//! identity of the event flowing through each generic call, and cross-links
//! producers to the consumers that handle the same identity.

mod builder;
mod catalog;
mod linker;
mod resolver;

pub use builder::CallGraphBuilder;
pub use catalog::EventCatalog;
pub use linker::{EventFlowLinker, FlowRegistry};
pub use resolver::IdentityResolver;
