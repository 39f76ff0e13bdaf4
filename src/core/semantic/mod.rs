//! Semantic-query capability consumed by the event-flow analysis.
//!
//! The analysis never inspects source text itself; everything it knows about
//! the analyzed program arrives through the four queries below. The queries
//! are total: lookup misses yield empty results, never errors.

mod json_source;
mod symbols;

pub use json_source::{CallRecord, JsonSemanticSource, SymbolModel, TypeDecl};
pub use symbols::{
    CallSite, CallableSymbol, FieldDecl, FieldInit, FieldRef, Parameter, SourceLocation,
    SymbolRef, TypeSymbol,
};

use async_trait::async_trait;

/// Narrow query surface over a compiled program's symbol information.
///
/// One concrete adapter backs this per environment; the analysis must never
/// assume a specific backing implementation.
#[async_trait]
pub trait SemanticSource: Send + Sync {
    /// All call sites that invoke the given callable.
    async fn find_callers(&self, symbol: &SymbolRef) -> Vec<CallSite>;

    /// Concrete types implementing the given marker interface.
    async fn find_implementations(&self, interface: &str) -> Vec<TypeSymbol>;

    /// The concrete type flowing through a generic call at this site.
    async fn resolve_type_argument(&self, site: &CallSite) -> Option<TypeSymbol>;

    /// Compile-time constant value of a field, when it has one.
    async fn resolve_constant(&self, field: &FieldRef) -> Option<String>;
}
