// src/core/semantic/symbols.rs - Symbol value types exchanged with the semantic source
use serde::{Deserialize, Serialize};

/// Stable reference to a callable or member symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolRef {
    /// Containing type, fully qualified
    pub container: String,
    /// Member name within the container
    pub member: String,
}

impl SymbolRef {
    pub fn new(container: impl Into<String>, member: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            member: member.into(),
        }
    }
}

/// Where a symbol or call site sits in source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
    /// False for metadata-only locations that cannot be inspected
    #[serde(default = "default_in_source")]
    pub in_source: bool,
}

fn default_in_source() -> bool {
    true
}

/// A declared parameter on a callable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub type_name: String,
}

/// A callable symbol as the semantic source reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallableSymbol {
    /// Identity used to walk further callers
    pub symbol: SymbolRef,
    /// Display signature, e.g. `demo.orders.Checkout.submit()`
    pub display: String,
    /// Receiver type for constructor symbols
    #[serde(default)]
    pub receiver_type: Option<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

/// One call site that invokes a tracked callable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallSite {
    /// The symbol whose body contains the call
    pub caller: CallableSymbol,
    #[serde(default)]
    pub locations: Vec<SourceLocation>,
    /// Generic type argument at the call, when the target is generic
    #[serde(default)]
    pub type_argument: Option<String>,
    /// True when the calling symbol is a constructor
    #[serde(default)]
    pub is_constructor: bool,
}

/// Initializer of a declared constant field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FieldInit {
    /// Plain literal value
    Literal(String),
    /// Composed value referencing other constants as `{token}`
    Interpolated(String),
    /// Non-literal initializer, resolvable only by the constant evaluator
    Opaque,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    pub init: FieldInit,
}

/// A type as the semantic source reports it, with its declared fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeSymbol {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
}

impl TypeSymbol {
    pub fn field(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Reference to a constant field, for the constant evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldRef {
    pub type_name: String,
    pub field: String,
}
