// src/core/semantic/json_source.rs - SemanticSource adapter over a serialized symbol model
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use super::symbols::{CallSite, FieldDecl, FieldInit, FieldRef, SymbolRef, TypeSymbol};
use super::SemanticSource;

/// Serialized snapshot of a program's symbol information.
///
/// Produced by an external indexer; one file covers every compilation of the
/// analyzed workspace.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SymbolModel {
    #[serde(default)]
    pub types: Vec<TypeDecl>,
    #[serde(default)]
    pub calls: Vec<CallRecord>,
}

/// A type declaration with the interfaces it implements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    #[serde(default)]
    pub implements: Vec<String>,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
}

impl TypeDecl {
    fn to_symbol(&self) -> TypeSymbol {
        TypeSymbol {
            name: self.name.clone(),
            fields: self.fields.clone(),
        }
    }
}

/// One observed call edge: `site.caller` invokes `callee`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallRecord {
    pub callee: SymbolRef,
    pub site: CallSite,
}

/// [`SemanticSource`] adapter backed by a [`SymbolModel`] loaded from disk.
pub struct JsonSemanticSource {
    model: SymbolModel,
}

impl JsonSemanticSource {
    pub fn new(model: SymbolModel) -> Self {
        Self { model }
    }

    /// Load a symbol model snapshot from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let model: SymbolModel = serde_json::from_str(&content)?;
        Ok(Self::new(model))
    }

    fn type_symbol(&self, name: &str) -> Option<TypeSymbol> {
        self.model
            .types
            .iter()
            .find(|t| t.name == name)
            .map(TypeDecl::to_symbol)
    }

    fn literal_value(field: &FieldDecl) -> Option<String> {
        match &field.init {
            FieldInit::Literal(value) => Some(value.clone()),
            // interpolated and opaque initializers are not evaluated constants
            _ => None,
        }
    }
}

#[async_trait]
impl SemanticSource for JsonSemanticSource {
    async fn find_callers(&self, symbol: &SymbolRef) -> Vec<CallSite> {
        self.model
            .calls
            .iter()
            .filter(|record| &record.callee == symbol)
            .map(|record| record.site.clone())
            .collect()
    }

    async fn find_implementations(&self, interface: &str) -> Vec<TypeSymbol> {
        self.model
            .types
            .iter()
            .filter(|t| t.implements.iter().any(|i| i == interface))
            .map(TypeDecl::to_symbol)
            .collect()
    }

    async fn resolve_type_argument(&self, site: &CallSite) -> Option<TypeSymbol> {
        // a type argument is only inspectable at an in-source location
        site.locations.iter().find(|loc| loc.in_source)?;
        let name = site.type_argument.as_deref()?;
        self.type_symbol(name)
    }

    async fn resolve_constant(&self, field: &FieldRef) -> Option<String> {
        if let Some(value) = self
            .model
            .types
            .iter()
            .find(|t| t.name == field.type_name)
            .and_then(|t| t.fields.iter().find(|f| f.name == field.field))
            .and_then(Self::literal_value)
        {
            return Some(value);
        }

        // fall back to any declaration of that name in the compilation
        self.model
            .types
            .iter()
            .flat_map(|t| t.fields.iter())
            .find(|f| f.name == field.field)
            .and_then(Self::literal_value)
    }
}
