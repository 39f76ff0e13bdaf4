// src/core/flow/catalog.rs - Known event types
use std::collections::BTreeMap;
use tracing::debug;

use crate::core::semantic::{SemanticSource, TypeSymbol};

/// The concrete types implementing the event marker interface.
///
/// Built once per analysis run; used to recognize event-typed parameters when
/// caller labels are substituted.
pub struct EventCatalog {
    events: BTreeMap<String, TypeSymbol>,
}

impl EventCatalog {
    /// Enumerate marker implementations through the semantic source.
    pub async fn discover(source: &dyn SemanticSource, marker: &str) -> Self {
        let mut events = BTreeMap::new();
        for ty in source.find_implementations(marker).await {
            debug!("Catalog: {} implements {}", ty.name, marker);
            events.insert(ty.name.clone(), ty);
        }
        Self { events }
    }

    pub fn is_event(&self, type_name: &str) -> bool {
        self.events.contains_key(type_name)
    }

    pub fn get(&self, type_name: &str) -> Option<&TypeSymbol> {
        self.events.get(type_name)
    }

    /// Event types in name order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeSymbol> {
        self.events.values()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::semantic::{JsonSemanticSource, SymbolModel, TypeDecl};

    #[tokio::test]
    async fn test_discover_keeps_only_marker_implementations() {
        let source = JsonSemanticSource::new(SymbolModel {
            types: vec![
                TypeDecl {
                    name: "demo.events.OrderPlaced".to_string(),
                    implements: vec!["IEvent".to_string()],
                    fields: vec![],
                },
                TypeDecl {
                    name: "demo.orders.Checkout".to_string(),
                    implements: vec![],
                    fields: vec![],
                },
            ],
            calls: vec![],
        });

        let catalog = EventCatalog::discover(&source, "IEvent").await;
        assert_eq!(catalog.len(), 1);
        assert!(catalog.is_event("demo.events.OrderPlaced"));
        assert!(!catalog.is_event("demo.orders.Checkout"));
    }
}
