// src/core/flow/resolver.rs - Event identity resolution
use regex::Regex;
use tracing::debug;

use crate::error::{EventflowError, Result};
use crate::core::flow::EventCatalog;
use crate::core::semantic::{CallSite, CallableSymbol, FieldInit, FieldRef, SemanticSource, TypeSymbol};

/// Resolves the generic type argument of a publish/subscribe call into the
/// literal identity string of the event flowing through it.
///
/// Identities live in a constant field on the event type. A composed
/// initializer references sibling constants as `{token}`; substitution is one
/// level deep, and unresolved tokens fold to the empty string so that a
/// partial label never fails the run.
pub struct IdentityResolver<'a> {
    source: &'a dyn SemanticSource,
    identity_field: String,
    token_pattern: Regex,
}

impl<'a> IdentityResolver<'a> {
    pub fn new(source: &'a dyn SemanticSource, identity_field: &str) -> Result<Self> {
        Ok(Self {
            source,
            identity_field: identity_field.to_string(),
            token_pattern: Regex::new(r"\{([^{}]+)\}")
                .map_err(|e| EventflowError::Resolver(e.to_string()))?,
        })
    }

    /// Identity of the event flowing through a generic call at this site.
    pub async fn resolve_call_site(&self, site: &CallSite) -> String {
        match self.source.resolve_type_argument(site).await {
            Some(ty) => self.resolve_type(&ty).await,
            None => String::new(),
        }
    }

    /// Identity declared by an event type's constant field.
    pub async fn resolve_type(&self, ty: &TypeSymbol) -> String {
        let Some(field) = ty.field(&self.identity_field) else {
            debug!("{} declares no {} field", ty.name, self.identity_field);
            return String::new();
        };

        match &field.init {
            FieldInit::Literal(value) => value.clone(),
            FieldInit::Interpolated(template) => self.fold_template(&ty.name, template).await,
            FieldInit::Opaque => self
                .source
                .resolve_constant(&FieldRef {
                    type_name: ty.name.clone(),
                    field: field.name.clone(),
                })
                .await
                .unwrap_or_default(),
        }
    }

    /// Substitute every `{token}` in a composed initializer with the
    /// referenced constant's value, empty when it cannot be resolved.
    async fn fold_template(&self, owner: &str, template: &str) -> String {
        let mut folded = String::new();
        let mut last = 0;

        for caps in self.token_pattern.captures_iter(template) {
            let Some(matched) = caps.get(0) else {
                continue;
            };
            folded.push_str(&template[last..matched.start()]);

            let token = &caps[1];
            let value = self
                .source
                .resolve_constant(&Self::field_ref(owner, token))
                .await
                .unwrap_or_default();
            folded.push_str(&value);

            last = matched.end();
        }

        folded.push_str(&template[last..]);
        folded
    }

    /// `Other.Value` tokens name an owning type; bare tokens are siblings of
    /// the event type itself.
    fn field_ref(owner: &str, token: &str) -> FieldRef {
        match token.rsplit_once('.') {
            Some((type_name, field)) => FieldRef {
                type_name: type_name.to_string(),
                field: field.to_string(),
            },
            None => FieldRef {
                type_name: owner.to_string(),
                field: token.to_string(),
            },
        }
    }

    /// Rewrite event-typed parameters in a caller's display signature to
    /// their resolved identities, e.g. `Execute(demo.events.OrderPlaced)`
    /// becomes `Execute(order-placed)`.
    ///
    /// Returns the rewritten label together with the identities substituted
    /// into it, so the caller can register the node as a consumer.
    pub async fn substitute_event_parameters(
        &self,
        caller: &CallableSymbol,
        catalog: &EventCatalog,
    ) -> (String, Vec<String>) {
        let mut name = caller.display.clone();
        let mut identities = Vec::new();

        for parameter in &caller.parameters {
            let Some(ty) = catalog.get(&parameter.type_name) else {
                continue;
            };
            let identity = self.resolve_type(ty).await;
            name = name.replace(&parameter.type_name, &identity);
            identities.push(identity);
        }

        (name, identities)
    }

    /// Label for the publish/subscribe leaf itself, with the resolved
    /// identity in place of the generic parameter.
    pub fn leaf_label(bus: &str, member: &str, identity: &str) -> String {
        format!("{bus}.{member}<{identity}>()")
    }
}
