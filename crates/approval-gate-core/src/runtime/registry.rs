// approval-gate-core/src/runtime/registry.rs
// ============================================================================
// Module: Approval Gate Registries
// Description: Closed registries of feature components and authorization flows.
// Purpose: Reject unknown ids at load time instead of at every evaluation.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! Both registries are built once at startup from deployable configuration and
//! never mutated afterwards. Construction rejects duplicate ids. Lookups of an
//! unknown id are configuration errors and surface as [`RegistryError`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use thiserror::Error;

use crate::core::AccessTier;
use crate::core::AuthorizationFlow;
use crate::core::FeatureComponentId;

// ============================================================================
// SECTION: Component Registry
// ============================================================================

/// Registered feature component metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentMeta {
    /// Component identifier.
    pub id: FeatureComponentId,
    /// Optional display title.
    pub title: Option<String>,
}

impl ComponentMeta {
    /// Creates component metadata without a title.
    #[must_use]
    pub const fn new(id: FeatureComponentId) -> Self {
        Self {
            id,
            title: None,
        }
    }
}

/// Closed set of known feature components.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentRegistry {
    /// Components keyed by id.
    components: BTreeMap<FeatureComponentId, ComponentMeta>,
}

impl ComponentRegistry {
    /// Builds a registry from component metadata.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateComponent`] when an id repeats.
    pub fn new(
        components: impl IntoIterator<Item = ComponentMeta>,
    ) -> Result<Self, RegistryError> {
        let mut map = BTreeMap::new();
        for meta in components {
            if map.contains_key(&meta.id) {
                return Err(RegistryError::DuplicateComponent(meta.id.to_string()));
            }
            map.insert(meta.id.clone(), meta);
        }
        Ok(Self {
            components: map,
        })
    }

    /// Returns true when the component is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.components.contains_key(id)
    }

    /// Returns component metadata, if registered.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ComponentMeta> {
        self.components.get(id)
    }

    /// Resolves a registered component.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownComponent`] when the id is not
    /// registered.
    pub fn resolve(&self, id: &str) -> Result<&ComponentMeta, RegistryError> {
        self.get(id).ok_or_else(|| RegistryError::UnknownComponent(id.to_string()))
    }

    /// Returns the number of registered components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns true when no component is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Iterates registered components in id order.
    pub fn iter(&self) -> impl Iterator<Item = &ComponentMeta> {
        self.components.values()
    }
}

// ============================================================================
// SECTION: Flow Registry
// ============================================================================

/// Static mapping from feature id to its authorization flow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowRegistry {
    /// Flows keyed by feature id.
    flows: BTreeMap<String, AuthorizationFlow>,
}

impl FlowRegistry {
    /// Builds a registry from `(feature, flow)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateFlow`] when a feature repeats.
    pub fn new<K: Into<String>>(
        flows: impl IntoIterator<Item = (K, AuthorizationFlow)>,
    ) -> Result<Self, RegistryError> {
        let mut map = BTreeMap::new();
        for (feature, flow) in flows {
            let feature = feature.into();
            if map.contains_key(&feature) {
                return Err(RegistryError::DuplicateFlow(feature));
            }
            map.insert(feature, flow);
        }
        Ok(Self {
            flows: map,
        })
    }

    /// Returns the flow registered for a feature.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownFlow`] when no flow is registered.
    pub fn get_flow(&self, feature: &str) -> Result<&AuthorizationFlow, RegistryError> {
        self.flows.get(feature).ok_or_else(|| RegistryError::UnknownFlow(feature.to_string()))
    }

    /// Returns the tiers that may act after `current` on a feature's flow.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownFlow`] when no flow is registered.
    pub fn next_acceptable_tiers(
        &self,
        feature: &str,
        current: Option<AccessTier>,
    ) -> Result<Vec<AccessTier>, RegistryError> {
        Ok(next_acceptable_tiers(current, self.get_flow(feature)?))
    }

    /// Iterates registered feature ids in order.
    pub fn features(&self) -> impl Iterator<Item = &str> {
        self.flows.keys().map(String::as_str)
    }

    /// Returns the number of registered flows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flows.len()
    }

    /// Returns true when no flow is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    /// Checks that every flow is keyed by a registered component.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownComponent`] for the first feature id
    /// missing from `components`.
    pub fn validate_against(&self, components: &ComponentRegistry) -> Result<(), RegistryError> {
        for feature in self.features() {
            components.resolve(feature)?;
        }
        Ok(())
    }
}

/// Returns the tiers that may act after `current` on `flow`.
///
/// `None` yields the first step; the last step or a tier absent from the flow
/// yields an empty list.
#[must_use]
pub fn next_acceptable_tiers(
    current: Option<AccessTier>,
    flow: &AuthorizationFlow,
) -> Vec<AccessTier> {
    flow.next_acceptable_tiers(current)
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Registry construction and lookup errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No flow is registered for the feature.
    #[error("no authorization flow registered for feature {0}")]
    UnknownFlow(String),
    /// The component is not registered.
    #[error("unknown feature component: {0}")]
    UnknownComponent(String),
    /// A feature registers two flows.
    #[error("duplicate authorization flow for feature {0}")]
    DuplicateFlow(String),
    /// A component is registered twice.
    #[error("duplicate feature component: {0}")]
    DuplicateComponent(String),
}
