// approval-gate-core/src/runtime/table.rs
// ============================================================================
// Module: Approval Gate Capability Table
// Description: Per-user map from feature component to compiled access ability.
// Purpose: Provide the read-only snapshot consumed by the evaluator and gate.
// Dependencies: crate::core, serde, tracing
// ============================================================================

//! ## Overview
//! A [`CapabilityTable`] is compiled once per session or permission change and
//! then only read. [`SharedCapabilityTable`] publishes rebuilt tables by
//! swapping an `Arc`, so a reader holding a snapshot never observes a table
//! that mixes old and new assignments.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;

use serde::Deserialize;
use serde::Serialize;
use tracing::info;

use crate::core::AccessAbility;
use crate::core::FeatureComponentId;

// ============================================================================
// SECTION: Capability Table
// ============================================================================

/// Compiled capability table for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilityTable {
    /// Abilities keyed by feature component.
    abilities: BTreeMap<FeatureComponentId, AccessAbility>,
}

impl CapabilityTable {
    /// Creates an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            abilities: BTreeMap::new(),
        }
    }

    /// Returns the ability for a component id, if compiled.
    #[must_use]
    pub fn get(&self, component_id: &str) -> Option<&AccessAbility> {
        self.abilities.get(component_id)
    }

    /// Returns the number of compiled components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    /// Returns true when no component was compiled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }

    /// Iterates components and abilities in component id order.
    pub fn iter(&self) -> impl Iterator<Item = (&FeatureComponentId, &AccessAbility)> {
        self.abilities.iter()
    }

    /// Returns sorted, unique submodule ids the user can open.
    #[must_use]
    pub fn accessible_submodule_ids(&self) -> Vec<String> {
        let ids: BTreeSet<&str> =
            self.open_components().map(FeatureComponentId::submodule_id).collect();
        ids.into_iter().map(str::to_string).collect()
    }

    /// Returns sorted, unique module ids the user can open.
    #[must_use]
    pub fn accessible_module_ids(&self) -> Vec<String> {
        let ids: BTreeSet<&str> =
            self.open_components().map(FeatureComponentId::module_id).collect();
        ids.into_iter().map(str::to_string).collect()
    }

    /// Iterates component ids whose ability grants some access.
    fn open_components(&self) -> impl Iterator<Item = &FeatureComponentId> {
        self.abilities.iter().filter(|(_, ability)| ability.is_open()).map(|(id, _)| id)
    }

    /// Stores an ability, replacing any previous entry for the component.
    pub(crate) fn insert(&mut self, component_id: FeatureComponentId, ability: AccessAbility) {
        self.abilities.insert(component_id, ability);
    }

    /// Returns a mutable ability for merging, if present.
    pub(crate) fn get_mut(&mut self, component_id: &str) -> Option<&mut AccessAbility> {
        self.abilities.get_mut(component_id)
    }
}

impl FromIterator<(FeatureComponentId, AccessAbility)> for CapabilityTable {
    fn from_iter<I: IntoIterator<Item = (FeatureComponentId, AccessAbility)>>(iter: I) -> Self {
        Self {
            abilities: iter.into_iter().collect(),
        }
    }
}

// ============================================================================
// SECTION: Shared Capability Table
// ============================================================================

/// Atomically replaceable handle to the current capability table.
#[derive(Debug, Default)]
pub struct SharedCapabilityTable {
    /// Current snapshot; replaced wholesale on publish.
    current: RwLock<Arc<CapabilityTable>>,
}

impl SharedCapabilityTable {
    /// Creates a handle publishing `table`.
    #[must_use]
    pub fn new(table: CapabilityTable) -> Self {
        Self {
            current: RwLock::new(Arc::new(table)),
        }
    }

    /// Returns the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<CapabilityTable> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Publishes a rebuilt table and returns the previous snapshot.
    pub fn publish(&self, table: CapabilityTable) -> Arc<CapabilityTable> {
        let next = Arc::new(table);
        let components = next.len();
        let previous = {
            let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *guard, next)
        };
        info!(components, "capability table published");
        previous
    }
}
