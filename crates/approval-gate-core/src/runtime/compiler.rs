// approval-gate-core/src/runtime/compiler.rs
// ============================================================================
// Module: Approval Gate Permission Compiler
// Description: Builds capability tables from group/permission assignments.
// Purpose: Resolve each assigned component to one access ability per user.
// Dependencies: crate::{core, runtime::{registry, table}}, serde, tracing
// ============================================================================

//! ## Overview
//! The compiler resolves every assignment's permission group by id and records
//! one [`AccessAbility`] per distinct feature component. A permission group
//! that cannot be found is data drift, not an error: the component is still
//! recorded, with every capability off and no access tier.
//!
//! When several assignments name the same component, the [`MergePolicy`]
//! decides the result. [`MergePolicy::LastWriteWins`] keeps the ability of the
//! last assignment in input order; [`MergePolicy::Union`] OR-s capabilities.
//! Callers must pass assignments in a stable order when using last-write-wins.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use tracing::warn;

use crate::core::AccessAbility;
use crate::core::AssignmentError;
use crate::core::PermissionAssignment;
use crate::core::PermissionGroup;
use crate::core::PermissionGroupId;
use crate::core::UserGroupId;
use crate::runtime::registry::ComponentRegistry;
use crate::runtime::registry::RegistryError;
use crate::runtime::table::CapabilityTable;

// ============================================================================
// SECTION: Merge Policy
// ============================================================================

/// Policy for combining several permission groups on one component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// The last assignment in input order wins.
    #[default]
    LastWriteWins,
    /// Capabilities are OR-ed across assignments.
    Union,
}

// ============================================================================
// SECTION: Permission Compiler
// ============================================================================

/// Compiles permission assignments into a [`CapabilityTable`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissionCompiler {
    /// Merge policy for repeated components.
    policy: MergePolicy,
}

impl PermissionCompiler {
    /// Creates a compiler with the given merge policy.
    #[must_use]
    pub const fn new(policy: MergePolicy) -> Self {
        Self {
            policy,
        }
    }

    /// Returns the active merge policy.
    #[must_use]
    pub const fn policy(&self) -> MergePolicy {
        self.policy
    }

    /// Compiles assignments against permission group definitions.
    ///
    /// Every distinct component named by `assignments` appears in the output.
    #[must_use]
    pub fn compile(
        &self,
        assignments: &[PermissionAssignment],
        groups: &[PermissionGroup],
    ) -> CapabilityTable {
        let index = index_groups(groups);
        let mut table = CapabilityTable::new();
        for assignment in assignments {
            let ability = resolve_ability(&index, assignment);
            self.merge(&mut table, assignment, ability);
        }
        debug!(
            assignments = assignments.len(),
            components = table.len(),
            policy = ?self.policy,
            "capability table compiled"
        );
        table
    }

    /// Compiles only the assignments belonging to the user's group memberships.
    #[must_use]
    pub fn compile_for_groups(
        &self,
        memberships: &[UserGroupId],
        assignments: &[PermissionAssignment],
        groups: &[PermissionGroup],
    ) -> CapabilityTable {
        let scoped: Vec<PermissionAssignment> = assignments
            .iter()
            .filter(|assignment| memberships.contains(&assignment.user_group_id))
            .cloned()
            .collect();
        self.compile(&scoped, groups)
    }

    /// Decomposes raw `"group:component:permGroup"` strings and compiles them.
    ///
    /// # Errors
    ///
    /// Returns the first [`AssignmentError`] encountered; no table is produced
    /// from a partially malformed input.
    pub fn compile_strings<S: AsRef<str>>(
        &self,
        permissions: &[S],
        groups: &[PermissionGroup],
    ) -> Result<CapabilityTable, AssignmentError> {
        let assignments = permissions
            .iter()
            .map(|permission| PermissionAssignment::decompose(permission.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.compile(&assignments, groups))
    }

    /// Compiles after checking every component against a closed registry.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownComponent`] for the first assignment
    /// naming a component absent from `components`.
    pub fn compile_checked(
        &self,
        components: &ComponentRegistry,
        assignments: &[PermissionAssignment],
        groups: &[PermissionGroup],
    ) -> Result<CapabilityTable, RegistryError> {
        for assignment in assignments {
            components.resolve(assignment.feature_component_id.as_str())?;
        }
        Ok(self.compile(assignments, groups))
    }

    /// Folds one resolved ability into the table under the merge policy.
    fn merge(
        &self,
        table: &mut CapabilityTable,
        assignment: &PermissionAssignment,
        ability: AccessAbility,
    ) {
        let component = &assignment.feature_component_id;
        match self.policy {
            MergePolicy::LastWriteWins => table.insert(component.clone(), ability),
            MergePolicy::Union => match table.get_mut(component.as_str()) {
                Some(existing) => existing.union_with(&ability),
                None => table.insert(component.clone(), ability),
            },
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Indexes permission groups by id; the first definition of an id wins.
fn index_groups(groups: &[PermissionGroup]) -> HashMap<&PermissionGroupId, &PermissionGroup> {
    let mut index = HashMap::with_capacity(groups.len());
    for group in groups {
        index.entry(&group.id).or_insert(group);
    }
    index
}

/// Resolves the ability conferred by one assignment.
fn resolve_ability(
    index: &HashMap<&PermissionGroupId, &PermissionGroup>,
    assignment: &PermissionAssignment,
) -> AccessAbility {
    index.get(&assignment.permission_group_id).map_or_else(
        || {
            warn!(
                component = %assignment.feature_component_id,
                permission_group = %assignment.permission_group_id,
                "permission group not found; component compiled without access"
            );
            AccessAbility::unresolved()
        },
        |group| AccessAbility::from_group(group),
    )
}
