// approval-gate-core/src/core/capability.rs
// ============================================================================
// Module: Approval Gate Capabilities
// Description: Capability flags, permission groups, and compiled access abilities.
// Purpose: Define the per-component capability record consumed by the evaluator.
// Dependencies: crate::core::{identifiers, tier}, serde, thiserror
// ============================================================================

//! ## Overview
//! A [`PermissionGroup`] is an administrator-defined bundle of boolean
//! capabilities plus an access tier. The permission compiler resolves groups
//! into one [`AccessAbility`] per feature component for a single user.
//!
//! An ability with `access_level = None` is the result of an assignment whose
//! permission group could not be resolved; it grants nothing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::PermissionGroupId;
use crate::core::tier::AccessTier;

// ============================================================================
// SECTION: Capability
// ============================================================================

/// Single boolean capability carried by a permission group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// View the component.
    #[serde(rename = "can_view")]
    View,
    /// Create new records.
    #[serde(rename = "can_insert")]
    Insert,
    /// Edit existing records.
    #[serde(rename = "can_edit")]
    Edit,
    /// Delete records.
    #[serde(rename = "can_delete")]
    Delete,
    /// Authorize (approve) a workflow step.
    #[serde(rename = "can_authorize")]
    Authorize,
    /// Reject a workflow item.
    #[serde(rename = "can_reject")]
    Reject,
    /// Submit a workflow item.
    #[serde(rename = "can_submit")]
    Submit,
}

impl Capability {
    /// Every capability, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::View,
        Self::Insert,
        Self::Edit,
        Self::Delete,
        Self::Authorize,
        Self::Reject,
        Self::Submit,
    ];

    /// Returns the canonical wire name (`can_*`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::View => "can_view",
            Self::Insert => "can_insert",
            Self::Edit => "can_edit",
            Self::Delete => "can_delete",
            Self::Authorize => "can_authorize",
            Self::Reject => "can_reject",
            Self::Submit => "can_submit",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = UnknownCapabilityError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|capability| capability.as_str() == value)
            .ok_or_else(|| UnknownCapabilityError(value.to_string()))
    }
}

/// Raised when parsing a capability name outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown capability: {0}")]
pub struct UnknownCapabilityError(pub String);

// ============================================================================
// SECTION: Permission Group
// ============================================================================

/// Administrator-defined bundle of capabilities plus an access tier.
///
/// Permission groups are read-only inputs at evaluation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGroup {
    /// Permission group identifier.
    pub id: PermissionGroupId,
    /// Access tier conferred by the group.
    pub access_level: AccessTier,
    /// View capability.
    #[serde(default)]
    pub can_view: bool,
    /// Insert capability.
    #[serde(default)]
    pub can_insert: bool,
    /// Edit capability.
    #[serde(default)]
    pub can_edit: bool,
    /// Delete capability.
    #[serde(default)]
    pub can_delete: bool,
    /// Authorize capability.
    #[serde(default)]
    pub can_authorize: bool,
    /// Reject capability.
    #[serde(default)]
    pub can_reject: bool,
    /// Submit capability.
    #[serde(default)]
    pub can_submit: bool,
}

impl PermissionGroup {
    /// Creates a permission group with every capability disabled.
    #[must_use]
    pub fn new(id: impl Into<PermissionGroupId>, access_level: AccessTier) -> Self {
        Self {
            id: id.into(),
            access_level,
            can_view: false,
            can_insert: false,
            can_edit: false,
            can_delete: false,
            can_authorize: false,
            can_reject: false,
            can_submit: false,
        }
    }

    /// Returns the group with the given capabilities enabled.
    #[must_use]
    pub fn with(mut self, capabilities: &[Capability]) -> Self {
        for capability in capabilities {
            match capability {
                Capability::View => self.can_view = true,
                Capability::Insert => self.can_insert = true,
                Capability::Edit => self.can_edit = true,
                Capability::Delete => self.can_delete = true,
                Capability::Authorize => self.can_authorize = true,
                Capability::Reject => self.can_reject = true,
                Capability::Submit => self.can_submit = true,
            }
        }
        self
    }

    /// Returns whether the group grants a capability.
    #[must_use]
    pub const fn grants(&self, capability: Capability) -> bool {
        match capability {
            Capability::View => self.can_view,
            Capability::Insert => self.can_insert,
            Capability::Edit => self.can_edit,
            Capability::Delete => self.can_delete,
            Capability::Authorize => self.can_authorize,
            Capability::Reject => self.can_reject,
            Capability::Submit => self.can_submit,
        }
    }
}

// ============================================================================
// SECTION: Access Ability
// ============================================================================

/// Compiled capability record for one user on one feature component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessAbility {
    /// Resolved access tier; `None` when the permission group was absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_level: Option<AccessTier>,
    /// View capability.
    pub can_view: bool,
    /// Insert capability.
    pub can_insert: bool,
    /// Edit capability.
    pub can_edit: bool,
    /// Delete capability.
    pub can_delete: bool,
    /// Authorize capability.
    pub can_authorize: bool,
    /// Reject capability.
    pub can_reject: bool,
    /// Submit capability.
    pub can_submit: bool,
}

impl AccessAbility {
    /// Returns the ability produced for an unresolved permission group.
    #[must_use]
    pub const fn unresolved() -> Self {
        Self {
            access_level: None,
            can_view: false,
            can_insert: false,
            can_edit: false,
            can_delete: false,
            can_authorize: false,
            can_reject: false,
            can_submit: false,
        }
    }

    /// Returns the ability conferred by a single permission group.
    #[must_use]
    pub const fn from_group(group: &PermissionGroup) -> Self {
        Self {
            access_level: Some(group.access_level),
            can_view: group.can_view,
            can_insert: group.can_insert,
            can_edit: group.can_edit,
            can_delete: group.can_delete,
            can_authorize: group.can_authorize,
            can_reject: group.can_reject,
            can_submit: group.can_submit,
        }
    }

    /// Returns whether the ability includes a capability.
    #[must_use]
    pub const fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::View => self.can_view,
            Capability::Insert => self.can_insert,
            Capability::Edit => self.can_edit,
            Capability::Delete => self.can_delete,
            Capability::Authorize => self.can_authorize,
            Capability::Reject => self.can_reject,
            Capability::Submit => self.can_submit,
        }
    }

    /// Returns true when the ability grants any access at all.
    ///
    /// Unresolved abilities and `NO_ACCESS` abilities are closed.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !matches!(self.access_level, None | Some(AccessTier::NoAccess))
    }

    /// Merges another ability into this one as a capability union.
    ///
    /// Capability flags are OR-ed. The access level keeps `SUPER_USER` once
    /// seen, lets any resolved tier replace `NO_ACCESS` or `None`, never lets
    /// `NO_ACCESS` or `None` replace a resolved tier, and otherwise takes the
    /// later tier.
    pub const fn union_with(&mut self, other: &Self) {
        self.access_level = merge_access_level(self.access_level, other.access_level);
        self.can_view |= other.can_view;
        self.can_insert |= other.can_insert;
        self.can_edit |= other.can_edit;
        self.can_delete |= other.can_delete;
        self.can_authorize |= other.can_authorize;
        self.can_reject |= other.can_reject;
        self.can_submit |= other.can_submit;
    }
}

/// Resolves the access level of two abilities under union merging.
const fn merge_access_level(
    current: Option<AccessTier>,
    incoming: Option<AccessTier>,
) -> Option<AccessTier> {
    match (current, incoming) {
        (Some(AccessTier::SuperUser), _) | (_, Some(AccessTier::SuperUser)) => {
            Some(AccessTier::SuperUser)
        }
        (current, None) => current,
        (Some(current), Some(AccessTier::NoAccess)) => Some(current),
        (_, Some(incoming)) => Some(incoming),
    }
}
