// approval-gate-core/src/runtime/evaluator.rs
// ============================================================================
// Module: Approval Gate Capability Evaluator
// Description: Answers whether a user may perform an action on a component.
// Purpose: Fail-closed permission checks over a compiled capability table.
// Dependencies: crate::{core, runtime::table}, serde, tracing
// ============================================================================

//! ## Overview
//! [`CapabilityEvaluator::evaluate`] runs a fixed sequence of checks and stops
//! at the first failure:
//!
//! 1. an anonymous check (no current user) is denied;
//! 2. a component absent from the table, unresolved, or `NO_ACCESS` is denied;
//! 3. a non-`SUPER_USER` whose user id equals the last authorizer is denied;
//! 4. a required tier must match, unless the ability is `SUPER_USER`;
//! 5. a single required capability must be granted;
//! 6. at least one of the `actions` capabilities must be granted.
//!
//! Checks whose inputs are not supplied pass vacuously.
//!
//! **`actions` uses OR semantics**: `[can_edit, can_delete]` passes when
//! either capability is granted. Callers needing every capability must supply
//! separate checks.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::core::AccessAbility;
use crate::core::AccessTier;
use crate::core::Capability;
use crate::core::DenyReason;
use crate::core::UserId;
use crate::runtime::table::CapabilityTable;

// ============================================================================
// SECTION: Permission Check
// ============================================================================

/// Inputs of one permission check. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionCheck {
    /// Single capability that must be granted.
    #[serde(default)]
    pub action: Option<Capability>,
    /// Capabilities of which at least one must be granted.
    #[serde(default)]
    pub actions: Vec<Capability>,
    /// Tier the ability must hold (`SUPER_USER` always matches).
    #[serde(default)]
    pub access_level: Option<AccessTier>,
    /// User that last acted on the item being protected.
    #[serde(default)]
    pub last_authorizer: Option<UserId>,
    /// User performing the check; `None` is anonymous and always denied.
    #[serde(default)]
    pub current_user_id: Option<UserId>,
}

impl PermissionCheck {
    /// Creates a check for the given current user with no other requirement.
    #[must_use]
    pub fn for_user(user: impl Into<UserId>) -> Self {
        Self {
            current_user_id: Some(user.into()),
            ..Self::default()
        }
    }

    /// Requires a single capability.
    #[must_use]
    pub const fn action(mut self, action: Capability) -> Self {
        self.action = Some(action);
        self
    }

    /// Requires at least one of the given capabilities.
    #[must_use]
    pub fn any_of(mut self, actions: &[Capability]) -> Self {
        self.actions = actions.to_vec();
        self
    }

    /// Requires the given tier.
    #[must_use]
    pub const fn access_level(mut self, tier: AccessTier) -> Self {
        self.access_level = Some(tier);
        self
    }

    /// Sets the user that last acted on the protected item.
    #[must_use]
    pub fn last_authorizer(mut self, user: impl Into<UserId>) -> Self {
        self.last_authorizer = Some(user.into());
        self
    }
}

// ============================================================================
// SECTION: Permission Decision
// ============================================================================

/// Outcome of a permission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionDecision {
    /// Whether the check passed.
    pub allowed: bool,
    /// Why the check failed; `None` when allowed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<DenyReason>,
}

impl PermissionDecision {
    /// Returns an allowing decision.
    #[must_use]
    pub const fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    /// Returns a denying decision with a reason.
    #[must_use]
    pub const fn deny(reason: DenyReason) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
        }
    }
}

// ============================================================================
// SECTION: Capability Evaluator
// ============================================================================

/// Stateless evaluator of permission checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct CapabilityEvaluator;

impl CapabilityEvaluator {
    /// Evaluates a check and returns the decision with its deny reason.
    #[must_use]
    pub fn evaluate(
        table: &CapabilityTable,
        component_id: &str,
        check: &PermissionCheck,
    ) -> PermissionDecision {
        let decision = decide(table, component_id, check);
        debug!(
            component = component_id,
            user = check.current_user_id.as_ref().map(UserId::as_str),
            allowed = decision.allowed,
            reason = decision.reason.map(DenyReason::as_str),
            "permission evaluated"
        );
        decision
    }

    /// Returns true when the check passes.
    #[must_use]
    pub fn has_permission(
        table: &CapabilityTable,
        component_id: &str,
        check: &PermissionCheck,
    ) -> bool {
        Self::evaluate(table, component_id, check).allowed
    }
}

/// Runs the ordered checks without logging.
fn decide(
    table: &CapabilityTable,
    component_id: &str,
    check: &PermissionCheck,
) -> PermissionDecision {
    let Some(current_user) = check.current_user_id.as_ref() else {
        return PermissionDecision::deny(DenyReason::Anonymous);
    };
    let Some(ability) = table.get(component_id) else {
        return PermissionDecision::deny(DenyReason::UnknownComponent);
    };
    let Some(level) = ability.access_level.filter(|_| ability.is_open()) else {
        return PermissionDecision::deny(DenyReason::NoAccess);
    };
    if !level.is_super_user() && check.last_authorizer.as_ref() == Some(current_user) {
        return PermissionDecision::deny(DenyReason::SelfApproval);
    }
    let level_matches = check
        .access_level
        .is_none_or(|required| level.is_super_user() || level == required);
    if !level_matches {
        return PermissionDecision::deny(DenyReason::AccessLevelMismatch);
    }
    if check.action.is_some_and(|action| !ability.has(action)) {
        return PermissionDecision::deny(DenyReason::MissingCapability);
    }
    if !check.actions.is_empty() && !grants_any(ability, &check.actions) {
        return PermissionDecision::deny(DenyReason::MissingCapability);
    }
    PermissionDecision::allow()
}

/// Returns true when any of the capabilities is granted.
fn grants_any(ability: &AccessAbility, actions: &[Capability]) -> bool {
    actions.iter().any(|action| ability.has(*action))
}
