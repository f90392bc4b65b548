// approval-gate-core/src/core/history.rs
// ============================================================================
// Module: Approval Gate Approval History
// Description: Resource-side record of approval progress.
// Purpose: Carry the status, last acting tier, and last actor of a workflow item.
// Dependencies: crate::core::{identifiers, tier}, serde
// ============================================================================

//! ## Overview
//! Approval history is owned by the resource persistence layer and only read
//! here. `current_authorization_state = None` means no step has been taken yet.
//!
//! Callers that commit an approval must re-check the gate inside the same
//! transaction that updates `current_authorization_state` and
//! `last_authorizer`; otherwise two authorizers acting together can both pass.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::UserId;
use crate::core::tier::AccessTier;

// ============================================================================
// SECTION: Resource Status
// ============================================================================

/// Business status of a workflow-bearing resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceStatus {
    /// Awaiting approval steps.
    Pending,
    /// Fully approved.
    Approved,
    /// Rejected; terminal for the gate.
    Rejected,
    /// Any other business status; the gate follows the flow position.
    ///
    /// The original status string is not kept: an unknown status read from
    /// the resource layer serializes back as `"OTHER"`. Callers that persist
    /// the status must write their own value, not this one.
    #[serde(other)]
    Other,
}

impl ResourceStatus {
    /// Returns true when the status forbids any further advancement.
    #[must_use]
    pub const fn is_rejected(self) -> bool {
        matches!(self, Self::Rejected)
    }
}

// ============================================================================
// SECTION: Approval History
// ============================================================================

/// Approval progress of one workflow item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalHistory {
    /// Business status.
    pub status: ResourceStatus,
    /// Tier that acted last, or `None` when nothing has happened yet.
    #[serde(default)]
    pub current_authorization_state: Option<AccessTier>,
    /// User that acted last.
    #[serde(default)]
    pub last_authorizer: Option<UserId>,
}

impl ApprovalHistory {
    /// Returns the history of an item no one has acted on.
    #[must_use]
    pub const fn pending() -> Self {
        Self {
            status: ResourceStatus::Pending,
            current_authorization_state: None,
            last_authorizer: None,
        }
    }

    /// Returns a pending history after `tier` was taken by `user`.
    #[must_use]
    pub fn acted(tier: AccessTier, user: impl Into<UserId>) -> Self {
        Self {
            status: ResourceStatus::Pending,
            current_authorization_state: Some(tier),
            last_authorizer: Some(user.into()),
        }
    }

    /// Returns the history with a different status.
    #[must_use]
    pub fn with_status(mut self, status: ResourceStatus) -> Self {
        self.status = status;
        self
    }
}
