// approval-gate-core/src/core/decision.rs
// ============================================================================
// Module: Approval Gate Deny Reasons
// Description: Machine-readable codes explaining a denied decision.
// Purpose: Let callers log and hint without branching on exceptions.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Evaluator and gate decisions are booleans plus an optional [`DenyReason`].
//! Reasons are for logs and UI hints only; end-user surfaces must render a
//! generic denial and never reveal which rule failed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Deny Reason
// ============================================================================

/// Why an evaluator or gate decision was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// No current user was supplied.
    Anonymous,
    /// The component was never compiled into the table.
    UnknownComponent,
    /// The ability is `NO_ACCESS` or has no resolved tier.
    NoAccess,
    /// The user acted last on this item.
    SelfApproval,
    /// The ability's tier does not match the required tier.
    AccessLevelMismatch,
    /// A required capability is missing.
    MissingCapability,
    /// The item was rejected.
    Rejected,
    /// The last flow step has been taken.
    FlowComplete,
    /// The recorded tier is absent from the flow.
    StateNotInFlow,
    /// The candidate's tier never advances a workflow.
    NonAdvancingTier,
    /// The candidate's tier is not permitted for the next step.
    WrongStep,
}

impl DenyReason {
    /// Returns the stable snake_case code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Anonymous => "anonymous",
            Self::UnknownComponent => "unknown_component",
            Self::NoAccess => "no_access",
            Self::SelfApproval => "self_approval",
            Self::AccessLevelMismatch => "access_level_mismatch",
            Self::MissingCapability => "missing_capability",
            Self::Rejected => "rejected",
            Self::FlowComplete => "flow_complete",
            Self::StateNotInFlow => "state_not_in_flow",
            Self::NonAdvancingTier => "non_advancing_tier",
            Self::WrongStep => "wrong_step",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
