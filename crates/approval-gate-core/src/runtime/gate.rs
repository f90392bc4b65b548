// approval-gate-core/src/runtime/gate.rs
// ============================================================================
// Module: Approval Gate Workflow Gate
// Description: Decides whether a candidate may take the next approval step.
// Purpose: Enforce step order, self-approval, and terminal states per item.
// Dependencies: crate::core, serde, tracing
// ============================================================================

//! ## Overview
//! The gate never stores a step index. On every call it re-derives the item's
//! position from `current_authorization_state` (see
//! [`AuthorizationFlow::position`]) and then applies, in order:
//!
//! - `REJECTED` status is terminal;
//! - a completed flow, or a recorded tier missing from the flow, is terminal;
//! - the user that acted last may not act again, whatever their tier;
//! - `VIEWER` and `NO_ACCESS` candidates never advance;
//! - `SUPER_USER` may take any non-terminal step;
//! - every other tier must be accepted by the next step.
//!
//! A recorded tier that is missing from the flow is data drift: it is logged
//! and denied, never raised.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use tracing::warn;

use crate::core::AccessTier;
use crate::core::ApprovalHistory;
use crate::core::AuthorizationFlow;
use crate::core::DenyReason;
use crate::core::FlowPosition;
use crate::core::UserId;

// ============================================================================
// SECTION: Candidate
// ============================================================================

/// User asking to take the next step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Candidate's access tier for the feature.
    pub tier: AccessTier,
    /// Candidate's user id.
    pub user_id: UserId,
}

impl Candidate {
    /// Creates a candidate.
    #[must_use]
    pub fn new(tier: AccessTier, user_id: impl Into<UserId>) -> Self {
        Self {
            tier,
            user_id: user_id.into(),
        }
    }
}

// ============================================================================
// SECTION: Gate Decision
// ============================================================================

/// Outcome of a gate query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateDecision {
    /// Whether the candidate may take the next step.
    pub allowed: bool,
    /// Why the candidate was denied; `None` when allowed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<DenyReason>,
    /// Tiers permitted to take the next step; empty when terminal.
    pub next_tiers: Vec<AccessTier>,
}

impl GateDecision {
    /// Returns an allowing decision.
    fn allow(next_tiers: Vec<AccessTier>) -> Self {
        Self {
            allowed: true,
            reason: None,
            next_tiers,
        }
    }

    /// Returns a denying decision.
    fn deny(reason: DenyReason, next_tiers: Vec<AccessTier>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
            next_tiers,
        }
    }
}

// ============================================================================
// SECTION: Workflow Gate
// ============================================================================

/// Stateless workflow gate.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkflowGate;

impl WorkflowGate {
    /// Decides whether the candidate may take the next step of the flow.
    #[must_use]
    pub fn decide(
        flow: &AuthorizationFlow,
        history: &ApprovalHistory,
        candidate: &Candidate,
    ) -> GateDecision {
        let decision = decide(flow, history, candidate);
        debug!(
            tier = %candidate.tier,
            user = candidate.user_id.as_str(),
            state = history.current_authorization_state.map(AccessTier::as_str),
            allowed = decision.allowed,
            reason = decision.reason.map(DenyReason::as_str),
            "workflow gate evaluated"
        );
        decision
    }

    /// Returns true when the candidate may take the next step.
    #[must_use]
    pub fn can_advance(
        flow: &AuthorizationFlow,
        history: &ApprovalHistory,
        candidate: &Candidate,
    ) -> bool {
        Self::decide(flow, history, candidate).allowed
    }

    /// Returns the tiers permitted to act next on the item.
    ///
    /// Rejected items and finished flows yield an empty list.
    #[must_use]
    pub fn permitted_next_tiers(
        flow: &AuthorizationFlow,
        history: &ApprovalHistory,
    ) -> Vec<AccessTier> {
        if history.status.is_rejected() {
            return Vec::new();
        }
        flow.next_acceptable_tiers(history.current_authorization_state)
    }
}

/// Applies the gate rules without logging the outcome.
fn decide(
    flow: &AuthorizationFlow,
    history: &ApprovalHistory,
    candidate: &Candidate,
) -> GateDecision {
    if history.status.is_rejected() {
        return GateDecision::deny(DenyReason::Rejected, Vec::new());
    }
    let position = flow.position(history.current_authorization_state);
    match position {
        FlowPosition::Complete => {
            return GateDecision::deny(DenyReason::FlowComplete, Vec::new());
        }
        FlowPosition::Unrecognized(tier) => {
            warn!(
                state = %tier,
                "recorded authorization state is not part of the flow; treating as terminal"
            );
            return GateDecision::deny(DenyReason::StateNotInFlow, Vec::new());
        }
        FlowPosition::Start | FlowPosition::After(_) => {}
    }
    let next_tiers = flow.next_acceptable_tiers(history.current_authorization_state);
    if history.last_authorizer.as_ref() == Some(&candidate.user_id) {
        return GateDecision::deny(DenyReason::SelfApproval, next_tiers);
    }
    if !candidate.tier.can_advance() {
        return GateDecision::deny(DenyReason::NonAdvancingTier, next_tiers);
    }
    if candidate.tier.is_super_user() || next_tiers.contains(&candidate.tier) {
        return GateDecision::allow(next_tiers);
    }
    GateDecision::deny(DenyReason::WrongStep, next_tiers)
}
