// approval-gate-core/src/runtime/guard.rs
// ============================================================================
// Module: Approval Gate Guard
// Description: Composes the capability evaluator with the workflow gate.
// Purpose: One call deciding whether a user may act on a workflow item.
// Dependencies: crate::{core, runtime::{evaluator, gate, registry, table}}
// ============================================================================

//! ## Overview
//! [`ApprovalGuard::authorize`] is what a protected action button or write
//! endpoint consults. It checks the user's capability on the feature component
//! with `last_authorizer` taken from the item's history, and then asks the
//! workflow gate whether the user's tier may take the next step.
//!
//! An unknown feature flow is a configuration error and is returned as
//! [`RegistryError`]; every other outcome is a [`GateDecision`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::AccessTier;
use crate::core::ApprovalHistory;
use crate::core::DenyReason;
use crate::core::UserId;
use crate::runtime::evaluator::CapabilityEvaluator;
use crate::runtime::evaluator::PermissionCheck;
use crate::runtime::gate::Candidate;
use crate::runtime::gate::GateDecision;
use crate::runtime::gate::WorkflowGate;
use crate::runtime::registry::FlowRegistry;
use crate::runtime::registry::RegistryError;
use crate::runtime::table::CapabilityTable;

// ============================================================================
// SECTION: Approval Guard
// ============================================================================

/// Evaluator-then-gate composition over a flow registry.
#[derive(Debug, Clone, Copy)]
pub struct ApprovalGuard<'a> {
    /// Registered authorization flows.
    flows: &'a FlowRegistry,
}

impl<'a> ApprovalGuard<'a> {
    /// Creates a guard over the given flows.
    #[must_use]
    pub const fn new(flows: &'a FlowRegistry) -> Self {
        Self {
            flows,
        }
    }

    /// Decides whether `user` may take the next step on a feature item.
    ///
    /// `check` supplies the capability requirements; its `last_authorizer` and
    /// `current_user_id` are replaced by the history and `user`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownFlow`] when the feature has no flow.
    pub fn authorize(
        &self,
        table: &CapabilityTable,
        feature: &str,
        check: &PermissionCheck,
        history: &ApprovalHistory,
        user: &UserId,
    ) -> Result<GateDecision, RegistryError> {
        let flow = self.flows.get_flow(feature)?;
        let scoped = PermissionCheck {
            last_authorizer: history.last_authorizer.clone(),
            current_user_id: Some(user.clone()),
            ..check.clone()
        };
        let permission = CapabilityEvaluator::evaluate(table, feature, &scoped);
        if !permission.allowed {
            return Ok(GateDecision {
                allowed: false,
                reason: permission.reason,
                next_tiers: WorkflowGate::permitted_next_tiers(flow, history),
            });
        }
        let Some(tier) = table.get(feature).and_then(|ability| ability.access_level) else {
            return Ok(GateDecision {
                allowed: false,
                reason: Some(DenyReason::NoAccess),
                next_tiers: WorkflowGate::permitted_next_tiers(flow, history),
            });
        };
        Ok(WorkflowGate::decide(flow, history, &Candidate::new(tier, user.clone())))
    }

    /// Returns the tiers that may act next on a feature item.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownFlow`] when the feature has no flow.
    pub fn next_tiers(
        &self,
        feature: &str,
        history: &ApprovalHistory,
    ) -> Result<Vec<AccessTier>, RegistryError> {
        let flow = self.flows.get_flow(feature)?;
        Ok(WorkflowGate::permitted_next_tiers(flow, history))
    }
}
