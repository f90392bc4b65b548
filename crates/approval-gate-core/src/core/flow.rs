// approval-gate-core/src/core/flow.rs
// ============================================================================
// Module: Approval Gate Authorization Flows
// Description: Ordered tier sequences that fully approve a workflow item.
// Purpose: Define flow steps and the position re-derivation used by the gate.
// Dependencies: crate::core::tier, serde, smallvec, thiserror
// ============================================================================

//! ## Overview
//! An [`AuthorizationFlow`] is an ordered, non-empty list of steps. Each step
//! is one access tier or a non-empty set of tiers, any of which may take the
//! step. Steps are consumed strictly in order.
//!
//! A flow never stores how far an item has progressed. The position is
//! re-derived from the tier that acted last ([`AuthorizationFlow::position`]),
//! so a flow edited between releases still yields a well-defined answer: a
//! recorded tier that no longer appears in the flow is terminal.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use smallvec::SmallVec;
use smallvec::smallvec;
use thiserror::Error;

use crate::core::tier::AccessTier;

// ============================================================================
// SECTION: Flow Step
// ============================================================================

/// One step of an authorization flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlowStep {
    /// Exactly one tier may take the step.
    Tier(AccessTier),
    /// Any tier in the set may take the step.
    AnyOf(SmallVec<[AccessTier; 4]>),
}

impl FlowStep {
    /// Creates a step accepting any of the given tiers.
    #[must_use]
    pub fn any_of(tiers: &[AccessTier]) -> Self {
        Self::AnyOf(tiers.iter().copied().collect())
    }

    /// Returns true when the tier may take this step.
    #[must_use]
    pub fn accepts(&self, tier: AccessTier) -> bool {
        match self {
            Self::Tier(step) => *step == tier,
            Self::AnyOf(tiers) => tiers.contains(&tier),
        }
    }

    /// Returns the tiers accepted by this step.
    #[must_use]
    pub fn tiers(&self) -> SmallVec<[AccessTier; 4]> {
        match self {
            Self::Tier(tier) => smallvec![*tier],
            Self::AnyOf(tiers) => tiers.clone(),
        }
    }
}

impl From<AccessTier> for FlowStep {
    fn from(value: AccessTier) -> Self {
        Self::Tier(value)
    }
}

// ============================================================================
// SECTION: Flow Position
// ============================================================================

/// Position of a workflow item within a flow, derived from its last tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowPosition {
    /// No action taken yet; the first step is next.
    Start,
    /// The step at this index was taken last; the following step is next.
    After(usize),
    /// The last step was taken; nothing remains.
    Complete,
    /// The recorded tier is absent from the flow; treated as terminal.
    Unrecognized(AccessTier),
}

impl FlowPosition {
    /// Returns true when no further step can be taken.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Unrecognized(_))
    }
}

// ============================================================================
// SECTION: Authorization Flow
// ============================================================================

/// Ordered, non-empty sequence of approval steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<FlowStep>", into = "Vec<FlowStep>")]
pub struct AuthorizationFlow {
    /// Flow steps in approval order.
    steps: Vec<FlowStep>,
}

impl AuthorizationFlow {
    /// Creates a validated flow.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError`] when the flow is empty, a step has no tiers, or a
    /// step names `VIEWER` or `NO_ACCESS`.
    pub fn new(steps: Vec<FlowStep>) -> Result<Self, FlowError> {
        if steps.is_empty() {
            return Err(FlowError::Empty);
        }
        for (index, step) in steps.iter().enumerate() {
            let tiers = step.tiers();
            if tiers.is_empty() {
                return Err(FlowError::EmptyStep {
                    index,
                });
            }
            if let Some(tier) = tiers.iter().copied().find(|tier| !tier.can_advance()) {
                return Err(FlowError::NonAdvancingTier {
                    index,
                    tier,
                });
            }
        }
        Ok(Self {
            steps,
        })
    }

    /// Creates a flow where every step is a single tier.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError`] under the same rules as [`AuthorizationFlow::new`].
    pub fn linear(tiers: &[AccessTier]) -> Result<Self, FlowError> {
        Self::new(tiers.iter().copied().map(FlowStep::Tier).collect())
    }

    /// Returns the flow steps in order.
    #[must_use]
    pub fn steps(&self) -> &[FlowStep] {
        &self.steps
    }

    /// Returns the number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false: flows are validated non-empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns the index of the first step accepting the tier.
    #[must_use]
    pub fn index_of(&self, tier: AccessTier) -> Option<usize> {
        self.steps.iter().position(|step| step.accepts(tier))
    }

    /// Derives the item's position from the tier that acted last.
    #[must_use]
    pub fn position(&self, current: Option<AccessTier>) -> FlowPosition {
        let Some(tier) = current else {
            return FlowPosition::Start;
        };
        match self.index_of(tier) {
            None => FlowPosition::Unrecognized(tier),
            Some(index) if index + 1 >= self.steps.len() => FlowPosition::Complete,
            Some(index) => FlowPosition::After(index),
        }
    }

    /// Returns the step permitted next, or `None` when the position is terminal.
    #[must_use]
    pub fn next_step(&self, current: Option<AccessTier>) -> Option<&FlowStep> {
        match self.position(current) {
            FlowPosition::Start => self.steps.first(),
            FlowPosition::After(index) => self.steps.get(index + 1),
            FlowPosition::Complete | FlowPosition::Unrecognized(_) => None,
        }
    }

    /// Returns the tiers that may act next; empty when the flow is finished.
    #[must_use]
    pub fn next_acceptable_tiers(&self, current: Option<AccessTier>) -> Vec<AccessTier> {
        self.next_step(current).map(|step| step.tiers().into_vec()).unwrap_or_default()
    }
}

impl TryFrom<Vec<FlowStep>> for AuthorizationFlow {
    type Error = FlowError;

    fn try_from(value: Vec<FlowStep>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AuthorizationFlow> for Vec<FlowStep> {
    fn from(value: AuthorizationFlow) -> Self {
        value.steps
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Authorization flow validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    /// Flow has no steps.
    #[error("authorization flow must define at least one step")]
    Empty,
    /// A step accepts no tiers.
    #[error("authorization flow step {index} must name at least one tier")]
    EmptyStep {
        /// Zero-based step index.
        index: usize,
    },
    /// A step names a tier that never advances a workflow.
    #[error("authorization flow step {index} names non-advancing tier {tier}")]
    NonAdvancingTier {
        /// Zero-based step index.
        index: usize,
        /// Offending tier.
        tier: AccessTier,
    },
}
