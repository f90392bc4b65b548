// approval-gate-core/src/lib.rs
// ============================================================================
// Module: Approval Gate Core Library
// Description: Public API surface for the Approval Gate authorization core.
// Purpose: Expose the data model, permission compiler, evaluator, and workflow gate.
// Dependencies: crate::{core, runtime}
// ============================================================================

//! ## Overview
//! Approval Gate core answers two questions for protected screens and
//! multi-step approval actions: "may this user perform this capability on this
//! feature component" and "may this user take the next step of this item's
//! maker/checker/authorizer flow". Every decision is a pure function of
//! immutable inputs; the crate performs no I/O and holds no ambient state.
//!
//! Decisions fail closed. Malformed configuration is rejected with a typed
//! error when registries are built; everything observed at evaluation time
//! (missing components, drifted flow states) degrades to a denial.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use runtime::ApprovalGuard;
pub use runtime::CapabilityEvaluator;
pub use runtime::Candidate;
pub use runtime::CapabilityTable;
pub use runtime::ComponentMeta;
pub use runtime::ComponentRegistry;
pub use runtime::Fallback;
pub use runtime::FlowRegistry;
pub use runtime::GateDecision;
pub use runtime::MergePolicy;
pub use runtime::NavItem;
pub use runtime::PERMISSION_DENIED_MESSAGE;
pub use runtime::PermissionCheck;
pub use runtime::PermissionCompiler;
pub use runtime::PermissionDecision;
pub use runtime::RegistryError;
pub use runtime::RenderMode;
pub use runtime::SharedCapabilityTable;
pub use runtime::WorkflowGate;
pub use runtime::filter_nav_items;
pub use runtime::next_acceptable_tiers;
pub use runtime::under_user_group;
