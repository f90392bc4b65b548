// approval-gate-core/src/core/mod.rs
// ============================================================================
// Module: Approval Gate Core Types
// Description: Canonical access model and approval-state structures.
// Purpose: Provide stable, serializable types consumed by the runtime evaluators.
// Dependencies: serde, smallvec, thiserror
// ============================================================================

//! ## Overview
//! Core types describe who a user is in the access model (tiers, groups,
//! capability flags), how permissions are assigned to feature components, and
//! where a workflow item sits in its approval flow. These types carry no
//! decision logic beyond their own validation.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod assignment;
pub mod capability;
pub mod decision;
pub mod flow;
pub mod history;
pub mod identifiers;
pub mod tier;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use assignment::AssignmentError;
pub use assignment::PERMISSION_SEPARATOR;
pub use assignment::PermissionAssignment;
pub use capability::AccessAbility;
pub use capability::Capability;
pub use capability::PermissionGroup;
pub use capability::UnknownCapabilityError;
pub use decision::DenyReason;
pub use flow::AuthorizationFlow;
pub use flow::FlowError;
pub use flow::FlowPosition;
pub use flow::FlowStep;
pub use history::ApprovalHistory;
pub use history::ResourceStatus;
pub use identifiers::FeatureComponentId;
pub use identifiers::IdentifierError;
pub use identifiers::PermissionGroupId;
pub use identifiers::UserGroupId;
pub use identifiers::UserId;
pub use tier::AccessTier;
pub use tier::UnknownTierError;
