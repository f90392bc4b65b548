// approval-gate-core/src/runtime/mod.rs
// ============================================================================
// Module: Approval Gate Runtime
// Description: Permission compiler, capability evaluator, and workflow gate.
// Purpose: Turn assignments into capability tables and answer access questions.
// Dependencies: crate::core, tracing
// ============================================================================

//! ## Overview
//! Runtime modules compile permission assignments into a [`CapabilityTable`],
//! evaluate capability checks against it, and gate workflow steps against an
//! item's approval history. Every function here is synchronous and free of
//! side effects other than `tracing` events, so it can run on every render or
//! request without coordination.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod compiler;
pub mod evaluator;
pub mod gate;
pub mod guard;
pub mod navigation;
pub mod presentation;
pub mod registry;
pub mod table;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use compiler::MergePolicy;
pub use compiler::PermissionCompiler;
pub use evaluator::CapabilityEvaluator;
pub use evaluator::PermissionCheck;
pub use evaluator::PermissionDecision;
pub use gate::Candidate;
pub use gate::GateDecision;
pub use gate::WorkflowGate;
pub use guard::ApprovalGuard;
pub use navigation::NavItem;
pub use navigation::filter_nav_items;
pub use navigation::under_user_group;
pub use presentation::Fallback;
pub use presentation::PERMISSION_DENIED_MESSAGE;
pub use presentation::RenderMode;
pub use registry::ComponentMeta;
pub use registry::ComponentRegistry;
pub use registry::FlowRegistry;
pub use registry::RegistryError;
pub use registry::next_acceptable_tiers;
pub use table::CapabilityTable;
pub use table::SharedCapabilityTable;
