// approval-gate-config/src/lib.rs
// ============================================================================
// Module: Approval Gate Config Library
// Description: Canonical config model, validation, and example generation.
// Purpose: Single source of truth for approval-gate.toml semantics.
// Dependencies: approval-gate-core, serde, toml
// ============================================================================

//! ## Overview
//! `approval-gate-config` defines the deployable configuration of the
//! authorization core: the closed feature component registry, permission
//! group definitions, authorization flows, the navigation tree, the compiler
//! merge policy, and logging. Loading is strict and fail-closed; a config that
//! loads successfully always builds valid core registries.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
