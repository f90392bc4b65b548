// approval-gate-cli/src/lib.rs
// ============================================================================
// Module: Approval Gate CLI Library
// Description: Shared helpers for the Approval Gate command-line interface.
// Purpose: Provide reusable components (i18n, logging) for the CLI binary and tests.
// Dependencies: Standard library, tracing-subscriber.
// ============================================================================

//! ## Overview
//! This library module houses shared CLI utilities: the message catalog used
//! for every user-facing string and the one-time logging subscriber setup. The
//! binary entry point (`src/main.rs`) imports these helpers to keep output
//! consistent.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Internationalization helpers and message catalog.
pub mod i18n;
/// Tracing subscriber installation.
pub mod logging;
