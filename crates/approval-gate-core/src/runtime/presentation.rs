// approval-gate-core/src/runtime/presentation.rs
// ============================================================================
// Module: Approval Gate Presentation Fallback
// Description: Maps a decision onto how a protected control is rendered.
// Purpose: Keep denial rendering generic so no access-model detail leaks.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A denied control is hidden, replaced by a generic denial surface, or shown
//! disabled. The deny reason is never part of what is rendered.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Text of the generic denial surface.
pub const PERMISSION_DENIED_MESSAGE: &str = "Permission Denied!";

// ============================================================================
// SECTION: Fallback
// ============================================================================

/// How a denied control is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fallback {
    /// Render nothing.
    #[default]
    Hide,
    /// Render the generic denial surface.
    Forbidden,
    /// Render the control disabled.
    Disable,
}

/// Rendering outcome for a protected control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Render the control normally.
    Show,
    /// Render nothing.
    Hide,
    /// Render [`PERMISSION_DENIED_MESSAGE`].
    Forbidden,
    /// Render the control disabled.
    Disabled,
}

impl Fallback {
    /// Returns how to render a control given whether access was allowed.
    #[must_use]
    pub const fn render(self, allowed: bool) -> RenderMode {
        if allowed {
            return RenderMode::Show;
        }
        match self {
            Self::Hide => RenderMode::Hide,
            Self::Forbidden => RenderMode::Forbidden,
            Self::Disable => RenderMode::Disabled,
        }
    }
}
