// approval-gate-core/src/core/tier.rs
// ============================================================================
// Module: Approval Gate Access Tiers
// Description: Closed enumeration of maker/checker/authorizer access tiers.
// Purpose: Provide the canonical tier vocabulary shared by groups, flows, and history.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! An access tier is a user's rung in the maker-checker-authorizer hierarchy
//! for one feature. Tiers carry no intrinsic ordering: the order in which they
//! act is defined per feature by an [`crate::AuthorizationFlow`].
//!
//! `SUPER_USER` is the universal bypass tier. `VIEWER` and `NO_ACCESS` never
//! advance a workflow.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Access Tier
// ============================================================================

/// Access tier assigned through a permission group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessTier {
    /// Initiates a workflow item.
    #[serde(rename = "MAKER")]
    Maker,
    /// Reviews the maker's submission.
    #[serde(rename = "CHECKER")]
    Checker,
    /// First authorizer tier.
    #[serde(rename = "AUTHORIZER_1")]
    Authorizer1,
    /// Second authorizer tier.
    #[serde(rename = "AUTHORIZER_2")]
    Authorizer2,
    /// Third authorizer tier.
    #[serde(rename = "AUTHORIZER_3")]
    Authorizer3,
    /// Fourth authorizer tier.
    #[serde(rename = "AUTHORIZER_4")]
    Authorizer4,
    /// Universal bypass tier.
    #[serde(rename = "SUPER_USER")]
    SuperUser,
    /// Read-only tier.
    #[serde(rename = "VIEWER")]
    Viewer,
    /// Explicitly denied tier.
    #[serde(rename = "NO_ACCESS")]
    NoAccess,
}

impl AccessTier {
    /// Every tier, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Maker,
        Self::Checker,
        Self::Authorizer1,
        Self::Authorizer2,
        Self::Authorizer3,
        Self::Authorizer4,
        Self::SuperUser,
        Self::Viewer,
        Self::NoAccess,
    ];

    /// Returns the canonical wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Maker => "MAKER",
            Self::Checker => "CHECKER",
            Self::Authorizer1 => "AUTHORIZER_1",
            Self::Authorizer2 => "AUTHORIZER_2",
            Self::Authorizer3 => "AUTHORIZER_3",
            Self::Authorizer4 => "AUTHORIZER_4",
            Self::SuperUser => "SUPER_USER",
            Self::Viewer => "VIEWER",
            Self::NoAccess => "NO_ACCESS",
        }
    }

    /// Returns true for the universal bypass tier.
    #[must_use]
    pub const fn is_super_user(self) -> bool {
        matches!(self, Self::SuperUser)
    }

    /// Returns true when the tier may take a workflow step.
    #[must_use]
    pub const fn can_advance(self) -> bool {
        !matches!(self, Self::Viewer | Self::NoAccess)
    }
}

impl fmt::Display for AccessTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessTier {
    type Err = UnknownTierError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.as_str() == value)
            .ok_or_else(|| UnknownTierError(value.to_string()))
    }
}

/// Raised when parsing a tier name outside the closed enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown access tier: {0}")]
pub struct UnknownTierError(pub String);
