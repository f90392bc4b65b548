// approval-gate-core/src/core/identifiers.rs
// ============================================================================
// Module: Approval Gate Identifiers
// Description: Opaque and hierarchical identifiers used by the access model.
// Purpose: Provide strongly typed, serializable IDs with stable string forms.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! User, user group, and permission group identifiers are opaque strings.
//! Feature component identifiers are hierarchical (`module.submodule[.component]`)
//! and are validated on construction so that every component id observed by the
//! compiler or evaluator is well formed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Separator between feature component segments.
const SEGMENT_SEPARATOR: char = '.';
/// Maximum accepted length of a feature component identifier.
const MAX_COMPONENT_ID_LENGTH: usize = 256;

// ============================================================================
// SECTION: Opaque Identifiers
// ============================================================================

/// User identifier resolved by the session layer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a new user identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// User group identifier (a user may belong to several).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserGroupId(String);

impl UserGroupId {
    /// Creates a new user group identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for UserGroupId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for UserGroupId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Permission group identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionGroupId(String);

impl PermissionGroupId {
    /// Creates a new permission group identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PermissionGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for PermissionGroupId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PermissionGroupId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Feature Component Identifier
// ============================================================================

/// Hierarchical feature component identifier (`module.submodule[.component]`).
///
/// The identifier is both an ACL key and a navigation key. The module id is the
/// first segment and the submodule id is the first two segments joined.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FeatureComponentId(String);

impl FeatureComponentId {
    /// Parses and validates a feature component identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError`] when the identifier is empty, too long,
    /// contains an empty segment, or contains characters outside
    /// `[A-Za-z0-9_-]`.
    pub fn parse(value: impl Into<String>) -> Result<Self, IdentifierError> {
        let value = value.into();
        if value.is_empty() {
            return Err(IdentifierError::Empty);
        }
        if value.len() > MAX_COMPONENT_ID_LENGTH {
            return Err(IdentifierError::TooLong {
                max: MAX_COMPONENT_ID_LENGTH,
            });
        }
        for segment in value.split(SEGMENT_SEPARATOR) {
            if segment.is_empty() {
                return Err(IdentifierError::EmptySegment(value));
            }
            if let Some(ch) = segment.chars().find(|ch| !is_segment_char(*ch)) {
                return Err(IdentifierError::InvalidCharacter {
                    id: value,
                    ch,
                });
            }
        }
        Ok(Self(value))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the module id (first segment).
    #[must_use]
    pub fn module_id(&self) -> &str {
        self.0.split(SEGMENT_SEPARATOR).next().unwrap_or(&self.0)
    }

    /// Returns the submodule id (first two segments joined).
    ///
    /// A single-segment identifier is its own submodule id.
    #[must_use]
    pub fn submodule_id(&self) -> &str {
        match self.0.match_indices(SEGMENT_SEPARATOR).nth(1) {
            Some((index, _)) => &self.0[.. index],
            None => &self.0,
        }
    }

    /// Returns the identifier segments in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEGMENT_SEPARATOR)
    }
}

/// Returns true when the character is allowed inside a component segment.
const fn is_segment_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'
}

impl fmt::Display for FeatureComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Borrow<str> for FeatureComponentId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl FromStr for FeatureComponentId {
    type Err = IdentifierError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for FeatureComponentId {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<FeatureComponentId> for String {
    fn from(value: FeatureComponentId) -> Self {
        value.0
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Identifier validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// Identifier is empty.
    #[error("feature component id must be non-empty")]
    Empty,
    /// Identifier exceeds the length limit.
    #[error("feature component id exceeds {max} bytes")]
    TooLong {
        /// Maximum allowed length in bytes.
        max: usize,
    },
    /// Identifier contains an empty segment.
    #[error("feature component id has an empty segment: {0}")]
    EmptySegment(String),
    /// Identifier contains a character outside the allowed set.
    #[error("feature component id {id} contains invalid character {ch:?}")]
    InvalidCharacter {
        /// Offending identifier.
        id: String,
        /// Offending character.
        ch: char,
    },
}
