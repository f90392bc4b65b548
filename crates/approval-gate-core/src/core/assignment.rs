// approval-gate-core/src/core/assignment.rs
// ============================================================================
// Module: Approval Gate Permission Assignments
// Description: Group/component/permission-group assignment triples.
// Purpose: Compose and decompose the `group:component:permission` storage form.
// Dependencies: crate::core::identifiers, serde, thiserror
// ============================================================================

//! ## Overview
//! A permission assignment binds a user group to a permission group on one
//! feature component. Storage and transport use the colon-delimited form
//! `"groupId:componentId:permGroupId"`; [`PermissionAssignment::compose`] and
//! [`PermissionAssignment::decompose`] are exact inverses for every assignment
//! whose group ids are non-empty and free of the separator.
//!
//! Malformed strings are configuration errors and are rejected loudly.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::FeatureComponentId;
use crate::core::identifiers::IdentifierError;
use crate::core::identifiers::PermissionGroupId;
use crate::core::identifiers::UserGroupId;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Separator between the three assignment segments.
pub const PERMISSION_SEPARATOR: char = ':';

// ============================================================================
// SECTION: Permission Assignment
// ============================================================================

/// Assignment of a permission group to a user group on a feature component.
///
/// The wire form is the composed `"groupId:componentId:permGroupId"` string,
/// so deserialized assignments pass the same checks as [`Self::decompose`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PermissionAssignment {
    /// User group receiving the permission.
    pub user_group_id: UserGroupId,
    /// Feature component the permission applies to.
    pub feature_component_id: FeatureComponentId,
    /// Permission group granted.
    pub permission_group_id: PermissionGroupId,
}

impl PermissionAssignment {
    /// Creates a validated assignment.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentError::InvalidSegment`] when a group id is empty or
    /// contains the separator, since such an assignment cannot round-trip.
    pub fn new(
        user_group_id: impl Into<UserGroupId>,
        feature_component_id: FeatureComponentId,
        permission_group_id: impl Into<PermissionGroupId>,
    ) -> Result<Self, AssignmentError> {
        let user_group_id = user_group_id.into();
        let permission_group_id = permission_group_id.into();
        ensure_segment("user_group_id", user_group_id.as_str())?;
        ensure_segment("permission_group_id", permission_group_id.as_str())?;
        Ok(Self {
            user_group_id,
            feature_component_id,
            permission_group_id,
        })
    }

    /// Renders the assignment as `"groupId:componentId:permGroupId"`.
    #[must_use]
    pub fn compose(&self) -> String {
        format!(
            "{}{sep}{}{sep}{}",
            self.user_group_id,
            self.feature_component_id,
            self.permission_group_id,
            sep = PERMISSION_SEPARATOR
        )
    }

    /// Parses a permission string into its three segments.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentError::SegmentCount`] unless the string splits into
    /// exactly three colon-delimited segments, [`AssignmentError::InvalidSegment`]
    /// when a group segment is empty, and [`AssignmentError::Component`] when the
    /// component segment is not a valid feature component id.
    pub fn decompose(value: &str) -> Result<Self, AssignmentError> {
        let segments: Vec<&str> = value.split(PERMISSION_SEPARATOR).collect();
        let [group, component, permission_group] = segments.as_slice() else {
            return Err(AssignmentError::SegmentCount {
                value: value.to_string(),
                found: segments.len(),
            });
        };
        let component = FeatureComponentId::parse(*component).map_err(|source| {
            AssignmentError::Component {
                value: value.to_string(),
                source,
            }
        })?;
        Self::new(*group, component, *permission_group)
    }
}

impl fmt::Display for PermissionAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.compose())
    }
}

impl FromStr for PermissionAssignment {
    type Err = AssignmentError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::decompose(value)
    }
}

impl TryFrom<String> for PermissionAssignment {
    type Error = AssignmentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::decompose(&value)
    }
}

impl From<PermissionAssignment> for String {
    fn from(value: PermissionAssignment) -> Self {
        value.compose()
    }
}

/// Rejects group segments that cannot survive a compose/decompose round trip.
fn ensure_segment(field: &'static str, value: &str) -> Result<(), AssignmentError> {
    if value.is_empty() || value.contains(PERMISSION_SEPARATOR) {
        return Err(AssignmentError::InvalidSegment {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Permission string composition and decomposition errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignmentError {
    /// Permission string did not contain exactly three segments.
    #[error("invalid permission string {value:?}: expected 3 segments, found {found}")]
    SegmentCount {
        /// Offending permission string.
        value: String,
        /// Number of segments found.
        found: usize,
    },
    /// Group segment is empty or contains the separator.
    #[error("invalid permission string segment {field}: {value:?}")]
    InvalidSegment {
        /// Segment field name.
        field: &'static str,
        /// Offending segment value.
        value: String,
    },
    /// Component segment is not a valid feature component id.
    #[error("invalid permission string {value:?}: {source}")]
    Component {
        /// Offending permission string.
        value: String,
        /// Component id validation failure.
        source: IdentifierError,
    },
}
