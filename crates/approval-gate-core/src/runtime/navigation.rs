// approval-gate-core/src/runtime/navigation.rs
// ============================================================================
// Module: Approval Gate Navigation
// Description: Filters the navigation tree by accessible submodules and groups.
// Purpose: Show only the menu entries a user can open.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Navigation entries are keyed by submodule id, so a compiled capability
//! table's [`accessible_submodule_ids`] decides which children survive.
//! Parents are kept whole when public or owned by one of the user's groups;
//! otherwise only their surviving children are kept.
//!
//! [`accessible_submodule_ids`]: crate::runtime::CapabilityTable::accessible_submodule_ids

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::UserGroupId;

// ============================================================================
// SECTION: Navigation Item
// ============================================================================

/// Navigation tree entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    /// Entry id; submodule id for child entries.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Link target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Visible to everyone.
    #[serde(default)]
    pub public: bool,
    /// User group that may always see the entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_group: Option<UserGroupId>,
    /// Child entries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavItem>,
}

impl NavItem {
    /// Returns true when the entry's owning group is one of `user_groups`.
    fn owned_by_any(&self, user_groups: &[UserGroupId]) -> bool {
        self.user_group.as_ref().is_some_and(|group| user_groups.contains(group))
    }
}

// ============================================================================
// SECTION: Filtering
// ============================================================================

/// Filters navigation entries for a user, preserving input order.
#[must_use]
pub fn filter_nav_items(
    items: &[NavItem],
    accessible_submodule_ids: &[String],
    user_groups: &[UserGroupId],
) -> Vec<NavItem> {
    let mut filtered = Vec::new();
    for parent in items {
        if parent.public || parent.owned_by_any(user_groups) {
            filtered.push(parent.clone());
            continue;
        }
        let children: Vec<NavItem> = parent
            .children
            .iter()
            .filter(|child| {
                child.public
                    || accessible_submodule_ids.contains(&child.id)
                    || child.owned_by_any(user_groups)
            })
            .cloned()
            .collect();
        if !children.is_empty() {
            filtered.push(NavItem {
                children,
                ..parent.clone()
            });
        }
    }
    filtered
}

/// Returns true when any of the user's group ids starts with `prefix`.
#[must_use]
pub fn under_user_group(user_groups: &[UserGroupId], prefix: &str) -> bool {
    user_groups.iter().any(|group| group.as_str().starts_with(prefix))
}
