// approval-gate-core/tests/identifiers.rs
// ============================================================================
// Module: Identifier Tests
// Description: Feature component ids, permission strings, and wire names.
// Purpose: Ensure malformed configuration is rejected with typed errors.
// ============================================================================

//! ## Overview
//! Validates feature component parsing and hierarchy helpers, permission
//! string composition, and the serialized names of tiers and capabilities.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions and helpers are permitted."
)]

use approval_gate_core::AccessTier;
use approval_gate_core::AssignmentError;
use approval_gate_core::Capability;
use approval_gate_core::FeatureComponentId;
use approval_gate_core::IdentifierError;
use approval_gate_core::PermissionAssignment;
use approval_gate_core::ResourceStatus;

#[test]
fn component_ids_expose_module_and_submodule() {
    let id = FeatureComponentId::parse("payments.disbursement.approve").unwrap();
    assert_eq!(id.module_id(), "payments");
    assert_eq!(id.submodule_id(), "payments.disbursement");
    assert_eq!(id.segments().count(), 3);

    let short = FeatureComponentId::parse("payments.refund").unwrap();
    assert_eq!(short.submodule_id(), "payments.refund");

    let single = FeatureComponentId::parse("admin").unwrap();
    assert_eq!(single.module_id(), "admin");
    assert_eq!(single.submodule_id(), "admin");
}

#[test]
fn malformed_component_ids_are_rejected() {
    assert_eq!(FeatureComponentId::parse(""), Err(IdentifierError::Empty));
    assert!(matches!(
        FeatureComponentId::parse("payments..approve"),
        Err(IdentifierError::EmptySegment(_))
    ));
    assert!(matches!(
        FeatureComponentId::parse("payments.dis bursement"),
        Err(IdentifierError::InvalidCharacter { ch: ' ', .. })
    ));
    assert!(matches!(
        FeatureComponentId::parse("a".repeat(257)),
        Err(IdentifierError::TooLong { max: 256 })
    ));
}

#[test]
fn permission_strings_round_trip() {
    let assignment = PermissionAssignment::decompose("ops:payments.disbursement:pg-maker").unwrap();
    assert_eq!(assignment.user_group_id.as_str(), "ops");
    assert_eq!(assignment.feature_component_id.as_str(), "payments.disbursement");
    assert_eq!(assignment.permission_group_id.as_str(), "pg-maker");
    assert_eq!(assignment.compose(), "ops:payments.disbursement:pg-maker");
    assert_eq!(assignment.to_string(), assignment.compose());
}

#[test]
fn permission_strings_need_exactly_three_segments() {
    assert!(matches!(
        PermissionAssignment::decompose("ops:payments.disbursement"),
        Err(AssignmentError::SegmentCount { found: 2, .. })
    ));
    assert!(matches!(
        "ops:payments.disbursement:pg:extra".parse::<PermissionAssignment>(),
        Err(AssignmentError::SegmentCount { found: 4, .. })
    ));
    assert!(matches!(
        PermissionAssignment::decompose(":payments.disbursement:pg"),
        Err(AssignmentError::InvalidSegment { field: "user_group_id", .. })
    ));
    assert!(matches!(
        PermissionAssignment::decompose("ops:payments/disbursement:pg"),
        Err(AssignmentError::Component { .. })
    ));
}

#[test]
fn assignments_reject_separator_inside_group_ids() {
    let component = FeatureComponentId::parse("payments.disbursement").unwrap();
    let err = PermissionAssignment::new("ops:eu", component, "pg").unwrap_err();
    assert!(matches!(err, AssignmentError::InvalidSegment { field: "user_group_id", .. }));
}

#[test]
fn tiers_and_capabilities_use_wire_names() {
    for tier in AccessTier::ALL {
        assert_eq!(tier.as_str().parse::<AccessTier>().unwrap(), tier);
        assert_eq!(serde_json::to_value(tier).unwrap(), tier.as_str());
    }
    assert_eq!(AccessTier::Authorizer3.as_str(), "AUTHORIZER_3");
    assert!("AUTHORIZER_5".parse::<AccessTier>().is_err());

    for capability in Capability::ALL {
        assert_eq!(capability.as_str().parse::<Capability>().unwrap(), capability);
        assert_eq!(serde_json::to_value(capability).unwrap(), capability.as_str());
    }
    assert!("can_fly".parse::<Capability>().is_err());
}

#[test]
fn unknown_resource_status_is_other() {
    let status: ResourceStatus = serde_json::from_str(r#""ON_HOLD""#).unwrap();
    assert_eq!(status, ResourceStatus::Other);
    let rejected: ResourceStatus = serde_json::from_str(r#""REJECTED""#).unwrap();
    assert!(rejected.is_rejected());
}

#[test]
fn unknown_resource_status_serializes_as_other() {
    let status: ResourceStatus = serde_json::from_str(r#""ON_HOLD""#).unwrap();
    assert_eq!(serde_json::to_value(status).unwrap(), "OTHER");
    let pending: ResourceStatus = serde_json::from_str(r#""PENDING""#).unwrap();
    assert_eq!(serde_json::to_value(pending).unwrap(), "PENDING");
}

#[test]
fn assignments_use_permission_string_wire_form() {
    let assignment = PermissionAssignment::decompose("ops:payments.disbursement:pg-maker").unwrap();
    let encoded = serde_json::to_value(&assignment).unwrap();
    assert_eq!(encoded, "ops:payments.disbursement:pg-maker");
    let decoded: PermissionAssignment = serde_json::from_value(encoded).unwrap();
    assert_eq!(decoded, assignment);
}

#[test]
fn assignments_deserialize_with_segment_validation() {
    for raw in [
        r#""ops:east:payments.disbursement:pg""#,
        r#""ops:payments.disbursement:""#,
        r#""ops:payments..disbursement:pg""#,
        r#"{"user_group_id":"ops:east","feature_component_id":"payments.disbursement","permission_group_id":""}"#,
    ] {
        assert!(
            serde_json::from_str::<PermissionAssignment>(raw).is_err(),
            "accepted malformed assignment {raw}"
        );
    }
}

#[test]
fn component_ids_deserialize_with_validation() {
    let id: FeatureComponentId = serde_json::from_str(r#""payments.refund""#).unwrap();
    assert_eq!(id.as_str(), "payments.refund");
    assert!(serde_json::from_str::<FeatureComponentId>(r#""payments..refund""#).is_err());
}
