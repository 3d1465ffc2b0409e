use asset_portal::models::{
    Asset, BulkDeleteSummary, DeletionRequest, UpdateAssetRequest, User,
};
use chrono::Utc;
use uuid::Uuid;

// --- Tests ---

#[test]
fn test_update_asset_request_optionality() {
    // This confirms the structure supports partial updates (all fields are Option<T>)
    let partial_update = UpdateAssetRequest {
        name: Some("Dock Station".to_string()),
        description: None,
        serial_number: None,
        category_id: None,
        department_id: None,
        photo_key: None,
    };

    // The key validation is that it can be created and serialized without error.
    let json_output = serde_json::to_string(&partial_update).unwrap();
    assert!(json_output.contains(r#""name":"Dock Station""#));
    assert!(!json_output.contains("description")); // None fields are omitted
    assert!(!json_output.contains("serial_number"));
}

#[test]
fn test_deletion_request_serialization_round_trip() {
    let request = DeletionRequest {
        id: Uuid::new_v4(),
        asset_id: Uuid::new_v4(),
        requester_id: Uuid::new_v4(),
        reason: "written off".to_string(),
        status: "pending".to_string(),
        reviewed_by: None,
        created_at: Utc::now(),
        asset_name: Some("Projector".to_string()),
    };

    let json_output = serde_json::to_string(&request).unwrap();
    assert!(json_output.contains(r#""status":"pending""#));
    assert!(json_output.contains(r#""reviewed_by":null"#));

    let parsed: DeletionRequest = serde_json::from_str(&json_output).unwrap();
    assert_eq!(parsed.id, request.id);
    assert_eq!(parsed.asset_name.as_deref(), Some("Projector"));
}

#[test]
fn test_asset_default_lifecycle_fields_present() {
    // The admin inventory and review flows rely on these fields existing by
    // their serialized names.
    let json_output = serde_json::to_string(&Asset::default()).unwrap();
    assert!(json_output.contains(r#""status""#));
    assert!(json_output.contains(r#""serial_number""#));
    assert!(json_output.contains(r#""department_id""#));
}

#[test]
fn test_user_role_round_trip() {
    let user = User {
        id: Uuid::new_v4(),
        email: "ops@example.com".to_string(),
        role: "admin".to_string(),
    };

    let json_output = serde_json::to_string(&user).unwrap();
    let parsed: User = serde_json::from_str(&json_output).unwrap();
    assert_eq!(parsed.role, "admin");
}

#[test]
fn test_bulk_delete_summary_defaults_to_zero() {
    let summary = BulkDeleteSummary::default();
    assert_eq!(summary.requested, 0);
    assert_eq!(summary.deleted, 0);
    assert_eq!(summary.failed, 0);
}
