use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Core Application Schemas (Mapped to Database) ---

/// User
///
/// Represents the user's canonical identity record stored in the `public.profiles` table.
/// One profile exists per identity, created exactly once when the identity first signs up;
/// only an administrator may change its role afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct User {
    // Primary Key, also the Foreign Key to the external auth.users table.
    pub id: Uuid,
    // The user's primary identifier.
    pub email: String,
    // The RBAC field: 'user' or 'admin'.
    pub role: String,
}

/// Asset
///
/// An organizational asset record from the `public.assets` table. This is the
/// primary data structure for the core business logic: users submit assets
/// and track them; administrators oversee the full inventory.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Asset {
    pub id: Uuid,
    // FK to public.profiles.id (Submitter).
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub serial_number: String,

    // Directory references maintained by administrators.
    pub category_id: Uuid,
    pub department_id: Uuid,

    // Lifecycle state: 'active', or 'pending_deletion' while a deletion
    // request awaits administrative review.
    pub status: String,

    // S3 key of the asset photo, if one was uploaded.
    pub photo: Option<String>,

    // Timestamp handling for database integration and JSON serialization.
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Department
///
/// An organizational unit assets are assigned to. Admin-managed.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Department {
    pub id: Uuid,
    pub name: String,
}

/// Category
///
/// An asset classification (e.g. "Laptop", "Vehicle"). Admin-managed.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
}

/// DeletionRequest
///
/// A pending or reviewed entry in the asset-deletion approval workflow.
/// At most one pending request exists per asset. Approval removes the asset;
/// rejection returns it to the active state.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct DeletionRequest {
    pub id: Uuid,
    pub asset_id: Uuid,
    // The user who asked for the deletion.
    pub requester_id: Uuid,
    pub reason: String,
    // 'pending' | 'approved' | 'rejected'
    pub status: String,
    // The administrator who reviewed the request, once reviewed.
    pub reviewed_by: Option<Uuid>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    // Loaded via a JOIN with `assets` for the review queue; absent on rows
    // returned straight from an insert.
    #[sqlx(default)]
    pub asset_name: Option<String>,
}

/// --- Request Payloads (Input Schemas) ---

/// CreateAssetRequest
///
/// Input payload for submitting a new asset (POST /user/assets).
/// The photo key is provided after the client completes the direct-to-cloud upload.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateAssetRequest {
    pub name: String,
    pub description: String,
    pub serial_number: String,
    pub category_id: Uuid,
    pub department_id: Uuid,
    // S3 key resulting from the presigned upload flow.
    pub photo_key: Option<String>,
}

/// UpdateAssetRequest
///
/// Partial update payload for modifying an existing asset (PUT /user/assets/{id}).
///
/// *Optimization*: Uses `Option<T>` for all fields and `#[serde(skip_serializing_if = "Option::is_none")]`
/// to efficiently handle partial updates, ensuring only provided fields are included in the JSON payload.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateAssetRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<Uuid>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_key: Option<String>,
}

/// RegisterUserRequest
///
/// Input payload for the public registration endpoint (POST /register).
/// Note: The password is only passed through to the external Auth provider (Supabase) and never
/// persisted or logged internally by this application. New accounts always
/// start with the 'user' role; promotion to admin is itself an admin action.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RegisterUserRequest {
    pub email: String,
    pub password: String,
}

/// LoginRequest
///
/// Input payload for the public login endpoint (POST /login). Credentials are
/// exchanged with the external Auth provider for a session token.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// LoginResponse
///
/// The session token issued on a successful login. The same token is also set
/// as the session cookie on the response.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginResponse {
    pub access_token: String,
}

/// CreateDeletionRequest
///
/// Input payload for opening an asset-deletion request.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateDeletionRequest {
    pub reason: String,
}

/// ReviewDeletionRequest
///
/// Admin payload for resolving a pending deletion request.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ReviewDeletionRequest {
    /// true approves (the asset is deleted); false rejects (the asset
    /// returns to 'active').
    pub approve: bool,
}

/// CreateDepartmentRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateDepartmentRequest {
    pub name: String,
}

/// CreateCategoryRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateCategoryRequest {
    pub name: String,
}

/// UpdateUserRoleRequest
///
/// Admin payload for changing another profile's role ('user' or 'admin').
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateUserRoleRequest {
    pub role: String,
}

/// BulkDeleteRequest
///
/// Admin payload for force-deleting a batch of assets in one call.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct BulkDeleteRequest {
    pub ids: Vec<Uuid>,
}

/// BulkDeleteSummary
///
/// Outcome of a bulk delete: the batch is processed sequentially and each
/// per-asset result is tallied rather than aborting the whole batch.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct BulkDeleteSummary {
    pub requested: usize,
    pub deleted: usize,
    pub failed: usize,
}

/// PresignedUrlRequest
///
/// Input payload for requesting a short-lived S3 upload URL (POST /user/uploads/presigned).
/// The server uses these fields to set security constraints on the generated URL.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, TS, Default)]
#[ts(export)]
pub struct PresignedUrlRequest {
    /// The original filename, used to derive the file extension.
    #[schema(example = "laptop_photo.jpg")]
    pub filename: String,
    /// The MIME type, used to constrain the S3 upload to the allowed type (security).
    #[schema(example = "image/jpeg")]
    pub file_type: String,
}

/// PresignedUrlResponse
///
/// Output schema containing the secure, temporary URL for client-to-cloud file transfer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, TS, Default)]
#[ts(export)]
pub struct PresignedUrlResponse {
    /// The time-limited URL for the PUT request.
    pub upload_url: String,
    /// The S3 object key where the file will be stored (used to reference the file in the database).
    pub resource_key: String,
}

/// --- Dashboard & Profile Schemas (Output) ---

/// AdminDashboardStats
///
/// Output schema for the administrative statistics dashboard (GET /admin/stats).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct AdminDashboardStats {
    pub total_assets: i64,
    pub total_users: i64,
    pub total_departments: i64,
    /// The number of deletion requests still awaiting review.
    pub pending_deletions: i64,
}

/// UserProfile
///
/// Output schema for the authenticated user's profile (GET /user/me).
/// Provides a slightly richer set of data than the internal `User` struct.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    // Dynamic URL for a profile image/avatar.
    pub avatar_url: Option<String>,
}
