use crate::{
    AppState,
    auth::{self, AuthUser},
    models::{
        self, AdminDashboardStats, Asset, BulkDeleteRequest, BulkDeleteSummary, Category,
        CreateAssetRequest, CreateCategoryRequest, CreateDeletionRequest, CreateDepartmentRequest,
        DeletionRequest, Department, LoginRequest, LoginResponse, PresignedUrlRequest,
        PresignedUrlResponse, RegisterUserRequest, ReviewDeletionRequest, UpdateAssetRequest,
        UpdateUserRoleRequest, User, UserProfile,
    },
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{AppendHeaders, IntoResponse},
};
use serde::Deserialize;
use uuid::Uuid;

// --- Filter Structs ---

/// AssetFilter
///
/// Defines the accepted query parameters for the administrative inventory listing
/// (GET /admin/assets). Used by Axum's Query extractor to safely bind HTTP query
/// parameters for filtering and search.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct AssetFilter {
    /// Optional lifecycle filter ('active' or 'pending_deletion').
    pub status: Option<String>,
    /// Optional filter for assets assigned to a specific department.
    pub department: Option<Uuid>,
    /// Optional full-text search string for name/description/serial matching.
    pub search: Option<String>,
}

/// SupabaseAuthResponse
///
/// Minimal struct to deserialize the response from the external Supabase /auth/v1/signup endpoint,
/// specifically capturing the newly created user's UUID.
#[derive(Deserialize)]
struct SupabaseAuthResponse {
    id: Uuid,
}

/// SupabaseTokenResponse
///
/// Minimal struct for the external token endpoint response; only the session
/// token itself is consumed.
#[derive(Deserialize)]
struct SupabaseTokenResponse {
    access_token: String,
}

// --- Public Handlers ---

/// register_user
///
/// [Public Route] Handles initial user registration via the external Supabase Auth service.
///
/// *Flow*: Calls Supabase's signup endpoint, retrieves the `auth.users.id` (UUID), and then
/// uses that ID to create the corresponding record in the application's local `public.profiles` table.
/// This ensures primary key synchronization between the external Auth system and our local schema,
/// and satisfies the one-profile-per-identity rule: the profile row is created here, exactly once.
/// New accounts always start as 'user'; only an administrator can promote a profile.
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterUserRequest,
    responses((status = 200, description = "Registered", body = User))
)]
pub async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterUserRequest>,
) -> Result<Json<User>, StatusCode> {
    let supabase_url =
        std::env::var("SUPABASE_URL").map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    let supabase_key =
        std::env::var("SUPABASE_KEY").map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    // Step 1: Call external Auth provider (Supabase)
    let client = reqwest::Client::new();
    let auth_url = format!("{}/auth/v1/signup", supabase_url);

    let response = client
        .post(auth_url)
        .header("apikey", supabase_key)
        .header("Content-Type", "application/json")
        .json(&serde_json::json!({ "email": payload.email, "password": payload.password }))
        .send()
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if !response.status().is_success() {
        // If Supabase rejects the user (e.g., email already exists, weak password).
        return Err(StatusCode::BAD_REQUEST);
    }

    // Step 2: Extract the canonical user ID from the external response.
    let supabase_user = response
        .json::<SupabaseAuthResponse>()
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    // Step 3: Create the mirrored profile in our local database (`public.profiles`).
    let new_user = User {
        id: supabase_user.id,
        email: payload.email,
        role: "user".to_string(),
    };

    let created_user = state.repo.create_user(new_user).await;

    Ok(Json(created_user))
}

/// login_user
///
/// [Public Route] Exchanges email/password credentials with the external Auth provider
/// for a session token. The token is returned in the body for API clients and set as
/// the session cookie for browser navigation, which the route gate consumes on every
/// subsequent request.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 401, description = "Bad credentials")
    )
)]
pub async fn login_user(
    State(_state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let supabase_url =
        std::env::var("SUPABASE_URL").map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    let supabase_key =
        std::env::var("SUPABASE_KEY").map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let client = reqwest::Client::new();
    let token_url = format!("{}/auth/v1/token?grant_type=password", supabase_url);

    let response = client
        .post(token_url)
        .header("apikey", supabase_key)
        .header("Content-Type", "application/json")
        .json(&serde_json::json!({ "email": payload.email, "password": payload.password }))
        .send()
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if !response.status().is_success() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let token = response
        .json::<SupabaseTokenResponse>()
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let cookie = auth::session_cookie(&token.access_token);

    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(LoginResponse {
            access_token: token.access_token,
        }),
    ))
}

// --- User Handlers ---

/// get_me
///
/// [User Route] Provides the authenticated user's profile information.
#[utoipa::path(
    get,
    path = "/user/me",
    responses((status = 200, description = "Profile", body = UserProfile))
)]
pub async fn get_me(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<UserProfile>, StatusCode> {
    let user = state.repo.get_user(id).await.ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(UserProfile {
        id: user.id,
        email: user.email,
        role: user.role,
        // Using a DiceBear API for stable, unique avatar generation based on UUID.
        avatar_url: Some(format!(
            "https://api.dicebear.com/7.x/avataaars/svg?seed={}",
            id
        )),
    }))
}

/// get_my_assets
///
/// [User Route] Lists all assets submitted by the requesting user, including
/// those currently parked in `pending_deletion`.
///
/// *Note*: The user identity (`id`) is resolved securely via the `AuthUser` extractor.
#[utoipa::path(
    get,
    path = "/user/assets",
    responses((status = 200, description = "My Assets", body = [Asset]))
)]
pub async fn get_my_assets(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> Json<Vec<models::Asset>> {
    let assets = state.repo.get_my_assets(id).await;
    Json(assets)
}

/// create_asset
///
/// [User Route] Handles the submission of a new asset.
/// The `user_id` is automatically taken from the authenticated session, ensuring data integrity.
#[utoipa::path(
    post,
    path = "/user/assets",
    request_body = CreateAssetRequest,
    responses((status = 200, description = "Created", body = Asset))
)]
pub async fn create_asset(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<models::CreateAssetRequest>,
) -> Json<models::Asset> {
    let asset = state.repo.create_asset(payload, id).await;
    Json(asset)
}

/// get_asset_details
///
/// [User Route] Retrieves a single asset for tracking, only if the requesting
/// user submitted it. The **Owner-Only** check lives in the repository query.
#[utoipa::path(
    get,
    path = "/user/assets/{id}",
    params(("id" = Uuid, Path, description = "Asset ID")),
    responses((status = 200, description = "Found", body = Asset))
)]
pub async fn get_asset_details(
    AuthUser { id: user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<models::Asset>, StatusCode> {
    match state.repo.get_asset_owned(id, user_id).await {
        Some(asset) => Ok(Json(asset)),
        // Not found OR not the submitter; 404 avoids leaking existence.
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// update_asset
///
/// [User Route] Allows a user to modify their own asset details.
///
/// *Authorization*: Enforces the **Owner-Only** check in the repository layer.
#[utoipa::path(
    put,
    path = "/user/assets/{id}",
    request_body = UpdateAssetRequest,
    responses((status = 200, description = "Updated", body = Asset))
)]
pub async fn update_asset(
    AuthUser { id: user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAssetRequest>,
) -> Result<Json<models::Asset>, StatusCode> {
    match state.repo.update_asset(id, user_id, payload).await {
        Some(asset) => Ok(Json(asset)),
        // Returns 404 if the asset is not found OR if the authenticated user is not the submitter.
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// request_asset_deletion
///
/// [User Route] Opens a deletion request for an owned asset and parks the asset
/// in `pending_deletion` until an administrator reviews it.
///
/// *Idempotency*: at most one pending request may exist per asset; a second
/// attempt (or a request against a non-owned/missing asset) yields 409.
#[utoipa::path(
    post,
    path = "/user/assets/{id}/deletion-request",
    params(("id" = Uuid, Path, description = "Asset ID")),
    request_body = CreateDeletionRequest,
    responses(
        (status = 200, description = "Request opened", body = DeletionRequest),
        (status = 409, description = "Already pending, not owned, or missing")
    )
)]
pub async fn request_asset_deletion(
    AuthUser { id: user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(asset_id): Path<Uuid>,
    Json(payload): Json<CreateDeletionRequest>,
) -> Result<Json<models::DeletionRequest>, StatusCode> {
    match state
        .repo
        .request_deletion(asset_id, user_id, payload.reason)
        .await
    {
        Some(request) => Ok(Json(request)),
        None => Err(StatusCode::CONFLICT),
    }
}

/// get_presigned_url
///
/// [User Route] Generates a temporary, secure URL for direct client-to-cloud upload
/// of an asset photo.
///
/// *Security*: The URL is short-lived (10 minutes max), constrained to the specified `file_type`,
/// and uses a unique, cryptographically secure object key (UUID). Heavy uploads bypass
/// the application server entirely.
#[utoipa::path(
    post,
    path = "/user/uploads/presigned",
    request_body = PresignedUrlRequest,
    responses((status = 200, description = "URL", body = PresignedUrlResponse))
)]
pub async fn get_presigned_url(
    AuthUser { id: _user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<PresignedUrlRequest>,
) -> impl IntoResponse {
    // Generate a unique, structured object key (e.g., 'asset-photos/UUID.ext').
    let extension = std::path::Path::new(&payload.filename)
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .unwrap_or("bin");
    let unique_id = Uuid::new_v4();
    let object_key = format!("asset-photos/{}.{}", unique_id, extension);

    match state
        .storage
        // Delegate key generation and mime-type constraint application to the Storage Service.
        .get_presigned_upload_url(&object_key, &payload.file_type)
        .await
    {
        Ok(url) => {
            let response = PresignedUrlResponse {
                upload_url: url,
                resource_key: object_key,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            // Log the underlying storage error for debugging but return a generic internal error.
            tracing::error!("Storage Error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed").into_response()
        }
    }
}

// --- Admin Handlers ---

/// get_admin_stats
///
/// [Admin Route] Retrieves core application statistics for the dashboard.
///
/// *Authorization*: Explicitly checks that the `role` is "admin".
#[utoipa::path(
    get,
    path = "/admin/stats",
    responses((status = 200, description = "Stats", body = AdminDashboardStats))
)]
pub async fn get_admin_stats(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<AdminDashboardStats>, StatusCode> {
    if role != "admin" {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(Json(state.repo.get_stats().await))
}

/// get_admin_assets
///
/// [Admin Route] Retrieves the full asset inventory, any owner, any status,
/// with filtering and search.
///
/// *Authorization*: Explicitly checks that the `role` resolved by `AuthUser` is "admin".
#[utoipa::path(
    get,
    path = "/admin/assets",
    params(AssetFilter),
    responses((status = 200, description = "All assets", body = [Asset]))
)]
pub async fn get_admin_assets(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
    Query(filter): Query<AssetFilter>,
) -> Result<Json<Vec<models::Asset>>, StatusCode> {
    if role != "admin" {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(Json(
        state
            .repo
            .get_all_assets(filter.status, filter.department, filter.search)
            .await,
    ))
}

/// delete_one_asset
///
/// Shared force-delete step for the single and bulk admin endpoints: removes
/// the row, then cleans up the stored photo best-effort. A storage failure is
/// logged but never fails the delete; the row is already gone.
async fn delete_one_asset(state: &AppState, id: Uuid) -> bool {
    let photo = state.repo.get_asset(id).await.and_then(|asset| asset.photo);

    if !state.repo.delete_asset_admin(id).await {
        return false;
    }

    if let Some(key) = photo {
        if let Err(e) = state.storage.delete_object(&key).await {
            tracing::warn!(asset_id = %id, "failed to remove orphaned photo {key}: {e}");
        }
    }
    true
}

/// delete_asset_admin
///
/// [Admin Route] Force-deletes any asset, skipping the ownership check.
/// The stored photo, if any, is removed with the row.
#[utoipa::path(
    delete,
    path = "/admin/assets/{id}",
    params(("id" = Uuid, Path, description = "Asset ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_asset_admin(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> StatusCode {
    if role != "admin" {
        return StatusCode::FORBIDDEN;
    }
    if delete_one_asset(&state, id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

/// bulk_delete_assets
///
/// [Admin Route] Force-deletes a batch of assets. The batch is processed
/// **sequentially**, one delete per ID, and per-asset outcomes are tallied
/// into a pass/fail summary instead of aborting the whole batch on the first
/// failure.
#[utoipa::path(
    post,
    path = "/admin/assets/bulk-delete",
    request_body = BulkDeleteRequest,
    responses((status = 200, description = "Summary", body = BulkDeleteSummary))
)]
pub async fn bulk_delete_assets(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<BulkDeleteRequest>,
) -> Result<Json<BulkDeleteSummary>, StatusCode> {
    if role != "admin" {
        return Err(StatusCode::FORBIDDEN);
    }

    let mut summary = BulkDeleteSummary {
        requested: payload.ids.len(),
        deleted: 0,
        failed: 0,
    };

    for id in payload.ids {
        if delete_one_asset(&state, id).await {
            summary.deleted += 1;
        } else {
            summary.failed += 1;
        }
    }

    Ok(Json(summary))
}

/// list_deletion_requests
///
/// [Admin Route] The asset-deletion review queue, pending entries first.
#[utoipa::path(
    get,
    path = "/admin/deletion-requests",
    responses((status = 200, description = "Review queue", body = [DeletionRequest]))
)]
pub async fn list_deletion_requests(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<models::DeletionRequest>>, StatusCode> {
    if role != "admin" {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(Json(state.repo.list_deletion_requests().await))
}

/// review_deletion_request
///
/// [Admin Route] Resolves a pending deletion request. Approval deletes the
/// asset; rejection returns it to `active`. Reviewing an already-reviewed
/// request yields 404.
#[utoipa::path(
    put,
    path = "/admin/deletion-requests/{id}",
    params(("id" = Uuid, Path, description = "Deletion request ID")),
    request_body = ReviewDeletionRequest,
    responses(
        (status = 200, description = "Reviewed", body = DeletionRequest),
        (status = 404, description = "Not Found or already reviewed")
    )
)]
pub async fn review_deletion_request(
    AuthUser { id: reviewer_id, role }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReviewDeletionRequest>,
) -> Result<Json<models::DeletionRequest>, StatusCode> {
    if role != "admin" {
        return Err(StatusCode::FORBIDDEN);
    }
    match state
        .repo
        .review_deletion_request(id, reviewer_id, payload.approve)
        .await
    {
        Some(request) => Ok(Json(request)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// list_users_admin
///
/// [Admin Route] Lists every profile for user management.
#[utoipa::path(
    get,
    path = "/admin/users",
    responses((status = 200, description = "All users", body = [User]))
)]
pub async fn list_users_admin(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<models::User>>, StatusCode> {
    if role != "admin" {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(Json(state.repo.list_users().await))
}

/// update_user_role
///
/// [Admin Route] Changes another profile's role. This is the only write path
/// for the role column; signup always assigns 'user'.
#[utoipa::path(
    put,
    path = "/admin/users/{id}/role",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUserRoleRequest,
    responses(
        (status = 200, description = "Updated", body = User),
        (status = 400, description = "Unknown role"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_user_role(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRoleRequest>,
) -> Result<Json<models::User>, StatusCode> {
    if role != "admin" {
        return Err(StatusCode::FORBIDDEN);
    }
    // Only the two recognized roles may be persisted.
    if payload.role != "admin" && payload.role != "user" {
        return Err(StatusCode::BAD_REQUEST);
    }
    match state.repo.set_user_role(id, payload.role).await {
        Some(user) => Ok(Json(user)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// list_departments
///
/// [Admin Route] Lists the department directory.
#[utoipa::path(
    get,
    path = "/admin/departments",
    responses((status = 200, description = "Departments", body = [Department]))
)]
pub async fn list_departments(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<models::Department>>, StatusCode> {
    if role != "admin" {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(Json(state.repo.list_departments().await))
}

/// create_department
#[utoipa::path(
    post,
    path = "/admin/departments",
    request_body = CreateDepartmentRequest,
    responses(
        (status = 200, description = "Created", body = Department),
        (status = 409, description = "Duplicate name")
    )
)]
pub async fn create_department(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateDepartmentRequest>,
) -> Result<Json<models::Department>, StatusCode> {
    if role != "admin" {
        return Err(StatusCode::FORBIDDEN);
    }
    match state.repo.create_department(payload.name).await {
        Some(department) => Ok(Json(department)),
        None => Err(StatusCode::CONFLICT),
    }
}

/// update_department
#[utoipa::path(
    put,
    path = "/admin/departments/{id}",
    params(("id" = Uuid, Path, description = "Department ID")),
    request_body = CreateDepartmentRequest,
    responses((status = 200, description = "Updated", body = Department))
)]
pub async fn update_department(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateDepartmentRequest>,
) -> Result<Json<models::Department>, StatusCode> {
    if role != "admin" {
        return Err(StatusCode::FORBIDDEN);
    }
    match state.repo.update_department(id, payload.name).await {
        Some(department) => Ok(Json(department)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// delete_department
///
/// A department still referenced by assets cannot be removed (the foreign key
/// is RESTRICT); that case and a missing ID both report 409.
#[utoipa::path(
    delete,
    path = "/admin/departments/{id}",
    params(("id" = Uuid, Path, description = "Department ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 409, description = "Still referenced or missing")
    )
)]
pub async fn delete_department(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> StatusCode {
    if role != "admin" {
        return StatusCode::FORBIDDEN;
    }
    if state.repo.delete_department(id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::CONFLICT
    }
}

/// list_categories
///
/// [Admin Route] Lists the category directory.
#[utoipa::path(
    get,
    path = "/admin/categories",
    responses((status = 200, description = "Categories", body = [Category]))
)]
pub async fn list_categories(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<models::Category>>, StatusCode> {
    if role != "admin" {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(Json(state.repo.list_categories().await))
}

/// create_category
#[utoipa::path(
    post,
    path = "/admin/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 200, description = "Created", body = Category),
        (status = 409, description = "Duplicate name")
    )
)]
pub async fn create_category(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<Json<models::Category>, StatusCode> {
    if role != "admin" {
        return Err(StatusCode::FORBIDDEN);
    }
    match state.repo.create_category(payload.name).await {
        Some(category) => Ok(Json(category)),
        None => Err(StatusCode::CONFLICT),
    }
}

/// update_category
#[utoipa::path(
    put,
    path = "/admin/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = CreateCategoryRequest,
    responses((status = 200, description = "Updated", body = Category))
)]
pub async fn update_category(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<Json<models::Category>, StatusCode> {
    if role != "admin" {
        return Err(StatusCode::FORBIDDEN);
    }
    match state.repo.update_category(id, payload.name).await {
        Some(category) => Ok(Json(category)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// delete_category
#[utoipa::path(
    delete,
    path = "/admin/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 409, description = "Still referenced or missing")
    )
)]
pub async fn delete_category(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> StatusCode {
    if role != "admin" {
        return StatusCode::FORBIDDEN;
    }
    if state.repo.delete_category(id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::CONFLICT
    }
}
