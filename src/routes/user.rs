use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// User Router Module
///
/// Defines the routes nested under '/user', accessible to any user who has
/// successfully passed the authentication layer; both roles may view. This
/// module implements all core features for a standard user: asset submission,
/// tracking, update, deletion requests, and photo upload.
///
/// Access Control Strategy:
/// The route gate has already required identity presence for the '/user'
/// class. Every handler additionally relies on the `AuthUser` extractor
/// middleware layered above this module, which guarantees a validated
/// `AuthUser` struct for all Owner-Only authorization checks (e.g., in
/// `update_asset` and `get_asset_details`).
pub fn user_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /user/me
        // Retrieves the currently authenticated user's profile data.
        .route("/me", get(handlers::get_me))
        // --- Asset Submission & Tracking ---
        // GET/POST /user/assets
        // Lists the caller's submitted assets (all lifecycle states) or
        // submits a new one. The submitter ID always comes from the session.
        .route(
            "/assets",
            get(handlers::get_my_assets).post(handlers::create_asset),
        )
        // GET/PUT /user/assets/{id}
        // Tracks or modifies a single owned asset.
        // **Strict ownership check** is enforced in the repository queries.
        .route(
            "/assets/{id}",
            get(handlers::get_asset_details).put(handlers::update_asset),
        )
        // POST /user/assets/{id}/deletion-request
        // Opens the asset-deletion approval workflow: the asset is parked in
        // 'pending_deletion' until an administrator approves or rejects.
        // At most one pending request per asset.
        .route(
            "/assets/{id}/deletion-request",
            post(handlers::request_asset_deletion),
        )
        // POST /user/uploads/presigned
        // Initiates the secure photo upload pipeline. Generates a short-lived
        // (10-minute) presigned S3 URL so the client uploads directly to the
        // storage service (S3/MinIO), bypassing the application server.
        .route("/uploads/presigned", post(handlers::get_presigned_url))
}
