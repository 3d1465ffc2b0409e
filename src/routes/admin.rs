use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post, put},
};

/// Admin Router Module
///
/// Defines the routes nested under '/admin', exclusively accessible to users
/// with the 'admin' role. These endpoints provide inventory oversight, the
/// deletion review queue, user management, and the department/category
/// directories.
///
/// Access Control:
/// The route gate redirects any visitor without a confirmed 'admin' role away
/// from this class before routing. The authentication layer above this module
/// then resolves `AuthUser`, and every handler re-checks `role == "admin"`
/// before touching the repository, so a handler moved out of this module by
/// mistake does not silently become reachable.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /admin/stats
        // Retrieves core dashboard metrics (Total Assets, Users, Departments,
        // Pending Deletions). Essential for oversight.
        .route("/stats", get(handlers::get_admin_stats))
        // GET /admin/assets?status=...&department=...&search=...
        // Lists the ENTIRE inventory regardless of owner or lifecycle state,
        // with filtering for review and queue management.
        .route("/assets", get(handlers::get_admin_assets))
        // DELETE /admin/assets/{id}
        // Force delete any asset (no ownership check).
        .route(
            "/assets/{id}",
            axum::routing::delete(handlers::delete_asset_admin),
        )
        // POST /admin/assets/bulk-delete
        // Sequentially deletes a batch of assets and reports pass/fail counts.
        .route("/assets/bulk-delete", post(handlers::bulk_delete_assets))
        // --- Deletion Approval Workflow ---
        // GET /admin/deletion-requests
        // The review queue, pending entries first.
        .route(
            "/deletion-requests",
            get(handlers::list_deletion_requests),
        )
        // PUT /admin/deletion-requests/{id}
        // Approves (asset removed) or rejects (asset reactivated) a request.
        .route(
            "/deletion-requests/{id}",
            put(handlers::review_deletion_request),
        )
        // --- User Management ---
        // GET /admin/users
        .route("/users", get(handlers::list_users_admin))
        // PUT /admin/users/{id}/role
        // The only write path for the role column.
        .route("/users/{id}/role", put(handlers::update_user_role))
        // --- Directory Management ---
        .route(
            "/departments",
            get(handlers::list_departments).post(handlers::create_department),
        )
        .route(
            "/departments/{id}",
            put(handlers::update_department).delete(handlers::delete_department),
        )
        .route(
            "/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/categories/{id}",
            put(handlers::update_category).delete(handlers::delete_category),
        )
}
