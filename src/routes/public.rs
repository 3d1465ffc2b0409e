use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Defines endpoints that are **unauthenticated** and accessible to any client
/// (anonymous or logged-in). The route gate classifies these paths as public
/// and passes them through without identity checks; an authenticated visitor
/// landing exactly on `/login` or `/` is bounced to their home area by the
/// gate before any handler here runs.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // A simple, unauthenticated endpoint used for monitoring and load balancer checks.
        // Returns "ok" immediately to verify the service is running and responsive.
        .route("/health", get(|| async { "ok" }))
        // GET /
        // Landing endpoint for anonymous visitors. Authenticated visitors never
        // see it: the gate forwards them to /admin or /user.
        .route("/", get(|| async { "asset portal" }))
        // POST /register
        // Endpoint for new user creation and initial profile setup. This is part of the
        // identity flow managed by Supabase/Auth in production. The mirrored
        // profile row is created here, exactly once per identity.
        .route("/register", post(handlers::register_user))
        // POST /login
        // Credential exchange with the external Auth provider. On success the
        // session token is set as a cookie for the gate to consume.
        .route("/login", post(handlers::login_user))
}
