use axum::{
    extract::{FromRef, Request, State},
    http::{HeaderName, header},
    Router,
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod config;
pub mod gate;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod storage;

// Module for routing segregation (Public, User, Admin).
pub mod routes;
use auth::AuthUser; // The resolved authenticated user identity.
use gate::GateDecision;
use routes::{admin, public, user};

// --- Public Re-exports ---

// Makes core state types easily accessible to the main application entry point (main.rs).
pub use config::AppConfig;
pub use gate::{AccessGate, ProfileState, RoutePolicy, SessionState};
pub use repository::{PostgresRepository, RepositoryState};
pub use storage::{MockStorageService, S3StorageClient, StorageState};

/// ApiDoc
///
/// This struct auto-generates the OpenAPI documentation (Swagger JSON) for the application.
/// It aggregates all API paths and data schemas that have been decorated with
/// the `#[utoipa::path]` and `#[derive(utoipa::ToSchema)]` macros.
/// The resulting JSON is served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    // List all public handler functions here for documentation generation.
    paths(
        handlers::register_user, handlers::login_user, handlers::get_me,
        handlers::get_my_assets, handlers::create_asset, handlers::get_asset_details,
        handlers::update_asset, handlers::request_asset_deletion, handlers::get_presigned_url,
        handlers::get_admin_stats, handlers::get_admin_assets, handlers::delete_asset_admin,
        handlers::bulk_delete_assets, handlers::list_deletion_requests,
        handlers::review_deletion_request, handlers::list_users_admin,
        handlers::update_user_role, handlers::list_departments, handlers::create_department,
        handlers::update_department, handlers::delete_department, handlers::list_categories,
        handlers::create_category, handlers::update_category, handlers::delete_category
    ),
    // List all models (schemas) used in the request/response bodies.
    components(
        schemas(
            models::User, models::Asset, models::Department, models::Category,
            models::DeletionRequest, models::CreateAssetRequest, models::UpdateAssetRequest,
            models::RegisterUserRequest, models::LoginRequest, models::LoginResponse,
            models::CreateDeletionRequest, models::ReviewDeletionRequest,
            models::CreateDepartmentRequest, models::CreateCategoryRequest,
            models::UpdateUserRoleRequest, models::BulkDeleteRequest, models::BulkDeleteSummary,
            models::PresignedUrlRequest, models::PresignedUrlResponse,
            models::AdminDashboardStats, models::UserProfile,
        )
    ),
    tags(
        (name = "asset-portal", description = "Organizational Asset Management API")
    )
)]
struct ApiDoc;

/// AppState
///
/// Implements the **Unified State Pattern**. This is the single, thread-safe, and immutable
/// container holding all essential application services and configuration.
/// The application state is shared across all incoming requests.
#[derive(Clone)]
pub struct AppState {
    /// Repository Layer: Abstracts database access via the PgPool connection.
    pub repo: RepositoryState,
    /// Storage Layer: Abstracts S3/MinIO access and presigned URL generation.
    pub storage: StorageState,
    /// Session Provider: resolves (and silently refreshes) session credentials.
    pub sessions: SessionState,
    /// Profile Store: the gate's capability view of the profiles table.
    pub profiles: ProfileState,
    /// The route gate with its immutable routing policy.
    pub gate: AccessGate,
    /// Configuration: The loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// These implementations allow handlers to selectively pull components from the shared AppState.
// This is critical for dependency injection and adhering to the Clean Architecture boundaries.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for StorageState {
    fn from_ref(app_state: &AppState) -> StorageState {
        app_state.storage.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// A middleware function that enforces authentication for the user-area routes.
///
/// *Mechanism*: It attempts to extract `AuthUser` from the request. Since `AuthUser`
/// implements `FromRequestParts`, if authentication (JWT validation, DB lookup) fails,
/// the extractor immediately rejects the request with a 401 Unauthorized status,
/// preventing execution of the handler. If successful, it allows the request to proceed.
async fn auth_middleware(_auth_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// gate_middleware
///
/// Runs the route gate ahead of every routed request. The gate resolves
/// identity from the session credential, then role, then applies the routing
/// policy:
/// - `Redirect` decisions short-circuit routing and send the client to the
///   policy target (`/login`, `/admin` or `/user`).
/// - `Allow` passes the request through; if the session provider silently
///   re-issued the credential while resolving, the fresh token is attached to
///   the response as a Set-Cookie header so the client persists it.
async fn gate_middleware(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let credential = auth::session_credential(request.headers());

    let decision = state
        .gate
        .decide(
            &path,
            credential.as_deref(),
            state.sessions.as_ref(),
            state.profiles.as_ref(),
        )
        .await;

    match decision {
        GateDecision::Redirect(target) => Redirect::temporary(&target).into_response(),
        GateDecision::Allow { refreshed_session } => {
            let mut response = next.run(request).await;
            if let Some(token) = refreshed_session {
                if let Ok(value) = header::HeaderValue::from_str(&auth::session_cookie(&token)) {
                    response.headers_mut().append(header::SET_COOKIE, value);
                }
            }
            response
        }
    }
}

/// create_router
///
/// Assembles the application's entire routing structure, applies global and scoped middleware,
/// and registers the application state.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        // Documentation: Serve the auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))

        // Public Routes: No authentication middleware applied.
        .merge(public::public_routes())

        // User Routes: Nested under '/user', protected by the `auth_middleware`.
        // This implements the second layer of Defense-in-Depth behind the gate.
        .nest(
            "/user",
            user::user_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )

        // Admin Routes: Nested under '/admin'. The 'admin' role check is performed
        // *inside* the handlers via the AuthUser extractor, after the gate has
        // already turned away visitors without a confirmed admin role.
        .nest("/admin", admin::admin_routes())

        // The Route Gate: every routed request passes through it before any
        // handler runs. Applied below the observability stack so gate
        // redirects are traced like any other response.
        .layer(middleware::from_fn_with_state(
            state.clone(),
            gate_middleware,
        ))

        // Apply the Unified State to all routes.
        .with_state(state);

    // 3. Observability and Correlation Layers (Applied outermost/first)
    // This section implements the Production Observability Stack.
    base_router
        .layer(
            ServiceBuilder::new()
                // 3a. Request ID Generation: Generates a unique UUID for every incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // 3b. Request Tracing: Wraps the entire request/response lifecycle in a tracing span.
                // Uses the `trace_span_logger` to include the generated request ID.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 3c. Request ID Propagation: Ensures the generated x-request-id header is
                // returned to the client and injected into subsequent service calls.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS Layer (Applied last, allowing all traffic in/out after processing)
        .layer(cors)
}

/// trace_span_logger
///
/// Helper function used by `TraceLayer` to customize the tracing span creation.
/// It extracts the `x-request-id` header (if present) and includes it in the
/// structured logging metadata alongside the HTTP method and URI.
///
/// *Goal*: Ensure every log line for a single request is correlated by a unique ID.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    // The structured log format used by the tracing macros.
    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
