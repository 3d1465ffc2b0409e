use async_trait::async_trait;
use asset_portal::{
    AppState,
    auth::{AuthUser, JwtSessionProvider},
    config::AppConfig,
    gate::{self, AccessGate, ProfileStore, ProviderError, RoutePolicy},
    handlers,
    models::{
        AdminDashboardStats, Asset, BulkDeleteRequest, Category, CreateAssetRequest,
        CreateDeletionRequest, CreateDepartmentRequest, DeletionRequest, Department,
        ReviewDeletionRequest, UpdateAssetRequest, UpdateUserRoleRequest, User,
    },
    repository::Repository,
    storage::MockStorageService,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use uuid::Uuid;

// --- MOCK REPOSITORY IMPLEMENTATION ---

// This struct is the central control point for testing handler logic.
// Handlers rely on traits, so we mock the trait implementation.
pub struct MockRepoControl {
    // Pre-canned outputs for handler requests
    pub assets_to_return: Vec<Asset>,
    pub asset_to_return: Option<Asset>,
    pub stats_to_return: AdminDashboardStats,
    pub users_to_return: Vec<User>,
    pub user_to_return: Option<User>,
    pub departments_to_return: Vec<Department>,
    pub department_to_return: Option<Department>,
    pub categories_to_return: Vec<Category>,
    pub category_to_return: Option<Category>,
    pub deletion_request_to_return: Option<DeletionRequest>,
    pub deletion_requests_to_return: Vec<DeletionRequest>,

    // IDs the mock treats as existing rows for delete operations.
    pub existing_ids: Vec<Uuid>,
}

impl Default for MockRepoControl {
    fn default() -> Self {
        MockRepoControl {
            assets_to_return: vec![],
            asset_to_return: Some(Asset::default()),
            stats_to_return: AdminDashboardStats::default(),
            users_to_return: vec![],
            user_to_return: Some(User::default()),
            departments_to_return: vec![],
            department_to_return: Some(Department::default()),
            categories_to_return: vec![],
            category_to_return: Some(Category::default()),
            deletion_request_to_return: Some(DeletionRequest::default()),
            deletion_requests_to_return: vec![],
            existing_ids: vec![],
        }
    }
}

#[async_trait]
impl Repository for MockRepoControl {
    async fn get_user(&self, _id: Uuid) -> Option<User> {
        self.user_to_return.clone()
    }
    async fn create_user(&self, user: User) -> User {
        user
    }
    async fn list_users(&self) -> Vec<User> {
        self.users_to_return.clone()
    }
    async fn set_user_role(&self, _id: Uuid, _role: String) -> Option<User> {
        self.user_to_return.clone()
    }
    async fn get_stats(&self) -> AdminDashboardStats {
        self.stats_to_return.clone()
    }
    async fn get_my_assets(&self, _user_id: Uuid) -> Vec<Asset> {
        self.assets_to_return.clone()
    }
    async fn get_asset(&self, _id: Uuid) -> Option<Asset> {
        self.asset_to_return.clone()
    }
    async fn get_asset_owned(&self, _id: Uuid, _user_id: Uuid) -> Option<Asset> {
        self.asset_to_return.clone()
    }
    async fn get_all_assets(
        &self,
        _status: Option<String>,
        _department: Option<Uuid>,
        _search: Option<String>,
    ) -> Vec<Asset> {
        self.assets_to_return.clone()
    }
    async fn create_asset(&self, req: CreateAssetRequest, user_id: Uuid) -> Asset {
        // Echo the inputs back so tests can verify handler plumbing.
        Asset {
            id: Uuid::new_v4(),
            user_id,
            name: req.name,
            description: req.description,
            serial_number: req.serial_number,
            category_id: req.category_id,
            department_id: req.department_id,
            status: "active".to_string(),
            photo: req.photo_key,
            ..Asset::default()
        }
    }
    async fn update_asset(
        &self,
        _id: Uuid,
        _user_id: Uuid,
        _req: UpdateAssetRequest,
    ) -> Option<Asset> {
        self.asset_to_return.clone()
    }
    async fn delete_asset_admin(&self, id: Uuid) -> bool {
        self.existing_ids.contains(&id)
    }
    async fn request_deletion(
        &self,
        _asset_id: Uuid,
        _user_id: Uuid,
        _reason: String,
    ) -> Option<DeletionRequest> {
        self.deletion_request_to_return.clone()
    }
    async fn list_deletion_requests(&self) -> Vec<DeletionRequest> {
        self.deletion_requests_to_return.clone()
    }
    async fn review_deletion_request(
        &self,
        _id: Uuid,
        _reviewer_id: Uuid,
        _approve: bool,
    ) -> Option<DeletionRequest> {
        self.deletion_request_to_return.clone()
    }
    async fn list_departments(&self) -> Vec<Department> {
        self.departments_to_return.clone()
    }
    async fn create_department(&self, _name: String) -> Option<Department> {
        self.department_to_return.clone()
    }
    async fn update_department(&self, _id: Uuid, _name: String) -> Option<Department> {
        self.department_to_return.clone()
    }
    async fn delete_department(&self, id: Uuid) -> bool {
        self.existing_ids.contains(&id)
    }
    async fn list_categories(&self) -> Vec<Category> {
        self.categories_to_return.clone()
    }
    async fn create_category(&self, _name: String) -> Option<Category> {
        self.category_to_return.clone()
    }
    async fn update_category(&self, _id: Uuid, _name: String) -> Option<Category> {
        self.category_to_return.clone()
    }
    async fn delete_category(&self, id: Uuid) -> bool {
        self.existing_ids.contains(&id)
    }
}

#[async_trait]
impl ProfileStore for MockRepoControl {
    async fn fetch_profile(&self, _id: Uuid) -> Result<Option<gate::Profile>, ProviderError> {
        Ok(self.user_to_return.clone().map(|user| gate::Profile {
            id: user.id,
            role: user.role,
        }))
    }
}

// --- TEST UTILITIES ---

const TEST_ID: Uuid = Uuid::from_u128(123);
const TEST_ADMIN_ID: Uuid = Uuid::from_u128(456);

// Creates an AppState using mock components
fn create_test_state(
    repo_control: MockRepoControl,
    storage_control: MockStorageService,
) -> AppState {
    let config = AppConfig::default();
    let repo = Arc::new(repo_control);
    AppState {
        repo: repo.clone(),
        storage: Arc::new(storage_control),
        sessions: Arc::new(JwtSessionProvider::new(
            &config.jwt_secret,
            config.session_ttl_secs,
        )),
        profiles: repo,
        gate: AccessGate::new(RoutePolicy::standard()),
        config,
    }
}

// Creates AuthUser for handler calls
fn admin_user() -> AuthUser {
    AuthUser {
        id: TEST_ADMIN_ID,
        role: "admin".to_string(),
    }
}
fn standard_user() -> AuthUser {
    AuthUser {
        id: TEST_ID,
        role: "user".to_string(),
    }
}

// --- Admin RBAC checks ---

#[tokio::test]
async fn test_admin_stats_requires_admin_role() {
    let state = create_test_state(MockRepoControl::default(), MockStorageService::new());

    let denied = handlers::get_admin_stats(standard_user(), State(state.clone())).await;
    assert_eq!(denied.unwrap_err(), StatusCode::FORBIDDEN);

    let allowed = handlers::get_admin_stats(admin_user(), State(state)).await;
    assert!(allowed.is_ok());
}

#[tokio::test]
async fn test_admin_stats_returns_repo_counters() {
    let repo = MockRepoControl {
        stats_to_return: AdminDashboardStats {
            total_assets: 12,
            total_users: 4,
            total_departments: 2,
            pending_deletions: 3,
        },
        ..MockRepoControl::default()
    };
    let state = create_test_state(repo, MockStorageService::new());

    let Json(stats) = handlers::get_admin_stats(admin_user(), State(state))
        .await
        .unwrap();
    assert_eq!(stats.total_assets, 12);
    assert_eq!(stats.pending_deletions, 3);
}

#[tokio::test]
async fn test_admin_inventory_denied_for_standard_user() {
    let state = create_test_state(MockRepoControl::default(), MockStorageService::new());

    let filter = handlers::AssetFilter {
        status: None,
        department: None,
        search: None,
    };
    let result = handlers::get_admin_assets(
        standard_user(),
        State(state),
        axum::extract::Query(filter),
    )
    .await;
    assert_eq!(result.unwrap_err(), StatusCode::FORBIDDEN);
}

// --- Bulk delete aggregation ---

#[tokio::test]
async fn test_bulk_delete_tallies_pass_and_fail() {
    let survivor = Uuid::new_v4();
    let victim_a = Uuid::new_v4();
    let victim_b = Uuid::new_v4();

    let repo = MockRepoControl {
        existing_ids: vec![victim_a, victim_b],
        ..MockRepoControl::default()
    };
    let state = create_test_state(repo, MockStorageService::new());

    let Json(summary) = handlers::bulk_delete_assets(
        admin_user(),
        State(state),
        Json(BulkDeleteRequest {
            ids: vec![victim_a, survivor, victim_b],
        }),
    )
    .await
    .unwrap();

    assert_eq!(summary.requested, 3);
    assert_eq!(summary.deleted, 2);
    assert_eq!(summary.failed, 1);
}

#[tokio::test]
async fn test_admin_delete_cleans_up_stored_photo() {
    let victim = Uuid::new_v4();
    let repo = MockRepoControl {
        asset_to_return: Some(Asset {
            id: victim,
            photo: Some("asset-photos/cafe.jpg".to_string()),
            ..Asset::default()
        }),
        existing_ids: vec![victim],
        ..MockRepoControl::default()
    };
    let storage = MockStorageService::new();
    let state = create_test_state(repo, storage.clone());

    let status = handlers::delete_asset_admin(admin_user(), State(state), Path(victim)).await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(storage.deleted(), vec!["asset-photos/cafe.jpg".to_string()]);
}

#[tokio::test]
async fn test_bulk_delete_requires_admin_role() {
    let state = create_test_state(MockRepoControl::default(), MockStorageService::new());

    let result = handlers::bulk_delete_assets(
        standard_user(),
        State(state),
        Json(BulkDeleteRequest { ids: vec![] }),
    )
    .await;
    assert_eq!(result.unwrap_err(), StatusCode::FORBIDDEN);
}

// --- Deletion approval workflow ---

#[tokio::test]
async fn test_deletion_request_conflict_when_already_pending() {
    let repo = MockRepoControl {
        deletion_request_to_return: None,
        ..MockRepoControl::default()
    };
    let state = create_test_state(repo, MockStorageService::new());

    let result = handlers::request_asset_deletion(
        standard_user(),
        State(state),
        Path(Uuid::new_v4()),
        Json(CreateDeletionRequest {
            reason: "obsolete".to_string(),
        }),
    )
    .await;
    assert_eq!(result.unwrap_err(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_review_requires_admin_role() {
    let state = create_test_state(MockRepoControl::default(), MockStorageService::new());

    let result = handlers::review_deletion_request(
        standard_user(),
        State(state),
        Path(Uuid::new_v4()),
        Json(ReviewDeletionRequest { approve: true }),
    )
    .await;
    assert_eq!(result.unwrap_err(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_review_of_missing_request_is_not_found() {
    let repo = MockRepoControl {
        deletion_request_to_return: None,
        ..MockRepoControl::default()
    };
    let state = create_test_state(repo, MockStorageService::new());

    let result = handlers::review_deletion_request(
        admin_user(),
        State(state),
        Path(Uuid::new_v4()),
        Json(ReviewDeletionRequest { approve: false }),
    )
    .await;
    assert_eq!(result.unwrap_err(), StatusCode::NOT_FOUND);
}

// --- User management ---

#[tokio::test]
async fn test_update_user_role_rejects_unknown_role() {
    let state = create_test_state(MockRepoControl::default(), MockStorageService::new());

    let result = handlers::update_user_role(
        admin_user(),
        State(state),
        Path(TEST_ID),
        Json(UpdateUserRoleRequest {
            role: "superuser".to_string(),
        }),
    )
    .await;
    assert_eq!(result.unwrap_err(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_user_role_missing_user_is_not_found() {
    let repo = MockRepoControl {
        user_to_return: None,
        ..MockRepoControl::default()
    };
    let state = create_test_state(repo, MockStorageService::new());

    let result = handlers::update_user_role(
        admin_user(),
        State(state),
        Path(TEST_ID),
        Json(UpdateUserRoleRequest {
            role: "admin".to_string(),
        }),
    )
    .await;
    assert_eq!(result.unwrap_err(), StatusCode::NOT_FOUND);
}

// --- Asset submission & tracking ---

#[tokio::test]
async fn test_create_asset_binds_submitter_from_session() {
    let state = create_test_state(MockRepoControl::default(), MockStorageService::new());

    let Json(asset) = handlers::create_asset(
        standard_user(),
        State(state),
        Json(CreateAssetRequest {
            name: "ThinkPad T14".to_string(),
            description: "Staff laptop".to_string(),
            serial_number: "SN-0042".to_string(),
            category_id: Uuid::new_v4(),
            department_id: Uuid::new_v4(),
            photo_key: None,
        }),
    )
    .await;

    // The submitter must come from the authenticated session, never the payload.
    assert_eq!(asset.user_id, TEST_ID);
    assert_eq!(asset.name, "ThinkPad T14");
    assert_eq!(asset.status, "active");
}

#[tokio::test]
async fn test_get_asset_details_not_owner_is_not_found() {
    let repo = MockRepoControl {
        asset_to_return: None,
        ..MockRepoControl::default()
    };
    let state = create_test_state(repo, MockStorageService::new());

    let result =
        handlers::get_asset_details(standard_user(), State(state), Path(Uuid::new_v4())).await;
    assert_eq!(result.unwrap_err(), StatusCode::NOT_FOUND);
}

// --- Directory management ---

#[tokio::test]
async fn test_create_department_conflict_on_duplicate() {
    let repo = MockRepoControl {
        department_to_return: None,
        ..MockRepoControl::default()
    };
    let state = create_test_state(repo, MockStorageService::new());

    let result = handlers::create_department(
        admin_user(),
        State(state),
        Json(CreateDepartmentRequest {
            name: "Facilities".to_string(),
        }),
    )
    .await;
    assert_eq!(result.unwrap_err(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_delete_department_still_referenced_is_conflict() {
    // Mock reports no row deleted (foreign key RESTRICT in the real store).
    let state = create_test_state(MockRepoControl::default(), MockStorageService::new());

    let status =
        handlers::delete_department(admin_user(), State(state), Path(Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_directory_listing_requires_admin_role() {
    let state = create_test_state(MockRepoControl::default(), MockStorageService::new());

    let departments = handlers::list_departments(standard_user(), State(state.clone())).await;
    assert_eq!(departments.unwrap_err(), StatusCode::FORBIDDEN);

    let categories = handlers::list_categories(standard_user(), State(state)).await;
    assert_eq!(categories.unwrap_err(), StatusCode::FORBIDDEN);
}
