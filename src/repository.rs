use crate::gate::{self, ProfileStore, ProviderError};
use crate::models::{
    AdminDashboardStats, Asset, Category, CreateAssetRequest, DeletionRequest, Department,
    UpdateAssetRequest, User,
};
use async_trait::async_trait;
use sqlx::{PgPool, query_builder::QueryBuilder};
use std::sync::Arc;
use uuid::Uuid;

/// Repository Trait
///
/// Defines the abstract contract for all persistence operations. This is the core
/// of the Repository Abstraction pattern, allowing the handlers to interact with
/// the data layer without knowing the specific implementation (Postgres, Mock, etc.).
///
/// **Send + Sync + async_trait** are required to make the trait object (`Arc<dyn Repository>`)
/// safely shareable and usable across Axum's asynchronous task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- User/Auth ---
    async fn get_user(&self, id: Uuid) -> Option<User>;
    async fn create_user(&self, user: User) -> User;
    async fn list_users(&self) -> Vec<User>;
    // Admin action: the only permitted role mutation.
    async fn set_user_role(&self, id: Uuid, role: String) -> Option<User>;
    async fn get_stats(&self) -> AdminDashboardStats;

    // --- Asset Retrieval ---
    // Owner listing: every asset the user submitted, all statuses.
    async fn get_my_assets(&self, user_id: Uuid) -> Vec<Asset>;
    // Unscoped single lookup. For internal/admin use, when authorization has
    // already been decided by the calling handler.
    async fn get_asset(&self, id: Uuid) -> Option<Asset>;
    // Owner-scoped single lookup.
    async fn get_asset_owned(&self, id: Uuid, user_id: Uuid) -> Option<Asset>;
    // Admin access: the full inventory with filtering.
    async fn get_all_assets(
        &self,
        status: Option<String>,
        department: Option<Uuid>,
        search: Option<String>,
    ) -> Vec<Asset>;

    // --- Asset Actions ---
    async fn create_asset(&self, req: CreateAssetRequest, user_id: Uuid) -> Asset;
    // Owner-Only: Updates only if the user_id matches. Uses COALESCE for partial updates.
    async fn update_asset(&self, id: Uuid, user_id: Uuid, req: UpdateAssetRequest)
    -> Option<Asset>;
    /// Admin Override: Delete ANY asset by ID (No ownership check).
    async fn delete_asset_admin(&self, id: Uuid) -> bool;

    // --- Deletion Approval Workflow ---
    // Opens a deletion request for an owned, active asset and parks the asset
    // in 'pending_deletion'. Returns None if the asset is missing, not owned
    // by the requester, or already has a pending request.
    async fn request_deletion(
        &self,
        asset_id: Uuid,
        user_id: Uuid,
        reason: String,
    ) -> Option<DeletionRequest>;
    // Review queue for administrators, pending entries first.
    async fn list_deletion_requests(&self) -> Vec<DeletionRequest>;
    // Resolves a pending request: approval deletes the asset, rejection
    // returns it to 'active'. None if the request is missing or already reviewed.
    async fn review_deletion_request(
        &self,
        id: Uuid,
        reviewer_id: Uuid,
        approve: bool,
    ) -> Option<DeletionRequest>;

    // --- Directory (Departments & Categories) ---
    async fn list_departments(&self) -> Vec<Department>;
    async fn create_department(&self, name: String) -> Option<Department>;
    async fn update_department(&self, id: Uuid, name: String) -> Option<Department>;
    async fn delete_department(&self, id: Uuid) -> bool;

    async fn list_categories(&self) -> Vec<Category>;
    async fn create_category(&self, name: String) -> Option<Category>;
    async fn update_category(&self, id: Uuid, name: String) -> Option<Category>;
    async fn delete_category(&self, id: Uuid) -> bool;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer access across the application state.
pub type RepositoryState = Arc<dyn Repository>;

// Column list shared by every asset query that maps into the `Asset` struct.
const ASSET_COLUMNS: &str =
    "id, user_id, name, description, serial_number, category_id, department_id, status, photo, created_at, updated_at";

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by the PostgreSQL database.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    /// get_user
    ///
    /// Retrieves user profile data (ID, email, role) needed for authentication and authorization.
    async fn get_user(&self, id: Uuid) -> Option<User> {
        sqlx::query_as::<_, User>("SELECT id, email, role FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or(None)
    }

    /// create_user
    ///
    /// Creates the mirroring profile record in `public.profiles` after external auth success.
    async fn create_user(&self, user: User) -> User {
        sqlx::query_as::<_, User>(
            "INSERT INTO profiles (id, email, role) VALUES ($1, $2, $3) RETURNING id, email, role",
        )
        .bind(user.id)
        .bind(user.email)
        .bind(user.role)
        .fetch_one(&self.pool)
        .await
        .expect("Failed to create user")
    }

    /// list_users
    ///
    /// Administrative listing of every profile.
    async fn list_users(&self) -> Vec<User> {
        match sqlx::query_as::<_, User>("SELECT id, email, role FROM profiles ORDER BY email ASC")
            .fetch_all(&self.pool)
            .await
        {
            Ok(users) => users,
            Err(e) => {
                tracing::error!("list_users error: {:?}", e);
                vec![]
            }
        }
    }

    /// set_user_role
    ///
    /// Changes a profile's role. Reachable only through the admin router; this
    /// is the single write path for the role column.
    async fn set_user_role(&self, id: Uuid, role: String) -> Option<User> {
        sqlx::query_as::<_, User>(
            "UPDATE profiles SET role = $2 WHERE id = $1 RETURNING id, email, role",
        )
        .bind(id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("set_user_role error: {:?}", e);
            None
        })
    }

    /// get_stats
    ///
    /// Compiles all necessary counters for the administrative dashboard in a single call.
    async fn get_stats(&self) -> AdminDashboardStats {
        let total_assets = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM assets")
            .fetch_one(&self.pool)
            .await
            .unwrap_or(0);
        let total_users = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM profiles")
            .fetch_one(&self.pool)
            .await
            .unwrap_or(0);
        let total_departments = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM departments")
            .fetch_one(&self.pool)
            .await
            .unwrap_or(0);
        let pending_deletions = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM deletion_requests WHERE status = 'pending'",
        )
        .fetch_one(&self.pool)
        .await
        .unwrap_or(0);
        AdminDashboardStats {
            total_assets,
            total_users,
            total_departments,
            pending_deletions,
        }
    }

    // --- ASSETS ---

    /// get_my_assets
    ///
    /// Retrieves all assets submitted by the authenticated user, including those
    /// currently parked in 'pending_deletion'.
    async fn get_my_assets(&self, user_id: Uuid) -> Vec<Asset> {
        let sql = format!(
            "SELECT {ASSET_COLUMNS} FROM assets WHERE user_id = $1 ORDER BY created_at DESC"
        );
        match sqlx::query_as::<_, Asset>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
        {
            Ok(assets) => assets,
            Err(e) => {
                tracing::error!("get_my_assets error: {:?}", e);
                vec![]
            }
        }
    }

    /// get_asset
    ///
    /// Simple retrieval of any asset by ID (no ownership check). Used by the
    /// admin delete path to find the photo key before removing the row.
    async fn get_asset(&self, id: Uuid) -> Option<Asset> {
        let sql = format!("SELECT {ASSET_COLUMNS} FROM assets WHERE id = $1");
        sqlx::query_as::<_, Asset>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("get_asset error: {:?}", e);
                None
            })
    }

    /// get_asset_owned
    ///
    /// Retrieves a single asset only if the querying user submitted it.
    /// This is the **Owner-Only** authorization check for the tracking view.
    async fn get_asset_owned(&self, id: Uuid, user_id: Uuid) -> Option<Asset> {
        let sql = format!("SELECT {ASSET_COLUMNS} FROM assets WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Asset>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("get_asset_owned error: {:?}", e);
                None
            })
    }

    /// get_all_assets
    ///
    /// Administrative inventory listing with flexible filtering, built with
    /// QueryBuilder for safe parameterization (no SQL injection risk).
    async fn get_all_assets(
        &self,
        status: Option<String>,
        department: Option<Uuid>,
        search: Option<String>,
    ) -> Vec<Asset> {
        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(format!(
            "SELECT {ASSET_COLUMNS} FROM assets WHERE true "
        ));

        if let Some(s) = status {
            builder.push(" AND status = ");
            builder.push_bind(s);
        }

        if let Some(d) = department {
            builder.push(" AND department_id = ");
            builder.push_bind(d);
        }

        if let Some(q) = search {
            // Case-insensitive search across name, description and serial number.
            let search_pattern = format!("%{}%", q);
            builder.push(" AND (name ILIKE ");
            builder.push_bind(search_pattern.clone());
            builder.push(" OR description ILIKE ");
            builder.push_bind(search_pattern.clone());
            builder.push(" OR serial_number ILIKE ");
            builder.push_bind(search_pattern);
            builder.push(")");
        }

        builder.push(" ORDER BY created_at DESC");

        let query = builder.build_query_as::<Asset>();

        match query.fetch_all(&self.pool).await {
            Ok(assets) => assets,
            Err(e) => {
                tracing::error!("get_all_assets error: {:?}", e);
                vec![]
            }
        }
    }

    /// create_asset
    ///
    /// Inserts a new asset submission. All new assets start in the 'active' state.
    async fn create_asset(&self, req: CreateAssetRequest, user_id: Uuid) -> Asset {
        let new_id = Uuid::new_v4();
        let sql = format!(
            "INSERT INTO assets (id, user_id, name, description, serial_number, category_id, department_id, status, photo, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, 'active', $8, NOW(), NOW()) \
             RETURNING {ASSET_COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&sql)
            .bind(new_id)
            .bind(user_id)
            .bind(req.name)
            .bind(req.description)
            .bind(req.serial_number)
            .bind(req.category_id)
            .bind(req.department_id)
            .bind(req.photo_key)
            .fetch_one(&self.pool)
            .await
            .expect("Failed to insert asset")
    }

    /// update_asset
    ///
    /// Updates an asset only if the provided `user_id` matches the submitter.
    /// Uses the PostgreSQL `COALESCE` function to efficiently handle `Option<T>` fields,
    /// only updating a column if the corresponding field in `req` is `Some`.
    async fn update_asset(
        &self,
        id: Uuid,
        user_id: Uuid,
        req: UpdateAssetRequest,
    ) -> Option<Asset> {
        let sql = format!(
            "UPDATE assets \
             SET name = COALESCE($3, name), \
                 description = COALESCE($4, description), \
                 serial_number = COALESCE($5, serial_number), \
                 category_id = COALESCE($6, category_id), \
                 department_id = COALESCE($7, department_id), \
                 photo = COALESCE($8, photo), \
                 updated_at = NOW() \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {ASSET_COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(req.name)
            .bind(req.description)
            .bind(req.serial_number)
            .bind(req.category_id)
            .bind(req.department_id)
            .bind(req.photo_key)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("update_asset error: {:?}", e);
                None
            })
    }

    /// delete_asset_admin
    ///
    /// **Admin Override**: Deletes an asset without checking ownership.
    async fn delete_asset_admin(&self, id: Uuid) -> bool {
        match sqlx::query("DELETE FROM assets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("admin delete asset error: {:?}", e);
                false
            }
        }
    }

    // --- DELETION APPROVAL WORKFLOW ---

    /// request_deletion
    ///
    /// Parks the asset in 'pending_deletion' and records the request, in one
    /// transaction. The `status = 'active'` predicate enforces at most one
    /// pending request per asset; the `user_id` predicate is the ownership check.
    async fn request_deletion(
        &self,
        asset_id: Uuid,
        user_id: Uuid,
        reason: String,
    ) -> Option<DeletionRequest> {
        let mut tx = match self.pool.begin().await {
            Ok(tx) => tx,
            Err(e) => {
                tracing::error!("request_deletion begin error: {:?}", e);
                return None;
            }
        };

        let parked = sqlx::query(
            "UPDATE assets SET status = 'pending_deletion', updated_at = NOW() \
             WHERE id = $1 AND user_id = $2 AND status = 'active'",
        )
        .bind(asset_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await;

        match parked {
            Ok(res) if res.rows_affected() > 0 => {}
            Ok(_) => return None,
            Err(e) => {
                tracing::error!("request_deletion park error: {:?}", e);
                return None;
            }
        }

        let request = sqlx::query_as::<_, DeletionRequest>(
            "INSERT INTO deletion_requests (id, asset_id, requester_id, reason, status, created_at) \
             VALUES ($1, $2, $3, $4, 'pending', NOW()) \
             RETURNING id, asset_id, requester_id, reason, status, reviewed_by, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(asset_id)
        .bind(user_id)
        .bind(reason)
        .fetch_one(&mut *tx)
        .await;

        match request {
            Ok(request) => match tx.commit().await {
                Ok(()) => Some(request),
                Err(e) => {
                    tracing::error!("request_deletion commit error: {:?}", e);
                    None
                }
            },
            Err(e) => {
                tracing::error!("request_deletion insert error: {:?}", e);
                None
            }
        }
    }

    /// list_deletion_requests
    ///
    /// The administrative review queue, enriched with the asset name via a
    /// LEFT JOIN (approved requests outlive their asset). Pending entries first.
    async fn list_deletion_requests(&self) -> Vec<DeletionRequest> {
        let query = "\
            SELECT \
                d.id, d.asset_id, d.requester_id, d.reason, d.status, \
                d.reviewed_by, d.created_at, a.name AS asset_name \
            FROM deletion_requests d \
            LEFT JOIN assets a ON d.asset_id = a.id \
            ORDER BY (d.status = 'pending') DESC, d.created_at DESC";

        sqlx::query_as::<_, DeletionRequest>(query)
            .fetch_all(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("list_deletion_requests error: {:?}", e);
                vec![]
            })
    }

    /// review_deletion_request
    ///
    /// Resolves a pending request in one transaction. The `status = 'pending'`
    /// predicate makes a second review of the same request a no-op (None).
    async fn review_deletion_request(
        &self,
        id: Uuid,
        reviewer_id: Uuid,
        approve: bool,
    ) -> Option<DeletionRequest> {
        let mut tx = match self.pool.begin().await {
            Ok(tx) => tx,
            Err(e) => {
                tracing::error!("review_deletion_request begin error: {:?}", e);
                return None;
            }
        };

        let verdict = if approve { "approved" } else { "rejected" };
        let reviewed = sqlx::query_as::<_, DeletionRequest>(
            "UPDATE deletion_requests SET status = $3, reviewed_by = $2 \
             WHERE id = $1 AND status = 'pending' \
             RETURNING id, asset_id, requester_id, reason, status, reviewed_by, created_at",
        )
        .bind(id)
        .bind(reviewer_id)
        .bind(verdict)
        .fetch_optional(&mut *tx)
        .await;

        let request = match reviewed {
            Ok(Some(request)) => request,
            Ok(None) => return None,
            Err(e) => {
                tracing::error!("review_deletion_request update error: {:?}", e);
                return None;
            }
        };

        let outcome = if approve {
            sqlx::query("DELETE FROM assets WHERE id = $1")
                .bind(request.asset_id)
                .execute(&mut *tx)
                .await
        } else {
            sqlx::query(
                "UPDATE assets SET status = 'active', updated_at = NOW() \
                 WHERE id = $1 AND status = 'pending_deletion'",
            )
            .bind(request.asset_id)
            .execute(&mut *tx)
            .await
        };

        match outcome {
            Ok(_) => match tx.commit().await {
                Ok(()) => Some(request),
                Err(e) => {
                    tracing::error!("review_deletion_request commit error: {:?}", e);
                    None
                }
            },
            Err(e) => {
                tracing::error!("review_deletion_request resolve error: {:?}", e);
                None
            }
        }
    }

    // --- DIRECTORY ---

    /// list_departments
    async fn list_departments(&self) -> Vec<Department> {
        sqlx::query_as::<_, Department>("SELECT id, name FROM departments ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .unwrap_or_default()
    }

    /// create_department
    ///
    /// Returns None on a duplicate name (unique constraint) or database error.
    async fn create_department(&self, name: String) -> Option<Department> {
        sqlx::query_as::<_, Department>(
            "INSERT INTO departments (id, name) VALUES ($1, $2) RETURNING id, name",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("create_department error: {:?}", e);
            None
        })
    }

    /// update_department
    async fn update_department(&self, id: Uuid, name: String) -> Option<Department> {
        sqlx::query_as::<_, Department>(
            "UPDATE departments SET name = $2 WHERE id = $1 RETURNING id, name",
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("update_department error: {:?}", e);
            None
        })
    }

    /// delete_department
    ///
    /// Fails (false) while assets still reference the department; the foreign
    /// key is RESTRICT.
    async fn delete_department(&self, id: Uuid) -> bool {
        match sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("delete_department error: {:?}", e);
                false
            }
        }
    }

    /// list_categories
    async fn list_categories(&self) -> Vec<Category> {
        sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .unwrap_or_default()
    }

    /// create_category
    async fn create_category(&self, name: String) -> Option<Category> {
        sqlx::query_as::<_, Category>(
            "INSERT INTO categories (id, name) VALUES ($1, $2) RETURNING id, name",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("create_category error: {:?}", e);
            None
        })
    }

    /// update_category
    async fn update_category(&self, id: Uuid, name: String) -> Option<Category> {
        sqlx::query_as::<_, Category>(
            "UPDATE categories SET name = $2 WHERE id = $1 RETURNING id, name",
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("update_category error: {:?}", e);
            None
        })
    }

    /// delete_category
    async fn delete_category(&self, id: Uuid) -> bool {
        match sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("delete_category error: {:?}", e);
                false
            }
        }
    }
}

/// ProfileStore Implementation
///
/// Exposes the profiles table to the route gate through its capability
/// interface. Unlike `get_user`, this keeps the failure kind: the gate logs
/// store outages distinctly while still degrading the role to unknown.
#[async_trait]
impl ProfileStore for PostgresRepository {
    async fn fetch_profile(&self, id: Uuid) -> Result<Option<gate::Profile>, ProviderError> {
        sqlx::query_as::<_, User>("SELECT id, email, role FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map(|row| {
                row.map(|user| gate::Profile {
                    id: user.id,
                    role: user.role,
                })
            })
            .map_err(|e| ProviderError::ProfileUnavailable(e.to_string()))
    }
}
