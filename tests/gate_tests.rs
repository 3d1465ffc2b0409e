use async_trait::async_trait;
use asset_portal::gate::{
    AccessGate, GateDecision, Identity, PolicyRule, Profile, ProfileStore, ProviderError,
    ResolvedSession, RouteClass, RoutePolicy, SessionProvider,
};
use uuid::Uuid;

// --- Mock Collaborators ---

/// Scriptable session provider: either resolves to a fixed identity (with an
/// optional refreshed credential), resolves to anonymous, or fails outright.
struct MockSessions {
    identity: Option<Uuid>,
    refreshed: Option<String>,
    fail: bool,
}

impl MockSessions {
    fn anonymous() -> Self {
        Self {
            identity: None,
            refreshed: None,
            fail: false,
        }
    }

    fn authenticated(id: Uuid) -> Self {
        Self {
            identity: Some(id),
            refreshed: None,
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            identity: None,
            refreshed: None,
            fail: true,
        }
    }
}

#[async_trait]
impl SessionProvider for MockSessions {
    async fn resolve_identity(
        &self,
        _credential: Option<&str>,
    ) -> Result<ResolvedSession, ProviderError> {
        if self.fail {
            return Err(ProviderError::SessionUnavailable("connection refused".into()));
        }
        Ok(ResolvedSession {
            identity: self.identity.map(|id| Identity { id }),
            refreshed: self.refreshed.clone(),
        })
    }
}

/// Scriptable profile store: returns a fixed role, no row, or a failure.
struct MockProfiles {
    role: Option<String>,
    fail: bool,
}

impl MockProfiles {
    fn with_role(role: &str) -> Self {
        Self {
            role: Some(role.to_string()),
            fail: false,
        }
    }

    fn missing() -> Self {
        Self {
            role: None,
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            role: None,
            fail: true,
        }
    }
}

#[async_trait]
impl ProfileStore for MockProfiles {
    async fn fetch_profile(&self, id: Uuid) -> Result<Option<Profile>, ProviderError> {
        if self.fail {
            return Err(ProviderError::ProfileUnavailable("timeout".into()));
        }
        Ok(self.role.clone().map(|role| Profile { id, role }))
    }
}

// --- Helpers ---

const USER_ID: Uuid = Uuid::from_u128(1);
const ADMIN_ID: Uuid = Uuid::from_u128(2);

fn gate() -> AccessGate {
    AccessGate::new(RoutePolicy::standard())
}

async fn decide(
    path: &str,
    sessions: &MockSessions,
    profiles: &MockProfiles,
) -> GateDecision {
    gate()
        .decide(path, Some("opaque-token"), sessions, profiles)
        .await
}

fn allow() -> GateDecision {
    GateDecision::Allow {
        refreshed_session: None,
    }
}

fn redirect(target: &str) -> GateDecision {
    GateDecision::Redirect(target.to_string())
}

// --- Anonymous Visitors ---

#[tokio::test]
async fn test_anonymous_on_admin_redirects_to_login() {
    let decision = decide(
        "/admin/departments",
        &MockSessions::anonymous(),
        &MockProfiles::missing(),
    )
    .await;
    assert_eq!(decision, redirect("/login"));
}

#[tokio::test]
async fn test_anonymous_on_user_area_redirects_to_login() {
    let decision = decide(
        "/user/assets",
        &MockSessions::anonymous(),
        &MockProfiles::missing(),
    )
    .await;
    assert_eq!(decision, redirect("/login"));
}

#[tokio::test]
async fn test_anonymous_on_root_is_allowed() {
    let decision = decide("/", &MockSessions::anonymous(), &MockProfiles::missing()).await;
    assert_eq!(decision, allow());
}

#[tokio::test]
async fn test_anonymous_on_unmatched_path_is_allowed() {
    // Classification is total: anything outside the table defaults to public.
    let decision = decide(
        "/health",
        &MockSessions::anonymous(),
        &MockProfiles::missing(),
    )
    .await;
    assert_eq!(decision, allow());
}

// --- Role Enforcement ---

#[tokio::test]
async fn test_user_role_on_admin_is_bounced_to_user_home() {
    let decision = decide(
        "/admin",
        &MockSessions::authenticated(USER_ID),
        &MockProfiles::with_role("user"),
    )
    .await;
    assert_eq!(decision, redirect("/user"));
}

#[tokio::test]
async fn test_user_role_on_admin_subpath_is_bounced() {
    let decision = decide(
        "/admin/deletion-requests",
        &MockSessions::authenticated(USER_ID),
        &MockProfiles::with_role("user"),
    )
    .await;
    assert_eq!(decision, redirect("/user"));
}

#[tokio::test]
async fn test_admin_is_never_redirected_from_admin_paths() {
    let sessions = MockSessions::authenticated(ADMIN_ID);
    let profiles = MockProfiles::with_role("admin");

    for path in ["/admin", "/admin/stats", "/admin/users/abc/role"] {
        let decision = decide(path, &sessions, &profiles).await;
        assert_eq!(decision, allow(), "admin bounced from {path}");
    }
}

#[tokio::test]
async fn test_both_roles_may_view_user_area() {
    for role in ["user", "admin"] {
        let decision = decide(
            "/user/assets",
            &MockSessions::authenticated(USER_ID),
            &MockProfiles::with_role(role),
        )
        .await;
        assert_eq!(decision, allow(), "role {role} blocked from /user");
    }
}

#[tokio::test]
async fn test_unknown_role_is_not_admin() {
    // No profile row: role resolves to unknown, which must never escalate.
    let decision = decide(
        "/admin",
        &MockSessions::authenticated(USER_ID),
        &MockProfiles::missing(),
    )
    .await;
    assert_eq!(decision, redirect("/user"));
}

#[tokio::test]
async fn test_unknown_role_still_passes_user_area() {
    let decision = decide(
        "/user",
        &MockSessions::authenticated(USER_ID),
        &MockProfiles::missing(),
    )
    .await;
    assert_eq!(decision, allow());
}

#[tokio::test]
async fn test_unrecognized_role_string_is_unknown() {
    let decision = decide(
        "/admin",
        &MockSessions::authenticated(USER_ID),
        &MockProfiles::with_role("superuser"),
    )
    .await;
    assert_eq!(decision, redirect("/user"));
}

// --- Entry-Path Bouncing ---

#[tokio::test]
async fn test_authenticated_admin_on_login_goes_home() {
    let decision = decide(
        "/login",
        &MockSessions::authenticated(ADMIN_ID),
        &MockProfiles::with_role("admin"),
    )
    .await;
    assert_eq!(decision, redirect("/admin"));
}

#[tokio::test]
async fn test_authenticated_user_on_root_goes_home() {
    let decision = decide(
        "/",
        &MockSessions::authenticated(USER_ID),
        &MockProfiles::with_role("user"),
    )
    .await;
    assert_eq!(decision, redirect("/user"));
}

#[tokio::test]
async fn test_entry_bounce_requires_exact_path() {
    // '/login/reset' shares the prefix but is not an entry path; it is public
    // and passes through even with an identity present.
    let decision = decide(
        "/login/reset",
        &MockSessions::authenticated(USER_ID),
        &MockProfiles::with_role("user"),
    )
    .await;
    assert_eq!(decision, allow());
}

// --- Degraded Collaborators ---

#[tokio::test]
async fn test_profile_store_failure_denies_escalation() {
    let decision = decide(
        "/admin",
        &MockSessions::authenticated(USER_ID),
        &MockProfiles::failing(),
    )
    .await;
    assert_eq!(decision, redirect("/user"));
}

#[tokio::test]
async fn test_profile_store_failure_still_passes_user_area() {
    let decision = decide(
        "/user/assets",
        &MockSessions::authenticated(USER_ID),
        &MockProfiles::failing(),
    )
    .await;
    assert_eq!(decision, allow());
}

#[tokio::test]
async fn test_session_provider_failure_fails_closed() {
    // An unreachable session provider means no identity can be trusted:
    // protected classes bounce to login, public passes through.
    let sessions = MockSessions::failing();
    let profiles = MockProfiles::with_role("admin");

    let protected = decide("/admin", &sessions, &profiles).await;
    assert_eq!(protected, redirect("/login"));

    let public = decide("/health", &sessions, &profiles).await;
    assert_eq!(public, allow());
}

// --- Refresh Pass-Through ---

#[tokio::test]
async fn test_refreshed_credential_rides_the_allow() {
    let sessions = MockSessions {
        identity: Some(USER_ID),
        refreshed: Some("fresh-token".to_string()),
        fail: false,
    };
    let decision = decide("/user/assets", &sessions, &MockProfiles::with_role("user")).await;
    assert_eq!(
        decision,
        GateDecision::Allow {
            refreshed_session: Some("fresh-token".to_string()),
        }
    );
}

#[tokio::test]
async fn test_redirect_drops_the_refreshed_credential() {
    let sessions = MockSessions {
        identity: Some(USER_ID),
        refreshed: Some("fresh-token".to_string()),
        fail: false,
    };
    let decision = decide("/admin", &sessions, &MockProfiles::with_role("user")).await;
    assert_eq!(decision, redirect("/user"));
}

// --- Idempotence ---

#[tokio::test]
async fn test_decision_is_idempotent() {
    let sessions = MockSessions::authenticated(USER_ID);
    let profiles = MockProfiles::with_role("user");

    for path in ["/admin", "/user/assets", "/login", "/", "/health"] {
        let first = decide(path, &sessions, &profiles).await;
        let second = decide(path, &sessions, &profiles).await;
        assert_eq!(first, second, "decision for {path} changed between runs");
    }
}

// --- Policy Injection ---

#[tokio::test]
async fn test_classification_follows_injected_policy() {
    let policy = RoutePolicy::with_rules(
        vec![
            PolicyRule {
                prefix: "/ops".to_string(),
                class: RouteClass::AdminProtected,
            },
            PolicyRule {
                prefix: "/app".to_string(),
                class: RouteClass::UserProtected,
            },
        ],
        RouteClass::Public,
    );
    let gate = AccessGate::new(policy);

    let decision = gate
        .decide(
            "/ops/dashboard",
            Some("opaque-token"),
            &MockSessions::anonymous(),
            &MockProfiles::missing(),
        )
        .await;
    assert_eq!(decision, redirect("/login"));

    // The standard prefixes mean nothing under the alternate table.
    let decision = gate
        .decide(
            "/admin",
            Some("opaque-token"),
            &MockSessions::anonymous(),
            &MockProfiles::missing(),
        )
        .await;
    assert_eq!(decision, allow());
}

#[test]
fn test_classification_is_total_and_first_match_wins() {
    let policy = RoutePolicy::standard();

    assert_eq!(policy.classify("/login"), RouteClass::Public);
    assert_eq!(policy.classify("/login/reset"), RouteClass::Public);
    assert_eq!(policy.classify("/admin"), RouteClass::AdminProtected);
    assert_eq!(policy.classify("/admin/stats"), RouteClass::AdminProtected);
    assert_eq!(policy.classify("/user"), RouteClass::UserProtected);
    assert_eq!(policy.classify("/user/assets/1"), RouteClass::UserProtected);
    assert_eq!(policy.classify("/"), RouteClass::Public);
    assert_eq!(policy.classify("/anything/else"), RouteClass::Public);
}
