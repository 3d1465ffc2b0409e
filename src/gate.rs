use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

// --- Route Classification ---

/// RouteClass
///
/// The three access classes a request path can fall into. Classification is
/// total: every path resolves to exactly one class, with unmatched paths
/// falling back to `Public` (default-allow).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Reachable by anyone, anonymous or authenticated.
    Public,
    /// Reachable only by authenticated users with the 'admin' role.
    AdminProtected,
    /// Reachable by any authenticated user, regardless of role.
    UserProtected,
}

/// PolicyRule
///
/// One prefix entry in the routing policy table. A path belongs to `class`
/// if it starts with `prefix`.
#[derive(Debug, Clone)]
pub struct PolicyRule {
    pub prefix: String,
    pub class: RouteClass,
}

/// RoutePolicy
///
/// The immutable routing policy: an ordered prefix table plus the fixed
/// navigation targets the gate may redirect to. It is constructed once at
/// startup and injected into the `AccessGate` rather than living in module
/// state, so tests can run the gate against alternate policies.
///
/// Classification walks the rule table top-to-bottom and the first matching
/// prefix wins; paths matching no rule take `default_class`.
#[derive(Debug, Clone)]
pub struct RoutePolicy {
    rules: Vec<PolicyRule>,
    default_class: RouteClass,
    /// Paths that act as entry points (`/login` and `/`): an authenticated
    /// visitor landing exactly on one of these is forwarded to their home.
    entry_paths: Vec<String>,
    /// Where anonymous visitors are sent when they hit a protected class.
    pub login_target: String,
    /// Home route for authenticated admins.
    pub admin_home: String,
    /// Home route for every other authenticated user.
    pub user_home: String,
}

impl RoutePolicy {
    /// The portal's production policy table.
    ///
    /// | prefix   | class           |
    /// |----------|-----------------|
    /// | /login   | public          |
    /// | /admin   | admin-protected |
    /// | /user    | user-protected  |
    /// | (other)  | public          |
    ///
    /// Static assets are served before routing and never reach the gate, so
    /// they need no entry here.
    pub fn standard() -> Self {
        Self {
            rules: vec![
                PolicyRule {
                    prefix: "/login".to_string(),
                    class: RouteClass::Public,
                },
                PolicyRule {
                    prefix: "/admin".to_string(),
                    class: RouteClass::AdminProtected,
                },
                PolicyRule {
                    prefix: "/user".to_string(),
                    class: RouteClass::UserProtected,
                },
            ],
            default_class: RouteClass::Public,
            entry_paths: vec!["/login".to_string(), "/".to_string()],
            login_target: "/login".to_string(),
            admin_home: "/admin".to_string(),
            user_home: "/user".to_string(),
        }
    }

    /// Builds a policy with a custom rule table. Targets and entry paths keep
    /// the standard values unless overridden afterwards.
    pub fn with_rules(rules: Vec<PolicyRule>, default_class: RouteClass) -> Self {
        Self {
            rules,
            default_class,
            ..Self::standard()
        }
    }

    /// classify
    ///
    /// Total mapping from a request path to its access class. First matching
    /// prefix in the table wins; no match falls back to the default class.
    /// Stable for the lifetime of a request: the table is immutable.
    pub fn classify(&self, path: &str) -> RouteClass {
        self.rules
            .iter()
            .find(|rule| path.starts_with(&rule.prefix))
            .map(|rule| rule.class)
            .unwrap_or(self.default_class)
    }

    /// True only for an exact entry-path hit. `/login/reset` is not an entry
    /// path even though it shares the prefix.
    pub fn is_entry(&self, path: &str) -> bool {
        self.entry_paths.iter().any(|entry| entry == path)
    }
}

// --- Identity & Role Resolution ---

/// Identity
///
/// An authenticated actor reference, resolved from the session credential by
/// the session provider. Anonymous requests carry no identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub id: Uuid,
}

/// ResolvedSession
///
/// Output of a session-provider resolution pass. The provider may silently
/// re-issue the session credential while resolving; the re-issued token is
/// surfaced here so the gate can hand it back to the caller on `Allow`.
#[derive(Debug, Clone, Default)]
pub struct ResolvedSession {
    pub identity: Option<Identity>,
    pub refreshed: Option<String>,
}

/// Profile
///
/// The persisted identity → role record, one row per identity. The role is
/// stored as the raw string from the profile store; the gate parses it into
/// a `Role` and treats anything unrecognized as unknown.
#[derive(Debug, Clone)]
pub struct Profile {
    pub id: Uuid,
    pub role: String,
}

/// Role
///
/// The two roles the portal recognizes. Determines which protected route
/// classes an authenticated user may enter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn parse(raw: &str) -> Option<Role> {
        match raw {
            "admin" => Some(Role::Admin),
            "user" => Some(Role::User),
            _ => None,
        }
    }
}

/// RoleResolution
///
/// Explicit outcome of looking up a role, instead of collapsing "missing
/// profile", "store error" and "unparseable role" into a falsy default.
/// `Unknown` is non-admin for admin-protected routes but does not block
/// user-protected routes, which gate on identity presence alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleResolution {
    Known(Role),
    Unknown,
}

// --- Collaborator Capabilities ---

/// ProviderError
///
/// Failure kinds surfaced by the external session and profile collaborators.
/// Neither is raised to the end user: the gate degrades to the least
/// privileged decision consistent with what it still knows.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("session provider unavailable: {0}")]
    SessionUnavailable(String),
    #[error("profile store unavailable: {0}")]
    ProfileUnavailable(String),
}

/// SessionProvider
///
/// Capability for resolving the current identity from an opaque session
/// credential. Implemented by the JWT-backed provider in production and by
/// mocks in tests.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Resolves the identity bound to `credential`, if any. A stale or
    /// malformed credential resolves to an anonymous session, not an error;
    /// `Err` means the provider itself could not be consulted.
    async fn resolve_identity(
        &self,
        credential: Option<&str>,
    ) -> Result<ResolvedSession, ProviderError>;
}

/// ProfileStore
///
/// Capability for fetching the persisted profile of a resolved identity.
/// `Ok(None)` means the identity has no profile row; `Err` means the store
/// could not be reached. Both degrade to an unknown role.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn fetch_profile(&self, id: Uuid) -> Result<Option<Profile>, ProviderError>;
}

/// Shared trait-object handles for the application state.
pub type SessionState = Arc<dyn SessionProvider>;
pub type ProfileState = Arc<dyn ProfileStore>;

// --- The Gate ---

/// GateDecision
///
/// The gate's entire observable output: pass the request through (optionally
/// carrying a re-issued session credential for the caller to persist), or
/// tell the caller to navigate elsewhere. The gate never mutates the profile
/// store and never surfaces a fault to the end user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow { refreshed_session: Option<String> },
    Redirect(String),
}

/// Verdict of a single routing rule for an authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Verdict {
    Allow,
    Redirect(String),
}

/// Inputs shared by every routing rule.
struct RuleContext<'a> {
    path: &'a str,
    class: RouteClass,
    role: RoleResolution,
}

/// AccessGate
///
/// The decision component every inbound request passes through before a
/// handler runs. Given a request path and the session credential, it resolves
/// identity, then role, then applies the routing policy and returns a
/// `GateDecision`. Stateless across requests: the only process-wide state is
/// the injected immutable policy.
///
/// Anonymous handling is fixed (protected classes redirect to login, public
/// passes through). Authenticated requests run an ordered rule list,
/// evaluated top-to-bottom with first-match-wins semantics; a request no
/// rule claims is allowed.
#[derive(Clone)]
pub struct AccessGate {
    policy: RoutePolicy,
}

impl AccessGate {
    pub fn new(policy: RoutePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RoutePolicy {
        &self.policy
    }

    /// decide
    ///
    /// Runs the full decision chain for one request. The two awaited calls
    /// are the only suspension points and must run in this order: profile
    /// lookup needs a resolved identity. No retries; a transient collaborator
    /// failure degrades the decision instead.
    ///
    /// Failure semantics:
    /// - Session provider unreachable: the request is treated as anonymous,
    ///   so protected classes redirect to login rather than letting an
    ///   unverified credential through (fail-closed).
    /// - Profile store unreachable or profile missing: role resolves to
    ///   `Unknown`, which denies admin escalation but still passes
    ///   user-protected routes.
    pub async fn decide(
        &self,
        path: &str,
        credential: Option<&str>,
        sessions: &dyn SessionProvider,
        profiles: &dyn ProfileStore,
    ) -> GateDecision {
        let session = match sessions.resolve_identity(credential).await {
            Ok(session) => session,
            Err(err) => {
                tracing::warn!("session resolution failed, treating as anonymous: {err}");
                ResolvedSession::default()
            }
        };

        let class = self.policy.classify(path);

        let identity = match session.identity {
            Some(identity) => identity,
            None => {
                return if class == RouteClass::Public {
                    GateDecision::Allow {
                        refreshed_session: None,
                    }
                } else {
                    GateDecision::Redirect(self.policy.login_target.clone())
                };
            }
        };

        let role = match profiles.fetch_profile(identity.id).await {
            Ok(Some(profile)) => match Role::parse(&profile.role) {
                Some(role) => RoleResolution::Known(role),
                None => RoleResolution::Unknown,
            },
            Ok(None) => RoleResolution::Unknown,
            Err(err) => {
                tracing::warn!(user_id = %identity.id, "profile lookup failed, role unknown: {err}");
                RoleResolution::Unknown
            }
        };

        let ctx = RuleContext { path, class, role };
        match self.route_authenticated(&ctx) {
            Verdict::Redirect(target) => GateDecision::Redirect(target),
            Verdict::Allow => GateDecision::Allow {
                refreshed_session: session.refreshed,
            },
        }
    }

    /// The ordered rule list for authenticated requests. Evaluated
    /// top-to-bottom; the first rule returning a verdict wins, and a request
    /// no rule claims is allowed. Reordering these entries changes the
    /// protocol.
    fn route_authenticated(&self, ctx: &RuleContext) -> Verdict {
        const RULES: [fn(&AccessGate, &RuleContext<'_>) -> Option<Verdict>; 3] = [
            AccessGate::deny_admin_escalation,
            AccessGate::allow_user_area,
            AccessGate::bounce_entry_paths,
        ];

        for rule in RULES {
            if let Some(verdict) = rule(self, ctx) {
                return verdict;
            }
        }
        Verdict::Allow
    }

    /// Admin-protected routes require a confirmed admin role. An unknown
    /// role is not admin: no escalation on a missing or unreadable profile.
    fn deny_admin_escalation(&self, ctx: &RuleContext) -> Option<Verdict> {
        if ctx.class == RouteClass::AdminProtected
            && ctx.role != RoleResolution::Known(Role::Admin)
        {
            return Some(Verdict::Redirect(self.policy.user_home.clone()));
        }
        None
    }

    /// User-protected routes need identity presence only; both roles (and an
    /// unknown role) may view. This must run before the entry-path rule so
    /// `/user` itself resolves here.
    fn allow_user_area(&self, ctx: &RuleContext) -> Option<Verdict> {
        if ctx.class == RouteClass::UserProtected {
            return Some(Verdict::Allow);
        }
        None
    }

    /// An authenticated visitor landing exactly on an entry path is forwarded
    /// to their home. Runs last among the redirect rules: an admin already on
    /// `/admin` never reaches this rule, because `/admin` is not an entry
    /// path and the admin rule above did not claim the request.
    fn bounce_entry_paths(&self, ctx: &RuleContext) -> Option<Verdict> {
        if self.policy.is_entry(ctx.path) {
            let home = match ctx.role {
                RoleResolution::Known(Role::Admin) => self.policy.admin_home.clone(),
                _ => self.policy.user_home.clone(),
            };
            return Some(Verdict::Redirect(home));
        }
        None
    }
}
