/// Router Module Index
///
/// Organizes the application's routing logic into security-segregated modules
/// that mirror the route gate's access classes, enforcing a Defense-in-Depth
/// strategy. The gate classifies and redirects at the edge; these modules
/// apply the authentication layer and handler-level role checks behind it, so
/// access control is never implied by placement alone.

/// Routes accessible to all users (anonymous or logged-in): health, signup, login.
pub mod public;

/// Routes nested under '/user': any authenticated user, either role.
/// Protected by the `AuthUser` extractor middleware.
pub mod user;

/// Routes nested under '/admin': restricted exclusively to the 'admin' role.
/// Implements mandatory authorization checks.
pub mod admin;
