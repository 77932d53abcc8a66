/// Request-scoped authentication context
///
/// The API server's authentication layer resolves the bearer credential to
/// an active [`User`], derives the role-scoped data filter, and stores both
/// in an [`AuthContext`] on the request. Handlers read the context; nothing
/// downstream touches the credential again.
///
/// # Stages
///
/// 1. `authenticate` — bearer token → active user, or `Unauthenticated`
/// 2. `authorize(roles)` — role gate ([`super::authorization::authorize`])
/// 3. `require_permission(tag)` — fine-grained tag gate
/// 4. `scope_filter` — derived here as part of building the context
///
/// The first stage lives in the API crate because it needs the store and
/// the JWT secret; this module owns the context type and the error
/// taxonomy the stage reports.

use serde::{Deserialize, Serialize};

use super::authorization::ScopeFilter;
use crate::models::user::User;

/// Error type for the authentication stage
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No credential on the request
    #[error("Authentication required")]
    MissingCredentials,

    /// Credential present but not in bearer form
    #[error("Expected Bearer token")]
    InvalidFormat,

    /// Token failed validation
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Token resolved to no user, or the user is deactivated
    #[error("Invalid or inactive user")]
    InvalidOrInactiveUser,

    /// Store failure while resolving the user
    #[error("Failed to resolve user: {0}")]
    StoreError(String),
}

/// Authentication context attached to a request after `authenticate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// The resolved, active caller
    pub user: User,

    /// Role-derived data-scoping predicate
    pub scope: ScopeFilter,
}

impl AuthContext {
    /// Builds a context for a resolved user, deriving the scope filter
    pub fn for_user(user: User) -> Self {
        let scope = ScopeFilter::for_user(&user);
        Self { user, scope }
    }
}

/// Extracts the token from an `Authorization: Bearer ...` header value
///
/// # Errors
///
/// `MissingCredentials` when the header is absent, `InvalidFormat` when it
/// is not a bearer credential.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingCredentials)?;
    header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidFormat)
}
