/// Authorization gates and the role-derived scope filter
///
/// These are the pass/fail stages applied after authentication:
/// [`authorize`] gates on role, [`require_permission`] gates on a
/// fine-grained tag, and [`ScopeFilter`] restricts which entities a request
/// may read or mutate. The gates annotate nothing and query nothing; they
/// inspect the already-resolved caller.
///
/// # Example
///
/// ```
/// use contentflow_shared::auth::authorization::{authorize, require_permission, ScopeFilter};
/// use contentflow_shared::models::user::{permissions, CustomerProfile, Role, RoleProfile, User};
///
/// let customer = User::new(
///     "client@example.com",
///     "hash".to_string(),
///     RoleProfile::Customer(CustomerProfile::default()),
/// );
///
/// assert!(authorize(&customer, &[Role::Admin, Role::Customer]).is_ok());
/// assert!(authorize(&customer, &[Role::Admin]).is_err());
/// assert!(require_permission(&customer, permissions::APPROVE_CONTENT).is_ok());
///
/// let scope = ScopeFilter::for_user(&customer);
/// assert!(scope.allows_customer(customer.id));
/// ```

use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::models::user::{Role, User};
use crate::store::Selector;

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Caller's role is not in the allowed set
    #[error("Access denied")]
    RoleNotAllowed,

    /// Caller lacks a required permission tag
    #[error("Missing permission: {0}")]
    MissingPermission(String),

    /// Account has been soft-deactivated
    #[error("Account is inactive")]
    InactiveAccount,
}

/// Gates on the caller's role
///
/// An empty `allowed_roles` slice passes any authenticated caller, matching
/// the "empty set means any role" contract.
pub fn authorize(user: &User, allowed_roles: &[Role]) -> Result<(), AuthzError> {
    if allowed_roles.is_empty() || allowed_roles.contains(&user.role()) {
        Ok(())
    } else {
        Err(AuthzError::RoleNotAllowed)
    }
}

/// Gates on a fine-grained permission tag
///
/// Admins pass every check (see [`User::has_permission`]).
pub fn require_permission(user: &User, tag: &str) -> Result<(), AuthzError> {
    if user.has_permission(tag) {
        Ok(())
    } else {
        Err(AuthzError::MissingPermission(tag.to_string()))
    }
}

/// Fails for soft-deactivated accounts
pub fn require_active(user: &User) -> Result<(), AuthzError> {
    if user.is_active {
        Ok(())
    } else {
        Err(AuthzError::InactiveAccount)
    }
}

/// Role-derived data-scoping predicate
///
/// Attached to the request context during authentication. Admins see
/// everything; customers are pinned to entities whose `customer_id` is
/// their own id; creators to entities whose `creator_id` is theirs.
/// Downstream query construction must apply the filter — the filter itself
/// performs no querying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ScopeFilter {
    /// Full access, no constraint
    All,

    /// Only entities owned by this customer
    Customer(Uuid),

    /// Only entities assigned to this creator
    Creator(Uuid),
}

impl ScopeFilter {
    /// Derives the filter from the caller's role
    pub fn for_user(user: &User) -> Self {
        match user.role() {
            Role::Admin => ScopeFilter::All,
            Role::Customer => ScopeFilter::Customer(user.id),
            Role::ContentCreator => ScopeFilter::Creator(user.id),
        }
    }

    /// Narrows a store selector to the caller's scope
    pub fn apply(&self, selector: Selector) -> Selector {
        match self {
            ScopeFilter::All => selector,
            ScopeFilter::Customer(id) => selector.field("customer_id", json!(id.to_string())),
            ScopeFilter::Creator(id) => selector.field("creator_id", json!(id.to_string())),
        }
    }

    /// Whether an entity owned by `customer_id` is in scope
    ///
    /// Creators hold no customer-owned entities, so a creator scope never
    /// passes here.
    pub fn allows_customer(&self, customer_id: Uuid) -> bool {
        match self {
            ScopeFilter::All => true,
            ScopeFilter::Customer(id) => *id == customer_id,
            ScopeFilter::Creator(_) => false,
        }
    }

    /// Whether an entity assigned to `creator_id` is in scope
    pub fn allows_creator(&self, creator_id: Uuid) -> bool {
        match self {
            ScopeFilter::All => true,
            ScopeFilter::Creator(id) => *id == creator_id,
            ScopeFilter::Customer(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::{
        permissions, AdminProfile, CreatorProfile, CustomerProfile, RoleProfile,
    };

    fn user(profile: RoleProfile) -> User {
        User::new("user@example.com", "hash".to_string(), profile)
    }

    #[test]
    fn test_authorize_empty_set_passes_any_role() {
        let creator = user(RoleProfile::ContentCreator(CreatorProfile::default()));
        assert!(authorize(&creator, &[]).is_ok());
    }

    #[test]
    fn test_authorize_role_gate() {
        let customer = user(RoleProfile::Customer(CustomerProfile::default()));
        assert!(authorize(&customer, &[Role::Customer]).is_ok());
        assert!(matches!(
            authorize(&customer, &[Role::Admin, Role::ContentCreator]),
            Err(AuthzError::RoleNotAllowed)
        ));
    }

    #[test]
    fn test_require_permission() {
        let creator = user(RoleProfile::ContentCreator(CreatorProfile::default()));
        assert!(require_permission(&creator, permissions::UPLOAD_CONTENT).is_ok());
        assert!(matches!(
            require_permission(&creator, permissions::MANAGE_USERS),
            Err(AuthzError::MissingPermission(_))
        ));

        let admin = user(RoleProfile::Admin(AdminProfile::default()));
        assert!(require_permission(&admin, permissions::MANAGE_USERS).is_ok());
    }

    #[test]
    fn test_require_active() {
        let mut customer = user(RoleProfile::Customer(CustomerProfile::default()));
        assert!(require_active(&customer).is_ok());
        customer.is_active = false;
        assert!(matches!(
            require_active(&customer),
            Err(AuthzError::InactiveAccount)
        ));
    }

    #[test]
    fn test_scope_filter_derivation() {
        let admin = user(RoleProfile::Admin(AdminProfile::default()));
        assert_eq!(ScopeFilter::for_user(&admin), ScopeFilter::All);

        let customer = user(RoleProfile::Customer(CustomerProfile::default()));
        assert_eq!(
            ScopeFilter::for_user(&customer),
            ScopeFilter::Customer(customer.id)
        );

        let creator = user(RoleProfile::ContentCreator(CreatorProfile::default()));
        assert_eq!(
            ScopeFilter::for_user(&creator),
            ScopeFilter::Creator(creator.id)
        );
    }

    #[test]
    fn test_scope_filter_ownership_checks() {
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();

        assert!(ScopeFilter::All.allows_customer(owner));
        assert!(ScopeFilter::Customer(owner).allows_customer(owner));
        assert!(!ScopeFilter::Customer(other).allows_customer(owner));
        assert!(!ScopeFilter::Creator(owner).allows_customer(owner));

        assert!(ScopeFilter::Creator(owner).allows_creator(owner));
        assert!(!ScopeFilter::Creator(other).allows_creator(owner));
    }

    #[test]
    fn test_scope_filter_narrows_selector() {
        let id = Uuid::new_v4();
        let selector = ScopeFilter::Customer(id).apply(Selector::new());

        assert!(selector.matches(&json!({"customer_id": id.to_string()})));
        assert!(!selector.matches(&json!({"customer_id": Uuid::new_v4().to_string()})));

        // Admin scope leaves the selector untouched
        let selector = ScopeFilter::All.apply(Selector::new());
        assert!(selector.is_empty());
    }
}
