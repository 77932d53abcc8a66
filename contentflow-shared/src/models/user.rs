/// User model and the role/permission predicates
///
/// A user is one concrete record with a role-tagged profile payload rather
/// than a class hierarchy: the `role` tag selects which attribute bag lives
/// in `profile`, and all capability logic is free of inheritance.
///
/// # Permission Model
///
/// Every role has a deterministic default permission set, assigned at signup
/// by [`Role::default_permissions`]. Permission checks go through
/// [`User::has_permission`], which short-circuits to `true` for admins.
///
/// # Example
///
/// ```
/// use contentflow_shared::models::user::{CustomerProfile, Role, RoleProfile, User};
///
/// let user = User::new(
///     " A@Test.com ",
///     "$argon2id$...".to_string(),
///     RoleProfile::Customer(CustomerProfile::default()),
/// );
///
/// assert_eq!(user.email, "a@test.com"); // normalized at creation
/// assert_eq!(user.role(), Role::Customer);
/// assert!(user.has_permission(contentflow_shared::models::user::permissions::APPROVE_CONTENT));
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Permission tags known to the system
///
/// Tags are plain strings so that the stored document format stays readable
/// and new tags can be granted to individual users without a schema change.
pub mod permissions {
    // Customer defaults
    pub const VIEW_OWN_CONTENT: &str = "view_own_content";
    pub const APPROVE_CONTENT: &str = "approve_content";
    pub const REJECT_CONTENT: &str = "reject_content";
    pub const COMMENT_ON_CONTENT: &str = "comment_on_content";
    pub const VIEW_OWN_CALENDAR: &str = "view_own_calendar";
    pub const MANAGE_SOCIAL_ACCOUNTS: &str = "manage_social_accounts";

    // Content creator defaults
    pub const VIEW_ASSIGNED_CONTENT: &str = "view_assigned_content";
    pub const UPLOAD_CONTENT: &str = "upload_content";
    pub const EDIT_OWN_CONTENT: &str = "edit_own_content";
    pub const VIEW_CUSTOMER_FEEDBACK: &str = "view_customer_feedback";
    pub const RESPOND_TO_FEEDBACK: &str = "respond_to_feedback";

    // Admin defaults
    pub const VIEW_ALL_CONTENT: &str = "view_all_content";
    pub const MANAGE_CUSTOMERS: &str = "manage_customers";
    pub const MANAGE_CONTENT_CREATORS: &str = "manage_content_creators";
    pub const ASSIGN_CONTENT: &str = "assign_content";
    pub const VIEW_ANALYTICS: &str = "view_analytics";
    pub const MANAGE_SYSTEM_SETTINGS: &str = "manage_system_settings";
    pub const MANAGE_USERS: &str = "manage_users";

    /// Every tag defined in the system, in declaration order
    pub const ALL: &[&str] = &[
        VIEW_OWN_CONTENT,
        APPROVE_CONTENT,
        REJECT_CONTENT,
        COMMENT_ON_CONTENT,
        VIEW_OWN_CALENDAR,
        MANAGE_SOCIAL_ACCOUNTS,
        VIEW_ASSIGNED_CONTENT,
        UPLOAD_CONTENT,
        EDIT_OWN_CONTENT,
        VIEW_CUSTOMER_FEEDBACK,
        RESPOND_TO_FEEDBACK,
        VIEW_ALL_CONTENT,
        MANAGE_CUSTOMERS,
        MANAGE_CONTENT_CREATORS,
        ASSIGN_CONTENT,
        VIEW_ANALYTICS,
        MANAGE_SYSTEM_SETTINGS,
        MANAGE_USERS,
    ];
}

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Agency staff with full cross-cutting access
    Admin,

    /// Client who approves or rejects produced content
    Customer,

    /// Creator who produces and revises assigned content
    ContentCreator,
}

impl Role {
    /// Role as its wire string (`admin`, `customer`, `content_creator`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Customer => "customer",
            Role::ContentCreator => "content_creator",
        }
    }

    /// Parses a wire string into a role
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "customer" => Some(Role::Customer),
            "content_creator" => Some(Role::ContentCreator),
            _ => None,
        }
    }

    /// Default permission set for the role
    ///
    /// Pure function: the same role always yields the same set. The admin
    /// set is the union of every tag defined in the system, so an admin
    /// passes any permission check even before the role short-circuit in
    /// [`User::has_permission`].
    pub fn default_permissions(&self) -> &'static [&'static str] {
        use permissions::*;

        match self {
            Role::Admin => permissions::ALL,
            Role::Customer => &[
                VIEW_OWN_CONTENT,
                APPROVE_CONTENT,
                REJECT_CONTENT,
                COMMENT_ON_CONTENT,
                VIEW_OWN_CALENDAR,
                MANAGE_SOCIAL_ACCOUNTS,
            ],
            Role::ContentCreator => &[
                VIEW_ASSIGNED_CONTENT,
                UPLOAD_CONTENT,
                EDIT_OWN_CONTENT,
                VIEW_CUSTOMER_FEEDBACK,
                RESPOND_TO_FEEDBACK,
            ],
        }
    }
}

/// Role-specific attribute bag
///
/// Serialized internally tagged on `role` and flattened into [`User`], so a
/// stored user document carries `"role": "customer"` plus the customer
/// fields at the top level. The tag is the single source of truth for the
/// user's role.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum RoleProfile {
    Admin(AdminProfile),
    Customer(CustomerProfile),
    ContentCreator(CreatorProfile),
}

/// Admin attributes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

/// Customer attributes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gst_number: Option<String>,

    /// Subscription plan (defaults to `basic`)
    #[serde(default = "default_plan")]
    pub subscription_plan: String,

    /// Subscription status (defaults to `active`)
    #[serde(default = "default_subscription_status")]
    pub subscription_status: String,

    /// Opaque per-platform account handles
    #[serde(default)]
    pub social_accounts: Map<String, Value>,
}

impl Default for CustomerProfile {
    fn default() -> Self {
        Self {
            company_name: None,
            contact_person: None,
            phone: None,
            address: None,
            gst_number: None,
            subscription_plan: default_plan(),
            subscription_status: default_subscription_status(),
            social_accounts: Map::new(),
        }
    }
}

fn default_plan() -> String {
    "basic".to_string()
}

fn default_subscription_status() -> String {
    "active".to_string()
}

/// Content creator attributes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatorProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,

    #[serde(default)]
    pub portfolio: Vec<String>,

    /// Customers this creator produces for
    #[serde(default)]
    pub assigned_customers: Vec<Uuid>,

    #[serde(default)]
    pub skills: Vec<String>,
}

impl RoleProfile {
    /// Role tag of this profile
    pub fn role(&self) -> Role {
        match self {
            RoleProfile::Admin(_) => Role::Admin,
            RoleProfile::Customer(_) => Role::Customer,
            RoleProfile::ContentCreator(_) => Role::ContentCreator,
        }
    }
}

/// User account
///
/// The credential hash is stored on the record (the store persists full
/// documents) but never leaves the service: every outward-facing projection
/// goes through [`User::to_safe_view`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Email address, unique across all users
    ///
    /// Always stored trimmed and lower-cased; see [`normalize_email`].
    pub email: String,

    /// Argon2id credential hash, never plaintext
    pub password_hash: String,

    /// Granted permission tags
    pub permissions: Vec<String>,

    /// Soft-deactivation flag; inactive users cannot authenticate
    pub is_active: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    /// Role tag plus role-specific attributes, flattened into the document
    #[serde(flatten)]
    pub profile: RoleProfile,
}

/// Outward-facing projection of a [`User`]
///
/// Identical to the user record minus the credential hash. Constructing one
/// is the only supported way to serialize a user for a response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserView {
    pub id: Uuid,
    pub email: String,
    pub permissions: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub profile: RoleProfile,
}

/// Normalizes an email address for storage and uniqueness checks
///
/// Trims surrounding whitespace and lower-cases the whole address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl User {
    /// Creates a new active user with role-default permissions
    ///
    /// The email is normalized; uniqueness is the store's concern (see
    /// [`crate::store::DocumentStore::insert_unique`]).
    pub fn new(email: &str, password_hash: String, profile: RoleProfile) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            email: normalize_email(email),
            password_hash,
            permissions: profile
                .role()
                .default_permissions()
                .iter()
                .map(|p| p.to_string())
                .collect(),
            is_active: true,
            created_at: now,
            updated_at: now,
            profile,
        }
    }

    /// Role of this user
    pub fn role(&self) -> Role {
        self.profile.role()
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Role::Admin
    }

    pub fn is_customer(&self) -> bool {
        self.role() == Role::Customer
    }

    pub fn is_content_creator(&self) -> bool {
        self.role() == Role::ContentCreator
    }

    /// Checks whether the user holds a permission tag
    ///
    /// Admins pass every check regardless of their granted set.
    pub fn has_permission(&self, tag: &str) -> bool {
        self.is_admin() || self.permissions.iter().any(|p| p == tag)
    }

    /// Projects the user into its safe outward-facing view
    ///
    /// The credential hash does not cross this boundary.
    pub fn to_safe_view(&self) -> UserView {
        UserView {
            id: self.id,
            email: self.email.clone(),
            permissions: self.permissions.clone(),
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
            profile: self.profile.clone(),
        }
    }
}
