/// Content item and its lifecycle state machine
///
/// A content item is one unit of assigned creative work owned by the
/// customer/creator pair named on it, with an admin holding cross-cutting
/// access. The status field moves through the lifecycle below.
///
/// # State Machine
///
/// ```text
/// assigned → in_progress → under_review → approved → published
///                       ↘              ↘ revision_requested → under_review
///                                      ↘ rejected
/// ```
///
/// The engine deliberately does not enforce a closed transition table:
/// any caller that passes the `can_edit`/`can_approve` gates may set any
/// target status (see [`Content::update_status`]). The one structural rule
/// is that submitting a revision always forces `under_review`, whatever the
/// prior status was.
///
/// # Example
///
/// ```
/// use contentflow_shared::models::content::{Content, ContentStatus, CreateContent, Platform, ContentType};
/// use uuid::Uuid;
///
/// let mut content = Content::new(CreateContent {
///     title: "Spring launch".to_string(),
///     description: "Teaser post".to_string(),
///     customer_id: Uuid::new_v4(),
///     creator_id: Uuid::new_v4(),
///     assigned_by: Uuid::new_v4(),
///     platform: Platform::Instagram,
///     content_type: ContentType::Image,
///     priority: None,
///     due_date: None,
/// });
///
/// assert_eq!(content.status, ContentStatus::Assigned);
///
/// content.add_revision(content.creator_id, "first draft".to_string(), vec![]);
/// assert_eq!(content.status, ContentStatus::UnderReview);
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::user::User;

/// Target social platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Instagram,
    Facebook,
    Linkedin,
    Youtube,
}

/// Kind of creative deliverable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Image,
    Video,
    Carousel,
    Story,
}

/// Work priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// Lifecycle status of a content item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    /// Newly assigned to a creator (initial state)
    Assigned,

    /// Creator is working on it
    InProgress,

    /// Submitted, waiting for the customer's verdict
    UnderReview,

    /// Customer asked for changes
    RevisionRequested,

    /// Customer approved the work
    Approved,

    /// Went live on the target platform
    Published,

    /// Customer rejected the work
    Rejected,
}

impl ContentStatus {
    /// Status as its wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentStatus::Assigned => "assigned",
            ContentStatus::InProgress => "in_progress",
            ContentStatus::UnderReview => "under_review",
            ContentStatus::RevisionRequested => "revision_requested",
            ContentStatus::Approved => "approved",
            ContentStatus::Published => "published",
            ContentStatus::Rejected => "rejected",
        }
    }

    /// States a creator may still edit from
    pub fn is_editable(&self) -> bool {
        matches!(
            self,
            ContentStatus::Assigned | ContentStatus::InProgress | ContentStatus::RevisionRequested
        )
    }

    /// Conventionally terminal states
    ///
    /// The engine does not block transitions out of these; callers that want
    /// a closed workflow can check this before calling `update_status`.
    pub fn is_conventionally_terminal(&self) -> bool {
        matches!(self, ContentStatus::Published | ContentStatus::Rejected)
    }

    /// Whether setting this status is a customer verdict on a review
    ///
    /// Approving, rejecting, and requesting changes are all verdicts: each
    /// is the reviewing customer's answer to submitted work, gated by
    /// `can_approve` rather than `can_edit`.
    pub fn is_verdict(&self) -> bool {
        matches!(
            self,
            ContentStatus::Approved | ContentStatus::Rejected | ContentStatus::RevisionRequested
        )
    }
}

/// Comment kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentKind {
    #[default]
    General,
    Approval,
    RevisionRequest,
    /// Audit entry appended automatically by `update_status`
    StatusChange,
}

/// One entry in the append-only comment log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: CommentKind,
    pub timestamp: DateTime<Utc>,
}

/// One entry in the append-only revision log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Revision {
    pub id: Uuid,
    pub creator_id: Uuid,
    /// What changed, as free text from the creator
    pub changes: String,
    /// Uploaded asset references (opaque URLs)
    #[serde(default)]
    pub files: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// Input for assigning a new content item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateContent {
    pub title: String,
    pub description: String,
    pub customer_id: Uuid,
    pub creator_id: Uuid,
    /// Admin who made the assignment; always overwritten with the caller's
    /// id at the API edge
    #[serde(default)]
    pub assigned_by: Uuid,
    pub platform: Platform,
    pub content_type: ContentType,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDate>,
}

/// Content item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub customer_id: Uuid,
    pub creator_id: Uuid,
    pub assigned_by: Uuid,
    pub platform: Platform,
    pub content_type: ContentType,
    pub status: ContentStatus,
    pub priority: Priority,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_time: Option<String>,

    /// Opaque creative payload (text blocks, asset references, ...)
    #[serde(default)]
    pub content: Map<String, Value>,

    #[serde(default)]
    pub caption: String,

    #[serde(default)]
    pub hashtags: Vec<String>,

    /// Append-only; every status change adds an audit entry here
    #[serde(default)]
    pub comments: Vec<Comment>,

    /// Append-only log of submitted revisions
    #[serde(default)]
    pub revisions: Vec<Revision>,

    /// Opaque post-publication metrics
    #[serde(default)]
    pub analytics: Map<String, Value>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Content {
    /// Creates a freshly assigned content item
    pub fn new(data: CreateContent) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            title: data.title,
            description: data.description,
            customer_id: data.customer_id,
            creator_id: data.creator_id,
            assigned_by: data.assigned_by,
            platform: data.platform,
            content_type: data.content_type,
            status: ContentStatus::Assigned,
            priority: data.priority.unwrap_or_default(),
            due_date: data.due_date,
            publish_date: None,
            publish_time: None,
            content: Map::new(),
            caption: String::new(),
            hashtags: Vec::new(),
            comments: Vec::new(),
            revisions: Vec::new(),
            analytics: Map::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the user may see this item
    ///
    /// Admins always; the owning customer and the assigned creator only.
    pub fn can_view(&self, user: &User) -> bool {
        if user.is_admin() {
            return true;
        }
        if user.is_customer() && user.id == self.customer_id {
            return true;
        }
        if user.is_content_creator() && user.id == self.creator_id {
            return true;
        }
        false
    }

    /// Whether the user may edit this item
    ///
    /// Admins always; the assigned creator only while the status is still
    /// editable (`assigned`, `in_progress`, `revision_requested`).
    pub fn can_edit(&self, user: &User) -> bool {
        if user.is_admin() {
            return true;
        }
        user.is_content_creator() && user.id == self.creator_id && self.status.is_editable()
    }

    /// Whether the user may approve or reject this item
    ///
    /// Admins always; the owning customer only while the item is
    /// `under_review`.
    pub fn can_approve(&self, user: &User) -> bool {
        if user.is_admin() {
            return true;
        }
        user.is_customer()
            && user.id == self.customer_id
            && self.status == ContentStatus::UnderReview
    }

    /// Appends a comment and bumps `updated_at`
    ///
    /// Callers are expected to have passed the `can_view` gate.
    pub fn add_comment(&mut self, user_id: Uuid, message: String, kind: CommentKind) -> &Comment {
        let comment = Comment {
            id: Uuid::new_v4(),
            user_id,
            message,
            kind,
            timestamp: Utc::now(),
        };
        self.comments.push(comment);
        self.updated_at = Utc::now();

        self.comments.last().expect("just pushed")
    }

    /// Appends a revision and forces the status to `under_review`
    ///
    /// The forced status holds regardless of the prior state, including
    /// `rejected`. Callers are expected to have passed the `can_edit` gate.
    pub fn add_revision(
        &mut self,
        creator_id: Uuid,
        changes: String,
        files: Vec<String>,
    ) -> &Revision {
        let revision = Revision {
            id: Uuid::new_v4(),
            creator_id,
            changes,
            files,
            timestamp: Utc::now(),
        };
        self.revisions.push(revision);
        self.status = ContentStatus::UnderReview;
        self.updated_at = Utc::now();

        self.revisions.last().expect("just pushed")
    }

    /// Sets the status and appends a `status_change` audit comment
    ///
    /// Any target status is accepted; restricting reachable transitions is
    /// the caller's job via the `can_edit`/`can_approve` gates.
    pub fn update_status(&mut self, new_status: ContentStatus, updated_by: Uuid, notes: &str) {
        self.status = new_status;
        self.updated_at = Utc::now();

        let message = if notes.is_empty() {
            format!("Status changed to: {}", new_status.as_str())
        } else {
            format!("Status changed to: {}. {}", new_status.as_str(), notes)
        };
        self.add_comment(updated_by, message, CommentKind::StatusChange);
    }
}
