/// Document store collaborator contract
///
/// The workflow core never talks to a concrete database. It goes through
/// [`DocumentStore`], a small document-oriented contract: whole-document
/// get/insert/find/list/delete over named collections, with inserts acting
/// as upsert-by-full-replacement.
///
/// # Revisions
///
/// Every stored document carries a revision token. Replacing an existing
/// document requires presenting the last-read revision; a stale one fails
/// with [`StoreError::RevisionConflict`]. This makes every read-modify-write
/// cycle an explicit compare-and-swap, so two concurrent writers against the
/// same document cannot silently last-write-win.
///
/// # Uniqueness
///
/// Email uniqueness is enforced inside the store via
/// [`DocumentStore::insert_unique`], which atomically rejects a second
/// document holding the same value in the declared unique field. Callers do
/// not need a separate check-then-insert pass.

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Logical collections used by the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Content,
    Calendars,
    Submissions,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Content => "content",
            Collection::Calendars => "calendars",
            Collection::Submissions => "submissions",
        }
    }

    /// Every collection the store must provision
    pub const ALL: &'static [Collection] = &[
        Collection::Users,
        Collection::Content,
        Collection::Calendars,
        Collection::Submissions,
    ];
}

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Document does not exist
    #[error("Document not found")]
    NotFound,

    /// The presented revision is stale
    #[error("Stale revision: document is at revision {current}")]
    RevisionConflict { current: u64 },

    /// A unique field already holds this value in another document
    #[error("Duplicate value for unique field `{field}`")]
    DuplicateKey { field: String },

    /// Stored document could not be decoded into the requested type
    #[error("Malformed document: {0}")]
    Malformed(String),
}

/// A stored document plus its revision token
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub revision: u64,
    pub body: Value,
}

impl Document {
    /// Decodes the document body into a typed entity
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        serde_json::from_value(self.body.clone())
            .map_err(|e| StoreError::Malformed(e.to_string()))
    }
}

/// Identity and revision returned from a write
#[derive(Debug, Clone)]
pub struct DocumentMeta {
    pub id: String,
    pub revision: u64,
}

/// Equality predicate over top-level document fields
///
/// An empty selector matches everything. Multiple constraints are ANDed.
///
/// # Example
///
/// ```
/// use contentflow_shared::store::Selector;
/// use serde_json::json;
///
/// let selector = Selector::new()
///     .field("role", json!("content_creator"))
///     .field("is_active", json!(true));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Selector {
    constraints: Vec<(String, Value)>,
}

impl Selector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an equality constraint on a top-level field
    pub fn field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.constraints.push((name.into(), value));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Whether a document body satisfies every constraint
    pub fn matches(&self, body: &Value) -> bool {
        self.constraints
            .iter()
            .all(|(name, value)| body.get(name) == Some(value))
    }
}

/// Options for [`DocumentStore::find`]
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    /// Maximum number of documents to return
    pub limit: Option<usize>,

    /// Sort ascending by this top-level field before applying the limit
    pub sort_by: Option<String>,

    /// Project the body down to these top-level fields
    pub fields: Option<Vec<String>>,
}

impl FindOptions {
    pub fn limit(n: usize) -> Self {
        Self {
            limit: Some(n),
            ..Default::default()
        }
    }
}

/// Document store contract
///
/// Implementations must keep `find`/`list` results in insertion order unless
/// a sort is requested, and must make `insert_unique` atomic with respect to
/// concurrent inserts on the same unique field.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetches one document by id
    async fn get(&self, collection: Collection, id: &str) -> Result<Document, StoreError>;

    /// Upserts a full document body
    ///
    /// Creating a new document requires `expected_revision = None`.
    /// Replacing an existing one requires the last-read revision; anything
    /// else fails with [`StoreError::RevisionConflict`].
    async fn insert(
        &self,
        collection: Collection,
        id: &str,
        body: Value,
        expected_revision: Option<u64>,
    ) -> Result<DocumentMeta, StoreError>;

    /// Inserts a new document, rejecting duplicates on `unique_field`
    ///
    /// Fails with [`StoreError::DuplicateKey`] if any existing document in
    /// the collection holds the same value in that field.
    async fn insert_unique(
        &self,
        collection: Collection,
        id: &str,
        body: Value,
        unique_field: &str,
    ) -> Result<DocumentMeta, StoreError>;

    /// Finds documents matching an equality selector
    async fn find(
        &self,
        collection: Collection,
        selector: &Selector,
        options: FindOptions,
    ) -> Result<Vec<Document>, StoreError>;

    /// Lists all documents in a collection with full bodies
    async fn list(&self, collection: Collection) -> Result<Vec<Document>, StoreError>;

    /// Deletes one document by id
    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_selector_equality_and_and() {
        let selector = Selector::new()
            .field("role", json!("customer"))
            .field("is_active", json!(true));

        assert!(selector.matches(&json!({"role": "customer", "is_active": true, "x": 1})));
        assert!(!selector.matches(&json!({"role": "customer", "is_active": false})));
        assert!(!selector.matches(&json!({"is_active": true})));
    }

    #[test]
    fn test_empty_selector_matches_everything() {
        let selector = Selector::new();
        assert!(selector.is_empty());
        assert!(selector.matches(&json!({})));
        assert!(selector.matches(&json!({"anything": 42})));
    }
}
