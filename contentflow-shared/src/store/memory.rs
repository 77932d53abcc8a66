/// In-memory document store
///
/// [`MemoryStore`] implements the [`DocumentStore`] contract over hash maps
/// behind a single `RwLock`. It is both the test double for the workflow
/// core and the default runtime store when no external database is wired
/// up.
///
/// Insertion order is preserved per collection (a monotonically increasing
/// sequence number is kept per document), so `find`/`list` results come
/// back in the order documents were first written.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{Collection, Document, DocumentMeta, DocumentStore, FindOptions, Selector, StoreError};

#[derive(Debug, Clone)]
struct StoredDoc {
    seq: u64,
    revision: u64,
    body: Value,
}

#[derive(Debug, Default)]
struct Shelf {
    docs: HashMap<String, StoredDoc>,
    next_seq: u64,
}

/// In-memory [`DocumentStore`] implementation
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Shelf>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently in a collection
    pub async fn count(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .await
            .get(&collection)
            .map(|shelf| shelf.docs.len())
            .unwrap_or(0)
    }
}

fn project(body: &Value, fields: &[String]) -> Value {
    match body {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(k, _)| fields.iter().any(|f| f == *k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        ),
        other => other.clone(),
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: Collection, id: &str) -> Result<Document, StoreError> {
        let collections = self.collections.read().await;
        let doc = collections
            .get(&collection)
            .and_then(|shelf| shelf.docs.get(id))
            .ok_or(StoreError::NotFound)?;

        Ok(Document {
            id: id.to_string(),
            revision: doc.revision,
            body: doc.body.clone(),
        })
    }

    async fn insert(
        &self,
        collection: Collection,
        id: &str,
        body: Value,
        expected_revision: Option<u64>,
    ) -> Result<DocumentMeta, StoreError> {
        let mut collections = self.collections.write().await;
        let shelf = collections.entry(collection).or_default();

        match (shelf.docs.get(id), expected_revision) {
            // New document
            (None, None) => {
                let seq = shelf.next_seq;
                shelf.next_seq += 1;
                shelf.docs.insert(
                    id.to_string(),
                    StoredDoc {
                        seq,
                        revision: 1,
                        body,
                    },
                );
                Ok(DocumentMeta {
                    id: id.to_string(),
                    revision: 1,
                })
            }
            // Presenting a revision for a document that does not exist
            (None, Some(_)) => Err(StoreError::NotFound),
            // Replacement with a matching revision
            (Some(existing), Some(expected)) if existing.revision == expected => {
                let seq = existing.seq;
                let revision = existing.revision + 1;
                shelf
                    .docs
                    .insert(id.to_string(), StoredDoc { seq, revision, body });
                Ok(DocumentMeta {
                    id: id.to_string(),
                    revision,
                })
            }
            // Stale or missing revision on an existing document
            (Some(existing), _) => Err(StoreError::RevisionConflict {
                current: existing.revision,
            }),
        }
    }

    async fn insert_unique(
        &self,
        collection: Collection,
        id: &str,
        body: Value,
        unique_field: &str,
    ) -> Result<DocumentMeta, StoreError> {
        let mut collections = self.collections.write().await;
        let shelf = collections.entry(collection).or_default();

        if shelf.docs.contains_key(id) {
            return Err(StoreError::RevisionConflict {
                current: shelf.docs[id].revision,
            });
        }

        let value = body.get(unique_field).cloned();
        if let Some(ref value) = value {
            let taken = shelf
                .docs
                .values()
                .any(|doc| doc.body.get(unique_field) == Some(value));
            if taken {
                return Err(StoreError::DuplicateKey {
                    field: unique_field.to_string(),
                });
            }
        }

        let seq = shelf.next_seq;
        shelf.next_seq += 1;
        shelf.docs.insert(
            id.to_string(),
            StoredDoc {
                seq,
                revision: 1,
                body,
            },
        );
        Ok(DocumentMeta {
            id: id.to_string(),
            revision: 1,
        })
    }

    async fn find(
        &self,
        collection: Collection,
        selector: &Selector,
        options: FindOptions,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        let Some(shelf) = collections.get(&collection) else {
            return Ok(Vec::new());
        };

        let mut matched: Vec<(&String, &StoredDoc)> = shelf
            .docs
            .iter()
            .filter(|(_, doc)| selector.matches(&doc.body))
            .collect();

        match &options.sort_by {
            Some(field) => matched.sort_by(|(_, a), (_, b)| {
                let av = a.body.get(field).map(value_sort_key);
                let bv = b.body.get(field).map(value_sort_key);
                av.partial_cmp(&bv).unwrap_or(std::cmp::Ordering::Equal)
            }),
            None => matched.sort_by_key(|(_, doc)| doc.seq),
        }

        if let Some(limit) = options.limit {
            matched.truncate(limit);
        }

        Ok(matched
            .into_iter()
            .map(|(id, doc)| Document {
                id: id.clone(),
                revision: doc.revision,
                body: match &options.fields {
                    Some(fields) => project(&doc.body, fields),
                    None => doc.body.clone(),
                },
            })
            .collect())
    }

    async fn list(&self, collection: Collection) -> Result<Vec<Document>, StoreError> {
        self.find(collection, &Selector::new(), FindOptions::default())
            .await
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let shelf = collections.entry(collection).or_default();

        shelf
            .docs
            .remove(id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

/// Sortable projection of a JSON value
///
/// Strings sort lexicographically, numbers numerically; everything else
/// falls back to its JSON text.
fn value_sort_key(value: &Value) -> (f64, String) {
    match value {
        Value::Number(n) => (n.as_f64().unwrap_or(f64::MAX), String::new()),
        Value::String(s) => (f64::MIN, s.clone()),
        other => (f64::MIN, other.to_string()),
    }
}
