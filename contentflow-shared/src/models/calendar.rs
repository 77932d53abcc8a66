/// Content calendar aggregate
///
/// A calendar is one customer's ordered schedule of content references.
/// Scheduled items carry no stable identifier: all addressing is by value,
/// with the pair `(date, description)` acting as a quasi-key.
///
/// # Addressing quirks (kept deliberately)
///
/// Two behaviors are preserved from the system this replaces rather than
/// fixed, because callers depend on them:
///
/// - **Trim asymmetry**: the update path compares descriptions with both
///   sides trimmed, while the delete path trims only the query side and
///   compares the stored description verbatim. An item stored as
///   `" Launch post "` is updatable via `"Launch post"` but not deletable
///   through the same arguments.
/// - **Ambiguous duplicates**: two items sharing a `(date, description)`
///   pair are indistinguishable to lookup and mutation; the first match
///   wins.
///
/// The aggregate performs no ownership checks. Callers must apply the
/// role-derived scope filter before reaching it (see
/// [`crate::auth::authorization::ScopeFilter`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Error type for calendar item addressing
#[derive(Debug, thiserror::Error)]
pub enum CalendarError {
    /// No item matched the `(date, description)` pair
    #[error("Content item not found")]
    ItemNotFound,

    /// A patch tried to set a quasi-key field to a non-string value
    #[error("Field `{0}` must be a string")]
    InvalidItemField(String),
}

/// One scheduled entry
///
/// `date` and `description` form the quasi-key; any further fields the
/// caller supplied are kept verbatim in `extra` and round-trip through the
/// stored document untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarItem {
    /// Schedule date, compared by exact string equality
    pub date: String,

    /// Free-text description, compared with the trim rules documented above
    pub description: String,

    /// Free-form fields carried along with the item
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CalendarItem {
    pub fn new(date: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            description: description.into(),
            extra: Map::new(),
        }
    }
}

/// Input for creating a calendar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCalendar {
    pub customer_id: Uuid,
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub content_items: Vec<CalendarItem>,
}

/// Per-customer content calendar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentCalendar {
    pub id: Uuid,
    pub name: String,
    pub customer_id: Uuid,
    #[serde(default)]
    pub description: String,
    /// Ordered sequence of scheduled items
    #[serde(default)]
    pub content_items: Vec<CalendarItem>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContentCalendar {
    /// Creates a calendar for one customer
    pub fn new(data: CreateCalendar) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            name: data.name.unwrap_or_else(|| "Untitled Calendar".to_string()),
            customer_id: data.customer_id,
            description: data.description.unwrap_or_default(),
            content_items: data.content_items,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Appends an item unless an equal one is already scheduled
    ///
    /// Idempotent by value equality of the whole item. Bumps `updated_at`
    /// either way.
    pub fn add_content_item(&mut self, item: CalendarItem) {
        if !self.content_items.contains(&item) {
            self.content_items.push(item);
        }
        self.updated_at = Utc::now();
    }

    /// Removes every item equal to the reference
    ///
    /// Untouched items keep their order. Bumps `updated_at`.
    pub fn remove_content_item(&mut self, item: &CalendarItem) {
        self.content_items.retain(|existing| existing != item);
        self.updated_at = Utc::now();
    }

    /// Locates one item by `(date, description)`
    ///
    /// Exact string equality on `date`; descriptions compared with both
    /// sides trimmed. First match wins when duplicates exist.
    pub fn find_item(&self, date: &str, description: &str) -> Option<&CalendarItem> {
        let wanted = description.trim();
        self.content_items
            .iter()
            .find(|item| item.date == date && item.description.trim() == wanted)
    }

    /// Merges patch fields onto the item located by `(date, description)`
    ///
    /// Uses [`Self::find_item`] addressing (both sides trimmed). Patch keys
    /// named `date`/`description` overwrite the quasi-key fields and must
    /// hold strings; every other key lands in the item's free-form bag.
    /// A non-string quasi-key value fails the whole patch before anything
    /// is applied (routing it to the free-form bag would shadow the typed
    /// field in the stored document and corrupt the calendar). Other items
    /// are left untouched.
    pub fn update_item(
        &mut self,
        date: &str,
        description: &str,
        patch: Map<String, Value>,
    ) -> Result<&CalendarItem, CalendarError> {
        for key in ["date", "description"] {
            if matches!(patch.get(key), Some(value) if !value.is_string()) {
                return Err(CalendarError::InvalidItemField(key.to_string()));
            }
        }

        let wanted = description.trim();
        let index = self
            .content_items
            .iter()
            .position(|item| item.date == date && item.description.trim() == wanted)
            .ok_or(CalendarError::ItemNotFound)?;

        let item = &mut self.content_items[index];
        for (key, value) in patch {
            match (key.as_str(), &value) {
                ("date", Value::String(s)) => item.date = s.clone(),
                ("description", Value::String(s)) => item.description = s.clone(),
                _ => {
                    item.extra.insert(key, value);
                }
            }
        }
        self.updated_at = Utc::now();

        Ok(&self.content_items[index])
    }

    /// Deletes the first item structurally matching `(date, description)`
    ///
    /// The query description is trimmed; the stored one is compared
    /// verbatim. This is narrower than the update path on purpose (see the
    /// module docs).
    pub fn delete_item(&mut self, date: &str, description: &str) -> Result<(), CalendarError> {
        let wanted = description.trim();
        let index = self
            .content_items
            .iter()
            .position(|item| item.date == date && item.description == wanted)
            .ok_or(CalendarError::ItemNotFound)?;

        self.content_items.remove(index);
        self.updated_at = Utc::now();
        Ok(())
    }
}
