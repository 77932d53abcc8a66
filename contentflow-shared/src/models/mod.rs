/// Domain models for ContentFlow
///
/// This module contains the workflow core entities and the pure business
/// rules attached to them. Persistence is handled separately through the
/// [`crate::store`] collaborator; everything in here is a synchronous data
/// transformation over one in-memory entity.
///
/// # Models
///
/// - `user`: User accounts, roles, and the permission model
/// - `content`: Content items and their lifecycle state machine
/// - `calendar`: Per-customer content calendars with value-addressed items
/// - `submission`: Creator upload metadata records

pub mod calendar;
pub mod content;
pub mod submission;
pub mod user;
