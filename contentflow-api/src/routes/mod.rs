/// API route handlers
///
/// # Organization
///
/// - `health`: Liveness check
/// - `auth`: Signup, login, token refresh
/// - `users`: User directory (admins, creators, customers)
/// - `content`: Content assignment and lifecycle operations
/// - `submissions`: Creator upload metadata records
/// - `calendars`: Calendar CRUD and value-addressed item operations

pub mod auth;
pub mod calendars;
pub mod content;
pub mod health;
pub mod submissions;
pub mod users;
