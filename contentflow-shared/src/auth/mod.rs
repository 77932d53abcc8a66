/// Authentication and authorization for ContentFlow
///
/// # Modules
///
/// - `password`: Argon2id hashing and the signup strength rule
/// - `jwt`: Access/refresh token creation and validation
/// - `middleware`: Request-scoped authentication context and errors
/// - `authorization`: Role gates, permission checks, and the scope filter

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
