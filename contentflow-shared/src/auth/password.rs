/// Password hashing using Argon2id
///
/// Credentials are stored as Argon2id hashes in PHC string format, never as
/// plaintext. The predecessor system compared plaintext secrets directly;
/// that behavior is intentionally not preserved.
///
/// # Strength rule
///
/// Signup enforces the same rule the predecessor advertised: at least 6
/// characters including an uppercase letter, a lowercase letter, a digit,
/// and a symbol. See [`validate_password_strength`].
///
/// # Example
///
/// ```
/// use contentflow_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("Sup3r$ecret")?;
/// assert!(verify_password("Sup3r$ecret", &hash)?);
/// assert!(!verify_password("wrong", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashError(String),

    #[error("Failed to verify password: {0}")]
    VerifyError(String),
}

/// Hashes a password using Argon2id with default parameters
///
/// The salt is generated from the OS RNG. Output is a PHC string that
/// embeds algorithm, parameters, salt, and hash.
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verifies a password against a stored PHC hash
///
/// # Errors
///
/// Returns `PasswordError::VerifyError` if the stored hash is malformed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|e| PasswordError::VerifyError(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Validates the signup strength rule
///
/// At least 6 characters with an uppercase letter, a lowercase letter, a
/// digit, and a symbol.
///
/// # Returns
///
/// `Ok(())` on success, or a human-readable message naming the rule.
pub fn validate_password_strength(password: &str) -> Result<(), String> {
    let long_enough = password.chars().count() >= 6;
    let has_lower = password.chars().any(|c| c.is_lowercase());
    let has_upper = password.chars().any(|c| c.is_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| !c.is_alphanumeric());

    if long_enough && has_lower && has_upper && has_digit && has_symbol {
        Ok(())
    } else {
        Err("Password must be at least 6 characters, include uppercase, lowercase, a digit, and a special symbol.".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_round_trip() {
        let hash = hash_password("Sup3r$ecret").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("Sup3r$ecret", &hash).unwrap());
        assert!(!verify_password("Sup3r$ecres", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("Sup3r$ecret").unwrap();
        let b = hash_password("Sup3r$ecret").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(verify_password("whatever", "not-a-phc-string").is_err());
    }

    #[test]
    fn test_strength_rule() {
        assert!(validate_password_strength("Aa1$xy").is_ok());
        assert!(validate_password_strength("short").is_err()); // too short, missing classes
        assert!(validate_password_strength("alllowercase1$").is_err()); // no uppercase
        assert!(validate_password_strength("ALLUPPER1$").is_err()); // no lowercase
        assert!(validate_password_strength("NoDigits$$").is_err());
        assert!(validate_password_strength("NoSymbol11").is_err());
    }
}
