//! Account passwords: the sign-up policy and Argon2 hashing.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use tracing::error;

pub const MIN_PASSWORD_LEN: usize = 8;

lazy_static! {
    // Checked when the email is unknown so a failed login costs one Argon2
    // run either way.
    static ref DECOY_HASH: Option<String> = hash_password("grammable-decoy-password").ok();
}

/// Rejection message for a password that may not be used for a new account.
pub fn new_password_problem(plain: &str) -> Option<&'static str> {
    if plain.chars().count() < MIN_PASSWORD_LEN {
        Some("Password too short")
    } else if plain.trim().is_empty() {
        Some("Password must not be blank")
    } else {
        None
    }
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!(error = %e, "password hashing failed");
            anyhow::anyhow!("hash password: {e}")
        })
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "stored password hash is unreadable");
        anyhow::anyhow!("parse password hash: {e}")
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Login check. `stored` is the account's hash, `None` for an unknown email.
pub fn verify_login(plain: &str, stored: Option<&str>) -> anyhow::Result<bool> {
    match stored {
        Some(hash) => verify_password(plain, hash),
        None => {
            if let Some(decoy) = DECOY_HASH.as_deref() {
                let _ = verify_password(plain, decoy);
            }
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_hash_accepts_only_its_password() {
        let hash = hash_password("password").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("password", &hash).unwrap());
        assert!(!verify_password("passw0rd", &hash).unwrap());
    }

    #[test]
    fn unreadable_hash_is_an_error() {
        assert!(verify_password("anything", "not-a-valid-hash").is_err());
    }

    #[test]
    fn unknown_account_never_logs_in() {
        assert!(!verify_login("grammable-decoy-password", None).unwrap());
        let hash = hash_password("password").unwrap();
        assert!(verify_login("password", Some(&hash)).unwrap());
    }

    #[test]
    fn new_passwords_need_eight_non_blank_chars() {
        assert_eq!(new_password_problem("short"), Some("Password too short"));
        assert_eq!(new_password_problem("        "), Some("Password must not be blank"));
        assert_eq!(new_password_problem("password"), None);
    }
}
