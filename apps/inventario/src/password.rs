//! # Password Digests
//!
//! Two schemes can live side by side in `usuario.contrasenia`:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sha256 (default)   64 lowercase hex chars, unsalted                   │
//! │                     "8d969eef6ecad3c29a3a629280e686cf..."              │
//! │                                                                         │
//! │  argon2             PHC string, random salt per user                   │
//! │                     "$argon2id$v=19$m=19456,t=2,p=1$..."               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The configured scheme only picks how NEW passwords are hashed.
//! Verification looks at the stored value, so switching schemes never
//! locks out existing accounts.

use std::fmt;
use std::str::FromStr;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::ConfigError;
use crate::error::{ApiError, ApiResult};

/// How new passwords are hashed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PasswordScheme {
    /// Unsalted SHA-256 hex digest. Equal passwords give equal hashes.
    #[default]
    Sha256,

    /// Argon2id with a random salt.
    Argon2,
}

impl fmt::Display for PasswordScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasswordScheme::Sha256 => write!(f, "sha256"),
            PasswordScheme::Argon2 => write!(f, "argon2"),
        }
    }
}

impl FromStr for PasswordScheme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(PasswordScheme::Sha256),
            "argon2" | "argon2id" => Ok(PasswordScheme::Argon2),
            other => Err(ConfigError::Invalid(format!(
                "Unknown password scheme: '{}'. Valid options: sha256, argon2",
                other
            ))),
        }
    }
}

/// Hashes `password` for storage with the given scheme.
pub fn hash_password(scheme: PasswordScheme, password: &str) -> ApiResult<String> {
    match scheme {
        PasswordScheme::Sha256 => Ok(sha256_hex(password)),
        PasswordScheme::Argon2 => {
            let salt = SaltString::generate(&mut OsRng);
            let hash = Argon2::default()
                .hash_password(password.as_bytes(), &salt)
                .map_err(|e| ApiError::internal(format!("Failed to hash password: {}", e)))?;
            Ok(hash.to_string())
        }
    }
}

/// Checks `password` against a stored hash of either scheme.
pub fn verify_password(password: &str, stored: &str) -> bool {
    if stored.starts_with("$argon2") {
        let parsed = match PasswordHash::new(stored) {
            Ok(h) => h,
            Err(_) => return false,
        };
        return Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok();
    }

    sha256_hex(password) == stored
}

fn sha256_hex(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}
