//! Argon2id password hashing and verification.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use sentra_core::config::AuthConfig;
use sentra_core::error::AppError;

/// Handles password hashing and verification using Argon2id.
///
/// Hashing is CPU-bound; callers on an async runtime should move it off
/// the request-serving event loop (`spawn_blocking`).
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    /// Argon2 memory cost in KiB.
    memory_kib: u32,
    /// Argon2 iteration count.
    iterations: u32,
}

impl PasswordHasher {
    /// Creates a new password hasher with the configured work factor.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            memory_kib: config.argon2_memory_kib,
            iterations: config.argon2_iterations,
        }
    }

    fn argon2(&self) -> Result<Argon2<'static>, AppError> {
        let params = Params::new(self.memory_kib, self.iterations, 1, None)
            .map_err(|e| AppError::configuration(format!("Invalid Argon2 parameters: {e}")))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    /// Hashes a plaintext password using Argon2id with a random salt.
    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = self.argon2()?;

        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    /// Verifies a plaintext password against a stored Argon2id hash.
    ///
    /// Returns `Ok(true)` if the password matches, `Ok(false)` if not.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Invalid password hash format: {e}")))?;

        let argon2 = self.argon2()?;
        match argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::internal(format!(
                "Password verification failed: {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        // Low work factor to keep the test fast.
        PasswordHasher {
            memory_kib: 1024,
            iterations: 1,
        }
    }

    #[test]
    fn test_hash_and_verify() {
        let h = hasher();
        let hash = h.hash_password("Correct-Horse1").unwrap();
        assert!(h.verify_password("Correct-Horse1", &hash).unwrap());
        assert!(!h.verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn test_salted_hashes_differ() {
        let h = hasher();
        let a = h.hash_password("Correct-Horse1").unwrap();
        let b = h.hash_password("Correct-Horse1").unwrap();
        assert_ne!(a, b);
    }
}
