//! Password strength policy enforcement.
//!
//! Rules are checked independently and cumulatively: every violated rule
//! is reported, not just the first.

use sentra_core::config::AuthConfig;

/// Outcome of a password strength check.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PasswordStrength {
    /// Whether the password satisfies every rule.
    pub is_valid: bool,
    /// One message per violated rule.
    pub errors: Vec<String>,
}

/// Validates password strength against configured policies.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    /// Minimum password length.
    min_length: usize,
    /// Maximum password length.
    max_length: usize,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
            max_length: config.password_max_length,
        }
    }

    /// Validates a password against all configured rules, reporting every
    /// violation.
    pub fn validate(&self, password: &str) -> PasswordStrength {
        let mut errors = Vec::new();

        if password.chars().count() < self.min_length {
            errors.push(format!(
                "Password must be at least {} characters long",
                self.min_length
            ));
        }

        if password.chars().count() > self.max_length {
            errors.push(format!(
                "Password must be at most {} characters long",
                self.max_length
            ));
        }

        if !password.chars().any(|c| c.is_uppercase()) {
            errors.push("Password must contain at least one uppercase letter".to_string());
        }

        if !password.chars().any(|c| c.is_lowercase()) {
            errors.push("Password must contain at least one lowercase letter".to_string());
        }

        if !password.chars().any(|c| c.is_ascii_digit()) {
            errors.push("Password must contain at least one digit".to_string());
        }

        if !password.chars().any(|c| !c.is_alphanumeric()) {
            errors.push("Password must contain at least one special character".to_string());
        }

        PasswordStrength {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}
