//! Password policy enforcement for new passwords.

use medibook_core::config::AuthConfig;
use medibook_core::error::AppError;

/// Validates password strength against the configured policy.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    min_length: usize,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.min_password_length,
        }
    }

    /// Validates a password, returning the first violation found.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        if password.len() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }

        if !password.chars().any(|c| c.is_alphabetic()) {
            return Err(AppError::validation(
                "Password must contain at least one letter",
            ));
        }

        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(AppError::validation(
                "Password must contain at least one digit",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> PasswordValidator {
        PasswordValidator { min_length: 8 }
    }

    #[test]
    fn test_too_short_rejected() {
        assert!(validator().validate("a1b2c3").is_err());
    }

    #[test]
    fn test_letters_only_rejected() {
        assert!(validator().validate("abcdefghij").is_err());
    }

    #[test]
    fn test_digits_only_rejected() {
        assert!(validator().validate("1234567890").is_err());
    }

    #[test]
    fn test_mixed_accepted() {
        assert!(validator().validate("correcthorse7").is_ok());
    }
}
