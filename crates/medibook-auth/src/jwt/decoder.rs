//! Access token validation.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use medibook_core::config::AuthConfig;
use medibook_core::error::AppError;

use super::claims::Claims;

/// Validates access token signatures, expiry, and issuer.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5; // clock skew
        validation.set_issuer(&[&config.issuer]);

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates an access token string.
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::authentication("Token has expired")
                }
                _ => AppError::authentication("Invalid token"),
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::encoder::JwtEncoder;
    use medibook_entity::user::UserRole;
    use uuid::Uuid;

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret-at-least-32-bytes-long!".to_string(),
            access_token_expiry_minutes: 60,
            issuer: "medibook".to_string(),
            min_password_length: 8,
        }
    }

    #[test]
    fn test_round_trip() {
        let config = test_config();
        let encoder = JwtEncoder::new(&config);
        let decoder = JwtDecoder::new(&config);

        let user_id = Uuid::new_v4();
        let issued = encoder.issue(user_id, &UserRole::Patient, "alice").unwrap();
        let claims = decoder.decode(&issued.token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.iss, "medibook");
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let encoder = JwtEncoder::new(&test_config());
        let mut other = test_config();
        other.jwt_secret = "a-completely-different-secret-value".to_string();
        let decoder = JwtDecoder::new(&other);

        let issued = encoder
            .issue(Uuid::new_v4(), &UserRole::Doctor, "bob")
            .unwrap();
        assert!(decoder.decode(&issued.token).is_err());
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let encoder = JwtEncoder::new(&test_config());
        let mut other = test_config();
        other.issuer = "someone-else".to_string();
        let decoder = JwtDecoder::new(&other);

        let issued = encoder
            .issue(Uuid::new_v4(), &UserRole::Doctor, "bob")
            .unwrap();
        assert!(decoder.decode(&issued.token).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        let decoder = JwtDecoder::new(&test_config());
        assert!(decoder.decode("not.a.token").is_err());
    }
}
