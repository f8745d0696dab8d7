//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// JWT and password-hashing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for signing access tokens.
    pub jwt_secret: String,
    /// Access token lifetime in minutes.
    #[serde(default = "default_access_expiry")]
    pub access_token_expiry_minutes: u64,
    /// Token issuer claim.
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// Minimum accepted password length for registration.
    #[serde(default = "default_min_password_len")]
    pub min_password_length: usize,
}

fn default_access_expiry() -> u64 {
    8 * 60
}

fn default_issuer() -> String {
    "medibook".to_string()
}

fn default_min_password_len() -> usize {
    8
}
