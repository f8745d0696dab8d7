//! # medibook-auth
//!
//! Authentication primitives for MediBook.
//!
//! ## Modules
//!
//! - `jwt` — access token creation, validation, and claims
//! - `password` — Argon2id password hashing and policy enforcement

pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::{PasswordHasher, PasswordValidator};
