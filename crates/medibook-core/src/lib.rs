//! # medibook-core
//!
//! Core crate for the MediBook appointment-booking backend. Contains the
//! unified error system, pagination types, configuration schemas, and the
//! domain event definitions shared by every other crate.
//!
//! This crate has **no** internal dependencies on other MediBook crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
