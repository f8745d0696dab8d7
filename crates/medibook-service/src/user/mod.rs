//! Accounts: registration, login, profiles, and the doctor directory.

pub mod service;

pub use service::{RegisterUser, UserService};
