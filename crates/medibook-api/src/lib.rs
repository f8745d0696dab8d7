//! # medibook-api
//!
//! HTTP API layer for MediBook built on Axum.
//!
//! Provides the REST endpoints, the WebSocket upgrade, middleware (CORS,
//! compression, request logging), extractors, DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use state::AppState;
