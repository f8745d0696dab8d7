//! Rating ledger service.

pub mod service;

pub use service::RatingService;
