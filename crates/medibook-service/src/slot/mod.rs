//! Slot management service.

pub mod service;

pub use service::SlotService;
