//! Notification dispatch: event → inbox row → live push.

pub mod dispatcher;
pub mod formatter;

pub use dispatcher::NotificationDispatcher;
