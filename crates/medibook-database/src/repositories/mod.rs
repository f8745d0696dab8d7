//! Concrete repository implementations.

pub mod appointment;
pub mod notification;
pub mod rating;
pub mod slot;
pub mod user;

pub use appointment::AppointmentRepository;
pub use notification::NotificationRepository;
pub use rating::RatingRepository;
pub use slot::SlotRepository;
pub use user::UserRepository;
