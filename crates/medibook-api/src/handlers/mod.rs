//! HTTP handlers, organized by domain.

pub mod admin;
pub mod appointment;
pub mod auth;
pub mod doctor;
pub mod health;
pub mod notification;
pub mod rating;
pub mod slot;
pub mod ws;
