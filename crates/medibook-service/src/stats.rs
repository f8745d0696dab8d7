//! Admin dashboard aggregates.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use medibook_core::error::AppError;
use medibook_core::result::AppResult;
use medibook_database::repositories::appointment::AppointmentRepository;
use medibook_database::repositories::user::UserRepository;
use medibook_entity::appointment::AppointmentStatus;
use medibook_entity::user::UserRole;

use crate::context::RequestContext;

/// Counters shown on the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    /// Total registered doctors.
    pub doctors: i64,
    /// Total registered patients.
    pub patients: i64,
    /// Appointments awaiting confirmation.
    pub pending_appointments: i64,
    /// Confirmed upcoming appointments.
    pub confirmed_appointments: i64,
    /// Completed appointments.
    pub completed_appointments: i64,
    /// Canceled appointments.
    pub canceled_appointments: i64,
}

/// Computes admin dashboard counters.
#[derive(Clone)]
pub struct StatsService {
    user_repo: Arc<UserRepository>,
    appointment_repo: Arc<AppointmentRepository>,
}

impl StatsService {
    /// Creates a new stats service.
    pub fn new(user_repo: Arc<UserRepository>, appointment_repo: Arc<AppointmentRepository>) -> Self {
        Self {
            user_repo,
            appointment_repo,
        }
    }

    /// Current platform-wide counters (admin).
    pub async fn admin_stats(&self, ctx: &RequestContext) -> AppResult<AdminStats> {
        if !ctx.is_admin() {
            return Err(AppError::authorization("Admin access required"));
        }

        Ok(AdminStats {
            doctors: self.user_repo.count_by_role(UserRole::Doctor).await?,
            patients: self.user_repo.count_by_role(UserRole::Patient).await?,
            pending_appointments: self
                .appointment_repo
                .count_by_status(AppointmentStatus::Pending)
                .await?,
            confirmed_appointments: self
                .appointment_repo
                .count_by_status(AppointmentStatus::Confirmed)
                .await?,
            completed_appointments: self
                .appointment_repo
                .count_by_status(AppointmentStatus::Completed)
                .await?,
            canceled_appointments: self
                .appointment_repo
                .count_by_status(AppointmentStatus::Canceled)
                .await?,
        })
    }
}
