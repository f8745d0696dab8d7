//! Request context carrying the authenticated actor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use medibook_entity::user::UserRole;

/// Context for the current authenticated request.
///
/// Extracted by the API layer and passed into service methods so that
/// every operation knows *who* is acting. There is no module-level
/// session state anywhere; the context travels explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// The user's role at the time the JWT was issued.
    pub role: UserRole,
    /// The username (convenience field from JWT claims).
    pub username: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: Uuid, role: UserRole, username: String) -> Self {
        Self {
            user_id,
            role,
            username,
            request_time: Utc::now(),
        }
    }

    /// Returns whether the current user is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Returns whether the current user is a doctor.
    pub fn is_doctor(&self) -> bool {
        self.role.is_doctor()
    }

    /// Returns whether the current user is a patient.
    pub fn is_patient(&self) -> bool {
        self.role.is_patient()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_helpers() {
        let ctx = RequestContext::new(Uuid::new_v4(), UserRole::Doctor, "drwho".into());
        assert!(ctx.is_doctor());
        assert!(!ctx.is_admin());
        assert!(!ctx.is_patient());
    }
}
