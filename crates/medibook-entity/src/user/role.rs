//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles available in MediBook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full system administrator.
    Admin,
    /// A doctor who publishes availability slots and handles appointments.
    Doctor,
    /// A patient who books appointments and rates doctors.
    Patient,
}

impl UserRole {
    /// Check if this role is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Check if this role is a doctor.
    pub fn is_doctor(&self) -> bool {
        matches!(self, Self::Doctor)
    }

    /// Check if this role is a patient.
    pub fn is_patient(&self) -> bool {
        matches!(self, Self::Patient)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Doctor => "doctor",
            Self::Patient => "patient",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = medibook_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "doctor" => Ok(Self::Doctor),
            "patient" => Ok(Self::Patient),
            _ => Err(medibook_core::AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: admin, doctor, patient"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!("DOCTOR".parse::<UserRole>().unwrap(), UserRole::Doctor);
        assert!("nurse".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_role_predicates() {
        assert!(UserRole::Admin.is_admin());
        assert!(UserRole::Doctor.is_doctor());
        assert!(!UserRole::Patient.is_doctor());
    }
}
