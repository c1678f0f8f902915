//! Data models for user account management

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

/// User role
///
/// Stored as SMALLINT. Clients buy services, students sell them, admins
/// moderate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[repr(i16)]
pub enum Role {
    Client = 1,
    Student = 2,
    Admin = 3,
}

impl Role {
    #[inline]
    pub fn id(&self) -> i16 {
        *self as i16
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            1 => Some(Role::Client),
            2 => Some(Role::Student),
            3 => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Student => "student",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<i16> for Role {
    type Error = ();

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        Role::from_id(value).ok_or(())
    }
}

/// User status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[repr(i16)]
pub enum UserStatus {
    Disabled = 0,
    Active = 1,
}

impl From<i16> for UserStatus {
    fn from(v: i16) -> Self {
        match v {
            0 => UserStatus::Disabled,
            _ => UserStatus::Active,
        }
    }
}

/// User account
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

/// Student earnings profile
///
/// `available_balance + total_withdrawn` must equal the sum of
/// `student_amount` over settled payments of the student's completed orders.
/// The reconciliation audit checks exactly this.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StudentProfile {
    pub user_id: i64,
    #[schema(value_type = String, example = "85.00")]
    pub available_balance: Decimal,
    #[schema(value_type = String, example = "120.00")]
    pub total_withdrawn: Decimal,
    pub skills: String,
    pub portfolio_files: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_id_roundtrip() {
        for role in [Role::Client, Role::Student, Role::Admin] {
            assert_eq!(Role::from_id(role.id()), Some(role));
        }
        assert_eq!(Role::from_id(0), None);
        assert_eq!(Role::from_id(99), None);
    }

    #[test]
    fn test_user_status_from_i16() {
        assert_eq!(UserStatus::from(0), UserStatus::Disabled);
        assert_eq!(UserStatus::from(1), UserStatus::Active);
        assert_eq!(UserStatus::from(99), UserStatus::Active); // default to Active
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::Client.to_string(), "client");
        assert_eq!(Role::Student.to_string(), "student");
        assert_eq!(Role::Admin.to_string(), "admin");
    }
}
