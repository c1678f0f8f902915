//! Service listing policy.
//!
//! Only students create listings; the owning student or an admin manages
//! them afterwards.

use super::Actor;
use crate::account::Role;
use crate::catalog::models::Service;

/// Closed set of listing operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceAction {
    Create,
    Edit,
    Delete,
    Activate,
}

/// Creation has no resource yet, so it gets its own predicate.
pub fn allows_create(actor: &Actor) -> bool {
    actor.role == Role::Student
}

pub fn allows(actor: &Actor, service: &Service, action: ServiceAction) -> bool {
    match action {
        ServiceAction::Create => allows_create(actor),
        ServiceAction::Edit | ServiceAction::Delete | ServiceAction::Activate => {
            actor.is_admin() || (actor.role == Role::Student && service.student_id == actor.user_id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::models::ServiceStatus;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn service() -> Service {
        Service {
            service_id: 1,
            student_id: 200,
            title: "Logo design".to_string(),
            description: "I design logos".to_string(),
            category: "design".to_string(),
            price: Decimal::new(5000, 2),
            delivery_days: 3,
            max_revisions: 2,
            status: ServiceStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_only_students_create() {
        assert!(allows_create(&Actor::new(200, Role::Student)));
        assert!(!allows_create(&Actor::new(100, Role::Client)));
        assert!(!allows_create(&Actor::new(1, Role::Admin)));
    }

    #[test]
    fn test_owner_or_admin_manage() {
        let svc = service();
        for action in [
            ServiceAction::Edit,
            ServiceAction::Delete,
            ServiceAction::Activate,
        ] {
            assert!(allows(&Actor::new(200, Role::Student), &svc, action));
            assert!(allows(&Actor::new(1, Role::Admin), &svc, action));
            assert!(!allows(&Actor::new(999, Role::Student), &svc, action));
            assert!(!allows(&Actor::new(100, Role::Client), &svc, action));
        }
    }
}
