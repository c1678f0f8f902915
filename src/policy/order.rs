//! Order policy.
//!
//! Admins see and act on everything; clients and students are limited to
//! their side of their own orders. Status-dependent actions also check the
//! order's current state and revision budget, so a policy pass means the
//! action is plausible — the conditional update still guards races.

use super::Actor;
use crate::account::Role;
use crate::orders::models::Order;
use crate::orders::status::OrderStatus;

/// Closed set of order operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    View,
    Accept,
    Deliver,
    RequestRevision,
    Complete,
    Cancel,
}

pub fn allows(actor: &Actor, order: &Order, action: OrderAction) -> bool {
    if actor.is_admin() {
        // Admin may view anything and is the only role that may cancel;
        // the working transitions stay with the order's parties.
        return match action {
            OrderAction::View => true,
            OrderAction::Cancel => !order.status.is_terminal(),
            _ => false,
        };
    }

    let is_client = actor.role == Role::Client && order.client_id == actor.user_id;
    let is_student = actor.role == Role::Student && order.student_id == actor.user_id;

    match action {
        OrderAction::View => is_client || is_student,
        OrderAction::Accept => is_student && order.status == OrderStatus::Pending,
        OrderAction::Deliver => {
            is_student
                && matches!(
                    order.status,
                    OrderStatus::InProgress | OrderStatus::RevisionRequested
                )
        }
        OrderAction::RequestRevision => {
            is_client
                && order.status == OrderStatus::Delivered
                && order.revision_count < order.max_revisions
        }
        OrderAction::Complete => is_client && order.status == OrderStatus::Delivered,
        OrderAction::Cancel => false, // admin-only
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn order(status: OrderStatus) -> Order {
        Order {
            order_id: 1,
            client_id: 100,
            student_id: 200,
            service_id: 10,
            status,
            price: Decimal::new(10000, 2),
            commission_rate: Decimal::new(15, 0),
            revision_count: 0,
            max_revisions: 2,
            deadline: None,
            requirements: "requirements".to_string(),
            delivery_message: None,
            delivery_files: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn client() -> Actor {
        Actor::new(100, Role::Client)
    }
    fn student() -> Actor {
        Actor::new(200, Role::Student)
    }
    fn admin() -> Actor {
        Actor::new(1, Role::Admin)
    }
    fn stranger() -> Actor {
        Actor::new(999, Role::Client)
    }

    #[test]
    fn test_view_scoped_to_parties() {
        let o = order(OrderStatus::Pending);
        assert!(allows(&client(), &o, OrderAction::View));
        assert!(allows(&student(), &o, OrderAction::View));
        assert!(allows(&admin(), &o, OrderAction::View));
        assert!(!allows(&stranger(), &o, OrderAction::View));
    }

    #[test]
    fn test_accept_only_assigned_student_from_pending() {
        let o = order(OrderStatus::Pending);
        assert!(allows(&student(), &o, OrderAction::Accept));
        assert!(!allows(&client(), &o, OrderAction::Accept));
        assert!(!allows(&admin(), &o, OrderAction::Accept));

        let o = order(OrderStatus::InProgress);
        assert!(!allows(&student(), &o, OrderAction::Accept));
    }

    #[test]
    fn test_deliver_requires_working_status() {
        for status in [OrderStatus::InProgress, OrderStatus::RevisionRequested] {
            assert!(allows(&student(), &order(status), OrderAction::Deliver));
        }
        for status in [
            OrderStatus::Pending,
            OrderStatus::Delivered,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert!(!allows(&student(), &order(status), OrderAction::Deliver));
        }
        assert!(!allows(
            &client(),
            &order(OrderStatus::InProgress),
            OrderAction::Deliver
        ));
    }

    #[test]
    fn test_revision_requires_budget() {
        let mut o = order(OrderStatus::Delivered);
        assert!(allows(&client(), &o, OrderAction::RequestRevision));

        o.revision_count = o.max_revisions;
        assert!(!allows(&client(), &o, OrderAction::RequestRevision));
    }

    #[test]
    fn test_complete_only_client_from_delivered() {
        let o = order(OrderStatus::Delivered);
        assert!(allows(&client(), &o, OrderAction::Complete));
        assert!(!allows(&student(), &o, OrderAction::Complete));
        assert!(!allows(&admin(), &o, OrderAction::Complete));
        assert!(!allows(
            &client(),
            &order(OrderStatus::InProgress),
            OrderAction::Complete
        ));
    }

    #[test]
    fn test_cancel_admin_only_non_terminal() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::InProgress,
            OrderStatus::Delivered,
            OrderStatus::RevisionRequested,
        ] {
            assert!(allows(&admin(), &order(status), OrderAction::Cancel));
        }
        assert!(!allows(
            &admin(),
            &order(OrderStatus::Completed),
            OrderAction::Cancel
        ));
        assert!(!allows(
            &admin(),
            &order(OrderStatus::Cancelled),
            OrderAction::Cancel
        ));
        assert!(!allows(
            &client(),
            &order(OrderStatus::Pending),
            OrderAction::Cancel
        ));
        assert!(!allows(
            &student(),
            &order(OrderStatus::Pending),
            OrderAction::Cancel
        ));
    }
}
