//! Message policy: only the parties to an order (or an admin) may read or
//! write its message thread.

use super::Actor;
use crate::orders::models::Order;

/// Closed set of messaging operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageAction {
    View,
    Send,
}

pub fn allows(actor: &Actor, order: &Order, _action: MessageAction) -> bool {
    actor.is_admin() || order.client_id == actor.user_id || order.student_id == actor.user_id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::Role;
    use crate::orders::status::OrderStatus;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn order() -> Order {
        Order {
            order_id: 1,
            client_id: 100,
            student_id: 200,
            service_id: 10,
            status: OrderStatus::InProgress,
            price: Decimal::new(10000, 2),
            commission_rate: Decimal::new(15, 0),
            revision_count: 0,
            max_revisions: 2,
            deadline: None,
            requirements: String::new(),
            delivery_message: None,
            delivery_files: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_parties_and_admin_only() {
        let o = order();
        for action in [MessageAction::View, MessageAction::Send] {
            assert!(allows(&Actor::new(100, Role::Client), &o, action));
            assert!(allows(&Actor::new(200, Role::Student), &o, action));
            assert!(allows(&Actor::new(1, Role::Admin), &o, action));
            assert!(!allows(&Actor::new(300, Role::Client), &o, action));
            assert!(!allows(&Actor::new(300, Role::Student), &o, action));
        }
    }
}
