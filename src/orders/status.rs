//! Order FSM state definitions
//!
//! State IDs are designed for PostgreSQL storage as SMALLINT.
//! Terminal states: COMPLETED (40), CANCELLED (-10)

use std::fmt;

/// Order lifecycle states
///
/// Happy path: `Pending -> InProgress -> Delivered -> Completed`, with the
/// bounded `Delivered -> RevisionRequested -> Delivered` rework loop and an
/// admin-only cancel from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i16)]
pub enum OrderStatus {
    /// Placed and paid into escrow, waiting for the student
    Pending = 0,

    /// Student accepted, work underway
    InProgress = 10,

    /// Student delivered; waiting on the client to complete or request rework
    Delivered = 20,

    /// Client requested rework; waiting on redelivery
    RevisionRequested = 30,

    /// Terminal: client accepted, balance credited
    Completed = 40,

    /// Terminal: cancelled by an admin before completion
    Cancelled = -10,
}

impl OrderStatus {
    /// Check if this is a terminal state (no more transitions possible)
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Get the numeric state ID for PostgreSQL storage
    #[inline]
    pub fn id(&self) -> i16 {
        *self as i16
    }

    /// Convert from PostgreSQL state ID
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(OrderStatus::Pending),
            10 => Some(OrderStatus::InProgress),
            20 => Some(OrderStatus::Delivered),
            30 => Some(OrderStatus::RevisionRequested),
            40 => Some(OrderStatus::Completed),
            -10 => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    /// Get human-readable state name
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::InProgress => "IN_PROGRESS",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::RevisionRequested => "REVISION_REQUESTED",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    /// Check whether `from -> to` is an edge of the transition graph.
    ///
    /// Cancel edges exist from every non-terminal state; everything else is
    /// strictly forward.
    pub fn can_transition(from: OrderStatus, to: OrderStatus) -> bool {
        use OrderStatus::*;
        match (from, to) {
            (Pending, InProgress) => true,
            (InProgress, Delivered) => true,
            (RevisionRequested, Delivered) => true,
            (Delivered, RevisionRequested) => true,
            (Delivered, Completed) => true,
            (from, Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<i16> for OrderStatus {
    type Error = ();

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        OrderStatus::from_id(value).ok_or(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::InProgress,
        OrderStatus::Delivered,
        OrderStatus::RevisionRequested,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    #[test]
    fn test_terminal_states() {
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());

        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::InProgress.is_terminal());
        assert!(!OrderStatus::Delivered.is_terminal());
        assert!(!OrderStatus::RevisionRequested.is_terminal());
    }

    #[test]
    fn test_state_id_roundtrip() {
        for state in ALL {
            let id = state.id();
            let recovered = OrderStatus::from_id(id).unwrap();
            assert_eq!(state, recovered);
        }
    }

    #[test]
    fn test_invalid_state_id() {
        assert!(OrderStatus::from_id(999).is_none());
        assert!(OrderStatus::from_id(-999).is_none());
        assert!(OrderStatus::from_id(1).is_none());
    }

    #[test]
    fn test_happy_path_edges() {
        use OrderStatus::*;
        assert!(OrderStatus::can_transition(Pending, InProgress));
        assert!(OrderStatus::can_transition(InProgress, Delivered));
        assert!(OrderStatus::can_transition(Delivered, Completed));
        assert!(OrderStatus::can_transition(Delivered, RevisionRequested));
        assert!(OrderStatus::can_transition(RevisionRequested, Delivered));
    }

    #[test]
    fn test_no_backward_edges() {
        use OrderStatus::*;
        assert!(!OrderStatus::can_transition(InProgress, Pending));
        assert!(!OrderStatus::can_transition(Delivered, InProgress));
        assert!(!OrderStatus::can_transition(Completed, Delivered));
        assert!(!OrderStatus::can_transition(Pending, Delivered));
        assert!(!OrderStatus::can_transition(Pending, Completed));
        assert!(!OrderStatus::can_transition(RevisionRequested, Completed));
    }

    #[test]
    fn test_cancel_edges_only_from_non_terminal() {
        use OrderStatus::*;
        for from in ALL {
            assert_eq!(
                OrderStatus::can_transition(from, Cancelled),
                !from.is_terminal(),
                "cancel edge from {}",
                from
            );
        }
    }

    #[test]
    fn test_terminal_states_have_no_outgoing_edges() {
        for from in [OrderStatus::Completed, OrderStatus::Cancelled] {
            for to in ALL {
                assert!(
                    !OrderStatus::can_transition(from, to),
                    "unexpected edge {} -> {}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(OrderStatus::Pending.to_string(), "PENDING");
        assert_eq!(OrderStatus::RevisionRequested.to_string(), "REVISION_REQUESTED");
        assert_eq!(OrderStatus::Cancelled.to_string(), "CANCELLED");
    }
}
