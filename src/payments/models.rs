//! Payment data models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;

/// Payment states
///
/// Stored as SMALLINT. A payment enters PENDING when the order is placed,
/// SUCCEEDED when the gateway confirms, and the refund states only through
/// admin tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i16)]
pub enum PaymentStatus {
    Pending = 0,
    Succeeded = 1,
    Refunded = 2,
    PartiallyRefunded = 3,
    Failed = -1,
}

impl PaymentStatus {
    #[inline]
    pub fn id(&self) -> i16 {
        *self as i16
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(PaymentStatus::Pending),
            1 => Some(PaymentStatus::Succeeded),
            2 => Some(PaymentStatus::Refunded),
            3 => Some(PaymentStatus::PartiallyRefunded),
            -1 => Some(PaymentStatus::Failed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Succeeded => "SUCCEEDED",
            PaymentStatus::Refunded => "REFUNDED",
            PaymentStatus::PartiallyRefunded => "PARTIALLY_REFUNDED",
            PaymentStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One escrowed payment for one order.
///
/// `commission_amount`/`student_amount` stay NULL until settlement computes
/// them from the rate frozen on the order; `settled` is the processed flag
/// that makes the balance credit one-shot.
#[derive(Debug, Clone)]
pub struct Payment {
    pub payment_id: String,
    pub order_id: i64,
    pub amount: Decimal,
    pub commission_rate: Decimal,
    pub commission_amount: Option<Decimal>,
    pub student_amount: Option<Decimal>,
    pub status: PaymentStatus,
    pub settled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_id_roundtrip() {
        for status in [
            PaymentStatus::Pending,
            PaymentStatus::Succeeded,
            PaymentStatus::Refunded,
            PaymentStatus::PartiallyRefunded,
            PaymentStatus::Failed,
        ] {
            assert_eq!(PaymentStatus::from_id(status.id()), Some(status));
        }
        assert!(PaymentStatus::from_id(99).is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(PaymentStatus::Succeeded.to_string(), "SUCCEEDED");
        assert_eq!(PaymentStatus::PartiallyRefunded.to_string(), "PARTIALLY_REFUNDED");
    }
}
