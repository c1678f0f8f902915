//! Commission calculation utilities
//!
//! Rates are percentages (15 = 15%). All splits round half-up to 2 decimal
//! places and the two components always sum exactly to the input price; any
//! rounding remainder lands on the student side.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::MarketError;

/// A price split into the platform's cut and the student's payout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split {
    pub commission: Decimal,
    pub student: Decimal,
}

/// Calculate the commission split for an order price.
///
/// `commission = round_half_up(price * rate / 100, 2)`,
/// `student = price - commission`.
///
/// # Arguments
/// * `price` - Order price, non-negative, at most 2 decimal places
/// * `rate_percent` - Commission rate in percent, within [0, 100]
///
/// # Errors
/// * `Validation` - Rate outside [0, 100], negative price, or price with
///   more than 2 decimal places
/// * `Integrity` - Components failed to sum back to the price (cannot
///   happen by construction; checked anyway because money)
pub fn compute_split(price: Decimal, rate_percent: Decimal) -> Result<Split, MarketError> {
    if rate_percent < Decimal::ZERO || rate_percent > Decimal::from(100) {
        return Err(MarketError::validation(
            "commission_rate",
            format!("rate {} outside [0, 100]", rate_percent),
        ));
    }
    if price < Decimal::ZERO {
        return Err(MarketError::validation("price", "price must be non-negative"));
    }
    if price.round_dp(2) != price {
        return Err(MarketError::validation(
            "price",
            format!("price {} has sub-cent precision", price),
        ));
    }

    let commission = (price * rate_percent / Decimal::from(100))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let student = price - commission;

    if commission + student != price || student < Decimal::ZERO {
        return Err(MarketError::Integrity(format!(
            "split {} + {} does not reproduce price {}",
            commission, student, price
        )));
    }

    Ok(Split { commission, student })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_split_basic() {
        // 100.00 at 15% -> 15.00 / 85.00
        let split = compute_split(dec("100.00"), dec("15")).unwrap();
        assert_eq!(split.commission, dec("15.00"));
        assert_eq!(split.student, dec("85.00"));
    }

    #[test]
    fn test_split_rounding_remainder_to_student() {
        // 99.99 at 15% -> 14.9985 rounds half-up to 15.00, student 84.99
        let split = compute_split(dec("99.99"), dec("15")).unwrap();
        assert_eq!(split.commission, dec("15.00"));
        assert_eq!(split.student, dec("84.99"));
        assert_eq!(split.commission + split.student, dec("99.99"));
    }

    #[test]
    fn test_split_half_up() {
        // 10.10 at 2.5% = 0.2525; dropped remainder 0.0025 < half a cent
        let split = compute_split(dec("10.10"), dec("2.5")).unwrap();
        assert_eq!(split.commission, dec("0.25"));
        assert_eq!(split.student, dec("9.85"));

        // 10.00 at 0.25% = 0.025 -> exact midpoint, rounds up to 0.03
        let split = compute_split(dec("10.00"), dec("0.25")).unwrap();
        assert_eq!(split.commission, dec("0.03"));
        assert_eq!(split.student, dec("9.97"));
    }

    #[test]
    fn test_split_extreme_rates() {
        let split = compute_split(dec("50.00"), dec("0")).unwrap();
        assert_eq!(split.commission, Decimal::ZERO);
        assert_eq!(split.student, dec("50.00"));

        let split = compute_split(dec("50.00"), dec("100")).unwrap();
        assert_eq!(split.commission, dec("50.00"));
        assert_eq!(split.student, dec("0.00"));
    }

    #[test]
    fn test_split_rejects_bad_inputs() {
        assert!(compute_split(dec("10.00"), dec("-1")).is_err());
        assert!(compute_split(dec("10.00"), dec("101")).is_err());
        assert!(compute_split(dec("-10.00"), dec("15")).is_err());
        assert!(compute_split(dec("10.001"), dec("15")).is_err());
    }

    #[test]
    fn test_split_sums_exactly_over_sweep() {
        // Every cent price up to 20.00 at awkward rates still sums exactly
        for cents in 1..=2000i64 {
            let price = Decimal::new(cents, 2);
            for rate in ["3.33", "7.77", "15", "33.33", "99.99"] {
                let split = compute_split(price, dec(rate)).unwrap();
                assert_eq!(
                    split.commission + split.student,
                    price,
                    "split of {} at {}% lost money",
                    price,
                    rate
                );
                assert!(split.student >= Decimal::ZERO);
                assert!(split.commission >= Decimal::ZERO);
            }
        }
    }
}
