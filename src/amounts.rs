//! Amounts
//!
//! Rounding helpers for monetary amounts expressed as [`Decimal`] values in the
//! trip currency's major unit (e.g. yen).

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};

/// Direction used when rounding a per-person fee to the denomination unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rounding {
    /// Round towards positive infinity (never below the raw fee).
    Up,

    /// Round towards negative infinity (never above the raw fee).
    Down,
}

impl Rounding {
    /// Both rounding directions, in the order they are evaluated.
    pub const ALL: [Rounding; 2] = [Rounding::Up, Rounding::Down];

    /// Round `amount` to a multiple of `unit` in this direction.
    pub fn apply(self, amount: Decimal, unit: Decimal) -> Decimal {
        match self {
            Rounding::Up => round_up_to(amount, unit),
            Rounding::Down => round_down_to(amount, unit),
        }
    }
}

impl fmt::Display for Rounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rounding::Up => f.write_str("round up"),
            Rounding::Down => f.write_str("round down"),
        }
    }
}

/// Smallest multiple of `unit` that is greater than or equal to `amount`.
///
/// A zero `unit` leaves the amount untouched.
pub fn round_up_to(amount: Decimal, unit: Decimal) -> Decimal {
    if unit.is_zero() {
        return amount;
    }

    (amount / unit).ceil() * unit
}

/// Largest multiple of `unit` that is less than or equal to `amount`.
///
/// A zero `unit` leaves the amount untouched.
pub fn round_down_to(amount: Decimal, unit: Decimal) -> Decimal {
    if unit.is_zero() {
        return amount;
    }

    (amount / unit).floor() * unit
}

/// Nearest multiple of `unit`, halves rounded away from zero.
pub fn round_to_nearest(amount: Decimal, unit: Decimal) -> Decimal {
    if unit.is_zero() {
        return amount;
    }

    (amount / unit).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero) * unit
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: i64) -> Decimal {
        Decimal::from(value)
    }

    #[test]
    fn round_up_moves_to_next_unit() {
        assert_eq!(round_up_to(dec(1001), dec(100)), dec(1100));
        assert_eq!(round_up_to(Decimal::new(10005, 1), dec(100)), dec(1100));
    }

    #[test]
    fn round_down_moves_to_previous_unit() {
        assert_eq!(round_down_to(dec(1099), dec(100)), dec(1000));
        assert_eq!(round_down_to(dec(-50), dec(100)), dec(-100));
    }

    #[test]
    fn exact_multiples_are_unchanged_in_both_directions() {
        for rounding in Rounding::ALL {
            assert_eq!(rounding.apply(dec(1500), dec(100)), dec(1500));
        }
    }

    #[test]
    fn nearest_rounds_halves_away_from_zero() {
        assert_eq!(round_to_nearest(dec(150), dec(100)), dec(200));
        assert_eq!(round_to_nearest(dec(149), dec(100)), dec(100));
        assert_eq!(round_to_nearest(Decimal::new(3333, 1), dec(100)), dec(300));
    }

    #[test]
    fn zero_unit_is_a_no_op() {
        let amount = Decimal::new(12345, 2);

        assert_eq!(round_up_to(amount, Decimal::ZERO), amount);
        assert_eq!(round_down_to(amount, Decimal::ZERO), amount);
        assert_eq!(round_to_nearest(amount, Decimal::ZERO), amount);
    }

    #[test]
    fn display_names_direction() {
        assert_eq!(Rounding::Up.to_string(), "round up");
        assert_eq!(Rounding::Down.to_string(), "round down");
    }
}
