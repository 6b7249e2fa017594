//! Rounding helpers shared by the bollo, fuel and comparison calculations.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero, the way amounts are
/// rounded on a bollo payment notice.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use bollo_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(285.0900)), dec!(285.09));
/// assert_eq!(round_half_up(dec!(83.855)), dec!(83.86));
/// assert_eq!(round_half_up(dec!(-83.855)), dec!(-83.86)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    round_dp_half_up(value, 2)
}

/// Rounds to `dp` decimal places, midpoints away from zero.
///
/// Used with `dp = 1` for litres and `dp = 0` for whole-euro chart series.
pub fn round_dp_half_up(
    value: Decimal,
    dp: u32,
) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}
