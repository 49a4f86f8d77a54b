use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Amounts at or below this earn nothing.
const LOWER_THRESHOLD: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Amounts above this earn double points on the excess.
const UPPER_THRESHOLD: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Points already earned in the middle tier by an amount above the upper threshold.
const MIDDLE_TIER_POINTS: u128 = 50;

const DOUBLE: Decimal = Decimal::TWO;

/// Calculates the reward points for a single purchase of `amount`.
///
/// - `amount <= 50` earns 0 points.
/// - `50 < amount <= 100` earns 1 point per unit above 50.
/// - `amount > 100` earns 2 points per unit above 100, plus the 50 from the middle tier.
///
/// The tier expression is truncated to an integer only once, at the end, so `100.99` earns
/// `floor(0.99 * 2 + 50) = 51`. Every `Decimal` has an exact result in a `u128`.
pub fn points(amount: Decimal) -> u128 {
    if amount <= LOWER_THRESHOLD {
        return 0;
    }
    if amount <= UPPER_THRESHOLD {
        return whole(amount - LOWER_THRESHOLD);
    }
    // floor(2x) = 2 * floor(x) + floor(2 * fract(x)), which stays exact where `2x` would overflow
    // the decimal.
    let excess = amount - UPPER_THRESHOLD;
    whole(excess) * 2 + whole(excess.fract() * DOUBLE) + MIDDLE_TIER_POINTS
}

/// Integer part of a non-negative decimal. The 96-bit mantissa always fits.
fn whole(value: Decimal) -> u128 {
    value.trunc().to_u128().unwrap_or_default()
}
