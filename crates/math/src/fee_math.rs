//! # Fee Math
//!
//! Q128 fee-growth accounting. Accumulators are monotonic modulo 2^256, so
//! deltas are always taken with wrapping subtraction.

use ethnum::U256;

use crate::big_int::{mul_div, Rounding};
use crate::constants::Q128;
use crate::error::{MathError, MathResult};

/// Fees owed to `liquidity` for a fee-growth delta: `floor(L * delta / 2^128)`
///
/// Computed as `L * delta_hi + floor(L * delta_lo / 2^128)`, which is exact and
/// cannot overflow 256 bits.
pub fn calculate_fees(liquidity: u128, fee_growth_delta_x128: U256) -> U256 {
    let (delta_hi, delta_lo) = fee_growth_delta_x128.into_words();
    let whole = U256::from(liquidity) * U256::from(delta_hi);
    let fractional = (U256::from(liquidity) * U256::from(delta_lo)) >> 128u32;
    whole + fractional
}

/// Growth accumulated since `last`, modulo 2^256
pub fn fee_growth_delta(current_x128: U256, last_x128: U256) -> U256 {
    current_x128.wrapping_sub(last_x128)
}

/// Growth credited to every unit of in-range liquidity for `fee_amount`
pub fn fee_growth_from_fee(fee_amount: u128, liquidity: u128) -> MathResult<U256> {
    if liquidity == 0 {
        return Err(MathError::ZeroLiquidity);
    }
    mul_div(U256::from(fee_amount), Q128, U256::from(liquidity), Rounding::Down)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_calculate_fees_small_values() {
        // One full unit of growth per unit of liquidity
        assert_eq!(calculate_fees(1_000, Q128), U256::from(1_000u128));
        // Half a unit rounds down
        assert_eq!(calculate_fees(3, Q128 >> 1u32), U256::from(1u128));
        assert_eq!(calculate_fees(0, U256::MAX), U256::ZERO);
        assert_eq!(calculate_fees(u128::MAX, U256::ZERO), U256::ZERO);
    }

    #[test]
    fn test_calculate_fees_extremes() {
        // (2^128 - 1) * (2^256 - 1) / 2^128 still fits
        let fees = calculate_fees(u128::MAX, U256::MAX);
        let expected = U256::MAX - U256::from(u128::MAX);
        assert_eq!(fees, expected);
    }

    #[test]
    fn test_growth_round_trip_loses_at_most_one_unit() {
        let liquidity = 100_541_928_785_436_464_005_233u128;
        let fee = 910_000_000_000_000_000u128;
        let growth = fee_growth_from_fee(fee, liquidity).unwrap();
        let owed = calculate_fees(liquidity, growth);
        assert_eq!(owed, U256::from(fee - 1));
    }

    #[test]
    fn test_delta_wraps() {
        let last = U256::MAX - U256::from(9u128);
        let current = U256::from(5u128);
        assert_eq!(fee_growth_delta(current, last), U256::from(15u128));
    }

    proptest! {
        #[test]
        fn prop_fees_match_mul_div(liquidity in any::<u128>(), delta in any::<u128>()) {
            let direct = mul_div(U256::from(liquidity), U256::from(delta), Q128, Rounding::Down).unwrap();
            prop_assert_eq!(calculate_fees(liquidity, U256::from(delta)), direct);
        }

        #[test]
        fn prop_fees_never_exceed_fee_paid(fee in 0u128..1u128 << 100, liquidity in 1u128..) {
            let growth = fee_growth_from_fee(fee, liquidity).unwrap();
            prop_assert!(calculate_fees(liquidity, growth) <= U256::from(fee));
        }
    }
}
