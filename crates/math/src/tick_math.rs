//! # Tick Math
//!
//! Conversions between ticks and Q64.96 square-root prices. The ratio for a tick
//! is built from precomputed Q128 powers of `1 / sqrt(1.0001)`, so results are
//! bit-identical with the liquidity venues the factory talks to.

use ethnum::U256;

use crate::constants::{MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK, SUPPORTED_FEE_TIERS};
use crate::error::{MathError, MathResult};

/// `1 / sqrt(1.0001)^(2^i)` in Q128, for i in 0..20
const MAGIC_INV_SQRT_1_0001_POW_2: [u128; 20] = [
    0xfffcb933bd6fad37aa2d162d1a594001,
    0xfff97272373d413259a46990580e213a,
    0xfff2e50f5f656932ef12357cf3c7fdcc,
    0xffe5caca7e10e4e61c3624eaa0941cd0,
    0xffcb9843d60f6159c9db58835c926644,
    0xff973b41fa98c081472e6896dfb254c0,
    0xff2ea16466c96a3843ec78b326b52861,
    0xfe5dee046a99a2a811c461f1969c3053,
    0xfcbe86c7900a88aedcffc83b479aa3a4,
    0xf987a7253ac413176f2b074cf7815e54,
    0xf3392b0822b70005940c7a398e4b70f3,
    0xe7159475a2c29b7443b29c7fa6e889d9,
    0xd097f3bdfd2022b8845ad8f792aa5825,
    0xa9f746462d870fdf8a65dc1f90e061e5,
    0x70d869a156d2a1b890bb3df62baf32f7,
    0x31be135f97d08fd981231505542fcfa6,
    0x9aa508b5b7a84e1c677de54f3e99bc9,
    0x5d6af8dedb81196699c329225ee604,
    0x2216e584f5fa1ea926041bedfe98,
    0x48a170391f7dc42444e8fa2,
];

/// Get the Q64.96 square-root price at a tick
pub fn sqrt_ratio_at_tick(tick: i32) -> MathResult<U256> {
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(MathError::InvalidTick(tick));
    }

    let abs_tick = tick.unsigned_abs();
    let mut ratio = if abs_tick & 1 != 0 {
        U256::from(MAGIC_INV_SQRT_1_0001_POW_2[0])
    } else {
        U256::from_words(1, 0)
    };

    for (i, magic) in MAGIC_INV_SQRT_1_0001_POW_2.iter().enumerate().skip(1) {
        if abs_tick & (1 << i) != 0 {
            ratio = (ratio * U256::from(*magic)) >> 128u32;
        }
    }

    // The table holds inverse powers, flip for positive ticks
    if tick > 0 {
        ratio = U256::MAX / ratio;
    }

    // Q128 -> Q96, rounding up so the tick of the result is exact
    let shifted = ratio >> 32u32;
    if ratio & U256::from(u32::MAX as u128) == U256::ZERO {
        Ok(shifted)
    } else {
        Ok(shifted + U256::ONE)
    }
}

/// Get the greatest tick whose square-root price is at or below `sqrt_price_x96`
pub fn tick_at_sqrt_ratio(sqrt_price_x96: U256) -> MathResult<i32> {
    if sqrt_price_x96 < MIN_SQRT_RATIO || sqrt_price_x96 >= MAX_SQRT_RATIO {
        return Err(MathError::InvalidSqrtPrice);
    }

    // Binary search for the largest tick with ratio <= price
    let mut low = MIN_TICK;
    let mut high = MAX_TICK;
    while low < high {
        let mid = low + (high - low + 1) / 2;
        if sqrt_ratio_at_tick(mid)? <= sqrt_price_x96 {
            low = mid;
        } else {
            high = mid - 1;
        }
    }

    Ok(low)
}

/// Tick spacing enforced by the liquidity venue for a fee tier
pub fn tick_spacing_for_fee(fee: u32) -> MathResult<i32> {
    SUPPORTED_FEE_TIERS
        .iter()
        .find(|(tier, _)| *tier == fee)
        .map(|(_, spacing)| *spacing)
        .ok_or(MathError::UnsupportedFeeTier(fee))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::Q96;
    use proptest::prelude::*;

    #[test]
    fn test_sqrt_ratio_at_known_ticks() {
        assert_eq!(sqrt_ratio_at_tick(0).unwrap(), Q96);
        assert_eq!(sqrt_ratio_at_tick(MIN_TICK).unwrap(), MIN_SQRT_RATIO);
        assert_eq!(sqrt_ratio_at_tick(MAX_TICK).unwrap(), MAX_SQRT_RATIO);
        assert_eq!(
            sqrt_ratio_at_tick(MAX_TICK + 1),
            Err(MathError::InvalidTick(MAX_TICK + 1))
        );
    }

    #[test]
    fn test_ratio_is_monotonic_around_zero() {
        let below = sqrt_ratio_at_tick(-1).unwrap();
        let above = sqrt_ratio_at_tick(1).unwrap();
        assert!(below < Q96 && Q96 < above);
    }

    #[test]
    fn test_tick_at_bounds() {
        assert_eq!(tick_at_sqrt_ratio(MIN_SQRT_RATIO).unwrap(), MIN_TICK);
        assert_eq!(tick_at_sqrt_ratio(MAX_SQRT_RATIO - U256::ONE).unwrap(), MAX_TICK - 1);
        assert_eq!(tick_at_sqrt_ratio(MAX_SQRT_RATIO), Err(MathError::InvalidSqrtPrice));
    }

    #[test]
    fn test_tick_spacing() {
        assert_eq!(tick_spacing_for_fee(10_000).unwrap(), 200);
        assert_eq!(tick_spacing_for_fee(500).unwrap(), 10);
        assert_eq!(tick_spacing_for_fee(42), Err(MathError::UnsupportedFeeTier(42)));
    }

    proptest! {
        #[test]
        fn prop_tick_round_trip(tick in MIN_TICK..MAX_TICK) {
            let ratio = sqrt_ratio_at_tick(tick).unwrap();
            prop_assert_eq!(tick_at_sqrt_ratio(ratio).unwrap(), tick);
            if ratio > MIN_SQRT_RATIO {
                prop_assert_eq!(tick_at_sqrt_ratio(ratio - U256::ONE).unwrap(), tick - 1);
            }
        }
    }
}
