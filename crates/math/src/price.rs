//! Square-root price encoding, decoding and orientation helpers

use ethnum::U256;

use crate::big_int::{isqrt, mul_div, Rounding};
use crate::constants::{MAX_SQRT_RATIO, MIN_SQRT_RATIO, PRICE_SCALE, Q192, Q96};
use crate::error::{MathError, MathResult};
use crate::liquidity_math::{get_liquidity_for_amount_0, get_liquidity_for_amount_1};

/// Prices carried by a Q64.96 square root, both directions, scaled by 1e18
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedPrice {
    /// Units of token1 per unit of token0
    pub token1_per_token0: U256,
    /// Units of token0 per unit of token1
    pub token0_per_token1: U256,
}

/// `sqrt(reserve1 / reserve0) * 2^96`, floored
pub fn encode_price_sqrt(reserve1: u128, reserve0: u128) -> MathResult<U256> {
    if reserve0 == 0 {
        return Err(MathError::DivisionByZero);
    }
    let ratio_x192 = mul_div(U256::from(reserve1), Q192, U256::from(reserve0), Rounding::Down)?;
    Ok(isqrt(ratio_x192))
}

/// Decode a Q64.96 square-root price into 1e18-scaled prices
pub fn decode_price(sqrt_price_x96: U256) -> MathResult<DecodedPrice> {
    if sqrt_price_x96 == U256::ZERO {
        return Err(MathError::InvalidSqrtPrice);
    }
    let scale = U256::from(PRICE_SCALE);

    let price_x96 = mul_div(sqrt_price_x96, sqrt_price_x96, Q96, Rounding::Down)?;
    let token1_per_token0 = mul_div(price_x96, scale, Q96, Rounding::Down)?;

    let inverse = mul_div(Q192, scale, sqrt_price_x96, Rounding::Down)?;
    let token0_per_token1 = inverse / sqrt_price_x96;

    Ok(DecodedPrice {
        token1_per_token0,
        token0_per_token1,
    })
}

/// Square-root price of the same pair with token0 and token1 swapped
pub fn invert_sqrt_price_x96(sqrt_price_x96: U256) -> MathResult<U256> {
    if sqrt_price_x96 == U256::ZERO {
        return Err(MathError::InvalidSqrtPrice);
    }
    let inverted = Q192 / sqrt_price_x96;
    if inverted < MIN_SQRT_RATIO || inverted >= MAX_SQRT_RATIO {
        return Err(MathError::InvalidSqrtPrice);
    }
    Ok(inverted)
}

/// Tick range of the same position with token0 and token1 swapped
pub fn mirror_tick_range(tick_lower: i32, tick_upper: i32) -> (i32, i32) {
    (-tick_upper, -tick_lower)
}

/// Price at which `amount_0` and `amount_1` back the same liquidity in `[sa, sb]`
///
/// Bisection over the two monotonic liquidity curves. With one side empty the
/// price sits on the matching edge of the range.
pub fn sqrt_price_for_amounts(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    amount_0: u128,
    amount_1: u128,
) -> MathResult<U256> {
    let (sa, sb) = if sqrt_ratio_a_x96 > sqrt_ratio_b_x96 {
        (sqrt_ratio_b_x96, sqrt_ratio_a_x96)
    } else {
        (sqrt_ratio_a_x96, sqrt_ratio_b_x96)
    };
    if amount_0 == 0 {
        return Ok(sb);
    }
    if amount_1 == 0 || sb - sa < U256::from(2u128) {
        return Ok(sa);
    }

    let mut low = sa + U256::ONE;
    let mut high = sb - U256::ONE;
    while low < high {
        let mid = low + ((high - low) >> 1u32);
        let liquidity_0 = widen(get_liquidity_for_amount_0(mid, sb, amount_0))?;
        let liquidity_1 = widen(get_liquidity_for_amount_1(sa, mid, amount_1))?;
        if liquidity_0 < liquidity_1 {
            low = mid + U256::ONE;
        } else {
            high = mid;
        }
    }
    Ok(low)
}

// Liquidity beyond u128 only means that side is not the binding one
fn widen(liquidity: MathResult<u128>) -> MathResult<U256> {
    match liquidity {
        Ok(value) => Ok(U256::from(value)),
        Err(MathError::MathOverflow) | Err(MathError::MulDivOverflow) => Ok(U256::MAX),
        Err(other) => Err(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::liquidity_math::{get_amounts_for_liquidity, get_liquidity_for_amounts};
    use crate::tick_math::sqrt_ratio_at_tick;

    #[test]
    fn test_encode_price() {
        assert_eq!(encode_price_sqrt(1, 1).unwrap(), Q96);
        assert_eq!(
            encode_price_sqrt(1, 10_000_000).unwrap(),
            "25054144837504793118641380".parse::<U256>().unwrap()
        );
        assert_eq!(encode_price_sqrt(1, 0), Err(MathError::DivisionByZero));
    }

    #[test]
    fn test_decode_default_launch_price() {
        let sqrt: U256 = "25052911542910170730777872".parse().unwrap();
        let price = decode_price(sqrt).unwrap();
        assert_eq!(price.token1_per_token0, U256::from(99_990_155_207u128));
        assert_eq!(
            price.token0_per_token1,
            "10000984576142835667756352".parse::<U256>().unwrap()
        );
    }

    #[test]
    fn test_invert_price() {
        let sqrt: U256 = "25052911542910170730777872".parse().unwrap();
        let inverted = invert_sqrt_price_x96(sqrt).unwrap();
        assert_eq!(
            inverted,
            "250553781928115428981508556680446".parse::<U256>().unwrap()
        );
        assert_eq!(invert_sqrt_price_x96(Q96).unwrap(), Q96);
        assert_eq!(invert_sqrt_price_x96(U256::ONE), Err(MathError::InvalidSqrtPrice));
    }

    #[test]
    fn test_mirror_range() {
        assert_eq!(mirror_tick_range(-92_200, 0), (0, 92_200));
        assert_eq!(mirror_tick_range(-887_200, 887_200), (-887_200, 887_200));
    }

    #[test]
    fn test_price_for_amounts_uses_both_sides() {
        let sa = sqrt_ratio_at_tick(-887_200).unwrap();
        let sb = sqrt_ratio_at_tick(887_200).unwrap();
        let tokens = 9_165_861_719_909_731_698_747_291u128;
        let native = 89_929_999_999_999_999_999u128;

        let price = sqrt_price_for_amounts(sa, sb, tokens, native).unwrap();
        let liquidity = get_liquidity_for_amounts(price, sa, sb, tokens, native).unwrap();
        let (used_0, used_1) = get_amounts_for_liquidity(price, sa, sb, liquidity, true).unwrap();

        assert!(tokens - used_0 <= 100);
        assert!(native - used_1 <= 100);
    }

    #[test]
    fn test_price_for_single_sided_amounts() {
        let sa = sqrt_ratio_at_tick(-600).unwrap();
        let sb = sqrt_ratio_at_tick(600).unwrap();
        assert_eq!(sqrt_price_for_amounts(sa, sb, 0, 10).unwrap(), sb);
        assert_eq!(sqrt_price_for_amounts(sb, sa, 10, 0).unwrap(), sa);
    }
}
