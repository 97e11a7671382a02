//! # Liquidity Math
//!
//! Token amount deltas for a liquidity range and the inverse conversions used
//! when sizing a position from the tokens the caller wants to deposit.

use ethnum::U256;

use crate::big_int::{div_rounding_up, mul_div, to_u128, Rounding};
use crate::constants::Q96;
use crate::error::{MathError, MathResult};

fn ordered(a: U256, b: U256) -> (U256, U256) {
    if a > b {
        (b, a)
    } else {
        (a, b)
    }
}

/// Amount of token0 between two prices: `L * (sb - sa) / (sa * sb)`
pub fn get_amount_0_delta(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    liquidity: u128,
    round_up: bool,
) -> MathResult<u128> {
    let (sa, sb) = ordered(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    if sa == U256::ZERO {
        return Err(MathError::InvalidSqrtPrice);
    }

    let numerator1 = U256::from(liquidity) << 96u32;
    let numerator2 = sb - sa;

    let amount = if round_up {
        div_rounding_up(mul_div(numerator1, numerator2, sb, Rounding::Up)?, sa)?
    } else {
        mul_div(numerator1, numerator2, sb, Rounding::Down)? / sa
    };
    to_u128(amount)
}

/// Amount of token1 between two prices: `L * (sb - sa)`
pub fn get_amount_1_delta(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    liquidity: u128,
    round_up: bool,
) -> MathResult<u128> {
    let (sa, sb) = ordered(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    let rounding = if round_up { Rounding::Up } else { Rounding::Down };
    to_u128(mul_div(U256::from(liquidity), sb - sa, Q96, rounding)?)
}

/// Liquidity supported by `amount_0` of token0 over a price range
pub fn get_liquidity_for_amount_0(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    amount_0: u128,
) -> MathResult<u128> {
    let (sa, sb) = ordered(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    if sa == sb {
        return Err(MathError::DivisionByZero);
    }
    let intermediate = mul_div(sa, sb, Q96, Rounding::Down)?;
    to_u128(mul_div(U256::from(amount_0), intermediate, sb - sa, Rounding::Down)?)
}

/// Liquidity supported by `amount_1` of token1 over a price range
pub fn get_liquidity_for_amount_1(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    amount_1: u128,
) -> MathResult<u128> {
    let (sa, sb) = ordered(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    if sa == sb {
        return Err(MathError::DivisionByZero);
    }
    to_u128(mul_div(U256::from(amount_1), Q96, sb - sa, Rounding::Down)?)
}

/// Largest liquidity both amounts can back at the current price
pub fn get_liquidity_for_amounts(
    sqrt_price_x96: U256,
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    amount_0: u128,
    amount_1: u128,
) -> MathResult<u128> {
    let (sa, sb) = ordered(sqrt_ratio_a_x96, sqrt_ratio_b_x96);

    if sqrt_price_x96 <= sa {
        get_liquidity_for_amount_0(sa, sb, amount_0)
    } else if sqrt_price_x96 < sb {
        let liquidity_0 = get_liquidity_for_amount_0(sqrt_price_x96, sb, amount_0)?;
        let liquidity_1 = get_liquidity_for_amount_1(sa, sqrt_price_x96, amount_1)?;
        Ok(liquidity_0.min(liquidity_1))
    } else {
        get_liquidity_for_amount_1(sa, sb, amount_1)
    }
}

/// Token amounts backing `liquidity` at the current price
///
/// Rounds up, which is what a venue charges when the liquidity is minted.
pub fn get_amounts_for_liquidity(
    sqrt_price_x96: U256,
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    liquidity: u128,
    round_up: bool,
) -> MathResult<(u128, u128)> {
    let (sa, sb) = ordered(sqrt_ratio_a_x96, sqrt_ratio_b_x96);

    if sqrt_price_x96 <= sa {
        Ok((get_amount_0_delta(sa, sb, liquidity, round_up)?, 0))
    } else if sqrt_price_x96 < sb {
        Ok((
            get_amount_0_delta(sqrt_price_x96, sb, liquidity, round_up)?,
            get_amount_1_delta(sa, sqrt_price_x96, liquidity, round_up)?,
        ))
    } else {
        Ok((0, get_amount_1_delta(sa, sb, liquidity, round_up)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tick_math::sqrt_ratio_at_tick;

    #[test]
    fn test_amount_deltas() {
        let sa = sqrt_ratio_at_tick(-600).unwrap();
        let sb = sqrt_ratio_at_tick(600).unwrap();
        let liquidity = 1_000_000_000_000_000_000u128;

        let down = get_amount_0_delta(sa, sb, liquidity, false).unwrap();
        let up = get_amount_0_delta(sb, sa, liquidity, true).unwrap();
        assert!(up == down || up == down + 1);

        let down = get_amount_1_delta(sa, sb, liquidity, false).unwrap();
        let up = get_amount_1_delta(sa, sb, liquidity, true).unwrap();
        assert!(up == down || up == down + 1);
    }

    #[test]
    fn test_single_sided_launch_position() {
        // Whole supply deposited below the range of a [-92200, 0] position
        let sa = sqrt_ratio_at_tick(-92_200).unwrap();
        let sb = sqrt_ratio_at_tick(0).unwrap();
        let price: U256 = "25052911542910170730777872".parse().unwrap();
        let supply = 10_000_000_000_000_000_000_000_000u128;

        let liquidity = get_liquidity_for_amounts(price, sa, sb, supply, 0).unwrap();
        assert_eq!(liquidity, 100_541_928_785_436_464_005_233);

        let (used_0, used_1) = get_amounts_for_liquidity(price, sa, sb, liquidity, true).unwrap();
        assert_eq!(used_1, 0);
        assert_eq!(supply - used_0, 33);
    }

    #[test]
    fn test_liquidity_round_trip_inside_range() {
        let sa = sqrt_ratio_at_tick(-887_200).unwrap();
        let sb = sqrt_ratio_at_tick(887_200).unwrap();
        let price = sqrt_ratio_at_tick(1_000).unwrap();
        let liquidity =
            get_liquidity_for_amounts(price, sa, sb, 5_000_000_000_000, 7_000_000_000_000).unwrap();
        let (a0, a1) = get_amounts_for_liquidity(price, sa, sb, liquidity, true).unwrap();
        assert!(a0 <= 5_000_000_000_000);
        assert!(a1 <= 7_000_000_000_000);
    }
}
