//! # Swap Math
//!
//! Exact-input swap step within a single liquidity segment. The fee is charged
//! on the input side in hundredths of a basis point.

use ethnum::U256;

use crate::big_int::{div_rounding_up, mul_div, Rounding};
use crate::constants::{FEE_DENOMINATOR, Q96};
use crate::error::{MathError, MathResult};
use crate::liquidity_math::{get_amount_0_delta, get_amount_1_delta};

/// Outcome of one swap step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapStep {
    pub sqrt_price_next_x96: U256,
    pub amount_in: u128,
    pub amount_out: u128,
    pub fee_amount: u128,
}

/// Price after adding `amount_in` of the input token at constant liquidity
///
/// Token0 in (`zero_for_one`) pushes the price down and rounds up; token1 in
/// pushes it up and rounds down, so the pool never gives away extra output.
pub fn next_sqrt_price_from_input(
    sqrt_price_x96: U256,
    liquidity: u128,
    amount_in: u128,
    zero_for_one: bool,
) -> MathResult<U256> {
    if sqrt_price_x96 == U256::ZERO {
        return Err(MathError::InvalidSqrtPrice);
    }
    if liquidity == 0 {
        return Err(MathError::ZeroLiquidity);
    }
    if amount_in == 0 {
        return Ok(sqrt_price_x96);
    }

    if zero_for_one {
        let numerator1 = U256::from(liquidity) << 96u32;
        match U256::from(amount_in).checked_mul(sqrt_price_x96) {
            Some(product) => match numerator1.checked_add(product) {
                Some(denominator) => mul_div(numerator1, sqrt_price_x96, denominator, Rounding::Up),
                None => div_rounding_up(
                    numerator1,
                    (numerator1 / sqrt_price_x96) + U256::from(amount_in),
                ),
            },
            None => div_rounding_up(
                numerator1,
                (numerator1 / sqrt_price_x96) + U256::from(amount_in),
            ),
        }
    } else {
        let quotient = mul_div(U256::from(amount_in), Q96, U256::from(liquidity), Rounding::Down)?;
        sqrt_price_x96
            .checked_add(quotient)
            .ok_or(MathError::MathOverflow)
    }
}

/// Swap `amount_remaining` of input from `sqrt_price_current_x96` towards
/// `sqrt_price_target_x96`, stopping at the target if the input suffices
pub fn compute_swap_step(
    sqrt_price_current_x96: U256,
    sqrt_price_target_x96: U256,
    liquidity: u128,
    amount_remaining: u128,
    fee_pips: u32,
) -> MathResult<SwapStep> {
    if fee_pips >= FEE_DENOMINATOR {
        return Err(MathError::UnsupportedFeeTier(fee_pips));
    }

    let zero_for_one = sqrt_price_current_x96 >= sqrt_price_target_x96;
    let fee_complement = U256::from(FEE_DENOMINATOR - fee_pips);
    let denominator = U256::from(FEE_DENOMINATOR);

    let amount_remaining_less_fee = crate::big_int::to_u128(mul_div(
        U256::from(amount_remaining),
        fee_complement,
        denominator,
        Rounding::Down,
    )?)?;

    let amount_in_to_target = if zero_for_one {
        get_amount_0_delta(sqrt_price_target_x96, sqrt_price_current_x96, liquidity, true)?
    } else {
        get_amount_1_delta(sqrt_price_current_x96, sqrt_price_target_x96, liquidity, true)?
    };

    let sqrt_price_next_x96 = if amount_remaining_less_fee >= amount_in_to_target {
        sqrt_price_target_x96
    } else {
        next_sqrt_price_from_input(
            sqrt_price_current_x96,
            liquidity,
            amount_remaining_less_fee,
            zero_for_one,
        )?
    };
    let reached_target = sqrt_price_next_x96 == sqrt_price_target_x96;

    let (amount_in, amount_out) = if zero_for_one {
        (
            if reached_target {
                amount_in_to_target
            } else {
                get_amount_0_delta(sqrt_price_next_x96, sqrt_price_current_x96, liquidity, true)?
            },
            get_amount_1_delta(sqrt_price_next_x96, sqrt_price_current_x96, liquidity, false)?,
        )
    } else {
        (
            if reached_target {
                amount_in_to_target
            } else {
                get_amount_1_delta(sqrt_price_current_x96, sqrt_price_next_x96, liquidity, true)?
            },
            get_amount_0_delta(sqrt_price_current_x96, sqrt_price_next_x96, liquidity, false)?,
        )
    };

    let fee_amount = if reached_target {
        crate::big_int::to_u128(mul_div(
            U256::from(amount_in),
            U256::from(fee_pips),
            fee_complement,
            Rounding::Up,
        )?)?
    } else {
        // Whatever input did not move the price is kept as fee
        amount_remaining
            .checked_sub(amount_in)
            .ok_or(MathError::MathUnderflow)?
    };

    Ok(SwapStep {
        sqrt_price_next_x96,
        amount_in,
        amount_out,
        fee_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::liquidity_math::get_liquidity_for_amounts;
    use crate::tick_math::sqrt_ratio_at_tick;

    const ONE: u128 = 1_000_000_000_000_000_000;

    #[test]
    fn test_zero_liquidity_jumps_to_target() {
        let from = sqrt_ratio_at_tick(-120_000).unwrap();
        let to = sqrt_ratio_at_tick(-92_200).unwrap();
        let step = compute_swap_step(from, to, 0, ONE, 10_000).unwrap();
        assert_eq!(step.sqrt_price_next_x96, to);
        assert_eq!(step.amount_in, 0);
        assert_eq!(step.amount_out, 0);
        assert_eq!(step.fee_amount, 0);
    }

    #[test]
    fn test_one_percent_fee_inside_range() {
        let sa = sqrt_ratio_at_tick(-92_200).unwrap();
        let sb = sqrt_ratio_at_tick(0).unwrap();
        let liquidity =
            get_liquidity_for_amounts(sa, sa, sb, 10_000_000 * ONE, 0).unwrap();

        let step = compute_swap_step(sa, sb, liquidity, 91 * ONE, 10_000).unwrap();
        assert!(step.sqrt_price_next_x96 < sb);
        assert_eq!(step.amount_in + step.fee_amount, 91 * ONE);
        assert_eq!(step.fee_amount, 91 * ONE / 100);
        assert!(step.amount_out > 0);
    }

    #[test]
    fn test_directions_are_symmetric_in_shape() {
        let price = sqrt_ratio_at_tick(0).unwrap();
        let down = sqrt_ratio_at_tick(-600).unwrap();
        let up = sqrt_ratio_at_tick(600).unwrap();
        let liquidity = 1_000 * ONE;

        let sell = compute_swap_step(price, down, liquidity, ONE, 3_000).unwrap();
        let buy = compute_swap_step(price, up, liquidity, ONE, 3_000).unwrap();
        assert!(sell.sqrt_price_next_x96 < price);
        assert!(buy.sqrt_price_next_x96 > price);
        assert!(sell.amount_out < ONE && buy.amount_out < ONE);
    }

    #[test]
    fn test_next_price_requires_liquidity() {
        assert_eq!(
            next_sqrt_price_from_input(Q96, 0, 1, true),
            Err(MathError::ZeroLiquidity)
        );
        assert_eq!(next_sqrt_price_from_input(Q96, 1, 0, false).unwrap(), Q96);
    }
}
