//! Big integer operations for high-precision math
//!
//! `ethnum` gives us native 256-bit arithmetic; products of two 256-bit values
//! are carried as a (hi, lo) pair so `mul_div` never loses precision.

use ethnum::U256;

use crate::error::{MathError, MathResult};

/// Rounding mode for division operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Round down (towards zero)
    Down,
    /// Round up (away from zero)
    Up,
}

/// Full 512-bit product of two 256-bit values, returned as `(hi, lo)`
pub fn full_mul(a: U256, b: U256) -> (U256, U256) {
    let (a1, a0) = a.into_words();
    let (b1, b0) = b.into_words();

    let p00 = U256::from(a0) * U256::from(b0);
    let p01 = U256::from(a0) * U256::from(b1);
    let p10 = U256::from(a1) * U256::from(b0);
    let p11 = U256::from(a1) * U256::from(b1);

    let (mid, mid_carry) = p01.overflowing_add(p10);
    let (mid_hi, mid_lo) = mid.into_words();

    let (lo, lo_carry) = p00.overflowing_add(U256::from_words(mid_lo, 0));
    // The true product is below 2^512 so the high half cannot wrap
    let hi = p11
        .wrapping_add(U256::from_words(mid_carry as u128, mid_hi))
        .wrapping_add(U256::from(lo_carry as u128));

    (hi, lo)
}

/// Compute `a * b / denominator` with a 512-bit intermediate product
pub fn mul_div(a: U256, b: U256, denominator: U256, rounding: Rounding) -> MathResult<U256> {
    if denominator == U256::ZERO {
        return Err(MathError::DivisionByZero);
    }

    let (hi, lo) = full_mul(a, b);

    let (quotient, remainder) = if hi == U256::ZERO {
        (lo / denominator, lo % denominator)
    } else {
        if hi >= denominator {
            return Err(MathError::MulDivOverflow);
        }
        div_wide(hi, lo, denominator)
    };

    match rounding {
        Rounding::Up if remainder != U256::ZERO => quotient
            .checked_add(U256::ONE)
            .ok_or(MathError::MulDivOverflow),
        _ => Ok(quotient),
    }
}

/// Restoring long division of `hi * 2^256 + lo` by `d`, requires `hi < d`
fn div_wide(hi: U256, lo: U256, d: U256) -> (U256, U256) {
    let mut rem = hi;
    let mut quotient = U256::ZERO;

    for bit in (0..256u32).rev() {
        let carry = (rem >> 255u32) != U256::ZERO;
        rem = (rem << 1u32) | ((lo >> bit) & U256::ONE);
        quotient <<= 1u32;
        if carry || rem >= d {
            rem = rem.wrapping_sub(d);
            quotient |= U256::ONE;
        }
    }

    (quotient, rem)
}

/// `ceil(a / b)`
pub fn div_rounding_up(a: U256, b: U256) -> MathResult<U256> {
    if b == U256::ZERO {
        return Err(MathError::DivisionByZero);
    }
    let quotient = a / b;
    if a % b == U256::ZERO {
        Ok(quotient)
    } else {
        Ok(quotient + U256::ONE)
    }
}

/// Integer square root (floor) via Newton's method
pub fn isqrt(value: U256) -> U256 {
    if value < U256::from(2u128) {
        return value;
    }

    let bits = 256 - value.leading_zeros();
    let mut x = U256::ONE << ((bits + 1) / 2);
    loop {
        let y = (x + value / x) >> 1u32;
        if y >= x {
            return x;
        }
        x = y;
    }
}

/// Narrow a 256-bit value to `u128`
pub fn to_u128(value: U256) -> MathResult<u128> {
    let (hi, lo) = value.into_words();
    if hi != 0 {
        return Err(MathError::MathOverflow);
    }
    Ok(lo)
}
