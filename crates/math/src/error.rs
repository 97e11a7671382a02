//! # Math Error Types

use thiserror::Error;

/// Failures of the fixed-point primitives
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    #[error("Math overflow")]
    MathOverflow,

    #[error("Math underflow")]
    MathUnderflow,

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Mul div overflow")]
    MulDivOverflow,

    #[error("Tick {0} is outside the representable range")]
    InvalidTick(i32),

    #[error("Sqrt price is outside the representable range")]
    InvalidSqrtPrice,

    #[error("Liquidity must be non-zero")]
    ZeroLiquidity,

    #[error("Fee tier {0} is not supported")]
    UnsupportedFeeTier(u32),
}

pub type MathResult<T> = Result<T, MathError>;
