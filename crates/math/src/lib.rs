//! # Party Math
//!
//! Fixed-point math shared by the launch factory and the in-memory liquidity
//! venues used in tests: 512-bit intermediate `mul_div`, Q64.96 tick math,
//! concentrated-liquidity amount/liquidity conversions, single-step swap math,
//! Q128 fee-growth accounting and sqrt-price encoding helpers.
//!
//! Square-root prices are `U256` values holding a Q64.96 number (they need up to
//! 160 bits). Token amounts and liquidity are `u128`.

pub mod big_int;
pub mod constants;
pub mod error;
pub mod fee_math;
pub mod liquidity_math;
pub mod price;
pub mod swap_math;
pub mod tick_math;

pub use big_int::{div_rounding_up, full_mul, isqrt, mul_div, to_u128, Rounding};
pub use constants::*;
pub use error::{MathError, MathResult};
pub use ethnum::U256;
pub use fee_math::{calculate_fees, fee_growth_delta, fee_growth_from_fee};
pub use liquidity_math::*;
pub use price::{
    decode_price, encode_price_sqrt, invert_sqrt_price_x96, mirror_tick_range,
    sqrt_price_for_amounts, DecodedPrice,
};
pub use swap_math::{compute_swap_step, next_sqrt_price_from_input, SwapStep};
pub use tick_math::{sqrt_ratio_at_tick, tick_at_sqrt_ratio, tick_spacing_for_fee};
