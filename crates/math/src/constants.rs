//! Protocol-wide numeric constants

use ethnum::U256;

/// 2^96, the Q64.96 unit
pub const Q96: U256 = U256::from_words(0, 1u128 << 96);

/// 2^128, the Q128 unit used by fee-growth accumulators
pub const Q128: U256 = U256::from_words(1, 0);

/// 2^192, the square of the Q64.96 unit
pub const Q192: U256 = U256::from_words(1u128 << 64, 0);

/// Lowest tick representable by a Q64.96 square-root price
pub const MIN_TICK: i32 = -887_272;

/// Highest tick representable by a Q64.96 square-root price
pub const MAX_TICK: i32 = 887_272;

/// `sqrt_ratio_at_tick(MIN_TICK)`
pub const MIN_SQRT_RATIO: U256 = U256::from_words(0, 4_295_128_739);

/// `sqrt_ratio_at_tick(MAX_TICK)`
pub const MAX_SQRT_RATIO: U256 =
    U256::from_words(0xFFFD_8963, 0xEFD1_FC6A_5064_8849_5D95_1D52_6398_8D26);

/// Fee tiers are expressed in hundredths of a basis point
pub const FEE_DENOMINATOR: u32 = 1_000_000;

/// Fixed-point scale used when printing decoded prices
pub const PRICE_SCALE: u128 = 1_000_000_000_000_000_000;

/// Fee tiers accepted by the launch factory, with their tick spacing
pub const SUPPORTED_FEE_TIERS: [(u32, i32); 5] =
    [(100, 1), (500, 10), (2_500, 50), (3_000, 60), (10_000, 200)];
