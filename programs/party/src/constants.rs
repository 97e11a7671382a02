//! Factory constants

use solana_program::pubkey::Pubkey;

pub use party_math::{FEE_DENOMINATOR, MAX_TICK, MIN_TICK, Q128, Q96, SUPPORTED_FEE_TIERS};

/// The all-zero address, used as "unset" by collaborators and callers
pub const ZERO_ADDRESS: Pubkey = Pubkey::new_from_array([0u8; 32]);

/// Default funding target: 90 native units
pub const DEFAULT_PARTY_TARGET: u128 = 90_000_000_000_000_000_000;

/// Default fee charged for creating a token
pub const DEFAULT_CREATE_TOKEN_FEE: u128 = 10_000_000_000_000_000;

/// Default supply minted for every launched token
pub const DEFAULT_INITIAL_TOKEN_AMOUNT: u128 = 10_000_000_000_000_000_000_000_000;

/// Default bonded-pool fee tier (1%)
pub const DEFAULT_PARTY_LP_FEE: u32 = 10_000;

/// Default public-pool fee tier (1%)
pub const DEFAULT_LP_FEE: u32 = 10_000;

/// Default launch price, Q64.96, with the launched token as token0
pub const DEFAULT_SQRT_PRICE_X96: u128 = 25_052_911_542_910_170_730_777_872;

/// Default bonded-position tick range
pub const DEFAULT_PARTY_TICKS: (i32, i32) = (-92_200, 0);

/// Default public-position tick range (full range at spacing 200)
pub const DEFAULT_PUBLIC_TICKS: (i32, i32) = (-887_200, 887_200);

/// Default bonus for the caller whose buy reaches the target
pub const DEFAULT_BONUS_TARGET_REACH: u128 = 50_000_000_000_000_000;

/// Default bonus for the launch creator
pub const DEFAULT_BONUS_PARTY_CREATOR: u128 = 10_000_000_000_000_000;

/// Default protocol fee taken when the target is reached
pub const DEFAULT_TARGET_REACH_FEE: u128 = 100_000_000_000_000_000;

/// Flat rounding allowance, per side, for migration leftovers paid to the crosser
pub const MAX_MIGRATION_DUST: u128 = 5;

/// Liquidity units whose value at the launch curve also counts as migration dust
pub const DUST_LIQUIDITY: u128 = 3;
