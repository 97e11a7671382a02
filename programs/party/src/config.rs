use std::fs;
use std::path::Path;

use ethnum::U256;
use party_math::{tick_spacing_for_fee, MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK};
use serde::{Deserialize, Serialize};
use solana_program::pubkey::Pubkey;

use crate::constants::*;
use crate::error::{PartyError, PartyResult};
use crate::utils::serde_helpers::{pubkey_string, u128_string, u256_string};

/// Launch configuration, fixed for the lifetime of a factory
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PartyConfig {
    /// Cumulative native contribution that triggers migration
    #[serde(with = "u128_string")]
    pub party_target: u128,

    /// Native fee charged by `create_party`
    #[serde(with = "u128_string")]
    pub create_token_fee: u128,

    /// Fee tier of the bonded pools
    pub party_lp_fee: u32,

    /// Fee tier of the public pools
    pub lp_fee: u32,

    /// Supply minted for every launched token
    #[serde(with = "u128_string")]
    pub initial_token_amount: u128,

    /// Launch price with the launched token as token0
    #[serde(with = "u256_string")]
    pub sqrt_price_x96: U256,

    /// Paid to the caller whose buy reaches the target
    #[serde(with = "u128_string")]
    pub bonus_target_reach: u128,

    /// Paid to the launch creator when the target is reached
    #[serde(with = "u128_string")]
    pub bonus_party_creator: u128,

    /// Protocol fee taken when the target is reached
    #[serde(with = "u128_string")]
    pub target_reach_fee: u128,

    /// Wrapped native token every launch is paired against
    #[serde(with = "pubkey_string")]
    pub wrapped_native: Pubkey,

    /// Bonded position range, launched token as token0
    pub party_ticks: TickRange,

    /// Public position range, launched token as token0
    #[serde(default = "TickRange::full_range")]
    pub public_ticks: TickRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct TickRange {
    pub lower: i32,
    pub upper: i32,
}

impl TickRange {
    pub const fn new(lower: i32, upper: i32) -> Self {
        Self { lower, upper }
    }

    pub fn full_range() -> Self {
        Self::new(DEFAULT_PUBLIC_TICKS.0, DEFAULT_PUBLIC_TICKS.1)
    }

    /// The same range seen with token0 and token1 swapped
    pub fn mirrored(&self) -> Self {
        let (lower, upper) = party_math::mirror_tick_range(self.lower, self.upper);
        Self::new(lower, upper)
    }

    fn validate(&self, fee: u32) -> PartyResult<()> {
        let spacing = tick_spacing_for_fee(fee).map_err(|_| PartyError::UnsupportedFeeTier(fee))?;
        let invalid = PartyError::InvalidTickRange {
            lower: self.lower,
            upper: self.upper,
        };
        if self.lower >= self.upper || self.lower < MIN_TICK || self.upper > MAX_TICK {
            return Err(invalid);
        }
        if self.lower % spacing != 0 || self.upper % spacing != 0 {
            return Err(invalid);
        }
        Ok(())
    }
}

impl PartyConfig {
    /// Production defaults paired against `wrapped_native`
    pub fn with_defaults(wrapped_native: Pubkey) -> Self {
        Self {
            party_target: DEFAULT_PARTY_TARGET,
            create_token_fee: DEFAULT_CREATE_TOKEN_FEE,
            party_lp_fee: DEFAULT_PARTY_LP_FEE,
            lp_fee: DEFAULT_LP_FEE,
            initial_token_amount: DEFAULT_INITIAL_TOKEN_AMOUNT,
            sqrt_price_x96: U256::from(DEFAULT_SQRT_PRICE_X96),
            bonus_target_reach: DEFAULT_BONUS_TARGET_REACH,
            bonus_party_creator: DEFAULT_BONUS_PARTY_CREATOR,
            target_reach_fee: DEFAULT_TARGET_REACH_FEE,
            wrapped_native,
            party_ticks: TickRange::new(DEFAULT_PARTY_TICKS.0, DEFAULT_PARTY_TICKS.1),
            public_ticks: TickRange::full_range(),
        }
    }

    /// Load and validate configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> PartyResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            PartyError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> PartyResult<Self> {
        let config: PartyConfig = toml::from_str(content)
            .map_err(|e| PartyError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> PartyResult<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| PartyError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, content).map_err(|e| {
            PartyError::Config(format!("Failed to write config file {}: {}", path.display(), e))
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> PartyResult<()> {
        if self.wrapped_native == ZERO_ADDRESS {
            return Err(PartyError::ZeroAddress);
        }

        if self.party_target == 0 || self.initial_token_amount == 0 || self.sqrt_price_x96 == U256::ZERO
        {
            return Err(PartyError::ZeroAmount);
        }

        let payouts = self
            .bonus_party_creator
            .checked_add(self.bonus_target_reach)
            .and_then(|sum| sum.checked_add(self.target_reach_fee));
        match payouts {
            Some(total) if total < self.party_target => {}
            _ => return Err(PartyError::BonusGreaterThanTarget),
        }

        self.party_ticks.validate(self.party_lp_fee)?;
        self.public_ticks.validate(self.lp_fee)?;

        if self.sqrt_price_x96 < MIN_SQRT_RATIO || self.sqrt_price_x96 >= MAX_SQRT_RATIO {
            return Err(PartyError::InvalidSqrtPrice);
        }

        Ok(())
    }
}
