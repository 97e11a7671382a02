//! Per-launch records

use ethnum::U256;
use party_math::{calculate_fees, fee_growth_delta};
use solana_program::pubkey::Pubkey;

use crate::host::PoolState;

/// Last observed Q128 fee-growth pair of a pool, in pool token order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeeCheckpoint {
    pub growth0_x128: U256,
    pub growth1_x128: U256,
}

impl FeeCheckpoint {
    pub const fn new(growth0_x128: U256, growth1_x128: U256) -> Self {
        Self {
            growth0_x128,
            growth1_x128,
        }
    }

    /// Checkpoint at the pool's current global growth
    pub fn at(pool: &PoolState) -> Self {
        Self::new(pool.fee_growth_global0_x128, pool.fee_growth_global1_x128)
    }

    /// Fees owed to `liquidity` for growth since this checkpoint
    pub fn owed(&self, pool: &PoolState, liquidity: u128) -> (U256, U256) {
        (
            calculate_fees(
                liquidity,
                fee_growth_delta(pool.fee_growth_global0_x128, self.growth0_x128),
            ),
            calculate_fees(
                liquidity,
                fee_growth_delta(pool.fee_growth_global1_x128, self.growth1_x128),
            ),
        )
    }
}

/// A liquidity position the factory owns in one of the venues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LpPosition {
    pub pool: Pubkey,
    pub position_id: u64,
    pub checkpoint: FeeCheckpoint,
}

/// Which venue currently carries a launch's trading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Venue {
    Bonded,
    Public(LpPosition),
}

/// Venue kind, used when a caller names a venue by its position manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VenueKind {
    Bonded,
    Public,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartyRecord {
    pub token: Pubkey,
    pub creator: Pubkey,
    /// Whether the wrapped native token sorts before the launched token
    pub wrapped_is_token0: bool,
    pub bonded: LpPosition,
    pub venue: Venue,
    /// Native currency routed to the bonded pool so far
    pub cumulative_contributed: u128,
}

impl PartyRecord {
    pub fn new(
        token: Pubkey,
        creator: Pubkey,
        wrapped_is_token0: bool,
        bonded: LpPosition,
    ) -> Self {
        Self {
            token,
            creator,
            wrapped_is_token0,
            bonded,
            venue: Venue::Bonded,
            cumulative_contributed: 0,
        }
    }

    pub fn is_graduated(&self) -> bool {
        matches!(self.venue, Venue::Public(_))
    }

    /// The position trades are currently routed to
    pub fn active_position(&self) -> &LpPosition {
        match &self.venue {
            Venue::Bonded => &self.bonded,
            Venue::Public(position) => position,
        }
    }

    pub fn active_kind(&self) -> VenueKind {
        match self.venue {
            Venue::Bonded => VenueKind::Bonded,
            Venue::Public(_) => VenueKind::Public,
        }
    }

    /// Split a pool-ordered pair into (launched token side, wrapped native side)
    pub fn split_pair<T>(&self, amount0: T, amount1: T) -> (T, T) {
        if self.wrapped_is_token0 {
            (amount1, amount0)
        } else {
            (amount0, amount1)
        }
    }
}
