//! Event definitions
//!
//! Events are buffered inside the unit of work and only published once the
//! whole operation has committed.

use solana_program::pubkey::Pubkey;

/// Emitted when a token is launched; the only way to discover new tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartParty {
    pub creator: Pubkey,
    pub token: Pubkey,
    pub pool: Pubkey,
}

/// Emitted for every buy routed through the factory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinParty {
    pub buyer: Pubkey,
    pub token: Pubkey,
    pub pool: Pubkey,
    pub amount_in: u128,
    pub amount_out: u128,
}

/// Emitted for every sell routed through the factory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveParty {
    pub seller: Pubkey,
    pub token: Pubkey,
    pub pool: Pubkey,
    pub amount_in: u128,
    pub amount_out: u128,
}

/// Emitted when a launch reaches its target and moves to the public venue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartyGraduated {
    pub token: Pubkey,
    pub bonded_pool: Pubkey,
    pub public_pool: Pubkey,
    pub position_id: u64,
    pub crosser: Pubkey,
    pub token_seeded: u128,
    pub native_seeded: u128,
    pub native_fees: u128,
    /// Launched tokens the public position could not take, held by the factory
    pub token_retained: u128,
    /// Native the public position could not take, credited to the fee bucket
    pub native_retained: u128,
}

/// Emitted per pool when accrued LP fees are paid to the owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LpFeeWithdrawn {
    pub pool: Pubkey,
    pub amount0: u128,
    pub amount1: u128,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeWithdrawn {
    pub recipient: Pubkey,
    pub amount: u128,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartyEvent {
    StartParty(StartParty),
    JoinParty(JoinParty),
    LeaveParty(LeaveParty),
    PartyGraduated(PartyGraduated),
    LpFeeWithdrawn(LpFeeWithdrawn),
    FeeWithdrawn(FeeWithdrawn),
    Paused { by: Pubkey },
    Unpaused { by: Pubkey },
}
