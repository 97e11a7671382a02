//! Launch factory
//!
//! `PartyFactory` owns the record store, venue wiring and protocol fee bucket.
//! Every mutating entrypoint runs as one unit of work: the factory state and
//! the host are both rolled back if any step fails.

use ethnum::U256;
use party_math::calculate_fees;
use solana_program::pubkey::Pubkey;
use tracing::info;

use crate::config::PartyConfig;
use crate::constants::ZERO_ADDRESS;
use crate::error::{PartyError, PartyResult};
use crate::events::PartyEvent;
use crate::host::{ConcentratedLiquidity, Host};
use crate::instructions::{admin, create_party, join_party, leave_party, withdraw_fee, LaunchReceipt};
use crate::logic::{atomically, locally, owed_fees, CollectedFees};
use crate::state::{FactoryState, FeeCheckpoint, PartyRecord, PartyStore, VenueKind, VenueWiring};

/// Caller identity and attached native value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Call {
    pub caller: Pubkey,
    pub value: u128,
}

impl Call {
    pub const fn new(caller: Pubkey, value: u128) -> Self {
        Self { caller, value }
    }
}

#[derive(Debug, Clone)]
pub struct PartyFactory {
    pub(crate) address: Pubkey,
    pub(crate) owner: Pubkey,
    pub(crate) config: PartyConfig,
    pub(crate) state: FactoryState,
    published: Vec<PartyEvent>,
}

impl PartyFactory {
    /// Create a factory living at `address`, administered by `owner`
    pub fn new(address: Pubkey, owner: Pubkey, config: PartyConfig) -> PartyResult<Self> {
        if address == ZERO_ADDRESS || owner == ZERO_ADDRESS {
            return Err(PartyError::ZeroAddress);
        }
        config.validate()?;

        info!(
            %address,
            %owner,
            party_target = config.party_target,
            create_token_fee = config.create_token_fee,
            "party factory deployed"
        );
        Ok(Self {
            address,
            owner,
            config,
            state: FactoryState::default(),
            published: Vec::new(),
        })
    }

    pub(crate) fn require_owner(&self, caller: &Pubkey) -> PartyResult<()> {
        if *caller != self.owner {
            return Err(PartyError::Unauthorized);
        }
        Ok(())
    }

    pub(crate) fn require_not_paused(&self) -> PartyResult<()> {
        if self.state.paused {
            return Err(PartyError::EnforcedPause);
        }
        Ok(())
    }

    pub(crate) fn publish(&mut self, events: Vec<PartyEvent>) {
        self.published.extend(events);
    }

    // ========================================================================
    // User-facing operations
    // ========================================================================

    /// Launch a token; value above the creation fee buys tokens for the caller
    pub fn create_party<H: Host>(
        &mut self,
        host: &mut H,
        call: Call,
        name: &str,
        symbol: &str,
    ) -> PartyResult<LaunchReceipt> {
        atomically(self, host, "create_party", |factory, host| {
            create_party::handler(factory, host, call, name, symbol)
        })
    }

    /// Buy `token_out` with the attached native value
    pub fn join_party<H: Host>(
        &mut self,
        host: &mut H,
        call: Call,
        token_out: Pubkey,
        minimum_out: u128,
    ) -> PartyResult<u128> {
        atomically(self, host, "join_party", |factory, host| {
            join_party::handler(factory, host, call, token_out, minimum_out)
        })
    }

    /// Sell `amount_in` of `token_in`; the factory must hold an allowance for it
    pub fn leave_party<H: Host>(
        &mut self,
        host: &mut H,
        seller: Pubkey,
        token_in: Pubkey,
        amount_in: u128,
        minimum_out: u128,
    ) -> PartyResult<u128> {
        atomically(self, host, "leave_party", |factory, host| {
            leave_party::handler(factory, host, seller, token_in, amount_in, minimum_out)
        })
    }

    // ========================================================================
    // Owner operations
    // ========================================================================

    pub fn withdraw_fee<H: Host>(&mut self, host: &mut H, caller: Pubkey) -> PartyResult<u128> {
        atomically(self, host, "withdraw_fee", |factory, host| {
            withdraw_fee::withdraw_fee(factory, host, caller)
        })
    }

    pub fn withdraw_party_lp_fee<H: Host>(
        &mut self,
        host: &mut H,
        caller: Pubkey,
        pools: &[Pubkey],
    ) -> PartyResult<Vec<CollectedFees>> {
        atomically(self, host, "withdraw_party_lp_fee", |factory, host| {
            withdraw_fee::withdraw_party_lp_fee(factory, host, caller, pools)
        })
    }

    pub fn withdraw_lp_fee<H: Host>(
        &mut self,
        host: &mut H,
        caller: Pubkey,
        pools: &[Pubkey],
    ) -> PartyResult<Vec<CollectedFees>> {
        atomically(self, host, "withdraw_lp_fee", |factory, host| {
            withdraw_fee::withdraw_lp_fee(factory, host, caller, pools)
        })
    }

    pub fn set_nonfungible_position_manager(
        &mut self,
        caller: Pubkey,
        bonded: Pubkey,
        public: Pubkey,
    ) -> PartyResult<()> {
        locally(self, "set_nonfungible_position_manager", |factory| {
            admin::set_nonfungible_position_manager(factory, caller, bonded, public)
        })
    }

    /// Wire the public venue's router
    pub fn set_swap_router(&mut self, caller: Pubkey, router: Pubkey) -> PartyResult<()> {
        locally(self, "set_swap_router", |factory| {
            admin::set_swap_router(factory, caller, router)
        })
    }

    /// Wire the bonded venue's router
    pub fn set_bnb_party_swap_router(&mut self, caller: Pubkey, router: Pubkey) -> PartyResult<()> {
        locally(self, "set_bnb_party_swap_router", |factory| {
            admin::set_bnb_party_swap_router(factory, caller, router)
        })
    }

    pub fn pause(&mut self, caller: Pubkey) -> PartyResult<()> {
        locally(self, "pause", |factory| admin::pause(factory, caller))
    }

    pub fn unpause(&mut self, caller: Pubkey) -> PartyResult<()> {
        locally(self, "unpause", |factory| admin::unpause(factory, caller))
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn address(&self) -> Pubkey {
        self.address
    }

    pub fn owner(&self) -> Pubkey {
        self.owner
    }

    /// Launch configuration
    pub fn party(&self) -> &PartyConfig {
        &self.config
    }

    pub fn wiring(&self) -> &VenueWiring {
        &self.state.wiring
    }

    pub fn fee_bucket(&self) -> u128 {
        self.state.fee_bucket
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused
    }

    pub fn party_record(&self, token: &Pubkey) -> PartyResult<&PartyRecord> {
        self.state.store.get(token)
    }

    pub fn parties(&self) -> impl Iterator<Item = &PartyRecord> {
        self.state.store.iter()
    }

    /// Read-only view of the records; also the guard handed to the bonded router
    pub fn store(&self) -> &PartyStore {
        &self.state.store
    }

    pub fn is_token_on_party_lp(&self, token: &Pubkey) -> bool {
        self.state.store.is_token_on_party_lp(token)
    }

    /// Committed events, oldest first
    pub fn events(&self) -> &[PartyEvent] {
        &self.published
    }

    pub fn take_events(&mut self) -> Vec<PartyEvent> {
        std::mem::take(&mut self.published)
    }

    /// `floor(liquidity * fee_growth_delta / 2^128)`
    pub fn calculate_fees(liquidity: u128, fee_growth_delta_x128: U256) -> U256 {
        calculate_fees(liquidity, fee_growth_delta_x128)
    }

    /// Stored checkpoint for `pool` under the venue managed by `position_manager`
    ///
    /// Zero for a zero or unknown pool or manager.
    pub fn fee_growth_inside_last_x128(&self, pool: &Pubkey, position_manager: &Pubkey) -> FeeCheckpoint {
        if *pool == ZERO_ADDRESS || *position_manager == ZERO_ADDRESS {
            return FeeCheckpoint::default();
        }
        let kind = if self.state.wiring.bonded_position_manager.address() == *position_manager {
            VenueKind::Bonded
        } else if self.state.wiring.public_position_manager.address() == *position_manager {
            VenueKind::Public
        } else {
            return FeeCheckpoint::default();
        };
        self.state
            .store
            .position_for_pool(pool, kind)
            .map(|position| position.checkpoint)
            .unwrap_or_default()
    }

    /// Whether the wrapped native token is token0 of `pool`
    pub fn is_token0_wrapped_native<H>(&self, host: &H, pool: &Pubkey) -> PartyResult<bool>
    where
        H: ConcentratedLiquidity + ?Sized,
    {
        if *pool == ZERO_ADDRESS {
            return Err(PartyError::ZeroAddress);
        }
        Ok(host.pool_state(pool)?.token0 == self.config.wrapped_native)
    }

    /// Fees the factory's position in `pool` has earned since its checkpoint
    pub fn unclaimed_fees<H>(&self, host: &H, pool: &Pubkey) -> PartyResult<(U256, U256)>
    where
        H: ConcentratedLiquidity + ?Sized,
    {
        for kind in [VenueKind::Bonded, VenueKind::Public] {
            let position = match self.state.store.position_for_pool(pool, kind) {
                Some(position) => position,
                None => continue,
            };
            let manager = match kind {
                VenueKind::Bonded => self.state.wiring.bonded_position_manager.get()?,
                VenueKind::Public => self.state.wiring.public_position_manager.get()?,
            };
            // A migrated bonded position no longer exists
            if kind == VenueKind::Bonded
                && self.state.store.record_for_pool(pool, kind).map(|r| r.is_graduated()) == Some(true)
            {
                return Ok((U256::ZERO, U256::ZERO));
            }
            return owed_fees(host, &manager, position);
        }
        Err(PartyError::PositionNotFound)
    }
}
