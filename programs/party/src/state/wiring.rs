//! One-time venue wiring
//!
//! Each collaborator address is written exactly once by the owner. The slot
//! state is explicit so "never configured" and "configured" cannot be confused
//! with a zero address.

use solana_program::pubkey::Pubkey;

use crate::constants::ZERO_ADDRESS;
use crate::error::{PartyError, PartyResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WiringSlot {
    #[default]
    Unset,
    Set(Pubkey),
}

impl WiringSlot {
    pub fn is_set(&self) -> bool {
        matches!(self, WiringSlot::Set(_))
    }

    /// Address in the slot, `ZeroAddress` while unset
    pub fn get(&self) -> PartyResult<Pubkey> {
        match self {
            WiringSlot::Set(address) => Ok(*address),
            WiringSlot::Unset => Err(PartyError::ZeroAddress),
        }
    }

    /// Address in the slot, or the zero address
    pub fn address(&self) -> Pubkey {
        match self {
            WiringSlot::Set(address) => *address,
            WiringSlot::Unset => ZERO_ADDRESS,
        }
    }

    fn fill(&mut self, address: Pubkey, already_set: PartyError) -> PartyResult<()> {
        if address == ZERO_ADDRESS {
            return Err(PartyError::ZeroAddress);
        }
        if self.is_set() {
            return Err(already_set);
        }
        *self = WiringSlot::Set(address);
        Ok(())
    }
}

/// Addresses of both liquidity venues
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VenueWiring {
    pub bonded_position_manager: WiringSlot,
    pub public_position_manager: WiringSlot,
    pub bonded_swap_router: WiringSlot,
    pub public_swap_router: WiringSlot,
}

impl VenueWiring {
    /// Both position managers are wired together, once
    pub fn set_position_managers(&mut self, bonded: Pubkey, public: Pubkey) -> PartyResult<()> {
        if bonded == ZERO_ADDRESS || public == ZERO_ADDRESS {
            return Err(PartyError::ZeroAddress);
        }
        if self.bonded_position_manager.is_set() || self.public_position_manager.is_set() {
            return Err(PartyError::PositionManagerAlreadySet);
        }
        self.bonded_position_manager = WiringSlot::Set(bonded);
        self.public_position_manager = WiringSlot::Set(public);
        Ok(())
    }

    pub fn set_bonded_swap_router(&mut self, router: Pubkey) -> PartyResult<()> {
        self.bonded_swap_router.fill(router, PartyError::AlreadySet)
    }

    pub fn set_public_swap_router(&mut self, router: Pubkey) -> PartyResult<()> {
        self.public_swap_router.fill(router, PartyError::AlreadySet)
    }
}
