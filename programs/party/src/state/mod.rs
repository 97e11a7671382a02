//! Factory state
//!
//! Everything the factory owns lives in `FactoryState`. A unit of work copies
//! its scalars and journals the party records it touches.

pub mod party;
pub mod store;
pub mod wiring;

pub use party::*;
pub use store::*;
pub use wiring::*;

use crate::events::PartyEvent;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactoryState {
    pub store: PartyStore,
    pub wiring: VenueWiring,
    /// Native currency owed to the protocol owner
    pub fee_bucket: u128,
    pub paused: bool,
    /// Events of the unit of work in flight
    pub pending_events: Vec<PartyEvent>,
}

impl FactoryState {
    pub fn emit(&mut self, event: PartyEvent) {
        self.pending_events.push(event);
    }

    pub fn credit_fee_bucket(&mut self, amount: u128) -> crate::error::PartyResult<()> {
        self.fee_bucket = self
            .fee_bucket
            .checked_add(amount)
            .ok_or(crate::error::PartyError::MathOverflow)?;
        Ok(())
    }
}
