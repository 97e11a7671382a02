//! Venue selection for trades
//!
//! The record's `venue` decides where a trade goes. Balances and pool state
//! are never consulted for this.

use solana_program::pubkey::Pubkey;

use crate::config::PartyConfig;
use crate::error::PartyResult;
use crate::state::{PartyRecord, Venue, VenueKind, VenueWiring};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub kind: VenueKind,
    pub router: Pubkey,
    pub pool: Pubkey,
    pub fee: u32,
}

pub fn route_for(record: &PartyRecord, wiring: &VenueWiring, config: &PartyConfig) -> PartyResult<Route> {
    match &record.venue {
        Venue::Bonded => Ok(Route {
            kind: VenueKind::Bonded,
            router: wiring.bonded_swap_router.get()?,
            pool: record.bonded.pool,
            fee: config.party_lp_fee,
        }),
        Venue::Public(position) => Ok(Route {
            kind: VenueKind::Public,
            router: wiring.public_swap_router.get()?,
            pool: position.pool,
            fee: config.lp_fee,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PartyError;
    use crate::state::{FeeCheckpoint, LpPosition};

    #[test]
    fn test_route_follows_venue() {
        let mut config = PartyConfig::with_defaults(Pubkey::new_unique());
        config.lp_fee = 500;
        let bonded_router = Pubkey::new_unique();
        let public_router = Pubkey::new_unique();
        let mut wiring = VenueWiring::default();

        let bonded = LpPosition {
            pool: Pubkey::new_unique(),
            position_id: 1,
            checkpoint: FeeCheckpoint::default(),
        };
        let mut record = PartyRecord::new(Pubkey::new_unique(), Pubkey::new_unique(), false, bonded);

        assert_eq!(route_for(&record, &wiring, &config), Err(PartyError::ZeroAddress));
        wiring.set_bonded_swap_router(bonded_router).unwrap();
        wiring.set_public_swap_router(public_router).unwrap();

        let route = route_for(&record, &wiring, &config).unwrap();
        assert_eq!(route.kind, VenueKind::Bonded);
        assert_eq!(route.router, bonded_router);
        assert_eq!(route.pool, bonded.pool);
        assert_eq!(route.fee, 10_000);

        let public = LpPosition {
            pool: Pubkey::new_unique(),
            position_id: 2,
            checkpoint: FeeCheckpoint::default(),
        };
        record.venue = Venue::Public(public);
        let route = route_for(&record, &wiring, &config).unwrap();
        assert_eq!(route.kind, VenueKind::Public);
        assert_eq!(route.router, public_router);
        assert_eq!(route.pool, public.pool);
        assert_eq!(route.fee, 500);
    }
}
