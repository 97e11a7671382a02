//! Sell a launched token for native currency

use solana_program::pubkey::Pubkey;
use tracing::debug;

use crate::constants::ZERO_ADDRESS;
use crate::error::{PartyError, PartyResult};
use crate::events::{LeaveParty, PartyEvent};
use crate::factory::PartyFactory;
use crate::host::{ExactInputParams, Host};
use crate::logic::route_for;

pub fn handler<H: Host>(
    factory: &mut PartyFactory,
    host: &mut H,
    seller: Pubkey,
    token_in: Pubkey,
    amount_in: u128,
    minimum_out: u128,
) -> PartyResult<u128> {
    factory.require_not_paused()?;
    if token_in == ZERO_ADDRESS {
        return Err(PartyError::ZeroAddress);
    }
    if amount_in == 0 {
        return Err(PartyError::ZeroAmount);
    }
    let record = factory.state.store.get(&token_in)?;
    let route = route_for(record, &factory.state.wiring, &factory.config)?;

    let this = factory.address;
    host.transfer_from(&token_in, &this, &seller, &this, amount_in)?;
    host.approve(&token_in, &this, &route.router, amount_in)?;

    // Output lands on the router, which unwraps all of it to the seller
    let params = ExactInputParams {
        token_in,
        token_out: factory.config.wrapped_native,
        fee: route.fee,
        recipient: route.router,
        amount_in,
        amount_out_minimum: minimum_out,
    };
    host.exact_input(&route.router, &this, &params, 0)?;
    let amount_out = host.unwrap_wrapped_native(&route.router, minimum_out, &seller)?;
    debug!(token = %token_in, %seller, amount_in, amount_out, venue = ?route.kind, "sell routed");

    factory.state.emit(PartyEvent::LeaveParty(LeaveParty {
        seller,
        token: token_in,
        pool: route.pool,
        amount_in,
        amount_out,
    }));
    Ok(amount_out)
}
