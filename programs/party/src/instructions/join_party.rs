//! Buy a launched token with native currency

use solana_program::pubkey::Pubkey;
use tracing::debug;

use crate::constants::ZERO_ADDRESS;
use crate::error::{PartyError, PartyResult};
use crate::events::{JoinParty, PartyEvent};
use crate::factory::{Call, PartyFactory};
use crate::host::{ExactInputParams, Host};
use crate::logic::{migrate, route_for};
use crate::state::VenueKind;

pub fn handler<H: Host>(
    factory: &mut PartyFactory,
    host: &mut H,
    call: Call,
    token_out: Pubkey,
    minimum_out: u128,
) -> PartyResult<u128> {
    factory.require_not_paused()?;
    if token_out == ZERO_ADDRESS {
        return Err(PartyError::ZeroAddress);
    }
    if call.value == 0 {
        return Err(PartyError::ZeroAmount);
    }
    factory.state.store.get(&token_out)?;

    host.transfer_native(&call.caller, &factory.address, call.value)?;
    let (pool, amount_out) = buy(factory, host, &call.caller, &token_out, call.value, minimum_out)?;

    factory.state.emit(PartyEvent::JoinParty(JoinParty {
        buyer: call.caller,
        token: token_out,
        pool,
        amount_in: call.value,
        amount_out,
    }));
    Ok(amount_out)
}

/// Swap native currency the factory already holds into `token` for `buyer`
///
/// On the bonded venue the contribution is recorded before the swap. If it is
/// the contribution that reaches the target, the launch migrates before this
/// returns; the crossing trade itself still fills against the bonded position.
/// Returns the pool traded against and the tokens received.
pub(crate) fn buy<H: Host>(
    factory: &mut PartyFactory,
    host: &mut H,
    buyer: &Pubkey,
    token: &Pubkey,
    amount: u128,
    minimum_out: u128,
) -> PartyResult<(Pubkey, u128)> {
    let record = factory.state.store.get(token)?;
    let route = route_for(record, &factory.state.wiring, &factory.config)?;

    let crossed = match route.kind {
        VenueKind::Bonded => {
            factory
                .state
                .store
                .record_contribution(token, amount, factory.config.party_target)?
        }
        VenueKind::Public => false,
    };

    let params = ExactInputParams {
        token_in: factory.config.wrapped_native,
        token_out: *token,
        fee: route.fee,
        recipient: *buyer,
        amount_in: amount,
        amount_out_minimum: minimum_out,
    };
    let amount_out = host.exact_input(&route.router, &factory.address, &params, amount)?;
    debug!(%token, %buyer, amount, amount_out, venue = ?route.kind, "buy routed");

    if crossed {
        migrate(factory, host, token, buyer)?;
    }

    Ok((route.pool, amount_out))
}
