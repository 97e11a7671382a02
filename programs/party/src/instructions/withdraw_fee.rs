//! Owner withdrawals: protocol fee bucket and LP fees of both venues

use solana_program::pubkey::Pubkey;
use tracing::info;

use crate::error::PartyResult;
use crate::events::{FeeWithdrawn, PartyEvent};
use crate::factory::PartyFactory;
use crate::host::Host;
use crate::logic::{withdraw_lp_fees, CollectedFees};
use crate::state::VenueKind;

/// Pay the whole protocol fee bucket to the owner
pub fn withdraw_fee<H: Host>(
    factory: &mut PartyFactory,
    host: &mut H,
    caller: Pubkey,
) -> PartyResult<u128> {
    factory.require_owner(&caller)?;

    let amount = std::mem::take(&mut factory.state.fee_bucket);
    host.transfer_native(&factory.address, &factory.owner, amount)?;

    info!(amount, recipient = %factory.owner, "protocol fees withdrawn");
    factory.state.emit(PartyEvent::FeeWithdrawn(FeeWithdrawn {
        recipient: factory.owner,
        amount,
    }));
    Ok(amount)
}

/// Collect LP fees of bonded positions that still back a launch
pub fn withdraw_party_lp_fee<H: Host>(
    factory: &mut PartyFactory,
    host: &mut H,
    caller: Pubkey,
    pools: &[Pubkey],
) -> PartyResult<Vec<CollectedFees>> {
    factory.require_owner(&caller)?;
    withdraw_lp_fees(factory, host, pools, VenueKind::Bonded)
}

/// Collect LP fees of public positions created by migrations
pub fn withdraw_lp_fee<H: Host>(
    factory: &mut PartyFactory,
    host: &mut H,
    caller: Pubkey,
    pools: &[Pubkey],
) -> PartyResult<Vec<CollectedFees>> {
    factory.require_owner(&caller)?;
    withdraw_lp_fees(factory, host, pools, VenueKind::Public)
}
