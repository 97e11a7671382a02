//! Owner-only wiring and pause control

use solana_program::pubkey::Pubkey;
use tracing::info;

use crate::error::{PartyError, PartyResult};
use crate::events::PartyEvent;
use crate::factory::PartyFactory;

pub fn set_nonfungible_position_manager(
    factory: &mut PartyFactory,
    caller: Pubkey,
    bonded: Pubkey,
    public: Pubkey,
) -> PartyResult<()> {
    factory.require_owner(&caller)?;
    factory.state.wiring.set_position_managers(bonded, public)?;
    info!(%bonded, %public, "position managers wired");
    Ok(())
}

pub fn set_swap_router(factory: &mut PartyFactory, caller: Pubkey, router: Pubkey) -> PartyResult<()> {
    factory.require_owner(&caller)?;
    factory.state.wiring.set_public_swap_router(router)?;
    info!(%router, "public swap router wired");
    Ok(())
}

pub fn set_bnb_party_swap_router(
    factory: &mut PartyFactory,
    caller: Pubkey,
    router: Pubkey,
) -> PartyResult<()> {
    factory.require_owner(&caller)?;
    factory.state.wiring.set_bonded_swap_router(router)?;
    info!(%router, "bonded swap router wired");
    Ok(())
}

pub fn pause(factory: &mut PartyFactory, caller: Pubkey) -> PartyResult<()> {
    factory.require_owner(&caller)?;
    factory.require_not_paused()?;
    factory.state.paused = true;
    info!(by = %caller, "factory paused");
    factory.state.emit(PartyEvent::Paused { by: caller });
    Ok(())
}

pub fn unpause(factory: &mut PartyFactory, caller: Pubkey) -> PartyResult<()> {
    factory.require_owner(&caller)?;
    if !factory.state.paused {
        return Err(PartyError::ExpectedPause);
    }
    factory.state.paused = false;
    info!(by = %caller, "factory unpaused");
    factory.state.emit(PartyEvent::Unpaused { by: caller });
    Ok(())
}
