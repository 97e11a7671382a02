//! Migration engine
//!
//! Runs once per launch, inside the unit of work whose buy reaches the target:
//! unwind the bonded position, pay bonuses and protocol fees, seed the public
//! venue with the remainder, then flip the record to the public venue.

use party_math::{get_amounts_for_liquidity, sqrt_price_for_amounts, sqrt_ratio_at_tick};
use solana_program::pubkey::Pubkey;
use tracing::{debug, info, warn};

use crate::constants::{DUST_LIQUIDITY, MAX_MIGRATION_DUST};
use crate::error::{PartyError, PartyResult};
use crate::events::{PartyEvent, PartyGraduated};
use crate::factory::PartyFactory;
use crate::host::{Host, MintParams};
use crate::logic::orientation::PairOrientation;
use crate::state::{FeeCheckpoint, LpPosition};

/// What a migration moved where
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationOutcome {
    pub public_pool: Pubkey,
    pub position_id: u64,
    pub token_seeded: u128,
    pub native_seeded: u128,
    /// Native-side trading fees of the bonded position, credited to the protocol
    pub native_fees: u128,
    /// Token-side trading fees of the bonded position, seeded with the principal
    pub token_fees: u128,
    /// Rounding leftovers paid to the crosser
    pub token_dust: u128,
    pub native_dust: u128,
    /// Leftovers too large to be rounding: tokens go to the owner, native to the bucket
    pub token_retained: u128,
    pub native_retained: u128,
}

fn sub(a: u128, b: u128) -> PartyResult<u128> {
    a.checked_sub(b).ok_or(PartyError::MathOverflow)
}

fn add(a: u128, b: u128) -> PartyResult<u128> {
    a.checked_add(b).ok_or(PartyError::MathOverflow)
}

/// Split a mint leftover into crosser dust and a protocol-retained remainder
fn split_leftover(leftover: u128, slack: u128) -> (u128, u128) {
    if leftover <= slack.saturating_add(MAX_MIGRATION_DUST) {
        (leftover, 0)
    } else {
        (0, leftover)
    }
}

pub fn migrate<H: Host>(
    factory: &mut PartyFactory,
    host: &mut H,
    token: &Pubkey,
    crosser: &Pubkey,
) -> PartyResult<MigrationOutcome> {
    let record = factory.state.store.get(token)?.clone();
    if record.is_graduated() {
        return Err(PartyError::LPNotAtParty);
    }

    let config = factory.config.clone();
    let this = factory.address;
    let wrapped = config.wrapped_native;
    let bonded_manager = factory.state.wiring.bonded_position_manager.get()?;
    let bonded_router = factory.state.wiring.bonded_swap_router.get()?;
    let public_manager = factory.state.wiring.public_position_manager.get()?;
    let bonded_id = record.bonded.position_id;

    // Unwind the bonded position
    let bonded = host.position(&bonded_manager, bonded_id)?;
    let (principal0, principal1) =
        host.decrease_liquidity(&bonded_manager, &this, bonded_id, bonded.liquidity)?;
    let (collected0, collected1) = host.collect(&bonded_manager, &this, bonded_id, &this)?;
    host.burn(&bonded_manager, &this, bonded_id)?;
    host.retire_pool(&bonded_router, &this, &record.bonded.pool)?;

    let (token_principal, native_principal) = record.split_pair(principal0, principal1);
    let (token_collected, native_collected) = record.split_pair(collected0, collected1);
    let token_fees = sub(token_collected, token_principal)?;
    let native_fees = sub(native_collected, native_principal)?;

    // Bonuses and the target fee come out of the native principal
    let native_seed = native_principal
        .checked_sub(config.bonus_target_reach)
        .and_then(|rest| rest.checked_sub(config.bonus_party_creator))
        .and_then(|rest| rest.checked_sub(config.target_reach_fee))
        .ok_or(PartyError::InsufficientBNB)?;

    let protocol_share = add(config.target_reach_fee, native_fees)?;
    factory.state.credit_fee_bucket(protocol_share)?;

    let bonuses = add(config.bonus_target_reach, config.bonus_party_creator)?;
    host.withdraw(&wrapped, &this, add(bonuses, protocol_share)?)?;
    host.transfer_native(&this, crosser, config.bonus_target_reach)?;
    host.transfer_native(&this, &record.creator, config.bonus_party_creator)?;

    // Seed the public venue
    let token_total = add(token_principal, token_fees)?;
    let pair = PairOrientation::new(*token, wrapped)?;
    let ticks = pair.pool_ticks(config.public_ticks);
    let (amount0, amount1) = pair.pool_amounts(token_total, native_seed);

    let sqrt_lower = sqrt_ratio_at_tick(ticks.lower)?;
    let sqrt_upper = sqrt_ratio_at_tick(ticks.upper)?;
    let curve_price = sqrt_price_for_amounts(sqrt_lower, sqrt_upper, amount0, amount1)?;
    let sqrt_price_x96 = match host.get_pool(&public_manager, &pair.token0, &pair.token1, config.lp_fee) {
        Some(existing) => host.pool_state(&existing)?.sqrt_price_x96,
        None => curve_price,
    };
    let public_pool = host.create_and_initialize_pool_if_necessary(
        &public_manager,
        &pair.token0,
        &pair.token1,
        config.lp_fee,
        sqrt_price_x96,
    )?;

    host.approve(token, &this, &public_manager, token_total)?;
    host.approve(&wrapped, &this, &public_manager, native_seed)?;
    let receipt = host.mint(
        &public_manager,
        &MintParams {
            token0: pair.token0,
            token1: pair.token1,
            fee: config.lp_fee,
            tick_lower: ticks.lower,
            tick_upper: ticks.upper,
            amount0_desired: amount0,
            amount1_desired: amount1,
            payer: this,
            recipient: this,
        },
    )?;

    // Rounding leftovers go to the caller who reached the target. Anything
    // beyond what a few units of liquidity are worth on the launch curve means
    // the public pool sat off that curve: native goes to the bucket and tokens
    // to the owner.
    let (token_used, native_used) = record.split_pair(receipt.amount0, receipt.amount1);
    let token_left = sub(token_total, token_used)?;
    let native_left = sub(native_seed, native_used)?;
    let (slack0, slack1) =
        get_amounts_for_liquidity(curve_price, sqrt_lower, sqrt_upper, DUST_LIQUIDITY, true)?;
    let (token_slack, native_slack) = record.split_pair(slack0, slack1);
    let (token_dust, token_retained) = split_leftover(token_left, token_slack);
    let (native_dust, native_retained) = split_leftover(native_left, native_slack);
    if token_dust > 0 {
        host.transfer(token, &this, crosser, token_dust)?;
    }
    if token_retained > 0 {
        host.transfer(token, &this, &factory.owner, token_retained)?;
    }
    if native_left > 0 {
        host.withdraw(&wrapped, &this, native_left)?;
    }
    if native_dust > 0 {
        host.transfer_native(&this, crosser, native_dust)?;
    }
    if native_retained > 0 {
        factory.state.credit_fee_bucket(native_retained)?;
    }
    if token_retained > 0 || native_retained > 0 {
        warn!(
            %token,
            %public_pool,
            token_retained,
            native_retained,
            "public pool off the launch curve"
        );
    }
    debug!(%token, token_dust, native_dust, "migration dust paid");

    let checkpoint = FeeCheckpoint::at(&host.pool_state(&public_pool)?);
    factory.state.store.graduate(
        token,
        LpPosition {
            pool: public_pool,
            position_id: receipt.position_id,
            checkpoint,
        },
    )?;

    info!(
        %token,
        %public_pool,
        position_id = receipt.position_id,
        token_seeded = token_used,
        native_seeded = native_used,
        native_fees,
        "party graduated"
    );
    factory.state.emit(PartyEvent::PartyGraduated(PartyGraduated {
        token: *token,
        bonded_pool: record.bonded.pool,
        public_pool,
        position_id: receipt.position_id,
        crosser: *crosser,
        token_seeded: token_used,
        native_seeded: native_used,
        native_fees,
        token_retained,
        native_retained,
    }));

    Ok(MigrationOutcome {
        public_pool,
        position_id: receipt.position_id,
        token_seeded: token_used,
        native_seeded: native_used,
        native_fees,
        token_fees,
        token_dust,
        native_dust,
        token_retained,
        native_retained,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leftover_split_at_dust_bound() {
        assert_eq!(split_leftover(0, 0), (0, 0));
        assert_eq!(split_leftover(MAX_MIGRATION_DUST, 0), (MAX_MIGRATION_DUST, 0));
        assert_eq!(split_leftover(MAX_MIGRATION_DUST + 1, 0), (0, MAX_MIGRATION_DUST + 1));
        assert_eq!(split_leftover(900, 950), (900, 0));
        assert_eq!(split_leftover(10_000, 950), (0, 10_000));
        assert_eq!(split_leftover(u128::MAX, u128::MAX), (u128::MAX, 0));
    }
}
