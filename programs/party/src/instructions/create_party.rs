//! Launch a new token into a bonded pool

use solana_program::pubkey::Pubkey;
use tracing::info;

use crate::error::{PartyError, PartyResult};
use crate::events::{JoinParty, PartyEvent, StartParty};
use crate::factory::{Call, PartyFactory};
use crate::host::{Host, MintParams};
use crate::instructions::join_party;
use crate::logic::PairOrientation;
use crate::state::{FeeCheckpoint, LpPosition, PartyRecord};

/// Result of a launch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchReceipt {
    pub token: Pubkey,
    pub pool: Pubkey,
    pub position_id: u64,
    /// Tokens bought for the creator with the value sent above the creation fee
    pub tokens_bought: u128,
}

pub fn handler<H: Host>(
    factory: &mut PartyFactory,
    host: &mut H,
    call: Call,
    name: &str,
    symbol: &str,
) -> PartyResult<LaunchReceipt> {
    factory.require_not_paused()?;
    let config = factory.config.clone();
    if call.value < config.create_token_fee {
        return Err(PartyError::InsufficientBNB);
    }
    let manager = factory.state.wiring.bonded_position_manager.get()?;
    let router = factory.state.wiring.bonded_swap_router.get()?;
    let buy_amount = call.value - config.create_token_fee;

    let this = factory.address;
    host.transfer_native(&call.caller, &this, call.value)?;
    factory.state.credit_fee_bucket(config.create_token_fee)?;

    let token = host.create_token(&this, name, symbol, config.initial_token_amount)?;
    let pair = PairOrientation::new(token, config.wrapped_native)?;
    let ticks = pair.pool_ticks(config.party_ticks);
    let sqrt_price_x96 = pair.pool_sqrt_price(config.sqrt_price_x96)?;

    let pool = host.create_and_initialize_pool_if_necessary(
        &manager,
        &pair.token0,
        &pair.token1,
        config.party_lp_fee,
        sqrt_price_x96,
    )?;

    // The whole supply goes in single-sided
    let (amount0, amount1) = pair.pool_amounts(config.initial_token_amount, 0);
    host.approve(&token, &this, &manager, config.initial_token_amount)?;
    let receipt = host.mint(
        &manager,
        &MintParams {
            token0: pair.token0,
            token1: pair.token1,
            fee: config.party_lp_fee,
            tick_lower: ticks.lower,
            tick_upper: ticks.upper,
            amount0_desired: amount0,
            amount1_desired: amount1,
            payer: this,
            recipient: this,
        },
    )?;

    let used = if pair.wrapped_is_token0 {
        receipt.amount1
    } else {
        receipt.amount0
    };
    let dust = config
        .initial_token_amount
        .checked_sub(used)
        .ok_or(PartyError::MathOverflow)?;
    if dust > 0 {
        host.transfer(&token, &this, &call.caller, dust)?;
    }

    host.admit_pool(&router, &this, &pool)?;

    let checkpoint = FeeCheckpoint::at(&host.pool_state(&pool)?);
    factory.state.store.insert(PartyRecord::new(
        token,
        call.caller,
        pair.wrapped_is_token0,
        LpPosition {
            pool,
            position_id: receipt.position_id,
            checkpoint,
        },
    ))?;

    info!(creator = %call.caller, %token, %pool, token_name = name, token_symbol = symbol, "party started");
    factory.state.emit(PartyEvent::StartParty(StartParty {
        creator: call.caller,
        token,
        pool,
    }));

    // Value above the creation fee buys for the creator, like any other join
    let tokens_bought = if buy_amount > 0 {
        let (traded_pool, amount_out) =
            join_party::buy(factory, host, &call.caller, &token, buy_amount, 0)?;
        factory.state.emit(PartyEvent::JoinParty(JoinParty {
            buyer: call.caller,
            token,
            pool: traded_pool,
            amount_in: buy_amount,
            amount_out,
        }));
        amount_out
    } else {
        0
    };

    Ok(LaunchReceipt {
        token,
        pool,
        position_id: receipt.position_id,
        tokens_bought,
    })
}
