//! Fee accountant
//!
//! LP fees are tracked per pool with a Q128 checkpoint of the pool's global
//! fee growth. Owed fees are `L * (growth - checkpoint) / 2^128`, with wrapping
//! subtraction on the accumulators.

use ethnum::U256;
use solana_program::pubkey::Pubkey;
use tracing::info;

use crate::constants::ZERO_ADDRESS;
use crate::error::{PartyError, PartyResult};
use crate::events::{LpFeeWithdrawn, PartyEvent};
use crate::factory::PartyFactory;
use crate::host::{ConcentratedLiquidity, Host};
use crate::state::{FeeCheckpoint, LpPosition, VenueKind};

/// Fees collected from one pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectedFees {
    pub pool: Pubkey,
    pub amount0: u128,
    pub amount1: u128,
}

/// Fees currently owed to `position`, in pool token order
pub fn owed_fees<H>(host: &H, manager: &Pubkey, position: &LpPosition) -> PartyResult<(U256, U256)>
where
    H: ConcentratedLiquidity + ?Sized,
{
    let pool = host.pool_state(&position.pool)?;
    let info = host.position(manager, position.position_id)?;
    Ok(position.checkpoint.owed(&pool, info.liquidity))
}

/// Collect accrued LP fees of the factory's positions in `pools` to the owner
///
/// The checkpoint moves to the pool's current global growth before anything
/// is paid out, so a repeated call in the same state collects nothing new.
pub fn withdraw_lp_fees<H: Host>(
    factory: &mut PartyFactory,
    host: &mut H,
    pools: &[Pubkey],
    kind: VenueKind,
) -> PartyResult<Vec<CollectedFees>> {
    if pools.is_empty() {
        return Err(PartyError::ZeroLength);
    }

    let manager = match kind {
        VenueKind::Bonded => factory.state.wiring.bonded_position_manager.get()?,
        VenueKind::Public => factory.state.wiring.public_position_manager.get()?,
    };

    let mut collected = Vec::with_capacity(pools.len());
    for pool in pools {
        if *pool == ZERO_ADDRESS {
            return Err(PartyError::ZeroAddress);
        }

        let position = match (kind, factory.state.store.record_for_pool(pool, kind)) {
            (_, None) => return Err(PartyError::PositionNotFound),
            (VenueKind::Bonded, Some(record)) if record.is_graduated() => {
                return Err(PartyError::LPNotAtParty)
            }
            (_, Some(_)) => *factory
                .state
                .store
                .position_for_pool(pool, kind)
                .ok_or(PartyError::PositionNotFound)?,
        };

        let pool_state = host.pool_state(pool)?;
        factory
            .state
            .store
            .set_checkpoint(pool, kind, FeeCheckpoint::at(&pool_state))?;

        let (amount0, amount1) =
            host.collect(&manager, &factory.address, position.position_id, &factory.owner)?;

        info!(%pool, amount0, amount1, venue = ?kind, "LP fees withdrawn");
        factory.state.emit(PartyEvent::LpFeeWithdrawn(LpFeeWithdrawn {
            pool: *pool,
            amount0,
            amount1,
        }));
        collected.push(CollectedFees {
            pool: *pool,
            amount0,
            amount1,
        });
    }

    Ok(collected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use party_math::{calculate_fees, Q128};

    #[test]
    fn test_fee_formula_on_reference_values() {
        // 1% of a 10 unit swap spread over the whole in-range liquidity
        let liquidity = 100_541_928_785_436_464_005_233u128;
        let fee = 100_000_000_000_000_000u128;
        let growth = party_math::fee_growth_from_fee(fee, liquidity).unwrap();
        assert_eq!(calculate_fees(liquidity, growth), U256::from(fee - 1));
        assert_eq!(calculate_fees(liquidity, U256::ZERO), U256::ZERO);
        assert_eq!(calculate_fees(1, Q128), U256::ONE);
    }
}
