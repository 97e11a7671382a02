//! In-memory concentrated-liquidity venue
//!
//! A venue is a position manager address plus the pools it created. Swaps walk
//! the price across position boundaries one segment at a time, charging the
//! pool fee on the input side. Each position accumulates the fee growth it was
//! in range for; `decrease_liquidity` and `collect` settle that into owed
//! tokens, the way a v3 position manager pokes a position.

use std::collections::BTreeSet;

use bnb_party::{
    ConcentratedLiquidity, ExactInputParams, MintParams, MintReceipt, NativeBank, PartyError,
    PartyResult, PoolState, PositionInfo, SwapRouter, TokenLedger, WrappedNative,
};
use ethnum::U256;
use party_math::{
    calculate_fees, compute_swap_step, fee_growth_delta, fee_growth_from_fee,
    get_amounts_for_liquidity, get_liquidity_for_amounts, sqrt_ratio_at_tick, tick_at_sqrt_ratio,
    tick_spacing_for_fee, to_u128, MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK,
};
use solana_program::pubkey::Pubkey;
use tracing::debug;

use crate::chain::MockChain;

#[derive(Debug, Clone)]
pub struct MockPool {
    pub manager: Pubkey,
    pub token0: Pubkey,
    pub token1: Pubkey,
    pub fee: u32,
    pub sqrt_price_x96: U256,
    pub tick: i32,
    pub fee_growth_global0_x128: U256,
    pub fee_growth_global1_x128: U256,
}

#[derive(Debug, Clone)]
pub struct MockPosition {
    pub manager: Pubkey,
    pub owner: Pubkey,
    pub pool: Pubkey,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub liquidity: u128,
    fee_growth_inside0_x128: U256,
    fee_growth_inside1_x128: U256,
    fee_growth_inside0_last_x128: U256,
    fee_growth_inside1_last_x128: U256,
    pub tokens_owed0: u128,
    pub tokens_owed1: u128,
}

impl MockPosition {
    fn bounds(&self) -> PartyResult<(U256, U256)> {
        Ok((
            sqrt_ratio_at_tick(self.tick_lower)?,
            sqrt_ratio_at_tick(self.tick_upper)?,
        ))
    }

    /// Settle fee growth since the last poke into owed tokens
    fn poke(&mut self) -> PartyResult<()> {
        let owed0 = calculate_fees(
            self.liquidity,
            fee_growth_delta(self.fee_growth_inside0_x128, self.fee_growth_inside0_last_x128),
        );
        let owed1 = calculate_fees(
            self.liquidity,
            fee_growth_delta(self.fee_growth_inside1_x128, self.fee_growth_inside1_last_x128),
        );
        self.tokens_owed0 = self
            .tokens_owed0
            .checked_add(to_u128(owed0)?)
            .ok_or(PartyError::MathOverflow)?;
        self.tokens_owed1 = self
            .tokens_owed1
            .checked_add(to_u128(owed1)?)
            .ok_or(PartyError::MathOverflow)?;
        self.fee_growth_inside0_last_x128 = self.fee_growth_inside0_x128;
        self.fee_growth_inside1_last_x128 = self.fee_growth_inside1_x128;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct RouterInfo {
    pub manager: Pubkey,
    /// Account bound at deployment that decides which pools may trade
    pub guard: Option<Pubkey>,
    pub admitted: BTreeSet<Pubkey>,
    pub retired: BTreeSet<Pubkey>,
}

impl RouterInfo {
    fn check_pool(&self, pool: &Pubkey) -> PartyResult<()> {
        match self.guard {
            Some(_) if !self.admitted.contains(pool) => Err(PartyError::LPNotAtParty),
            _ => Ok(()),
        }
    }
}

fn sort(a: Pubkey, b: Pubkey) -> (Pubkey, Pubkey) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

impl MockChain {
    /// Register a position manager and its router, optionally bound to a guard
    pub fn deploy_venue(&mut self, manager: Pubkey, router: Pubkey, guard: Option<Pubkey>) {
        self.ledgers.managers.push(manager);
        self.ledgers.routers.insert(
            router,
            RouterInfo {
                manager,
                guard,
                admitted: BTreeSet::new(),
                retired: BTreeSet::new(),
            },
        );
    }

    /// Whether a guarded router currently swaps through `pool`
    pub fn is_admitted(&self, router: &Pubkey, pool: &Pubkey) -> bool {
        self.ledgers
            .routers
            .get(router)
            .map(|info| info.admitted.contains(pool))
            .unwrap_or(false)
    }

    fn guarded_router_mut(
        &mut self,
        router: &Pubkey,
        guard: &Pubkey,
    ) -> PartyResult<&mut RouterInfo> {
        let info = self
            .ledgers
            .routers
            .get_mut(router)
            .ok_or(PartyError::PoolNotFound)?;
        if info.guard != Some(*guard) {
            return Err(PartyError::Unauthorized);
        }
        Ok(info)
    }

    pub fn pool(&self, pool: &Pubkey) -> PartyResult<&MockPool> {
        self.ledgers.pools.get(pool).ok_or(PartyError::PoolNotFound)
    }

    /// Open positions in `pool`
    pub fn positions_in(&self, pool: &Pubkey) -> Vec<(u64, &MockPosition)> {
        self.ledgers
            .positions
            .iter()
            .filter(|(_, position)| position.pool == *pool)
            .map(|(id, position)| (*id, position))
            .collect()
    }

    /// Fees `position_id` would be paid by a collect right now
    pub fn owed_with_fees(&self, position_id: u64) -> PartyResult<(u128, u128)> {
        let mut position = self
            .ledgers
            .positions
            .get(&position_id)
            .cloned()
            .ok_or(PartyError::PositionNotFound)?;
        position.poke()?;
        Ok((position.tokens_owed0, position.tokens_owed1))
    }

    fn position_mut(
        &mut self,
        manager: &Pubkey,
        caller: &Pubkey,
        position_id: u64,
    ) -> PartyResult<&mut MockPosition> {
        let position = self
            .ledgers
            .positions
            .get_mut(&position_id)
            .filter(|position| position.manager == *manager)
            .ok_or(PartyError::PositionNotFound)?;
        if position.owner != *caller {
            return Err(PartyError::Unauthorized);
        }
        Ok(position)
    }

    /// Liquidity in range at `price`; a price sitting on a boundary belongs to
    /// the segment the swap is about to enter
    fn active_liquidity(
        &self,
        pool: &Pubkey,
        price: U256,
        zero_for_one: bool,
    ) -> PartyResult<(u128, Vec<u64>)> {
        let mut liquidity = 0u128;
        let mut active = Vec::new();
        for (id, position) in self.positions_in(pool) {
            if position.liquidity == 0 {
                continue;
            }
            let (lower, upper) = position.bounds()?;
            let in_range = if zero_for_one {
                lower < price && price <= upper
            } else {
                lower <= price && price < upper
            };
            if in_range {
                liquidity = liquidity
                    .checked_add(position.liquidity)
                    .ok_or(PartyError::MathOverflow)?;
                active.push(id);
            }
        }
        Ok((liquidity, active))
    }

    /// Nearest position boundary strictly beyond `price` in the swap direction
    fn next_boundary(&self, pool: &Pubkey, price: U256, zero_for_one: bool) -> PartyResult<Option<U256>> {
        let mut next: Option<U256> = None;
        for (_, position) in self.positions_in(pool) {
            if position.liquidity == 0 {
                continue;
            }
            let (lower, upper) = position.bounds()?;
            for bound in [lower, upper] {
                let ahead = if zero_for_one { bound < price } else { bound > price };
                if !ahead {
                    continue;
                }
                next = Some(match next {
                    None => bound,
                    Some(current) if zero_for_one => current.max(bound),
                    Some(current) => current.min(bound),
                });
            }
        }
        Ok(next)
    }

    fn move_price(&mut self, pool: &Pubkey, sqrt_price_x96: U256) -> PartyResult<()> {
        let tick = tick_at_sqrt_ratio(sqrt_price_x96)?;
        let state = self.ledgers.pools.get_mut(pool).ok_or(PartyError::PoolNotFound)?;
        state.sqrt_price_x96 = sqrt_price_x96;
        state.tick = tick;
        Ok(())
    }

    /// Swap an exact input already paid into the pool; returns the output owed
    pub(crate) fn swap(&mut self, pool: &Pubkey, zero_for_one: bool, amount_in: u128) -> PartyResult<u128> {
        let fee = self.pool(pool)?.fee;
        let mut remaining = amount_in;
        let mut amount_out = 0u128;

        while remaining > 0 {
            let price = self.pool(pool)?.sqrt_price_x96;
            let (liquidity, active) = self.active_liquidity(pool, price, zero_for_one)?;
            let boundary = self.next_boundary(pool, price, zero_for_one)?;

            let target = match boundary {
                Some(bound) => bound,
                None if liquidity == 0 => return Err(PartyError::InsufficientLiquidity),
                None if zero_for_one => MIN_SQRT_RATIO + U256::ONE,
                None => MAX_SQRT_RATIO - U256::ONE,
            };

            if liquidity == 0 {
                self.move_price(pool, target)?;
                continue;
            }

            let step = compute_swap_step(price, target, liquidity, remaining, fee)?;
            remaining = remaining
                .checked_sub(step.amount_in)
                .and_then(|rest| rest.checked_sub(step.fee_amount))
                .ok_or(PartyError::MathOverflow)?;
            amount_out = amount_out
                .checked_add(step.amount_out)
                .ok_or(PartyError::MathOverflow)?;

            let growth = fee_growth_from_fee(step.fee_amount, liquidity)?;
            let state = self.ledgers.pools.get_mut(pool).ok_or(PartyError::PoolNotFound)?;
            if zero_for_one {
                state.fee_growth_global0_x128 = state.fee_growth_global0_x128.wrapping_add(growth);
            } else {
                state.fee_growth_global1_x128 = state.fee_growth_global1_x128.wrapping_add(growth);
            }
            for id in active {
                if let Some(position) = self.ledgers.positions.get_mut(&id) {
                    if zero_for_one {
                        position.fee_growth_inside0_x128 =
                            position.fee_growth_inside0_x128.wrapping_add(growth);
                    } else {
                        position.fee_growth_inside1_x128 =
                            position.fee_growth_inside1_x128.wrapping_add(growth);
                    }
                }
            }
            self.move_price(pool, step.sqrt_price_next_x96)?;

            if boundary.is_none() && step.sqrt_price_next_x96 == target && remaining > 0 {
                return Err(PartyError::InsufficientLiquidity);
            }
        }

        Ok(amount_out)
    }
}

impl ConcentratedLiquidity for MockChain {
    fn get_pool(&self, manager: &Pubkey, token_a: &Pubkey, token_b: &Pubkey, fee: u32) -> Option<Pubkey> {
        let (token0, token1) = sort(*token_a, *token_b);
        self.ledgers
            .pool_index
            .get(&(*manager, token0, token1, fee))
            .copied()
    }

    fn create_and_initialize_pool_if_necessary(
        &mut self,
        manager: &Pubkey,
        token0: &Pubkey,
        token1: &Pubkey,
        fee: u32,
        sqrt_price_x96: U256,
    ) -> PartyResult<Pubkey> {
        if let Some(pool) = self.get_pool(manager, token0, token1, fee) {
            return Ok(pool);
        }
        if !self.ledgers.managers.contains(manager) {
            return Err(PartyError::PoolNotFound);
        }
        tick_spacing_for_fee(fee).map_err(|_| PartyError::UnsupportedFeeTier(fee))?;
        if sqrt_price_x96 < MIN_SQRT_RATIO || sqrt_price_x96 >= MAX_SQRT_RATIO {
            return Err(PartyError::InvalidSqrtPrice);
        }

        let (token0, token1) = sort(*token0, *token1);
        let pool = self.fresh_pool_address();
        self.ledgers.pools.insert(
            pool,
            MockPool {
                manager: *manager,
                token0,
                token1,
                fee,
                sqrt_price_x96,
                tick: tick_at_sqrt_ratio(sqrt_price_x96)?,
                fee_growth_global0_x128: U256::ZERO,
                fee_growth_global1_x128: U256::ZERO,
            },
        );
        self.ledgers
            .pool_index
            .insert((*manager, token0, token1, fee), pool);
        debug!(%pool, %token0, %token1, fee, "pool created");
        Ok(pool)
    }

    fn pool_state(&self, pool: &Pubkey) -> PartyResult<PoolState> {
        let state = self.pool(pool)?;
        let (liquidity, _) = self.active_liquidity(pool, state.sqrt_price_x96, false)?;
        Ok(PoolState {
            token0: state.token0,
            token1: state.token1,
            fee: state.fee,
            sqrt_price_x96: state.sqrt_price_x96,
            tick: state.tick,
            liquidity,
            fee_growth_global0_x128: state.fee_growth_global0_x128,
            fee_growth_global1_x128: state.fee_growth_global1_x128,
        })
    }

    fn mint(&mut self, manager: &Pubkey, params: &MintParams) -> PartyResult<MintReceipt> {
        let pool = self
            .get_pool(manager, &params.token0, &params.token1, params.fee)
            .ok_or(PartyError::PoolNotFound)?;
        let spacing = tick_spacing_for_fee(params.fee)?;
        let (lower, upper) = (params.tick_lower, params.tick_upper);
        if lower >= upper
            || lower < MIN_TICK
            || upper > MAX_TICK
            || lower % spacing != 0
            || upper % spacing != 0
        {
            return Err(PartyError::InvalidTickRange { lower, upper });
        }

        let price = self.pool(&pool)?.sqrt_price_x96;
        let (sa, sb) = (sqrt_ratio_at_tick(lower)?, sqrt_ratio_at_tick(upper)?);
        let liquidity = get_liquidity_for_amounts(
            price,
            sa,
            sb,
            params.amount0_desired,
            params.amount1_desired,
        )?;
        if liquidity == 0 {
            return Err(PartyError::InsufficientLiquidity);
        }
        let (amount0, amount1) = get_amounts_for_liquidity(price, sa, sb, liquidity, true)?;

        if amount0 > 0 {
            self.transfer_from(&params.token0, manager, &params.payer, &pool, amount0)?;
        }
        if amount1 > 0 {
            self.transfer_from(&params.token1, manager, &params.payer, &pool, amount1)?;
        }

        let position_id = self.ledgers.next_position_id;
        self.ledgers.next_position_id += 1;
        self.ledgers.positions.insert(
            position_id,
            MockPosition {
                manager: *manager,
                owner: params.recipient,
                pool,
                tick_lower: lower,
                tick_upper: upper,
                liquidity,
                fee_growth_inside0_x128: U256::ZERO,
                fee_growth_inside1_x128: U256::ZERO,
                fee_growth_inside0_last_x128: U256::ZERO,
                fee_growth_inside1_last_x128: U256::ZERO,
                tokens_owed0: 0,
                tokens_owed1: 0,
            },
        );
        debug!(%pool, position_id, liquidity, amount0, amount1, "position minted");

        Ok(MintReceipt {
            position_id,
            liquidity,
            amount0,
            amount1,
        })
    }

    fn position(&self, manager: &Pubkey, position_id: u64) -> PartyResult<PositionInfo> {
        let position = self
            .ledgers
            .positions
            .get(&position_id)
            .filter(|position| position.manager == *manager)
            .ok_or(PartyError::PositionNotFound)?;
        Ok(PositionInfo {
            owner: position.owner,
            pool: position.pool,
            tick_lower: position.tick_lower,
            tick_upper: position.tick_upper,
            liquidity: position.liquidity,
            tokens_owed0: position.tokens_owed0,
            tokens_owed1: position.tokens_owed1,
        })
    }

    fn decrease_liquidity(
        &mut self,
        manager: &Pubkey,
        caller: &Pubkey,
        position_id: u64,
        liquidity: u128,
    ) -> PartyResult<(u128, u128)> {
        let pool = self.position_mut(manager, caller, position_id)?.pool;
        let price = self.pool(&pool)?.sqrt_price_x96;

        let position = self.position_mut(manager, caller, position_id)?;
        if liquidity > position.liquidity {
            return Err(PartyError::InsufficientLiquidity);
        }
        position.poke()?;
        let (sa, sb) = position.bounds()?;
        let (amount0, amount1) = get_amounts_for_liquidity(price, sa, sb, liquidity, false)?;
        position.liquidity -= liquidity;
        position.tokens_owed0 = position
            .tokens_owed0
            .checked_add(amount0)
            .ok_or(PartyError::MathOverflow)?;
        position.tokens_owed1 = position
            .tokens_owed1
            .checked_add(amount1)
            .ok_or(PartyError::MathOverflow)?;
        Ok((amount0, amount1))
    }

    fn collect(
        &mut self,
        manager: &Pubkey,
        caller: &Pubkey,
        position_id: u64,
        recipient: &Pubkey,
    ) -> PartyResult<(u128, u128)> {
        let position = self.position_mut(manager, caller, position_id)?;
        position.poke()?;
        let (pool, amount0, amount1) = (position.pool, position.tokens_owed0, position.tokens_owed1);
        position.tokens_owed0 = 0;
        position.tokens_owed1 = 0;

        let (token0, token1) = {
            let state = self.pool(&pool)?;
            (state.token0, state.token1)
        };
        if amount0 > 0 {
            self.transfer(&token0, &pool, recipient, amount0)?;
        }
        if amount1 > 0 {
            self.transfer(&token1, &pool, recipient, amount1)?;
        }
        Ok((amount0, amount1))
    }

    fn burn(&mut self, manager: &Pubkey, caller: &Pubkey, position_id: u64) -> PartyResult<()> {
        let position = self.position_mut(manager, caller, position_id)?;
        if position.liquidity != 0 || position.tokens_owed0 != 0 || position.tokens_owed1 != 0 {
            return Err(PartyError::InsufficientLiquidity);
        }
        self.ledgers.positions.remove(&position_id);
        Ok(())
    }
}

impl SwapRouter for MockChain {
    fn exact_input(
        &mut self,
        router: &Pubkey,
        caller: &Pubkey,
        params: &ExactInputParams,
        value: u128,
    ) -> PartyResult<u128> {
        let info = self
            .ledgers
            .routers
            .get(router)
            .ok_or(PartyError::PoolNotFound)?;
        let pool = self
            .get_pool(&info.manager, &params.token_in, &params.token_out, params.fee)
            .ok_or(PartyError::PoolNotFound)?;
        info.check_pool(&pool)?;
        if params.amount_in == 0 {
            return Err(PartyError::ZeroAmount);
        }

        if value > 0 {
            let wrapped = self.wrapped_native();
            if params.token_in != wrapped || value != params.amount_in {
                return Err(PartyError::InsufficientBNB);
            }
            self.transfer_native(caller, router, value)?;
            self.deposit(&wrapped, router, value)?;
            self.transfer(&wrapped, router, &pool, value)?;
        } else {
            self.transfer_from(&params.token_in, router, caller, &pool, params.amount_in)?;
        }

        let zero_for_one = params.token_in < params.token_out;
        let amount_out = self.swap(&pool, zero_for_one, params.amount_in)?;
        if amount_out < params.amount_out_minimum {
            return Err(PartyError::TooLittleReceived);
        }
        self.transfer(&params.token_out, &pool, &params.recipient, amount_out)?;
        debug!(%pool, amount_in = params.amount_in, amount_out, zero_for_one, "swap");
        Ok(amount_out)
    }

    fn admit_pool(&mut self, router: &Pubkey, guard: &Pubkey, pool: &Pubkey) -> PartyResult<()> {
        self.pool(pool)?;
        let info = self.guarded_router_mut(router, guard)?;
        if info.retired.contains(pool) {
            return Err(PartyError::LPNotAtParty);
        }
        info.admitted.insert(*pool);
        Ok(())
    }

    fn retire_pool(&mut self, router: &Pubkey, guard: &Pubkey, pool: &Pubkey) -> PartyResult<()> {
        let info = self.guarded_router_mut(router, guard)?;
        info.admitted.remove(pool);
        info.retired.insert(*pool);
        debug!(%router, %pool, "pool retired");
        Ok(())
    }

    fn unwrap_wrapped_native(
        &mut self,
        router: &Pubkey,
        amount_minimum: u128,
        recipient: &Pubkey,
    ) -> PartyResult<u128> {
        let wrapped = self.wrapped_native();
        let balance = self.balance(&wrapped, router);
        if balance < amount_minimum {
            return Err(PartyError::TooLittleReceived);
        }
        if balance > 0 {
            self.withdraw(&wrapped, router, balance)?;
            self.transfer_native(router, recipient, balance)?;
        }
        Ok(balance)
    }
}
