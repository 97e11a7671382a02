//! Collaborator interfaces
//!
//! The factory never owns tokens, pools or routers. Everything it touches on the
//! outside goes through these traits: a native-currency bank, a fungible token
//! ledger, the wrapped-native contract, a concentrated-liquidity venue
//! (pool factory plus position manager) and its swap router. Venues are
//! addressed by their position manager; routers by their own address.
//!
//! Hosts must also be transactional: the factory wraps every entrypoint in
//! `begin`/`commit`/`rollback` so a failure anywhere leaves no trace.

use ethnum::U256;
use solana_program::pubkey::Pubkey;

use crate::error::PartyResult;

/// Native currency balances
pub trait NativeBank {
    fn native_balance(&self, account: &Pubkey) -> u128;

    fn transfer_native(&mut self, from: &Pubkey, to: &Pubkey, amount: u128) -> PartyResult<()>;
}

/// Fungible token ledger
pub trait TokenLedger {
    /// Deploy a new token and mint `supply` to `owner`
    fn create_token(
        &mut self,
        owner: &Pubkey,
        name: &str,
        symbol: &str,
        supply: u128,
    ) -> PartyResult<Pubkey>;

    fn token_balance(&self, token: &Pubkey, owner: &Pubkey) -> PartyResult<u128>;

    fn transfer(&mut self, token: &Pubkey, from: &Pubkey, to: &Pubkey, amount: u128)
        -> PartyResult<()>;

    /// Move `amount` on behalf of `from`, consuming `spender`'s allowance
    fn transfer_from(
        &mut self,
        token: &Pubkey,
        spender: &Pubkey,
        from: &Pubkey,
        to: &Pubkey,
        amount: u128,
    ) -> PartyResult<()>;

    fn approve(&mut self, token: &Pubkey, owner: &Pubkey, spender: &Pubkey, amount: u128)
        -> PartyResult<()>;
}

/// Wrapped-native token: 1:1 wrapping of the native currency
pub trait WrappedNative {
    fn deposit(&mut self, wrapped: &Pubkey, account: &Pubkey, amount: u128) -> PartyResult<()>;

    fn withdraw(&mut self, wrapped: &Pubkey, account: &Pubkey, amount: u128) -> PartyResult<()>;
}

/// Observable pool state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolState {
    pub token0: Pubkey,
    pub token1: Pubkey,
    pub fee: u32,
    pub sqrt_price_x96: U256,
    pub tick: i32,
    /// In-range liquidity at the current price
    pub liquidity: u128,
    pub fee_growth_global0_x128: U256,
    pub fee_growth_global1_x128: U256,
}

/// Liquidity position as reported by a position manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionInfo {
    pub owner: Pubkey,
    pub pool: Pubkey,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub liquidity: u128,
    pub tokens_owed0: u128,
    pub tokens_owed1: u128,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintParams {
    pub token0: Pubkey,
    pub token1: Pubkey,
    pub fee: u32,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub amount0_desired: u128,
    pub amount1_desired: u128,
    /// Account the tokens are pulled from
    pub payer: Pubkey,
    /// Owner of the new position
    pub recipient: Pubkey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintReceipt {
    pub position_id: u64,
    pub liquidity: u128,
    pub amount0: u128,
    pub amount1: u128,
}

/// Concentrated-liquidity venue: pool factory and position manager
pub trait ConcentratedLiquidity {
    fn get_pool(&self, manager: &Pubkey, token_a: &Pubkey, token_b: &Pubkey, fee: u32)
        -> Option<Pubkey>;

    /// Return the pool for the sorted pair, creating it at `sqrt_price_x96` when absent
    fn create_and_initialize_pool_if_necessary(
        &mut self,
        manager: &Pubkey,
        token0: &Pubkey,
        token1: &Pubkey,
        fee: u32,
        sqrt_price_x96: U256,
    ) -> PartyResult<Pubkey>;

    fn pool_state(&self, pool: &Pubkey) -> PartyResult<PoolState>;

    fn mint(&mut self, manager: &Pubkey, params: &MintParams) -> PartyResult<MintReceipt>;

    fn position(&self, manager: &Pubkey, position_id: u64) -> PartyResult<PositionInfo>;

    /// Remove liquidity; the principal is credited to the position's owed tokens
    fn decrease_liquidity(
        &mut self,
        manager: &Pubkey,
        caller: &Pubkey,
        position_id: u64,
        liquidity: u128,
    ) -> PartyResult<(u128, u128)>;

    /// Pay out everything the position is owed, principal and fees
    fn collect(
        &mut self,
        manager: &Pubkey,
        caller: &Pubkey,
        position_id: u64,
        recipient: &Pubkey,
    ) -> PartyResult<(u128, u128)>;

    fn burn(&mut self, manager: &Pubkey, caller: &Pubkey, position_id: u64) -> PartyResult<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactInputParams {
    pub token_in: Pubkey,
    pub token_out: Pubkey,
    pub fee: u32,
    pub recipient: Pubkey,
    pub amount_in: u128,
    pub amount_out_minimum: u128,
}

/// Single-hop swap router
///
/// A router may be deployed with a guard account. A guarded router only swaps
/// through pools its guard has admitted and fails with `LPNotAtParty` for any
/// other pool, whoever the caller is.
pub trait SwapRouter {
    /// Swap an exact input. When `value` is non-zero the caller pays in native
    /// currency, which the router wraps; otherwise `token_in` is pulled from the
    /// caller using the router's allowance.
    fn exact_input(
        &mut self,
        router: &Pubkey,
        caller: &Pubkey,
        params: &ExactInputParams,
        value: u128,
    ) -> PartyResult<u128>;

    /// Open `pool` on a guarded router. Only the router's guard may call this.
    fn admit_pool(&mut self, router: &Pubkey, guard: &Pubkey, pool: &Pubkey) -> PartyResult<()>;

    /// Close `pool` on a guarded router for good
    fn retire_pool(&mut self, router: &Pubkey, guard: &Pubkey, pool: &Pubkey) -> PartyResult<()>;

    /// Unwrap the router's whole wrapped-native balance to `recipient`
    fn unwrap_wrapped_native(
        &mut self,
        router: &Pubkey,
        amount_minimum: u128,
        recipient: &Pubkey,
    ) -> PartyResult<u128>;
}

/// All-or-nothing boundary around an entrypoint
pub trait Transactional {
    fn begin(&mut self);

    fn commit(&mut self);

    fn rollback(&mut self);
}

/// Everything the factory needs from its environment
pub trait Host:
    NativeBank + TokenLedger + WrappedNative + ConcentratedLiquidity + SwapRouter + Transactional
{
}

impl<T> Host for T where
    T: NativeBank + TokenLedger + WrappedNative + ConcentratedLiquidity + SwapRouter + Transactional
{
}
