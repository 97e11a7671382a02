//! Deployed-factory fixtures
//!
//! `PartyEnv` is a factory wired to a bonded venue whose router is guarded by
//! the factory, and to an open public venue, on a fresh `MockChain`.

use bnb_party::{
    Call, LaunchReceipt, NativeBank, PartyConfig, PartyFactory, PartyResult, TickRange,
    TokenLedger,
};
use solana_program::pubkey::Pubkey;

use crate::chain::MockChain;
use crate::constants::*;
use crate::tracing::init_test_tracing;

/// Launch parameters used throughout the scenarios: target 90, creation fee
/// 0.01, creator bonus 0.01, crossing bonus 0.05, target fee 0.1, 1% pools
pub fn scenario_config(wrapped_native: Pubkey) -> PartyConfig {
    PartyConfig {
        party_target: 90 * ONE,
        create_token_fee: ONE / 100,
        party_lp_fee: 10_000,
        lp_fee: 10_000,
        initial_token_amount: 10_000_000 * ONE,
        sqrt_price_x96: 25_052_911_542_910_170_730_777_872u128.into(),
        bonus_target_reach: 5 * ONE / 100,
        bonus_party_creator: ONE / 100,
        target_reach_fee: ONE / 10,
        wrapped_native,
        party_ticks: TickRange::new(-92_200, 0),
        public_ticks: TickRange::full_range(),
    }
}

/// Test account derived from a one-byte seed
pub fn account(seed: u8) -> Pubkey {
    let mut bytes = [0u8; 32];
    bytes[0] = 0x40;
    bytes[1] = seed;
    Pubkey::new_from_array(bytes)
}

pub struct PartyEnv {
    pub chain: MockChain,
    pub factory: PartyFactory,
}

impl PartyEnv {
    /// Deploy and fully wire a factory
    pub fn new(config: PartyConfig) -> Self {
        let mut env = Self::unwired(config);
        env.factory
            .set_nonfungible_position_manager(OWNER, BONDED_MANAGER, PUBLIC_MANAGER)
            .expect("wire position managers");
        env.factory
            .set_bnb_party_swap_router(OWNER, BONDED_ROUTER)
            .expect("wire bonded router");
        env.factory
            .set_swap_router(OWNER, PUBLIC_ROUTER)
            .expect("wire public router");
        env
    }

    /// Deploy a factory whose venues exist but are not wired yet
    pub fn unwired(config: PartyConfig) -> Self {
        init_test_tracing();
        let mut chain = MockChain::new(config.wrapped_native);
        chain.deploy_venue(BONDED_MANAGER, BONDED_ROUTER, Some(FACTORY));
        chain.deploy_venue(PUBLIC_MANAGER, PUBLIC_ROUTER, None);
        let factory = PartyFactory::new(FACTORY, OWNER, config).expect("deploy factory");
        Self { chain, factory }
    }

    /// Scenario factory with launched tokens sorting first
    pub fn scenario() -> Self {
        Self::new(scenario_config(WRAPPED_HIGH))
    }

    /// Scenario factory with wrapped native sorting first
    pub fn scenario_inverted() -> Self {
        Self::new(scenario_config(WRAPPED_LOW))
    }

    /// A fresh account holding `native`
    pub fn user(&mut self, seed: u8, native: u128) -> Pubkey {
        let user = account(seed);
        self.chain.fund_native(&user, native);
        user
    }

    /// Launch a token paying exactly the creation fee
    pub fn launch(&mut self, creator: &Pubkey) -> LaunchReceipt {
        let fee = self.factory.party().create_token_fee;
        self.chain.fund_native(creator, fee);
        self.factory
            .create_party(&mut self.chain, Call::new(*creator, fee), "Party Token", "PARTY")
            .expect("launch")
    }

    pub fn buy(&mut self, buyer: &Pubkey, token: &Pubkey, amount: u128) -> PartyResult<u128> {
        self.factory
            .join_party(&mut self.chain, Call::new(*buyer, amount), *token, 0)
    }

    /// Approve the factory and sell
    pub fn sell(&mut self, seller: &Pubkey, token: &Pubkey, amount: u128) -> PartyResult<u128> {
        self.chain.approve(token, seller, &FACTORY, amount)?;
        self.factory
            .leave_party(&mut self.chain, *seller, *token, amount, 0)
    }

    pub fn native(&self, account: &Pubkey) -> u128 {
        self.chain.native_balance(account)
    }

    pub fn tokens(&self, token: &Pubkey, account: &Pubkey) -> u128 {
        self.chain.balance(token, account)
    }
}
