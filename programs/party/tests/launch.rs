//! Launching tokens into bonded pools

use bnb_party::{
    Call, ConcentratedLiquidity, JoinParty, PartyError, PartyEvent, StartParty, Venue,
    WrappedNative,
};
use party_test_utils::*;

#[test]
fn test_launch_below_creation_fee_fails() {
    let mut env = PartyEnv::scenario();
    let fee = env.factory.party().create_token_fee;
    let creator = env.user(1, fee);

    let result = env
        .factory
        .create_party(&mut env.chain, Call::new(creator, fee - 1), "Party", "PARTY");

    assert_eq!(result, Err(PartyError::InsufficientBNB));
    assert_eq!(env.factory.fee_bucket(), 0);
    assert_eq!(env.native(&creator), fee);
    assert!(env.factory.events().is_empty());
}

#[test]
fn test_launch_at_creation_fee_credits_bucket() {
    let mut env = PartyEnv::scenario();
    let creator = account(1);
    let receipt = env.launch(&creator);

    assert_eq!(env.factory.fee_bucket(), ONE / 100);
    assert_eq!(env.native(&FACTORY), ONE / 100);
    assert_eq!(env.native(&creator), 0);
    assert_eq!(receipt.tokens_bought, 0);

    let record = env.factory.party_record(&receipt.token).unwrap();
    assert_eq!(record.creator, creator);
    assert_eq!(record.venue, Venue::Bonded);
    assert_eq!(record.cumulative_contributed, 0);
    assert_eq!(record.bonded.pool, receipt.pool);
    assert!(env.factory.is_token_on_party_lp(&receipt.token));

    assert_eq!(
        env.factory.events(),
        &[PartyEvent::StartParty(StartParty {
            creator,
            token: receipt.token,
            pool: receipt.pool,
        })]
    );
}

#[test]
fn test_whole_supply_seeds_bonded_position() {
    let mut env = PartyEnv::scenario();
    let creator = account(1);
    let receipt = env.launch(&creator);
    let supply = env.factory.party().initial_token_amount;

    let position = env.chain.position(&BONDED_MANAGER, receipt.position_id).unwrap();
    assert_eq!(position.owner, FACTORY);
    assert_eq!((position.tick_lower, position.tick_upper), (-92_200, 0));

    // Launch dust goes to the creator, the factory keeps nothing
    let in_pool = env.tokens(&receipt.token, &receipt.pool);
    let dust = env.tokens(&receipt.token, &creator);
    assert_eq!(in_pool + dust, supply);
    assert!(dust <= 100);
    assert_eq!(env.tokens(&receipt.token, &FACTORY), 0);

    let info = env.chain.token_info(&receipt.token).unwrap();
    assert_eq!(info.name, "Party Token");
    assert_eq!(info.total_supply, supply);
}

#[test]
fn test_launch_orders_pair_by_address() {
    let mut env = PartyEnv::scenario();
    let receipt = env.launch(&account(1));
    let pool = env.chain.pool_state(&receipt.pool).unwrap();
    assert_eq!(pool.token0, receipt.token);
    assert_eq!(pool.token1, WRAPPED_HIGH);
    assert_eq!(pool.sqrt_price_x96, env.factory.party().sqrt_price_x96);
    assert!(!env.factory.is_token0_wrapped_native(&env.chain, &receipt.pool).unwrap());

    let mut env = PartyEnv::scenario_inverted();
    let receipt = env.launch(&account(1));
    let pool = env.chain.pool_state(&receipt.pool).unwrap();
    assert_eq!(pool.token0, WRAPPED_LOW);
    assert_eq!(pool.token1, receipt.token);
    assert!(env.factory.is_token0_wrapped_native(&env.chain, &receipt.pool).unwrap());
    assert!(env.factory.party_record(&receipt.token).unwrap().wrapped_is_token0);

    let position = env.chain.position(&BONDED_MANAGER, receipt.position_id).unwrap();
    assert_eq!((position.tick_lower, position.tick_upper), (0, 92_200));
    assert_eq!(
        env.factory.is_token0_wrapped_native(&env.chain, &bnb_party::constants::ZERO_ADDRESS),
        Err(PartyError::ZeroAddress)
    );
}

#[test]
fn test_launch_surplus_buys_for_creator() {
    let mut env = PartyEnv::scenario();
    let fee = env.factory.party().create_token_fee;
    let creator = env.user(1, fee + ONE);

    let receipt = env
        .factory
        .create_party(&mut env.chain, Call::new(creator, fee + ONE), "Party", "PARTY")
        .unwrap();

    assert!(receipt.tokens_bought > 0);
    assert!(env.tokens(&receipt.token, &creator) >= receipt.tokens_bought);
    assert_eq!(env.factory.fee_bucket(), fee);
    assert_eq!(
        env.factory.party_record(&receipt.token).unwrap().cumulative_contributed,
        ONE
    );
    // Router wrapped and forwarded everything
    assert_eq!(env.native(&BONDED_ROUTER), 0);
    assert_eq!(env.chain.balance(&WRAPPED_HIGH, &BONDED_ROUTER), 0);
    assert_eq!(env.native(&FACTORY), fee);

    // The surplus buy is reported like any other join
    match env.factory.events() {
        [PartyEvent::StartParty(_), PartyEvent::JoinParty(join)] => {
            assert_eq!(
                join,
                &JoinParty {
                    buyer: creator,
                    token: receipt.token,
                    pool: receipt.pool,
                    amount_in: ONE,
                    amount_out: receipt.tokens_bought,
                }
            );
        }
        other => panic!("unexpected events: {other:?}"),
    }
}

#[test]
fn test_launch_surplus_can_cross_target() {
    let mut env = PartyEnv::scenario();
    let fee = env.factory.party().create_token_fee;
    let creator = env.user(1, fee + 91 * ONE);

    let receipt = env
        .factory
        .create_party(&mut env.chain, Call::new(creator, fee + 91 * ONE), "Party", "PARTY")
        .unwrap();

    let record = env.factory.party_record(&receipt.token).unwrap();
    assert!(record.is_graduated());
    assert!(!env.factory.is_token_on_party_lp(&receipt.token));
    // Creator crossed the target: both bonuses
    let bonuses = 5 * ONE / 100 + ONE / 100;
    assert!(env.native(&creator) >= bonuses);
    assert!(env.native(&creator) <= bonuses + DUST_TOLERANCE);

    let kinds: Vec<&str> = env
        .factory
        .events()
        .iter()
        .map(|event| match event {
            PartyEvent::StartParty(_) => "start",
            PartyEvent::PartyGraduated(_) => "graduated",
            PartyEvent::JoinParty(_) => "join",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, ["start", "graduated", "join"]);
}

#[test]
fn test_launch_requires_wiring() {
    let mut env = PartyEnv::unwired(scenario_config(WRAPPED_HIGH));
    let fee = env.factory.party().create_token_fee;
    let creator = env.user(1, fee + ONE);

    assert_eq!(
        env.factory
            .create_party(&mut env.chain, Call::new(creator, fee), "Party", "PARTY"),
        Err(PartyError::ZeroAddress)
    );

    env.factory
        .set_nonfungible_position_manager(OWNER, BONDED_MANAGER, PUBLIC_MANAGER)
        .unwrap();
    // The bonded router has to admit the new pool
    assert_eq!(
        env.factory
            .create_party(&mut env.chain, Call::new(creator, fee), "Party", "PARTY"),
        Err(PartyError::ZeroAddress)
    );
    assert_eq!(env.native(&creator), fee + ONE);

    env.factory
        .set_bnb_party_swap_router(OWNER, BONDED_ROUTER)
        .unwrap();
    let receipt = env
        .factory
        .create_party(&mut env.chain, Call::new(creator, fee), "Party", "PARTY")
        .unwrap();
    assert_eq!(env.factory.parties().count(), 1);
    assert!(env.chain.is_admitted(&BONDED_ROUTER, &receipt.pool));
}

#[test]
fn test_launch_needs_the_routers_guard() {
    // A bonded router bound to someone else refuses to admit launch pools
    let mut env = PartyEnv::unwired(scenario_config(WRAPPED_HIGH));
    let rogue_router = account(0x77);
    env.chain
        .deploy_venue(account(0x78), rogue_router, Some(account(0x79)));
    env.factory
        .set_nonfungible_position_manager(OWNER, BONDED_MANAGER, PUBLIC_MANAGER)
        .unwrap();
    env.factory.set_bnb_party_swap_router(OWNER, rogue_router).unwrap();

    let fee = env.factory.party().create_token_fee;
    let creator = env.user(1, fee);
    assert_eq!(
        env.factory
            .create_party(&mut env.chain, Call::new(creator, fee), "Party", "PARTY"),
        Err(PartyError::Unauthorized)
    );
    assert_eq!(env.factory.parties().count(), 0);
    assert_eq!(env.native(&creator), fee);
}

#[test]
fn test_launch_without_funds_rolls_back() {
    let mut env = PartyEnv::scenario();
    let fee = env.factory.party().create_token_fee;
    let creator = account(1);

    assert_eq!(
        env.factory
            .create_party(&mut env.chain, Call::new(creator, fee), "Party", "PARTY"),
        Err(PartyError::InsufficientBNB)
    );
    assert_eq!(env.factory.parties().count(), 0);
    assert_eq!(env.chain.depth(), 0);

    // Holding wrapped native is not the same as holding native
    env.chain.fund_native(&creator, fee);
    env.chain.deposit(&WRAPPED_HIGH, &creator, fee).unwrap();
    assert_eq!(
        env.factory
            .create_party(&mut env.chain, Call::new(creator, fee), "Party", "PARTY"),
        Err(PartyError::InsufficientBNB)
    );
}

#[test]
fn test_each_launch_gets_its_own_pool() {
    let mut env = PartyEnv::scenario();
    let first = env.launch(&account(1));
    let second = env.launch(&account(2));

    assert_ne!(first.token, second.token);
    assert_ne!(first.pool, second.pool);
    assert_eq!(env.factory.parties().count(), 2);
    assert_eq!(env.factory.fee_bucket(), 2 * ONE / 100);
}
