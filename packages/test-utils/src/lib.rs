//! Test support for the party factory
//!
//! `MockChain` implements every collaborator trait in memory: native bank,
//! token ledger, wrapped native, concentrated-liquidity venues and their
//! routers, with snapshot-based transactions.

pub mod chain;
pub mod constants;
pub mod fixtures;
pub mod tracing;
pub mod venue;

pub use chain::{MockChain, TokenInfo};
pub use constants::*;
pub use fixtures::{account, scenario_config, PartyEnv};
pub use self::tracing::init_test_tracing;
pub use venue::{MockPool, MockPosition, RouterInfo};
