//! # BNB Party
//!
//! Bonding-curve token launches with automatic liquidity migration.
//!
//! Anyone can launch a token: the whole supply is seeded single-sided into a
//! price-bonded concentrated-liquidity position. Buys and sells go through the
//! factory, which tracks the native currency contributed to each launch. The
//! buy that reaches the funding target unwinds the bonded position, pays the
//! bonuses and protocol fee, and re-seeds everything into a public pool in the
//! same unit of work.
//!
//! The token ledger, liquidity venues, routers and wrapped-native contract are
//! reached through the traits in [`host`].

pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod factory;
pub mod host;
pub mod instructions;
pub mod logic;
pub mod state;
pub mod utils;

pub use config::{PartyConfig, TickRange};
pub use error::{PartyError, PartyResult};
pub use events::*;
pub use factory::{Call, PartyFactory};
pub use host::*;
pub use instructions::LaunchReceipt;
pub use logic::{CollectedFees, MigrationOutcome};
pub use state::{
    FeeCheckpoint, LpPosition, PartyRecord, PartyStore, Venue, VenueKind, VenueWiring, WiringSlot,
};
