//! Error definitions

use party_math::MathError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PartyError {
    // Validation errors
    #[error("Zero address")]
    ZeroAddress,

    #[error("Zero amount")]
    ZeroAmount,

    #[error("Zero length")]
    ZeroLength,

    #[error("Insufficient BNB")]
    InsufficientBNB,

    #[error("Bonuses and target reach fee must stay below the party target")]
    BonusGreaterThanTarget,

    #[error("Fee tier {0} is not supported")]
    UnsupportedFeeTier(u32),

    #[error("Invalid tick range [{lower}, {upper}]")]
    InvalidTickRange { lower: i32, upper: i32 },

    #[error("Invalid sqrt price")]
    InvalidSqrtPrice,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Launched token and wrapped native must differ")]
    SameToken,

    // Wiring errors
    #[error("Position manager already set")]
    PositionManagerAlreadySet,

    #[error("Already set")]
    AlreadySet,

    // Party errors
    #[error("Pool is not backing an active party")]
    LPNotAtParty,

    #[error("No party for this token")]
    PartyNotFound,

    #[error("The factory holds no position in this pool")]
    PositionNotFound,

    #[error("Pool not found")]
    PoolNotFound,

    // Safety errors
    #[error("Enforced pause")]
    EnforcedPause,

    #[error("Expected pause")]
    ExpectedPause,

    #[error("Unauthorized")]
    Unauthorized,

    // Collaborator errors
    #[error("Too little received")]
    TooLittleReceived,

    #[error("Insufficient balance")]
    InsufficientBalance,

    #[error("Insufficient allowance")]
    InsufficientAllowance,

    #[error("Insufficient liquidity")]
    InsufficientLiquidity,

    // Math errors
    #[error("Math overflow")]
    MathOverflow,

    #[error(transparent)]
    Math(#[from] MathError),
}

pub type PartyResult<T> = Result<T, PartyError>;
