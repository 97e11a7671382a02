//! Pair ordering
//!
//! Launch parameters are written for "launched token is token0". Pools sort
//! their tokens by address, so when the wrapped native token sorts first the
//! price is inverted and tick ranges are mirrored.

use ethnum::U256;
use party_math::invert_sqrt_price_x96;
use solana_program::pubkey::Pubkey;

use crate::config::TickRange;
use crate::error::{PartyError, PartyResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairOrientation {
    pub token0: Pubkey,
    pub token1: Pubkey,
    pub wrapped_is_token0: bool,
}

impl PairOrientation {
    pub fn new(token: Pubkey, wrapped_native: Pubkey) -> PartyResult<Self> {
        if token == wrapped_native {
            return Err(PartyError::SameToken);
        }
        let wrapped_is_token0 = wrapped_native < token;
        let (token0, token1) = if wrapped_is_token0 {
            (wrapped_native, token)
        } else {
            (token, wrapped_native)
        };
        Ok(Self {
            token0,
            token1,
            wrapped_is_token0,
        })
    }

    /// Pool price for a price quoted as "wrapped native per launched token"
    pub fn pool_sqrt_price(&self, token_first_sqrt_price_x96: U256) -> PartyResult<U256> {
        if self.wrapped_is_token0 {
            Ok(invert_sqrt_price_x96(token_first_sqrt_price_x96)?)
        } else {
            Ok(token_first_sqrt_price_x96)
        }
    }

    pub fn pool_ticks(&self, range: TickRange) -> TickRange {
        if self.wrapped_is_token0 {
            range.mirrored()
        } else {
            range
        }
    }

    /// (launched token amount, native amount) in pool order
    pub fn pool_amounts(&self, token_amount: u128, native_amount: u128) -> (u128, u128) {
        if self.wrapped_is_token0 {
            (native_amount, token_amount)
        } else {
            (token_amount, native_amount)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_first_keeps_parameters() {
        let token = Pubkey::new_from_array([1u8; 32]);
        let wrapped = Pubkey::new_from_array([2u8; 32]);
        let pair = PairOrientation::new(token, wrapped).unwrap();

        assert!(!pair.wrapped_is_token0);
        assert_eq!((pair.token0, pair.token1), (token, wrapped));
        let price = party_math::Q96 << 1u32;
        assert_eq!(pair.pool_sqrt_price(price).unwrap(), price);
        assert_eq!(pair.pool_ticks(TickRange::new(-92_200, 0)), TickRange::new(-92_200, 0));
        assert_eq!(pair.pool_amounts(10, 3), (10, 3));
    }

    #[test]
    fn test_wrapped_first_inverts_parameters() {
        let token = Pubkey::new_from_array([9u8; 32]);
        let wrapped = Pubkey::new_from_array([2u8; 32]);
        let pair = PairOrientation::new(token, wrapped).unwrap();

        assert!(pair.wrapped_is_token0);
        assert_eq!((pair.token0, pair.token1), (wrapped, token));
        assert_eq!(pair.pool_sqrt_price(party_math::Q96).unwrap(), party_math::Q96);
        assert_eq!(pair.pool_ticks(TickRange::new(-92_200, 0)), TickRange::new(0, 92_200));
        assert_eq!(pair.pool_amounts(10, 3), (3, 10));
    }

    #[test]
    fn test_same_token_rejected() {
        let token = Pubkey::new_unique();
        assert_eq!(PairOrientation::new(token, token), Err(PartyError::SameToken));
    }
}
