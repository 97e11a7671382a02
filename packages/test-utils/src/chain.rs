//! In-memory chain
//!
//! Native balances, tokens, pools, positions and routers all live in one
//! `Ledgers` value so `Transactional::begin` can snapshot the whole chain.

use std::collections::BTreeMap;

use bnb_party::{NativeBank, PartyError, PartyResult, TokenLedger, Transactional, WrappedNative};
use solana_program::pubkey::Pubkey;

use crate::venue::{MockPool, MockPosition, RouterInfo};

const TOKEN_PREFIX: u8 = 0x80;
const POOL_PREFIX: u8 = 0xa0;

#[derive(Debug, Clone, Default)]
pub struct TokenInfo {
    pub name: String,
    pub symbol: String,
    pub total_supply: u128,
    balances: BTreeMap<Pubkey, u128>,
    allowances: BTreeMap<(Pubkey, Pubkey), u128>,
}

impl TokenInfo {
    fn new(name: &str, symbol: &str) -> Self {
        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
            ..Self::default()
        }
    }

    pub fn balance(&self, owner: &Pubkey) -> u128 {
        self.balances.get(owner).copied().unwrap_or(0)
    }

    pub fn allowance(&self, owner: &Pubkey, spender: &Pubkey) -> u128 {
        self.allowances.get(&(*owner, *spender)).copied().unwrap_or(0)
    }

    fn credit(&mut self, owner: &Pubkey, amount: u128) -> PartyResult<()> {
        let balance = self.balances.entry(*owner).or_insert(0);
        *balance = balance.checked_add(amount).ok_or(PartyError::MathOverflow)?;
        Ok(())
    }

    fn debit(&mut self, owner: &Pubkey, amount: u128) -> PartyResult<()> {
        let balance = self.balances.entry(*owner).or_insert(0);
        *balance = balance
            .checked_sub(amount)
            .ok_or(PartyError::InsufficientBalance)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Ledgers {
    pub(crate) native: BTreeMap<Pubkey, u128>,
    pub(crate) tokens: BTreeMap<Pubkey, TokenInfo>,
    pub(crate) pools: BTreeMap<Pubkey, MockPool>,
    /// (manager, token0, token1, fee) -> pool
    pub(crate) pool_index: BTreeMap<(Pubkey, Pubkey, Pubkey, u32), Pubkey>,
    pub(crate) positions: BTreeMap<u64, MockPosition>,
    pub(crate) managers: Vec<Pubkey>,
    pub(crate) routers: BTreeMap<Pubkey, RouterInfo>,
    pub(crate) next_position_id: u64,
    next_address: u64,
}

/// In-memory implementation of every collaborator the factory talks to
#[derive(Debug, Clone)]
pub struct MockChain {
    pub(crate) ledgers: Ledgers,
    snapshots: Vec<Ledgers>,
    wrapped_native: Pubkey,
}

impl MockChain {
    /// Empty chain with a wrapped-native token deployed at `wrapped_native`
    pub fn new(wrapped_native: Pubkey) -> Self {
        let mut ledgers = Ledgers {
            next_position_id: 1,
            ..Ledgers::default()
        };
        ledgers
            .tokens
            .insert(wrapped_native, TokenInfo::new("Wrapped BNB", "WBNB"));
        Self {
            ledgers,
            snapshots: Vec::new(),
            wrapped_native,
        }
    }

    pub fn wrapped_native(&self) -> Pubkey {
        self.wrapped_native
    }

    /// Credit native currency out of thin air
    pub fn fund_native(&mut self, account: &Pubkey, amount: u128) {
        *self.ledgers.native.entry(*account).or_insert(0) += amount;
    }

    /// Token balance, zero for unknown tokens or holders
    pub fn balance(&self, token: &Pubkey, owner: &Pubkey) -> u128 {
        self.ledgers
            .tokens
            .get(token)
            .map(|info| info.balance(owner))
            .unwrap_or(0)
    }

    pub fn allowance(&self, token: &Pubkey, owner: &Pubkey, spender: &Pubkey) -> u128 {
        self.ledgers
            .tokens
            .get(token)
            .map(|info| info.allowance(owner, spender))
            .unwrap_or(0)
    }

    pub fn token_info(&self, token: &Pubkey) -> Option<&TokenInfo> {
        self.ledgers.tokens.get(token)
    }

    /// Number of open transactions
    pub fn depth(&self) -> usize {
        self.snapshots.len()
    }

    pub(crate) fn fresh_address(&mut self, prefix: u8) -> Pubkey {
        self.ledgers.next_address += 1;
        let mut bytes = [0u8; 32];
        bytes[0] = prefix;
        bytes[24..].copy_from_slice(&self.ledgers.next_address.to_be_bytes());
        Pubkey::new_from_array(bytes)
    }

    pub(crate) fn fresh_pool_address(&mut self) -> Pubkey {
        self.fresh_address(POOL_PREFIX)
    }

    fn token_mut(&mut self, token: &Pubkey) -> PartyResult<&mut TokenInfo> {
        self.ledgers
            .tokens
            .get_mut(token)
            .ok_or(PartyError::InsufficientBalance)
    }
}

impl NativeBank for MockChain {
    fn native_balance(&self, account: &Pubkey) -> u128 {
        self.ledgers.native.get(account).copied().unwrap_or(0)
    }

    fn transfer_native(&mut self, from: &Pubkey, to: &Pubkey, amount: u128) -> PartyResult<()> {
        let available = self.native_balance(from);
        if available < amount {
            return Err(PartyError::InsufficientBNB);
        }
        self.ledgers.native.insert(*from, available - amount);
        let balance = self.ledgers.native.entry(*to).or_insert(0);
        *balance = balance.checked_add(amount).ok_or(PartyError::MathOverflow)?;
        Ok(())
    }
}

impl TokenLedger for MockChain {
    fn create_token(
        &mut self,
        owner: &Pubkey,
        name: &str,
        symbol: &str,
        supply: u128,
    ) -> PartyResult<Pubkey> {
        let token = self.fresh_address(TOKEN_PREFIX);
        let mut info = TokenInfo::new(name, symbol);
        info.total_supply = supply;
        info.credit(owner, supply)?;
        self.ledgers.tokens.insert(token, info);
        Ok(token)
    }

    fn token_balance(&self, token: &Pubkey, owner: &Pubkey) -> PartyResult<u128> {
        Ok(self.balance(token, owner))
    }

    fn transfer(
        &mut self,
        token: &Pubkey,
        from: &Pubkey,
        to: &Pubkey,
        amount: u128,
    ) -> PartyResult<()> {
        let info = self.token_mut(token)?;
        info.debit(from, amount)?;
        info.credit(to, amount)
    }

    fn transfer_from(
        &mut self,
        token: &Pubkey,
        spender: &Pubkey,
        from: &Pubkey,
        to: &Pubkey,
        amount: u128,
    ) -> PartyResult<()> {
        let info = self.token_mut(token)?;
        if spender != from {
            let allowance = info.allowance(from, spender);
            if allowance < amount {
                return Err(PartyError::InsufficientAllowance);
            }
            info.allowances.insert((*from, *spender), allowance - amount);
        }
        info.debit(from, amount)?;
        info.credit(to, amount)
    }

    fn approve(
        &mut self,
        token: &Pubkey,
        owner: &Pubkey,
        spender: &Pubkey,
        amount: u128,
    ) -> PartyResult<()> {
        let info = self.token_mut(token)?;
        info.allowances.insert((*owner, *spender), amount);
        Ok(())
    }
}

impl WrappedNative for MockChain {
    fn deposit(&mut self, wrapped: &Pubkey, account: &Pubkey, amount: u128) -> PartyResult<()> {
        self.transfer_native(account, wrapped, amount)?;
        let info = self.token_mut(wrapped)?;
        info.total_supply = info
            .total_supply
            .checked_add(amount)
            .ok_or(PartyError::MathOverflow)?;
        info.credit(account, amount)
    }

    fn withdraw(&mut self, wrapped: &Pubkey, account: &Pubkey, amount: u128) -> PartyResult<()> {
        let info = self.token_mut(wrapped)?;
        info.debit(account, amount)?;
        info.total_supply -= amount;
        self.transfer_native(wrapped, account, amount)
    }
}

impl Transactional for MockChain {
    fn begin(&mut self) {
        self.snapshots.push(self.ledgers.clone());
    }

    fn commit(&mut self) {
        self.snapshots.pop();
    }

    fn rollback(&mut self) {
        if let Some(snapshot) = self.snapshots.pop() {
            self.ledgers = snapshot;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(seed: u8) -> Pubkey {
        Pubkey::new_from_array([seed; 32])
    }

    #[test]
    fn test_allowance_is_consumed() {
        let mut chain = MockChain::new(account(0xfe));
        let (alice, bob) = (account(1), account(2));
        let token = chain.create_token(&alice, "Meme", "MEME", 100).unwrap();

        assert_eq!(
            chain.transfer_from(&token, &bob, &alice, &bob, 10),
            Err(PartyError::InsufficientAllowance)
        );
        chain.approve(&token, &alice, &bob, 10).unwrap();
        chain.transfer_from(&token, &bob, &alice, &bob, 10).unwrap();
        assert_eq!(chain.balance(&token, &bob), 10);
        assert_eq!(chain.allowance(&token, &alice, &bob), 0);
    }

    #[test]
    fn test_wrap_and_unwrap() {
        let wrapped = account(0xfe);
        let mut chain = MockChain::new(wrapped);
        let alice = account(1);
        chain.fund_native(&alice, 5);

        chain.deposit(&wrapped, &alice, 3).unwrap();
        assert_eq!(chain.native_balance(&alice), 2);
        assert_eq!(chain.balance(&wrapped, &alice), 3);

        chain.withdraw(&wrapped, &alice, 3).unwrap();
        assert_eq!(chain.native_balance(&alice), 5);
        assert_eq!(chain.withdraw(&wrapped, &alice, 1), Err(PartyError::InsufficientBalance));
    }

    #[test]
    fn test_rollback_restores_everything() {
        let mut chain = MockChain::new(account(0xfe));
        let alice = account(1);
        chain.fund_native(&alice, 5);

        chain.begin();
        chain.transfer_native(&alice, &account(2), 5).unwrap();
        chain.create_token(&alice, "Meme", "MEME", 1).unwrap();
        chain.rollback();

        assert_eq!(chain.native_balance(&alice), 5);
        assert_eq!(chain.ledgers.tokens.len(), 1);
        assert_eq!(chain.depth(), 0);
    }
}
