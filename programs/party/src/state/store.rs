//! Party record store
//!
//! Keyed by launched token, with pool indexes for both venues. Records are
//! never removed; mutation only happens through the methods below.
//!
//! While a journal is open, the first mutation of a record saves its original
//! so a failed unit of work can restore exactly the records it touched.

use std::collections::BTreeMap;

use solana_program::pubkey::Pubkey;

use crate::error::{PartyError, PartyResult};
use crate::state::party::{FeeCheckpoint, LpPosition, PartyRecord, Venue, VenueKind};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartyStore {
    records: BTreeMap<Pubkey, PartyRecord>,
    bonded_pools: BTreeMap<Pubkey, Pubkey>,
    public_pools: BTreeMap<Pubkey, Pubkey>,
    /// token -> record before the unit of work touched it (`None` if new)
    journal: Option<BTreeMap<Pubkey, Option<PartyRecord>>>,
}

impl PartyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn insert(&mut self, record: PartyRecord) -> PartyResult<()> {
        if self.records.contains_key(&record.token)
            || self.bonded_pools.contains_key(&record.bonded.pool)
        {
            return Err(PartyError::AlreadySet);
        }
        self.touch(&record.token);
        self.index(&record);
        self.records.insert(record.token, record);
        Ok(())
    }

    pub fn get(&self, token: &Pubkey) -> PartyResult<&PartyRecord> {
        self.records.get(token).ok_or(PartyError::PartyNotFound)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PartyRecord> {
        self.records.values()
    }

    /// Token still trades against its bonded position
    pub fn is_token_on_party_lp(&self, token: &Pubkey) -> bool {
        self.records
            .get(token)
            .map(|record| !record.is_graduated())
            .unwrap_or(false)
    }

    /// Record that a pool of the given venue backs, if any
    pub fn record_for_pool(&self, pool: &Pubkey, kind: VenueKind) -> Option<&PartyRecord> {
        let index = match kind {
            VenueKind::Bonded => &self.bonded_pools,
            VenueKind::Public => &self.public_pools,
        };
        index.get(pool).and_then(|token| self.records.get(token))
    }

    /// The factory's position in a pool of the given venue
    pub fn position_for_pool(&self, pool: &Pubkey, kind: VenueKind) -> Option<&LpPosition> {
        let record = self.record_for_pool(pool, kind)?;
        match (kind, &record.venue) {
            (VenueKind::Bonded, _) => Some(&record.bonded),
            (VenueKind::Public, Venue::Public(position)) => Some(position),
            (VenueKind::Public, Venue::Bonded) => None,
        }
    }

    /// Add a bonded-venue contribution; `true` when it is the one that reaches `target`
    pub fn record_contribution(
        &mut self,
        token: &Pubkey,
        amount: u128,
        target: u128,
    ) -> PartyResult<bool> {
        self.touch(token);
        let record = self.records.get_mut(token).ok_or(PartyError::PartyNotFound)?;
        if record.is_graduated() {
            return Err(PartyError::LPNotAtParty);
        }
        let before = record.cumulative_contributed;
        let after = before.checked_add(amount).ok_or(PartyError::MathOverflow)?;
        record.cumulative_contributed = after;
        Ok(before < target && after >= target)
    }

    /// Move a pool's checkpoint forward after its fees were collected
    pub fn set_checkpoint(
        &mut self,
        pool: &Pubkey,
        kind: VenueKind,
        checkpoint: FeeCheckpoint,
    ) -> PartyResult<()> {
        let index = match kind {
            VenueKind::Bonded => &self.bonded_pools,
            VenueKind::Public => &self.public_pools,
        };
        let token = *index.get(pool).ok_or(PartyError::PositionNotFound)?;
        self.touch(&token);
        let record = self.records.get_mut(&token).ok_or(PartyError::PartyNotFound)?;
        let position = match (kind, &mut record.venue) {
            (VenueKind::Bonded, _) => &mut record.bonded,
            (VenueKind::Public, Venue::Public(position)) => position,
            (VenueKind::Public, Venue::Bonded) => return Err(PartyError::PositionNotFound),
        };
        position.checkpoint = checkpoint;
        Ok(())
    }

    /// One-way switch from the bonded venue to the public one
    pub fn graduate(&mut self, token: &Pubkey, public: LpPosition) -> PartyResult<()> {
        self.touch(token);
        let record = self.records.get_mut(token).ok_or(PartyError::PartyNotFound)?;
        if record.is_graduated() {
            return Err(PartyError::LPNotAtParty);
        }
        record.venue = Venue::Public(public);
        self.public_pools.insert(public.pool, *token);
        Ok(())
    }

    /// Start saving originals of the records mutated from now on
    pub fn begin_journal(&mut self) {
        self.journal = Some(BTreeMap::new());
    }

    /// Keep every change made since `begin_journal`
    pub fn commit_journal(&mut self) {
        self.journal = None;
    }

    /// Put each touched record, and its pool indexes, back as it was
    pub fn rollback_journal(&mut self) {
        let Some(journal) = self.journal.take() else {
            return;
        };
        for (token, original) in journal {
            if let Some(current) = self.records.remove(&token) {
                self.unindex(&current);
            }
            if let Some(record) = original {
                self.index(&record);
                self.records.insert(token, record);
            }
        }
    }

    /// Number of records saved by the open journal
    pub fn journaled(&self) -> usize {
        self.journal.as_ref().map(BTreeMap::len).unwrap_or(0)
    }

    fn touch(&mut self, token: &Pubkey) {
        if let Some(journal) = self.journal.as_mut() {
            if !journal.contains_key(token) {
                journal.insert(*token, self.records.get(token).cloned());
            }
        }
    }

    fn index(&mut self, record: &PartyRecord) {
        self.bonded_pools.insert(record.bonded.pool, record.token);
        if let Venue::Public(position) = &record.venue {
            self.public_pools.insert(position.pool, record.token);
        }
    }

    fn unindex(&mut self, record: &PartyRecord) {
        self.bonded_pools.remove(&record.bonded.pool);
        if let Venue::Public(position) = &record.venue {
            self.public_pools.remove(&position.pool);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(pool: Pubkey, id: u64) -> LpPosition {
        LpPosition {
            pool,
            position_id: id,
            checkpoint: FeeCheckpoint::default(),
        }
    }

    fn store_with_party() -> (PartyStore, Pubkey, Pubkey) {
        let mut store = PartyStore::new();
        let token = Pubkey::new_unique();
        let pool = Pubkey::new_unique();
        store
            .insert(PartyRecord::new(token, Pubkey::new_unique(), false, position(pool, 1)))
            .unwrap();
        (store, token, pool)
    }

    #[test]
    fn test_insert_and_lookup() {
        let (mut store, token, pool) = store_with_party();
        assert_eq!(store.len(), 1);
        assert!(store.is_token_on_party_lp(&token));
        assert!(!store.is_token_on_party_lp(&Pubkey::new_unique()));
        assert_eq!(store.record_for_pool(&pool, VenueKind::Bonded).unwrap().token, token);
        assert!(store.record_for_pool(&pool, VenueKind::Public).is_none());
        assert_eq!(store.get(&Pubkey::new_unique()), Err(PartyError::PartyNotFound));

        let duplicate = store.get(&token).unwrap().clone();
        assert_eq!(store.insert(duplicate), Err(PartyError::AlreadySet));
    }

    #[test]
    fn test_contribution_crosses_once() {
        let (mut store, token, _) = store_with_party();
        assert!(!store.record_contribution(&token, 40, 100).unwrap());
        assert!(!store.record_contribution(&token, 59, 100).unwrap());
        assert!(store.record_contribution(&token, 1, 100).unwrap());
        // Already past the target
        assert!(!store.record_contribution(&token, 10, 100).unwrap());
        assert_eq!(store.get(&token).unwrap().cumulative_contributed, 110);
    }

    #[test]
    fn test_graduation_is_one_way() {
        let (mut store, token, bonded_pool) = store_with_party();
        let public_pool = Pubkey::new_unique();

        store.graduate(&token, position(public_pool, 9)).unwrap();

        assert_eq!(
            store.record_for_pool(&bonded_pool, VenueKind::Bonded).unwrap().token,
            token
        );
        assert_eq!(
            store.graduate(&token, position(public_pool, 10)),
            Err(PartyError::LPNotAtParty)
        );
        assert_eq!(
            store.record_contribution(&token, 1, 100),
            Err(PartyError::LPNotAtParty)
        );
        assert_eq!(
            store.position_for_pool(&public_pool, VenueKind::Public).unwrap().position_id,
            9
        );
        assert!(!store.is_token_on_party_lp(&token));
    }

    #[test]
    fn test_journal_restores_touched_records() {
        let (mut store, token, bonded_pool) = store_with_party();
        let idle_token = Pubkey::new_unique();
        store
            .insert(PartyRecord::new(
                idle_token,
                Pubkey::new_unique(),
                false,
                position(Pubkey::new_unique(), 2),
            ))
            .unwrap();
        let before = store.clone();

        store.begin_journal();
        store.record_contribution(&token, 100, 100).unwrap();
        let public_pool = Pubkey::new_unique();
        store.graduate(&token, position(public_pool, 3)).unwrap();
        let fresh = PartyRecord::new(
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            true,
            position(Pubkey::new_unique(), 4),
        );
        store.insert(fresh.clone()).unwrap();
        // Only the graduated and the new record are saved
        assert_eq!(store.journaled(), 2);
        store.rollback_journal();

        assert_eq!(store, before);
        assert!(store.is_token_on_party_lp(&token));
        assert_eq!(store.get(&token).unwrap().cumulative_contributed, 0);
        assert!(store.record_for_pool(&public_pool, VenueKind::Public).is_none());
        assert!(store.record_for_pool(&bonded_pool, VenueKind::Bonded).is_some());
        assert_eq!(store.get(&fresh.token), Err(PartyError::PartyNotFound));
        assert!(store.record_for_pool(&fresh.bonded.pool, VenueKind::Bonded).is_none());
    }

    #[test]
    fn test_committed_journal_keeps_changes() {
        let (mut store, token, _) = store_with_party();
        store.begin_journal();
        store.record_contribution(&token, 5, 100).unwrap();
        store.commit_journal();
        assert_eq!(store.journaled(), 0);

        // Nothing left to undo
        store.rollback_journal();
        assert_eq!(store.get(&token).unwrap().cumulative_contributed, 5);
    }

    #[test]
    fn test_checkpoints_per_venue() {
        let (mut store, token, bonded_pool) = store_with_party();
        let public_pool = Pubkey::new_unique();
        let checkpoint = FeeCheckpoint::new(5u128.into(), 6u128.into());

        assert_eq!(
            store.set_checkpoint(&public_pool, VenueKind::Public, checkpoint),
            Err(PartyError::PositionNotFound)
        );
        store.set_checkpoint(&bonded_pool, VenueKind::Bonded, checkpoint).unwrap();
        assert_eq!(store.get(&token).unwrap().bonded.checkpoint, checkpoint);

        store.graduate(&token, position(public_pool, 2)).unwrap();
        store.set_checkpoint(&public_pool, VenueKind::Public, checkpoint).unwrap();
        assert_eq!(
            store.position_for_pool(&public_pool, VenueKind::Public).unwrap().checkpoint,
            checkpoint
        );
    }
}
