//! Unit of Work Pattern for State Management
//!
//! Captures the factory's scalar state when an entrypoint starts and opens
//! the store journal, which saves each party record the first time the
//! operation touches it. On success the pending events are released; on
//! failure the scalars and the touched records are written back so a
//! half-finished operation leaves nothing behind. The host side of the same
//! boundary is driven by `atomically`.

use tracing::warn;

use crate::error::PartyResult;
use crate::events::PartyEvent;
use crate::factory::PartyFactory;
use crate::host::Transactional;
use crate::state::{FactoryState, VenueWiring};

pub struct WorkUnit {
    /// Original scalars (for rollback); records are journaled by the store
    wiring: VenueWiring,
    fee_bucket: u128,
    paused: bool,

    /// Track if unit has been committed
    committed: bool,
}

impl WorkUnit {
    /// Start a unit of work over `state`
    pub fn begin(state: &mut FactoryState) -> Self {
        state.pending_events.clear();
        state.store.begin_journal();
        Self {
            wiring: state.wiring,
            fee_bucket: state.fee_bucket,
            paused: state.paused,
            committed: false,
        }
    }

    /// Keep all changes and hand back the events they produced
    pub fn commit(mut self, state: &mut FactoryState) -> Vec<PartyEvent> {
        self.committed = true;
        state.store.commit_journal();
        std::mem::take(&mut state.pending_events)
    }

    /// Restore the state captured by `begin`
    pub fn rollback(self, state: &mut FactoryState) {
        if self.committed {
            return;
        }
        state.store.rollback_journal();
        state.wiring = self.wiring;
        state.fee_bucket = self.fee_bucket;
        state.paused = self.paused;
        state.pending_events.clear();
    }

    pub fn is_committed(&self) -> bool {
        self.committed
    }
}

/// Run `operation` as one all-or-nothing unit across factory and host
pub fn atomically<H, T, F>(
    factory: &mut PartyFactory,
    host: &mut H,
    name: &'static str,
    operation: F,
) -> PartyResult<T>
where
    H: Transactional,
    F: FnOnce(&mut PartyFactory, &mut H) -> PartyResult<T>,
{
    let unit = WorkUnit::begin(&mut factory.state);
    host.begin();

    match operation(factory, host) {
        Ok(value) => {
            host.commit();
            let events = unit.commit(&mut factory.state);
            factory.publish(events);
            Ok(value)
        }
        Err(error) => {
            host.rollback();
            unit.rollback(&mut factory.state);
            warn!(operation = name, %error, "unit of work rolled back");
            Err(error)
        }
    }
}

/// Same boundary for operations that only touch factory state
pub fn locally<T, F>(factory: &mut PartyFactory, name: &'static str, operation: F) -> PartyResult<T>
where
    F: FnOnce(&mut PartyFactory) -> PartyResult<T>,
{
    let unit = WorkUnit::begin(&mut factory.state);

    match operation(factory) {
        Ok(value) => {
            let events = unit.commit(&mut factory.state);
            factory.publish(events);
            Ok(value)
        }
        Err(error) => {
            unit.rollback(&mut factory.state);
            warn!(operation = name, %error, "unit of work rolled back");
            Err(error)
        }
    }
}
