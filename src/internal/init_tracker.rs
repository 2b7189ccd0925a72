//! Singleton initialization with cross-thread cycle detection.
//!
//! A resolution path only sees the types its own thread is building. When two
//! threads enter a singleton cycle from opposite ends, each would wait on a
//! cell the other is initializing. The tracker records which thread owns
//! each in-progress initialization and which key every blocked thread waits
//! for, so a wait that would close a loop fails with `Circular` instead.

use std::collections::HashMap;
use std::thread::{self, ThreadId};

use once_cell::sync::OnceCell;
use parking_lot::{Condvar, Mutex};

use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::registration::AnyArc;

use super::ResolutionFrame;

#[derive(Default)]
struct InitState {
    owners: HashMap<Key, ThreadId>,
    waiting: HashMap<ThreadId, Key>,
}

impl InitState {
    /// Keys along the wait chain starting at `key`, if it leads back to `me`.
    fn wait_cycle(&self, key: Key, me: ThreadId) -> Option<Vec<&'static str>> {
        let mut chain = Vec::new();
        let mut current = key;
        for _ in 0..=self.waiting.len() {
            let owner = *self.owners.get(&current)?;
            if owner == me {
                if chain.is_empty() {
                    chain.push(current.display_name());
                }
                return Some(chain);
            }
            current = *self.waiting.get(&owner)?;
            chain.push(current.display_name());
        }
        None
    }
}

#[derive(Default)]
pub(crate) struct InitTracker {
    state: Mutex<InitState>,
    released: Condvar,
}

impl InitTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the value in `cell`, running `init` on this thread if no other
    /// thread is already initializing it.
    ///
    /// Exactly one thread runs `init` at a time. A failed `init` leaves the
    /// cell empty and wakes the waiters, and the next one tries itself.
    pub(crate) fn init_once<F>(
        &self,
        cell: &OnceCell<AnyArc>,
        frame: &ResolutionFrame<'_>,
        init: F,
    ) -> DiResult<AnyArc>
    where
        F: FnOnce() -> DiResult<AnyArc>,
    {
        let key = frame.key();
        let me = thread::current().id();

        let mut state = self.state.lock();
        loop {
            if let Some(instance) = cell.get() {
                return Ok(instance.clone());
            }
            if !state.owners.contains_key(&key) {
                break;
            }
            if let Some(chain) = state.wait_cycle(key, me) {
                let mut path = frame.path();
                path.extend(chain);
                return Err(DiError::Circular(path));
            }
            state.waiting.insert(me, key);
            self.released.wait(&mut state);
            state.waiting.remove(&me);
        }
        state.owners.insert(key, me);
        drop(state);

        let _owned = OwnedInit { tracker: self, key };
        let instance = init()?;
        Ok(cell.get_or_init(|| instance).clone())
    }
}

/// Releases ownership of an initialization, also on panic.
struct OwnedInit<'t> {
    tracker: &'t InitTracker,
    key: Key,
}

impl Drop for OwnedInit<'_> {
    fn drop(&mut self) {
        self.tracker.state.lock().owners.remove(&self.key);
        self.tracker.released.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::key_of_type;

    fn other_thread() -> ThreadId {
        thread::spawn(|| thread::current().id()).join().unwrap()
    }

    #[test]
    fn wait_chain_back_to_self_is_a_cycle() {
        let me = thread::current().id();
        let other = other_thread();
        let (a, b) = (key_of_type::<u8>(), key_of_type::<u16>());

        let mut state = InitState::default();
        state.owners.insert(a, other);
        state.owners.insert(b, me);
        assert_eq!(state.wait_cycle(a, me), None);

        state.waiting.insert(other, b);
        assert_eq!(state.wait_cycle(a, me), Some(vec!["u16"]));
    }

    #[test]
    fn wait_chain_elsewhere_is_not_a_cycle() {
        let me = thread::current().id();
        let other = other_thread();
        let (a, b) = (key_of_type::<u8>(), key_of_type::<u16>());

        let mut state = InitState::default();
        state.owners.insert(a, other);
        state.waiting.insert(other, b);
        assert_eq!(state.wait_cycle(a, me), None);
    }

    #[test]
    fn init_runs_once_and_caches() {
        let tracker = InitTracker::new();
        let cell = OnceCell::new();
        let frame = ResolutionFrame::enter(key_of_type::<u8>(), None, 8).unwrap();

        let first = tracker
            .init_once(&cell, &frame, || Ok(std::sync::Arc::new(1u8) as AnyArc))
            .unwrap();
        let second = tracker
            .init_once(&cell, &frame, || panic!("already initialized"))
            .unwrap();
        assert!(std::sync::Arc::ptr_eq(&first, &second));
        assert!(tracker.state.lock().owners.is_empty());
    }
}
