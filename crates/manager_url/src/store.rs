//! Host state store seam.
//!
//! The host store is the single shared mutable resource; every mutation goes through
//! [`ManagerStore::dispatch`].

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use leptos::{create_rw_signal, RwSignal, SignalGetUntracked, SignalSet};

use crate::{
    model::ManagerState,
    reducer::{reduce_manager, ManagerAction},
};

/// Read/dispatch access to the manager state.
pub trait ManagerStore {
    /// Returns a snapshot of the current state.
    fn state(&self) -> ManagerState;

    /// Applies `action` to the state.
    fn dispatch(&self, action: ManagerAction);
}

#[derive(Debug, Clone, Default)]
/// In-memory store for headless hosts and tests. Counts every dispatched write.
pub struct MemoryManagerStore {
    state: Rc<RefCell<ManagerState>>,
    writes: Rc<Cell<usize>>,
}

impl MemoryManagerStore {
    /// Creates a store holding `state`.
    pub fn new(state: ManagerState) -> Self {
        Self {
            state: Rc::new(RefCell::new(state)),
            writes: Rc::new(Cell::new(0)),
        }
    }

    /// Returns how many actions have been dispatched.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl ManagerStore for MemoryManagerStore {
    fn state(&self) -> ManagerState {
        self.state.borrow().clone()
    }

    fn dispatch(&self, action: ManagerAction) {
        reduce_manager(&mut self.state.borrow_mut(), action);
        self.writes.set(self.writes.get() + 1);
    }
}

#[derive(Clone, Copy)]
/// Reactive store backed by a Leptos signal.
///
/// Subscribers are only notified when a dispatch actually changes the state.
pub struct SignalManagerStore {
    state: RwSignal<ManagerState>,
}

impl SignalManagerStore {
    /// Creates the backing signal in the current reactive owner.
    pub fn new(initial: ManagerState) -> Self {
        Self {
            state: create_rw_signal(initial),
        }
    }

    /// Returns the backing signal for reactive reads.
    pub fn signal(&self) -> RwSignal<ManagerState> {
        self.state
    }
}

impl ManagerStore for SignalManagerStore {
    fn state(&self) -> ManagerState {
        self.state.get_untracked()
    }

    fn dispatch(&self, action: ManagerAction) {
        let mut next = self.state.get_untracked();
        let previous = next.clone();
        reduce_manager(&mut next, action);
        if next != previous {
            self.state.set(next);
        }
    }
}

#[cfg(test)]
mod tests {
    use leptos::{create_effect, SignalGet};

    use super::*;

    #[test]
    fn memory_store_counts_writes() {
        let store = MemoryManagerStore::default();
        store.dispatch(ManagerAction::SetReleaseNotesPending(true));
        store.dispatch(ManagerAction::SetReleaseNotesPending(true));
        assert_eq!(store.write_count(), 2);
        assert!(store.state().show_release_notes_on_launch);
    }

    #[test]
    fn signal_store_skips_unchanged_dispatches() {
        let runtime = leptos::create_runtime();
        let store = SignalManagerStore::new(ManagerState::default());
        let notifications = Rc::new(Cell::new(0));
        {
            let notifications = notifications.clone();
            let signal = store.signal();
            create_effect(move |_| {
                let _ = signal.get();
                notifications.set(notifications.get() + 1);
            });
        }
        let baseline = notifications.get();

        store.dispatch(ManagerAction::SetReleaseNotesPending(false));
        assert_eq!(notifications.get(), baseline);

        store.dispatch(ManagerAction::SetReleaseNotesPending(true));
        assert!(store.state().show_release_notes_on_launch);
        assert_eq!(notifications.get(), baseline + 1);
        runtime.dispose();
    }
}
