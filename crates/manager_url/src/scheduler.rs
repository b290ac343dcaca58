//! Single-slot debounce over a [`DeferBackend`].

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use leptos::logging;
use preview_host::{DeferBackend, DeferHandle, DeferredTask};

#[derive(Debug, Clone, Copy)]
struct PendingSlot {
    generation: u64,
    handle: DeferHandle,
}

/// Keeps at most one deferred task pending; scheduling a new one cancels the previous one.
pub struct SingleSlotScheduler {
    backend: Rc<dyn DeferBackend>,
    slot: Rc<RefCell<Option<PendingSlot>>>,
    generation: Cell<u64>,
}

impl SingleSlotScheduler {
    /// Creates a scheduler over `backend`.
    pub fn new(backend: Rc<dyn DeferBackend>) -> Self {
        Self {
            backend,
            slot: Rc::new(RefCell::new(None)),
            generation: Cell::new(0),
        }
    }

    /// Returns whether a task is waiting to run.
    pub fn is_pending(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// Cancels the pending task, if any, and defers `task` in its place.
    ///
    /// A superseded task never runs, even if the backend fires it after cancellation. When the
    /// backend cannot defer, `task` runs immediately.
    pub fn schedule_replacing(&self, task: impl FnOnce() + 'static) {
        self.cancel();

        let generation = self.generation.get() + 1;
        self.generation.set(generation);

        let task: Rc<RefCell<Option<DeferredTask>>> = Rc::new(RefCell::new(Some(Box::new(task))));
        let wrapped: DeferredTask = {
            let slot = Rc::clone(&self.slot);
            let task = Rc::clone(&task);
            Box::new(move || {
                let is_current = slot
                    .borrow()
                    .is_some_and(|pending| pending.generation == generation);
                if !is_current {
                    return;
                }
                slot.replace(None);
                let pending = task.borrow_mut().take();
                if let Some(task) = pending {
                    task();
                }
            })
        };

        match self.backend.defer(wrapped) {
            Ok(handle) => {
                self.slot.replace(Some(PendingSlot { generation, handle }));
            }
            Err(err) => {
                logging::warn!("deferral unavailable, running task inline: {err}");
                let pending = task.borrow_mut().take();
                if let Some(task) = pending {
                    task();
                }
            }
        }
    }

    /// Cancels the pending task, if any.
    pub fn cancel(&self) {
        let pending = self.slot.replace(None);
        if let Some(pending) = pending {
            self.backend.cancel(pending.handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use preview_host::ManualDeferBackend;

    use super::*;

    struct FailingBackend;

    impl DeferBackend for FailingBackend {
        fn defer(&self, _task: DeferredTask) -> Result<DeferHandle, String> {
            Err("no timers".to_string())
        }

        fn cancel(&self, _handle: DeferHandle) {}
    }

    #[derive(Clone, Default)]
    /// Fires every deferred task, ignoring cancellation.
    struct IgnoresCancelBackend {
        inner: ManualDeferBackend,
    }

    impl DeferBackend for IgnoresCancelBackend {
        fn defer(&self, task: DeferredTask) -> Result<DeferHandle, String> {
            self.inner.defer(task)
        }

        fn cancel(&self, _handle: DeferHandle) {}
    }

    #[test]
    fn superseded_task_is_skipped_when_cancel_does_not_stick() {
        let backend = IgnoresCancelBackend::default();
        let scheduler = SingleSlotScheduler::new(Rc::new(backend.clone()));
        let runs = Rc::new(RefCell::new(Vec::new()));

        for label in ["stale", "latest"] {
            let runs = runs.clone();
            scheduler.schedule_replacing(move || runs.borrow_mut().push(label));
        }

        assert_eq!(backend.inner.run_pending(), 2);
        assert_eq!(*runs.borrow(), vec!["latest"]);
        assert!(!scheduler.is_pending());
    }

    #[test]
    fn cancelled_slot_skips_task_fired_late() {
        let backend = IgnoresCancelBackend::default();
        let scheduler = SingleSlotScheduler::new(Rc::new(backend.clone()));
        let ran = Rc::new(Cell::new(false));
        {
            let ran = ran.clone();
            scheduler.schedule_replacing(move || ran.set(true));
        }
        scheduler.cancel();

        assert_eq!(backend.inner.run_pending(), 1);
        assert!(!ran.get());
    }

    #[test]
    fn replacing_keeps_only_latest_task() {
        let backend = ManualDeferBackend::default();
        let scheduler = SingleSlotScheduler::new(Rc::new(backend.clone()));
        let runs = Rc::new(RefCell::new(Vec::new()));

        for label in ["first", "second", "third"] {
            let runs = runs.clone();
            scheduler.schedule_replacing(move || runs.borrow_mut().push(label));
        }

        assert!(scheduler.is_pending());
        assert_eq!(backend.pending_count(), 1);
        assert_eq!(backend.run_pending(), 1);
        assert_eq!(*runs.borrow(), vec!["third"]);
        assert!(!scheduler.is_pending());
    }

    #[test]
    fn slot_frees_after_run_so_next_task_schedules_fresh() {
        let backend = ManualDeferBackend::default();
        let scheduler = SingleSlotScheduler::new(Rc::new(backend.clone()));
        let runs = Rc::new(Cell::new(0));

        for _ in 0..2 {
            let runs = runs.clone();
            scheduler.schedule_replacing(move || runs.set(runs.get() + 1));
            backend.run_pending();
        }

        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn failing_backend_runs_inline() {
        let scheduler = SingleSlotScheduler::new(Rc::new(FailingBackend));
        let ran = Rc::new(Cell::new(false));
        {
            let ran = ran.clone();
            scheduler.schedule_replacing(move || ran.set(true));
        }
        assert!(ran.get());
        assert!(!scheduler.is_pending());
    }
}
