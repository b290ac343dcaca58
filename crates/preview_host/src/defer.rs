//! Deferred-callback contracts used to collapse bursts of work into a single later run.

use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

/// Unit of work handed to a [`DeferBackend`].
pub type DeferredTask = Box<dyn FnOnce()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Backend-issued handle identifying one deferred task.
pub struct DeferHandle(pub i64);

/// Host service that runs a task at some later point and can cancel it before it runs.
///
/// Implementations pick their deferral mechanism when constructed; callers never probe host
/// capabilities per call.
pub trait DeferBackend {
    /// Defers `task` and returns a handle that can cancel it.
    fn defer(&self, task: DeferredTask) -> Result<DeferHandle, String>;

    /// Cancels a deferred task. Unknown or already-run handles are ignored.
    fn cancel(&self, handle: DeferHandle);
}

#[derive(Default)]
struct ManualQueue {
    next_id: i64,
    tasks: BTreeMap<i64, DeferredTask>,
}

#[derive(Clone, Default)]
/// Deferral backend driven explicitly by the caller, for headless hosts and tests.
pub struct ManualDeferBackend {
    inner: Rc<RefCell<ManualQueue>>,
}

impl ManualDeferBackend {
    /// Returns the number of deferred tasks that have not run or been cancelled.
    pub fn pending_count(&self) -> usize {
        self.inner.borrow().tasks.len()
    }

    /// Runs every pending task in deferral order and returns how many ran.
    ///
    /// Tasks deferred while draining are left for the next call.
    pub fn run_pending(&self) -> usize {
        let drained = std::mem::take(&mut self.inner.borrow_mut().tasks);
        let count = drained.len();
        for (_, task) in drained {
            task();
        }
        count
    }
}

impl DeferBackend for ManualDeferBackend {
    fn defer(&self, task: DeferredTask) -> Result<DeferHandle, String> {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.tasks.insert(id, task);
        Ok(DeferHandle(id))
    }

    fn cancel(&self, handle: DeferHandle) {
        self.inner.borrow_mut().tasks.remove(&handle.0);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn manual_backend_runs_only_uncancelled_tasks() {
        let backend = ManualDeferBackend::default();
        let backend_obj: &dyn DeferBackend = &backend;
        let ran = Rc::new(Cell::new(0));

        let first = {
            let ran = ran.clone();
            backend_obj
                .defer(Box::new(move || ran.set(ran.get() + 1)))
                .expect("defer first")
        };
        {
            let ran = ran.clone();
            backend_obj
                .defer(Box::new(move || ran.set(ran.get() + 10)))
                .expect("defer second");
        }
        backend_obj.cancel(first);

        assert_eq!(backend.pending_count(), 1);
        assert_eq!(backend.run_pending(), 1);
        assert_eq!(ran.get(), 10);
        assert_eq!(backend.pending_count(), 0);
    }
}
