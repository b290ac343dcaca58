//! One-time warning log.

use std::{cell::RefCell, collections::BTreeSet, rc::Rc};

use leptos::logging;

#[derive(Debug, Clone, Default)]
/// Emits each keyed warning at most once. Clones share the same log.
pub struct OnceWarnings {
    emitted: Rc<RefCell<BTreeSet<&'static str>>>,
}

impl OnceWarnings {
    /// Logs `message` unless a warning with `key` was already emitted. Returns whether it logged.
    pub fn warn(&self, key: &'static str, message: &str) -> bool {
        if !self.emitted.borrow_mut().insert(key) {
            return false;
        }
        logging::warn!("{message}");
        true
    }

    /// Returns whether a warning with `key` has been emitted.
    pub fn has_warned(&self, key: &str) -> bool {
        self.emitted.borrow().contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warns_once_per_key_across_clones() {
        let warnings = OnceWarnings::default();
        let shared = warnings.clone();

        assert!(warnings.warn("legacy.addons", "addons is deprecated"));
        assert!(!shared.warn("legacy.addons", "addons is deprecated"));
        assert!(shared.warn("legacy.stories", "stories is deprecated"));
        assert!(warnings.has_warned("legacy.stories"));
        assert!(!warnings.has_warned("legacy.nav"));
    }
}
