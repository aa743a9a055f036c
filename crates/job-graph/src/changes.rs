//! Dirty/clean tracking with listener notification
//!
//! The tracker is a two-state machine (clean, dirty) that does not know what
//! changed. Every mutating path of a job graph funnels into `set_changed`,
//! and every call notifies every listener, even when the state was already
//! the requested one.

use std::sync::Arc;

use crate::events::{ContentEvent, ContentListener};

/// Dirty state of a job design plus its registered listeners
#[derive(Default)]
pub struct ChangeTracker {
    changed: bool,
    listeners: Vec<Arc<dyn ContentListener>>,
}

impl ChangeTracker {
    /// Create a clean tracker with no listeners
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the design has unsaved changes
    pub fn has_changed(&self) -> bool {
        self.changed
    }

    /// Set the state and notify listeners
    ///
    /// `true` sends `ContentChanged`, `false` sends `ContentSafe`.
    pub fn set_changed(&mut self, changed: bool, source: &str) {
        self.changed = changed;
        let event = if changed {
            ContentEvent::changed(source)
        } else {
            ContentEvent::safe(source)
        };
        for listener in &self.listeners {
            listener.on_content_event(&event);
        }
    }

    /// Mark the design dirty
    pub fn mark_changed(&mut self, source: &str) {
        self.set_changed(true, source);
    }

    /// Mark the design clean
    pub fn clear_changed(&mut self, source: &str) {
        self.set_changed(false, source);
    }

    /// Register a listener; registering the same listener twice is a no-op
    pub fn add_listener(&mut self, listener: Arc<dyn ContentListener>) {
        if !self.contains(&listener) {
            self.listeners.push(listener);
        }
    }

    /// Unregister a listener by identity
    ///
    /// Returns `false` when the listener was not registered.
    pub fn remove_listener(&mut self, listener: &Arc<dyn ContentListener>) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| !same_listener(l, listener));
        self.listeners.len() != before
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn contains(&self, listener: &Arc<dyn ContentListener>) -> bool {
        self.listeners.iter().any(|l| same_listener(l, listener))
    }
}

impl std::fmt::Debug for ChangeTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeTracker")
            .field("changed", &self.changed)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

// Compare data pointers only; vtable pointers may differ across codegen units.
fn same_listener(a: &Arc<dyn ContentListener>, b: &Arc<dyn ContentListener>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::VecContentListener;

    fn listener() -> (Arc<VecContentListener>, Arc<dyn ContentListener>) {
        let concrete = Arc::new(VecContentListener::new());
        let dynamic: Arc<dyn ContentListener> = concrete.clone();
        (concrete, dynamic)
    }

    #[test]
    fn test_initially_clean() {
        let tracker = ChangeTracker::new();
        assert!(!tracker.has_changed());
        assert_eq!(tracker.listener_count(), 0);
    }

    #[test]
    fn test_every_call_notifies() {
        let mut tracker = ChangeTracker::new();
        let (recorder, handle) = listener();
        tracker.add_listener(handle);

        tracker.mark_changed("job");
        tracker.set_changed(true, "job");
        assert!(tracker.has_changed());
        assert_eq!(recorder.changed_count(), 2);

        tracker.clear_changed("job");
        tracker.set_changed(false, "job");
        assert!(!tracker.has_changed());
        assert_eq!(recorder.safe_count(), 2);
    }

    #[test]
    fn test_one_notification_per_listener() {
        let mut tracker = ChangeTracker::new();
        let recorders: Vec<_> = (0..3).map(|_| listener()).collect();
        for (_, handle) in &recorders {
            tracker.add_listener(handle.clone());
        }

        tracker.mark_changed("job");
        for (recorder, _) in &recorders {
            assert_eq!(recorder.changed_count(), 1);
        }
    }

    #[test]
    fn test_removed_listener_is_silent() {
        let mut tracker = ChangeTracker::new();
        let (removed, removed_handle) = listener();
        let (kept, kept_handle) = listener();
        tracker.add_listener(removed_handle.clone());
        tracker.add_listener(kept_handle);

        assert!(tracker.remove_listener(&removed_handle));
        tracker.mark_changed("job");
        tracker.set_changed(true, "job");

        assert!(removed.events().is_empty());
        assert_eq!(kept.changed_count(), 2);
    }

    #[test]
    fn test_remove_unknown_listener() {
        let mut tracker = ChangeTracker::new();
        let (_, handle) = listener();
        assert!(!tracker.remove_listener(&handle));
    }

    #[test]
    fn test_duplicate_registration_ignored() {
        let mut tracker = ChangeTracker::new();
        let (recorder, handle) = listener();
        tracker.add_listener(handle.clone());
        tracker.add_listener(handle);

        tracker.mark_changed("job");
        assert_eq!(tracker.listener_count(), 1);
        assert_eq!(recorder.changed_count(), 1);
    }
}
