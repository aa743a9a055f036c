//! Content events for job designs
//!
//! Events are sent from a job graph's change tracker to every registered
//! listener (editor tabs, save prompts, caches) whenever the design is
//! marked changed or safe.

use serde::{Deserialize, Serialize};

/// Trait for receiving content events
///
/// Listeners are called synchronously from the mutating call, in
/// registration order.
pub trait ContentListener: Send + Sync {
    /// Receive an event
    fn on_content_event(&self, event: &ContentEvent);
}

/// Events emitted when a job design's dirty state is set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContentEvent {
    /// The design now has unsaved changes
    #[serde(rename_all = "camelCase")]
    ContentChanged { source: String },

    /// The design matches its saved state
    #[serde(rename_all = "camelCase")]
    ContentSafe { source: String },
}

impl ContentEvent {
    pub fn changed(source: &str) -> Self {
        Self::ContentChanged {
            source: source.to_string(),
        }
    }

    pub fn safe(source: &str) -> Self {
        Self::ContentSafe {
            source: source.to_string(),
        }
    }

    /// Name of the job the event is about
    pub fn source(&self) -> &str {
        match self {
            Self::ContentChanged { source } | Self::ContentSafe { source } => source,
        }
    }
}

/// A listener that discards all events
pub struct NullContentListener;

impl ContentListener for NullContentListener {
    fn on_content_event(&self, _event: &ContentEvent) {}
}

/// A vector-based listener that collects events
///
/// Useful for testing to verify events were emitted correctly.
pub struct VecContentListener {
    events: parking_lot::Mutex<Vec<ContentEvent>>,
}

impl VecContentListener {
    pub fn new() -> Self {
        Self {
            events: parking_lot::Mutex::new(Vec::new()),
        }
    }

    /// Get all collected events
    pub fn events(&self) -> Vec<ContentEvent> {
        self.events.lock().clone()
    }

    /// Number of `ContentChanged` events received
    pub fn changed_count(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| matches!(e, ContentEvent::ContentChanged { .. }))
            .count()
    }

    /// Number of `ContentSafe` events received
    pub fn safe_count(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| matches!(e, ContentEvent::ContentSafe { .. }))
            .count()
    }

    /// Clear all collected events
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl Default for VecContentListener {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentListener for VecContentListener {
    fn on_content_event(&self, event: &ContentEvent) {
        self.events.lock().push(event.clone());
    }
}
