//! `EventSupport` — the per-definition listener registry.

use serde::{Deserialize, Serialize};

use crate::{EventType, EventTypeFilter, RuntimeListener};

/// One registry entry: a listener and the filter it was registered under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredListener {
    pub listener: RuntimeListener,
    pub filter: EventTypeFilter,
}

/// Append-only, ordered registry of listeners.
///
/// Each registration keeps its own filter; filters of different listeners
/// are never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventSupport {
    entries: Vec<RegisteredListener>,
}

impl EventSupport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for the event types in `filter`.
    pub fn add_listener(&mut self, listener: RuntimeListener, filter: EventTypeFilter) {
        self.entries.push(RegisteredListener { listener, filter });
    }

    /// All registrations in registration order.
    pub fn entries(&self) -> &[RegisteredListener] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Listeners that should receive `event_type`, in registration order.
    pub fn listeners_for(&self, event_type: EventType) -> impl Iterator<Item = &RuntimeListener> {
        self.entries
            .iter()
            .filter(move |e| e.filter.matches(event_type))
            .map(|e| &e.listener)
    }
}
