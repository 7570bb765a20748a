//=========================================================================
// Event Callback Registry
//
// Single-slot mapping from event kind to application callback.
//
// The "at most one callback per kind" rule is enforced by the data
// structure itself: re-registration replaces the previous callback
// (last writer wins), removal clears the slot, and an empty slot means
// the event falls through to default behavior or is dropped.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::collections::HashMap;

//=== External Crates =====================================================

use log::warn;

//=== Internal Dependencies ===============================================

use crate::engine::event::{OsEvent, OsEventKind};

//=== EventCallback =======================================================

/// Application-level event callback.
///
/// Invoked synchronously on the engine's control thread. The callback
/// receives a borrowed event and must not assume re-entrancy into the
/// engine; interact with a live engine through its proxy instead.
pub type EventCallback = Box<dyn FnMut(&OsEvent)>;

//=== EventCallbackRegistry ===============================================

/// Kind-keyed registry of single-slot application callbacks.
#[derive(Default)]
pub struct EventCallbackRegistry {
    slots: HashMap<OsEventKind, EventCallback>,
}

impl EventCallbackRegistry {
    pub fn new() -> Self {
        Self { slots: HashMap::new() }
    }

    //--- Registration -----------------------------------------------------

    /// Registers `callback` for `kind`, replacing any previous one.
    pub fn add(&mut self, kind: OsEventKind, callback: EventCallback) {
        if self.slots.insert(kind, callback).is_some() {
            warn!(
                target: "engine::events",
                "Callback for {:?} events was already registered and has been replaced",
                kind
            );
        }
    }

    /// Clears the callback slot for `kind`. Returns whether a callback
    /// was present.
    pub fn remove(&mut self, kind: OsEventKind) -> bool {
        self.slots.remove(&kind).is_some()
    }

    /// Drops every registered callback.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    //--- Dispatch -----------------------------------------------------------

    /// Invokes the callback registered for `kind`, if any.
    ///
    /// Returns whether a callback consumed the event.
    pub fn invoke(&mut self, kind: OsEventKind, event: &OsEvent) -> bool {
        match self.slots.get_mut(&kind) {
            Some(callback) => {
                callback(event);
                true
            }
            None => false,
        }
    }

    //--- Queries --------------------------------------------------------------

    pub fn contains(&self, kind: OsEventKind) -> bool {
        self.slots.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
