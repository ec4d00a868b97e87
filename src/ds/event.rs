use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::ds::object::ObjectHandle;

/// Emitted on a parent class after a child has been chained to it.
pub const EVENT_INHERITED: &str = "inherited";
/// Emitted on a mixin function after it has been applied to an object.
pub const EVENT_MIXED_IN: &str = "mixedIn";
/// Emitted on an object before a new handler is appended to its registry.
pub const EVENT_NEW_LISTENER: &str = "newListener";

pub type EventRegistryHandle = Rc<RefCell<EventRegistry>>;

/// Per-object listener store: event-type name to the ordered sequence of
/// registered handlers. Created lazily, owned exclusively by one object.
pub struct EventRegistry {
    handlers: HashMap<String, Vec<ObjectHandle>>,
}

impl EventRegistry {
    pub fn new() -> Self {
        EventRegistry {
            handlers: HashMap::new(),
        }
    }

    pub fn has_handlers(&self, event_type: &str) -> bool {
        self.handlers
            .get(event_type)
            .map(|v| !v.is_empty())
            .unwrap_or(false)
    }

    pub fn handler_count(&self, event_type: &str) -> usize {
        self.handlers.get(event_type).map(Vec::len).unwrap_or(0)
    }

    /// Copy of the handler sequence for one type, in registration order. The
    /// dispatch loop iterates this snapshot so that re-entrant registration
    /// and removal cannot disturb an in-flight dispatch.
    pub fn snapshot(&self, event_type: &str) -> Vec<ObjectHandle> {
        self.handlers.get(event_type).cloned().unwrap_or_default()
    }

    pub fn append(&mut self, event_type: &str, handler: ObjectHandle) {
        self.handlers
            .entry(event_type.to_string())
            .or_insert_with(Vec::new)
            .push(handler);
    }

    pub fn remove_type(&mut self, event_type: &str) {
        self.handlers.remove(event_type);
    }

    pub fn retain<F>(&mut self, event_type: &str, pred: F)
    where
        F: FnMut(&ObjectHandle) -> bool,
    {
        if let Some(sequence) = self.handlers.get_mut(event_type) {
            sequence.retain(pred);
        }
    }

    /// The registered type names, sorted.
    pub fn registered_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.handlers.keys().cloned().collect();
        types.sort();
        types
    }
}

impl Default for EventRegistry {
    fn default() -> Self {
        EventRegistry::new()
    }
}
