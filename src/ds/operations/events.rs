//! Per-object publish/subscribe: registration, removal, and synchronous
//! dispatch with in-band cancellation.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, trace};

use crate::ds::error::EngineError;
use crate::ds::event::{EventRegistry, EventRegistryHandle, EVENT_NEW_LISTENER};
use crate::ds::object::{object_create, ObjectHandle};
use crate::ds::operations::function::call_function;
use crate::ds::operations::object::{guid, put};
use crate::ds::value::{NumberValue, Value};

/// The object's registry, created empty on first access and memoized so that
/// every later access yields the identical instance. Distinct objects never
/// share a registry.
pub fn events(o: &ObjectHandle) -> EventRegistryHandle {
    let mut borrowed = o.borrow_mut();
    if let Some(registry) = borrowed.base().events() {
        return registry;
    }
    let registry = Rc::new(RefCell::new(EventRegistry::new()));
    borrowed.base_mut().set_events(registry.clone());
    registry
}

/// Appends `handler` to the ordered sequence for `event_type`. When
/// `newListener` handlers exist they are notified first, with the type and
/// the incoming handler as payload, before the handler is appended.
pub fn on(o: &ObjectHandle, event_type: &str, handler: &ObjectHandle) -> Result<(), EngineError> {
    if !handler.borrow().is_callable() {
        return Err(EngineError::InvalidArgument(
            "event handler must be callable".to_string(),
        ));
    }
    let registry = events(o);
    let announce = registry.borrow().has_handlers(EVENT_NEW_LISTENER);
    if announce {
        trigger(
            o,
            EVENT_NEW_LISTENER,
            vec![
                Value::String(event_type.to_string()),
                Value::Object(handler.clone()),
            ],
        )?;
    }
    registry.borrow_mut().append(event_type, handler.clone());
    trace!(target: "events", event_type = %event_type, "handler registered");
    Ok(())
}

/// Without a handler, drops the whole sequence for `event_type`. With one,
/// removes every registration whose guid matches the handler's guid, so a
/// handler registered several times is removed in one call. Silent when
/// nothing matches, or when the object never had a registry.
pub fn off(o: &ObjectHandle, event_type: &str, handler: Option<&ObjectHandle>) {
    let registry = match o.borrow().base().events() {
        Some(r) => r,
        None => return,
    };
    match handler {
        None => registry.borrow_mut().remove_type(event_type),
        Some(h) => {
            let tag = guid(h);
            registry
                .borrow_mut()
                .retain(event_type, |entry| guid(entry) != tag);
        }
    }
    trace!(target: "events", event_type = %event_type, "handlers removed");
}

/// Synchronous dispatch. A no-op without handlers; otherwise each handler
/// registered for `event_type` runs in registration order with the emitting
/// object as receiver and `(event, args...)` as arguments. The handler
/// sequence is snapshotted up front, so re-entrant `on`/`off` cannot disturb
/// the current dispatch. A handler returning exactly `false` cancels the
/// handlers remaining in this dispatch; any other value does not.
pub fn trigger(o: &ObjectHandle, event_type: &str, args: Vec<Value>) -> Result<(), EngineError> {
    let registry = match o.borrow().base().events() {
        Some(r) => r,
        None => return Ok(()),
    };
    let snapshot = registry.borrow().snapshot(event_type);
    if snapshot.is_empty() {
        return Ok(());
    }
    let event = build_event(event_type, o);
    debug!(
        target: "events",
        event_type = %event_type,
        handlers = snapshot.len(),
        "dispatch"
    );
    for handler in snapshot {
        let mut call_args = Vec::with_capacity(args.len() + 1);
        call_args.push(Value::Object(event.clone()));
        call_args.extend(args.iter().cloned());
        let result = call_function(&handler, Value::Object(o.clone()), call_args)?;
        if let Value::Boolean(false) = result {
            break;
        }
    }
    Ok(())
}

/// The ephemeral per-dispatch event object: own enumerable `type`, `time`
/// (wall-clock milliseconds), and `source` properties. Never retained past
/// the dispatch that built it.
fn build_event(event_type: &str, source: &ObjectHandle) -> ObjectHandle {
    let event = object_create(None);
    put(&event, "type", Value::String(event_type.to_string()));
    put(
        &event,
        "time",
        Value::Number(NumberValue::Integer(now_millis())),
    );
    put(&event, "source", Value::Object(source.clone()));
    event
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
