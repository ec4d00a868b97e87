//! Calling conventions: direct calls, construction, and method invocation
//! resolved through the prototype chain.

use std::rc::Rc;

use tracing::trace;

use crate::ds::class_object::{mint_class, NativeFn};
use crate::ds::error::EngineError;
use crate::ds::invocation::Invocation;
use crate::ds::object::{object_create, ObjectHandle};
use crate::ds::value::Value;

/// A standalone callable. Unrooted: its prototype starts a chain of its own,
/// so a class built this way is a top-of-chain root for ancestry purposes.
/// An empty name makes the function anonymous for super resolution.
pub fn native_function<F>(name: &str, f: F) -> ObjectHandle
where
    F: Fn(&Invocation, Vec<Value>) -> Result<Value, EngineError> + 'static,
{
    mint_class(name, Rc::new(f), None)
}

pub fn resolution_name(f: &ObjectHandle) -> Option<String> {
    f.borrow().as_class().and_then(|c| c.resolution_name())
}

/// The class's prototype object (the shared instance-level behavior), if the
/// handle is a class.
pub fn class_prototype(f: &ObjectHandle) -> Option<ObjectHandle> {
    f.borrow().as_class().map(|c| c.prototype())
}

/// The lowest-level call: runs `f`'s body with an explicit receiver,
/// resolution name, and home prototype level.
pub fn call_with_binding(
    f: &ObjectHandle,
    this: Value,
    args: Vec<Value>,
    name: Option<String>,
    home: Option<ObjectHandle>,
) -> Result<Value, EngineError> {
    let body: NativeFn = match f.borrow().as_class() {
        Some(c) => c.body(),
        None => {
            return Err(EngineError::NotCallable(
                "value is not a function".to_string(),
            ))
        }
    };
    trace!(target: "function", name = ?name, "native call");
    let invocation = Invocation::new(this, name, home);
    body(&invocation, args)
}

/// Direct call: no home level, so super resolves to nothing inside the body.
pub fn call_function(
    f: &ObjectHandle,
    this: Value,
    args: Vec<Value>,
) -> Result<Value, EngineError> {
    let name = resolution_name(f);
    call_with_binding(f, this, args, name, None)
}

/// Runs a class's body as a constructor against an existing receiver, with
/// the class's own prototype as the home level so constructor chains can
/// dispatch upward.
pub fn apply_constructor(
    class: &ObjectHandle,
    this: Value,
    args: Vec<Value>,
) -> Result<Value, EngineError> {
    let (name, home) = match class.borrow().as_class() {
        Some(c) => (c.resolution_name(), c.prototype()),
        None => {
            return Err(EngineError::NotCallable(
                "constructor target is not a class".to_string(),
            ))
        }
    };
    call_with_binding(class, this, args, name, Some(home))
}

/// Creates an instance: a fresh object chained to the class's prototype, with
/// the class's body run against it. Instances made before a later `inherit`
/// keep the chain they were created with.
pub fn construct(class: &ObjectHandle, args: Vec<Value>) -> Result<Value, EngineError> {
    let prototype = match class.borrow().as_class() {
        Some(c) => c.prototype(),
        None => {
            return Err(EngineError::NotCallable(
                "construct target is not a class".to_string(),
            ))
        }
    };
    let instance = object_create(Some(prototype));
    apply_constructor(class, Value::Object(instance.clone()), args)?;
    Ok(Value::Object(instance))
}

/// Resolves `key` through the receiver's chain and invokes the result against
/// the receiver. The resolved function's owning level becomes its home, which
/// is what makes `super` inside the method reach one level further up.
pub fn invoke_method(
    o: &ObjectHandle,
    key: &str,
    args: Vec<Value>,
) -> Result<Value, EngineError> {
    match crate::ds::operations::object::get_with_owner(o, key) {
        Some((Value::Object(f), owner)) if f.borrow().is_callable() => {
            let name = resolution_name(&f);
            call_with_binding(&f, Value::Object(o.clone()), args, name, Some(owner))
        }
        _ => Err(EngineError::NotCallable(format!(
            "'{}' is not a function",
            key
        ))),
    }
}
