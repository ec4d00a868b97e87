//! Mixins: applying a class's instance behavior and initializer to an object
//! without inserting the class into the object's prototype chain, plus the
//! identity tests that account for it.

use std::rc::Rc;

use tracing::debug;

use crate::ds::error::EngineError;
use crate::ds::event::EVENT_MIXED_IN;
use crate::ds::object::ObjectHandle;
use crate::ds::object_property::PropertyDescriptor;
use crate::ds::operations::events::trigger;
use crate::ds::operations::function::call_function;
use crate::ds::operations::test_and_comparison::instance_of;
use crate::ds::value::Value;

/// Records `f` in the object's mixin record, shallow-copies `f`'s prototype's
/// own enumerable properties onto the object, runs `f`'s body with the object
/// as receiver and `extra_args`, then emits `"mixedIn"` on `f` with the
/// object as payload. Fails with `InvalidArgument`, before any mutation, when
/// `f` is not callable.
pub fn mixin(
    o: &ObjectHandle,
    f: &ObjectHandle,
    extra_args: Vec<Value>,
) -> Result<(), EngineError> {
    let mixin_prototype = match f.borrow().as_class() {
        Some(c) => c.prototype(),
        None => {
            return Err(EngineError::InvalidArgument(
                "mixin source must be a class".to_string(),
            ))
        }
    };
    o.borrow_mut().base_mut().push_mixin(f.clone());
    let entries = mixin_prototype.borrow().base().own_enumerable_entries();
    {
        let mut borrowed = o.borrow_mut();
        for (key, value) in entries {
            borrowed
                .base_mut()
                .insert_property(key, PropertyDescriptor::plain(value));
        }
    }
    call_function(f, Value::Object(o.clone()), extra_args)?;
    debug!(target: "mixin", "mixin applied");
    trigger(f, EVENT_MIXED_IN, vec![Value::Object(o.clone())])
}

/// Reference-identity membership in the object's mixin record.
pub fn mixes_in(o: &ObjectHandle, f: &ObjectHandle) -> bool {
    let borrowed = o.borrow();
    borrowed
        .base()
        .mixin_record()
        .iter()
        .any(|recorded| Rc::ptr_eq(recorded, f))
}

/// The mixin record, in application order.
pub fn mixins(o: &ObjectHandle) -> Vec<ObjectHandle> {
    o.borrow().base().mixin_record().to_vec()
}

/// Capability test: nominal chain membership or mixin membership. Kept as a
/// predicate of its own, distinct from `instance_of`.
pub fn is(o: &ObjectHandle, f: &ObjectHandle) -> bool {
    instance_of(&Value::Object(o.clone()), f) || mixes_in(o, f)
}
