use std::rc::Rc;

use crate::ds::object::ObjectHandle;
use crate::ds::value::Value;

pub fn same_object(a: &ObjectHandle, b: &ObjectHandle) -> bool {
    Rc::ptr_eq(a, b)
}

pub fn same_value(a: &Value, b: &Value) -> bool {
    a == b
}

pub fn is_callable(v: &Value) -> bool {
    v.is_callable()
}

pub fn is_callable_handle(o: &ObjectHandle) -> bool {
    o.borrow().is_callable()
}

/// Native chain test: true iff the class's prototype object appears anywhere
/// in the value's prototype chain. False for non-object values and
/// non-callable "classes" rather than an error.
pub fn instance_of(value: &Value, class: &ObjectHandle) -> bool {
    let o = match value {
        Value::Object(o) => o,
        _ => return false,
    };
    let class_prototype = match class.borrow().as_class() {
        Some(c) => c.prototype(),
        None => return false,
    };
    let mut walk = o.borrow().base().prototype();
    while let Some(level) = walk {
        if Rc::ptr_eq(&level, &class_prototype) {
            return true;
        }
        walk = level.borrow().base().prototype();
    }
    false
}
