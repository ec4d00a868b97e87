use std::cell::RefCell;
use std::rc::Rc;

use crate::ds::error::EngineError;
use crate::ds::invocation::Invocation;
use crate::ds::object::{object_create, ObjectBase, ObjectHandle, ObjectType};
use crate::ds::object_property::PropertyDescriptor;
use crate::ds::value::Value;

/// The property under which every prototype object refers back to its class.
pub const CONSTRUCTOR_KEY: &str = "constructor";

/// The native body of a callable. Receives the invocation context (receiver,
/// resolution name, home prototype level) and the call arguments.
pub type NativeFn = Rc<dyn Fn(&Invocation, Vec<Value>) -> Result<Value, EngineError>>;

/// A constructor-capable value: a declared name (possibly empty), an optional
/// recorded name stamped at definition time, a native body, a dedicated
/// prototype object, and its own property table for statics.
///
/// The prototype is a struct field rather than a property so that it never
/// travels with the own-enumerable static copy performed by `inherit`.
pub struct ClassObject {
    name: String,
    recorded_name: Option<String>,
    body: NativeFn,
    prototype: ObjectHandle,
    object_base: ObjectBase,
}

impl ClassObject {
    pub fn new(name: &str, body: NativeFn, prototype: ObjectHandle) -> Self {
        ClassObject {
            name: name.to_string(),
            recorded_name: None,
            body,
            prototype,
            object_base: ObjectBase::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn recorded_name(&self) -> Option<&str> {
        self.recorded_name.as_deref()
    }

    pub fn set_recorded_name(&mut self, name: &str) {
        self.recorded_name = Some(name.to_string());
    }

    /// The name under which a running body resolves its parent-level
    /// counterpart: the recorded name when one was stamped, otherwise the
    /// declared name, otherwise nothing (anonymous).
    pub fn resolution_name(&self) -> Option<String> {
        if let Some(recorded) = &self.recorded_name {
            return Some(recorded.clone());
        }
        if self.name.is_empty() {
            None
        } else {
            Some(self.name.clone())
        }
    }

    pub fn body(&self) -> NativeFn {
        self.body.clone()
    }

    pub fn prototype(&self) -> ObjectHandle {
        self.prototype.clone()
    }

    pub fn set_prototype_object(&mut self, prototype: ObjectHandle) {
        self.prototype = prototype;
    }

    pub fn base(&self) -> &ObjectBase {
        &self.object_base
    }

    pub fn base_mut(&mut self) -> &mut ObjectBase {
        &mut self.object_base
    }
}

/// Creates a class object together with its prototype, wiring the prototype's
/// `constructor` back-reference. The prototype chains to `parent_prototype`
/// when given, otherwise the class starts a chain of its own.
pub fn mint_class(
    name: &str,
    body: NativeFn,
    parent_prototype: Option<ObjectHandle>,
) -> ObjectHandle {
    let prototype = object_create(parent_prototype);
    let class = Rc::new(RefCell::new(ObjectType::Class(ClassObject::new(
        name,
        body,
        prototype.clone(),
    ))));
    prototype.borrow_mut().base_mut().insert_property(
        CONSTRUCTOR_KEY.to_string(),
        PropertyDescriptor::non_enumerable(Value::Object(class.clone())),
    );
    class
}
