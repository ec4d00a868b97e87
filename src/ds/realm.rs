use std::rc::Rc;

use crate::ds::class_object::{mint_class, NativeFn};
use crate::ds::error::EngineError;
use crate::ds::invocation::Invocation;
use crate::ds::object::{object_create, ObjectHandle};
use crate::ds::value::Value;

/// Provider of the host primitives: owns the universal base class and its
/// root prototype, and mints objects and classes rooted in that chain.
///
/// Classes minted here have the base class as their implicit parent; callables
/// minted with `operations::function::native_function` are unrooted instead
/// and act as tops of their own chains.
pub struct Realm {
    object_class: ObjectHandle,
}

impl Realm {
    pub fn new() -> Self {
        let body: NativeFn = Rc::new(|_inv: &Invocation, _args: Vec<Value>| Ok(Value::Undefined));
        let object_class = mint_class("Object", body, None);
        Realm { object_class }
    }

    /// The universal base class. The ancestry chain of every rooted class
    /// ends here; its own `parent` is the terminal sentinel.
    pub fn object_class(&self) -> ObjectHandle {
        self.object_class.clone()
    }

    pub fn object_prototype(&self) -> ObjectHandle {
        match self.object_class.borrow().as_class() {
            Some(c) => c.prototype(),
            None => unreachable!("realm base class is always callable"),
        }
    }

    /// A fresh plain object whose prototype link points at the root
    /// prototype.
    pub fn new_object(&self) -> ObjectHandle {
        object_create(Some(self.object_prototype()))
    }

    /// A fresh class chained to the universal base class.
    pub fn new_class<F>(&self, name: &str, body: F) -> ObjectHandle
    where
        F: Fn(&Invocation, Vec<Value>) -> Result<Value, EngineError> + 'static,
    {
        mint_class(name, Rc::new(body), Some(self.object_prototype()))
    }
}

impl Default for Realm {
    fn default() -> Self {
        Realm::new()
    }
}
