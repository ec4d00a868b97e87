use crate::ds::error::EngineError;
use crate::ds::object::ObjectHandle;
use crate::ds::operations::function::call_with_binding;
use crate::ds::operations::object::{get, get_with_owner};
use crate::ds::value::Value;

/// The execution context of one native-body call: the receiver, the
/// resolution name of the running function, and the prototype level the
/// function was resolved on ("home").
///
/// Home and name together are what make super dispatch explicit: the
/// same-named member one level above home is the parent implementation of the
/// running function. A function called without a home (a direct call, an
/// event handler) has no parent level and its super resolves to `Undefined`.
pub struct Invocation {
    this: Value,
    name: Option<String>,
    home: Option<ObjectHandle>,
}

impl Invocation {
    pub(crate) fn new(this: Value, name: Option<String>, home: Option<ObjectHandle>) -> Self {
        Invocation { this, name, home }
    }

    pub fn this(&self) -> &Value {
        &self.this
    }

    pub fn this_object(&self) -> Option<ObjectHandle> {
        self.this.as_object().cloned()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn home(&self) -> Option<&ObjectHandle> {
        self.home.as_ref()
    }

    /// The same-named member one level above the home prototype, unbound.
    /// Resolves to `Undefined` on any miss (anonymous caller, no home, absent
    /// member) with ordinary lookup-miss semantics; never fails.
    pub fn super_method(&self) -> Value {
        let name = match &self.name {
            Some(n) => n,
            None => return Value::Undefined,
        };
        let above = match self.parent_level() {
            Some(p) => p,
            None => return Value::Undefined,
        };
        get(&above, name)
    }

    /// Resolves the parent implementation and invokes it against the current
    /// receiver, forwarding `args`. The resolution name and the owning level
    /// propagate into the callee, so constructor chains dispatch upward
    /// correctly. A missed resolution surfaces here, as invoking a
    /// non-callable does.
    pub fn call_super(&self, args: Vec<Value>) -> Result<Value, EngineError> {
        let name = match &self.name {
            Some(n) => n.clone(),
            None => {
                return Err(EngineError::NotCallable(
                    "super lookup from an anonymous function".to_string(),
                ))
            }
        };
        let resolved = self
            .parent_level()
            .and_then(|above| get_with_owner(&above, &name));
        match resolved {
            Some((Value::Object(f), owner)) if f.borrow().is_callable() => {
                call_with_binding(&f, self.this.clone(), args, Some(name), Some(owner))
            }
            _ => Err(EngineError::NotCallable(format!(
                "super '{}' is not a function",
                name
            ))),
        }
    }

    fn parent_level(&self) -> Option<ObjectHandle> {
        self.home.as_ref().and_then(|h| h.borrow().base().prototype())
    }
}
