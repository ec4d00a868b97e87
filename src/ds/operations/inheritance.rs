//! Classical-inheritance operations over class entities: chaining, the
//! `extend` builder, and ancestry introspection.

use std::rc::Rc;

use tracing::debug;

use crate::ds::class_object::{NativeFn, CONSTRUCTOR_KEY};
use crate::ds::error::EngineError;
use crate::ds::event::EVENT_INHERITED;
use crate::ds::invocation::Invocation;
use crate::ds::object::{object_create, ObjectHandle};
use crate::ds::object_property::PropertyDescriptor;
use crate::ds::operations::events::trigger;
use crate::ds::operations::function::{
    apply_constructor, call_with_binding, resolution_name,
};
use crate::ds::operations::object::{define_property, get, get_with_owner};
use crate::ds::value::Value;

/// The instance member the auto-initialize constructor policy looks up.
pub const INITIALIZE_KEY: &str = "initialize";

/// How `extend` picks the body of the class it builds. The historical
/// revisions of this mechanism disagree, so the choice is a named option;
/// `ConstructorProperty` is the canonical default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructorPolicy {
    /// An own callable `constructor` entry in the prototype properties
    /// becomes the body; otherwise a synthesized body runs the parent's
    /// constructor against the new instance, forwarding arguments.
    ConstructorProperty,
    /// The body looks up `initialize` on the new instance's chain and invokes
    /// it with the constructor arguments, if present.
    AutoInitialize,
}

impl Default for ConstructorPolicy {
    fn default() -> Self {
        ConstructorPolicy::ConstructorProperty
    }
}

/// Whether an ancestry listing starts with the receiver itself. Another
/// convention the revisions disagree on; the default excludes the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AncestorInclusion {
    ExcludeSelf,
    IncludeSelf,
}

impl Default for AncestorInclusion {
    fn default() -> Self {
        AncestorInclusion::ExcludeSelf
    }
}

/// The properties handed to `extend`: either a literal entry list, or a
/// deferred builder invoked with the parent's prototype, for property maps
/// that need to reference the parent's members while being built.
pub enum PropertySource {
    Entries(Vec<(String, Value)>),
    Deferred(Rc<dyn Fn(&ObjectHandle) -> Vec<(String, Value)>>),
}

impl PropertySource {
    fn resolve(self, parent_prototype: &ObjectHandle) -> Vec<(String, Value)> {
        match self {
            PropertySource::Entries(entries) => entries,
            PropertySource::Deferred(build) => build(parent_prototype),
        }
    }
}

impl From<Vec<(String, Value)>> for PropertySource {
    fn from(entries: Vec<(String, Value)>) -> Self {
        PropertySource::Entries(entries)
    }
}

/// Chains `child` to `parent`:
///
/// 1. flattens `parent`'s own enumerable statics onto `child`;
/// 2. replaces `child`'s prototype with a fresh object linked to `parent`'s
///    current prototype (instances made earlier are unaffected);
/// 3. restores the new prototype's `constructor` back-reference to `child`;
/// 4. emits `"inherited"` on `parent` with `child` as payload.
///
/// Mutates `child` in place; `parent` is left untouched. Fails with
/// `InvalidArgument`, before any mutation, when either side is not callable.
pub fn inherit(child: &ObjectHandle, parent: &ObjectHandle) -> Result<(), EngineError> {
    let parent_prototype = match parent.borrow().as_class() {
        Some(c) => c.prototype(),
        None => {
            return Err(EngineError::InvalidArgument(
                "parent of inherit must be a class".to_string(),
            ))
        }
    };
    if !child.borrow().is_callable() {
        return Err(EngineError::InvalidArgument(
            "child of inherit must be a class".to_string(),
        ));
    }

    let statics = parent.borrow().base().own_enumerable_entries();
    let prototype = object_create(Some(parent_prototype));
    prototype.borrow_mut().base_mut().insert_property(
        CONSTRUCTOR_KEY.to_string(),
        PropertyDescriptor::non_enumerable(Value::Object(child.clone())),
    );
    {
        let mut c = child.borrow_mut();
        for (key, value) in statics {
            c.base_mut()
                .insert_property(key, PropertyDescriptor::plain(value));
        }
        if let Some(class) = c.as_class_mut() {
            class.set_prototype_object(prototype);
        }
    }
    debug!(
        target: "inheritance",
        child = %class_name(child),
        parent = %class_name(parent),
        "chained prototype"
    );
    trigger(parent, EVENT_INHERITED, vec![Value::Object(child.clone())])
}

/// Builds a new anonymous class chained to `parent` under the canonical
/// constructor policy, applying `prototype_props` as non-enumerable instance
/// members and `constructor_props` as non-enumerable statics.
pub fn extend(
    parent: &ObjectHandle,
    prototype_props: Option<PropertySource>,
    constructor_props: Option<PropertySource>,
) -> Result<ObjectHandle, EngineError> {
    extend_with_policy(
        parent,
        prototype_props,
        constructor_props,
        ConstructorPolicy::default(),
    )
}

pub fn extend_with_policy(
    parent: &ObjectHandle,
    prototype_props: Option<PropertySource>,
    constructor_props: Option<PropertySource>,
    policy: ConstructorPolicy,
) -> Result<ObjectHandle, EngineError> {
    let parent_prototype = match parent.borrow().as_class() {
        Some(c) => c.prototype(),
        None => {
            return Err(EngineError::InvalidArgument(
                "receiver of extend must be a class".to_string(),
            ))
        }
    };
    let proto_entries = prototype_props
        .map(|source| source.resolve(&parent_prototype))
        .unwrap_or_default();
    let ctor_entries = constructor_props
        .map(|source| source.resolve(&parent_prototype))
        .unwrap_or_default();

    let provided_constructor = proto_entries.iter().find_map(|(key, value)| {
        if key != CONSTRUCTOR_KEY {
            return None;
        }
        match value {
            Value::Object(f) if f.borrow().is_callable() => Some(f.clone()),
            _ => None,
        }
    });

    let (body, recorded): (NativeFn, Option<&str>) = match policy {
        ConstructorPolicy::ConstructorProperty => match &provided_constructor {
            Some(f) => {
                stamp_recorded_name(f, CONSTRUCTOR_KEY);
                let body = match f.borrow().as_class() {
                    Some(c) => c.body(),
                    None => unreachable!("constructor entry was checked callable"),
                };
                (body, Some(CONSTRUCTOR_KEY))
            }
            None => {
                let parent_handle = parent.clone();
                let body: NativeFn = Rc::new(move |inv: &Invocation, args: Vec<Value>| {
                    apply_constructor(&parent_handle, inv.this().clone(), args)
                });
                (body, None)
            }
        },
        ConstructorPolicy::AutoInitialize => {
            let body: NativeFn = Rc::new(|inv: &Invocation, args: Vec<Value>| {
                let this = match inv.this_object() {
                    Some(o) => o,
                    None => return Ok(Value::Undefined),
                };
                match get_with_owner(&this, INITIALIZE_KEY) {
                    Some((Value::Object(init), owner)) if init.borrow().is_callable() => {
                        let name = resolution_name(&init);
                        call_with_binding(&init, Value::Object(this.clone()), args, name, Some(owner))
                    }
                    _ => Ok(Value::Undefined),
                }
            });
            (body, None)
        }
    };

    let child = crate::ds::class_object::mint_class("", body, None);
    if let Some(name) = recorded {
        stamp_recorded_name(&child, name);
    }
    inherit(&child, parent)?;

    let child_prototype = match child.borrow().as_class() {
        Some(c) => c.prototype(),
        None => unreachable!("extend always mints a class"),
    };
    apply_members(&child_prototype, proto_entries);
    apply_statics(&child, ctor_entries);
    debug!(
        target: "inheritance",
        parent = %class_name(parent),
        policy = ?policy,
        "extended class"
    );
    Ok(child)
}

/// One level up: the constructor reached through the receiver's prototype's
/// own prototype link. `None` is the terminal sentinel, reached at the top of
/// a chain (the universal base class, or an unrooted class).
pub fn parent(class: &ObjectHandle) -> Option<ObjectHandle> {
    let prototype = class.borrow().as_class()?.prototype();
    let above = prototype.borrow().base().prototype()?;
    match get(&above, CONSTRUCTOR_KEY) {
        Value::Object(c) => {
            if c.borrow().is_callable() {
                Some(c)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// The constructors reached by repeatedly following `parent` until the
/// sentinel, excluding the receiver.
pub fn ancestors(class: &ObjectHandle) -> Vec<ObjectHandle> {
    ancestors_with(class, AncestorInclusion::ExcludeSelf)
}

/// Ancestry listing under an explicit inclusion convention. Guarded against
/// cycles, so a self-inheriting class yields a finite listing.
pub fn ancestors_with(class: &ObjectHandle, inclusion: AncestorInclusion) -> Vec<ObjectHandle> {
    let mut out = Vec::new();
    if let AncestorInclusion::IncludeSelf = inclusion {
        out.push(class.clone());
    }
    let mut current = class.clone();
    loop {
        let next = match parent(&current) {
            Some(p) => p,
            None => break,
        };
        if Rc::ptr_eq(&next, class) || out.iter().any(|seen| Rc::ptr_eq(seen, &next)) {
            break;
        }
        out.push(next.clone());
        current = next;
    }
    out
}

/// Direct relationship only: true iff `other`'s prototype links straight to
/// the receiver's prototype.
pub fn is_parent_of(receiver: &ObjectHandle, other: &ObjectHandle) -> bool {
    let receiver_prototype = match receiver.borrow().as_class() {
        Some(c) => c.prototype(),
        None => return false,
    };
    let other_prototype = match other.borrow().as_class() {
        Some(c) => c.prototype(),
        None => return false,
    };
    let result = match other_prototype.borrow().base().prototype() {
        Some(one_up) => Rc::ptr_eq(&one_up, &receiver_prototype),
        None => false,
    };
    result
}

pub fn is_child_of(receiver: &ObjectHandle, other: &ObjectHandle) -> bool {
    is_parent_of(other, receiver)
}

/// Transitive containment: true iff the receiver's prototype appears anywhere
/// above `other`'s prototype in the chain.
pub fn is_ancestor_of(receiver: &ObjectHandle, other: &ObjectHandle) -> bool {
    let receiver_prototype = match receiver.borrow().as_class() {
        Some(c) => c.prototype(),
        None => return false,
    };
    let other_prototype = match other.borrow().as_class() {
        Some(c) => c.prototype(),
        None => return false,
    };
    let mut walk = other_prototype.borrow().base().prototype();
    while let Some(level) = walk {
        if Rc::ptr_eq(&level, &receiver_prototype) {
            return true;
        }
        walk = level.borrow().base().prototype();
    }
    false
}

pub fn is_descendant_of(receiver: &ObjectHandle, other: &ObjectHandle) -> bool {
    is_ancestor_of(other, receiver)
}

fn apply_members(prototype: &ObjectHandle, entries: Vec<(String, Value)>) {
    for (key, value) in entries {
        // the back-reference installed by inherit must survive
        if key == CONSTRUCTOR_KEY {
            continue;
        }
        if let Value::Object(f) = &value {
            stamp_recorded_name(f, &key);
        }
        define_property(prototype, &key, PropertyDescriptor::non_enumerable(value));
    }
}

fn apply_statics(class: &ObjectHandle, entries: Vec<(String, Value)>) {
    for (key, value) in entries {
        define_property(class, &key, PropertyDescriptor::non_enumerable(value));
    }
}

/// Definition-time name stamp: a callable defined under a key keeps that key
/// as its recorded name unless it already has one.
fn stamp_recorded_name(f: &ObjectHandle, key: &str) {
    let mut borrowed = f.borrow_mut();
    if let Some(class) = borrowed.as_class_mut() {
        if class.recorded_name().is_none() {
            class.set_recorded_name(key);
        }
    }
}

fn class_name(o: &ObjectHandle) -> String {
    o.borrow()
        .as_class()
        .map(|c| c.name().to_string())
        .unwrap_or_default()
}
