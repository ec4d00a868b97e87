//! Abstract operations over object handles: chain lookup, property
//! definition, shallow copy, prototype maintenance, and per-object ids.

use std::rc::Rc;

use tracing::trace;
use uuid::Uuid;

use crate::ds::object::ObjectHandle;
use crate::ds::object_property::PropertyDescriptor;
use crate::ds::realm::Realm;
use crate::ds::value::Value;

/// Prototype-chain lookup. `Undefined` on a miss.
pub fn get(o: &ObjectHandle, key: &str) -> Value {
    match get_with_owner(o, key) {
        Some((value, _)) => value,
        None => Value::Undefined,
    }
}

/// Prototype-chain lookup that also reports which level of the chain owns the
/// resolved property. The owner is what a resolved method uses as its home
/// when dispatching to its parent implementation.
pub fn get_with_owner(o: &ObjectHandle, key: &str) -> Option<(Value, ObjectHandle)> {
    let mut current = o.clone();
    loop {
        let next = {
            let borrowed = current.borrow();
            if let Some(descriptor) = borrowed.base().own_property(key) {
                return Some((descriptor.value.clone(), current.clone()));
            }
            borrowed.base().prototype()
        };
        current = next?;
    }
}

/// Plain assignment: an own enumerable data property.
pub fn put(o: &ObjectHandle, key: &str, value: Value) {
    define_property(o, key, PropertyDescriptor::plain(value));
}

pub fn define_property(o: &ObjectHandle, key: &str, descriptor: PropertyDescriptor) {
    o.borrow_mut()
        .base_mut()
        .insert_property(key.to_string(), descriptor);
}

pub fn has_own_property(o: &ObjectHandle, key: &str) -> bool {
    o.borrow().base().has_own_property(key)
}

pub fn has_property(o: &ObjectHandle, key: &str) -> bool {
    get_with_owner(o, key).is_some()
}

pub fn own_property_keys(o: &ObjectHandle) -> Vec<String> {
    o.borrow().base().own_property_keys()
}

/// The internal prototype link.
pub fn get_prototype_of(o: &ObjectHandle) -> Option<ObjectHandle> {
    o.borrow().base().prototype()
}

/// Replaces the internal prototype link. Refuses a link that would close the
/// chain into a cycle, reporting `false` like the host primitive it mirrors.
pub fn set_prototype_of(o: &ObjectHandle, prototype: Option<ObjectHandle>) -> bool {
    if let Some(p) = &prototype {
        let mut walk = Some(p.clone());
        while let Some(link) = walk {
            if Rc::ptr_eq(&link, o) {
                return false;
            }
            walk = link.borrow().base().prototype();
        }
    }
    o.borrow_mut().base_mut().set_prototype(prototype);
    true
}

/// Copies every own enumerable property of each source onto the target, in
/// source order, and returns the target. Copied properties become plain
/// (enumerable) members regardless of their flags elsewhere. The source set
/// is snapshotted before writing, so merging an object onto itself is a
/// harmless no-op.
pub fn merge(target: &ObjectHandle, sources: &[ObjectHandle]) -> ObjectHandle {
    for source in sources {
        let entries = source.borrow().base().own_enumerable_entries();
        let mut t = target.borrow_mut();
        for (key, value) in entries {
            t.base_mut()
                .insert_property(key, PropertyDescriptor::plain(value));
        }
    }
    target.clone()
}

/// A fresh realm-rooted shallow copy of the source's own enumerable
/// properties.
pub fn copy(realm: &Realm, source: &ObjectHandle) -> ObjectHandle {
    let target = realm.new_object();
    merge(&target, std::slice::from_ref(source))
}

/// Process-unique identifier for an object, memoized on first access. Handler
/// identity in the event layer is defined by this id.
pub fn guid(o: &ObjectHandle) -> Uuid {
    let mut borrowed = o.borrow_mut();
    if let Some(id) = borrowed.base().guid() {
        return id;
    }
    let id = Uuid::new_v4();
    trace!(target: "object", id = %id, "minted guid");
    borrowed.base_mut().set_guid(id);
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ds::object::object_create;

    #[test]
    fn test_merge_copies_enumerable_own_properties_only() {
        let source = object_create(None);
        put(&source, "a", Value::Boolean(true));
        define_property(
            &source,
            "hidden",
            PropertyDescriptor::non_enumerable(Value::Boolean(true)),
        );
        let target = object_create(None);
        merge(&target, &[source]);
        assert!(has_own_property(&target, "a"));
        assert!(!has_own_property(&target, "hidden"));
    }

    #[test]
    fn test_merge_with_self_is_a_no_op() {
        let o = object_create(None);
        put(&o, "a", Value::Null);
        merge(&o, &[o.clone()]);
        assert_eq!(own_property_keys(&o), vec!["a"]);
    }

    #[test]
    fn test_guid_is_memoized() {
        let o = object_create(None);
        assert_eq!(guid(&o), guid(&o));
        assert_ne!(guid(&o), guid(&object_create(None)));
    }

    #[test]
    fn test_set_prototype_of_refuses_cycles() {
        let a = object_create(None);
        let b = object_create(Some(a.clone()));
        assert!(!set_prototype_of(&a, Some(b)));
        assert!(a.borrow().base().prototype().is_none());
    }

    #[test]
    fn test_chain_lookup_reports_owner() {
        let proto = object_create(None);
        put(&proto, "x", Value::Boolean(true));
        let o = object_create(Some(proto.clone()));
        let (value, owner) = get_with_owner(&o, "x").unwrap();
        assert_eq!(value, Value::Boolean(true));
        assert!(Rc::ptr_eq(&owner, &proto));
        assert_eq!(get(&o, "missing"), Value::Undefined);
    }
}
