//! Tests for the classical-inheritance operations.
//!
//! These cover prototype-chain wiring, static flattening, ancestry
//! introspection, and super dispatch.

extern crate lineage;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use assert_matches::assert_matches;

use lineage::ds::error::EngineError;
use lineage::ds::object::{object_create, ObjectHandle};
use lineage::ds::operations::function::{
    class_prototype, construct, invoke_method, native_function,
};
use lineage::ds::operations::inheritance::{
    ancestors, ancestors_with, extend, inherit, is_ancestor_of, is_child_of, is_descendant_of,
    is_parent_of, parent, AncestorInclusion, PropertySource,
};
use lineage::ds::operations::object::{define_property, get, put};
use lineage::ds::operations::test_and_comparison::{instance_of, same_object};
use lineage::ds::object_property::PropertyDescriptor;
use lineage::ds::realm::Realm;
use lineage::ds::value::{NumberValue, Value};

/// Helper: a class with a no-op body, rooting a chain of its own.
fn root_class(name: &str) -> ObjectHandle {
    native_function(name, |_inv, _args| Ok(Value::Undefined))
}

/// Helper: an entry for a property source.
fn entry(key: &str, value: Value) -> (String, Value) {
    (key.to_string(), value)
}

/// Helper: unwraps a constructed instance to its handle.
fn instance_of_class(class: &ObjectHandle) -> ObjectHandle {
    let value = construct(class, vec![]).expect("construction should succeed");
    value.as_object().expect("instance is an object").clone()
}

// ============================================================================
// Chain wiring
// ============================================================================

mod chain_tests {
    use super::*;

    #[test]
    fn test_inherit_links_parent_and_child() {
        let a = root_class("A");
        let b = root_class("B");
        inherit(&b, &a).unwrap();

        assert!(same_object(&parent(&b).unwrap(), &a));
        assert!(is_parent_of(&a, &b));
        assert!(is_child_of(&b, &a));

        let instance = instance_of_class(&b);
        assert!(instance_of(&Value::Object(instance.clone()), &a));
        assert!(instance_of(&Value::Object(instance), &b));
    }

    #[test]
    fn test_inherit_requires_callable_parent() {
        let b = root_class("B");
        let result = inherit(&b, &object_create(None));
        assert_matches!(result, Err(EngineError::InvalidArgument(_)));
        // nothing was mutated before the validation failed
        assert!(parent(&b).is_none());
    }

    #[test]
    fn test_inherit_requires_callable_child() {
        let a = root_class("A");
        let result = inherit(&object_create(None), &a);
        assert_matches!(result, Err(EngineError::InvalidArgument(_)));
    }

    #[test]
    fn test_reinherit_restores_constructor_back_reference() {
        let a = root_class("A");
        let b = root_class("B");
        inherit(&b, &a).unwrap();
        inherit(&b, &a).unwrap();

        let prototype = class_prototype(&b).unwrap();
        let back = get(&prototype, "constructor");
        assert!(same_object(back.as_object().unwrap(), &b));
    }

    #[test]
    fn test_statics_flatten_on_inherit() {
        let a = root_class("A");
        put(&a, "count", Value::Number(NumberValue::Integer(1)));
        define_property(
            &a,
            "hidden",
            PropertyDescriptor::non_enumerable(Value::Boolean(true)),
        );
        let b = root_class("B");
        inherit(&b, &a).unwrap();

        assert_eq!(get(&b, "count"), Value::Number(NumberValue::Integer(1)));
        // only own enumerable statics travel
        assert_eq!(get(&b, "hidden"), Value::Undefined);
    }

    #[test]
    fn test_statics_flatten_transitively_through_middle_class() {
        let a = root_class("A");
        put(&a, "origin", Value::String("a".to_string()));
        let b = root_class("B");
        inherit(&b, &a).unwrap();
        let c = root_class("C");
        inherit(&c, &b).unwrap();

        assert_eq!(get(&c, "origin"), Value::String("a".to_string()));
    }

    #[test]
    fn test_inherit_leaves_existing_instances_on_old_chain() {
        let a = root_class("A");
        let b = root_class("B");
        let before = instance_of_class(&b);
        inherit(&b, &a).unwrap();
        let after = instance_of_class(&b);

        assert!(!instance_of(&Value::Object(before), &a));
        assert!(instance_of(&Value::Object(after), &a));
    }
}

// ============================================================================
// Ancestry introspection
// ============================================================================

mod ancestry_tests {
    use super::*;

    fn three_level_chain() -> (ObjectHandle, ObjectHandle, ObjectHandle) {
        let a = root_class("A");
        let b = root_class("B");
        let c = root_class("C");
        inherit(&b, &a).unwrap();
        inherit(&c, &b).unwrap();
        (a, b, c)
    }

    #[test]
    fn test_ancestors_exclude_receiver_by_default() {
        let (a, b, c) = three_level_chain();
        let listing = ancestors(&c);
        assert_eq!(listing.len(), 2);
        assert!(same_object(&listing[0], &b));
        assert!(same_object(&listing[1], &a));
    }

    #[test]
    fn test_ancestors_include_receiver_convention() {
        let (a, b, c) = three_level_chain();
        let listing = ancestors_with(&c, AncestorInclusion::IncludeSelf);
        assert_eq!(listing.len(), 3);
        assert!(same_object(&listing[0], &c));
        assert!(same_object(&listing[1], &b));
        assert!(same_object(&listing[2], &a));
    }

    #[test]
    fn test_realm_rooted_classes_end_at_the_base_class() {
        let realm = Realm::new();
        let p = realm.new_class("P", |_inv, _args| Ok(Value::Undefined));

        assert!(same_object(&parent(&p).unwrap(), &realm.object_class()));
        let listing = ancestors(&p);
        assert_eq!(listing.len(), 1);
        assert!(same_object(&listing[0], &realm.object_class()));
        // the base class itself is the end of the walk
        assert!(parent(&realm.object_class()).is_none());
    }

    #[test]
    fn test_transitive_predicates_are_not_direct() {
        let (a, _b, c) = three_level_chain();
        assert!(is_ancestor_of(&a, &c));
        assert!(is_descendant_of(&c, &a));
        assert!(!is_parent_of(&a, &c));
        assert!(!is_child_of(&c, &a));
        assert!(!is_ancestor_of(&c, &a));
    }

    #[test]
    fn test_ancestry_queries_are_idempotent() {
        let (_a, _b, c) = three_level_chain();
        let first = ancestors(&c);
        let second = ancestors(&c);
        assert_eq!(first.len(), second.len());
        for (x, y) in first.iter().zip(second.iter()) {
            assert!(same_object(x, y));
        }
        assert!(same_object(
            &parent(&c).unwrap(),
            &parent(&c).unwrap()
        ));
    }

    #[test]
    fn test_self_inheritance_yields_a_finite_listing() {
        let a = root_class("A");
        inherit(&a, &a).unwrap();
        assert!(ancestors(&a).is_empty());
    }
}

// ============================================================================
// Super dispatch
// ============================================================================

mod super_tests {
    use super::*;

    #[test]
    fn test_override_reaches_parent_implementation() {
        let log: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));

        let animal = root_class("Animal");
        let animal_log = log.clone();
        put(
            &class_prototype(&animal).unwrap(),
            "speak",
            Value::Object(native_function("speak", move |_inv, _args| {
                animal_log.borrow_mut().push("animal".to_string());
                Ok(Value::Undefined)
            })),
        );

        let dog_log = log.clone();
        let dog = extend(
            &animal,
            Some(PropertySource::Entries(vec![entry(
                "speak",
                Value::Object(native_function("", move |inv, _args| {
                    dog_log.borrow_mut().push("dog".to_string());
                    inv.call_super(vec![])
                })),
            )])),
            None,
        )
        .unwrap();

        let rex = instance_of_class(&dog);
        invoke_method(&rex, "speak", vec![]).unwrap();
        assert_eq!(log.borrow().as_slice(), ["dog", "animal"]);
    }

    #[test]
    fn test_super_method_resolves_to_an_unbound_callable() {
        let saw_callable = Rc::new(Cell::new(false));

        let base = root_class("Base");
        put(
            &class_prototype(&base).unwrap(),
            "run",
            Value::Object(native_function("run", |_inv, _args| Ok(Value::Undefined))),
        );

        let seen = saw_callable.clone();
        let derived = extend(
            &base,
            Some(PropertySource::Entries(vec![entry(
                "run",
                Value::Object(native_function("", move |inv, _args| {
                    seen.set(inv.super_method().is_callable());
                    Ok(Value::Undefined)
                })),
            )])),
            None,
        )
        .unwrap();

        invoke_method(&instance_of_class(&derived), "run", vec![]).unwrap();
        assert!(saw_callable.get());
    }

    #[test]
    fn test_super_of_anonymous_function_is_undefined() {
        let observed = Rc::new(Cell::new(false));

        let base = root_class("Base");
        put(
            &class_prototype(&base).unwrap(),
            "run",
            Value::Object(native_function("run", |_inv, _args| Ok(Value::Undefined))),
        );
        let derived = root_class("Derived");
        inherit(&derived, &base).unwrap();

        // installed directly, so nothing records a name for the override
        let seen = observed.clone();
        put(
            &class_prototype(&derived).unwrap(),
            "run",
            Value::Object(native_function("", move |inv, _args| {
                let miss = matches!(inv.super_method(), Value::Undefined);
                let call_fails = inv.call_super(vec![]).is_err();
                seen.set(miss && call_fails);
                Ok(Value::Undefined)
            })),
        );

        invoke_method(&instance_of_class(&derived), "run", vec![]).unwrap();
        assert!(observed.get());
    }

    #[test]
    fn test_super_with_no_parent_member_is_undefined() {
        let observed = Rc::new(Cell::new(false));

        let base = root_class("Base");
        let seen = observed.clone();
        let derived = extend(
            &base,
            Some(PropertySource::Entries(vec![entry(
                "only_here",
                Value::Object(native_function("", move |inv, _args| {
                    seen.set(matches!(inv.super_method(), Value::Undefined));
                    Ok(Value::Undefined)
                })),
            )])),
            None,
        )
        .unwrap();

        invoke_method(&instance_of_class(&derived), "only_here", vec![]).unwrap();
        assert!(observed.get());
    }
}

// ============================================================================
// The extend builder
// ============================================================================

mod extend_tests {
    use super::*;

    #[test]
    fn test_extend_requires_callable_receiver() {
        let result = extend(&object_create(None), None, None);
        assert_matches!(result, Err(EngineError::InvalidArgument(_)));
    }

    #[test]
    fn test_extend_applies_members_without_enumerability() {
        let base = root_class("Base");
        let derived = extend(
            &base,
            Some(PropertySource::Entries(vec![entry(
                "title",
                Value::String("staff".to_string()),
            )])),
            Some(PropertySource::Entries(vec![entry(
                "version",
                Value::Number(NumberValue::Integer(2)),
            )])),
        )
        .unwrap();

        let prototype = class_prototype(&derived).unwrap();
        assert_eq!(get(&prototype, "title"), Value::String("staff".to_string()));
        assert!(prototype.borrow().base().own_enumerable_entries().is_empty());

        // statics applied by extend are hidden too, so a further inherit
        // does not flatten them downward
        assert_eq!(
            get(&derived, "version"),
            Value::Number(NumberValue::Integer(2))
        );
        let grandchild = extend(&derived, None, None).unwrap();
        assert_eq!(get(&grandchild, "version"), Value::Undefined);
    }

    #[test]
    fn test_deferred_properties_receive_parent_prototype() {
        let base = root_class("Base");
        put(
            &class_prototype(&base).unwrap(),
            "greeting",
            Value::String("hello".to_string()),
        );

        let expected = class_prototype(&base).unwrap();
        let saw_parent = Rc::new(Cell::new(false));
        let seen = saw_parent.clone();
        let derived = extend(
            &base,
            Some(PropertySource::Deferred(Rc::new(move |parent_proto| {
                seen.set(same_object(parent_proto, &expected));
                vec![("loud_greeting".to_string(), get(parent_proto, "greeting"))]
            }))),
            None,
        )
        .unwrap();

        assert!(saw_parent.get());
        assert_eq!(
            get(&class_prototype(&derived).unwrap(), "loud_greeting"),
            Value::String("hello".to_string())
        );
    }

    #[test]
    fn test_constructor_entry_never_overwrites_back_reference() {
        let base = root_class("Base");
        let derived = extend(
            &base,
            Some(PropertySource::Entries(vec![entry(
                "constructor",
                Value::Object(native_function("", |_inv, _args| Ok(Value::Undefined))),
            )])),
            None,
        )
        .unwrap();

        let prototype = class_prototype(&derived).unwrap();
        let back = get(&prototype, "constructor");
        assert!(same_object(back.as_object().unwrap(), &derived));
    }
}
