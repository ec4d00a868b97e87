//! # lineage - classical inheritance and events for dynamic objects
//!
//! A small dynamic object model featuring:
//! - Class entities with prototype-chain inheritance and flattened statics
//! - Explicit super dispatch (no caller inspection, no name magic)
//! - A per-object publish/subscribe event layer with in-band cancellation
//! - Mixins and capability tests that account for them
//!
//! Everything is driven through `Rc<RefCell<_>>` object handles and free
//! operations over them; the model is single-threaded and synchronous by
//! construction.
//!
//! ## Quick Start
//!
//! ### Deriving a class
//!
//! ```
//! use lineage::ds::operations::function::construct;
//! use lineage::ds::operations::inheritance::{extend, parent, PropertySource};
//! use lineage::ds::operations::object::{get, put};
//! use lineage::ds::operations::test_and_comparison::{instance_of, same_object};
//! use lineage::ds::realm::Realm;
//! use lineage::ds::value::Value;
//!
//! let realm = Realm::new();
//! let person = realm.new_class("Person", |inv, args| {
//!     if let Some(this) = inv.this_object() {
//!         if let Some(name) = args.into_iter().next() {
//!             put(&this, "name", name);
//!         }
//!     }
//!     Ok(Value::Undefined)
//! });
//!
//! // No constructor property given, so constructing an Employee runs the
//! // Person constructor against the new instance.
//! let employee = extend(
//!     &person,
//!     Some(PropertySource::Entries(vec![(
//!         "title".to_string(),
//!         Value::String("staff".to_string()),
//!     )])),
//!     None,
//! )
//! .unwrap();
//! assert!(same_object(&parent(&employee).unwrap(), &person));
//!
//! let ada = construct(&employee, vec![Value::String("Ada".to_string())]).unwrap();
//! let ada = ada.as_object().unwrap().clone();
//! assert_eq!(get(&ada, "name"), Value::String("Ada".to_string()));
//! assert_eq!(get(&ada, "title"), Value::String("staff".to_string()));
//! assert!(instance_of(&Value::Object(ada.clone()), &person));
//! ```
//!
//! ### Overriding a method and reaching the parent implementation
//!
//! ```
//! use lineage::ds::operations::function::{
//!     class_prototype, construct, invoke_method, native_function,
//! };
//! use lineage::ds::operations::inheritance::{extend, PropertySource};
//! use lineage::ds::operations::object::put;
//! use lineage::ds::realm::Realm;
//! use lineage::ds::value::Value;
//!
//! let realm = Realm::new();
//! let animal = realm.new_class("Animal", |_inv, _args| Ok(Value::Undefined));
//! let animal_proto = class_prototype(&animal).unwrap();
//! put(
//!     &animal_proto,
//!     "speak",
//!     Value::Object(native_function("speak", |_inv, _args| {
//!         Ok(Value::String("...".to_string()))
//!     })),
//! );
//!
//! // The override is anonymous; defining it under "speak" records the name
//! // it resolves its parent implementation with.
//! let dog_speak = native_function("", |inv, _args| {
//!     match inv.call_super(vec![])? {
//!         Value::String(s) => Ok(Value::String(format!("{} woof", s))),
//!         _ => Ok(Value::String("woof".to_string())),
//!     }
//! });
//! let dog = extend(
//!     &animal,
//!     Some(PropertySource::Entries(vec![(
//!         "speak".to_string(),
//!         Value::Object(dog_speak),
//!     )])),
//!     None,
//! )
//! .unwrap();
//!
//! let rex = construct(&dog, vec![]).unwrap();
//! let rex = rex.as_object().unwrap().clone();
//! assert_eq!(
//!     invoke_method(&rex, "speak", vec![]).unwrap(),
//!     Value::String("... woof".to_string())
//! );
//! ```
//!
//! ### Listening to events
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use lineage::ds::operations::events::{off, on, trigger};
//! use lineage::ds::operations::function::native_function;
//! use lineage::ds::operations::object::get;
//! use lineage::ds::realm::Realm;
//! use lineage::ds::value::Value;
//!
//! let realm = Realm::new();
//! let button = realm.new_object();
//! let log = Rc::new(RefCell::new(Vec::new()));
//!
//! let seen = log.clone();
//! let on_click = native_function("onClick", move |_inv, args| {
//!     if let Some(Value::Object(event)) = args.first() {
//!         if let Value::String(t) = get(event, "type") {
//!             seen.borrow_mut().push(t);
//!         }
//!     }
//!     Ok(Value::Undefined)
//! });
//!
//! on(&button, "click", &on_click).unwrap();
//! trigger(&button, "click", vec![]).unwrap();
//! off(&button, "click", Some(&on_click));
//! trigger(&button, "click", vec![]).unwrap();
//! assert_eq!(log.borrow().as_slice(), ["click"]);
//! ```
//!
//! ## Architecture
//!
//! - **[`ds`]** - Data structures (values, objects, classes, registries)
//!   - **[`ds::operations`]** - Abstract operations over object handles
//!     (property access, calls, inheritance, events, mixins)

pub mod ds;
