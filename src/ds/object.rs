use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use uuid::Uuid;

use crate::ds::class_object::ClassObject;
use crate::ds::event::EventRegistryHandle;
use crate::ds::object_property::PropertyDescriptor;
use crate::ds::value::Value;

/// The universal reference through which every operation works. All sharing
/// is single-threaded by construction.
pub type ObjectHandle = Rc<RefCell<ObjectType>>;

pub enum ObjectType {
    Ordinary(ObjectBase),
    Class(ClassObject),
}

impl std::fmt::Debug for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

impl ObjectType {
    pub fn base(&self) -> &ObjectBase {
        match self {
            ObjectType::Ordinary(b) => b,
            ObjectType::Class(c) => c.base(),
        }
    }

    pub fn base_mut(&mut self) -> &mut ObjectBase {
        match self {
            ObjectType::Ordinary(b) => b,
            ObjectType::Class(c) => c.base_mut(),
        }
    }

    pub fn is_callable(&self) -> bool {
        match self {
            ObjectType::Class(_) => true,
            _ => false,
        }
    }

    pub fn as_class(&self) -> Option<&ClassObject> {
        match self {
            ObjectType::Class(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_class_mut(&mut self) -> Option<&mut ClassObject> {
        match self {
            ObjectType::Class(c) => Some(c),
            _ => None,
        }
    }

    pub fn to_display_string(&self) -> String {
        match self {
            ObjectType::Ordinary(_) => "[object]".to_string(),
            ObjectType::Class(c) => {
                if c.name().is_empty() {
                    "[class]".to_string()
                } else {
                    format!("[class {}]", c.name())
                }
            }
        }
    }
}

/// Per-object state: the property table, the internal prototype link, and the
/// lazily-created framework state (event registry, mixin record, memoized
/// guid). The framework state is kept in dedicated fields rather than in the
/// property table, so enumerating an object's own properties can never leak
/// library plumbing.
pub struct ObjectBase {
    properties: HashMap<String, PropertyDescriptor>,
    prototype: Option<ObjectHandle>,
    events: Option<EventRegistryHandle>,
    mixins: Vec<ObjectHandle>,
    guid: Option<Uuid>,
}

impl ObjectBase {
    pub fn new(prototype: Option<ObjectHandle>) -> Self {
        ObjectBase {
            properties: HashMap::new(),
            prototype,
            events: None,
            mixins: Vec::new(),
            guid: None,
        }
    }

    pub fn prototype(&self) -> Option<ObjectHandle> {
        self.prototype.clone()
    }

    pub fn set_prototype(&mut self, prototype: Option<ObjectHandle>) {
        self.prototype = prototype;
    }

    pub fn own_property(&self, key: &str) -> Option<&PropertyDescriptor> {
        self.properties.get(key)
    }

    pub fn has_own_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn insert_property(&mut self, key: String, descriptor: PropertyDescriptor) {
        self.properties.insert(key, descriptor);
    }

    /// All own keys, sorted for deterministic enumeration.
    pub fn own_property_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.properties.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Snapshot of the own enumerable properties, sorted by key. This is the
    /// source set of the shallow-copy operations.
    pub fn own_enumerable_entries(&self) -> Vec<(String, Value)> {
        let mut entries: Vec<(String, Value)> = self
            .properties
            .iter()
            .filter(|(_, d)| d.enumerable)
            .map(|(k, d)| (k.clone(), d.value.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    pub fn events(&self) -> Option<EventRegistryHandle> {
        self.events.clone()
    }

    pub fn set_events(&mut self, registry: EventRegistryHandle) {
        self.events = Some(registry);
    }

    pub fn mixin_record(&self) -> &[ObjectHandle] {
        &self.mixins
    }

    pub fn push_mixin(&mut self, class: ObjectHandle) {
        self.mixins.push(class);
    }

    pub fn guid(&self) -> Option<Uuid> {
        self.guid
    }

    pub fn set_guid(&mut self, id: Uuid) {
        self.guid = Some(id);
    }
}

pub fn object_create(prototype: Option<ObjectHandle>) -> ObjectHandle {
    Rc::new(RefCell::new(ObjectType::Ordinary(ObjectBase::new(
        prototype,
    ))))
}
