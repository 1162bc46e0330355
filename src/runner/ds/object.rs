use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::runner::ds::array_object::ArrayObject;
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::function_object::FunctionObject;
use crate::runner::ds::generator::GeneratorObject;
use crate::runner::ds::object_property::{
    same_function, PropertyDescriptor, PropertyDescriptorAccessor, PropertyDescriptorData,
    StoredProperty,
};
use crate::runner::ds::operations::test_and_comparison::same_value;
use crate::runner::ds::value::JsValue;

pub type JsObjectType = Rc<RefCell<ObjectType>>;

pub const CLASS_OBJECT: &str = "Object";

pub enum ObjectType {
    Ordinary(Box<dyn JsObject>),
    Function(FunctionObject),
    Array(ArrayObject),
    Generator(GeneratorObject),
}
impl ObjectType {
    pub fn is_callable(&self) -> bool {
        matches!(self, ObjectType::Function(_))
    }

    pub fn as_js_object(&self) -> &dyn JsObject {
        match self {
            ObjectType::Ordinary(o) => o.as_ref(),
            ObjectType::Function(o) => o,
            ObjectType::Array(o) => o,
            ObjectType::Generator(o) => o,
        }
    }

    pub fn as_js_object_mut(&mut self) -> &mut dyn JsObject {
        match self {
            ObjectType::Ordinary(o) => o.as_mut(),
            ObjectType::Function(o) => o,
            ObjectType::Array(o) => o,
            ObjectType::Generator(o) => o,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionObject> {
        match self {
            ObjectType::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_generator(&self) -> Option<&GeneratorObject> {
        match self {
            ObjectType::Generator(g) => Some(g),
            _ => None,
        }
    }
}

pub struct ObjectBase {
    pub(crate) properties: IndexMap<String, StoredProperty>,
    pub(crate) is_extensible: bool,
    pub(crate) prototype: Option<JsObjectType>,
    pub(crate) class: &'static str,
}
impl ObjectBase {
    pub fn new(prototype: Option<JsObjectType>) -> Self {
        Self::new_with_class(prototype, CLASS_OBJECT)
    }

    pub fn new_with_class(prototype: Option<JsObjectType>, class: &'static str) -> Self {
        ObjectBase {
            properties: IndexMap::new(),
            is_extensible: true,
            prototype,
            class,
        }
    }
}

/// The per-object behaviour hooks. Default implementations are the ordinary-object algorithms;
/// host objects override the ones they specialise (array `length`, string indices, lazy
/// forwarding). Operations that may run script code (accessors, `DefaultValue`) are built on top
/// of these in `operations::object` so that no `RefCell` borrow is held while user code runs.
pub trait JsObject {
    fn get_object_base(&self) -> &ObjectBase;

    fn get_object_base_mut(&mut self) -> &mut ObjectBase;

    fn class_name(&self) -> &'static str {
        self.get_object_base().class
    }

    /// The primitive a Boolean/Number/String wrapper holds.
    fn primitive_value(&self) -> Option<JsValue> {
        None
    }

    /// Properties whose incoming value must be coerced with `ToNumber` before
    /// `define_own_property` sees it (array `length`).
    fn coerces_to_number(&self, _property: &str) -> bool {
        false
    }

    fn get_prototype_of(&self) -> Option<JsObjectType> {
        self.get_object_base().prototype.clone()
    }

    /// Raw prototype store; cycle rejection happens in `operations::object::set_prototype_of`.
    fn set_prototype_of(&mut self, prototype: Option<JsObjectType>) {
        self.get_object_base_mut().prototype = prototype;
    }

    fn is_extensible(&self) -> bool {
        self.get_object_base().is_extensible
    }

    fn prevent_extensions(&mut self) -> bool {
        self.get_object_base_mut().is_extensible = false;
        true
    }

    fn get_own_property(&self, property: &str) -> Option<StoredProperty> {
        self.get_object_base().properties.get(property).cloned()
    }

    /// Walks the prototype chain. `depth` bounds the walk so that an accidental cycle fails
    /// closed instead of looping.
    fn get_property(
        &self,
        property: &str,
        depth: usize,
    ) -> Result<Option<StoredProperty>, JErrorType> {
        if let Some(p) = self.get_own_property(property) {
            return Ok(Some(p));
        }
        match self.get_prototype_of() {
            None => Ok(None),
            Some(proto) => {
                if depth == 0 {
                    return Err(prototype_chain_too_deep());
                }
                let found = proto.borrow().as_js_object().get_property(property, depth - 1);
                found
            }
        }
    }

    fn has_property(&self, property: &str, depth: usize) -> Result<bool, JErrorType> {
        Ok(self.get_property(property, depth)?.is_some())
    }

    fn can_put(&self, property: &str, depth: usize) -> Result<bool, JErrorType> {
        if let Some(own) = self.get_own_property(property) {
            return Ok(match own {
                StoredProperty::Accessor(a) => a.set.is_some(),
                StoredProperty::Data(d) => d.writable,
            });
        }
        let proto = match self.get_prototype_of() {
            None => return Ok(self.is_extensible()),
            Some(p) => p,
        };
        if depth == 0 {
            return Err(prototype_chain_too_deep());
        }
        let inherited = proto.borrow().as_js_object().get_property(property, depth - 1)?;
        Ok(match inherited {
            None => self.is_extensible(),
            Some(StoredProperty::Accessor(a)) => a.set.is_some(),
            Some(StoredProperty::Data(d)) => self.is_extensible() && d.writable,
        })
    }

    /// Returns `Ok(false)` on a rejected definition; the caller decides whether that throws.
    fn define_own_property(
        &mut self,
        property: &str,
        descriptor: PropertyDescriptor,
    ) -> Result<bool, JErrorType> {
        Ok(ordinary_define_own_property(self, property, descriptor))
    }

    /// Removes a configurable own property. `false` means a non-configurable property blocked it.
    fn delete(&mut self, property: &str) -> bool {
        let configurable = match self.get_object_base().properties.get(property) {
            None => return true,
            Some(p) => p.is_configurable(),
        };
        if configurable {
            self.get_object_base_mut().properties.shift_remove(property);
        }
        configurable
    }

    /// Own string keys in insertion order.
    fn own_property_keys(&self) -> Vec<String> {
        self.get_object_base().properties.keys().cloned().collect()
    }
}

pub(crate) fn prototype_chain_too_deep() -> JErrorType {
    JErrorType::TypeError("Cyclic or too deep prototype chain".to_string())
}

pub struct CoreObject {
    base: ObjectBase,
}
impl CoreObject {
    pub fn new(prototype: Option<JsObjectType>) -> Self {
        CoreObject {
            base: ObjectBase::new(prototype),
        }
    }

    pub fn new_with_class(prototype: Option<JsObjectType>, class: &'static str) -> Self {
        CoreObject {
            base: ObjectBase::new_with_class(prototype, class),
        }
    }
}
impl JsObject for CoreObject {
    fn get_object_base(&self) -> &ObjectBase {
        &self.base
    }

    fn get_object_base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }
}

pub fn object_create(prototype: Option<JsObjectType>) -> JsObjectType {
    Rc::new(RefCell::new(ObjectType::Ordinary(Box::new(CoreObject::new(
        prototype,
    )))))
}

pub fn object_create_with_class(
    prototype: Option<JsObjectType>,
    class: &'static str,
) -> JsObjectType {
    Rc::new(RefCell::new(ObjectType::Ordinary(Box::new(
        CoreObject::new_with_class(prototype, class),
    ))))
}

pub fn wrap_object<J: JsObject + 'static>(o: J) -> JsObjectType {
    Rc::new(RefCell::new(ObjectType::Ordinary(Box::new(o))))
}

/// The ordinary `[[DefineOwnProperty]]` validation: `true` when the definition was applied (or was
/// a no-op), `false` when it violates the current property's attributes.
pub fn ordinary_define_own_property<J: JsObject + ?Sized>(
    o: &mut J,
    property: &str,
    descriptor: PropertyDescriptor,
) -> bool {
    let current = match o.get_own_property(property) {
        None => {
            if !o.is_extensible() {
                return false;
            }
            o.get_object_base_mut().properties.insert(
                property.to_string(),
                StoredProperty::new_from_descriptor(descriptor),
            );
            return true;
        }
        Some(current) => current,
    };
    if descriptor.is_empty() || current.is_unchanged_by(&descriptor) {
        return true;
    }
    if !current.is_configurable() {
        if descriptor.configurable == Some(true) {
            return false;
        }
        if let Some(e) = descriptor.enumerable {
            if e != current.is_enumerable() {
                return false;
            }
        }
    }
    let updated = if descriptor.is_generic_descriptor() {
        current
    } else if current.is_data_descriptor() != descriptor.is_data_descriptor() {
        if !current.is_configurable() {
            return false;
        }
        // Kind flip keeps only the two shared attributes.
        let enumerable = current.is_enumerable();
        let configurable = current.is_configurable();
        if current.is_data_descriptor() {
            StoredProperty::Accessor(PropertyDescriptorAccessor {
                get: None,
                set: None,
                enumerable,
                configurable,
            })
        } else {
            StoredProperty::new_data(JsValue::Undefined, false, enumerable, configurable)
        }
    } else {
        match &current {
            StoredProperty::Data(d) => {
                if !d.configurable && !d.writable {
                    if descriptor.writable == Some(true) {
                        return false;
                    }
                    if let Some(v) = &descriptor.value {
                        if !same_value(v, &d.value) {
                            return false;
                        }
                    }
                }
            }
            StoredProperty::Accessor(a) => {
                if !a.configurable {
                    if let Some(s) = &descriptor.set {
                        if !same_function(s, &a.set) {
                            return false;
                        }
                    }
                    if let Some(g) = &descriptor.get {
                        if !same_function(g, &a.get) {
                            return false;
                        }
                    }
                }
            }
        }
        current
    };
    let merged = apply_descriptor(updated, descriptor);
    o.get_object_base_mut()
        .properties
        .insert(property.to_string(), merged);
    true
}

fn apply_descriptor(current: StoredProperty, desc: PropertyDescriptor) -> StoredProperty {
    match current {
        StoredProperty::Data(d) => StoredProperty::Data(PropertyDescriptorData {
            value: desc.value.unwrap_or(d.value),
            writable: desc.writable.unwrap_or(d.writable),
            enumerable: desc.enumerable.unwrap_or(d.enumerable),
            configurable: desc.configurable.unwrap_or(d.configurable),
        }),
        StoredProperty::Accessor(a) => StoredProperty::Accessor(PropertyDescriptorAccessor {
            get: desc.get.unwrap_or(a.get),
            set: desc.set.unwrap_or(a.set),
            enumerable: desc.enumerable.unwrap_or(a.enumerable),
            configurable: desc.configurable.unwrap_or(a.configurable),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> CoreObject {
        CoreObject::new(None)
    }

    #[test]
    fn test_define_new_property_on_extensible_object() {
        let mut o = plain();
        assert!(o.define_own_property("a", PropertyDescriptor::new().with_value(JsValue::Number(1.0))).unwrap());
        let p = o.get_own_property("a").unwrap();
        assert!(p.is_data_descriptor());
        assert!(!p.is_configurable());
    }

    #[test]
    fn test_define_on_non_extensible_object_fails() {
        let mut o = plain();
        o.prevent_extensions();
        assert!(!o.define_own_property("a", PropertyDescriptor::data(JsValue::Null, true, true, true)).unwrap());
        assert!(o.get_own_property("a").is_none());
    }

    #[test]
    fn test_frozen_value_change_is_rejected() {
        let mut o = plain();
        o.define_own_property("k", PropertyDescriptor::data(JsValue::Number(1.0), false, false, false))
            .unwrap();
        assert!(!o.define_own_property("k", PropertyDescriptor::new().with_value(JsValue::Number(2.0))).unwrap());
        assert!(o.define_own_property("k", PropertyDescriptor::new().with_value(JsValue::Number(1.0))).unwrap());
        assert!(!o.define_own_property("k", PropertyDescriptor::new().with_writable(true)).unwrap());
        assert!(!o.define_own_property("k", PropertyDescriptor::new().with_enumerable(true)).unwrap());
        assert!(!o.define_own_property("k", PropertyDescriptor::new().with_get(None)).unwrap());
    }

    #[test]
    fn test_writable_non_configurable_can_change_value_and_drop_writable() {
        let mut o = plain();
        o.define_own_property("k", PropertyDescriptor::data(JsValue::Number(1.0), true, true, false))
            .unwrap();
        assert!(o.define_own_property("k", PropertyDescriptor::new().with_value(JsValue::Number(2.0))).unwrap());
        assert!(o.define_own_property("k", PropertyDescriptor::new().with_writable(false)).unwrap());
        match o.get_own_property("k").unwrap() {
            StoredProperty::Data(d) => {
                assert_eq!(d.value, JsValue::Number(2.0));
                assert!(!d.writable);
            }
            _ => panic!("expected data"),
        }
    }

    #[test]
    fn test_configurable_kind_flip_resets_fields() {
        let mut o = plain();
        o.define_own_property("k", PropertyDescriptor::data(JsValue::Number(1.0), true, true, true))
            .unwrap();
        assert!(o.define_own_property("k", PropertyDescriptor::new().with_get(None)).unwrap());
        match o.get_own_property("k").unwrap() {
            StoredProperty::Accessor(a) => {
                assert!(a.get.is_none());
                assert!(a.set.is_none());
                assert!(a.enumerable);
                assert!(a.configurable);
            }
            _ => panic!("expected accessor"),
        }
    }

    #[test]
    fn test_delete_respects_configurable() {
        let mut o = plain();
        o.define_own_property("a", PropertyDescriptor::data(JsValue::Null, true, true, true))
            .unwrap();
        o.define_own_property("b", PropertyDescriptor::data(JsValue::Null, true, true, false))
            .unwrap();
        assert!(o.delete("a"));
        assert!(!o.delete("b"));
        assert!(o.delete("missing"));
        assert_eq!(o.own_property_keys(), vec!["b".to_string()]);
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let mut o = plain();
        for k in &["z", "a", "m"] {
            o.define_own_property(k, PropertyDescriptor::data(JsValue::Null, true, true, true))
                .unwrap();
        }
        o.delete("a");
        o.define_own_property("a", PropertyDescriptor::data(JsValue::Null, true, true, true))
            .unwrap();
        assert_eq!(o.own_property_keys(), vec!["z", "m", "a"]);
    }
}

impl std::fmt::Debug for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[object {}]", self.as_js_object().class_name())
    }
}
