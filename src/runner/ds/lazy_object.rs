use once_cell::unsync::OnceCell;

use crate::runner::ds::error::JErrorType;
use crate::runner::ds::object::{JsObject, JsObjectType, ObjectBase};
use crate::runner::ds::object_property::{PropertyDescriptor, StoredProperty};
use crate::runner::ds::value::JsValue;

/// A host object whose real contents are built on first access. Every hook forwards to the
/// built target; `base` is only an empty shell to satisfy the trait.
pub struct LazyObject {
    base: ObjectBase,
    target: OnceCell<JsObjectType>,
    builder: Box<dyn Fn() -> JsObjectType>,
}
impl LazyObject {
    pub fn new<F>(builder: F) -> Self
    where
        F: Fn() -> JsObjectType + 'static,
    {
        LazyObject {
            base: ObjectBase::new(None),
            target: OnceCell::new(),
            builder: Box::new(builder),
        }
    }

    pub fn is_materialized(&self) -> bool {
        self.target.get().is_some()
    }

    fn target(&self) -> &JsObjectType {
        self.target.get_or_init(|| {
            log::debug!("materializing lazy object");
            (self.builder)()
        })
    }
}
impl JsObject for LazyObject {
    fn get_object_base(&self) -> &ObjectBase {
        &self.base
    }

    fn get_object_base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    fn class_name(&self) -> &'static str {
        let class = self.target().borrow().as_js_object().class_name();
        class
    }

    fn primitive_value(&self) -> Option<JsValue> {
        let v = self.target().borrow().as_js_object().primitive_value();
        v
    }

    fn coerces_to_number(&self, property: &str) -> bool {
        let coerces = self.target().borrow().as_js_object().coerces_to_number(property);
        coerces
    }

    fn get_prototype_of(&self) -> Option<JsObjectType> {
        let proto = self.target().borrow().as_js_object().get_prototype_of();
        proto
    }

    fn set_prototype_of(&mut self, prototype: Option<JsObjectType>) {
        self.target()
            .borrow_mut()
            .as_js_object_mut()
            .set_prototype_of(prototype)
    }

    fn is_extensible(&self) -> bool {
        let extensible = self.target().borrow().as_js_object().is_extensible();
        extensible
    }

    fn prevent_extensions(&mut self) -> bool {
        let done = self.target().borrow_mut().as_js_object_mut().prevent_extensions();
        done
    }

    fn get_own_property(&self, property: &str) -> Option<StoredProperty> {
        let p = self.target().borrow().as_js_object().get_own_property(property);
        p
    }

    fn get_property(
        &self,
        property: &str,
        depth: usize,
    ) -> Result<Option<StoredProperty>, JErrorType> {
        let p = self.target().borrow().as_js_object().get_property(property, depth);
        p
    }

    fn has_property(&self, property: &str, depth: usize) -> Result<bool, JErrorType> {
        let has = self.target().borrow().as_js_object().has_property(property, depth);
        has
    }

    fn can_put(&self, property: &str, depth: usize) -> Result<bool, JErrorType> {
        let can = self.target().borrow().as_js_object().can_put(property, depth);
        can
    }

    fn define_own_property(
        &mut self,
        property: &str,
        descriptor: PropertyDescriptor,
    ) -> Result<bool, JErrorType> {
        let done = self
            .target()
            .borrow_mut()
            .as_js_object_mut()
            .define_own_property(property, descriptor);
        done
    }

    fn delete(&mut self, property: &str) -> bool {
        let done = self.target().borrow_mut().as_js_object_mut().delete(property);
        done
    }

    fn own_property_keys(&self) -> Vec<String> {
        let keys = self.target().borrow().as_js_object().own_property_keys();
        keys
    }
}
