use crate::runner::ds::array_object::array_index;
use crate::runner::ds::object::{wrap_object, JsObject, JsObjectType, ObjectBase, CLASS_OBJECT};
use crate::runner::ds::object_property::StoredProperty;
use crate::runner::ds::realm::WellKnownIntrinsics;
use crate::runner::ds::value::{JsString, JsValue};
use crate::runner::eval_context::EvalContext;

lazy_static! {
    static ref STRING_LENGTH_PROP: String = "length".to_string();
}

pub const CLASS_BOOLEAN: &str = "Boolean";
pub const CLASS_NUMBER: &str = "Number";
pub const CLASS_STRING: &str = "String";

/// Boolean, Number and String wrapper objects. String wrappers expose every UTF-16 code unit as
/// a read-only index property.
pub struct PrimitiveObject {
    base: ObjectBase,
    value: JsValue,
    code_units: Vec<u16>,
}
impl PrimitiveObject {
    pub fn new(value: JsValue, prototype: Option<JsObjectType>) -> Self {
        let class = match &value {
            JsValue::Boolean(_) => CLASS_BOOLEAN,
            JsValue::Number(_) => CLASS_NUMBER,
            JsValue::String(_) => CLASS_STRING,
            _ => CLASS_OBJECT,
        };
        let code_units: Vec<u16> = match &value {
            JsValue::String(s) => s.code_units().to_vec(),
            _ => vec![],
        };
        let mut obj = PrimitiveObject {
            base: ObjectBase::new_with_class(prototype, class),
            value,
            code_units,
        };
        if class == CLASS_STRING {
            obj.base.properties.insert(
                STRING_LENGTH_PROP.clone(),
                StoredProperty::new_data(
                    JsValue::Number(obj.code_units.len() as f64),
                    false,
                    false,
                    false,
                ),
            );
        }
        obj
    }

    fn string_index_property(&self, property: &str) -> Option<StoredProperty> {
        let idx = array_index(property)? as usize;
        let unit = *self.code_units.get(idx)?;
        Some(StoredProperty::new_data(
            JsValue::String(JsString::from_code_units(vec![unit])),
            false,
            true,
            false,
        ))
    }
}
impl JsObject for PrimitiveObject {
    fn get_object_base(&self) -> &ObjectBase {
        &self.base
    }

    fn get_object_base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    fn primitive_value(&self) -> Option<JsValue> {
        Some(self.value.clone())
    }

    fn get_own_property(&self, property: &str) -> Option<StoredProperty> {
        match self.base.properties.get(property) {
            Some(p) => Some(p.clone()),
            None => self.string_index_property(property),
        }
    }

    fn delete(&mut self, property: &str) -> bool {
        if self.string_index_property(property).is_some() {
            return false;
        }
        let configurable = match self.base.properties.get(property) {
            None => return true,
            Some(p) => p.is_configurable(),
        };
        if configurable {
            self.base.properties.shift_remove(property);
        }
        configurable
    }

    fn own_property_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = (0..self.code_units.len()).map(|i| i.to_string()).collect();
        keys.extend(self.base.properties.keys().cloned());
        keys
    }
}

/// `ToObject` for a Boolean, Number or String.
pub fn create_primitive_wrapper(ctx: &EvalContext, value: JsValue) -> JsObjectType {
    let proto = match &value {
        JsValue::Boolean(_) => ctx.intrinsic(WellKnownIntrinsics::BooleanPrototype),
        JsValue::Number(_) => ctx.intrinsic(WellKnownIntrinsics::NumberPrototype),
        JsValue::String(_) => ctx.intrinsic(WellKnownIntrinsics::StringPrototype),
        _ => ctx.intrinsic(WellKnownIntrinsics::ObjectPrototype),
    };
    wrap_object(PrimitiveObject::new(value, Some(proto)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ds::object_property::PropertyDescriptor;

    #[test]
    fn test_string_wrapper_indices() {
        let mut s = PrimitiveObject::new(JsValue::new_string("ab"), None);
        assert_eq!(s.class_name(), CLASS_STRING);
        match s.get_own_property("1") {
            Some(StoredProperty::Data(d)) => {
                assert_eq!(d.value, JsValue::new_string("b"));
                assert!(!d.writable);
                assert!(d.enumerable);
                assert!(!d.configurable);
            }
            _ => panic!("expected index property"),
        }
        assert!(s.get_own_property("2").is_none());
        assert!(!s.delete("0"));
        assert!(!s
            .define_own_property("0", PropertyDescriptor::new().with_value(JsValue::new_string("z")))
            .unwrap());
        assert_eq!(s.own_property_keys(), vec!["0", "1", "length"]);
    }

    #[test]
    fn test_string_length_counts_code_units() {
        let s = PrimitiveObject::new(JsValue::new_string("a\u{1F600}"), None);
        match s.get_own_property("length") {
            Some(StoredProperty::Data(d)) => assert_eq!(d.value, JsValue::Number(3.0)),
            _ => panic!("expected length"),
        }
    }

    #[test]
    fn test_string_index_keeps_surrogate_halves() {
        let s = PrimitiveObject::new(JsValue::new_string("\u{1F600}"), None);
        let unit = |i: &str| match s.get_own_property(i) {
            Some(StoredProperty::Data(d)) => d.value,
            _ => panic!("expected index property"),
        };
        assert_eq!(unit("0"), JsValue::String(JsString::from_code_units(vec![0xD83D])));
        assert_eq!(unit("1"), JsValue::String(JsString::from_code_units(vec![0xDE00])));
    }

    #[test]
    fn test_number_wrapper() {
        let n = PrimitiveObject::new(JsValue::Number(4.0), None);
        assert_eq!(n.class_name(), CLASS_NUMBER);
        assert_eq!(n.primitive_value(), Some(JsValue::Number(4.0)));
        assert!(n.get_own_property("length").is_none());
    }
}
