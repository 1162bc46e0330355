use std::cell::RefCell;
use std::rc::Rc;

use crate::runner::ds::error::JErrorType;
use crate::runner::ds::object::{
    ordinary_define_own_property, JsObject, JsObjectType, ObjectBase, ObjectType,
};
use crate::runner::ds::object_property::{PropertyDescriptor, StoredProperty};
use crate::runner::ds::operations::type_conversion::{f64_to_uint32, primitive_to_number};
use crate::runner::ds::value::JsValue;

lazy_static! {
    pub static ref ARRAY_LENGTH_PROP: String = "length".to_string();
}

pub const CLASS_ARRAY: &str = "Array";

/// Parses a canonical array index (`"0"`, `"17"`, never `"017"`), i.e. a uint32 below 2^32 - 1.
pub fn array_index(property: &str) -> Option<u32> {
    if property.is_empty() || (property.len() > 1 && property.starts_with('0')) {
        return None;
    }
    if !property.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match property.parse::<u64>() {
        Ok(n) if n < u32::MAX as u64 => Some(n as u32),
        _ => None,
    }
}

/// Array exotic object: an ordinary property table whose `length` is kept in step with the
/// highest index and truncates elements when lowered.
pub struct ArrayObject {
    base: ObjectBase,
}
impl ArrayObject {
    pub fn new(length: u32, prototype: Option<JsObjectType>) -> Self {
        let mut obj = ArrayObject {
            base: ObjectBase::new_with_class(prototype, CLASS_ARRAY),
        };
        obj.base.properties.insert(
            ARRAY_LENGTH_PROP.clone(),
            StoredProperty::new_data(JsValue::Number(length as f64), true, false, false),
        );
        obj
    }

    fn get_own_length_property(&self) -> Result<(u32, bool), JErrorType> {
        match self.base.properties.get(ARRAY_LENGTH_PROP.as_str()) {
            Some(StoredProperty::Data(d)) => {
                let len = match &d.value {
                    JsValue::Number(n) => f64_to_uint32(*n),
                    _ => 0,
                };
                Ok((len, d.writable))
            }
            _ => Err(JErrorType::TypeError(
                "Array length must be an own data property".to_string(),
            )),
        }
    }

    pub fn length(&self) -> u32 {
        self.get_own_length_property().map(|(l, _)| l).unwrap_or(0)
    }

    fn set_length_value(&mut self, length: u32) -> bool {
        ordinary_define_own_property(
            self,
            ARRAY_LENGTH_PROP.as_str(),
            PropertyDescriptor::new().with_value(JsValue::Number(length as f64)),
        )
    }

    fn array_set_length(&mut self, descriptor: PropertyDescriptor) -> Result<bool, JErrorType> {
        let value = match &descriptor.value {
            None => {
                return Ok(ordinary_define_own_property(
                    self,
                    ARRAY_LENGTH_PROP.as_str(),
                    descriptor,
                ))
            }
            Some(v) => v.clone(),
        };
        let number_len = primitive_to_number(&value)?;
        let new_len = f64_to_uint32(number_len);
        if new_len as f64 != number_len {
            return Err(JErrorType::RangeError(format!(
                "Invalid array length: {}",
                value
            )));
        }
        let mut new_len_desc = descriptor.with_value(JsValue::Number(new_len as f64));
        let (old_len, old_writable) = self.get_own_length_property()?;
        if new_len >= old_len {
            return Ok(ordinary_define_own_property(
                self,
                ARRAY_LENGTH_PROP.as_str(),
                new_len_desc,
            ));
        }
        if !old_writable {
            return Ok(false);
        }
        let new_writable = new_len_desc.writable != Some(false);
        if !new_writable {
            // Stays writable until the elements are gone.
            new_len_desc.writable = Some(true);
        }
        if !ordinary_define_own_property(self, ARRAY_LENGTH_PROP.as_str(), new_len_desc) {
            return Ok(false);
        }

        let mut doomed: Vec<u32> = self
            .base
            .properties
            .keys()
            .filter_map(|k| array_index(k))
            .filter(|idx| *idx >= new_len)
            .collect();
        doomed.sort_unstable_by(|a, b| b.cmp(a));
        log::debug!(
            "array length {} -> {}, deleting {} elements",
            old_len,
            new_len,
            doomed.len()
        );
        for idx in doomed {
            if !self.delete(&idx.to_string()) {
                self.set_length_value(idx + 1);
                if !new_writable {
                    ordinary_define_own_property(
                        self,
                        ARRAY_LENGTH_PROP.as_str(),
                        PropertyDescriptor::new().with_writable(false),
                    );
                }
                return Ok(false);
            }
        }
        if !new_writable {
            ordinary_define_own_property(
                self,
                ARRAY_LENGTH_PROP.as_str(),
                PropertyDescriptor::new().with_writable(false),
            );
        }
        Ok(true)
    }
}
impl JsObject for ArrayObject {
    fn get_object_base(&self) -> &ObjectBase {
        &self.base
    }

    fn get_object_base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    fn coerces_to_number(&self, property: &str) -> bool {
        property == ARRAY_LENGTH_PROP.as_str()
    }

    fn define_own_property(
        &mut self,
        property: &str,
        descriptor: PropertyDescriptor,
    ) -> Result<bool, JErrorType> {
        if property == ARRAY_LENGTH_PROP.as_str() {
            return self.array_set_length(descriptor);
        }
        if let Some(idx) = array_index(property) {
            let (old_len, length_writable) = self.get_own_length_property()?;
            if idx >= old_len && !length_writable {
                return Ok(false);
            }
            if !ordinary_define_own_property(self, property, descriptor) {
                return Ok(false);
            }
            if idx >= old_len {
                self.set_length_value(idx + 1);
            }
            return Ok(true);
        }
        Ok(ordinary_define_own_property(self, property, descriptor))
    }

    /// Index keys in ascending numeric order, then the remaining keys in insertion order.
    fn own_property_keys(&self) -> Vec<String> {
        let mut indices: Vec<(u32, &String)> = vec![];
        let mut others = vec![];
        for key in self.base.properties.keys() {
            match array_index(key) {
                Some(idx) => indices.push((idx, key)),
                None => others.push(key.clone()),
            }
        }
        indices.sort_unstable_by_key(|(idx, _)| *idx);
        let mut result: Vec<String> = indices.into_iter().map(|(_, k)| k.clone()).collect();
        result.append(&mut others);
        result
    }
}

pub fn array_create(length: u32, prototype: Option<JsObjectType>) -> JsObjectType {
    Rc::new(RefCell::new(ObjectType::Array(ArrayObject::new(
        length, prototype,
    ))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn array_with(values: &[f64]) -> ArrayObject {
        let mut arr = ArrayObject::new(0, None);
        for (i, v) in values.iter().enumerate() {
            assert!(arr
                .define_own_property(
                    &i.to_string(),
                    PropertyDescriptor::data(JsValue::Number(*v), true, true, true),
                )
                .unwrap());
        }
        arr
    }

    #[test]
    fn test_array_index() {
        assert_eq!(array_index("0"), Some(0));
        assert_eq!(array_index("42"), Some(42));
        assert_eq!(array_index("042"), None);
        assert_eq!(array_index("-1"), None);
        assert_eq!(array_index("4294967294"), Some(4294967294));
        assert_eq!(array_index("4294967295"), None);
        assert_eq!(array_index("length"), None);
    }

    #[test]
    fn test_index_define_grows_length() {
        let arr = array_with(&[1.0, 2.0, 3.0]);
        assert_eq!(arr.length(), 3);
    }

    #[test]
    fn test_fractional_length_is_range_error() {
        let mut arr = array_with(&[1.0, 2.0]);
        let err = arr
            .define_own_property("length", PropertyDescriptor::new().with_value(JsValue::Number(3.5)))
            .unwrap_err();
        assert!(err.is_range_error());
        assert_eq!(arr.length(), 2);
    }

    #[test]
    fn test_shrink_truncates() {
        let mut arr = array_with(&[0.0, 1.0, 2.0, 3.0, 4.0]);
        assert!(arr
            .define_own_property("length", PropertyDescriptor::new().with_value(JsValue::Number(2.0)))
            .unwrap());
        assert_eq!(arr.length(), 2);
        assert!(arr.get_own_property("1").is_some());
        assert!(arr.get_own_property("2").is_none());
        assert!(arr.get_own_property("4").is_none());
    }

    #[test]
    fn test_shrink_stops_at_non_configurable_index() {
        let mut arr = array_with(&[0.0, 1.0, 2.0, 3.0, 4.0]);
        arr.define_own_property("2", PropertyDescriptor::new().with_configurable(false))
            .unwrap();
        assert!(!arr
            .define_own_property("length", PropertyDescriptor::new().with_value(JsValue::Number(0.0)))
            .unwrap());
        assert_eq!(arr.length(), 3);
        assert!(arr.get_own_property("2").is_some());
        assert!(arr.get_own_property("3").is_none());
    }

    #[test]
    fn test_non_writable_length_blocks_shrink_and_growth() {
        let mut arr = array_with(&[0.0, 1.0, 2.0]);
        assert!(arr
            .define_own_property("length", PropertyDescriptor::new().with_writable(false))
            .unwrap());
        assert!(!arr
            .define_own_property("length", PropertyDescriptor::new().with_value(JsValue::Number(1.0)))
            .unwrap());
        assert!(!arr
            .define_own_property("7", PropertyDescriptor::data(JsValue::Null, true, true, true))
            .unwrap());
        assert_eq!(arr.length(), 3);
    }

    #[test]
    fn test_keys_put_indices_first() {
        let mut arr = ArrayObject::new(0, None);
        for k in &["10", "x", "2", "y", "0"] {
            arr.define_own_property(k, PropertyDescriptor::data(JsValue::Null, true, true, true))
                .unwrap();
        }
        assert_eq!(
            arr.own_property_keys(),
            vec!["0", "2", "10", "length", "x", "y"]
        );
    }
}
