use std::rc::Rc;

use crate::runner::ds::error::JErrorType;
use crate::runner::ds::object::JsObjectType;
use crate::runner::ds::operations::test_and_comparison::same_value;
use crate::runner::ds::value::JsValue;

/// A describing property descriptor: every field is optional. Accessor fields use a nested
/// `Option` because "present and undefined" differs from "absent".
#[derive(Clone, Default)]
pub struct PropertyDescriptor {
    pub value: Option<JsValue>,
    pub writable: Option<bool>,
    pub get: Option<Option<JsObjectType>>,
    pub set: Option<Option<JsObjectType>>,
    pub enumerable: Option<bool>,
    pub configurable: Option<bool>,
}
impl PropertyDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fully specified data descriptor.
    pub fn data(value: JsValue, writable: bool, enumerable: bool, configurable: bool) -> Self {
        PropertyDescriptor {
            value: Some(value),
            writable: Some(writable),
            enumerable: Some(enumerable),
            configurable: Some(configurable),
            ..Self::default()
        }
    }

    /// Fully specified accessor descriptor.
    pub fn accessor(
        get: Option<JsObjectType>,
        set: Option<JsObjectType>,
        enumerable: bool,
        configurable: bool,
    ) -> Self {
        PropertyDescriptor {
            get: Some(get),
            set: Some(set),
            enumerable: Some(enumerable),
            configurable: Some(configurable),
            ..Self::default()
        }
    }

    pub fn with_value(mut self, value: JsValue) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_writable(mut self, writable: bool) -> Self {
        self.writable = Some(writable);
        self
    }

    pub fn with_get(mut self, get: Option<JsObjectType>) -> Self {
        self.get = Some(get);
        self
    }

    pub fn with_set(mut self, set: Option<JsObjectType>) -> Self {
        self.set = Some(set);
        self
    }

    pub fn with_enumerable(mut self, enumerable: bool) -> Self {
        self.enumerable = Some(enumerable);
        self
    }

    pub fn with_configurable(mut self, configurable: bool) -> Self {
        self.configurable = Some(configurable);
        self
    }

    pub fn is_data_descriptor(&self) -> bool {
        (self.value.is_some() || self.writable.is_some())
            && self.get.is_none()
            && self.set.is_none()
    }

    pub fn is_accessor_descriptor(&self) -> bool {
        (self.get.is_some() || self.set.is_some())
            && self.value.is_none()
            && self.writable.is_none()
    }

    pub fn is_generic_descriptor(&self) -> bool {
        self.value.is_none() && self.writable.is_none() && self.get.is_none() && self.set.is_none()
    }

    pub fn is_empty(&self) -> bool {
        self.is_generic_descriptor() && self.enumerable.is_none() && self.configurable.is_none()
    }

    /// Rejects descriptors that mix data and accessor fields.
    pub fn validate(&self) -> Result<(), JErrorType> {
        if (self.value.is_some() || self.writable.is_some())
            && (self.get.is_some() || self.set.is_some())
        {
            Err(JErrorType::TypeError(
                "Invalid property descriptor. Cannot both specify accessors and a value or writable attribute".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

pub struct PropertyDescriptorData {
    pub value: JsValue,
    pub writable: bool,
    pub enumerable: bool,
    pub configurable: bool,
}

pub struct PropertyDescriptorAccessor {
    pub get: Option<JsObjectType>,
    pub set: Option<JsObjectType>,
    pub enumerable: bool,
    pub configurable: bool,
}

/// What a property table actually holds: a data-or-accessor record with every attribute resolved.
pub enum StoredProperty {
    Data(PropertyDescriptorData),
    Accessor(PropertyDescriptorAccessor),
}
impl Clone for StoredProperty {
    fn clone(&self) -> Self {
        match self {
            StoredProperty::Data(d) => StoredProperty::Data(PropertyDescriptorData {
                value: d.value.clone(),
                writable: d.writable,
                enumerable: d.enumerable,
                configurable: d.configurable,
            }),
            StoredProperty::Accessor(a) => StoredProperty::Accessor(PropertyDescriptorAccessor {
                get: a.get.clone(),
                set: a.set.clone(),
                enumerable: a.enumerable,
                configurable: a.configurable,
            }),
        }
    }
}
impl StoredProperty {
    pub fn new_data(value: JsValue, writable: bool, enumerable: bool, configurable: bool) -> Self {
        StoredProperty::Data(PropertyDescriptorData {
            value,
            writable,
            enumerable,
            configurable,
        })
    }

    /// Creates a fresh property from a describing descriptor; absent fields take their defaults
    /// (`undefined` / `false`).
    pub fn new_from_descriptor(desc: PropertyDescriptor) -> Self {
        let enumerable = desc.enumerable.unwrap_or(false);
        let configurable = desc.configurable.unwrap_or(false);
        if desc.is_accessor_descriptor() {
            StoredProperty::Accessor(PropertyDescriptorAccessor {
                get: desc.get.unwrap_or(None),
                set: desc.set.unwrap_or(None),
                enumerable,
                configurable,
            })
        } else {
            StoredProperty::Data(PropertyDescriptorData {
                value: desc.value.unwrap_or(JsValue::Undefined),
                writable: desc.writable.unwrap_or(false),
                enumerable,
                configurable,
            })
        }
    }

    pub fn is_enumerable(&self) -> bool {
        match self {
            StoredProperty::Data(d) => d.enumerable,
            StoredProperty::Accessor(a) => a.enumerable,
        }
    }

    pub fn is_configurable(&self) -> bool {
        match self {
            StoredProperty::Data(d) => d.configurable,
            StoredProperty::Accessor(a) => a.configurable,
        }
    }

    pub fn is_data_descriptor(&self) -> bool {
        matches!(self, StoredProperty::Data(_))
    }

    pub fn is_accessor_descriptor(&self) -> bool {
        matches!(self, StoredProperty::Accessor(_))
    }

    pub fn to_descriptor(&self) -> PropertyDescriptor {
        match self {
            StoredProperty::Data(d) => PropertyDescriptor::data(
                d.value.clone(),
                d.writable,
                d.enumerable,
                d.configurable,
            ),
            StoredProperty::Accessor(a) => PropertyDescriptor::accessor(
                a.get.clone(),
                a.set.clone(),
                a.enumerable,
                a.configurable,
            ),
        }
    }

    /// True when every field present in `desc` already holds the same value here.
    pub fn is_unchanged_by(&self, desc: &PropertyDescriptor) -> bool {
        if let Some(e) = desc.enumerable {
            if e != self.is_enumerable() {
                return false;
            }
        }
        if let Some(c) = desc.configurable {
            if c != self.is_configurable() {
                return false;
            }
        }
        match self {
            StoredProperty::Data(d) => {
                if desc.get.is_some() || desc.set.is_some() {
                    return false;
                }
                if let Some(w) = desc.writable {
                    if w != d.writable {
                        return false;
                    }
                }
                match &desc.value {
                    Some(v) => same_value(v, &d.value),
                    None => true,
                }
            }
            StoredProperty::Accessor(a) => {
                if desc.value.is_some() || desc.writable.is_some() {
                    return false;
                }
                if let Some(g) = &desc.get {
                    if !same_function(g, &a.get) {
                        return false;
                    }
                }
                if let Some(s) = &desc.set {
                    if !same_function(s, &a.set) {
                        return false;
                    }
                }
                true
            }
        }
    }
}

pub fn same_function(a: &Option<JsObjectType>, b: &Option<JsObjectType>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => Rc::ptr_eq(a, b),
        _ => false,
    }
}
