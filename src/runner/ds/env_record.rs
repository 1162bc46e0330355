use std::cell::RefCell;
use std::collections::HashMap;

use crate::runner::ds::error::JErrorType;
use crate::runner::ds::object::JsObjectType;
use crate::runner::ds::object_property::PropertyDescriptor;
use crate::runner::ds::operations::object::{define_own_property, delete, get, has_property, put};
use crate::runner::ds::value::JsValue;
use crate::runner::eval_context::EvalContext;

/// Binding table of one scope. Methods take `&self`: records are shared through `Rc` by every
/// closure that captured the scope, and mutation goes through interior cells.
pub trait EnvironmentRecord {
    fn has_binding(&self, ctx: &mut EvalContext, name: &str) -> Result<bool, JErrorType>;

    fn create_mutable_binding(
        &self,
        ctx: &mut EvalContext,
        name: String,
        can_delete: bool,
    ) -> Result<(), JErrorType>;

    fn set_mutable_binding(
        &self,
        ctx: &mut EvalContext,
        name: &str,
        value: JsValue,
        strict: bool,
    ) -> Result<(), JErrorType>;

    fn get_binding_value(
        &self,
        ctx: &mut EvalContext,
        name: &str,
        strict: bool,
    ) -> Result<JsValue, JErrorType>;

    fn delete_binding(&self, ctx: &mut EvalContext, name: &str) -> Result<bool, JErrorType>;

    fn implicit_this_value(&self) -> JsValue;
}

pub enum EnvironmentRecordType {
    Declarative(DeclarativeEnvironmentRecord),
    Object(ObjectEnvironmentRecord),
}
impl EnvironmentRecordType {
    pub fn as_env_record(&self) -> &dyn EnvironmentRecord {
        match self {
            EnvironmentRecordType::Declarative(d) => d,
            EnvironmentRecordType::Object(d) => d,
        }
    }

    pub fn as_declarative(&self) -> Option<&DeclarativeEnvironmentRecord> {
        match self {
            EnvironmentRecordType::Declarative(d) => Some(d),
            _ => None,
        }
    }
}

struct Binding {
    /// `None` until an immutable binding is initialized.
    value: Option<JsValue>,
    mutable: bool,
    deletable: bool,
}

pub struct DeclarativeEnvironmentRecord {
    bindings: RefCell<HashMap<String, Binding>>,
}
impl DeclarativeEnvironmentRecord {
    pub fn new() -> Self {
        DeclarativeEnvironmentRecord {
            bindings: RefCell::new(HashMap::new()),
        }
    }

    fn insert_new(&self, name: String, binding: Binding) -> Result<(), JErrorType> {
        let mut bindings = self.bindings.borrow_mut();
        if bindings.contains_key(&name) {
            return Err(JErrorType::TypeError(format!(
                "'{}' binding is already present",
                name
            )));
        }
        bindings.insert(name, binding);
        Ok(())
    }

    /// Creates a one-shot binding; reads fail until `initialize_immutable_binding` runs.
    pub fn create_immutable_binding(&self, name: String) -> Result<(), JErrorType> {
        self.insert_new(
            name,
            Binding {
                value: None,
                mutable: false,
                deletable: false,
            },
        )
    }

    pub fn initialize_immutable_binding(
        &self,
        name: &str,
        value: JsValue,
    ) -> Result<(), JErrorType> {
        let mut bindings = self.bindings.borrow_mut();
        match bindings.get_mut(name) {
            Some(b) if !b.mutable && b.value.is_none() => {
                b.value = Some(value);
                Ok(())
            }
            Some(_) => Err(JErrorType::TypeError(format!(
                "'{}' is already initialized",
                name
            ))),
            None => Err(JErrorType::ReferenceError(format!("'{}' is not defined", name))),
        }
    }

    pub fn binding_names(&self) -> Vec<String> {
        self.bindings.borrow().keys().cloned().collect()
    }
}
impl Default for DeclarativeEnvironmentRecord {
    fn default() -> Self {
        Self::new()
    }
}
impl EnvironmentRecord for DeclarativeEnvironmentRecord {
    fn has_binding(&self, _ctx: &mut EvalContext, name: &str) -> Result<bool, JErrorType> {
        Ok(self.bindings.borrow().contains_key(name))
    }

    fn create_mutable_binding(
        &self,
        _ctx: &mut EvalContext,
        name: String,
        can_delete: bool,
    ) -> Result<(), JErrorType> {
        self.insert_new(
            name,
            Binding {
                value: Some(JsValue::Undefined),
                mutable: true,
                deletable: can_delete,
            },
        )
    }

    fn set_mutable_binding(
        &self,
        _ctx: &mut EvalContext,
        name: &str,
        value: JsValue,
        strict: bool,
    ) -> Result<(), JErrorType> {
        let mut bindings = self.bindings.borrow_mut();
        match bindings.get_mut(name) {
            None => {
                if strict {
                    Err(JErrorType::ReferenceError(format!("'{}' is not defined", name)))
                } else {
                    Ok(())
                }
            }
            Some(b) if b.mutable => {
                b.value = Some(value);
                Ok(())
            }
            Some(b) => {
                if b.value.is_none() {
                    Err(JErrorType::ReferenceError(format!(
                        "'{}' is not initialized",
                        name
                    )))
                } else if strict {
                    Err(JErrorType::TypeError(format!(
                        "Assignment to constant binding '{}'",
                        name
                    )))
                } else {
                    Ok(())
                }
            }
        }
    }

    fn get_binding_value(
        &self,
        _ctx: &mut EvalContext,
        name: &str,
        _strict: bool,
    ) -> Result<JsValue, JErrorType> {
        match self.bindings.borrow().get(name) {
            None => Err(JErrorType::ReferenceError(format!("'{}' is not defined", name))),
            Some(Binding { value: None, .. }) => Err(JErrorType::ReferenceError(format!(
                "'{}' is not initialized",
                name
            ))),
            Some(Binding { value: Some(v), .. }) => Ok(v.clone()),
        }
    }

    fn delete_binding(&self, _ctx: &mut EvalContext, name: &str) -> Result<bool, JErrorType> {
        let mut bindings = self.bindings.borrow_mut();
        let deletable = match bindings.get(name) {
            None => return Ok(true),
            Some(b) => b.deletable,
        };
        if deletable {
            bindings.remove(name);
        }
        Ok(deletable)
    }

    fn implicit_this_value(&self) -> JsValue {
        JsValue::Undefined
    }
}

/// Binds identifiers to the properties of an object: the global scope, or a `with` scope when
/// `provide_this` is set.
pub struct ObjectEnvironmentRecord {
    binding_object: JsObjectType,
    provide_this: bool,
}
impl ObjectEnvironmentRecord {
    pub fn new(binding_object: JsObjectType, provide_this: bool) -> Self {
        ObjectEnvironmentRecord {
            binding_object,
            provide_this,
        }
    }

    pub fn binding_object(&self) -> &JsObjectType {
        &self.binding_object
    }
}
impl EnvironmentRecord for ObjectEnvironmentRecord {
    fn has_binding(&self, ctx: &mut EvalContext, name: &str) -> Result<bool, JErrorType> {
        has_property(ctx, &self.binding_object, name)
    }

    fn create_mutable_binding(
        &self,
        ctx: &mut EvalContext,
        name: String,
        can_delete: bool,
    ) -> Result<(), JErrorType> {
        define_own_property(
            ctx,
            &self.binding_object,
            &name,
            PropertyDescriptor::data(JsValue::Undefined, true, true, can_delete),
            true,
        )?;
        Ok(())
    }

    fn set_mutable_binding(
        &self,
        ctx: &mut EvalContext,
        name: &str,
        value: JsValue,
        strict: bool,
    ) -> Result<(), JErrorType> {
        put(ctx, &self.binding_object, name, value, strict)
    }

    fn get_binding_value(
        &self,
        ctx: &mut EvalContext,
        name: &str,
        strict: bool,
    ) -> Result<JsValue, JErrorType> {
        if !has_property(ctx, &self.binding_object, name)? {
            return if strict {
                Err(JErrorType::ReferenceError(format!("'{}' is not defined", name)))
            } else {
                Ok(JsValue::Undefined)
            };
        }
        get(ctx, &self.binding_object, name)
    }

    fn delete_binding(&self, ctx: &mut EvalContext, name: &str) -> Result<bool, JErrorType> {
        delete(ctx, &self.binding_object, name, false)
    }

    fn implicit_this_value(&self) -> JsValue {
        if self.provide_this {
            JsValue::Object(self.binding_object.clone())
        } else {
            JsValue::Undefined
        }
    }
}
