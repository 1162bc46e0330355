//! Object built-in.
//!
//! Provides the Object constructor, its reflection functions and the prototype methods every
//! object inherits.

use crate::runner::ds::array_object::array_create;
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::object::{object_create, JsObjectType};
use crate::runner::ds::object_property::PropertyDescriptor;
use crate::runner::ds::operations::object::{
    create_data_property_or_throw, define_own_property, get, get_own_property, get_prototype_of,
    has_property, is_extensible, own_property_keys, prevent_extensions, set_prototype_of,
};
use crate::runner::ds::operations::type_conversion::{to_boolean, to_object, to_string};
use crate::runner::ds::realm::WellKnownIntrinsics;
use crate::runner::ds::value::JsValue;
use crate::runner::eval_context::EvalContext;

use super::{arg, define_constructor, define_native_method};

pub fn register(ctx: &mut EvalContext) -> Result<(), JErrorType> {
    let proto = ctx.intrinsic(WellKnownIntrinsics::ObjectPrototype);
    define_native_method(ctx, &proto, "toString", object_to_string, 0)?;
    define_native_method(ctx, &proto, "valueOf", object_value_of, 0)?;
    define_native_method(ctx, &proto, "hasOwnProperty", object_has_own_property, 1)?;
    define_native_method(ctx, &proto, "propertyIsEnumerable", object_property_is_enumerable, 1)?;
    define_native_method(ctx, &proto, "isPrototypeOf", object_is_prototype_of, 1)?;

    let object = define_constructor(ctx, "Object", object_constructor, 1, &proto)?;
    define_native_method(ctx, &object, "getPrototypeOf", object_get_prototype_of, 1)?;
    define_native_method(ctx, &object, "setPrototypeOf", object_set_prototype_of, 2)?;
    define_native_method(ctx, &object, "preventExtensions", object_prevent_extensions, 1)?;
    define_native_method(ctx, &object, "isExtensible", object_is_extensible, 1)?;
    define_native_method(ctx, &object, "keys", object_keys, 1)?;
    define_native_method(ctx, &object, "defineProperty", object_define_property, 3)?;
    define_native_method(
        ctx,
        &object,
        "getOwnPropertyDescriptor",
        object_get_own_property_descriptor,
        2,
    )?;
    Ok(())
}

fn require_object(v: &JsValue, fn_name: &str) -> Result<JsObjectType, JErrorType> {
    match v {
        JsValue::Object(o) => Ok(o.clone()),
        _ => Err(JErrorType::TypeError(format!(
            "{} called on non-object",
            fn_name
        ))),
    }
}

/// `ToPropertyDescriptor`: reads the attribute fields present on a descriptor object.
pub fn to_property_descriptor(
    ctx: &mut EvalContext,
    v: &JsValue,
) -> Result<PropertyDescriptor, JErrorType> {
    let o = require_object(v, "Property description")?;
    let mut desc = PropertyDescriptor::new();
    if has_property(ctx, &o, "enumerable")? {
        desc.enumerable = Some(to_boolean(&get(ctx, &o, "enumerable")?));
    }
    if has_property(ctx, &o, "configurable")? {
        desc.configurable = Some(to_boolean(&get(ctx, &o, "configurable")?));
    }
    if has_property(ctx, &o, "value")? {
        desc.value = Some(get(ctx, &o, "value")?);
    }
    if has_property(ctx, &o, "writable")? {
        desc.writable = Some(to_boolean(&get(ctx, &o, "writable")?));
    }
    for field in &["get", "set"] {
        if has_property(ctx, &o, field)? {
            let accessor = match get(ctx, &o, field)? {
                JsValue::Undefined => None,
                JsValue::Object(f) if f.borrow().is_callable() => Some(f),
                other => {
                    return Err(JErrorType::TypeError(format!(
                        "Getter or setter must be a function: {}",
                        other
                    )))
                }
            };
            if *field == "get" {
                desc.get = Some(accessor);
            } else {
                desc.set = Some(accessor);
            }
        }
    }
    desc.validate()?;
    Ok(desc)
}

/// `FromPropertyDescriptor`: the inverse of [`to_property_descriptor`] for a stored property.
pub fn from_property_descriptor(
    ctx: &mut EvalContext,
    desc: &PropertyDescriptor,
) -> Result<JsValue, JErrorType> {
    let o = object_create(Some(ctx.intrinsic(WellKnownIntrinsics::ObjectPrototype)));
    if let Some(v) = &desc.value {
        create_data_property_or_throw(ctx, &o, "value", v.clone())?;
    }
    if let Some(w) = desc.writable {
        create_data_property_or_throw(ctx, &o, "writable", JsValue::Boolean(w))?;
    }
    let as_value = |f: &Option<JsObjectType>| match f {
        Some(f) => JsValue::Object(f.clone()),
        None => JsValue::Undefined,
    };
    if let Some(g) = &desc.get {
        create_data_property_or_throw(ctx, &o, "get", as_value(g))?;
    }
    if let Some(s) = &desc.set {
        create_data_property_or_throw(ctx, &o, "set", as_value(s))?;
    }
    if let Some(e) = desc.enumerable {
        create_data_property_or_throw(ctx, &o, "enumerable", JsValue::Boolean(e))?;
    }
    if let Some(c) = desc.configurable {
        create_data_property_or_throw(ctx, &o, "configurable", JsValue::Boolean(c))?;
    }
    Ok(JsValue::Object(o))
}

/// `Object(value)` / `new Object(value)`.
fn object_constructor(
    ctx: &mut EvalContext,
    _this: JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    match arg(&args, 0) {
        JsValue::Undefined | JsValue::Null => Ok(JsValue::Object(object_create(Some(
            ctx.intrinsic(WellKnownIntrinsics::ObjectPrototype),
        )))),
        v => Ok(JsValue::Object(to_object(ctx, &v)?)),
    }
}

/// Object.prototype.toString
fn object_to_string(
    ctx: &mut EvalContext,
    this: JsValue,
    _args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    let class = match &this {
        JsValue::Undefined => "Undefined",
        JsValue::Null => "Null",
        v => {
            let o = to_object(ctx, v)?;
            let class = o.borrow().as_js_object().class_name();
            class
        }
    };
    Ok(JsValue::new_string(format!("[object {}]", class)))
}

/// Object.prototype.valueOf
fn object_value_of(
    ctx: &mut EvalContext,
    this: JsValue,
    _args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    Ok(JsValue::Object(to_object(ctx, &this)?))
}

/// Object.prototype.hasOwnProperty
fn object_has_own_property(
    ctx: &mut EvalContext,
    this: JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    let name = to_string(ctx, &arg(&args, 0))?;
    let o = to_object(ctx, &this)?;
    Ok(JsValue::Boolean(get_own_property(&o, &name).is_some()))
}

/// Object.prototype.propertyIsEnumerable
fn object_property_is_enumerable(
    ctx: &mut EvalContext,
    this: JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    let name = to_string(ctx, &arg(&args, 0))?;
    let o = to_object(ctx, &this)?;
    let enumerable = get_own_property(&o, &name).map_or(false, |p| p.is_enumerable());
    Ok(JsValue::Boolean(enumerable))
}

/// Object.prototype.isPrototypeOf
fn object_is_prototype_of(
    ctx: &mut EvalContext,
    this: JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    let v = match arg(&args, 0) {
        JsValue::Object(v) => v,
        _ => return Ok(JsValue::Boolean(false)),
    };
    let o = to_object(ctx, &this)?;
    let mut depth = ctx.config.max_prototype_chain_depth;
    let mut current = get_prototype_of(&v);
    while let Some(p) = current {
        if std::rc::Rc::ptr_eq(&p, &o) {
            return Ok(JsValue::Boolean(true));
        }
        if depth == 0 {
            break;
        }
        depth -= 1;
        current = get_prototype_of(&p);
    }
    Ok(JsValue::Boolean(false))
}

fn object_get_prototype_of(
    _ctx: &mut EvalContext,
    _this: JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    let o = require_object(&arg(&args, 0), "Object.getPrototypeOf")?;
    Ok(match get_prototype_of(&o) {
        Some(p) => JsValue::Object(p),
        None => JsValue::Null,
    })
}

fn object_set_prototype_of(
    ctx: &mut EvalContext,
    _this: JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    let target = arg(&args, 0);
    let o = require_object(&target, "Object.setPrototypeOf")?;
    let proto = match arg(&args, 1) {
        JsValue::Object(p) => Some(p),
        JsValue::Null => None,
        _ => {
            return Err(JErrorType::TypeError(
                "Object prototype may only be an Object or null".to_string(),
            ))
        }
    };
    if !set_prototype_of(ctx, &o, proto)? {
        return Err(JErrorType::TypeError(
            "Cyclic __proto__ value or non-extensible object".to_string(),
        ));
    }
    Ok(target)
}

fn object_prevent_extensions(
    _ctx: &mut EvalContext,
    _this: JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    let target = arg(&args, 0);
    let o = require_object(&target, "Object.preventExtensions")?;
    prevent_extensions(&o);
    Ok(target)
}

fn object_is_extensible(
    _ctx: &mut EvalContext,
    _this: JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    let o = require_object(&arg(&args, 0), "Object.isExtensible")?;
    Ok(JsValue::Boolean(is_extensible(&o)))
}

/// Object.keys: own enumerable keys, in property order, as an array.
fn object_keys(
    ctx: &mut EvalContext,
    _this: JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    let o = require_object(&arg(&args, 0), "Object.keys")?;
    let keys: Vec<String> = own_property_keys(&o)
        .into_iter()
        .filter(|k| get_own_property(&o, k).map_or(false, |p| p.is_enumerable()))
        .collect();
    let array = array_create(0, Some(ctx.intrinsic(WellKnownIntrinsics::ArrayPrototype)));
    for (i, key) in keys.into_iter().enumerate() {
        create_data_property_or_throw(ctx, &array, &i.to_string(), JsValue::new_string(key))?;
    }
    Ok(JsValue::Object(array))
}

fn object_define_property(
    ctx: &mut EvalContext,
    _this: JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    let target = arg(&args, 0);
    let o = require_object(&target, "Object.defineProperty")?;
    let name = to_string(ctx, &arg(&args, 1))?;
    let desc = to_property_descriptor(ctx, &arg(&args, 2))?;
    define_own_property(ctx, &o, &name, desc, true)?;
    Ok(target)
}

fn object_get_own_property_descriptor(
    ctx: &mut EvalContext,
    _this: JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    let o = to_object(ctx, &arg(&args, 0))?;
    let name = to_string(ctx, &arg(&args, 1))?;
    match get_own_property(&o, &name) {
        Some(p) => from_property_descriptor(ctx, &p.to_descriptor()),
        None => Ok(JsValue::Undefined),
    }
}
