use std::collections::HashSet;
use std::rc::Rc;

use crate::runner::ds::error::JErrorType;
use crate::runner::ds::function_object::call_function;
use crate::runner::ds::object::{prototype_chain_too_deep, JsObjectType};
use crate::runner::ds::object_property::{PropertyDescriptor, StoredProperty};
use crate::runner::ds::operations::test_and_comparison::is_callable;
use crate::runner::ds::operations::type_conversion::{to_number, to_object, PreferredType};
use crate::runner::ds::value::JsValue;
use crate::runner::eval_context::EvalContext;

pub const CLASS_DATE: &str = "Date";

pub fn get_own_property(o: &JsObjectType, name: &str) -> Option<StoredProperty> {
    let p = o.borrow().as_js_object().get_own_property(name);
    p
}

pub fn has_own_property(o: &JsObjectType, name: &str) -> bool {
    get_own_property(o, name).is_some()
}

pub fn get_property(
    ctx: &EvalContext,
    o: &JsObjectType,
    name: &str,
) -> Result<Option<StoredProperty>, JErrorType> {
    let depth = ctx.config.max_prototype_chain_depth;
    let p = o.borrow().as_js_object().get_property(name, depth);
    p
}

pub fn has_property(ctx: &mut EvalContext, o: &JsObjectType, name: &str) -> Result<bool, JErrorType> {
    Ok(get_property(ctx, o, name)?.is_some())
}

/// `[[Get]]`.
pub fn get(ctx: &mut EvalContext, o: &JsObjectType, name: &str) -> Result<JsValue, JErrorType> {
    get_with_receiver(ctx, o, name, JsValue::Object(o.clone()))
}

/// `[[Get]]` where accessors see `receiver` as `this`.
pub fn get_with_receiver(
    ctx: &mut EvalContext,
    o: &JsObjectType,
    name: &str,
    receiver: JsValue,
) -> Result<JsValue, JErrorType> {
    match get_property(ctx, o, name)? {
        None => Ok(JsValue::Undefined),
        Some(StoredProperty::Data(d)) => Ok(d.value),
        Some(StoredProperty::Accessor(a)) => match a.get {
            None => Ok(JsValue::Undefined),
            Some(getter) => call_function(ctx, &getter, receiver, vec![]),
        },
    }
}

/// `GetValue` on a property reference with a primitive base.
pub fn get_v(ctx: &mut EvalContext, v: &JsValue, name: &str) -> Result<JsValue, JErrorType> {
    let o = to_object(ctx, v)?;
    get_with_receiver(ctx, &o, name, v.clone())
}

pub fn can_put(ctx: &EvalContext, o: &JsObjectType, name: &str) -> Result<bool, JErrorType> {
    let depth = ctx.config.max_prototype_chain_depth;
    let can = o.borrow().as_js_object().can_put(name, depth);
    can
}

fn reject(throw: bool, message: String) -> Result<(), JErrorType> {
    if throw {
        Err(JErrorType::TypeError(message))
    } else {
        Ok(())
    }
}

/// `[[Put]]`: assigns through setters, updates own data properties and otherwise creates an own
/// writable, enumerable, configurable data property.
pub fn put(
    ctx: &mut EvalContext,
    o: &JsObjectType,
    name: &str,
    value: JsValue,
    throw: bool,
) -> Result<(), JErrorType> {
    if !can_put(ctx, o, name)? {
        return reject(
            throw,
            format!("Cannot assign to read only property '{}'", name),
        );
    }
    if let Some(StoredProperty::Data(_)) = get_own_property(o, name) {
        define_own_property(ctx, o, name, PropertyDescriptor::new().with_value(value), throw)?;
        return Ok(());
    }
    if let Some(StoredProperty::Accessor(a)) = get_property(ctx, o, name)? {
        if let Some(setter) = a.set {
            call_function(ctx, &setter, JsValue::Object(o.clone()), vec![value])?;
        }
        return Ok(());
    }
    define_own_property(
        ctx,
        o,
        name,
        PropertyDescriptor::data(value, true, true, true),
        throw,
    )?;
    Ok(())
}

/// `PutValue` on a property reference with a primitive base: setters run with the primitive as
/// `this`, anything that would create or change a property on the temporary wrapper is dropped.
pub fn put_v(
    ctx: &mut EvalContext,
    base: &JsValue,
    name: &str,
    value: JsValue,
    throw: bool,
) -> Result<(), JErrorType> {
    let o = to_object(ctx, base)?;
    if !can_put(ctx, &o, name)? {
        return reject(
            throw,
            format!("Cannot assign to read only property '{}' of {}", name, base),
        );
    }
    if let Some(StoredProperty::Data(_)) = get_own_property(&o, name) {
        return reject(
            throw,
            format!("Cannot create property '{}' on primitive {}", name, base),
        );
    }
    if let Some(StoredProperty::Accessor(a)) = get_property(ctx, &o, name)? {
        if let Some(setter) = a.set {
            call_function(ctx, &setter, base.clone(), vec![value])?;
        }
        return Ok(());
    }
    reject(
        throw,
        format!("Cannot create property '{}' on primitive {}", name, base),
    )
}

/// `[[Delete]]`.
pub fn delete(
    _ctx: &mut EvalContext,
    o: &JsObjectType,
    name: &str,
    throw: bool,
) -> Result<bool, JErrorType> {
    let deleted = o.borrow_mut().as_js_object_mut().delete(name);
    if !deleted && throw {
        return Err(JErrorType::TypeError(format!(
            "Cannot delete property '{}'",
            name
        )));
    }
    Ok(deleted)
}

/// `[[DefineOwnProperty]]`. A rejected definition is a TypeError when `throw` is set and
/// `Ok(false)` otherwise.
pub fn define_own_property(
    ctx: &mut EvalContext,
    o: &JsObjectType,
    name: &str,
    descriptor: PropertyDescriptor,
    throw: bool,
) -> Result<bool, JErrorType> {
    descriptor.validate()?;
    let coerces = o.borrow().as_js_object().coerces_to_number(name);
    let descriptor = match &descriptor.value {
        Some(v) if coerces && !matches!(v, JsValue::Number(_)) => {
            let n = to_number(ctx, v)?;
            descriptor.with_value(JsValue::Number(n))
        }
        _ => descriptor,
    };
    let defined = o
        .borrow_mut()
        .as_js_object_mut()
        .define_own_property(name, descriptor)?;
    if !defined && throw {
        return Err(JErrorType::TypeError(format!(
            "Cannot redefine property: {}",
            name
        )));
    }
    Ok(defined)
}

pub fn create_data_property(
    ctx: &mut EvalContext,
    o: &JsObjectType,
    name: &str,
    value: JsValue,
) -> Result<bool, JErrorType> {
    define_own_property(
        ctx,
        o,
        name,
        PropertyDescriptor::data(value, true, true, true),
        false,
    )
}

pub fn create_data_property_or_throw(
    ctx: &mut EvalContext,
    o: &JsObjectType,
    name: &str,
    value: JsValue,
) -> Result<(), JErrorType> {
    define_own_property(
        ctx,
        o,
        name,
        PropertyDescriptor::data(value, true, true, true),
        true,
    )?;
    Ok(())
}

/// The callable at `v[name]`, `None` when it is undefined or null.
pub fn get_method(
    ctx: &mut EvalContext,
    v: &JsValue,
    name: &str,
) -> Result<Option<JsObjectType>, JErrorType> {
    let f = get_v(ctx, v, name)?;
    match f {
        JsValue::Undefined | JsValue::Null => Ok(None),
        JsValue::Object(o) if o.borrow().is_callable() => Ok(Some(o)),
        _ => Err(JErrorType::TypeError(format!("'{}' is not a function", name))),
    }
}

/// `[[DefaultValue]]`: tries `valueOf`/`toString` in hint order and returns the first primitive.
/// Without a hint, Date objects prefer String and everything else Number.
pub fn default_value(
    ctx: &mut EvalContext,
    o: &JsObjectType,
    hint: PreferredType,
) -> Result<JsValue, JErrorType> {
    let hint = match hint {
        PreferredType::Default => {
            if o.borrow().as_js_object().class_name() == CLASS_DATE {
                PreferredType::String
            } else {
                PreferredType::Number
            }
        }
        h => h,
    };
    let order: [&str; 2] = if hint == PreferredType::String {
        ["toString", "valueOf"]
    } else {
        ["valueOf", "toString"]
    };
    for method in order.iter() {
        let f = get(ctx, o, method)?;
        if let JsValue::Object(func) = &f {
            if is_callable(&f) {
                let result = call_function(ctx, func, JsValue::Object(o.clone()), vec![])?;
                if result.is_primitive() {
                    return Ok(result);
                }
            }
        }
    }
    Err(JErrorType::TypeError(
        "Cannot convert object to primitive value".to_string(),
    ))
}

pub fn get_prototype_of(o: &JsObjectType) -> Option<JsObjectType> {
    let proto = o.borrow().as_js_object().get_prototype_of();
    proto
}

/// Changes `o`'s prototype. Fails (`Ok(false)`) on a non-extensible object or when the new chain
/// would contain `o` itself.
pub fn set_prototype_of(
    ctx: &EvalContext,
    o: &JsObjectType,
    prototype: Option<JsObjectType>,
) -> Result<bool, JErrorType> {
    let current = get_prototype_of(o);
    let unchanged = match (&current, &prototype) {
        (None, None) => true,
        (Some(a), Some(b)) => Rc::ptr_eq(a, b),
        _ => false,
    };
    if unchanged {
        return Ok(true);
    }
    if !o.borrow().as_js_object().is_extensible() {
        return Ok(false);
    }
    let mut depth = ctx.config.max_prototype_chain_depth;
    let mut p = prototype.clone();
    while let Some(candidate) = p {
        if Rc::ptr_eq(&candidate, o) {
            return Ok(false);
        }
        if depth == 0 {
            return Err(prototype_chain_too_deep());
        }
        depth -= 1;
        p = get_prototype_of(&candidate);
    }
    o.borrow_mut().as_js_object_mut().set_prototype_of(prototype);
    Ok(true)
}

pub fn is_extensible(o: &JsObjectType) -> bool {
    let extensible = o.borrow().as_js_object().is_extensible();
    extensible
}

pub fn prevent_extensions(o: &JsObjectType) -> bool {
    let done = o.borrow_mut().as_js_object_mut().prevent_extensions();
    done
}

pub fn own_property_keys(o: &JsObjectType) -> Vec<String> {
    let keys = o.borrow().as_js_object().own_property_keys();
    keys
}

/// The names a `for-in` over `o` visits: enumerable string keys of `o` and its prototypes, own
/// keys first, each name once (a nearer property shadows a farther one even when it is not
/// enumerable).
pub fn enumerate_property_names(
    ctx: &EvalContext,
    o: &JsObjectType,
) -> Result<Vec<String>, JErrorType> {
    let mut seen = HashSet::new();
    let mut names = vec![];
    let mut depth = ctx.config.max_prototype_chain_depth;
    let mut current = Some(o.clone());
    while let Some(obj) = current {
        for key in own_property_keys(&obj) {
            if !seen.insert(key.clone()) {
                continue;
            }
            if let Some(p) = get_own_property(&obj, &key) {
                if p.is_enumerable() {
                    names.push(key);
                }
            }
        }
        current = get_prototype_of(&obj);
        if current.is_some() {
            if depth == 0 {
                return Err(prototype_chain_too_deep());
            }
            depth -= 1;
        }
    }
    Ok(names)
}
