//! Built-in objects.
//!
//! Only the methods the object model itself relies on live here: the `valueOf`/`toString` hooks
//! `ToPrimitive` calls, `Function.prototype.{call,apply,bind}`, the error constructors and the
//! generator protocol.

pub mod core;
pub mod error;
pub mod function;
pub mod generator;
pub mod object;
pub mod primitive;

use crate::runner::ds::error::JErrorType;
use crate::runner::ds::function_object::{create_native_function, NativeFn};
use crate::runner::ds::object::JsObjectType;
use crate::runner::ds::object_property::PropertyDescriptor;
use crate::runner::ds::operations::object::define_own_property;
use crate::runner::ds::realm::WellKnownIntrinsics;
use crate::runner::ds::value::JsValue;
use crate::runner::eval_context::EvalContext;

pub use self::core::install;

/// Adds a non-enumerable built-in method to `target`.
pub fn define_native_method(
    ctx: &mut EvalContext,
    target: &JsObjectType,
    name: &str,
    func: NativeFn,
    length: usize,
) -> Result<JsObjectType, JErrorType> {
    let f = create_native_function(
        Some(ctx.intrinsic(WellKnownIntrinsics::FunctionPrototype)),
        name,
        func,
        length,
        false,
    )?;
    define_own_property(
        ctx,
        target,
        name,
        PropertyDescriptor::data(JsValue::Object(f.clone()), true, false, true),
        true,
    )?;
    Ok(f)
}

/// Creates a global constructor `name` and links it with `prototype` both ways.
pub fn define_constructor(
    ctx: &mut EvalContext,
    name: &str,
    func: NativeFn,
    length: usize,
    prototype: &JsObjectType,
) -> Result<JsObjectType, JErrorType> {
    let f = create_native_function(
        Some(ctx.intrinsic(WellKnownIntrinsics::FunctionPrototype)),
        name,
        func,
        length,
        true,
    )?;
    define_own_property(
        ctx,
        &f,
        "prototype",
        PropertyDescriptor::data(JsValue::Object(prototype.clone()), false, false, false),
        true,
    )?;
    define_own_property(
        ctx,
        prototype,
        "constructor",
        PropertyDescriptor::data(JsValue::Object(f.clone()), true, false, true),
        true,
    )?;
    let global = ctx.global_object();
    define_own_property(
        ctx,
        &global,
        name,
        PropertyDescriptor::data(JsValue::Object(f.clone()), true, false, true),
        true,
    )?;
    Ok(f)
}

/// The `i`th argument, `undefined` when absent.
pub fn arg(args: &[JsValue], i: usize) -> JsValue {
    args.get(i).cloned().unwrap_or(JsValue::Undefined)
}
