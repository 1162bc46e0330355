//! Error built-in objects.
//!
//! Provides Error, TypeError, ReferenceError, SyntaxError and RangeError constructors.

use crate::runner::ds::error::JErrorType;
use crate::runner::ds::object::object_create_with_class;
use crate::runner::ds::object_property::PropertyDescriptor;
use crate::runner::ds::operations::object::{define_own_property, get};
use crate::runner::ds::operations::type_conversion::to_string;
use crate::runner::ds::realm::{WellKnownIntrinsics, CLASS_ERROR};
use crate::runner::ds::value::JsValue;
use crate::runner::eval_context::EvalContext;

use super::{arg, define_constructor, define_native_method};

pub fn register(ctx: &mut EvalContext) -> Result<(), JErrorType> {
    let kinds: [(&str, WellKnownIntrinsics, crate::runner::ds::function_object::NativeFn); 5] = [
        ("Error", WellKnownIntrinsics::ErrorPrototype, error_constructor),
        (
            "TypeError",
            WellKnownIntrinsics::TypeErrorPrototype,
            type_error_constructor,
        ),
        (
            "ReferenceError",
            WellKnownIntrinsics::ReferenceErrorPrototype,
            reference_error_constructor,
        ),
        (
            "SyntaxError",
            WellKnownIntrinsics::SyntaxErrorPrototype,
            syntax_error_constructor,
        ),
        (
            "RangeError",
            WellKnownIntrinsics::RangeErrorPrototype,
            range_error_constructor,
        ),
    ];
    for (name, which, constructor) in kinds.iter() {
        let proto = ctx.intrinsic(*which);
        define_constructor(ctx, name, *constructor, 1, &proto)?;
        define_own_property(
            ctx,
            &proto,
            "name",
            PropertyDescriptor::data(JsValue::new_string(*name), true, false, true),
            true,
        )?;
        define_own_property(
            ctx,
            &proto,
            "message",
            PropertyDescriptor::data(JsValue::new_string(""), true, false, true),
            true,
        )?;
    }
    let error_proto = ctx.intrinsic(WellKnownIntrinsics::ErrorPrototype);
    define_native_method(ctx, &error_proto, "toString", error_to_string, 0)?;
    Ok(())
}

/// Called with or without `new`, every error constructor builds a fresh object.
fn create_error(
    ctx: &mut EvalContext,
    which: WellKnownIntrinsics,
    args: &[JsValue],
) -> Result<JsValue, JErrorType> {
    let o = object_create_with_class(Some(ctx.intrinsic(which)), CLASS_ERROR);
    let message = arg(args, 0);
    if !message.is_undefined() {
        let message = to_string(ctx, &message)?;
        define_own_property(
            ctx,
            &o,
            "message",
            PropertyDescriptor::data(JsValue::new_string(message), true, false, true),
            true,
        )?;
    }
    Ok(JsValue::Object(o))
}

fn error_constructor(
    ctx: &mut EvalContext,
    _this: JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    create_error(ctx, WellKnownIntrinsics::ErrorPrototype, &args)
}

fn type_error_constructor(
    ctx: &mut EvalContext,
    _this: JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    create_error(ctx, WellKnownIntrinsics::TypeErrorPrototype, &args)
}

fn reference_error_constructor(
    ctx: &mut EvalContext,
    _this: JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    create_error(ctx, WellKnownIntrinsics::ReferenceErrorPrototype, &args)
}

fn syntax_error_constructor(
    ctx: &mut EvalContext,
    _this: JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    create_error(ctx, WellKnownIntrinsics::SyntaxErrorPrototype, &args)
}

fn range_error_constructor(
    ctx: &mut EvalContext,
    _this: JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    create_error(ctx, WellKnownIntrinsics::RangeErrorPrototype, &args)
}

/// Error.prototype.toString: `name: message`, or whichever of the two is non-empty.
fn error_to_string(
    ctx: &mut EvalContext,
    this: JsValue,
    _args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    let o = match &this {
        JsValue::Object(o) => o.clone(),
        _ => {
            return Err(JErrorType::TypeError(
                "Error.prototype.toString called on non-object".to_string(),
            ))
        }
    };
    let name = match get(ctx, &o, "name")? {
        JsValue::Undefined => "Error".to_string(),
        v => to_string(ctx, &v)?,
    };
    let message = match get(ctx, &o, "message")? {
        JsValue::Undefined => String::new(),
        v => to_string(ctx, &v)?,
    };
    Ok(JsValue::new_string(if name.is_empty() {
        message
    } else if message.is_empty() {
        name
    } else {
        format!("{}: {}", name, message)
    }))
}
