//! Boolean, Number and String constructors and their `valueOf`/`toString`.

use crate::runner::ds::error::JErrorType;
use crate::runner::ds::object::wrap_object;
use crate::runner::ds::operations::type_conversion::{
    number_to_radix_string, to_boolean, to_integer, to_js_string, to_number,
};
use crate::runner::ds::primitive_object::{PrimitiveObject, CLASS_BOOLEAN, CLASS_NUMBER, CLASS_STRING};
use crate::runner::ds::realm::WellKnownIntrinsics;
use crate::runner::ds::value::{JsString, JsValue};
use crate::runner::eval_context::EvalContext;

use super::{arg, define_constructor, define_native_method};

pub fn register(ctx: &mut EvalContext) -> Result<(), JErrorType> {
    let boolean = ctx.intrinsic(WellKnownIntrinsics::BooleanPrototype);
    define_constructor(ctx, "Boolean", boolean_constructor, 1, &boolean)?;
    define_native_method(ctx, &boolean, "valueOf", boolean_value_of, 0)?;
    define_native_method(ctx, &boolean, "toString", boolean_to_string, 0)?;

    let number = ctx.intrinsic(WellKnownIntrinsics::NumberPrototype);
    define_constructor(ctx, "Number", number_constructor, 1, &number)?;
    define_native_method(ctx, &number, "valueOf", number_value_of, 0)?;
    define_native_method(ctx, &number, "toString", number_to_string_method, 0)?;

    let string = ctx.intrinsic(WellKnownIntrinsics::StringPrototype);
    define_constructor(ctx, "String", string_constructor, 1, &string)?;
    define_native_method(ctx, &string, "valueOf", string_value_of, 0)?;
    define_native_method(ctx, &string, "toString", string_value_of, 0)?;
    Ok(())
}

/// `this` as a primitive of the given class: the primitive itself or a wrapper holding one.
fn this_primitive(this: &JsValue, class: &str) -> Result<JsValue, JErrorType> {
    let matches_class = |v: &JsValue| match v {
        JsValue::Boolean(_) => class == CLASS_BOOLEAN,
        JsValue::Number(_) => class == CLASS_NUMBER,
        JsValue::String(_) => class == CLASS_STRING,
        _ => false,
    };
    if matches_class(this) {
        return Ok(this.clone());
    }
    if let JsValue::Object(o) = this {
        let wrapped = o.borrow().as_js_object().primitive_value();
        if let Some(v) = wrapped {
            if matches_class(&v) {
                return Ok(v);
            }
        }
    }
    Err(JErrorType::TypeError(format!(
        "{}.prototype method called on incompatible receiver {}",
        class, this
    )))
}

/// A construct call returns a wrapper, a plain call the converted primitive.
fn wrap_or_convert(ctx: &EvalContext, v: JsValue, which: WellKnownIntrinsics) -> JsValue {
    if ctx.is_construct_call() {
        JsValue::Object(wrap_object(PrimitiveObject::new(v, Some(ctx.intrinsic(which)))))
    } else {
        v
    }
}

fn boolean_constructor(
    ctx: &mut EvalContext,
    _this: JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    let v = JsValue::Boolean(to_boolean(&arg(&args, 0)));
    Ok(wrap_or_convert(ctx, v, WellKnownIntrinsics::BooleanPrototype))
}

fn boolean_value_of(
    _ctx: &mut EvalContext,
    this: JsValue,
    _args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    this_primitive(&this, CLASS_BOOLEAN)
}

fn boolean_to_string(
    _ctx: &mut EvalContext,
    this: JsValue,
    _args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    let v = this_primitive(&this, CLASS_BOOLEAN)?;
    Ok(JsValue::new_string(v.to_string()))
}

fn number_constructor(
    ctx: &mut EvalContext,
    _this: JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    let n = if args.is_empty() {
        0.0
    } else {
        to_number(ctx, &args[0])?
    };
    Ok(wrap_or_convert(ctx, JsValue::Number(n), WellKnownIntrinsics::NumberPrototype))
}

fn number_value_of(
    _ctx: &mut EvalContext,
    this: JsValue,
    _args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    this_primitive(&this, CLASS_NUMBER)
}

/// Number.prototype.toString(radix)
fn number_to_string_method(
    ctx: &mut EvalContext,
    this: JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    let v = this_primitive(&this, CLASS_NUMBER)?;
    let radix = match arg(&args, 0) {
        JsValue::Undefined => 10.0,
        r => to_integer(ctx, &r)?,
    };
    if !(2.0..=36.0).contains(&radix) {
        return Err(JErrorType::RangeError(
            "toString() radix must be between 2 and 36".to_string(),
        ));
    }
    let n = v.as_number().unwrap_or(f64::NAN);
    Ok(JsValue::new_string(number_to_radix_string(n, radix as u32)))
}

fn string_constructor(
    ctx: &mut EvalContext,
    _this: JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    let s = if args.is_empty() {
        JsString::default()
    } else {
        to_js_string(ctx, &args[0])?
    };
    Ok(wrap_or_convert(ctx, JsValue::String(s), WellKnownIntrinsics::StringPrototype))
}

fn string_value_of(
    _ctx: &mut EvalContext,
    this: JsValue,
    _args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    this_primitive(&this, CLASS_STRING)
}
