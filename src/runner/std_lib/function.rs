//! Function.prototype methods.

use crate::runner::ds::error::JErrorType;
use crate::runner::ds::function_object::{bind_function, call_function};
use crate::runner::ds::object::JsObjectType;
use crate::runner::ds::operations::object::get;
use crate::runner::ds::operations::type_conversion::to_uint32;
use crate::runner::ds::realm::WellKnownIntrinsics;
use crate::runner::ds::value::JsValue;
use crate::runner::eval_context::EvalContext;

use super::{arg, define_native_method};

pub fn register(ctx: &mut EvalContext) -> Result<(), JErrorType> {
    let proto = ctx.intrinsic(WellKnownIntrinsics::FunctionPrototype);
    define_native_method(ctx, &proto, "call", function_call, 1)?;
    define_native_method(ctx, &proto, "apply", function_apply, 2)?;
    define_native_method(ctx, &proto, "bind", function_bind, 1)?;
    define_native_method(ctx, &proto, "toString", function_to_string, 0)?;
    Ok(())
}

fn this_function(this: &JsValue, method: &str) -> Result<JsObjectType, JErrorType> {
    match this {
        JsValue::Object(f) if f.borrow().is_callable() => Ok(f.clone()),
        _ => Err(JErrorType::TypeError(format!(
            "Function.prototype.{} called on incompatible receiver {}",
            method, this
        ))),
    }
}

/// Function.prototype.call
fn function_call(
    ctx: &mut EvalContext,
    this: JsValue,
    mut args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    let f = this_function(&this, "call")?;
    let this_arg = if args.is_empty() {
        JsValue::Undefined
    } else {
        args.remove(0)
    };
    call_function(ctx, &f, this_arg, args)
}

/// Function.prototype.apply: the second argument is any array-like.
fn function_apply(
    ctx: &mut EvalContext,
    this: JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    let f = this_function(&this, "apply")?;
    let arg_list = match arg(&args, 1) {
        JsValue::Undefined | JsValue::Null => vec![],
        JsValue::Object(list) => {
            let length = get(ctx, &list, "length")?;
            let n = to_uint32(ctx, &length)? as usize;
            if n > ctx.config.max_argument_count {
                return Err(JErrorType::RangeError(format!(
                    "Too many arguments in function call ({} > {})",
                    n, ctx.config.max_argument_count
                )));
            }
            let mut values = Vec::with_capacity(n);
            for i in 0..n {
                values.push(get(ctx, &list, &i.to_string())?);
            }
            values
        }
        _ => {
            return Err(JErrorType::TypeError(
                "CreateListFromArrayLike called on non-object".to_string(),
            ))
        }
    };
    call_function(ctx, &f, arg(&args, 0), arg_list)
}

/// Function.prototype.bind
fn function_bind(
    ctx: &mut EvalContext,
    this: JsValue,
    mut args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    let target = this_function(&this, "bind")?;
    let bound_this = if args.is_empty() {
        JsValue::Undefined
    } else {
        args.remove(0)
    };
    Ok(JsValue::Object(bind_function(ctx, &target, bound_this, args)?))
}

/// Function.prototype.toString
fn function_to_string(
    _ctx: &mut EvalContext,
    this: JsValue,
    _args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    let f = this_function(&this, "toString")?;
    let source = f.borrow().as_function().map(|func| func.to_source_string());
    Ok(JsValue::new_string(source.unwrap_or_default()))
}
