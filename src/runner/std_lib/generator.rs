//! Generator.prototype: `next()` advances and reports whether a value was produced, `current`
//! reads that value.

use crate::runner::ds::error::JErrorType;
use crate::runner::ds::generator::{generator_current, generator_next};
use crate::runner::ds::object::JsObjectType;
use crate::runner::ds::realm::WellKnownIntrinsics;
use crate::runner::ds::value::JsValue;
use crate::runner::eval_context::EvalContext;

use super::define_native_method;

pub fn register(ctx: &mut EvalContext) -> Result<(), JErrorType> {
    let proto = ctx.intrinsic(WellKnownIntrinsics::GeneratorPrototype);
    define_native_method(ctx, &proto, "next", generator_next_method, 0)?;
    define_native_method(ctx, &proto, "current", generator_current_method, 0)?;
    Ok(())
}

fn this_generator(this: &JsValue) -> Result<JsObjectType, JErrorType> {
    match this {
        JsValue::Object(o) if o.borrow().as_generator().is_some() => Ok(o.clone()),
        _ => Err(JErrorType::TypeError(format!(
            "{} is not a generator",
            this
        ))),
    }
}

fn generator_next_method(
    ctx: &mut EvalContext,
    this: JsValue,
    _args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    let g = this_generator(&this)?;
    Ok(JsValue::Boolean(generator_next(ctx, &g)?))
}

fn generator_current_method(
    _ctx: &mut EvalContext,
    this: JsValue,
    _args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    let g = this_generator(&this)?;
    generator_current(&g)
}
