//! Installs every built-in into a fresh realm.

use crate::runner::ds::error::JErrorType;
use crate::runner::ds::object_property::PropertyDescriptor;
use crate::runner::ds::operations::object::define_own_property;
use crate::runner::ds::value::JsValue;
use crate::runner::eval_context::EvalContext;

use super::error;
use super::function;
use super::generator;
use super::object;
use super::primitive;

pub fn install(ctx: &mut EvalContext) -> Result<(), JErrorType> {
    // Object first: every other prototype inherits its methods.
    object::register(ctx)?;
    function::register(ctx)?;
    primitive::register(ctx)?;
    error::register(ctx)?;
    generator::register(ctx)?;
    register_global_values(ctx)?;
    log::debug!("[{}] built-ins installed", ctx.id);
    Ok(())
}

fn register_global_values(ctx: &mut EvalContext) -> Result<(), JErrorType> {
    let global = ctx.global_object();
    let values = [
        ("undefined", JsValue::Undefined),
        ("NaN", JsValue::Number(f64::NAN)),
        ("Infinity", JsValue::Number(f64::INFINITY)),
    ];
    for (name, value) in values.iter() {
        define_own_property(
            ctx,
            &global,
            name,
            PropertyDescriptor::data(value.clone(), false, false, false),
            true,
        )?;
    }
    Ok(())
}
