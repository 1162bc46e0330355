use crate::runner::ds::error::JErrorType;
use crate::runner::ds::object::{object_create_with_class, JsObjectType};
use crate::runner::ds::object_property::PropertyDescriptor;
use crate::runner::ds::operations::object::define_own_property;
use crate::runner::ds::realm::WellKnownIntrinsics;
use crate::runner::ds::value::JsValue;
use crate::runner::eval_context::EvalContext;

pub const CLASS_ARGUMENTS: &str = "Arguments";

/// The `arguments` object of a function activation. Unmapped: its index properties are copies
/// of the actual arguments, not aliases of the formals.
pub fn create_arguments_object(
    ctx: &mut EvalContext,
    func: &JsObjectType,
    args: &[JsValue],
    strict: bool,
) -> Result<JsObjectType, JErrorType> {
    let obj = object_create_with_class(
        Some(ctx.intrinsic(WellKnownIntrinsics::ObjectPrototype)),
        CLASS_ARGUMENTS,
    );
    define_own_property(
        ctx,
        &obj,
        "length",
        PropertyDescriptor::data(JsValue::Number(args.len() as f64), true, false, true),
        true,
    )?;
    for (idx, value) in args.iter().enumerate() {
        define_own_property(
            ctx,
            &obj,
            &idx.to_string(),
            PropertyDescriptor::data(value.clone(), true, true, true),
            true,
        )?;
    }
    if strict {
        let thrower = ctx.intrinsic(WellKnownIntrinsics::ThrowTypeError);
        for name in &["caller", "callee"] {
            define_own_property(
                ctx,
                &obj,
                name,
                PropertyDescriptor::accessor(
                    Some(thrower.clone()),
                    Some(thrower.clone()),
                    false,
                    false,
                ),
                true,
            )?;
        }
    } else {
        define_own_property(
            ctx,
            &obj,
            "callee",
            PropertyDescriptor::data(JsValue::Object(func.clone()), true, false, true),
            true,
        )?;
    }
    Ok(obj)
}
