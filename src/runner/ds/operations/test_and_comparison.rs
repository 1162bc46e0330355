use std::rc::Rc;

use crate::runner::ds::error::JErrorType;
use crate::runner::ds::operations::type_conversion::{
    primitive_to_number, to_number, to_primitive, PreferredType,
};
use crate::runner::ds::value::JsValue;
use crate::runner::eval_context::EvalContext;

/// `SameValue`: like `===` except that NaN equals NaN and +0 differs from -0.
pub fn same_value(a: &JsValue, b: &JsValue) -> bool {
    match (a, b) {
        (JsValue::Number(x), JsValue::Number(y)) => {
            if x.is_nan() && y.is_nan() {
                true
            } else {
                x == y && x.is_sign_negative() == y.is_sign_negative()
            }
        }
        _ => strict_equality_comparison(a, b),
    }
}

pub fn strict_equality_comparison(a: &JsValue, b: &JsValue) -> bool {
    match (a, b) {
        (JsValue::Undefined, JsValue::Undefined) => true,
        (JsValue::Null, JsValue::Null) => true,
        (JsValue::Boolean(x), JsValue::Boolean(y)) => x == y,
        (JsValue::Number(x), JsValue::Number(y)) => x == y,
        (JsValue::String(x), JsValue::String(y)) => x == y,
        (JsValue::Object(x), JsValue::Object(y)) => Rc::ptr_eq(x, y),
        _ => false,
    }
}

/// The `==` algorithm. Only object operands can run script code (through `ToPrimitive`).
pub fn abstract_equality_comparison(
    ctx: &mut EvalContext,
    x: &JsValue,
    y: &JsValue,
) -> Result<bool, JErrorType> {
    match (x, y) {
        (JsValue::Undefined, JsValue::Null) | (JsValue::Null, JsValue::Undefined) => Ok(true),
        (JsValue::Number(_), JsValue::String(_)) => {
            let ny = primitive_to_number(y)?;
            abstract_equality_comparison(ctx, x, &JsValue::Number(ny))
        }
        (JsValue::String(_), JsValue::Number(_)) => {
            let nx = primitive_to_number(x)?;
            abstract_equality_comparison(ctx, &JsValue::Number(nx), y)
        }
        (JsValue::Boolean(_), _) if !matches!(y, JsValue::Boolean(_)) => {
            let nx = primitive_to_number(x)?;
            abstract_equality_comparison(ctx, &JsValue::Number(nx), y)
        }
        (_, JsValue::Boolean(_)) if !matches!(x, JsValue::Boolean(_)) => {
            let ny = primitive_to_number(y)?;
            abstract_equality_comparison(ctx, x, &JsValue::Number(ny))
        }
        (JsValue::Number(_), JsValue::Object(_)) | (JsValue::String(_), JsValue::Object(_)) => {
            let py = to_primitive(ctx, y, PreferredType::Default)?;
            abstract_equality_comparison(ctx, x, &py)
        }
        (JsValue::Object(_), JsValue::Number(_)) | (JsValue::Object(_), JsValue::String(_)) => {
            let px = to_primitive(ctx, x, PreferredType::Default)?;
            abstract_equality_comparison(ctx, &px, y)
        }
        _ => Ok(strict_equality_comparison(x, y)),
    }
}

/// The abstract relational comparison `x < y`. `None` stands for the "undefined" outcome a NaN
/// operand produces; `left_first` fixes which operand is converted first.
pub fn abstract_relational_comparison(
    ctx: &mut EvalContext,
    x: &JsValue,
    y: &JsValue,
    left_first: bool,
) -> Result<Option<bool>, JErrorType> {
    let (px, py) = if left_first {
        let px = to_primitive(ctx, x, PreferredType::Number)?;
        let py = to_primitive(ctx, y, PreferredType::Number)?;
        (px, py)
    } else {
        let py = to_primitive(ctx, y, PreferredType::Number)?;
        let px = to_primitive(ctx, x, PreferredType::Number)?;
        (px, py)
    };
    if let (JsValue::String(sx), JsValue::String(sy)) = (&px, &py) {
        return Ok(Some(sx < sy));
    }
    let nx = to_number(ctx, &px)?;
    let ny = to_number(ctx, &py)?;
    if nx.is_nan() || ny.is_nan() {
        Ok(None)
    } else {
        Ok(Some(nx < ny))
    }
}

pub fn is_callable(v: &JsValue) -> bool {
    match v {
        JsValue::Object(o) => o.borrow().is_callable(),
        _ => false,
    }
}
