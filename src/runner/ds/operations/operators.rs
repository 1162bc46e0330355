//! The value-level operators compiled code calls into: one function per operator, each taking the
//! already-evaluated operands.

use crate::runner::ds::error::JErrorType;
use crate::runner::ds::function_object::{call_function, construct_function, has_instance};
use crate::runner::ds::object::JsObjectType;
use crate::runner::ds::operations::object::has_property;
use crate::runner::ds::operations::test_and_comparison::{
    abstract_equality_comparison, abstract_relational_comparison, strict_equality_comparison,
};
use crate::runner::ds::operations::type_conversion::{
    get_type, to_boolean, to_int32, to_js_string, to_number, to_primitive, to_string, to_uint32,
    PreferredType,
};
use crate::runner::ds::reference::{Reference, ReferenceBase};
use crate::runner::ds::value::JsValue;
use crate::runner::eval_context::EvalContext;

// ============================================================================
// Logical
// ============================================================================

pub fn logical_not(v: &JsValue) -> JsValue {
    JsValue::Boolean(!to_boolean(v))
}

/// `a && b`; `right` only runs when `left` is truthy.
pub fn logical_and<F>(ctx: &mut EvalContext, left: JsValue, right: F) -> Result<JsValue, JErrorType>
where
    F: FnOnce(&mut EvalContext) -> Result<JsValue, JErrorType>,
{
    if to_boolean(&left) {
        right(ctx)
    } else {
        Ok(left)
    }
}

/// `a || b`; `right` only runs when `left` is falsy.
pub fn logical_or<F>(ctx: &mut EvalContext, left: JsValue, right: F) -> Result<JsValue, JErrorType>
where
    F: FnOnce(&mut EvalContext) -> Result<JsValue, JErrorType>,
{
    if to_boolean(&left) {
        Ok(left)
    } else {
        right(ctx)
    }
}

// ============================================================================
// Bitwise and shift
// ============================================================================

fn int32_op<F>(ctx: &mut EvalContext, a: &JsValue, b: &JsValue, op: F) -> Result<JsValue, JErrorType>
where
    F: Fn(i32, i32) -> i32,
{
    let l = to_int32(ctx, a)?;
    let r = to_int32(ctx, b)?;
    Ok(JsValue::Number(op(l, r) as f64))
}

pub fn bitwise_and(ctx: &mut EvalContext, a: &JsValue, b: &JsValue) -> Result<JsValue, JErrorType> {
    int32_op(ctx, a, b, |l, r| l & r)
}

pub fn bitwise_or(ctx: &mut EvalContext, a: &JsValue, b: &JsValue) -> Result<JsValue, JErrorType> {
    int32_op(ctx, a, b, |l, r| l | r)
}

pub fn bitwise_xor(ctx: &mut EvalContext, a: &JsValue, b: &JsValue) -> Result<JsValue, JErrorType> {
    int32_op(ctx, a, b, |l, r| l ^ r)
}

pub fn bitwise_not(ctx: &mut EvalContext, v: &JsValue) -> Result<JsValue, JErrorType> {
    Ok(JsValue::Number(!to_int32(ctx, v)? as f64))
}

pub fn left_shift(ctx: &mut EvalContext, a: &JsValue, b: &JsValue) -> Result<JsValue, JErrorType> {
    let l = to_int32(ctx, a)?;
    let count = to_uint32(ctx, b)? & 0x1F;
    Ok(JsValue::Number(l.wrapping_shl(count) as f64))
}

pub fn signed_right_shift(
    ctx: &mut EvalContext,
    a: &JsValue,
    b: &JsValue,
) -> Result<JsValue, JErrorType> {
    let l = to_int32(ctx, a)?;
    let count = to_uint32(ctx, b)? & 0x1F;
    Ok(JsValue::Number((l >> count) as f64))
}

pub fn unsigned_right_shift(
    ctx: &mut EvalContext,
    a: &JsValue,
    b: &JsValue,
) -> Result<JsValue, JErrorType> {
    let l = to_uint32(ctx, a)?;
    let count = to_uint32(ctx, b)? & 0x1F;
    Ok(JsValue::Number((l >> count) as f64))
}

// ============================================================================
// Relational and equality
// ============================================================================

pub fn less_than(ctx: &mut EvalContext, a: &JsValue, b: &JsValue) -> Result<JsValue, JErrorType> {
    let r = abstract_relational_comparison(ctx, a, b, true)?;
    Ok(JsValue::Boolean(r == Some(true)))
}

pub fn greater_than(ctx: &mut EvalContext, a: &JsValue, b: &JsValue) -> Result<JsValue, JErrorType> {
    let r = abstract_relational_comparison(ctx, b, a, false)?;
    Ok(JsValue::Boolean(r == Some(true)))
}

pub fn less_than_or_equal(
    ctx: &mut EvalContext,
    a: &JsValue,
    b: &JsValue,
) -> Result<JsValue, JErrorType> {
    let r = abstract_relational_comparison(ctx, b, a, false)?;
    Ok(JsValue::Boolean(r == Some(false)))
}

pub fn greater_than_or_equal(
    ctx: &mut EvalContext,
    a: &JsValue,
    b: &JsValue,
) -> Result<JsValue, JErrorType> {
    let r = abstract_relational_comparison(ctx, a, b, true)?;
    Ok(JsValue::Boolean(r == Some(false)))
}

pub fn equals(ctx: &mut EvalContext, a: &JsValue, b: &JsValue) -> Result<JsValue, JErrorType> {
    Ok(JsValue::Boolean(abstract_equality_comparison(ctx, a, b)?))
}

pub fn not_equals(ctx: &mut EvalContext, a: &JsValue, b: &JsValue) -> Result<JsValue, JErrorType> {
    Ok(JsValue::Boolean(!abstract_equality_comparison(ctx, a, b)?))
}

pub fn strict_equals(a: &JsValue, b: &JsValue) -> JsValue {
    JsValue::Boolean(strict_equality_comparison(a, b))
}

pub fn strict_not_equals(a: &JsValue, b: &JsValue) -> JsValue {
    JsValue::Boolean(!strict_equality_comparison(a, b))
}

fn require_object(v: &JsValue, operator: &str) -> Result<JsObjectType, JErrorType> {
    match v {
        JsValue::Object(o) => Ok(o.clone()),
        _ => Err(JErrorType::TypeError(format!(
            "Right-hand side of '{}' is not an object",
            operator
        ))),
    }
}

pub fn instance_of(ctx: &mut EvalContext, v: &JsValue, target: &JsValue) -> Result<JsValue, JErrorType> {
    let f = require_object(target, "instanceof")?;
    Ok(JsValue::Boolean(has_instance(ctx, &f, v)?))
}

pub fn has_property_in(ctx: &mut EvalContext, key: &JsValue, target: &JsValue) -> Result<JsValue, JErrorType> {
    let o = require_object(target, "in")?;
    let name = to_string(ctx, key)?;
    Ok(JsValue::Boolean(has_property(ctx, &o, &name)?))
}

// ============================================================================
// Arithmetic
// ============================================================================

/// `a + b`: string concatenation when either primitive is a String, numeric addition otherwise.
pub fn add(ctx: &mut EvalContext, a: &JsValue, b: &JsValue) -> Result<JsValue, JErrorType> {
    let l = to_primitive(ctx, a, PreferredType::Default)?;
    let r = to_primitive(ctx, b, PreferredType::Default)?;
    if matches!(l, JsValue::String(_)) || matches!(r, JsValue::String(_)) {
        let s = to_js_string(ctx, &l)?;
        Ok(JsValue::String(s.concat(&to_js_string(ctx, &r)?)))
    } else {
        Ok(JsValue::Number(to_number(ctx, &l)? + to_number(ctx, &r)?))
    }
}

fn numeric_op<F>(ctx: &mut EvalContext, a: &JsValue, b: &JsValue, op: F) -> Result<JsValue, JErrorType>
where
    F: Fn(f64, f64) -> f64,
{
    let l = to_number(ctx, a)?;
    let r = to_number(ctx, b)?;
    Ok(JsValue::Number(op(l, r)))
}

pub fn subtract(ctx: &mut EvalContext, a: &JsValue, b: &JsValue) -> Result<JsValue, JErrorType> {
    numeric_op(ctx, a, b, |l, r| l - r)
}

pub fn multiply(ctx: &mut EvalContext, a: &JsValue, b: &JsValue) -> Result<JsValue, JErrorType> {
    numeric_op(ctx, a, b, |l, r| l * r)
}

pub fn divide(ctx: &mut EvalContext, a: &JsValue, b: &JsValue) -> Result<JsValue, JErrorType> {
    numeric_op(ctx, a, b, |l, r| l / r)
}

/// `%` truncates toward zero and keeps the dividend's sign, which is what `f64 %` does.
pub fn remainder(ctx: &mut EvalContext, a: &JsValue, b: &JsValue) -> Result<JsValue, JErrorType> {
    numeric_op(ctx, a, b, |l, r| l % r)
}

// ============================================================================
// Unary
// ============================================================================

pub fn unary_plus(ctx: &mut EvalContext, v: &JsValue) -> Result<JsValue, JErrorType> {
    Ok(JsValue::Number(to_number(ctx, v)?))
}

pub fn unary_minus(ctx: &mut EvalContext, v: &JsValue) -> Result<JsValue, JErrorType> {
    Ok(JsValue::Number(-to_number(ctx, v)?))
}

pub fn type_of(v: &JsValue) -> JsValue {
    JsValue::new_string(get_type(v))
}

pub fn type_of_reference(ctx: &mut EvalContext, r: &Reference) -> Result<JsValue, JErrorType> {
    Ok(JsValue::new_string(r.type_of(ctx)?))
}

pub fn void(_v: &JsValue) -> JsValue {
    JsValue::Undefined
}

pub fn delete_reference(ctx: &mut EvalContext, r: &Reference) -> Result<JsValue, JErrorType> {
    Ok(JsValue::Boolean(r.delete(ctx)?))
}

// ============================================================================
// Property access, call, construct, throw
// ============================================================================

/// `base[name]` as a Reference. Accessing a property of undefined or null is a TypeError.
pub fn property_reference(
    ctx: &mut EvalContext,
    base: JsValue,
    name: &JsValue,
) -> Result<Reference, JErrorType> {
    if base.is_null_or_undefined() {
        let key = to_string(ctx, name)?;
        return Err(JErrorType::TypeError(format!(
            "Cannot read property '{}' of {}",
            key, base
        )));
    }
    let key = to_string(ctx, name)?;
    let strict = ctx.is_strict();
    Ok(Reference::new(ReferenceBase::Value(base), &key, strict))
}

/// Calls `callee` with an explicit `this`.
pub fn call(
    ctx: &mut EvalContext,
    callee: &JsValue,
    this: JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    match callee {
        JsValue::Object(f) if f.borrow().is_callable() => call_function(ctx, f, this, args),
        _ => Err(JErrorType::TypeError(format!("{} is not a function", callee))),
    }
}

/// A call expression whose callee evaluated to a Reference: `this` is the property base, or the
/// environment's implicit this.
pub fn call_reference(
    ctx: &mut EvalContext,
    r: &Reference,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    let callee = r.get_value(ctx)?;
    match &callee {
        JsValue::Object(f) if f.borrow().is_callable() => {
            let this = r.this_value();
            call_function(ctx, f, this, args)
        }
        _ => Err(JErrorType::TypeError(format!(
            "{} is not a function",
            r.referenced_name
        ))),
    }
}

/// `new callee(...args)`.
pub fn construct(
    ctx: &mut EvalContext,
    callee: &JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    match callee {
        JsValue::Object(f) => construct_function(ctx, f, args),
        _ => Err(JErrorType::TypeError(format!("{} is not a constructor", callee))),
    }
}

/// `throw v`.
pub fn throw_value<T>(v: JsValue) -> Result<T, JErrorType> {
    Err(JErrorType::Thrown(v))
}
