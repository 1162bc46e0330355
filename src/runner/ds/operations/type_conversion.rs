use crate::runner::ds::error::JErrorType;
use crate::runner::ds::object::JsObjectType;
use crate::runner::ds::operations::object::default_value;
use crate::runner::ds::primitive_object::create_primitive_wrapper;
use crate::runner::ds::value::{JsString, JsValue};
use crate::runner::eval_context::EvalContext;

pub const TYPE_STR_UNDEFINED: &str = "undefined";
pub const TYPE_STR_NULL: &str = "null";
pub const TYPE_STR_BOOLEAN: &str = "boolean";
pub const TYPE_STR_STRING: &str = "string";
pub const TYPE_STR_NUMBER: &str = "number";
pub const TYPE_STR_OBJECT: &str = "object";
pub const TYPE_STR_FUNCTION: &str = "function";

const TWO_POW_32: f64 = 4_294_967_296.0;
const TWO_POW_31: f64 = 2_147_483_648.0;
const TWO_POW_16: f64 = 65_536.0;
const TWO_POW_53: f64 = 9_007_199_254_740_992.0;
const RADIX_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// The `typeof` tag of a value.
pub fn get_type(a: &JsValue) -> &'static str {
    match a {
        JsValue::Undefined => TYPE_STR_UNDEFINED,
        JsValue::Null => TYPE_STR_OBJECT,
        JsValue::Boolean(_) => TYPE_STR_BOOLEAN,
        JsValue::String(_) => TYPE_STR_STRING,
        JsValue::Number(_) => TYPE_STR_NUMBER,
        JsValue::Object(o) => {
            if o.borrow().is_callable() {
                TYPE_STR_FUNCTION
            } else {
                TYPE_STR_OBJECT
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PreferredType {
    Default,
    String,
    Number,
}

pub fn to_primitive(
    ctx: &mut EvalContext,
    v: &JsValue,
    preferred_type: PreferredType,
) -> Result<JsValue, JErrorType> {
    match v {
        JsValue::Object(o) => default_value(ctx, o, preferred_type),
        _ => Ok(v.clone()),
    }
}

pub fn to_boolean(v: &JsValue) -> bool {
    match v {
        JsValue::Undefined | JsValue::Null => false,
        JsValue::Boolean(b) => *b,
        JsValue::Number(n) => !(n.is_nan() || *n == 0.0),
        JsValue::String(s) => !s.is_empty(),
        JsValue::Object(_) => true,
    }
}

/// `ToNumber` for values already known to be primitive.
pub fn primitive_to_number(v: &JsValue) -> Result<f64, JErrorType> {
    match v {
        JsValue::Undefined => Ok(f64::NAN),
        JsValue::Null => Ok(0.0),
        JsValue::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
        JsValue::Number(n) => Ok(*n),
        JsValue::String(s) => Ok(string_to_number(&s.to_rust_string())),
        JsValue::Object(_) => Err(JErrorType::TypeError(
            "Object must be converted to a primitive before ToNumber".to_string(),
        )),
    }
}

pub fn to_number(ctx: &mut EvalContext, v: &JsValue) -> Result<f64, JErrorType> {
    match v {
        JsValue::Object(_) => {
            let pv = to_primitive(ctx, v, PreferredType::Number)?;
            primitive_to_number(&pv)
        }
        _ => primitive_to_number(v),
    }
}

/// `ToString` for values already known to be primitive.
pub fn primitive_to_string(v: &JsValue) -> Result<String, JErrorType> {
    match v {
        JsValue::Undefined => Ok(TYPE_STR_UNDEFINED.to_string()),
        JsValue::Null => Ok(TYPE_STR_NULL.to_string()),
        JsValue::Boolean(b) => Ok(b.to_string()),
        JsValue::Number(n) => Ok(number_to_string(*n)),
        JsValue::String(s) => Ok(s.to_rust_string()),
        JsValue::Object(_) => Err(JErrorType::TypeError(
            "Object must be converted to a primitive before ToString".to_string(),
        )),
    }
}

pub fn to_string(ctx: &mut EvalContext, v: &JsValue) -> Result<String, JErrorType> {
    match v {
        JsValue::Object(_) => {
            let pv = to_primitive(ctx, v, PreferredType::String)?;
            primitive_to_string(&pv)
        }
        _ => primitive_to_string(v),
    }
}

/// `ToString` keeping every code unit. `to_string` gives the Rust text used for property keys and
/// messages, where a lone surrogate turns into U+FFFD.
pub fn to_js_string(ctx: &mut EvalContext, v: &JsValue) -> Result<JsString, JErrorType> {
    match v {
        JsValue::String(s) => Ok(s.clone()),
        JsValue::Object(_) => {
            let pv = to_primitive(ctx, v, PreferredType::String)?;
            to_js_string(ctx, &pv)
        }
        _ => Ok(JsString::from(primitive_to_string(v)?)),
    }
}

pub fn to_object(ctx: &mut EvalContext, v: &JsValue) -> Result<JsObjectType, JErrorType> {
    match v {
        JsValue::Undefined | JsValue::Null => Err(JErrorType::TypeError(format!(
            "'{}' cannot be converted to object",
            v
        ))),
        JsValue::Object(o) => Ok(o.clone()),
        _ => Ok(create_primitive_wrapper(ctx, v.clone())),
    }
}

pub fn to_integer(ctx: &mut EvalContext, v: &JsValue) -> Result<f64, JErrorType> {
    Ok(f64_to_integer(to_number(ctx, v)?))
}

pub fn to_int32(ctx: &mut EvalContext, v: &JsValue) -> Result<i32, JErrorType> {
    Ok(f64_to_int32(to_number(ctx, v)?))
}

pub fn to_uint32(ctx: &mut EvalContext, v: &JsValue) -> Result<u32, JErrorType> {
    Ok(f64_to_uint32(to_number(ctx, v)?))
}

pub fn to_uint16(ctx: &mut EvalContext, v: &JsValue) -> Result<u16, JErrorType> {
    Ok(f64_to_uint16(to_number(ctx, v)?))
}

pub fn f64_to_integer(n: f64) -> f64 {
    if n.is_nan() {
        0.0
    } else if n.is_infinite() || n == 0.0 {
        n
    } else {
        n.trunc()
    }
}

fn modulo_pow(n: f64, modulus: f64) -> f64 {
    if !n.is_finite() || n == 0.0 {
        return 0.0;
    }
    n.trunc().rem_euclid(modulus)
}

pub fn f64_to_uint32(n: f64) -> u32 {
    modulo_pow(n, TWO_POW_32) as u32
}

pub fn f64_to_int32(n: f64) -> i32 {
    let m = modulo_pow(n, TWO_POW_32);
    if m >= TWO_POW_31 {
        (m - TWO_POW_32) as i32
    } else {
        m as i32
    }
}

pub fn f64_to_uint16(n: f64) -> u16 {
    modulo_pow(n, TWO_POW_16) as u16
}

fn is_str_whitespace(c: char) -> bool {
    match c {
        '\u{0009}' | '\u{000B}' | '\u{000C}' | '\u{0020}' | '\u{00A0}' | '\u{FEFF}' => true,
        '\u{000A}' | '\u{000D}' | '\u{2028}' | '\u{2029}' => true,
        '\u{0085}' => false,
        c => c.is_whitespace(),
    }
}

/// `ToNumber` applied to a String: the StringNumericLiteral grammar, NaN when it doesn't match.
pub fn string_to_number(s: &str) -> f64 {
    let s = s.trim_matches(is_str_whitespace);
    if s.is_empty() {
        return 0.0;
    }
    if s.len() > 2 && (s.starts_with("0x") || s.starts_with("0X")) {
        let mut n = 0.0;
        for c in s[2..].chars() {
            match c.to_digit(16) {
                Some(d) => n = n * 16.0 + d as f64,
                None => return f64::NAN,
            }
        }
        return n;
    }
    let (negative, unsigned) = if let Some(rest) = s.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = s.strip_prefix('+') {
        (false, rest)
    } else {
        (false, s)
    };
    let magnitude = if unsigned == "Infinity" {
        f64::INFINITY
    } else {
        match parse_unsigned_decimal(unsigned) {
            Some(n) => n,
            None => return f64::NAN,
        }
    };
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

fn parse_unsigned_decimal(s: &str) -> Option<f64> {
    let (mantissa, exponent) = match s.find(|c: char| c == 'e' || c == 'E') {
        Some(i) => (&s[..i], Some(&s[i + 1..])),
        None => (s, None),
    };
    let (int_part, frac_part) = match mantissa.find('.') {
        Some(i) => (&mantissa[..i], &mantissa[i + 1..]),
        None => (mantissa, ""),
    };
    let all_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
    if (int_part.is_empty() && frac_part.is_empty()) || !all_digits(int_part) || !all_digits(frac_part)
    {
        return None;
    }
    let exponent = match exponent {
        None => "0",
        Some(e) => {
            let digits = e.strip_prefix('+').or_else(|| e.strip_prefix('-')).unwrap_or(e);
            if digits.is_empty() || !all_digits(digits) {
                return None;
            }
            e
        }
    };
    let canonical = format!(
        "{}.{}e{}",
        if int_part.is_empty() { "0" } else { int_part },
        if frac_part.is_empty() { "0" } else { frac_part },
        exponent
    );
    canonical.parse::<f64>().ok()
}

/// `ToString` applied to a Number: shortest round-tripping digits laid out per Number::toString.
pub fn number_to_string(m: f64) -> String {
    if m.is_nan() {
        return "NaN".to_string();
    }
    if m == 0.0 {
        return "0".to_string();
    }
    if m.is_infinite() {
        return if m > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if m < 0.0 {
        return format!("-{}", number_to_string(-m));
    }
    // `{:e}` yields the shortest digits that round-trip, e.g. "1.2345e3".
    let sci = format!("{:e}", m);
    let (mantissa, exp) = match sci.find('e') {
        Some(i) => (&sci[..i], &sci[i + 1..]),
        None => (sci.as_str(), "0"),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    let n = exp.parse::<i32>().unwrap_or(0) + 1;

    if k <= n && n <= 21 {
        format!("{}{}", digits, "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        format!("{}.{}", &digits[..n as usize], &digits[n as usize..])
    } else if -6 < n && n <= 0 {
        format!("0.{}{}", "0".repeat((-n) as usize), digits)
    } else {
        let e = n - 1;
        let sign = if e < 0 { '-' } else { '+' };
        if k == 1 {
            format!("{}e{}{}", digits, sign, e.abs())
        } else {
            format!("{}.{}e{}{}", &digits[..1], &digits[1..], sign, e.abs())
        }
    }
}

/// Number::toString with a radix in `2..=36`. Fraction digits stop once they pin down the
/// double, rounding the last one half-to-even.
pub fn number_to_radix_string(m: f64, radix: u32) -> String {
    if radix == 10 || !m.is_finite() || m == 0.0 {
        return number_to_string(m);
    }
    let r = radix as f64;
    let value = m.abs();
    let mut integer = value.floor();
    let mut fraction = value - integer;
    let mut delta = (0.5 * (f64::from_bits(value.to_bits() + 1) - value)).max(f64::from_bits(1));
    let mut fraction_digits: Vec<u8> = vec![];
    if fraction >= delta {
        loop {
            fraction *= r;
            delta *= r;
            let digit = fraction as usize;
            fraction_digits.push(RADIX_DIGITS[digit]);
            fraction -= digit as f64;
            if (fraction > 0.5 || (fraction == 0.5 && digit % 2 == 1)) && fraction + delta > 1.0 {
                // Round up; a carry out of every fraction digit bumps the integer part.
                loop {
                    match fraction_digits.pop() {
                        None => {
                            integer += 1.0;
                            break;
                        }
                        Some(c) => {
                            let next = (c as char).to_digit(36).map_or(radix, |d| d + 1);
                            if next < radix {
                                fraction_digits.push(RADIX_DIGITS[next as usize]);
                                break;
                            }
                        }
                    }
                }
                break;
            }
            if fraction < delta {
                break;
            }
        }
    }
    // Digits below the precision of the integer part are zeros.
    let mut integer_digits: Vec<u8> = vec![];
    while integer / r >= TWO_POW_53 {
        integer /= r;
        integer_digits.push(b'0');
    }
    loop {
        let remainder = integer % r;
        integer_digits.push(RADIX_DIGITS[remainder as usize]);
        integer = (integer - remainder) / r;
        if integer <= 0.0 {
            break;
        }
    }
    let mut out = String::with_capacity(integer_digits.len() + fraction_digits.len() + 2);
    if m < 0.0 {
        out.push('-');
    }
    out.extend(integer_digits.iter().rev().map(|&b| b as char));
    if !fraction_digits.is_empty() {
        out.push('.');
        out.extend(fraction_digits.iter().map(|&b| b as char));
    }
    out
}
