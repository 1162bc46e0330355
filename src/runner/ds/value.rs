use std::fmt;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

use crate::runner::ds::object::JsObjectType;
use crate::runner::ds::operations::type_conversion::{
    number_to_string, TYPE_STR_NULL, TYPE_STR_UNDEFINED,
};

/// A language value. `Reference`s are deliberately not a variant: they only ever live on the
/// Rust stack (see `ds::reference`), so nothing can store one in a property or binding.
#[derive(Clone)]
pub enum JsValue {
    Undefined,
    Null,
    Boolean(bool),
    String(JsString),
    Number(f64),
    Object(JsObjectType),
}
impl JsValue {
    pub fn new_string(s: impl Into<JsString>) -> Self {
        JsValue::String(s.into())
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, JsValue::Undefined)
    }

    pub fn is_null_or_undefined(&self) -> bool {
        matches!(self, JsValue::Undefined | JsValue::Null)
    }

    pub fn is_object(&self) -> bool {
        matches!(self, JsValue::Object(_))
    }

    pub fn is_primitive(&self) -> bool {
        !self.is_object()
    }

    pub fn as_object(&self) -> Option<&JsObjectType> {
        match self {
            JsValue::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            JsValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}
impl Display for JsValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            JsValue::Undefined => write!(f, "{}", TYPE_STR_UNDEFINED),
            JsValue::Null => write!(f, "{}", TYPE_STR_NULL),
            JsValue::Boolean(b) => write!(f, "{}", b),
            JsValue::String(s) => write!(f, "\"{}\"", s),
            JsValue::Number(n) => write!(f, "{}", number_to_string(*n)),
            JsValue::Object(o) => match o.try_borrow() {
                Ok(o) => write!(f, "[object {}]", o.as_js_object().class_name()),
                Err(_) => write!(f, "[object]"),
            },
        }
    }
}

impl fmt::Debug for JsValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            JsValue::Undefined => write!(f, "JsValue::Undefined"),
            JsValue::Null => write!(f, "JsValue::Null"),
            JsValue::Boolean(b) => write!(f, "JsValue::Boolean({})", b),
            JsValue::String(s) => write!(f, "JsValue::String({:?})", s),
            JsValue::Number(n) => write!(f, "JsValue::Number({:?})", n),
            JsValue::Object(_) => write!(f, "JsValue::Object({})", self),
        }
    }
}

/// Structural equality for host-side comparisons (tests, caches). Objects compare by identity and
/// numbers by IEEE equality, so `NaN != NaN`; language-level equality lives in
/// `operations::test_and_comparison`.
impl PartialEq for JsValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (JsValue::Undefined, JsValue::Undefined) => true,
            (JsValue::Null, JsValue::Null) => true,
            (JsValue::Boolean(a), JsValue::Boolean(b)) => a == b,
            (JsValue::String(a), JsValue::String(b)) => a == b,
            (JsValue::Number(a), JsValue::Number(b)) => a == b,
            (JsValue::Object(a), JsValue::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for JsValue {
    fn from(b: bool) -> Self {
        JsValue::Boolean(b)
    }
}

impl From<f64> for JsValue {
    fn from(n: f64) -> Self {
        JsValue::Number(n)
    }
}

impl From<&str> for JsValue {
    fn from(s: &str) -> Self {
        JsValue::String(s.into())
    }
}

impl From<String> for JsValue {
    fn from(s: String) -> Self {
        JsValue::String(s.into())
    }
}

impl From<JsString> for JsValue {
    fn from(s: JsString) -> Self {
        JsValue::String(s)
    }
}

/// String contents as UTF-16 code units. Lone surrogates are kept as they are; they only become
/// U+FFFD when the string is turned into Rust text.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JsString(Vec<u16>);
impl JsString {
    pub fn from_code_units(units: Vec<u16>) -> Self {
        JsString(units)
    }

    pub fn code_units(&self) -> &[u16] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn concat(&self, other: &JsString) -> JsString {
        let mut units = Vec::with_capacity(self.0.len() + other.0.len());
        units.extend_from_slice(&self.0);
        units.extend_from_slice(&other.0);
        JsString(units)
    }

    pub fn to_rust_string(&self) -> String {
        String::from_utf16_lossy(&self.0)
    }
}

impl From<&str> for JsString {
    fn from(s: &str) -> Self {
        JsString(s.encode_utf16().collect())
    }
}

impl From<String> for JsString {
    fn from(s: String) -> Self {
        JsString::from(s.as_str())
    }
}

impl From<&String> for JsString {
    fn from(s: &String) -> Self {
        JsString::from(s.as_str())
    }
}

impl Display for JsString {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_rust_string())
    }
}

impl fmt::Debug for JsString {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_rust_string())
    }
}

impl From<JsObjectType> for JsValue {
    fn from(o: JsObjectType) -> Self {
        JsValue::Object(o)
    }
}
