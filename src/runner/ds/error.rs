use thiserror::Error;

use crate::runner::ds::value::JsValue;

/// Failure of an abstract operation. The four named kinds are materialized into language-level
/// error objects only when they cross into script code (`EvalContext::error_to_value`);
/// `Thrown` carries a value that script code threw itself.
#[derive(Debug, Clone, Error)]
pub enum JErrorType {
    #[error("Uncaught reference error: {0}.")]
    ReferenceError(String),
    #[error("Uncaught type error: {0}.")]
    TypeError(String),
    #[error("Uncaught range error: {0}.")]
    RangeError(String),
    #[error("Uncaught syntax error: {0}.")]
    SyntaxError(String),
    #[error("Uncaught {0}")]
    Thrown(JsValue),
}
impl JErrorType {
    /// Name of the constructor the error object is built from.
    pub fn kind_name(&self) -> &'static str {
        match self {
            JErrorType::ReferenceError(_) => "ReferenceError",
            JErrorType::TypeError(_) => "TypeError",
            JErrorType::RangeError(_) => "RangeError",
            JErrorType::SyntaxError(_) => "SyntaxError",
            JErrorType::Thrown(_) => "Error",
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            JErrorType::ReferenceError(m)
            | JErrorType::TypeError(m)
            | JErrorType::RangeError(m)
            | JErrorType::SyntaxError(m) => Some(m),
            JErrorType::Thrown(_) => None,
        }
    }

    pub fn is_type_error(&self) -> bool {
        matches!(self, JErrorType::TypeError(_))
    }

    pub fn is_reference_error(&self) -> bool {
        matches!(self, JErrorType::ReferenceError(_))
    }

    pub fn is_range_error(&self) -> bool {
        matches!(self, JErrorType::RangeError(_))
    }
}
