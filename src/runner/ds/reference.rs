use crate::runner::ds::error::JErrorType;
use crate::runner::ds::lex_env::JsLexEnvironmentType;
use crate::runner::ds::operations::object::{delete, get, get_v, put, put_v};
use crate::runner::ds::operations::type_conversion::{get_type, to_object, TYPE_STR_UNDEFINED};
use crate::runner::ds::value::JsValue;
use crate::runner::eval_context::EvalContext;

pub enum ReferenceBase {
    Environment(JsLexEnvironmentType),
    Value(JsValue),
    Unresolvable,
}

/// A resolved-but-not-read name: what an identifier or a property access evaluates to before
/// `GetValue`/`PutValue`. Only ever lives on the Rust stack.
pub struct Reference {
    pub base: ReferenceBase,
    pub referenced_name: String,
    pub strict: bool,
}
impl Reference {
    pub fn new(base: ReferenceBase, name: &str, strict: bool) -> Self {
        Reference {
            base,
            referenced_name: name.to_string(),
            strict,
        }
    }

    pub fn is_unresolvable(&self) -> bool {
        matches!(self.base, ReferenceBase::Unresolvable)
    }

    pub fn is_property_reference(&self) -> bool {
        matches!(self.base, ReferenceBase::Value(_))
    }

    pub fn has_primitive_base(&self) -> bool {
        match &self.base {
            ReferenceBase::Value(v) => v.is_primitive(),
            _ => false,
        }
    }

    fn not_defined(&self) -> JErrorType {
        JErrorType::ReferenceError(format!("'{}' is not defined", self.referenced_name))
    }

    pub fn get_value(&self, ctx: &mut EvalContext) -> Result<JsValue, JErrorType> {
        match &self.base {
            ReferenceBase::Unresolvable => Err(self.not_defined()),
            ReferenceBase::Value(JsValue::Object(o)) => get(ctx, o, &self.referenced_name),
            ReferenceBase::Value(v) => get_v(ctx, v, &self.referenced_name),
            ReferenceBase::Environment(env) => {
                env.env_record()
                    .get_binding_value(ctx, &self.referenced_name, self.strict)
            }
        }
    }

    pub fn put_value(&self, ctx: &mut EvalContext, value: JsValue) -> Result<(), JErrorType> {
        match &self.base {
            ReferenceBase::Unresolvable => {
                if self.strict {
                    Err(self.not_defined())
                } else {
                    let global = ctx.global_object();
                    put(ctx, &global, &self.referenced_name, value, false)
                }
            }
            ReferenceBase::Value(JsValue::Object(o)) => {
                put(ctx, o, &self.referenced_name, value, self.strict)
            }
            ReferenceBase::Value(v) => put_v(ctx, v, &self.referenced_name, value, self.strict),
            ReferenceBase::Environment(env) => env.env_record().set_mutable_binding(
                ctx,
                &self.referenced_name,
                value,
                self.strict,
            ),
        }
    }

    /// The `this` a call through this reference receives.
    pub fn this_value(&self) -> JsValue {
        match &self.base {
            ReferenceBase::Value(v) => v.clone(),
            ReferenceBase::Environment(env) => env.env_record().implicit_this_value(),
            ReferenceBase::Unresolvable => JsValue::Undefined,
        }
    }

    /// The `delete` operator applied to this reference.
    pub fn delete(&self, ctx: &mut EvalContext) -> Result<bool, JErrorType> {
        match &self.base {
            ReferenceBase::Unresolvable => {
                if self.strict {
                    Err(JErrorType::SyntaxError(format!(
                        "Delete of an unqualified identifier '{}' in strict mode",
                        self.referenced_name
                    )))
                } else {
                    Ok(true)
                }
            }
            ReferenceBase::Value(v) => {
                let o = to_object(ctx, v)?;
                delete(ctx, &o, &self.referenced_name, self.strict)
            }
            ReferenceBase::Environment(env) => {
                if self.strict {
                    Err(JErrorType::SyntaxError(format!(
                        "Delete of an unqualified identifier '{}' in strict mode",
                        self.referenced_name
                    )))
                } else {
                    env.env_record().delete_binding(ctx, &self.referenced_name)
                }
            }
        }
    }

    /// The `typeof` operator applied to this reference; unresolvable names are `"undefined"`.
    pub fn type_of(&self, ctx: &mut EvalContext) -> Result<&'static str, JErrorType> {
        if self.is_unresolvable() {
            return Ok(TYPE_STR_UNDEFINED);
        }
        let v = self.get_value(ctx)?;
        Ok(get_type(&v))
    }
}

impl std::fmt::Debug for ReferenceBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferenceBase::Environment(_) => f.write_str("Environment(..)"),
            ReferenceBase::Value(v) => f.debug_tuple("Value").field(v).finish(),
            ReferenceBase::Unresolvable => f.write_str("Unresolvable"),
        }
    }
}

impl std::fmt::Debug for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reference")
            .field("base", &self.base)
            .field("referenced_name", &self.referenced_name)
            .field("strict", &self.strict)
            .finish()
    }
}
