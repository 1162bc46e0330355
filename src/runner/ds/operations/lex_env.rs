use std::rc::Rc;

use crate::runner::ds::env_record::{
    DeclarativeEnvironmentRecord, EnvironmentRecordType, ObjectEnvironmentRecord,
};
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::lex_env::{JsLexEnvironmentType, LexEnvironment};
use crate::runner::ds::object::JsObjectType;
use crate::runner::ds::reference::{Reference, ReferenceBase};
use crate::runner::eval_context::EvalContext;

/// Resolves `name` against `lex` and its outer scopes, nearest first.
pub fn get_identifier_reference(
    ctx: &mut EvalContext,
    lex: Option<JsLexEnvironmentType>,
    name: &str,
    strict: bool,
) -> Result<Reference, JErrorType> {
    let mut current = lex;
    while let Some(env) = current {
        if env.env_record().has_binding(ctx, name)? {
            return Ok(Reference::new(ReferenceBase::Environment(env), name, strict));
        }
        current = env.outer.clone();
    }
    Ok(Reference::new(ReferenceBase::Unresolvable, name, strict))
}

pub fn new_declarative_environment(outer_lex: Option<JsLexEnvironmentType>) -> JsLexEnvironmentType {
    Rc::new(LexEnvironment {
        inner: EnvironmentRecordType::Declarative(DeclarativeEnvironmentRecord::new()),
        outer: outer_lex,
    })
}

pub fn new_object_environment(
    o: JsObjectType,
    outer_lex: Option<JsLexEnvironmentType>,
    provide_this: bool,
) -> JsLexEnvironmentType {
    Rc::new(LexEnvironment {
        inner: EnvironmentRecordType::Object(ObjectEnvironmentRecord::new(o, provide_this)),
        outer: outer_lex,
    })
}
