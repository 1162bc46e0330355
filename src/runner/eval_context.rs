use uuid::Uuid;

use crate::runner::config::EngineConfig;
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::execution_context::{ExecutionContext, ExecutionContextStack};
use crate::runner::ds::lex_env::JsLexEnvironmentType;
use crate::runner::ds::object::{object_create_with_class, JsObjectType};
use crate::runner::ds::object_property::StoredProperty;
use crate::runner::ds::operations::lex_env::get_identifier_reference;
use crate::runner::ds::realm::{CodeRealm, WellKnownIntrinsics, CLASS_ERROR};
use crate::runner::ds::reference::Reference;
use crate::runner::ds::value::JsValue;
use crate::runner::std_lib;

/// Everything one engine instance evaluates against: its realm, its call stack and its limits.
/// Passed explicitly to every operation that may run code.
pub struct EvalContext {
    pub id: Uuid,
    pub config: EngineConfig,
    pub realm: CodeRealm,
    pub ctx_stack: ExecutionContextStack,
}

impl EvalContext {
    pub fn new(config: EngineConfig) -> Result<Self, JErrorType> {
        let mut ctx = EvalContext {
            id: Uuid::new_v4(),
            config,
            realm: CodeRealm::new()?,
            ctx_stack: ExecutionContextStack::new(),
        };
        std_lib::install(&mut ctx)?;
        log::debug!("[{}] engine context created", ctx.id);
        Ok(ctx)
    }

    pub fn with_defaults() -> Result<Self, JErrorType> {
        Self::new(EngineConfig::default())
    }

    /// Runs `f` with `exec` as the running execution context. The context is popped on every
    /// exit path.
    pub fn run_in_context<T, F>(&mut self, exec: ExecutionContext, f: F) -> Result<T, JErrorType>
    where
        F: FnOnce(&mut EvalContext) -> Result<T, JErrorType>,
    {
        if self.ctx_stack.len() >= self.config.max_call_depth {
            return Err(JErrorType::RangeError(
                "Maximum call stack size exceeded".to_string(),
            ));
        }
        log::trace!(
            "push context {} (depth {})",
            exec.function_name,
            self.ctx_stack.len() + 1
        );
        self.ctx_stack.push_execution_ctx(exec);
        let result = f(self);
        if let Some(popped) = self.ctx_stack.pop_running_execution_ctx() {
            log::trace!("pop context {}", popped.function_name);
        }
        result
    }

    pub fn running_execution_context(&self) -> Option<&ExecutionContext> {
        self.ctx_stack.get_running_execution_ctx()
    }

    pub fn lexical_environment(&self) -> JsLexEnvironmentType {
        match self.running_execution_context() {
            Some(exec) => exec.lex_env.clone(),
            None => self.global_env(),
        }
    }

    pub fn variable_environment(&self) -> JsLexEnvironmentType {
        match self.running_execution_context() {
            Some(exec) => exec.var_env.clone(),
            None => self.global_env(),
        }
    }

    pub fn this_binding(&self) -> JsValue {
        match self.running_execution_context() {
            Some(exec) => exec.this_binding.clone(),
            None => JsValue::Object(self.global_object()),
        }
    }

    pub fn is_strict(&self) -> bool {
        match self.running_execution_context() {
            Some(exec) => exec.strict,
            None => self.config.strict_by_default,
        }
    }

    /// Whether the running function was invoked through `[[Construct]]`.
    pub fn is_construct_call(&self) -> bool {
        self.running_execution_context()
            .map_or(false, |exec| exec.is_construct)
    }

    /// Resolves an identifier in the running context's lexical environment.
    pub fn resolve_binding(&mut self, name: &str) -> Result<Reference, JErrorType> {
        let lex = self.lexical_environment();
        let strict = self.is_strict();
        get_identifier_reference(self, Some(lex), name, strict)
    }

    pub fn get_binding(&mut self, name: &str) -> Result<JsValue, JErrorType> {
        let reference = self.resolve_binding(name)?;
        reference.get_value(self)
    }

    pub fn set_binding(&mut self, name: &str, value: JsValue) -> Result<(), JErrorType> {
        let reference = self.resolve_binding(name)?;
        reference.put_value(self, value)
    }

    pub fn global_object(&self) -> JsObjectType {
        self.realm.global_object.clone()
    }

    pub fn global_env(&self) -> JsLexEnvironmentType {
        self.realm.global_env.clone()
    }

    pub fn intrinsic(&self, which: WellKnownIntrinsics) -> JsObjectType {
        self.realm.intrinsic(which)
    }

    /// Materializes an engine failure as a language-level error object.
    pub fn new_error_object(&self, err: &JErrorType) -> JsObjectType {
        let o = object_create_with_class(Some(self.realm.error_prototype_for(err)), CLASS_ERROR);
        if let Some(message) = err.message() {
            o.borrow_mut()
                .as_js_object_mut()
                .get_object_base_mut()
                .properties
                .insert(
                    "message".to_string(),
                    StoredProperty::new_data(JsValue::new_string(message), true, false, true),
                );
        }
        o
    }

    /// The value a script `catch` would see for `err`.
    pub fn error_to_value(&self, err: JErrorType) -> JsValue {
        match err {
            JErrorType::Thrown(v) => v,
            other => JsValue::Object(self.new_error_object(&other)),
        }
    }
}
