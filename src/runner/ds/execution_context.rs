use crate::runner::ds::lex_env::JsLexEnvironmentType;
use crate::runner::ds::object::JsObjectType;
use crate::runner::ds::value::JsValue;

pub struct ExecutionContext {
    pub function: Option<JsObjectType>,
    /// Name of the running function, for diagnostics.
    pub function_name: String,
    pub lex_env: JsLexEnvironmentType,
    pub var_env: JsLexEnvironmentType,
    pub this_binding: JsValue,
    pub strict: bool,
    /// Entered through `[[Construct]]` rather than `[[Call]]`.
    pub is_construct: bool,
}

pub struct ExecutionContextStack {
    stack: Vec<ExecutionContext>,
}
impl ExecutionContextStack {
    pub fn new() -> Self {
        ExecutionContextStack { stack: Vec::new() }
    }

    pub fn get_running_execution_ctx(&self) -> Option<&ExecutionContext> {
        self.stack.last()
    }

    pub fn get_running_execution_ctx_mut(&mut self) -> Option<&mut ExecutionContext> {
        self.stack.last_mut()
    }

    pub fn pop_running_execution_ctx(&mut self) -> Option<ExecutionContext> {
        self.stack.pop()
    }

    pub fn push_execution_ctx(&mut self, ctx: ExecutionContext) {
        self.stack.push(ctx)
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Drops every context above `depth`; used to recover after an uncaught failure.
    pub fn truncate(&mut self, depth: usize) {
        self.stack.truncate(depth)
    }
}
impl Default for ExecutionContextStack {
    fn default() -> Self {
        Self::new()
    }
}
