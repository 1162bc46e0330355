use crate::runner::ds::code::CodeUnit;
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::execution_context::ExecutionContext;
use crate::runner::ds::function_object::{
    bind_function_declarations, bind_var_declarations, execute_code_unit,
};
use crate::runner::ds::value::JsValue;
use crate::runner::eval_context::EvalContext;

/// Runs a script unit in the global scope: hoisted functions and vars are bound on the global
/// object first, then the body runs with the global object as `this`.
///
/// An uncaught failure is logged and returned; the context stack is restored to its depth at
/// entry, so `ctx` can run the next script.
pub fn run_script(ctx: &mut EvalContext, unit: &CodeUnit) -> Result<JsValue, JErrorType> {
    let base_depth = ctx.ctx_stack.len();
    let strict = unit.strict || ctx.config.strict_by_default;
    let global_env = ctx.global_env();
    let exec = ExecutionContext {
        function: None,
        function_name: "<script>".to_string(),
        lex_env: global_env.clone(),
        var_env: global_env.clone(),
        this_binding: JsValue::Object(ctx.global_object()),
        strict,
        is_construct: false,
    };
    log::debug!(
        "[{}] running script ({} vars, {} functions, strict: {})",
        ctx.id,
        unit.var_names.len(),
        unit.function_declarations.len(),
        strict
    );
    let result = ctx.run_in_context(exec, |ctx| {
        bind_function_declarations(
            ctx,
            &global_env,
            &unit.function_declarations,
            false,
            strict,
            true,
        )?;
        bind_var_declarations(ctx, &global_env, &unit.var_names, false)?;
        execute_code_unit(ctx, unit)
    });
    if let Err(e) = &result {
        log::warn!("[{}] {}", ctx.id, e);
        ctx.ctx_stack.truncate(base_depth);
    }
    result
}
