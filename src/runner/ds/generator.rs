use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use once_cell::unsync::OnceCell;

use crate::runner::ds::code::FunctionDeclaration;
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::execution_context::ExecutionContext;
use crate::runner::ds::function_object::{bind_function_declarations, bind_var_declarations};
use crate::runner::ds::lex_env::JsLexEnvironmentType;
use crate::runner::ds::object::{JsObject, JsObjectType, ObjectBase, ObjectType};
use crate::runner::ds::operations::lex_env::new_declarative_environment;
use crate::runner::ds::realm::WellKnownIntrinsics;
use crate::runner::ds::value::JsValue;
use crate::runner::eval_context::EvalContext;

pub const CLASS_GENERATOR: &str = "Generator";

/// What one step of a generator body did.
pub enum StepOutcome {
    Yield(JsValue),
    /// `yield break`: the generator is done, whatever is still queued.
    YieldBreak,
    /// `yield continue g`: hand the rest of this generator over to `g`'s queue.
    YieldContinue(JsObjectType),
    /// The slice ran to its end without producing a value.
    Exhausted,
}

/// One suspend-delimited slice of a generator body.
pub type GeneratorStep = Rc<dyn Fn(&mut EvalContext) -> Result<StepOutcome, JErrorType>>;

/// The activation a generator's steps run in. The body scope (hoisted vars and functions) is
/// created on the first resumption and reused by every later one.
pub struct GeneratorFrame {
    outer: JsLexEnvironmentType,
    var_names: Vec<String>,
    function_declarations: Vec<FunctionDeclaration>,
    this_binding: JsValue,
    strict: bool,
    function: Option<JsObjectType>,
    function_name: String,
    scope: OnceCell<JsLexEnvironmentType>,
}
impl GeneratorFrame {
    pub fn new(outer: JsLexEnvironmentType, this_binding: JsValue, strict: bool) -> Self {
        GeneratorFrame {
            outer,
            var_names: vec![],
            function_declarations: vec![],
            this_binding,
            strict,
            function: None,
            function_name: "<generator>".to_string(),
            scope: OnceCell::new(),
        }
    }

    pub fn with_declarations(
        mut self,
        var_names: Vec<String>,
        function_declarations: Vec<FunctionDeclaration>,
    ) -> Self {
        self.var_names = var_names;
        self.function_declarations = function_declarations;
        self
    }

    pub fn with_function(mut self, function: JsObjectType, name: &str) -> Self {
        self.function = Some(function);
        self.function_name = name.to_string();
        self
    }

    fn scope(&self, ctx: &mut EvalContext) -> Result<JsLexEnvironmentType, JErrorType> {
        if let Some(scope) = self.scope.get() {
            return Ok(scope.clone());
        }
        let env = new_declarative_environment(Some(self.outer.clone()));
        log::debug!(
            "initializing generator scope of {} ({} vars, {} functions)",
            self.function_name,
            self.var_names.len(),
            self.function_declarations.len()
        );
        bind_function_declarations(
            ctx,
            &env,
            &self.function_declarations,
            false,
            self.strict,
            false,
        )?;
        bind_var_declarations(ctx, &env, &self.var_names, false)?;
        let _ = self.scope.set(env.clone());
        Ok(env)
    }

    fn execution_context(&self, scope: JsLexEnvironmentType) -> ExecutionContext {
        ExecutionContext {
            function: self.function.clone(),
            function_name: self.function_name.clone(),
            lex_env: scope.clone(),
            var_env: scope,
            this_binding: self.this_binding.clone(),
            strict: self.strict,
            is_construct: false,
        }
    }
}

/// A queued step remembers the frame it belongs to, so steps taken over through
/// `yield continue` still see their own generator's bindings.
struct QueuedStep {
    step: GeneratorStep,
    frame: Rc<GeneratorFrame>,
}

pub struct GeneratorState {
    steps: VecDeque<QueuedStep>,
    current: Option<JsValue>,
    initialized: bool,
    complete: bool,
    running: bool,
}
impl GeneratorState {
    fn new(steps: Vec<GeneratorStep>, frame: GeneratorFrame) -> Self {
        let frame = Rc::new(frame);
        GeneratorState {
            steps: steps
                .into_iter()
                .map(|step| QueuedStep {
                    step,
                    frame: frame.clone(),
                })
                .collect(),
            current: None,
            initialized: false,
            complete: false,
            running: false,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn remaining_steps(&self) -> usize {
        self.steps.len()
    }

    fn finish(&mut self) {
        self.complete = true;
        self.steps.clear();
    }
}

pub struct GeneratorObject {
    base: ObjectBase,
    state: Rc<RefCell<GeneratorState>>,
}
impl GeneratorObject {
    pub fn new(steps: Vec<GeneratorStep>, frame: GeneratorFrame, prototype: JsObjectType) -> Self {
        GeneratorObject {
            base: ObjectBase::new_with_class(Some(prototype), CLASS_GENERATOR),
            state: Rc::new(RefCell::new(GeneratorState::new(steps, frame))),
        }
    }

    pub fn state(&self) -> Rc<RefCell<GeneratorState>> {
        self.state.clone()
    }
}
impl JsObject for GeneratorObject {
    fn get_object_base(&self) -> &ObjectBase {
        &self.base
    }

    fn get_object_base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }
}

pub fn create_generator(
    ctx: &EvalContext,
    steps: Vec<GeneratorStep>,
    frame: GeneratorFrame,
) -> JsObjectType {
    let proto = ctx.intrinsic(WellKnownIntrinsics::GeneratorPrototype);
    Rc::new(RefCell::new(ObjectType::Generator(GeneratorObject::new(
        steps, frame, proto,
    ))))
}

fn generator_state(g: &JsObjectType) -> Result<Rc<RefCell<GeneratorState>>, JErrorType> {
    let state = g.borrow().as_generator().map(|generator| generator.state());
    state.ok_or_else(|| JErrorType::TypeError("object is not a generator".to_string()))
}

/// Advances `g` by one step. `Ok(true)` means a value was produced and is available through
/// `generator_current`; once this returns `Ok(false)` it keeps doing so.
pub fn generator_next(ctx: &mut EvalContext, g: &JsObjectType) -> Result<bool, JErrorType> {
    let state = generator_state(g)?;
    {
        let mut s = state.borrow_mut();
        if s.complete {
            return Ok(false);
        }
        if s.running {
            return Err(JErrorType::TypeError(
                "Generator is already running".to_string(),
            ));
        }
        s.running = true;
        s.initialized = true;
    }
    let result = run_until_value(ctx, g, &state);
    let mut s = state.borrow_mut();
    s.running = false;
    match result {
        Ok(Some(v)) => {
            s.current = Some(v);
            Ok(true)
        }
        Ok(None) => {
            log::trace!("generator exhausted");
            s.finish();
            Ok(false)
        }
        Err(e) => {
            s.finish();
            Err(e)
        }
    }
}

fn run_until_value(
    ctx: &mut EvalContext,
    g: &JsObjectType,
    state: &Rc<RefCell<GeneratorState>>,
) -> Result<Option<JsValue>, JErrorType> {
    loop {
        let next = state.borrow_mut().steps.pop_front();
        let queued = match next {
            None => return Ok(None),
            Some(q) => q,
        };
        let scope = queued.frame.scope(ctx)?;
        let exec = queued.frame.execution_context(scope);
        let step = queued.step.clone();
        let outcome = ctx.run_in_context(exec, |ctx| step(ctx))?;
        match outcome {
            StepOutcome::Yield(v) => return Ok(Some(v)),
            StepOutcome::YieldBreak | StepOutcome::Exhausted => return Ok(None),
            StepOutcome::YieldContinue(target) => {
                if Rc::ptr_eq(&target, g) {
                    continue;
                }
                let target_state = generator_state(&target)?;
                let taken = {
                    let mut t = target_state.borrow_mut();
                    if t.running {
                        return Err(JErrorType::TypeError(
                            "Generator is already running".to_string(),
                        ));
                    }
                    t.complete = true;
                    std::mem::take(&mut t.steps)
                };
                log::trace!("yield continue: taking over {} steps", taken.len());
                state.borrow_mut().steps = taken;
            }
        }
    }
}

/// The value produced by the last successful `generator_next`.
pub fn generator_current(g: &JsObjectType) -> Result<JsValue, JErrorType> {
    let state = generator_state(g)?;
    let current = state.borrow().current.clone();
    current.ok_or_else(|| {
        JErrorType::TypeError("Generator has not produced a value yet".to_string())
    })
}

/// Drains `g`, collecting every produced value.
pub fn collect_generator(ctx: &mut EvalContext, g: &JsObjectType) -> Result<Vec<JsValue>, JErrorType> {
    let mut values = vec![];
    while generator_next(ctx, g)? {
        values.push(generator_current(g)?);
    }
    Ok(values)
}
