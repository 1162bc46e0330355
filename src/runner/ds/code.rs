use std::fmt;
use std::rc::Rc;

use once_cell::unsync::OnceCell;

use crate::runner::ds::error::JErrorType;
use crate::runner::ds::generator::GeneratorStep;
use crate::runner::ds::value::JsValue;
use crate::runner::eval_context::EvalContext;

/// How a code body finished.
#[derive(Clone, Debug)]
pub enum Completion {
    /// Fell off the end. Carries the value of the last expression statement, if any.
    Normal(Option<JsValue>),
    Return(JsValue),
}

/// Executable code handed over by the compiler front end.
pub trait ExecutableCode {
    fn execute(&self, ctx: &mut EvalContext) -> Result<Completion, JErrorType>;
}
impl<F> ExecutableCode for F
where
    F: Fn(&mut EvalContext) -> Result<Completion, JErrorType>,
{
    fn execute(&self, ctx: &mut EvalContext) -> Result<Completion, JErrorType> {
        self(ctx)
    }
}

pub enum CodeBody {
    Normal(Rc<dyn ExecutableCode>),
    /// A generator body, already cut at its suspend points. Every call of the function gets its
    /// own copy of the queue.
    Generator(Vec<GeneratorStep>),
}

/// One executable unit: a script or a function body plus what it hoists.
pub struct CodeUnit {
    pub body: CodeBody,
    pub var_names: Vec<String>,
    pub function_declarations: Vec<FunctionDeclaration>,
    pub strict: bool,
}
impl CodeUnit {
    pub fn new(body: CodeBody) -> Self {
        CodeUnit {
            body,
            var_names: vec![],
            function_declarations: vec![],
            strict: false,
        }
    }

    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&mut EvalContext) -> Result<Completion, JErrorType> + 'static,
    {
        CodeUnit::new(CodeBody::Normal(Rc::new(f)))
    }

    pub fn generator(steps: Vec<GeneratorStep>) -> Self {
        CodeUnit::new(CodeBody::Generator(steps))
    }

    pub fn with_var_names(mut self, names: &[&str]) -> Self {
        self.var_names = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn with_function_declaration(mut self, declaration: FunctionDeclaration) -> Self {
        self.function_declarations.push(declaration);
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn is_generator(&self) -> bool {
        matches!(self.body, CodeBody::Generator(_))
    }
}

/// A hoisted `function name(params) { ... }`.
#[derive(Clone)]
pub struct FunctionDeclaration {
    pub name: String,
    pub parameters: Vec<String>,
    pub code: LazyCode,
    pub strict: bool,
}
impl FunctionDeclaration {
    pub fn new(name: &str, parameters: &[&str], code: LazyCode, strict: bool) -> Self {
        FunctionDeclaration {
            name: name.to_string(),
            parameters: parameters.iter().map(|p| p.to_string()).collect(),
            code,
            strict,
        }
    }
}

/// A function body built on first use and shared by every closure created from the same
/// declaration afterwards.
#[derive(Clone)]
pub struct LazyCode {
    cell: Rc<OnceCell<Rc<CodeUnit>>>,
    builder: Rc<dyn Fn() -> Result<CodeUnit, JErrorType>>,
}
impl LazyCode {
    pub fn new<F>(builder: F) -> Self
    where
        F: Fn() -> Result<CodeUnit, JErrorType> + 'static,
    {
        LazyCode {
            cell: Rc::new(OnceCell::new()),
            builder: Rc::new(builder),
        }
    }

    /// Wraps code that is already built.
    pub fn ready(unit: CodeUnit) -> Self {
        let unit = Rc::new(unit);
        let cell = OnceCell::new();
        let _ = cell.set(unit);
        LazyCode {
            cell: Rc::new(cell),
            builder: Rc::new(|| {
                Err(JErrorType::SyntaxError(
                    "code unit was already realized".to_string(),
                ))
            }),
        }
    }

    pub fn realize(&self) -> Result<Rc<CodeUnit>, JErrorType> {
        let builder = &self.builder;
        self.cell
            .get_or_try_init(|| {
                log::trace!("realizing lazy code unit");
                builder().map(Rc::new)
            })
            .map(Rc::clone)
    }

    pub fn is_realized(&self) -> bool {
        self.cell.get().is_some()
    }
}
impl fmt::Debug for LazyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LazyCode(realized: {})", self.is_realized())
    }
}
