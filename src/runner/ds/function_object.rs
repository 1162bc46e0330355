use std::cell::RefCell;
use std::rc::Rc;

use crate::runner::ds::arguments_object::create_arguments_object;
use crate::runner::ds::code::{CodeBody, CodeUnit, Completion, FunctionDeclaration, LazyCode};
use crate::runner::ds::env_record::EnvironmentRecordType;
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::execution_context::ExecutionContext;
use crate::runner::ds::generator::{create_generator, GeneratorFrame};
use crate::runner::ds::lex_env::JsLexEnvironmentType;
use crate::runner::ds::object::{
    object_create, JsObject, JsObjectType, ObjectBase, ObjectType,
};
use crate::runner::ds::object_property::{PropertyDescriptor, StoredProperty};
use crate::runner::ds::operations::lex_env::new_declarative_environment;
use crate::runner::ds::operations::object::{define_own_property, get, get_property};
use crate::runner::ds::operations::type_conversion::to_object;
use crate::runner::ds::realm::WellKnownIntrinsics;
use crate::runner::ds::value::JsValue;
use crate::runner::eval_context::EvalContext;

pub const CLASS_FUNCTION: &str = "Function";
const ARGUMENTS: &str = "arguments";

/// Function signature for built-in methods: the evaluation context, `this` value, and arguments.
pub type NativeFn =
    fn(ctx: &mut EvalContext, this: JsValue, args: Vec<JsValue>) -> Result<JsValue, JErrorType>;

pub struct ScriptFunctionData {
    pub name: String,
    pub environment: JsLexEnvironmentType,
    pub formal_parameters: Vec<String>,
    pub code: LazyCode,
    pub strict: bool,
}

pub struct BoundFunctionData {
    pub target: JsObjectType,
    pub bound_this: JsValue,
    pub bound_arguments: Vec<JsValue>,
}

#[derive(Clone)]
pub enum FunctionKind {
    Script(Rc<ScriptFunctionData>),
    Native {
        name: String,
        func: NativeFn,
        constructible: bool,
    },
    Bound(Rc<BoundFunctionData>),
}

pub struct FunctionObject {
    base: ObjectBase,
    kind: FunctionKind,
}
impl FunctionObject {
    pub fn new(kind: FunctionKind, prototype: Option<JsObjectType>) -> Self {
        FunctionObject {
            base: ObjectBase::new_with_class(prototype, CLASS_FUNCTION),
            kind,
        }
    }

    pub fn kind(&self) -> &FunctionKind {
        &self.kind
    }

    pub fn name(&self) -> String {
        match &self.kind {
            FunctionKind::Script(data) => data.name.clone(),
            FunctionKind::Native { name, .. } => name.clone(),
            FunctionKind::Bound(_) => "bound".to_string(),
        }
    }

    pub fn is_strict(&self) -> bool {
        match &self.kind {
            FunctionKind::Script(data) => data.strict,
            _ => true,
        }
    }

    pub fn to_source_string(&self) -> String {
        match &self.kind {
            FunctionKind::Script(data) => format!(
                "function {}({}) {{ [code] }}",
                data.name,
                data.formal_parameters.join(", ")
            ),
            FunctionKind::Native { name, .. } => {
                format!("function {}() {{ [native code] }}", name)
            }
            FunctionKind::Bound(_) => "function () { [native code] }".to_string(),
        }
    }
}
impl JsObject for FunctionObject {
    fn get_object_base(&self) -> &ObjectBase {
        &self.base
    }

    fn get_object_base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }
}

fn wrap_function(f: FunctionObject) -> JsObjectType {
    Rc::new(RefCell::new(ObjectType::Function(f)))
}

fn function_kind(f: &JsObjectType) -> Option<FunctionKind> {
    let kind = f.borrow().as_function().map(|func| func.kind().clone());
    kind
}

fn describe(v: &JsObjectType) -> String {
    let name = v.borrow().as_function().map(|func| func.name());
    match name {
        Some(n) if !n.is_empty() => n,
        _ => JsValue::Object(v.clone()).to_string(),
    }
}

/// Writes a property straight into a fresh object; used while wiring up objects no script
/// code has seen yet.
fn define_fresh(o: &JsObjectType, name: &str, desc: PropertyDescriptor) -> Result<(), JErrorType> {
    let ok = o
        .borrow_mut()
        .as_js_object_mut()
        .define_own_property(name, desc)?;
    if ok {
        Ok(())
    } else {
        Err(JErrorType::TypeError(format!("Cannot define property: {}", name)))
    }
}

/// `caller`/`arguments` poison pills of strict and bound functions.
fn define_thrower_accessors(ctx: &EvalContext, o: &JsObjectType) -> Result<(), JErrorType> {
    let thrower = ctx.intrinsic(WellKnownIntrinsics::ThrowTypeError);
    for name in &["caller", ARGUMENTS] {
        define_fresh(
            o,
            name,
            PropertyDescriptor::accessor(Some(thrower.clone()), Some(thrower.clone()), false, false),
        )?;
    }
    Ok(())
}

/// Creates a built-in function object. Needs no context, so the realm can build its own
/// intrinsics with it.
pub fn create_native_function(
    function_prototype: Option<JsObjectType>,
    name: &str,
    func: NativeFn,
    length: usize,
    constructible: bool,
) -> Result<JsObjectType, JErrorType> {
    let f = wrap_function(FunctionObject::new(
        FunctionKind::Native {
            name: name.to_string(),
            func,
            constructible,
        },
        function_prototype,
    ));
    define_fresh(
        &f,
        "length",
        PropertyDescriptor::data(JsValue::Number(length as f64), false, false, false),
    )?;
    Ok(f)
}

pub fn create_script_function(
    ctx: &mut EvalContext,
    name: &str,
    formal_parameters: Vec<String>,
    code: LazyCode,
    environment: JsLexEnvironmentType,
    strict: bool,
) -> Result<JsObjectType, JErrorType> {
    let length = formal_parameters.len();
    let f = wrap_function(FunctionObject::new(
        FunctionKind::Script(Rc::new(ScriptFunctionData {
            name: name.to_string(),
            environment,
            formal_parameters,
            code,
            strict,
        })),
        Some(ctx.intrinsic(WellKnownIntrinsics::FunctionPrototype)),
    ));
    define_fresh(
        &f,
        "length",
        PropertyDescriptor::data(JsValue::Number(length as f64), false, false, false),
    )?;
    let proto = object_create(Some(ctx.intrinsic(WellKnownIntrinsics::ObjectPrototype)));
    define_fresh(
        &proto,
        "constructor",
        PropertyDescriptor::data(JsValue::Object(f.clone()), true, false, true),
    )?;
    define_fresh(
        &f,
        "prototype",
        PropertyDescriptor::data(JsValue::Object(proto), true, false, false),
    )?;
    if strict {
        define_thrower_accessors(ctx, &f)?;
    }
    Ok(f)
}

pub fn create_function_from_declaration(
    ctx: &mut EvalContext,
    declaration: &FunctionDeclaration,
    environment: JsLexEnvironmentType,
) -> Result<JsObjectType, JErrorType> {
    create_script_function(
        ctx,
        &declaration.name,
        declaration.parameters.clone(),
        declaration.code.clone(),
        environment,
        declaration.strict,
    )
}

/// `Function.prototype.bind`: a function that calls `target` with a fixed `this` and argument
/// prefix.
pub fn bind_function(
    ctx: &mut EvalContext,
    target: &JsObjectType,
    bound_this: JsValue,
    bound_arguments: Vec<JsValue>,
) -> Result<JsObjectType, JErrorType> {
    if !target.borrow().is_callable() {
        return Err(JErrorType::TypeError(
            "Bind must be called on a function".to_string(),
        ));
    }
    let target_length = match get(ctx, target, "length")? {
        JsValue::Number(n) if n.is_finite() => n,
        _ => 0.0,
    };
    let length = (target_length - bound_arguments.len() as f64).max(0.0);
    let f = wrap_function(FunctionObject::new(
        FunctionKind::Bound(Rc::new(BoundFunctionData {
            target: target.clone(),
            bound_this,
            bound_arguments,
        })),
        Some(ctx.intrinsic(WellKnownIntrinsics::FunctionPrototype)),
    ));
    define_fresh(
        &f,
        "length",
        PropertyDescriptor::data(JsValue::Number(length), false, false, false),
    )?;
    define_thrower_accessors(ctx, &f)?;
    Ok(f)
}

/// `[[Call]]`.
pub fn call_function(
    ctx: &mut EvalContext,
    f: &JsObjectType,
    this: JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    invoke_function(ctx, f, this, args, false)
}

fn invoke_function(
    ctx: &mut EvalContext,
    f: &JsObjectType,
    this: JsValue,
    args: Vec<JsValue>,
    is_construct: bool,
) -> Result<JsValue, JErrorType> {
    let kind = match function_kind(f) {
        Some(k) => k,
        None => {
            return Err(JErrorType::TypeError(format!(
                "{} is not a function",
                describe(f)
            )))
        }
    };
    match kind {
        FunctionKind::Native { name, func, .. } => {
            log::trace!("native call {}({} args)", name, args.len());
            let global_env = ctx.global_env();
            let exec = ExecutionContext {
                function: Some(f.clone()),
                function_name: name,
                lex_env: global_env.clone(),
                var_env: global_env,
                this_binding: this.clone(),
                strict: true,
                is_construct,
            };
            ctx.run_in_context(exec, move |ctx| func(ctx, this, args))
        }
        FunctionKind::Bound(data) => {
            let mut full_args = data.bound_arguments.clone();
            full_args.extend(args);
            call_function(ctx, &data.target, data.bound_this.clone(), full_args)
        }
        FunctionKind::Script(data) => call_script_function(ctx, f, &data, this, args, is_construct),
    }
}

fn call_script_function(
    ctx: &mut EvalContext,
    f: &JsObjectType,
    data: &ScriptFunctionData,
    this: JsValue,
    args: Vec<JsValue>,
    is_construct: bool,
) -> Result<JsValue, JErrorType> {
    let unit = data.code.realize()?;
    let strict = data.strict || unit.strict;
    let this_binding = if strict {
        this
    } else {
        match this {
            JsValue::Undefined | JsValue::Null => JsValue::Object(ctx.global_object()),
            JsValue::Object(_) => this,
            _ => JsValue::Object(to_object(ctx, &this)?),
        }
    };
    log::debug!(
        "call {}({} args, strict: {})",
        data.name,
        args.len(),
        strict
    );
    let env = new_declarative_environment(Some(data.environment.clone()));
    let exec = ExecutionContext {
        function: Some(f.clone()),
        function_name: data.name.clone(),
        lex_env: env.clone(),
        var_env: env.clone(),
        this_binding: this_binding.clone(),
        strict,
        is_construct,
    };
    match &unit.body {
        CodeBody::Normal(code) => ctx.run_in_context(exec, |ctx| {
            bind_formal_parameters(ctx, &env, &data.formal_parameters, &args, strict)?;
            bind_function_declarations(ctx, &env, &unit.function_declarations, false, strict, false)?;
            bind_arguments_object(ctx, &env, f, &args, strict)?;
            bind_var_declarations(ctx, &env, &unit.var_names, false)?;
            match code.execute(ctx)? {
                Completion::Return(v) => Ok(v),
                Completion::Normal(_) => Ok(JsValue::Undefined),
            }
        }),
        CodeBody::Generator(steps) => {
            ctx.run_in_context(exec, |ctx| {
                bind_formal_parameters(ctx, &env, &data.formal_parameters, &args, strict)?;
                bind_arguments_object(ctx, &env, f, &args, strict)
            })?;
            let frame = GeneratorFrame::new(env.clone(), this_binding, strict)
                .with_declarations(unit.var_names.clone(), unit.function_declarations.clone())
                .with_function(f.clone(), &data.name);
            Ok(JsValue::Object(create_generator(ctx, steps.clone(), frame)))
        }
    }
}

/// Binds each formal to its argument; missing arguments are `undefined` and, for repeated names,
/// the last one wins.
fn bind_formal_parameters(
    ctx: &mut EvalContext,
    env: &JsLexEnvironmentType,
    formals: &[String],
    args: &[JsValue],
    strict: bool,
) -> Result<(), JErrorType> {
    let record = env.env_record();
    for (i, name) in formals.iter().enumerate() {
        if !record.has_binding(ctx, name)? {
            record.create_mutable_binding(ctx, name.clone(), false)?;
        }
        let value = args.get(i).cloned().unwrap_or(JsValue::Undefined);
        record.set_mutable_binding(ctx, name, value, strict)?;
    }
    Ok(())
}

fn bind_arguments_object(
    ctx: &mut EvalContext,
    env: &JsLexEnvironmentType,
    func: &JsObjectType,
    args: &[JsValue],
    strict: bool,
) -> Result<(), JErrorType> {
    if env.env_record().has_binding(ctx, ARGUMENTS)? {
        return Ok(());
    }
    let arguments = JsValue::Object(create_arguments_object(ctx, func, args, strict)?);
    match &env.inner {
        EnvironmentRecordType::Declarative(d) if strict => {
            d.create_immutable_binding(ARGUMENTS.to_string())?;
            d.initialize_immutable_binding(ARGUMENTS, arguments)
        }
        _ => {
            let record = env.env_record();
            record.create_mutable_binding(ctx, ARGUMENTS.to_string(), false)?;
            record.set_mutable_binding(ctx, ARGUMENTS, arguments, false)
        }
    }
}

/// Instantiates hoisted function declarations as closures over `env`. On the global scope an
/// existing non-configurable global property may only be replaced when it is a writable,
/// enumerable data property.
pub fn bind_function_declarations(
    ctx: &mut EvalContext,
    env: &JsLexEnvironmentType,
    declarations: &[FunctionDeclaration],
    configurable_bindings: bool,
    strict: bool,
    is_global: bool,
) -> Result<(), JErrorType> {
    for declaration in declarations {
        let fo = create_function_from_declaration(ctx, declaration, env.clone())?;
        let name = declaration.name.as_str();
        let record = env.env_record();
        if !record.has_binding(ctx, name)? {
            record.create_mutable_binding(ctx, name.to_string(), configurable_bindings)?;
        } else if is_global {
            let global = ctx.global_object();
            match get_property(ctx, &global, name)? {
                Some(existing) if existing.is_configurable() => {
                    define_own_property(
                        ctx,
                        &global,
                        name,
                        PropertyDescriptor::data(
                            JsValue::Undefined,
                            true,
                            true,
                            configurable_bindings,
                        ),
                        true,
                    )?;
                }
                Some(StoredProperty::Data(d)) if d.writable && d.enumerable => {}
                Some(_) => {
                    return Err(JErrorType::TypeError(format!(
                        "Cannot redeclare global function '{}'",
                        name
                    )))
                }
                None => {}
            }
        }
        record.set_mutable_binding(ctx, name, JsValue::Object(fo), strict)?;
    }
    Ok(())
}

/// Hoisted `var`s start out `undefined` unless something already bound the name.
pub fn bind_var_declarations(
    ctx: &mut EvalContext,
    env: &JsLexEnvironmentType,
    var_names: &[String],
    configurable_bindings: bool,
) -> Result<(), JErrorType> {
    let record = env.env_record();
    for name in var_names {
        if !record.has_binding(ctx, name)? {
            record.create_mutable_binding(ctx, name.clone(), configurable_bindings)?;
        }
    }
    Ok(())
}

/// `[[Construct]]`.
pub fn construct_function(
    ctx: &mut EvalContext,
    f: &JsObjectType,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    let not_constructor = || JErrorType::TypeError(format!("{} is not a constructor", describe(f)));
    let kind = match function_kind(f) {
        Some(k) => k,
        None => return Err(not_constructor()),
    };
    match kind {
        FunctionKind::Bound(data) => {
            let mut full_args = data.bound_arguments.clone();
            full_args.extend(args);
            return construct_function(ctx, &data.target, full_args);
        }
        FunctionKind::Native { constructible, .. } => {
            if !constructible {
                return Err(not_constructor());
            }
        }
        FunctionKind::Script(data) => {
            if data.code.realize()?.is_generator() {
                return Err(not_constructor());
            }
        }
    }
    let proto = match get(ctx, f, "prototype")? {
        JsValue::Object(p) => p,
        _ => ctx.intrinsic(WellKnownIntrinsics::ObjectPrototype),
    };
    let obj = object_create(Some(proto));
    let result = invoke_function(ctx, f, JsValue::Object(obj.clone()), args, true)?;
    match result {
        JsValue::Object(_) => Ok(result),
        _ => Ok(JsValue::Object(obj)),
    }
}

/// `[[HasInstance]]`: whether `f.prototype` is on `v`'s prototype chain.
pub fn has_instance(ctx: &mut EvalContext, f: &JsObjectType, v: &JsValue) -> Result<bool, JErrorType> {
    let kind = match function_kind(f) {
        Some(k) => k,
        None => {
            return Err(JErrorType::TypeError(format!(
                "{} is not callable in instanceof",
                describe(f)
            )))
        }
    };
    if let FunctionKind::Bound(data) = kind {
        if !data.target.borrow().is_callable() {
            return Err(JErrorType::TypeError(
                "Bound target does not support instanceof".to_string(),
            ));
        }
        return has_instance(ctx, &data.target, v);
    }
    let o = match v {
        JsValue::Object(o) => o.clone(),
        _ => return Ok(false),
    };
    let proto = match get(ctx, f, "prototype")? {
        JsValue::Object(p) => p,
        _ => {
            return Err(JErrorType::TypeError(
                "Function has non-object prototype in instanceof check".to_string(),
            ))
        }
    };
    let mut depth = ctx.config.max_prototype_chain_depth;
    let mut current = o.borrow().as_js_object().get_prototype_of();
    while let Some(p) = current {
        if Rc::ptr_eq(&p, &proto) {
            return Ok(true);
        }
        if depth == 0 {
            return Err(JErrorType::TypeError(
                "Cyclic or too deep prototype chain".to_string(),
            ));
        }
        depth -= 1;
        current = p.borrow().as_js_object().get_prototype_of();
    }
    Ok(false)
}

/// Runs a code unit as the body of an already set-up function activation; used by hosts that
/// build closures by hand.
pub fn execute_code_unit(ctx: &mut EvalContext, unit: &CodeUnit) -> Result<JsValue, JErrorType> {
    match &unit.body {
        CodeBody::Normal(code) => match code.execute(ctx)? {
            Completion::Normal(v) => Ok(v.unwrap_or(JsValue::Undefined)),
            Completion::Return(v) => Ok(v),
        },
        CodeBody::Generator(_) => Err(JErrorType::SyntaxError(
            "a generator body cannot run as plain code".to_string(),
        )),
    }
}
