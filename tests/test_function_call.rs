//! Tests for function objects: calls, construction, binding and the script entry point.

extern crate just_runtime;

use std::cell::RefCell;
use std::rc::Rc;

use just_runtime::runner::api::run_script;
use just_runtime::runner::config::EngineConfig;
use just_runtime::runner::ds::code::{CodeUnit, Completion, FunctionDeclaration, LazyCode};
use just_runtime::runner::ds::error::JErrorType;
use just_runtime::runner::ds::function_object::{
    bind_function, call_function, construct_function, create_native_function,
    create_script_function, has_instance,
};
use just_runtime::runner::ds::generator::{GeneratorStep, StepOutcome};
use just_runtime::runner::ds::object::{object_create, JsObjectType};
use just_runtime::runner::ds::operations::object::{get, get_prototype_of, put};
use just_runtime::runner::ds::operations::operators::{
    call, call_reference, construct, instance_of, multiply,
};
use just_runtime::runner::ds::realm::WellKnownIntrinsics;
use just_runtime::runner::ds::value::JsValue;
use just_runtime::runner::eval_context::EvalContext;

fn new_ctx() -> EvalContext {
    EvalContext::with_defaults().unwrap()
}

fn num(n: f64) -> JsValue {
    JsValue::Number(n)
}

fn string(s: &str) -> JsValue {
    JsValue::new_string(s)
}

fn script_function<F>(ctx: &mut EvalContext, name: &str, params: &[&str], strict: bool, body: F) -> JsObjectType
where
    F: Fn(&mut EvalContext) -> Result<Completion, JErrorType> + 'static,
{
    let env = ctx.global_env();
    create_script_function(
        ctx,
        name,
        params.iter().map(|p| p.to_string()).collect(),
        LazyCode::ready(CodeUnit::from_fn(body)),
        env,
        strict,
    )
    .unwrap()
}

fn returns_this(ctx: &mut EvalContext) -> Result<Completion, JErrorType> {
    Ok(Completion::Return(ctx.this_binding()))
}

fn new_plain_object(ctx: &EvalContext) -> JsObjectType {
    object_create(Some(ctx.intrinsic(WellKnownIntrinsics::ObjectPrototype)))
}

fn adds_one(
    _ctx: &mut EvalContext,
    _this: JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    match args.get(0) {
        Some(JsValue::Number(n)) => Ok(num(n + 1.0)),
        _ => Ok(JsValue::Undefined),
    }
}

mod call_tests {
    use super::*;

    #[test]
    fn test_missing_formals_are_undefined() {
        let mut ctx = new_ctx();
        let f = script_function(&mut ctx, "second", &["a", "b"], false, |ctx| {
            Ok(Completion::Return(ctx.get_binding("b")?))
        });
        let result = call_function(&mut ctx, &f, JsValue::Undefined, vec![num(1.0)]).unwrap();
        assert_eq!(result, JsValue::Undefined);
        let result = call_function(&mut ctx, &f, JsValue::Undefined, vec![num(1.0), num(2.0), num(3.0)]).unwrap();
        assert_eq!(result, num(2.0));
    }

    #[test]
    fn test_arguments_object_sees_every_argument() {
        let mut ctx = new_ctx();
        let f = script_function(&mut ctx, "count", &["a"], false, |ctx| {
            let arguments = ctx.get_binding("arguments")?;
            let o = arguments.as_object().cloned().unwrap();
            let length = get(ctx, &o, "length")?;
            let last = get(ctx, &o, "2")?;
            let callee = get(ctx, &o, "callee")?;
            Ok(Completion::Return(if callee.is_object() && last == num(30.0) {
                length
            } else {
                JsValue::Undefined
            }))
        });
        let result = call_function(
            &mut ctx,
            &f,
            JsValue::Undefined,
            vec![num(10.0), num(20.0), num(30.0)],
        )
        .unwrap();
        assert_eq!(result, num(3.0));
    }

    #[test]
    fn test_function_declaration_named_arguments_wins() {
        let mut ctx = new_ctx();
        let inner = LazyCode::ready(CodeUnit::from_fn(|_| Ok(Completion::Normal(None))));
        let body = CodeUnit::from_fn(|ctx| {
            let arguments = ctx.get_binding("arguments")?;
            let callable = arguments.as_object().map_or(false, |o| o.borrow().is_callable());
            Ok(Completion::Return(JsValue::Boolean(callable)))
        })
        .with_var_names(&["arguments"])
        .with_function_declaration(FunctionDeclaration::new("arguments", &[], inner, false));
        let env = ctx.global_env();
        let f = create_script_function(
            &mut ctx,
            "shadowed",
            vec![],
            LazyCode::ready(body),
            env,
            false,
        )
        .unwrap();
        let result = call_function(&mut ctx, &f, JsValue::Undefined, vec![num(1.0)]).unwrap();
        assert_eq!(result, JsValue::Boolean(true));
    }

    #[test]
    fn test_strict_arguments_callee_throws() {
        let mut ctx = new_ctx();
        let f = script_function(&mut ctx, "strictCallee", &[], true, |ctx| {
            let arguments = ctx.get_binding("arguments")?;
            let o = arguments.as_object().cloned().unwrap();
            get(ctx, &o, "callee")?;
            Ok(Completion::Normal(None))
        });
        let err = call_function(&mut ctx, &f, JsValue::Undefined, vec![]).unwrap_err();
        assert!(err.is_type_error());
    }

    #[test]
    fn test_sloppy_this_is_coerced() {
        let mut ctx = new_ctx();
        let f = script_function(&mut ctx, "sloppy", &[], false, returns_this);
        let global = JsValue::Object(ctx.global_object());
        assert_eq!(call_function(&mut ctx, &f, JsValue::Undefined, vec![]).unwrap(), global);
        assert_eq!(call_function(&mut ctx, &f, JsValue::Null, vec![]).unwrap(), global);
        let boxed = call_function(&mut ctx, &f, num(4.0), vec![]).unwrap();
        assert!(boxed.is_object());
    }

    #[test]
    fn test_strict_this_passes_through() {
        let mut ctx = new_ctx();
        let f = script_function(&mut ctx, "strict", &[], true, returns_this);
        assert_eq!(call_function(&mut ctx, &f, JsValue::Undefined, vec![]).unwrap(), JsValue::Undefined);
        assert_eq!(call_function(&mut ctx, &f, num(4.0), vec![]).unwrap(), num(4.0));
    }

    #[test]
    fn test_calling_non_callable_fails() {
        let mut ctx = new_ctx();
        let o = new_plain_object(&ctx);
        let err = call(&mut ctx, &JsValue::Object(o), JsValue::Undefined, vec![]).unwrap_err();
        assert!(err.is_type_error());
        let err = call(&mut ctx, &num(1.0), JsValue::Undefined, vec![]).unwrap_err();
        assert!(err.is_type_error());
    }

    #[test]
    fn test_call_depth_is_bounded() {
        let config = EngineConfig {
            max_call_depth: 32,
            ..EngineConfig::default()
        };
        let mut ctx = EvalContext::new(config).unwrap();
        let f = script_function(&mut ctx, "rec", &[], false, |ctx| {
            let rec = ctx.get_binding("rec")?;
            call(ctx, &rec, JsValue::Undefined, vec![])?;
            Ok(Completion::Normal(None))
        });
        ctx.set_binding("rec", JsValue::Object(f.clone())).unwrap();
        let err = call_function(&mut ctx, &f, JsValue::Undefined, vec![]).unwrap_err();
        assert!(err.is_range_error());
        assert!(ctx.ctx_stack.is_empty());
    }

    #[test]
    fn test_body_is_built_on_first_call() {
        let mut ctx = new_ctx();
        let code = LazyCode::new(|| Ok(CodeUnit::from_fn(|_| Ok(Completion::Return(num(7.0))))));
        let env = ctx.global_env();
        let f = create_script_function(&mut ctx, "lazy", vec![], code.clone(), env, false).unwrap();
        assert!(!code.is_realized());
        assert_eq!(call_function(&mut ctx, &f, JsValue::Undefined, vec![]).unwrap(), num(7.0));
        assert!(code.is_realized());
    }
}

mod construct_tests {
    use super::*;

    #[test]
    fn test_construct_returns_fresh_object() {
        let mut ctx = new_ctx();
        let f = script_function(&mut ctx, "Point", &["x"], false, |ctx| {
            let this = ctx.this_binding();
            let x = ctx.get_binding("x")?;
            if let JsValue::Object(o) = this {
                put(ctx, &o, "x", x, true)?;
            }
            Ok(Completion::Return(num(0.0)))
        });
        let result = construct_function(&mut ctx, &f, vec![num(3.0)]).unwrap();
        let o = result.as_object().cloned().unwrap();
        assert_eq!(get(&mut ctx, &o, "x").unwrap(), num(3.0));
        let proto = get(&mut ctx, &f, "prototype").unwrap();
        assert_eq!(get_prototype_of(&o).map(JsValue::Object), Some(proto));
        assert!(has_instance(&mut ctx, &f, &result).unwrap());
    }

    #[test]
    fn test_construct_keeps_returned_object() {
        let mut ctx = new_ctx();
        let replacement = new_plain_object(&ctx);
        let kept = replacement.clone();
        let f = script_function(&mut ctx, "Factory", &[], false, move |_| {
            Ok(Completion::Return(JsValue::Object(kept.clone())))
        });
        let result = construct_function(&mut ctx, &f, vec![]).unwrap();
        assert_eq!(result, JsValue::Object(replacement));
    }

    #[test]
    fn test_non_constructors_are_rejected() {
        let mut ctx = new_ctx();
        let native = create_native_function(
            Some(ctx.intrinsic(WellKnownIntrinsics::FunctionPrototype)),
            "addsOne",
            adds_one,
            1,
            false,
        )
        .unwrap();
        assert!(construct_function(&mut ctx, &native, vec![]).unwrap_err().is_type_error());

        let env = ctx.global_env();
        let step: GeneratorStep = Rc::new(|_: &mut EvalContext| Ok(StepOutcome::Yield(num(1.0))));
        let generator_fn = create_script_function(
            &mut ctx,
            "gen",
            vec![],
            LazyCode::ready(CodeUnit::generator(vec![step])),
            env,
            false,
        )
        .unwrap();
        assert!(construct_function(&mut ctx, &generator_fn, vec![]).unwrap_err().is_type_error());
    }

    #[test]
    fn test_instance_of_primitive_is_false() {
        let mut ctx = new_ctx();
        let f = script_function(&mut ctx, "C", &[], false, |_| Ok(Completion::Normal(None)));
        assert_eq!(
            instance_of(&mut ctx, &num(1.0), &JsValue::Object(f)).unwrap(),
            JsValue::Boolean(false)
        );
        let err = instance_of(&mut ctx, &num(1.0), &num(2.0)).unwrap_err();
        assert!(err.is_type_error());
    }
}

mod bound_function_tests {
    use super::*;

    fn recording_function(ctx: &mut EvalContext, seen: Rc<RefCell<Vec<JsValue>>>) -> JsObjectType {
        script_function(ctx, "record", &["a", "b", "c", "d"], true, move |ctx| {
            let mut values = vec![ctx.this_binding()];
            for name in &["a", "b", "c", "d"] {
                values.push(ctx.get_binding(name)?);
            }
            *seen.borrow_mut() = values;
            Ok(Completion::Normal(None))
        })
    }

    #[test]
    fn test_bound_arguments_come_first() {
        let mut ctx = new_ctx();
        let seen = Rc::new(RefCell::new(vec![]));
        let f = recording_function(&mut ctx, seen.clone());
        let bound = bind_function(&mut ctx, &f, string("self"), vec![num(1.0), num(2.0)]).unwrap();
        call_function(&mut ctx, &bound, string("ignored"), vec![num(3.0), num(4.0)]).unwrap();
        assert_eq!(
            *seen.borrow(),
            vec![string("self"), num(1.0), num(2.0), num(3.0), num(4.0)]
        );
        assert_eq!(get(&mut ctx, &bound, "length").unwrap(), num(2.0));
    }

    #[test]
    fn test_bound_length_never_negative() {
        let mut ctx = new_ctx();
        let seen = Rc::new(RefCell::new(vec![]));
        let f = recording_function(&mut ctx, seen);
        let args = (0..6).map(|i| num(i as f64)).collect();
        let bound = bind_function(&mut ctx, &f, JsValue::Undefined, args).unwrap();
        assert_eq!(get(&mut ctx, &bound, "length").unwrap(), num(0.0));
    }

    #[test]
    fn test_bound_function_instance_checks_use_target() {
        let mut ctx = new_ctx();
        let f = script_function(&mut ctx, "Shape", &[], false, |_| Ok(Completion::Normal(None)));
        let bound = bind_function(&mut ctx, &f, JsValue::Undefined, vec![]).unwrap();
        let instance = construct_function(&mut ctx, &bound, vec![]).unwrap();
        assert!(has_instance(&mut ctx, &f, &instance).unwrap());
        assert!(has_instance(&mut ctx, &bound, &instance).unwrap());
        let other = JsValue::Object(new_plain_object(&ctx));
        assert!(!has_instance(&mut ctx, &bound, &other).unwrap());
    }

    #[test]
    fn test_bound_function_caller_is_poisoned() {
        let mut ctx = new_ctx();
        let f = script_function(&mut ctx, "f", &[], false, |_| Ok(Completion::Normal(None)));
        let bound = bind_function(&mut ctx, &f, JsValue::Undefined, vec![]).unwrap();
        assert!(get(&mut ctx, &bound, "caller").unwrap_err().is_type_error());
    }

    #[test]
    fn test_binding_a_non_function_fails() {
        let mut ctx = new_ctx();
        let o = new_plain_object(&ctx);
        assert!(bind_function(&mut ctx, &o, JsValue::Undefined, vec![])
            .unwrap_err()
            .is_type_error());
    }
}

mod builtin_function_tests {
    use super::*;

    fn method(ctx: &mut EvalContext, f: &JsObjectType, name: &str) -> JsValue {
        get(ctx, f, name).unwrap()
    }

    #[test]
    fn test_function_prototype_call() {
        let mut ctx = new_ctx();
        let f = script_function(&mut ctx, "pair", &["a"], true, |ctx| {
            let this = ctx.this_binding();
            let a = ctx.get_binding("a")?;
            Ok(Completion::Return(if this == a { this } else { JsValue::Null }))
        });
        let call_method = method(&mut ctx, &f, "call");
        let result = call(&mut ctx, &call_method, JsValue::Object(f), vec![num(5.0), num(5.0)]).unwrap();
        assert_eq!(result, num(5.0));
    }

    #[test]
    fn test_function_prototype_apply_reads_array_like() {
        let mut ctx = new_ctx();
        let f = script_function(&mut ctx, "second", &["a", "b"], true, |ctx| {
            Ok(Completion::Return(ctx.get_binding("b")?))
        });
        let list = new_plain_object(&ctx);
        put(&mut ctx, &list, "length", num(2.0), true).unwrap();
        put(&mut ctx, &list, "0", string("x"), true).unwrap();
        put(&mut ctx, &list, "1", string("y"), true).unwrap();
        let apply = method(&mut ctx, &f, "apply");
        let result = call(
            &mut ctx,
            &apply,
            JsValue::Object(f.clone()),
            vec![JsValue::Undefined, JsValue::Object(list)],
        )
        .unwrap();
        assert_eq!(result, string("y"));

        let err = call(&mut ctx, &apply, JsValue::Object(f), vec![JsValue::Undefined, num(1.0)]).unwrap_err();
        assert!(err.is_type_error());
    }

    #[test]
    fn test_apply_rejects_oversized_array_like() {
        let mut ctx = new_ctx();
        let fp = ctx.intrinsic(WellKnownIntrinsics::FunctionPrototype);
        let apply = method(&mut ctx, &fp, "apply");
        let huge = new_plain_object(&ctx);
        put(&mut ctx, &huge, "length", num(4294967295.0), true).unwrap();
        let err = call(
            &mut ctx,
            &apply,
            JsValue::Object(fp),
            vec![JsValue::Undefined, JsValue::Object(huge)],
        )
        .unwrap_err();
        assert!(err.is_range_error());
    }

    #[test]
    fn test_apply_honors_configured_argument_limit() {
        let config = EngineConfig {
            max_argument_count: 2,
            ..EngineConfig::default()
        };
        let mut ctx = EvalContext::new(config).unwrap();
        let f = script_function(&mut ctx, "noop", &[], false, |_| Ok(Completion::Normal(None)));
        let apply = method(&mut ctx, &f, "apply");
        let list = new_plain_object(&ctx);
        put(&mut ctx, &list, "length", num(2.0), true).unwrap();
        let args = vec![JsValue::Undefined, JsValue::Object(list.clone())];
        assert_eq!(call(&mut ctx, &apply, JsValue::Object(f.clone()), args).unwrap(), JsValue::Undefined);
        put(&mut ctx, &list, "length", num(3.0), true).unwrap();
        let args = vec![JsValue::Undefined, JsValue::Object(list)];
        assert!(call(&mut ctx, &apply, JsValue::Object(f), args).unwrap_err().is_range_error());
    }

    #[test]
    fn test_function_prototype_bind() {
        let mut ctx = new_ctx();
        let native = create_native_function(
            Some(ctx.intrinsic(WellKnownIntrinsics::FunctionPrototype)),
            "addsOne",
            adds_one,
            1,
            false,
        )
        .unwrap();
        let bind = method(&mut ctx, &native, "bind");
        let bound = call(&mut ctx, &bind, JsValue::Object(native), vec![JsValue::Undefined, num(41.0)]).unwrap();
        assert_eq!(call(&mut ctx, &bound, JsValue::Undefined, vec![]).unwrap(), num(42.0));
    }

    #[test]
    fn test_function_to_string() {
        let mut ctx = new_ctx();
        let f = script_function(&mut ctx, "named", &["a", "b"], false, |_| Ok(Completion::Normal(None)));
        let to_string = method(&mut ctx, &f, "toString");
        let source = call(&mut ctx, &to_string, JsValue::Object(f), vec![]).unwrap();
        assert_eq!(source, string("function named(a, b) { [code] }"));
    }
}

mod primitive_builtin_tests {
    use super::*;

    #[test]
    fn test_number_call_converts_and_construct_wraps() {
        let mut ctx = new_ctx();
        let number = ctx.get_binding("Number").unwrap();
        assert_eq!(
            call(&mut ctx, &number, JsValue::Undefined, vec![string("42")]).unwrap(),
            num(42.0)
        );
        // A receiver shaped like a fresh instance does not make a plain call a construct call.
        let proto = ctx.intrinsic(WellKnownIntrinsics::NumberPrototype);
        let receiver = JsValue::Object(object_create(Some(proto.clone())));
        assert_eq!(call(&mut ctx, &number, receiver, vec![num(5.0)]).unwrap(), num(5.0));

        let wrapped = construct(&mut ctx, &number, vec![string("42")]).unwrap();
        let o = wrapped.as_object().cloned().unwrap();
        assert!(get_prototype_of(&o).map_or(false, |p| Rc::ptr_eq(&p, &proto)));
        let value_of = get(&mut ctx, &o, "valueOf").unwrap();
        assert_eq!(call(&mut ctx, &value_of, wrapped, vec![]).unwrap(), num(42.0));
    }

    #[test]
    fn test_string_construct_wraps() {
        let mut ctx = new_ctx();
        let string_ctor = ctx.get_binding("String").unwrap();
        let wrapped = construct(&mut ctx, &string_ctor, vec![num(12.0)]).unwrap();
        let o = wrapped.as_object().cloned().unwrap();
        assert_eq!(get(&mut ctx, &o, "length").unwrap(), num(2.0));
        assert_eq!(get(&mut ctx, &o, "1").unwrap(), string("2"));
        assert_eq!(
            call(&mut ctx, &string_ctor, JsValue::Undefined, vec![JsValue::Boolean(true)]).unwrap(),
            string("true")
        );
    }

    #[test]
    fn test_number_to_string_radix() {
        let mut ctx = new_ctx();
        let proto = ctx.intrinsic(WellKnownIntrinsics::NumberPrototype);
        let to_string = get(&mut ctx, &proto, "toString").unwrap();
        assert_eq!(call(&mut ctx, &to_string, num(255.0), vec![num(16.0)]).unwrap(), string("ff"));
        assert_eq!(call(&mut ctx, &to_string, num(-10.5), vec![num(2.0)]).unwrap(), string("-1010.1"));
        assert_eq!(call(&mut ctx, &to_string, num(1.5), vec![]).unwrap(), string("1.5"));
        for bad in vec![num(1.0), num(37.0)] {
            let err = call(&mut ctx, &to_string, num(1.0), vec![bad]).unwrap_err();
            assert!(err.is_range_error());
        }
    }
}

mod error_tests {
    use super::*;

    #[test]
    fn test_error_constructors() {
        let mut ctx = new_ctx();
        let type_error = ctx.get_binding("TypeError").unwrap();
        let error = ctx.get_binding("Error").unwrap();
        let e = construct(&mut ctx, &type_error, vec![string("bad")]).unwrap();
        let o = e.as_object().cloned().unwrap();
        assert_eq!(get(&mut ctx, &o, "message").unwrap(), string("bad"));
        assert_eq!(get(&mut ctx, &o, "name").unwrap(), string("TypeError"));
        assert_eq!(instance_of(&mut ctx, &e, &type_error).unwrap(), JsValue::Boolean(true));
        assert_eq!(instance_of(&mut ctx, &e, &error).unwrap(), JsValue::Boolean(true));

        let to_string = get(&mut ctx, &o, "toString").unwrap();
        assert_eq!(call(&mut ctx, &to_string, e, vec![]).unwrap(), string("TypeError: bad"));
    }

    #[test]
    fn test_error_called_without_new() {
        let mut ctx = new_ctx();
        let range_error = ctx.get_binding("RangeError").unwrap();
        let e = call(&mut ctx, &range_error, JsValue::Undefined, vec![]).unwrap();
        assert_eq!(instance_of(&mut ctx, &e, &range_error).unwrap(), JsValue::Boolean(true));
        let o = e.as_object().cloned().unwrap();
        assert_eq!(get(&mut ctx, &o, "message").unwrap(), string(""));
    }

    #[test]
    fn test_engine_errors_become_error_objects() {
        let mut ctx = new_ctx();
        let reference_error = ctx.get_binding("ReferenceError").unwrap();
        let v = ctx.error_to_value(JErrorType::ReferenceError("x is not defined".to_string()));
        assert_eq!(instance_of(&mut ctx, &v, &reference_error).unwrap(), JsValue::Boolean(true));
        let o = v.as_object().cloned().unwrap();
        assert_eq!(get(&mut ctx, &o, "message").unwrap(), string("x is not defined"));

        let thrown = ctx.error_to_value(JErrorType::Thrown(num(3.0)));
        assert_eq!(thrown, num(3.0));
    }
}

mod script_tests {
    use super::*;

    fn reports_strictness(ctx: &mut EvalContext) -> Result<Completion, JErrorType> {
        Ok(Completion::Normal(Some(JsValue::Boolean(ctx.is_strict()))))
    }

    #[test]
    fn test_script_hoists_declarations() {
        let mut ctx = new_ctx();
        let double_code = LazyCode::new(|| {
            Ok(CodeUnit::from_fn(|ctx| {
                let x = ctx.get_binding("x")?;
                Ok(Completion::Return(multiply(ctx, &x, &num(2.0))?))
            }))
        });
        let unit = CodeUnit::from_fn(|ctx| {
            let before = ctx.get_binding("v")?;
            if before != JsValue::Undefined {
                return Ok(Completion::Normal(Some(JsValue::Null)));
            }
            let double = ctx.resolve_binding("double")?;
            let result = call_reference(ctx, &double, vec![num(21.0)])?;
            ctx.set_binding("v", result.clone())?;
            Ok(Completion::Normal(Some(result)))
        })
        .with_var_names(&["v"])
        .with_function_declaration(FunctionDeclaration::new("double", &["x"], double_code.clone(), false));

        assert_eq!(run_script(&mut ctx, &unit).unwrap(), num(42.0));
        assert!(double_code.is_realized());
        assert_eq!(ctx.get_binding("v").unwrap(), num(42.0));
        let global = ctx.global_object();
        assert!(get(&mut ctx, &global, "double").unwrap().is_object());
    }

    #[test]
    fn test_script_recovers_after_failure() {
        let mut ctx = new_ctx();
        let failing = CodeUnit::from_fn(|ctx| {
            ctx.get_binding("nowhere")?;
            Ok(Completion::Normal(None))
        });
        let err = run_script(&mut ctx, &failing).unwrap_err();
        assert!(err.is_reference_error());
        assert!(ctx.ctx_stack.is_empty());

        let ok = CodeUnit::from_fn(|_| Ok(Completion::Normal(Some(string("fine")))));
        assert_eq!(run_script(&mut ctx, &ok).unwrap(), string("fine"));
    }

    #[test]
    fn test_script_strictness() {
        let mut ctx = new_ctx();
        assert_eq!(run_script(&mut ctx, &CodeUnit::from_fn(reports_strictness)).unwrap(), JsValue::Boolean(false));
        let unit = CodeUnit::from_fn(reports_strictness).with_strict(true);
        assert_eq!(run_script(&mut ctx, &unit).unwrap(), JsValue::Boolean(true));

        let config = EngineConfig {
            strict_by_default: true,
            ..EngineConfig::default()
        };
        let mut ctx = EvalContext::new(config).unwrap();
        assert_eq!(run_script(&mut ctx, &CodeUnit::from_fn(reports_strictness)).unwrap(), JsValue::Boolean(true));
    }

    #[test]
    fn test_script_this_is_global_object() {
        let mut ctx = new_ctx();
        let global = JsValue::Object(ctx.global_object());
        let unit = CodeUnit::from_fn(|ctx| Ok(Completion::Normal(Some(ctx.this_binding()))));
        assert_eq!(run_script(&mut ctx, &unit).unwrap(), global);
    }
}
