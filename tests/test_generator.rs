//! Tests for step-queue generators.

extern crate just_runtime;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use just_runtime::runner::ds::code::{CodeUnit, LazyCode};
use just_runtime::runner::ds::error::JErrorType;
use just_runtime::runner::ds::function_object::{call_function, create_script_function};
use just_runtime::runner::ds::generator::{
    collect_generator, create_generator, generator_current, generator_next, GeneratorFrame,
    GeneratorStep, StepOutcome,
};
use just_runtime::runner::ds::object::{object_create, JsObjectType};
use just_runtime::runner::ds::operations::object::get;
use just_runtime::runner::ds::operations::operators::{add, call};
use just_runtime::runner::ds::realm::WellKnownIntrinsics;
use just_runtime::runner::ds::value::JsValue;
use just_runtime::runner::eval_context::EvalContext;

fn new_ctx() -> EvalContext {
    EvalContext::with_defaults().unwrap()
}

fn num(n: f64) -> JsValue {
    JsValue::Number(n)
}

fn yields(v: JsValue) -> GeneratorStep {
    Rc::new(move |_: &mut EvalContext| Ok(StepOutcome::Yield(v.clone())))
}

fn step<F>(f: F) -> GeneratorStep
where
    F: Fn(&mut EvalContext) -> Result<StepOutcome, JErrorType> + 'static,
{
    Rc::new(f)
}

fn new_generator(ctx: &EvalContext, steps: Vec<GeneratorStep>) -> JsObjectType {
    let frame = GeneratorFrame::new(ctx.global_env(), JsValue::Undefined, false);
    create_generator(ctx, steps, frame)
}

mod sequence_tests {
    use super::*;

    #[test]
    fn test_yields_in_order() {
        let mut ctx = new_ctx();
        let g = new_generator(&ctx, vec![yields(num(1.0)), yields(num(2.0)), yields(num(3.0))]);
        assert_eq!(
            collect_generator(&mut ctx, &g).unwrap(),
            vec![num(1.0), num(2.0), num(3.0)]
        );
    }

    #[test]
    fn test_next_after_completion_keeps_returning_false() {
        let mut ctx = new_ctx();
        let g = new_generator(&ctx, vec![yields(num(1.0))]);
        assert!(generator_next(&mut ctx, &g).unwrap());
        assert_eq!(generator_current(&g).unwrap(), num(1.0));
        assert!(!generator_next(&mut ctx, &g).unwrap());
        assert!(!generator_next(&mut ctx, &g).unwrap());
        assert_eq!(generator_current(&g).unwrap(), num(1.0));
    }

    #[test]
    fn test_current_before_first_value_fails() {
        let mut ctx = new_ctx();
        let g = new_generator(&ctx, vec![]);
        assert!(generator_current(&g).unwrap_err().is_type_error());
        assert!(!generator_next(&mut ctx, &g).unwrap());
        assert!(generator_current(&g).unwrap_err().is_type_error());
    }

    #[test]
    fn test_steps_run_lazily() {
        let mut ctx = new_ctx();
        let runs = Rc::new(Cell::new(0));
        let counter = runs.clone();
        let counted = step(move |_| {
            counter.set(counter.get() + 1);
            Ok(StepOutcome::Yield(num(counter.get() as f64)))
        });
        let g = new_generator(&ctx, vec![counted.clone(), counted]);
        assert_eq!(runs.get(), 0);
        assert!(generator_next(&mut ctx, &g).unwrap());
        assert_eq!(runs.get(), 1);
        assert!(generator_next(&mut ctx, &g).unwrap());
        assert_eq!(generator_current(&g).unwrap(), num(2.0));
    }

    #[test]
    fn test_exhausted_step_ends_generator() {
        let mut ctx = new_ctx();
        let g = new_generator(
            &ctx,
            vec![step(|_| Ok(StepOutcome::Exhausted)), yields(num(1.0))],
        );
        assert!(!generator_next(&mut ctx, &g).unwrap());
        assert!(!generator_next(&mut ctx, &g).unwrap());
    }

    #[test]
    fn test_failed_step_finishes_generator() {
        let mut ctx = new_ctx();
        let g = new_generator(
            &ctx,
            vec![
                step(|_| Err(JErrorType::TypeError("boom".to_string()))),
                yields(num(1.0)),
            ],
        );
        assert!(generator_next(&mut ctx, &g).unwrap_err().is_type_error());
        assert!(!generator_next(&mut ctx, &g).unwrap());
        assert!(ctx.ctx_stack.is_empty());
    }
}

mod control_tests {
    use super::*;

    #[test]
    fn test_yield_break_drops_remaining_steps() {
        let mut ctx = new_ctx();
        let g = new_generator(
            &ctx,
            vec![
                yields(num(1.0)),
                step(|_| Ok(StepOutcome::YieldBreak)),
                yields(num(3.0)),
            ],
        );
        assert_eq!(collect_generator(&mut ctx, &g).unwrap(), vec![num(1.0)]);
    }

    #[test]
    fn test_yield_continue_takes_over_target() {
        let mut ctx = new_ctx();
        let inner = new_generator(&ctx, vec![yields(num(10.0)), yields(num(20.0))]);
        let target = inner.clone();
        let outer = new_generator(
            &ctx,
            vec![
                yields(num(1.0)),
                step(move |_| Ok(StepOutcome::YieldContinue(target.clone()))),
                yields(num(99.0)),
            ],
        );
        assert_eq!(
            collect_generator(&mut ctx, &outer).unwrap(),
            vec![num(1.0), num(10.0), num(20.0)]
        );
        assert!(!generator_next(&mut ctx, &inner).unwrap());
    }

    #[test]
    fn test_yield_continue_on_partly_consumed_target() {
        let mut ctx = new_ctx();
        let inner = new_generator(&ctx, vec![yields(num(10.0)), yields(num(20.0))]);
        assert!(generator_next(&mut ctx, &inner).unwrap());
        let target = inner.clone();
        let outer = new_generator(
            &ctx,
            vec![step(move |_| Ok(StepOutcome::YieldContinue(target.clone())))],
        );
        assert_eq!(collect_generator(&mut ctx, &outer).unwrap(), vec![num(20.0)]);
        assert_eq!(generator_current(&inner).unwrap(), num(10.0));
    }

    #[test]
    fn test_yield_continue_on_self_moves_on() {
        let mut ctx = new_ctx();
        let slot: Rc<RefCell<Option<JsObjectType>>> = Rc::new(RefCell::new(None));
        let me = slot.clone();
        let g = new_generator(
            &ctx,
            vec![
                step(move |_| {
                    let g = me.borrow().clone().unwrap();
                    Ok(StepOutcome::YieldContinue(g))
                }),
                yields(num(2.0)),
            ],
        );
        *slot.borrow_mut() = Some(g.clone());
        assert_eq!(collect_generator(&mut ctx, &g).unwrap(), vec![num(2.0)]);
        slot.borrow_mut().take();
    }

    #[test]
    fn test_reentrant_next_is_rejected() {
        let mut ctx = new_ctx();
        let slot: Rc<RefCell<Option<JsObjectType>>> = Rc::new(RefCell::new(None));
        let me = slot.clone();
        let g = new_generator(
            &ctx,
            vec![step(move |ctx| {
                let g = me.borrow().clone().unwrap();
                generator_next(ctx, &g)?;
                Ok(StepOutcome::Yield(num(1.0)))
            })],
        );
        *slot.borrow_mut() = Some(g.clone());
        assert!(generator_next(&mut ctx, &g).unwrap_err().is_type_error());
        assert!(!generator_next(&mut ctx, &g).unwrap());
        slot.borrow_mut().take();
    }
}

mod generator_function_tests {
    use super::*;

    fn counting_function(ctx: &mut EvalContext) -> JsObjectType {
        let steps = vec![
            step(|ctx| {
                let n = ctx.get_binding("n")?;
                ctx.set_binding("count", n.clone())?;
                Ok(StepOutcome::Yield(n))
            }),
            step(|ctx| {
                let count = ctx.get_binding("count")?;
                let next = add(ctx, &count, &num(1.0))?;
                ctx.set_binding("count", next.clone())?;
                Ok(StepOutcome::Yield(next))
            }),
        ];
        let env = ctx.global_env();
        create_script_function(
            ctx,
            "counter",
            vec!["n".to_string()],
            LazyCode::ready(CodeUnit::generator(steps).with_var_names(&["count"])),
            env,
            false,
        )
        .unwrap()
    }

    #[test]
    fn test_call_returns_suspended_generator() {
        let mut ctx = new_ctx();
        let f = counting_function(&mut ctx);
        let g = call_function(&mut ctx, &f, JsValue::Undefined, vec![num(10.0)]).unwrap();
        let g = g.as_object().cloned().unwrap();
        assert_eq!(collect_generator(&mut ctx, &g).unwrap(), vec![num(10.0), num(11.0)]);
        // Body vars stay local to the activation.
        assert!(ctx.get_binding("count").unwrap_err().is_reference_error());
    }

    #[test]
    fn test_each_call_gets_its_own_state() {
        let mut ctx = new_ctx();
        let f = counting_function(&mut ctx);
        let a = call_function(&mut ctx, &f, JsValue::Undefined, vec![num(1.0)]).unwrap();
        let b = call_function(&mut ctx, &f, JsValue::Undefined, vec![num(5.0)]).unwrap();
        let a = a.as_object().cloned().unwrap();
        let b = b.as_object().cloned().unwrap();
        assert!(generator_next(&mut ctx, &a).unwrap());
        assert_eq!(collect_generator(&mut ctx, &b).unwrap(), vec![num(5.0), num(6.0)]);
        assert!(generator_next(&mut ctx, &a).unwrap());
        assert_eq!(generator_current(&a).unwrap(), num(2.0));
    }

    #[test]
    fn test_prototype_methods() {
        let mut ctx = new_ctx();
        let f = counting_function(&mut ctx);
        let g = call_function(&mut ctx, &f, JsValue::Undefined, vec![num(3.0)]).unwrap();
        let o = g.as_object().cloned().unwrap();
        let next = get(&mut ctx, &o, "next").unwrap();
        let current = get(&mut ctx, &o, "current").unwrap();

        assert!(call(&mut ctx, &current, g.clone(), vec![]).unwrap_err().is_type_error());
        assert_eq!(call(&mut ctx, &next, g.clone(), vec![]).unwrap(), JsValue::Boolean(true));
        assert_eq!(call(&mut ctx, &current, g.clone(), vec![]).unwrap(), num(3.0));
        assert_eq!(call(&mut ctx, &next, g.clone(), vec![]).unwrap(), JsValue::Boolean(true));
        assert_eq!(call(&mut ctx, &next, g.clone(), vec![]).unwrap(), JsValue::Boolean(false));
        assert_eq!(call(&mut ctx, &current, g, vec![]).unwrap(), num(4.0));

        let plain = object_create(Some(ctx.intrinsic(WellKnownIntrinsics::ObjectPrototype)));
        let err = call(&mut ctx, &next, JsValue::Object(plain), vec![]).unwrap_err();
        assert!(err.is_type_error());
    }
}
