//! # just_runtime - ECMAScript runtime semantics in Rust
//!
//! The execution core of a JavaScript engine, without a parser: code arrives as pre-compiled
//! [`runner::ds::code::CodeUnit`]s and this crate supplies everything they run against.
//!
//! - Values and the conversion/operator algorithms (`ToPrimitive`, `ToInt32`, abstract
//!   equality, ...)
//! - The object model: property descriptors, prototype chains, `DefineOwnProperty` validation,
//!   arrays, primitive wrappers and lazily materialized host objects
//! - Environment records and lexical environments for identifier resolution and closures
//! - Function invocation, construction and bound functions
//! - Generators driven by an explicit queue of resumable steps
//!
//! ## Quick Start
//!
//! ```
//! use just_runtime::runner::api::run_script;
//! use just_runtime::runner::ds::code::{CodeUnit, Completion};
//! use just_runtime::runner::ds::operations::operators::add;
//! use just_runtime::runner::ds::value::JsValue;
//! use just_runtime::runner::eval_context::EvalContext;
//!
//! let mut ctx = EvalContext::with_defaults().unwrap();
//!
//! // var x; x = 40 + 2;
//! let unit = CodeUnit::from_fn(|ctx| {
//!     let sum = add(ctx, &JsValue::Number(40.0), &JsValue::Number(2.0))?;
//!     ctx.set_binding("x", sum)?;
//!     Ok(Completion::Normal(None))
//! })
//! .with_var_names(&["x"]);
//!
//! run_script(&mut ctx, &unit).unwrap();
//! assert_eq!(ctx.get_binding("x").unwrap(), JsValue::Number(42.0));
//! ```
//!
//! ## Architecture
//!
//! - **[`runner::ds`]** - Data structures (values, objects, environments, functions, generators)
//!   and, under `operations`, the abstract operations shared by all of them
//! - **[`runner::eval_context`]** - One engine instance: realm, call stack and limits
//! - **[`runner::config`]** - Engine limits loaded from TOML
//! - **[`runner::std_lib`]** - The built-in methods the object model calls into
//! - **[`runner::api`]** - Top-level script driver

#[macro_use]
extern crate lazy_static;

pub mod runner;
