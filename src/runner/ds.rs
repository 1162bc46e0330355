//! Runtime data structures: values, objects, environments, functions and generators.

pub mod arguments_object;
pub mod array_object;
pub mod code;
pub mod env_record;
pub mod error;
pub mod execution_context;
pub mod function_object;
pub mod generator;
pub mod lazy_object;
pub mod lex_env;
pub mod object;
pub mod object_property;
pub mod operations;
pub mod primitive_object;
pub mod realm;
pub mod reference;
pub mod value;
