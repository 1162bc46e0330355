pub mod api;
pub mod config;
pub mod ds;
pub mod eval_context;
pub mod std_lib;
