//! The abstract operations shared by every object kind and by compiled code.

pub mod lex_env;
pub mod object;
pub mod operators;
pub mod test_and_comparison;
pub mod type_conversion;
