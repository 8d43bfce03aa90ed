//! Dynamic values and an interpreter for transform steps.
//!
//! Planning never touches values. This module exists so that plans can be
//! executed and checked: a conversion plan is only as good as what happens
//! when its steps run against real host and native values.

mod apply;
mod function;
mod value;

pub use apply::Interpreter;
pub use function::{FnValue, call_curried};
pub use value::{BoxRef, Value};
