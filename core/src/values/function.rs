//! Function values and curried application.
//!
//! Functions on both sides are modeled as [`FnValue`]s with a fixed arity.
//! A native curried function of three parameters may be an arity-1 function
//! returning an arity-2 function; [`call_curried`] feeds arguments in
//! chunks until all of them are consumed.

use super::Value;
use crate::errors::BoundaryError;
use crate::Vec;
use alloc::sync::Arc;
use core::fmt;

type FnBody = dyn Fn(Vec<Value>) -> Result<Value, BoundaryError> + Send + Sync;

/// A callable value of fixed arity.
#[derive(Clone)]
pub struct FnValue {
    arity: usize,
    body: Arc<FnBody>,
}

impl FnValue {
    pub fn new(
        arity: usize,
        body: impl Fn(Vec<Value>) -> Result<Value, BoundaryError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            arity,
            body: Arc::new(body),
        }
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Call with exactly `arity()` arguments.
    pub fn invoke(&self, args: Vec<Value>) -> Result<Value, BoundaryError> {
        if args.len() != self.arity {
            return Err(BoundaryError::Arity {
                expected: self.arity,
                found: args.len(),
            });
        }
        (self.body)(args)
    }

    pub fn same_function(&self, other: &FnValue) -> bool {
        Arc::ptr_eq(&self.body, &other.body)
    }
}

impl fmt::Debug for FnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FnValue(arity = {})", self.arity)
    }
}

/// Apply `callee` to all of `args`, one arity-sized chunk at a time.
///
/// Each intermediate result must itself be a function. Running out of
/// arguments in the middle of a chunk is a partial application, which the
/// boundary does not support. A nullary function only accepts an empty
/// argument list.
pub fn call_curried(callee: &FnValue, mut args: Vec<Value>) -> Result<Value, BoundaryError> {
    let mut callee = callee.clone();
    let total = args.len();
    loop {
        let arity = callee.arity();
        // A nullary callee consumes nothing, so leftover arguments can never
        // be applied.
        if args.len() < arity || (arity == 0 && !args.is_empty()) {
            return Err(BoundaryError::Arity {
                expected: total - args.len() + arity,
                found: total,
            });
        }
        let rest = args.split_off(arity);
        let result = callee.invoke(args)?;
        if rest.is_empty() {
            return Ok(result);
        }
        match result {
            Value::Function(next) => {
                callee = next;
                args = rest;
            }
            other => {
                return Err(BoundaryError::shape(
                    "function for the remaining arguments",
                    other.kind_name(),
                ));
            }
        }
    }
}
