//! Planning and execution of conversions across a host/native interop
//! boundary.
//!
//! Given the declared types of a module's exports, this crate decides for
//! every type whether its runtime representation differs between the host
//! and the native side and, when it does, produces a tree of
//! [`TransformStep`](planner::TransformStep)s converting in both directions.
//!
//! The pipeline is:
//!
//! 1. [`registry`] resolves named references against type declarations.
//! 2. [`planner`] maps each type to a [`Converter`](planner::Converter).
//! 3. [`adapter`] canonicalizes function signatures into fixed-arity calls.
//! 4. [`synth`] combines both into one [`ConversionPlan`](synth::ConversionPlan)
//!    per exported declaration.
//! 5. [`api`] drives whole batches of modules, optionally in parallel.
//!
//! [`values`] contains a small interpreter that runs plans against dynamic
//! values, used to check that a plan does what it says.

extern crate alloc;

// Re-export for convenience so other modules don't need alloc:: prefix
#[allow(unused_imports)]
pub(crate) use alloc::{boxed::Box, format, string::String, string::ToString, vec, vec::Vec};

pub mod adapter;
pub mod api;
pub mod diagnostics;
pub mod errors;
pub mod planner;
pub mod registry;
pub mod synth;
pub mod values;

pub use errors::BoundaryError;
