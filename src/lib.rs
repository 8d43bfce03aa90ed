//! Boundary - conversion planning for a host/native interop boundary
//!
//! # Overview
//!
//! A module compiled to a native functional runtime exposes values and
//! functions to a dynamic host runtime. The two runtimes disagree on how
//! some shapes are represented:
//!
//! - Records are keyed objects on the host and positional arrays natively
//! - Variants use string tags on the host and integer tags natively
//! - Functions with several parameters are curried natively
//! - Optional parameters may be filled by a default on either side
//!
//! For every exported declaration, Boundary decides whether a conversion is
//! needed at all and, when it is, plans one in each direction.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use boundary::{Batch, BatchOptions, Module, TypeArena, TypeId, Field, Value};
//!
//! let arena = Arc::new(TypeArena::new());
//! let coord = arena.record(vec![
//!     Field::new("x", TypeId::FLOAT),
//!     Field::new("y", TypeId::FLOAT),
//! ]);
//!
//! let mut module = Module::new("Geometry");
//! module.declare_type("coord", coord);
//! module.export_value("origin", arena.named("Geometry", "coord", vec![]));
//!
//! let modules = vec![module];
//! let batch = Batch::new(arena, &modules, BatchOptions::default()).unwrap();
//! let report = batch.analyze(&modules);
//!
//! let plan = report.plan("Geometry", "origin").unwrap();
//! let native = plan
//!     .to_native(Value::object([("y", Value::Float(2.0)), ("x", Value::Float(1.0))]))
//!     .unwrap();
//! assert_eq!(native, Value::array([Value::Float(1.0), Value::Float(2.0)]));
//! ```
//!
//! # Reporting
//!
//! Planning never stops at the first failure. Each declaration gets either a
//! plan or diagnostics, which [`render_diagnostic_to_string`] formats for
//! terminals and logs.

pub mod error_renderer;

pub use error_renderer::{
    render_diagnostic, render_diagnostic_to_string, render_diagnostic_to_string_no_color,
    render_error, render_error_to_string, render_error_to_string_no_color,
};

// Re-export public API from boundary_core
pub use boundary_core::api::{
    Batch, BatchOptions, BatchReport, Declaration, DeclarationOutcome, ExportKind, Module,
    ModuleReport, PlannerOptions, RecordCarrier, RefIdentityPolicy, RuntimeProfile,
    VariantCarrier,
};
pub use boundary_core::diagnostics::{Context, DeclRef, Diagnostic, Severity};
pub use boundary_core::planner::{Converter, Direction, TransformStep};
pub use boundary_core::synth::{ConversionPlan, PlanKind};
pub use boundary_core::values::{BoxRef, FnValue, Value};
pub use boundary_core::{BoundaryError, adapter, planner, registry, synth, values};

// Re-export the type model
pub use boundary_types::{
    Constructor, Field, FunctionSignature, Literal, Parameter, TypeArena, TypeId, display_type,
};
