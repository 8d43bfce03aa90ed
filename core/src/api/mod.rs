//! Public API for planning a batch of modules.
//!
//! A [`Batch`] is built from the [`Module`]s of one compilation. It
//! registers every declared type, then plans each exported declaration and
//! reports a [`ConversionPlan`](crate::synth::ConversionPlan) or diagnostics
//! per declaration.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use boundary_core::api::{Batch, BatchOptions, Module};
//! use boundary_types::{Constructor, TypeArena, TypeId};
//!
//! let arena = Arc::new(TypeArena::new());
//! let weekday = arena.variant(vec![
//!     Constructor::nullary("Monday"),
//!     Constructor::nullary("Tuesday"),
//! ]);
//!
//! let mut module = Module::new("Types");
//! module.declare_type("weekday", weekday);
//! module.export_value("today", arena.named("Types", "weekday", vec![]));
//!
//! let modules = vec![module];
//! let batch = Batch::new(arena, &modules, BatchOptions::default()).unwrap();
//! let report = batch.analyze(&modules);
//!
//! // String tags on the host, integers on the native side.
//! let plan = report.plan("Types", "today").unwrap();
//! assert!(!plan.is_identity());
//! ```

pub mod batch;
pub mod module;
pub mod options;
pub mod report;

pub use batch::Batch;
pub use module::{Declaration, ExportKind, Module};
pub use options::{
    BatchOptions, PlannerOptions, RecordCarrier, RefIdentityPolicy, RuntimeProfile,
    VariantCarrier,
};
pub use report::{BatchReport, DeclarationOutcome, ModuleReport};
