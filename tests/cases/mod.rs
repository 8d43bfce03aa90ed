#![allow(dead_code)]

use boundary::{
    Batch, BatchOptions, BatchReport, ConversionPlan, Module, TypeArena, TypeId,
    render_diagnostic_to_string_no_color,
};
use std::sync::Arc;

/// A batch under construction: one shared arena plus its modules.
pub struct Case {
    pub arena: Arc<TypeArena>,
    pub modules: Vec<Module>,
}

impl Case {
    pub fn new() -> Self {
        Self {
            arena: Arc::new(TypeArena::new()),
            modules: Vec::new(),
        }
    }

    /// Add a module, built by `f` against the shared arena.
    pub fn module(&mut self, name: &str, f: impl FnOnce(&TypeArena, &mut Module)) -> &mut Self {
        let mut module = Module::new(name);
        f(&self.arena, &mut module);
        self.modules.push(module);
        self
    }

    pub fn named(&self, module: &str, name: &str) -> TypeId {
        self.arena.named(module, name, vec![])
    }

    pub fn analyze(&self) -> BatchReport {
        self.analyze_with(BatchOptions::default())
    }

    pub fn analyze_with(&self, options: BatchOptions) -> BatchReport {
        let batch = Batch::new(Arc::clone(&self.arena), &self.modules, options)
            .unwrap_or_else(|err| panic!("batch setup failed: {}", err));
        batch.analyze(&self.modules)
    }
}

/// The plan of `module.name`, or a panic showing its diagnostics.
pub fn plan<'r>(report: &'r BatchReport, module: &str, name: &str) -> &'r ConversionPlan {
    let outcome = report
        .outcome(module, name)
        .unwrap_or_else(|| panic!("no declaration {}.{}", module, name));
    match &outcome.plan {
        Some(plan) => plan,
        None => {
            let rendered: Vec<String> = outcome
                .diagnostics
                .iter()
                .map(render_diagnostic_to_string_no_color)
                .collect();
            panic!(
                "{}.{} has no plan:\n{}",
                module,
                name,
                rendered.join("\n")
            )
        }
    }
}

/// Error codes reported for `module.name`, in order.
pub fn error_codes(report: &BatchReport, module: &str, name: &str) -> Vec<String> {
    report
        .outcome(module, name)
        .map(|outcome| {
            outcome
                .errors()
                .filter_map(|d| d.code.clone())
                .collect()
        })
        .unwrap_or_default()
}

/// Declares a test that plans one exported value and checks both
/// directions against a host/native pair.
#[macro_export]
macro_rules! conversion_case {
    (
        name: $name:ident,
        setup: $setup:expr,
        host: $host:expr,
        native: $native:expr $(,)?
    ) => {
        #[test]
        fn $name() {
            let mut case = $crate::cases::Case::new();
            case.module("M", $setup);
            let report = case.analyze();
            let plan = $crate::cases::plan(&report, "M", "value");

            let host: boundary::Value = $host;
            let native: boundary::Value = $native;
            pretty_assertions::assert_eq!(plan.to_native(host.clone()).unwrap(), native);
            pretty_assertions::assert_eq!(plan.to_host(native).unwrap(), host);
        }
    };
}
