//! Batch analysis of modules.

use super::{
    BatchOptions, BatchReport, Declaration, DeclarationOutcome, ExportKind, Module, ModuleReport,
};
use crate::diagnostics::{DeclRef, Diagnostic};
use crate::errors::BoundaryError;
use crate::planner::{ConverterCache, Planner};
use crate::registry::Registry;
use crate::synth::{ConversionPlan, Planned, synthesize};
use crate::Vec;
use alloc::sync::Arc;
use boundary_types::{FunctionSignature, TypeArena, TypeTerm};
use rayon::prelude::*;

/// Plans conversions for every exported declaration of a set of modules.
///
/// The batch owns the registry of every type declared by its modules and a
/// converter cache shared by all planners. Modules are analyzed
/// independently, in parallel when [`BatchOptions::parallel`] is set;
/// errors are scoped to the declaration that caused them.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use boundary_core::api::{Batch, BatchOptions, Module};
/// use boundary_types::{Field, TypeArena, TypeId};
///
/// let arena = Arc::new(TypeArena::new());
/// let coord = arena.record(vec![
///     Field::new("x", TypeId::FLOAT),
///     Field::new("y", TypeId::FLOAT),
/// ]);
///
/// let mut module = Module::new("Records");
/// module.declare_type("coord", coord);
/// module.export_value("origin", arena.named("Records", "coord", vec![]));
///
/// let modules = vec![module];
/// let batch = Batch::new(arena, &modules, BatchOptions::default()).unwrap();
/// let report = batch.analyze(&modules);
/// assert!(!report.has_errors());
/// assert!(report.plan("Records", "origin").is_some());
/// ```
pub struct Batch {
    registry: Registry,
    options: BatchOptions,
    cache: ConverterCache,
}

impl Batch {
    /// Collect the type declarations of `modules` into a registry.
    ///
    /// Fails if two modules (or one module twice) declare the same type.
    pub fn new(
        arena: Arc<TypeArena>,
        modules: &[Module],
        options: BatchOptions,
    ) -> Result<Self, BoundaryError> {
        let mut builder = Registry::builder(arena);
        for module in modules {
            for decl in module.types() {
                builder.declare(decl.clone())?;
            }
        }
        Ok(Self::from_registry(builder.build(), options))
    }

    pub fn from_registry(registry: Registry, options: BatchOptions) -> Self {
        Self {
            registry,
            options,
            cache: ConverterCache::new(),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// Number of converters shared through the cache so far.
    pub fn cached_converters(&self) -> usize {
        self.cache.len()
    }

    /// Analyze every module. Report order follows `modules`.
    pub fn analyze(&self, modules: &[Module]) -> BatchReport {
        tracing::debug!(
            modules = modules.len(),
            parallel = self.options.parallel,
            "Analyzing batch"
        );
        let modules: Vec<ModuleReport> = if self.options.parallel {
            modules
                .par_iter()
                .map(|module| self.analyze_module(module))
                .collect()
        } else {
            modules
                .iter()
                .map(|module| self.analyze_module(module))
                .collect()
        };
        BatchReport { modules }
    }

    /// Analyze the exports of one module.
    pub fn analyze_module(&self, module: &Module) -> ModuleReport {
        let mut planner = Planner::new(&self.registry, &self.options.planner).with_cache(&self.cache);
        let declarations = module
            .exports()
            .iter()
            .map(|declaration| self.analyze_declaration(&mut planner, module, declaration))
            .collect();
        ModuleReport {
            module: module.name().into(),
            declarations,
        }
    }

    fn analyze_declaration(
        &self,
        planner: &mut Planner<'_>,
        module: &Module,
        declaration: &Declaration,
    ) -> DeclarationOutcome {
        let decl_ref = module.decl_ref(declaration);
        let _span = tracing::debug_span!("declaration", name = %decl_ref).entered();
        planner.take_error_context();

        match self.plan_declaration(planner, module, declaration) {
            Ok(plan) => {
                let mut diagnostics = Vec::new();
                if plan.breaks_identity() {
                    diagnostics.push(
                        Diagnostic::warning(
                            Some(decl_ref.clone()),
                            "a ref in this declaration is rebuilt at the boundary; \
                             the other side receives a different box",
                        )
                        .with_help("Writes through one box are not visible through the other"),
                    );
                }
                tracing::debug!(identity = plan.is_identity(), "Planned declaration");
                DeclarationOutcome {
                    declaration: decl_ref,
                    plan: Some(plan),
                    diagnostics,
                }
            }
            Err(err) => {
                let context = planner.take_error_context();
                tracing::debug!(error = %err, "Declaration has no plan");
                DeclarationOutcome {
                    diagnostics: vec![err.to_diagnostic(Some(decl_ref.clone()), &context)],
                    declaration: decl_ref,
                    plan: None,
                }
            }
        }
    }

    /// Plan and synthesize one declaration.
    pub fn plan_declaration(
        &self,
        planner: &mut Planner<'_>,
        module: &Module,
        declaration: &Declaration,
    ) -> Result<ConversionPlan, BoundaryError> {
        let decl_ref = module.decl_ref(declaration);

        let ty = match &declaration.kind {
            ExportKind::Function(signature) => {
                return self.plan_function(planner, decl_ref, signature);
            }
            ExportKind::Value(ty) => *ty,
        };
        if let TypeTerm::Function(signature) = &self.registry.arena().get(ty).term {
            return self.plan_function(planner, decl_ref, signature);
        }

        let converter = planner.plan(ty)?;
        synthesize(decl_ref, Planned::Value(converter), None, planner.fixpoints())
    }

    fn plan_function(
        &self,
        planner: &mut Planner<'_>,
        decl_ref: DeclRef,
        signature: &FunctionSignature,
    ) -> Result<ConversionPlan, BoundaryError> {
        let planned = planner.plan_signature(signature)?;
        let call = planned.call.clone();
        synthesize(
            decl_ref,
            Planned::Function(planned),
            Some(call),
            planner.fixpoints(),
        )
    }
}
