//! Results of analyzing a batch.

use crate::diagnostics::{DeclRef, Diagnostic, Severity};
use crate::synth::ConversionPlan;
use crate::{String, Vec};
use serde::Serialize;

/// Outcome for one exported declaration.
///
/// A declaration either has a plan (possibly with warnings) or has at least
/// one error diagnostic and no plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeclarationOutcome {
    pub declaration: DeclRef,
    pub plan: Option<ConversionPlan>,
    pub diagnostics: Vec<Diagnostic>,
}

impl DeclarationOutcome {
    pub fn is_ok(&self) -> bool {
        self.plan.is_some()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }
}

/// Outcomes of one module, in export order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleReport {
    pub module: String,
    pub declarations: Vec<DeclarationOutcome>,
}

/// Outcomes of a whole batch, in module order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub modules: Vec<ModuleReport>,
}

impl BatchReport {
    pub fn outcome(&self, module: &str, name: &str) -> Option<&DeclarationOutcome> {
        self.modules
            .iter()
            .filter(|m| m.module == module)
            .flat_map(|m| m.declarations.iter())
            .find(|d| d.declaration.name == name)
    }

    pub fn plan(&self, module: &str, name: &str) -> Option<&ConversionPlan> {
        self.outcome(module, name).and_then(|d| d.plan.as_ref())
    }

    pub fn outcomes(&self) -> impl Iterator<Item = &DeclarationOutcome> {
        self.modules.iter().flat_map(|m| m.declarations.iter())
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.outcomes().flat_map(|d| d.diagnostics.iter())
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics().any(|d| d.severity == Severity::Error)
    }
}
