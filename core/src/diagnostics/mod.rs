//! Diagnostics attached to exported declarations.
//!
//! Planning errors never abort a batch. Each failure (and each warning,
//! such as a plan that deliberately breaks box identity) is converted to a
//! [`Diagnostic`] and attached to the declaration it came from.

mod context;

pub use context::Context;

use crate::{String, Vec};
use core::fmt;
use serde::Serialize;

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    /// Error - no plan is produced for the declaration.
    Error,
    /// Warning - a plan is produced, but it has a caller-visible caveat.
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Identifies an exported declaration within a batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DeclRef {
    pub module: String,
    pub name: String,
}

impl DeclRef {
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for DeclRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}", self.module, self.name)
    }
}

/// A diagnostic message (error or warning) attached to a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Severity level.
    pub severity: Severity,

    /// Primary diagnostic message.
    pub message: String,

    /// Optional error code (e.g., "E001") for documentation lookup.
    pub code: Option<String>,

    /// Optional help text suggesting how to fix the issue.
    pub help: Option<String>,

    /// The declaration this diagnostic belongs to.
    pub declaration: Option<DeclRef>,

    /// Where inside the declaration's type the problem was found,
    /// outermost first.
    pub related: Vec<String>,
}

impl Diagnostic {
    pub fn warning(declaration: Option<DeclRef>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            code: None,
            help: None,
            declaration,
            related: Vec::new(),
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: ", self.severity)?;
        if let Some(ref decl) = self.declaration {
            write!(f, "{}: ", decl)?;
        }
        write!(f, "{}", self.message)?;

        if let Some(ref code) = self.code {
            write!(f, " [{}]", code)?;
        }

        for related in &self.related {
            write!(f, "\n  {}", related)?;
        }

        if let Some(ref help) = self.help {
            write!(f, "\nhelp: {}", help)?;
        }

        Ok(())
    }
}
