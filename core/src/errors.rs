//! Error taxonomy for boundary planning and plan execution.
//!
//! Every planning failure is static: it is discovered before any value is
//! converted, and it is scoped to the declaration being planned. See
//! [`crate::diagnostics`] for how errors are attached to declarations.

use crate::diagnostics::{Context, DeclRef, Diagnostic, Severity};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error, miette::Diagnostic)]
pub enum BoundaryError {
    /// The registry has no declaration for a named type.
    #[error("Unresolved type '{module}.{name}'")]
    #[diagnostic(
        code(E001),
        help("Make sure the type is declared by a module of this batch")
    )]
    Unresolved { module: String, name: String },

    /// A cycle that cannot be reduced to a lazily evaluated fixpoint.
    #[error("Cyclic type '{name}': {reason}")]
    #[diagnostic(
        code(E002),
        help(
            "Recursive types must recur through an array, option, nullable, ref, \
             variant payload, optional field or function"
        )
    )]
    Cyclic { name: String, reason: String },

    /// No known carrier mapping for a shape.
    #[error("Unsupported type '{ty}': {reason}")]
    #[diagnostic(code(E003))]
    Unsupported { ty: String, reason: String },

    /// Argument count does not match the declared signature.
    #[error("Arity mismatch: expected {expected} argument(s), found {found}")]
    #[diagnostic(
        code(E004),
        help("Calls across the boundary must be fully applied; partial application is not supported")
    )]
    Arity { expected: usize, found: usize },

    /// A default would be substituted on both sides of the boundary.
    #[error("Ambiguous default for parameter '{label}': {reason}")]
    #[diagnostic(code(E005), help("Declare the default on exactly one side of the boundary"))]
    AmbiguousDefault { label: String, reason: String },

    /// The same type was declared twice in one batch.
    #[error("Duplicate declaration of type '{module}.{name}'")]
    #[diagnostic(code(E006))]
    DuplicateDeclaration { module: String, name: String },

    /// A value handed to a plan does not have the planned shape.
    #[error("Value does not match the planned shape: expected {expected}, found {found}")]
    #[diagnostic(code(E007))]
    ShapeMismatch { expected: String, found: String },
}

impl BoundaryError {
    pub fn unsupported(ty: impl Into<String>, reason: impl Into<String>) -> Self {
        BoundaryError::Unsupported {
            ty: ty.into(),
            reason: reason.into(),
        }
    }

    pub fn cyclic(name: impl Into<String>, reason: impl Into<String>) -> Self {
        BoundaryError::Cyclic {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn shape(expected: impl Into<String>, found: impl Into<String>) -> Self {
        BoundaryError::ShapeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Stable error code, for documentation lookup.
    pub fn error_code(&self) -> &'static str {
        match self {
            BoundaryError::Unresolved { .. } => "E001",
            BoundaryError::Cyclic { .. } => "E002",
            BoundaryError::Unsupported { .. } => "E003",
            BoundaryError::Arity { .. } => "E004",
            BoundaryError::AmbiguousDefault { .. } => "E005",
            BoundaryError::DuplicateDeclaration { .. } => "E006",
            BoundaryError::ShapeMismatch { .. } => "E007",
        }
    }

    /// Convert to a Diagnostic attached to `declaration`.
    pub fn to_diagnostic(&self, declaration: Option<DeclRef>, context: &[Context]) -> Diagnostic {
        let help = miette::Diagnostic::help(self).map(|h| h.to_string());
        Diagnostic {
            severity: Severity::Error,
            message: self.to_string(),
            code: Some(self.error_code().to_string()),
            help,
            declaration,
            related: context.iter().map(|ctx| ctx.to_related_info()).collect::<Vec<_>>(),
        }
    }
}
