//! Terminal rendering of planning errors and diagnostics using miette
//!
//! Errors are rendered with their code and help text. Diagnostics carry
//! their declaration and the path inside its type where the problem was
//! found.

use boundary_core::{BoundaryError, diagnostics::Diagnostic, diagnostics::Severity};
use miette::{GraphicalReportHandler, GraphicalTheme};
use std::fmt;
use thiserror::Error;

/// Render an error with formatting to stderr
pub fn render_error(error: &BoundaryError) {
    eprint!("{}", render_error_to_string(error));
}

/// Render an error to a String (useful for logs, web UIs, etc.)
///
/// # Example
/// ```
/// use boundary::{BoundaryError, render_error_to_string};
///
/// let error = BoundaryError::Arity { expected: 2, found: 1 };
/// let rendered = render_error_to_string(&error);
/// assert!(rendered.contains("E004"));
/// ```
pub fn render_error_to_string(error: &BoundaryError) -> String {
    render(error, GraphicalTheme::unicode())
}

/// Render an error to a String without color codes (useful for tests)
pub fn render_error_to_string_no_color(error: &BoundaryError) -> String {
    render(error, GraphicalTheme::unicode_nocolor())
}

/// Render a declaration diagnostic with formatting to stderr
pub fn render_diagnostic(diagnostic: &Diagnostic) {
    eprint!("{}", render_diagnostic_to_string(diagnostic));
}

pub fn render_diagnostic_to_string(diagnostic: &Diagnostic) -> String {
    render(&DiagnosticReport(diagnostic), GraphicalTheme::unicode())
}

/// Same as `render_diagnostic_to_string` but without ANSI color codes.
pub fn render_diagnostic_to_string_no_color(diagnostic: &Diagnostic) -> String {
    render(&DiagnosticReport(diagnostic), GraphicalTheme::unicode_nocolor())
}

fn render(diagnostic: &dyn miette::Diagnostic, theme: GraphicalTheme) -> String {
    let handler = GraphicalReportHandler::new_themed(theme);
    let mut out = String::new();
    if handler.render_report(&mut out, diagnostic).is_err() {
        // Fall back to the plain message rather than losing it.
        out = format!("{}\n", diagnostic);
    }
    out
}

/// Adapts a [`Diagnostic`], whose code and severity are only known at run
/// time, to miette's reporting.
#[derive(Debug, Error)]
#[error("{}", summary(.0))]
struct DiagnosticReport<'a>(&'a Diagnostic);

fn summary(diagnostic: &Diagnostic) -> String {
    let mut text = match &diagnostic.declaration {
        Some(decl) => format!("{}: {}", decl, diagnostic.message),
        None => diagnostic.message.clone(),
    };
    for related in &diagnostic.related {
        text.push_str("\n  ");
        text.push_str(related);
    }
    text
}

impl miette::Diagnostic for DiagnosticReport<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.0
            .code
            .as_ref()
            .map(|code| Box::new(code) as Box<dyn fmt::Display + 'a>)
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(match self.0.severity {
            Severity::Error => miette::Severity::Error,
            Severity::Warning => miette::Severity::Warning,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.0
            .help
            .as_ref()
            .map(|help| Box::new(help) as Box<dyn fmt::Display + 'a>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boundary_core::diagnostics::{Context, DeclRef};

    #[test]
    fn test_render_error_includes_code_and_help() {
        let error = BoundaryError::Unresolved {
            module: "Types".to_string(),
            name: "missing".to_string(),
        };
        let rendered = render_error_to_string_no_color(&error);
        assert!(rendered.contains("E001"));
        assert!(rendered.contains("Unresolved type 'Types.missing'"));
        assert!(rendered.contains("declared by a module of this batch"));
    }

    #[test]
    fn test_render_diagnostic_includes_context() {
        let error = BoundaryError::unsupported("option<option<int>>", "nested absence");
        let diagnostic = error.to_diagnostic(
            Some(DeclRef::new("Records", "coord")),
            &[Context::InField {
                name: "z".to_string(),
            }],
        );
        let rendered = render_diagnostic_to_string_no_color(&diagnostic);
        assert!(rendered.contains("Records.coord"));
        assert!(rendered.contains("in field 'z'"));
        assert!(rendered.contains("E003"));
    }

    #[test]
    fn test_render_warning() {
        let diagnostic = Diagnostic::warning(
            Some(DeclRef::new("Refs", "counter")),
            "the ref is rebuilt",
        )
        .with_help("use an identity-preserving contents type");
        let rendered = render_diagnostic_to_string_no_color(&diagnostic);
        assert!(rendered.contains("Refs.counter: the ref is rebuilt"));
        assert!(rendered.contains("identity-preserving"));
    }
}
