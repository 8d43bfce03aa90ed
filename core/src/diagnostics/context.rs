use crate::{String, format};
use alloc::string::ToString;
use serde::Serialize;

/// Context information for error messages.
///
/// Records where inside a declaration's type the planner was when an error
/// occurred, such as "in field 'z'" or "in argument 2". Each context entry
/// can be converted to a related-info line for diagnostic display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Context {
    /// In a record or object field
    InField { name: String },
    /// In a tuple element
    InElement { index: usize },
    /// In a variant constructor's payload
    InConstructor { name: String },
    /// In a function argument
    InArgument {
        index: usize,
        label: Option<String>,
    },
    /// In a function's return type
    InReturn,
    /// While expanding a named type
    InNamedType { name: String },
}

impl Context {
    /// Convert to a related-info line for diagnostic display
    pub fn to_related_info(&self) -> String {
        match self {
            Context::InField { name } => format!("in field '{}'", name),
            Context::InElement { index } => format!("in element {}", index),
            Context::InConstructor { name } => format!("in payload of constructor '{}'", name),
            Context::InArgument { index, label } => match label {
                Some(label) => format!("in argument {} ('{}')", index + 1, label),
                None => format!("in argument {}", index + 1),
            },
            Context::InReturn => "in return type".to_string(),
            Context::InNamedType { name } => format!("while expanding type '{}'", name),
        }
    }
}
