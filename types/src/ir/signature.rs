//! Function signatures as seen by the boundary.
//!
//! A signature is the declaration-ordered parameter list of a native
//! function plus its return type. Labels are kept for documentation only;
//! the boundary addresses every parameter by position.

use super::TypeId;
use alloc::{string::String, vec::Vec};
use core::fmt;
use core::hash::{Hash, Hasher};
use serde::Serialize;

/// A literal default value.
///
/// A caller-side default is a host value: a scalar of the parameter's type,
/// or the tag of a nullary constructor when the parameter is a variant. The
/// shim substitutes it before the argument is converted, exactly like a
/// supplied value. A native default is left to the callee.
#[derive(Clone, Debug, Serialize)]
pub enum Literal {
    Unit,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl PartialEq for Literal {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Literal::Unit, Literal::Unit) => true,
            (Literal::Bool(a), Literal::Bool(b)) => a == b,
            (Literal::Int(a), Literal::Int(b)) => a == b,
            // Bitwise, so that interning stays consistent with Hash.
            (Literal::Float(a), Literal::Float(b)) => a.to_bits() == b.to_bits(),
            (Literal::String(a), Literal::String(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Literal {}

impl Hash for Literal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Literal::Unit => {}
            Literal::Bool(b) => b.hash(state),
            Literal::Int(i) => i.hash(state),
            Literal::Float(f) => f.to_bits().hash(state),
            Literal::String(s) => s.hash(state),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Unit => write!(f, "()"),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Int(i) => write!(f, "{}", i),
            Literal::Float(x) => write!(f, "{:?}", x),
            Literal::String(s) => write!(f, "{:?}", s),
        }
    }
}

/// How a parameter is declared in the native runtime.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ParamRole {
    /// Plain positional parameter.
    Positional,

    /// Labeled parameter (`~label`). The label has no runtime significance.
    Named(String),

    /// Optional labeled parameter (`~label=?` or `~label=default`).
    ///
    /// `default` is substituted by the boundary shim when the caller passes
    /// the absent sentinel.
    Optional {
        label: String,
        default: Option<Literal>,
    },
}

impl ParamRole {
    pub fn label(&self) -> Option<&str> {
        match self {
            ParamRole::Positional => None,
            ParamRole::Named(label) | ParamRole::Optional { label, .. } => Some(label),
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, ParamRole::Optional { .. })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Parameter {
    pub role: ParamRole,
    pub ty: TypeId,

    /// Default the native definition applies itself when it receives the
    /// absent sentinel. Mutually exclusive with a caller-side default.
    pub native_default: Option<Literal>,
}

impl Parameter {
    pub fn positional(ty: TypeId) -> Self {
        Self {
            role: ParamRole::Positional,
            ty,
            native_default: None,
        }
    }

    pub fn named(label: impl Into<String>, ty: TypeId) -> Self {
        Self {
            role: ParamRole::Named(label.into()),
            ty,
            native_default: None,
        }
    }

    pub fn optional(label: impl Into<String>, default: Option<Literal>, ty: TypeId) -> Self {
        Self {
            role: ParamRole::Optional {
                label: label.into(),
                default,
            },
            ty,
            native_default: None,
        }
    }

    pub fn with_native_default(mut self, value: Literal) -> Self {
        self.native_default = Some(value);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct FunctionSignature {
    pub params: Vec<Parameter>,
    pub ret: TypeId,
}

impl FunctionSignature {
    pub fn new(params: Vec<Parameter>, ret: TypeId) -> Self {
        Self { params, ret }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}
