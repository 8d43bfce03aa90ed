//! Canonicalization of function signatures.
//!
//! Native functions may be curried, take labeled arguments and declare
//! optional parameters with defaults. The host calls them with a fixed,
//! fully applied argument list. [`adapt`] produces the [`CanonicalCall`]
//! describing that list and where each default is filled in.

use crate::errors::BoundaryError;
use crate::values::Value;
use crate::{String, ToString, Vec, format};
use boundary_types::{FunctionSignature, Literal, ParamRole};
use serde::Serialize;

#[cfg(test)]
mod adapter_test;

/// Where the default of an optional parameter is substituted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum DefaultPlacement {
    /// No default; absence is passed through.
    None,
    /// The boundary shim substitutes the literal before the call.
    Shim(Literal),
    /// The native function fills the default itself; the shim passes
    /// absence through.
    Native(Literal),
}

/// One argument position of a canonical call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CallSlot {
    /// Index of the parameter in the declared signature.
    pub decl_index: usize,
    pub label: Option<String>,
    pub optional: bool,
    pub default: DefaultPlacement,
}

/// The fixed-arity calling convention of one function declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CanonicalCall {
    pub slots: Vec<CallSlot>,
    /// `order[decl_index]` is the call position of that parameter.
    pub order: Vec<usize>,
}

impl CanonicalCall {
    pub fn arity(&self) -> usize {
        self.slots.len()
    }

    /// Adapter used on the host-facing shim: checks arity and fills shim
    /// defaults.
    pub fn adapter(&self) -> ArityAdapter {
        ArityAdapter {
            arity: self.arity(),
            defaults: self
                .slots
                .iter()
                .map(|slot| match &slot.default {
                    DefaultPlacement::Shim(lit) => Some(lit.clone()),
                    DefaultPlacement::None | DefaultPlacement::Native(_) => None,
                })
                .collect(),
        }
    }

    /// Adapter that only checks arity. Used when a host function is handed
    /// to the native side, where defaults are the caller's business.
    pub fn arity_only(&self) -> ArityAdapter {
        ArityAdapter {
            arity: self.arity(),
            defaults: vec![None; self.arity()],
        }
    }

    /// Arrange `args`, given in declaration order, into call order and fill
    /// shim defaults for absent optional arguments.
    ///
    /// Fails with [`BoundaryError::Arity`] unless exactly `arity()`
    /// arguments are given.
    pub fn assemble(&self, args: Vec<Value>) -> Result<Vec<Value>, BoundaryError> {
        if args.len() != self.arity() {
            return Err(BoundaryError::Arity {
                expected: self.arity(),
                found: args.len(),
            });
        }
        let mut placed: Vec<Value> = vec![Value::Absent; args.len()];
        for (decl_index, arg) in args.into_iter().enumerate() {
            placed[self.order[decl_index]] = arg;
        }
        self.adapter().fill(placed)
    }

    pub fn has_shim_defaults(&self) -> bool {
        self.slots
            .iter()
            .any(|slot| matches!(slot.default, DefaultPlacement::Shim(_)))
    }
}

/// Runtime part of a canonical call, embedded in
/// [`TransformStep::AdaptArity`](crate::planner::TransformStep::AdaptArity).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ArityAdapter {
    pub arity: usize,
    /// Shim default per call position.
    pub defaults: Vec<Option<Literal>>,
}

impl ArityAdapter {
    /// Check the argument count and substitute defaults for absent values.
    pub fn fill(&self, mut args: Vec<Value>) -> Result<Vec<Value>, BoundaryError> {
        if args.len() != self.arity {
            return Err(BoundaryError::Arity {
                expected: self.arity,
                found: args.len(),
            });
        }
        for (arg, default) in args.iter_mut().zip(&self.defaults) {
            if let (Value::Absent, Some(lit)) = (&*arg, default) {
                *arg = Value::from(lit);
            }
        }
        Ok(args)
    }
}

/// Canonicalize a declared signature.
///
/// Every parameter keeps its declared position. A default may be declared
/// either for the shim (on the parameter role) or on the native side, never
/// both, and only optional parameters may have one.
pub fn adapt(signature: &FunctionSignature) -> Result<CanonicalCall, BoundaryError> {
    let mut slots = Vec::with_capacity(signature.params.len());

    for (decl_index, param) in signature.params.iter().enumerate() {
        let label = param.role.label().map(|l| l.to_string());
        let shown = label.clone().unwrap_or_else(|| format!("#{}", decl_index));

        let default = match (&param.role, &param.native_default) {
            (ParamRole::Optional { default: Some(_), .. }, Some(_)) => {
                return Err(BoundaryError::AmbiguousDefault {
                    label: shown,
                    reason: "a default is declared both for the shim and on the native side"
                        .to_string(),
                });
            }
            (ParamRole::Optional { default: Some(lit), .. }, None) => {
                DefaultPlacement::Shim(lit.clone())
            }
            (ParamRole::Optional { default: None, .. }, Some(lit)) => {
                DefaultPlacement::Native(lit.clone())
            }
            (ParamRole::Optional { default: None, .. }, None) => DefaultPlacement::None,
            (_, Some(_)) => {
                return Err(BoundaryError::AmbiguousDefault {
                    label: shown,
                    reason: "only optional parameters can have a default".to_string(),
                });
            }
            (_, None) => DefaultPlacement::None,
        };

        slots.push(CallSlot {
            decl_index,
            label,
            optional: param.role.is_optional(),
            default,
        });
    }

    let order = (0..slots.len()).collect();
    tracing::trace!(arity = slots.len(), "Canonicalized signature");
    Ok(CanonicalCall { slots, order })
}
