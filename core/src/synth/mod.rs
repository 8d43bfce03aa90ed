//! Assembly of per-declaration conversion plans.
//!
//! A [`ConversionPlan`] is everything a code generator needs to emit the
//! boundary glue for one exported declaration: the converter for a value,
//! or for a function the canonical call plus a converter per argument and
//! for the result. Plans are self-contained; every fixpoint converter they
//! refer to travels with them.

use crate::adapter::CanonicalCall;
use crate::diagnostics::DeclRef;
use crate::errors::BoundaryError;
use crate::planner::{Converter, Direction, FixpointTable, PlannedSignature, TransformStep};
use crate::values::{FnValue, Interpreter, Value, call_curried};
use crate::{ToString, Vec, format};
use boundary_types::TypeId;
use serde::Serialize;


/// What a declaration exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PlanKind {
    Value {
        converter: Converter,
    },
    Function {
        call: CanonicalCall,
        /// One converter per declared parameter. A shim default is a host
        /// value and goes through its parameter's converter like a supplied
        /// argument.
        args: Vec<Converter>,
        ret: Converter,
        /// Converter for the function value itself, used when it is passed
        /// around rather than called through the shim.
        shim: Converter,
    },
}

/// Planner output for one declaration, before synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Planned {
    Value(Converter),
    Function(PlannedSignature),
}

/// The conversion plan of one exported declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionPlan {
    pub declaration: DeclRef,
    pub kind: PlanKind,
    /// Fixpoint converters reachable from `kind`, and only those.
    pub fixpoints: FixpointTable,
}

/// Combine a planned converter (and, for functions, the canonical call)
/// into a self-contained plan.
///
/// The call must agree with the planned signature on the number of
/// arguments. Every recursion target must have a fixpoint in `fixpoints`.
pub fn synthesize(
    declaration: DeclRef,
    planned: Planned,
    call: Option<CanonicalCall>,
    fixpoints: &FixpointTable,
) -> Result<ConversionPlan, BoundaryError> {
    let kind = match (planned, call) {
        (Planned::Value(converter), None) => PlanKind::Value { converter },
        (Planned::Function(signature), Some(call)) => {
            if call.arity() != signature.args.len() {
                return Err(BoundaryError::Arity {
                    expected: signature.args.len(),
                    found: call.arity(),
                });
            }
            PlanKind::Function {
                call,
                args: signature.args,
                ret: signature.ret,
                shim: signature.shim,
            }
        }
        (Planned::Value(_), Some(_)) => {
            return Err(BoundaryError::unsupported(
                declaration.to_string(),
                "a value export cannot have a calling convention",
            ));
        }
        (Planned::Function(_), None) => {
            return Err(BoundaryError::unsupported(
                declaration.to_string(),
                "a function export needs a canonical call",
            ));
        }
    };

    let mut plan = ConversionPlan {
        declaration,
        kind,
        fixpoints: FixpointTable::new(),
    };
    plan.fixpoints = reachable_fixpoints(&plan, fixpoints)?;

    tracing::trace!(
        declaration = %plan.declaration,
        fixpoints = plan.fixpoints.len(),
        "Synthesized conversion plan"
    );
    Ok(plan)
}

fn reachable_fixpoints(
    plan: &ConversionPlan,
    available: &FixpointTable,
) -> Result<FixpointTable, BoundaryError> {
    let mut pending: Vec<TypeId> = plan
        .converters()
        .into_iter()
        .flat_map(|converter| converter.recursion_targets())
        .collect();
    let mut table = FixpointTable::new();
    while let Some(target) = pending.pop() {
        if table.contains_key(&target) {
            continue;
        }
        let body = available.get(&target).ok_or_else(|| {
            BoundaryError::unsupported(
                format!("{:?}", target),
                "no fixpoint converter was planned for this recursive type",
            )
        })?;
        pending.extend(body.recursion_targets());
        table.insert(target, body.clone());
    }
    Ok(table)
}

impl ConversionPlan {
    /// Every top-level converter of the plan.
    pub fn converters(&self) -> Vec<&Converter> {
        match &self.kind {
            PlanKind::Value { converter } => vec![converter],
            PlanKind::Function {
                args, ret, shim, ..
            } => args.iter().chain([ret, shim]).collect(),
        }
    }

    /// True if no conversion happens in either direction.
    pub fn is_identity(&self) -> bool {
        self.converters().into_iter().all(Converter::is_identity)
    }

    /// True if running the plan may hand over a different box than it was
    /// given.
    pub fn breaks_identity(&self) -> bool {
        let mut found = false;
        let mut check = |step: &TransformStep| {
            found |= matches!(step, TransformStep::RebuildBox(_));
        };
        for converter in self.converters() {
            converter.walk(&mut check);
        }
        for body in self.fixpoints.values() {
            body.walk(&mut check);
        }
        found
    }

    pub fn interpreter(&self) -> Interpreter {
        Interpreter::new(self.fixpoints.clone())
    }

    /// Convert a host value to the native representation.
    pub fn to_native(&self, value: Value) -> Result<Value, BoundaryError> {
        self.run_value(Direction::Forward, value)
    }

    /// Convert a native value to the host representation.
    pub fn to_host(&self, value: Value) -> Result<Value, BoundaryError> {
        self.run_value(Direction::Backward, value)
    }

    fn run_value(&self, direction: Direction, value: Value) -> Result<Value, BoundaryError> {
        let converter = match &self.kind {
            PlanKind::Value { converter } => converter,
            PlanKind::Function { shim, .. } => shim,
        };
        self.interpreter().convert(converter, direction, value)
    }

    /// Call the native function `native` with host arguments, in
    /// declaration order, and return the host result.
    ///
    /// The arguments are first assembled into the canonical call, which
    /// checks their number and fills shim defaults. Each one, defaulted or
    /// not, is then converted by its parameter's converter.
    pub fn call(&self, native: &FnValue, args: Vec<Value>) -> Result<Value, BoundaryError> {
        let PlanKind::Function {
            call,
            args: arg_converters,
            ret,
            ..
        } = &self.kind
        else {
            return Err(BoundaryError::shape("function declaration", "value declaration"));
        };

        let assembled = call.assemble(args)?;
        let interpreter = self.interpreter();
        let converted = assembled
            .into_iter()
            .zip(&call.slots)
            .map(|(arg, slot)| {
                let converter = arg_converters.get(slot.decl_index).ok_or(BoundaryError::Arity {
                    expected: call.arity(),
                    found: arg_converters.len(),
                })?;
                interpreter.convert(converter, Direction::Forward, arg)
            })
            .collect::<Result<Vec<_>, _>>()?;
        let result = call_curried(native, converted)?;
        interpreter.convert(ret, Direction::Backward, result)
    }
}
