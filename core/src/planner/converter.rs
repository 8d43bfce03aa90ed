//! Converters and the transform steps they are made of.
//!
//! A [`Converter`] is either [`Converter::Identity`], meaning both runtimes
//! already agree on the representation, or a pair of step trees, one per
//! direction. Forward steps run host to native (arguments and writes),
//! backward steps run native to host (results and reads).

use crate::adapter::ArityAdapter;
use crate::api::VariantCarrier;
use crate::{Box, String, Vec};
use alloc::sync::Arc;
use boundary_types::{Literal, TypeId};
use serde::Serialize;

/// Which half of a converter a step belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    /// Host to native.
    Forward,
    /// Native to host.
    Backward,
}

/// A record field as seen by the positional carrier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FieldSlot {
    pub name: String,
    /// The value may be absent: the key is omitted on the keyed side.
    pub optional: bool,
}

/// One constructor of a variant being re-tagged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct VariantCase {
    pub name: String,
    /// `None` for nullary constructors.
    pub payload: Option<TransformStep>,
}

impl VariantCase {
    pub fn is_nullary(&self) -> bool {
        self.payload.is_none()
    }
}

/// A single conversion step.
///
/// Steps are pure descriptions; [`crate::values`] knows how to run them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum TransformStep {
    Identity,
    /// Keyed record to an array in declared field order.
    WrapRecordAsPositional(Vec<FieldSlot>),
    /// Array in declared field order to a keyed record. Absent slots
    /// become omitted keys.
    UnwrapPositionalAsRecord(Vec<FieldSlot>),
    /// Apply the inner step to present values; absence stays absence.
    MapOption(Box<TransformStep>),
    /// Apply the inner step to non-null values; null stays null.
    MapNullable(Box<TransformStep>),
    /// Apply the inner step to one field of a keyed record, if present.
    ApplyNestedField {
        name: String,
        inner: Box<TransformStep>,
    },
    /// Wrap a function so that it is called with exactly the canonical
    /// number of arguments, filling any shim defaults the adapter carries.
    AdaptArity(ArityAdapter),
    /// Replace an absent argument with a host default. Present values pass.
    SubstituteDefault(Literal),
    /// Hand the same box across. The inner step is always identity.
    PassThroughBox(Box<TransformStep>),
    /// Build a new box holding the converted contents. Breaks identity.
    RebuildBox(Box<TransformStep>),
    /// Apply steps left to right. Applied to a function, each step wraps
    /// the result of the previous one, so the last step is the first to see
    /// a caller's arguments.
    Sequence(Vec<TransformStep>),
    /// Apply one step per element of a fixed-length array.
    MapElements(Vec<TransformStep>),
    /// Apply one step to every element of an array.
    MapArray(Box<TransformStep>),
    /// Move a variant value from one carrier to another, converting payloads.
    RetagVariant {
        from: VariantCarrier,
        to: VariantCarrier,
        cases: Vec<VariantCase>,
    },
    /// Wrap a function: arguments are converted with `args`, the result
    /// with `ret`.
    WrapFunction {
        args: Vec<TransformStep>,
        ret: Box<TransformStep>,
    },
    /// Defer to the fixpoint converter of a recursive type.
    Recurse { target: TypeId, direction: Direction },
}

impl TransformStep {
    pub fn is_identity(&self) -> bool {
        matches!(self, TransformStep::Identity)
    }

    /// Build a sequence, dropping identity steps and flattening nested
    /// sequences. Zero steps is identity, one step is that step.
    pub fn sequence(steps: impl IntoIterator<Item = TransformStep>) -> TransformStep {
        let mut flat = Vec::new();
        for step in steps {
            match step {
                TransformStep::Identity => {}
                TransformStep::Sequence(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => TransformStep::Identity,
            1 => flat.pop().unwrap_or(TransformStep::Identity),
            _ => TransformStep::Sequence(flat),
        }
    }

    /// Visit this step and every step nested in it, depth first.
    pub fn walk(&self, f: &mut impl FnMut(&TransformStep)) {
        f(self);
        match self {
            TransformStep::MapOption(inner)
            | TransformStep::MapNullable(inner)
            | TransformStep::PassThroughBox(inner)
            | TransformStep::RebuildBox(inner)
            | TransformStep::MapArray(inner)
            | TransformStep::ApplyNestedField { inner, .. } => inner.walk(f),
            TransformStep::Sequence(steps) | TransformStep::MapElements(steps) => {
                for step in steps {
                    step.walk(f);
                }
            }
            TransformStep::RetagVariant { cases, .. } => {
                for payload in cases.iter().filter_map(|c| c.payload.as_ref()) {
                    payload.walk(f);
                }
            }
            TransformStep::WrapFunction { args, ret } => {
                for arg in args {
                    arg.walk(f);
                }
                ret.walk(f);
            }
            TransformStep::Identity
            | TransformStep::WrapRecordAsPositional(_)
            | TransformStep::UnwrapPositionalAsRecord(_)
            | TransformStep::AdaptArity(_)
            | TransformStep::SubstituteDefault(_)
            | TransformStep::Recurse { .. } => {}
        }
    }
}

/// The two halves of a non-identity converter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CustomConverter {
    pub forward: TransformStep,
    pub backward: TransformStep,
}

/// How one type crosses the boundary.
///
/// Custom converters are shared: the planner hands out the same `Arc` for
/// every occurrence of a structurally identical type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Converter {
    Identity,
    Custom(Arc<CustomConverter>),
}

impl Converter {
    pub fn custom(forward: TransformStep, backward: TransformStep) -> Self {
        Converter::Custom(Arc::new(CustomConverter { forward, backward }))
    }

    /// Custom converter applying `wrap` around both halves of `inner`, or
    /// identity when `inner` is identity.
    pub fn lift(inner: &Converter, wrap: impl Fn(TransformStep) -> TransformStep) -> Self {
        match inner {
            Converter::Identity => Converter::Identity,
            Converter::Custom(c) => {
                Converter::custom(wrap(c.forward.clone()), wrap(c.backward.clone()))
            }
        }
    }

    pub fn is_identity(&self) -> bool {
        matches!(self, Converter::Identity)
    }

    pub fn forward(&self) -> TransformStep {
        self.step(Direction::Forward)
    }

    pub fn backward(&self) -> TransformStep {
        self.step(Direction::Backward)
    }

    pub fn step(&self, direction: Direction) -> TransformStep {
        match (self, direction) {
            (Converter::Identity, _) => TransformStep::Identity,
            (Converter::Custom(c), Direction::Forward) => c.forward.clone(),
            (Converter::Custom(c), Direction::Backward) => c.backward.clone(),
        }
    }

    /// True if both converters are identity or share one allocation.
    pub fn same_instance(&self, other: &Converter) -> bool {
        match (self, other) {
            (Converter::Identity, Converter::Identity) => true,
            (Converter::Custom(a), Converter::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn walk(&self, f: &mut impl FnMut(&TransformStep)) {
        if let Converter::Custom(c) = self {
            c.forward.walk(f);
            c.backward.walk(f);
        }
    }

    /// Recursive types this converter defers to, in first-seen order.
    pub fn recursion_targets(&self) -> Vec<TypeId> {
        let mut targets = Vec::new();
        self.walk(&mut |step| {
            if let TransformStep::Recurse { target, .. } = step {
                if !targets.contains(target) {
                    targets.push(*target);
                }
            }
        });
        targets
    }
}
