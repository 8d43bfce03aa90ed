//! Runs transform steps against values.

use super::function::{FnValue, call_curried};
use super::value::BoxRef;
use super::Value;
use crate::api::VariantCarrier;
use crate::errors::BoundaryError;
use crate::planner::{Converter, Direction, FieldSlot, FixpointTable, TransformStep, VariantCase};
use crate::{ToString, Vec, format};
use alloc::sync::Arc;
use boundary_types::TypeId;

/// Executes steps of one plan.
///
/// Holds the plan's fixpoint table so that [`TransformStep::Recurse`] can
/// be resolved lazily, one level of a recursive value at a time.
#[derive(Clone, Debug, Default)]
pub struct Interpreter {
    fixpoints: Arc<FixpointTable>,
}

impl Interpreter {
    pub fn new(fixpoints: FixpointTable) -> Self {
        Self {
            fixpoints: Arc::new(fixpoints),
        }
    }

    pub fn apply(&self, step: &TransformStep, value: Value) -> Result<Value, BoundaryError> {
        match step {
            TransformStep::Identity => Ok(value),
            TransformStep::WrapRecordAsPositional(slots) => wrap_positional(slots, value),
            TransformStep::UnwrapPositionalAsRecord(slots) => unwrap_positional(slots, value),
            TransformStep::MapOption(inner) => match value {
                Value::Absent => Ok(Value::Absent),
                present => self.apply(inner, present),
            },
            TransformStep::MapNullable(inner) => match value {
                Value::Null => Ok(Value::Null),
                Value::Absent => Ok(Value::Absent),
                present => self.apply(inner, present),
            },
            TransformStep::ApplyNestedField { name, inner } => match value {
                Value::Object(entries) => {
                    let entries = entries
                        .into_iter()
                        .map(|(key, field)| {
                            if key == *name && !field.is_absent() {
                                Ok((key, self.apply(inner, field)?))
                            } else {
                                Ok((key, field))
                            }
                        })
                        .collect::<Result<Vec<_>, BoundaryError>>()?;
                    Ok(Value::Object(entries))
                }
                other => Err(BoundaryError::shape("record", other.kind_name())),
            },
            TransformStep::AdaptArity(adapter) => {
                let callee = expect_function(value)?;
                let adapter = adapter.clone();
                Ok(Value::Function(FnValue::new(adapter.arity, move |args| {
                    let args = adapter.fill(args)?;
                    call_curried(&callee, args)
                })))
            }
            TransformStep::SubstituteDefault(lit) => match value {
                Value::Absent => Ok(Value::from(lit)),
                present => Ok(present),
            },
            TransformStep::PassThroughBox(_) => match value {
                Value::Box(cell) => Ok(Value::Box(cell)),
                other => Err(BoundaryError::shape("ref", other.kind_name())),
            },
            TransformStep::RebuildBox(inner) => match value {
                Value::Box(cell) => Ok(Value::Box(BoxRef::new(self.apply(inner, cell.get())?))),
                other => Err(BoundaryError::shape("ref", other.kind_name())),
            },
            TransformStep::Sequence(steps) => steps
                .iter()
                .try_fold(value, |value, step| self.apply(step, value)),
            TransformStep::MapElements(steps) => match value {
                Value::Array(items) if items.len() == steps.len() => {
                    let items = items
                        .into_iter()
                        .zip(steps)
                        .map(|(item, step)| self.apply(step, item))
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(Value::Array(items))
                }
                Value::Array(items) => Err(BoundaryError::shape(
                    format!("array of length {}", steps.len()),
                    format!("array of length {}", items.len()),
                )),
                other => Err(BoundaryError::shape("array", other.kind_name())),
            },
            TransformStep::MapArray(inner) => match value {
                Value::Array(items) => {
                    let items = items
                        .into_iter()
                        .map(|item| self.apply(inner, item))
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(Value::Array(items))
                }
                other => Err(BoundaryError::shape("array", other.kind_name())),
            },
            TransformStep::RetagVariant { from, to, cases } => {
                let (index, payload) = decode_variant(*from, cases, value)?;
                let case = &cases[index];
                let payload = match (&case.payload, payload) {
                    (Some(step), Some(payload)) => Some(self.apply(step, payload)?),
                    _ => None,
                };
                Ok(encode_variant(*to, cases, index, payload))
            }
            TransformStep::WrapFunction { args, ret } => {
                let callee = expect_function(value)?;
                let interpreter = self.clone();
                let arg_steps = args.clone();
                let ret_step = (**ret).clone();
                Ok(Value::Function(FnValue::new(args.len(), move |call_args| {
                    if call_args.len() != arg_steps.len() {
                        return Err(BoundaryError::Arity {
                            expected: arg_steps.len(),
                            found: call_args.len(),
                        });
                    }
                    let converted = call_args
                        .into_iter()
                        .zip(&arg_steps)
                        .map(|(arg, step)| interpreter.apply(step, arg))
                        .collect::<Result<Vec<_>, _>>()?;
                    let result = call_curried(&callee, converted)?;
                    interpreter.apply(&ret_step, result)
                })))
            }
            TransformStep::Recurse { target, direction } => {
                let step = self.fixpoint(*target)?.step(*direction);
                self.apply(&step, value)
            }
        }
    }

    fn fixpoint(&self, target: TypeId) -> Result<&Converter, BoundaryError> {
        self.fixpoints.get(&target).ok_or_else(|| {
            BoundaryError::unsupported(
                format!("{:?}", target),
                "the plan does not contain this recursive type's converter",
            )
        })
    }

    /// Run one half of `converter`.
    pub fn convert(
        &self,
        converter: &Converter,
        direction: Direction,
        value: Value,
    ) -> Result<Value, BoundaryError> {
        self.apply(&converter.step(direction), value)
    }
}

fn expect_function(value: Value) -> Result<FnValue, BoundaryError> {
    match value {
        Value::Function(f) => Ok(f),
        other => Err(BoundaryError::shape("function", other.kind_name())),
    }
}

fn wrap_positional(slots: &[FieldSlot], value: Value) -> Result<Value, BoundaryError> {
    if !matches!(value, Value::Object(_)) {
        return Err(BoundaryError::shape("record", value.kind_name()));
    }
    let mut items = Vec::with_capacity(slots.len());
    for slot in slots {
        match value.get(&slot.name) {
            Some(field) => items.push(field.clone()),
            None if slot.optional => items.push(Value::Absent),
            None => {
                return Err(BoundaryError::shape(
                    format!("record with field '{}'", slot.name),
                    "record without it",
                ));
            }
        }
    }
    Ok(Value::Array(items))
}

fn unwrap_positional(slots: &[FieldSlot], value: Value) -> Result<Value, BoundaryError> {
    match value {
        Value::Array(items) if items.len() == slots.len() => Ok(Value::Object(
            slots
                .iter()
                .zip(items)
                // Omission is the only host encoding of absence.
                .filter(|(_, item)| !item.is_absent())
                .map(|(slot, item)| (slot.name.clone(), item))
                .collect(),
        )),
        Value::Array(items) => Err(BoundaryError::shape(
            format!("record of {} fields", slots.len()),
            format!("array of length {}", items.len()),
        )),
        other => Err(BoundaryError::shape("positional record", other.kind_name())),
    }
}

fn decode_variant(
    carrier: VariantCarrier,
    cases: &[VariantCase],
    value: Value,
) -> Result<(usize, Option<Value>), BoundaryError> {
    let by_name = |name: &str, nullary: bool| {
        cases
            .iter()
            .position(|c| c.name == name && c.is_nullary() == nullary)
            .ok_or_else(|| {
                BoundaryError::shape("a declared constructor", format!("constructor '{}'", name))
            })
    };
    let by_index = |index: usize, nullary: bool| {
        cases
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_nullary() == nullary)
            .nth(index)
            .map(|(i, _)| i)
            .ok_or_else(|| {
                let kind = if nullary { "constant" } else { "block" };
                BoundaryError::shape("a declared constructor", format!("{} {}", kind, index))
            })
    };

    match (carrier, value) {
        (VariantCarrier::Tagged, Value::Str(name)) => Ok((by_name(&name, true)?, None)),
        (VariantCarrier::Tagged, tagged @ Value::Object(_)) => {
            let name = match tagged.get("tag") {
                Some(Value::Str(name)) => name.clone(),
                _ => return Err(BoundaryError::shape("tagged variant", "object without a tag")),
            };
            let payload = tagged.get("value").cloned().unwrap_or(Value::Absent);
            Ok((by_name(&name, false)?, Some(payload)))
        }
        (VariantCarrier::Indexed, Value::Int(index)) if index >= 0 => {
            Ok((by_index(index as usize, true)?, None))
        }
        (VariantCarrier::Indexed, Value::Block { tag, mut fields }) if fields.len() == 1 => {
            let payload = fields.pop().unwrap_or(Value::Absent);
            Ok((by_index(tag as usize, false)?, Some(payload)))
        }
        (carrier, other) => Err(BoundaryError::shape(
            format!("{:?} variant", carrier).to_lowercase(),
            other.kind_name().to_string(),
        )),
    }
}

fn encode_variant(
    carrier: VariantCarrier,
    cases: &[VariantCase],
    index: usize,
    payload: Option<Value>,
) -> Value {
    let case = &cases[index];
    match (carrier, payload) {
        (VariantCarrier::Tagged, None) => Value::Str(case.name.clone()),
        (VariantCarrier::Tagged, Some(payload)) => Value::Object(vec![
            ("tag".to_string(), Value::Str(case.name.clone())),
            ("value".to_string(), payload),
        ]),
        (VariantCarrier::Indexed, payload) => {
            let nullary = case.is_nullary();
            let position = cases[..index]
                .iter()
                .filter(|c| c.is_nullary() == nullary)
                .count();
            match payload {
                None => Value::Int(position as i64),
                Some(payload) => Value::Block {
                    tag: position as u32,
                    fields: vec![payload],
                },
            }
        }
    }
}
