//! Type-directed conversion planning.
//!
//! The [`Planner`] maps a type to a [`Converter`]. The result is identity
//! whenever host and native agree on the representation of every part of
//! the type, which is by far the common case.
//!
//! # Memoization
//!
//! Types are hash-consed, so a `TypeId` is a structural signature and
//! converters are memoized per id. With a [`ConverterCache`] attached the
//! memo is shared between planners, and structurally identical types in
//! different modules end up with the same converter instance.
//!
//! # Recursion
//!
//! A recursive named type is planned optimistically: its occurrences inside
//! its own body are first assumed to need no conversion. If the body still
//! plans as identity the assumption holds. Otherwise the body is planned
//! again with occurrences mapped to [`TransformStep::Recurse`], and the
//! result is stored as the type's fixpoint converter. Converters computed
//! while an assumption is open are not memoized, since they may be wrong.

mod cache;
mod converter;

pub use cache::ConverterCache;
pub use converter::{
    Converter, CustomConverter, Direction, FieldSlot, TransformStep, VariantCase,
};

use crate::adapter::{self, CanonicalCall, DefaultPlacement};
use crate::api::{PlannerOptions, RecordCarrier, RefIdentityPolicy, VariantCarrier};
use crate::diagnostics::Context;
use crate::errors::BoundaryError;
use crate::registry::Registry;
use crate::{Box, ToString, Vec, format};
use alloc::collections::BTreeMap;
use boundary_types::{
    Constructor, Field, FunctionSignature, Literal, Scalar, TypeArena, TypeId, TypeTerm,
    display_type,
};
use hashbrown::{HashMap, HashSet};


/// Fixpoint converters of recursive types, keyed by the named reference.
pub type FixpointTable = BTreeMap<TypeId, Converter>;

/// Converters for every part of a function signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedSignature {
    pub call: CanonicalCall,
    /// One converter per declared parameter. Optional parameters are
    /// planned as options of their declared type.
    pub args: Vec<Converter>,
    pub ret: Converter,
    /// Converter for the function value as a whole.
    pub shim: Converter,
}

struct OpenType {
    id: TypeId,
    defer_depth: usize,
}

pub struct Planner<'r> {
    registry: &'r Registry,
    options: &'r PlannerOptions,
    cache: Option<&'r ConverterCache>,
    memo: HashMap<TypeId, Converter>,
    fixpoints: FixpointTable,
    /// Converters assumed for recursive types currently being planned.
    assumptions: HashMap<TypeId, Converter>,
    open: Vec<OpenType>,
    /// Every assumption consulted, in order. Truncated when a result turns
    /// out not to depend on any open assumption.
    hit_log: Vec<TypeId>,
    /// Number of enclosing positions that are converted lazily.
    defer_depth: usize,
    path: Vec<Context>,
    error_path: Option<Vec<Context>>,
}

impl<'r> Planner<'r> {
    pub fn new(registry: &'r Registry, options: &'r PlannerOptions) -> Self {
        Self {
            registry,
            options,
            cache: None,
            memo: HashMap::new(),
            fixpoints: FixpointTable::new(),
            assumptions: HashMap::new(),
            open: Vec::new(),
            hit_log: Vec::new(),
            defer_depth: 0,
            path: Vec::new(),
            error_path: None,
        }
    }

    /// Share memoized converters through `cache`.
    pub fn with_cache(mut self, cache: &'r ConverterCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    fn arena(&self) -> &'r TypeArena {
        self.registry.arena()
    }

    /// Fixpoint converters discovered so far.
    pub fn fixpoints(&self) -> &FixpointTable {
        &self.fixpoints
    }

    /// Where the most recent error was raised, outermost first. Clears it.
    pub fn take_error_context(&mut self) -> Vec<Context> {
        self.error_path.take().unwrap_or_default()
    }

    /// Plan the converter for `ty`.
    pub fn plan(&mut self, ty: TypeId) -> Result<Converter, BoundaryError> {
        if let Some(converter) = self.memo.get(&ty) {
            return Ok(converter.clone());
        }
        if let Some(converter) = self.cache.and_then(|cache| cache.get(ty)) {
            tracing::trace!(?ty, "Converter cache hit");
            self.adopt_fixpoints(&converter)?;
            self.memo.insert(ty, converter.clone());
            return Ok(converter);
        }

        let mark = self.hit_log.len();
        let converter = match self.plan_term(ty) {
            Ok(converter) => converter,
            Err(err) => {
                self.hit_log.truncate(mark);
                return Err(err);
            }
        };

        let dependent = self.hit_log[mark..]
            .iter()
            .any(|id| self.assumptions.contains_key(id));
        if dependent {
            // Keep only the still-open hits so enclosing results see them.
            let mut still_open = HashSet::new();
            let assumptions = &self.assumptions;
            let open: Vec<TypeId> = self
                .hit_log
                .drain(mark..)
                .filter(|id| assumptions.contains_key(id) && still_open.insert(*id))
                .collect();
            self.hit_log.extend(open);
            return Ok(converter);
        }

        self.hit_log.truncate(mark);
        Ok(self.publish(ty, converter))
    }

    /// Plan converters for every part of a function signature.
    pub fn plan_signature(
        &mut self,
        signature: &FunctionSignature,
    ) -> Result<PlannedSignature, BoundaryError> {
        let call = adapter::adapt(signature)?;

        let mut args = Vec::with_capacity(signature.params.len());
        for (index, param) in signature.params.iter().enumerate() {
            let ctx = Context::InArgument {
                index,
                label: param.role.label().map(|l| l.to_string()),
            };
            let default = &call.slots[call.order[index]].default;
            let converter = self.with_context(ctx, |p| {
                if let DefaultPlacement::Shim(lit) = default {
                    p.check_default(param.ty, lit)?;
                }
                p.deferred(|p| {
                    if param.role.is_optional() {
                        p.plan_present_or_absent(param.ty)
                    } else {
                        p.plan(param.ty)
                    }
                })
            })?;
            args.push(converter);
        }
        let ret = self.with_context(Context::InReturn, |p| p.deferred(|p| p.plan(signature.ret)))?;

        let passes_through = signature.params.len() <= 1
            && !signature.params.iter().any(|p| p.role.is_optional())
            && args.iter().all(Converter::is_identity)
            && ret.is_identity();

        let shim = if passes_through {
            Converter::Identity
        } else {
            let wrap = |args: Vec<TransformStep>, ret: TransformStep| {
                if args.iter().all(TransformStep::is_identity) && ret.is_identity() {
                    TransformStep::Identity
                } else {
                    TransformStep::WrapFunction {
                        args,
                        ret: Box::new(ret),
                    }
                }
            };
            // Shim defaults are host values, so they are substituted ahead
            // of each argument's forward step. The arity check is applied
            // last so that it runs first on a call.
            let forward_args = args
                .iter()
                .enumerate()
                .map(|(index, arg)| match &call.slots[call.order[index]].default {
                    DefaultPlacement::Shim(lit) => TransformStep::sequence([
                        TransformStep::SubstituteDefault(lit.clone()),
                        arg.forward(),
                    ]),
                    DefaultPlacement::None | DefaultPlacement::Native(_) => arg.forward(),
                })
                .collect();
            let backward = TransformStep::sequence([
                wrap(forward_args, ret.backward()),
                TransformStep::AdaptArity(call.arity_only()),
            ]);
            let forward = TransformStep::sequence([
                wrap(args.iter().map(Converter::backward).collect(), ret.forward()),
                TransformStep::AdaptArity(call.arity_only()),
            ]);
            Converter::custom(forward, backward)
        };

        Ok(PlannedSignature {
            call,
            args,
            ret,
            shim,
        })
    }

    /// Memoize a settled converter. With a cache, the fixpoint bodies it
    /// reaches are published before the converter itself, so whoever finds
    /// the converter also finds them.
    fn publish(&mut self, ty: TypeId, converter: Converter) -> Converter {
        let converter = match self.cache {
            Some(cache) => {
                let mut pending = converter.recursion_targets();
                let mut seen = HashSet::new();
                while let Some(target) = pending.pop() {
                    if !seen.insert(target) {
                        continue;
                    }
                    if let Some(body) = self.fixpoints.get(&target) {
                        pending.extend(body.recursion_targets());
                        cache.publish_fixpoint(target, body.clone());
                    }
                }
                cache.publish(ty, converter)
            }
            None => converter,
        };
        self.memo.insert(ty, converter.clone());
        converter
    }

    /// Pull the fixpoint bodies a cached converter depends on into this
    /// planner's table.
    fn adopt_fixpoints(&mut self, converter: &Converter) -> Result<(), BoundaryError> {
        let Some(cache) = self.cache else {
            return Ok(());
        };
        let mut pending = converter.recursion_targets();
        while let Some(target) = pending.pop() {
            if self.fixpoints.contains_key(&target) {
                continue;
            }
            let body = cache.fixpoint(target).ok_or_else(|| {
                BoundaryError::unsupported(
                    display_type(self.arena(), target),
                    "fixpoint converter was not published",
                )
            })?;
            pending.extend(body.recursion_targets());
            self.fixpoints.insert(target, body);
        }
        Ok(())
    }

    fn with_context<T>(
        &mut self,
        ctx: Context,
        f: impl FnOnce(&mut Self) -> Result<T, BoundaryError>,
    ) -> Result<T, BoundaryError> {
        self.path.push(ctx);
        let result = f(self);
        if result.is_err() && self.error_path.is_none() {
            self.error_path = Some(self.path.clone());
        }
        self.path.pop();
        result
    }

    /// Run `f` in a position whose values are converted on demand, such as
    /// array elements or variant payloads.
    fn deferred<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, BoundaryError>,
    ) -> Result<T, BoundaryError> {
        self.defer_depth += 1;
        let result = f(self);
        self.defer_depth -= 1;
        result
    }

    fn plan_term(&mut self, ty: TypeId) -> Result<Converter, BoundaryError> {
        let data = self.arena().get(ty);
        match &data.term {
            TypeTerm::Scalar(_) | TypeTerm::Var(_) | TypeTerm::Opaque(_) => Ok(Converter::Identity),
            TypeTerm::Record(fields) => self.plan_record(ty, fields),
            TypeTerm::Object(fields) => {
                self.check_unique_fields(ty, fields)?;
                let converters = self.plan_fields(fields)?;
                Ok(keyed_fields(fields, &converters))
            }
            TypeTerm::Variant(ctors) => self.plan_variant(ty, ctors),
            TypeTerm::Tuple(elems) => {
                let mut converters = Vec::with_capacity(elems.len());
                for (index, elem) in elems.iter().enumerate() {
                    converters.push(self.with_context(Context::InElement { index }, |p| p.plan(*elem))?);
                }
                Ok(positional_elements(&converters))
            }
            TypeTerm::Array(inner) => {
                let converter = self.deferred(|p| p.plan(*inner))?;
                Ok(Converter::lift(&converter, |s| TransformStep::MapArray(Box::new(s))))
            }
            TypeTerm::Option(inner) => {
                if self.is_option(*inner)? {
                    return Err(BoundaryError::unsupported(
                        display_type(self.arena(), ty),
                        "an option of an option cannot be represented by omission",
                    ));
                }
                let converter = self.deferred(|p| p.plan(*inner))?;
                Ok(Converter::lift(&converter, |s| TransformStep::MapOption(Box::new(s))))
            }
            TypeTerm::Nullable(inner) => {
                let converter = self.deferred(|p| p.plan(*inner))?;
                Ok(Converter::custom(
                    TransformStep::MapNullable(Box::new(converter.forward())),
                    TransformStep::MapNullable(Box::new(converter.backward())),
                ))
            }
            TypeTerm::Ref(inner) => self.plan_ref(ty, *inner),
            TypeTerm::Function(signature) => Ok(self.plan_signature(signature)?.shim),
            TypeTerm::NamedRef(_) => self.plan_named(ty),
        }
    }

    fn plan_record(&mut self, ty: TypeId, fields: &[Field]) -> Result<Converter, BoundaryError> {
        self.check_unique_fields(ty, fields)?;
        let converters = self.plan_fields(fields)?;

        let mut slots = Vec::with_capacity(fields.len());
        for field in fields {
            slots.push(FieldSlot {
                name: field.name.clone(),
                optional: field.optional || self.is_option(field.ty)?,
            });
        }

        let host = self.options.host.records;
        let native = self.options.native.records;
        let nested = |direction: Direction| -> Vec<TransformStep> {
            fields
                .iter()
                .zip(&converters)
                .filter(|(_, c)| !c.is_identity())
                .map(|(field, c)| TransformStep::ApplyNestedField {
                    name: field.name.clone(),
                    inner: Box::new(c.step(direction)),
                })
                .collect()
        };

        let converter = match (host, native) {
            (RecordCarrier::Keyed, RecordCarrier::Keyed) => keyed_fields(fields, &converters),
            (RecordCarrier::Positional, RecordCarrier::Positional) => {
                positional_elements(&converters)
            }
            (RecordCarrier::Keyed, RecordCarrier::Positional) => {
                let mut forward = nested(Direction::Forward);
                forward.push(TransformStep::WrapRecordAsPositional(slots.clone()));
                let mut backward = vec![TransformStep::UnwrapPositionalAsRecord(slots)];
                backward.extend(nested(Direction::Backward));
                Converter::custom(
                    TransformStep::sequence(forward),
                    TransformStep::sequence(backward),
                )
            }
            (RecordCarrier::Positional, RecordCarrier::Keyed) => {
                let mut forward = vec![TransformStep::UnwrapPositionalAsRecord(slots.clone())];
                forward.extend(nested(Direction::Forward));
                let mut backward = nested(Direction::Backward);
                backward.push(TransformStep::WrapRecordAsPositional(slots));
                Converter::custom(
                    TransformStep::sequence(forward),
                    TransformStep::sequence(backward),
                )
            }
        };
        Ok(converter)
    }

    fn plan_fields(&mut self, fields: &[Field]) -> Result<Vec<Converter>, BoundaryError> {
        let mut converters = Vec::with_capacity(fields.len());
        for field in fields {
            let ctx = Context::InField {
                name: field.name.clone(),
            };
            let converter = self.with_context(ctx, |p| {
                if field.optional {
                    p.deferred(|p| p.plan_present_or_absent(field.ty))
                } else {
                    p.plan(field.ty)
                }
            })?;
            converters.push(converter);
        }
        Ok(converters)
    }

    /// Plan a value that may be omitted: an optional field or parameter.
    fn plan_present_or_absent(&mut self, ty: TypeId) -> Result<Converter, BoundaryError> {
        if self.is_option(ty)? {
            return Err(BoundaryError::unsupported(
                display_type(self.arena(), ty),
                "an omittable value of option type nests two levels of absence",
            ));
        }
        let converter = self.plan(ty)?;
        Ok(Converter::lift(&converter, |s| TransformStep::MapOption(Box::new(s))))
    }

    fn plan_variant(&mut self, ty: TypeId, ctors: &[Constructor]) -> Result<Converter, BoundaryError> {
        if ctors.is_empty() {
            return Err(BoundaryError::unsupported(
                display_type(self.arena(), ty),
                "a variant needs at least one constructor",
            ));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = ctors.iter().find(|c| !seen.insert(c.name.as_str())) {
            return Err(BoundaryError::unsupported(
                display_type(self.arena(), ty),
                format!("constructor '{}' is declared twice", dup.name),
            ));
        }

        let mut payloads = Vec::with_capacity(ctors.len());
        for ctor in ctors {
            let converter = match ctor.payload {
                Some(payload) => {
                    let ctx = Context::InConstructor {
                        name: ctor.name.clone(),
                    };
                    Some(self.with_context(ctx, |p| p.deferred(|p| p.plan(payload)))?)
                }
                None => None,
            };
            payloads.push(converter);
        }

        let host = self.options.host.variants;
        let native = self.options.native.variants;
        if host == native && payloads.iter().flatten().all(Converter::is_identity) {
            return Ok(Converter::Identity);
        }

        let cases = |direction: Direction| -> Vec<VariantCase> {
            ctors
                .iter()
                .zip(&payloads)
                .map(|(ctor, payload)| VariantCase {
                    name: ctor.name.clone(),
                    payload: payload.as_ref().map(|c| c.step(direction)),
                })
                .collect()
        };
        Ok(Converter::custom(
            TransformStep::RetagVariant {
                from: host,
                to: native,
                cases: cases(Direction::Forward),
            },
            TransformStep::RetagVariant {
                from: native,
                to: host,
                cases: cases(Direction::Backward),
            },
        ))
    }

    fn plan_ref(&mut self, ty: TypeId, inner: TypeId) -> Result<Converter, BoundaryError> {
        let converter = self.deferred(|p| p.plan(inner))?;
        if converter.is_identity() {
            let pass = || TransformStep::PassThroughBox(Box::new(TransformStep::Identity));
            return Ok(Converter::custom(pass(), pass()));
        }

        let shown = display_type(self.arena(), ty);
        match self.options.ref_identity {
            RefIdentityPolicy::Preserve => Err(BoundaryError::unsupported(
                shown,
                "converting the contents of a ref builds a new box, so writes through one \
                 side would not be seen by the other; declare the contents opaque to keep \
                 one box",
            )),
            RefIdentityPolicy::AllowRebuild => {
                tracing::warn!(ty = %shown, "Planning a ref that is rebuilt at the boundary");
                Ok(Converter::lift(&converter, |s| TransformStep::RebuildBox(Box::new(s))))
            }
        }
    }

    fn plan_named(&mut self, ty: TypeId) -> Result<Converter, BoundaryError> {
        if let Some(assumed) = self.assumptions.get(&ty).cloned() {
            let entered_at = self
                .open
                .iter()
                .rev()
                .find(|open| open.id == ty)
                .map(|open| open.defer_depth);
            if entered_at == Some(self.defer_depth) {
                return Err(BoundaryError::cyclic(
                    display_type(self.arena(), ty),
                    "the type contains itself directly, so converting it would never terminate",
                ));
            }
            self.hit_log.push(ty);
            return Ok(assumed);
        }

        let resolution = self.registry.resolve(ty)?;
        let shown = display_type(self.arena(), ty);
        let ctx = || Context::InNamedType { name: shown.clone() };

        if !resolution.recursive {
            return self.with_context(ctx(), |p| p.plan(resolution.node));
        }
        if !resolution.regular {
            return Err(BoundaryError::cyclic(
                shown.clone(),
                "it recurses with different type arguments, so there is no finite fixpoint",
            ));
        }

        tracing::debug!(ty = %shown, "Planning recursive type");
        self.open.push(OpenType {
            id: ty,
            defer_depth: self.defer_depth,
        });
        self.assumptions.insert(ty, Converter::Identity);

        let result = self.plan_fixpoint(ty, resolution.node, ctx);

        self.assumptions.remove(&ty);
        self.open.pop();
        result
    }

    fn plan_fixpoint(
        &mut self,
        ty: TypeId,
        body: TypeId,
        ctx: impl Fn() -> Context,
    ) -> Result<Converter, BoundaryError> {
        let optimistic = self.with_context(ctx(), |p| p.plan(body))?;
        if optimistic.is_identity() {
            return Ok(Converter::Identity);
        }

        let fixpoint = Converter::custom(
            TransformStep::Recurse {
                target: ty,
                direction: Direction::Forward,
            },
            TransformStep::Recurse {
                target: ty,
                direction: Direction::Backward,
            },
        );
        self.assumptions.insert(ty, fixpoint.clone());
        let body_converter = self.with_context(ctx(), |p| p.plan(body))?;

        tracing::debug!(
            ty = %display_type(self.arena(), ty),
            "Recursive type needs a fixpoint converter"
        );
        self.fixpoints.insert(ty, body_converter);
        Ok(fixpoint)
    }

    fn check_unique_fields(&self, ty: TypeId, fields: &[Field]) -> Result<(), BoundaryError> {
        let mut seen = HashSet::new();
        match fields.iter().find(|f| !seen.insert(f.name.as_str())) {
            Some(dup) => Err(BoundaryError::unsupported(
                display_type(self.arena(), ty),
                format!("field '{}' is declared twice", dup.name),
            )),
            None => Ok(()),
        }
    }

    /// Check that a shim default is a host value of type `ty`.
    fn check_default(&self, ty: TypeId, lit: &Literal) -> Result<(), BoundaryError> {
        let node = if matches!(self.arena().get(ty).term, TypeTerm::NamedRef(_)) {
            self.registry.resolve(ty)?.node
        } else {
            ty
        };
        let data = self.arena().get(node);
        let fits = match (&data.term, lit) {
            (TypeTerm::Var(_) | TypeTerm::Opaque(_), _) => true,
            (TypeTerm::Scalar(scalar), lit) => matches!(
                (scalar, lit),
                (Scalar::Unit, Literal::Unit)
                    | (Scalar::Bool, Literal::Bool(_))
                    | (Scalar::Int, Literal::Int(_))
                    | (Scalar::Float, Literal::Float(_))
                    | (Scalar::String, Literal::String(_))
            ),
            (TypeTerm::Nullable(inner), lit) => return self.check_default(*inner, lit),
            (TypeTerm::Variant(ctors), lit) => {
                let mut nullary = ctors.iter().filter(|c| c.payload.is_none());
                match (self.options.host.variants, lit) {
                    (VariantCarrier::Tagged, Literal::String(tag)) => {
                        nullary.any(|c| c.name == *tag)
                    }
                    (VariantCarrier::Indexed, Literal::Int(index)) => usize::try_from(*index)
                        .is_ok_and(|index| index < nullary.count()),
                    _ => false,
                }
            }
            _ => false,
        };
        if fits {
            Ok(())
        } else {
            Err(BoundaryError::unsupported(
                display_type(self.arena(), ty),
                format!("the default {} is not a host value of this type", lit),
            ))
        }
    }

    /// True if `ty` is an option, looking through aliases and named types.
    fn is_option(&self, ty: TypeId) -> Result<bool, BoundaryError> {
        let data = self.arena().get(ty);
        match &data.term {
            TypeTerm::Option(_) => Ok(true),
            TypeTerm::NamedRef(_) => {
                let node = self.registry.resolve(ty)?.node;
                Ok(matches!(self.arena().get(node).term, TypeTerm::Option(_)))
            }
            _ => Ok(false),
        }
    }
}

/// Keyed carrier on both sides: convert fields in place.
fn keyed_fields(fields: &[Field], converters: &[Converter]) -> Converter {
    let nested = |direction: Direction| {
        TransformStep::sequence(
            fields
                .iter()
                .zip(converters)
                .filter(|(_, c)| !c.is_identity())
                .map(|(field, c)| TransformStep::ApplyNestedField {
                    name: field.name.clone(),
                    inner: Box::new(c.step(direction)),
                }),
        )
    };
    if converters.iter().all(Converter::is_identity) {
        Converter::Identity
    } else {
        Converter::custom(nested(Direction::Forward), nested(Direction::Backward))
    }
}

/// Positional carrier on both sides: convert elements in place.
fn positional_elements(converters: &[Converter]) -> Converter {
    if converters.iter().all(Converter::is_identity) {
        return Converter::Identity;
    }
    Converter::custom(
        TransformStep::MapElements(converters.iter().map(Converter::forward).collect()),
        TransformStep::MapElements(converters.iter().map(Converter::backward).collect()),
    )
}
