use super::{Constructor, Field, FunctionSignature, NamedRef, Parameter, TypeFlags, TypeId, TypeTerm};
use crate::TypeArena;
use alloc::vec::Vec;

/// Trait for transforming types.
///
/// Implement this trait to create new types based on existing ones.
/// The default implementation rebuilds every node from its folded
/// children and re-interns it, so unchanged subtrees come back with their
/// original ids.
///
/// # Example
///
/// ```
/// use boundary_types::{TypeArena, TypeFolder, TypeId};
///
/// // Replace every int with a float
/// struct IntToFloat;
///
/// impl TypeFolder for IntToFloat {
///     fn fold_ty(&mut self, arena: &TypeArena, ty: TypeId) -> TypeId {
///         if ty == TypeId::INT {
///             return TypeId::FLOAT;
///         }
///         self.super_fold_ty(arena, ty)
///     }
/// }
///
/// let arena = TypeArena::new();
/// let arr = arena.array(TypeId::INT);
/// let folded = IntToFloat.fold_ty(&arena, arr);
/// assert_eq!(folded, arena.array(TypeId::FLOAT));
/// ```
pub trait TypeFolder {
    /// Transform a type.
    ///
    /// Override this to customize behavior for all types.
    /// Call `super_fold_ty` to recurse into nested types.
    fn fold_ty(&mut self, arena: &TypeArena, ty: TypeId) -> TypeId {
        self.super_fold_ty(arena, ty)
    }

    /// Default recursion into nested types.
    ///
    /// Override `fold_ty` instead of this method.
    fn super_fold_ty(&mut self, arena: &TypeArena, ty: TypeId) -> TypeId {
        let data = arena.get(ty);
        let term = match &data.term {
            // Leaves are returned as-is
            TypeTerm::Scalar(_) | TypeTerm::Var(_) | TypeTerm::Opaque(_) => return ty,

            TypeTerm::Record(fields) => TypeTerm::Record(self.fold_fields(arena, fields)),
            TypeTerm::Object(fields) => TypeTerm::Object(self.fold_fields(arena, fields)),
            TypeTerm::Variant(ctors) => TypeTerm::Variant(
                ctors
                    .iter()
                    .map(|c| Constructor {
                        name: c.name.clone(),
                        payload: c.payload.map(|p| self.fold_ty(arena, p)),
                    })
                    .collect(),
            ),
            TypeTerm::Tuple(elems) => {
                TypeTerm::Tuple(elems.iter().map(|e| self.fold_ty(arena, *e)).collect())
            }
            TypeTerm::Array(inner) => TypeTerm::Array(self.fold_ty(arena, *inner)),
            TypeTerm::Option(inner) => TypeTerm::Option(self.fold_ty(arena, *inner)),
            TypeTerm::Nullable(inner) => TypeTerm::Nullable(self.fold_ty(arena, *inner)),
            TypeTerm::Ref(inner) => TypeTerm::Ref(self.fold_ty(arena, *inner)),
            TypeTerm::Function(sig) => TypeTerm::Function(FunctionSignature {
                params: sig
                    .params
                    .iter()
                    .map(|p| Parameter {
                        role: p.role.clone(),
                        ty: self.fold_ty(arena, p.ty),
                        native_default: p.native_default.clone(),
                    })
                    .collect(),
                ret: self.fold_ty(arena, sig.ret),
            }),
            TypeTerm::NamedRef(named) => TypeTerm::NamedRef(NamedRef {
                module: named.module.clone(),
                name: named.name.clone(),
                args: named.args.iter().map(|a| self.fold_ty(arena, *a)).collect(),
            }),
        };
        arena.intern(term)
    }

    fn fold_fields(&mut self, arena: &TypeArena, fields: &[Field]) -> Vec<Field> {
        fields
            .iter()
            .map(|f| Field {
                name: f.name.clone(),
                ty: self.fold_ty(arena, f.ty),
                optional: f.optional,
                mutable: f.mutable,
            })
            .collect()
    }
}

/// Replaces declaration type parameters with concrete arguments.
pub struct Substitution<'s> {
    args: &'s [TypeId],
}

impl<'s> Substitution<'s> {
    pub fn new(args: &'s [TypeId]) -> Self {
        Self { args }
    }
}

impl TypeFolder for Substitution<'_> {
    fn fold_ty(&mut self, arena: &TypeArena, ty: TypeId) -> TypeId {
        // Closed subtrees cannot change.
        if !arena.flags(ty).contains(TypeFlags::HAS_VAR) {
            return ty;
        }
        if let TypeTerm::Var(index) = &arena.get(ty).term {
            // Out-of-range parameters stay free; the registry checks arity.
            return self.args.get(*index as usize).copied().unwrap_or(ty);
        }
        self.super_fold_ty(arena, ty)
    }
}

/// Instantiate a generic declaration body with `args`.
pub fn instantiate(arena: &TypeArena, body: TypeId, args: &[TypeId]) -> TypeId {
    if args.is_empty() {
        return body;
    }
    Substitution::new(args).fold_ty(arena, body)
}
