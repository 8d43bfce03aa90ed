use super::{FunctionSignature, Scalar};
use alloc::{string::String, vec::Vec};
use core::fmt;
use serde::Serialize;

use bitflags::bitflags;

/// Handle to an interned type term.
///
/// Ids are small integers handed out by the [`TypeArena`](crate::TypeArena)
/// in allocation order. Because the arena hash-conses terms, two structurally
/// equal terms always share one id, so an id doubles as the structural
/// signature of the term.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TypeId(u32);

impl TypeId {
    // Scalars are interned at these indices by `TypeArena::new()`.
    pub const UNIT: TypeId = TypeId(0);
    pub const BOOL: TypeId = TypeId(1);
    pub const INT: TypeId = TypeId(2);
    pub const FLOAT: TypeId = TypeId(3);
    pub const STRING: TypeId = TypeId(4);

    /// First index handed out for non-scalar terms.
    pub const FIRST_DYNAMIC: u32 = 5;

    pub(crate) fn from_index(index: usize) -> Self {
        TypeId(u32::try_from(index).expect("type arena exceeded u32::MAX entries"))
    }

    /// Get the raw index (for debugging/serialization)
    pub fn index(self) -> u32 {
        self.0
    }

    /// Check if this is one of the pre-interned scalars (no arena needed)
    #[inline]
    pub fn is_scalar(self) -> bool {
        self.0 < Self::FIRST_DYNAMIC
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

bitflags! {
    /// Flags indicating various properties of a type.
    ///
    /// These flags are computed once when a term is interned and cached
    /// for efficient queries. This avoids repeated recursive traversals.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
    pub struct TypeFlags: u16 {
        /// Contains a declaration type parameter.
        const HAS_VAR = 1;
        /// Contains a reference to a named declaration.
        const HAS_NAMED_REF = 1 << 1;
    }
}

/// A record or object field.
///
/// `optional` fields are present-by-omission: the key (or positional slot)
/// may be missing altogether.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Field {
    pub name: String,
    pub ty: TypeId,
    pub optional: bool,
    pub mutable: bool,
}

impl Field {
    /// A required, immutable field.
    pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
            mutable: false,
        }
    }

    /// Mark the field as optional (may be omitted).
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Mark the field as mutable.
    pub fn mutable(mut self) -> Self {
        self.mutable = true;
        self
    }
}

/// A variant constructor with an optional payload.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Constructor {
    pub name: String,
    pub payload: Option<TypeId>,
}

impl Constructor {
    pub fn nullary(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: None,
        }
    }

    pub fn with_payload(name: impl Into<String>, payload: TypeId) -> Self {
        Self {
            name: name.into(),
            payload: Some(payload),
        }
    }
}

/// Reference to a named type declaration, resolved lazily by the registry.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct NamedRef {
    pub module: String,
    pub name: String,
    pub args: Vec<TypeId>,
}

impl NamedRef {
    pub fn new(module: impl Into<String>, name: impl Into<String>, args: Vec<TypeId>) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
            args,
        }
    }
}

/// Logical structure of a type.
///
/// Children are referenced by [`TypeId`], never owned, so cyclic type graphs
/// are expressed through `NamedRef` edges without unbounded nesting.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TypeTerm {
    /// Scalar types (Unit, Bool, Int, Float, String)
    Scalar(Scalar),

    /// Type parameter of a generic declaration, by position.
    Var(u16),

    /// Record whose carrier is decided by the runtime profiles.
    ///
    /// Fields keep their declared order; positional carriers depend on it.
    Record(Vec<Field>),

    /// Record whose carrier is keyed in both runtimes.
    Object(Vec<Field>),

    /// Tagged union.
    Variant(Vec<Constructor>),

    /// Fixed-size positional product.
    Tuple(Vec<TypeId>),

    /// Homogeneous array, positional in both runtimes.
    Array(TypeId),

    /// Absence represented by omission of the carrier slot.
    Option(TypeId),

    /// Always-present slot which may hold the null sentinel.
    Nullable(TypeId),

    /// Single mutable named slot (`contents`), identity-bearing.
    Ref(TypeId),

    /// Passed through unexamined.
    Opaque(String),

    /// Function value.
    Function(FunctionSignature),

    /// Reference to a named declaration.
    NamedRef(NamedRef),
}

impl TypeTerm {
    /// Short name of the term's shape, used in diagnostics.
    pub fn shape_name(&self) -> &'static str {
        match self {
            TypeTerm::Scalar(s) => s.name(),
            TypeTerm::Var(_) => "type parameter",
            TypeTerm::Record(_) => "record",
            TypeTerm::Object(_) => "object",
            TypeTerm::Variant(_) => "variant",
            TypeTerm::Tuple(_) => "tuple",
            TypeTerm::Array(_) => "array",
            TypeTerm::Option(_) => "option",
            TypeTerm::Nullable(_) => "nullable",
            TypeTerm::Ref(_) => "ref",
            TypeTerm::Opaque(_) => "opaque",
            TypeTerm::Function(_) => "function",
            TypeTerm::NamedRef(_) => "named type",
        }
    }

    /// Ids of all direct children, in declaration order.
    pub fn children(&self) -> Vec<TypeId> {
        match self {
            TypeTerm::Scalar(_) | TypeTerm::Var(_) | TypeTerm::Opaque(_) => Vec::new(),
            TypeTerm::Record(fields) | TypeTerm::Object(fields) => {
                fields.iter().map(|f| f.ty).collect()
            }
            TypeTerm::Variant(ctors) => ctors.iter().filter_map(|c| c.payload).collect(),
            TypeTerm::Tuple(elems) => elems.clone(),
            TypeTerm::Array(inner)
            | TypeTerm::Option(inner)
            | TypeTerm::Nullable(inner)
            | TypeTerm::Ref(inner) => alloc::vec![*inner],
            TypeTerm::Function(sig) => sig
                .params
                .iter()
                .map(|p| p.ty)
                .chain(core::iter::once(sig.ret))
                .collect(),
            TypeTerm::NamedRef(named) => named.args.clone(),
        }
    }

    /// Flags contributed by this node itself, excluding its children.
    pub(crate) fn own_flags(&self) -> TypeFlags {
        match self {
            TypeTerm::Var(_) => TypeFlags::HAS_VAR,
            TypeTerm::NamedRef(_) => TypeFlags::HAS_NAMED_REF,
            _ => TypeFlags::empty(),
        }
    }
}

/// Data for a type: term + cached flags.
///
/// Following Chalk's design, this separates the type structure (term)
/// from cached metadata (flags). The arena computes flags once
/// during interning.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TyData {
    pub term: TypeTerm,
    pub flags: TypeFlags,
}
