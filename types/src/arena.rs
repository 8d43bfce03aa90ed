use crate::ir::{
    Constructor, Field, FunctionSignature, NamedRef, Scalar, TyData, TypeFlags, TypeId, TypeTerm,
};
use alloc::{string::String, sync::Arc, vec::Vec};
use hashbrown::HashMap;
use parking_lot::RwLock;

/// Append-only, hash-consing store of type terms.
///
/// Every term is interned: building the same structure twice yields the
/// same [`TypeId`]. Entries are never mutated or removed once published,
/// so readers on other threads only ever observe complete entries. The
/// arena lives for one analysis batch.
///
/// # Example
///
/// ```
/// use boundary_types::{Field, TypeArena, TypeId};
///
/// let arena = TypeArena::new();
/// let coord = arena.record(vec![Field::new("x", TypeId::INT), Field::new("y", TypeId::INT)]);
/// let again = arena.record(vec![Field::new("x", TypeId::INT), Field::new("y", TypeId::INT)]);
/// assert_eq!(coord, again);
/// ```
#[derive(Debug)]
pub struct TypeArena {
    interner: RwLock<Interner>,
}

#[derive(Debug)]
struct Interner {
    nodes: Vec<Arc<TyData>>,
    index: HashMap<TypeTerm, TypeId>,
}

impl Default for TypeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeArena {
    pub fn new() -> Self {
        let arena = Self {
            interner: RwLock::new(Interner {
                nodes: Vec::new(),
                index: HashMap::new(),
            }),
        };
        // Must match the reserved ids on `TypeId`.
        for scalar in [
            Scalar::Unit,
            Scalar::Bool,
            Scalar::Int,
            Scalar::Float,
            Scalar::String,
        ] {
            arena.intern(TypeTerm::Scalar(scalar));
        }
        arena
    }

    /// Intern a term, returning the id shared by every structurally equal term.
    pub fn intern(&self, term: TypeTerm) -> TypeId {
        if let Some(&id) = self.interner.read().index.get(&term) {
            return id;
        }

        let flags = self.compute_flags(&term);

        let mut interner = self.interner.write();
        // Another writer may have won the race since the read lock was dropped.
        if let Some(&id) = interner.index.get(&term) {
            return id;
        }
        let id = TypeId::from_index(interner.nodes.len());
        interner.nodes.push(Arc::new(TyData {
            term: term.clone(),
            flags,
        }));
        interner.index.insert(term, id);
        id
    }

    fn compute_flags(&self, term: &TypeTerm) -> TypeFlags {
        let interner = self.interner.read();
        term.children()
            .into_iter()
            .fold(term.own_flags(), |flags, child| {
                flags | interner.nodes[child.index() as usize].flags
            })
    }

    /// Get the full type data (term + flags).
    ///
    /// Ids are only ever produced by this arena, so the lookup cannot miss
    /// unless an id from another batch is used.
    pub fn get(&self, id: TypeId) -> Arc<TyData> {
        self.interner.read().nodes[id.index() as usize].clone()
    }

    pub fn flags(&self, id: TypeId) -> TypeFlags {
        self.interner.read().nodes[id.index() as usize].flags
    }

    /// Number of interned terms.
    pub fn len(&self) -> usize {
        self.interner.read().nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ========================================================================
    // Constructors
    // ========================================================================

    pub fn scalar(&self, scalar: Scalar) -> TypeId {
        match scalar {
            Scalar::Unit => TypeId::UNIT,
            Scalar::Bool => TypeId::BOOL,
            Scalar::Int => TypeId::INT,
            Scalar::Float => TypeId::FLOAT,
            Scalar::String => TypeId::STRING,
        }
    }

    pub fn var(&self, index: u16) -> TypeId {
        self.intern(TypeTerm::Var(index))
    }

    pub fn record(&self, fields: Vec<Field>) -> TypeId {
        self.intern(TypeTerm::Record(fields))
    }

    pub fn object(&self, fields: Vec<Field>) -> TypeId {
        self.intern(TypeTerm::Object(fields))
    }

    pub fn variant(&self, constructors: Vec<Constructor>) -> TypeId {
        self.intern(TypeTerm::Variant(constructors))
    }

    pub fn tuple(&self, elements: Vec<TypeId>) -> TypeId {
        self.intern(TypeTerm::Tuple(elements))
    }

    pub fn array(&self, elem: TypeId) -> TypeId {
        self.intern(TypeTerm::Array(elem))
    }

    pub fn option(&self, inner: TypeId) -> TypeId {
        self.intern(TypeTerm::Option(inner))
    }

    pub fn nullable(&self, inner: TypeId) -> TypeId {
        self.intern(TypeTerm::Nullable(inner))
    }

    pub fn reference(&self, inner: TypeId) -> TypeId {
        self.intern(TypeTerm::Ref(inner))
    }

    pub fn opaque(&self, name: impl Into<String>) -> TypeId {
        self.intern(TypeTerm::Opaque(name.into()))
    }

    pub fn function(&self, signature: FunctionSignature) -> TypeId {
        self.intern(TypeTerm::Function(signature))
    }

    pub fn named(
        &self,
        module: impl Into<String>,
        name: impl Into<String>,
        args: Vec<TypeId>,
    ) -> TypeId {
        self.intern(TypeTerm::NamedRef(NamedRef::new(module, name, args)))
    }
}
