//! Type term model for the interop boundary.
//!
//! This crate provides the closed, id-addressed representation of the
//! shapes that cross the boundary between the host runtime and the native
//! functional runtime: records, objects, variants, tuples, options,
//! nullables, refs, opaques, functions and references to named
//! declarations.
//!
//! # Example
//!
//! ```
//! use boundary_types::{Field, TypeArena, TypeId, display_type};
//!
//! let arena = TypeArena::new();
//! let coord = arena.record(vec![
//!     Field::new("x", TypeId::FLOAT),
//!     Field::new("y", TypeId::FLOAT),
//!     Field::new("z", TypeId::FLOAT).optional(),
//! ]);
//! assert_eq!(display_type(&arena, coord), "{x: float, y: float, z?: float}");
//! ```

extern crate alloc;

// Intermediate Representation - closed term model
pub mod ir;

// Hash-consing storage
pub mod arena;

// Re-export IR types for convenience
pub use ir::{
    Constructor, Field, FunctionSignature, Literal, NamedRef, ParamRole, Parameter, Scalar,
    Substitution, TyData, TypeDisplay, TypeFlags, TypeFolder, TypeId, TypeTerm, TypeVisitor,
    display_type, instantiate, named_refs,
};

pub use arena::TypeArena;
