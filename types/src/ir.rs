//! Intermediate Representation (IR) for boundary types.
//!
//! This module contains the closed term model the planner computes over.
//! Terms reference their children by [`TypeId`]; the [`TypeArena`](crate::TypeArena)
//! owns the storage and hash-conses structurally equal terms.
//!
//! ## Structure
//!
//! - **Core types**: `TypeTerm`, `TypeId`, `TyData` - the logical structure of types
//! - **Signatures**: `FunctionSignature`, `Parameter` - declaration-ordered parameter lists
//! - **Generic algorithms**: Visitor and folder patterns over types
//! - **Display**: Pretty-printing support

pub mod display;
pub mod fold;
pub mod scalar;
pub mod signature;
pub mod ty;
pub mod visit;

pub use display::{TypeDisplay, display_type};
pub use fold::{Substitution, TypeFolder, instantiate};
pub use scalar::Scalar;
pub use signature::{FunctionSignature, Literal, ParamRole, Parameter};
pub use ty::{Constructor, Field, NamedRef, TyData, TypeFlags, TypeId, TypeTerm};
pub use visit::{TypeVisitor, named_refs};
