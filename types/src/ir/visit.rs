use super::{TypeFlags, TypeId, TypeTerm};
use crate::TypeArena;
use alloc::vec::Vec;

/// Trait for visiting types.
///
/// Implement this trait to traverse types without mutation.
/// The default implementation handles recursion automatically. `NamedRef`
/// nodes are leaves from the visitor's point of view: only their type
/// arguments are visited, never the declaration they point to.
///
/// # Example
///
/// ```
/// use boundary_types::{TypeArena, TypeId, TypeVisitor};
///
/// struct DepthCalculator {
///     max_depth: usize,
///     current_depth: usize,
/// }
///
/// impl TypeVisitor for DepthCalculator {
///     fn visit_ty(&mut self, arena: &TypeArena, ty: TypeId) {
///         self.current_depth += 1;
///         self.max_depth = self.max_depth.max(self.current_depth);
///
///         self.super_visit_ty(arena, ty);
///
///         self.current_depth -= 1;
///     }
/// }
///
/// let arena = TypeArena::new();
/// let arr = arena.array(arena.array(TypeId::INT));
///
/// let mut calc = DepthCalculator { max_depth: 0, current_depth: 0 };
/// calc.visit_ty(&arena, arr);
/// assert_eq!(calc.max_depth, 3); // array -> array -> int
/// ```
pub trait TypeVisitor {
    /// Visit a type.
    ///
    /// Override this to customize behavior for all types.
    /// Call `super_visit_ty` to recurse into nested types.
    fn visit_ty(&mut self, arena: &TypeArena, ty: TypeId) {
        self.super_visit_ty(arena, ty)
    }

    /// Default recursion into nested types.
    ///
    /// Override `visit_ty` instead of this method.
    fn super_visit_ty(&mut self, arena: &TypeArena, ty: TypeId) {
        let data = arena.get(ty);
        for child in data.term.children() {
            self.visit_ty(arena, child);
        }
    }
}

/// Collects `NamedRef` nodes, skipping subtrees that contain none.
struct NamedRefCollector {
    found: Vec<TypeId>,
}

impl TypeVisitor for NamedRefCollector {
    fn visit_ty(&mut self, arena: &TypeArena, ty: TypeId) {
        if !arena.flags(ty).contains(TypeFlags::HAS_NAMED_REF) {
            return;
        }
        if matches!(arena.get(ty).term, TypeTerm::NamedRef(_)) && !self.found.contains(&ty) {
            self.found.push(ty);
        }
        self.super_visit_ty(arena, ty);
    }
}

/// Collect every `NamedRef` node reachable from `ty` without crossing into
/// declarations, in first-seen order.
pub fn named_refs(arena: &TypeArena, ty: TypeId) -> Vec<TypeId> {
    let mut collector = NamedRefCollector { found: Vec::new() };
    collector.visit_ty(arena, ty);
    collector.found
}
