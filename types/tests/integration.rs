//! Integration tests for boundary-types.
//!
//! These tests verify that interning, flags, folding and display work
//! together on realistic declaration shapes.

use boundary_types::{
    Constructor, Field, FunctionSignature, Literal, Parameter, TypeArena, TypeFlags, TypeId,
    TypeTerm, TypeVisitor, display_type, instantiate, named_refs,
};
use pretty_assertions::assert_eq;

#[test]
fn test_scalars_are_pre_interned() {
    let arena = TypeArena::new();
    assert_eq!(arena.len(), TypeId::FIRST_DYNAMIC as usize);
    assert_eq!(arena.intern(TypeTerm::Scalar(boundary_types::Scalar::Int)), TypeId::INT);
    assert!(TypeId::STRING.is_scalar());
}

#[test]
fn test_interning_is_structural() {
    let arena = TypeArena::new();

    let coord = arena.record(vec![Field::new("x", TypeId::INT), Field::new("y", TypeId::INT)]);
    let same = arena.record(vec![Field::new("x", TypeId::INT), Field::new("y", TypeId::INT)]);
    assert_eq!(coord, same);

    // Field order is part of the structure: positional carriers depend on it.
    let swapped = arena.record(vec![Field::new("y", TypeId::INT), Field::new("x", TypeId::INT)]);
    assert_ne!(coord, swapped);

    // Same fields, keyed on both sides: a different shape.
    let object = arena.object(vec![Field::new("x", TypeId::INT), Field::new("y", TypeId::INT)]);
    assert_ne!(coord, object);
}

#[test]
fn test_option_and_nullable_are_distinct() {
    let arena = TypeArena::new();
    let opt = arena.option(TypeId::INT);
    let null = arena.nullable(TypeId::INT);
    assert_ne!(opt, null);
    assert_eq!(arena.option(TypeId::INT), opt);
}

#[test]
fn test_flags_propagate_from_children() {
    let arena = TypeArena::new();
    let boxed = arena.reference(TypeId::INT);
    let named = arena.named("Types", "weekday", vec![]);
    let rec = arena.record(vec![
        Field::new("cell", boxed),
        Field::new("day", named).optional(),
    ]);

    let flags = arena.flags(rec);
    assert!(flags.contains(TypeFlags::HAS_NAMED_REF));
    assert!(!flags.contains(TypeFlags::HAS_VAR));
    assert!(arena.flags(boxed).is_empty());
    assert!(arena.flags(arena.array(arena.var(0))).contains(TypeFlags::HAS_VAR));
}

#[test]
fn test_named_refs_in_first_seen_order() {
    let arena = TypeArena::new();
    let day = arena.named("Types", "weekday", vec![]);
    let list = arena.named("Types", "list", vec![day]);
    let ty = arena.tuple(vec![
        arena.array(TypeId::INT),
        list,
        arena.option(day),
        arena.reference(list),
    ]);
    assert_eq!(named_refs(&arena, ty), vec![list, day]);
    assert_eq!(named_refs(&arena, arena.array(TypeId::STRING)), vec![]);
}

#[test]
fn test_instantiate_substitutes_parameters() {
    let arena = TypeArena::new();
    // type pair<'a, 'b> = ('a, array<'b>)
    let body = arena.tuple(vec![arena.var(0), arena.array(arena.var(1))]);

    let inst = instantiate(&arena, body, &[TypeId::INT, TypeId::STRING]);
    assert_eq!(inst, arena.tuple(vec![TypeId::INT, arena.array(TypeId::STRING)]));
    assert!(!arena.flags(inst).contains(TypeFlags::HAS_VAR));

    // Closed bodies come back untouched.
    let closed = arena.array(TypeId::BOOL);
    assert_eq!(instantiate(&arena, closed, &[TypeId::INT]), closed);
}

#[test]
fn test_instantiate_reaches_named_ref_arguments() {
    let arena = TypeArena::new();
    // type list<'a> = Nil | Cons(('a, list<'a>))
    let tail = arena.named("List", "t", vec![arena.var(0)]);
    let body = arena.variant(vec![
        Constructor::nullary("Nil"),
        Constructor::with_payload("Cons", arena.tuple(vec![arena.var(0), tail])),
    ]);

    let inst = instantiate(&arena, body, &[TypeId::FLOAT]);
    let expected_tail = arena.named("List", "t", vec![TypeId::FLOAT]);
    assert_eq!(named_refs(&arena, inst), vec![expected_tail]);
}

#[test]
fn test_display() {
    let arena = TypeArena::new();
    let weekday = arena.named("Types", "weekday", vec![]);
    let f = arena.function(FunctionSignature::new(
        vec![
            Parameter::named("day", weekday),
            Parameter::optional("offset", Some(Literal::Int(1)), TypeId::INT),
        ],
        arena.nullable(weekday),
    ));
    assert_eq!(
        display_type(&arena, f),
        "(~day: Types.weekday, ~offset: ?int) => nullable<Types.weekday>"
    );

    let v = arena.variant(vec![
        Constructor::nullary("A"),
        Constructor::with_payload("B", arena.reference(TypeId::STRING)),
    ]);
    assert_eq!(display_type(&arena, v), "A | B(ref<string>)");
}

#[test]
fn test_visitor_counts_nodes() {
    struct Counter(usize);

    impl TypeVisitor for Counter {
        fn visit_ty(&mut self, arena: &TypeArena, ty: TypeId) {
            self.0 += 1;
            self.super_visit_ty(arena, ty);
        }
    }

    let arena = TypeArena::new();
    let ty = arena.tuple(vec![arena.option(TypeId::INT), TypeId::STRING]);
    let mut counter = Counter(0);
    counter.visit_ty(&arena, ty);
    assert_eq!(counter.0, 4); // tuple, option, int, string
}

#[test]
fn test_concurrent_interning_agrees() {
    use std::sync::Arc;
    use std::thread;

    let arena = Arc::new(TypeArena::new());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let arena = Arc::clone(&arena);
            thread::spawn(move || {
                let inner = arena.option(TypeId::FLOAT);
                arena.record(vec![Field::new("z", inner)])
            })
        })
        .collect();

    let ids: Vec<TypeId> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(ids.windows(2).all(|w| w[0] == w[1]));
}
