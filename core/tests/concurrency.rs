//! Planners on several threads sharing one registry and one converter cache.

use boundary_core::api::PlannerOptions;
use boundary_core::planner::{Converter, ConverterCache, Planner};
use boundary_core::registry::{Registry, TypeDecl};
use boundary_types::{Constructor, Field, TypeArena, TypeId};
use std::sync::Arc;
use std::thread;

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn shared_state_is_thread_safe() {
    assert_send_sync::<Registry>();
    assert_send_sync::<ConverterCache>();
    assert_send_sync::<Converter>();
}

fn registry() -> (Registry, Vec<TypeId>) {
    let arena = Arc::new(TypeArena::new());
    let tree = arena.named("M", "tree", vec![]);
    let shape = arena.named("M", "shape", vec![]);
    let point = arena.record(vec![
        Field::new("x", TypeId::FLOAT),
        Field::new("y", TypeId::FLOAT),
    ]);

    let mut builder = Registry::builder(Arc::clone(&arena));
    builder
        .declare(TypeDecl::new(
            "M",
            "tree",
            arena.record(vec![
                Field::new("at", point),
                Field::new("children", arena.array(tree)),
            ]),
        ))
        .unwrap()
        .declare(TypeDecl::new(
            "M",
            "shape",
            arena.variant(vec![
                Constructor::nullary("Empty"),
                Constructor::with_payload("Dot", point),
                Constructor::with_payload("Group", arena.array(shape)),
            ]),
        ))
        .unwrap();
    let types = vec![point, tree, shape, arena.option(point)];
    (builder.build(), types)
}

#[test]
fn concurrent_planners_publish_one_instance_per_type() {
    let (registry, types) = registry();
    let options = PlannerOptions::default();
    let cache = ConverterCache::new();

    let results: Vec<Vec<Converter>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let registry = &registry;
                let options = &options;
                let cache = &cache;
                let types = &types;
                scope.spawn(move || {
                    let mut planner = Planner::new(registry, options).with_cache(cache);
                    // Vary the order so workers race on different entries.
                    let mut order: Vec<TypeId> = types.clone();
                    order.rotate_left(worker % types.len());
                    let mut planned: Vec<(TypeId, Converter)> = order
                        .into_iter()
                        .map(|ty| (ty, planner.plan(ty).unwrap()))
                        .collect();
                    planned.sort_by_key(|(ty, _)| *ty);
                    planned.into_iter().map(|(_, c)| c).collect()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for converters in &results[1..] {
        for (a, b) in results[0].iter().zip(converters) {
            assert_eq!(a, b);
            assert!(a.same_instance(b));
        }
    }
}
