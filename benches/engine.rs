use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gem_cascade::core::{
    find_all_matches, find_first_legal_move, has_any_legal_move, Engine, EngineConfig,
    MatchScoring,
};

fn bench_find_all_matches(c: &mut Criterion) {
    let engine = Engine::new(EngineConfig::new(12345)).unwrap();
    let scoring = MatchScoring::default();

    c.bench_function("find_all_matches_9x9", |b| {
        b.iter(|| find_all_matches(black_box(engine.grid()), &scoring))
    });
}

fn bench_has_any_legal_move(c: &mut Criterion) {
    let engine = Engine::new(EngineConfig::new(12345)).unwrap();

    c.bench_function("has_any_legal_move_9x9", |b| {
        b.iter(|| has_any_legal_move(black_box(engine.grid())))
    });
}

fn bench_resolve_swap(c: &mut Criterion) {
    c.bench_function("resolve_one_swap", |b| {
        b.iter(|| {
            let mut engine = Engine::new(EngineConfig::new(12345)).unwrap();
            if let Some((a, b_pos)) = find_first_legal_move(engine.grid()) {
                let _ = engine.try_swap(black_box(a), black_box(b_pos));
            }
        })
    });
}

fn bench_engine_generation(c: &mut Criterion) {
    c.bench_function("generate_9x9_board", |b| {
        b.iter(|| Engine::new(EngineConfig::new(black_box(777))))
    });
}

criterion_group!(
    benches,
    bench_find_all_matches,
    bench_has_any_legal_move,
    bench_resolve_swap,
    bench_engine_generation
);
criterion_main!(benches);
