use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use multisweeper_core::*;
use std::hint::black_box;

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    for (name, config) in [
        ("beginner", GameConfig::beginner()),
        ("intermediate", GameConfig::intermediate()),
        ("expert", GameConfig::expert()),
    ] {
        group.bench_function(name, |b| {
            let mut seed = 0;
            b.iter(|| {
                seed += 1;
                let generator = RandomLayoutGenerator::new(seed, (0, 0), StartTile::AlwaysZero);
                black_box(Board::generate(config, generator).unwrap())
            })
        });
    }
    group.finish();
}

fn bench_flood_fill(c: &mut Criterion) {
    // a single mine in the corner, so the first click opens the whole board
    let board = Board::from_mine_coords((200, 200), &[(199, 199)]).unwrap();

    c.bench_function("flood_fill_200x200", |b| {
        b.iter_batched(
            || GameEngine::without_observer(board.clone()),
            |mut engine| black_box(engine.apply_open((0, 0)).unwrap()),
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, bench_generate, bench_flood_fill);
criterion_main!(benches);
