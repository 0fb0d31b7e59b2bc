use bangla_monopoly::board::BoardConfig;
use bangla_monopoly::card::CardDatabase;
use bangla_monopoly::simulation::run_game;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const BOARD_JSON: &str = include_str!("../data/board.json");

fn benchmark_single_game(c: &mut Criterion) {
    let board = BoardConfig::builtin().expect("Failed to load board");
    let cards = CardDatabase::builtin().expect("Failed to load cards");

    c.bench_function("single_game_seed_12345", |b| {
        b.iter(|| {
            run_game(
                black_box(&board),
                black_box(&cards),
                black_box(12345),
                black_box(4),
                black_box(500),
                black_box(false),
            )
        })
    });
}

fn benchmark_multiple_games(c: &mut Criterion) {
    let board = BoardConfig::builtin().expect("Failed to load board");
    let cards = CardDatabase::builtin().expect("Failed to load cards");

    c.bench_function("100_games", |b| {
        b.iter(|| {
            for seed in 0..100 {
                let _ = run_game(black_box(&board), black_box(&cards), black_box(seed), 4, 500, false);
            }
        })
    });
}

fn benchmark_board_parsing(c: &mut Criterion) {
    c.bench_function("parse_board_json", |b| {
        b.iter(|| BoardConfig::from_json(black_box(BOARD_JSON)))
    });
}

criterion_group!(benches, benchmark_single_game, benchmark_multiple_games, benchmark_board_parsing);
criterion_main!(benches);
