use criterion::{black_box, criterion_group, criterion_main, Criterion};
use obseris::core::{find_moves, Board, GameState, MoveContext};
use obseris::types::{PieceKind, NEXT_QUEUE_LEN};

fn ctx() -> MoveContext {
    MoveContext {
        combo: -1,
        back_to_back: false,
        pending_garbage: 0,
        used_hold: false,
        next_queue_after: [None; NEXT_QUEUE_LEN],
        generation: 0,
    }
}

fn bench_search_empty(c: &mut Criterion) {
    let board = Board::new();
    let ctx = ctx();

    c.bench_function("find_moves_t_empty", |b| {
        b.iter(|| find_moves(black_box(&board), PieceKind::T, &ctx))
    });
}

fn bench_search_ragged(c: &mut Criterion) {
    let board = Board::with_bottom_rows(&[
        "...#......",
        "#..#...#..",
        "###...####",
        "####.#####",
        "##.#######",
    ]);
    let ctx = ctx();

    c.bench_function("find_moves_t_ragged", |b| {
        b.iter(|| find_moves(black_box(&board), PieceKind::T, &ctx))
    });
}

fn bench_line_clear(c: &mut Criterion) {
    let board = Board::with_bottom_rows(&["##########"; 4]);

    c.bench_function("clear_4_lines", |b| {
        b.iter(|| black_box(&board).clear_lines())
    });
}

fn bench_session_step(c: &mut Criterion) {
    c.bench_function("possible_moves_and_commit", |b| {
        let mut state = GameState::new(12345);
        b.iter(|| {
            if state.game_over() {
                state.reset();
            }
            let moves = state.possible_moves().unwrap_or_default();
            if let Some(best) = moves.iter().max_by_key(|m| (m.score, m.y)) {
                let _ = state.commit(best);
            }
        })
    });
}

criterion_group!(
    benches,
    bench_search_empty,
    bench_search_ragged,
    bench_line_clear,
    bench_session_step
);
criterion_main!(benches);
