use xiangqi_engine::{choose_ai_move, Color, GameEngine};

use criterion::{criterion_group, criterion_main, Criterion};

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("alpha beta depth 3 opening", |b| {
        b.iter(search_opening_depth_3)
    });
    c.bench_function("alpha beta depth 4 endgame", |b| {
        b.iter(search_endgame_depth_4)
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

/// 初始局面分支因子最大，用固定种子避免开局库命中
fn search_opening_depth_3() {
    let engine =
        GameEngine::from_fen("rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABN1", Color::Red)
            .unwrap();
    choose_ai_move(&engine, 3, Some(42)).unwrap();
}

/// 车兵残局，子少可以搜得更深
fn search_endgame_depth_4() {
    let engine =
        GameEngine::from_fen("2bak4/9/4b4/4P4/9/9/9/9/4A4/3AK2R1", Color::Red).unwrap();
    choose_ai_move(&engine, 4, Some(42)).unwrap();
}
