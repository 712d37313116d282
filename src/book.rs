//! 开局库
//!
//! 手工录入的局面 → 推荐走法表，以局面编码串为键。
//! 同一局面有多个候选时随机挑一个，让 AI 开局多变。
//! 库是静态数据，可能与现行规则不一致，调用方必须
//! 先按当前合法走法校验，校验失败按未命中处理。

use crate::fen::START_FEN;
use crate::types::Position;
use lazy_static::lazy_static;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

/// 候选走法：{起点行, 起点列, 终点行, 终点列}
type RawMove = [i8; 4];

lazy_static! {
    static ref BOOK: HashMap<&'static str, &'static [RawMove]> = {
        let mut book: HashMap<&'static str, &'static [RawMove]> = HashMap::new();

        // ========================================== AI 执红
        book.insert(
            START_FEN,
            &[
                [7, 7, 7, 4], // 炮二平五
                [7, 1, 7, 4], // 炮八平五
            ],
        );

        // ========================================== AI 执黑
        // 红方炮二平五之后
        book.insert(
            "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C2C4/9/RNBAKABNR",
            &[
                [0, 7, 2, 6], // 马8进7（屏风马）
                [2, 7, 2, 4], // 炮8平5（顺手炮）
            ],
        );

        book.insert(
            "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/4C2C1/9/RNBAKABNR",
            &[[0, 1, 2, 2], [2, 1, 2, 4]],
        );

        book.insert(
            "rnbakab1r/9/1c4nc1/p1p1p1p1p/9/9/P1P1P1P1P/2N1C2C1/9/R1BAKABNR",
            &[[0, 1, 2, 2], [2, 1, 2, 3]],
        );

        book.insert(
            "rnbakab1r/9/1c4nc1/p1p1p1p1p/9/9/P1P1P1P1P/1C2C1N2/9/RNBAKAB1R",
            &[[0, 8, 0, 7], [3, 6, 4, 6], [3, 2, 4, 2]],
        );

        book.insert(
            "rnbakab1r/9/1c4nc1/p3p1p1p/2p6/9/P1P1P1P1P/1C2C1N2/9/RNBAKABR1",
            &[[0, 8, 0, 7]],
        );

        book.insert(
            "rnbakab1r/9/1c4nc1/p3p1p1p/2p6/6P2/P1P1P3P/1C2C1N2/9/RNBAKAB1R",
            &[[0, 1, 2, 2], [0, 8, 0, 7]],
        );

        book.insert(
            "rnbakabnr/9/1c5c1/p1p1p1p1p/9/2P6/P3P1P1P/1C5C1/9/RNBAKABNR",
            &[[2, 1, 2, 2], [0, 2, 2, 4], [3, 6, 4, 6]],
        );

        book.insert(
            "rnbakabnr/9/1c5c1/p1p1p1p1p/9/6P2/P1P1P3P/1C5C1/9/RNBAKABNR",
            &[[2, 7, 2, 6], [0, 6, 2, 4], [3, 2, 4, 2]],
        );

        book.insert(
            "rnbakabnr/9/1c5c1/p1p1p3p/6p2/2P6/P3P1P1P/1CN4C1/9/R1BAKABNR",
            &[[0, 7, 2, 6]],
        );

        book.insert(
            "r1bakabnr/9/1cn4c1/p1p1p1p1p/9/9/P1P1P1P1P/2N1C2C1/9/R1BAKABNR",
            &[[0, 7, 2, 6], [0, 0, 0, 1], [3, 2, 4, 2]],
        );

        book.insert(
            "r1bakab1r/9/1cn3nc1/p1p1p1p1p/9/9/P1P1P1P1P/2N1C2C1/9/1RBAKABNR",
            &[[0, 0, 0, 1]],
        );

        book
    };
}

/// 查询开局库，命中时从候选中随机返回一个走法
pub fn lookup<R: Rng>(fen: &str, rng: &mut R) -> Option<(Position, Position)> {
    let candidates = BOOK.get(fen)?;
    let [from_row, from_col, to_row, to_col] = *candidates.choose(rng)?;
    Some((
        Position::new(from_row, from_col),
        Position::new(to_row, to_col),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_start_position_hit() {
        let mut rng = StdRng::seed_from_u64(1);
        let (from, to) = lookup(START_FEN, &mut rng).unwrap();
        // 两个候选都是平中炮
        assert_eq!(to, Position::new(7, 4));
        assert!(from == Position::new(7, 7) || from == Position::new(7, 1));
    }

    #[test]
    fn test_unknown_position_miss() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(lookup("4k4/9/9/9/9/9/9/9/9/4K4", &mut rng).is_none());
    }

    #[test]
    fn test_all_entries_are_within_board() {
        for (fen, candidates) in BOOK.iter() {
            assert!(!candidates.is_empty(), "empty candidate list for {}", fen);
            for raw in candidates.iter() {
                let from = Position::new(raw[0], raw[1]);
                let to = Position::new(raw[2], raw[3]);
                assert!(from.is_valid() && to.is_valid(), "bad move in {}", fen);
            }
        }
    }
}
