//! 静态局面评估
//!
//! 每个在场棋子 = 基础子力价值 + 位置加成，红方为正、黑方为负。
//! 位置表按红方视角书写（row 0 是黑方底线，红方向上推进），
//! 黑方取行镜像后查同一张表。只读，不改动棋盘。

use crate::board::{Board, Piece};
use crate::types::{Color, PieceKind};

/// 基础子力价值
///
/// 将的价值远超其余子力之和，真正的终局判定由搜索的胜负哨兵完成。
pub fn base_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::General => 10000,
        PieceKind::Chariot => 900,
        PieceKind::Cannon => 450,
        PieceKind::Horse => 400,
        PieceKind::Advisor => 200,
        PieceKind::Elephant => 200,
        PieceKind::Soldier => 100,
    }
}

/// 兵/卒：过河后价值陡增，逼近九宫最具威胁
const SOLDIER_TABLE: [[i32; 9]; 10] = [
    [0, 3, 6, 9, 12, 9, 6, 3, 0],
    [18, 36, 56, 80, 120, 80, 56, 36, 18],
    [14, 26, 42, 60, 80, 60, 42, 26, 14],
    [10, 20, 30, 34, 40, 34, 30, 20, 10],
    [6, 12, 18, 18, 20, 18, 18, 12, 6],
    [2, 0, 8, 0, 8, 0, 8, 0, 2],
    [0, 0, -2, 0, 4, 0, -2, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
];

/// 马：靠近中心与河口最活跃，困在角落和底线最差
const HORSE_TABLE: [[i32; 9]; 10] = [
    [4, 8, 16, 12, 4, 12, 16, 8, 4],
    [4, 10, 28, 16, 8, 16, 28, 10, 4],
    [12, 14, 16, 20, 18, 20, 16, 14, 12],
    [8, 24, 18, 24, 20, 24, 18, 24, 8],
    [6, 16, 14, 18, 16, 18, 14, 16, 6],
    [4, 12, 16, 14, 12, 14, 16, 12, 4],
    [2, 6, 8, 6, 10, 6, 8, 6, 2],
    [4, 2, 8, 8, 4, 8, 8, 2, 4],
    [0, 2, 4, 4, -2, 4, 4, 2, 0],
    [0, -4, 0, 0, 0, 0, 0, -4, 0],
];

/// 车：占领对方底线和肋道价值最高
const CHARIOT_TABLE: [[i32; 9]; 10] = [
    [14, 14, 12, 18, 16, 18, 12, 14, 14],
    [16, 20, 18, 24, 26, 24, 18, 20, 16],
    [12, 12, 12, 18, 18, 18, 12, 12, 12],
    [12, 18, 16, 22, 22, 22, 16, 18, 12],
    [12, 14, 12, 18, 18, 18, 12, 14, 12],
    [12, 16, 14, 20, 20, 20, 14, 16, 12],
    [6, 10, 8, 14, 14, 14, 8, 10, 6],
    [4, 8, 6, 14, 12, 14, 6, 8, 4],
    [8, 4, 8, 16, 8, 16, 8, 4, 8],
    [-2, 10, 6, 14, 12, 14, 6, 10, -2],
];

/// 炮：留在后方隔山打牛，贴近敌阵反而受限
const CANNON_TABLE: [[i32; 9]; 10] = [
    [6, 4, 0, -10, -12, -10, 0, 4, 6],
    [2, 2, 0, -4, -14, -4, 0, 2, 2],
    [2, 2, 0, -10, -8, -10, 0, 2, 2],
    [0, 0, -2, 4, 10, 4, -2, 0, 0],
    [0, 0, 0, 2, 8, 2, 0, 0, 0],
    [-2, 0, 4, 2, 6, 2, 4, 0, -2],
    [0, 0, 0, 2, 4, 2, 0, 0, 0],
    [4, 0, 8, 6, 10, 6, 8, 0, 4],
    [0, 2, 4, 6, 6, 6, 4, 2, 0],
    [0, 0, 2, 6, 6, 6, 2, 0, 0],
];

/// 单个棋子的位置加成
fn positional_bonus(piece: &Piece) -> i32 {
    // 黑方行镜像，查红方视角的表
    let row = match piece.color {
        Color::Red => piece.pos.row,
        Color::Black => 9 - piece.pos.row,
    } as usize;
    let col = piece.pos.col as usize;

    match piece.kind {
        PieceKind::Soldier => SOLDIER_TABLE[row][col],
        PieceKind::Horse => HORSE_TABLE[row][col],
        PieceKind::Chariot => CHARIOT_TABLE[row][col],
        PieceKind::Cannon => CANNON_TABLE[row][col],
        // 士象将守在原地即可，不设位置加成
        PieceKind::Advisor | PieceKind::Elephant | PieceKind::General => 0,
    }
}

/// 评估整个局面，正值利红、负值利黑
pub fn evaluate(board: &Board) -> i32 {
    let mut score = 0;
    for (_, piece) in board.live_pieces() {
        let value = base_value(piece.kind) + positional_bonus(piece);
        match piece.color {
            Color::Red => score += value,
            Color::Black => score -= value,
        }
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::decode;

    #[test]
    fn test_initial_position_is_balanced() {
        assert_eq!(evaluate(&Board::initial()), 0);
    }

    #[test]
    fn test_material_advantage_dominates() {
        // 红多一个车
        let board = decode("4k4/9/9/9/9/9/9/9/4R4/4K4").unwrap();
        assert!(evaluate(&board) > 800);

        // 黑多一个炮
        let board = decode("4k4/9/4c4/9/9/9/9/9/9/4K4").unwrap();
        assert!(evaluate(&board) < -400);
    }

    #[test]
    fn test_crossed_soldier_worth_more() {
        // 过河兵比未动的兵位置分高
        let home = decode("4k4/9/9/9/9/9/4P4/9/9/4K4").unwrap();
        let crossed = decode("4k4/9/4P4/9/9/9/9/9/9/4K4").unwrap();
        assert!(evaluate(&crossed) > evaluate(&home));
    }

    #[test]
    fn test_evaluation_is_side_symmetric() {
        // 完全镜像的局面评估为零
        let board = decode("4k4/9/9/4p4/9/9/4P4/9/9/4K4").unwrap();
        assert_eq!(evaluate(&board), 0);
    }
}
