//! 棋子走法规则
//!
//! 每种棋子一个纯判定函数：给定起点棋子、目标格子和棋盘，
//! 判断这步棋在单子几何规则上是否合法。不修改棋盘，
//! 不考虑送将/将帅对脸/长打等全局约束（由 engine 叠加）。

use crate::board::Board;
use crate::types::{Color, PieceId, PieceKind, Position};

/// 判断棋子能否走到目标格子（单子几何规则）
pub fn can_move_to(board: &Board, id: PieceId, target: Position) -> bool {
    let piece = board.piece(id);
    let from = piece.pos;

    // 共同前置条件：目标在棋盘内、不是原地、不吃自己的子
    if !target.is_valid() || target == from {
        return false;
    }
    if let Some(occupant) = board.piece_at(target) {
        if board.piece(occupant).color == piece.color {
            return false;
        }
    }

    match piece.kind {
        PieceKind::General => general_can_move(piece.color, from, target),
        PieceKind::Advisor => advisor_can_move(piece.color, from, target),
        PieceKind::Elephant => elephant_can_move(board, piece.color, from, target),
        PieceKind::Horse => horse_can_move(board, from, target),
        PieceKind::Chariot => chariot_can_move(board, from, target),
        PieceKind::Cannon => cannon_can_move(board, from, target),
        PieceKind::Soldier => soldier_can_move(piece.color, from, target),
    }
}

/// 将/帅：九宫内走一步直线
fn general_can_move(color: Color, from: Position, target: Position) -> bool {
    let row_diff = (target.row - from.row).abs();
    let col_diff = (target.col - from.col).abs();
    row_diff + col_diff == 1 && target.in_palace(color)
}

/// 士/仕：九宫内走一步斜线
fn advisor_can_move(color: Color, from: Position, target: Position) -> bool {
    let row_diff = (target.row - from.row).abs();
    let col_diff = (target.col - from.col).abs();
    row_diff == 1 && col_diff == 1 && target.in_palace(color)
}

/// 象/相：走田字，象眼无子，不过河
fn elephant_can_move(board: &Board, color: Color, from: Position, target: Position) -> bool {
    let row_diff = target.row - from.row;
    let col_diff = target.col - from.col;
    if row_diff.abs() != 2 || col_diff.abs() != 2 {
        return false;
    }
    if !target.on_own_side(color) {
        return false;
    }
    // 象眼：田字对角线的中点
    let eye = from.offset(row_diff / 2, col_diff / 2);
    !board.is_occupied(eye)
}

/// 马：走日字，马腿无子
fn horse_can_move(board: &Board, from: Position, target: Position) -> bool {
    let row_diff = target.row - from.row;
    let col_diff = target.col - from.col;

    let leg = if row_diff.abs() == 2 && col_diff.abs() == 1 {
        // 先竖走一格，马腿在竖直方向中点
        from.offset(row_diff / 2, 0)
    } else if row_diff.abs() == 1 && col_diff.abs() == 2 {
        // 先横走一格，马腿在横向方向中点
        from.offset(0, col_diff / 2)
    } else {
        return false;
    };

    !board.is_occupied(leg)
}

/// 车：直线任意距离，路径无阻挡
fn chariot_can_move(board: &Board, from: Position, target: Position) -> bool {
    if from.row != target.row && from.col != target.col {
        return false;
    }
    pieces_between(board, from, target) == 0
}

/// 炮：移动同车；吃子时起点和终点之间必须恰好隔一个炮架
fn cannon_can_move(board: &Board, from: Position, target: Position) -> bool {
    if from.row != target.row && from.col != target.col {
        return false;
    }
    let screens = pieces_between(board, from, target);
    if board.is_occupied(target) {
        screens == 1
    } else {
        screens == 0
    }
}

/// 兵/卒：过河前只能前进一步，过河后可横走一步，永不后退
fn soldier_can_move(color: Color, from: Position, target: Position) -> bool {
    let row_diff = target.row - from.row;
    let col_diff = (target.col - from.col).abs();

    // 红兵向上（row 减小），黑卒向下（row 增大）
    let forward: i8 = match color {
        Color::Red => -1,
        Color::Black => 1,
    };

    if row_diff == forward && col_diff == 0 {
        return true;
    }

    // 过了河才能横走
    let crossed = !from.on_own_side(color);
    crossed && row_diff == 0 && col_diff == 1
}

/// 统计直线上起点和终点之间（不含两端）的棋子数
fn pieces_between(board: &Board, from: Position, to: Position) -> usize {
    let mut count = 0;
    if from.row == to.row {
        let start = from.col.min(to.col) + 1;
        let end = from.col.max(to.col);
        for col in start..end {
            if board.is_occupied(Position::new(from.row, col)) {
                count += 1;
            }
        }
    } else {
        let start = from.row.min(to.row) + 1;
        let end = from.row.max(to.row);
        for row in start..end {
            if board.is_occupied(Position::new(row, from.col)) {
                count += 1;
            }
        }
    }
    count
}
