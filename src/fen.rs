//! 局面编码（FEN）
//!
//! 把棋盘压缩成一行字符串：从 row 0（黑方底线）到 row 9 逐行编码，
//! 行之间用 `/` 分隔，数字表示连续空格数，红方大写、黑方小写。
//! 字母映射：K 将/帅 A 士 B 象 N 马 R 车 C 炮 P 兵。
//!
//! 编码串既是重复局面检测的键，也是开局库的查询键，
//! 还可以用来装载手工摆放的残局。

use crate::board::Board;
use crate::types::{Color, PieceKind, Position};
use thiserror::Error;

/// 初始局面的编码串
pub const START_FEN: &str = "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR";

/// 编码串解析错误
///
/// 区别于普通的非法走法：编码串坏了说明存档损坏或程序错误，必须响亮地失败。
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FenError {
    #[error("expected 10 ranks, got {0}")]
    BadRankCount(usize),
    #[error("rank {row} covers {cols} columns, expected 9")]
    BadRankWidth { row: usize, cols: usize },
    #[error("invalid piece character: {0:?}")]
    BadPieceChar(char),
}

/// 把棋盘编码为局面串
pub fn encode(board: &Board) -> String {
    let mut ranks = Vec::with_capacity(10);

    for row in 0..10 {
        let mut rank = String::new();
        let mut empty_count = 0;

        for col in 0..9 {
            let pos = Position::new(row, col);
            match board.piece_at(pos) {
                Some(id) => {
                    if empty_count > 0 {
                        rank.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    let piece = board.piece(id);
                    let ch = piece.kind.to_fen_char();
                    rank.push(match piece.color {
                        Color::Red => ch.to_ascii_uppercase(),
                        Color::Black => ch,
                    });
                }
                None => empty_count += 1,
            }
        }

        if empty_count > 0 {
            rank.push_str(&empty_count.to_string());
        }
        ranks.push(rank);
    }

    ranks.join("/")
}

/// 从局面串还原棋盘
pub fn decode(fen: &str) -> Result<Board, FenError> {
    let ranks: Vec<&str> = fen.split('/').collect();
    if ranks.len() != 10 {
        return Err(FenError::BadRankCount(ranks.len()));
    }

    let mut board = Board::empty();

    for (row, rank) in ranks.iter().enumerate() {
        let mut col: i8 = 0;

        for ch in rank.chars() {
            if let Some(d) = ch.to_digit(10) {
                col += d as i8;
            } else {
                let kind = PieceKind::from_fen_char(ch).ok_or(FenError::BadPieceChar(ch))?;
                let color = if ch.is_ascii_uppercase() {
                    Color::Red
                } else {
                    Color::Black
                };
                if col >= 9 {
                    return Err(FenError::BadRankWidth {
                        row,
                        cols: col as usize + 1,
                    });
                }
                board.spawn(kind, color, Position::new(row as i8, col));
                col += 1;
            }
        }

        if col != 9 {
            return Err(FenError::BadRankWidth {
                row,
                cols: col as usize,
            });
        }
    }

    Ok(board)
}
