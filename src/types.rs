//! 象棋核心类型定义
//!
//! 定义棋盘坐标、棋子种类、走法记录等基础数据类型

use std::fmt;

/// 棋子颜色/阵营
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Black,
}

impl Color {
    /// 获取对方阵营
    pub fn opposite(&self) -> Color {
        match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }

    /// 从字符解析（'r'/'b'）
    pub fn from_char(c: char) -> Option<Color> {
        match c {
            'r' => Some(Color::Red),
            'b' => Some(Color::Black),
            _ => None,
        }
    }

    /// 转换为字符
    pub fn to_char(&self) -> char {
        match self {
            Color::Red => 'r',
            Color::Black => 'b',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Red => write!(f, "Red"),
            Color::Black => write!(f, "Black"),
        }
    }
}

/// 棋子种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    /// 将/帅
    General,
    /// 士/仕
    Advisor,
    /// 象/相
    Elephant,
    /// 马
    Horse,
    /// 车
    Chariot,
    /// 炮
    Cannon,
    /// 卒/兵
    Soldier,
}

impl PieceKind {
    /// 从 FEN 字符解析（不区分大小写）
    pub fn from_fen_char(c: char) -> Option<PieceKind> {
        match c.to_ascii_lowercase() {
            'k' => Some(PieceKind::General),
            'a' => Some(PieceKind::Advisor),
            'b' => Some(PieceKind::Elephant),
            'n' => Some(PieceKind::Horse),
            'r' => Some(PieceKind::Chariot),
            'c' => Some(PieceKind::Cannon),
            'p' => Some(PieceKind::Soldier),
            _ => None,
        }
    }

    /// 转换为 FEN 字符（小写）
    pub fn to_fen_char(&self) -> char {
        match self {
            PieceKind::General => 'k',
            PieceKind::Advisor => 'a',
            PieceKind::Elephant => 'b',
            PieceKind::Horse => 'n',
            PieceKind::Chariot => 'r',
            PieceKind::Cannon => 'c',
            PieceKind::Soldier => 'p',
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceKind::General => "General",
            PieceKind::Advisor => "Advisor",
            PieceKind::Elephant => "Elephant",
            PieceKind::Horse => "Horse",
            PieceKind::Chariot => "Chariot",
            PieceKind::Cannon => "Cannon",
            PieceKind::Soldier => "Soldier",
        };
        write!(f, "{}", name)
    }
}

/// 棋盘位置 (row, col)
///
/// row: 0-9（0 是黑方底线，9 是红方底线）
/// col: 0-8（从左到右）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: i8,
    pub col: i8,
}

impl Position {
    pub fn new(row: i8, col: i8) -> Self {
        Position { row, col }
    }

    /// 检查位置是否在棋盘范围内
    #[inline]
    pub fn is_valid(&self) -> bool {
        (0..=9).contains(&self.row) && (0..=8).contains(&self.col)
    }

    /// 检查位置是否在九宫格内
    pub fn in_palace(&self, color: Color) -> bool {
        if !(3..=5).contains(&self.col) {
            return false;
        }
        match color {
            Color::Red => (7..=9).contains(&self.row),
            Color::Black => (0..=2).contains(&self.row),
        }
    }

    /// 检查位置是否在己方半场（未过河）
    pub fn on_own_side(&self, color: Color) -> bool {
        match color {
            Color::Red => (5..=9).contains(&self.row),
            Color::Black => (0..=4).contains(&self.row),
        }
    }

    /// 位置加偏移量
    #[inline]
    pub fn offset(&self, row_delta: i8, col_delta: i8) -> Position {
        Position {
            row: self.row + row_delta,
            col: self.col + col_delta,
        }
    }

    /// 转换为 90 格数组下标
    #[inline]
    pub fn to_index(&self) -> usize {
        (self.row as usize) * 9 + (self.col as usize)
    }

    /// 从数组下标还原位置
    #[inline]
    pub fn from_index(idx: usize) -> Position {
        Position {
            row: (idx / 9) as i8,
            col: (idx % 9) as i8,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// 棋子标识：指向棋子仓库（arena）的下标
///
/// 克隆棋盘时仓库整体复制，标识在克隆内保持有效。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceId(pub usize);

/// 走法记录
///
/// 同时用作悔棋日志和搜索的应用/撤销单元。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    /// 移动的棋子
    pub piece: PieceId,
    pub from: Position,
    pub to: Position,
    /// 被吃的棋子（走子时记录）
    pub captured: Option<PieceId>,
}

impl Move {
    pub fn new(piece: PieceId, from: Position, to: Position, captured: Option<PieceId>) -> Self {
        Move {
            piece,
            from,
            to,
            captured,
        }
    }

    /// 是否为吃子走法
    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{} -> {},{}",
            self.from.row, self.from.col, self.to.row, self.to.col
        )
    }
}

/// 对局状态
///
/// NoCheck 变体表示对方困毙（无子可动但未被将军）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    RedWins,
    BlackWins,
    RedWinsNoCheck,
    BlackWinsNoCheck,
}

impl GameState {
    /// 对局是否已结束
    #[inline]
    pub fn is_over(&self) -> bool {
        *self != GameState::Playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_index_roundtrip() {
        for row in 0..10 {
            for col in 0..9 {
                let pos = Position::new(row, col);
                assert_eq!(Position::from_index(pos.to_index()), pos);
            }
        }
    }

    #[test]
    fn test_palace_bounds() {
        assert!(Position::new(9, 4).in_palace(Color::Red));
        assert!(Position::new(7, 3).in_palace(Color::Red));
        assert!(!Position::new(6, 4).in_palace(Color::Red));
        assert!(!Position::new(9, 2).in_palace(Color::Red));

        assert!(Position::new(0, 4).in_palace(Color::Black));
        assert!(Position::new(2, 5).in_palace(Color::Black));
        assert!(!Position::new(3, 4).in_palace(Color::Black));
    }

    #[test]
    fn test_river_sides() {
        assert!(Position::new(5, 0).on_own_side(Color::Red));
        assert!(!Position::new(4, 0).on_own_side(Color::Red));
        assert!(Position::new(4, 8).on_own_side(Color::Black));
        assert!(!Position::new(5, 8).on_own_side(Color::Black));
    }

    #[test]
    fn test_fen_char_roundtrip() {
        for kind in [
            PieceKind::General,
            PieceKind::Advisor,
            PieceKind::Elephant,
            PieceKind::Horse,
            PieceKind::Chariot,
            PieceKind::Cannon,
            PieceKind::Soldier,
        ] {
            assert_eq!(PieceKind::from_fen_char(kind.to_fen_char()), Some(kind));
        }
    }
}
