//! 棋盘数据模型
//!
//! 棋子存放在仓库（arena）里，90 格数组记录占位情况。
//! 被吃的棋子保留在仓库中但不在格子上，悔棋时按标识放回。
//! 棋盘本身只负责空间查询和摆放，不包含任何走法规则。

use crate::types::{Color, PieceId, PieceKind, Position};

/// 棋子
#[derive(Debug, Clone, Copy)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub pos: Position,
}

/// 棋盘
///
/// 克隆即深拷贝：仓库整体复制后与原棋盘完全隔离，
/// 搜索沙盒可以放心改动而不影响真实对局。
#[derive(Clone, Debug)]
pub struct Board {
    /// 棋子仓库，下标即 PieceId
    pieces: Vec<Piece>,
    /// 90 个格子的占位数组（10 行 x 9 列）
    grid: [Option<PieceId>; 90],
}

impl Board {
    /// 创建空棋盘
    pub fn empty() -> Board {
        Board {
            pieces: Vec::with_capacity(32),
            grid: [None; 90],
        }
    }

    /// 创建初始局面
    pub fn initial() -> Board {
        let mut board = Board::empty();

        // 黑方（上方，row 0-4）
        board.spawn(PieceKind::Chariot, Color::Black, Position::new(0, 0));
        board.spawn(PieceKind::Horse, Color::Black, Position::new(0, 1));
        board.spawn(PieceKind::Elephant, Color::Black, Position::new(0, 2));
        board.spawn(PieceKind::Advisor, Color::Black, Position::new(0, 3));
        board.spawn(PieceKind::General, Color::Black, Position::new(0, 4));
        board.spawn(PieceKind::Advisor, Color::Black, Position::new(0, 5));
        board.spawn(PieceKind::Elephant, Color::Black, Position::new(0, 6));
        board.spawn(PieceKind::Horse, Color::Black, Position::new(0, 7));
        board.spawn(PieceKind::Chariot, Color::Black, Position::new(0, 8));
        board.spawn(PieceKind::Cannon, Color::Black, Position::new(2, 1));
        board.spawn(PieceKind::Cannon, Color::Black, Position::new(2, 7));
        for col in [0, 2, 4, 6, 8] {
            board.spawn(PieceKind::Soldier, Color::Black, Position::new(3, col));
        }

        // 红方（下方，row 5-9）
        board.spawn(PieceKind::Chariot, Color::Red, Position::new(9, 0));
        board.spawn(PieceKind::Horse, Color::Red, Position::new(9, 1));
        board.spawn(PieceKind::Elephant, Color::Red, Position::new(9, 2));
        board.spawn(PieceKind::Advisor, Color::Red, Position::new(9, 3));
        board.spawn(PieceKind::General, Color::Red, Position::new(9, 4));
        board.spawn(PieceKind::Advisor, Color::Red, Position::new(9, 5));
        board.spawn(PieceKind::Elephant, Color::Red, Position::new(9, 6));
        board.spawn(PieceKind::Horse, Color::Red, Position::new(9, 7));
        board.spawn(PieceKind::Chariot, Color::Red, Position::new(9, 8));
        board.spawn(PieceKind::Cannon, Color::Red, Position::new(7, 1));
        board.spawn(PieceKind::Cannon, Color::Red, Position::new(7, 7));
        for col in [0, 2, 4, 6, 8] {
            board.spawn(PieceKind::Soldier, Color::Red, Position::new(6, col));
        }

        board
    }

    /// 新建一个棋子并放上棋盘
    pub fn spawn(&mut self, kind: PieceKind, color: Color, pos: Position) -> PieceId {
        debug_assert!(pos.is_valid());
        debug_assert!(self.grid[pos.to_index()].is_none());
        let id = PieceId(self.pieces.len());
        self.pieces.push(Piece { kind, color, pos });
        self.grid[pos.to_index()] = Some(id);
        id
    }

    /// 获取某格子上的棋子标识
    #[inline]
    pub fn piece_at(&self, pos: Position) -> Option<PieceId> {
        if !pos.is_valid() {
            return None;
        }
        self.grid[pos.to_index()]
    }

    /// 按标识读取棋子
    #[inline]
    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.0]
    }

    /// 格子上是否有棋子
    #[inline]
    pub fn is_occupied(&self, pos: Position) -> bool {
        pos.is_valid() && self.grid[pos.to_index()].is_some()
    }

    /// 该棋子当前是否在棋盘上（未被吃）
    #[inline]
    pub fn is_on_board(&self, id: PieceId) -> bool {
        let pos = self.pieces[id.0].pos;
        self.grid[pos.to_index()] == Some(id)
    }

    /// 遍历棋盘上的所有棋子
    pub fn live_pieces(&self) -> impl Iterator<Item = (PieceId, &Piece)> {
        self.grid
            .iter()
            .filter_map(move |cell| cell.map(|id| (id, &self.pieces[id.0])))
    }

    /// 某一方在棋盘上的所有棋子
    pub fn pieces_of(&self, color: Color) -> Vec<PieceId> {
        self.live_pieces()
            .filter(|(_, p)| p.color == color)
            .map(|(id, _)| id)
            .collect()
    }

    /// 找到某方将/帅的位置
    pub fn find_general(&self, color: Color) -> Option<Position> {
        self.live_pieces()
            .find(|(_, p)| p.kind == PieceKind::General && p.color == color)
            .map(|(_, p)| p.pos)
    }

    /// 把棋子从格子上拿下来（吃子）
    ///
    /// 棋子留在仓库中，位置字段保持被吃时的值，供悔棋放回。
    pub fn lift(&mut self, id: PieceId) {
        let pos = self.pieces[id.0].pos;
        debug_assert_eq!(self.grid[pos.to_index()], Some(id));
        self.grid[pos.to_index()] = None;
    }

    /// 把仓库中的棋子放回它记录的位置（悔棋恢复被吃子）
    pub fn restore(&mut self, id: PieceId) {
        let pos = self.pieces[id.0].pos;
        debug_assert!(self.grid[pos.to_index()].is_none());
        self.grid[pos.to_index()] = Some(id);
    }

    /// 把棋子移到新格子
    ///
    /// 目标格子必须为空：吃子时先 lift 被吃子再 relocate。
    pub fn relocate(&mut self, id: PieceId, to: Position) {
        debug_assert!(to.is_valid());
        let from = self.pieces[id.0].pos;
        debug_assert_eq!(self.grid[from.to_index()], Some(id));
        debug_assert!(self.grid[to.to_index()].is_none());
        self.grid[from.to_index()] = None;
        self.grid[to.to_index()] = Some(id);
        self.pieces[id.0].pos = to;
    }

    /// 棋盘上的棋子总数
    pub fn piece_count(&self) -> usize {
        self.grid.iter().filter(|c| c.is_some()).count()
    }
}
