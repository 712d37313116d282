//! 对局引擎
//!
//! 管理回合、选子、走子与悔棋。单子几何规则由 rules 提供，
//! 引擎在其上叠加全局合法性：送将禁止、将帅对脸禁止、
//! 重复局面（长将/长捉）禁止，并在每步之后判定终局。
//!
//! 所有非法输入一律返回 false 且不改动任何状态，这是交互
//! 过程中的正常结果，不是错误。

use crate::board::Board;
use crate::fen;
use crate::rules;
use crate::types::{Color, GameState, Move, PieceId, Position};

/// 对局引擎
///
/// 克隆即得到一个完全隔离的沙盒（棋盘、回合、两份历史全部复制），
/// 搜索在沙盒上任意试走都不影响真实对局。
#[derive(Clone)]
pub struct GameEngine {
    board: Board,
    turn: Color,
    selected: Option<PieceId>,
    state: GameState,
    /// 悔棋日志：每步一条，后进先出
    move_history: Vec<Move>,
    /// 每步之后的局面编码串，用于重复局面检测；吃子后清空
    position_history: Vec<String>,
}

impl GameEngine {
    /// 以初始局面开局
    pub fn new() -> GameEngine {
        let board = Board::initial();
        let seed = fen::encode(&board);
        GameEngine {
            board,
            turn: Color::Red,
            selected: None,
            state: GameState::Playing,
            move_history: Vec::new(),
            position_history: vec![seed],
        }
    }

    /// 从局面编码串装载（残局、测试局面）
    pub fn from_fen(fen_str: &str, turn: Color) -> Result<GameEngine, fen::FenError> {
        let board = fen::decode(fen_str)?;
        let seed = fen::encode(&board);
        let mut engine = GameEngine {
            board,
            turn,
            selected: None,
            state: GameState::Playing,
            move_history: Vec::new(),
            position_history: vec![seed],
        };
        // 装载的局面可能本身已是终局
        engine.check_and_update_game_state();
        Ok(engine)
    }

    /// 重新开局
    pub fn restart(&mut self) {
        self.board = Board::initial();
        self.turn = Color::Red;
        self.selected = None;
        self.state = GameState::Playing;
        self.move_history.clear();
        self.position_history.clear();
        self.position_history.push(fen::encode(&self.board));
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.turn
    }

    #[inline]
    pub fn game_state(&self) -> GameState {
        self.state
    }

    /// 当前选中的棋子
    #[inline]
    pub fn selected_piece(&self) -> Option<PieceId> {
        self.selected
    }

    /// 最近一步已落子的走法
    #[inline]
    pub fn last_move(&self) -> Option<Move> {
        self.move_history.last().copied()
    }

    /// 局面历史（测试与调试用）
    pub fn position_history(&self) -> &[String] {
        &self.position_history
    }

    /// 当前局面的编码串
    pub fn encode_position(&self) -> String {
        fen::encode(&self.board)
    }

    /// 选中某格子上属于行棋方的棋子
    pub fn select_piece(&mut self, row: i8, col: i8) -> bool {
        let pos = Position::new(row, col);
        match self.board.piece_at(pos) {
            Some(id) if self.board.piece(id).color == self.turn => {
                self.selected = Some(id);
                true
            }
            _ => false,
        }
    }

    /// 取消选中
    pub fn cancel_selection(&mut self) {
        self.selected = None;
    }

    /// 尝试把选中的棋子走到目标格子
    ///
    /// 依次检查：单子几何规则、送将、将帅对脸、重复局面禁手。
    /// 全部通过才落子：记录走法、更新局面历史、换边并判定终局。
    pub fn try_move(&mut self, row: i8, col: i8) -> bool {
        if self.state.is_over() {
            return false;
        }
        let Some(selected) = self.selected else {
            return false;
        };
        let target = Position::new(row, col);
        if !rules::can_move_to(&self.board, selected, target) {
            return false;
        }

        let mover = self.board.piece(selected).color;
        let mv = Move::new(
            selected,
            self.board.piece(selected).pos,
            target,
            self.board.piece_at(target),
        );

        // 模拟走子检查全局约束，之后无论结果如何都先恢复
        self.apply_move(&mv);
        let illegal = self.is_checked(mover) || self.generals_facing();
        self.revert_move(&mv);
        if illegal {
            return false;
        }

        if self.is_prohibited_move(&mv) {
            return false;
        }

        // 正式落子
        self.apply_move(&mv);
        self.move_history.push(mv);
        if mv.is_capture() {
            // 吃子后兵力变化，此前的局面不可能再现，重复计数清零
            self.position_history.clear();
        }
        self.position_history.push(fen::encode(&self.board));
        self.selected = None;
        self.turn = self.turn.opposite();
        self.check_and_update_game_state();
        true
    }

    /// 悔一步棋：恢复棋盘、回合与局面历史
    pub fn undo_move(&mut self) -> bool {
        let Some(mv) = self.move_history.pop() else {
            return false;
        };
        self.revert_move(&mv);
        self.turn = self.turn.opposite();
        self.selected = None;
        self.position_history.pop();
        self.state = GameState::Playing;
        self.check_and_update_game_state();
        true
    }

    /// 检查某方是否被将军
    pub fn is_checked(&self, color: Color) -> bool {
        let target = self.general_position(color);
        self.board
            .pieces_of(color.opposite())
            .into_iter()
            .any(|id| rules::can_move_to(&self.board, id, target))
    }

    /// 某方是否还有至少一步合法走法
    ///
    /// 合法 = 单子规则 + 不送将 + 不对脸。重复禁手故意不参与：
    /// 它只封杀具体的某步，不参与"是否无路可走"的判定。
    pub fn has_any_legal_move(&mut self, color: Color) -> bool {
        for id in self.board.pieces_of(color) {
            for idx in 0..90 {
                if self.is_move_legal(id, Position::from_index(idx)) {
                    return true;
                }
            }
        }
        false
    }

    /// 单步合法性：几何规则 + 不送将 + 不对脸
    pub fn is_move_legal(&mut self, id: PieceId, target: Position) -> bool {
        if !rules::can_move_to(&self.board, id, target) {
            return false;
        }
        let mv = Move::new(id, self.board.piece(id).pos, target, self.board.piece_at(target));
        let color = self.board.piece(id).color;
        self.apply_move(&mv);
        let ok = !self.is_checked(color) && !self.generals_facing();
        self.revert_move(&mv);
        ok
    }

    /// 枚举某方的全部合法走法（搜索的展开原语）
    pub fn all_legal_moves(&mut self, color: Color) -> Vec<Move> {
        let mut moves = Vec::with_capacity(48);
        for id in self.board.pieces_of(color) {
            for idx in 0..90 {
                let target = Position::from_index(idx);
                if self.is_move_legal(id, target) {
                    let mv = Move::new(
                        id,
                        self.board.piece(id).pos,
                        target,
                        self.board.piece_at(target),
                    );
                    moves.push(mv);
                }
            }
        }
        moves
    }

    /// 重复局面禁手：模拟走子后的局面若已在历史中出现过两次，
    /// 第三次出现即被禁止。造成将军的记为长将，否则记为普通重复。
    pub fn is_prohibited_move(&mut self, mv: &Move) -> bool {
        self.apply_move(mv);
        let encoded = fen::encode(&self.board);
        let occurrences = self
            .position_history
            .iter()
            .filter(|p| p.as_str() == encoded)
            .count();
        let prohibited = occurrences >= 2;
        if prohibited {
            let mover = self.board.piece(mv.piece).color;
            if self.is_checked(mover.opposite()) {
                log::warn!("prohibited move {}: perpetual check by {}", mv, mover);
            } else {
                log::warn!("prohibited move {}: repeated position", mv);
            }
        }
        self.revert_move(mv);
        prohibited
    }

    /// 判定并更新对局状态；每次落子和悔棋之后调用
    ///
    /// 行棋方无路可走：被将军为将死，否则为困毙（NoCheck 胜）。
    /// 有路可走则回到 Playing。
    pub fn check_and_update_game_state(&mut self) -> GameState {
        let to_move = self.turn;
        self.state = if self.has_any_legal_move(to_move) {
            GameState::Playing
        } else if self.is_checked(to_move) {
            match to_move {
                Color::Red => GameState::BlackWins,
                Color::Black => GameState::RedWins,
            }
        } else {
            match to_move {
                Color::Red => GameState::BlackWinsNoCheck,
                Color::Black => GameState::RedWinsNoCheck,
            }
        };
        self.state
    }

    /// 直接执行一步走法，不做任何合法性复查（仅供搜索使用）
    ///
    /// 走法必须来自 all_legal_moves。不记录局面历史、不判定终局，
    /// 与 undo_move_unchecked 必须严格配对。
    pub fn perform_move_unchecked(&mut self, mv: &Move) {
        self.apply_move(mv);
        self.move_history.push(*mv);
        self.turn = self.turn.opposite();
    }

    /// 撤销最近一步 unchecked 走法（仅供搜索使用）
    pub fn undo_move_unchecked(&mut self) -> bool {
        let Some(mv) = self.move_history.pop() else {
            return false;
        };
        self.revert_move(&mv);
        self.turn = self.turn.opposite();
        true
    }

    /// 棋盘效果：先提走被吃子，再移动棋子
    fn apply_move(&mut self, mv: &Move) {
        if let Some(captured) = mv.captured {
            self.board.lift(captured);
        }
        self.board.relocate(mv.piece, mv.to);
    }

    /// 棋盘效果的逆：先移回棋子，再放回被吃子
    fn revert_move(&mut self, mv: &Move) {
        self.board.relocate(mv.piece, mv.from);
        if let Some(captured) = mv.captured {
            self.board.restore(captured);
        }
    }

    /// 将帅是否在同一列上直接对脸（中间无子）
    fn generals_facing(&self) -> bool {
        let red = self.general_position(Color::Red);
        let black = self.general_position(Color::Black);
        if red.col != black.col {
            return false;
        }
        let lo = red.row.min(black.row);
        let hi = red.row.max(black.row);
        for row in (lo + 1)..hi {
            if self.board.is_occupied(Position::new(row, red.col)) {
                return false;
            }
        }
        true
    }

    /// 找到某方将/帅的位置；缺失说明内部状态已损坏
    fn general_position(&self, color: Color) -> Position {
        self.board
            .find_general(color)
            .unwrap_or_else(|| panic!("internal inconsistency: {} general missing from board", color))
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        GameEngine::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 完整快照，用于断言"被拒绝的走法不改动任何状态"
    fn snapshot(engine: &GameEngine) -> (String, Color, usize, usize) {
        (
            engine.encode_position(),
            engine.side_to_move(),
            engine.position_history().len(),
            engine.move_history.len(),
        )
    }

    #[test]
    fn test_initial_red_has_44_legal_moves() {
        let mut engine = GameEngine::new();
        assert_eq!(engine.all_legal_moves(Color::Red).len(), 44);
    }

    #[test]
    fn test_select_piece_respects_turn() {
        let mut engine = GameEngine::new();
        // 红方先行：选黑子失败，选空格失败，选红子成功
        assert!(!engine.select_piece(0, 0));
        assert!(!engine.select_piece(4, 4));
        assert!(engine.select_piece(6, 0));
        assert!(engine.selected_piece().is_some());
    }

    #[test]
    fn test_try_move_commits_and_switches_turn() {
        let mut engine = GameEngine::new();
        assert!(engine.select_piece(6, 0));
        assert!(engine.try_move(5, 0));

        assert_eq!(engine.side_to_move(), Color::Black);
        assert!(engine.selected_piece().is_none());
        assert_eq!(engine.game_state(), GameState::Playing);
        assert_eq!(engine.position_history().len(), 2);

        let last = engine.last_move().unwrap();
        assert_eq!(last.from, Position::new(6, 0));
        assert_eq!(last.to, Position::new(5, 0));
        assert!(!last.is_capture());
    }

    #[test]
    fn test_rejected_move_changes_nothing() {
        let mut engine = GameEngine::new();
        assert!(engine.select_piece(6, 0));
        let before = snapshot(&engine);

        // 兵不能横走（未过河）也不能后退
        assert!(!engine.try_move(6, 1));
        assert!(!engine.try_move(7, 0));
        // 完全离谱的目标
        assert!(!engine.try_move(0, 8));

        assert_eq!(snapshot(&engine), before);
        // 选中状态保留，纠正目标后仍可落子
        assert!(engine.try_move(5, 0));
    }

    #[test]
    fn test_try_move_without_selection() {
        let mut engine = GameEngine::new();
        assert!(!engine.try_move(5, 0));
    }

    #[test]
    fn test_cannot_move_into_check() {
        // 黑车在红帅正上方一列，红帅旁边的仕不能离线送将
        let engine = GameEngine::from_fen("4k4/9/9/9/9/9/9/9/4r4/3AK4", Color::Red);
        let mut engine = engine.unwrap();
        // 帅被将军，仕(9,3)上(8,4)吃掉黑车解将
        assert!(engine.is_checked(Color::Red));
        assert!(engine.select_piece(9, 3));
        assert!(engine.try_move(8, 4));
        assert!(!engine.is_checked(Color::Red));
    }

    #[test]
    fn test_generals_facing_rejected() {
        // 红帅平移一步会与黑将对脸
        let mut engine = GameEngine::from_fen("4k4/9/9/9/9/9/9/9/9/3K5", Color::Red).unwrap();
        assert!(engine.select_piece(9, 3));
        assert!(!engine.try_move(9, 4));
        assert!(engine.try_move(8, 3));
    }

    #[test]
    fn test_undo_restores_everything() {
        let mut engine = GameEngine::new();
        let before = snapshot(&engine);

        assert!(engine.select_piece(7, 1));
        assert!(engine.try_move(7, 4));
        assert!(engine.undo_move());

        assert_eq!(snapshot(&engine), before);
        assert!(engine.last_move().is_none());
        assert_eq!(engine.game_state(), GameState::Playing);
    }

    #[test]
    fn test_undo_restores_captured_piece() {
        // 红炮隔子打黑马：炮(7,1)，炮架(2,1)黑炮，目标(0,1)黑马
        let mut engine = GameEngine::new();
        assert!(engine.select_piece(7, 1));
        assert!(engine.try_move(0, 1));
        assert_eq!(engine.board().piece_count(), 31);
        // 吃子清空重复历史后只剩新局面
        assert_eq!(engine.position_history().len(), 1);

        assert!(engine.undo_move());
        assert_eq!(engine.board().piece_count(), 32);
        assert_eq!(engine.encode_position(), fen::START_FEN);
        assert_eq!(engine.side_to_move(), Color::Red);
    }

    #[test]
    fn test_undo_on_empty_history() {
        let mut engine = GameEngine::new();
        assert!(!engine.undo_move());
    }

    #[test]
    fn test_checkmate_yields_red_wins() {
        // 黑将被底线车将死：(0,3)(0,5)被车控制，(1,4)与红帅对脸
        let engine = GameEngine::from_fen("R3k4/9/9/9/9/9/9/9/9/4K4", Color::Black).unwrap();
        assert_eq!(engine.game_state(), GameState::RedWins);

        // 终局后拒绝任何走子
        let mut engine = engine;
        assert!(engine.select_piece(0, 4));
        assert!(!engine.try_move(1, 4));
    }

    #[test]
    fn test_stalemate_yields_no_check_win() {
        // 黑将未被将军但无路可走：(0,3)对脸、(0,5)被车控制、(1,4)被兵控制
        let engine =
            GameEngine::from_fen("4k4/9/4P4/9/9/5R3/9/9/9/3K5", Color::Black).unwrap();
        assert!(!engine.is_checked(Color::Black));
        assert_eq!(engine.game_state(), GameState::RedWinsNoCheck);
    }

    #[test]
    fn test_perpetual_check_prohibited_on_third_occurrence() {
        // 红车在 (5,4)/(5,3) 之间反复将军，黑将在 (0,4)/(0,3) 之间躲避。
        // 同一局面第三次出现时，造成重复的那步被禁止。
        let mut engine = GameEngine::from_fen("4k4/9/9/9/9/4R4/9/9/9/5K3", Color::Black).unwrap();

        let cycle = [
            ((0, 4), (0, 3)), // 黑将躲
            ((5, 4), (5, 3)), // 红车追将
            ((0, 3), (0, 4)), // 黑将回
            ((5, 3), (5, 4)), // 红车回，局面第二次出现
            ((0, 4), (0, 3)),
            ((5, 4), (5, 3)),
            ((0, 3), (0, 4)),
        ];
        for ((fr, fc), (tr, tc)) in cycle {
            assert!(engine.select_piece(fr, fc), "select ({},{})", fr, fc);
            assert!(engine.try_move(tr, tc), "move to ({},{})", tr, tc);
        }

        // 第三次重现同一将军局面：禁止
        assert!(engine.select_piece(5, 3));
        assert!(!engine.try_move(5, 4));
        // 红方改走其他着法仍然可以
        assert!(engine.select_piece(5, 3));
        assert!(engine.try_move(4, 3));
    }

    #[test]
    fn test_unchecked_pair_restores_board() {
        let mut engine = GameEngine::new();
        let before = engine.encode_position();
        let moves = engine.all_legal_moves(Color::Red);

        for mv in &moves {
            engine.perform_move_unchecked(mv);
            assert_eq!(engine.side_to_move(), Color::Black);
            engine.undo_move_unchecked();
            assert_eq!(engine.encode_position(), before);
            assert_eq!(engine.side_to_move(), Color::Red);
        }
    }

    #[test]
    fn test_restart_resets_state() {
        let mut engine = GameEngine::new();
        assert!(engine.select_piece(6, 0));
        assert!(engine.try_move(5, 0));

        engine.restart();
        assert_eq!(engine.encode_position(), fen::START_FEN);
        assert_eq!(engine.side_to_move(), Color::Red);
        assert!(engine.last_move().is_none());
        assert_eq!(engine.position_history().len(), 1);
    }
}
