//! 对抗搜索
//!
//! 固定深度 Minimax + Alpha-Beta 剪枝。红方取最大值、黑方取最小值。
//! 搜索只在私有的引擎克隆上试走：根节点先排除重复禁手，随机打乱后
//! 按"吃子优先"稳定排序做简易着法排序。每次 perform_move_unchecked
//! 都与一次 undo_move_unchecked 严格配对，递归返回时沙盒棋盘
//! 恢复到进入前的状态。
//!
//! AI 走子请求在独立工作线程上执行：短临界区内克隆活引擎做原子
//! 快照，搜索结束后把结果走法经由 select + try_move 的人类路径
//! 落回真实对局，生产合法性检查因此最后再兜底一次。

use crate::book;
use crate::engine::GameEngine;
use crate::eval;
use crate::types::{Color, GameState, Move, Position};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

/// 胜负哨兵：远大于任何子力分差
const WIN_SCORE: i32 = 1_000_000;

/// 默认搜索深度
pub const DEFAULT_DEPTH: u32 = 3;

/// 搜索器：独占一个引擎沙盒
pub struct Searcher {
    engine: GameEngine,
    rng: StdRng,
}

impl Searcher {
    /// 接管一个引擎克隆作为沙盒；seed 固定时搜索结果可复现
    pub fn new(engine: GameEngine, seed: Option<u64>) -> Searcher {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Searcher { engine, rng }
    }

    /// 搜索当前行棋方的最佳走法
    pub fn find_best_move(&mut self, depth: u32) -> Option<(Position, Position)> {
        if self.engine.check_and_update_game_state().is_over() {
            return None;
        }
        let color = self.engine.side_to_move();
        let maximizing = color == Color::Red;

        let mut moves = self.engine.all_legal_moves(color);
        // 根节点排除重复禁手，落子时不会再被拒绝
        moves.retain(|mv| !self.engine.is_prohibited_move(mv));
        // 打乱增加变化，再把吃子稳定排到前面
        moves.shuffle(&mut self.rng);
        moves.sort_by_key(|mv| !mv.is_capture());

        let mut alpha = i32::MIN;
        let mut beta = i32::MAX;
        let mut best_move: Option<Move> = None;
        let mut best_value = if maximizing { i32::MIN } else { i32::MAX };

        for mv in moves {
            self.engine.perform_move_unchecked(&mv);
            let value = self.minimax(depth.saturating_sub(1), !maximizing, alpha, beta);
            self.engine.undo_move_unchecked();

            if maximizing {
                if best_move.is_none() || value > best_value {
                    best_value = value;
                    best_move = Some(mv);
                }
                alpha = alpha.max(best_value);
            } else {
                if best_move.is_none() || value < best_value {
                    best_value = value;
                    best_move = Some(mv);
                }
                beta = beta.min(best_value);
            }
            if beta <= alpha {
                break;
            }
        }

        log::debug!(
            "search depth {} for {}: best value {}",
            depth,
            color,
            best_value
        );
        best_move.map(|mv| (mv.from, mv.to))
    }

    /// Minimax 递归（Alpha-Beta 剪枝）
    fn minimax(&mut self, depth: u32, maximizing: bool, mut alpha: i32, mut beta: i32) -> i32 {
        if depth == 0 {
            return eval::evaluate(self.engine.board());
        }

        match self.engine.check_and_update_game_state() {
            GameState::RedWins => return WIN_SCORE,
            GameState::BlackWins => return -WIN_SCORE,
            GameState::RedWinsNoCheck | GameState::BlackWinsNoCheck => return 0,
            GameState::Playing => {}
        }

        let moves = self.engine.all_legal_moves(self.engine.side_to_move());
        if moves.is_empty() {
            // 终局判定已排除无子可走，这里只是兜底
            return 0;
        }

        if maximizing {
            let mut best = i32::MIN;
            for mv in moves {
                self.engine.perform_move_unchecked(&mv);
                best = best.max(self.minimax(depth - 1, false, alpha, beta));
                self.engine.undo_move_unchecked();
                alpha = alpha.max(best);
                if beta <= alpha {
                    break;
                }
            }
            best
        } else {
            let mut best = i32::MAX;
            for mv in moves {
                self.engine.perform_move_unchecked(&mv);
                best = best.min(self.minimax(depth - 1, true, alpha, beta));
                self.engine.undo_move_unchecked();
                beta = beta.min(best);
                if beta <= alpha {
                    break;
                }
            }
            best
        }
    }
}

/// 为当前局面挑一步 AI 走法：先查开局库，未命中或校验失败则搜索
///
/// 不会改动传入的引擎，所有试走发生在内部克隆上。
pub fn choose_ai_move(
    engine: &GameEngine,
    depth: u32,
    seed: Option<u64>,
) -> Option<(Position, Position)> {
    if engine.game_state().is_over() {
        return None;
    }

    let mut sandbox = engine.clone();
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    // 开局库命中后仍须对照现行合法走法校验，不一致按未命中处理
    if let Some((from, to)) = book::lookup(&sandbox.encode_position(), &mut rng) {
        let color = sandbox.side_to_move();
        let validated = sandbox
            .all_legal_moves(color)
            .into_iter()
            .find(|mv| mv.from == from && mv.to == to)
            .filter(|mv| !sandbox.is_prohibited_move(mv));
        if let Some(mv) = validated {
            log::info!("opening book hit: {}", mv);
            return Some((mv.from, mv.to));
        }
        log::debug!("opening book candidate failed validation, falling back to search");
    }

    Searcher::new(sandbox, seed).find_best_move(depth)
}

/// 在工作线程上请求一步 AI 走法
///
/// 克隆在短临界区内完成（唯一的写者是持锁的 UI 侧），此后搜索
/// 完全独立于活引擎；结果经 select + try_move 落子，返回实际
/// 落子的坐标。活引擎在等待期间应由调用方禁用棋盘交互。
pub fn request_ai_move(
    game: Arc<Mutex<GameEngine>>,
    depth: u32,
    seed: Option<u64>,
) -> JoinHandle<Option<(i8, i8, i8, i8)>> {
    thread::spawn(move || {
        let snapshot = { game.lock().unwrap().clone() };
        let (from, to) = choose_ai_move(&snapshot, depth, seed)?;

        let mut live = game.lock().unwrap();
        if !live.select_piece(from.row, from.col) {
            return None;
        }
        if !live.try_move(to.row, to.col) {
            return None;
        }
        Some((from.row, from.col, to.row, to.col))
    })
}
