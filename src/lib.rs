//! 中国象棋规则引擎与 AI
//!
//! 完整的明棋规则（含将帅对脸、送将、重复局面禁手与终局判定）、
//! 局面评估、开局库以及固定深度 Alpha-Beta 搜索，支持 FEN 输入输出。

pub mod board;
pub mod book;
pub mod engine;
pub mod eval;
pub mod fen;
pub mod rules;
pub mod search;
pub mod types;

pub use board::{Board, Piece};
pub use engine::GameEngine;
pub use eval::evaluate;
pub use fen::{decode, encode, FenError, START_FEN};
pub use search::{choose_ai_move, request_ai_move, Searcher, DEFAULT_DEPTH};
pub use types::{Color, GameState, Move, PieceId, PieceKind, Position};
