//! 象棋引擎 CLI
//!
//! 支持两种模式：
//! 1. 单次命令模式：每次执行一个命令
//! 2. Server 模式：长驻进程，通过 stdin/stdout 逐行交换 JSON

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};
use std::time::Instant;
use xiangqi_engine::{
    choose_ai_move, evaluate, Color, GameEngine, GameState, DEFAULT_DEPTH, START_FEN,
};

#[derive(Parser)]
#[command(name = "xiangqi-engine")]
#[command(about = "Xiangqi rule engine and alpha-beta AI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 列出当前行棋方的合法走法
    Moves {
        /// FEN 字符串
        #[arg(long, default_value = START_FEN)]
        fen: String,

        /// 行棋方 (red/black)
        #[arg(long, default_value = "red")]
        turn: String,
    },

    /// 选择最佳走法
    Best {
        /// FEN 字符串
        #[arg(long, default_value = START_FEN)]
        fen: String,

        /// 行棋方 (red/black)
        #[arg(long, default_value = "red")]
        turn: String,

        /// 搜索深度
        #[arg(long, default_value_t = DEFAULT_DEPTH)]
        depth: u32,

        /// 随机数种子（固定后结果可复现）
        #[arg(long)]
        seed: Option<u64>,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 静态评估局面分数
    Score {
        /// FEN 字符串
        #[arg(long, default_value = START_FEN)]
        fen: String,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 启动 server 模式（stdin/stdout 通信）
    Server,
}

// Server 模式的请求和响应结构
#[derive(Serialize, Deserialize)]
struct ServerRequest {
    cmd: String,
    #[serde(default)]
    fen: String,
    #[serde(default)]
    turn: Option<String>,
    #[serde(default)]
    depth: Option<u32>,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Serialize, Deserialize, Default)]
struct ServerResponse {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    best: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fen: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    legal_moves: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    eval: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    elapsed_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ServerResponse {
    fn success_best(best: String, fen: String, state: String, elapsed_ms: f64) -> Self {
        Self {
            ok: true,
            best: Some(best),
            fen: Some(fen),
            state: Some(state),
            elapsed_ms: Some(elapsed_ms),
            ..Default::default()
        }
    }

    fn success_legal_moves(legal_moves: Vec<String>) -> Self {
        Self {
            ok: true,
            total: Some(legal_moves.len()),
            legal_moves: Some(legal_moves),
            ..Default::default()
        }
    }

    fn success_eval(eval: i32) -> Self {
        Self {
            ok: true,
            eval: Some(eval),
            ..Default::default()
        }
    }

    fn error(msg: &str) -> Self {
        Self {
            ok: false,
            error: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

/// 解析行棋方参数，接受 red/black 或 r/b
fn parse_turn(s: &str) -> Result<Color, String> {
    match s.to_ascii_lowercase().as_str() {
        "red" | "r" => Ok(Color::Red),
        "black" | "b" => Ok(Color::Black),
        other => Err(format!("invalid turn: {:?} (expected red or black)", other)),
    }
}

fn state_to_str(state: GameState) -> &'static str {
    match state {
        GameState::Playing => "playing",
        GameState::RedWins => "red_wins",
        GameState::BlackWins => "black_wins",
        GameState::RedWinsNoCheck => "red_wins_no_check",
        GameState::BlackWinsNoCheck => "black_wins_no_check",
    }
}

/// 计算一步最佳走法，落子后返回 (走法串, 新局面, 对局状态)
fn compute_best(
    fen: &str,
    turn: Color,
    depth: u32,
    seed: Option<u64>,
) -> Result<Option<(String, String, GameState)>, String> {
    let mut engine = GameEngine::from_fen(fen, turn).map_err(|e| e.to_string())?;
    if engine.game_state().is_over() {
        return Ok(None);
    }

    let Some((from, to)) = choose_ai_move(&engine, depth, seed) else {
        return Ok(None);
    };

    // 经正规路径落子，拿到落子后的局面与终局判定
    if !engine.select_piece(from.row, from.col) || !engine.try_move(to.row, to.col) {
        return Err(format!("search returned an unplayable move: {} -> {}", from, to));
    }

    let mv = engine.last_move().expect("move was just committed");
    Ok(Some((
        mv.to_string(),
        engine.encode_position(),
        engine.game_state(),
    )))
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Moves { fen, turn } => {
            let result = parse_turn(&turn)
                .and_then(|color| GameEngine::from_fen(&fen, color).map_err(|e| e.to_string()));
            match result {
                Ok(mut engine) => {
                    let moves = engine.all_legal_moves(engine.side_to_move());
                    println!("Legal moves ({}):", moves.len());
                    for mv in &moves {
                        println!("  {}", mv);
                    }
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Best {
            fen,
            turn,
            depth,
            seed,
            json,
        } => {
            let start = Instant::now();
            let result = parse_turn(&turn).and_then(|color| compute_best(&fen, color, depth, seed));
            let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

            match result {
                Ok(Some((mv, new_fen, state))) => {
                    if json {
                        let response = ServerResponse::success_best(
                            mv,
                            new_fen,
                            state_to_str(state).to_string(),
                            elapsed_ms,
                        );
                        println!("{}", serde_json::to_string_pretty(&response).unwrap());
                    } else {
                        println!("Best move: {}", mv);
                        println!("Resulting position: {}", new_fen);
                        println!("Game state: {}", state_to_str(state));
                        println!("Time: {:.1}ms", elapsed_ms);
                    }
                }
                Ok(None) => {
                    eprintln!("No move available: game is already over");
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Score { fen, json } => match xiangqi_engine::decode(&fen) {
            Ok(board) => {
                let score = evaluate(&board);
                if json {
                    let response = ServerResponse::success_eval(score);
                    println!("{}", serde_json::to_string_pretty(&response).unwrap());
                } else {
                    println!("局面评估（正值利红）: {}", score);
                }
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },

        Commands::Server => {
            run_server();
        }
    }
}

/// Server 模式主循环
/// 从 stdin 读取 JSON 请求，返回 JSON 响应到 stdout
fn run_server() {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        // 空行跳过
        if line.trim().is_empty() {
            continue;
        }

        let request: ServerRequest = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                let response = ServerResponse::error(&format!("Invalid JSON: {}", e));
                println!("{}", serde_json::to_string(&response).unwrap());
                let _ = stdout.flush();
                continue;
            }
        };

        let response = match request.cmd.as_str() {
            "best" => handle_best_request(&request),
            "moves" => handle_moves_request(&request),
            "eval" => handle_eval_request(&request),
            "quit" => break,
            _ => ServerResponse::error(&format!("Unknown command: {}", request.cmd)),
        };

        println!("{}", serde_json::to_string(&response).unwrap());
        let _ = stdout.flush();
    }
}

fn request_turn(request: &ServerRequest) -> Result<Color, String> {
    parse_turn(request.turn.as_deref().unwrap_or("red"))
}

fn request_fen(request: &ServerRequest) -> &str {
    if request.fen.is_empty() {
        START_FEN
    } else {
        &request.fen
    }
}

/// 处理 best 命令
fn handle_best_request(request: &ServerRequest) -> ServerResponse {
    let turn = match request_turn(request) {
        Ok(t) => t,
        Err(e) => return ServerResponse::error(&e),
    };
    let depth = request.depth.unwrap_or(DEFAULT_DEPTH);

    let start = Instant::now();
    match compute_best(request_fen(request), turn, depth, request.seed) {
        Ok(Some((mv, new_fen, state))) => {
            let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
            ServerResponse::success_best(mv, new_fen, state_to_str(state).to_string(), elapsed_ms)
        }
        Ok(None) => ServerResponse::error("game is already over"),
        Err(e) => ServerResponse::error(&e),
    }
}

/// 处理 moves 命令
fn handle_moves_request(request: &ServerRequest) -> ServerResponse {
    let turn = match request_turn(request) {
        Ok(t) => t,
        Err(e) => return ServerResponse::error(&e),
    };

    match GameEngine::from_fen(request_fen(request), turn) {
        Ok(mut engine) => {
            let moves = engine
                .all_legal_moves(engine.side_to_move())
                .iter()
                .map(|mv| mv.to_string())
                .collect();
            ServerResponse::success_legal_moves(moves)
        }
        Err(e) => ServerResponse::error(&format!("Invalid FEN: {}", e)),
    }
}

/// 处理 eval 命令（静态评估）
fn handle_eval_request(request: &ServerRequest) -> ServerResponse {
    match xiangqi_engine::decode(request_fen(request)) {
        Ok(board) => ServerResponse::success_eval(evaluate(&board)),
        Err(e) => ServerResponse::error(&format!("Invalid FEN: {}", e)),
    }
}
