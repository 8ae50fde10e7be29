//! Xiangqi 规则引擎 CLI
//!
//! 表示层：消费核心的只读快照与走子接口，本身不含任何规则逻辑
//!
//! 支持三种模式：
//! 1. 单次命令模式：列出合法走法、查询将军
//! 2. 交互模式：终端里下棋
//! 3. Server 模式：长驻进程，通过 stdin/stdout 以 JSON 通信

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};
use xiangqi_rules::{Color, Game, GameState, Move, Position, OPENING};

#[derive(Parser)]
#[command(name = "xiangqi-rules")]
#[command(about = "Xiangqi (Chinese chess) rule engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 列出当前行棋方的所有合法走法
    Moves {
        /// 局面串（缺省为标准开局）
        #[arg(long)]
        setup: Option<String>,
    },

    /// 查询某方是否被将军
    Check {
        /// "red" 或 "black"
        #[arg(long)]
        color: String,

        /// 局面串（缺省为标准开局）
        #[arg(long)]
        setup: Option<String>,
    },

    /// 交互式对局
    Play {
        /// 局面串（缺省为标准开局）
        #[arg(long)]
        setup: Option<String>,
    },

    /// 启动 server 模式（stdin/stdout JSON 通信）
    Server,
}

// Server 模式的请求和响应结构
#[derive(Deserialize)]
struct ServerRequest {
    cmd: String,
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    to: Option<String>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    setup: Option<String>,
}

#[derive(Serialize, Default)]
struct ServerResponse {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    accepted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    turn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    check: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    board: Option<Vec<Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    moves: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ServerResponse {
    fn success_move(accepted: bool, game: &Game) -> Self {
        Self {
            ok: true,
            accepted: Some(accepted),
            state: Some(game.state().to_string()),
            turn: Some(color_to_str(game.current_turn()).to_string()),
            ..Default::default()
        }
    }

    fn success_state(game: &Game) -> Self {
        Self {
            ok: true,
            state: Some(game.state().to_string()),
            turn: Some(color_to_str(game.current_turn()).to_string()),
            ..Default::default()
        }
    }

    fn success_board(game: &Game) -> Self {
        Self {
            ok: true,
            board: Some(board_rows(game)),
            ..Default::default()
        }
    }

    fn success_check(check: bool) -> Self {
        Self {
            ok: true,
            check: Some(check),
            ..Default::default()
        }
    }

    fn success_moves(moves: Vec<String>) -> Self {
        Self {
            ok: true,
            moves: Some(moves),
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

fn color_to_str(color: Color) -> &'static str {
    if color == Color::Red {
        "red"
    } else {
        "black"
    }
}

/// JSON 输出用的棋盘：第 1 路到第 10 路，空位是固定占位符 "---"
fn board_rows(game: &Game) -> Vec<Vec<String>> {
    game.snapshot()
        .iter()
        .map(|row| {
            row.iter()
                .map(|square| match square {
                    Some(id) => id.label(),
                    None => "---".to_string(),
                })
                .collect()
        })
        .collect()
}

/// 终端渲染：红子红色、黑子青色、空位 "---"，河界单独一行
fn render_board(game: &Game) -> String {
    let grid = game.snapshot();
    let mut out = String::new();

    out.push_str("      a   b   c   d   e   f   g   h   i\n");
    for row in (0..10usize).rev() {
        out.push_str(&format!("  {:>2} ", row + 1));
        for square in grid[row].iter() {
            match square {
                Some(id) => {
                    let ansi = if id.color == Color::Red { "31" } else { "36" };
                    out.push_str(&format!("\x1b[1;{}m{}\x1b[0m ", ansi, id.label()));
                }
                None => out.push_str("--- "),
            }
        }
        out.push('\n');
        if row == 5 {
            out.push_str("     ~~~~~~~~~~~~~~ 楚河  汉界 ~~~~~~~~~~~~~~~\n");
        }
    }

    out
}

/// 解析 "b3 b6" 或 "b3b6" 形式的输入
fn parse_move_input(input: &str) -> Option<Move> {
    let tokens: Vec<&str> = input.split_whitespace().collect();
    match tokens.as_slice() {
        [pair] => Move::from_coords(pair),
        [from, to] => Some(Move::new(
            Position::from_coord(from)?,
            Position::from_coord(to)?,
        )),
        _ => None,
    }
}

fn game_from(setup: Option<&str>) -> Result<Game, String> {
    match setup {
        Some(s) => Game::from_setup(s),
        None => Ok(Game::new()),
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Moves { setup } => match game_from(setup.as_deref()) {
            Ok(mut game) => {
                let mut moves: Vec<String> =
                    game.legal_moves().iter().map(|m| m.to_string()).collect();
                moves.sort();
                println!("Legal moves for {} ({}):", color_to_str(game.current_turn()), moves.len());
                for mv in &moves {
                    println!("  {}", mv);
                }
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },

        Commands::Check { color, setup } => {
            // 无效颜色名是调用方契约错误，必须显式报错而不是默认某一方
            let color = match Color::from_name(&color) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };
            match game_from(setup.as_deref()) {
                Ok(game) => {
                    println!("{}", game.is_in_check(color));
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Play { setup } => match game_from(setup.as_deref()) {
            Ok(game) => run_play(game),
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

/// 交互式对局主循环
fn run_play(mut game: Game) {
    println!("{}", render_board(&game));
    println!("输入走法（如 \"b3 b6\" 或 \"b3b6\"），quit 退出");

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input == "quit" {
            break;
        }

        let mv = match parse_move_input(input) {
            Some(mv) => mv,
            None => {
                println!("无法解析坐标: {}", input);
                continue;
            }
        };

        if !game.attempt_move(mv.from, mv.to) {
            println!("走法不合法: {}", mv);
            continue;
        }

        println!("{}", render_board(&game));

        match game.state() {
            GameState::RedWon => {
                println!("红方胜！");
                break;
            }
            GameState::BlackWon => {
                println!("黑方胜！");
                break;
            }
            GameState::InProgress => {
                let side = game.current_turn();
                if game.is_in_check(side) {
                    println!("{} 被将军！", color_to_str(side));
                }
                println!("轮到 {} 行棋", color_to_str(side));
            }
        }
    }
}

/// Server 模式主循环
/// 从 stdin 读取 JSON 请求，返回 JSON 响应到 stdout
fn run_server() {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut game = Game::new();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        // 空行跳过
        if line.trim().is_empty() {
            continue;
        }
        log::debug!("request: {}", line);

        // 解析请求
        let request: ServerRequest = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                let response = ServerResponse::error(&format!("Invalid JSON: {}", e));
                println!("{}", serde_json::to_string(&response).unwrap());
                let _ = stdout.flush();
                continue;
            }
        };

        // 处理命令
        let response = match request.cmd.as_str() {
            "move" => handle_move_request(&request, &mut game),
            "state" => ServerResponse::success_state(&game),
            "board" => ServerResponse::success_board(&game),
            "check" => handle_check_request(&request, &game),
            "moves" => {
                let mut moves: Vec<String> =
                    game.legal_moves().iter().map(|m| m.to_string()).collect();
                moves.sort();
                ServerResponse::success_moves(moves)
            }
            "new" => handle_new_request(&request, &mut game),
            "quit" => break,
            _ => ServerResponse::error(&format!("Unknown command: {}", request.cmd)),
        };

        // 返回响应
        println!("{}", serde_json::to_string(&response).unwrap());
        let _ = stdout.flush();
    }
}

/// 处理 move 命令
fn handle_move_request(request: &ServerRequest, game: &mut Game) -> ServerResponse {
    let from = request.from.as_deref().and_then(Position::from_coord);
    let to = request.to.as_deref().and_then(Position::from_coord);

    match (from, to) {
        (Some(from), Some(to)) => {
            let accepted = game.attempt_move(from, to);
            ServerResponse::success_move(accepted, game)
        }
        _ => ServerResponse::error("Invalid or missing coordinates"),
    }
}

/// 处理 check 命令
fn handle_check_request(request: &ServerRequest, game: &Game) -> ServerResponse {
    let name = match request.color.as_deref() {
        Some(name) => name,
        None => return ServerResponse::error("Missing color"),
    };
    match Color::from_name(name) {
        Ok(color) => ServerResponse::success_check(game.is_in_check(color)),
        Err(e) => ServerResponse::error(&e),
    }
}

/// 处理 new 命令
fn handle_new_request(request: &ServerRequest, game: &mut Game) -> ServerResponse {
    let setup = request.setup.as_deref().unwrap_or(OPENING);
    match Game::from_setup(setup) {
        Ok(new_game) => {
            *game = new_game;
            ServerResponse::success_state(game)
        }
        Err(e) => ServerResponse::error(&format!("Invalid setup: {}", e)),
    }
}
