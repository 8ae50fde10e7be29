//! 局面串解析和生成
//!
//! 格式: `<棋盘> <行棋方>`
//!
//! 棋盘为 10 行、以 `/` 分隔，自第 10 路（黑方底线）写到第 1 路：
//! - 红方棋子：大写 G(帅) A(仕) E(相) H(马) C(车) N(炮) S(兵)
//! - 黑方棋子：对应小写
//! - 空格：数字 (1-9)
//!
//! 行棋方为 `r` 或 `b`。局面串只是测试与命令行的摆盘便利，
//! 不承担任何持久化职责。

use std::collections::HashMap;

use crate::board::Board;
use crate::types::{Color, PieceId, PieceKind, Position};

/// 标准开局局面
pub const OPENING: &str = "cheagaehc/9/1n5n1/s1s1s1s1s/9/9/S1S1S1S1S/1N5N1/9/CHEAGAEHC r";

lazy_static::lazy_static! {
    /// 解析好的开局布子，进程内只解析一次
    pub static ref OPENING_PIECES: Vec<(PieceId, Position)> =
        parse_setup(OPENING).expect("builtin opening setup must parse").pieces;
}

/// 局面串解析结果
#[derive(Debug, Clone)]
pub struct SetupState {
    pub pieces: Vec<(PieceId, Position)>,
    pub turn: Color,
}

/// 解析局面串
pub fn parse_setup(setup: &str) -> Result<SetupState, String> {
    let parts: Vec<&str> = setup.split_whitespace().collect();
    if parts.len() != 2 {
        return Err(format!(
            "Invalid setup format: expected '<board> <turn>', got: {}",
            setup
        ));
    }

    let pieces = parse_board(parts[0])?;
    let turn = match parts[1] {
        "r" => Color::Red,
        "b" => Color::Black,
        other => return Err(format!("Invalid turn: {}", other)),
    };

    Ok(SetupState { pieces, turn })
}

/// 解析棋盘部分
///
/// 同色同类棋子按出现顺序编号，与标准开局的传统标签一致
/// （先解析的第 10 路在前，黑方先得序号）。
fn parse_board(board_str: &str) -> Result<Vec<(PieceId, Position)>, String> {
    let rows: Vec<&str> = board_str.split('/').collect();
    if rows.len() != 10 {
        return Err(format!(
            "Invalid board: expected 10 rows, got {}",
            rows.len()
        ));
    }

    let mut pieces = Vec::new();
    let mut counters: HashMap<(PieceKind, Color), u8> = HashMap::new();

    for (row_idx, row_str) in rows.iter().enumerate() {
        // 局面串自上而下是 row 9 到 row 0
        let row = (9 - row_idx) as i8;
        let mut col: i8 = 0;

        for ch in row_str.chars() {
            if let Some(d) = ch.to_digit(10) {
                if d == 0 {
                    return Err(format!("Invalid empty run in row {}: 0", row + 1));
                }
                col += d as i8;
            } else if ch.is_ascii_alphabetic() {
                let kind = PieceKind::from_code(ch.to_ascii_uppercase())
                    .ok_or_else(|| format!("Invalid piece char: {}", ch))?;
                let color = if ch.is_ascii_uppercase() {
                    Color::Red
                } else {
                    Color::Black
                };

                let seq = counters.entry((kind, color)).or_insert(0);
                *seq += 1;
                pieces.push((PieceId::new(kind, color, *seq), Position::new(row, col)));
                col += 1;
            } else {
                return Err(format!("Invalid character in board: {}", ch));
            }

            if col > 9 {
                return Err(format!("Row {} has more than 9 columns", row + 1));
            }
        }

        if col != 9 {
            return Err(format!("Row {} has {} columns, expected 9", row + 1, col));
        }
    }

    Ok(pieces)
}

/// 从棋盘投影生成局面串
pub fn setup_string(board: &Board, turn: Color) -> String {
    let mut rows = Vec::with_capacity(10);

    for row in (0..10).rev() {
        let mut row_str = String::new();
        let mut empty_count = 0;

        for col in 0..9 {
            match board.piece_id_at(Position::new(row, col)) {
                Some(id) => {
                    if empty_count > 0 {
                        row_str.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    let code = id.kind.to_code();
                    row_str.push(match id.color {
                        Color::Red => code,
                        Color::Black => code.to_ascii_lowercase(),
                    });
                }
                None => empty_count += 1,
            }
        }

        if empty_count > 0 {
            row_str.push_str(&empty_count.to_string());
        }

        rows.push(row_str);
    }

    let turn_char = match turn {
        Color::Red => 'r',
        Color::Black => 'b',
    };

    format!("{} {}", rows.join("/"), turn_char)
}
