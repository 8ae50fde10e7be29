//! 象棋核心类型定义
//!
//! 定义棋盘坐标、颜色、棋子种类、棋子标签与对局状态等基础数据类型

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

    /// 从标签字符解析（'R'/'B'）
    pub fn from_code(c: char) -> Option<Color> {
        match c {
            'R' => Some(Color::Red),
            'B' => Some(Color::Black),
            _ => None,
        }
    }

    /// 转换为标签字符（'R'/'B'）
    pub fn to_code(&self) -> char {
        match self {
            Color::Red => 'R',
            Color::Black => 'B',
        }
    }

    /// 从边界输入解析颜色名
    ///
    /// 只接受 "red" / "black"（不区分大小写），其余输入返回错误，
    /// 绝不默认为某一方。
    pub fn from_name(name: &str) -> Result<Color, String> {
        match name.to_ascii_lowercase().as_str() {
            "red" => Ok(Color::Red),
            "black" => Ok(Color::Black),
            _ => Err(format!("Invalid color: expected 'red' or 'black', got: {}", name)),
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
    /// 从标签字符解析（大写；注意炮为 'N'、车为 'C'）
    pub fn from_code(c: char) -> Option<PieceKind> {
        match c {
            'G' => Some(PieceKind::General),
            'A' => Some(PieceKind::Advisor),
            'E' => Some(PieceKind::Elephant),
            'H' => Some(PieceKind::Horse),
            'C' => Some(PieceKind::Chariot),
            'N' => Some(PieceKind::Cannon),
            'S' => Some(PieceKind::Soldier),
            _ => None,
        }
    }

    /// 转换为标签字符
    pub fn to_code(&self) -> char {
        match self {
            PieceKind::General => 'G',
            PieceKind::Advisor => 'A',
            PieceKind::Elephant => 'E',
            PieceKind::Horse => 'H',
            PieceKind::Chariot => 'C',
            PieceKind::Cannon => 'N',
            PieceKind::Soldier => 'S',
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

/// 棋子标签：种类 + 颜色 + 同类序号，如 "SR3" 表示红方第 3 个兵
///
/// 标签在棋子集合内唯一，作为棋子的身份标识。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceId {
    pub kind: PieceKind,
    pub color: Color,
    /// 同色同类棋子中的序号（从 1 开始）
    pub seq: u8,
}

impl PieceId {
    pub fn new(kind: PieceKind, color: Color, seq: u8) -> Self {
        PieceId { kind, color, seq }
    }

    /// 三字符标签，如 "CR1"
    pub fn label(&self) -> String {
        format!("{}{}{}", self.kind.to_code(), self.color.to_code(), self.seq)
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 棋盘位置 (row, col)
///
/// row: 0-9（0 是红方底线，对应第 1 路；9 是黑方底线，对应第 10 路）
/// col: 0-8（从左到右，对应 a-i 线）
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

    /// 检查位置是否在该方的九宫格内
    pub fn is_in_palace(&self, color: Color) -> bool {
        if !(3..=5).contains(&self.col) {
            return false;
        }
        match color {
            Color::Red => (0..=2).contains(&self.row),
            Color::Black => (7..=9).contains(&self.row),
        }
    }

    /// 检查位置是否还在该方自己的半场（未过河）
    pub fn is_on_own_side(&self, color: Color) -> bool {
        match color {
            Color::Red => (0..=4).contains(&self.row),
            Color::Black => (5..=9).contains(&self.row),
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

    /// 从 90 格数组下标还原位置
    #[inline]
    pub fn from_index(index: usize) -> Position {
        Position {
            row: (index / 9) as i8,
            col: (index % 9) as i8,
        }
    }

    /// 从坐标字符串解析（如 "e5"、"d10"；路数 1-10，不带前导零）
    pub fn from_coord(s: &str) -> Option<Position> {
        let mut chars = s.chars();
        let col = match chars.next() {
            Some(c @ 'a'..='i') => (c as i8) - ('a' as i8),
            _ => return None,
        };
        let rank_str = chars.as_str();
        if rank_str.is_empty() || rank_str.starts_with('0') {
            return None;
        }
        let rank: i8 = rank_str.parse().ok()?;
        if !(1..=10).contains(&rank) {
            return None;
        }
        Some(Position {
            row: rank - 1,
            col,
        })
    }

    /// 转换为坐标字符串（如 "e5"、"d10"）
    pub fn to_coord(&self) -> String {
        let col_char = (b'a' + self.col as u8) as char;
        format!("{}{}", col_char, self.row + 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_coord())
    }
}

/// 一步走法：起点与终点
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Position,
    pub to: Position,
}

impl Move {
    pub fn new(from: Position, to: Position) -> Self {
        Move { from, to }
    }

    /// 从连写坐标解析（如 "b3b6"、"d10e10"）
    ///
    /// 路数可能是两位，按"字母开启新坐标"切分。
    pub fn from_coords(s: &str) -> Option<Move> {
        let s = s.trim();
        let split = s
            .char_indices()
            .skip(1)
            .find(|(_, c)| c.is_ascii_alphabetic())
            .map(|(i, _)| i)?;
        let from = Position::from_coord(&s[..split])?;
        let to = Position::from_coord(&s[split..])?;
        Some(Move { from, to })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

/// 对局状态
///
/// 一旦离开 InProgress 便不再变化，之后的任何走子请求都会被拒绝。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    InProgress,
    RedWon,
    BlackWon,
}

impl GameState {
    /// 某方获胜对应的状态
    pub fn win_for(color: Color) -> GameState {
        match color {
            Color::Red => GameState::RedWon,
            Color::Black => GameState::BlackWon,
        }
    }

    /// 边界输出用的状态名
    pub fn as_str(&self) -> &'static str {
        match self {
            GameState::InProgress => "in_progress",
            GameState::RedWon => "red_won",
            GameState::BlackWon => "black_won",
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
