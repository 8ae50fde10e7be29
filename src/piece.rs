//! 棋子与兵种走法规则
//!
//! 七个兵种的几何/阻挡规则都在这里，按 `PieceKind` 静态分派。
//! 这一层只判断"伪合法"：满足兵种自身规则即可，是否送将由上一层
//! 的试走/回滚流程把关。

use crate::board::Board;
use crate::types::{Color, PieceId, PieceKind, Position};

/// 棋盘上的一个活棋子
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub id: PieceId,
    /// 当前位置，只在走子与回滚时由棋子集合更新
    pub position: Position,
    /// 缓存的伪合法攻击范围，每一着全量重算
    pub attack_range: Vec<Position>,
}

impl Piece {
    pub fn new(id: PieceId, position: Position) -> Piece {
        Piece {
            id,
            position,
            attack_range: Vec::new(),
        }
    }

    #[inline]
    pub fn kind(&self) -> PieceKind {
        self.id.kind
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.id.color
    }
}

/// 马的走法偏移与对应的蹩腿格偏移
const HORSE_OFFSETS: [((i8, i8), (i8, i8)); 8] = [
    ((2, 1), (1, 0)),
    ((2, -1), (1, 0)),
    ((-2, 1), (-1, 0)),
    ((-2, -1), (-1, 0)),
    ((1, 2), (0, 1)),
    ((1, -2), (0, -1)),
    ((-1, 2), (0, 1)),
    ((-1, -2), (0, -1)),
];

/// 象的走法偏移与对应的象眼格偏移
const ELEPHANT_OFFSETS: [((i8, i8), (i8, i8)); 4] = [
    ((2, 2), (1, 1)),
    ((2, -2), (1, -1)),
    ((-2, 2), (-1, 1)),
    ((-2, -2), (-1, -1)),
];

const ORTHOGONAL: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// 判断一步走法是否满足该兵种自身的规则（伪合法）
///
/// 调用前提：两个位置都在棋盘内且不相同，终点没有己方棋子。
pub fn is_pseudo_legal(
    kind: PieceKind,
    color: Color,
    from: Position,
    to: Position,
    board: &Board,
) -> bool {
    match kind {
        PieceKind::General => general_rule(color, from, to, board),
        PieceKind::Advisor => advisor_rule(color, from, to),
        PieceKind::Elephant => elephant_rule(color, from, to, board),
        PieceKind::Horse => horse_rule(from, to, board),
        PieceKind::Chariot => ray_targets(board, from, false).contains(&to),
        PieceKind::Cannon => ray_targets(board, from, true).contains(&to),
        PieceKind::Soldier => soldier_rule(color, from, to),
    }
}

/// 将：九宫内走一步直线，且不得与对方将在无遮挡的同一列上对脸
fn general_rule(color: Color, from: Position, to: Position, board: &Board) -> bool {
    if !to.is_in_palace(color) {
        return false;
    }
    let dr = (to.row - from.row).abs();
    let dc = (to.col - from.col).abs();
    if !((dr == 1 && dc == 0) || (dr == 0 && dc == 1)) {
        return false;
    }

    // 飞将检查：走完后若与对方将同列，两将之间必须有遮挡。
    // 起点格在走完后变空，扫描时跳过。
    if let Some(enemy) = board.find_general(color.opposite()) {
        if enemy.col == to.col {
            let lo = to.row.min(enemy.row);
            let hi = to.row.max(enemy.row);
            let screened = Board::column_positions(to.col).into_iter().any(|pos| {
                pos.row > lo && pos.row < hi && pos != from && board.has_piece(pos)
            });
            if !screened {
                return false;
            }
        }
    }

    true
}

/// 士：九宫内走一步斜线
fn advisor_rule(color: Color, from: Position, to: Position) -> bool {
    if !to.is_in_palace(color) {
        return false;
    }
    (to.row - from.row).abs() == 1 && (to.col - from.col).abs() == 1
}

/// 象：田字两步斜线，象眼无子，不得过河
fn elephant_rule(color: Color, from: Position, to: Position, board: &Board) -> bool {
    if !to.is_on_own_side(color) {
        return false;
    }
    let delta = (to.row - from.row, to.col - from.col);
    match ELEPHANT_OFFSETS.iter().find(|&&(mv, _)| mv == delta) {
        Some(&(_, (er, ec))) => !board.has_piece(from.offset(er, ec)),
        None => false,
    }
}

/// 马：日字走法，行进方向的紧邻直线格（蹩腿格）必须为空
fn horse_rule(from: Position, to: Position, board: &Board) -> bool {
    let delta = (to.row - from.row, to.col - from.col);
    match HORSE_OFFSETS.iter().find(|&&(mv, _)| mv == delta) {
        Some(&(_, (lr, lc))) => !board.has_piece(from.offset(lr, lc)),
        None => false,
    }
}

/// 兵/卒：过河前只许向前一步，过河后可向前或横走一步，永不后退
fn soldier_rule(color: Color, from: Position, to: Position) -> bool {
    let forward = if color == Color::Red { 1 } else { -1 };
    if to == from.offset(forward, 0) {
        return true;
    }
    let crossed = !from.is_on_own_side(color);
    crossed && to.row == from.row && (to.col - from.col).abs() == 1
}

/// 车/炮共用的射线扫描
///
/// 沿当前行与当前列向四个方向扫描，返回可达落点。
/// `jumps_screen` 为 false 时是车：扫到第一个有子的格即止，该格计入
/// 落点（是否吃得动由集合级的同色校验裁决）；为 true 时是炮：第一个
/// 有子的格成为炮架，之后遇到的第一个有子的格才是落点。
pub fn ray_targets(board: &Board, origin: Position, jumps_screen: bool) -> Vec<Position> {
    let mut targets = Vec::with_capacity(17);
    if !origin.is_valid() {
        return targets;
    }

    let row = Board::row_positions(origin.row);
    let col = Board::column_positions(origin.col);
    let lines = [(row, origin.col as usize), (col, origin.row as usize)];

    for (line, split) in lines {
        if line.is_empty() {
            continue;
        }
        scan_side(board, line[..split].iter().rev().copied(), jumps_screen, &mut targets);
        scan_side(board, line[split + 1..].iter().copied(), jumps_screen, &mut targets);
    }

    targets
}

fn scan_side<I>(board: &Board, side: I, jumps_screen: bool, targets: &mut Vec<Position>)
where
    I: Iterator<Item = Position>,
{
    let mut jumped = false;
    for pos in side {
        if !board.has_piece(pos) {
            if !jumped {
                targets.push(pos);
            }
            continue;
        }
        if !jumps_screen {
            // 车：第一个有子的格就是终点
            targets.push(pos);
            break;
        }
        if jumped {
            // 炮：隔着炮架打到的第一个子
            targets.push(pos);
            break;
        }
        jumped = true;
    }
}

/// 生成某兵种从 origin 出发的全部候选落点
///
/// 候选只做兵种几何层面的展开（越界、落点有己方子等由集合级校验过滤），
/// 车与炮的候选即射线扫描结果。
pub fn candidate_destinations(
    kind: PieceKind,
    color: Color,
    origin: Position,
    board: &Board,
) -> Vec<Position> {
    match kind {
        PieceKind::General => ORTHOGONAL.iter().map(|&(dr, dc)| origin.offset(dr, dc)).collect(),
        PieceKind::Advisor => DIAGONAL.iter().map(|&(dr, dc)| origin.offset(dr, dc)).collect(),
        PieceKind::Elephant => ELEPHANT_OFFSETS
            .iter()
            .map(|&((dr, dc), _)| origin.offset(dr, dc))
            .collect(),
        PieceKind::Horse => HORSE_OFFSETS
            .iter()
            .map(|&((dr, dc), _)| origin.offset(dr, dc))
            .collect(),
        PieceKind::Chariot => ray_targets(board, origin, false),
        PieceKind::Cannon => ray_targets(board, origin, true),
        PieceKind::Soldier => {
            let forward = if color == Color::Red { 1 } else { -1 };
            let mut dests = Vec::with_capacity(3);
            dests.push(origin.offset(forward, 0));
            // 过河后才能横走
            if !origin.is_on_own_side(color) {
                dests.push(origin.offset(0, -1));
                dests.push(origin.offset(0, 1));
            }
            dests
        }
    }
}
