//! 棋盘投影
//!
//! 90 个格子的标签数组，始终由棋子集合重建而来，本身不是棋子位置的
//! 权威来源。每次走子（包括回滚）之后都会整体重建。

use crate::types::{Color, PieceId, PieceKind, Position};

/// 棋盘投影（10 行 x 9 列）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: [Option<PieceId>; 90],
}

impl Board {
    /// 空棋盘
    pub fn empty() -> Board {
        Board {
            squares: [None; 90],
        }
    }

    /// 从 (标签, 位置) 列表重建棋盘
    ///
    /// 越界位置直接忽略，由上层在构造棋子集合时拒绝。
    pub fn from_placements<I>(placements: I) -> Board
    where
        I: IntoIterator<Item = (PieceId, Position)>,
    {
        let mut board = Board::empty();
        for (id, pos) in placements {
            if pos.is_valid() {
                board.squares[pos.to_index()] = Some(id);
            }
        }
        board
    }

    /// 获取某位置的棋子标签
    #[inline]
    pub fn piece_id_at(&self, pos: Position) -> Option<PieceId> {
        if !pos.is_valid() {
            return None;
        }
        self.squares[pos.to_index()]
    }

    /// 检查位置是否有棋子
    #[inline]
    pub fn has_piece(&self, pos: Position) -> bool {
        pos.is_valid() && self.squares[pos.to_index()].is_some()
    }

    /// 在棋盘上找某方的将
    pub fn find_general(&self, color: Color) -> Option<Position> {
        self.squares.iter().enumerate().find_map(|(index, square)| {
            match square {
                Some(id) if id.kind == PieceKind::General && id.color == color => {
                    Some(Position::from_index(index))
                }
                _ => None,
            }
        })
    }

    /// 某一行的全部位置，按 a 线到 i 线排序；行号越界返回空
    pub fn row_positions(row: i8) -> Vec<Position> {
        if !(0..=9).contains(&row) {
            return Vec::new();
        }
        (0..9).map(|col| Position::new(row, col)).collect()
    }

    /// 某一列的全部位置，按第 1 路到第 10 路排序；列号越界返回空
    pub fn column_positions(col: i8) -> Vec<Position> {
        if !(0..=8).contains(&col) {
            return Vec::new();
        }
        (0..10).map(|row| Position::new(row, col)).collect()
    }

    /// 只读快照：10 行 x 9 列的标签网格，行下标 0 对应第 1 路
    pub fn snapshot(&self) -> [[Option<PieceId>; 9]; 10] {
        let mut grid = [[None; 9]; 10];
        for (index, square) in self.squares.iter().enumerate() {
            let pos = Position::from_index(index);
            grid[pos.row as usize][pos.col as usize] = *square;
        }
        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(kind: PieceKind, color: Color, seq: u8) -> PieceId {
        PieceId::new(kind, color, seq)
    }

    fn pos(s: &str) -> Position {
        Position::from_coord(s).unwrap()
    }

    #[test]
    fn test_from_placements_and_lookup() {
        let general = pid(PieceKind::General, Color::Red, 1);
        let soldier = pid(PieceKind::Soldier, Color::Black, 2);
        let board = Board::from_placements(vec![(general, pos("e1")), (soldier, pos("c7"))]);

        assert_eq!(board.piece_id_at(pos("e1")), Some(general));
        assert_eq!(board.piece_id_at(pos("c7")), Some(soldier));
        assert_eq!(board.piece_id_at(pos("e5")), None);
        assert!(board.has_piece(pos("e1")));
        assert!(!board.has_piece(pos("a1")));
        // 越界位置返回 None 而不是 panic
        assert_eq!(board.piece_id_at(Position::new(-1, 0)), None);
        assert_eq!(board.piece_id_at(Position::new(0, 9)), None);
    }

    #[test]
    fn test_find_general() {
        let red = pid(PieceKind::General, Color::Red, 1);
        let black = pid(PieceKind::General, Color::Black, 1);
        let board = Board::from_placements(vec![(red, pos("e1")), (black, pos("d10"))]);
        assert_eq!(board.find_general(Color::Red), Some(pos("e1")));
        assert_eq!(board.find_general(Color::Black), Some(pos("d10")));
        assert_eq!(Board::empty().find_general(Color::Red), None);
    }

    #[test]
    fn test_row_and_column_positions() {
        let row = Board::row_positions(2);
        assert_eq!(row.len(), 9);
        assert_eq!(row[0], pos("a3"));
        assert_eq!(row[8], pos("i3"));

        let col = Board::column_positions(4);
        assert_eq!(col.len(), 10);
        assert_eq!(col[0], pos("e1"));
        assert_eq!(col[9], pos("e10"));

        // 越界返回空序列
        assert!(Board::row_positions(10).is_empty());
        assert!(Board::column_positions(-1).is_empty());
    }

    #[test]
    fn test_snapshot_shape() {
        let general = pid(PieceKind::General, Color::Red, 1);
        let board = Board::from_placements(vec![(general, pos("e1"))]);
        let grid = board.snapshot();
        assert_eq!(grid.len(), 10);
        assert_eq!(grid[0].len(), 9);
        assert_eq!(grid[0][4], Some(general));
        assert_eq!(grid[9][4], None);
    }
}
