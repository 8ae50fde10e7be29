//! 棋子集合与攻击映射
//!
//! 持有全部活棋子（按标签索引），维护双方的攻击映射
//! （落点 -> 攻击该落点的棋子标签），并在其上提供将军判定。
//! 攻击映射在每次棋盘变动后整体重算，不做增量维护，以重算换正确。

use std::collections::HashMap;

use crate::board::Board;
use crate::piece::{candidate_destinations, is_pseudo_legal, Piece};
use crate::types::{Color, Move, PieceId, PieceKind, Position};

/// 活棋子集合
#[derive(Debug, Clone)]
pub struct Registry {
    pieces: HashMap<PieceId, Piece>,
    red_attack_map: HashMap<Position, Vec<PieceId>>,
    black_attack_map: HashMap<Position, Vec<PieceId>>,
    /// 最近一次被吃的棋子，单格缓存，只支持撤销最近一步
    captured: Option<Piece>,
}

impl Registry {
    /// 从 (标签, 位置) 列表构建集合
    ///
    /// 标签重复、位置重复或越界都是构造错误。
    pub fn from_placements(placements: &[(PieceId, Position)]) -> Result<Registry, String> {
        let mut pieces = HashMap::with_capacity(placements.len());
        let mut occupied: HashMap<Position, PieceId> = HashMap::with_capacity(placements.len());

        for &(id, pos) in placements {
            if !pos.is_valid() {
                return Err(format!("Position off board for {}: {:?}", id, pos));
            }
            if let Some(prev) = occupied.insert(pos, id) {
                return Err(format!("Square {} holds both {} and {}", pos, prev, id));
            }
            if pieces.insert(id, Piece::new(id, pos)).is_some() {
                return Err(format!("Duplicate piece label: {}", id));
            }
        }

        Ok(Registry {
            pieces,
            red_attack_map: HashMap::new(),
            black_attack_map: HashMap::new(),
            captured: None,
        })
    }

    /// 活棋子数量
    #[inline]
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    /// 全部 (标签, 位置)，用于重建棋盘投影
    pub fn placements(&self) -> impl Iterator<Item = (PieceId, Position)> + '_ {
        self.pieces.values().map(|p| (p.id, p.position))
    }

    /// 按标签取棋子
    #[inline]
    pub fn get(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(&id)
    }

    /// 按位置取棋子
    pub fn piece_at(&self, pos: Position) -> Option<&Piece> {
        self.pieces.values().find(|p| p.position == pos)
    }

    /// 某方将的当前位置
    pub fn general_pos(&self, color: Color) -> Option<Position> {
        self.pieces
            .get(&PieceId::new(PieceKind::General, color, 1))
            .map(|p| p.position)
    }

    /// 某方的攻击映射
    pub fn attack_map(&self, color: Color) -> &HashMap<Position, Vec<PieceId>> {
        match color {
            Color::Red => &self.red_attack_map,
            Color::Black => &self.black_attack_map,
        }
    }

    /// 集合级走法校验，通过后再交给兵种自身的规则
    ///
    /// 拒绝：越界、原地不动、起点无子、起点不是行棋方的子、终点有己方子。
    pub fn validate_candidate(
        &self,
        from: Position,
        to: Position,
        mover: Color,
        board: &Board,
    ) -> bool {
        if !from.is_valid() || !to.is_valid() {
            return false;
        }
        if from == to {
            return false;
        }
        let piece = match self.piece_at(from) {
            Some(p) => p,
            None => return false,
        };
        if piece.color() != mover {
            return false;
        }
        if let Some(target) = self.piece_at(to) {
            if target.color() == mover {
                return false;
            }
        }
        is_pseudo_legal(piece.kind(), piece.color(), from, to, board)
    }

    /// 全量重算每个棋子的攻击范围，并重建双方攻击映射
    ///
    /// 每次走子或回滚之后调用一次，代价 O(棋子数 x 平均范围)。
    pub fn recompute_attack_maps(&mut self, board: &Board) {
        let ids: Vec<PieceId> = self.pieces.keys().copied().collect();
        for id in ids {
            let origin = match self.pieces.get(&id) {
                Some(piece) => piece.position,
                None => continue,
            };
            let range: Vec<Position> = candidate_destinations(id.kind, id.color, origin, board)
                .into_iter()
                .filter(|&dest| self.validate_candidate(origin, dest, id.color, board))
                .collect();
            if let Some(piece) = self.pieces.get_mut(&id) {
                piece.attack_range = range;
            }
        }
        self.rebuild_attack_maps();
    }

    fn rebuild_attack_maps(&mut self) {
        let mut red: HashMap<Position, Vec<PieceId>> = HashMap::new();
        let mut black: HashMap<Position, Vec<PieceId>> = HashMap::new();

        for piece in self.pieces.values() {
            let map = match piece.color() {
                Color::Red => &mut red,
                Color::Black => &mut black,
            };
            for &dest in &piece.attack_range {
                map.entry(dest).or_default().push(piece.id);
            }
        }

        self.red_attack_map = red;
        self.black_attack_map = black;
    }

    /// 某方是否被将军：己方将的位置出现在对方攻击映射的键里
    pub fn is_in_check(&self, color: Color) -> bool {
        match self.general_pos(color) {
            Some(pos) => self.attack_map(color.opposite()).contains_key(&pos),
            // 将已不在场上，按被将死处理
            None => true,
        }
    }

    /// 某方当前的全部伪合法走法，摊平自该方攻击映射
    ///
    /// 只用于终局探测；真实走子的校验直接走 validate_candidate。
    pub fn all_pseudo_legal_moves(&self, color: Color) -> Vec<Move> {
        let mut moves = Vec::with_capacity(50);
        for (&dest, attackers) in self.attack_map(color) {
            for &id in attackers {
                if let Some(piece) = self.get(id) {
                    moves.push(Move::new(piece.position, dest));
                }
            }
        }
        moves
    }

    /// 若终点有敌方棋子则移出集合存入缓存；否则清空缓存
    ///
    /// 每次试走都会覆盖缓存，缓存永远只反映最近一次吃子。
    pub fn capture_at(&mut self, pos: Position, mover: Color) {
        self.captured = None;
        let target = self
            .pieces
            .values()
            .find(|p| p.position == pos && p.color() != mover)
            .map(|p| p.id);
        if let Some(id) = target {
            self.captured = self.pieces.remove(&id);
        }
    }

    /// 把缓存里的被吃棋子放回集合（仅用于撤销最近一步）
    pub fn restore_captured(&mut self) {
        if let Some(piece) = self.captured.take() {
            self.pieces.insert(piece.id, piece);
        }
    }

    /// 缓存中的被吃棋子
    pub fn captured_piece(&self) -> Option<&Piece> {
        self.captured.as_ref()
    }

    /// 更新棋子位置
    pub fn relocate(&mut self, id: PieceId, to: Position) {
        if let Some(piece) = self.pieces.get_mut(&id) {
            piece.position = to;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::{parse_setup, OPENING};

    fn pid(kind: PieceKind, color: Color, seq: u8) -> PieceId {
        PieceId::new(kind, color, seq)
    }

    fn pos(s: &str) -> Position {
        Position::from_coord(s).unwrap()
    }

    /// 构建集合并完成第一轮攻击映射重算
    fn ready(placements: Vec<(PieceId, Position)>) -> (Registry, Board) {
        let mut registry = Registry::from_placements(&placements).unwrap();
        let board = Board::from_placements(registry.placements());
        registry.recompute_attack_maps(&board);
        (registry, board)
    }

    fn opening() -> (Registry, Board) {
        let state = parse_setup(OPENING).unwrap();
        ready(state.pieces)
    }

    #[test]
    fn test_from_placements_rejects_bad_input() {
        let general = pid(PieceKind::General, Color::Red, 1);
        // 标签重复
        assert!(Registry::from_placements(&[(general, pos("e1")), (general, pos("e2"))]).is_err());
        // 同格两子
        let advisor = pid(PieceKind::Advisor, Color::Red, 1);
        assert!(Registry::from_placements(&[(general, pos("e1")), (advisor, pos("e1"))]).is_err());
        // 越界
        assert!(Registry::from_placements(&[(general, Position::new(10, 0))]).is_err());
    }

    #[test]
    fn test_validate_candidate_rejections() {
        let (registry, board) = opening();

        let b3 = pos("b3");
        // 原地不动
        assert!(!registry.validate_candidate(b3, b3, Color::Red, &board));
        // 起点无子
        assert!(!registry.validate_candidate(pos("b5"), pos("b6"), Color::Red, &board));
        // 起点不是行棋方的子
        assert!(!registry.validate_candidate(pos("b8"), pos("b6"), Color::Red, &board));
        // 终点有己方子
        assert!(!registry.validate_candidate(pos("a1"), pos("a4"), Color::Red, &board));
        // 越界
        assert!(!registry.validate_candidate(Position::new(0, -1), b3, Color::Red, &board));

        // 正常走法通过
        assert!(registry.validate_candidate(b3, pos("b6"), Color::Red, &board));
    }

    #[test]
    fn test_opening_attack_maps() {
        let (registry, _) = opening();

        // 马二进三：c3 被 HR1 攻击
        let red_map = registry.attack_map(Color::Red);
        assert!(red_map[&pos("c3")].contains(&pid(PieceKind::Horse, Color::Red, 1)));
        // e2 同时被帅和双士攻击
        assert_eq!(red_map[&pos("e2")].len(), 3);
        // 黑方对称：c6 被 c7 的卒攻击
        let black_map = registry.attack_map(Color::Black);
        assert!(black_map[&pos("c6")].contains(&pid(PieceKind::Soldier, Color::Black, 2)));
    }

    #[test]
    fn test_opening_pseudo_legal_move_count() {
        let (registry, _) = opening();
        // 初始局面双方各有 44 个伪合法走法
        assert_eq!(registry.all_pseudo_legal_moves(Color::Red).len(), 44);
        assert_eq!(registry.all_pseudo_legal_moves(Color::Black).len(), 44);
    }

    #[test]
    fn test_is_in_check() {
        let (registry, _) = ready(vec![
            (pid(PieceKind::General, Color::Black, 1), pos("e10")),
            (pid(PieceKind::Chariot, Color::Red, 1), pos("e9")),
            (pid(PieceKind::General, Color::Red, 1), pos("e1")),
        ]);
        assert!(registry.is_in_check(Color::Black));
        assert!(!registry.is_in_check(Color::Red));
    }

    #[test]
    fn test_missing_general_reads_as_checked() {
        // 场上没有黑将：按被将死处理，而不是 panic
        let (registry, _) = ready(vec![(pid(PieceKind::General, Color::Red, 1), pos("e1"))]);
        assert!(registry.is_in_check(Color::Black));
        assert!(!registry.is_in_check(Color::Red));
    }

    #[test]
    fn test_capture_buffer_roundtrip() {
        let soldier = pid(PieceKind::Soldier, Color::Black, 1);
        let (mut registry, _) = ready(vec![
            (pid(PieceKind::Chariot, Color::Red, 1), pos("e5")),
            (soldier, pos("e8")),
        ]);

        registry.capture_at(pos("e8"), Color::Red);
        assert_eq!(registry.piece_count(), 1);
        assert_eq!(registry.captured_piece().map(|p| p.id), Some(soldier));

        registry.restore_captured();
        assert_eq!(registry.piece_count(), 2);
        assert!(registry.captured_piece().is_none());
        assert_eq!(registry.piece_at(pos("e8")).map(|p| p.id), Some(soldier));

        // 空格上的"吃子"只会清空缓存
        registry.capture_at(pos("a1"), Color::Red);
        assert!(registry.captured_piece().is_none());
        assert_eq!(registry.piece_count(), 2);
    }
}
