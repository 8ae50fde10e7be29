//! 对局控制
//!
//! 一次走子请求的协议：快速拒绝 -> 试探性吃子与移动 -> 重建棋盘投影
//! 并整体重算攻击映射 -> 送将检查（失败则回滚）-> 落定，或按探测要求
//! 无条件回滚。真实走子与终局探测走同一条路径，唯一区别是探测在成功
//! 后也回滚。

use log::{debug, info};

use crate::board::Board;
use crate::registry::Registry;
use crate::setup::{parse_setup, setup_string, OPENING_PIECES};
use crate::types::{Color, GameState, Move, PieceId, Position};

/// 一局象棋
pub struct Game {
    registry: Registry,
    board: Board,
    current_turn: Color,
    state: GameState,
}

impl Game {
    /// 标准开局，红先
    pub fn new() -> Game {
        let registry = Registry::from_placements(&OPENING_PIECES)
            .expect("builtin opening placement is valid");
        let mut game = Game {
            registry,
            board: Board::empty(),
            current_turn: Color::Red,
            state: GameState::InProgress,
        };
        game.refresh();
        game
    }

    /// 从局面串开局（测试与摆谱用）
    pub fn from_setup(setup: &str) -> Result<Game, String> {
        let state = parse_setup(setup)?;
        let registry = Registry::from_placements(&state.pieces)?;
        let mut game = Game {
            registry,
            board: Board::empty(),
            current_turn: state.turn,
            state: GameState::InProgress,
        };
        game.refresh();
        Ok(game)
    }

    /// 尝试为当前行棋方走一步棋
    ///
    /// 返回走法是否被接受。被接受的走法会吃子、换边并做终局判定；
    /// 被拒绝的走法不留下任何痕迹。
    pub fn attempt_move(&mut self, from: Position, to: Position) -> bool {
        self.try_move(from, to, false)
    }

    fn try_move(&mut self, from: Position, to: Position, probe: bool) -> bool {
        // 终局后不再接受任何走子
        if self.state != GameState::InProgress {
            if !probe {
                debug!("move rejected, game already concluded: {}{}", from, to);
            }
            return false;
        }
        if !self
            .registry
            .validate_candidate(from, to, self.current_turn, &self.board)
        {
            if !probe {
                debug!("move rejected by piece rules: {}{}", from, to);
            }
            return false;
        }
        let mover = match self.registry.piece_at(from) {
            Some(piece) => piece.id,
            None => return false,
        };

        // 试探性执行：先吃子后移动，再整体重建与重算
        self.registry.capture_at(to, self.current_turn);
        self.registry.relocate(mover, to);
        self.refresh();

        // 送将检查：走完后己方被将军则整步无效
        if self.registry.is_in_check(self.current_turn) {
            if !probe {
                debug!("move rejected, leaves own general in check: {}{}", from, to);
            }
            self.rollback(mover, from);
            return false;
        }

        if probe {
            self.rollback(mover, from);
            return true;
        }

        self.current_turn = self.current_turn.opposite();
        self.conclude_if_over();
        true
    }

    /// 撤销最近一次试探性执行：子回原位、被吃子复活、投影与映射重算
    fn rollback(&mut self, mover: PieceId, from: Position) {
        self.registry.relocate(mover, from);
        self.registry.restore_captured();
        self.refresh();
    }

    /// 从棋子集合重建棋盘投影，然后重算双方攻击映射
    fn refresh(&mut self) {
        self.board = Board::from_placements(self.registry.placements());
        self.registry.recompute_attack_maps(&self.board);
    }

    /// 终局判定：新行棋方的所有伪合法走法逐一探测，全部失败则上一手获胜
    ///
    /// 不区分困毙与将死，两者都记为走出最后一着的一方获胜。
    fn conclude_if_over(&mut self) {
        let moves = self.registry.all_pseudo_legal_moves(self.current_turn);
        for mv in moves {
            if self.try_move(mv.from, mv.to, true) {
                return;
            }
        }
        let winner = self.current_turn.opposite();
        self.state = GameState::win_for(winner);
        info!("game over: {} wins", winner);
    }

    /// 当前行棋方所有真正合法（探测通过）的走法
    pub fn legal_moves(&mut self) -> Vec<Move> {
        self.registry
            .all_pseudo_legal_moves(self.current_turn)
            .into_iter()
            .filter(|mv| self.try_move(mv.from, mv.to, true))
            .collect()
    }

    /// 当前对局状态
    #[inline]
    pub fn state(&self) -> GameState {
        self.state
    }

    /// 当前行棋方
    #[inline]
    pub fn current_turn(&self) -> Color {
        self.current_turn
    }

    /// 某方是否被将军
    pub fn is_in_check(&self, color: Color) -> bool {
        self.registry.is_in_check(color)
    }

    /// 只读棋盘投影
    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// 只读快照：10 行 x 9 列的标签网格
    pub fn snapshot(&self) -> [[Option<PieceId>; 9]; 10] {
        self.board.snapshot()
    }

    /// 当前局面串
    pub fn to_setup(&self) -> String {
        setup_string(&self.board, self.current_turn)
    }

    /// 场上活棋子数量
    pub fn piece_count(&self) -> usize {
        self.registry.piece_count()
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}
