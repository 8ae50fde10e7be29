//! Xiangqi（中国象棋）规则引擎
//!
//! 判定走法合法性、执行走法、检测将军并判定胜负。
//! 不含任何棋力搜索；渲染与交互由外部的表示层消费只读快照完成。

pub mod board;
pub mod game;
pub mod piece;
pub mod registry;
pub mod setup;
pub mod test_positions;
pub mod types;

pub use board::Board;
pub use game::Game;
pub use registry::Registry;
pub use setup::{parse_setup, setup_string, SetupState, OPENING};
pub use types::{Color, GameState, Move, PieceId, PieceKind, Position};
