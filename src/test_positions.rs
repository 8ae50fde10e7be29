//! 测试局面库
//!
//! 提供命名的局面串，方便测试与基准使用
//!
//! 命名规范:
//! - CHECK_*: 将军局面
//! - MATE_*: 一步杀局面
//! - STALEMATE_*: 一步困毙局面
//! - FACING_*: 两将对脸相关局面
//! - 其余为专项局面

/// 黑将被 e9 红车将军，黑方行棋
pub const CHECK_BY_CHARIOT: &str = "4g4/4C4/9/9/9/9/9/9/9/4G4 b";

/// 红方 b8 车上二路即双车错杀（a9 车封住第 9 路）
pub const MATE_IN_ONE: &str = "4g4/C8/1C7/9/9/9/9/9/9/3G5 r";

/// 红方 e8 车上一路后黑将困毙：d10 的黑将未被将军但无路可走
pub const STALEMATE_IN_ONE: &str = "3g5/9/4C4/9/9/9/9/9/9/4G4 r";

/// 两将之间整列无遮挡，红帅走入该列即对脸
pub const FACING_OPEN_FILE: &str = "4g4/9/9/9/9/9/9/9/9/3G5 r";

/// 同上，但 e5 有兵遮挡
pub const FACING_WITH_SCREEN: &str = "4g4/9/9/9/9/4S4/9/9/9/3G5 r";

/// 两将已在同一列上，中间无子
pub const FACING_SAME_FILE: &str = "4g4/9/9/9/9/9/9/9/9/4G4 r";

/// 红马在 e5 挡住黑车对红帅的路线，同时 g6 有可吃的黑卒
///
/// 马一跳开就送将，用于验证拒绝走法后的完整回滚。
pub const PINNED_HORSE_SCREEN: &str = "4g4/9/4c4/9/6s2/4H4/9/9/9/4G4 r";

/// 红马是两将之间唯一的遮挡
pub const EXPOSED_FILE_HORSE: &str = "4g4/9/9/9/9/4H4/9/9/9/4G4 r";

/// 只有红帅：对方空门
pub const LONE_RED_GENERAL: &str = "9/9/9/9/9/9/9/9/9/4G4 r";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::parse_setup;

    #[test]
    fn test_all_positions_parse() {
        for setup in [
            CHECK_BY_CHARIOT,
            MATE_IN_ONE,
            STALEMATE_IN_ONE,
            FACING_OPEN_FILE,
            FACING_WITH_SCREEN,
            FACING_SAME_FILE,
            PINNED_HORSE_SCREEN,
            EXPOSED_FILE_HORSE,
            LONE_RED_GENERAL,
        ] {
            assert!(parse_setup(setup).is_ok(), "setup should parse: {}", setup);
        }
    }
}
