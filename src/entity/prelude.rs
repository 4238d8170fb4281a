//! 预导入模块
//!
//! 提供常用类型的快捷导入。

pub use super::competitions::Entity as Competitions;
pub use super::games::Entity as Games;
pub use super::player_scores_log::Entity as PlayerScoresLog;
pub use super::players::Entity as Players;
pub use super::team_scores_log::Entity as TeamScoresLog;
pub use super::teams::Entity as Teams;

pub use super::games::GameMode;
