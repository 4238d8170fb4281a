//! 数据实体模块
//!
//! 包含所有 SeaORM 实体定义，每个实体对应一张数据库表。

pub mod prelude;

pub mod competitions;
pub mod games;
pub mod player_scores_log;
pub mod players;
pub mod team_scores_log;
pub mod teams;
