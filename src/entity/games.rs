//! 比赛项目实体
//!
//! team_game 决定该项目的得分记入哪张日志表：
//! - true：团体计分，写入 team_scores_log
//! - false：个人计分，写入 player_scores_log

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "games")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub comp_id: i32,
    pub name: String,
    pub team_game: bool,
    pub date_played: Date,
    pub created_at: i64,
}

/// 计分模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Team,
    Player,
}

impl GameMode {
    pub fn from_team_game(team_game: bool) -> Self {
        if team_game {
            GameMode::Team
        } else {
            GameMode::Player
        }
    }

    pub fn is_team(self) -> bool {
        matches!(self, GameMode::Team)
    }
}

impl Model {
    /// 该项目的计分模式
    pub fn mode(&self) -> GameMode {
        GameMode::from_team_game(self.team_game)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::competitions::Entity",
        from = "Column::CompId",
        to = "super::competitions::Column::Id",
        on_delete = "Restrict"
    )]
    Competition,
    #[sea_orm(has_many = "super::team_scores_log::Entity")]
    TeamScoresLog,
    #[sea_orm(has_many = "super::player_scores_log::Entity")]
    PlayerScoresLog,
}

impl Related<super::competitions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Competition.def()
    }
}

impl Related<super::team_scores_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeamScoresLog.def()
    }
}

impl Related<super::player_scores_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlayerScoresLog.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
