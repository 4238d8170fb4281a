//! 按比赛范围筛选的联表视图
//!
//! 每个视图都把外键解析为可读的名称。传入 `scope = Some(comp_id)` 时，
//! 结果只保留最终归属于该比赛的行；`None` 表示不限比赛。
//! 读取不会修改任何状态，同一范围重复查询得到相同的结果。

use chrono::NaiveDate;
use sea_orm::*;
use serde::{Deserialize, Serialize};

use crate::entity::prelude::*;
use crate::entity::{competitions, games, player_scores_log, players, team_scores_log, teams};
use crate::error::Result;

/// 得分视图中缺失的一方（队伍或选手）显示的占位符
pub const NOT_APPLICABLE: &str = "N/A";

/// 队伍视图：队伍 → 比赛（内连接）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FromQueryResult)]
pub struct TeamView {
    pub id: i32,
    pub name: String,
    pub competition_name: String,
    pub score: i32,
}

/// 得分视图：合并队伍与选手两张日志表
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreView {
    pub team_name: String,
    pub player_name: String,
    pub game_name: String,
    pub competition_name: String,
    pub points: i32,
    pub comment: Option<String>,
    pub created_at: i64,
}

/// 比赛项目视图：项目 → 比赛（内连接）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FromQueryResult)]
pub struct GameView {
    pub id: i32,
    pub competition_name: String,
    pub name: String,
    pub team_game: bool,
    pub date_played: NaiveDate,
    pub created_at: i64,
}

/// 选手视图：选手 → 队伍（左连接），无队伍时 team_name 为空
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FromQueryResult)]
pub struct PlayerView {
    pub id: i32,
    pub team_name: Option<String>,
    pub name: String,
    pub created_at: i64,
}

#[derive(Debug, FromQueryResult)]
struct TeamScoreRow {
    team_name: Option<String>,
    game_name: String,
    competition_name: String,
    points: i32,
    comment: Option<String>,
    created_at: i64,
}

#[derive(Debug, FromQueryResult)]
struct PlayerScoreRow {
    player_name: Option<String>,
    game_name: String,
    competition_name: String,
    points: i32,
    comment: Option<String>,
    created_at: i64,
}

fn or_not_applicable(name: Option<String>) -> String {
    name.unwrap_or_else(|| NOT_APPLICABLE.to_string())
}

/// 范围视图查询
pub struct ScopedViews;

impl ScopedViews {
    /// 队伍视图
    pub async fn teams(db: &DatabaseConnection, scope: Option<i32>) -> Result<Vec<TeamView>> {
        let mut query = Teams::find()
            .select_only()
            .column_as(teams::Column::Id, "id")
            .column_as(teams::Column::Name, "name")
            .column_as(competitions::Column::Name, "competition_name")
            .column_as(teams::Column::Score, "score")
            .join(JoinType::InnerJoin, teams::Relation::Competition.def());

        if let Some(comp_id) = scope {
            query = query.filter(teams::Column::CompId.eq(comp_id));
        }

        Ok(query
            .order_by_asc(teams::Column::Id)
            .into_model::<TeamView>()
            .all(db)
            .await?)
    }

    /// 得分视图
    ///
    /// 先列出队伍得分（按日志 ID），再列出选手得分；
    /// 已删除或不适用的一方显示为 "N/A"，项目或比赛已不存在的记录不出现
    pub async fn scores(db: &DatabaseConnection, scope: Option<i32>) -> Result<Vec<ScoreView>> {
        let mut team_query = TeamScoresLog::find()
            .select_only()
            .column_as(teams::Column::Name, "team_name")
            .column_as(games::Column::Name, "game_name")
            .column_as(competitions::Column::Name, "competition_name")
            .column_as(team_scores_log::Column::Points, "points")
            .column_as(team_scores_log::Column::Comment, "comment")
            .column_as(team_scores_log::Column::CreatedAt, "created_at")
            .join(JoinType::LeftJoin, team_scores_log::Relation::Team.def())
            .join(JoinType::InnerJoin, team_scores_log::Relation::Game.def())
            .join(JoinType::InnerJoin, games::Relation::Competition.def());

        let mut player_query = PlayerScoresLog::find()
            .select_only()
            .column_as(players::Column::Name, "player_name")
            .column_as(games::Column::Name, "game_name")
            .column_as(competitions::Column::Name, "competition_name")
            .column_as(player_scores_log::Column::Points, "points")
            .column_as(player_scores_log::Column::Comment, "comment")
            .column_as(player_scores_log::Column::CreatedAt, "created_at")
            .join(JoinType::LeftJoin, player_scores_log::Relation::Player.def())
            .join(JoinType::InnerJoin, player_scores_log::Relation::Game.def())
            .join(JoinType::InnerJoin, games::Relation::Competition.def());

        if let Some(comp_id) = scope {
            team_query = team_query.filter(games::Column::CompId.eq(comp_id));
            player_query = player_query.filter(games::Column::CompId.eq(comp_id));
        }

        let team_rows = team_query
            .order_by_asc(team_scores_log::Column::Id)
            .into_model::<TeamScoreRow>()
            .all(db)
            .await?;
        let player_rows = player_query
            .order_by_asc(player_scores_log::Column::Id)
            .into_model::<PlayerScoreRow>()
            .all(db)
            .await?;

        let mut views = Vec::with_capacity(team_rows.len() + player_rows.len());
        views.extend(team_rows.into_iter().map(|row| ScoreView {
            team_name: or_not_applicable(row.team_name),
            player_name: NOT_APPLICABLE.to_string(),
            game_name: row.game_name,
            competition_name: row.competition_name,
            points: row.points,
            comment: row.comment,
            created_at: row.created_at,
        }));
        views.extend(player_rows.into_iter().map(|row| ScoreView {
            team_name: NOT_APPLICABLE.to_string(),
            player_name: or_not_applicable(row.player_name),
            game_name: row.game_name,
            competition_name: row.competition_name,
            points: row.points,
            comment: row.comment,
            created_at: row.created_at,
        }));
        Ok(views)
    }

    /// 比赛项目视图
    pub async fn games(db: &DatabaseConnection, scope: Option<i32>) -> Result<Vec<GameView>> {
        let mut query = Games::find()
            .select_only()
            .column_as(games::Column::Id, "id")
            .column_as(competitions::Column::Name, "competition_name")
            .column_as(games::Column::Name, "name")
            .column_as(games::Column::TeamGame, "team_game")
            .column_as(games::Column::DatePlayed, "date_played")
            .column_as(games::Column::CreatedAt, "created_at")
            .join(JoinType::InnerJoin, games::Relation::Competition.def());

        if let Some(comp_id) = scope {
            query = query.filter(games::Column::CompId.eq(comp_id));
        }

        Ok(query
            .order_by_asc(games::Column::Id)
            .into_model::<GameView>()
            .all(db)
            .await?)
    }

    /// 选手视图
    ///
    /// 有范围时通过选手所属队伍的比赛筛选，无队伍的选手会被排除
    pub async fn players(db: &DatabaseConnection, scope: Option<i32>) -> Result<Vec<PlayerView>> {
        let mut query = Players::find()
            .select_only()
            .column_as(players::Column::Id, "id")
            .column_as(teams::Column::Name, "team_name")
            .column_as(players::Column::Name, "name")
            .column_as(players::Column::CreatedAt, "created_at")
            .join(JoinType::LeftJoin, players::Relation::Team.def());

        if let Some(comp_id) = scope {
            query = query.filter(teams::Column::CompId.eq(comp_id));
        }

        Ok(query
            .order_by_asc(players::Column::Id)
            .into_model::<PlayerView>()
            .all(db)
            .await?)
    }
}
