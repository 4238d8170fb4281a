//! 得分日志仓库
//!
//! 队伍得分和选手得分分别写入两张日志表。写入前会再次核对项目的计分模式，
//! 保证每条得分记录只归属于一支队伍或一名选手。

use crate::database::dto::{NewPlayerScore, NewTeamScore, PlayerScoreFilter, TeamScoreFilter};
use crate::database::repository::games_repository::GamesRepository;
use crate::database::repository::players_repository::PlayersRepository;
use crate::database::repository::teams_repository::TeamsRepository;
use crate::database::validation::{normalize_comment, parse_points};
use crate::entity::prelude::*;
use crate::entity::{games, player_scores_log, team_scores_log};
use crate::error::{CoreError, Result};
use sea_orm::*;

/// 得分日志仓库
pub struct ScoresRepository;

impl ScoresRepository {
    // ==================== 写入 ====================

    /// 记录队伍得分，只允许用于团体计分项目
    pub async fn create_team_score(
        db: &DatabaseConnection,
        score: NewTeamScore,
    ) -> Result<team_scores_log::Model> {
        let points = parse_points(&score.points)?;
        let comment = normalize_comment(score.comment);

        let txn = db.begin().await?;
        let game = Self::require_game(&txn, score.game_id).await?;
        if !game.mode().is_team() {
            return Err(CoreError::Validation(format!(
                "项目 #{} 为个人计分项目，不能记录队伍得分",
                game.id
            )));
        }
        if !TeamsRepository::exists(&txn, score.team_id).await? {
            return Err(CoreError::Reference(format!("队伍 #{}", score.team_id)));
        }

        let active = team_scores_log::ActiveModel {
            id: NotSet,
            team_id: Set(score.team_id),
            game_id: Set(game.id),
            points: Set(points),
            comment: Set(comment),
            created_at: Set(chrono::Utc::now().timestamp()),
        };
        let model = active.insert(&txn).await.map_err(CoreError::on_insert)?;
        txn.commit().await?;

        log::info!(
            "队伍 #{} 在项目 #{} 得分 {}",
            model.team_id,
            model.game_id,
            model.points
        );
        Ok(model)
    }

    /// 记录选手得分，只允许用于个人计分项目
    pub async fn create_player_score(
        db: &DatabaseConnection,
        score: NewPlayerScore,
    ) -> Result<player_scores_log::Model> {
        let points = parse_points(&score.points)?;
        let comment = normalize_comment(score.comment);

        let txn = db.begin().await?;
        let game = Self::require_game(&txn, score.game_id).await?;
        if game.mode().is_team() {
            return Err(CoreError::Validation(format!(
                "项目 #{} 为团体计分项目，不能记录选手得分",
                game.id
            )));
        }
        if !PlayersRepository::exists(&txn, score.player_id).await? {
            return Err(CoreError::Reference(format!("选手 #{}", score.player_id)));
        }

        let active = player_scores_log::ActiveModel {
            id: NotSet,
            player_id: Set(score.player_id),
            game_id: Set(game.id),
            points: Set(points),
            comment: Set(comment),
            created_at: Set(chrono::Utc::now().timestamp()),
        };
        let model = active.insert(&txn).await.map_err(CoreError::on_insert)?;
        txn.commit().await?;

        log::info!(
            "选手 #{} 在项目 #{} 得分 {}",
            model.player_id,
            model.game_id,
            model.points
        );
        Ok(model)
    }

    // ==================== 查询 ====================

    /// 根据 ID 获取队伍得分记录
    pub async fn get_team_score(
        db: &DatabaseConnection,
        id: i32,
    ) -> Result<team_scores_log::Model> {
        TeamScoresLog::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("队伍得分记录 #{}", id)))
    }

    /// 根据 ID 获取选手得分记录
    pub async fn get_player_score(
        db: &DatabaseConnection,
        id: i32,
    ) -> Result<player_scores_log::Model> {
        PlayerScoresLog::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("选手得分记录 #{}", id)))
    }

    /// 获取队伍得分记录（按 ID 升序）
    pub async fn find_team_scores(
        db: &DatabaseConnection,
        filter: TeamScoreFilter,
    ) -> Result<Vec<team_scores_log::Model>> {
        let mut query = TeamScoresLog::find();
        if let Some(team_id) = filter.team_id {
            query = query.filter(team_scores_log::Column::TeamId.eq(team_id));
        }
        if let Some(game_id) = filter.game_id {
            query = query.filter(team_scores_log::Column::GameId.eq(game_id));
        }
        Ok(query
            .order_by_asc(team_scores_log::Column::Id)
            .all(db)
            .await?)
    }

    /// 获取选手得分记录（按 ID 升序）
    pub async fn find_player_scores(
        db: &DatabaseConnection,
        filter: PlayerScoreFilter,
    ) -> Result<Vec<player_scores_log::Model>> {
        let mut query = PlayerScoresLog::find();
        if let Some(player_id) = filter.player_id {
            query = query.filter(player_scores_log::Column::PlayerId.eq(player_id));
        }
        if let Some(game_id) = filter.game_id {
            query = query.filter(player_scores_log::Column::GameId.eq(game_id));
        }
        Ok(query
            .order_by_asc(player_scores_log::Column::Id)
            .all(db)
            .await?)
    }

    // ==================== 删除 ====================

    /// 删除队伍得分记录
    pub async fn delete_team_score(db: &DatabaseConnection, id: i32) -> Result<()> {
        let result = TeamScoresLog::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(CoreError::NotFound(format!("队伍得分记录 #{}", id)));
        }
        log::info!("删除队伍得分记录 #{}", id);
        Ok(())
    }

    /// 删除选手得分记录
    pub async fn delete_player_score(db: &DatabaseConnection, id: i32) -> Result<()> {
        let result = PlayerScoresLog::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(CoreError::NotFound(format!("选手得分记录 #{}", id)));
        }
        log::info!("删除选手得分记录 #{}", id);
        Ok(())
    }

    // ==================== 私有方法 ====================

    async fn require_game<C>(conn: &C, game_id: i32) -> Result<games::Model>
    where
        C: ConnectionTrait,
    {
        GamesRepository::find_by_id(conn, game_id)
            .await?
            .ok_or_else(|| CoreError::Reference(format!("项目 #{}", game_id)))
    }
}
