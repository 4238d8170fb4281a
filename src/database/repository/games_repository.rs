//! 比赛项目数据仓库

use crate::database::dto::{GameFilter, NewGame};
use crate::database::repository::competitions_repository::CompetitionsRepository;
use crate::database::validation::{coerce_flag, parse_date, require_name};
use crate::entity::games;
use crate::entity::prelude::*;
use crate::error::{CoreError, Result};
use sea_orm::*;

/// 比赛项目数据仓库
pub struct GamesRepository;

impl GamesRepository {
    /// 创建比赛项目，comp_id 必须指向已存在的比赛
    pub async fn create(db: &DatabaseConnection, game: NewGame) -> Result<games::Model> {
        let name = require_name("name", &game.name)?;
        let team_game = coerce_flag("team_game", &game.team_game)?;
        let date_played = parse_date("date_played", &game.date_played)?;

        let txn = db.begin().await?;
        if !CompetitionsRepository::exists(&txn, game.comp_id).await? {
            return Err(CoreError::Reference(format!("比赛 #{}", game.comp_id)));
        }

        let active = games::ActiveModel {
            id: NotSet,
            comp_id: Set(game.comp_id),
            name: Set(name),
            team_game: Set(team_game),
            date_played: Set(date_played),
            created_at: Set(chrono::Utc::now().timestamp()),
        };
        let model = active.insert(&txn).await.map_err(CoreError::on_insert)?;
        txn.commit().await?;

        log::info!(
            "创建项目 #{} {} (比赛 #{}, {:?})",
            model.id,
            model.name,
            model.comp_id,
            model.mode()
        );
        Ok(model)
    }

    /// 根据 ID 查询比赛项目
    pub async fn find_by_id<C>(conn: &C, id: i32) -> Result<Option<games::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(Games::find_by_id(id).one(conn).await?)
    }

    /// 根据 ID 获取比赛项目，不存在时返回 NotFound
    pub async fn get(db: &DatabaseConnection, id: i32) -> Result<games::Model> {
        Self::find_by_id(db, id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("项目 #{}", id)))
    }

    /// 获取比赛项目列表（按 ID 升序），可按比赛筛选
    pub async fn find_all(db: &DatabaseConnection, filter: GameFilter) -> Result<Vec<games::Model>> {
        let mut query = Games::find();
        if let Some(comp_id) = filter.comp_id {
            query = query.filter(games::Column::CompId.eq(comp_id));
        }
        Ok(query.order_by_asc(games::Column::Id).all(db).await?)
    }

    /// 删除比赛项目（不级联，得分记录保留）
    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<()> {
        let result = Games::delete_by_id(id)
            .exec(db)
            .await
            .map_err(CoreError::on_delete)?;
        if result.rows_affected == 0 {
            return Err(CoreError::NotFound(format!("项目 #{}", id)));
        }
        log::info!("删除项目 #{}", id);
        Ok(())
    }
}
