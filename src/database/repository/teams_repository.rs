//! 队伍数据仓库

use crate::database::dto::{NewTeam, TeamFilter};
use crate::database::repository::competitions_repository::CompetitionsRepository;
use crate::database::validation::require_name;
use crate::entity::prelude::*;
use crate::entity::teams;
use crate::error::{CoreError, Result};
use sea_orm::*;

/// 队伍数据仓库
pub struct TeamsRepository;

impl TeamsRepository {
    /// 创建队伍，comp_id 必须指向已存在的比赛
    pub async fn create(db: &DatabaseConnection, team: NewTeam) -> Result<teams::Model> {
        let name = require_name("name", &team.name)?;

        let txn = db.begin().await?;
        if !CompetitionsRepository::exists(&txn, team.comp_id).await? {
            return Err(CoreError::Reference(format!("比赛 #{}", team.comp_id)));
        }

        let active = teams::ActiveModel {
            id: NotSet,
            name: Set(name),
            comp_id: Set(team.comp_id),
            score: Set(team.score),
            created_at: Set(chrono::Utc::now().timestamp()),
        };
        let model = active.insert(&txn).await.map_err(CoreError::on_insert)?;
        txn.commit().await?;

        log::info!(
            "创建队伍 #{} {} (比赛 #{})",
            model.id,
            model.name,
            model.comp_id
        );
        Ok(model)
    }

    /// 根据 ID 查询队伍
    pub async fn find_by_id(db: &DatabaseConnection, id: i32) -> Result<Option<teams::Model>> {
        Ok(Teams::find_by_id(id).one(db).await?)
    }

    /// 根据 ID 获取队伍，不存在时返回 NotFound
    pub async fn get(db: &DatabaseConnection, id: i32) -> Result<teams::Model> {
        Self::find_by_id(db, id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("队伍 #{}", id)))
    }

    /// 检查队伍是否存在
    pub async fn exists<C>(conn: &C, id: i32) -> Result<bool>
    where
        C: ConnectionTrait,
    {
        Ok(Teams::find_by_id(id).count(conn).await? > 0)
    }

    /// 获取队伍列表（按 ID 升序），可按比赛筛选
    pub async fn find_all(db: &DatabaseConnection, filter: TeamFilter) -> Result<Vec<teams::Model>> {
        let mut query = Teams::find();
        if let Some(comp_id) = filter.comp_id {
            query = query.filter(teams::Column::CompId.eq(comp_id));
        }
        Ok(query.order_by_asc(teams::Column::Id).all(db).await?)
    }

    /// 删除队伍（不级联，队员与得分记录保留）
    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<()> {
        let result = Teams::delete_by_id(id)
            .exec(db)
            .await
            .map_err(CoreError::on_delete)?;
        if result.rows_affected == 0 {
            return Err(CoreError::NotFound(format!("队伍 #{}", id)));
        }
        log::info!("删除队伍 #{}", id);
        Ok(())
    }
}
