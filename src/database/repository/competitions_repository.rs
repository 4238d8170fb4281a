//! 比赛数据仓库
//!
//! 删除比赛前会在同一个事务中统计引用它的队伍和项目，
//! 只要还有依赖记录就拒绝删除。

use crate::database::dto::NewCompetition;
use crate::database::validation::{parse_date, require_name};
use crate::entity::prelude::*;
use crate::entity::{competitions, games, teams};
use crate::error::{CoreError, Result};
use sea_orm::*;

/// 比赛数据仓库
pub struct CompetitionsRepository;

impl CompetitionsRepository {
    // ==================== 比赛 CRUD 操作 ====================

    /// 创建比赛
    pub async fn create(
        db: &DatabaseConnection,
        competition: NewCompetition,
    ) -> Result<competitions::Model> {
        let name = require_name("name", &competition.name)?;
        let start_date = parse_date("start_date", &competition.start_date)?;
        let end_date = parse_date("end_date", &competition.end_date)?;
        if end_date < start_date {
            return Err(CoreError::Validation(format!(
                "结束日期 {} 早于开始日期 {}",
                end_date, start_date
            )));
        }

        let now = chrono::Utc::now().timestamp();
        let active = competitions::ActiveModel {
            id: NotSet,
            name: Set(name),
            start_date: Set(start_date),
            end_date: Set(end_date),
            created_at: Set(now),
        };

        let model = active.insert(db).await.map_err(CoreError::on_insert)?;
        log::info!("创建比赛 #{} {}", model.id, model.name);
        Ok(model)
    }

    /// 根据 ID 查询比赛
    pub async fn find_by_id(
        db: &DatabaseConnection,
        id: i32,
    ) -> Result<Option<competitions::Model>> {
        Ok(Competitions::find_by_id(id).one(db).await?)
    }

    /// 根据 ID 获取比赛，不存在时返回 NotFound
    pub async fn get(db: &DatabaseConnection, id: i32) -> Result<competitions::Model> {
        Self::find_by_id(db, id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("比赛 #{}", id)))
    }

    /// 检查比赛是否存在
    pub async fn exists<C>(conn: &C, id: i32) -> Result<bool>
    where
        C: ConnectionTrait,
    {
        Ok(Competitions::find_by_id(id).count(conn).await? > 0)
    }

    /// 获取所有比赛（按 ID 升序）
    pub async fn find_all(db: &DatabaseConnection) -> Result<Vec<competitions::Model>> {
        Ok(Competitions::find()
            .order_by_asc(competitions::Column::Id)
            .all(db)
            .await?)
    }

    /// 统计引用该比赛的队伍数和项目数
    pub async fn count_dependents<C>(conn: &C, id: i32) -> Result<(u64, u64)>
    where
        C: ConnectionTrait,
    {
        let team_count = Teams::find()
            .filter(teams::Column::CompId.eq(id))
            .count(conn)
            .await?;
        let game_count = Games::find()
            .filter(games::Column::CompId.eq(id))
            .count(conn)
            .await?;
        Ok((team_count, game_count))
    }

    /// 删除比赛
    ///
    /// 检查与删除在同一事务内完成；任一检查失败时事务被丢弃（回滚），不删除任何记录
    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<()> {
        let txn = db.begin().await?;

        if !Self::exists(&txn, id).await? {
            return Err(CoreError::NotFound(format!("比赛 #{}", id)));
        }

        let (team_count, game_count) = Self::count_dependents(&txn, id).await?;
        if team_count > 0 || game_count > 0 {
            log::warn!(
                "拒绝删除比赛 #{}: 仍被 {} 支队伍和 {} 个项目引用",
                id,
                team_count,
                game_count
            );
            return Err(CoreError::ReferentialIntegrity(format!(
                "比赛 #{} 仍被 {} 支队伍和 {} 个项目引用",
                id, team_count, game_count
            )));
        }

        Competitions::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(CoreError::on_delete)?;
        txn.commit().await?;

        log::info!("删除比赛 #{}", id);
        Ok(())
    }
}
