//! 选手数据仓库

use crate::database::dto::{NewPlayer, PlayerFilter};
use crate::database::repository::teams_repository::TeamsRepository;
use crate::database::validation::require_name;
use crate::entity::prelude::*;
use crate::entity::{players, teams};
use crate::error::{CoreError, Result};
use sea_orm::*;

/// 选手数据仓库
pub struct PlayersRepository;

impl PlayersRepository {
    /// 创建选手，team_id 如果提供则必须指向已存在的队伍
    pub async fn create(db: &DatabaseConnection, player: NewPlayer) -> Result<players::Model> {
        let name = require_name("name", &player.name)?;

        let txn = db.begin().await?;
        if let Some(team_id) = player.team_id {
            if !TeamsRepository::exists(&txn, team_id).await? {
                return Err(CoreError::Reference(format!("队伍 #{}", team_id)));
            }
        }

        let active = players::ActiveModel {
            id: NotSet,
            team_id: Set(player.team_id),
            name: Set(name),
            created_at: Set(chrono::Utc::now().timestamp()),
        };
        let model = active.insert(&txn).await.map_err(CoreError::on_insert)?;
        txn.commit().await?;

        log::info!("创建选手 #{} {}", model.id, model.name);
        Ok(model)
    }

    /// 根据 ID 查询选手
    pub async fn find_by_id(db: &DatabaseConnection, id: i32) -> Result<Option<players::Model>> {
        Ok(Players::find_by_id(id).one(db).await?)
    }

    /// 根据 ID 获取选手，不存在时返回 NotFound
    pub async fn get(db: &DatabaseConnection, id: i32) -> Result<players::Model> {
        Self::find_by_id(db, id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("选手 #{}", id)))
    }

    /// 检查选手是否存在
    pub async fn exists<C>(conn: &C, id: i32) -> Result<bool>
    where
        C: ConnectionTrait,
    {
        Ok(Players::find_by_id(id).count(conn).await? > 0)
    }

    /// 获取选手列表（按 ID 升序），可按队伍筛选
    pub async fn find_all(
        db: &DatabaseConnection,
        filter: PlayerFilter,
    ) -> Result<Vec<players::Model>> {
        let mut query = Players::find();
        if let Some(team_id) = filter.team_id {
            query = query.filter(players::Column::TeamId.eq(team_id));
        }
        Ok(query.order_by_asc(players::Column::Id).all(db).await?)
    }

    /// 获取所属队伍参加了指定比赛的选手（无队伍的选手不包含在内）
    pub async fn find_in_competition(
        db: &DatabaseConnection,
        comp_id: i32,
    ) -> Result<Vec<players::Model>> {
        Ok(Players::find()
            .join(JoinType::InnerJoin, players::Relation::Team.def())
            .filter(teams::Column::CompId.eq(comp_id))
            .order_by_asc(players::Column::Id)
            .all(db)
            .await?)
    }

    /// 删除选手（不级联，得分记录保留）
    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<()> {
        let result = Players::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(CoreError::NotFound(format!("选手 #{}", id)));
        }
        log::info!("删除选手 #{}", id);
        Ok(())
    }
}
