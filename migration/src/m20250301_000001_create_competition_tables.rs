//! 基线迁移：创建比赛计分所需的六张表
//!
//! 1. competitions：比赛
//! 2. teams / games：通过 comp_id 引用 competitions（ON DELETE RESTRICT）
//! 3. players：可选地引用 teams
//! 4. team_scores_log / player_scores_log：按比赛模式分别记录得分
//!
//! 注意：players 与两张得分日志表上的 team_id / player_id / game_id
//! 只建索引、不建外键约束，删除队伍、选手、项目时不会级联，也不会被阻止。

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 1. 比赛表
        manager
            .create_table(
                Table::create()
                    .table(Competitions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Competitions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Competitions::Name).string().not_null())
                    .col(ColumnDef::new(Competitions::StartDate).date().not_null())
                    .col(ColumnDef::new(Competitions::EndDate).date().not_null())
                    .col(ColumnDef::new(Competitions::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 2. 队伍表
        manager
            .create_table(
                Table::create()
                    .table(Teams::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Teams::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Teams::Name).string().not_null())
                    .col(ColumnDef::new(Teams::CompId).integer().not_null())
                    .col(ColumnDef::new(Teams::Score).integer().not_null().default(0))
                    .col(ColumnDef::new(Teams::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_teams_comp_id")
                            .from(Teams::Table, Teams::CompId)
                            .to(Competitions::Table, Competitions::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // 3. 选手表
        manager
            .create_table(
                Table::create()
                    .table(Players::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Players::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Players::TeamId).integer().null())
                    .col(ColumnDef::new(Players::Name).string().not_null())
                    .col(ColumnDef::new(Players::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 4. 比赛项目表
        manager
            .create_table(
                Table::create()
                    .table(Games::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Games::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Games::CompId).integer().not_null())
                    .col(ColumnDef::new(Games::Name).string().not_null())
                    .col(ColumnDef::new(Games::TeamGame).boolean().not_null())
                    .col(ColumnDef::new(Games::DatePlayed).date().not_null())
                    .col(ColumnDef::new(Games::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_games_comp_id")
                            .from(Games::Table, Games::CompId)
                            .to(Competitions::Table, Competitions::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // 5. 队伍得分日志
        manager
            .create_table(
                Table::create()
                    .table(TeamScoresLog::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TeamScoresLog::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TeamScoresLog::TeamId).integer().not_null())
                    .col(ColumnDef::new(TeamScoresLog::GameId).integer().not_null())
                    .col(ColumnDef::new(TeamScoresLog::Points).integer().not_null())
                    .col(ColumnDef::new(TeamScoresLog::Comment).text().null())
                    .col(ColumnDef::new(TeamScoresLog::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 6. 选手得分日志
        manager
            .create_table(
                Table::create()
                    .table(PlayerScoresLog::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PlayerScoresLog::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PlayerScoresLog::PlayerId).integer().not_null())
                    .col(ColumnDef::new(PlayerScoresLog::GameId).integer().not_null())
                    .col(ColumnDef::new(PlayerScoresLog::Points).integer().not_null())
                    .col(ColumnDef::new(PlayerScoresLog::Comment).text().null())
                    .col(ColumnDef::new(PlayerScoresLog::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        create_indexes(manager).await?;

        log::info!("[MIGRATION] competition tables created");
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PlayerScoresLog::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TeamScoresLog::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Games::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Players::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Teams::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Competitions::Table).to_owned())
            .await?;
        Ok(())
    }
}

/// 为外键列和常用筛选列建立索引
async fn create_indexes(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    let indexes = [
        Index::create()
            .name("idx_teams_comp_id")
            .table(Teams::Table)
            .col(Teams::CompId)
            .to_owned(),
        Index::create()
            .name("idx_players_team_id")
            .table(Players::Table)
            .col(Players::TeamId)
            .to_owned(),
        Index::create()
            .name("idx_games_comp_id")
            .table(Games::Table)
            .col(Games::CompId)
            .to_owned(),
        Index::create()
            .name("idx_team_scores_log_team_id")
            .table(TeamScoresLog::Table)
            .col(TeamScoresLog::TeamId)
            .to_owned(),
        Index::create()
            .name("idx_team_scores_log_game_id")
            .table(TeamScoresLog::Table)
            .col(TeamScoresLog::GameId)
            .to_owned(),
        Index::create()
            .name("idx_player_scores_log_player_id")
            .table(PlayerScoresLog::Table)
            .col(PlayerScoresLog::PlayerId)
            .to_owned(),
        Index::create()
            .name("idx_player_scores_log_game_id")
            .table(PlayerScoresLog::Table)
            .col(PlayerScoresLog::GameId)
            .to_owned(),
    ];

    for index in indexes {
        manager.create_index(index).await?;
    }

    Ok(())
}

#[derive(DeriveIden)]
enum Competitions {
    Table,
    Id,
    Name,
    StartDate,
    EndDate,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Teams {
    Table,
    Id,
    Name,
    CompId,
    Score,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Players {
    Table,
    Id,
    TeamId,
    Name,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Games {
    Table,
    Id,
    CompId,
    Name,
    TeamGame,
    DatePlayed,
    CreatedAt,
}

#[derive(DeriveIden)]
enum TeamScoresLog {
    Table,
    Id,
    TeamId,
    GameId,
    Points,
    Comment,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PlayerScoresLog {
    Table,
    Id,
    PlayerId,
    GameId,
    Points,
    Comment,
    CreatedAt,
}
