#![allow(dead_code)]

use comp_tracker_lib::AppConfig;
use comp_tracker_lib::database::connection::connect_and_migrate;
use comp_tracker_lib::database::dto::{NewCompetition, NewGame, NewPlayer, NewTeam};
use comp_tracker_lib::database::repository::{
    competitions_repository::CompetitionsRepository, games_repository::GamesRepository,
    players_repository::PlayersRepository, teams_repository::TeamsRepository,
};
use comp_tracker_lib::entity::{competitions, games, players, teams};
use sea_orm::DatabaseConnection;

/// 每个测试使用独立的内存数据库
pub async fn setup() -> DatabaseConnection {
    let config = AppConfig {
        database_url: Some("sqlite::memory:".to_string()),
        max_connections: Some(1),
        ..AppConfig::default()
    };
    connect_and_migrate(&config).await.unwrap()
}

pub async fn competition(db: &DatabaseConnection, name: &str) -> competitions::Model {
    CompetitionsRepository::create(
        db,
        NewCompetition {
            name: name.to_string(),
            start_date: "2025-03-01".to_string(),
            end_date: "2025-03-03".to_string(),
        },
    )
    .await
    .unwrap()
}

pub async fn team(db: &DatabaseConnection, comp_id: i32, name: &str) -> teams::Model {
    TeamsRepository::create(
        db,
        NewTeam {
            name: name.to_string(),
            comp_id,
            score: 0,
        },
    )
    .await
    .unwrap()
}

pub async fn player(db: &DatabaseConnection, team_id: Option<i32>, name: &str) -> players::Model {
    PlayersRepository::create(
        db,
        NewPlayer {
            name: name.to_string(),
            team_id,
        },
    )
    .await
    .unwrap()
}

pub async fn game(
    db: &DatabaseConnection,
    comp_id: i32,
    name: &str,
    team_game: bool,
) -> games::Model {
    GamesRepository::create(
        db,
        NewGame {
            comp_id,
            name: name.to_string(),
            team_game: team_game.into(),
            date_played: "2025-03-02".to_string(),
        },
    )
    .await
    .unwrap()
}
