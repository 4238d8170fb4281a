use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::database::attribution::{Candidates, ResolverState, ScoreEvent, ScoreResolver};
use crate::database::dto::{
    GameFilter, NewCompetition, NewGame, NewPlayer, NewPlayerScore, NewTeam, NewTeamScore,
    PlayerFilter, PlayerScoreFilter, PointsValue, TeamFilter, TeamScoreFilter,
};
use crate::database::repository::{
    competitions_repository::CompetitionsRepository, games_repository::GamesRepository,
    players_repository::PlayersRepository, scores_repository::ScoresRepository,
    teams_repository::TeamsRepository,
};
use crate::database::views::{GameView, PlayerView, ScopedViews, ScoreView, TeamView};
use crate::entity::prelude::GameMode;
use crate::entity::{competitions, games, player_scores_log, players, team_scores_log, teams};
use crate::error::{CoreError, ErrorKind};

// ==================== 错误类型 ====================

/// 对外返回的错误：保留错误种类，消息带上操作上下文
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("[{kind:?}] {message}")]
pub struct CommandError {
    pub kind: ErrorKind,
    pub message: String,
}

impl CommandError {
    pub fn new(context: &str, err: CoreError) -> Self {
        Self {
            kind: err.kind(),
            message: format!("{}: {}", context, err),
        }
    }
}

type CommandResult<T> = Result<T, CommandError>;

fn context(ctx: &'static str) -> impl FnOnce(CoreError) -> CommandError {
    move |e| CommandError::new(ctx, e)
}

// ==================== 比赛相关 ====================

/// 创建比赛
pub async fn create_competition(
    db: &DatabaseConnection,
    competition: NewCompetition,
) -> CommandResult<competitions::Model> {
    CompetitionsRepository::create(db, competition)
        .await
        .map_err(context("创建比赛失败"))
}

/// 根据 ID 获取比赛
pub async fn get_competition(
    db: &DatabaseConnection,
    id: i32,
) -> CommandResult<competitions::Model> {
    CompetitionsRepository::get(db, id)
        .await
        .map_err(context("获取比赛失败"))
}

/// 获取所有比赛
pub async fn list_competitions(db: &DatabaseConnection) -> CommandResult<Vec<competitions::Model>> {
    CompetitionsRepository::find_all(db)
        .await
        .map_err(context("获取比赛列表失败"))
}

/// 删除比赛（仍有队伍或项目时拒绝）
pub async fn delete_competition(db: &DatabaseConnection, id: i32) -> CommandResult<()> {
    CompetitionsRepository::delete(db, id)
        .await
        .map_err(context("删除比赛失败"))
}

// ==================== 队伍相关 ====================

/// 创建队伍
pub async fn create_team(db: &DatabaseConnection, team: NewTeam) -> CommandResult<teams::Model> {
    TeamsRepository::create(db, team)
        .await
        .map_err(context("创建队伍失败"))
}

pub async fn get_team(db: &DatabaseConnection, id: i32) -> CommandResult<teams::Model> {
    TeamsRepository::get(db, id)
        .await
        .map_err(context("获取队伍失败"))
}

pub async fn list_teams(
    db: &DatabaseConnection,
    filter: TeamFilter,
) -> CommandResult<Vec<teams::Model>> {
    TeamsRepository::find_all(db, filter)
        .await
        .map_err(context("获取队伍列表失败"))
}

pub async fn delete_team(db: &DatabaseConnection, id: i32) -> CommandResult<()> {
    TeamsRepository::delete(db, id)
        .await
        .map_err(context("删除队伍失败"))
}

// ==================== 选手相关 ====================

/// 创建选手
pub async fn create_player(
    db: &DatabaseConnection,
    player: NewPlayer,
) -> CommandResult<players::Model> {
    PlayersRepository::create(db, player)
        .await
        .map_err(context("创建选手失败"))
}

pub async fn get_player(db: &DatabaseConnection, id: i32) -> CommandResult<players::Model> {
    PlayersRepository::get(db, id)
        .await
        .map_err(context("获取选手失败"))
}

pub async fn list_players(
    db: &DatabaseConnection,
    filter: PlayerFilter,
) -> CommandResult<Vec<players::Model>> {
    PlayersRepository::find_all(db, filter)
        .await
        .map_err(context("获取选手列表失败"))
}

pub async fn delete_player(db: &DatabaseConnection, id: i32) -> CommandResult<()> {
    PlayersRepository::delete(db, id)
        .await
        .map_err(context("删除选手失败"))
}

// ==================== 比赛项目相关 ====================

/// 创建比赛项目
pub async fn create_game(db: &DatabaseConnection, game: NewGame) -> CommandResult<games::Model> {
    GamesRepository::create(db, game)
        .await
        .map_err(context("创建比赛项目失败"))
}

pub async fn get_game(db: &DatabaseConnection, id: i32) -> CommandResult<games::Model> {
    GamesRepository::get(db, id)
        .await
        .map_err(context("获取比赛项目失败"))
}

pub async fn list_games(
    db: &DatabaseConnection,
    filter: GameFilter,
) -> CommandResult<Vec<games::Model>> {
    GamesRepository::find_all(db, filter)
        .await
        .map_err(context("获取比赛项目列表失败"))
}

pub async fn delete_game(db: &DatabaseConnection, id: i32) -> CommandResult<()> {
    GamesRepository::delete(db, id)
        .await
        .map_err(context("删除比赛项目失败"))
}

// ==================== 得分记录相关 ====================

/// 记录队伍得分
pub async fn create_team_score(
    db: &DatabaseConnection,
    score: NewTeamScore,
) -> CommandResult<team_scores_log::Model> {
    ScoresRepository::create_team_score(db, score)
        .await
        .map_err(context("记录队伍得分失败"))
}

pub async fn list_team_scores(
    db: &DatabaseConnection,
    filter: TeamScoreFilter,
) -> CommandResult<Vec<team_scores_log::Model>> {
    ScoresRepository::find_team_scores(db, filter)
        .await
        .map_err(context("获取队伍得分记录失败"))
}

pub async fn delete_team_score(db: &DatabaseConnection, id: i32) -> CommandResult<()> {
    ScoresRepository::delete_team_score(db, id)
        .await
        .map_err(context("删除队伍得分记录失败"))
}

/// 记录选手得分
pub async fn create_player_score(
    db: &DatabaseConnection,
    score: NewPlayerScore,
) -> CommandResult<player_scores_log::Model> {
    ScoresRepository::create_player_score(db, score)
        .await
        .map_err(context("记录选手得分失败"))
}

pub async fn list_player_scores(
    db: &DatabaseConnection,
    filter: PlayerScoreFilter,
) -> CommandResult<Vec<player_scores_log::Model>> {
    ScoresRepository::find_player_scores(db, filter)
        .await
        .map_err(context("获取选手得分记录失败"))
}

pub async fn delete_player_score(db: &DatabaseConnection, id: i32) -> CommandResult<()> {
    ScoresRepository::delete_player_score(db, id)
        .await
        .map_err(context("删除选手得分记录失败"))
}

// ==================== 视图相关 ====================

pub async fn team_view(
    db: &DatabaseConnection,
    comp_id: Option<i32>,
) -> CommandResult<Vec<TeamView>> {
    ScopedViews::teams(db, comp_id)
        .await
        .map_err(context("查询队伍视图失败"))
}

pub async fn score_view(
    db: &DatabaseConnection,
    comp_id: Option<i32>,
) -> CommandResult<Vec<ScoreView>> {
    ScopedViews::scores(db, comp_id)
        .await
        .map_err(context("查询得分视图失败"))
}

pub async fn game_view(
    db: &DatabaseConnection,
    comp_id: Option<i32>,
) -> CommandResult<Vec<GameView>> {
    ScopedViews::games(db, comp_id)
        .await
        .map_err(context("查询比赛项目视图失败"))
}

pub async fn player_view(
    db: &DatabaseConnection,
    comp_id: Option<i32>,
) -> CommandResult<Vec<PlayerView>> {
    ScopedViews::players(db, comp_id)
        .await
        .map_err(context("查询选手视图失败"))
}

// ==================== 计分流程相关 ====================

/// 选择比赛项目，返回新的计分模式
pub async fn select_game(
    db: &DatabaseConnection,
    resolver: &mut ScoreResolver,
    game_id: i32,
) -> CommandResult<GameMode> {
    resolver
        .select_game(db, game_id)
        .await
        .map_err(context("选择比赛项目失败"))
}

/// 当前计分模式下的候选队伍或选手
pub async fn score_candidates(
    db: &DatabaseConnection,
    resolver: &ScoreResolver,
) -> CommandResult<Candidates> {
    resolver
        .candidates(db)
        .await
        .map_err(context("获取候选列表失败"))
}

pub fn resolver_state(resolver: &ScoreResolver) -> ResolverState {
    resolver.state()
}

/// 按当前选择提交得分
pub async fn submit_score(
    db: &DatabaseConnection,
    resolver: &ScoreResolver,
    points: PointsValue,
    comment: Option<String>,
) -> CommandResult<ScoreEvent> {
    resolver
        .submit(db, points, comment)
        .await
        .map_err(context("提交得分失败"))
}
