//! 得分归属状态机
//!
//! 选择比赛项目后，根据项目的计分模式进入 TeamMode 或 PlayerMode：
//! - TeamMode：必须选择队伍，提交时写入 team_scores_log
//! - PlayerMode：必须选择选手，提交时写入 player_scores_log
//!
//! 计分模式发生切换时，之前选中的队伍/选手会被丢弃。
//! 状态机只属于单个调用方，不在调用方之间共享。

use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};

use crate::database::dto::{NewPlayerScore, NewTeamScore, PointsValue, TeamFilter};
use crate::database::repository::{
    games_repository::GamesRepository, players_repository::PlayersRepository,
    scores_repository::ScoresRepository, teams_repository::TeamsRepository,
};
use crate::entity::prelude::GameMode;
use crate::entity::{games, player_scores_log, players, team_scores_log, teams};
use crate::error::{CoreError, Result};

/// 当前选中的计分对象
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Candidate {
    Team(i32),
    Player(i32),
}

/// 当前模式下可供选择的对象列表
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", content = "items", rename_all = "lowercase")]
pub enum Candidates {
    Team(Vec<teams::Model>),
    Player(Vec<players::Model>),
}

/// 提交后生成的得分记录
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "event", rename_all = "lowercase")]
pub enum ScoreEvent {
    Team(team_scores_log::Model),
    Player(player_scores_log::Model),
}

/// 状态机对外暴露的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ResolverState {
    Idle,
    TeamMode {
        game_id: i32,
        selection: Option<Candidate>,
    },
    PlayerMode {
        game_id: i32,
        selection: Option<Candidate>,
    },
}

/// 得分归属解析器
#[derive(Debug, Clone, Default)]
pub struct ScoreResolver {
    game: Option<games::Model>,
    selection: Option<Candidate>,
}

impl ScoreResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前计分模式，未选择项目时为 None
    pub fn mode(&self) -> Option<GameMode> {
        self.game.as_ref().map(games::Model::mode)
    }

    pub fn selection(&self) -> Option<Candidate> {
        self.selection
    }

    pub fn state(&self) -> ResolverState {
        match &self.game {
            None => ResolverState::Idle,
            Some(game) => match game.mode() {
                GameMode::Team => ResolverState::TeamMode {
                    game_id: game.id,
                    selection: self.selection,
                },
                GameMode::Player => ResolverState::PlayerMode {
                    game_id: game.id,
                    selection: self.selection,
                },
            },
        }
    }

    /// 选择比赛项目并根据 team_game 切换模式
    ///
    /// 项目不存在时返回 NotFound，且状态保持不变
    pub async fn select_game(&mut self, db: &DatabaseConnection, game_id: i32) -> Result<GameMode> {
        let game = GamesRepository::get(db, game_id).await?;
        let mode = game.mode();

        if self.mode() != Some(mode) && self.selection.take().is_some() {
            log::debug!("计分模式切换为 {:?}，已丢弃之前的选择", mode);
        }

        self.game = Some(game);
        Ok(mode)
    }

    /// 选择队伍（是否符合当前模式在提交时检查）
    pub fn select_team(&mut self, team_id: i32) {
        self.selection = Some(Candidate::Team(team_id));
    }

    /// 选择选手（是否符合当前模式在提交时检查）
    pub fn select_player(&mut self, player_id: i32) {
        self.selection = Some(Candidate::Player(player_id));
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// 重新加载当前模式下的候选列表
    ///
    /// TeamMode 返回该项目所属比赛的队伍；PlayerMode 返回所属队伍参加该比赛的选手
    pub async fn candidates(&self, db: &DatabaseConnection) -> Result<Candidates> {
        let game = self.require_game()?;
        match game.mode() {
            GameMode::Team => {
                let filter = TeamFilter {
                    comp_id: Some(game.comp_id),
                };
                Ok(Candidates::Team(TeamsRepository::find_all(db, filter).await?))
            }
            GameMode::Player => Ok(Candidates::Player(
                PlayersRepository::find_in_competition(db, game.comp_id).await?,
            )),
        }
    }

    /// 提交得分
    ///
    /// 选择与模式不匹配（或未选择）时返回 Validation 错误，不访问数据库
    pub async fn submit(
        &self,
        db: &DatabaseConnection,
        points: PointsValue,
        comment: Option<String>,
    ) -> Result<ScoreEvent> {
        let game = self.require_game()?;
        match (game.mode(), self.selection) {
            (GameMode::Team, Some(Candidate::Team(team_id))) => {
                let score = NewTeamScore {
                    team_id,
                    game_id: game.id,
                    points,
                    comment,
                };
                Ok(ScoreEvent::Team(
                    ScoresRepository::create_team_score(db, score).await?,
                ))
            }
            (GameMode::Team, _) => Err(CoreError::Validation(format!(
                "项目 #{} 为团体计分项目，请先选择队伍",
                game.id
            ))),
            (GameMode::Player, Some(Candidate::Player(player_id))) => {
                let score = NewPlayerScore {
                    player_id,
                    game_id: game.id,
                    points,
                    comment,
                };
                Ok(ScoreEvent::Player(
                    ScoresRepository::create_player_score(db, score).await?,
                ))
            }
            (GameMode::Player, _) => Err(CoreError::Validation(format!(
                "项目 #{} 为个人计分项目，请先选择选手",
                game.id
            ))),
        }
    }

    fn require_game(&self) -> Result<&games::Model> {
        self.game
            .as_ref()
            .ok_or_else(|| CoreError::Validation("尚未选择比赛项目".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn game(id: i32, team_game: bool) -> games::Model {
        games::Model {
            id,
            comp_id: 1,
            name: format!("game {}", id),
            team_game,
            date_played: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            created_at: 0,
        }
    }

    #[test]
    fn new_resolver_is_idle() {
        let resolver = ScoreResolver::new();
        assert_eq!(resolver.state(), ResolverState::Idle);
        assert_eq!(resolver.mode(), None);
    }

    #[test]
    fn state_reports_mode_and_selection() {
        let mut resolver = ScoreResolver {
            game: Some(game(3, true)),
            selection: None,
        };
        resolver.select_team(9);
        assert_eq!(
            resolver.state(),
            ResolverState::TeamMode {
                game_id: 3,
                selection: Some(Candidate::Team(9)),
            }
        );
        resolver.clear_selection();
        assert_eq!(resolver.selection(), None);
    }

    #[test]
    fn candidate_serializes_with_kind_tag() {
        let json = serde_json::to_value(Candidate::Player(4)).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "player", "id": 4}));
    }
}
