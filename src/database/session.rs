//! JSON 命令分发
//!
//! 每条命令是一个 JSON 对象，`command` 字段为命令名，其余字段为参数。
//! 成功时返回 `{"ok": ...}`，失败时返回 `{"error": {"kind": ..., "message": ...}}`。
//! 每个会话持有自己的计分状态机。

use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::database::attribution::ScoreResolver;
use crate::database::dto::{
    GameFilter, NewCompetition, NewGame, NewPlayer, NewPlayerScore, NewTeam, NewTeamScore,
    PlayerFilter, PlayerScoreFilter, PointsValue, TeamFilter, TeamScoreFilter,
};
use crate::database::service::{self, CommandError};
use crate::error::ErrorKind;
use crate::utils::logs;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    // 比赛
    CreateCompetition(NewCompetition),
    GetCompetition { id: i32 },
    ListCompetitions,
    DeleteCompetition { id: i32 },

    // 队伍
    CreateTeam(NewTeam),
    GetTeam { id: i32 },
    ListTeams(TeamFilter),
    DeleteTeam { id: i32 },

    // 选手
    CreatePlayer(NewPlayer),
    GetPlayer { id: i32 },
    ListPlayers(PlayerFilter),
    DeletePlayer { id: i32 },

    // 比赛项目
    CreateGame(NewGame),
    GetGame { id: i32 },
    ListGames(GameFilter),
    DeleteGame { id: i32 },

    // 得分记录
    CreateTeamScore(NewTeamScore),
    ListTeamScores(TeamScoreFilter),
    DeleteTeamScore { id: i32 },
    CreatePlayerScore(NewPlayerScore),
    ListPlayerScores(PlayerScoreFilter),
    DeletePlayerScore { id: i32 },

    // 视图
    TeamView {
        #[serde(default)]
        comp_id: Option<i32>,
    },
    ScoreView {
        #[serde(default)]
        comp_id: Option<i32>,
    },
    GameView {
        #[serde(default)]
        comp_id: Option<i32>,
    },
    PlayerView {
        #[serde(default)]
        comp_id: Option<i32>,
    },

    // 计分流程
    SelectGame { game_id: i32 },
    SelectTeam { team_id: i32 },
    SelectPlayer { player_id: i32 },
    ClearSelection,
    ScoreCandidates,
    ResolverState,
    SubmitScore {
        points: PointsValue,
        #[serde(default)]
        comment: Option<String>,
    },

    // 日志
    SetLogLevel { level: String },
    GetLogLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Response {
    Ok(Value),
    Error(CommandError),
}

impl Response {
    pub fn is_ok(&self) -> bool {
        matches!(self, Response::Ok(_))
    }

    fn from_result<T: Serialize>(result: Result<T, CommandError>) -> Self {
        match result {
            Ok(value) => match serde_json::to_value(value) {
                Ok(json) => Response::Ok(json),
                Err(e) => Response::Error(CommandError {
                    kind: ErrorKind::StorageError,
                    message: format!("序列化结果失败: {}", e),
                }),
            },
            Err(err) => {
                log::debug!("命令执行失败: {}", err);
                Response::Error(err)
            }
        }
    }

    fn validation(message: String) -> Self {
        Response::Error(CommandError {
            kind: ErrorKind::ValidationError,
            message,
        })
    }
}

/// 单个调用方的会话
pub struct Session {
    db: DatabaseConnection,
    resolver: ScoreResolver,
}

impl Session {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            resolver: ScoreResolver::new(),
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn resolver(&self) -> &ScoreResolver {
        &self.resolver
    }

    pub fn into_connection(self) -> DatabaseConnection {
        self.db
    }

    /// 解析并执行一行 JSON 命令
    pub async fn handle_json(&mut self, line: &str) -> Response {
        match serde_json::from_str::<Command>(line) {
            Ok(command) => self.handle(command).await,
            Err(e) => Response::validation(format!("无效的命令: {}", e)),
        }
    }

    pub async fn handle(&mut self, command: Command) -> Response {
        log::trace!("执行命令: {:?}", command);
        let db = &self.db;
        match command {
            Command::CreateCompetition(input) => {
                Response::from_result(service::create_competition(db, input).await)
            }
            Command::GetCompetition { id } => {
                Response::from_result(service::get_competition(db, id).await)
            }
            Command::ListCompetitions => Response::from_result(service::list_competitions(db).await),
            Command::DeleteCompetition { id } => {
                Response::from_result(service::delete_competition(db, id).await)
            }

            Command::CreateTeam(input) => Response::from_result(service::create_team(db, input).await),
            Command::GetTeam { id } => Response::from_result(service::get_team(db, id).await),
            Command::ListTeams(filter) => Response::from_result(service::list_teams(db, filter).await),
            Command::DeleteTeam { id } => Response::from_result(service::delete_team(db, id).await),

            Command::CreatePlayer(input) => {
                Response::from_result(service::create_player(db, input).await)
            }
            Command::GetPlayer { id } => Response::from_result(service::get_player(db, id).await),
            Command::ListPlayers(filter) => {
                Response::from_result(service::list_players(db, filter).await)
            }
            Command::DeletePlayer { id } => {
                Response::from_result(service::delete_player(db, id).await)
            }

            Command::CreateGame(input) => Response::from_result(service::create_game(db, input).await),
            Command::GetGame { id } => Response::from_result(service::get_game(db, id).await),
            Command::ListGames(filter) => Response::from_result(service::list_games(db, filter).await),
            Command::DeleteGame { id } => Response::from_result(service::delete_game(db, id).await),

            Command::CreateTeamScore(input) => {
                Response::from_result(service::create_team_score(db, input).await)
            }
            Command::ListTeamScores(filter) => {
                Response::from_result(service::list_team_scores(db, filter).await)
            }
            Command::DeleteTeamScore { id } => {
                Response::from_result(service::delete_team_score(db, id).await)
            }
            Command::CreatePlayerScore(input) => {
                Response::from_result(service::create_player_score(db, input).await)
            }
            Command::ListPlayerScores(filter) => {
                Response::from_result(service::list_player_scores(db, filter).await)
            }
            Command::DeletePlayerScore { id } => {
                Response::from_result(service::delete_player_score(db, id).await)
            }

            Command::TeamView { comp_id } => {
                Response::from_result(service::team_view(db, comp_id).await)
            }
            Command::ScoreView { comp_id } => {
                Response::from_result(service::score_view(db, comp_id).await)
            }
            Command::GameView { comp_id } => {
                Response::from_result(service::game_view(db, comp_id).await)
            }
            Command::PlayerView { comp_id } => {
                Response::from_result(service::player_view(db, comp_id).await)
            }

            Command::SelectGame { game_id } => Response::from_result(
                service::select_game(db, &mut self.resolver, game_id).await,
            ),
            Command::SelectTeam { team_id } => {
                self.resolver.select_team(team_id);
                Response::from_result(Ok(self.resolver.state()))
            }
            Command::SelectPlayer { player_id } => {
                self.resolver.select_player(player_id);
                Response::from_result(Ok(self.resolver.state()))
            }
            Command::ClearSelection => {
                self.resolver.clear_selection();
                Response::from_result(Ok(self.resolver.state()))
            }
            Command::ScoreCandidates => {
                Response::from_result(service::score_candidates(db, &self.resolver).await)
            }
            Command::ResolverState => {
                Response::from_result(Ok(service::resolver_state(&self.resolver)))
            }
            Command::SubmitScore { points, comment } => Response::from_result(
                service::submit_score(db, &self.resolver, points, comment).await,
            ),

            Command::SetLogLevel { level } => match logs::set_log_level(&level) {
                Ok(()) => Response::from_result(Ok(logs::get_log_level())),
                Err(message) => Response::validation(message),
            },
            Command::GetLogLevel => Response::from_result(Ok(logs::get_log_level())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_parse_from_tagged_json() {
        let command: Command = serde_json::from_str(
            r#"{"command": "create_game", "comp_id": 1, "name": "Relay", "team_game": "yes", "date_played": "2025-03-02"}"#,
        )
        .unwrap();
        assert!(matches!(command, Command::CreateGame(ref g) if g.name == "Relay"));

        let command: Command = serde_json::from_str(r#"{"command": "score_view"}"#).unwrap();
        assert!(matches!(command, Command::ScoreView { comp_id: None }));

        let command: Command =
            serde_json::from_str(r#"{"command": "list_teams", "comp_id": 2}"#).unwrap();
        assert!(matches!(command, Command::ListTeams(TeamFilter { comp_id: Some(2) })));
    }

    #[test]
    fn response_uses_ok_and_error_keys() {
        let ok = Response::from_result::<i32>(Ok(5));
        assert_eq!(serde_json::to_value(&ok).unwrap(), serde_json::json!({"ok": 5}));

        let err = Response::validation("bad".to_string());
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            serde_json::json!({"error": {"kind": "ValidationError", "message": "bad"}})
        );
    }
}
