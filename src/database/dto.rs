//! 数据传输对象 (DTO)
//!
//! 调用方传入的原始字段。日期、布尔值与分数在这里仍保持宽松的输入形态，
//! 由仓库层在访问数据库之前统一校验和转换。

use serde::{Deserialize, Serialize};

/// 布尔字段的输入形态：支持 true/false、1/0 以及 "yes"/"no" 等文本
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        FlagValue::Bool(value)
    }
}

impl From<&str> for FlagValue {
    fn from(value: &str) -> Self {
        FlagValue::Text(value.to_string())
    }
}

/// 分数的输入形态：整数或数字文本
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PointsValue {
    Int(i64),
    Text(String),
}

impl From<i32> for PointsValue {
    fn from(value: i32) -> Self {
        PointsValue::Int(value.into())
    }
}

impl From<&str> for PointsValue {
    fn from(value: &str) -> Self {
        PointsValue::Text(value.to_string())
    }
}

// ==================== 新建记录 ====================

/// 用于创建比赛的数据结构，日期格式为 YYYY-MM-DD
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewCompetition {
    pub name: String,
    pub start_date: String,
    pub end_date: String,
}

/// 用于创建队伍的数据结构
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewTeam {
    pub name: String,
    pub comp_id: i32,
    #[serde(default)]
    pub score: i32,
}

/// 用于创建选手的数据结构，team_id 为空表示暂不归属任何队伍
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewPlayer {
    pub name: String,
    #[serde(default)]
    pub team_id: Option<i32>,
}

/// 用于创建比赛项目的数据结构
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewGame {
    pub comp_id: i32,
    pub name: String,
    pub team_game: FlagValue,
    pub date_played: String,
}

/// 队伍得分记录
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewTeamScore {
    pub team_id: i32,
    pub game_id: i32,
    pub points: PointsValue,
    #[serde(default)]
    pub comment: Option<String>,
}

/// 选手得分记录
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewPlayerScore {
    pub player_id: i32,
    pub game_id: i32,
    pub points: PointsValue,
    #[serde(default)]
    pub comment: Option<String>,
}

// ==================== 列表筛选 ====================

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamFilter {
    pub comp_id: Option<i32>,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerFilter {
    pub team_id: Option<i32>,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameFilter {
    pub comp_id: Option<i32>,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamScoreFilter {
    pub team_id: Option<i32>,
    pub game_id: Option<i32>,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerScoreFilter {
    pub player_id: Option<i32>,
    pub game_id: Option<i32>,
}
