//! 应用配置
//!
//! 配置以 JSON 文件保存。加载顺序：
//! 1. 环境变量 `COMPDB_CONFIG` 指定的文件
//! 2. 数据目录下的默认配置文件（存在时）
//! 3. 内置默认值（本地 SQLite）
//!
//! 最后 `COMPDB_DATABASE_URL` 可以直接覆盖连接字符串。

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

pub const CONFIG_ENV: &str = "COMPDB_CONFIG";
pub const DATABASE_URL_ENV: &str = "COMPDB_DATABASE_URL";

const DEFAULT_MYSQL_PORT: u16 = 3306;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 8;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("读取配置文件失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("解析配置文件失败: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("无效的数据库路径: {0}")]
    InvalidPath(String),

    #[error("无效的连接参数: {0}")]
    InvalidUrl(String),
}

/// 数据库后端配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum DatabaseConfig {
    /// 本地 SQLite 文件，path 为空时使用默认数据目录
    Sqlite {
        #[serde(default)]
        path: Option<PathBuf>,
    },
    /// MySQL 服务器
    Mysql {
        host: String,
        #[serde(default = "default_mysql_port")]
        port: u16,
        user: String,
        #[serde(default)]
        password: String,
        database: String,
    },
}

fn default_mysql_port() -> u16 {
    DEFAULT_MYSQL_PORT
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig::Sqlite { path: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    /// 直接指定的连接字符串，优先于 database
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,
    pub log_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<u32>,
    pub connect_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            database_url: None,
            log_level: "info".to_string(),
            max_connections: None,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl AppConfig {
    /// 从 JSON 文件加载配置
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// 文件存在时加载，否则使用默认值
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// 按环境变量和默认路径加载配置
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(Path::new(&path))?,
            None => match comp_path::get_config_path() {
                Ok(path) => Self::load_or_default(&path)?,
                Err(e) => {
                    log::warn!("无法确定默认配置路径，使用内置默认值: {}", e);
                    Self::default()
                }
            },
        };

        if let Ok(url) = std::env::var(DATABASE_URL_ENV) {
            if !url.trim().is_empty() {
                config.database_url = Some(url);
            }
        }
        Ok(config)
    }

    /// 保存配置到 JSON 文件
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    fn uses_sqlite(&self) -> bool {
        match &self.database_url {
            Some(url) => url.starts_with("sqlite:"),
            None => matches!(self.database, DatabaseConfig::Sqlite { .. }),
        }
    }

    /// 连接池大小：SQLite 默认为 1，MySQL 默认为 5
    pub fn max_connections(&self) -> u32 {
        self.max_connections
            .unwrap_or(if self.uses_sqlite() { 1 } else { 5 })
            .max(1)
    }

    /// SQLite 数据库文件路径（仅当使用 SQLite 且未直接指定连接字符串时）
    pub fn sqlite_path(&self) -> Result<Option<PathBuf>, ConfigError> {
        if self.database_url.is_some() {
            return Ok(None);
        }
        match &self.database {
            DatabaseConfig::Sqlite { path: Some(path) } => std::path::absolute(path)
                .map(Some)
                .map_err(|e| ConfigError::InvalidPath(format!("{}: {}", path.display(), e))),
            DatabaseConfig::Sqlite { path: None } => comp_path::get_db_path()
                .map(Some)
                .map_err(ConfigError::InvalidPath),
            DatabaseConfig::Mysql { .. } => Ok(None),
        }
    }

    /// 构建连接字符串
    pub fn connection_url(&self) -> Result<String, ConfigError> {
        if let Some(url) = &self.database_url {
            return Ok(url.clone());
        }

        match &self.database {
            DatabaseConfig::Sqlite { .. } => {
                let path = self
                    .sqlite_path()?
                    .ok_or_else(|| ConfigError::InvalidPath("未配置 SQLite 路径".to_string()))?;
                path_to_sqlite_url(&path)
            }
            DatabaseConfig::Mysql {
                host,
                port,
                user,
                password,
                database,
            } => mysql_url(host, *port, user, password, database),
        }
    }
}

/// 将文件路径转换为 sqlite 连接 URL
pub fn path_to_sqlite_url(path: &Path) -> Result<String, ConfigError> {
    let db_url = Url::from_file_path(path)
        .map_err(|_| ConfigError::InvalidPath(path.display().to_string()))?;
    Ok(format!("sqlite:{}?mode=rwc", db_url.path()))
}

/// 构建 MySQL 连接 URL，用户名和密码会被正确转义
fn mysql_url(
    host: &str,
    port: u16,
    user: &str,
    password: &str,
    database: &str,
) -> Result<String, ConfigError> {
    if host.trim().is_empty() {
        return Err(ConfigError::InvalidUrl("host 不能为空".to_string()));
    }
    if database.trim().is_empty() {
        return Err(ConfigError::InvalidUrl("database 不能为空".to_string()));
    }

    let mut url = Url::parse("mysql://localhost")
        .map_err(|e| ConfigError::InvalidUrl(e.to_string()))?;
    url.set_host(Some(host.trim()))
        .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", host, e)))?;
    url.set_port(Some(port))
        .map_err(|_| ConfigError::InvalidUrl(format!("无效端口: {}", port)))?;
    url.set_username(user)
        .map_err(|_| ConfigError::InvalidUrl(format!("无效用户名: {}", user)))?;
    if !password.is_empty() {
        url.set_password(Some(password))
            .map_err(|_| ConfigError::InvalidUrl("无效密码".to_string()))?;
    }
    url.set_path(&format!("/{}", database.trim().trim_start_matches('/')));
    Ok(url.to_string())
}
