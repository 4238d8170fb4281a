pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod utils;

pub use config::{AppConfig, ConfigError, DatabaseConfig};
pub use database::session::{Command, Response, Session};
pub use error::{CoreError, ErrorKind};

use database::connection;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// 命令行宿主：从 stdin 逐行读取 JSON 命令，把结果逐行写到 stdout
pub async fn run() -> Result<(), String> {
    let config = AppConfig::from_env().map_err(|e| format!("加载配置失败: {}", e))?;
    utils::logs::init_logging(&config.log_level)?;

    let conn = connection::connect_and_migrate(&config)
        .await
        .map_err(|e| format!("数据库初始化失败: {}", e))?;
    let mut session = Session::new(conn);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    log::info!("开始接收命令");

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| format!("读取命令失败: {}", e))?
    {
        if line.trim().is_empty() {
            continue;
        }

        let response = session.handle_json(&line).await;
        let mut out = serde_json::to_string(&response).map_err(|e| format!("序列化响应失败: {}", e))?;
        out.push('\n');
        stdout
            .write_all(out.as_bytes())
            .await
            .map_err(|e| format!("写入响应失败: {}", e))?;
        stdout
            .flush()
            .await
            .map_err(|e| format!("写入响应失败: {}", e))?;
    }

    match connection::close_connection(session.into_connection()).await {
        Ok(()) => log::info!("数据库连接已成功关闭"),
        Err(e) => log::error!("关闭数据库连接时出错: {}", e),
    }
    Ok(())
}
