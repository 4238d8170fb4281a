use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
    Off,
}

fn parse_level(level: &str) -> Result<log::LevelFilter, String> {
    match level.trim().to_lowercase().as_str() {
        "error" => Ok(log::LevelFilter::Error),
        "warn" => Ok(log::LevelFilter::Warn),
        "info" => Ok(log::LevelFilter::Info),
        "debug" => Ok(log::LevelFilter::Debug),
        "trace" => Ok(log::LevelFilter::Trace),
        "off" => Ok(log::LevelFilter::Off),
        other => Err(format!("无效的日志级别: {}", other)),
    }
}

/// 初始化日志输出（stderr）
///
/// 后端按 Trace 注册，实际级别由 `log::set_max_level` 控制，便于运行时调整。
/// 重复调用时只更新级别。
pub fn init_logging(level: &str) -> Result<(), String> {
    let lf = parse_level(level)?;
    let _ = env_logger::Builder::new()
        .filter_level(log::LevelFilter::Trace)
        .filter_module("sqlx", log::LevelFilter::Warn)
        .filter_module("sea_orm_migration", log::LevelFilter::Warn)
        .target(env_logger::Target::Stderr)
        .try_init();
    log::set_max_level(lf);
    Ok(())
}

/// 动态设置日志输出级别（不持久化）
pub fn set_log_level(level: &str) -> Result<(), String> {
    let lf = parse_level(level)?;
    log::set_max_level(lf);
    log::info!("日志级别已设置为 {}", lf);
    Ok(())
}

/// 获取当前日志级别
pub fn get_log_level() -> LogLevel {
    match log::max_level() {
        log::LevelFilter::Error => LogLevel::Error,
        log::LevelFilter::Warn => LogLevel::Warn,
        log::LevelFilter::Info => LogLevel::Info,
        log::LevelFilter::Debug => LogLevel::Debug,
        log::LevelFilter::Trace => LogLevel::Trace,
        log::LevelFilter::Off => LogLevel::Off,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_level_is_rejected() {
        assert_eq!(
            set_log_level("loud"),
            Err("无效的日志级别: loud".to_string())
        );
    }

    #[test]
    fn levels_are_case_insensitive() {
        assert_eq!(parse_level(" DEBUG "), Ok(log::LevelFilter::Debug));
        assert_eq!(parse_level("off"), Ok(log::LevelFilter::Off));
    }

    #[test]
    fn log_level_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(LogLevel::Warn).unwrap(),
            serde_json::json!("warn")
        );
    }
}
