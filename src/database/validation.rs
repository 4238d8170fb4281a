//! 字段校验与转换
//!
//! 所有函数都是纯函数，只在访问数据库之前调用，失败时返回
//! [`CoreError::Validation`]。

use chrono::NaiveDate;

use crate::database::dto::{FlagValue, PointsValue};
use crate::error::{CoreError, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// 名称类字段：去除首尾空白后不能为空
pub fn require_name(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{} 不能为空", field)));
    }
    Ok(trimmed.to_string())
}

/// 解析 YYYY-MM-DD 格式的日期
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{} 不能为空", field)));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|e| {
        CoreError::Validation(format!(
            "{} 不是有效的日期 (YYYY-MM-DD): {} ({})",
            field, trimmed, e
        ))
    })
}

/// 将宽松的布尔输入转换为 bool
pub fn coerce_flag(field: &str, value: &FlagValue) -> Result<bool> {
    match value {
        FlagValue::Bool(b) => Ok(*b),
        FlagValue::Int(1) => Ok(true),
        FlagValue::Int(0) => Ok(false),
        FlagValue::Int(other) => Err(CoreError::Validation(format!(
            "{} 只接受 0 或 1: {}",
            field, other
        ))),
        FlagValue::Text(text) => match text.trim().to_lowercase().as_str() {
            "true" | "yes" | "y" | "on" | "1" => Ok(true),
            "false" | "no" | "n" | "off" | "0" => Ok(false),
            other => Err(CoreError::Validation(format!(
                "{} 不是有效的布尔值: {}",
                field, other
            ))),
        },
    }
}

/// 解析分数，允许负数，超出 i32 范围或非数字时报错
pub fn parse_points(value: &PointsValue) -> Result<i32> {
    match value {
        PointsValue::Int(n) => i32::try_from(*n)
            .map_err(|_| CoreError::Validation(format!("分数超出范围: {}", n))),
        PointsValue::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err(CoreError::Validation("分数不能为空".to_string()));
            }
            let n: i64 = trimmed
                .parse()
                .map_err(|_| CoreError::Validation(format!("分数必须是整数: {}", trimmed)))?;
            i32::try_from(n).map_err(|_| CoreError::Validation(format!("分数超出范围: {}", n)))
        }
    }
}

/// 备注去除首尾空白，空字符串视为无备注
pub fn normalize_comment(comment: Option<String>) -> Option<String> {
    comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}
