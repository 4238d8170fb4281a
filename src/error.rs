//! 核心错误类型
//!
//! 所有仓库、视图与计分操作都返回 [`CoreError`]，调用方可以通过
//! [`CoreError::kind`] 拿到结构化的错误种类。

use sea_orm::{DbErr, RuntimeErr, SqlErr};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    /// 数据库不可达或拒绝了凭据
    #[error("数据库连接失败: {0}")]
    Connection(String),

    /// 必填字段缺失或格式错误，在访问数据库之前抛出
    #[error("字段校验失败: {0}")]
    Validation(String),

    /// 外键指向的记录不存在
    #[error("引用的记录不存在: {0}")]
    Reference(String),

    /// 仍有依赖记录，删除被拒绝
    #[error("存在依赖记录，无法删除: {0}")]
    ReferentialIntegrity(String),

    /// 要删除或查询的记录不存在
    #[error("记录不存在: {0}")]
    NotFound(String),

    /// 其他数据库错误
    #[error("数据库操作失败: {0}")]
    Storage(#[source] DbErr),
}

/// 错误种类，用于跨边界传递
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    ConnectionError,
    ValidationError,
    ReferenceError,
    ReferentialIntegrityError,
    NotFoundError,
    StorageError,
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Connection(_) => ErrorKind::ConnectionError,
            CoreError::Validation(_) => ErrorKind::ValidationError,
            CoreError::Reference(_) => ErrorKind::ReferenceError,
            CoreError::ReferentialIntegrity(_) => ErrorKind::ReferentialIntegrityError,
            CoreError::NotFound(_) => ErrorKind::NotFoundError,
            CoreError::Storage(_) => ErrorKind::StorageError,
        }
    }

    /// 插入时的外键冲突视为引用错误
    pub(crate) fn on_insert(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => CoreError::Reference(msg),
            _ => err.into(),
        }
    }

    /// 删除时的外键冲突视为依赖错误
    pub(crate) fn on_delete(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
                CoreError::ReferentialIntegrity(msg)
            }
            _ => match restrict_violation(&err) {
                Some(msg) => CoreError::ReferentialIntegrity(msg),
                None => err.into(),
            },
        }
    }
}

impl From<DbErr> for CoreError {
    fn from(err: DbErr) -> Self {
        match err {
            DbErr::Conn(e) => CoreError::Connection(e.to_string()),
            DbErr::ConnectionAcquire(e) => CoreError::Connection(e.to_string()),
            DbErr::Type(msg) => CoreError::Validation(msg),
            DbErr::TryIntoErr { from, into, .. } => {
                CoreError::Validation(format!("无法将 {} 转换为 {}", from, into))
            }
            DbErr::RecordNotFound(msg) => CoreError::NotFound(msg),
            other => CoreError::Storage(other),
        }
    }
}

/// SQLite 对 ON DELETE RESTRICT 的违反使用扩展错误码 1811，
/// `DbErr::sql_err` 只识别 787
const SQLITE_CONSTRAINT_TRIGGER: &str = "1811";

fn restrict_violation(err: &DbErr) -> Option<String> {
    match err {
        DbErr::Exec(RuntimeErr::SqlxError(sea_orm::sqlx::Error::Database(e)))
        | DbErr::Query(RuntimeErr::SqlxError(sea_orm::sqlx::Error::Database(e))) => {
            (e.code().as_deref() == Some(SQLITE_CONSTRAINT_TRIGGER)).then(|| e.message().to_string())
        }
        _ => None,
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
