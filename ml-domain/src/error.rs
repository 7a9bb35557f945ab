//! 领域层统一错误定义
//!
//! 聚焦文档字段读取、值对象校验与序列化等最小必要集合，
//! 便于在应用层统一转换为 `AppError`。
//!
use thiserror::Error;

/// 统一错误类型（基础库最小必要集）
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DomainError {
    // --- 文档字段 ---
    #[error("required field '{key}' is missing")]
    MissingField { key: String },
    #[error("field '{key}' has type {found} but expected {expected}")]
    FieldType {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    // --- 值对象 ---
    #[error("invalid value: {reason}")]
    InvalidValue { reason: String },

    // --- 序列化 ---
    #[error("serialization error: {source}")]
    Serde {
        #[from]
        source: serde_json::Error,
    },
}

/// 统一 Result 类型别名
pub type DomainResult<T> = Result<T, DomainError>;
