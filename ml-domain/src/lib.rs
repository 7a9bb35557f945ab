//! 机器学习查询领域层基础库（ml-domain）
//!
//! 提供与传输实现无关的基础构件：
//! - 无类型文档（`document`）及带类型校验的字段读取
//! - 值对象（`value_object`）：数据源标识、采样间隔与分析窗口
//! - 统一错误（`error`）
//!
//! 本 crate 不做任何 I/O，命令的构建与执行位于 `ml-application`。
//!
pub mod document;
pub mod error;
pub mod value_object;
