//! 机器学习查询应用层（ml-application）
//!
//! 将与后端无关的分析查询转换为对插件后端的一次调用：
//! 1. 通过 `OutlierCommand::from_query` 或 `MlCommand::unmarshal` 校验查询并构建命令；
//! 2. 调用 `execute`，注入分析窗口、采样间隔与调用方地址；
//! 3. 经调用方提供的 `Transport` 发送请求，并将响应信封解码为结果或错误。
//!
pub mod command;
pub mod dto;
pub mod envelope;
pub mod error;
pub mod outlier;
pub mod settings;
pub mod transport;

pub use command::{Command, MlCommand};
pub use outlier::OutlierCommand;
pub use transport::Transport;
