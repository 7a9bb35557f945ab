use crate::dto::Dto;
use crate::error::{AppError, AppResult};
use crate::outlier::OutlierCommand;
use crate::settings::MlSettings;
use crate::transport::Transport;
use async_trait::async_trait;
use ml_domain::document::{Document, read_value};
use ml_domain::value_object::{DatasourceUid, TimeRange};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// 机器学习命令（Command）
///
/// 每个入站查询构建一次、此后不可变，执行时只做一次远端调用。
/// - 不持有共享可变状态，可在多个调用方之间并发执行；
/// - 超时、重试与取消全部交给注入的 [`Transport`]。
///
/// 关联常量：
/// - `NAME`：命令的稳定名称，用于日志、追踪与路由。避免依赖 `type_name::<T>()`。
#[async_trait]
pub trait Command: Send + Sync + 'static {
    /// 命令的稳定名称（建议常量字符串，不随重构变化）
    const NAME: &'static str;

    /// 分析目标所在的上游数据源
    fn datasource_uid(&self) -> &DatasourceUid;

    /// 在给定窗口上执行命令，并将响应信封中的数据解码为 `R`
    async fn execute<T, R>(&self, range: &TimeRange, transport: &T) -> AppResult<R>
    where
        T: Transport + ?Sized,
        R: Dto;
}

/// 已支持的命令类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandType {
    Outlier,
}

impl CommandType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandType::Outlier => OutlierCommand::NAME,
        }
    }
}

impl FromStr for CommandType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case(OutlierCommand::NAME) {
            Ok(CommandType::Outlier)
        } else {
            Err(AppError::UnsupportedCommand(s.to_string()))
        }
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 按查询中的 `type` 字段选择具体命令
#[derive(Debug, Clone)]
pub enum MlCommand {
    Outlier(OutlierCommand),
}

impl MlCommand {
    /// 解析原始查询字节并构建对应命令
    pub fn unmarshal(query: &[u8], settings: &MlSettings) -> AppResult<Self> {
        let query: Value = serde_json::from_slice(query)
            .map_err(AppError::serialization("cannot parse ml query"))?;

        let empty = Document::new();
        let doc = query.as_object().unwrap_or(&empty);
        let kind: CommandType = read_value::<String>(doc, "type")?.parse()?;

        match kind {
            CommandType::Outlier => {
                OutlierCommand::from_query_with(&query, settings).map(MlCommand::Outlier)
            }
        }
    }

    pub fn command_type(&self) -> CommandType {
        match self {
            MlCommand::Outlier(_) => CommandType::Outlier,
        }
    }

    pub fn name(&self) -> &'static str {
        self.command_type().as_str()
    }

    pub fn datasource_uid(&self) -> &DatasourceUid {
        match self {
            MlCommand::Outlier(cmd) => cmd.datasource_uid(),
        }
    }

    pub async fn execute<T, R>(&self, range: &TimeRange, transport: &T) -> AppResult<R>
    where
        T: Transport + ?Sized,
        R: Dto,
    {
        match self {
            MlCommand::Outlier(cmd) => cmd.execute(range, transport).await,
        }
    }
}

impl From<OutlierCommand> for MlCommand {
    fn from(cmd: OutlierCommand) -> Self {
        MlCommand::Outlier(cmd)
    }
}
