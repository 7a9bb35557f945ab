use ml_domain::error::DomainError;

#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("domain: {0}")]
    Domain(#[from] DomainError),

    /// 构建阶段的校验失败，信息原样返回给调用方
    #[error("{0}")]
    Validation(String),

    #[error("unsupported command type '{0}', expected one of: outlier")]
    UnsupportedCommand(String),

    #[error("{stage}: {source}")]
    Serialization {
        stage: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// 传输层失败，不做包装
    #[error(transparent)]
    Transport(anyhow::Error),

    /// 远端在响应信封中返回的错误文本
    #[error("{0}")]
    Application(String),

    #[error("response from plugin API contains no data")]
    EmptyResponse,
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub(crate) fn serialization(stage: &'static str) -> impl FnOnce(serde_json::Error) -> Self {
        move |source| AppError::Serialization { stage, source }
    }
}
