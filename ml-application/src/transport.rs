use async_trait::async_trait;
use std::sync::Arc;

/// 离群点检测在插件后端上的固定路径
pub const OUTLIER_PATH: &str = "/proxy/api/v1/outlier";

/// 传输能力（Transport）
///
/// 命令执行唯一的网络边界，由调用方注入（例如指向插件后端的 HTTP 代理客户端）。
/// - 重试、超时与取消均由实现方负责，命令本身不做任何处理；
/// - 返回的错误会原样交还给命令的调用方；
/// - 实现需要可并发调用（`Send + Sync`）。
#[async_trait]
pub trait Transport: Send + Sync {
    /// 将请求体发送到 `path`，返回响应体原始字节
    async fn send(&self, path: &str, body: Vec<u8>) -> anyhow::Result<Vec<u8>>;
}

#[async_trait]
impl<T> Transport for Arc<T>
where
    T: Transport + ?Sized,
{
    async fn send(&self, path: &str, body: Vec<u8>) -> anyhow::Result<Vec<u8>> {
        (**self).send(path, body).await
    }
}
