use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::collections::BTreeMap;

/// 数据传输对象（DTO）
///
/// - 作为命令执行结果的载体，从响应信封的 `data` 字段解码得到；
/// - 与传输格式解耦，调用方按需选择不透明的 `Value` 或带类型的结构；
/// - 应保持只读特性与简洁结构。
pub trait Dto: Serialize + DeserializeOwned + Send + Sync + 'static {}

impl Dto for Value {}

/// 查询结果，按 refId 分组
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryDataResponse {
    #[serde(default)]
    pub results: BTreeMap<String, DataResponse>,
}

impl Dto for QueryDataResponse {}

/// 单个 refId 的结果；数据帧结构不做解释
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default)]
    pub frames: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QueryDataResponse {
    pub fn get(&self, ref_id: &str) -> Option<&DataResponse> {
        self.results.get(ref_id)
    }
}
