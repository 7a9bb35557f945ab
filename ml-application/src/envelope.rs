//! 请求/响应信封（Envelope）
//!
//! 请求：`{"data":{"attributes": <调用方配置 + 注入字段>}}`
//! 响应：`{"status": ..., "data": ..., "error": ...}`
//!
use crate::dto::Dto;
use crate::error::{AppError, AppResult};
use ml_domain::document::Document;
use ml_domain::value_object::{SampleInterval, TimeRange};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

const START_END_ATTRIBUTES: &str = "start_end_attributes";
const GRAFANA_URL: &str = "grafana_url";

#[derive(Serialize)]
struct RequestEnvelope<'a> {
    data: RequestData<'a>,
}

#[derive(Serialize)]
struct RequestData<'a> {
    attributes: &'a Document,
}

/// 分析窗口与采样间隔，注入到 attributes 中
#[derive(Debug, Serialize)]
struct StartEndAttributes {
    start: String,
    end: String,
    interval: i64,
}

/// 响应信封；`data` 延迟解码，保证 `error` 优先于数据内容
#[derive(Debug, Deserialize)]
struct ResponseEnvelope {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    data: Option<Box<RawValue>>,
    #[serde(default)]
    error: Option<String>,
}

/// 向调用方配置注入窗口、间隔与调用方地址，并序列化为请求体
///
/// 同名的已有字段会被覆盖，其余字段保持不变。
pub fn compose_request(
    mut attributes: Document,
    range: &TimeRange,
    interval: SampleInterval,
    app_url: &str,
) -> AppResult<Vec<u8>> {
    let window = StartEndAttributes {
        start: range.formatted_from(),
        end: range.formatted_to(),
        interval: interval.as_millis(),
    };
    let window = serde_json::to_value(window)
        .map_err(AppError::serialization("cannot encode start_end_attributes"))?;

    attributes.insert(START_END_ATTRIBUTES.to_string(), window);
    attributes.insert(GRAFANA_URL.to_string(), app_url.into());

    serde_json::to_vec(&RequestEnvelope {
        data: RequestData {
            attributes: &attributes,
        },
    })
    .map_err(AppError::serialization("cannot marshal request to plugin API"))
}

/// 解码响应信封
///
/// - `error` 非空即失败，信息原样返回，不检查 `status`；
/// - 否则将 `data` 解码为 `R`。
pub fn decode_response<R: Dto>(body: &[u8]) -> AppResult<R> {
    let envelope: ResponseEnvelope = serde_json::from_slice(body)
        .map_err(AppError::serialization("cannot unmarshal response from plugin API"))?;

    tracing::debug!(
        status = envelope.status.as_deref().unwrap_or_default(),
        has_data = envelope.data.is_some(),
        "plugin API response decoded"
    );

    if let Some(message) = envelope.error.filter(|e| !e.is_empty()) {
        tracing::warn!(error = %message, "plugin API reported an error");
        return Err(AppError::Application(message));
    }

    let data = envelope.data.ok_or(AppError::EmptyResponse)?;
    serde_json::from_str(data.get())
        .map_err(AppError::serialization("cannot unmarshal response from plugin API"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone, Utc};
    use serde_json::{Value, json};
    use std::error::Error as _;

    fn range() -> TimeRange {
        let from = Utc.with_ymd_and_hms(2023, 6, 16, 20, 0, 0).unwrap();
        TimeRange::new(from, from + TimeDelta::hours(1))
    }

    #[test]
    fn compose_request_wraps_attributes_and_injects_fields() {
        let attributes = json!({ "datasource_uid": "abc", "grafana_url": "stale" })
            .as_object()
            .cloned()
            .unwrap();
        let body = compose_request(
            attributes,
            &range(),
            SampleInterval::from_millis(5000).unwrap(),
            "https://x",
        )
        .unwrap();

        let parsed: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            parsed,
            json!({
                "data": {
                    "attributes": {
                        "datasource_uid": "abc",
                        "grafana_url": "https://x",
                        "start_end_attributes": {
                            "start": "2023-06-16T20:00:00",
                            "end": "2023-06-16T21:00:00",
                            "interval": 5000
                        }
                    }
                }
            })
        );
    }

    // 调用方配置中的同名对象被整体替换，不做深度合并
    #[test]
    fn compose_request_replaces_existing_start_end_attributes() {
        let attributes = json!({
            "datasource_uid": "abc",
            "start_end_attributes": { "foo": 1, "start": "yesterday" }
        })
        .as_object()
        .cloned()
        .unwrap();
        let body = compose_request(
            attributes,
            &range(),
            SampleInterval::from_millis(1000).unwrap(),
            "",
        )
        .unwrap();

        let parsed: Value = serde_json::from_slice(&body).unwrap();
        let window = &parsed["data"]["attributes"]["start_end_attributes"];
        assert_eq!(
            window,
            &json!({
                "start": "2023-06-16T20:00:00",
                "end": "2023-06-16T21:00:00",
                "interval": 1000
            })
        );
        assert!(window.get("foo").is_none());
    }

    #[test]
    fn decode_success_returns_data() {
        let data: Value =
            decode_response(br#"{"status":"success","data":{"k":"v"}}"#).unwrap();
        assert_eq!(data, json!({ "k": "v" }));
    }

    // error 字段优先，与 status 和 data 无关
    #[test]
    fn decode_error_field_wins_over_data_and_status() {
        let err = decode_response::<Value>(
            br#"{"status":"success","data":{"k":"v"},"error":"boom"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Application(_)));
        assert_eq!(err.to_string(), "boom");

        let err = decode_response::<crate::dto::QueryDataResponse>(
            br#"{"status":"error","data":"not a result","error":"boom"}"#,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn decode_empty_error_is_ignored() {
        let data: Value =
            decode_response(br#"{"status":"success","data":[1,2],"error":""}"#).unwrap();
        assert_eq!(data, json!([1, 2]));
    }

    #[test]
    fn decode_malformed_body_chains_cause() {
        let err = decode_response::<Value>(b"<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, AppError::Serialization { .. }));
        assert!(
            err.to_string()
                .starts_with("cannot unmarshal response from plugin API: ")
        );
        let source = err.source().expect("decode error is chained");
        assert!(source.is::<serde_json::Error>());
    }

    #[test]
    fn decode_missing_or_null_data_is_empty_response() {
        let err = decode_response::<Value>(br#"{"status":"success"}"#).unwrap_err();
        assert!(matches!(err, AppError::EmptyResponse));
        let err = decode_response::<Value>(br#"{"status":"success","data":null}"#).unwrap_err();
        assert!(matches!(err, AppError::EmptyResponse));
    }
}
