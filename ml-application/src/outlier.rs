//! 离群点检测命令（Outlier）
//!
//! 构建：校验查询中的 `intervalMs` 与 `config`，保留 `config` 的原始内容；
//! 执行：注入窗口、间隔与调用方地址后经 [`Transport`] 发往插件后端，并解码响应信封。
//!
use crate::command::Command;
use crate::dto::Dto;
use crate::envelope;
use crate::error::{AppError, AppResult};
use crate::settings::MlSettings;
use crate::transport::{OUTLIER_PATH, Transport};
use async_trait::async_trait;
use ml_domain::document::{Document, read_optional_value};
use ml_domain::value_object::{DatasourceUid, SampleInterval, TimeRange};
use serde_json::value::RawValue;
use serde_json::{Number, Value};
use tracing::Instrument;

const INTERVAL_NOT_NUMBER: &str = "field `intervalMs` is expected to be a number";
const CONFIG_REQUIRED: &str = "field `config` is required and should be object";
const DATASOURCE_UID_REQUIRED: &str =
    "field `config.datasource_uid` is required and should be string";

/// 已校验、不可变的离群点检测命令
#[derive(Debug, Clone)]
pub struct OutlierCommand {
    /// 调用方配置（算法、参数、灵敏度、目标查询等），本库不做解释
    query: Box<RawValue>,
    datasource_uid: DatasourceUid,
    app_url: String,
    interval: SampleInterval,
}

impl OutlierCommand {
    /// 使用默认配置从查询文档构建命令
    pub fn from_query(query: &Value, app_url: impl Into<String>) -> AppResult<Self> {
        let settings = MlSettings::builder().app_url(app_url.into()).build();
        Self::from_query_with(query, &settings)
    }

    /// 从查询文档构建命令，按顺序校验，第一个失败的规则决定错误
    pub fn from_query_with(query: &Value, settings: &MlSettings) -> AppResult<Self> {
        let empty = Document::new();
        let doc = query.as_object().unwrap_or(&empty);

        let interval = match read_optional_value::<Number>(doc, "intervalMs") {
            Ok(None) => settings.default_interval(),
            Ok(Some(ms)) => SampleInterval::from_millis(truncate_millis(&ms))?,
            Err(_) => return Err(AppError::Validation(INTERVAL_NOT_NUMBER.into())),
        };

        let Ok(Some(config)) = read_optional_value::<Document>(doc, "config") else {
            return Err(AppError::Validation(CONFIG_REQUIRED.into()));
        };

        let datasource_uid = read_optional_value::<String>(&config, "datasource_uid")
            .ok()
            .flatten()
            .and_then(|uid| DatasourceUid::new(uid).ok())
            .ok_or_else(|| AppError::Validation(DATASOURCE_UID_REQUIRED.into()))?;

        let query = serde_json::value::to_raw_value(&config)
            .map_err(AppError::serialization("cannot encode outlier config"))?;

        tracing::debug!(
            command = Self::NAME,
            datasource_uid = %datasource_uid,
            interval_ms = interval.as_millis(),
            "ml command built"
        );

        Ok(Self {
            query,
            datasource_uid,
            app_url: settings.app_url().to_string(),
            interval,
        })
    }

    pub fn interval(&self) -> SampleInterval {
        self.interval
    }

    pub fn app_url(&self) -> &str {
        &self.app_url
    }

    /// 调用方配置的原始 JSON 文本
    pub fn raw_config(&self) -> &str {
        self.query.get()
    }
}

/// 浮点毫秒向零截断，超出 i64 的值饱和
fn truncate_millis(ms: &Number) -> i64 {
    ms.as_i64()
        .unwrap_or_else(|| ms.as_f64().unwrap_or_default() as i64)
}

#[async_trait]
impl Command for OutlierCommand {
    const NAME: &'static str = "outlier";

    fn datasource_uid(&self) -> &DatasourceUid {
        &self.datasource_uid
    }

    async fn execute<T, R>(&self, range: &TimeRange, transport: &T) -> AppResult<R>
    where
        T: Transport + ?Sized,
        R: Dto,
    {
        let span = tracing::info_span!(
            "ml_command_execute",
            command = Self::NAME,
            datasource_uid = %self.datasource_uid,
        );

        async move {
            let attributes: Document = serde_json::from_str(self.query.get())
                .map_err(AppError::serialization("cannot decode outlier config"))?;

            let body =
                envelope::compose_request(attributes, range, self.interval, &self.app_url)?;

            let response = transport
                .send(OUTLIER_PATH, body)
                .await
                .map_err(AppError::Transport)?;

            envelope::decode_response(&response)
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn build(query: Value) -> AppResult<OutlierCommand> {
        OutlierCommand::from_query(&query, "https://grafana.com")
    }

    fn validation_message(err: AppError) -> String {
        match err {
            AppError::Validation(msg) => msg,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn defaults_interval_when_absent_or_null() {
        let cmd = build(json!({ "config": { "datasource_uid": "abc" } })).unwrap();
        assert_eq!(cmd.interval(), SampleInterval::default());

        let cmd = build(json!({ "intervalMs": null, "config": { "datasource_uid": "abc" } }))
            .unwrap();
        assert_eq!(cmd.interval().as_millis(), 60_000);
    }

    #[test]
    fn interval_is_read_as_milliseconds() {
        let cmd = build(json!({ "intervalMs": 5000, "config": { "datasource_uid": "abc" } }))
            .unwrap();
        assert_eq!(cmd.interval().as_millis(), 5000);

        let cmd = build(json!({ "intervalMs": 1500.9, "config": { "datasource_uid": "abc" } }))
            .unwrap();
        assert_eq!(cmd.interval().as_millis(), 1500);
    }

    #[test]
    fn settings_override_default_interval() {
        let settings = MlSettings::builder()
            .app_url("https://x".to_string())
            .default_interval(SampleInterval::from_millis(1000).unwrap())
            .build();
        let cmd = OutlierCommand::from_query_with(
            &json!({ "config": { "datasource_uid": "abc" } }),
            &settings,
        )
        .unwrap();
        assert_eq!(cmd.interval().as_millis(), 1000);
        assert_eq!(cmd.app_url(), "https://x");
    }

    #[test]
    fn rejects_non_numeric_interval() {
        for bad in [json!("5000"), json!(true), json!([1]), json!({ "ms": 1 })] {
            let err = build(json!({ "intervalMs": bad, "config": { "datasource_uid": "abc" } }))
                .unwrap_err();
            assert_eq!(validation_message(err), INTERVAL_NOT_NUMBER);
        }
    }

    #[test]
    fn rejects_missing_or_non_object_config() {
        for query in [
            json!({}),
            json!({ "config": null }),
            json!({ "config": "abc" }),
            json!({ "config": [] }),
            json!("not an object"),
        ] {
            let err = build(query).unwrap_err();
            assert_eq!(validation_message(err), CONFIG_REQUIRED);
        }
    }

    #[test]
    fn rejects_missing_empty_or_non_string_datasource_uid() {
        for config in [
            json!({}),
            json!({ "datasource_uid": "" }),
            json!({ "datasource_uid": 42 }),
            json!({ "datasource_uid": null }),
        ] {
            let err = build(json!({ "config": config })).unwrap_err();
            assert_eq!(validation_message(err), DATASOURCE_UID_REQUIRED);
        }
    }

    // 规则按顺序检查：intervalMs 先于 config
    #[test]
    fn first_failing_rule_wins() {
        let err = build(json!({ "intervalMs": "x" })).unwrap_err();
        assert_eq!(validation_message(err), INTERVAL_NOT_NUMBER);
    }

    #[test]
    fn keeps_config_verbatim() {
        let config = json!({
            "datasource_uid": "a4ce599c",
            "datasource_type": "prometheus",
            "query_params": { "expr": "go_goroutines{}", "range": true, "refId": "A" },
            "response_type": "binary",
            "algorithm": { "name": "dbscan", "config": { "epsilon": 7.667 }, "sensitivity": 0.83 }
        });
        let cmd = build(json!({ "config": config.clone(), "intervalMs": 1000 })).unwrap();
        assert_eq!(cmd.datasource_uid().as_str(), "a4ce599c");
        assert_eq!(cmd.app_url(), "https://grafana.com");

        let stored: Value = serde_json::from_str(cmd.raw_config()).unwrap();
        assert_eq!(stored, config);
        assert!(
            cmd.raw_config()
                .starts_with(r#"{"datasource_uid":"a4ce599c","datasource_type""#)
        );
    }
}
