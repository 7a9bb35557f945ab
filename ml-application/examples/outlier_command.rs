use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use ml_application::MlCommand;
use ml_application::dto::QueryDataResponse;
use ml_application::error::AppError;
use ml_application::settings::MlSettings;
use ml_application::transport::Transport;
use ml_domain::value_object::TimeRange;
use serde_json::{Value, json};

/// 进程内的插件后端：回显窗口信息作为单个数据帧
struct EchoBackend;

#[async_trait]
impl Transport for EchoBackend {
    async fn send(&self, path: &str, body: Vec<u8>) -> anyhow::Result<Vec<u8>> {
        let payload: Value = serde_json::from_slice(&body)?;
        let attributes = &payload["data"]["attributes"];
        println!("POST {path} datasource={}", attributes["datasource_uid"]);

        let reply = json!({
            "status": "success",
            "data": {
                "results": {
                    "A": { "status": 200, "frames": [attributes["start_end_attributes"].clone()] }
                }
            }
        });
        Ok(serde_json::to_vec(&reply)?)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = MlSettings::builder()
        .app_url("https://grafana.example.com".to_string())
        .build();

    let query = json!({
        "type": "outlier",
        "intervalMs": 30000,
        "config": {
            "datasource_uid": "prom-1",
            "datasource_type": "prometheus",
            "query_params": { "expr": "go_goroutines{}", "refId": "A" },
            "response_type": "binary",
            "algorithm": { "name": "dbscan", "config": { "epsilon": 7.667 }, "sensitivity": 0.83 }
        }
    });
    let cmd = MlCommand::unmarshal(query.to_string().as_bytes(), &settings)?;

    let to = Utc::now();
    let range = TimeRange::new(to - TimeDelta::hours(1), to);
    let resp: QueryDataResponse = cmd.execute(&range, &EchoBackend).await?;
    println!("{}", serde_json::to_string_pretty(&resp)?);

    // 缺少 config -> 构建阶段即被拒绝
    if let Err(AppError::Validation(msg)) =
        MlCommand::unmarshal(br#"{"type":"outlier"}"#, &settings)
    {
        eprintln!("rejected as expected: {msg}");
    }
    Ok(())
}
