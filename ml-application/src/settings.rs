use bon::Builder;
use ml_domain::value_object::SampleInterval;

/// 命令构建配置
///
/// ```rust
/// use ml_application::settings::MlSettings;
///
/// let settings = MlSettings::builder()
///     .app_url("https://grafana.example.com".to_string())
///     .build();
/// assert_eq!(settings.default_interval().as_millis(), 60_000);
/// ```
#[derive(Builder, Debug, Clone, Default)]
pub struct MlSettings {
    /// 调用方应用地址，原样透传给远端
    #[builder(default)]
    app_url: String,
    /// 查询未给出 `intervalMs` 时使用的采样间隔
    #[builder(default)]
    default_interval: SampleInterval,
}

impl MlSettings {
    pub fn app_url(&self) -> &str {
        &self.app_url
    }

    pub fn default_interval(&self) -> SampleInterval {
        self.default_interval
    }
}
