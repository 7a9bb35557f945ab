//! 值对象（Value Object）
//!
//! 无标识、以值相等为准的对象，用于封装不可变的概念性值与校验逻辑。
//!

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// 请求与测试夹具共用的时间戳布局（UTC，无时区后缀），精确到秒
///
/// 小数秒由 [`format_timestamp`] 追加：去掉末尾的 0，为 0 时整体省略，
/// 与 Go 布局 `2006-01-02T15:04:05.999999999` 一致（chrono 的 `%.f` 会补齐到 3/6/9 位）。
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// 按共享布局格式化时间戳，例如 `2023-06-16T20:00:00.12`
///
/// # 示例
///
/// ```
/// use chrono::{TimeDelta, TimeZone, Utc};
/// use ml_domain::value_object::format_timestamp;
///
/// let ts = Utc.with_ymd_and_hms(2023, 6, 16, 20, 0, 0).unwrap();
/// assert_eq!(format_timestamp(&ts), "2023-06-16T20:00:00");
/// assert_eq!(
///     format_timestamp(&(ts + TimeDelta::milliseconds(120))),
///     "2023-06-16T20:00:00.12"
/// );
/// ```
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    let mut out = ts.format(TIME_FORMAT).to_string();
    // 闰秒时纳秒部分可能超过 1e9
    let nanos = ts.timestamp_subsec_nanos() % 1_000_000_000;
    if nanos != 0 {
        let fraction = format!("{nanos:09}");
        out.push('.');
        out.push_str(fraction.trim_end_matches('0'));
    }
    out
}

/// 值对象抽象
pub trait ValueObject {
    /// 业务校验失败时的错误类型
    type Error;

    /// 创建值对象时进行验证
    fn validate(&self) -> Result<(), Self::Error>;
}

/// 上游数据源标识（非空）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasourceUid(String);

impl DatasourceUid {
    /// 创建数据源标识，空字符串视为非法
    ///
    /// # 示例
    ///
    /// ```
    /// use ml_domain::value_object::DatasourceUid;
    ///
    /// let uid = DatasourceUid::new("abc").unwrap();
    /// assert_eq!(uid.as_str(), "abc");
    /// assert!(DatasourceUid::new("").is_err());
    /// ```
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let uid = Self(value.into());
        uid.validate()?;
        Ok(uid)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for DatasourceUid {
    type Error = DomainError;

    fn validate(&self) -> Result<(), Self::Error> {
        if self.0.is_empty() {
            return Err(DomainError::InvalidValue {
                reason: "datasource uid must not be empty".into(),
            });
        }
        Ok(())
    }
}

impl AsRef<str> for DatasourceUid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatasourceUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 采样间隔（毫秒精度，允许调用方传入任意整数毫秒）
///
/// # 示例
///
/// ```
/// use ml_domain::value_object::SampleInterval;
///
/// assert_eq!(SampleInterval::default().as_millis(), 60_000);
/// assert_eq!(SampleInterval::from_millis(5000).unwrap().as_millis(), 5000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SampleInterval(TimeDelta);

impl SampleInterval {
    /// 默认间隔：一分钟
    pub const DEFAULT_MILLIS: i64 = 60_000;

    pub fn from_millis(millis: i64) -> DomainResult<Self> {
        TimeDelta::try_milliseconds(millis)
            .map(Self)
            .ok_or_else(|| DomainError::InvalidValue {
                reason: format!("interval of {millis}ms is out of range"),
            })
    }

    pub fn as_millis(&self) -> i64 {
        self.0.num_milliseconds()
    }

    pub fn as_delta(&self) -> TimeDelta {
        self.0
    }
}

impl Default for SampleInterval {
    fn default() -> Self {
        Self(TimeDelta::milliseconds(Self::DEFAULT_MILLIS))
    }
}

impl From<TimeDelta> for SampleInterval {
    fn from(delta: TimeDelta) -> Self {
        Self(delta)
    }
}

impl fmt::Display for SampleInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.as_millis())
    }
}

/// 分析窗口 [from, to]，由调用方的查询引擎给出
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    from: DateTime<Utc>,
    to: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self { from, to }
    }

    pub fn from(&self) -> DateTime<Utc> {
        self.from
    }

    pub fn to(&self) -> DateTime<Utc> {
        self.to
    }

    /// 按 [`format_timestamp`] 格式化起点
    pub fn formatted_from(&self) -> String {
        format_timestamp(&self.from)
    }

    /// 按 [`format_timestamp`] 格式化终点
    pub fn formatted_to(&self) -> String {
        format_timestamp(&self.to)
    }
}
