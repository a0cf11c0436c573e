//! 检查结果数据结构
//!
//! 定义单次检查的结果类型和状态枚举

use crate::probe::check::CheckMethod;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// 检查状态枚举
///
/// 冒烟测试只区分"收到了响应"和"传输层失败"两种情况，
/// HTTP错误状态码（4xx/5xx）的响应按普通响应处理。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    /// 收到响应（无论状态码）
    Completed,
    /// 传输失败（连接拒绝、超时、DNS解析失败等）
    TransportFailed,
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckStatus::Completed => write!(f, "完成"),
            CheckStatus::TransportFailed => write!(f, "传输失败"),
        }
    }
}

impl CheckStatus {
    /// 判断是否为传输失败
    pub fn is_transport_failure(&self) -> bool {
        matches!(self, CheckStatus::TransportFailed)
    }
}

/// 单次检查的结果
///
/// 每个检查项执行后生成一个结果，用于渲染报告后即被丢弃，
/// 不做任何持久化。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// 检查ID
    pub id: Uuid,
    /// 检查名称
    pub label: String,
    /// 请求的完整URL
    pub url: String,
    /// HTTP方法
    pub method: CheckMethod,
    /// 检查时间戳
    pub timestamp: DateTime<Utc>,
    /// 检查状态
    pub status: CheckStatus,
    /// HTTP状态码（收到响应时）
    pub http_status: Option<u16>,
    /// 响应状态行（HEAD检查展示用）
    pub status_line: Option<String>,
    /// 按行截断后的响应内容
    #[serde(default)]
    pub response_excerpt: Vec<String>,
    /// 响应内容是否被截断
    #[serde(default)]
    pub truncated: bool,
    /// 响应时间
    #[serde(with = "duration_serde")]
    pub response_time: Duration,
    /// 错误信息（传输失败时）
    pub error_message: Option<String>,
}

impl CheckOutcome {
    /// 创建新的检查结果
    ///
    /// # 参数
    /// * `label` - 检查名称
    /// * `url` - 请求的完整URL
    /// * `method` - HTTP方法
    /// * `status` - 检查状态
    ///
    /// # 返回
    /// * `Self` - 检查结果实例
    pub fn new(label: String, url: String, method: CheckMethod, status: CheckStatus) -> Self {
        Self {
            id: Uuid::new_v4(),
            label,
            url,
            method,
            timestamp: Utc::now(),
            status,
            http_status: None,
            status_line: None,
            response_excerpt: Vec::new(),
            truncated: false,
            response_time: Duration::from_millis(0),
            error_message: None,
        }
    }

    /// 设置HTTP状态码
    pub fn with_http_status(mut self, http_status: u16) -> Self {
        self.http_status = Some(http_status);
        self
    }

    /// 设置响应状态行
    pub fn with_status_line(mut self, status_line: String) -> Self {
        self.status_line = Some(status_line);
        self
    }

    /// 设置截断后的响应内容
    pub fn with_excerpt(mut self, excerpt: Vec<String>, truncated: bool) -> Self {
        self.response_excerpt = excerpt;
        self.truncated = truncated;
        self
    }

    /// 设置响应时间
    pub fn with_response_time(mut self, response_time: Duration) -> Self {
        self.response_time = response_time;
        self
    }

    /// 设置错误信息
    pub fn with_error(mut self, error_message: String) -> Self {
        self.error_message = Some(error_message);
        self
    }

    /// 获取响应时间（毫秒）
    pub fn response_time_ms(&self) -> u64 {
        self.response_time.as_millis() as u64
    }

    /// 转换为JSON字符串
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// 从JSON字符串创建
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// 按行截断文本
///
/// 返回截断后的行列表以及是否发生截断。`limit`为None时不截断。
/// 使用`str::lines`分行，末尾换行符不会产生空行。
///
/// # 参数
/// * `text` - 原始文本
/// * `limit` - 行数上限
///
/// # 返回
/// * `(Vec<String>, bool)` - 截断后的行与截断标记
pub fn truncate_lines(text: &str, limit: Option<usize>) -> (Vec<String>, bool) {
    let all_lines: Vec<&str> = text.lines().collect();

    match limit {
        Some(max) if all_lines.len() > max => {
            let shown = all_lines[..max].iter().map(|s| s.to_string()).collect();
            (shown, true)
        }
        _ => (all_lines.iter().map(|s| s.to_string()).collect(), false),
    }
}

/// Duration序列化模块
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
