//! 配置数据结构定义
//!
//! 定义应用程序的配置结构体和验证逻辑
//!
//! 配置只影响检查的执行方式（目标地址、超时、日志、请求头），
//! 检查序列本身在编译期固定，不能通过配置增删或重排。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 主配置结构
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// 冒烟检查配置项
    #[serde(default)]
    pub probe: ProbeConfig,
}

/// 冒烟检查配置结构
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProbeConfig {
    /// 被检查服务的基础URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// 请求超时时间（秒）
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// 附加到每个请求的请求头
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_seconds: default_timeout(),
            log_level: default_log_level(),
            headers: HashMap::new(),
        }
    }
}

// 默认值函数
fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}
fn default_timeout() -> u64 {
    10
}
fn default_log_level() -> String {
    "info".to_string()
}

/// 配置验证函数
///
/// # 参数
/// * `config` - 要验证的配置
///
/// # 返回
/// * `Result<(), String>` - 验证结果，错误时返回错误信息
pub fn validate_config(config: &Config) -> Result<(), String> {
    // 验证基础URL
    if config.probe.base_url.trim().is_empty() {
        return Err("基础URL不能为空".to_string());
    }

    if !config.probe.base_url.starts_with("http://")
        && !config.probe.base_url.starts_with("https://")
    {
        return Err(format!("基础URL格式无效: {}", config.probe.base_url));
    }

    // 验证超时时间
    if config.probe.request_timeout_seconds == 0 {
        return Err("请求超时时间不能为0".to_string());
    }

    // 验证日志级别
    let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_log_levels.contains(&config.probe.log_level.as_str()) {
        return Err(format!(
            "无效的日志级别: {}，支持的级别: {:?}",
            config.probe.log_level, valid_log_levels
        ));
    }

    // 验证请求头名称
    for name in config.probe.headers.keys() {
        if name.trim().is_empty() {
            return Err("请求头名称不能为空".to_string());
        }
    }

    Ok(())
}
