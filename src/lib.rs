//! Service Smoke - 部署后冒烟检查工具
//!
//! 这是一个用Rust编写的部署验证工具，对目标服务按固定顺序
//! 执行一组HTTP端点检查并打印响应摘要，支持：
//! - 固定检查序列的串行执行
//! - 传输失败不中断后续检查
//! - 文本/JSON报告输出
//! - TOML配置与环境变量替换
//! - 结构化日志记录

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod probe;

// 重新导出主要类型
pub use config::{Config, ProbeConfig};
pub use error::ServiceSmokeError;
pub use probe::{
    default_checks, CheckMethod, CheckOutcome, CheckStatus, EndpointCheck, HttpProbeRunner,
    ProbeRunner,
};

/// 应用程序版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 应用程序名称
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// 应用程序描述
pub const APP_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
