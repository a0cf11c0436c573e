//! 冒烟检查模块
//!
//! 提供端点检查定义、检查执行和报告渲染功能

pub mod check;
pub mod outcome;
pub mod report;
pub mod runner;

pub use check::{default_checks, CheckMethod, EndpointCheck};
pub use outcome::{truncate_lines, CheckOutcome, CheckStatus};
pub use report::{render_json, render_text, FAILURE_MARKER};
pub use runner::{HttpProbeRunner, ProbeRunner};
