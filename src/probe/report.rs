//! 检查报告渲染
//!
//! 将检查结果序列渲染为文本或JSON报告

use crate::probe::outcome::CheckOutcome;
use chrono::Utc;

/// 传输失败标记
///
/// 固定前缀，便于脚本在输出中检测失败行
pub const FAILURE_MARKER: &str = "✗ 请求失败";

/// 渲染文本报告
///
/// 每个检查依次输出标签行、响应内容（或失败标记行）、一个空行。
/// 渲染只依赖结果序列本身，相同的输入总是产生相同的输出。
///
/// # 参数
/// * `outcomes` - 按执行顺序排列的检查结果
///
/// # 返回
/// * `String` - 渲染后的报告文本
pub fn render_text(outcomes: &[CheckOutcome]) -> String {
    let mut report = String::new();

    for outcome in outcomes {
        report.push_str(&format!("==> {}\n", outcome.label));

        if outcome.status.is_transport_failure() {
            let cause = outcome.error_message.as_deref().unwrap_or("Request failed");
            report.push_str(&format!("{}: {}\n", FAILURE_MARKER, cause));
        } else {
            for line in &outcome.response_excerpt {
                report.push_str(line);
                report.push('\n');
            }
        }

        report.push('\n');
    }

    report
}

/// 渲染JSON报告
///
/// # 参数
/// * `base_url` - 本次检查的服务基础URL
/// * `outcomes` - 按执行顺序排列的检查结果
///
/// # 返回
/// * `Result<String, serde_json::Error>` - JSON文本或序列化错误
pub fn render_json(
    base_url: &str,
    outcomes: &[CheckOutcome],
) -> Result<String, serde_json::Error> {
    let transport_failures = outcomes
        .iter()
        .filter(|o| o.status.is_transport_failure())
        .count();

    let report = serde_json::json!({
        "base_url": base_url,
        "generated_at": Utc::now().to_rfc3339(),
        "total": outcomes.len(),
        "transport_failures": transport_failures,
        "outcomes": outcomes,
    });

    serde_json::to_string_pretty(&report)
}
