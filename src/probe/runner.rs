//! 冒烟检查执行器
//!
//! 按固定顺序串行执行一组端点检查，传输失败不会中断序列

use crate::error::{ConfigError, ProbeError, Result};
use crate::probe::check::{CheckMethod, EndpointCheck};
use crate::probe::outcome::{truncate_lines, CheckOutcome, CheckStatus};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// 冒烟检查执行器trait
///
/// 定义检查执行的抽象接口，支持不同的实现
#[async_trait]
pub trait ProbeRunner {
    /// 执行单个端点检查
    ///
    /// # 参数
    /// * `base_url` - 服务基础URL
    /// * `check` - 检查项定义
    ///
    /// # 返回
    /// * `CheckOutcome` - 检查结果（传输失败也会生成结果，不返回错误）
    async fn execute(&self, base_url: &str, check: &EndpointCheck) -> CheckOutcome;

    /// 按顺序执行一组检查
    ///
    /// 检查严格串行执行，前一个完成后才开始下一个。
    /// 任何一个检查传输失败都不影响后续检查的执行。
    ///
    /// # 参数
    /// * `base_url` - 服务基础URL
    /// * `checks` - 检查项列表
    ///
    /// # 返回
    /// * `Vec<CheckOutcome>` - 按执行顺序排列的检查结果
    async fn run_sequence(&self, base_url: &str, checks: &[EndpointCheck]) -> Vec<CheckOutcome>;
}

/// HTTP冒烟检查执行器实现
pub struct HttpProbeRunner {
    client: reqwest::Client,
}

impl HttpProbeRunner {
    /// 创建新的HTTP检查执行器
    ///
    /// # 参数
    /// * `timeout` - 请求超时时间
    /// * `headers` - 附加到每个请求的自定义请求头
    ///
    /// # 返回
    /// * `Result<Self>` - 执行器实例或错误
    pub fn new(timeout: Duration, headers: &HashMap<String, String>) -> Result<Self> {
        let header_map = Self::build_header_map(headers)?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("{}/{}", crate::APP_NAME, crate::VERSION))
            .default_headers(header_map)
            .build()
            .map_err(ProbeError::from)?;

        Ok(Self { client })
    }

    /// 将配置中的请求头转换为HeaderMap
    fn build_header_map(headers: &HashMap<String, String>) -> Result<HeaderMap> {
        let mut header_map = HeaderMap::new();

        for (name, value) in headers {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
                ConfigError::ValidationError(format!("无效的请求头名称: {}", name))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|_| {
                ConfigError::ValidationError(format!("无效的请求头值: {}", name))
            })?;
            header_map.insert(header_name, header_value);
        }

        Ok(header_map)
    }

    /// 格式化传输错误消息
    fn format_transport_error(&self, error: &reqwest::Error) -> String {
        Self::classify_transport_cause(
            error.is_timeout(),
            error.is_connect(),
            error.is_decode(),
            &error.to_string(),
        )
    }

    /// 按错误特征归类为简短的失败原因
    ///
    /// 错误文本统一转小写后匹配，DNS/TLS类错误在不同平台上大小写不一致
    fn classify_transport_cause(
        timeout: bool,
        connect: bool,
        decode: bool,
        message: &str,
    ) -> String {
        let message_lower = message.to_lowercase();

        if timeout {
            "Request timeout".to_string()
        } else if connect {
            "Connection refused".to_string()
        } else if message_lower.contains("dns") {
            "DNS resolution failed".to_string()
        } else if message_lower.contains("certificate")
            || message_lower.contains("tls")
            || message_lower.contains("ssl")
        {
            "SSL/TLS certificate error".to_string()
        } else if decode {
            "Response decode error".to_string()
        } else {
            format!("Request failed: {}", message)
        }
    }
}

#[async_trait]
impl ProbeRunner for HttpProbeRunner {
    async fn execute(&self, base_url: &str, check: &EndpointCheck) -> CheckOutcome {
        let url = check.full_url(base_url);
        let start_time = Instant::now();

        debug!("开始检查: {} {} {}", check.method, check.label, url);

        let request = match check.method {
            CheckMethod::Get => self.client.get(&url),
            CheckMethod::Head => self.client.head(&url),
        };

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                let response_time = start_time.elapsed();
                let error_message = self.format_transport_error(&e);
                warn!("检查失败: {} - {}", check.label, error_message);
                return CheckOutcome::new(
                    check.label.clone(),
                    url,
                    check.method,
                    CheckStatus::TransportFailed,
                )
                .with_response_time(response_time)
                .with_error(error_message);
            }
        };

        let http_status = response.status();
        let status_line = format!("{:?} {}", response.version(), http_status);

        // HEAD请求不读取响应体，展示状态行；GET请求按行数上限截断响应体
        let (excerpt, truncated) = match check.method {
            CheckMethod::Head => truncate_lines(&status_line, check.output_lines),
            CheckMethod::Get => match response.text().await {
                Ok(body) => truncate_lines(&body, check.output_lines),
                Err(e) => {
                    let response_time = start_time.elapsed();
                    let error_message = self.format_transport_error(&e);
                    warn!("读取响应失败: {} - {}", check.label, error_message);
                    return CheckOutcome::new(
                        check.label.clone(),
                        url,
                        check.method,
                        CheckStatus::TransportFailed,
                    )
                    .with_response_time(response_time)
                    .with_error(error_message);
                }
            },
        };

        let response_time = start_time.elapsed();

        info!(
            "检查完成: {} - {} ({}ms)",
            check.label,
            http_status.as_u16(),
            response_time.as_millis()
        );

        CheckOutcome::new(
            check.label.clone(),
            url,
            check.method,
            CheckStatus::Completed,
        )
        .with_http_status(http_status.as_u16())
        .with_status_line(status_line)
        .with_excerpt(excerpt, truncated)
        .with_response_time(response_time)
    }

    async fn run_sequence(&self, base_url: &str, checks: &[EndpointCheck]) -> Vec<CheckOutcome> {
        info!("开始冒烟检查序列: {} ({} 项)", base_url, checks.len());

        let mut outcomes = Vec::with_capacity(checks.len());
        for check in checks {
            let outcome = self.execute(base_url, check).await;
            outcomes.push(outcome);
        }

        let failures = outcomes
            .iter()
            .filter(|o| o.status.is_transport_failure())
            .count();
        info!(
            "冒烟检查序列结束: {} 项完成, {} 项传输失败",
            outcomes.len() - failures,
            failures
        );

        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::check::default_checks;

    fn test_runner() -> HttpProbeRunner {
        HttpProbeRunner::new(Duration::from_secs(5), &HashMap::new()).unwrap()
    }

    #[tokio::test]
    async fn test_execute_get_success() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/")
            .with_status(200)
            .with_body("<p>Server working!</p>")
            .create_async()
            .await;

        let runner = test_runner();
        let check = EndpointCheck::new("Health check", "/", CheckMethod::Get, None);
        let outcome = runner.execute(&server.url(), &check).await;

        assert_eq!(outcome.status, CheckStatus::Completed);
        assert_eq!(outcome.http_status, Some(200));
        assert_eq!(outcome.response_excerpt, vec!["<p>Server working!</p>"]);
        assert!(!outcome.truncated);
    }

    #[tokio::test]
    async fn test_execute_head_reports_status_line() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("HEAD", "/img")
            .with_status(200)
            .create_async()
            .await;

        let runner = test_runner();
        let check = EndpointCheck::new("Image endpoint", "/img", CheckMethod::Head, Some(1));
        let outcome = runner.execute(&server.url(), &check).await;

        assert_eq!(outcome.status, CheckStatus::Completed);
        assert_eq!(outcome.response_excerpt.len(), 1);
        assert!(outcome.response_excerpt[0].starts_with("HTTP/1.1"));
        assert!(outcome.response_excerpt[0].contains("200"));
    }

    #[tokio::test]
    async fn test_execute_get_truncates_long_body() {
        let body: String = (1..=8).map(|i| format!("row {}\n", i)).collect();
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/test_db")
            .with_status(200)
            .with_body(&body)
            .create_async()
            .await;

        let runner = test_runner();
        let check = EndpointCheck::new(
            "Database connection test",
            "/test_db",
            CheckMethod::Get,
            Some(5),
        );
        let outcome = runner.execute(&server.url(), &check).await;

        assert_eq!(outcome.response_excerpt.len(), 5);
        assert_eq!(outcome.response_excerpt[0], "row 1");
        assert_eq!(outcome.response_excerpt[4], "row 5");
        assert!(outcome.truncated);
    }

    #[tokio::test]
    async fn test_execute_http_error_status_is_completed() {
        // 4xx/5xx响应按普通响应处理，不算传输失败
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/test_db")
            .with_status(500)
            .with_body("Internal Server Error")
            .create_async()
            .await;

        let runner = test_runner();
        let check = EndpointCheck::new(
            "Database connection test",
            "/test_db",
            CheckMethod::Get,
            Some(5),
        );
        let outcome = runner.execute(&server.url(), &check).await;

        assert_eq!(outcome.status, CheckStatus::Completed);
        assert_eq!(outcome.http_status, Some(500));
        assert_eq!(outcome.response_excerpt, vec!["Internal Server Error"]);
    }

    #[tokio::test]
    async fn test_execute_transport_failure() {
        let runner = test_runner();
        let check = EndpointCheck::new("Health check", "/", CheckMethod::Get, None);
        let outcome = runner.execute("http://127.0.0.1:9", &check).await;

        assert_eq!(outcome.status, CheckStatus::TransportFailed);
        assert!(outcome.error_message.is_some());
        assert!(outcome.http_status.is_none());
        assert!(outcome.response_excerpt.is_empty());
    }

    #[tokio::test]
    async fn test_run_sequence_preserves_order() {
        let mut server = mockito::Server::new_async().await;
        let _mocks = vec![
            server.mock("GET", "/").with_body("ok").create_async().await,
            server.mock("HEAD", "/img").create_async().await,
            server
                .mock("GET", "/test_db")
                .with_body("db ok")
                .create_async()
                .await,
            server
                .mock(
                    "GET",
                    "/dissociate/terms/posterior_cingulate/ventromedial_prefrontal",
                )
                .with_body("terms ok")
                .create_async()
                .await,
            server
                .mock("GET", "/dissociate/locations/0_-52_26/-2_50_-6")
                .with_body("locations ok")
                .create_async()
                .await,
        ];

        let runner = test_runner();
        let outcomes = runner.run_sequence(&server.url(), &default_checks()).await;

        let labels: Vec<&str> = outcomes.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Health check",
                "Image endpoint",
                "Database connection test",
                "Term dissociation analysis",
                "Location dissociation analysis",
            ]
        );
        assert!(outcomes.iter().all(|o| o.status == CheckStatus::Completed));
    }

    #[tokio::test]
    async fn test_run_sequence_continues_after_failures() {
        let runner = test_runner();
        let outcomes = runner
            .run_sequence("http://127.0.0.1:9", &default_checks())
            .await;

        assert_eq!(outcomes.len(), 5);
        assert!(outcomes
            .iter()
            .all(|o| o.status == CheckStatus::TransportFailed));
        assert!(outcomes.iter().all(|o| o.error_message.is_some()));
    }

    #[test]
    fn test_invalid_header_name_rejected() {
        let mut headers = HashMap::new();
        headers.insert("bad header".to_string(), "value".to_string());

        let result = HttpProbeRunner::new(Duration::from_secs(5), &headers);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_header_value_rejected() {
        let mut headers = HashMap::new();
        headers.insert("x-token".to_string(), "bad\nvalue".to_string());

        let result = HttpProbeRunner::new(Duration::from_secs(5), &headers);
        assert!(result.is_err());
    }

    #[test]
    fn test_transport_cause_classification_case_insensitive() {
        let dns_cause = HttpProbeRunner::classify_transport_cause(
            false,
            false,
            false,
            "error sending request: DNS error: failed to lookup address",
        );
        assert_eq!(dns_cause, "DNS resolution failed");

        let tls_cause = HttpProbeRunner::classify_transport_cause(
            false,
            false,
            false,
            "error sending request: invalid peer TLS handshake",
        );
        assert_eq!(tls_cause, "SSL/TLS certificate error");

        let ssl_cause = HttpProbeRunner::classify_transport_cause(
            false,
            false,
            false,
            "SSL routines: unexpected eof while reading",
        );
        assert_eq!(ssl_cause, "SSL/TLS certificate error");
    }

    #[test]
    fn test_transport_cause_priority() {
        let timeout_cause = HttpProbeRunner::classify_transport_cause(
            true,
            false,
            false,
            "operation timed out while resolving dns",
        );
        assert_eq!(timeout_cause, "Request timeout");

        let cert_cause = HttpProbeRunner::classify_transport_cause(
            false,
            false,
            false,
            "self signed certificate in chain",
        );
        assert_eq!(cert_cause, "SSL/TLS certificate error");

        let fallback =
            HttpProbeRunner::classify_transport_cause(false, false, false, "channel closed");
        assert!(fallback.starts_with("Request failed:"));
    }
}
