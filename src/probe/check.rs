//! 检查项定义模块
//!
//! 定义冒烟测试的检查项结构和固定检查序列

use serde::{Deserialize, Serialize};

/// 检查使用的HTTP方法
///
/// 冒烟测试只发送只读请求，因此仅支持GET和HEAD。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckMethod {
    /// GET请求，展示响应体
    Get,
    /// HEAD请求，展示响应状态行
    Head,
}

impl std::fmt::Display for CheckMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckMethod::Get => write!(f, "GET"),
            CheckMethod::Head => write!(f, "HEAD"),
        }
    }
}

/// 单个端点检查项
///
/// 检查序列在编译期固定，运行期不可增删或重排；每次运行重新构建，
/// 构建后不再修改。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointCheck {
    /// 人类可读的检查名称
    pub label: String,
    /// URL路径后缀（以/开头，可包含多级路径段）
    pub path: String,
    /// HTTP方法
    pub method: CheckMethod,
    /// 展示的响应行数上限（None表示不限制）
    pub output_lines: Option<usize>,
}

impl EndpointCheck {
    /// 创建新的检查项
    ///
    /// # 参数
    /// * `label` - 检查名称
    /// * `path` - URL路径后缀
    /// * `method` - HTTP方法
    /// * `output_lines` - 展示行数上限
    ///
    /// # 返回
    /// * `Self` - 检查项实例
    pub fn new(label: &str, path: &str, method: CheckMethod, output_lines: Option<usize>) -> Self {
        Self {
            label: label.to_string(),
            path: path.to_string(),
            method,
            output_lines,
        }
    }

    /// 拼接完整请求URL
    ///
    /// 基础URL末尾的斜杠会被折叠，避免产生双斜杠路径。
    ///
    /// # 参数
    /// * `base_url` - 基础URL
    ///
    /// # 返回
    /// * `String` - 完整URL
    pub fn full_url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path)
    }
}

/// 构建固定的检查序列
///
/// 五个检查项的顺序与内容在编译期固定：
/// 1. 服务根路径健康检查（展示全部输出）
/// 2. 图片端点HEAD探测（展示状态行）
/// 3. 数据库连通性检查（展示前5行）
/// 4. 术语分离分析端点（展示前5行）
/// 5. 坐标分离分析端点（展示前5行）
pub fn default_checks() -> Vec<EndpointCheck> {
    vec![
        EndpointCheck::new("Health check", "/", CheckMethod::Get, None),
        EndpointCheck::new("Image endpoint", "/img", CheckMethod::Head, Some(1)),
        EndpointCheck::new("Database connection test", "/test_db", CheckMethod::Get, Some(5)),
        EndpointCheck::new(
            "Term dissociation analysis",
            "/dissociate/terms/posterior_cingulate/ventromedial_prefrontal",
            CheckMethod::Get,
            Some(5),
        ),
        EndpointCheck::new(
            "Location dissociation analysis",
            "/dissociate/locations/0_-52_26/-2_50_-6",
            CheckMethod::Get,
            Some(5),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_method_display() {
        assert_eq!(CheckMethod::Get.to_string(), "GET");
        assert_eq!(CheckMethod::Head.to_string(), "HEAD");
    }

    #[test]
    fn test_default_checks_order() {
        let checks = default_checks();

        assert_eq!(checks.len(), 5);
        assert_eq!(checks[0].label, "Health check");
        assert_eq!(checks[1].label, "Image endpoint");
        assert_eq!(checks[2].label, "Database connection test");
        assert_eq!(checks[3].label, "Term dissociation analysis");
        assert_eq!(checks[4].label, "Location dissociation analysis");
    }

    #[test]
    fn test_default_checks_paths_and_methods() {
        let checks = default_checks();

        assert_eq!(checks[0].path, "/");
        assert_eq!(checks[0].method, CheckMethod::Get);
        assert_eq!(checks[0].output_lines, None);

        assert_eq!(checks[1].path, "/img");
        assert_eq!(checks[1].method, CheckMethod::Head);
        assert_eq!(checks[1].output_lines, Some(1));

        assert_eq!(checks[2].path, "/test_db");
        assert_eq!(checks[2].method, CheckMethod::Get);
        assert_eq!(checks[2].output_lines, Some(5));

        assert_eq!(
            checks[3].path,
            "/dissociate/terms/posterior_cingulate/ventromedial_prefrontal"
        );
        assert_eq!(
            checks[4].path,
            "/dissociate/locations/0_-52_26/-2_50_-6"
        );
        assert_eq!(checks[4].output_lines, Some(5));
    }

    #[test]
    fn test_default_checks_recreated_each_call() {
        // 序列每次重新构建，互不共享
        let first = default_checks();
        let second = default_checks();
        assert_eq!(first, second);
    }

    #[test]
    fn test_full_url_concatenation() {
        let check = EndpointCheck::new("Image endpoint", "/img", CheckMethod::Head, Some(1));

        assert_eq!(check.full_url("http://localhost:8000"), "http://localhost:8000/img");
        // 末尾斜杠被折叠
        assert_eq!(check.full_url("http://localhost:8000/"), "http://localhost:8000/img");
    }

    #[test]
    fn test_full_url_with_nested_path() {
        let check = EndpointCheck::new(
            "Term dissociation analysis",
            "/dissociate/terms/posterior_cingulate/ventromedial_prefrontal",
            CheckMethod::Get,
            Some(5),
        );

        assert_eq!(
            check.full_url("https://example.com"),
            "https://example.com/dissociate/terms/posterior_cingulate/ventromedial_prefrontal"
        );
    }

    #[test]
    fn test_check_serialization() {
        let checks = default_checks();
        let json = serde_json::to_string(&checks).unwrap();

        assert!(json.contains("Health check"));
        assert!(json.contains("\"HEAD\""));

        let deserialized: Vec<EndpointCheck> = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, checks);
    }
}
