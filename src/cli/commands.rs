//! 命令处理逻辑
//!
//! 实现各种CLI命令的处理逻辑

use crate::cli::args::{Args, Commands, ConfigTemplate, OutputFormat};
use crate::config::{load_or_default, validate_config, Config, ConfigLoader, TomlConfigLoader};
use crate::error::{ConfigError, Result};
use crate::probe::{
    default_checks, render_json, render_text, EndpointCheck, HttpProbeRunner, ProbeRunner,
};
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

/// 命令处理器trait
#[async_trait]
pub trait Command: Send + Sync {
    /// 执行命令
    async fn execute(&self, args: &Args) -> Result<()>;
}

/// 冒烟检查命令
///
/// 默认命令，按固定顺序执行检查序列并打印报告。
/// 检查全部执行完即视为成功，单项传输失败不会导致命令失败。
pub struct RunCommand;

#[async_trait]
impl Command for RunCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        let command = args.command.clone().unwrap_or_default();
        if let Commands::Run {
            base_url,
            timeout,
            format,
        } = command
        {
            self.perform_smoke_run(args, base_url.as_deref(), timeout, format)
                .await
        } else {
            Ok(())
        }
    }
}

impl RunCommand {
    /// 执行冒烟检查序列
    async fn perform_smoke_run(
        &self,
        args: &Args,
        base_url: Option<&str>,
        timeout: Option<u64>,
        format: OutputFormat,
    ) -> Result<()> {
        // 加载配置并应用命令行参数覆盖
        let mut config = load_or_default(args.config.as_deref()).await?;
        Self::apply_overrides(&mut config, base_url, timeout)?;

        // 覆盖值不经过加载时的校验，这里对生效配置整体复验
        validate_config(&config).map_err(ConfigError::ValidationError)?;

        // 创建检查执行器
        let runner = HttpProbeRunner::new(
            Duration::from_secs(config.probe.request_timeout_seconds),
            &config.probe.headers,
        )?;

        // 按固定顺序执行检查
        let checks = default_checks();
        let outcomes = runner.run_sequence(&config.probe.base_url, &checks).await;

        // 输出报告
        match format {
            OutputFormat::Json => {
                println!("{}", render_json(&config.probe.base_url, &outcomes)?);
            }
            OutputFormat::Text => {
                print!("{}", render_text(&outcomes));
            }
        }

        Ok(())
    }

    /// 应用命令行参数覆盖
    ///
    /// 缺省子命令时参数不经过clap的环境变量解析，这里做同样的回退，
    /// 保持 命令行 > 环境变量 > 配置文件 > 默认值 的优先级。
    fn apply_overrides(
        config: &mut Config,
        base_url: Option<&str>,
        timeout: Option<u64>,
    ) -> Result<()> {
        if let Some(url) = base_url {
            config.probe.base_url = url.to_string();
        } else if let Ok(url) = std::env::var("SERVICE_SMOKE_BASE_URL") {
            config.probe.base_url = url;
        }

        if let Some(seconds) = timeout {
            config.probe.request_timeout_seconds = seconds;
        } else if let Ok(raw) = std::env::var("SERVICE_SMOKE_TIMEOUT") {
            config.probe.request_timeout_seconds = raw.parse().map_err(|_| {
                ConfigError::ValidationError(format!("环境变量SERVICE_SMOKE_TIMEOUT无效: {}", raw))
            })?;
        }

        Ok(())
    }
}

/// 列表命令
///
/// 打印固定的检查序列，不发送任何请求
pub struct ListCommand;

#[async_trait]
impl Command for ListCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        if let Some(Commands::List { format }) = &args.command {
            let checks = default_checks();
            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&checks)?);
                }
                OutputFormat::Text => {
                    print!("{}", format_check_list(&checks));
                }
            }
        }
        Ok(())
    }
}

/// 格式化检查序列列表
fn format_check_list(checks: &[EndpointCheck]) -> String {
    let mut output = format!("检查序列（共 {} 项）:\n", checks.len());

    for (index, check) in checks.iter().enumerate() {
        let limit = match check.output_lines {
            Some(lines) => format!("前{}行", lines),
            None => "全部".to_string(),
        };
        output.push_str(&format!(
            "  {}. {} - {} {} (输出: {})\n",
            index + 1,
            check.label,
            check.method,
            check.path,
            limit
        ));
    }

    output
}

/// 初始化命令
pub struct InitCommand;

#[async_trait]
impl Command for InitCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        if let Some(Commands::Init {
            config_path,
            force,
            template,
        }) = &args.command
        {
            self.create_config_file(config_path, *force, template).await
        } else {
            Ok(())
        }
    }
}

impl InitCommand {
    /// 创建配置文件
    async fn create_config_file(
        &self,
        config_path: &Path,
        force: bool,
        template: &ConfigTemplate,
    ) -> Result<()> {
        // 检查文件是否已存在
        if config_path.exists() && !force {
            eprintln!("配置文件已存在: {}", config_path.display());
            eprintln!("使用 --force 参数覆盖现有文件");
            return Ok(());
        }

        // 创建目录（如果不存在）
        if let Some(parent) = config_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // 根据模板类型生成配置内容
        let config_content = match template {
            ConfigTemplate::Minimal => self.get_minimal_config(),
            ConfigTemplate::Basic => self.get_basic_config(),
            ConfigTemplate::Full => self.get_full_config(),
        };

        // 写入配置文件
        tokio::fs::write(config_path, config_content).await?;

        println!("配置文件已创建: {}", config_path.display());
        println!("请编辑配置文件以设置被检查服务的基础URL");

        Ok(())
    }

    /// 获取最小配置模板
    fn get_minimal_config(&self) -> &'static str {
        include_str!("../../templates/minimal_config.toml")
    }

    /// 获取基础配置模板
    fn get_basic_config(&self) -> &'static str {
        include_str!("../../templates/basic_config.toml")
    }

    /// 获取完整配置模板
    fn get_full_config(&self) -> &'static str {
        include_str!("../../templates/full_config.toml")
    }
}

/// 验证命令
pub struct ValidateCommand;

#[async_trait]
impl Command for ValidateCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        if let Some(Commands::Validate {
            config_path,
            verbose,
        }) = &args.command
        {
            let config_file = config_path
                .clone()
                .unwrap_or_else(|| args.get_config_path());

            self.validate_config_file(&config_file, *verbose).await
        } else {
            Ok(())
        }
    }
}

impl ValidateCommand {
    /// 验证配置文件
    async fn validate_config_file(&self, config_path: &Path, verbose: bool) -> Result<()> {
        println!("验证配置文件: {}", config_path.display());

        // 加载配置
        let loader = TomlConfigLoader::new(true);
        let config = loader.load_from_file(config_path).await?;

        if verbose {
            println!("配置验证通过！");
            println!("冒烟检查配置:");
            println!("  基础URL: {}", config.probe.base_url);
            println!("  请求超时: {}秒", config.probe.request_timeout_seconds);
            println!("  日志级别: {}", config.probe.log_level);

            if !config.probe.headers.is_empty() {
                println!("  请求头:");
                for (name, value) in &config.probe.headers {
                    println!("    {}: {}", name, value);
                }
            }
        } else {
            println!("✓ 配置文件验证通过");
        }

        Ok(())
    }
}

/// 版本命令
pub struct VersionCommand;

#[async_trait]
impl Command for VersionCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        if let Some(Commands::Version { format }) = &args.command {
            match format {
                OutputFormat::Json => {
                    let version_info = serde_json::json!({
                        "name": crate::APP_NAME,
                        "version": crate::VERSION,
                        "description": crate::APP_DESCRIPTION
                    });
                    println!("{}", serde_json::to_string_pretty(&version_info)?);
                }
                OutputFormat::Text => {
                    println!("{} v{}", crate::APP_NAME, crate::VERSION);
                    println!("{}", crate::APP_DESCRIPTION);
                }
            }
        }
        Ok(())
    }
}
