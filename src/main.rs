//! Service Smoke 主程序入口
//!
//! 部署后冒烟检查工具

use anyhow::{Context, Result};
use service_smoke::cli::args::{Args, Commands};
use service_smoke::cli::commands::{
    Command, InitCommand, ListCommand, RunCommand, ValidateCommand, VersionCommand,
};
use service_smoke::config::load_or_default;
use service_smoke::logging::{LogConfig, LoggingSystem};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // 解析命令行参数
    let args = Args::parse_args();

    // 日志级别可来自配置文件；这里的读取失败静默退回默认值，
    // 让init/version等不依赖配置文件的命令保持可用
    let config_log_level = load_or_default(args.config.as_deref())
        .await
        .map(|config| config.probe.log_level)
        .unwrap_or_else(|_| "info".to_string());

    // 初始化日志系统
    let log_config = LogConfig {
        level: LogConfig::resolve_level(
            args.log_level.map(Into::into),
            args.is_verbose(),
            &config_log_level,
        ),
        console: true,
        json_format: false,
        ..Default::default()
    };

    let _logging_system = LoggingSystem::setup_logging(log_config).context("初始化日志系统失败")?;

    info!("Service Smoke v{} 启动", service_smoke::VERSION);

    // 执行命令
    if let Err(e) = execute_command(&args).await {
        error!("命令执行失败: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// 执行CLI命令
///
/// 未指定子命令时默认执行检查序列
async fn execute_command(args: &Args) -> Result<()> {
    match args.command.clone().unwrap_or_default() {
        Commands::Run { .. } => {
            let command = RunCommand;
            command.execute(args).await.map_err(|e| anyhow::anyhow!(e))
        }
        Commands::List { .. } => {
            let command = ListCommand;
            command.execute(args).await.map_err(|e| anyhow::anyhow!(e))
        }
        Commands::Init { .. } => {
            let command = InitCommand;
            command.execute(args).await.map_err(|e| anyhow::anyhow!(e))
        }
        Commands::Validate { .. } => {
            let command = ValidateCommand;
            command.execute(args).await.map_err(|e| anyhow::anyhow!(e))
        }
        Commands::Version { .. } => {
            let command = VersionCommand;
            command.execute(args).await.map_err(|e| anyhow::anyhow!(e))
        }
    }
}
