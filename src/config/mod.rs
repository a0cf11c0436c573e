//! 配置管理模块
//!
//! 提供TOML配置文件的加载、解析和验证功能

pub mod loader;
pub mod types;

pub use loader::{get_default_config_path, load_or_default, ConfigLoader, TomlConfigLoader};
pub use types::{validate_config, Config, ProbeConfig};
