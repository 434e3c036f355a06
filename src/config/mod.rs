//! Configuration Module
//!
//! 提供插件配置管理功能，支持多层级配置来源：
//! - 环境变量（最高优先级）
//! - 配置文件（JSON 格式）
//! - 默认值（最低优先级）

mod loader;
mod types;

pub use loader::{
    default_config_path, load_config, load_config_from_path, print_config, ConfigError,
    ConfigOrigin, LoadedConfig, CONFIG_FILE_NAME, CONFIG_PATH_ENV,
};
pub use types::{ApiConfig, AppConfig, FetchConfig, LogConfig, StorageConfig, DEFAULT_API_URL};
