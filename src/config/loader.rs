//! Configuration Loader
//!
//! 实现配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（womenvoice_config.json）
//! 3. 默认值
//!
//! 配置文件不存在时写入默认文件；文件损坏时使用默认配置且不覆盖原文件

use config::{Config, ConfigError as ConfigCrateError, Environment, File, FileFormat};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::types::{AppConfig, DEFAULT_API_URL};

/// 配置加载错误
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("Failed to write default configuration: {0}")]
    WriteError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件名（与可执行文件同目录）
pub const CONFIG_FILE_NAME: &str = "womenvoice_config.json";

/// 覆盖配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "WOMENVOICE_CONFIG";

/// 配置来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// 读取已有配置文件
    File,
    /// 配置文件不存在，已写入默认文件
    CreatedDefault,
    /// 读取失败，使用内置默认配置
    Fallback,
}

/// 加载结果
///
/// 加载通常在日志初始化之前进行，结果由 `print_config` 统一输出
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub origin: ConfigOrigin,
    pub path: PathBuf,
    /// 回退到默认配置的原因
    pub error: Option<ConfigError>,
}

/// 默认配置文件路径
///
/// `WOMENVOICE_CONFIG` 优先，否则为可执行文件所在目录下的 `womenvoice_config.json`
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }

    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(CONFIG_FILE_NAME)))
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
}

/// 加载应用配置
///
/// # 环境变量示例
/// - `WOMENVOICE_API__URL=https://example.com/voice`
/// - `WOMENVOICE_FETCH__MAX_ATTEMPTS=5`
/// - `WOMENVOICE_LOG__LEVEL=debug`
pub fn load_config() -> LoadedConfig {
    load_config_from_path(&default_config_path())
}

/// 从指定路径加载配置，不会失败
pub fn load_config_from_path(path: &Path) -> LoadedConfig {
    let mut origin = ConfigOrigin::File;

    if !path.exists() {
        if let Err(e) = write_default_config(path) {
            return fallback(path, e);
        }
        origin = ConfigOrigin::CreatedDefault;
    }

    match build_config(path) {
        Ok(config) => LoadedConfig {
            config,
            origin,
            path: path.to_path_buf(),
            error: None,
        },
        Err(e) => fallback(path, e),
    }
}

fn fallback(path: &Path, error: ConfigError) -> LoadedConfig {
    LoadedConfig {
        config: AppConfig::default(),
        origin: ConfigOrigin::Fallback,
        path: path.to_path_buf(),
        error: Some(error),
    }
}

/// 默认配置文件内容
#[derive(Serialize)]
struct DefaultDocument<'a> {
    api: DefaultApi<'a>,
}

#[derive(Serialize)]
struct DefaultApi<'a> {
    url: &'a str,
}

/// 写入默认配置文件（4 空格缩进）
fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let document = DefaultDocument {
        api: DefaultApi {
            url: DEFAULT_API_URL,
        },
    };

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    document
        .serialize(&mut serializer)
        .map_err(|e| ConfigError::WriteError(e.to_string()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError(e.to_string()))?;
    }
    std::fs::write(path, buf).map_err(|e| ConfigError::WriteError(e.to_string()))
}

fn build_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("api.url", DEFAULT_API_URL)?
        .set_default("fetch.timeout_secs", 30)?
        .set_default("fetch.max_attempts", 3)?
        .set_default("fetch.retry_delay_ms", 1000)?
        .set_default("log.level", "info")?;

    // 2. 配置文件
    builder = builder.add_source(File::from(path).format(FileFormat::Json).required(true));

    // 3. 环境变量（最高优先级）
    // 前缀: WOMENVOICE_
    // 层级分隔符: __ (双下划线)
    builder = builder.add_source(
        Environment::with_prefix("WOMENVOICE")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.api.url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "API URL cannot be empty".to_string(),
        ));
    }

    if config.fetch.max_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "max_attempts must be at least 1".to_string(),
        ));
    }

    if config.fetch.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "timeout_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(loaded: &LoadedConfig) {
    match (&loaded.origin, &loaded.error) {
        (_, Some(e)) => {
            tracing::error!(
                path = %loaded.path.display(),
                error = %e,
                "[WomenVoice] 加载配置文件失败"
            );
        }
        (ConfigOrigin::CreatedDefault, None) => {
            tracing::info!(path = %loaded.path.display(), "[WomenVoice] 已创建默认配置文件");
        }
        _ => {
            tracing::info!(path = %loaded.path.display(), "[WomenVoice] 成功加载配置文件");
        }
    }

    let config = &loaded.config;
    tracing::info!("=== WomenVoice Configuration ===");
    tracing::info!("Config File: {} ({:?})", loaded.path.display(), loaded.origin);
    tracing::info!("API URL: {}", config.api.url);
    tracing::info!("Timeout: {}s", config.fetch.timeout_secs);
    tracing::info!(
        "Attempts: {} (retry delay {}ms)",
        config.fetch.max_attempts,
        config.fetch.retry_delay_ms
    );
    tracing::info!("Temp Directory: {:?}", config.storage.temp_dir);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("================================");
}
