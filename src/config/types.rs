//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::application::services::FetchPolicy;

/// 默认语音接口地址
pub const DEFAULT_API_URL: &str = "https://api.zxz.ee/api/sjyjsj";

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 语音接口配置
    #[serde(default)]
    pub api: ApiConfig,

    /// 请求与重试配置
    #[serde(default)]
    pub fetch: FetchConfig,

    /// 临时文件配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 语音接口配置
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// 接口 URL
    #[serde(default = "default_api_url")]
    pub url: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
        }
    }
}

/// 请求与重试配置
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// 单次请求超时时间（秒）
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// 总尝试次数（含首次）
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// 重试间隔（毫秒）
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl FetchConfig {
    pub fn policy(&self) -> FetchPolicy {
        FetchPolicy {
            max_attempts: self.max_attempts,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
        }
    }
}

/// 临时文件配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 临时语音文件目录
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,
}

fn default_temp_dir() -> PathBuf {
    std::env::temp_dir().join("womenvoice")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            temp_dir: default_temp_dir(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}
