//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（VoiceSource、TempDir、Plugin）
//! - services: VoiceFetcher 下载与临时文件管理
//! - handlers: WomenVoice 插件事件处理
//! - error: 应用层错误定义

pub mod error;
pub mod handlers;
pub mod ports;
pub mod services;

pub use error::FetchError;

pub use handlers::{WomenVoicePlugin, FALLBACK_TEXT, TRIGGER_PHRASE};

pub use ports::{
    PluginMetadata, PluginPort, SourceError, SourceResponse, TempDirError, TempDirPort,
    VoiceSourcePort,
};

pub use services::{CleanupResult, FetchPolicy, VoiceFetcher};
