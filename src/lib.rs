//! WomenVoice - 随机御姐语音插件
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Message Context: 消息、回复、事件传递控制
//! - Voice Context: 临时语音文件
//!
//! 应用层 (application/):
//! - Ports: 端口定义（VoiceSource, TempDir, Plugin）
//! - Services: VoiceFetcher 下载、重试、校验与清理
//! - Handlers: WomenVoice 插件
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: HTTP Voice Source, Scoped Temp Dir
//! - Host: 插件宿主与控制台通道

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
