//! Infrastructure Layer - 基础设施层
//!
//! 提供所有端口的具体实现

pub mod adapters;
pub mod host;

pub use adapters::{HttpVoiceSource, HttpVoiceSourceConfig, ScopedTempDir};
pub use host::{ConsoleChannel, PluginHost};
