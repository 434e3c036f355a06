//! Application Ports - 端口定义
//!
//! 定义应用层与基础设施层、宿主之间的抽象接口

mod plugin;
mod temp_dir;
mod voice_source;

pub use plugin::{PluginMetadata, PluginPort};
pub use temp_dir::{TempDirError, TempDirPort};
pub use voice_source::{SourceError, SourceResponse, VoiceSourcePort};
