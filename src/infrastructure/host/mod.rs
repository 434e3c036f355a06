//! Host - 最小化的进程内插件宿主
//!
//! - PluginHost: 插件注册、按优先级分发、卸载清理
//! - ConsoleChannel: 从标准输入读取文本消息并输出回复

mod console;
mod plugin_host;

pub use console::{spawn_stdin_reader, ConsoleChannel, HELP_COMMAND};
pub use plugin_host::PluginHost;
