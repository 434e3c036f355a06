//! Plugin Port - 宿主与插件之间的入站端口

use async_trait::async_trait;

use crate::domain::message::EventContext;

/// 插件元数据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginMetadata {
    pub name: &'static str,
    /// 分发优先级，数值越大越先处理
    pub desire_priority: i32,
    pub description: &'static str,
    pub version: &'static str,
    pub author: &'static str,
}

/// Plugin Port
///
/// 宿主按优先级依次调用 `on_handle_context`，直到某个插件将 action 置为 BreakPass
#[async_trait]
pub trait PluginPort: Send + Sync {
    fn metadata(&self) -> &PluginMetadata;

    /// 处理一次消息事件
    async fn on_handle_context(&self, event: &mut EventContext);

    /// 帮助文本
    fn help_text(&self) -> String;

    /// 插件卸载时释放资源，必须可重复调用
    async fn cleanup(&self) {}
}
