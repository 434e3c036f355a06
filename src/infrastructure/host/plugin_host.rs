//! Plugin Host Implementation

use std::cmp::Reverse;
use std::sync::Arc;

use crate::application::ports::{PluginMetadata, PluginPort};
use crate::domain::message::{ChatContext, EventContext};

/// 插件宿主
///
/// 按 desire_priority 从高到低分发事件，直到某个插件返回 BreakPass
#[derive(Default)]
pub struct PluginHost {
    plugins: Vec<Arc<dyn PluginPort>>,
}

impl PluginHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册插件，相同优先级保持注册顺序
    pub fn register(&mut self, plugin: Arc<dyn PluginPort>) {
        let metadata = plugin.metadata();
        tracing::info!(
            name = metadata.name,
            version = metadata.version,
            priority = metadata.desire_priority,
            "Plugin registered"
        );
        self.plugins.push(plugin);
        self.plugins
            .sort_by_key(|p| Reverse(p.metadata().desire_priority));
    }

    pub fn plugins(&self) -> impl Iterator<Item = &PluginMetadata> {
        self.plugins.iter().map(|p| p.metadata())
    }

    /// 分发一条消息
    pub async fn dispatch(&self, context: ChatContext) -> EventContext {
        let mut event = EventContext::new(context);

        for plugin in &self.plugins {
            plugin.on_handle_context(&mut event).await;
            if event.is_handled() {
                tracing::debug!(plugin = plugin.metadata().name, "Event handled");
                break;
            }
        }

        event
    }

    /// 所有插件的帮助文本
    pub fn help_text(&self) -> String {
        self.plugins
            .iter()
            .map(|p| p.help_text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// 卸载所有插件
    pub async fn shutdown(&self) {
        for plugin in &self.plugins {
            plugin.cleanup().await;
            tracing::debug!(plugin = plugin.metadata().name, "Plugin cleaned up");
        }
    }
}
