//! WomenVoice Plugin - 收到「撒个娇」时回复一条随机御姐语音

use async_trait::async_trait;
use std::sync::Arc;

use crate::application::ports::{PluginMetadata, PluginPort};
use crate::application::services::VoiceFetcher;
use crate::domain::message::{EventContext, Reply};

/// 触发词
pub const TRIGGER_PHRASE: &str = "撒个娇";

/// 获取失败时的回复
pub const FALLBACK_TEXT: &str = "抱歉，随机御姐语音获取失败，请稍后再试";

const METADATA: PluginMetadata = PluginMetadata {
    name: "WomenVoice",
    desire_priority: 10,
    description: "随机御姐语音插件：发送'撒个娇'，机器人将发送随机御姐语音",
    version: "1.0",
    author: "AI Assistant",
};

/// WomenVoice 插件
pub struct WomenVoicePlugin {
    fetcher: Arc<VoiceFetcher>,
}

impl WomenVoicePlugin {
    pub fn new(fetcher: Arc<VoiceFetcher>) -> Self {
        tracing::info!("[WomenVoice] 插件已初始化");
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &Arc<VoiceFetcher> {
        &self.fetcher
    }
}

#[async_trait]
impl PluginPort for WomenVoicePlugin {
    fn metadata(&self) -> &PluginMetadata {
        &METADATA
    }

    async fn on_handle_context(&self, event: &mut EventContext) {
        if !event.context.is_text() || event.context.content.trim() != TRIGGER_PHRASE {
            return;
        }

        tracing::info!("[WomenVoice] 收到撒个娇请求");

        let reply = match self.fetcher.fetch().await {
            Some(file) => {
                tracing::info!(path = %file.path().display(), "[WomenVoice] 已获取语音文件");
                Reply::voice(file.path().to_string_lossy())
            }
            None => {
                tracing::warn!("[WomenVoice] 语音获取失败");
                Reply::text(FALLBACK_TEXT)
            }
        };

        event.reply_and_break(reply);
    }

    fn help_text(&self) -> String {
        let mut help_text = String::from("🎤 随机御姐语音插件 🎤\n\n");
        help_text.push_str("使用方法：\n");
        help_text.push_str(&format!("- 发送 '{}' 获取一条随机御姐语音\n", TRIGGER_PHRASE));
        help_text
    }

    async fn cleanup(&self) {
        self.fetcher.cleanup().await;
    }
}
