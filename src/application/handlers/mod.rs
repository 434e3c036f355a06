//! Event Handlers - 插件事件处理器

mod women_voice_handler;

pub use women_voice_handler::{WomenVoicePlugin, FALLBACK_TEXT, TRIGGER_PHRASE};
