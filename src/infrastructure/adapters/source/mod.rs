//! Voice Source Adapter - HTTP 语音来源实现

mod http_voice_source;

pub use http_voice_source::{HttpVoiceSource, HttpVoiceSourceConfig};
