//! Voice Context - 语音文件限界上下文
//!
//! 职责:
//! - 临时语音文件命名
//! - 已下载语音文件（TemporaryVoiceFile）

mod value_objects;

pub use value_objects::{TemporaryVoiceFile, VoiceFileName, VOICE_EXTENSION, VOICE_FILE_PREFIX};
