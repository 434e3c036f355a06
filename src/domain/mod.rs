//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Message Context: 聊天消息与回复
//! - Voice Context: 临时语音文件

pub mod message;
pub mod voice;
