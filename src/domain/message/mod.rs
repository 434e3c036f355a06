//! Message Context - 聊天消息上下文
//!
//! 职责:
//! - 入站消息（ChatContext）
//! - 出站回复（Reply）
//! - 事件传递控制（EventAction）

mod value_objects;

pub use value_objects::{ChatContext, ContextKind, EventAction, EventContext, Reply, ReplyKind};
