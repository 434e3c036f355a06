//! Message Context - Value Objects

/// 入站消息类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    Text,
    Voice,
    Image,
    File,
}

/// 入站消息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatContext {
    pub kind: ContextKind,
    pub content: String,
}

impl ChatContext {
    pub fn new(kind: ContextKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
        }
    }

    /// 文本消息
    pub fn text(content: impl Into<String>) -> Self {
        Self::new(ContextKind::Text, content)
    }

    pub fn is_text(&self) -> bool {
        self.kind == ContextKind::Text
    }
}

/// 回复类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    Text,
    /// content 为本地音频文件路径
    Voice,
}

/// 出站回复
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub kind: ReplyKind,
    pub content: String,
}

impl Reply {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            kind: ReplyKind::Text,
            content: content.into(),
        }
    }

    pub fn voice(path: impl Into<String>) -> Self {
        Self {
            kind: ReplyKind::Voice,
            content: path.into(),
        }
    }
}

/// 事件传递控制
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventAction {
    /// 继续交给后续插件处理
    #[default]
    Continue,
    /// 已产生回复，后续插件不再处理
    BreakPass,
}

/// 一次事件分发的上下文
///
/// 插件读取 `context`，写入 `reply` 与 `action`
#[derive(Debug, Clone)]
pub struct EventContext {
    pub context: ChatContext,
    pub reply: Option<Reply>,
    pub action: EventAction,
}

impl EventContext {
    pub fn new(context: ChatContext) -> Self {
        Self {
            context,
            reply: None,
            action: EventAction::Continue,
        }
    }

    /// 设置回复并阻止事件继续传递
    pub fn reply_and_break(&mut self, reply: Reply) {
        self.reply = Some(reply);
        self.action = EventAction::BreakPass;
    }

    pub fn is_handled(&self) -> bool {
        self.action == EventAction::BreakPass
    }
}
