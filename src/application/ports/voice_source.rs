//! Voice Source Port - 远程语音来源抽象
//!
//! 定义获取随机语音的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

/// 语音来源错误
///
/// 均属于传输层错误，由 VoiceFetcher 按重试策略重试
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("HTTP {status}: {body}")]
    StatusError { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 远程接口的成功响应（2xx）
#[derive(Debug, Clone)]
pub struct SourceResponse {
    /// HTTP 状态码
    pub status: u16,
    /// 原始音频数据（MP3）
    pub body: Vec<u8>,
}

impl SourceResponse {
    pub fn new(status: u16, body: Vec<u8>) -> Self {
        Self { status, body }
    }

    /// 响应体按 UTF-8 宽松解码，用于日志
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Voice Source Port
///
/// 每次调用发起一次请求，不做重试
#[async_trait]
pub trait VoiceSourcePort: Send + Sync {
    /// 请求地址（用于日志）
    fn endpoint(&self) -> &str;

    /// 获取一条随机语音
    ///
    /// 非 2xx 状态码返回 `SourceError::StatusError`
    async fn fetch(&self) -> Result<SourceResponse, SourceError>;
}
