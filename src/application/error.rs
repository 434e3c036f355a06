//! 应用层错误定义
//!
//! VoiceFetcher 内部的失败原因，在处理器边界统一折叠为 `None`

use thiserror::Error;

use crate::application::ports::{SourceError, TempDirError};

/// 语音获取错误
#[derive(Debug, Error)]
pub enum FetchError {
    /// 重试次数已用完
    #[error("voice API request failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: SourceError,
    },

    /// 2xx 但不是 200
    #[error("voice API returned unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// 写入后文件大小为 0
    #[error("downloaded voice file is empty")]
    EmptyPayload,

    /// 临时目录不可用
    #[error(transparent)]
    TempDir(#[from] TempDirError),

    /// 文件读写错误
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
