//! Temp Dir Port - 宿主提供的临时目录

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TempDirError {
    #[error("Failed to prepare temp dir {path}: {reason}")]
    Unavailable { path: String, reason: String },
}

/// Temp Dir Port
///
/// 返回一个可写的临时目录，目录不存在时由实现负责创建
#[async_trait]
pub trait TempDirPort: Send + Sync {
    async fn path(&self) -> Result<PathBuf, TempDirError>;
}
