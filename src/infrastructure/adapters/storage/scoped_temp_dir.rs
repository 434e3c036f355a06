//! Scoped Temp Dir - 文件系统临时目录实现
//!
//! 实现 TempDirPort trait

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::application::ports::{TempDirError, TempDirPort};

/// 宿主管理的临时目录
///
/// 每次取路径时确保目录存在
pub struct ScopedTempDir {
    base_dir: PathBuf,
}

impl ScopedTempDir {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl TempDirPort for ScopedTempDir {
    async fn path(&self) -> Result<PathBuf, TempDirError> {
        fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|e| TempDirError::Unavailable {
                path: self.base_dir.display().to_string(),
                reason: e.to_string(),
            })?;

        Ok(self.base_dir.clone())
    }
}
