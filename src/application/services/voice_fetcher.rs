//! Voice Fetcher - 下载、校验并跟踪临时语音文件
//!
//! 单次获取流程:
//! IDLE -> REQUESTING -> (RETRYING <-> REQUESTING)* -> SUCCEEDED | FAILED
//!
//! SUCCEEDED 的文件进入跟踪列表，直到 `cleanup` 将其删除

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::application::error::FetchError;
use crate::application::ports::{SourceResponse, TempDirPort, VoiceSourcePort};
use crate::domain::voice::{TemporaryVoiceFile, VoiceFileName};

/// 成功状态码，其余 2xx 视为失败
const HTTP_OK: u16 = 200;

/// 文件名冲突时最多生成的文件名个数
const NAME_ATTEMPTS: u32 = 3;

/// 重试策略
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPolicy {
    /// 总尝试次数（含首次）
    pub max_attempts: u32,
    /// 两次尝试之间的等待时间
    pub retry_delay: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_secs(1),
        }
    }
}

/// 清理结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupResult {
    /// 删除的文件数量
    pub deleted_files: u64,
    /// 已不存在（被外部删除）的文件数量
    pub missing_files: u64,
    /// 删除失败的文件数量
    pub failed_files: u64,
}

/// 语音获取服务
pub struct VoiceFetcher {
    source: Arc<dyn VoiceSourcePort>,
    temp_dir: Arc<dyn TempDirPort>,
    policy: FetchPolicy,
    /// 本进程生成、尚未清理的临时文件
    tracked: Mutex<Vec<PathBuf>>,
}

impl VoiceFetcher {
    pub fn new(
        source: Arc<dyn VoiceSourcePort>,
        temp_dir: Arc<dyn TempDirPort>,
        policy: FetchPolicy,
    ) -> Self {
        Self {
            source,
            temp_dir,
            policy,
            tracked: Mutex::new(Vec::new()),
        }
    }

    /// 获取一条随机语音
    ///
    /// 任何失败都只记录日志并返回 `None`
    pub async fn fetch(&self) -> Option<TemporaryVoiceFile> {
        match self.try_fetch().await {
            Ok(file) => Some(file),
            Err(err) => {
                tracing::error!(
                    endpoint = %self.source.endpoint(),
                    error = %err,
                    "[WomenVoice] 获取语音失败"
                );
                None
            }
        }
    }

    /// 获取一条随机语音，保留失败原因
    pub async fn try_fetch(&self) -> Result<TemporaryVoiceFile, FetchError> {
        let response = self.request_with_retry().await?;

        if response.status != HTTP_OK {
            return Err(FetchError::UnexpectedStatus {
                status: response.status,
                body: response.body_text(),
            });
        }

        let dir = self.temp_dir.path().await?;
        let (path, file) = create_artifact(&dir, VoiceFileName::generate).await?;

        let size_bytes = match write_payload(file, &path, &response.body).await {
            Ok(size) => size,
            Err(err) => {
                discard(&path).await;
                return Err(err);
            }
        };

        self.tracked.lock().await.push(path.clone());

        let file = TemporaryVoiceFile::new(path, size_bytes);
        tracing::info!(
            path = %file.path().display(),
            size_kb = %format!("{:.2}", file.size_kb()),
            "[WomenVoice] 语音下载完成"
        );
        Ok(file)
    }

    /// 发起请求，传输层错误按策略重试
    async fn request_with_retry(&self) -> Result<SourceResponse, FetchError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            tracing::debug!(
                endpoint = %self.source.endpoint(),
                attempt,
                max_attempts,
                "[WomenVoice] 请求语音API"
            );

            match self.source.fetch().await {
                Ok(response) => return Ok(response),
                Err(err) if attempt >= max_attempts => {
                    return Err(FetchError::RetriesExhausted {
                        attempts: attempt,
                        source: err,
                    });
                }
                Err(err) => {
                    tracing::warn!(
                        error = %err,
                        "[WomenVoice] 语音API请求重试 {}/{}",
                        attempt,
                        max_attempts
                    );
                    tokio::time::sleep(self.policy.retry_delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// 当前跟踪中的临时文件
    pub async fn tracked_files(&self) -> Vec<PathBuf> {
        self.tracked.lock().await.clone()
    }

    /// 删除所有跟踪中的临时文件并清空列表
    ///
    /// 单个文件删除失败不影响其余文件，可重复调用
    pub async fn cleanup(&self) -> CleanupResult {
        let mut tracked = self.tracked.lock().await;
        let mut result = CleanupResult::default();

        for path in tracked.iter() {
            match fs::remove_file(path).await {
                Ok(()) => {
                    result.deleted_files += 1;
                    tracing::debug!(path = %path.display(), "[WomenVoice] 已清理临时文件");
                }
                Err(err) if err.kind() == ErrorKind::NotFound => {
                    result.missing_files += 1;
                }
                Err(err) => {
                    result.failed_files += 1;
                    tracing::error!(
                        path = %path.display(),
                        error = %err,
                        "[WomenVoice] 清理临时文件失败"
                    );
                }
            }
        }

        tracked.clear();

        if result != CleanupResult::default() {
            tracing::info!(
                deleted = result.deleted_files,
                missing = result.missing_files,
                failed = result.failed_files,
                "[WomenVoice] 临时文件清理完成"
            );
        }

        result
    }
}

/// 以 create_new 创建文件，同名文件已存在时换一个文件名
///
/// 已存在的文件不会被改动
async fn create_artifact<F>(dir: &Path, mut next_name: F) -> Result<(PathBuf, fs::File), FetchError>
where
    F: FnMut() -> VoiceFileName,
{
    let mut attempt = 1;
    loop {
        let path = next_name().in_dir(dir);
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => return Ok((path, file)),
            Err(err) if err.kind() == ErrorKind::AlreadyExists && attempt < NAME_ATTEMPTS => {
                tracing::warn!(path = %path.display(), "[WomenVoice] 临时文件名冲突，重新生成");
                attempt += 1;
            }
            Err(err) => return Err(FetchError::io(&path, err)),
        }
    }
}

/// 写入文件并返回文件大小，空文件视为失败
async fn write_payload(mut file: fs::File, path: &Path, body: &[u8]) -> Result<u64, FetchError> {
    file.write_all(body)
        .await
        .map_err(|e| FetchError::io(path, e))?;
    file.flush().await.map_err(|e| FetchError::io(path, e))?;

    let size = file
        .metadata()
        .await
        .map_err(|e| FetchError::io(path, e))?
        .len();

    if size == 0 {
        tracing::error!(path = %path.display(), "[WomenVoice] 下载的语音文件大小为0");
        return Err(FetchError::EmptyPayload);
    }

    Ok(size)
}

/// 尽力删除未完成的文件，失败只记录日志
async fn discard(path: &Path) {
    match fs::remove_file(path).await {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "[WomenVoice] 已删除无效的语音文件");
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => {
            tracing::error!(
                path = %path.display(),
                error = %err,
                "[WomenVoice] 清理失败的语音文件时出错"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{SourceError, TempDirError};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tempfile::tempdir;

    /// 按顺序返回预设响应，耗尽后重复最后一个
    struct ScriptedSource {
        script: std::sync::Mutex<VecDeque<Result<SourceResponse, SourceError>>>,
        calls: AtomicU32,
    }

    impl ScriptedSource {
        fn new(script: Vec<Result<SourceResponse, SourceError>>) -> Arc<Self> {
            Arc::new(Self {
                script: std::sync::Mutex::new(script.into()),
                calls: AtomicU32::new(0),
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl VoiceSourcePort for ScriptedSource {
        fn endpoint(&self) -> &str {
            "fake://voice"
        }

        async fn fetch(&self) -> Result<SourceResponse, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut script = self.script.lock().unwrap();
            if script.len() > 1 {
                script.pop_front().unwrap()
            } else {
                script.front().unwrap().clone()
            }
        }
    }

    struct FixedTempDir(PathBuf);

    #[async_trait]
    impl TempDirPort for FixedTempDir {
        async fn path(&self) -> Result<PathBuf, TempDirError> {
            Ok(self.0.clone())
        }
    }

    fn fast_policy() -> FetchPolicy {
        FetchPolicy {
            max_attempts: 3,
            retry_delay: Duration::from_millis(20),
        }
    }

    fn fetcher(source: Arc<ScriptedSource>, dir: &Path) -> VoiceFetcher {
        VoiceFetcher::new(source, Arc::new(FixedTempDir(dir.to_path_buf())), fast_policy())
    }

    fn count_files(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[tokio::test]
    async fn test_fetch_success_tracks_file_once() {
        let temp = tempdir().unwrap();
        let source = ScriptedSource::new(vec![Ok(SourceResponse::new(200, vec![1u8; 2048]))]);
        let fetcher = fetcher(source.clone(), temp.path());

        let file = fetcher.fetch().await.unwrap();

        assert!(file.path().exists());
        assert_eq!(file.size_bytes(), 2048);
        assert_eq!(std::fs::metadata(file.path()).unwrap().len(), 2048);
        assert_eq!(fetcher.tracked_files().await, vec![file.path().to_path_buf()]);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_retries_then_succeeds() {
        let temp = tempdir().unwrap();
        let source = ScriptedSource::new(vec![
            Err(SourceError::Timeout),
            Err(SourceError::NetworkError("connection refused".into())),
            Ok(SourceResponse::new(200, b"mp3".to_vec())),
        ]);
        let fetcher = fetcher(source.clone(), temp.path());

        assert!(fetcher.fetch().await.is_some());
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test]
    async fn test_exhausted_retries_fail_after_three_attempts() {
        let temp = tempdir().unwrap();
        let source = ScriptedSource::new(vec![Err(SourceError::StatusError {
            status: 500,
            body: "boom".into(),
        })]);
        let fetcher = fetcher(source.clone(), temp.path());

        let started = std::time::Instant::now();
        let err = fetcher.try_fetch().await.unwrap_err();

        assert!(matches!(err, FetchError::RetriesExhausted { attempts: 3, .. }));
        assert_eq!(source.calls(), 3);
        assert!(started.elapsed() >= Duration::from_millis(40));
        assert_eq!(count_files(temp.path()), 0);
        assert!(fetcher.tracked_files().await.is_empty());
    }

    #[tokio::test]
    async fn test_non_200_success_status_is_not_retried() {
        let temp = tempdir().unwrap();
        let source = ScriptedSource::new(vec![Ok(SourceResponse::new(204, Vec::new()))]);
        let fetcher = fetcher(source.clone(), temp.path());

        let err = fetcher.try_fetch().await.unwrap_err();

        assert!(matches!(err, FetchError::UnexpectedStatus { status: 204, .. }));
        assert_eq!(source.calls(), 1);
        assert_eq!(count_files(temp.path()), 0);
    }

    #[tokio::test]
    async fn test_empty_body_leaves_no_file() {
        let temp = tempdir().unwrap();
        let source = ScriptedSource::new(vec![Ok(SourceResponse::new(200, Vec::new()))]);
        let fetcher = fetcher(source, temp.path());

        let err = fetcher.try_fetch().await.unwrap_err();

        assert!(matches!(err, FetchError::EmptyPayload));
        assert_eq!(count_files(temp.path()), 0);
        assert!(fetcher.tracked_files().await.is_empty());
    }

    #[tokio::test]
    async fn test_write_failure_returns_none() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("does-not-exist");
        let source = ScriptedSource::new(vec![Ok(SourceResponse::new(200, b"mp3".to_vec()))]);
        let fetcher = fetcher(source, &missing);

        assert!(fetcher.fetch().await.is_none());
        assert!(fetcher.tracked_files().await.is_empty());
    }

    #[tokio::test]
    async fn test_cleanup_is_idempotent() {
        let temp = tempdir().unwrap();
        let source = ScriptedSource::new(vec![Ok(SourceResponse::new(200, b"mp3".to_vec()))]);
        let fetcher = fetcher(source, temp.path());

        let first = fetcher.fetch().await.unwrap();
        let second = fetcher.fetch().await.unwrap();
        assert_ne!(first.path(), second.path());

        // 模拟外部删除
        std::fs::remove_file(first.path()).unwrap();

        let result = fetcher.cleanup().await;
        assert_eq!(result.deleted_files, 1);
        assert_eq!(result.missing_files, 1);
        assert_eq!(result.failed_files, 0);
        assert!(!second.path().exists());
        assert!(fetcher.tracked_files().await.is_empty());

        assert_eq!(fetcher.cleanup().await, CleanupResult::default());
    }

    #[tokio::test]
    async fn test_cleanup_on_empty_list() {
        let temp = tempdir().unwrap();
        let source = ScriptedSource::new(vec![Err(SourceError::Timeout)]);
        let fetcher = fetcher(source, temp.path());

        assert_eq!(fetcher.cleanup().await, CleanupResult::default());
    }

    #[tokio::test]
    async fn test_cleanup_continues_after_a_failed_delete() {
        let temp = tempdir().unwrap();
        let source = ScriptedSource::new(vec![Ok(SourceResponse::new(200, b"mp3".to_vec()))]);
        let fetcher = fetcher(source, temp.path());

        let blocked = fetcher.fetch().await.unwrap();
        let other = fetcher.fetch().await.unwrap();

        // 换成非空目录，remove_file 会失败且不是 NotFound
        std::fs::remove_file(blocked.path()).unwrap();
        std::fs::create_dir(blocked.path()).unwrap();
        std::fs::write(blocked.path().join("inner"), b"x").unwrap();

        let result = fetcher.cleanup().await;

        assert_eq!(result.failed_files, 1);
        assert_eq!(result.deleted_files, 1);
        assert!(!other.path().exists());
        assert!(blocked.path().is_dir());
        assert!(fetcher.tracked_files().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_artifact_skips_existing_name() {
        let temp = tempdir().unwrap();
        let mut names = vec![
            VoiceFileName::with_rng(2, &mut rand::thread_rng()),
            VoiceFileName::with_rng(1, &mut rand::thread_rng()),
        ];
        let taken = names[1].in_dir(temp.path());
        std::fs::write(&taken, b"keep").unwrap();

        let (path, _file) = create_artifact(temp.path(), || names.pop().unwrap())
            .await
            .unwrap();

        assert_ne!(path, taken);
        assert_eq!(std::fs::read(&taken).unwrap(), b"keep");
    }

    #[tokio::test]
    async fn test_create_artifact_never_truncates_existing_file() {
        let temp = tempdir().unwrap();
        let name = VoiceFileName::with_rng(1, &mut rand::thread_rng());
        let taken = name.in_dir(temp.path());
        std::fs::write(&taken, b"keep").unwrap();

        let err = create_artifact(temp.path(), || name.clone())
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Io { .. }));
        assert_eq!(std::fs::read(&taken).unwrap(), b"keep");
        assert_eq!(count_files(temp.path()), 1);
    }
}
