//! Voice Context - Value Objects

use chrono::Utc;
use rand::Rng;
use std::path::{Path, PathBuf};

/// 临时语音文件名前缀
pub const VOICE_FILE_PREFIX: &str = "women_voice";

/// 临时语音文件扩展名
pub const VOICE_EXTENSION: &str = "mp3";

const SUFFIX_LEN: usize = 6;

/// 临时语音文件名
///
/// 格式: `women_voice_<unix 时间戳>_<6 位小写字母>.mp3`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceFileName(String);

impl VoiceFileName {
    /// 使用当前时间与线程随机数生成文件名
    pub fn generate() -> Self {
        Self::with_rng(Utc::now().timestamp(), &mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng>(timestamp: i64, rng: &mut R) -> Self {
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| char::from(rng.gen_range(b'a'..=b'z')))
            .collect();
        Self(format!(
            "{}_{}_{}.{}",
            VOICE_FILE_PREFIX, timestamp, suffix, VOICE_EXTENSION
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 拼接到目录下的完整路径
    pub fn in_dir(&self, dir: &Path) -> PathBuf {
        dir.join(&self.0)
    }
}

impl std::fmt::Display for VoiceFileName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 已下载的临时语音文件
///
/// 不变量:
/// - size_bytes > 0
/// - path 由 VoiceFetcher 独占跟踪，直到 cleanup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporaryVoiceFile {
    path: PathBuf,
    size_bytes: u64,
}

impl TemporaryVoiceFile {
    pub fn new(path: PathBuf, size_bytes: u64) -> Self {
        Self { path, size_bytes }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn size_kb(&self) -> f64 {
        self.size_bytes as f64 / 1024.0
    }
}
