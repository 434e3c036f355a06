//! HTTP Voice Source - 调用远程随机语音接口
//!
//! 实现 VoiceSourcePort trait
//!
//! 外部 API:
//! GET https://api.zxz.ee/api/sjyjsj
//! Response: audio/mpeg binary

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::application::ports::{SourceError, SourceResponse, VoiceSourcePort};

/// HTTP 语音来源配置
#[derive(Debug, Clone)]
pub struct HttpVoiceSourceConfig {
    /// 接口地址
    pub url: String,
    /// 单次请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpVoiceSourceConfig {
    fn default() -> Self {
        Self {
            url: "https://api.zxz.ee/api/sjyjsj".to_string(),
            timeout_secs: 30,
        }
    }
}

impl HttpVoiceSourceConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// HTTP 语音来源
pub struct HttpVoiceSource {
    client: Client,
    config: HttpVoiceSourceConfig,
}

impl HttpVoiceSource {
    pub fn new(config: HttpVoiceSourceConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SourceError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }
}

fn map_reqwest_error(e: reqwest::Error) -> SourceError {
    if e.is_timeout() {
        SourceError::Timeout
    } else if e.is_connect() {
        SourceError::NetworkError(format!("Cannot connect to voice API: {}", e))
    } else {
        SourceError::NetworkError(e.to_string())
    }
}

#[async_trait]
impl VoiceSourcePort for HttpVoiceSource {
    fn endpoint(&self) -> &str {
        &self.config.url
    }

    async fn fetch(&self) -> Result<SourceResponse, SourceError> {
        let response = self
            .client
            .get(&self.config.url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::StatusError {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SourceError::Timeout
                } else {
                    SourceError::InvalidResponse(format!("Failed to read audio: {}", e))
                }
            })?
            .to_vec();

        tracing::debug!(
            url = %self.config.url,
            status = status.as_u16(),
            size = body.len(),
            "Voice API responded"
        );

        Ok(SourceResponse::new(status.as_u16(), body))
    }
}
