//! Cartesia TTS Client - 调用 Cartesia 语音合成服务
//!
//! 实现 TtsEnginePort trait
//!
//! 外部 TTS API:
//! POST {base_url}/tts/bytes
//! Headers: Cartesia-Version, Authorization: Bearer <key>
//! Request: {"model_id", "transcript", "voice": {"mode": "id", "id"}, "output_format", "language", "speed"}
//! Response: audio/mpeg binary

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::application::ports::{SynthesisRequest, TtsEnginePort, TtsError};
use crate::domain::default_voice_for;

#[derive(Debug, Serialize)]
struct VoiceSpec<'a> {
    mode: &'static str,
    id: &'a str,
}

#[derive(Debug, Serialize)]
struct OutputFormat {
    container: &'static str,
    bit_rate: u32,
    sample_rate: u32,
}

/// 合成请求体 (JSON)
#[derive(Debug, Serialize)]
struct CartesiaRequest<'a> {
    model_id: &'a str,
    transcript: &'a str,
    voice: VoiceSpec<'a>,
    output_format: OutputFormat,
    language: &'static str,
    speed: &'static str,
}

/// Cartesia 客户端配置
#[derive(Debug, Clone)]
pub struct CartesiaTtsClientConfig {
    /// 服务基础 URL
    pub base_url: String,
    /// API 密钥，空串表示未配置
    pub api_key: String,
    /// `Cartesia-Version` 请求头
    pub api_version: String,
    pub model_id: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for CartesiaTtsClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.cartesia.ai".to_string(),
            api_key: String::new(),
            api_version: "2025-04-16".to_string(),
            model_id: "sonic-2".to_string(),
            timeout_secs: 30,
        }
    }
}

impl CartesiaTtsClientConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            ..Default::default()
        }
    }
}

/// Cartesia TTS 客户端
pub struct CartesiaTtsClient {
    client: Client,
    config: CartesiaTtsClientConfig,
}

impl CartesiaTtsClient {
    pub fn new(config: CartesiaTtsClientConfig) -> Result<Self, TtsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TtsError::NetworkError(e.to_string()))?;

        if config.api_key.trim().is_empty() {
            tracing::warn!("TTS API key not configured, synthesis requests will fail");
        }

        Ok(Self { client, config })
    }

    fn synthesize_url(&self) -> String {
        format!("{}/tts/bytes", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl TtsEnginePort for CartesiaTtsClient {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<Vec<u8>, TtsError> {
        let api_key = self.config.api_key.trim();
        if api_key.is_empty() {
            return Err(TtsError::MissingCredential);
        }

        let voice_id = request
            .voice_id
            .as_deref()
            .unwrap_or_else(|| default_voice_for(request.language).id);

        let body = CartesiaRequest {
            model_id: &self.config.model_id,
            transcript: &request.text,
            voice: VoiceSpec {
                mode: "id",
                id: voice_id,
            },
            output_format: OutputFormat {
                container: "mp3",
                bit_rate: 128_000,
                sample_rate: 44_100,
            },
            language: request.language.as_str(),
            speed: request.speed.as_str(),
        };

        tracing::debug!(
            url = %self.synthesize_url(),
            text_len = request.text.len(),
            voice_id = %voice_id,
            "Sending TTS request"
        );

        let response = self
            .client
            .post(self.synthesize_url())
            .header("Cartesia-Version", &self.config.api_version)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TtsError::Timeout
                } else if e.is_connect() {
                    TtsError::NetworkError(format!("Cannot connect to TTS service: {}", e))
                } else {
                    TtsError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %body, "TTS API error");
            return Err(TtsError::ServiceError {
                status: status.as_u16(),
                body,
            });
        }

        let audio_data = response
            .bytes()
            .await
            .map_err(|e| TtsError::InvalidResponse(format!("Failed to read audio: {}", e)))?
            .to_vec();

        if audio_data.is_empty() {
            return Err(TtsError::InvalidResponse("Empty audio body".to_string()));
        }

        tracing::info!(audio_size = audio_data.len(), "TTS synthesis completed");
        Ok(audio_data)
    }
}
