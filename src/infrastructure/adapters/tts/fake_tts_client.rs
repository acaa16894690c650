//! Fake TTS Client - 不访问网络的 TTS 客户端
//!
//! 始终返回固定的音频，并记录收到的请求

use async_trait::async_trait;
use std::path::Path;
use std::sync::Mutex;

use crate::application::ports::{SynthesisRequest, TtsEnginePort, TtsError};

/// Fake TTS Client
pub struct FakeTtsClient {
    audio_data: Vec<u8>,
    requests: Mutex<Vec<SynthesisRequest>>,
}

impl FakeTtsClient {
    /// 从音频文件创建
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, std::io::Error> {
        let path = path.as_ref();
        let audio_data = std::fs::read(path)?;
        tracing::info!(
            path = %path.display(),
            audio_size = audio_data.len(),
            "FakeTtsClient initialized"
        );
        Ok(Self::from_bytes(audio_data))
    }

    pub fn from_bytes(audio_data: Vec<u8>) -> Self {
        Self {
            audio_data,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// 已收到的合成请求
    pub fn requests(&self) -> Vec<SynthesisRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }
}

#[async_trait]
impl TtsEnginePort for FakeTtsClient {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<Vec<u8>, TtsError> {
        tracing::debug!(
            text_len = request.text.len(),
            voice_id = ?request.voice_id,
            "FakeTtsClient: returning fixed audio"
        );

        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
        Ok(self.audio_data.clone())
    }
}
