//! Google Translate Client - 公共翻译接口
//!
//! GET {base_url}?client=gtx&sl=<source>&tl=<target>&dt=t&q=<text>
//! 响应为嵌套数组，译文为 `data[0][i][0]` 的拼接

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::application::ports::{TranslationError, TranslatorPort};
use crate::domain::Language;

/// 翻译客户端配置
#[derive(Debug, Clone)]
pub struct GoogleTranslatorConfig {
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for GoogleTranslatorConfig {
    fn default() -> Self {
        Self {
            base_url: "https://translate.googleapis.com/translate_a/single".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Google 翻译客户端
pub struct GoogleTranslator {
    client: Client,
    config: GoogleTranslatorConfig,
}

impl GoogleTranslator {
    pub fn new(config: GoogleTranslatorConfig) -> Result<Self, TranslationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TranslationError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    async fn request(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> Result<String, TranslationError> {
        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("client", "gtx"),
                ("sl", source.as_str()),
                ("tl", target.as_str()),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| TranslationError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslationError::ServiceError(status.as_u16()));
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| TranslationError::InvalidResponse(e.to_string()))?;

        parse_translation(&data)
    }
}

/// 拼接 `data[0][i][0]`
fn parse_translation(data: &Value) -> Result<String, TranslationError> {
    let sentences = data
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslationError::InvalidResponse("missing sentence array".to_string()))?;

    Ok(sentences
        .iter()
        .filter_map(|sentence| sentence.get(0).and_then(Value::as_str))
        .collect())
}

#[async_trait]
impl TranslatorPort for GoogleTranslator {
    async fn translate(&self, text: &str, source: Language, target: Language) -> String {
        if text.trim().is_empty() || source == target {
            return text.to_string();
        }

        match self.request(text, source, target).await {
            Ok(translated) if !translated.is_empty() => {
                tracing::debug!(
                    source = %source,
                    target = %target,
                    text_len = text.len(),
                    "Translation succeeded"
                );
                translated
            }
            Ok(_) => {
                tracing::warn!("Translation returned empty text, using original");
                text.to_string()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Translation failed, using original");
                text.to_string()
            }
        }
    }
}
