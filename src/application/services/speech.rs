//! 语音与翻译解析
//!
//! 优先从结果缓存读取，未命中再调用外部网关并写回缓存。
//! 只缓存已完成的结果，不对进行中的相同请求去重。

use std::sync::Arc;

use crate::application::ports::{
    CachedResult, ResultCachePort, SynthesisRequest, TranslatorPort, TtsEnginePort, TtsError,
};
use crate::domain::Language;

/// 语音服务
pub struct SpeechService {
    tts_engine: Arc<dyn TtsEnginePort>,
    translator: Arc<dyn TranslatorPort>,
    cache: Arc<dyn ResultCachePort>,
}

impl SpeechService {
    pub fn new(
        tts_engine: Arc<dyn TtsEnginePort>,
        translator: Arc<dyn TranslatorPort>,
        cache: Arc<dyn ResultCachePort>,
    ) -> Self {
        Self {
            tts_engine,
            translator,
            cache,
        }
    }

    /// 获取文本对应的音频
    pub async fn audio_for(&self, request: SynthesisRequest) -> Result<Arc<Vec<u8>>, TtsError> {
        if let Some(audio) = self.cache.get(&request.text).and_then(|entry| entry.audio) {
            tracing::debug!(text_len = request.text.len(), "Audio cache hit");
            return Ok(audio);
        }

        tracing::info!(
            text_len = request.text.len(),
            voice_id = ?request.voice_id,
            speed = request.speed.as_str(),
            language = %request.language,
            "Synthesizing speech"
        );

        let audio = Arc::new(self.tts_engine.synthesize(request.clone()).await?);
        self.cache.set(
            &request.text,
            CachedResult {
                audio: Some(audio.clone()),
                translation: None,
            },
        );

        let stats = self.cache.stats();
        tracing::info!(audio_size = audio.len(), "Speech synthesized");
        tracing::debug!(
            entries = stats.total_entries,
            capacity = stats.capacity,
            hits = stats.hit_count,
            misses = stats.miss_count,
            "Result cache stats"
        );
        Ok(audio)
    }

    /// 获取文本译文，失败时为原文
    pub async fn translation_for(&self, text: &str, source: Language, target: Language) -> String {
        if let Some(translation) = self.cache.get(text).and_then(|entry| entry.translation) {
            tracing::debug!(text_len = text.len(), "Translation cache hit");
            return translation;
        }

        let translated = self.translator.translate(text, source, target).await;
        // 回退为原文的结果不缓存，下次仍会重试
        if translated != text {
            self.cache.set(text, CachedResult::with_translation(translated.clone()));
        }
        translated
    }

    pub fn cache(&self) -> &Arc<dyn ResultCachePort> {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SpeedSetting;
    use crate::infrastructure::adapters::FakeTtsClient;
    use crate::infrastructure::memory::InMemoryResultCache;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct CountingTranslator {
        calls: AtomicU32,
        fail: bool,
    }

    #[async_trait]
    impl TranslatorPort for CountingTranslator {
        async fn translate(&self, text: &str, _source: Language, _target: Language) -> String {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                text.to_string()
            } else {
                format!("EN({})", text)
            }
        }
    }

    fn request(text: &str) -> SynthesisRequest {
        SynthesisRequest {
            text: text.to_string(),
            voice_id: None,
            speed: SpeedSetting::Normal,
            language: Language::Zh,
        }
    }

    fn service(fail_translation: bool) -> (SpeechService, Arc<FakeTtsClient>, Arc<CountingTranslator>) {
        let tts = Arc::new(FakeTtsClient::from_bytes(vec![1, 2, 3]));
        let translator = Arc::new(CountingTranslator {
            calls: AtomicU32::new(0),
            fail: fail_translation,
        });
        let cache = Arc::new(InMemoryResultCache::new(50));
        (
            SpeechService::new(tts.clone(), translator.clone(), cache),
            tts,
            translator,
        )
    }

    #[tokio::test]
    async fn test_audio_is_cached_after_first_synthesis() {
        let (service, tts, _) = service(false);

        let first = service.audio_for(request("你好")).await.unwrap();
        let second = service.audio_for(request("你好")).await.unwrap();

        assert_eq!(*first, vec![1, 2, 3]);
        assert_eq!(first, second);
        assert_eq!(tts.call_count(), 1);
    }

    #[tokio::test]
    async fn test_cache_stats_track_synthesis_lookups() {
        let (service, _, _) = service(false);

        service.audio_for(request("你好")).await.unwrap();
        service.audio_for(request("你好")).await.unwrap();
        service.audio_for(request("世界")).await.unwrap();

        let stats = service.cache().stats();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.capacity, 50);
        assert_eq!(stats.hit_count, 1);
        assert_eq!(stats.miss_count, 2);
    }

    #[tokio::test]
    async fn test_translation_merges_with_cached_audio() {
        let (service, _, translator) = service(false);

        service.audio_for(request("你好")).await.unwrap();
        let translated = service.translation_for("你好", Language::Zh, Language::En).await;
        let again = service.translation_for("你好", Language::Zh, Language::En).await;

        assert_eq!(translated, "EN(你好)");
        assert_eq!(again, translated);
        assert_eq!(translator.calls.load(Ordering::SeqCst), 1);

        let entry = service.cache().get("你好").unwrap();
        assert!(entry.audio.is_some());
        assert_eq!(entry.translation.as_deref(), Some("EN(你好)"));
    }

    #[tokio::test]
    async fn test_failed_translation_is_not_cached() {
        let (service, _, translator) = service(true);

        assert_eq!(service.translation_for("你好", Language::Zh, Language::En).await, "你好");
        assert_eq!(service.translation_for("你好", Language::Zh, Language::En).await, "你好");

        assert_eq!(translator.calls.load(Ordering::SeqCst), 2);
        assert!(service.cache().get("你好").is_none());
    }
}
