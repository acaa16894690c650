//! 应用层测试用的内存替身

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::application::messages::{Message, Reply, ReplyPayload};
use crate::application::ports::{
    DeliveryError, ReaderChannelPort, SettingsStorePort, StoreError, SynthesisRequest,
    TranslatorPort, TtsEnginePort, TtsError,
};
use crate::application::services::{ReaderLink, RetryPolicy, SpeechService};
use crate::domain::{Language, ReaderSettings};
use crate::infrastructure::memory::InMemoryResultCache;

/// 记录收到的消息，按配置回复
#[derive(Default)]
pub struct RecordingChannel {
    received: Mutex<Vec<Message>>,
    selection: Mutex<String>,
    fail_playback: bool,
    disconnected: bool,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_selection(text: &str) -> Self {
        let channel = Self::default();
        *channel.selection.lock().unwrap() = text.to_string();
        channel
    }

    pub fn failing_playback() -> Self {
        Self {
            fail_playback: true,
            ..Self::default()
        }
    }

    pub fn disconnected() -> Self {
        Self {
            disconnected: true,
            ..Self::default()
        }
    }

    /// 除 PING 以外收到的消息
    pub fn received(&self) -> Vec<Message> {
        self.received.lock().unwrap().clone()
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        self.received().iter().map(Message::kind).collect()
    }
}

#[async_trait]
impl ReaderChannelPort for RecordingChannel {
    async fn send(&self, message: Message) -> Result<Reply, DeliveryError> {
        if self.disconnected {
            return Err(DeliveryError::NotConnected);
        }
        if message == Message::Ping {
            return Ok(Reply::ready());
        }

        self.received.lock().unwrap().push(message.clone());
        let reply = match message {
            Message::GetSelection => Reply::with_payload(ReplyPayload::Selection {
                text: self.selection.lock().unwrap().clone(),
            }),
            Message::PlayAudio { .. } | Message::PlayDifferenceAndFull { .. }
                if self.fail_playback =>
            {
                Reply::failure("audio device unavailable")
            }
            _ => Reply::ok(),
        };
        Ok(reply)
    }

    async fn inject(&self) -> Result<(), DeliveryError> {
        if self.disconnected {
            Err(DeliveryError::InjectFailed("restricted page".to_string()))
        } else {
            Ok(())
        }
    }
}

/// 内存设置存储
#[derive(Default)]
pub struct MemoryStore {
    settings: Mutex<ReaderSettings>,
    last_selected: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn with_settings(settings: ReaderSettings) -> Self {
        Self {
            settings: Mutex::new(settings),
            last_selected: Mutex::new(None),
        }
    }
}

impl SettingsStorePort for MemoryStore {
    fn load(&self) -> Result<ReaderSettings, StoreError> {
        Ok(self.settings.lock().unwrap().clone())
    }

    fn save(&self, settings: &ReaderSettings) -> Result<(), StoreError> {
        *self.settings.lock().unwrap() = settings.clone();
        Ok(())
    }

    fn last_selected_text(&self) -> Result<Option<String>, StoreError> {
        Ok(self.last_selected.lock().unwrap().clone())
    }

    fn set_last_selected_text(&self, text: &str) -> Result<(), StoreError> {
        *self.last_selected.lock().unwrap() = Some(text.to_string());
        Ok(())
    }
}

/// 译文为 `EN(<原文>)`
pub struct EchoTranslator;

#[async_trait]
impl TranslatorPort for EchoTranslator {
    async fn translate(&self, text: &str, _source: Language, _target: Language) -> String {
        format!("EN({})", text)
    }
}

pub fn fast_link(channel: Arc<dyn ReaderChannelPort>) -> Arc<ReaderLink> {
    Arc::new(ReaderLink::new(
        channel,
        RetryPolicy {
            max_attempts: 3,
            retry_delay: Duration::from_millis(1),
            inject_settle: Duration::from_millis(1),
        },
    ))
}

/// 按文本设定合成耗时的 TTS，音频内容即文本的 UTF-8 字节
#[derive(Default)]
pub struct ScriptedTts {
    delays: Vec<(String, Duration)>,
}

impl ScriptedTts {
    pub fn with_delay(mut self, text: &str, delay: Duration) -> Self {
        self.delays.push((text.to_string(), delay));
        self
    }
}

#[async_trait]
impl TtsEnginePort for ScriptedTts {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<Vec<u8>, TtsError> {
        if let Some((_, delay)) = self.delays.iter().find(|(text, _)| *text == request.text) {
            tokio::time::sleep(*delay).await;
        }
        Ok(request.text.into_bytes())
    }
}

pub fn speech_with(tts: Arc<dyn TtsEnginePort>) -> Arc<SpeechService> {
    Arc::new(SpeechService::new(
        tts,
        Arc::new(EchoTranslator),
        Arc::new(InMemoryResultCache::new(50)),
    ))
}
