//! 后台服务
//!
//! 后台上下文的消息入口：后台消息交给对应处理器，阅读器消息经 [`ReaderLink`] 投递。

use std::sync::{Arc, Weak};

use async_trait::async_trait;

use crate::application::commands::handlers::{
    ProcessSelectionChangeHandler, SpeakSelectedHandler, SpeakTextHandler, StopSpeakingHandler,
    UpdateSettingsHandler,
};
use crate::application::commands::{
    ProcessSelectionChange, SpeakSelected, SpeakText, StopSpeaking, UpdateSettings,
};
use crate::application::error::ApplicationError;
use crate::application::messages::{Message, Reply, ReplyPayload, Target};
use crate::application::ports::{BackgroundChannelPort, SettingsStorePort};
use crate::application::queries::handlers::{GetSettingsHandler, ListVoicesHandler};
use crate::application::queries::{GetSettings, ListVoices};
use crate::application::services::{ReaderLink, SpeechService};
use crate::domain::{ReaderSettings, VoiceInfo};

/// 后台服务
pub struct BackgroundService {
    reader: Arc<ReaderLink>,
    speak_text: Arc<SpeakTextHandler>,
    speak_selected: SpeakSelectedHandler,
    stop_speaking: StopSpeakingHandler,
    process_selection: ProcessSelectionChangeHandler,
    update_settings: UpdateSettingsHandler,
    get_settings: GetSettingsHandler,
    list_voices: ListVoicesHandler,
}

impl BackgroundService {
    pub fn new(
        speech: Arc<SpeechService>,
        settings_store: Arc<dyn SettingsStorePort>,
        reader: Arc<ReaderLink>,
    ) -> Self {
        let speak_text = Arc::new(SpeakTextHandler::new(
            speech.clone(),
            settings_store.clone(),
            reader.clone(),
        ));

        Self {
            speak_selected: SpeakSelectedHandler::new(
                speak_text.clone(),
                settings_store.clone(),
                reader.clone(),
            ),
            stop_speaking: StopSpeakingHandler::new(reader.clone()),
            process_selection: ProcessSelectionChangeHandler::new(speech, reader.clone()),
            update_settings: UpdateSettingsHandler::new(settings_store.clone(), reader.clone()),
            get_settings: GetSettingsHandler::new(settings_store),
            list_voices: ListVoicesHandler::new(),
            speak_text,
            reader,
        }
    }

    /// 处理一条消息，总是返回一个回复
    pub async fn dispatch(&self, message: Message) -> Reply {
        let kind = message.kind();
        tracing::debug!(message = kind, "Dispatching message");

        let result = match message.target() {
            Target::Reader => self
                .reader
                .deliver(message)
                .await
                .map_err(ApplicationError::from),
            Target::Background => self.handle_background(message).await,
        };

        result.unwrap_or_else(|e| {
            tracing::error!(message = kind, error = %e, "Message handling failed");
            Reply::failure(e.user_message())
        })
    }

    async fn handle_background(&self, message: Message) -> Result<Reply, ApplicationError> {
        match message {
            Message::SpeakText { text, options } => {
                self.speak_text.handle(SpeakText { text, options }).await?;
                Ok(Reply::ok())
            }
            Message::StopSpeaking => {
                self.stop_speaking.handle(StopSpeaking).await;
                Ok(Reply::ok())
            }
            Message::ProcessSelectionChange {
                delta_text,
                full_text,
                shrink,
                language,
                voice,
                speed,
            } => {
                self.process_selection
                    .handle(ProcessSelectionChange {
                        delta_text,
                        full_text,
                        shrink,
                        language,
                        voice,
                        speed,
                    })
                    .await?;
                Ok(Reply::ok())
            }
            Message::UpdateSettings { settings } => {
                let settings = self.update_settings.handle(UpdateSettings { settings }).await?;
                Ok(Reply::with_payload(ReplyPayload::Settings { settings }))
            }
            other => Err(ApplicationError::internal(format!(
                "{} is not handled by the background",
                other.kind()
            ))),
        }
    }

    /// 朗读选中文本，返回朗读的内容
    pub async fn speak_selected(&self) -> Result<String, ApplicationError> {
        self.speak_selected.handle(SpeakSelected).await
    }

    pub fn settings(&self) -> Result<ReaderSettings, ApplicationError> {
        self.get_settings.handle(GetSettings)
    }

    pub async fn update_settings(
        &self,
        settings: ReaderSettings,
    ) -> Result<ReaderSettings, ApplicationError> {
        self.update_settings.handle(UpdateSettings { settings }).await
    }

    pub fn voices(&self, query: ListVoices) -> Vec<VoiceInfo> {
        self.list_voices.handle(query)
    }
}

#[async_trait]
impl BackgroundChannelPort for BackgroundService {
    async fn send(&self, message: Message) -> Reply {
        self.dispatch(message).await
    }
}

/// 阅读器持有的后台弱引用，避免与后台互相持有
#[async_trait]
impl BackgroundChannelPort for Weak<BackgroundService> {
    async fn send(&self, message: Message) -> Reply {
        match self.upgrade() {
            Some(background) => background.dispatch(message).await,
            None => Reply::failure("Background service is shutting down"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{
        fast_link, speech_with, MemoryStore, RecordingChannel, ScriptedTts,
    };
    use crate::domain::{Language, SpeedSetting};
    use crate::infrastructure::adapters::FakeTtsClient;
    use std::time::Duration;

    fn scripted_service(channel: Arc<RecordingChannel>, tts: ScriptedTts) -> Arc<BackgroundService> {
        Arc::new(BackgroundService::new(
            speech_with(Arc::new(tts)),
            Arc::new(MemoryStore::default()),
            fast_link(channel),
        ))
    }

    fn selection(text: &str) -> Message {
        Message::ProcessSelectionChange {
            delta_text: text.to_string(),
            full_text: text.to_string(),
            shrink: false,
            language: Language::Zh,
            voice: None,
            speed: SpeedSetting::Normal,
        }
    }

    fn service(channel: Arc<RecordingChannel>) -> (BackgroundService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::default());
        let tts = Arc::new(FakeTtsClient::from_bytes(vec![1, 2, 3]));
        let service = BackgroundService::new(speech_with(tts), store.clone(), fast_link(channel));
        (service, store)
    }

    #[tokio::test]
    async fn test_background_message_is_handled_locally() {
        let channel = Arc::new(RecordingChannel::new());
        let (service, _) = service(channel.clone());

        let reply = service
            .dispatch(Message::SpeakText {
                text: "hello".to_string(),
                options: Default::default(),
            })
            .await;

        assert!(reply.success);
        assert_eq!(channel.kinds(), vec!["PLAY_AUDIO"]);
    }

    #[tokio::test]
    async fn test_reader_message_is_forwarded() {
        let channel = Arc::new(RecordingChannel::with_selection("你好"));
        let (service, _) = service(channel.clone());

        let reply = service.dispatch(Message::GetSelection).await;

        assert_eq!(reply.selection_text(), Some("你好"));
    }

    #[tokio::test]
    async fn test_failure_becomes_reply() {
        let channel = Arc::new(RecordingChannel::new());
        let (service, _) = service(channel);

        let reply = service
            .dispatch(Message::SpeakText {
                text: String::new(),
                options: Default::default(),
            })
            .await;

        assert!(!reply.success);
        assert_eq!(reply.error.as_deref(), Some("No text provided"));
    }

    #[tokio::test]
    async fn test_update_settings_replies_with_saved_settings() {
        let channel = Arc::new(RecordingChannel::new());
        let (service, store) = service(channel);
        let settings = ReaderSettings {
            speed: SpeedSetting::Fast,
            ..ReaderSettings::default()
        };

        let reply = service
            .dispatch(Message::UpdateSettings {
                settings: settings.clone(),
            })
            .await;

        assert!(reply.success);
        assert_eq!(store.load().unwrap(), settings);
        assert_eq!(service.settings().unwrap(), settings);
    }

    #[tokio::test]
    async fn test_weak_handle_after_drop() {
        let channel = Arc::new(RecordingChannel::new());
        let (service, _) = service(channel);
        let service = Arc::new(service);
        let weak = Arc::downgrade(&service);

        assert!(weak.send(Message::StopSpeaking).await.success);
        drop(service);
        assert!(!weak.send(Message::StopSpeaking).await.success);
    }

    #[tokio::test]
    async fn test_stop_during_synthesis_discards_audio() {
        let channel = Arc::new(RecordingChannel::new());
        let service = scripted_service(
            channel.clone(),
            ScriptedTts::default().with_delay("hello", Duration::from_millis(150)),
        );

        let speaking = tokio::spawn({
            let service = service.clone();
            async move {
                service
                    .dispatch(Message::SpeakText {
                        text: "hello".to_string(),
                        options: Default::default(),
                    })
                    .await
            }
        });
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(service.dispatch(Message::StopSpeaking).await.success);

        assert!(speaking.await.unwrap().success);
        assert_eq!(channel.kinds(), vec!["STOP_AUDIO"]);
    }

    #[tokio::test]
    async fn test_speak_after_stop_still_plays() {
        let channel = Arc::new(RecordingChannel::new());
        let service = scripted_service(channel.clone(), ScriptedTts::default());

        service.dispatch(Message::StopSpeaking).await;
        let reply = service
            .dispatch(Message::SpeakText {
                text: "hello".to_string(),
                options: Default::default(),
            })
            .await;

        assert!(reply.success);
        assert_eq!(channel.kinds(), vec!["STOP_AUDIO", "PLAY_AUDIO"]);
    }

    #[tokio::test]
    async fn test_newer_selection_supersedes_slower_older_one() {
        let channel = Arc::new(RecordingChannel::new());
        let service = scripted_service(
            channel.clone(),
            ScriptedTts::default()
                .with_delay("旧选区", Duration::from_millis(150))
                .with_delay("新选区", Duration::from_millis(10)),
        );

        let older = tokio::spawn({
            let service = service.clone();
            async move { service.dispatch(selection("旧选区")).await }
        });
        tokio::time::sleep(Duration::from_millis(5)).await;
        let newer = tokio::spawn({
            let service = service.clone();
            async move { service.dispatch(selection("新选区")).await }
        });

        assert!(newer.await.unwrap().success);
        assert!(older.await.unwrap().success);

        let received = channel.received();
        assert_eq!(
            channel.kinds(),
            vec!["PLAY_DIFFERENCE_AND_FULL", "SHOW_TRANSLATION_OVERLAY"]
        );
        match &received[0] {
            Message::PlayDifferenceAndFull { delta_audio, .. } => {
                assert_eq!(delta_audio.as_slice(), "新选区".as_bytes());
            }
            other => panic!("unexpected message: {:?}", other),
        }
        assert!(matches!(
            &received[1],
            Message::ShowTranslationOverlay { original, .. } if original == "新选区"
        ));
    }

    #[tokio::test]
    async fn test_stop_during_selection_processing_skips_overlay() {
        let channel = Arc::new(RecordingChannel::new());
        let service = scripted_service(
            channel.clone(),
            ScriptedTts::default().with_delay("你好", Duration::from_millis(150)),
        );

        let processing = tokio::spawn({
            let service = service.clone();
            async move { service.dispatch(selection("你好")).await }
        });
        tokio::time::sleep(Duration::from_millis(30)).await;
        service.dispatch(Message::StopSpeaking).await;

        assert!(processing.await.unwrap().success);
        assert_eq!(channel.kinds(), vec!["STOP_AUDIO"]);
    }

    #[test]
    fn test_voices_query() {
        let channel = Arc::new(RecordingChannel::new());
        let (service, _) = service(channel);
        let zh = service.voices(ListVoices {
            language: Some(Language::Zh),
        });
        assert!(zh.iter().all(|v| v.language == Language::Zh));
    }
}
