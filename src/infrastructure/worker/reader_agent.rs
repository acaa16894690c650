//! Reader Agent - 阅读器上下文
//!
//! 独立的 tokio 任务，通过 mpsc 收件箱接收消息与选区观测：
//! - 处理 PING / PLAY_* / STOP_AUDIO / GET_* / 设置更新 / 浮层消息
//! - 选区在静默 debounce 时间后才进入门控与差分，结果发往后台

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::application::messages::{Message, Reply, ReplyPayload};
use crate::application::ports::{BackgroundChannelPort, OverlayPort, SettingsStorePort};
use crate::application::services::PlaybackSequencer;
use crate::domain::{
    all_voices, ReaderSettings, SelectionChange, SelectionGate, SelectionState,
    DEFAULT_MAX_SELECTION_CHARS,
};

/// 一次请求及其回复通道（最多回复一次）
#[derive(Debug)]
pub struct Envelope {
    pub message: Message,
    pub reply: oneshot::Sender<Reply>,
}

/// 阅读器收件箱的输入
#[derive(Debug)]
pub enum ReaderInput {
    Request(Envelope),
    /// 页面上观测到的选区
    SelectionObserved(String),
}

/// 阅读器配置
#[derive(Debug, Clone)]
pub struct ReaderAgentConfig {
    /// 选区静默多久后才处理
    pub debounce: Duration,
    pub max_selection_chars: usize,
}

impl Default for ReaderAgentConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(250),
            max_selection_chars: DEFAULT_MAX_SELECTION_CHARS,
        }
    }
}

/// 阅读器
pub struct ReaderAgent {
    config: ReaderAgentConfig,
    inbox: mpsc::Receiver<ReaderInput>,
    background: Arc<dyn BackgroundChannelPort>,
    sequencer: Arc<PlaybackSequencer>,
    overlay: Arc<dyn OverlayPort>,
    settings_store: Arc<dyn SettingsStorePort>,
    settings: ReaderSettings,
    gate: SelectionGate,
    selection: SelectionState,
    /// 页面当前选区
    current_selection: String,
    /// 等待静默的选区及其截止时间
    pending: Option<(String, Instant)>,
}

impl ReaderAgent {
    pub fn new(
        config: ReaderAgentConfig,
        inbox: mpsc::Receiver<ReaderInput>,
        background: Arc<dyn BackgroundChannelPort>,
        sequencer: Arc<PlaybackSequencer>,
        overlay: Arc<dyn OverlayPort>,
        settings_store: Arc<dyn SettingsStorePort>,
    ) -> Self {
        let settings = settings_store.load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load reader settings, using defaults");
            ReaderSettings::default()
        });

        Self {
            gate: SelectionGate::new(config.max_selection_chars),
            config,
            inbox,
            background,
            sequencer,
            overlay,
            settings_store,
            settings,
            selection: SelectionState::new(),
            current_selection: String::new(),
            pending: None,
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// 运行直到收件箱关闭
    pub async fn run(mut self) {
        tracing::info!(
            auto_read = self.settings.auto_read,
            debounce_ms = self.config.debounce.as_millis() as u64,
            "Reader agent started"
        );

        loop {
            let deadline = self.pending.as_ref().map(|(_, at)| *at);

            tokio::select! {
                input = self.inbox.recv() => match input {
                    Some(input) => self.handle_input(input).await,
                    None => break,
                },
                _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if let Some((text, _)) = self.pending.take() {
                        self.on_selection_settled(text);
                    }
                }
            }
        }

        tracing::info!("Reader agent stopped");
    }

    async fn handle_input(&mut self, input: ReaderInput) {
        match input {
            ReaderInput::Request(envelope) => {
                let kind = envelope.message.kind();
                let reply = self.handle_message(envelope.message).await;
                if envelope.reply.send(reply).is_err() {
                    tracing::debug!(message = kind, "Requester went away before reply");
                }
            }
            ReaderInput::SelectionObserved(text) => self.on_selection_observed(text),
        }
    }

    async fn handle_message(&mut self, message: Message) -> Reply {
        match message {
            Message::Ping => Reply::ready(),
            Message::PlayAudio { audio_data, .. } => {
                self.play(&audio_data, &audio_data, true).await
            }
            Message::PlayDifferenceAndFull {
                delta_audio,
                full_audio,
                same_content,
            } => self.play(&delta_audio, &full_audio, same_content).await,
            Message::StopAudio => {
                self.sequencer.stop().await;
                Reply::ok()
            }
            Message::GetSelection => Reply::with_payload(ReplyPayload::Selection {
                text: self.current_selection.clone(),
            }),
            Message::GetVoices => Reply::with_payload(ReplyPayload::Voices {
                voices: all_voices().to_vec(),
            }),
            Message::UpdateAutoReadSettings { settings } => {
                if !settings.auto_read {
                    self.pending = None;
                }
                tracing::info!(auto_read = settings.auto_read, "Reader settings updated");
                self.settings = settings;
                Reply::ok()
            }
            Message::ShowTranslationOverlay {
                original,
                translation,
            } => {
                self.overlay.show(&original, &translation);
                Reply::ok()
            }
            other => Reply::failure(format!("{} is not handled by the reader", other.kind())),
        }
    }

    async fn play(&self, delta: &[u8], full: &[u8], same_content: bool) -> Reply {
        match self.sequencer.play_sequence(delta, full, same_content).await {
            Ok(()) => Reply::ok(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to start playback");
                Reply::failure(e.to_string())
            }
        }
    }

    fn on_selection_observed(&mut self, text: String) {
        let text = text.trim().to_string();

        if !text.is_empty() {
            if let Err(e) = self.settings_store.set_last_selected_text(&text) {
                tracing::warn!(error = %e, "Failed to store selected text");
            }
        }
        self.current_selection = text.clone();

        if self.settings.auto_read {
            self.pending = Some((text, Instant::now() + self.config.debounce));
        }
    }

    /// 选区静默后：门控 → 差分 → 交给后台
    fn on_selection_settled(&mut self, text: String) {
        if !self.gate.admits(&text) {
            tracing::debug!(text_len = text.chars().count(), "Selection ignored by gate");
            return;
        }

        let change = self.selection.advance(&text);
        if text.is_empty() {
            self.overlay.dismiss();
        }

        let (delta_text, full_text, shrink) = match change {
            SelectionChange::Unchanged => return,
            SelectionChange::Shrink { removed } => (removed.clone(), removed, true),
            SelectionChange::ExtendOrNew { delta, full } => (delta, full, false),
        };

        let message = Message::ProcessSelectionChange {
            language: self.settings.language_detection.resolve(&full_text),
            voice: self.settings.preferred_voice().map(str::to_string),
            speed: self.settings.speed,
            delta_text,
            full_text,
            shrink,
        };

        // 后台处理期间会回头向阅读器投递播放消息，不能在事件循环里等待
        let background = self.background.clone();
        tokio::spawn(async move {
            let reply = background.send(message).await;
            if !reply.success {
                tracing::warn!(error = ?reply.error, "Selection processing failed");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{AudioOutputPort, ClipId, PlaybackEnd, PlaybackError};
    use crate::application::testing::MemoryStore;
    use crate::domain::{Language, SpeedSetting};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Mutex;
    use tokio_util::sync::CancellationToken;

    #[derive(Default)]
    struct RecordingBackground {
        received: Mutex<Vec<Message>>,
    }

    #[async_trait]
    impl BackgroundChannelPort for RecordingBackground {
        async fn send(&self, message: Message) -> Reply {
            self.received.lock().unwrap().push(message);
            Reply::ok()
        }
    }

    #[derive(Default)]
    struct RecordingOverlay {
        events: Mutex<Vec<String>>,
    }

    impl OverlayPort for RecordingOverlay {
        fn show(&self, original: &str, translation: &str) {
            self.events
                .lock()
                .unwrap()
                .push(format!("show:{}:{}", original, translation));
        }

        fn dismiss(&self) {
            self.events.lock().unwrap().push("dismiss".to_string());
        }
    }

    #[derive(Default)]
    struct InstantOutput {
        prepared: AtomicU64,
    }

    #[async_trait]
    impl AudioOutputPort for InstantOutput {
        async fn prepare(&self, audio: &[u8], _mime_type: &str) -> Result<ClipId, PlaybackError> {
            if audio.is_empty() {
                return Err(PlaybackError::EmptyAudio);
            }
            Ok(ClipId(self.prepared.fetch_add(1, Ordering::SeqCst)))
        }

        async fn play(
            &self,
            _clip: ClipId,
            _rate: f32,
            _cancel: CancellationToken,
        ) -> Result<PlaybackEnd, PlaybackError> {
            Ok(PlaybackEnd::Completed)
        }

        async fn release(&self, _clip: ClipId) {}
    }

    struct Harness {
        tx: mpsc::Sender<ReaderInput>,
        background: Arc<RecordingBackground>,
        overlay: Arc<RecordingOverlay>,
        output: Arc<InstantOutput>,
        store: Arc<MemoryStore>,
    }

    const DEBOUNCE: Duration = Duration::from_millis(20);
    const SETTLE: Duration = Duration::from_millis(120);

    fn start(auto_read: bool) -> Harness {
        let (tx, rx) = mpsc::channel(16);
        let background = Arc::new(RecordingBackground::default());
        let overlay = Arc::new(RecordingOverlay::default());
        let output = Arc::new(InstantOutput::default());
        let store = Arc::new(MemoryStore::with_settings(ReaderSettings {
            auto_read,
            speed: SpeedSetting::Slow,
            ..ReaderSettings::default()
        }));

        ReaderAgent::new(
            ReaderAgentConfig {
                debounce: DEBOUNCE,
                max_selection_chars: 10,
            },
            rx,
            background.clone(),
            Arc::new(PlaybackSequencer::new(output.clone(), 0.75)),
            overlay.clone(),
            store.clone(),
        )
        .spawn();

        Harness {
            tx,
            background,
            overlay,
            output,
            store,
        }
    }

    impl Harness {
        async fn request(&self, message: Message) -> Reply {
            let (reply_tx, reply_rx) = oneshot::channel();
            self.tx
                .send(ReaderInput::Request(Envelope {
                    message,
                    reply: reply_tx,
                }))
                .await
                .unwrap();
            reply_rx.await.unwrap()
        }

        async fn select(&self, text: &str) {
            self.tx
                .send(ReaderInput::SelectionObserved(text.to_string()))
                .await
                .unwrap();
        }

        fn background_messages(&self) -> Vec<Message> {
            self.background.received.lock().unwrap().clone()
        }
    }

    fn change(delta: &str, full: &str, shrink: bool) -> Message {
        Message::ProcessSelectionChange {
            delta_text: delta.to_string(),
            full_text: full.to_string(),
            shrink,
            language: Language::Zh,
            voice: None,
            speed: SpeedSetting::Slow,
        }
    }

    #[tokio::test]
    async fn test_ping_replies_ready() {
        let h = start(false);
        let reply = h.request(Message::Ping).await;
        assert!(reply.success);
        assert!(matches!(reply.payload, Some(ReplyPayload::Ready { ready: true })));
    }

    #[tokio::test]
    async fn test_selection_is_recorded_without_auto_read() {
        let h = start(false);

        h.select("  你好  ").await;
        let reply = h.request(Message::GetSelection).await;
        tokio::time::sleep(SETTLE).await;

        assert_eq!(reply.selection_text(), Some("你好"));
        assert_eq!(h.store.last_selected_text().unwrap().as_deref(), Some("你好"));
        assert!(h.background_messages().is_empty());
    }

    #[tokio::test]
    async fn test_rapid_selections_are_debounced() {
        let h = start(true);

        h.select("你").await;
        h.select("你好").await;
        tokio::time::sleep(SETTLE).await;

        assert_eq!(h.background_messages(), vec![change("你好", "你好", false)]);
    }

    #[tokio::test]
    async fn test_extension_sends_delta_then_shrink_sends_removed() {
        let h = start(true);

        h.select("你好").await;
        tokio::time::sleep(SETTLE).await;
        h.select("你好世界").await;
        tokio::time::sleep(SETTLE).await;
        h.select("你好").await;
        tokio::time::sleep(SETTLE).await;

        assert_eq!(
            h.background_messages(),
            vec![
                change("你好", "你好", false),
                change("世界", "你好世界", false),
                change("世界", "世界", true),
            ]
        );
    }

    #[tokio::test]
    async fn test_gate_ignores_english_and_long_selections() {
        let h = start(true);

        h.select("hello world").await;
        tokio::time::sleep(SETTLE).await;
        h.select("这是一段超过十个字符长度的中文选区").await;
        tokio::time::sleep(SETTLE).await;

        assert!(h.background_messages().is_empty());
    }

    #[tokio::test]
    async fn test_empty_selection_dismisses_overlay() {
        let h = start(true);

        h.select("你好").await;
        tokio::time::sleep(SETTLE).await;
        h.select("").await;
        tokio::time::sleep(SETTLE).await;

        assert_eq!(*h.overlay.events.lock().unwrap(), vec!["dismiss".to_string()]);
        assert_eq!(h.background_messages().len(), 1);
    }

    #[tokio::test]
    async fn test_auto_read_toggle() {
        let h = start(false);

        let reply = h
            .request(Message::UpdateAutoReadSettings {
                settings: ReaderSettings {
                    auto_read: true,
                    speed: SpeedSetting::Slow,
                    ..ReaderSettings::default()
                },
            })
            .await;
        assert!(reply.success);

        h.select("你好").await;
        tokio::time::sleep(SETTLE).await;

        assert_eq!(h.background_messages(), vec![change("你好", "你好", false)]);
    }

    #[tokio::test]
    async fn test_show_overlay() {
        let h = start(false);

        h.request(Message::ShowTranslationOverlay {
            original: "你好".to_string(),
            translation: "Hello".to_string(),
        })
        .await;

        assert_eq!(
            *h.overlay.events.lock().unwrap(),
            vec!["show:你好:Hello".to_string()]
        );
    }

    #[tokio::test]
    async fn test_play_messages_use_sequencer() {
        let h = start(false);

        let reply = h
            .request(Message::PlayDifferenceAndFull {
                delta_audio: vec![1],
                full_audio: vec![2],
                same_content: false,
            })
            .await;
        assert!(reply.success);
        assert_eq!(h.output.prepared.load(Ordering::SeqCst), 2);

        let reply = h
            .request(Message::PlayAudio {
                audio_data: vec![],
                mime_type: "audio/mpeg".to_string(),
            })
            .await;
        assert!(!reply.success);

        assert!(h.request(Message::StopAudio).await.success);
    }

    #[tokio::test]
    async fn test_background_messages_are_rejected() {
        let h = start(false);
        let reply = h.request(Message::StopSpeaking).await;
        assert!(!reply.success);
    }

    #[tokio::test]
    async fn test_get_voices() {
        let h = start(false);
        let reply = h.request(Message::GetVoices).await;
        match reply.payload {
            Some(ReplyPayload::Voices { voices }) => assert_eq!(voices.len(), all_voices().len()),
            other => panic!("unexpected payload: {:?}", other),
        }
    }
}
