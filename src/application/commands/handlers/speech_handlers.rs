//! Speech Command Handlers

use std::sync::Arc;

use crate::application::commands::{SpeakSelected, SpeakText, StopSpeaking};
use crate::application::error::ApplicationError;
use crate::application::messages::{Message, AUDIO_MPEG};
use crate::application::ports::{SettingsStorePort, SynthesisRequest};
use crate::application::services::{ReaderLink, SpeechService};
use crate::domain::{resolve_voice_id, ReaderSettings};

/// 无可朗读选区时的提示
pub const NO_SELECTION_MESSAGE: &str = "Please select some text on the page first.";

// ============================================================================
// SpeakText
// ============================================================================

/// SpeakText Handler
pub struct SpeakTextHandler {
    speech: Arc<SpeechService>,
    settings_store: Arc<dyn SettingsStorePort>,
    reader: Arc<ReaderLink>,
}

impl SpeakTextHandler {
    pub fn new(
        speech: Arc<SpeechService>,
        settings_store: Arc<dyn SettingsStorePort>,
        reader: Arc<ReaderLink>,
    ) -> Self {
        Self {
            speech,
            settings_store,
            reader,
        }
    }

    pub async fn handle(&self, command: SpeakText) -> Result<(), ApplicationError> {
        if command.text.trim().is_empty() {
            return Err(ApplicationError::validation("No text provided"));
        }

        let generation = self.reader.begin_playback();
        self.speak(command, generation).await
    }

    /// 以给定代数朗读；合成期间被 STOP 或更新的请求取代时丢弃结果
    async fn speak(&self, command: SpeakText, generation: u64) -> Result<(), ApplicationError> {
        let text = command.text.trim();
        let settings = self.settings_store.load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load settings, using defaults");
            ReaderSettings::default()
        });

        let options = command.options;
        let language = options
            .language
            .unwrap_or_else(|| settings.language_detection.resolve(text));
        let voice_id = resolve_voice_id(
            options.voice.as_deref().or(settings.preferred_voice()),
            language,
        );

        let request = SynthesisRequest {
            text: text.to_string(),
            voice_id: Some(voice_id),
            speed: options.speed.unwrap_or(settings.speed),
            language,
        };
        let audio = self.speech.audio_for(request).await?;

        if !self.reader.is_current(generation) {
            tracing::info!(generation, "Speech request superseded, discarding audio");
            return Ok(());
        }

        let reply = self
            .reader
            .deliver(Message::PlayAudio {
                audio_data: audio.to_vec(),
                mime_type: AUDIO_MPEG.to_string(),
            })
            .await?;

        if !reply.success {
            return Err(ApplicationError::PlaybackError(
                reply.error.unwrap_or_else(|| "Playback failed".to_string()),
            ));
        }

        tracing::info!(text_len = text.len(), language = %language, "Text spoken");
        Ok(())
    }
}

// ============================================================================
// SpeakSelected
// ============================================================================

/// SpeakSelected Handler
///
/// 优先使用记录的最近选区，其次向阅读器查询当前选区
pub struct SpeakSelectedHandler {
    speak: Arc<SpeakTextHandler>,
    settings_store: Arc<dyn SettingsStorePort>,
    reader: Arc<ReaderLink>,
}

impl SpeakSelectedHandler {
    pub fn new(
        speak: Arc<SpeakTextHandler>,
        settings_store: Arc<dyn SettingsStorePort>,
        reader: Arc<ReaderLink>,
    ) -> Self {
        Self {
            speak,
            settings_store,
            reader,
        }
    }

    /// 返回实际朗读的文本
    pub async fn handle(&self, _command: SpeakSelected) -> Result<String, ApplicationError> {
        let generation = self.reader.begin_playback();
        let text = match self.stored_selection() {
            Some(text) => text,
            None => self.live_selection().await?,
        };

        self.speak
            .speak(
                SpeakText {
                    text: text.clone(),
                    options: Default::default(),
                },
                generation,
            )
            .await?;

        Ok(text)
    }

    fn stored_selection(&self) -> Option<String> {
        match self.settings_store.last_selected_text() {
            Ok(text) => text.filter(|t| !t.trim().is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read last selected text");
                None
            }
        }
    }

    async fn live_selection(&self) -> Result<String, ApplicationError> {
        let reply = self.reader.deliver(Message::GetSelection).await.map_err(|e| {
            tracing::warn!(error = %e, "Could not query reader selection");
            ApplicationError::validation(NO_SELECTION_MESSAGE)
        })?;

        reply
            .selection_text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ApplicationError::validation(NO_SELECTION_MESSAGE))
    }
}

// ============================================================================
// StopSpeaking
// ============================================================================

/// StopSpeaking Handler
pub struct StopSpeakingHandler {
    reader: Arc<ReaderLink>,
}

impl StopSpeakingHandler {
    pub fn new(reader: Arc<ReaderLink>) -> Self {
        Self { reader }
    }

    /// 停止总是视为成功；进行中的朗读请求同时作废
    pub async fn handle(&self, _command: StopSpeaking) {
        self.reader.invalidate_playback();
        match self.reader.deliver(Message::StopAudio).await {
            Ok(reply) if !reply.success => {
                tracing::warn!(error = ?reply.error, "Reader failed to stop audio");
            }
            Ok(_) => tracing::debug!("Playback stopped"),
            Err(e) => tracing::warn!(error = %e, "Failed to deliver stop request"),
        }
    }
}
