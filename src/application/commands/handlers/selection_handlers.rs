//! Selection Command Handlers

use std::sync::Arc;

use crate::application::commands::ProcessSelectionChange;
use crate::application::error::ApplicationError;
use crate::application::messages::Message;
use crate::application::ports::SynthesisRequest;
use crate::application::services::{ReaderLink, SpeechService};
use crate::domain::{resolve_voice_id, Language};

/// ProcessSelectionChange Handler
///
/// 合成增量与完整选区音频，中文选区附带英文翻译，交给阅读器按顺序播放并显示浮层
pub struct ProcessSelectionChangeHandler {
    speech: Arc<SpeechService>,
    reader: Arc<ReaderLink>,
}

impl ProcessSelectionChangeHandler {
    pub fn new(speech: Arc<SpeechService>, reader: Arc<ReaderLink>) -> Self {
        Self { speech, reader }
    }

    pub async fn handle(&self, command: ProcessSelectionChange) -> Result<(), ApplicationError> {
        if command.delta_text.trim().is_empty() {
            tracing::debug!("Empty selection delta, nothing to speak");
            return Ok(());
        }

        let generation = self.reader.begin_playback();
        let same_content = command.same_content();
        let voice_id = resolve_voice_id(command.voice.as_deref(), command.language);
        let request_for = |text: &str| SynthesisRequest {
            text: text.to_string(),
            voice_id: Some(voice_id.clone()),
            speed: command.speed,
            language: command.language,
        };

        tracing::info!(
            delta_len = command.delta_text.len(),
            full_len = command.full_text.len(),
            shrink = command.shrink,
            same_content,
            "Processing selection change"
        );

        let audio = async {
            if same_content {
                let audio = self.speech.audio_for(request_for(&command.delta_text)).await?;
                Ok::<_, ApplicationError>((audio.clone(), audio))
            } else {
                let (delta, full) = tokio::join!(
                    self.speech.audio_for(request_for(&command.delta_text)),
                    self.speech.audio_for(request_for(&command.full_text)),
                );
                Ok::<_, ApplicationError>((delta?, full?))
            }
        };
        let translation = async {
            if command.language == Language::Zh {
                Some(
                    self.speech
                        .translation_for(&command.full_text, Language::Zh, Language::En)
                        .await,
                )
            } else {
                None
            }
        };

        let (audio, translation) = tokio::join!(audio, translation);
        let (delta_audio, full_audio) = audio?;

        // 等待合成期间出现了 STOP 或更新的选区：播放和浮层都不再投递
        if !self.reader.is_current(generation) {
            tracing::info!(generation, "Selection change superseded, discarding results");
            return Ok(());
        }

        let played = self
            .reader
            .deliver(Message::PlayDifferenceAndFull {
                delta_audio: delta_audio.to_vec(),
                full_audio: full_audio.to_vec(),
                same_content,
            })
            .await;

        if let Some(translation) = translation {
            let overlay = Message::ShowTranslationOverlay {
                original: command.full_text.clone(),
                translation,
            };
            if let Err(e) = self.reader.deliver(overlay).await {
                tracing::warn!(error = %e, "Failed to show translation overlay");
            }
        }

        let reply = played?;
        if !reply.success {
            return Err(ApplicationError::PlaybackError(
                reply.error.unwrap_or_else(|| "Playback failed".to_string()),
            ));
        }
        Ok(())
    }
}
