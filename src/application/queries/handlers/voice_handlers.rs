//! Voice Query Handlers

use crate::application::queries::ListVoices;
use crate::domain::{all_voices, VoiceInfo};

/// ListVoices Handler
#[derive(Debug, Clone, Default)]
pub struct ListVoicesHandler;

impl ListVoicesHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(&self, query: ListVoices) -> Vec<VoiceInfo> {
        all_voices()
            .iter()
            .filter(|voice| query.language.map_or(true, |lang| voice.language == lang))
            .cloned()
            .collect()
    }
}
