//! Speech Commands

use crate::application::messages::SpeakOptions;

/// 朗读一段文本
#[derive(Debug, Clone)]
pub struct SpeakText {
    pub text: String,
    pub options: SpeakOptions,
}

/// 朗读页面上当前（或最近）选中的文本
#[derive(Debug, Clone, Default)]
pub struct SpeakSelected;

/// 停止朗读
#[derive(Debug, Clone, Default)]
pub struct StopSpeaking;
