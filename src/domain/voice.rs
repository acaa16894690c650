//! 内置音色目录

use serde::Serialize;

use super::language::Language;

/// 音色信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoiceInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub language: Language,
}

const fn voice(id: &'static str, name: &'static str, language: Language) -> VoiceInfo {
    VoiceInfo { id, name, language }
}

/// 可选音色，每种语言的第一个为默认音色
pub const VOICES: &[VoiceInfo] = &[
    voice("694f9389-aac1-45b6-b726-9d9369183238", "Default Voice", Language::En),
    voice("a0e99841-438c-4a64-b679-ae501e7d6091", "British Male", Language::En),
    voice("2ee87190-8f84-4925-97da-e52547f9462c", "American Female", Language::En),
    voice("820a3788-2b37-4d21-847a-b65d8a68c99a", "Australian Male", Language::En),
    voice("87748186-23bb-4158-a1eb-332911b0b708", "中文女声", Language::Zh),
    voice("b9de4a89-2f3e-4f5c-9b8d-7c4a6b2f8e3d", "中文男声", Language::Zh),
    voice("c8ef5b9a-3f4e-5f6d-ac9e-8d5a7c3f9e4f", "台湾女声", Language::Zh),
];

pub fn all_voices() -> &'static [VoiceInfo] {
    VOICES
}

/// 语言对应的默认音色
pub fn default_voice_for(language: Language) -> &'static VoiceInfo {
    VOICES
        .iter()
        .find(|v| v.language == language)
        .unwrap_or(&VOICES[0])
}

/// 确定最终使用的音色：优先使用指定音色，否则按语言取默认
pub fn resolve_voice_id(preferred: Option<&str>, language: Language) -> String {
    match preferred {
        Some(id) if !id.trim().is_empty() => id.trim().to_string(),
        _ => default_voice_for(language).id.to_string(),
    }
}
