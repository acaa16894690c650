//! 朗读设置

use serde::{Deserialize, Serialize};

use super::language::{detect_language, Language};

/// 语速档位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedSetting {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl SpeedSetting {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Slow => "slow",
            Self::Normal => "normal",
            Self::Fast => "fast",
        }
    }
}

/// 语言检测模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageMode {
    #[default]
    Auto,
    En,
    Zh,
}

impl LanguageMode {
    /// 按模式确定文本语言，`Auto` 时自动检测
    pub fn resolve(&self, text: &str) -> Language {
        match self {
            Self::Auto => {
                let detection = detect_language(text);
                tracing::debug!(
                    language = %detection.language,
                    confidence = detection.confidence,
                    "Language detected"
                );
                detection.language
            }
            Self::En => Language::En,
            Self::Zh => Language::Zh,
        }
    }
}

/// 朗读设置
///
/// 缺失字段使用默认值，便于旧版本存储的数据平滑升级
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReaderSettings {
    pub speed: SpeedSetting,
    /// 音色 ID，空串表示按语言自动选择
    pub voice: String,
    pub auto_read: bool,
    pub language_detection: LanguageMode,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            speed: SpeedSetting::Normal,
            voice: String::new(),
            auto_read: false,
            language_detection: LanguageMode::Auto,
        }
    }
}

impl ReaderSettings {
    /// 用户指定的音色（空串视为未指定）
    pub fn preferred_voice(&self) -> Option<&str> {
        let voice = self.voice.trim();
        (!voice.is_empty()).then_some(voice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ReaderSettings::default();
        assert_eq!(settings.speed, SpeedSetting::Normal);
        assert!(!settings.auto_read);
        assert_eq!(settings.language_detection, LanguageMode::Auto);
        assert_eq!(settings.preferred_voice(), None);
    }

    #[test]
    fn test_partial_json_merges_with_defaults() {
        let settings: ReaderSettings = serde_json::from_str(r#"{"autoRead":true}"#).unwrap();
        assert!(settings.auto_read);
        assert_eq!(settings.speed, SpeedSetting::Normal);
        assert_eq!(settings.language_detection, LanguageMode::Auto);
    }

    #[test]
    fn test_wire_names() {
        let settings = ReaderSettings {
            speed: SpeedSetting::Slow,
            voice: "abc".to_string(),
            auto_read: true,
            language_detection: LanguageMode::Zh,
        };
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["speed"], "slow");
        assert_eq!(json["autoRead"], true);
        assert_eq!(json["languageDetection"], "zh");
    }

    #[test]
    fn test_language_mode_resolve() {
        assert_eq!(LanguageMode::Auto.resolve("你好世界"), Language::Zh);
        assert_eq!(LanguageMode::Auto.resolve("hello"), Language::En);
        assert_eq!(LanguageMode::En.resolve("你好世界"), Language::En);
        assert_eq!(LanguageMode::Zh.resolve("hello"), Language::Zh);
    }
}
