//! 语言检测
//!
//! 基于字符类别比例判断文本主要是英文还是中文

use serde::{Deserialize, Serialize};

/// 中文判定阈值（中文字符占比）
const ZH_RATIO_THRESHOLD: f64 = 0.3;

/// 英文判定阈值（拉丁字母占比）
const EN_RATIO_THRESHOLD: f64 = 0.7;

/// 置信度上限
const MAX_CONFIDENCE: f64 = 0.9;

/// 混合文本的固定置信度
const MIXED_CONFIDENCE: f64 = 0.6;

/// 没有有效字符时的置信度
const NO_SIGNAL_CONFIDENCE: f64 = 0.1;

/// 支持的语言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Zh,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Zh => "zh",
        }
    }

    /// 显示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Zh => "中文",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 检测结果
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Detection {
    pub language: Language,
    /// 置信度，范围 [0, 1]
    pub confidence: f64,
}

impl Detection {
    fn new(language: Language, confidence: f64) -> Self {
        Self {
            language,
            confidence,
        }
    }
}

/// 是否为 CJK 统一表意文字（U+4E00..=U+9FFF）
#[inline]
pub fn is_cjk_ideograph(ch: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&ch)
}

/// 检测文本语言
///
/// 只统计中文表意文字和拉丁字母，空白与标点不计入分母。
pub fn detect_language(text: &str) -> Detection {
    let text = text.trim();
    if text.is_empty() {
        return Detection::new(Language::En, 0.0);
    }

    let mut zh_count = 0usize;
    let mut en_count = 0usize;
    for ch in text.chars() {
        if is_cjk_ideograph(ch) {
            zh_count += 1;
        } else if ch.is_ascii_alphabetic() {
            en_count += 1;
        }
    }

    let meaningful = zh_count + en_count;
    if meaningful == 0 {
        return Detection::new(Language::En, NO_SIGNAL_CONFIDENCE);
    }

    let zh_ratio = zh_count as f64 / meaningful as f64;
    let en_ratio = en_count as f64 / meaningful as f64;

    if zh_ratio > ZH_RATIO_THRESHOLD {
        return Detection::new(Language::Zh, MAX_CONFIDENCE.min(0.5 + zh_ratio));
    }

    if en_ratio > EN_RATIO_THRESHOLD {
        return Detection::new(Language::En, MAX_CONFIDENCE.min(0.5 + en_ratio));
    }

    // 混合内容：取数量占优的语言，平局偏向英文
    if zh_count > en_count {
        Detection::new(Language::Zh, MIXED_CONFIDENCE)
    } else {
        Detection::new(Language::En, MIXED_CONFIDENCE)
    }
}
