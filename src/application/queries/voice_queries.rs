//! Voice Queries

use crate::domain::Language;

/// 列出可选音色
#[derive(Debug, Clone, Default)]
pub struct ListVoices {
    /// 只列出该语言的音色
    pub language: Option<Language>,
}
