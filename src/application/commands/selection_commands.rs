//! Selection Commands

use crate::domain::{Language, SpeedSetting};

/// 处理一次已完成差分的选区变化
#[derive(Debug, Clone)]
pub struct ProcessSelectionChange {
    /// 先朗读的文本（收缩时为被移除的片段）
    pub delta_text: String,
    /// 随后朗读的完整选区，同时作为翻译目标
    pub full_text: String,
    pub shrink: bool,
    pub language: Language,
    pub voice: Option<String>,
    pub speed: SpeedSetting,
}

impl ProcessSelectionChange {
    /// 只需合成一次
    pub fn same_content(&self) -> bool {
        self.shrink || self.delta_text == self.full_text
    }
}
