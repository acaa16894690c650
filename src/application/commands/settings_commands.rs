//! Settings Commands

use crate::domain::ReaderSettings;

/// 保存朗读设置
#[derive(Debug, Clone)]
pub struct UpdateSettings {
    pub settings: ReaderSettings,
}
