//! Result Cache Port - 合成与翻译结果缓存
//!
//! 以原文为 key，缓存音频和/或译文，容量固定，按 LRU 淘汰

use std::sync::Arc;

/// 缓存条目
///
/// 不变量：存在于缓存中的条目至少有一个字段非空
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CachedResult {
    pub audio: Option<Arc<Vec<u8>>>,
    pub translation: Option<String>,
}

impl CachedResult {
    pub fn with_audio(audio: Vec<u8>) -> Self {
        Self {
            audio: Some(Arc::new(audio)),
            translation: None,
        }
    }

    pub fn with_translation(translation: impl Into<String>) -> Self {
        Self {
            audio: None,
            translation: Some(translation.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.audio.is_none() && self.translation.is_none()
    }

    /// 按字段合并，`patch` 中的非空字段覆盖当前值
    pub fn merge(&mut self, patch: CachedResult) {
        if patch.audio.is_some() {
            self.audio = patch.audio;
        }
        if patch.translation.is_some() {
            self.translation = patch.translation;
        }
    }
}

/// 缓存统计信息
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub total_entries: usize,
    pub capacity: usize,
    pub hit_count: u64,
    pub miss_count: u64,
}

/// Result Cache Port
///
/// 读写都会刷新条目的最近使用时间
pub trait ResultCachePort: Send + Sync {
    /// 获取条目（LRU touch）
    fn get(&self, key: &str) -> Option<CachedResult>;

    /// 合并写入；新 key 且已满时淘汰最久未使用的条目
    fn set(&self, key: &str, patch: CachedResult);

    /// 当前条目数
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 统计信息
    fn stats(&self) -> CacheStats;
}
