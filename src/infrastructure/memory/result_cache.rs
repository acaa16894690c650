//! InMemoryResultCache - 有界 LRU 结果缓存
//!
//! 以原文为 key 缓存音频与译文，进程内共享，不做时间过期

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use lru::LruCache;

use crate::application::ports::{CacheStats, CachedResult, ResultCachePort};

/// 默认容量
pub const DEFAULT_CACHE_CAPACITY: usize = 50;

/// 内存 LRU 缓存
pub struct InMemoryResultCache {
    inner: Mutex<LruCache<String, CachedResult>>,
    capacity: usize,
    hit_count: AtomicU64,
    miss_count: AtomicU64,
}

impl InMemoryResultCache {
    /// 容量为 0 时按 1 处理
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
            capacity: capacity.get(),
            hit_count: AtomicU64::new(0),
            miss_count: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<String, CachedResult>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for InMemoryResultCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl ResultCachePort for InMemoryResultCache {
    fn get(&self, key: &str) -> Option<CachedResult> {
        let entry = self.lock().get(key).cloned();
        if entry.is_some() {
            self.hit_count.fetch_add(1, Ordering::Relaxed);
        } else {
            self.miss_count.fetch_add(1, Ordering::Relaxed);
        }
        entry
    }

    fn set(&self, key: &str, patch: CachedResult) {
        if patch.is_empty() {
            return;
        }

        let mut cache = self.lock();
        if let Some(entry) = cache.get_mut(key) {
            entry.merge(patch);
            return;
        }

        if let Some((evicted, _)) = cache.push(key.to_string(), patch) {
            tracing::debug!(
                evicted_len = evicted.len(),
                size = cache.len(),
                "Cache full, evicted least recently used entry"
            );
        }
    }

    fn len(&self) -> usize {
        self.lock().len()
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            total_entries: self.len(),
            capacity: self.capacity,
            hit_count: self.hit_count.load(Ordering::Relaxed),
            miss_count: self.miss_count.load(Ordering::Relaxed),
        }
    }
}
