//! Memory Layer - 内存存储实现

mod result_cache;

pub use result_cache::{InMemoryResultCache, DEFAULT_CACHE_CAPACITY};
