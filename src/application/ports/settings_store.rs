//! Settings Store Port - 设置持久化

use thiserror::Error;

use crate::domain::ReaderSettings;

/// 存储错误
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Settings Store Port
///
/// 进程级键值存储，跨上下文共享
pub trait SettingsStorePort: Send + Sync {
    /// 读取设置，缺失时返回默认值
    fn load(&self) -> Result<ReaderSettings, StoreError>;

    /// 保存设置
    fn save(&self, settings: &ReaderSettings) -> Result<(), StoreError>;

    /// 最近一次选中的文本
    fn last_selected_text(&self) -> Result<Option<String>, StoreError>;

    /// 记录最近一次选中的文本
    fn set_last_selected_text(&self, text: &str) -> Result<(), StoreError>;
}
