//! Settings Queries

/// 读取朗读设置
#[derive(Debug, Clone, Default)]
pub struct GetSettings;
