//! Overlay Port - 页面翻译浮层

/// Overlay Port
pub trait OverlayPort: Send + Sync {
    /// 显示翻译浮层
    fn show(&self, original: &str, translation: &str);

    /// 关闭浮层
    fn dismiss(&self);
}
