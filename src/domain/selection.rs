//! 选区差分
//!
//! 比较前后两次选区，计算需要朗读的增量文本，并判断本次变化是"收缩"还是"扩展/新选区"。

use super::language::is_cjk_ideograph;

/// 默认最大选区长度（字符数），超出则忽略
pub const DEFAULT_MAX_SELECTION_CHARS: usize = 100;

/// 计算需要朗读的增量文本
///
/// 规则（按优先级）：
/// 1. 新选区为空 → 空串
/// 2. 旧选区为空 → 新选区原文
/// 3. 向后扩展（新选区以旧选区开头）→ 追加的后缀
/// 4. 向前扩展（新选区以旧选区结尾）→ 前置的前缀
/// 5. 从尾部收缩 → 被移除的尾部（去除首尾空白）
/// 6. 从头部收缩 → 被移除的头部（去除首尾空白）
/// 7. 其他（无关的新选区）→ 新选区原文
///
/// 前后选区完全相同视为零长度扩展，返回空串。
pub fn diff_selection(old: &str, new: &str) -> String {
    if new.trim().is_empty() {
        return String::new();
    }
    if old.trim().is_empty() {
        return new.to_string();
    }
    if new == old {
        return String::new();
    }

    if new.len() > old.len() {
        if let Some(suffix) = new.strip_prefix(old) {
            return suffix.to_string();
        }
        if let Some(prefix) = new.strip_suffix(old) {
            return prefix.to_string();
        }
    } else if new.len() < old.len() {
        if let Some(removed) = old.strip_prefix(new) {
            return removed.trim().to_string();
        }
        if let Some(removed) = old.strip_suffix(new) {
            return removed.trim().to_string();
        }
    }

    new.to_string()
}

/// 选区变化分类
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionChange {
    /// 没有需要朗读的内容
    Unchanged,
    /// 收缩：只朗读被移除的片段，同时作为翻译目标
    Shrink { removed: String },
    /// 扩展或新选区：先读增量，再读完整选区（若不同），翻译完整选区
    ExtendOrNew { delta: String, full: String },
}

impl SelectionChange {
    /// 需要合成的增量文本
    pub fn delta_text(&self) -> Option<&str> {
        match self {
            Self::Unchanged => None,
            Self::Shrink { removed } => Some(removed),
            Self::ExtendOrNew { delta, .. } => Some(delta),
        }
    }

    /// 需要合成的完整文本
    pub fn full_text(&self) -> Option<&str> {
        match self {
            Self::Unchanged => None,
            Self::Shrink { removed } => Some(removed),
            Self::ExtendOrNew { full, .. } => Some(full),
        }
    }

    /// 翻译目标文本
    pub fn translation_target(&self) -> Option<&str> {
        self.full_text()
    }

    pub fn is_shrink(&self) -> bool {
        matches!(self, Self::Shrink { .. })
    }
}

/// 根据 diff 结果对选区变化分类
///
/// 当 `to_speak` 非空、不等于新选区，且新选区为空或不包含 `to_speak.trim()` 时判定为收缩。
pub fn classify_change(new: &str, to_speak: &str) -> SelectionChange {
    if to_speak.trim().is_empty() {
        return SelectionChange::Unchanged;
    }

    let is_shrink = to_speak != new && (new.is_empty() || !new.contains(to_speak.trim()));
    if is_shrink {
        SelectionChange::Shrink {
            removed: to_speak.to_string(),
        }
    } else {
        SelectionChange::ExtendOrNew {
            delta: to_speak.to_string(),
            full: new.to_string(),
        }
    }
}

/// 选区门控：限制调用成本，只处理以中文开头的选区
#[derive(Debug, Clone, Copy)]
pub struct SelectionGate {
    max_chars: usize,
}

impl SelectionGate {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }

    /// 选区是否允许进入差分流程
    pub fn admits(&self, text: &str) -> bool {
        if text.chars().count() > self.max_chars {
            return false;
        }
        match text.chars().next() {
            Some(first) => is_cjk_ideograph(first),
            None => true,
        }
    }
}

impl Default for SelectionGate {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SELECTION_CHARS)
    }
}

/// 选区状态
///
/// 记录最近一次完成处理的选区，只在差分决策完成后更新
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    last_processed: String,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_processed(&self) -> &str {
        &self.last_processed
    }

    /// 计算相对上次选区的变化，并记录新选区
    pub fn advance(&mut self, new: &str) -> SelectionChange {
        let to_speak = diff_selection(&self.last_processed, new);
        let change = classify_change(new, &to_speak);
        self.last_processed = new.to_string();
        change
    }
}
