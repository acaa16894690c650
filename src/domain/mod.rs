//! Domain Layer - 领域层
//!
//! 纯逻辑，不依赖 I/O：
//! - language: 中英文检测
//! - selection: 选区差分与过滤
//! - settings: 朗读设置
//! - voice: 内置音色目录

mod language;
mod selection;
mod settings;
mod voice;

pub use language::{detect_language, is_cjk_ideograph, Detection, Language};
pub use selection::{
    classify_change, diff_selection, SelectionChange, SelectionGate, SelectionState,
    DEFAULT_MAX_SELECTION_CHARS,
};
pub use settings::{LanguageMode, ReaderSettings, SpeedSetting};
pub use voice::{all_voices, default_voice_for, resolve_voice_id, VoiceInfo, VOICES};
