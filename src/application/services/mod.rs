//! 应用服务
//!
//! - speech: 缓存优先的语音/翻译解析
//! - delivery: 到阅读器的就绪检查与有限重试
//! - playback: 增量/完整音频的顺序播放
//! - background: 后台上下文消息入口

mod background;
mod delivery;
mod playback;
mod speech;

pub use background::BackgroundService;
pub use delivery::{ReaderLink, RetryPolicy};
pub use playback::{PlaybackSequencer, DEFAULT_PLAYBACK_RATE};
pub use speech::SpeechService;
