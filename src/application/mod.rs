//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（TtsEngine、Translator、ResultCache、ReaderChannel 等）
//! - messages: 跨上下文消息协议
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - services: 语音解析、投递重试、顺序播放、后台入口
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod messages;
pub mod ports;
pub mod queries;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;

pub use commands::{
    handlers::{
        ProcessSelectionChangeHandler, SpeakSelectedHandler, SpeakTextHandler,
        StopSpeakingHandler, UpdateSettingsHandler, NO_SELECTION_MESSAGE,
    },
    ProcessSelectionChange, SpeakSelected, SpeakText, StopSpeaking, UpdateSettings,
};

pub use error::ApplicationError;

pub use messages::{Message, Reply, ReplyPayload, SpeakOptions, Target, AUDIO_MPEG};

pub use ports::{
    AudioOutputPort, BackgroundChannelPort, CacheStats, CachedResult, ClipId, DeliveryError,
    OverlayPort, PlaybackEnd, PlaybackError, ReaderChannelPort, ResultCachePort,
    SettingsStorePort, StoreError, SynthesisRequest, TranslationError, TranslatorPort,
    TtsEnginePort, TtsError,
};

pub use queries::{
    handlers::{GetSettingsHandler, ListVoicesHandler},
    GetSettings, ListVoices,
};

pub use services::{BackgroundService, PlaybackSequencer, ReaderLink, RetryPolicy, SpeechService};
