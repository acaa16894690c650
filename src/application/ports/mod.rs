//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_output;
mod background_channel;
mod overlay;
mod reader_channel;
mod result_cache;
mod settings_store;
mod translator;
mod tts_engine;

pub use audio_output::{AudioOutputPort, ClipId, PlaybackEnd, PlaybackError};
pub use background_channel::BackgroundChannelPort;
pub use overlay::OverlayPort;
pub use reader_channel::{DeliveryError, ReaderChannelPort};
pub use result_cache::{CacheStats, CachedResult, ResultCachePort};
pub use settings_store::{SettingsStorePort, StoreError};
pub use translator::{TranslationError, TranslatorPort};
pub use tts_engine::{SynthesisRequest, TtsEnginePort, TtsError};
