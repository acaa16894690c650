//! TTS Adapter - 语音合成客户端实现

mod cartesia_tts_client;
mod fake_tts_client;

pub use cartesia_tts_client::{CartesiaTtsClient, CartesiaTtsClientConfig};
pub use fake_tts_client::FakeTtsClient;
