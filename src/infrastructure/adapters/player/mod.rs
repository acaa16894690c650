//! Player Adapter - 音频播放实现

mod process_audio_output;

pub use process_audio_output::{ProcessAudioOutput, ProcessAudioOutputConfig};
