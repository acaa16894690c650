//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod player;
pub mod translation;
pub mod tts;

pub use player::*;
pub use translation::*;
pub use tts::*;
