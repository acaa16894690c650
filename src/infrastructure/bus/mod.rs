//! Bus - 上下文之间的消息通道

mod channel_bus;

pub use channel_bus::{ChannelBus, ReaderLauncher};
