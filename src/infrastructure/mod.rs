//! Infrastructure Layer - 基础设施层
//!
//! 提供所有端口的具体实现

pub mod adapters;
pub mod bus;
pub mod events;
pub mod http;
pub mod memory;
pub mod persistence;
pub mod worker;

pub use bus::ChannelBus;
pub use events::EventPublisher;
pub use memory::InMemoryResultCache;
pub use persistence::sled::SledSettingsStore;
pub use worker::{ReaderAgent, ReaderAgentConfig};
