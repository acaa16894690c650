//! Worker Layer - 阅读器上下文任务

mod reader_agent;

pub use reader_agent::{Envelope, ReaderAgent, ReaderAgentConfig, ReaderInput};
