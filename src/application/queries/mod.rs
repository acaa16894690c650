//! 应用层 - 查询（读操作）
//!
//! CQRS 查询侧：音色目录、朗读设置

mod settings_queries;
mod voice_queries;

pub mod handlers;

pub use settings_queries::*;
pub use voice_queries::*;
