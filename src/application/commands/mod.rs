//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：朗读、选区处理、设置更新

mod selection_commands;
mod settings_commands;
mod speech_commands;

pub mod handlers;

pub use selection_commands::*;
pub use settings_commands::*;
pub use speech_commands::*;
