//! Command Handlers 实现

mod selection_handlers;
mod settings_handlers;
mod speech_handlers;

pub use selection_handlers::*;
pub use settings_handlers::*;
pub use speech_handlers::*;
