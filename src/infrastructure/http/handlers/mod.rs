//! HTTP Handlers

mod message;
mod ping;
mod selection;
mod settings;
mod voice;
mod websocket;

pub use message::*;
pub use ping::*;
pub use selection::*;
pub use settings::*;
pub use voice::*;
pub use websocket::*;
