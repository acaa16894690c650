//! HTTP Layer - 本地 REST API + WebSocket
//!
//! 对应浏览器扩展的弹出页：投递消息、上报选区、读写设置、订阅浮层事件

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use routes::create_routes;
pub use server::{build_router, HttpServer, ServerConfig};
pub use state::AppState;
