//! HTTP Server
//!
//! 弹窗 API 的 Axum 服务器：先绑定端口，再带关闭信号运行

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::Router;
use http::header::CONTENT_TYPE;
use http::Method;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::middleware::error_logging_middleware;
use super::routes::create_routes;
use super::state::AppState;

/// 消息中携带 base64 音频
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// 服务器配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new("127.0.0.1", 5070)
    }
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 组装完整的 Router（路由 + 中间件 + 状态）
///
/// 弹窗运行在扩展页面中，来源不固定，因此 CORS 放开来源，只允许 GET/POST。
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600));

    create_routes()
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(middleware::from_fn(error_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// 已绑定端口的 HTTP 服务器
pub struct HttpServer {
    listener: TcpListener,
    router: Router,
}

impl HttpServer {
    /// 绑定监听地址；端口为 0 时由系统分配
    pub async fn bind(config: &ServerConfig, state: AppState) -> Result<Self, std::io::Error> {
        let listener = TcpListener::bind(config.addr()).await?;
        Ok(Self {
            listener,
            router: build_router(Arc::new(state)),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.listener.local_addr()
    }

    /// 运行直到关闭信号完成，等待进行中的请求结束
    pub async fn serve<F>(self, shutdown_signal: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("HTTP server listening on {}", self.local_addr()?);

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal)
            .await
    }
}
