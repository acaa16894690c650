//! Outloud - 划词朗读与翻译服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - 语言识别、音色目录、选区差异、用户设置
//!
//! 应用层 (application/):
//! - Ports: 端口定义（TtsEngine, Translator, ResultCache, SettingsStore, ReaderChannel, AudioOutput, Overlay）
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//! - Services: 后台上下文、阅读器投递、播放编排
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: 弹窗 API + WebSocket
//! - Bus: 后台与阅读器之间的进程内消息通道
//! - Worker: 阅读器上下文任务（选区防抖、播放、浮层）
//! - Memory: 结果缓存
//! - Persistence: Sled 设置存储
//! - Adapters: Cartesia TTS, Google 翻译, 外部播放器
//! - Events: WebSocket 事件发布

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
