//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// TTS 网关配置
    #[serde(default)]
    pub tts: TtsConfig,

    /// 翻译网关配置
    #[serde(default)]
    pub translation: TranslationConfig,

    /// 结果缓存配置
    #[serde(default)]
    pub cache: CacheConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 播放器配置
    #[serde(default)]
    pub player: PlayerConfig,

    /// 阅读器配置
    #[serde(default)]
    pub reader: ReaderConfig,

    /// 消息投递配置
    #[serde(default)]
    pub delivery: DeliveryConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5070
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// TTS 网关配置
#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    /// TTS 服务基础 URL
    #[serde(default = "default_tts_url")]
    pub url: String,

    /// API 密钥（建议通过 `OUTLOUD_TTS__API_KEY` 设置）
    #[serde(default)]
    pub api_key: String,

    /// `Cartesia-Version` 请求头
    #[serde(default = "default_tts_api_version")]
    pub api_version: String,

    #[serde(default = "default_tts_model")]
    pub model_id: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_tts_timeout")]
    pub timeout_secs: u64,

    /// 设置后不访问网络，始终返回该文件的音频（离线调试用）
    #[serde(default)]
    pub fake_audio_path: Option<PathBuf>,
}

fn default_tts_url() -> String {
    "https://api.cartesia.ai".to_string()
}

fn default_tts_api_version() -> String {
    "2025-04-16".to_string()
}

fn default_tts_model() -> String {
    "sonic-2".to_string()
}

fn default_tts_timeout() -> u64 {
    30
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            url: default_tts_url(),
            api_key: String::new(),
            api_version: default_tts_api_version(),
            model_id: default_tts_model(),
            timeout_secs: default_tts_timeout(),
            fake_audio_path: None,
        }
    }
}

/// 翻译网关配置
#[derive(Debug, Clone, Deserialize)]
pub struct TranslationConfig {
    #[serde(default = "default_translation_url")]
    pub url: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_translation_timeout")]
    pub timeout_secs: u64,
}

fn default_translation_url() -> String {
    "https://translate.googleapis.com/translate_a/single".to_string()
}

fn default_translation_timeout() -> u64 {
    10
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            url: default_translation_url(),
            timeout_secs: default_translation_timeout(),
        }
    }
}

/// 结果缓存配置
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// 最大条目数
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
}

fn default_cache_capacity() -> usize {
    50
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
        }
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 设置数据库路径
    #[serde(default = "default_settings_db")]
    pub settings_db: String,

    /// 播放用临时音频目录，未设置时使用系统临时目录
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,
}

fn default_settings_db() -> String {
    "data/settings.sled".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            settings_db: default_settings_db(),
            temp_dir: None,
        }
    }
}

/// 播放器配置
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerConfig {
    /// 播放器可执行文件
    #[serde(default = "default_player_command")]
    pub command: String,

    /// 参数模板，支持 `{rate}` 与 `{file}` 占位符
    #[serde(default = "default_player_args")]
    pub args: Vec<String>,

    /// 播放倍速
    #[serde(default = "default_player_rate")]
    pub rate: f32,
}

fn default_player_command() -> String {
    "mpv".to_string()
}

fn default_player_args() -> Vec<String> {
    vec![
        "--no-video".to_string(),
        "--really-quiet".to_string(),
        "--speed={rate}".to_string(),
        "{file}".to_string(),
    ]
}

fn default_player_rate() -> f32 {
    0.75
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            command: default_player_command(),
            args: default_player_args(),
            rate: default_player_rate(),
        }
    }
}

/// 阅读器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ReaderConfig {
    /// 选区静默时间（毫秒）
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// 超过该字符数的选区被忽略
    #[serde(default = "default_max_selection_chars")]
    pub max_selection_chars: usize,
}

fn default_debounce_ms() -> u64 {
    250
}

fn default_max_selection_chars() -> usize {
    100
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            max_selection_chars: default_max_selection_chars(),
        }
    }
}

impl ReaderConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// 消息投递配置
#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryConfig {
    /// 单次请求等待回复的超时（毫秒）
    #[serde(default = "default_delivery_timeout")]
    pub timeout_ms: u64,

    /// 最大发送次数
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// 重试间隔（毫秒）
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,

    /// 重新加载阅读器后的等待时间（毫秒）
    #[serde(default = "default_inject_settle")]
    pub inject_settle_ms: u64,
}

fn default_delivery_timeout() -> u64 {
    5000
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_delay() -> u64 {
    200
}

fn default_inject_settle() -> u64 {
    100
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_delivery_timeout(),
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay(),
            inject_settle_ms: default_inject_settle(),
        }
    }
}

impl DeliveryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}
