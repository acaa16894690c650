//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// # 环境变量示例
/// - `OUTLOUD_SERVER__PORT=5070`
/// - `OUTLOUD_TTS__API_KEY=sk_...`
/// - `OUTLOUD_TTS__FAKE_AUDIO_PATH=assets/sample.mp3`
/// - `OUTLOUD_READER__DEBOUNCE_MS=400`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// `config_path` 为 None 时搜索工作目录下的 `config` 与 `config.local`
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    builder = builder
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 5070)?
        .set_default("tts.url", "https://api.cartesia.ai")?
        .set_default("tts.api_version", "2025-04-16")?
        .set_default("tts.model_id", "sonic-2")?
        .set_default("tts.timeout_secs", 30)?
        .set_default("translation.timeout_secs", 10)?
        .set_default("cache.capacity", 50)?
        .set_default("storage.settings_db", "data/settings.sled")?
        .set_default("player.command", "mpv")?
        .set_default("player.rate", 0.75)?
        .set_default("reader.debounce_ms", 250)?
        .set_default("reader.max_selection_chars", 100)?
        .set_default("delivery.timeout_ms", 5000)?
        .set_default("delivery.max_attempts", 3)?
        .set_default("delivery.retry_delay_ms", 200)?
        .set_default("delivery.inject_settle_ms", 100)?
        .set_default("log.level", "info")?;

    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 例如: OUTLOUD_TTS__API_KEY=...，变量名会被转换为小写
    builder = builder.add_source(
        Environment::with_prefix("OUTLOUD")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.tts.url.is_empty() {
        return Err(ConfigError::ValidationError(
            "TTS URL cannot be empty".to_string(),
        ));
    }

    if config.storage.settings_db.is_empty() {
        return Err(ConfigError::ValidationError(
            "Settings database path cannot be empty".to_string(),
        ));
    }

    if config.cache.capacity == 0 {
        return Err(ConfigError::ValidationError(
            "Cache capacity must be greater than 0".to_string(),
        ));
    }

    if config.player.command.is_empty() {
        return Err(ConfigError::ValidationError(
            "Player command cannot be empty".to_string(),
        ));
    }

    if !(config.player.rate > 0.0) {
        return Err(ConfigError::ValidationError(format!(
            "Playback rate must be positive, got {}",
            config.player.rate
        )));
    }

    if config.delivery.max_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "Delivery max_attempts must be at least 1".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    match &config.tts.fake_audio_path {
        Some(path) => tracing::info!("TTS: fake engine ({:?})", path),
        None => {
            tracing::info!("TTS URL: {}", config.tts.url);
            tracing::info!("TTS Model: {}", config.tts.model_id);
            tracing::info!("TTS API Key Set: {}", !config.tts.api_key.is_empty());
        }
    }
    tracing::info!("TTS Timeout: {}s", config.tts.timeout_secs);
    tracing::info!("Translation URL: {}", config.translation.url);
    tracing::info!("Cache Capacity: {}", config.cache.capacity);
    tracing::info!("Settings DB: {}", config.storage.settings_db);
    tracing::info!(
        "Player: {} {:?} @ {}x",
        config.player.command,
        config.player.args,
        config.player.rate
    );
    tracing::info!(
        "Reader: debounce {}ms, max selection {} chars",
        config.reader.debounce_ms,
        config.reader.max_selection_chars
    );
    tracing::info!(
        "Delivery: timeout {}ms, {} attempts",
        config.delivery.timeout_ms,
        config.delivery.max_attempts
    );
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_tts_url() {
        let mut config = AppConfig::default();
        config.tts.url = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_cache_capacity() {
        let mut config = AppConfig::default();
        config.cache.capacity = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_non_positive_rate() {
        let mut config = AppConfig::default();
        config.player.rate = 0.0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_attempts() {
        let mut config = AppConfig::default();
        config.delivery.max_attempts = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            "[server]\nport = 6001\n\n[reader]\ndebounce_ms = 400\n\n[player]\nargs = [\"{{file}}\"]"
        )
        .unwrap();

        let config = load_config_from_path(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 6001);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.reader.debounce_ms, 400);
        assert_eq!(config.reader.max_selection_chars, 100);
        assert_eq!(config.player.args, vec!["{file}".to_string()]);
        assert_eq!(config.player.command, "mpv");
    }

    #[test]
    fn test_load_from_file_rejects_invalid_values() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(file, "[cache]\ncapacity = 0").unwrap();

        let result = load_config_from_path(Some(file.path()));
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }
}
