//! Outloud - 划词朗读与翻译服务
//!
//! 启动顺序：配置 → 日志 → 适配器 → 后台上下文 → 阅读器 → HTTP 服务

use std::sync::Arc;
use std::time::Duration;

use outloud::application::{
    BackgroundChannelPort, BackgroundService, PlaybackSequencer, ReaderChannelPort, ReaderLink,
    RetryPolicy, SpeechService, TtsEnginePort,
};
use outloud::config::{load_config, print_config, AppConfig};
use outloud::infrastructure::adapters::{
    CartesiaTtsClient, CartesiaTtsClientConfig, FakeTtsClient, GoogleTranslator,
    GoogleTranslatorConfig, ProcessAudioOutput, ProcessAudioOutputConfig,
};
use outloud::infrastructure::bus::ChannelBus;
use outloud::infrastructure::events::EventPublisher;
use outloud::infrastructure::http::{AppState, HttpServer, ServerConfig};
use outloud::infrastructure::memory::InMemoryResultCache;
use outloud::infrastructure::persistence::{SledSettingsConfig, SledSettingsStore};
use outloud::infrastructure::worker::{ReaderAgent, ReaderAgentConfig};
use tokio::sync::mpsc;

/// 阅读器收件箱容量
const READER_INBOX_CAPACITY: usize = 64;

fn build_tts_engine(config: &AppConfig) -> anyhow::Result<Arc<dyn TtsEnginePort>> {
    if let Some(path) = &config.tts.fake_audio_path {
        tracing::warn!(path = ?path, "Using fake TTS engine");
        return Ok(Arc::new(FakeTtsClient::from_file(path)?));
    }

    let tts_config = CartesiaTtsClientConfig {
        base_url: config.tts.url.clone(),
        api_key: config.tts.api_key.clone(),
        api_version: config.tts.api_version.clone(),
        model_id: config.tts.model_id.clone(),
        timeout_secs: config.tts.timeout_secs,
    };
    Ok(Arc::new(CartesiaTtsClient::new(tts_config)?))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    let log_filter = format!(
        "{},outloud={},tower_http=debug",
        config.log.level, config.log.level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("Outloud - 划词朗读与翻译服务");
    print_config(&config);

    // 后台上下文依赖
    let tts_engine = build_tts_engine(&config)?;
    let translator = Arc::new(GoogleTranslator::new(GoogleTranslatorConfig {
        base_url: config.translation.url.clone(),
        timeout_secs: config.translation.timeout_secs,
    })?);
    let result_cache = Arc::new(InMemoryResultCache::new(config.cache.capacity));
    let settings_store = Arc::new(SledSettingsStore::new(&SledSettingsConfig {
        db_path: config.storage.settings_db.clone(),
    })?);
    let speech = Arc::new(SpeechService::new(tts_engine, translator, result_cache));

    let bus = Arc::new(ChannelBus::new(config.delivery.timeout()));
    let retry_policy = RetryPolicy {
        max_attempts: config.delivery.max_attempts,
        retry_delay: Duration::from_millis(config.delivery.retry_delay_ms),
        inject_settle: Duration::from_millis(config.delivery.inject_settle_ms),
    };
    let reader_link = Arc::new(ReaderLink::new(bus.clone(), retry_policy));
    let background = Arc::new(BackgroundService::new(
        speech,
        settings_store.clone(),
        reader_link,
    ));

    // 阅读器上下文依赖
    let event_publisher = Arc::new(EventPublisher::new());
    let player_config = ProcessAudioOutputConfig {
        command: config.player.command.clone(),
        args: config.player.args.clone(),
        temp_dir: config
            .storage
            .temp_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir),
    };
    let sequencer = Arc::new(PlaybackSequencer::new(
        Arc::new(ProcessAudioOutput::new(player_config)),
        config.player.rate,
    ));

    // 阅读器只持有后台的弱引用
    let background_handle: Arc<dyn BackgroundChannelPort> = Arc::new(Arc::downgrade(&background));
    let reader_config = ReaderAgentConfig {
        debounce: config.reader.debounce(),
        max_selection_chars: config.reader.max_selection_chars,
    };
    let overlay = event_publisher.clone();
    let reader_store = settings_store.clone();
    bus.install_launcher(Box::new(move || {
        let handle = tokio::runtime::Handle::try_current().map_err(|e| e.to_string())?;
        let (tx, rx) = mpsc::channel(READER_INBOX_CAPACITY);
        let agent = ReaderAgent::new(
            reader_config.clone(),
            rx,
            background_handle.clone(),
            sequencer.clone(),
            overlay.clone(),
            reader_store.clone(),
        );
        handle.spawn(agent.run());
        Ok(tx)
    }));
    bus.inject().await?;

    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    let state = AppState::new(background, bus, event_publisher);
    let server = HttpServer::bind(&server_config, state).await?;

    server
        .serve(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
