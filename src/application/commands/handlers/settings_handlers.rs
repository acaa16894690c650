//! Settings Command Handlers

use std::sync::Arc;

use crate::application::commands::UpdateSettings;
use crate::application::error::ApplicationError;
use crate::application::messages::Message;
use crate::application::ports::SettingsStorePort;
use crate::application::services::ReaderLink;
use crate::domain::ReaderSettings;

/// UpdateSettings Handler
///
/// 先持久化，再尽力通知阅读器更新自动朗读开关
pub struct UpdateSettingsHandler {
    settings_store: Arc<dyn SettingsStorePort>,
    reader: Arc<ReaderLink>,
}

impl UpdateSettingsHandler {
    pub fn new(settings_store: Arc<dyn SettingsStorePort>, reader: Arc<ReaderLink>) -> Self {
        Self {
            settings_store,
            reader,
        }
    }

    pub async fn handle(&self, command: UpdateSettings) -> Result<ReaderSettings, ApplicationError> {
        let settings = command.settings;
        self.settings_store.save(&settings)?;

        tracing::info!(
            speed = settings.speed.as_str(),
            voice = %settings.voice,
            auto_read = settings.auto_read,
            "Settings saved"
        );

        let notify = Message::UpdateAutoReadSettings {
            settings: settings.clone(),
        };
        if let Err(e) = self.reader.deliver(notify).await {
            tracing::warn!(error = %e, "Failed to forward settings to reader");
        }

        Ok(settings)
    }
}
