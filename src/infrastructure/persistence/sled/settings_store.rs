//! Sled-based Settings Store Implementation
//!
//! 设置以 JSON 存储在 `settings` 键下，最近选中的文本存储在 `last_selected_text` 键下

use sled::Db;
use std::path::Path;

use crate::application::ports::{SettingsStorePort, StoreError};
use crate::domain::ReaderSettings;

const SETTINGS_KEY: &str = "settings";
const LAST_SELECTED_KEY: &str = "last_selected_text";

/// Sled 设置存储配置
#[derive(Debug, Clone)]
pub struct SledSettingsConfig {
    /// 数据库路径
    pub db_path: String,
}

impl Default for SledSettingsConfig {
    fn default() -> Self {
        Self {
            db_path: "data/settings.sled".to_string(),
        }
    }
}

/// Sled 设置存储
pub struct SledSettingsStore {
    db: Db,
}

impl SledSettingsStore {
    pub fn new(config: &SledSettingsConfig) -> Result<Self, StoreError> {
        if let Some(parent) = Path::new(&config.db_path).parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::DatabaseError(e.to_string()))?;
        }

        let db = sled::open(&config.db_path).map_err(|e| StoreError::DatabaseError(e.to_string()))?;

        tracing::info!(db_path = %config.db_path, "SledSettingsStore initialized");
        Ok(Self { db })
    }

    fn write(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.db
            .insert(key, value)
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;
        self.db
            .flush()
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}

impl SettingsStorePort for SledSettingsStore {
    fn load(&self) -> Result<ReaderSettings, StoreError> {
        let stored = self
            .db
            .get(SETTINGS_KEY)
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;

        match stored {
            // 缺失字段由 serde(default) 补齐
            Some(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| StoreError::SerializationError(e.to_string())),
            None => Ok(ReaderSettings::default()),
        }
    }

    fn save(&self, settings: &ReaderSettings) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(settings)
            .map_err(|e| StoreError::SerializationError(e.to_string()))?;
        self.write(SETTINGS_KEY, &bytes)
    }

    fn last_selected_text(&self) -> Result<Option<String>, StoreError> {
        let stored = self
            .db
            .get(LAST_SELECTED_KEY)
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;

        stored
            .map(|bytes| {
                String::from_utf8(bytes.to_vec())
                    .map_err(|e| StoreError::SerializationError(e.to_string()))
            })
            .transpose()
    }

    fn set_last_selected_text(&self, text: &str) -> Result<(), StoreError> {
        self.write(LAST_SELECTED_KEY, text.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LanguageMode, SpeedSetting};
    use tempfile::tempdir;

    fn store(dir: &tempfile::TempDir) -> SledSettingsStore {
        let config = SledSettingsConfig {
            db_path: dir.path().join("settings.sled").to_string_lossy().to_string(),
        };
        SledSettingsStore::new(&config).unwrap()
    }

    #[test]
    fn test_load_defaults_when_empty() {
        let dir = tempdir().unwrap();
        let store = store(&dir);

        assert_eq!(store.load().unwrap(), ReaderSettings::default());
        assert_eq!(store.last_selected_text().unwrap(), None);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let store = store(&dir);
        let settings = ReaderSettings {
            speed: SpeedSetting::Fast,
            voice: "a0e99841-438c-4a64-b679-ae501e7d6091".to_string(),
            auto_read: true,
            language_detection: LanguageMode::Zh,
        };

        store.save(&settings).unwrap();

        assert_eq!(store.load().unwrap(), settings);
    }

    #[test]
    fn test_partial_settings_merge_with_defaults() {
        let dir = tempdir().unwrap();
        let store = store(&dir);
        store
            .db
            .insert(SETTINGS_KEY, br#"{"autoRead":true}"#.to_vec())
            .unwrap();

        let settings = store.load().unwrap();

        assert!(settings.auto_read);
        assert_eq!(settings.speed, SpeedSetting::Normal);
        assert_eq!(settings.language_detection, LanguageMode::Auto);
    }

    #[test]
    fn test_corrupt_settings_is_serialization_error() {
        let dir = tempdir().unwrap();
        let store = store(&dir);
        store.db.insert(SETTINGS_KEY, b"not json".to_vec()).unwrap();

        assert!(matches!(
            store.load(),
            Err(StoreError::SerializationError(_))
        ));
    }

    #[test]
    fn test_last_selected_text_persists() {
        let dir = tempdir().unwrap();
        {
            let store = store(&dir);
            store.set_last_selected_text("你好世界").unwrap();
        }

        let store = store(&dir);
        assert_eq!(store.last_selected_text().unwrap().as_deref(), Some("你好世界"));
    }
}
