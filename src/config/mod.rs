mod theme;

pub use theme::Theme;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use directories::BaseDirs;

use crate::chat::{Language, SessionSettings};
use crate::error::{ChatError, Result};

const CONFIG_DIR: &str = "lcb-chat";
const MAIN_CONFIG_FILE: &str = "config.toml";
const THEME_FILE: &str = "theme.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub server: ServerConfig,
    pub health: HealthConfig,
    pub chat: ChatConfig,
}

impl AppConfig {
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            language: self.chat.language,
            health_interval: Duration::from_secs(self.health.interval_secs.max(1)),
            check_timeout: Duration::from_secs(self.server.health_timeout_secs.max(1)),
            scroll_threshold: self.chat.scroll_threshold_lines,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub tick_interval_ms: u64,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    pub theme: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
            log_level: "info".to_string(),
            log_file: None,
            theme: "default".to_string(),
        }
    }
}

/// Answering-service endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub base_url: String,
    pub chat_path: String,
    pub health_path: String,
    pub request_timeout_secs: u64,
    pub health_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            chat_path: "/chat".to_string(),
            health_path: "/health".to_string(),
            request_timeout_secs: 60,
            health_timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    pub interval_secs: u64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self { interval_secs: 30 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub language: Language,
    pub scroll_threshold_lines: usize,
    pub notification_duration_ms: u64,
    pub show_timestamps: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            language: Language::English,
            scroll_threshold_lines: 4,
            notification_duration_ms: 4000,
            show_timestamps: true,
        }
    }
}

pub struct ConfigManager {
    config_dir: PathBuf,
    app_config: AppConfig,
    theme: Theme,
}

impl ConfigManager {
    /// Load from the platform config directory
    pub fn new() -> Result<Self> {
        let config_dir = Self::get_config_dir()?;
        Ok(Self::with_dir(config_dir))
    }

    /// Load from an explicit directory. Missing or broken files fall back to defaults.
    pub fn with_dir(config_dir: impl Into<PathBuf>) -> Self {
        let config_dir = config_dir.into();
        let app_config = Self::load_app_config(&config_dir);
        let theme = Self::load_theme(&config_dir, &app_config.general.theme);

        Self {
            config_dir,
            app_config,
            theme,
        }
    }

    /// Load the main config from an explicit file, which must exist
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ChatError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let app_config: AppConfig = toml::from_str(&content)
            .map_err(|e| ChatError::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

        let config_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let theme = Self::load_theme(&config_dir, &app_config.general.theme);

        Ok(Self {
            config_dir,
            app_config,
            theme,
        })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn app_config(&self) -> &AppConfig {
        &self.app_config
    }

    pub fn app_config_mut(&mut self) -> &mut AppConfig {
        &mut self.app_config
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    fn get_config_dir() -> Result<PathBuf> {
        BaseDirs::new()
            .map(|dirs| dirs.config_dir().join(CONFIG_DIR))
            .ok_or_else(|| ChatError::Config("Could not determine config directory".to_string()))
    }

    fn load_app_config(config_dir: &Path) -> AppConfig {
        let path = config_dir.join(MAIN_CONFIG_FILE);
        Self::load_toml_file(&path).unwrap_or_default()
    }

    /// `theme.toml` wins over the named built-in
    fn load_theme(config_dir: &Path, name: &str) -> Theme {
        let path = config_dir.join(THEME_FILE);
        Self::load_toml_file(&path).unwrap_or_else(|| {
            Theme::by_name(name).unwrap_or_else(|| {
                tracing::warn!("Unknown theme '{}', using default", name);
                Theme::default()
            })
        })
    }

    fn load_toml_file<T: for<'de> Deserialize<'de>>(path: &Path) -> Option<T> {
        if !path.exists() {
            return None;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => Some(config),
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}", path.display(), e);
                    None
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", path.display(), e);
                None
            }
        }
    }

    pub fn ensure_config_dir(&self) -> Result<()> {
        if !self.config_dir.exists() {
            std::fs::create_dir_all(&self.config_dir)
                .map_err(|e| ChatError::Config(format!("Failed to create config dir: {}", e)))?;
        }
        Ok(())
    }

    /// Write default files that don't exist yet. Returns the paths written.
    pub fn write_default_configs(&self) -> Result<Vec<PathBuf>> {
        self.ensure_config_dir()?;
        let mut written = Vec::new();

        let main_path = self.config_dir.join(MAIN_CONFIG_FILE);
        if !main_path.exists() {
            let content = toml::to_string_pretty(&AppConfig::default())
                .map_err(|e| ChatError::Config(format!("Failed to serialize config: {}", e)))?;
            std::fs::write(&main_path, content)
                .map_err(|e| ChatError::Config(format!("Failed to write config: {}", e)))?;
            written.push(main_path);
        }

        let theme_path = self.config_dir.join(THEME_FILE);
        if !theme_path.exists() {
            let content = toml::to_string_pretty(&Theme::default())
                .map_err(|e| ChatError::Config(format!("Failed to serialize theme: {}", e)))?;
            std::fs::write(&theme_path, content)
                .map_err(|e| ChatError::Config(format!("Failed to write theme: {}", e)))?;
            written.push(theme_path);
        }

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_app_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.base_url, "http://localhost:8000");
        assert_eq!(config.health.interval_secs, 30);
        assert_eq!(config.chat.scroll_threshold_lines, 4);
        assert_eq!(config.chat.language, Language::English);
    }

    #[test]
    fn test_app_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.server.chat_path, config.server.chat_path);
        assert_eq!(parsed.chat.language, config.chat.language);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let parsed: AppConfig = toml::from_str(
            r#"
            [server]
            base_url = "https://lcb.example.org"

            [chat]
            language = "hindi"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.server.base_url, "https://lcb.example.org");
        assert_eq!(parsed.server.health_path, "/health");
        assert_eq!(parsed.chat.language, Language::Hindi);
        assert_eq!(parsed.health.interval_secs, 30);
    }

    #[test]
    fn test_missing_dir_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_dir(dir.path().join("nope"));
        assert_eq!(manager.app_config().health.interval_secs, 30);
        assert_eq!(manager.theme().name, "default");
    }

    #[test]
    fn test_broken_file_falls_back() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(MAIN_CONFIG_FILE), "[server\nbase_url = ").unwrap();
        let manager = ConfigManager::with_dir(dir.path());
        assert_eq!(manager.app_config().server.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_loads_from_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(MAIN_CONFIG_FILE),
            "[health]\ninterval_secs = 10\n[general]\ntheme = \"field\"\n",
        )
        .unwrap();
        let manager = ConfigManager::with_dir(dir.path());
        assert_eq!(manager.app_config().health.interval_secs, 10);
        assert_eq!(manager.theme().name, "field");
    }

    #[test]
    fn test_write_default_configs_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_dir(dir.path().join("lcb"));

        let written = manager.write_default_configs().unwrap();
        assert_eq!(written.len(), 2);
        assert!(manager.config_dir().join(MAIN_CONFIG_FILE).exists());

        let written = manager.write_default_configs().unwrap();
        assert!(written.is_empty());

        let reloaded = ConfigManager::with_dir(manager.config_dir());
        assert_eq!(reloaded.app_config().server.chat_path, "/chat");
    }

    #[test]
    fn test_from_file_requires_existing_path() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("custom.toml");
        assert!(matches!(
            ConfigManager::from_file(&missing),
            Err(ChatError::ConfigNotFound { .. })
        ));

        std::fs::write(&missing, "[chat]\nscroll_threshold_lines = 8\n").unwrap();
        let manager = ConfigManager::from_file(&missing).unwrap();
        assert_eq!(manager.app_config().chat.scroll_threshold_lines, 8);
    }

    #[test]
    fn test_session_settings_mapping() {
        let mut config = AppConfig::default();
        config.health.interval_secs = 0;
        config.chat.language = Language::Hindi;
        let settings = config.session_settings();
        assert_eq!(settings.health_interval, Duration::from_secs(1));
        assert_eq!(settings.check_timeout, Duration::from_secs(5));
        assert_eq!(settings.language, Language::Hindi);
        assert_eq!(settings.scroll_threshold, 4);
    }
}
