use std::path::PathBuf;

use clap::Parser;

use crate::chat::Language;
use crate::config::AppConfig;

/// lcb-chat: terminal query window for the LCB Fertilizer assistant
#[derive(Parser, Debug, Clone)]
#[command(name = "lcb-chat")]
#[command(version)]
#[command(about = "Ask the LCB Fertilizer assistant about Navyakosh from your terminal", long_about = None)]
pub struct Cli {
    /// Answering-service base URL. Overrides config.
    #[arg(long, env = "LCB_SERVER_URL", value_name = "URL")]
    pub server_url: Option<String>,

    /// Startup language (english/en, hindi/hi). Overrides config.
    #[arg(short, long, value_enum)]
    pub language: Option<Language>,

    /// Log level (trace, debug, info, warn, error). Overrides config; RUST_LOG wins over both.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Read configuration from this file instead of the platform config directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write default config.toml and theme.toml, then exit
    #[arg(long, default_value_t = false)]
    pub write_default_config: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Fold command-line overrides into the loaded config
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(url) = &self.server_url {
            config.server.base_url = url.clone();
        }
        if let Some(language) = self.language {
            config.chat.language = language;
        }
        if let Some(level) = &self.log_level {
            config.general.log_level = level.clone();
        }
    }
}
