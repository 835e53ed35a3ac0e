mod action;
mod api;
mod app;
mod chat;
mod cli;
mod components;
mod config;
mod error;
mod logging;

use std::sync::Arc;

use color_eyre::eyre::Result;

use api::HttpBackend;
use chat::ChatSession;
use cli::Cli;
use config::ConfigManager;

/// Restore the terminal before the panic report is printed
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        app::restore_terminal();
        original_hook(panic_info);
    }));
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse_args();

    let mut config_manager = match &cli.config {
        Some(path) => ConfigManager::from_file(path)?,
        None => ConfigManager::new()?,
    };

    if cli.write_default_config {
        let written = config_manager.write_default_configs()?;
        if written.is_empty() {
            println!("Config already present in {}", config_manager.config_dir().display());
        }
        for path in written {
            println!("Wrote {}", path.display());
        }
        return Ok(());
    }

    cli.apply_to(config_manager.app_config_mut());
    let config = config_manager.app_config().clone();

    let _log_guard = logging::init(&config.general.log_level, config.general.log_file.as_deref())?;
    tracing::info!(
        server = %config.server.base_url,
        language = config.chat.language.code(),
        "Starting lcb-chat"
    );

    let backend = Arc::new(HttpBackend::new(&config.server)?);
    let session = ChatSession::new(backend, config.session_settings());

    install_panic_hook();
    let mut app = app::App::new(session, &config, config_manager.theme().clone())?;
    app.run().await?;

    Ok(())
}
