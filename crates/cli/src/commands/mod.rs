pub mod chat;
pub mod config_cmd;
pub mod search;

use reverie_config::AppConfig;
use reverie_journal::DirectoryIndex;

/// Load the configuration, mapping failures to a printable error.
pub(crate) fn load_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    Ok(AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?)
}

/// Open the configured journal directory.
pub(crate) async fn open_journal(
    config: &AppConfig,
) -> Result<DirectoryIndex, Box<dyn std::error::Error>> {
    let dir = config.journal.resolved_dir();
    let index = DirectoryIndex::open(&dir, config.journal.extensions.clone())
        .await
        .map_err(|e| {
            format!(
                "{e}\n  Point `journal.dir` in {} (or REVERIE_JOURNAL_DIR) at your journal.",
                AppConfig::config_dir().join("config.toml").display()
            )
        })?;
    Ok(index)
}
