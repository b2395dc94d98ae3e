use std::path::{Path, PathBuf};

use anyhow::Context;

const APP_NAME: &str = "souvenir-machine";
const LOG_FILE_NAME: &str = "souvenir-machine.log";

pub const DEFAULT_LOG_LEVEL: &str = "warn";

pub fn cache_dir() -> PathBuf {
    if let Ok(xdg_cache_home) = std::env::var("XDG_CACHE_HOME")
        && !xdg_cache_home.is_empty()
    {
        return PathBuf::from(xdg_cache_home).join(APP_NAME);
    }
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_NAME)
}

pub fn default_log_file() -> PathBuf {
    cache_dir().join(LOG_FILE_NAME)
}

/// Route the `log` facade to a rolling file. Does nothing for `LevelFilter::Off`.
pub fn setup_logging(level: log::LevelFilter, log_file: Option<&Path>) -> anyhow::Result<()> {
    if level == log::LevelFilter::Off {
        return Ok(());
    }

    let log_file = log_file.map_or_else(default_log_file, Path::to_path_buf);
    if let Some(parent) = log_file.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create log directory {}", parent.display()))?;
    }
    simple_log::file(log_file.to_string_lossy().into_owned(), level, 10, 10)
        .map_err(|e| anyhow::anyhow!(e))?;
    log::info!("{APP_NAME} logging initialised (level={level})");
    Ok(())
}
