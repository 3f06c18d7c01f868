//! Well-known filesystem locations

use std::path::PathBuf;

use crate::constants::fs;

/// Root directory for config, data, and logs (`~/.atelier`)
///
/// Falls back to the current directory when no home directory is known.
pub fn atelier_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(fs::CONFIG_DIR_NAME)
}

pub fn config_file() -> PathBuf {
    atelier_dir().join(fs::CONFIG_FILE_NAME)
}

pub fn database_path() -> PathBuf {
    atelier_dir().join(fs::DATABASE_FILE_NAME)
}

pub fn logs_dir() -> PathBuf {
    atelier_dir().join(fs::LOGS_DIR_NAME)
}
