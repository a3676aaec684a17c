//! # Configuration bootstrap / 配置引导
//!
//! Finds the config file and hands it to the loader. A missing default file
//! is not an error: the pipeline runs on built-in defaults.

use std::path::{Path, PathBuf};

use bc_core::ClipboardConfig;
use bc_infra::config::load_config;
use tracing::{debug, info};

const CONFIG_FILE_NAME: &str = "config.toml";

/// `<config dir>/blockclip/config.toml`, when the platform has one.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("blockclip").join(CONFIG_FILE_NAME))
}

/// Load the clipboard configuration
/// 加载剪贴板配置
///
/// # Behavior / 行为
/// - explicit path: must exist and parse
/// - no path: the default location when present, otherwise defaults
pub fn load_config_or_default(explicit: Option<&Path>) -> anyhow::Result<ClipboardConfig> {
    if let Some(path) = explicit {
        info!(path = %path.display(), "Loading clipboard config");
        return load_config(path);
    }

    match default_config_path().filter(|path| path.exists()) {
        Some(path) => {
            info!(path = %path.display(), "Loading clipboard config");
            load_config(&path)
        }
        None => {
            debug!("No config file found, using defaults");
            Ok(ClipboardConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_explicit_path_is_loaded() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[undo]\nmax_levels = 3\n")
            .unwrap();

        let config = load_config_or_default(Some(temp_file.path())).unwrap();
        assert_eq!(config.undo.max_levels, 3);
    }

    #[test]
    fn test_missing_explicit_path_is_an_error() {
        let result = load_config_or_default(Some(Path::new("/this/path/does/not/exist.toml")));
        assert!(result.is_err());
    }
}
