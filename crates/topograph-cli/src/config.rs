//! Locating the render settings for the CLI.
//!
//! Settings come from the first TOML file found among an explicit
//! `--config` path, `topograph/config.toml` under the working directory and
//! the platform configuration directory. Without any of them the builder runs
//! on [`AppConfig::default`].

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use topograph::{TopographError, config::AppConfig};

/// Settings path looked up under the working directory.
const WORKING_DIR_CONFIG: &str = "topograph/config.toml";

/// Where a settings file was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigSource {
    /// Named with `--config`.
    Explicit,
    WorkingDirectory,
    Platform,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Explicit => "--config",
            Self::WorkingDirectory => "working directory",
            Self::Platform => "platform config directory",
        })
    }
}

#[derive(Debug, Error)]
enum SettingsError {
    #[error("configuration file {0} does not exist")]
    NotFound(PathBuf),

    #[error("configuration file {path} is not valid TOML: {message}")]
    Invalid { path: PathBuf, message: String },
}

impl From<SettingsError> for TopographError {
    fn from(err: SettingsError) -> Self {
        TopographError::Config(err.to_string())
    }
}

/// Picks the settings file to read, if any.
///
/// An explicit path always wins, even when it does not exist, so that a
/// mistyped `--config` is reported instead of silently ignored.
fn discover(explicit: Option<&Path>, working_dir: &Path) -> Option<(ConfigSource, PathBuf)> {
    if let Some(path) = explicit {
        return Some((ConfigSource::Explicit, path.to_path_buf()));
    }

    let local = working_dir.join(WORKING_DIR_CONFIG);
    if local.is_file() {
        return Some((ConfigSource::WorkingDirectory, local));
    }

    let Some(dirs) = ProjectDirs::from("com", "topograph", "topograph") else {
        debug!("No platform config directory on this system");
        return None;
    };
    let platform = dirs.config_dir().join("config.toml");
    if platform.is_file() {
        return Some((ConfigSource::Platform, platform));
    }

    debug!(path = platform.display().to_string(); "No settings in platform config directory");
    None
}

/// Loads the render settings, falling back to defaults when no file is found.
///
/// # Errors
///
/// Returns [`TopographError::Config`] when the explicit path is missing or
/// the chosen file is not a valid settings document, and
/// [`TopographError::Io`] when it cannot be read.
pub fn load_config(explicit: Option<impl AsRef<Path>>) -> Result<AppConfig, TopographError> {
    let explicit = explicit.as_ref().map(|path| path.as_ref());
    match discover(explicit, Path::new(".")) {
        Some((source, path)) => {
            info!(source:% = source, path = path.display().to_string(); "Loading settings");
            read_settings(&path)
        }
        None => {
            debug!("No settings file found, using defaults");
            Ok(AppConfig::default())
        }
    }
}

fn read_settings(path: &Path) -> Result<AppConfig, TopographError> {
    if !path.exists() {
        return Err(SettingsError::NotFound(path.to_path_buf()).into());
    }

    let text = fs::read_to_string(path)?;
    toml::from_str(&text).map_err(|e| {
        SettingsError::Invalid {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use topograph::config::OutputFormat;

    use super::*;

    #[test]
    fn test_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
            [render]
            format = "dot"

            [style]
            font_size = 11
            "#,
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.render().format(), OutputFormat::Dot);
        assert_eq!(config.style().font_size(), 11);
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(dir.path().join("absent.toml"))).unwrap_err();

        assert!(
            matches!(err, TopographError::Config(msg) if msg.contains("absent.toml") && msg.contains("does not exist"))
        );
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[render]\nformat = \"gif\"\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, TopographError::Config(msg) if msg.contains("is not valid TOML")));
    }

    #[test]
    fn test_discover_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join(WORKING_DIR_CONFIG);
        fs::create_dir_all(local.parent().unwrap()).unwrap();
        fs::write(&local, "").unwrap();

        let explicit = dir.path().join("other.toml");
        assert_eq!(
            discover(Some(explicit.as_path()), dir.path()),
            Some((ConfigSource::Explicit, explicit.clone()))
        );
        assert_eq!(
            discover(None, dir.path()),
            Some((ConfigSource::WorkingDirectory, local))
        );
    }

    #[test]
    fn test_source_names() {
        assert_eq!(ConfigSource::Explicit.to_string(), "--config");
        assert_eq!(
            ConfigSource::Platform.to_string(),
            "platform config directory"
        );
    }
}
