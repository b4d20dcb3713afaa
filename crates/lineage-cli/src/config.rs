//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory).

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};

use lineage::config::AppConfig;

use crate::error::CliError;

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (lineage/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, CliError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("lineage/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "lineage", "lineage") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, CliError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(CliError::MissingConfig {
            path: PathBuf::from(path),
        });
    }

    let content = fs::read_to_string(path).map_err(|err| CliError::io(path, err))?;

    match toml::from_str(&content) {
        Ok(config) => Ok(config),
        Err(err) => Err(CliError::toml(
            "configuration",
            path,
            content,
            &err,
            Some("known sections are [layout], [style] and [hierarchy]".to_string()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn config_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write temp file");
        file
    }

    #[test]
    fn test_explicit_config_overrides_defaults() {
        let file = config_file(
            r#"
            [layout]
            element_spacing = 60.0

            [style]
            api_only = true

            [hierarchy]
            universal_root = "System.Object"
            "#,
        );

        let config = load_config(Some(file.path())).expect("config should load");
        assert_eq!(config.layout().element_spacing(), 60.0);
        assert_eq!(config.layout().char_width(), 7.0);
        assert!(config.style().api_only());
        assert_eq!(config.hierarchy().universal_root(), "System.Object");
    }

    #[test]
    fn test_missing_explicit_config() {
        let err = load_config(Some("/nonexistent/lineage.toml")).unwrap_err();
        assert!(matches!(err, CliError::MissingConfig { .. }));
    }

    #[test]
    fn test_malformed_config_reports_span() {
        let file = config_file("[layout]\nelement_spacing = \"wide\"\n");

        let err = load_config(Some(file.path())).unwrap_err();
        match err {
            CliError::Toml { kind, span, .. } => {
                assert_eq!(kind, "configuration");
                assert!(span.is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
