//! Configuration Loader
//!
//! Builds a [`RegistryConfig`] from an optional file plus environment
//! overrides, using the `config` crate for source layering.

use super::error::{ConfigResult, ConfigurationError};
use super::RegistryConfig;
use crate::constants::defaults::{CONFIG_PATH_ENV, ENV_PREFIX};
use config::{Config, Environment, File};
use std::env;
use std::path::Path;
use tracing::debug;

/// Entry points for loading registry configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the file named by `PARCEL_REGISTRY_CONFIG_PATH`
    /// (if set) and `PARCEL_REGISTRY_*` environment overrides.
    pub fn load() -> ConfigResult<RegistryConfig> {
        match env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::load_from_path(path),
            _ => Self::build(None, None),
        }
    }

    /// Load configuration from `path`, then apply environment overrides.
    ///
    /// The file format follows the extension (`.toml`, `.yaml`, `.json`).
    pub fn load_from_path(path: impl AsRef<Path>) -> ConfigResult<RegistryConfig> {
        Self::build(Some(path.as_ref()), None)
    }

    /// Like [`ConfigLoader::load_from_path`] but reads overrides from `vars`
    /// instead of the process environment.
    ///
    /// Keys carry the same `PARCEL_REGISTRY_` prefix as real environment
    /// variables. This is useful for testing without modifying global
    /// environment variables.
    pub fn load_with_overrides<I, K, V>(
        path: Option<&Path>,
        vars: I,
    ) -> ConfigResult<RegistryConfig>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let overrides: config::Map<String, String> = vars
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self::build(path, Some(overrides))
    }

    fn build(
        path: Option<&Path>,
        overrides: Option<config::Map<String, String>>,
    ) -> ConfigResult<RegistryConfig> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigurationError::config_file_not_found(path));
            }
            debug!(path = %path.display(), "Loading registry configuration file");
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .try_parsing(true)
                .source(overrides),
        );

        let config: RegistryConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        debug!(
            resolution_mode = %config.resolution_mode,
            decoder_field = %config.decoder_field,
            scope_fallback = config.scope_fallback,
            max_type_name_length = config.max_type_name_length,
            "Registry configuration loaded"
        );

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolutionMode;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_config(extension: &str, contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(extension)
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn no_overrides() -> Vec<(String, String)> {
        Vec::new()
    }

    #[test]
    fn test_defaults_without_sources() {
        let config = ConfigLoader::load_with_overrides(None, no_overrides()).unwrap();
        assert_eq!(config, RegistryConfig::default());
    }

    #[test]
    fn test_load_toml_file() {
        let file = temp_config(
            ".toml",
            r#"
resolution_mode = "at_least_once"
decoder_field = "DECODER"
"#,
        );

        let config = ConfigLoader::load_with_overrides(Some(file.path()), no_overrides()).unwrap();
        assert_eq!(config.resolution_mode, ResolutionMode::AtLeastOnce);
        assert_eq!(config.decoder_field, "DECODER");
        assert!(config.scope_fallback);
    }

    #[test]
    fn test_load_yaml_file() {
        let file = temp_config(
            ".yaml",
            "scope_fallback: false\nmax_type_name_length: 256\n",
        );

        let config = ConfigLoader::load_with_overrides(Some(file.path()), no_overrides()).unwrap();
        assert!(!config.scope_fallback);
        assert_eq!(config.max_type_name_length, 256);
    }

    #[test]
    fn test_overrides_win_over_file() {
        let file = temp_config(".toml", "resolution_mode = \"at_least_once\"\n");

        let config = ConfigLoader::load_with_overrides(
            Some(file.path()),
            vec![
                ("PARCEL_REGISTRY_RESOLUTION_MODE", "exactly_once"),
                ("PARCEL_REGISTRY_MAX_TYPE_NAME_LENGTH", "128"),
                ("UNRELATED_VARIABLE", "ignored"),
            ],
        )
        .unwrap();

        assert_eq!(config.resolution_mode, ResolutionMode::ExactlyOnce);
        assert_eq!(config.max_type_name_length, 128);
    }

    #[test]
    fn test_missing_file() {
        let result = ConfigLoader::load_from_path("/nonexistent/parcel-registry.toml");
        assert!(matches!(
            result,
            Err(ConfigurationError::ConfigFileNotFound { .. })
        ));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let file = temp_config(".toml", "max_type_name_length = 0\n");
        let result = ConfigLoader::load_with_overrides(Some(file.path()), no_overrides());
        assert!(matches!(
            result,
            Err(ConfigurationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_unknown_mode_is_a_load_error() {
        let result = ConfigLoader::load_with_overrides(
            None,
            vec![("PARCEL_REGISTRY_RESOLUTION_MODE", "sometimes")],
        );
        assert!(matches!(result, Err(ConfigurationError::Load(_))));
    }
}
