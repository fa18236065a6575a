//! Settings loading from multiple sources

use crate::{ConfigError, EngineSettings, Result};
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use std::path::Path;
use tracing::debug;

/// Prefix for environment overrides, e.g. `GASLESS_SWAP_NETWORK__LOG_LEVEL`
pub const ENV_PREFIX: &str = "GASLESS_SWAP";

/// Settings loader with support for multiple formats and sources
pub struct SettingsLoader;

impl SettingsLoader {
    /// Load settings from a file
    ///
    /// Supports TOML, YAML, and JSON formats based on file extension
    pub fn from_file(path: &Path) -> Result<EngineSettings> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ConfigError::LoadError("No file extension found".to_string()))?;

        let content = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), "Loading settings file");

        match extension {
            "toml" => Self::from_toml(&content),
            "yaml" | "yml" => Self::from_yaml(&content),
            "json" => Self::from_json(&content),
            _ => Err(ConfigError::LoadError(format!(
                "Unsupported file extension: {}",
                extension
            ))),
        }
    }

    /// Load settings from TOML string
    pub fn from_toml(content: &str) -> Result<EngineSettings> {
        toml::from_str(content).map_err(ConfigError::from)
    }

    /// Load settings from YAML string
    pub fn from_yaml(content: &str) -> Result<EngineSettings> {
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }

    /// Load settings from JSON string
    pub fn from_json(content: &str) -> Result<EngineSettings> {
        serde_json::from_str(content).map_err(ConfigError::from)
    }

    /// Load settings from environment variables with the default prefix
    pub fn from_env() -> Result<EngineSettings> {
        Self::from_env_with_prefix(ENV_PREFIX)
    }

    /// Load settings from environment variables with custom prefix
    ///
    /// Sections are separated by a double underscore so keys can keep their
    /// own underscores: `PREFIX_ENGINE__CHAIN_ID=10`. The maintainer list is
    /// comma separated.
    pub fn from_env_with_prefix(prefix: &str) -> Result<EngineSettings> {
        Self::builder().add_env(prefix).build()
    }

    /// Load settings from file with environment variable overrides
    ///
    /// Keys set in the environment replace the same keys from the file;
    /// everything else comes from the file.
    pub fn from_file_with_env(path: &Path, env_prefix: &str) -> Result<EngineSettings> {
        if !path.exists() {
            return Err(ConfigError::LoadError(format!(
                "Settings file not found: {}",
                path.display()
            )));
        }

        Self::builder()
            .add_file(path, true)
            .add_env(env_prefix)
            .build()
    }

    /// Build settings using the config crate's builder pattern
    pub fn builder() -> SettingsLoaderBuilder {
        SettingsLoaderBuilder {
            builder: Config::builder(),
        }
    }
}

/// Builder for layered settings sources; later sources win
pub struct SettingsLoaderBuilder {
    builder: ConfigBuilder<config::builder::DefaultState>,
}

impl SettingsLoaderBuilder {
    /// Add a settings file source
    pub fn add_file(mut self, path: &Path, required: bool) -> Self {
        let format = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => FileFormat::Yaml,
            Some("json") => FileFormat::Json,
            _ => FileFormat::Toml,
        };

        self.builder = self
            .builder
            .add_source(File::from(path).format(format).required(required));
        self
    }

    /// Add environment variable source with prefix
    pub fn add_env(mut self, prefix: &str) -> Self {
        self.builder = self.builder.add_source(
            Environment::with_prefix(prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("maintainers"),
        );
        self
    }

    /// Set a default value for a key
    pub fn set_default(mut self, key: &str, value: &str) -> Result<Self> {
        self.builder = self.builder.set_default(key, value)?;
        Ok(self)
    }

    /// Set a value that overrides every source
    pub fn set_override(mut self, key: &str, value: &str) -> Result<Self> {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Build the final settings
    pub fn build(self) -> Result<EngineSettings> {
        let config = self.builder.build()?;
        config.try_deserialize().map_err(ConfigError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Environment as NetworkEnvironment, RoutingMode};
    use gasless_swap_types::{Address, FeeMode};
    use std::io::Write;

    const TOML: &str = r#"
        maintainers = ["0x0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b"]

        [network]
        environment = "testnet"
        log_level = "debug"
        metrics_enabled = true

        [engine]
        chain_id = 11155111
        engine_address = "0xe9e9e9e9e9e9e9e9e9e9e9e9e9e9e9e9e9e9e9e9"
        owner = "0x0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a"
        base_asset = "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee"
        exchange = "0x9999999999999999999999999999999999999999"
        routing = "routed"

        [fees]
        mode = "proportional"
        maintainer_fee = "150"
        treasury_fee = "150"
        max_fee = "500"
    "#;

    #[test]
    fn test_load_from_toml() {
        let settings = SettingsLoader::from_toml(TOML).unwrap();

        assert_eq!(settings.network.environment, NetworkEnvironment::Testnet);
        assert_eq!(settings.network.log_level, "debug");
        assert_eq!(settings.engine.chain_id, 11155111);
        assert_eq!(settings.engine.routing, RoutingMode::Routed);
        assert!(settings.engine.prevalidate_signatures);
        assert_eq!(settings.fees.mode, FeeMode::Proportional);
        assert_eq!(settings.maintainers, vec![Address::repeat_byte(0x0b)]);
    }

    #[test]
    fn test_load_from_yaml() {
        let yaml = r#"
network:
  environment: local
  log_level: trace

engine:
  engine_address: "0xe9e9e9e9e9e9e9e9e9e9e9e9e9e9e9e9e9e9e9e9"
  owner: "0x0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a"
  base_asset: "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee"
  exchange: "0x9999999999999999999999999999999999999999"
  prevalidate_signatures: false

maintainers:
  - "0x0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b"
        "#;

        let settings = SettingsLoader::from_yaml(yaml).unwrap();
        assert_eq!(settings.network.log_level, "trace");
        assert!(!settings.engine.prevalidate_signatures);
        assert_eq!(settings.engine.routing, RoutingMode::SingleHop);
        assert_eq!(settings.fees.mode, FeeMode::Fixed);
    }

    #[test]
    fn test_load_from_json() {
        let json = r#"
{
  "network": { "environment": "mainnet", "log_level": "info" },
  "engine": {
    "chain_id": 1,
    "engine_address": "0xe9e9e9e9e9e9e9e9e9e9e9e9e9e9e9e9e9e9e9e9",
    "owner": "0x0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a",
    "base_asset": "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee",
    "exchange": "0x9999999999999999999999999999999999999999"
  },
  "fees": { "mode": "fixed", "maintainer_fee": "0x2386f26fc10000" },
  "maintainers": []
}
        "#;

        let settings = SettingsLoader::from_json(json).unwrap();
        assert_eq!(settings.network.environment, NetworkEnvironment::Mainnet);
        assert_eq!(
            settings.fees.schedule().unwrap().maintainer_fee(),
            gasless_swap_types::U256::from(10_000_000_000_000_000u64)
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(TOML.as_bytes()).unwrap();

        let settings = SettingsLoader::from_file(file.path()).unwrap();
        assert_eq!(settings.network.log_level, "debug");
    }

    #[test]
    fn test_unsupported_extension() {
        let file = tempfile::Builder::new()
            .suffix(".ini")
            .tempfile()
            .unwrap();

        assert!(matches!(
            SettingsLoader::from_file(file.path()),
            Err(ConfigError::LoadError(_))
        ));
    }

    #[test]
    fn test_builder_override_wins() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(TOML.as_bytes()).unwrap();

        let settings = SettingsLoader::builder()
            .add_file(file.path(), true)
            .set_override("network.log_level", "warn")
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(settings.network.log_level, "warn");
        assert_eq!(settings.engine.chain_id, 11155111);
    }
}
