//! Configuration loading logic
//!
//! Handles loading the configuration file, applying environment overrides,
//! and validating picker colors.

use super::{paths, schema::Config};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration
    ///
    /// Precedence order (highest to lowest):
    /// 1. Environment variable overrides
    /// 2. Root config file
    /// 3. Built-in defaults
    pub fn load() -> Result<Config> {
        let mut config = match Self::load_file(&paths::root_config_path()) {
            Ok(file_config) => file_config,
            Err(_) => Self::load_defaults(),
        };

        config = Self::apply_env_overrides(config);
        Self::sanitize_colors(&mut config);

        Ok(config)
    }

    /// Load configuration from a file
    pub fn load_file(path: &PathBuf) -> Result<Config> {
        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found: {}", path.display()));
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate the configuration file without loading it into the session
    ///
    /// Fails on invalid YAML syntax, invalid value types, file read errors,
    /// and unparseable picker colors.
    pub fn validate() -> Result<()> {
        let root_path = paths::root_config_path();
        if root_path.exists() {
            let config = Self::load_file(&root_path)?;
            for (name, value) in &config.picker.colors {
                value.parse::<csscolorparser::Color>().map_err(|e| {
                    anyhow::anyhow!("picker.colors.{} is not a valid color ({}): {}", name, value, e)
                })?;
            }
        }
        Ok(())
    }

    /// Load default configuration
    pub fn load_defaults() -> Config {
        Config::default()
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(mut config: Config) -> Config {
        if let Ok(read_only) = std::env::var("KUBENAV_READ_ONLY") {
            if let Ok(val) = read_only.parse::<bool>() {
                config.read_only = val;
            }
        }

        if let Ok(namespace) = std::env::var("KUBENAV_DEFAULT_NAMESPACE") {
            config.default_namespace = namespace;
        }

        if let Ok(fzf) = std::env::var("KUBENAV_FZF") {
            config.picker.path = fzf;
        }

        if let Ok(kubectl) = std::env::var("KUBENAV_KUBECTL") {
            config.kubectl_path = kubectl;
        }

        config
    }

    /// Replace unparseable picker colors with the defaults, with a warning
    ///
    /// fzf silently mis-renders bad color specs; catching them here keeps
    /// the picker legible.
    fn sanitize_colors(config: &mut Config) {
        let defaults = super::schema::PickerConfig::default().colors;
        let mut bad: Vec<String> = Vec::new();
        for (name, value) in &config.picker.colors {
            if value.parse::<csscolorparser::Color>().is_err() {
                bad.push(name.clone());
            }
        }
        for name in bad {
            let replacement = defaults.get(&name).cloned();
            tracing::warn!(
                "Invalid picker color '{}' = {:?}, using default",
                name,
                config.picker.colors.get(&name)
            );
            match replacement {
                Some(value) => {
                    config.picker.colors.insert(name, value);
                }
                None => {
                    config.picker.colors.remove(&name);
                }
            }
        }
    }

    /// Save configuration to a file
    pub fn save(config: &Config, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            paths::ensure_dir(parent)?;
        }

        let yaml =
            serde_yaml::to_string(config).context("Failed to serialize configuration to YAML")?;

        std::fs::write(path, yaml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Save root configuration
    pub fn save_root(config: &Config) -> Result<()> {
        Self::save(config, &paths::root_config_path())
    }
}
