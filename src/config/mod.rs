//! Configuration system for kubenav
//!
//! YAML configuration with platform-appropriate paths, environment variable
//! overrides, and `kubenav config` subcommand support.

pub mod loader;
pub mod paths;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::Config;
#[allow(unused_imports)] // Public API exports
pub use schema::{LoggerConfig, PickerConfig};

/// Get a configuration value by key (dot notation)
pub fn get_config_value(config: &schema::Config, key: &str) -> anyhow::Result<String> {
    match key {
        "readOnly" => Ok(config.read_only.to_string()),
        "defaultNamespace" => Ok(config.default_namespace.clone()),
        "kubectlPath" => Ok(config.kubectl_path.clone()),
        "picker.path" => Ok(config.picker.path.clone()),
        "picker.layout" => Ok(config.picker.layout.clone()),
        "picker.border" => Ok(config.picker.border.clone()),
        "picker.margin" => Ok(config.picker.margin.clone()),
        "logger.tail" => Ok(config.logger.tail.to_string()),
        "logger.sinceSeconds" => Ok(config.logger.since_seconds.to_string()),
        _ => Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }
}

/// Set a configuration value by key (dot notation)
pub fn set_config_value(config: &mut schema::Config, key: &str, value: &str) -> anyhow::Result<()> {
    use anyhow::Context;
    match key {
        "readOnly" => {
            config.read_only = value
                .parse()
                .context("readOnly must be 'true' or 'false'")?;
        }
        "defaultNamespace" => {
            config.default_namespace = value.to_string();
        }
        "kubectlPath" => {
            config.kubectl_path = value.to_string();
        }
        "picker.path" => {
            config.picker.path = value.to_string();
        }
        "picker.layout" => {
            config.picker.layout = value.to_string();
        }
        "picker.border" => {
            config.picker.border = value.to_string();
        }
        "picker.margin" => {
            config.picker.margin = value.to_string();
        }
        "logger.tail" => {
            config.logger.tail = value.parse().context("logger.tail must be a number")?;
        }
        "logger.sinceSeconds" => {
            config.logger.since_seconds = value
                .parse()
                .context("logger.sinceSeconds must be a number")?;
        }
        _ => return Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }

    Ok(())
}
