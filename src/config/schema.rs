//! Configuration schema definitions
//!
//! Defines the structure of the configuration file using serde for
//! serialization.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Refuse all mutating operations (delete, edit, scale, ...)
    #[serde(default = "default_read_only")]
    pub read_only: bool,

    /// Namespace to pre-select on startup ("" means prompt, "all" spans all)
    #[serde(default = "default_namespace")]
    pub default_namespace: String,

    /// kubectl binary used for interactive operations
    #[serde(default = "default_kubectl_path")]
    pub kubectl_path: String,

    /// Picker (fzf) configuration
    #[serde(default)]
    pub picker: PickerConfig,

    /// Log-view configuration
    #[serde(default)]
    pub logger: LoggerConfig,
}

/// Picker (fzf) configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PickerConfig {
    /// fzf binary path
    #[serde(default = "default_fzf_path")]
    pub path: String,

    /// Layout flag value (reverse puts the prompt on top)
    #[serde(default = "default_layout")]
    pub layout: String,

    /// Border style
    #[serde(default = "default_border")]
    pub border: String,

    /// Margin spec (vertical,horizontal)
    #[serde(default = "default_margin")]
    pub margin: String,

    /// fzf color-name to hex value
    #[serde(default = "default_colors", skip_serializing_if = "BTreeMap::is_empty")]
    pub colors: BTreeMap<String, String>,
}

/// Log-view configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoggerConfig {
    /// Default log line count for the foreground logs view
    #[serde(default = "default_log_tail")]
    pub tail: u32,

    /// Historical log timeframe in seconds for follow sessions
    #[serde(default = "default_log_since_seconds")]
    pub since_seconds: u64,
}

// Default value functions
fn default_read_only() -> bool {
    false
}

fn default_namespace() -> String {
    String::new()
}

fn default_kubectl_path() -> String {
    "kubectl".to_string()
}

fn default_fzf_path() -> String {
    "fzf".to_string()
}

fn default_layout() -> String {
    "reverse".to_string()
}

fn default_border() -> String {
    "rounded".to_string()
}

fn default_margin() -> String {
    "1,2".to_string()
}

/// Default picker palette
fn default_colors() -> BTreeMap<String, String> {
    [
        ("fg", "#d0d0d0"),
        ("bg", "#1b1b1b"),
        ("hl", "#00afff"),
        ("fg+", "#ffffff"),
        ("bg+", "#005f87"),
        ("hl+", "#00afff"),
        ("info", "#87ffaf"),
        ("prompt", "#ff5f00"),
        ("pointer", "#af00ff"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn default_log_tail() -> u32 {
    100
}

fn default_log_since_seconds() -> u64 {
    300
}

impl Default for Config {
    fn default() -> Self {
        Self {
            read_only: default_read_only(),
            default_namespace: default_namespace(),
            kubectl_path: default_kubectl_path(),
            picker: PickerConfig::default(),
            logger: LoggerConfig::default(),
        }
    }
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            path: default_fzf_path(),
            layout: default_layout(),
            border: default_border(),
            margin: default_margin(),
            colors: default_colors(),
        }
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            tail: default_log_tail(),
            since_seconds: default_log_since_seconds(),
        }
    }
}
