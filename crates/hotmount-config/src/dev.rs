//! Development server configuration types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct DevSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directories to watch, relative to the project root (defaults to the root)
    #[serde(default)]
    pub watch_paths: Vec<PathBuf>,

    /// Path fragments and `*.ext` patterns excluded from watching
    #[serde(default = "default_ignore")]
    pub ignore: Vec<String>,

    /// Window in which repeated events for one file collapse into one
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Delay between a file change and the server restart it schedules
    #[serde(default)]
    pub restart_debounce_ms: u64,

    /// Server-Sent Events endpoint for reload notifications
    #[serde(default = "default_events_path")]
    pub events_path: String,
}

impl Default for DevSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            watch_paths: Vec::new(),
            ignore: default_ignore(),
            debounce_ms: default_debounce_ms(),
            restart_debounce_ms: 0,
            events_path: default_events_path(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    3000
}

fn default_ignore() -> Vec<String> {
    ["target", "node_modules", "dist", "*.log", "*.swp"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_debounce_ms() -> u64 {
    100
}

fn default_events_path() -> String {
    "/__hotmount/events".into()
}
