//! Runtime configuration and its environment loader.

use std::env;
use std::path::PathBuf;

use crate::events::DEFAULT_EVENT_CAPACITY;

/// Runtime configuration shared across the arena and its workers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Per-topic broadcast capacity.
    pub event_buffer_size: usize,
    /// Per-entity command queue size.
    pub command_buffer_size: usize,
    /// Save entities whose policy asks for it to `save_data_dir` on death.
    pub enable_persistence: bool,
    pub save_data_dir: PathBuf,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: DEFAULT_EVENT_CAPACITY,
            command_buffer_size: 32,
            enable_persistence: false,
            save_data_dir: PathBuf::from("./saves"),
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `COMBAT_EVENT_BUFFER` - Per-topic event capacity (default: 128)
    /// - `COMBAT_COMMAND_BUFFER` - Per-entity command queue (default: 32)
    /// - `ENABLE_PERSISTENCE` - Save entities on death (default: false)
    /// - `SAVE_DATA_DIR` - Directory for saved entities (default: ./saves)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(capacity) = read_env::<usize>("COMBAT_EVENT_BUFFER") {
            config.event_buffer_size = capacity.max(1);
        }
        if let Some(capacity) = read_env::<usize>("COMBAT_COMMAND_BUFFER") {
            config.command_buffer_size = capacity.max(1);
        }
        if let Some(enabled) = read_env_bool("ENABLE_PERSISTENCE") {
            config.enable_persistence = enabled;
        }
        if let Some(dir) = read_env::<PathBuf>("SAVE_DATA_DIR") {
            config.save_data_dir = dir;
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    parse_bool(&env::var(key).ok()?)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
