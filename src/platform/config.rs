//! Bridge configuration
//!
//! A small JSON document; every field has a default so an empty object
//! (or no file at all) yields a working bridge.

use crate::proof::DecodePolicy;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_METHOD_CHANNEL: &str = "mopro_flutter";
pub const DEFAULT_EVENT_CHANNEL: &str = "com.example.moprowallet/events";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

/// Configuration for a platform bridge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Method channel the UI shell calls proof commands on
    pub method_channel: String,
    /// Event channel deep links are streamed on
    pub event_channel: String,
    /// How missing curve points in incoming proofs are treated
    pub decode_policy: DecodePolicy,
    /// env_logger filter used by the host binary
    pub log_filter: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            method_channel: DEFAULT_METHOD_CHANNEL.to_string(),
            event_channel: DEFAULT_EVENT_CHANNEL.to_string(),
            decode_policy: DecodePolicy::FillDefaults,
            log_filter: "info".to_string(),
        }
    }
}

impl BridgeConfig {
    /// Read and parse a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        info!("Loaded bridge config from {}", path.display());
        Ok(config)
    }

    /// Like `load`, but a missing file yields the defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
