//! Platform — the bridge entry point and its configuration

mod bridge;
pub mod config;

pub use bridge::{LinkSource, PlatformBridge, UserActivity, BROWSING_WEB_ACTIVITY};
pub use config::{BridgeConfig, ConfigError};
