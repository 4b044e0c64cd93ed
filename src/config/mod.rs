//! Configuration handling for avd-setup
//!
//! This module contains:
//! - `provision` - the optional YAML configuration file and its defaults
//! - `layout` - every filesystem location derived from the configuration

pub mod layout;
pub mod provision;

// Re-export commonly used types
pub use layout::SdkLayout;
pub use provision::ProvisionConfig;

/// Environment variable pointing at a configuration file (same as `--config`)
pub const CONFIG_ENV: &str = "AVD_SETUP_CONFIG";

/// Environment variable overriding the SDK home directory
pub const SDK_HOME_ENV: &str = "AVD_SETUP_SDK_HOME";

/// Environment variable overriding the AVD home directory (shared with the Android tools)
pub const AVD_HOME_ENV: &str = "ANDROID_AVD_HOME";
