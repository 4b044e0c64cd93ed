//! Provisioning configuration file
//!
//! All fields are optional in YAML; anything missing falls back to the built-in
//! defaults below. A typical override file only changes the download locations:
//!
//! ```yaml
//! license_bundle_url: https://mirror.example.com/android/android_sdk_license.zip
//! skins_bundle_url: https://mirror.example.com/android/android_skins.zip
//! download_timeout_secs: 1200
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ProvisionError, Result};

const DISTRIBUTION_BASE_URL: &str = "https://avd-setup.github.io/distribution/android";

pub const DEFAULT_AVD: &str = "Pixel_04a";
pub const DEFAULT_SYSTEM_IMAGE_64: &str = "system-images;android-30;google_apis;x86_64";
pub const DEFAULT_SYSTEM_IMAGE_32: &str = "system-images;android-30;google_apis;x86";
pub const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 600;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisionConfig {
    /// SDK home; `AVD_SETUP_SDK_HOME` takes precedence
    pub sdk_home: Option<PathBuf>,
    /// AVD home; `ANDROID_AVD_HOME` takes precedence
    pub avd_home: Option<PathBuf>,
    /// Plain-text document whose body is the URL of the command-line tools archive
    pub cmdline_tools_redirect_url: String,
    pub license_bundle_url: String,
    pub skins_bundle_url: String,
    /// JSON document listing emulator vendors and products
    pub emulator_catalog_url: String,
    pub default_avd: String,
    pub system_image_64: String,
    pub system_image_32: String,
    pub download_timeout_secs: u64,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            sdk_home: None,
            avd_home: None,
            cmdline_tools_redirect_url: format!("{DISTRIBUTION_BASE_URL}/cmdline-tools-url.txt"),
            license_bundle_url: format!("{DISTRIBUTION_BASE_URL}/android_sdk_license.zip"),
            skins_bundle_url: format!("{DISTRIBUTION_BASE_URL}/android_skins.zip"),
            emulator_catalog_url: format!("{DISTRIBUTION_BASE_URL}/android-emulators.json"),
            default_avd: DEFAULT_AVD.to_string(),
            system_image_64: DEFAULT_SYSTEM_IMAGE_64.to_string(),
            system_image_32: DEFAULT_SYSTEM_IMAGE_32.to_string(),
            download_timeout_secs: DEFAULT_DOWNLOAD_TIMEOUT_SECS,
        }
    }
}

impl ProvisionConfig {
    /// Parse configuration from YAML
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load configuration from `path`, or the defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = fs::read_to_string(path).map_err(|e| ProvisionError::ConfigReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::from_yaml(&content).map_err(|e| match e {
            ProvisionError::ConfigParseFailed { reason, .. } => {
                ProvisionError::ConfigParseFailed {
                    path: path.display().to_string(),
                    reason,
                }
            }
            other => other,
        })
    }

    /// Default system image for a host of the given pointer width
    pub fn system_image_for_arch(&self, arch_bits: u32) -> &str {
        if arch_bits == 64 {
            &self.system_image_64
        } else {
            &self.system_image_32
        }
    }
}
