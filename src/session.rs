//! Provisioning session
//!
//! Everything the user decided on the command line, plus the defaults derived from the
//! configuration. The session is built once in `main` and borrowed by every step.

use std::path::{Path, PathBuf};

use crate::catalog::SdkPackage;
use crate::config::ProvisionConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningSession {
    pub project_home: PathBuf,
    pub verbose: bool,
    /// Non-interactive mode: accept every default, never prompt
    pub always_override: bool,
    pub default_avd_name: String,
    default_system_image: String,
    fallback_system_image: String,
}

impl ProvisioningSession {
    pub fn new(
        project_home: &Path,
        verbose: bool,
        always_override: bool,
        config: &ProvisionConfig,
    ) -> Self {
        Self {
            project_home: normalize_separators(project_home),
            verbose,
            always_override,
            default_avd_name: config.default_avd.clone(),
            default_system_image: config.system_image_for_arch(host_arch_bits()).to_string(),
            fallback_system_image: config.system_image_32.clone(),
        }
    }

    pub fn default_system_image(&self) -> &str {
        &self.default_system_image
    }

    /// Switch the default system image to the 32-bit one when the 64-bit default is not
    /// offered. Returns true when the default changed.
    pub fn downgrade_system_image(&mut self, available: &[SdkPackage]) -> bool {
        if host_arch_bits() != 64
            || available
                .iter()
                .any(|p| p.id == self.default_system_image)
        {
            return false;
        }

        tracing::debug!(
            "{} is not available; falling back to {}",
            self.default_system_image,
            self.fallback_system_image
        );
        self.default_system_image = self.fallback_system_image.clone();
        true
    }

    /// Image offered by default for a new emulator: the session default when installed,
    /// otherwise the 32-bit image, otherwise the first installed image
    pub fn emulator_system_image<'a>(&'a self, installed: &'a [SdkPackage]) -> &'a str {
        [&self.default_system_image, &self.fallback_system_image]
            .into_iter()
            .find(|image| installed.iter().any(|p| &p.id == *image))
            .map(String::as_str)
            .or_else(|| installed.first().map(|p| p.id.as_str()))
            .unwrap_or(self.default_system_image.as_str())
    }
}

pub fn host_arch_bits() -> u32 {
    if cfg!(target_pointer_width = "64") {
        64
    } else {
        32
    }
}

/// Rewrite both separator styles to the host's one
fn normalize_separators(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    let normalized = if cfg!(windows) {
        raw.replace('/', "\\")
    } else {
        raw.replace('\\', "/")
    };
    PathBuf::from(normalized)
}
