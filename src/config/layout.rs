//! Filesystem layout of a provisioned SDK
//!
//! Every path the orchestrator touches is derived here so that tests can point the
//! whole pipeline at a temporary directory.

use std::path::{Path, PathBuf};

use super::{AVD_HOME_ENV, ProvisionConfig, SDK_HOME_ENV};
use crate::error::{ProvisionError, Result};

/// SDK home relative to the user home when nothing overrides it
const DEFAULT_SDK_REL_PATH: &str = ".avd-setup/android/sdk";

/// AVD home relative to the user home when nothing overrides it
const DEFAULT_AVD_REL_PATH: &str = ".android/avd";

const CMDLINE_TOOLS_DIR: &str = "cmdline-tools";
const LICENSES_DIR: &str = "licenses";
const SKINS_DIR: &str = "skins";
const BUILD_TOOLS_DIR: &str = "build-tools";

/// Signing tool searched under build-tools and copied next to the legacy tools
pub const APK_SIGNER_FILE: &str = "apksigner.jar";

#[cfg(windows)]
const TOOL_EXT: &str = ".bat";
#[cfg(not(windows))]
const TOOL_EXT: &str = "";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkLayout {
    pub home: PathBuf,
    pub sdk_home: PathBuf,
    pub avd_home: PathBuf,
}

impl SdkLayout {
    pub fn new(home: PathBuf, sdk_home: PathBuf, avd_home: PathBuf) -> Self {
        Self {
            home,
            sdk_home,
            avd_home,
        }
    }

    /// Resolve the layout: environment first, then the configuration file, then defaults
    pub fn resolve(config: &ProvisionConfig) -> Result<Self> {
        let home = dirs::home_dir().ok_or(ProvisionError::HomeDirUnavailable)?;

        let sdk_home = std::env::var_os(SDK_HOME_ENV)
            .map(PathBuf::from)
            .or_else(|| config.sdk_home.clone())
            .unwrap_or_else(|| home.join(DEFAULT_SDK_REL_PATH));

        let avd_home = std::env::var_os(AVD_HOME_ENV)
            .map(PathBuf::from)
            .or_else(|| config.avd_home.clone())
            .unwrap_or_else(|| home.join(DEFAULT_AVD_REL_PATH));

        Ok(Self::new(home, sdk_home, avd_home))
    }

    /// Directory the command-line tools archive is unpacked into
    pub fn cmdline_tools_dir(&self) -> PathBuf {
        self.sdk_home.join(CMDLINE_TOOLS_DIR)
    }

    /// `sdkmanager` path relative to [`Self::cmdline_tools_dir`]
    pub fn sdk_manager_rel_path() -> PathBuf {
        Path::new(CMDLINE_TOOLS_DIR)
            .join("bin")
            .join(format!("sdkmanager{TOOL_EXT}"))
    }

    /// `avdmanager` path relative to [`Self::cmdline_tools_dir`]
    pub fn avd_manager_rel_path() -> PathBuf {
        Path::new(CMDLINE_TOOLS_DIR)
            .join("bin")
            .join(format!("avdmanager{TOOL_EXT}"))
    }

    pub fn sdk_manager(&self) -> PathBuf {
        self.cmdline_tools_dir().join(Self::sdk_manager_rel_path())
    }

    pub fn avd_manager(&self) -> PathBuf {
        self.cmdline_tools_dir().join(Self::avd_manager_rel_path())
    }

    pub fn licenses_dir(&self) -> PathBuf {
        self.sdk_home.join(LICENSES_DIR)
    }

    pub fn skins_dir(&self) -> PathBuf {
        self.sdk_home.join(SKINS_DIR)
    }

    pub fn build_tools_dir(&self) -> PathBuf {
        self.sdk_home.join(BUILD_TOOLS_DIR)
    }

    pub fn apk_signer_dest(&self) -> PathBuf {
        self.sdk_home.join("tools").join("lib").join(APK_SIGNER_FILE)
    }

    /// `config.ini` of the AVD created as `avd_id`
    pub fn avd_config_ini(&self, avd_id: &str) -> PathBuf {
        self.avd_home
            .join(format!("{avd_id}.avd"))
            .join("config.ini")
    }

    /// SDK home as written into generated scripts: relative to the user home when the SDK
    /// lives there, absolute otherwise
    pub fn sdk_rel_path(&self) -> String {
        match self.sdk_home.strip_prefix(&self.home) {
            Ok(rel) => rel.display().to_string(),
            Err(_) => self.sdk_home.display().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn layout() -> SdkLayout {
        SdkLayout::new(
            PathBuf::from("/home/tester"),
            PathBuf::from("/home/tester/.avd-setup/android/sdk"),
            PathBuf::from("/home/tester/.android/avd"),
        )
    }

    #[test]
    fn test_tool_paths() {
        let layout = layout();
        assert!(
            layout
                .sdk_manager()
                .starts_with("/home/tester/.avd-setup/android/sdk/cmdline-tools/cmdline-tools/bin")
        );
        assert!(layout.avd_manager().ends_with(SdkLayout::avd_manager_rel_path()));
        assert_eq!(
            layout.apk_signer_dest(),
            PathBuf::from("/home/tester/.avd-setup/android/sdk/tools/lib/apksigner.jar")
        );
    }

    #[test]
    fn test_avd_config_ini() {
        assert_eq!(
            layout().avd_config_ini("pixel_4a"),
            PathBuf::from("/home/tester/.android/avd/pixel_4a.avd/config.ini")
        );
    }

    #[test]
    fn test_sdk_rel_path_under_home() {
        assert_eq!(layout().sdk_rel_path(), ".avd-setup/android/sdk");
    }

    #[test]
    fn test_sdk_rel_path_outside_home() {
        let mut layout = layout();
        layout.sdk_home = PathBuf::from("/opt/android/sdk");
        assert_eq!(layout.sdk_rel_path(), "/opt/android/sdk");
    }

    #[test]
    #[serial]
    fn test_resolve_prefers_environment() {
        let temp = crate::test_fixtures::create_temp_dir();
        let config = ProvisionConfig {
            sdk_home: Some(PathBuf::from("/from/config/sdk")),
            avd_home: Some(PathBuf::from("/from/config/avd")),
            ..ProvisionConfig::default()
        };

        // SAFETY: serialised with every other test touching these variables
        unsafe {
            std::env::set_var(SDK_HOME_ENV, temp.path().join("sdk"));
            std::env::remove_var(AVD_HOME_ENV);
        }
        let layout = SdkLayout::resolve(&config);
        unsafe {
            std::env::remove_var(SDK_HOME_ENV);
        }

        let layout = layout.unwrap();
        assert_eq!(layout.sdk_home, temp.path().join("sdk"));
        assert_eq!(layout.avd_home, PathBuf::from("/from/config/avd"));
    }

    #[test]
    #[serial]
    fn test_resolve_defaults_under_home() {
        // SAFETY: serialised with every other test touching these variables
        unsafe {
            std::env::remove_var(SDK_HOME_ENV);
            std::env::remove_var(AVD_HOME_ENV);
        }
        let Ok(layout) = SdkLayout::resolve(&ProvisionConfig::default()) else {
            return;
        };
        assert!(layout.sdk_home.starts_with(&layout.home));
        assert!(layout.avd_home.ends_with(".android/avd"));
    }
}
