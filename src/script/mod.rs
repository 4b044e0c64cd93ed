//! Helper scripts written into the project
//!
//! Templates are compiled into the binary and rendered with plain literal substitution
//! of `${...}` tokens. Unix-like hosts get `.sh` scripts, Windows gets `.cmd` batches.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ProvisionError, Result};

pub const GENERATOR_SIGNATURE: &str = "avd-setup Android Setup Helper";

pub const TOKEN_SDK_REL_PATH: &str = "${sdk.rel.path}";
pub const TOKEN_SIGNATURE: &str = "${generator.signature}";
pub const TOKEN_TIMESTAMP: &str = "${generated.timestamp}";
pub const TOKEN_AVD_ID: &str = "${avd.id}";
pub const TOKEN_SKIN: &str = "${skin}";

const SHOW_DEVICES_STEM: &str = "show-android-devices";
pub const RUN_EMULATOR_PREFIX: &str = "run-android-emulator-";

#[cfg(windows)]
pub const SCRIPT_EXT: &str = ".cmd";
#[cfg(not(windows))]
pub const SCRIPT_EXT: &str = ".sh";

#[cfg(windows)]
const SHOW_DEVICES_TEMPLATE: &str = include_str!("../../templates/show-android-devices.cmd");
#[cfg(not(windows))]
const SHOW_DEVICES_TEMPLATE: &str = include_str!("../../templates/show-android-devices.sh");

#[cfg(windows)]
const RUN_EMULATOR_TEMPLATE: &str = include_str!("../../templates/run-android-emulator.cmd");
#[cfg(not(windows))]
const RUN_EMULATOR_TEMPLATE: &str = include_str!("../../templates/run-android-emulator.sh");

/// Replace every occurrence of each token with its value
pub fn render(template: &str, tokens: &[(&str, &str)]) -> String {
    tokens
        .iter()
        .fold(template.to_string(), |text, (token, value)| {
            text.replace(token, value)
        })
}

/// `<project-home>/artifact/bin`
pub fn bin_dir(project_home: &Path) -> PathBuf {
    project_home.join("artifact").join("bin")
}

pub struct ScriptGenerator {
    bin_dir: PathBuf,
    sdk_rel_path: String,
    timestamp: String,
}

impl ScriptGenerator {
    pub fn new(project_home: &Path, sdk_rel_path: impl Into<String>) -> Self {
        Self {
            bin_dir: bin_dir(project_home),
            sdk_rel_path: sdk_rel_path.into(),
            timestamp: chrono::Local::now()
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
        }
    }

    pub fn show_devices_path(&self) -> PathBuf {
        self.bin_dir.join(format!("{SHOW_DEVICES_STEM}{SCRIPT_EXT}"))
    }

    pub fn run_emulator_path(&self, avd_id: &str) -> PathBuf {
        self.bin_dir
            .join(format!("{RUN_EMULATOR_PREFIX}{avd_id}{SCRIPT_EXT}"))
    }

    pub fn write_show_devices(&self) -> Result<PathBuf> {
        let content = render(SHOW_DEVICES_TEMPLATE, &self.common_tokens());
        let path = self.show_devices_path();
        write_script(&path, &content)?;
        Ok(path)
    }

    pub fn write_run_emulator(&self, avd_id: &str, skin: &str) -> Result<PathBuf> {
        let mut tokens = vec![(TOKEN_AVD_ID, avd_id), (TOKEN_SKIN, skin)];
        tokens.extend(self.common_tokens());

        let content = render(RUN_EMULATOR_TEMPLATE, &tokens);
        let path = self.run_emulator_path(avd_id);
        write_script(&path, &content)?;
        Ok(path)
    }

    /// Run-emulator scripts currently in the bin directory, sorted by name
    pub fn run_emulator_scripts(&self) -> Result<Vec<PathBuf>> {
        if !self.bin_dir.is_dir() {
            return Ok(Vec::new());
        }

        let entries =
            fs::read_dir(&self.bin_dir).map_err(|e| ProvisionError::file_read(&self.bin_dir, &e))?;
        let mut scripts: Vec<PathBuf> = entries
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| {
                        name.len() > RUN_EMULATOR_PREFIX.len() && name.starts_with(RUN_EMULATOR_PREFIX)
                    })
            })
            .collect();
        scripts.sort();
        Ok(scripts)
    }

    fn common_tokens(&self) -> [(&str, &str); 3] {
        [
            (TOKEN_SDK_REL_PATH, self.sdk_rel_path.as_str()),
            (TOKEN_SIGNATURE, GENERATOR_SIGNATURE),
            (TOKEN_TIMESTAMP, self.timestamp.as_str()),
        ]
    }
}

fn write_script(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ProvisionError::file_write(parent, &e))?;
    }
    fs::write(path, content).map_err(|e| ProvisionError::file_write(path, &e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))
            .map_err(|e| ProvisionError::file_write(path, &e))?;
    }

    tracing::debug!("Wrote {}", path.display());
    Ok(())
}
