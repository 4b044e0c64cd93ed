//! Virtual-device `config.ini` patching
//!
//! `avdmanager` writes a generic hardware profile. Before the platform can drive the
//! device, the hardware and skin keys are replaced with values derived from the catalog
//! product: every line whose key is in [`DENY_KEYS`] is dropped and the entries from
//! [`hardware_entries`] are appended.

use std::fs;
use std::path::Path;

use crate::catalog::EmulatorProduct;
use crate::error::{ProvisionError, Result};

/// Keys removed from the generated profile
pub const DENY_KEYS: [&str; 12] = [
    "hw.dPad",
    "hw.gpu.enabled",
    "hw.keyboard",
    "hw.lcd.density",
    "hw.lcd.height",
    "hw.lcd.width",
    "hw.mainKeys",
    "hw.ramSize",
    "hw.trackBall",
    "skin.dynamic",
    "skin.name",
    "skin.path",
];

const LCD_DENSITY: u32 = 480;
const RAM_SIZE_MB: u32 = 1536;

/// Split `WIDTHxHEIGHT` on the first `x`
pub fn split_resolution(resolution: &str) -> Result<(String, String)> {
    let invalid = || ProvisionError::InvalidResolution {
        resolution: resolution.to_string(),
    };

    let (width, height) = resolution.split_once('x').ok_or_else(invalid)?;
    let (width, height) = (width.trim(), height.trim());
    if width.is_empty() || height.is_empty() {
        return Err(invalid());
    }
    Ok((width.to_string(), height.to_string()))
}

/// Entries appended to the profile of `product`, in write order
pub fn hardware_entries(product: &EmulatorProduct, skins_dir: &Path) -> Result<Vec<String>> {
    let (width, height) = split_resolution(&product.resolution)?;
    let skin_path = skins_dir.join(&product.skin);

    Ok(vec![
        "hw.dPad=no".to_string(),
        "hw.gpu.enabled=yes".to_string(),
        "hw.keyboard=yes".to_string(),
        "hw.mainKeys=no".to_string(),
        "hw.trackBall=no".to_string(),
        "skin.dynamic=yes".to_string(),
        format!("hw.lcd.density={LCD_DENSITY}"),
        format!("hw.lcd.height={height}"),
        format!("hw.lcd.width={width}"),
        format!("hw.ramSize={RAM_SIZE_MB}"),
        format!("skin.name={}", product.skin),
        format!("skin.path={}", skin_path.display()),
    ])
}

/// Text before the first `=`, trimmed; the whole trimmed line when there is none
fn line_key(line: &str) -> &str {
    line.split_once('=').map_or(line, |(key, _)| key).trim()
}

/// Drop lines keyed in `deny` and append `add`.
///
/// Surviving lines keep their order. `add` is appended as is, so a key that is in `add`
/// but not in `deny` ends up in the result twice.
pub fn patch_lines<S: AsRef<str>>(lines: &[S], deny: &[&str], add: &[String]) -> Vec<String> {
    lines
        .iter()
        .map(AsRef::as_ref)
        .filter(|line| !deny.contains(&line_key(line)))
        .map(str::to_string)
        .chain(add.iter().cloned())
        .collect()
}

/// Rewrite the config file at `path` through [`patch_lines`]
pub fn patch_config_file(path: &Path, deny: &[&str], add: &[String]) -> Result<()> {
    let content = fs::read_to_string(path).map_err(|e| ProvisionError::file_read(path, &e))?;
    let lines: Vec<&str> = content.lines().collect();
    let patched = patch_lines(&lines, deny, add);

    let mut output = patched.join("\n");
    output.push('\n');
    fs::write(path, output).map_err(|e| ProvisionError::file_write(path, &e))?;

    tracing::debug!("Patched {} ({} entries)", path.display(), patched.len());
    Ok(())
}
