//! SDK installation steps: command-line tools, packages, system images and apksigner

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::{ProvisioningOrchestrator, track};
use crate::catalog::{SYSTEM_IMAGES_PREFIX, parse_packages};
use crate::config::SdkLayout;
use crate::config::layout::APK_SIGNER_FILE;
use crate::error::{ProvisionError, Result};
use crate::process::ProcessOptions;
use crate::selector::{BlankInput, QUIT_SENTINEL, Selection, Selector};
use crate::ui::display;

/// Installed with every SDK, before any system image
pub const COMMON_PACKAGES: [&str; 9] = [
    "extras;google;usb_driver",
    "extras;google;webdriver",
    "platform-tools",
    "emulator",
    "cmdline-tools;latest",
    "extras;intel;Hardware_Accelerated_Execution_Manager",
    "extras;google;Android_Emulator_Hypervisor_Driver",
    "platforms;android-30",
    "build-tools;30.0.3",
];

impl ProvisioningOrchestrator<'_> {
    /// The redirect document holds the real archive URL; the archive must contain both
    /// managers.
    pub(super) fn install_cmdline_tools(&mut self) -> Result<()> {
        let redirect_url = self.config.cmdline_tools_redirect_url.clone();
        let downloader = self.downloader;
        let response = track(
            &mut *self.reporter,
            "Resolving command-line tools download",
            || downloader.get(&redirect_url)?.ensure_ok(&redirect_url),
        )?;
        let archive_url = response.body.trim().to_string();
        tracing::debug!("Command-line tools archive: {archive_url}");

        let dest = self.layout.cmdline_tools_dir();
        let files = self.download_and_unzip(&archive_url, &dest)?;

        for required in [
            SdkLayout::avd_manager_rel_path(),
            SdkLayout::sdk_manager_rel_path(),
        ] {
            if !files.iter().any(|file| file.ends_with(&required)) {
                return Err(ProvisionError::MissingAfterExtract {
                    path: required.display().to_string(),
                    location: dest.display().to_string(),
                });
            }
        }
        Ok(())
    }

    pub(super) fn install_common_packages(&mut self) -> Result<()> {
        let sdk_manager = self.layout.sdk_manager();
        let mut args = self.sdk_manager_args("--install");
        args.extend(COMMON_PACKAGES.iter().map(ToString::to_string));

        self.run_tool(
            "Installing common Android SDK packages",
            &sdk_manager,
            &args,
            &ProcessOptions::in_dir_of(&sdk_manager),
        )?;
        Ok(())
    }

    /// Offer the available system images until the user quits; always-override mode
    /// installs the default once.
    pub(super) fn install_system_images(&mut self) -> Result<()> {
        let sdk_manager = self.layout.sdk_manager();
        let options = ProcessOptions::in_dir_of(&sdk_manager);

        let list_args = self.sdk_manager_args("--list");
        let listing = self.run_tool(
            "Listing available system images",
            &sdk_manager,
            &list_args,
            &options,
        )?;
        let available = parse_packages(&listing.stdout, SYSTEM_IMAGES_PREFIX);
        tracing::debug!("{} system images available", available.len());

        if self.session.downgrade_system_image(&available) {
            tracing::info!(
                "Default system image is not available; using {}",
                self.session.default_system_image()
            );
        }

        let default = self.session.default_system_image().to_string();
        let always_override = self.session.always_override;
        let lines = display::package_listing("Available System Images", &available);
        let selector = Selector::new(format!(
            "Enter the system image to install (default: {default}), {QUIT_SENTINEL} to end:"
        ))
        .listing(&lines)
        .default_value(&default)
        .on_blank(BlankInput::UseDefault)
        .unknown_label("Unknown system image specified");

        loop {
            match selector.select(&available, always_override, &mut *self.prompter)? {
                Selection::Accepted(image) => {
                    let mut args = self.sdk_manager_args("--install");
                    args.push(image.clone());
                    self.run_tool(&format!("Installing {image}"), &sdk_manager, &args, &options)?;
                    tracing::info!("Installed {image}");
                }
                Selection::Unmatched(image) => {
                    tracing::warn!("System image {image} is not available; nothing installed");
                }
                Selection::Quit => break,
            }

            if always_override {
                break;
            }
        }
        Ok(())
    }

    /// Copy the first `apksigner.jar` found under build-tools to `tools/lib`
    pub(super) fn copy_apk_signer(&self) -> Result<()> {
        let source = find_apk_signer(&self.layout.build_tools_dir())?;
        let dest = self.layout.apk_signer_dest();
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| ProvisionError::file_write(parent, &e))?;
        }
        fs::copy(&source, &dest).map_err(|e| ProvisionError::file_write(&dest, &e))?;

        tracing::debug!(
            "Copied {} to {}",
            source.display(),
            dest.display()
        );
        Ok(())
    }
}

/// First `apksigner.jar` below `build_tools`, walking entries in name order
fn find_apk_signer(build_tools: &Path) -> Result<PathBuf> {
    WalkDir::new(build_tools)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
        .find(|entry| entry.file_type().is_file() && entry.file_name() == APK_SIGNER_FILE)
        .map(walkdir::DirEntry::into_path)
        .ok_or_else(|| ProvisionError::ToolNotFound {
            file: APK_SIGNER_FILE.to_string(),
            location: build_tools.display().to_string(),
        })
}
