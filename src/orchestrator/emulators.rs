//! Emulator creation: catalog, selection, `avdmanager`, config patching, run scripts

use super::{ProvisioningOrchestrator, track};
use crate::avd;
use crate::catalog::{EmulatorCatalog, EmulatorProduct, SYSTEM_IMAGES_PREFIX, parse_packages};
use crate::error::Result;
use crate::process::ProcessOptions;
use crate::selector::{BlankInput, QUIT_SENTINEL, Selection, Selector};
use crate::ui::display;

/// Answer to avdmanager's "Do you wish to create a custom hardware profile?"
const NO_CUSTOM_HARDWARE: &str = "no\n";

impl ProvisioningOrchestrator<'_> {
    pub(super) fn install_emulators(&mut self) -> Result<()> {
        let catalog_url = self.config.emulator_catalog_url.clone();
        let downloader = self.downloader;
        let response = track(&mut *self.reporter, "Fetching emulator catalog", || {
            downloader.get(&catalog_url)?.ensure_ok(&catalog_url)
        })?;
        let catalog = EmulatorCatalog::from_json(&catalog_url, &response.body)?;
        let products = catalog.index()?;
        if products.is_empty() {
            tracing::warn!("Emulator catalog at {catalog_url} lists no emulators");
        } else {
            tracing::debug!("{} emulators in catalog", products.len());
        }

        let sdk_manager = self.layout.sdk_manager();
        let list_args = self.sdk_manager_args("--list_installed");
        let listing = self.run_tool(
            "Listing installed system images",
            &sdk_manager,
            &list_args,
            &ProcessOptions::in_dir_of(&sdk_manager),
        )?;
        let installed = parse_packages(&listing.stdout, SYSTEM_IMAGES_PREFIX);

        let default_avd = self.session.default_avd_name.clone();
        let default_image = self.session.emulator_system_image(&installed).to_string();
        if default_image != self.session.default_system_image() {
            tracing::info!("Default system image is not installed; using {default_image}");
        }
        let always_override = self.session.always_override;

        let emulator_lines = display::emulator_listing(&catalog.sorted_vendors());
        let emulator_selector = Selector::new(format!(
            "Enter the emulator id to install it, or {QUIT_SENTINEL} to end:"
        ))
        .listing(&emulator_lines)
        .default_value(&default_avd)
        .on_blank(BlankInput::Reject)
        .unknown_label("Unrecognized emulator id specified");

        let image_lines = display::package_listing("Installed System Images", &installed);
        let image_selector = Selector::new(format!(
            "Enter the system image to use for this emulator, or {QUIT_SENTINEL} to end:"
        ))
        .listing(&image_lines)
        .default_value(&default_image)
        .on_blank(BlankInput::Reject)
        .unknown_label("Invalid system image");

        loop {
            match emulator_selector.select(&products, always_override, &mut *self.prompter)? {
                Selection::Quit => break,
                Selection::Unmatched(id) => {
                    tracing::warn!("Emulator {id} is not in the catalog; nothing created");
                }
                Selection::Accepted(id) => {
                    match image_selector.select(&installed, always_override, &mut *self.prompter)? {
                        Selection::Quit => break,
                        Selection::Unmatched(image) => {
                            tracing::warn!(
                                "System image {image} is not installed; emulator {id} not created"
                            );
                        }
                        Selection::Accepted(image) => {
                            if let Some(product) = products.get(&id) {
                                self.create_avd(&id, &image, product)?;
                            }
                        }
                    }
                }
            }

            if always_override {
                break;
            }
        }

        self.show_run_emulator_scripts()
    }

    fn create_avd(&mut self, id: &str, image: &str, product: &EmulatorProduct) -> Result<()> {
        // resolution problems surface before avdmanager touches the AVD home
        let entries = avd::hardware_entries(product, &self.layout.skins_dir())?;

        let avd_manager = self.layout.avd_manager();
        let args: Vec<String> = ["create", "avd", "-n", id, "-k", image]
            .iter()
            .map(ToString::to_string)
            .collect();
        let options = ProcessOptions::in_dir_of(&avd_manager)
            .env("ANDROID_SDK_ROOT", self.layout.sdk_home.display().to_string())
            .env("ANDROID_AVD_HOME", self.layout.avd_home.display().to_string())
            .stdin(NO_CUSTOM_HARDWARE);
        self.run_tool(&format!("Creating emulator {id}"), &avd_manager, &args, &options)?;
        tracing::debug!("Created AVD {id} with {image}");

        avd::patch_config_file(&self.layout.avd_config_ini(id), &avd::DENY_KEYS, &entries)?;

        let script = self.scripts.write_run_emulator(id, &product.skin)?;
        tracing::debug!("Created emulator script: {}", script.display());
        tracing::info!("Emulator {id} is ready");
        Ok(())
    }

    fn show_run_emulator_scripts(&mut self) -> Result<()> {
        let scripts = self.scripts.run_emulator_scripts()?;
        if scripts.is_empty() {
            return Ok(());
        }

        self.prompter
            .show("Here are the scripts currently available to start your emulators:");
        for script in scripts {
            self.prompter.show(&format!("\t{}", script.display()));
        }
        Ok(())
    }
}
