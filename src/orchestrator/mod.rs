//! Provisioning orchestrator
//! Runs the fixed provisioning sequence against injected collaborators
//!
//! 1. confirm or create the SDK home
//! 2. install the command-line tools
//! 3. install the license and skins bundles
//! 4. install the common SDK packages
//! 5. install system images
//! 6. copy the signing tool
//! 7. write the show-devices script
//! 8. create emulators
//!
//! Every step runs at most once. The first error ends the run; nothing already written
//! is rolled back.

mod emulators;
mod sdk;

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{ProvisionConfig, SdkLayout};
use crate::error::{ProvisionError, Result};
use crate::process::{ProcessOptions, ProcessOutcome, ProcessRunner};
use crate::prompt::Prompter;
use crate::script::ScriptGenerator;
use crate::session::ProvisioningSession;
use crate::transfer::{Downloader, Unpacker, is_zip_payload};
use crate::ui::ProgressReporter;

/// How a run ended without error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    /// The user chose not to install over an existing SDK
    Cancelled,
}

/// The orchestrator's view of the outside world
pub struct Toolkit<'a> {
    pub downloader: &'a dyn Downloader,
    pub unpacker: &'a dyn Unpacker,
    pub runner: &'a dyn ProcessRunner,
    pub prompter: &'a mut dyn Prompter,
    pub reporter: &'a mut dyn ProgressReporter,
}

pub struct ProvisioningOrchestrator<'a> {
    session: &'a mut ProvisioningSession,
    layout: &'a SdkLayout,
    config: &'a ProvisionConfig,
    downloader: &'a dyn Downloader,
    unpacker: &'a dyn Unpacker,
    runner: &'a dyn ProcessRunner,
    prompter: &'a mut dyn Prompter,
    reporter: &'a mut dyn ProgressReporter,
    scripts: ScriptGenerator,
}

impl<'a> ProvisioningOrchestrator<'a> {
    pub fn new(
        session: &'a mut ProvisioningSession,
        layout: &'a SdkLayout,
        config: &'a ProvisionConfig,
        toolkit: Toolkit<'a>,
    ) -> Self {
        let scripts = ScriptGenerator::new(&session.project_home, layout.sdk_rel_path());
        Self {
            session,
            layout,
            config,
            downloader: toolkit.downloader,
            unpacker: toolkit.unpacker,
            runner: toolkit.runner,
            prompter: toolkit.prompter,
            reporter: toolkit.reporter,
            scripts,
        }
    }

    pub fn run(&mut self) -> Result<RunOutcome> {
        if !self.confirm_sdk_home()? {
            return Ok(RunOutcome::Cancelled);
        }

        tracing::info!("Installing Android SDK command-line tools...");
        self.install_cmdline_tools()?;

        let (config, layout) = (self.config, self.layout);
        tracing::info!("Installing pre-accepted license agreements...");
        self.download_and_unzip(&config.license_bundle_url, &layout.licenses_dir())?;

        tracing::info!("Installing pre-packaged Android emulator skins...");
        self.download_and_unzip(&config.skins_bundle_url, &layout.skins_dir())?;

        tracing::info!("Installing common Android SDK packages...");
        self.install_common_packages()?;

        tracing::info!("Installing Android SDK system images...");
        self.install_system_images()?;

        tracing::info!("Setting up apksigner...");
        self.copy_apk_signer()?;

        let show_devices = self.scripts.write_show_devices()?;
        tracing::info!("Created {}", show_devices.display());

        tracing::info!("Installing Android emulators...");
        self.install_emulators()?;

        tracing::info!("Installation complete");
        Ok(RunOutcome::Completed)
    }

    /// Step 1. Returns false when the user declines to install over an existing SDK.
    fn confirm_sdk_home(&mut self) -> Result<bool> {
        let sdk_home = &self.layout.sdk_home;
        if !is_read_writable(sdk_home) {
            tracing::debug!("Creating Android SDK directory at {}", sdk_home.display());
            fs::create_dir_all(sdk_home).map_err(|e| ProvisionError::file_write(sdk_home, &e))?;
            return Ok(true);
        }

        if self.session.always_override {
            tracing::info!(
                "(ALWAYS OVERRIDE): installing over the existing Android SDK at {}",
                sdk_home.display()
            );
            return Ok(true);
        }

        let question = format!(
            "An existing Android SDK is detected at {}. Do you want to install over it?",
            sdk_home.display()
        );
        if self.prompter.confirm(&question)? {
            return Ok(true);
        }

        tracing::info!(
            "Existing Android SDK found at {}; setup cancelled",
            sdk_home.display()
        );
        Ok(false)
    }

    /// Download `url` into a scratch directory and unpack it into a fresh `dest`
    fn download_and_unzip(&mut self, url: &str, dest: &Path) -> Result<Vec<PathBuf>> {
        let staging = crate::temp::staging_dir()?;
        let saved = staging.path().join(download_file_name(url));

        tracing::debug!("Downloading from {url}...");
        let downloader = self.downloader;
        let payload = track(&mut *self.reporter, &format!("Downloading {url}"), || {
            downloader.download(url, &saved)?.ensure_ok(url)
        })?;

        if !is_zip_payload(&payload)? {
            return Err(ProvisionError::NotAnArchive {
                url: url.to_string(),
            });
        }
        tracing::debug!("Downloaded to {}", payload.display());

        if dest.exists() {
            fs::remove_dir_all(dest).map_err(|e| ProvisionError::file_write(dest, &e))?;
        }
        fs::create_dir_all(dest).map_err(|e| ProvisionError::file_write(dest, &e))?;

        let unpacker = self.unpacker;
        let files = track(
            &mut *self.reporter,
            &format!("Unpacking into {}", dest.display()),
            || unpacker.unzip(&payload, dest),
        )?;
        tracing::debug!("Unzipped {} files into {}", files.len(), dest.display());
        Ok(files)
    }

    /// Run an SDK tool and treat any stderr output as fatal
    fn run_tool(
        &mut self,
        activity: &str,
        program: &Path,
        args: &[String],
        options: &ProcessOptions,
    ) -> Result<ProcessOutcome> {
        let (runner, verbose) = (self.runner, self.session.verbose);
        let outcome = track(&mut *self.reporter, activity, || {
            runner.invoke(program, args, options)?.into_result(program)
        })?;
        if verbose && !outcome.stdout.trim().is_empty() {
            tracing::info!("{}", outcome.stdout.trim_end());
        }
        Ok(outcome)
    }

    /// `--sdk_root=<sdk>` followed by `action`
    fn sdk_manager_args(&self, action: &str) -> Vec<String> {
        vec![
            format!("--sdk_root={}", self.layout.sdk_home.display()),
            action.to_string(),
        ]
    }
}

/// Show `activity` on the reporter while `work` runs
fn track<T>(
    reporter: &mut dyn ProgressReporter,
    activity: &str,
    work: impl FnOnce() -> Result<T>,
) -> Result<T> {
    reporter.start(activity);
    let result = work();
    match &result {
        Ok(_) => reporter.finish(),
        Err(_) => reporter.abandon(),
    }
    result
}

fn is_read_writable(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|m| m.is_dir() && !m.permissions().readonly())
}

/// Last path segment of `url`, without query or fragment
fn download_file_name(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or("download.zip")
        .to_string()
}
