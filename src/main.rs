//! avd-setup - Android SDK and emulator provisioning
//!
//! Installs the Android command-line tools, license and skins bundles, common SDK
//! packages, system images and emulators needed to run mobile tests without a physical
//! device, then writes helper scripts into the target project.

use std::time::Duration;

use clap::Parser;

mod avd;
mod catalog;
mod cli;
mod config;
mod error;
mod orchestrator;
mod process;
mod prompt;
mod script;
mod selector;
mod session;
mod temp;
#[cfg(test)]
mod test_fixtures;
mod transfer;
mod ui;

use cli::{BAD_CLI_ARGS_EXIT_CODE, Cli};
use config::{ProvisionConfig, SdkLayout};
use error::Result;
use orchestrator::{ProvisioningOrchestrator, RunOutcome, Toolkit};
use session::ProvisioningSession;

/// `RUST_LOG` wins; otherwise `info`, or `debug` with `--verbose`
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .init();
}

fn run(cli: &Cli) -> Result<RunOutcome> {
    let config = ProvisionConfig::load(cli.config.as_deref())?;
    let layout = SdkLayout::resolve(&config)?;
    let mut session =
        ProvisioningSession::new(&cli.target, cli.verbose, cli.always_override, &config);

    tracing::debug!("Project home: {}", session.project_home.display());
    tracing::debug!("Android SDK home: {}", layout.sdk_home.display());
    tracing::debug!("Android AVD home: {}", layout.avd_home.display());

    let downloader =
        transfer::UreqDownloader::new(Duration::from_secs(config.download_timeout_secs));
    let unpacker = transfer::ZipUnpacker;
    let runner = process::SystemProcessRunner;
    let mut prompter = prompt::TerminalPrompter;
    let mut reporter = ui::reporter_for_terminal();

    let toolkit = Toolkit {
        downloader: &downloader,
        unpacker: &unpacker,
        runner: &runner,
        prompter: &mut prompter,
        reporter: reporter.as_mut(),
    };
    ProvisioningOrchestrator::new(&mut session, &layout, &config, toolkit).run()
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version also arrive here, on stdout
            let code = if e.use_stderr() {
                BAD_CLI_ARGS_EXIT_CODE
            } else {
                0
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    init_logging(cli.verbose);
    ui::display::print_banner(script::GENERATOR_SIGNATURE);

    match run(&cli) {
        Ok(RunOutcome::Completed | RunOutcome::Cancelled) => {}
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
