//! CLI definitions using clap derive API

use clap::Parser;
use clap::builder::{Styles, styling::AnsiColor};
use std::path::PathBuf;

use crate::config::CONFIG_ENV;

/// Exit status for unusable command-line arguments
pub const BAD_CLI_ARGS_EXIT_CODE: i32 = 2;

/// avd-setup - Android SDK and emulator provisioning
///
/// Installs the Android command-line tools, system images and emulators a mobile test
/// project needs, and writes helper scripts into the project.
#[derive(Parser, Debug)]
#[command(
    name = "avd-setup",
    author,
    version,
    color = clap::ColorChoice::Auto,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Provision Android SDK tooling, system images and emulators for a test project",
    after_help = "Examples:\n    \
                  avd-setup --target ~/projects/mobile-tests\n    \
                  avd-setup -t ~/projects/mobile-tests -y\n    \
                  avd-setup -t ~/projects/mobile-tests -c mirror.yaml -v"
)]
pub struct Cli {
    /// The project home directory; helper scripts are written to <TARGET>/artifact/bin
    #[arg(long, short = 't', value_name = "TARGET")]
    pub target: PathBuf,

    /// Enable verbose output
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Always override: accept every default and never prompt
    #[arg(long = "override", short = 'y')]
    pub always_override: bool,

    /// YAML file overriding download locations, directories and defaults
    #[arg(long, short = 'c', value_name = "FILE", env = CONFIG_ENV)]
    pub config: Option<PathBuf>,
}
