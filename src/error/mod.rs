//! Error types and handling for avd-setup
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Every variant here is fatal for a provisioning run: the orchestrator returns it
//! straight up to `main`, which prints it and exits non-zero. Mistyped selections and
//! the quit sentinel are not errors and never show up here.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for provisioning operations
#[derive(Error, Diagnostic, Debug)]
pub enum ProvisionError {
    // Download errors
    #[error("Unable to download from {url}: {status} {status_text}\n{body}")]
    #[diagnostic(
        code(avd_setup::download::status),
        help("Check that the URL is reachable or override it in the configuration file")
    )]
    DownloadFailed {
        url: String,
        status: u16,
        status_text: String,
        body: String,
    },

    #[error("Unable to reach {url}: {reason}")]
    #[diagnostic(code(avd_setup::download::transport))]
    Transport { url: String, reason: String },

    #[error("File downloaded from {url} is not a ZIP archive as expected")]
    #[diagnostic(code(avd_setup::download::not_an_archive))]
    NotAnArchive { url: String },

    // Archive errors
    #[error("Unable to unzip {archive}: {reason}")]
    #[diagnostic(code(avd_setup::archive::failed))]
    ArchiveFailed { archive: String, reason: String },

    #[error("Unable to find {path} under {location}")]
    #[diagnostic(
        code(avd_setup::archive::missing_entry),
        help("The downloaded command-line tools archive has an unexpected layout")
    )]
    MissingAfterExtract { path: String, location: String },

    // Process errors
    #[error("{program} reported an error:\n{stderr}")]
    #[diagnostic(code(avd_setup::process::stderr))]
    ProcessFailed { program: String, stderr: String },

    #[error("Failed to run {program}: {reason}")]
    #[diagnostic(code(avd_setup::process::spawn_failed))]
    ProcessSpawnFailed { program: String, reason: String },

    #[error("Unable to find {file} under {location}")]
    #[diagnostic(
        code(avd_setup::sdk::tool_not_found),
        help("The build-tools package may not have been installed")
    )]
    ToolNotFound { file: String, location: String },

    // Catalog errors
    #[error("Failed to parse emulator catalog from {url}: {reason}")]
    #[diagnostic(code(avd_setup::catalog::parse_failed))]
    CatalogParseFailed { url: String, reason: String },

    #[error("Emulator id '{id}' is listed more than once in the emulator catalog")]
    #[diagnostic(
        code(avd_setup::catalog::duplicate_product),
        help("Every product id must be unique across all vendors")
    )]
    DuplicateProduct { id: String },

    #[error("Invalid emulator resolution '{resolution}'")]
    #[diagnostic(
        code(avd_setup::avd::invalid_resolution),
        help("Resolutions must look like WIDTHxHEIGHT, e.g. 1080x2340")
    )]
    InvalidResolution { resolution: String },

    // Configuration errors
    #[error("Failed to read configuration file: {path}")]
    #[diagnostic(code(avd_setup::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(avd_setup::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Could not determine the user home directory")]
    #[diagnostic(
        code(avd_setup::config::no_home),
        help("Set AVD_SETUP_SDK_HOME and ANDROID_AVD_HOME explicitly")
    )]
    HomeDirUnavailable,

    // Console errors
    #[error("Failed to read input: {reason}")]
    #[diagnostic(code(avd_setup::prompt::failed))]
    PromptFailed { reason: String },

    // File system errors
    #[error("Failed to read file: {path}: {reason}")]
    #[diagnostic(code(avd_setup::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(avd_setup::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(avd_setup::fs::io_error))]
    IoError { message: String },
}

impl ProvisionError {
    pub fn file_read(path: &std::path::Path, err: &std::io::Error) -> Self {
        ProvisionError::FileReadFailed {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }

    pub fn file_write(path: &std::path::Path, err: &std::io::Error) -> Self {
        ProvisionError::FileWriteFailed {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<std::io::Error> for ProvisionError {
    fn from(err: std::io::Error) -> Self {
        ProvisionError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for ProvisionError {
    fn from(err: serde_yaml::Error) -> Self {
        ProvisionError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for ProvisionError {
    fn from(err: inquire::InquireError) -> Self {
        ProvisionError::PromptFailed {
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, ProvisionError>;
