//! Test fixtures and fakes for reducing test setup duplication.
//!
//! The orchestrator talks to the outside world through four seams: [`Downloader`],
//! [`Unpacker`], [`ProcessRunner`] and [`Prompter`]. This module provides a scripted or
//! recording implementation of each, plus temp-directory helpers.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_fixtures::{create_temp_dir, FakeDownloader, RecordingRunner};
//!
//! #[test]
//! fn my_test() {
//!     let temp = create_temp_dir();
//!     let downloader = FakeDownloader::new()
//!         .with_text("https://example.com/redirect", "https://example.com/tools.zip")
//!         .with_payload("https://example.com/tools.zip");
//!     let runner = RecordingRunner::new().respond("--list", "system-images;android-30;default;x86 | 1");
//! }
//! ```

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::Result;
use crate::process::{ProcessOptions, ProcessOutcome, ProcessRunner};
use crate::prompt::{Prompter, is_affirmative};
use crate::transfer::http::{DownloadResponse, HTTP_OK, HttpResponse};
use crate::transfer::{Downloader, Unpacker};

/// Bytes that pass the ZIP signature check
pub const ZIP_STUB: &[u8] = b"PK\x03\x04stub archive";

/// Create a temp directory in the system temp location.
///
/// Uses `crate::temp::temp_dir_base()` to ensure temp dirs are never
/// created under the current working directory.
///
/// # Panics
///
/// Panics if the temp directory cannot be created.
#[must_use]
pub fn create_temp_dir() -> TempDir {
    TempDir::new_in(crate::temp::temp_dir_base()).expect("Failed to create temp directory")
}

/// Create test files below `base`, creating parent directories as needed.
///
/// # Panics
///
/// Panics if any file cannot be created.
pub fn create_test_files(base: &Path, files: &[(&str, &str)]) {
    for (path, content) in files {
        let full_path = base.join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&full_path, content).expect("Failed to write test file");
    }
}

/// Prompter fed from a fixed list of answers
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    reads: usize,
    messages: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item: Into<String>>) -> Self {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Number of answers requested so far, including ones past the end of the script
    pub fn reads(&self) -> usize {
        self.reads
    }

    pub fn messages_containing(&self, needle: &str) -> usize {
        self.messages.iter().filter(|m| m.contains(needle)).count()
    }

    fn next_answer(&mut self, prompt: &str) -> Option<String> {
        self.reads += 1;
        self.messages.push(prompt.to_string());
        self.answers.pop_front()
    }
}

impl Prompter for ScriptedPrompter {
    fn show(&mut self, text: &str) {
        self.messages.push(text.to_string());
    }

    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        Ok(self.next_answer(prompt))
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        Ok(self
            .next_answer(question)
            .as_deref()
            .is_some_and(is_affirmative))
    }
}

#[derive(Debug, Clone)]
enum FakeResource {
    Text { status: u16, body: String },
    Payload(Vec<u8>),
}

/// Downloader answering from a URL-keyed table; unknown URLs are 404s
#[derive(Debug, Default)]
pub struct FakeDownloader {
    resources: BTreeMap<String, FakeResource>,
    requests: RefCell<Vec<String>>,
}

impl FakeDownloader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` with status 200
    #[must_use]
    pub fn with_text(self, url: &str, body: &str) -> Self {
        self.with_status(url, HTTP_OK, body)
    }

    #[must_use]
    pub fn with_status(mut self, url: &str, status: u16, body: &str) -> Self {
        self.resources.insert(
            url.to_string(),
            FakeResource::Text {
                status,
                body: body.to_string(),
            },
        );
        self
    }

    /// Serve a file that passes the ZIP signature check
    #[must_use]
    pub fn with_payload(self, url: &str) -> Self {
        self.with_payload_bytes(url, ZIP_STUB)
    }

    #[must_use]
    pub fn with_payload_bytes(mut self, url: &str, bytes: &[u8]) -> Self {
        self.resources
            .insert(url.to_string(), FakeResource::Payload(bytes.to_vec()));
        self
    }

    /// URLs requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    fn lookup(&self, url: &str) -> Option<FakeResource> {
        self.requests.borrow_mut().push(url.to_string());
        self.resources.get(url).cloned()
    }
}

fn status_text(status: u16) -> String {
    let text = match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "",
    };
    text.to_string()
}

impl Downloader for FakeDownloader {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        let (status, body) = match self.lookup(url) {
            Some(FakeResource::Text { status, body }) => (status, body),
            Some(FakeResource::Payload(bytes)) => {
                (HTTP_OK, String::from_utf8_lossy(&bytes).into_owned())
            }
            None => (404, "not found".to_string()),
        };
        Ok(HttpResponse {
            status,
            status_text: status_text(status),
            body,
        })
    }

    fn download(&self, url: &str, dest: &Path) -> Result<DownloadResponse> {
        let bytes = match self.lookup(url) {
            Some(FakeResource::Payload(bytes)) => bytes,
            Some(FakeResource::Text { status, body }) if status != HTTP_OK => {
                return Ok(DownloadResponse {
                    status,
                    status_text: status_text(status),
                    body,
                    payload: None,
                });
            }
            Some(FakeResource::Text { body, .. }) => body.into_bytes(),
            None => {
                return Ok(DownloadResponse {
                    status: 404,
                    status_text: status_text(404),
                    body: "not found".to_string(),
                    payload: None,
                });
            }
        };

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(dest, bytes)?;
        Ok(DownloadResponse {
            status: HTTP_OK,
            status_text: status_text(HTTP_OK),
            body: String::new(),
            payload: Some(dest.to_path_buf()),
        })
    }
}

/// Unpacker that creates canned files, chosen by the last component of the destination
#[derive(Debug, Default)]
pub struct FakeUnpacker {
    entries: BTreeMap<String, Vec<String>>,
    calls: RefCell<Vec<(PathBuf, PathBuf)>>,
}

impl FakeUnpacker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Files created when unpacking into a directory named `dest_name`
    #[must_use]
    pub fn with_entries(mut self, dest_name: &str, files: &[&str]) -> Self {
        self.entries.insert(
            dest_name.to_string(),
            files.iter().map(ToString::to_string).collect(),
        );
        self
    }

    /// `(archive, destination)` pairs unpacked so far
    pub fn calls(&self) -> Vec<(PathBuf, PathBuf)> {
        self.calls.borrow().clone()
    }
}

impl Unpacker for FakeUnpacker {
    fn unzip(&self, archive: &Path, dest: &Path) -> Result<Vec<PathBuf>> {
        self.calls
            .borrow_mut()
            .push((archive.to_path_buf(), dest.to_path_buf()));

        let name = dest
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut created = Vec::new();
        for file in self.entries.get(&name).into_iter().flatten() {
            let path = dest.join(file);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, "")?;
            created.push(path);
        }
        Ok(created)
    }
}

/// One recorded process invocation
#[derive(Debug, Clone)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub options: ProcessOptions,
}

/// Process runner that records every call and answers from canned outcomes.
///
/// An outcome registered with [`RecordingRunner::respond`] is returned when one of the
/// arguments equals its key; anything else succeeds with empty output. With
/// [`RecordingRunner::with_avd_home`], `create avd -n <id>` writes a generic
/// `config.ini` like the real `avdmanager` does.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    outcomes: Vec<(String, ProcessOutcome)>,
    avd_home: Option<PathBuf>,
    calls: RefCell<Vec<Invocation>>,
}

pub const GENERIC_AVD_CONFIG: &str = "\
AvdId=generic
hw.lcd.density=420
hw.lcd.height=1920
hw.lcd.width=1080
hw.ramSize=512
hw.keyboard=no
image.sysdir.1=system-images/android-30/google_apis/x86/
skin.name=1080x1920
";

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer with `stdout` when an argument equals `arg`
    #[must_use]
    pub fn respond(self, arg: &str, stdout: &str) -> Self {
        self.respond_with(
            arg,
            ProcessOutcome {
                stdout: stdout.to_string(),
                stderr: String::new(),
            },
        )
    }

    /// Answer with `stderr` when an argument equals `arg`
    #[must_use]
    pub fn fail_on(self, arg: &str, stderr: &str) -> Self {
        self.respond_with(
            arg,
            ProcessOutcome {
                stdout: String::new(),
                stderr: stderr.to_string(),
            },
        )
    }

    #[must_use]
    pub fn respond_with(mut self, arg: &str, outcome: ProcessOutcome) -> Self {
        self.outcomes.push((arg.to_string(), outcome));
        self
    }

    #[must_use]
    pub fn with_avd_home(mut self, avd_home: &Path) -> Self {
        self.avd_home = Some(avd_home.to_path_buf());
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    /// Argument lists of every call, in order
    pub fn arg_lists(&self) -> Vec<Vec<String>> {
        self.calls.borrow().iter().map(|c| c.args.clone()).collect()
    }

    fn create_avd_config(&self, args: &[String]) -> Result<()> {
        let Some(avd_home) = &self.avd_home else {
            return Ok(());
        };
        if args.len() < 2 || args[0] != "create" || args[1] != "avd" {
            return Ok(());
        }
        let Some(id) = args
            .iter()
            .position(|a| a == "-n")
            .and_then(|i| args.get(i + 1))
        else {
            return Ok(());
        };

        let dir = avd_home.join(format!("{id}.avd"));
        fs::create_dir_all(&dir)?;
        fs::write(dir.join("config.ini"), GENERIC_AVD_CONFIG)?;
        Ok(())
    }
}

impl ProcessRunner for RecordingRunner {
    fn invoke(
        &self,
        program: &Path,
        args: &[String],
        options: &ProcessOptions,
    ) -> Result<ProcessOutcome> {
        self.calls.borrow_mut().push(Invocation {
            program: program.to_path_buf(),
            args: args.to_vec(),
            options: options.clone(),
        });
        self.create_avd_config(args)?;

        Ok(self
            .outcomes
            .iter()
            .find(|(key, _)| args.iter().any(|a| a == key))
            .map(|(_, outcome)| outcome.clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_create_temp_dir() {
        let temp = create_temp_dir();
        assert!(temp.path().exists());
    }

    #[test]
    fn test_scripted_prompter_runs_dry() {
        let mut prompter = ScriptedPrompter::new(["y"]);
        assert!(prompter.confirm("Continue?").unwrap());
        assert!(prompter.read_line("Again?").unwrap().is_none());
        assert_eq!(prompter.reads(), 2);
    }

    #[test]
    fn test_fake_downloader_unknown_url_is_404() {
        let temp = create_temp_dir();
        let downloader = FakeDownloader::new();
        let response = downloader
            .download("https://example.com/x.zip", &temp.path().join("x.zip"))
            .unwrap();
        assert_eq!(response.status, 404);
        assert!(response.payload.is_none());
        assert_eq!(downloader.requests(), vec!["https://example.com/x.zip"]);
    }

    #[test]
    fn test_recording_runner_matches_whole_arguments() {
        let runner = RecordingRunner::new()
            .respond("--list", "listed")
            .respond("--list_installed", "installed");
        let outcome = runner
            .invoke(
                Path::new("sdkmanager"),
                &["--list_installed".to_string()],
                &ProcessOptions::default(),
            )
            .unwrap();
        assert_eq!(outcome.stdout, "installed");
    }

    #[test]
    fn test_recording_runner_writes_avd_config() {
        let temp = create_temp_dir();
        let runner = RecordingRunner::new().with_avd_home(temp.path());
        let args: Vec<String> = ["create", "avd", "-n", "Pixel_04a", "-k", "img"]
            .iter()
            .map(ToString::to_string)
            .collect();
        runner
            .invoke(Path::new("avdmanager"), &args, &ProcessOptions::default())
            .unwrap();
        assert!(temp.path().join("Pixel_04a.avd/config.ini").exists());
    }
}
