//! Common test utilities for avd-setup integration tests

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::thread;

use assert_cmd::Command;
use tempfile::TempDir;

/// A throwaway user home holding the test project, SDK and AVD directories
pub struct TestProject {
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Fake home directory
    pub path: PathBuf,
}

impl TestProject {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Project directory passed to `--target`
    pub fn target(&self) -> PathBuf {
        self.path.join("project")
    }

    pub fn sdk_home(&self) -> PathBuf {
        self.path.join("android-sdk")
    }

    pub fn avd_home(&self) -> PathBuf {
        self.path.join("avd")
    }

    /// Write a file relative to the fake home
    pub fn write_file(&self, path: &str, content: &str) -> PathBuf {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
        file_path
    }

    /// Configuration pointing the SDK and AVD homes into this project and every download
    /// at `base_url`
    pub fn write_config(&self, base_url: &str) -> PathBuf {
        let yaml = format!(
            "sdk_home: {}\n\
             avd_home: {}\n\
             cmdline_tools_redirect_url: {base_url}/cmdline-tools-url.txt\n\
             license_bundle_url: {base_url}/android_sdk_license.zip\n\
             skins_bundle_url: {base_url}/android_skins.zip\n\
             emulator_catalog_url: {base_url}/android-emulators.json\n\
             download_timeout_secs: 5\n",
            self.sdk_home().display(),
            self.avd_home().display(),
        );
        self.write_file("avd-setup.yaml", &yaml)
    }

    /// Command for the binary with a clean environment rooted at this project
    pub fn cmd(&self) -> Command {
        let mut cmd = avd_setup_cmd();
        cmd.env("HOME", &self.path)
            .env("USERPROFILE", &self.path)
            .env("TMPDIR", self.path.join("tmp"));
        std::fs::create_dir_all(self.path.join("tmp")).expect("Failed to create tmp directory");
        cmd
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// The avd-setup binary with configuration variables from the host removed
#[allow(deprecated)]
pub fn avd_setup_cmd() -> Command {
    let mut cmd = Command::cargo_bin("avd-setup").unwrap();
    cmd.env_remove("AVD_SETUP_SDK_HOME")
        .env_remove("ANDROID_AVD_HOME")
        .env_remove("AVD_SETUP_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

/// Serve one canned HTTP response on a local port and return its base URL
#[allow(dead_code)]
pub fn serve_once(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to read test server address");

    thread::spawn(move || {
        if let Ok((stream, _)) = listener.accept() {
            let mut reader = BufReader::new(stream.try_clone().expect("Failed to clone stream"));
            let mut line = String::new();
            while reader.read_line(&mut line).is_ok_and(|n| n > 0) {
                if line == "\r\n" {
                    break;
                }
                line.clear();
            }
            let mut stream = stream;
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
        }
    });

    format!("http://{addr}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_creation() {
        let project = TestProject::new();
        assert!(project.path.exists());
        assert!(project.target().starts_with(&project.path));
    }

    #[test]
    fn test_write_config_points_into_project() {
        let project = TestProject::new();
        let config = project.write_config("http://127.0.0.1:9");
        let content = std::fs::read_to_string(config).unwrap();
        assert!(content.contains("android-sdk"));
        assert!(content.contains("http://127.0.0.1:9/android_skins.zip"));
    }
}
