//! SDK package catalog parsing
//!
//! `sdkmanager --list` and `--list_installed` print human-oriented tables. The only
//! lines we care about start with a known package prefix; their first column is the
//! package id:
//!
//! ```text
//!   system-images;android-30;google_apis;x86_64 | 10 | Google APIs Intel x86 Atom_64 System Image
//! ```

use std::fmt;

use crate::selector::Candidates;

/// Prefix of every installable system image id
pub const SYSTEM_IMAGES_PREFIX: &str = "system-images;";

/// One package id from a catalog listing
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SdkPackage {
    pub id: String,
}

impl SdkPackage {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl fmt::Display for SdkPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Parse package ids out of package-manager listing output.
///
/// Keeps lines whose trimmed text starts with `prefix`, takes the text before the first
/// space as the id and returns the ids sorted. Duplicate lines stay duplicated.
pub fn parse_packages(output: &str, prefix: &str) -> Vec<SdkPackage> {
    let mut packages: Vec<SdkPackage> = output
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with(prefix))
        .map(|line| SdkPackage::new(line.split(' ').next().unwrap_or(line)))
        .collect();
    packages.sort();
    packages
}

impl Candidates for [SdkPackage] {
    fn contains_key(&self, key: &str) -> bool {
        self.iter().any(|p| p.id == key)
    }
}

impl Candidates for Vec<SdkPackage> {
    fn contains_key(&self, key: &str) -> bool {
        self.as_slice().contains_key(key)
    }
}
