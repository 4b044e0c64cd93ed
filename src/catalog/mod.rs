//! Catalogs offered to the user for selection
//!
//! - [`packages`]: SDK packages parsed from `sdkmanager --list` output
//! - [`emulators`]: emulator vendors and products from the remote JSON catalog

pub mod emulators;
pub mod packages;

pub use emulators::{EmulatorCatalog, EmulatorProduct, EmulatorVendor};
pub use packages::{SYSTEM_IMAGES_PREFIX, SdkPackage, parse_packages};
