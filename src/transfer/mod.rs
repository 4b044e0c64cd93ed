//! Network downloads and archive extraction
//!
//! - [`http`]: the [`Downloader`] seam and its `ureq` implementation
//! - [`archive`]: the [`Unpacker`] seam and its `zip` implementation

pub mod archive;
pub mod http;

pub use archive::{Unpacker, ZipUnpacker, is_zip_payload};
pub use http::{Downloader, UreqDownloader};
