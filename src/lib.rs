//! # binfs
//!
//! A read-only virtual filesystem over assets compiled into the binary.
//!
//! A build step encodes files as byte arrays or base64 strings (optionally
//! gzip-compressed) into a static table. At runtime this crate turns that
//! table into a [`FileSystem`]:
//!
//! - **Raw bytes**: served directly, no decoding
//! - **Compressed bytes / base64**: decoded on first open, cached once per file
//! - **Preload**: decode everything up front and get a fully decoded filesystem
//! - **Override**: serve a real directory first during development
//!
//! ## Quick Start
//!
//! ```ignore
//! use binfs::{Config, FileSystem, PayloadStore, override_with};
//!
//! static ASSETS: &[(&str, &str)] = &[
//!     ("index.html", "H4sIAAAAAAACA7PJMLTLyLTRB1IAE48QaAsAAAA="),
//! ];
//!
//! let fs = Config::new(PayloadStore::from_static_text(ASSETS), true).build();
//!
//! // Optional: decode everything now rather than on first request
//! let fs = fs.preload()?;
//!
//! // Optional: edits under ./assets win over the embedded copy
//! let fs = override_with("assets", fs)?;
//!
//! let html = fs.read_file("/index.html")?;
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Encoding settings and backend selection
//! - [`mod@fs`]: The [`FileSystem`] trait and its backends
//! - [`mod@file`]: Opened file handles
//! - [`store`]: The payload table
//! - [`pack`]: Encoding files into a payload table
//! - [`error`]: Error types

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod file;
pub mod fs;
pub mod pack;
pub mod store;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use binfs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{Config, File, FileSystem, FsError, Mode, PayloadStore, override_with};
}

// =============================================================================
// Core API
// =============================================================================

pub use config::{Config, Mode};
pub use error::{DecodeError, FsError, Result};
pub use file::{DiskFile, File, FileInfo, MemoryFile};
pub use fs::{
    BytesCodec, Codec, EagerFs, FileSystem, LazyBytesFs, LazyFs, LazyTextFs, OverrideFs,
    TextCodec, override_with,
};
pub use store::{Content, PayloadStore, clean_path};

// =============================================================================
// Encoding
// =============================================================================

pub use pack::{Packer, encode_base64, gzip};
