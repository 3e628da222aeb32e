//! Encoding side of the payload contract.
//!
//! Build tools turn asset files into a [`PayloadStore`]; this module does the
//! in-memory part of that job (compression and text encoding) so a store can
//! also be assembled at runtime, e.g. for tests or plugin bundles.
//!
//! # Example
//!
//! ```ignore
//! use binfs::{FileSystem, Mode, Packer};
//!
//! let fs = Packer::new()
//!     .mode(Mode::Base64)
//!     .gzip(9)
//!     .insert("index.html", b"<h1>hi</h1>".to_vec())
//!     .build()?
//!     .build();
//! assert_eq!(fs.read_file("/index.html")?, b"<h1>hi</h1>");
//! ```

use std::io::{self, Write};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::Compression;
use flate2::write::GzEncoder;
use rustc_hash::FxHashMap;

use crate::config::{Config, Mode};
use crate::store::{PayloadStore, clean_path};

/// Column width base64 output is wrapped at unless [`Packer::wrap`] says otherwise.
pub const DEFAULT_WRAP: usize = 100;

/// Builder that encodes files into a [`Config`].
#[derive(Debug, Clone)]
pub struct Packer {
    mode: Mode,
    level: u32,
    wrap: Option<usize>,
    files: FxHashMap<String, Vec<u8>>,
}

impl Default for Packer {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            level: 0,
            wrap: Some(DEFAULT_WRAP),
            files: FxHashMap::default(),
        }
    }
}

impl Packer {
    /// Create an empty packer (raw bytes, no compression, base64 wrapped at
    /// [`DEFAULT_WRAP`]).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the payload representation.
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the gzip level; `0` disables compression, levels above 9 are clamped.
    pub fn gzip(mut self, level: u32) -> Self {
        self.level = level.min(9);
        self
    }

    /// Wrap base64 output every `width` characters; `0` disables wrapping.
    pub fn wrap(mut self, width: usize) -> Self {
        self.wrap = (width > 0).then_some(width);
        self
    }

    /// Add a file. A later insert for the same path replaces the earlier one.
    pub fn insert(mut self, path: impl AsRef<str>, data: impl Into<Vec<u8>>) -> Self {
        self.files
            .insert(clean_path(path.as_ref()).to_string(), data.into());
        self
    }

    /// Number of files added so far.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Encode all files.
    pub fn build(self) -> io::Result<Config> {
        let compress = self.level > 0;
        let mut encoded = FxHashMap::default();
        for (path, data) in self.files {
            let data = if compress { gzip(&data, self.level)? } else { data };
            encoded.insert(path, data);
        }

        let store = match self.mode {
            Mode::Bytes => PayloadStore::binary(encoded),
            Mode::Base64 => PayloadStore::text(
                encoded
                    .into_iter()
                    .map(|(path, data)| (path, encode_base64(&data, self.wrap))),
            ),
        };
        Ok(Config::new(store, compress))
    }
}

/// Gzip-compress `data` at `level` (0-9).
pub fn gzip(data: &[u8], level: u32) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::new(level.min(9)));
    encoder.write_all(data)?;
    encoder.finish()
}

/// Encode as standard base64, optionally wrapped at `wrap` columns.
pub fn encode_base64(data: &[u8], wrap: Option<usize>) -> String {
    let encoded = STANDARD.encode(data);
    match wrap {
        Some(width) if width > 0 && encoded.len() > width => {
            let mut out = String::with_capacity(encoded.len() + encoded.len() / width);
            for (i, chunk) in encoded.as_bytes().chunks(width).enumerate() {
                if i > 0 {
                    out.push('\n');
                }
                // base64 output is ASCII, so chunking by byte is safe
                out.push_str(std::str::from_utf8(chunk).unwrap_or_default());
            }
            out
        }
        _ => encoded,
    }
}
