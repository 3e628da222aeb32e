//! Configuration for an embedded filesystem.
//!
//! A build tool emits the payload table together with the settings it was
//! encoded with; [`Config::build`] picks the matching backend.

use std::fmt;

use tracing::debug;

use crate::error::Result;
use crate::fs::{EagerFs, FileSystem, LazyBytesFs, LazyTextFs};
use crate::store::PayloadStore;

/// Physical representation of embedded payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Byte arrays.
    #[default]
    Bytes,
    /// Standard base64 strings.
    Base64,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes => f.write_str("bytes"),
            Self::Base64 => f.write_str("base64"),
        }
    }
}

/// Encoding settings plus the payload store they describe.
///
/// The mode is taken from the store itself, so the two cannot disagree.
#[derive(Debug, Clone)]
pub struct Config {
    gzip: bool,
    data: PayloadStore,
}

impl Config {
    /// Describe a payload store; `gzip` says whether every payload is compressed.
    pub fn new(data: PayloadStore, gzip: bool) -> Self {
        Self { gzip, data }
    }

    /// Payload representation.
    pub fn mode(&self) -> Mode {
        self.data.mode()
    }

    /// Whether payloads are gzip-compressed.
    pub fn is_gzip(&self) -> bool {
        self.gzip
    }

    /// The payload store.
    pub fn data(&self) -> &PayloadStore {
        &self.data
    }

    /// Create the backend matching this configuration.
    ///
    /// | mode   | gzip | backend                 |
    /// |--------|------|-------------------------|
    /// | base64 | any  | [`LazyTextFs`]          |
    /// | bytes  | yes  | [`LazyBytesFs`]         |
    /// | bytes  | no   | [`EagerFs`]             |
    pub fn build(self) -> Box<dyn FileSystem> {
        debug!(
            mode = %self.mode(),
            gzip = self.gzip,
            files = self.data.len(),
            "building embedded filesystem"
        );
        match self.data {
            PayloadStore::Text(data) => Box::new(LazyTextFs::new(data, self.gzip)),
            PayloadStore::Binary(data) if self.gzip => Box::new(LazyBytesFs::new(data, true)),
            PayloadStore::Binary(data) => Box::new(EagerFs::new(data)),
        }
    }

    /// Build and immediately decode everything.
    pub fn preload(self) -> Result<Box<dyn FileSystem>> {
        self.build().preload()
    }
}
