//! Lazily decoded backends with a decode-once cache.
//!
//! # Caching Strategy
//!
//! ```text
//! LazyFs<C>
//! ├── data:   FxHashMap<String, C::Encoded>   (payload store, read-only)
//! └── loaded: Mutex<FxHashMap<String, Content>>
//!
//! open(path):
//! 1. lock
//! 2. hit  → wrap cached bytes
//! 3. miss → path in data? no → NotFound
//! 4.        decode → insert → wrap
//! ```
//!
//! The lock is held while decoding, so a path is decoded at most once no
//! matter how many threads race on it. Failed decodes are not cached.
//!
//! `preload` copies the cache under the lock and decodes the remaining
//! entries after releasing it. It never writes to the cache.

use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use super::codec::{BytesCodec, Codec, TextCodec};
use super::eager::EagerFs;
use super::FileSystem;
use crate::error::{FsError, Result};
use crate::file::{File, MemoryFile};
use crate::store::{Content, clean_path};

/// Lazy backend over gzip-compressed byte arrays.
pub type LazyBytesFs = LazyFs<BytesCodec>;

/// Lazy backend over base64 text.
pub type LazyTextFs = LazyFs<TextCodec>;

/// Backend that decodes each file on first open and memoizes the result.
pub struct LazyFs<C: Codec> {
    codec: C,
    gzip: bool,
    data: Arc<FxHashMap<String, C::Encoded>>,
    loaded: Mutex<FxHashMap<String, Content>>,
}

impl<C: Codec + Default> LazyFs<C> {
    /// Create a lazy backend over encoded payloads.
    ///
    /// Keys must already be normalized (no leading slash).
    pub fn new(data: FxHashMap<String, C::Encoded>, gzip: bool) -> Self {
        Self::with_codec(C::default(), data, gzip)
    }
}

impl<C: Codec> LazyFs<C> {
    /// Create a lazy backend with an explicit codec.
    pub fn with_codec(codec: C, data: FxHashMap<String, C::Encoded>, gzip: bool) -> Self {
        Self {
            codec,
            gzip,
            data: Arc::new(data),
            loaded: Mutex::new(FxHashMap::default()),
        }
    }

    /// Number of files in the payload store.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of files decoded so far.
    pub fn loaded_count(&self) -> usize {
        self.loaded.lock().len()
    }

    fn decode(&self, name: &str, encoded: &C::Encoded) -> Result<Content> {
        self.codec
            .decode(encoded, self.gzip)
            .map_err(|e| FsError::decode(name, e))
    }

    /// Decode one entry for preloading, reusing the cache when possible.
    fn preload_entry(
        &self,
        loaded: &FxHashMap<String, Content>,
        name: &str,
        encoded: &C::Encoded,
    ) -> Result<(String, Content)> {
        let data = match loaded.get(name) {
            Some(data) => data.clone(),
            None => self.decode(name, encoded)?,
        };
        Ok((name.to_string(), data))
    }

    #[cfg(feature = "parallel")]
    fn preload_all(
        &self,
        loaded: &FxHashMap<String, Content>,
    ) -> Result<FxHashMap<String, Content>> {
        use rayon::prelude::*;

        let data: &FxHashMap<String, C::Encoded> = &self.data;
        data.par_iter()
            .map(|(name, encoded)| self.preload_entry(loaded, name, encoded))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn preload_all(
        &self,
        loaded: &FxHashMap<String, Content>,
    ) -> Result<FxHashMap<String, Content>> {
        self.data
            .iter()
            .map(|(name, encoded)| self.preload_entry(loaded, name, encoded))
            .collect()
    }
}

impl<C: Codec> FileSystem for LazyFs<C> {
    fn open(&self, path: &str) -> Result<File> {
        let name = clean_path(path);
        let mut loaded = self.loaded.lock();

        if let Some(data) = loaded.get(name) {
            trace!(path = name, "embedded file cache hit");
            return Ok(MemoryFile::new(name, data.clone()).into());
        }

        let encoded = self.data.get(name).ok_or_else(|| FsError::not_found(name))?;
        let data = self.decode(name, encoded)?;
        debug!(path = name, size = data.len(), "decoded embedded file");
        loaded.insert(name.to_string(), data.clone());

        Ok(MemoryFile::new(name, data).into())
    }

    fn preload(&self) -> Result<Box<dyn FileSystem>> {
        // Decode from a snapshot so no rayon worker waits on `loaded` while
        // this thread holds it.
        let loaded = self.loaded.lock().clone();
        let files = self.preload_all(&loaded)?;
        debug!(files = files.len(), cached = loaded.len(), "preloaded embedded files");
        Ok(Box::new(EagerFs::new(files)))
    }
}
