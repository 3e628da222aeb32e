//! Payload store: the compiled-in mapping from logical path to encoded content.
//!
//! A generator emits one static table per asset set, either as byte arrays or
//! as base64 text:
//!
//! ```ignore
//! static ASSETS: &[(&str, &[u8])] = &[
//!     ("css/site.css", &[0x1f, 0x8b, /* ... */]),
//! ];
//!
//! let store = PayloadStore::from_static_bytes(ASSETS);
//! ```
//!
//! The store is never mutated after construction; backends borrow it read-only.

use std::borrow::Cow;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::config::Mode;

// =============================================================================
// Content - Immutable Byte Buffer
// =============================================================================

/// Immutable file bytes, cheap to clone.
///
/// Compiled-in arrays are borrowed without copying; decoded data is shared
/// behind an `Arc` so every opened handle reuses the same allocation.
#[derive(Clone)]
pub enum Content {
    /// Bytes baked into the binary.
    Static(&'static [u8]),
    /// Bytes produced at runtime (decoded or inserted by hand).
    Shared(Arc<[u8]>),
}

impl Content {
    /// View as a byte slice.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        match self {
            Self::Static(bytes) => *bytes,
            Self::Shared(bytes) => &bytes[..],
        }
    }
}

impl AsRef<[u8]> for Content {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl Deref for Content {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl PartialEq for Content {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for Content {}

impl fmt::Debug for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Content").field("len", &self.len()).finish()
    }
}

impl From<&'static [u8]> for Content {
    fn from(bytes: &'static [u8]) -> Self {
        Self::Static(bytes)
    }
}

impl From<Vec<u8>> for Content {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Shared(bytes.into())
    }
}

impl From<Arc<[u8]>> for Content {
    fn from(bytes: Arc<[u8]>) -> Self {
        Self::Shared(bytes)
    }
}

// =============================================================================
// PayloadStore
// =============================================================================

/// Mapping from logical path to encoded payload.
///
/// All entries share one representation. Keys are stored without a leading
/// slash, so `"/img/logo.png"` and `"img/logo.png"` name the same entry.
#[derive(Clone, Debug)]
pub enum PayloadStore {
    /// Raw byte arrays, possibly gzip-compressed.
    Binary(FxHashMap<String, Content>),
    /// Standard base64 strings, possibly of gzip-compressed bytes.
    Text(FxHashMap<String, Cow<'static, str>>),
}

impl PayloadStore {
    /// Build a binary store over a static table without copying payloads.
    pub fn from_static_bytes(table: &'static [(&'static str, &'static [u8])]) -> Self {
        Self::binary(table.iter().map(|&(path, data)| (path, Content::Static(data))))
    }

    /// Build a text store over a static table without copying payloads.
    pub fn from_static_text(table: &'static [(&'static str, &'static str)]) -> Self {
        Self::text(table.iter().map(|&(path, data)| (path, Cow::Borrowed(data))))
    }

    /// Build a binary store from owned entries.
    pub fn binary<P, C>(entries: impl IntoIterator<Item = (P, C)>) -> Self
    where
        P: AsRef<str>,
        C: Into<Content>,
    {
        Self::Binary(
            entries
                .into_iter()
                .map(|(path, data)| (clean_path(path.as_ref()).to_string(), data.into()))
                .collect(),
        )
    }

    /// Build a text store from owned entries.
    pub fn text<P, S>(entries: impl IntoIterator<Item = (P, S)>) -> Self
    where
        P: AsRef<str>,
        S: Into<Cow<'static, str>>,
    {
        Self::Text(
            entries
                .into_iter()
                .map(|(path, data)| (clean_path(path.as_ref()).to_string(), data.into()))
                .collect(),
        )
    }

    /// Physical representation of the payloads.
    pub fn mode(&self) -> Mode {
        match self {
            Self::Binary(_) => Mode::Bytes,
            Self::Text(_) => Mode::Base64,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        match self {
            Self::Binary(map) => map.len(),
            Self::Text(map) => map.len(),
        }
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if a logical path exists.
    pub fn contains(&self, path: &str) -> bool {
        let path = clean_path(path);
        match self {
            Self::Binary(map) => map.contains_key(path),
            Self::Text(map) => map.contains_key(path),
        }
    }

    /// Logical paths, sorted.
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = match self {
            Self::Binary(map) => map.keys().map(String::as_str).collect(),
            Self::Text(map) => map.keys().map(String::as_str).collect(),
        };
        paths.sort_unstable();
        paths
    }
}

/// Normalize a logical path by stripping leading slashes.
#[inline]
pub fn clean_path(path: &str) -> &str {
    path.trim_start_matches('/')
}
