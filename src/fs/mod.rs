//! Filesystem backends over a payload store.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Backend Selection                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                             │
//! │  Config::build()                                            │
//! │      │                                                      │
//! │      ├─► Base64           ──► LazyFs<TextCodec>             │
//! │      ├─► Bytes + gzip     ──► LazyFs<BytesCodec>            │
//! │      └─► Bytes            ──► EagerFs                       │
//! │                                                             │
//! │  preload()  : LazyFs ──► EagerFs (new instance)             │
//! │  override   : any    ──► OverrideFs { dir, inner }          │
//! │                                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every backend implements [`FileSystem`]; callers never need to know which
//! one they hold.

mod codec;
mod eager;
mod lazy;
mod overlay;

use std::io::Read;
use std::path::Path;

pub use codec::{BytesCodec, Codec, TextCodec, decode_base64, gunzip};
pub use eager::EagerFs;
pub use lazy::{LazyBytesFs, LazyFs, LazyTextFs};
pub use overlay::{OverrideFs, override_with};

use crate::error::{FsError, Result};
use crate::file::File;

/// Read-only filesystem over embedded files.
///
/// # Example
///
/// ```ignore
/// use binfs::{Config, FileSystem, PayloadStore};
///
/// let fs = Config::new(PayloadStore::from_static_text(ASSETS), true).build();
/// let fs = fs.preload()?; // pay the decode cost once, at startup
/// let css = fs.read_file("/css/site.css")?;
/// ```
pub trait FileSystem: Send + Sync {
    /// Open a logical path for reading.
    ///
    /// Leading slashes are ignored.
    fn open(&self, path: &str) -> Result<File>;

    /// Read a whole file.
    fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let file = self.open(path)?;
        read_all(file)
    }

    /// Decode everything now and return an independent, fully decoded filesystem.
    ///
    /// On error nothing is returned; `self` stays usable.
    fn preload(&self) -> Result<Box<dyn FileSystem>>;

    /// Directory this filesystem is overridden by, if any.
    fn override_root(&self) -> Option<&Path> {
        None
    }
}

impl<F: FileSystem + ?Sized> FileSystem for Box<F> {
    fn open(&self, path: &str) -> Result<File> {
        (**self).open(path)
    }

    fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        (**self).read_file(path)
    }

    fn preload(&self) -> Result<Box<dyn FileSystem>> {
        (**self).preload()
    }

    fn override_root(&self) -> Option<&Path> {
        (**self).override_root()
    }
}

/// Drain an opened file.
fn read_all(file: File) -> Result<Vec<u8>> {
    match file {
        File::Memory(mem) => Ok(mem.contents().to_vec()),
        File::Disk(mut disk) => {
            let mut buf = Vec::with_capacity(disk.size() as usize);
            disk.read_to_end(&mut buf).map_err(|source| FsError::Io {
                path: disk.path().to_path_buf(),
                source,
            })?;
            Ok(buf)
        }
    }
}
