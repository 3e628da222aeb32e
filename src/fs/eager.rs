//! Fully decoded backend.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::FileSystem;
use crate::error::{FsError, Result};
use crate::file::{File, MemoryFile};
use crate::store::{Content, clean_path};

/// Backend whose entries are already in final form.
///
/// Cloning is cheap: clones share the same map.
#[derive(Clone, Debug, Default)]
pub struct EagerFs {
    files: Arc<FxHashMap<String, Content>>,
}

impl EagerFs {
    /// Create a backend over decoded files.
    ///
    /// Keys must already be normalized (no leading slash).
    pub fn new(files: FxHashMap<String, Content>) -> Self {
        Self {
            files: Arc::new(files),
        }
    }

    /// Number of files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Check if a logical path exists.
    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(clean_path(path))
    }
}

impl FileSystem for EagerFs {
    fn open(&self, path: &str) -> Result<File> {
        let name = clean_path(path);
        let data = self
            .files
            .get(name)
            .ok_or_else(|| FsError::not_found(name))?;
        Ok(MemoryFile::new(name, data.clone()).into())
    }

    fn preload(&self) -> Result<Box<dyn FileSystem>> {
        Ok(Box::new(self.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> EagerFs {
        let mut files = FxHashMap::default();
        files.insert("index.html".to_string(), Content::Static(b"<html></html>"));
        files.insert("img/dot.gif".to_string(), Content::from(vec![0x47, 0x49, 0x46]));
        EagerFs::new(files)
    }

    #[test]
    fn test_open_strips_leading_slashes() {
        let fs = fixture();
        let file = fs.open("//index.html").unwrap();
        assert_eq!(file.name(), "index.html");
        assert_eq!(file.size(), 13);
    }

    #[test]
    fn test_read_file() {
        let fs = fixture();
        assert_eq!(fs.read_file("img/dot.gif").unwrap(), b"GIF");
    }

    #[test]
    fn test_missing_is_not_found() {
        let fs = fixture();
        let err = fs.open("nope.txt").unwrap_err();
        assert!(err.is_not_found());
        assert!(fs.read_file("/img").unwrap_err().is_not_found());
    }

    #[test]
    fn test_preload_is_identity() {
        let fs = fixture();
        let preloaded = fs.preload().unwrap();
        assert_eq!(preloaded.read_file("index.html").unwrap(), b"<html></html>");
        assert!(preloaded.override_root().is_none());
    }
}
